//! Day-of-year windowing shared by the aggregator and the threshold estimator.
//!
//! Days are normalised onto a fixed 365-day cycle: in leap years every date after
//! 28 February is shifted back by one, so 29 February shares day 59 with
//! 28 February and 31 December is always day 365. Window membership is the
//! circular distance on that cycle, which makes windows wrap across year-end.

use crate::types::sample::ClimateSample;
use chrono::{Datelike, Duration, NaiveDate};

pub(crate) const DAYS_IN_CYCLE: u32 = 365;

/// Day of year on the fixed 365-day cycle (1..=365).
///
/// ```
/// use climate_odds::normalized_day_of_year;
/// use chrono::NaiveDate;
///
/// let dec_31_leap = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
/// let dec_31 = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
/// assert_eq!(normalized_day_of_year(dec_31_leap), 365);
/// assert_eq!(normalized_day_of_year(dec_31), 365);
/// ```
pub fn normalized_day_of_year(date: NaiveDate) -> u32 {
    let ordinal = date.ordinal();
    if date.leap_year() && ordinal > 59 {
        ordinal - 1
    } else {
        ordinal
    }
}

/// Clamps a caller-supplied target day (1..=366) onto the cycle.
pub(crate) fn cycle_day(target_day_of_year: u32) -> u32 {
    target_day_of_year.clamp(1, DAYS_IN_CYCLE)
}

/// Circular distance in days between two cycle days.
pub fn day_distance(a: u32, b: u32) -> u32 {
    let direct = a.abs_diff(b) % DAYS_IN_CYCLE;
    direct.min(DAYS_IN_CYCLE - direct)
}

/// The calendar date in `year` that falls on the given cycle day.
pub(crate) fn date_for_cycle_day(year: i32, day: u32) -> Option<NaiveDate> {
    let day = cycle_day(day);
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let ordinal = if jan_first.leap_year() && day > 59 {
        day + 1
    } else {
        day
    };
    NaiveDate::from_yo_opt(year, ordinal)
}

/// The inclusive date range to fetch so that each of `years_back` years ending
/// with `last_year` contributes one full window around `target_day`.
///
/// `None` when any bound falls outside the representable calendar.
pub(crate) fn history_range(
    target_day: u32,
    window_days: u32,
    years_back: u32,
    last_year: i32,
) -> Option<(NaiveDate, NaiveDate)> {
    let first_year = last_year.checked_sub(years_back.saturating_sub(1) as i32)?;
    let half = Duration::days(i64::from(window_days));
    let start = date_for_cycle_day(first_year, target_day)?.checked_sub_signed(half)?;
    let end = date_for_cycle_day(last_year, target_day)?.checked_add_signed(half)?;
    Some((start, end))
}

/// A non-owning view over the samples whose day of year lies within
/// `±window_days` of a target day.
#[derive(Debug, Clone, Copy)]
pub struct SampleWindow<'a> {
    samples: &'a [ClimateSample],
    target_day: u32,
    window_days: u32,
}

impl<'a> SampleWindow<'a> {
    pub fn new(samples: &'a [ClimateSample], target_day_of_year: u32, window_days: u32) -> Self {
        Self {
            samples,
            target_day: cycle_day(target_day_of_year),
            window_days,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        day_distance(normalized_day_of_year(date), self.target_day) <= self.window_days
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a ClimateSample> + '_ {
        self.samples.iter().filter(move |s| self.contains(s.date))
    }

    /// Present, finite values of one parameter inside the window. Missing and
    /// non-finite values are skipped, so every consumer counts the same samples.
    pub fn values(&self, parameter: crate::Parameter) -> Vec<f64> {
        self.iter()
            .filter_map(|s| s.get(parameter))
            .filter(|v| v.is_finite())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parameter;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample(date: NaiveDate) -> ClimateSample {
        ClimateSample::from((date, [(Parameter::TemperatureMean, 1.0)]))
    }

    #[test]
    fn test_normalization_collapses_leap_day() {
        assert_eq!(normalized_day_of_year(date(2024, 2, 28)), 59);
        assert_eq!(normalized_day_of_year(date(2024, 2, 29)), 59);
        assert_eq!(normalized_day_of_year(date(2024, 3, 1)), 60);
        assert_eq!(normalized_day_of_year(date(2023, 3, 1)), 60);
    }

    #[test]
    fn test_day_distance_wraps() {
        assert_eq!(day_distance(2, 360), 7);
        assert_eq!(day_distance(360, 2), 7);
        assert_eq!(day_distance(185, 185), 0);
        assert_eq!(day_distance(1, 365), 1);
        assert_eq!(day_distance(1, 183), 182);
    }

    #[test]
    fn test_window_around_day_2_includes_day_360_of_prior_non_leap_year() {
        // 2022-12-26 is day 360 of a common year.
        let samples = vec![sample(date(2022, 12, 26)), sample(date(2022, 12, 25))];
        assert_eq!(normalized_day_of_year(samples[0].date), 360);
        let window = SampleWindow::new(&samples, 2, 7);
        let dates: Vec<_> = window.iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![date(2022, 12, 26)]);
    }

    #[test]
    fn test_window_around_day_2_includes_day_360_of_prior_leap_year() {
        // 2024-12-26 has ordinal 361 in a leap year and normalises to 360.
        let samples = vec![sample(date(2024, 12, 26)), sample(date(2024, 12, 25))];
        assert_eq!(normalized_day_of_year(samples[0].date), 360);
        let window = SampleWindow::new(&samples, 2, 7);
        assert_eq!(window.len(), 1);
        assert!(window.contains(date(2024, 12, 26)));
        assert!(!window.contains(date(2024, 12, 25)));
    }

    #[test]
    fn test_target_366_is_treated_as_365() {
        let samples = vec![sample(date(2023, 12, 31)), sample(date(2024, 12, 31))];
        let window = SampleWindow::new(&samples, 366, 0);
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn test_date_for_cycle_day() {
        assert_eq!(date_for_cycle_day(2023, 185), Some(date(2023, 7, 4)));
        assert_eq!(date_for_cycle_day(2024, 185), Some(date(2024, 7, 4)));
        assert_eq!(date_for_cycle_day(2024, 59), Some(date(2024, 2, 28)));
        assert_eq!(date_for_cycle_day(2024, 365), Some(date(2024, 12, 31)));
    }

    #[test]
    fn test_history_range_gives_one_window_per_year() {
        let (start, end) = history_range(185, 7, 10, 2024).unwrap();
        assert_eq!(start, date(2015, 6, 27));
        assert_eq!(end, date(2024, 7, 11));

        // Each day in the fetched span inside the window belongs to one of ten windows.
        let samples: Vec<_> = DateSpanIter(start, end).map(sample).collect();
        let window = SampleWindow::new(&samples, 185, 7);
        assert_eq!(window.len(), 150);
    }

    #[test]
    fn test_history_range_wrapping_target_still_one_window_per_year() {
        let (start, end) = history_range(2, 7, 3, 2024).unwrap();
        assert_eq!(start, date(2021, 12, 26));
        assert_eq!(end, date(2024, 1, 9));
        let samples: Vec<_> = DateSpanIter(start, end).map(sample).collect();
        let window = SampleWindow::new(&samples, 2, 7);
        assert_eq!(window.len(), 45);
    }

    #[test]
    fn test_history_range_at_calendar_edges_is_none() {
        assert_eq!(history_range(2, 7, 1, NaiveDate::MIN.year()), None);
        assert_eq!(history_range(364, 7, 1, NaiveDate::MAX.year()), None);
        assert_eq!(history_range(185, 7, 3, i32::MIN), None);
    }

    #[test]
    fn test_values_skip_non_finite() {
        let samples = vec![
            ClimateSample::from((date(2023, 7, 3), [(Parameter::TemperatureMax, 31.0)])),
            ClimateSample::from((date(2023, 7, 4), [(Parameter::TemperatureMax, f64::NAN)])),
            ClimateSample::from((date(2023, 7, 5), [(Parameter::TemperatureMax, f64::INFINITY)])),
        ];
        let window = SampleWindow::new(&samples, 185, 7);
        assert_eq!(window.len(), 3);
        assert_eq!(window.values(Parameter::TemperatureMax), vec![31.0]);
    }

    struct DateSpanIter(NaiveDate, NaiveDate);

    impl Iterator for DateSpanIter {
        type Item = NaiveDate;
        fn next(&mut self) -> Option<NaiveDate> {
            if self.0 > self.1 {
                return None;
            }
            let current = self.0;
            self.0 = current.succ_opt()?;
            Some(current)
        }
    }
}
