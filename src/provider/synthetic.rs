//! Deterministic daily samples drawn from the seasonal reference model.
//!
//! Used in place of upstream history when the provider is unavailable, so the
//! statistics, probability, time-series and export operations still answer.
//! Each day is generated from an RNG seeded by the coordinate and the date, so
//! identical inputs always produce identical samples regardless of the range
//! they were requested in.

use crate::seasonal::{latitude_adjustment, Season};
use crate::types::coordinate::Coordinate;
use crate::types::parameter::Parameter;
use crate::types::sample::ClimateSample;
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

const WET_DAY_RAIN_MM: (f64, f64) = (1.0, 25.0);
const SURFACE_PRESSURE_KPA: (f64, f64) = (100.5, 102.1);

#[derive(Debug, Clone, Copy, Default)]
pub struct SeasonalSynthesizer;

impl SeasonalSynthesizer {
    /// One sample per calendar day in `start..=end`, restricted to `parameters`.
    pub fn samples(
        &self,
        coordinate: Coordinate,
        start: NaiveDate,
        end: NaiveDate,
        parameters: &[Parameter],
    ) -> Vec<ClimateSample> {
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|date| self.sample(coordinate, date, parameters))
            .collect()
    }

    pub fn sample(
        &self,
        coordinate: Coordinate,
        date: NaiveDate,
        parameters: &[Parameter],
    ) -> ClimateSample {
        let season = Season::for_month(date.month());
        let baseline = season.baseline();
        let mut rng = StdRng::seed_from_u64(seed(coordinate, date));

        // Draw every field in a fixed order so a value never depends on which
        // parameters were requested.
        let mean = uniform(&mut rng, baseline.temperature) + latitude_adjustment(coordinate.latitude());
        let max = mean + rng.gen_range(2.5..=4.5);
        let min = mean - rng.gen_range(2.5..=4.5);
        let wet = rng.gen_bool(baseline.rain_factor);
        let rain = uniform(&mut rng, WET_DAY_RAIN_MM);
        let humidity = uniform(&mut rng, baseline.humidity);
        let wind = baseline.wind_speed * rng.gen_range(0.5..=1.5);
        let pressure = uniform(&mut rng, SURFACE_PRESSURE_KPA);
        let solar = uniform(&mut rng, solar_range(season));

        let values: BTreeMap<Parameter, f64> = parameters
            .iter()
            .map(|&parameter| {
                let value = match parameter {
                    Parameter::TemperatureMean => mean,
                    Parameter::TemperatureMax => max,
                    Parameter::TemperatureMin => min,
                    Parameter::Precipitation if wet => rain,
                    Parameter::Precipitation => 0.0,
                    Parameter::RelativeHumidity => humidity,
                    Parameter::WindSpeed => wind,
                    Parameter::SurfacePressure => pressure,
                    Parameter::SolarRadiation => solar,
                };
                (parameter, round2(value))
            })
            .collect();
        ClimateSample::new(date, values)
    }
}

fn solar_range(season: Season) -> (f64, f64) {
    match season {
        Season::Summer => (22.0, 28.0),
        Season::Monsoon => (14.0, 20.0),
        Season::Winter => (12.0, 18.0),
    }
}

fn uniform(rng: &mut StdRng, (low, high): (f64, f64)) -> f64 {
    rng.gen_range(low..=high)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn seed(coordinate: Coordinate, date: NaiveDate) -> u64 {
    let lat = coordinate.latitude().to_bits();
    let lon = coordinate.longitude().to_bits();
    let day = date.num_days_from_ce() as u64;
    lat.rotate_left(17) ^ lon.rotate_left(41) ^ day.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delhi() -> Coordinate {
        Coordinate::new(28.61, 77.21).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_one_sample_per_day() {
        let samples =
            SeasonalSynthesizer.samples(delhi(), date(2024, 2, 27), date(2024, 3, 2), &Parameter::ALL);
        assert_eq!(samples.len(), 5);
        assert!(samples.iter().all(|s| s.values.len() == Parameter::ALL.len()));
    }

    #[test]
    fn test_same_day_same_values_regardless_of_range_or_parameters() {
        let day = date(2023, 8, 20);
        let wide = SeasonalSynthesizer.samples(delhi(), date(2023, 8, 1), date(2023, 8, 31), &Parameter::ALL);
        let single = SeasonalSynthesizer.sample(delhi(), day, &[Parameter::RelativeHumidity]);
        let from_wide = wide.iter().find(|s| s.date == day).unwrap();
        assert_eq!(
            from_wide.get(Parameter::RelativeHumidity),
            single.get(Parameter::RelativeHumidity)
        );
        assert_eq!(single.values.len(), 1);
    }

    #[test]
    fn test_values_follow_season() {
        let samples =
            SeasonalSynthesizer.samples(delhi(), date(2023, 7, 1), date(2023, 7, 31), &Parameter::ALL);
        let adjustment = latitude_adjustment(28.61);
        for s in &samples {
            let t = s.get(Parameter::TemperatureMean).unwrap();
            assert!((25.0 + adjustment - 0.01..=30.0 + adjustment + 0.01).contains(&t));
            let rh = s.get(Parameter::RelativeHumidity).unwrap();
            assert!((70.0..=95.0).contains(&rh));
            assert!(s.get(Parameter::TemperatureMax).unwrap() > t);
            assert!(s.get(Parameter::Precipitation).unwrap() >= 0.0);
        }
    }

    #[test]
    fn test_different_coordinates_differ() {
        let other = Coordinate::new(-33.87, 151.21).unwrap();
        let a = SeasonalSynthesizer.sample(delhi(), date(2023, 1, 1), &Parameter::ALL);
        let b = SeasonalSynthesizer.sample(other, date(2023, 1, 1), &Parameter::ALL);
        assert_ne!(a, b);
    }
}
