//! Composes windowed history (or the seasonal model), the scorer and the
//! derived-index formulas into one [`PredictionResult`].

use crate::prediction::indices::{clamp_aqi, heat_index, wind_chill, AqiCategory};
use crate::prediction::rules::{advisory_comments, precaution_groups, Conditions, PrecautionGroup, ThresholdConfig};
use crate::prediction::scorer::{AqiFeatures, Scorer};
use crate::seasonal::{seasonal_estimate, Season, SeasonalEstimate};
use crate::stats::summary::{summarize, StatisticsSummary};
use crate::stats::threshold::{probability, ThresholdQuery};
use crate::types::coordinate::Coordinate;
use crate::types::data_source::DataSource;
use crate::types::parameter::Parameter;
use crate::types::sample::ClimateSample;
use crate::utils::round1;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Parameters a prediction draws from history.
pub(crate) const PREDICTION_PARAMETERS: [Parameter; 7] = [
    Parameter::TemperatureMean,
    Parameter::TemperatureMax,
    Parameter::TemperatureMin,
    Parameter::Precipitation,
    Parameter::RelativeHumidity,
    Parameter::WindSpeed,
    Parameter::SurfacePressure,
];

const KPA_TO_HPA: f64 = 10.0;

/// Windowed history reduced to what the blender needs.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalStatistics {
    pub summaries: BTreeMap<Parameter, StatisticsSummary>,
    /// Share of windowed days at or above the wet-day threshold (%), if any
    /// precipitation was recorded.
    pub wet_day_probability: Option<f64>,
}

impl HistoricalStatistics {
    pub fn from_samples(
        samples: &[ClimateSample],
        target_day_of_year: u32,
        window_days: u32,
        wet_day_threshold_mm: f64,
    ) -> Self {
        let wet = probability(
            samples,
            target_day_of_year,
            window_days,
            ThresholdQuery::at_least(Parameter::Precipitation, wet_day_threshold_mm),
        );
        Self {
            summaries: summarize(samples, target_day_of_year, window_days, &PREDICTION_PARAMETERS),
            wet_day_probability: wet.probability,
        }
    }

    fn mean(&self, parameter: Parameter) -> Option<f64> {
        self.summaries.get(&parameter).and_then(|s| s.mean())
    }
}

/// One point prediction for a coordinate and date.
///
/// Temperatures are °C, humidity and rain probability %, wind m/s and
/// pressure hPa. The air-quality fields are absent when no scorer is loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub rain_probability: f64,
    pub temperature: f64,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub pressure: f64,
    pub heat_index: f64,
    pub wind_chill: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_quality_index: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_quality_category: Option<AqiCategory>,
    pub season: Season,
    pub data_source: DataSource,
    pub location: Coordinate,
    pub date: NaiveDate,
    pub comments: Vec<String>,
    pub precautions: Vec<PrecautionGroup>,
}

struct PointValues {
    temperature: f64,
    temperature_max: f64,
    temperature_min: f64,
    humidity: f64,
    wind_speed: f64,
    pressure: f64,
    rain_probability: f64,
}

impl PointValues {
    fn seasonal(estimate: &SeasonalEstimate) -> Self {
        Self {
            temperature: estimate.temperature,
            temperature_max: estimate.temperature_max,
            temperature_min: estimate.temperature_min,
            humidity: estimate.humidity,
            wind_speed: estimate.wind_speed,
            pressure: estimate.pressure,
            rain_probability: estimate.rain_probability,
        }
    }

    /// Window means, with each missing field taken from the seasonal estimate.
    fn historical(history: &HistoricalStatistics, estimate: &SeasonalEstimate, rain_weight: f64) -> Self {
        let seasonal_rain = estimate.rain_probability;
        Self {
            temperature: history
                .mean(Parameter::TemperatureMean)
                .unwrap_or(estimate.temperature),
            temperature_max: history
                .mean(Parameter::TemperatureMax)
                .unwrap_or(estimate.temperature_max),
            temperature_min: history
                .mean(Parameter::TemperatureMin)
                .unwrap_or(estimate.temperature_min),
            humidity: history
                .mean(Parameter::RelativeHumidity)
                .unwrap_or(estimate.humidity),
            wind_speed: history
                .mean(Parameter::WindSpeed)
                .unwrap_or(estimate.wind_speed),
            pressure: history
                .mean(Parameter::SurfacePressure)
                .map(|kpa| kpa * KPA_TO_HPA)
                .unwrap_or(estimate.pressure),
            rain_probability: match history.wet_day_probability {
                Some(p) => rain_weight * p + (1.0 - rain_weight) * seasonal_rain,
                None => seasonal_rain,
            },
        }
    }
}

/// Builds a prediction. Pure: the same inputs always give the same result.
///
/// `history` is `None` when the provider was unavailable, in which case every
/// value comes from the seasonal reference model.
pub fn blend(
    coordinate: Coordinate,
    date: NaiveDate,
    history: Option<&HistoricalStatistics>,
    thresholds: &ThresholdConfig,
    scorer: Option<&dyn Scorer>,
    history_rain_weight: f64,
) -> PredictionResult {
    let estimate = seasonal_estimate(date.month(), coordinate.latitude());
    let season = estimate.season;
    let (data_source, values) = match history {
        Some(h) => (
            DataSource::Historical,
            PointValues::historical(h, &estimate, history_rain_weight),
        ),
        None => (DataSource::SeasonalFallback, PointValues::seasonal(&estimate)),
    };

    let temperature_max = round1(values.temperature_max);
    let temperature_min = round1(values.temperature_min);
    let humidity = round1(values.humidity.clamp(0.0, 100.0));
    let wind_speed = round1(values.wind_speed.max(0.0));
    let rain_probability = round1(values.rain_probability.clamp(0.0, 100.0));
    let heat_index = round1(heat_index(temperature_max, humidity));
    let wind_chill = round1(wind_chill(temperature_min, wind_speed));

    let air_quality_index = scorer.and_then(|s| {
        let features = AqiFeatures {
            coordinate,
            wind_speed,
            season,
        };
        clamp_aqi(s.score(&features.to_vector()))
    });

    let conditions = Conditions {
        rain_probability,
        temperature_max,
        temperature_min,
        humidity,
        wind_speed,
        heat_index,
        wind_chill,
        air_quality_index: air_quality_index.map(f64::from),
        season,
    };

    PredictionResult {
        rain_probability,
        temperature: round1(values.temperature),
        temperature_max,
        temperature_min,
        humidity,
        wind_speed,
        pressure: round1(values.pressure),
        heat_index,
        wind_chill,
        air_quality_index,
        air_quality_category: air_quality_index.map(AqiCategory::from_index),
        season,
        data_source,
        location: coordinate,
        date,
        comments: advisory_comments(&conditions, thresholds),
        precautions: precaution_groups(&conditions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::scorer::LinearScorer;
    use crate::stats::window::date_for_cycle_day;
    use chrono::Duration;

    fn delhi() -> Coordinate {
        Coordinate::new(28.61, 77.21).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scorer() -> LinearScorer {
        LinearScorer::new(
            [20.0, 78.0, 3.0, 1.0],
            [8.0, 10.0, 1.5, 0.8],
            [4.0, -2.0, -18.0, 25.0],
            110.0,
        )
        .unwrap()
    }

    #[test]
    fn test_delhi_monsoon_fallback() {
        let result = blend(
            delhi(),
            date(2025, 8, 20),
            None,
            &ThresholdConfig::default(),
            None,
            0.7,
        );
        assert_eq!(result.data_source, DataSource::SeasonalFallback);
        assert_eq!(result.season, Season::Monsoon);
        assert!((25.0..=30.0).contains(&result.temperature));
        assert!((70.0..=95.0).contains(&result.humidity));
        assert_eq!(result.rain_probability, 80.0);
        assert_eq!(result.pressure, 1013.0);
        assert!(result.precautions.iter().any(|g| g.title == "Monsoon season"));
    }

    #[test]
    fn test_blend_is_idempotent() {
        let scorer = scorer();
        let run = || {
            blend(
                delhi(),
                date(2025, 5, 15),
                None,
                &ThresholdConfig::default(),
                Some(&scorer),
                0.7,
            )
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_missing_scorer_omits_air_quality_only() -> Result<(), serde_json::Error> {
        let result = blend(
            delhi(),
            date(2025, 1, 10),
            None,
            &ThresholdConfig::default(),
            None,
            0.7,
        );
        assert_eq!(result.air_quality_index, None);
        assert_eq!(result.air_quality_category, None);
        let json = serde_json::to_value(&result)?;
        assert!(json.get("air_quality_index").is_none());
        assert!(json.get("heat_index").is_some());
        assert_eq!(json["data_source"], "seasonal-fallback");
        assert_eq!(json["season"], "Winter");

        let scorer = scorer();
        let scored = blend(
            delhi(),
            date(2025, 1, 10),
            None,
            &ThresholdConfig::default(),
            Some(&scorer),
            0.7,
        );
        let aqi = scored.air_quality_index.unwrap();
        assert!(aqi <= 500);
        assert_eq!(scored.air_quality_category, Some(AqiCategory::from_index(aqi)));
        Ok(())
    }

    fn history_samples(tmax: f64, wet_days_per_year: usize) -> Vec<ClimateSample> {
        let mut samples = Vec::new();
        for year in 2015..2025 {
            let center = date_for_cycle_day(year, 185).unwrap();
            for (i, offset) in (-7..=7).enumerate() {
                let rain = if i < wet_days_per_year { 12.0 } else { 0.0 };
                samples.push(ClimateSample::from((
                    center + Duration::days(offset),
                    [
                        (Parameter::TemperatureMean, tmax - 6.0),
                        (Parameter::TemperatureMax, tmax),
                        (Parameter::TemperatureMin, tmax - 12.0),
                        (Parameter::Precipitation, rain),
                        (Parameter::RelativeHumidity, 55.0),
                        (Parameter::WindSpeed, 2.0),
                        (Parameter::SurfacePressure, 98.5),
                    ],
                )));
            }
        }
        samples
    }

    #[test]
    fn test_historical_values_and_rain_blend() {
        // 3 of 15 days wet each year: 20%.
        let samples = history_samples(38.0, 3);
        let history = HistoricalStatistics::from_samples(&samples, 185, 7, 1.0);
        assert_eq!(history.wet_day_probability, Some(20.0));

        let result = blend(
            delhi(),
            date(2025, 7, 4),
            Some(&history),
            &ThresholdConfig::default(),
            None,
            0.7,
        );
        assert_eq!(result.data_source, DataSource::Historical);
        assert_eq!(result.temperature_max, 38.0);
        assert_eq!(result.temperature, 32.0);
        assert_eq!(result.pressure, 985.0);
        // 0.7 * 20 + 0.3 * 80 (monsoon factor)
        assert_eq!(result.rain_probability, 38.0);
        assert!(result.heat_index > result.temperature_max);
        assert!(result.comments.iter().any(|c| c.starts_with("Very hot")));
        assert!(result.precautions.iter().any(|g| g.title == "Heat protection"));
    }

    #[test]
    fn test_missing_historical_field_falls_back_per_field() {
        let day = date(2024, 7, 4);
        let samples = vec![ClimateSample::from((day, [(Parameter::TemperatureMax, 33.0)]))];
        let history = HistoricalStatistics::from_samples(&samples, 185, 7, 1.0);
        let estimate = seasonal_estimate(7, 28.61);

        let result = blend(delhi(), day, Some(&history), &ThresholdConfig::default(), None, 0.7);
        assert_eq!(result.temperature_max, 33.0);
        assert_eq!(result.humidity, round1(estimate.humidity));
        // No precipitation recorded: seasonal factor alone.
        assert_eq!(result.rain_probability, 80.0);
    }
}
