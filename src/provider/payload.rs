//! Decoding of the NASA POWER daily point JSON payload.
//!
//! ```json
//! {
//!   "header": { "fill_value": -999.0 },
//!   "properties": { "parameter": { "T2M": { "20240101": 14.2, "20240102": -999.0 } } }
//! }
//! ```

use crate::provider::error::ProviderError;
use crate::types::parameter::Parameter;
use crate::types::sample::ClimateSample;
use chrono::NaiveDate;
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;

pub(crate) const DEFAULT_FILL_VALUE: f64 = -999.0;
const DATE_KEY_FORMAT: &str = "%Y%m%d";

#[derive(Debug, Deserialize)]
struct PowerResponse {
    #[serde(default)]
    header: Option<PowerHeader>,
    properties: Option<PowerProperties>,
}

#[derive(Debug, Deserialize)]
struct PowerHeader {
    fill_value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: Option<BTreeMap<String, BTreeMap<String, Option<f64>>>>,
}

/// Converts a raw payload into chronologically ordered samples within `start..=end`.
///
/// Fill values and `null`s are dropped as missing observations. A date with
/// no remaining values for any parameter is a gap and yields no sample.
pub(crate) fn parse_samples(
    bytes: &[u8],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<ClimateSample>, ProviderError> {
    let response: PowerResponse = serde_json::from_slice(bytes)?;
    let fill_value = response
        .header
        .and_then(|h| h.fill_value)
        .unwrap_or(DEFAULT_FILL_VALUE);
    let series = response
        .properties
        .and_then(|p| p.parameter)
        .ok_or(ProviderError::MissingSection("properties.parameter"))?;

    let mut by_date: BTreeMap<NaiveDate, BTreeMap<Parameter, f64>> = BTreeMap::new();
    for (code, values) in series {
        let Some(parameter) = Parameter::from_code(&code) else {
            debug!("Ignoring unknown upstream parameter {}", code);
            continue;
        };
        for (key, value) in values {
            let date = NaiveDate::parse_from_str(&key, DATE_KEY_FORMAT)
                .map_err(|_| ProviderError::InvalidDateKey(key.clone()))?;
            if date < start || date > end {
                continue;
            }
            match value {
                Some(v) if v.is_finite() && (v - fill_value).abs() > f64::EPSILON => {
                    by_date.entry(date).or_default().insert(parameter, v);
                }
                _ => {}
            }
        }
    }

    Ok(by_date
        .into_iter()
        .map(|(date, values)| ClimateSample::new(date, values))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const FIXTURE: &str = r#"{
        "type": "Feature",
        "header": { "title": "NASA/POWER", "fill_value": -999.0 },
        "properties": {
            "parameter": {
                "T2M":         { "20240103": 11.5, "20240101": 10.2, "20240102": -999.0 },
                "PRECTOTCORR": { "20240101": 0.0,  "20240102": 3.4,   "20240103": null },
                "QV2M":        { "20240101": 7.1 }
            }
        }
    }"#;

    #[test]
    fn test_parses_and_orders_samples() -> Result<(), ProviderError> {
        let samples = parse_samples(FIXTURE.as_bytes(), date(2024, 1, 1), date(2024, 1, 3))?;
        let dates: Vec<_> = samples.iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);

        assert_eq!(samples[0].get(Parameter::TemperatureMean), Some(10.2));
        assert_eq!(samples[0].get(Parameter::Precipitation), Some(0.0));
        // Fill value is a missing observation, not -999.
        assert_eq!(samples[1].get(Parameter::TemperatureMean), None);
        assert_eq!(samples[1].get(Parameter::Precipitation), Some(3.4));
        // Null is missing too.
        assert_eq!(samples[2].get(Parameter::Precipitation), None);
        Ok(())
    }

    #[test]
    fn test_range_filter() -> Result<(), ProviderError> {
        let samples = parse_samples(FIXTURE.as_bytes(), date(2024, 1, 2), date(2024, 1, 2))?;
        assert_eq!(samples.len(), 1);
        Ok(())
    }

    #[test]
    fn test_all_missing_day_is_a_gap() -> Result<(), ProviderError> {
        let payload = r#"{"properties":{"parameter":{"T2M":{"20240101":-999,"20240102":4.0}}}}"#;
        let samples = parse_samples(payload.as_bytes(), date(2024, 1, 1), date(2024, 1, 2))?;
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].date, date(2024, 1, 2));
        Ok(())
    }

    #[test]
    fn test_custom_fill_value() -> Result<(), ProviderError> {
        let payload =
            r#"{"header":{"fill_value":-99.0},"properties":{"parameter":{"WS2M":{"20240101":-99.0,"20240102":-999.0}}}}"#;
        let samples = parse_samples(payload.as_bytes(), date(2024, 1, 1), date(2024, 1, 2))?;
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].get(Parameter::WindSpeed), Some(-999.0));
        Ok(())
    }

    #[test]
    fn test_missing_section_is_malformed() {
        let payload = r#"{"messages":["Invalid request"],"header":{}}"#;
        let result = parse_samples(payload.as_bytes(), date(2024, 1, 1), date(2024, 1, 2));
        assert!(matches!(result, Err(ProviderError::MissingSection(_))));
    }

    #[test]
    fn test_bad_date_key_and_bad_json() {
        let payload = r#"{"properties":{"parameter":{"T2M":{"2024-01-01":1.0}}}}"#;
        let result = parse_samples(payload.as_bytes(), date(2024, 1, 1), date(2024, 1, 2));
        assert!(matches!(result, Err(ProviderError::InvalidDateKey(_))));

        let result = parse_samples(b"<html>", date(2024, 1, 1), date(2024, 1, 2));
        assert!(matches!(result, Err(ProviderError::MalformedPayload(_))));
    }
}
