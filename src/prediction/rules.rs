//! Advisory comments and precaution groups, expressed as tables of tagged
//! rules. Each rule is a condition plus its message; adding a rule means adding
//! a row.

use crate::seasonal::Season;
use crate::stats::threshold::ThresholdDirection;
use crate::validation::InvalidInput;
use serde::{Deserialize, Serialize};

/// Caller-tunable cutoffs for the advisory comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Maximum temperature at or above which it is "very hot" (°C).
    pub very_hot: f64,
    /// Minimum temperature at or below which it is "very cold" (°C).
    pub very_cold: f64,
    /// Wind speed at or above which it is "very windy" (m/s).
    pub very_windy: f64,
    /// Rain probability at or above which it is "very wet" (%).
    pub very_wet: f64,
    /// Heat index at or above which heat stress is flagged (°C).
    pub heat_index: f64,
    /// Wind chill at or below which cold stress is flagged (°C).
    pub wind_chill: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            very_hot: 35.0,
            very_cold: 5.0,
            very_windy: 10.0,
            very_wet: 60.0,
            heat_index: 40.0,
            wind_chill: 0.0,
        }
    }
}

impl ThresholdConfig {
    pub(crate) fn validate(&self) -> Result<(), InvalidInput> {
        let named = [
            ("very_hot", self.very_hot),
            ("very_cold", self.very_cold),
            ("very_windy", self.very_windy),
            ("very_wet", self.very_wet),
            ("heat_index", self.heat_index),
            ("wind_chill", self.wind_chill),
        ];
        match named.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, _)) => Err(InvalidInput::NonFiniteThreshold(name.to_string())),
            None => Ok(()),
        }
    }
}

/// The point values rules are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Conditions {
    pub rain_probability: f64,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub heat_index: f64,
    pub wind_chill: f64,
    pub air_quality_index: Option<f64>,
    pub season: Season,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    RainProbability,
    TemperatureMax,
    TemperatureMin,
    Humidity,
    WindSpeed,
    HeatIndex,
    WindChill,
    AirQualityIndex,
}

impl Field {
    fn value(&self, conditions: &Conditions) -> Option<f64> {
        match self {
            Field::RainProbability => Some(conditions.rain_probability),
            Field::TemperatureMax => Some(conditions.temperature_max),
            Field::TemperatureMin => Some(conditions.temperature_min),
            Field::Humidity => Some(conditions.humidity),
            Field::WindSpeed => Some(conditions.wind_speed),
            Field::HeatIndex => Some(conditions.heat_index),
            Field::WindChill => Some(conditions.wind_chill),
            Field::AirQualityIndex => conditions.air_quality_index,
        }
    }
}

pub(crate) enum RuleCondition {
    Compare {
        field: Field,
        direction: ThresholdDirection,
        threshold: f64,
    },
    Season(Season),
}

impl RuleCondition {
    /// A comparison against a field with no value never matches.
    fn matches(&self, conditions: &Conditions) -> bool {
        match self {
            RuleCondition::Compare {
                field,
                direction,
                threshold,
            } => field
                .value(conditions)
                .is_some_and(|v| direction.matches(v, *threshold)),
            RuleCondition::Season(season) => conditions.season == *season,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Limit {
    VeryHot,
    VeryCold,
    VeryWindy,
    VeryWet,
    HeatIndex,
    WindChill,
}

impl Limit {
    fn of(&self, thresholds: &ThresholdConfig) -> f64 {
        match self {
            Limit::VeryHot => thresholds.very_hot,
            Limit::VeryCold => thresholds.very_cold,
            Limit::VeryWindy => thresholds.very_windy,
            Limit::VeryWet => thresholds.very_wet,
            Limit::HeatIndex => thresholds.heat_index,
            Limit::WindChill => thresholds.wind_chill,
        }
    }
}

struct AdvisoryRule {
    field: Field,
    direction: ThresholdDirection,
    limit: Limit,
    /// `{value}` and `{threshold}` are substituted with one decimal.
    template: &'static str,
}

const ADVISORY_RULES: &[AdvisoryRule] = &[
    AdvisoryRule {
        field: Field::TemperatureMax,
        direction: ThresholdDirection::AtLeast,
        limit: Limit::VeryHot,
        template: "Very hot: maximum temperature of {value}°C reaches the {threshold}°C limit.",
    },
    AdvisoryRule {
        field: Field::TemperatureMin,
        direction: ThresholdDirection::AtMost,
        limit: Limit::VeryCold,
        template: "Very cold: minimum temperature of {value}°C is at or below {threshold}°C.",
    },
    AdvisoryRule {
        field: Field::WindSpeed,
        direction: ThresholdDirection::AtLeast,
        limit: Limit::VeryWindy,
        template: "Very windy: wind speed of {value} m/s reaches the {threshold} m/s limit.",
    },
    AdvisoryRule {
        field: Field::RainProbability,
        direction: ThresholdDirection::AtLeast,
        limit: Limit::VeryWet,
        template: "Very wet: {value}% chance of rain, at or above {threshold}%.",
    },
    AdvisoryRule {
        field: Field::HeatIndex,
        direction: ThresholdDirection::AtLeast,
        limit: Limit::HeatIndex,
        template: "Uncomfortable heat: it will feel like {value}°C (heat index limit {threshold}°C).",
    },
    AdvisoryRule {
        field: Field::WindChill,
        direction: ThresholdDirection::AtMost,
        limit: Limit::WindChill,
        template: "Biting cold: wind chill of {value}°C is at or below {threshold}°C.",
    },
];

pub(crate) const PLEASANT_COMMENT: &str =
    "Pleasant conditions: no configured weather threshold is expected to be crossed.";

fn render(template: &str, value: f64, threshold: f64) -> String {
    template
        .replace("{value}", &format!("{value:.1}"))
        .replace("{threshold}", &format!("{threshold:.1}"))
}

/// One comment per advisory rule that matches, or a single pleasant comment.
pub(crate) fn advisory_comments(conditions: &Conditions, thresholds: &ThresholdConfig) -> Vec<String> {
    let comments: Vec<String> = ADVISORY_RULES
        .iter()
        .filter_map(|rule| {
            let threshold = rule.limit.of(thresholds);
            let condition = RuleCondition::Compare {
                field: rule.field,
                direction: rule.direction,
                threshold,
            };
            if condition.matches(conditions) {
                rule.field
                    .value(conditions)
                    .map(|value| render(rule.template, value, threshold))
            } else {
                None
            }
        })
        .collect();
    if comments.is_empty() {
        vec![PLEASANT_COMMENT.to_string()]
    } else {
        comments
    }
}

/// A titled checklist of things to prepare for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrecautionGroup {
    pub title: String,
    pub items: Vec<String>,
}

struct PrecautionRule {
    condition: RuleCondition,
    title: &'static str,
    items: &'static [&'static str],
}

const PRECAUTION_RULES: &[PrecautionRule] = &[
    PrecautionRule {
        condition: RuleCondition::Compare {
            field: Field::RainProbability,
            direction: ThresholdDirection::AtLeast,
            threshold: 60.0,
        },
        title: "Rain gear",
        items: &[
            "Carry an umbrella or raincoat",
            "Wear waterproof footwear",
            "Allow extra travel time",
        ],
    },
    PrecautionRule {
        condition: RuleCondition::Compare {
            field: Field::TemperatureMax,
            direction: ThresholdDirection::AtLeast,
            threshold: 35.0,
        },
        title: "Heat protection",
        items: &[
            "Drink water regularly",
            "Use sunscreen and wear a hat",
            "Avoid strenuous activity around midday",
        ],
    },
    PrecautionRule {
        condition: RuleCondition::Compare {
            field: Field::TemperatureMin,
            direction: ThresholdDirection::AtMost,
            threshold: 5.0,
        },
        title: "Cold protection",
        items: &[
            "Dress in warm layers",
            "Cover head and hands",
            "Watch for icy surfaces",
        ],
    },
    PrecautionRule {
        condition: RuleCondition::Compare {
            field: Field::Humidity,
            direction: ThresholdDirection::AtLeast,
            threshold: 80.0,
        },
        title: "Humidity",
        items: &[
            "Wear light, breathable clothing",
            "Take breaks in shade or air conditioning",
        ],
    },
    PrecautionRule {
        condition: RuleCondition::Compare {
            field: Field::WindSpeed,
            direction: ThresholdDirection::AtLeast,
            threshold: 10.0,
        },
        title: "Strong wind",
        items: &[
            "Secure loose outdoor objects",
            "Take care near trees and scaffolding",
        ],
    },
    PrecautionRule {
        condition: RuleCondition::Compare {
            field: Field::AirQualityIndex,
            direction: ThresholdDirection::AtLeast,
            threshold: 150.0,
        },
        title: "Air quality",
        items: &[
            "Limit prolonged outdoor exertion",
            "Consider wearing a particulate mask",
            "Keep windows closed",
        ],
    },
    PrecautionRule {
        condition: RuleCondition::Season(Season::Monsoon),
        title: "Monsoon season",
        items: &[
            "Avoid waterlogged roads",
            "Keep insect repellent at hand",
            "Check local flood advisories",
        ],
    },
];

const PLEASANT_TITLE: &str = "Pleasant weather";
const PLEASANT_ITEMS: &[&str] = &[
    "Enjoy outdoor activities",
    "Stay hydrated",
];

/// One group per triggered precaution rule, or a single pleasant-weather group.
pub(crate) fn precaution_groups(conditions: &Conditions) -> Vec<PrecautionGroup> {
    let groups: Vec<PrecautionGroup> = PRECAUTION_RULES
        .iter()
        .filter(|rule| rule.condition.matches(conditions))
        .map(|rule| group(rule.title, rule.items))
        .collect();
    if groups.is_empty() {
        vec![group(PLEASANT_TITLE, PLEASANT_ITEMS)]
    } else {
        groups
    }
}

fn group(title: &str, items: &[&str]) -> PrecautionGroup {
    PrecautionGroup {
        title: title.to_string(),
        items: items.iter().map(|s| s.to_string()).collect(),
    }
}
