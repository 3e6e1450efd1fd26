//! Bodyweight-aware weight resolution, formatting and input parsing.
//!
//! A set only ever stores the weight the user *added*. For bodyweight
//! exercises the weight actually moved is the user's bodyweight plus that
//! added weight, and it is derived on demand from the current bodyweight
//! setting rather than stored.

use crate::{Error, Workout};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const MIN_WEIGHT_KG: f64 = 0.0;
pub const MAX_WEIGHT_KG: f64 = 9999.0;

pub const DEFAULT_BODYWEIGHT_KG: f64 = 75.0;
pub const MIN_BODYWEIGHT_KG: f64 = 30.0;
pub const MAX_BODYWEIGHT_KG: f64 = 999.0;

/// How a set's weight is rendered
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeightDisplay {
    /// `BW+10kg`
    #[default]
    Compact,
    /// `BW+10kg (85kg)`
    Detailed,
    /// `85kg`
    TotalOnly,
}

impl WeightDisplay {
    /// Name accepted by [`FromStr`]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Detailed => "detailed",
            Self::TotalOnly => "total-only",
        }
    }
}

impl FromStr for WeightDisplay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "compact" => Ok(Self::Compact),
            "detailed" => Ok(Self::Detailed),
            "total_only" | "total" => Ok(Self::TotalOnly),
            other => Err(Error::InvalidArgument(format!(
                "unknown weight display '{}' (expected compact, detailed or total-only)",
                other
            ))),
        }
    }
}

/// Weight actually moved for a set
pub fn effective_weight(weight_kg: f64, is_bodyweight: bool, bodyweight_kg: f64) -> f64 {
    if is_bodyweight {
        bodyweight_kg + weight_kg
    } else {
        weight_kg
    }
}

/// Render a weight without a unit
///
/// Whole numbers have no decimals; anything else keeps at most three
/// decimals with trailing zeros and the point stripped.
pub fn format_weight(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 {
        return format!("{:.0}", value);
    }

    let fixed = format!("{:.3}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Render a set's weight for display
pub fn display_weight(
    weight_kg: f64,
    is_bodyweight: bool,
    bodyweight_kg: f64,
    mode: WeightDisplay,
) -> String {
    if !is_bodyweight {
        return format!("{}kg", format_weight(weight_kg));
    }

    let total = format_weight(effective_weight(weight_kg, true, bodyweight_kg));
    let added = if weight_kg == 0.0 {
        "BW".to_string()
    } else {
        format!("BW+{}kg", format_weight(weight_kg))
    };

    match mode {
        WeightDisplay::Compact => added,
        WeightDisplay::Detailed => format!("{} ({}kg)", added, total),
        WeightDisplay::TotalOnly => format!("{}kg", total),
    }
}

/// Parse free-form weight input, tolerating partial typing
///
/// Recovery order: direct parse, then without leading zeros, then with
/// every non-digit removed. Anything unparseable is 0. The result is always
/// within [`MIN_WEIGHT_KG`, `MAX_WEIGHT_KG`].
pub fn parse_weight_input(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "." {
        return 0.0;
    }

    let mut normalized = trimmed.to_string();
    if normalized.starts_with('.') {
        normalized.insert(0, '0');
    }
    if normalized.ends_with('.') {
        normalized.pop();
    }

    let value = parse_finite(&normalized)
        .or_else(|| parse_finite(normalized.trim_start_matches('0')))
        .or_else(|| {
            let digits: String = normalized.chars().filter(|c| c.is_ascii_digit()).collect();
            parse_finite(&digits)
        })
        .unwrap_or_else(|| {
            tracing::debug!("Unparseable weight input {:?}, using 0", input);
            0.0
        });

    value.clamp(MIN_WEIGHT_KG, MAX_WEIGHT_KG)
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn clamp_bodyweight(kg: f64) -> f64 {
    if !kg.is_finite() {
        return DEFAULT_BODYWEIGHT_KG;
    }
    kg.clamp(MIN_BODYWEIGHT_KG, MAX_BODYWEIGHT_KG)
}

/// Volume over completed sets using the effective (bodyweight-inclusive) weight
pub fn effective_volume(workout: &Workout, bodyweight_kg: f64) -> f64 {
    workout
        .exercises
        .iter()
        .flat_map(|e| {
            e.sets.iter().filter(|s| s.completed).map(move |s| {
                s.reps as f64 * effective_weight(s.weight_kg, e.exercise.is_bodyweight, bodyweight_kg)
            })
        })
        .sum()
}
