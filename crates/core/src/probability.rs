use serde::{Deserialize, Serialize};
use std::fmt;

/// Display value of the last probability request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value")]
pub enum ProbabilityResult {
    #[default]
    None,
    Value(f64),
    Error,
}

impl ProbabilityResult {
    /// Accepts finite values in `[0, 1]`; anything else is an engine fault.
    pub fn from_probability(value: f64) -> Self {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            ProbabilityResult::Value(value)
        } else {
            ProbabilityResult::Error
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ProbabilityResult::None)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            ProbabilityResult::Value(value) => Some(*value),
            _ => None,
        }
    }

    /// `None` renders nothing, a value renders with two decimals.
    pub fn label(&self) -> Option<String> {
        match self {
            ProbabilityResult::None => None,
            ProbabilityResult::Value(value) => Some(format_probability(*value)),
            ProbabilityResult::Error => Some("Error".to_string()),
        }
    }
}

impl fmt::Display for ProbabilityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Some(label) => f.write_str(&label),
            None => f.write_str("-"),
        }
    }
}

pub fn format_probability(value: f64) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_two_decimals() {
        assert_eq!(format_probability(0.5), "0.50");
        assert_eq!(format_probability(1.0), "1.00");
        assert_eq!(format_probability(0.0), "0.00");
        assert_eq!(format_probability(0.3333), "0.33");
    }

    #[test]
    fn labels_each_state() {
        assert_eq!(ProbabilityResult::None.label(), None);
        assert_eq!(
            ProbabilityResult::Value(0.5).label().as_deref(),
            Some("0.50")
        );
        assert_eq!(ProbabilityResult::Error.label().as_deref(), Some("Error"));
        assert_eq!(ProbabilityResult::None.to_string(), "-");
    }

    #[test]
    fn out_of_range_values_become_errors() {
        assert_eq!(
            ProbabilityResult::from_probability(0.0),
            ProbabilityResult::Value(0.0)
        );
        assert_eq!(
            ProbabilityResult::from_probability(1.2),
            ProbabilityResult::Error
        );
        assert_eq!(
            ProbabilityResult::from_probability(-0.1),
            ProbabilityResult::Error
        );
        assert_eq!(
            ProbabilityResult::from_probability(f64::NAN),
            ProbabilityResult::Error
        );
    }
}
