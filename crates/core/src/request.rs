use crate::Card;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_OPPONENTS: u32 = 2;

/// Body posted to the probability engine. Empty slots are dropped; the
/// remaining cards keep their slot order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbabilityRequest {
    pub hand: Vec<Card>,
    pub table: Vec<Card>,
    pub num_opponents: u32,
}

impl ProbabilityRequest {
    pub fn from_slots(hand: &[Option<Card>], table: &[Option<Card>], num_opponents: u32) -> Self {
        Self {
            hand: hand.iter().flatten().copied().collect(),
            table: table.iter().flatten().copied().collect(),
            num_opponents,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProbabilityResponse {
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResponseError {
    #[error("engine reported: {0}")]
    Engine(String),
    #[error("response has no probability")]
    MissingProbability,
    #[error("probability {0} outside [0, 1]")]
    OutOfRange(f64),
}

impl ProbabilityResponse {
    pub fn into_probability(self) -> Result<f64, ResponseError> {
        match (self.probability, self.error) {
            (Some(value), _) if value.is_finite() && (0.0..=1.0).contains(&value) => Ok(value),
            (Some(value), _) => Err(ResponseError::OutOfRange(value)),
            (None, Some(message)) => Err(ResponseError::Engine(message)),
            (None, None) => Err(ResponseError::MissingProbability),
        }
    }
}
