use crate::{EngineConfig, EngineError};
use oddsboard_core::{ProbabilityRequest, ProbabilityResponse};
use reqwest::blocking::Client;

/// Something that turns a hand/table/opponents request into a win
/// probability.
pub trait ProbabilityEngine {
    fn calculate(&self, request: &ProbabilityRequest) -> Result<f64, EngineError>;
}

impl<F> ProbabilityEngine for F
where
    F: Fn(&ProbabilityRequest) -> Result<f64, EngineError>,
{
    fn calculate(&self, request: &ProbabilityRequest) -> Result<f64, EngineError> {
        self(request)
    }
}

/// Engine reached over HTTP: POSTs the request as JSON and expects
/// `{"probability": <number>}` back.
#[derive(Debug, Clone)]
pub struct HttpEngine {
    client: Client,
    endpoint: String,
}

impl HttpEngine {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ProbabilityEngine for HttpEngine {
    fn calculate(&self, request: &ProbabilityRequest) -> Result<f64, EngineError> {
        let response = self.client.post(&self.endpoint).json(request).send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            let message = serde_json::from_str::<ProbabilityResponse>(&body)
                .ok()
                .and_then(|parsed| parsed.error)
                .unwrap_or(body);
            return Err(EngineError::Status {
                status: status.as_u16(),
                message,
            });
        }
        let parsed: ProbabilityResponse = serde_json::from_str(&body)?;
        Ok(parsed.into_probability()?)
    }
}
