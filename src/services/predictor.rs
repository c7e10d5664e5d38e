use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the price-prediction service
#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Prediction service returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    price: f64,
}

/// Handle to the offline-trained price regressor, served over HTTP.
///
/// The model itself is a black box behind a `predict(attributes) -> price`
/// contract. The handle is constructed explicitly at startup and injected
/// into request handlers; there is no process-wide model state. `ready()`
/// probes the serving endpoint so startup can log whether predictions are
/// actually available.
pub struct PricePredictor {
    base_url: String,
    client: Client,
}

impl PricePredictor {
    pub fn new(base_url: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { base_url, client }
    }

    /// Probe the serving endpoint. `false` means the model is not loaded
    /// yet; estimate requests will fail until it is.
    pub async fn ready(&self) -> Result<bool, PredictorError> {
        let url = format!("{}/health", self.base_url.trim_end_matches('/'));
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }

    /// Predict a sale price from raw listing attributes.
    pub async fn predict(
        &self,
        attributes: &HashMap<String, serde_json::Value>,
    ) -> Result<f64, PredictorError> {
        let url = format!("{}/predict", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "attributes": attributes }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PredictorError::ApiError(format!(
                "prediction failed: {}",
                response.status()
            )));
        }

        let parsed: PredictResponse = response
            .json()
            .await
            .map_err(|e| PredictorError::InvalidResponse(e.to_string()))?;

        Ok(parsed.price)
    }
}
