use crate::models::domain::{Client, MatchRecord, PrefValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response for the recommendations endpoint.
///
/// `client` is present whenever the client exists; `preferences_applied` is
/// null (and `matches` empty) when the client has no stored profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub client: Option<Client>,
    pub matches: Vec<MatchRecord>,
    #[serde(rename = "preferencesApplied")]
    pub preferences_applied: Option<BTreeMap<String, PrefValue>>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Response after upserting a preference profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesResponse {
    #[serde(rename = "clientId")]
    pub client_id: i64,
    pub fields: BTreeMap<String, PrefValue>,
}

/// Response for the price estimate endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateResponse {
    #[serde(rename = "predictedPrice")]
    pub predicted_price: f64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
