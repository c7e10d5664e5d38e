use crate::core::MatchMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Query parameters for the recommendations endpoint.
///
/// `mode=all` (default) requires every constraint to hold; `mode=any`
/// returns listings satisfying at least one constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendQuery {
    #[serde(default)]
    pub mode: Option<MatchMode>,
}

/// Request to estimate a sale price from raw listing attributes. The
/// attribute map is forwarded to the prediction service as-is.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EstimateRequest {
    #[validate(length(min = 1))]
    pub attributes: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommend_query_mode_parses() {
        let q: RecommendQuery = serde_json::from_str(r#"{"mode": "any"}"#).unwrap();
        assert_eq!(q.mode, Some(MatchMode::Any));

        let q: RecommendQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.mode, None);
    }

    #[test]
    fn estimate_request_rejects_empty_attributes() {
        let req = EstimateRequest {
            attributes: HashMap::new(),
        };
        assert!(req.validate().is_err());
    }
}
