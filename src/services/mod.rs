// Service exports
pub mod cache;
pub mod postgres;
pub mod predictor;

pub use cache::{CacheError, RecommendationCache};
pub use postgres::{PostgresClient, PostgresError};
pub use predictor::{PredictorError, PricePredictor};
