//! HouseLink Match - Preference-driven recommendation service for the
//! HouseLink real-estate marketplace
//!
//! This library compiles a client's sparse preference profile into typed
//! constraints and evaluates them against the pool of available listings.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{compile, evaluate, MatchMode, Matcher, Schema};
pub use models::{Listing, MatchRecord, PrefValue, PreferenceProfile, RecommendResponse, Vendor};
