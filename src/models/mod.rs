// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Client, FieldUpdates, Listing, ListingStatus, MatchRecord, PrefValue, PreferenceProfile,
    Vendor, VendorContact,
};
pub use requests::{EstimateRequest, RecommendQuery};
pub use responses::{
    ErrorResponse, EstimateResponse, HealthResponse, PreferencesResponse, RecommendResponse,
};
