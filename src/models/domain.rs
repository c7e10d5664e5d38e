use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Listing lifecycle status. Only `available` listings ever enter the
/// candidate pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "listing_status", rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Available,
    Sold,
    Rented,
}

/// A house listed for sale by a vendor.
///
/// The attribute vocabulary follows the `vendor_houses` table: a large fixed
/// set of structural, quality and location columns. Numeric columns are
/// `Option<f64>`, categorical columns `Option<String>`. `central_air` is a
/// string-encoded boolean as stored ("Y"/"N" and friends), not a real bool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub house_id: i64,
    pub vendor_id: i64,

    // Basic info
    pub title: String,
    pub description: Option<String>,
    pub sale_price: f64,
    pub status: ListingStatus,
    pub is_featured: bool,

    // Classification
    pub ms_sub_class: Option<f64>,
    pub ms_zoning: Option<String>,

    // Lot
    pub lot_frontage: Option<f64>,
    pub lot_area: Option<f64>,
    pub lot_shape: Option<String>,
    pub land_contour: Option<String>,
    pub lot_config: Option<String>,
    pub neighborhood: Option<String>,
    pub condition1: Option<String>,

    // Type and style
    pub bldg_type: Option<String>,
    pub house_style: Option<String>,

    // Quality and condition
    pub overall_qual: Option<f64>,
    pub overall_cond: Option<f64>,

    // Years
    pub year_built: Option<f64>,
    pub year_remod_add: Option<f64>,
    pub remod_age: Option<f64>,
    pub house_age: Option<f64>,

    // Roof
    pub roof_style: Option<String>,

    // Exterior
    pub exterior1st: Option<String>,
    pub exterior2nd: Option<String>,
    pub mas_vnr_type: Option<String>,
    pub mas_vnr_area: Option<f64>,
    pub exter_qual: Option<String>,
    pub exter_cond: Option<String>,

    // Foundation
    pub foundation: Option<String>,

    // Basement
    pub bsmt_qual: Option<String>,
    pub bsmt_cond: Option<String>,
    pub bsmt_exposure: Option<String>,
    pub bsmt_fin_type1: Option<String>,
    pub bsmt_fin_sf1: Option<f64>,
    pub bsmt_fin_type2: Option<String>,
    pub bsmt_fin_sf2: Option<f64>,
    pub bsmt_unf_sf: Option<f64>,
    pub total_bsmt_sf: Option<f64>,

    // AC/Heating/Electrical
    pub heating_qc: Option<String>,
    pub central_air: Option<String>,
    pub electrical: Option<String>,

    // Sizes and areas
    pub first_flr_sf: Option<f64>,
    pub second_flr_sf: Option<f64>,
    pub gr_liv_area: Option<f64>,
    pub total_sf: Option<f64>,

    // Bathrooms
    pub bsmt_full_bath: Option<f64>,
    pub bsmt_half_bath: Option<f64>,
    pub full_bath: Option<f64>,
    pub half_bath: Option<f64>,
    pub total_bath: Option<f64>,

    // Rooms
    pub bedroom_abv_gr: Option<f64>,
    pub kitchen_abv_gr: Option<f64>,
    pub kitchen_qual: Option<String>,
    pub tot_rms_abv_grd: Option<f64>,
    pub rooms_plus_bath_eq: Option<f64>,

    // Functionality
    pub functional: Option<String>,

    // Fireplaces
    pub fireplaces: Option<f64>,
    pub fireplace_qu: Option<String>,

    // Garage
    pub garage_type: Option<String>,
    pub garage_yr_blt: Option<f64>,
    pub garage_finish: Option<String>,
    pub garage_cars: Option<f64>,
    pub garage_area: Option<f64>,
    pub garage_qual: Option<String>,
    pub garage_cond: Option<String>,
    pub paved_drive: Option<String>,
    pub garage_score: Option<f64>,

    // Decks and porches
    pub wood_deck_sf: Option<f64>,
    pub open_porch_sf: Option<f64>,
    pub enclosed_porch: Option<f64>,
    pub three_ssn_porch: Option<f64>,
    pub screen_porch: Option<f64>,
    pub total_porch_sf: Option<f64>,

    // Pool
    pub pool_area: Option<f64>,
    pub pool_qc: Option<String>,

    // Fences/Misc
    pub fence: Option<String>,
    pub misc_feature: Option<String>,

    // Sale info
    pub mo_sold: Option<f64>,
    pub yr_sold: Option<f64>,
    pub sale_type: Option<String>,
    pub sale_condition: Option<String>,

    // Contact (display only, never matched on)
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

/// Public profile of a registered client. Credentials stay in the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Client {
    pub client_id: i64,
    pub username: String,
    pub email: String,
}

/// Public profile of a registered vendor.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vendor {
    pub vendor_id: i64,
    pub username: String,
    pub email: String,
}

/// One sparse preference value: a numeric bound, a string equality target, or
/// a boolean flag. Untagged so JSON payloads read naturally
/// (`{"min_sale_price": 200000, "preferred_neighborhood": "NridgHt",
/// "central_air_required": true}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

/// A partial update to a preference profile.
///
/// Keys absent from the map leave the stored field untouched; a key mapped to
/// `None` (JSON `null`) explicitly clears that field. The two are distinct on
/// purpose.
pub type FieldUpdates = BTreeMap<String, Option<PrefValue>>;

/// A client's stored preference profile: a sparse map from preference-field
/// name (`min_sale_price`, `preferred_neighborhood`, `central_air_required`,
/// ...) to its value. At most one profile exists per client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceProfile {
    pub client_id: i64,
    pub fields: BTreeMap<String, PrefValue>,
}

impl PreferenceProfile {
    pub fn new(client_id: i64) -> Self {
        Self {
            client_id,
            fields: BTreeMap::new(),
        }
    }

    /// Numeric value of a field, if set and numeric.
    pub fn number(&self, field: &str) -> Option<f64> {
        match self.fields.get(field) {
            Some(PrefValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// String value of a field, if set and non-empty.
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.fields.get(field) {
            Some(PrefValue::Text(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Boolean value of a field, if set.
    pub fn flag(&self, field: &str) -> Option<bool> {
        match self.fields.get(field) {
            Some(PrefValue::Flag(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Vendor payload attached to a match: the vendor's public profile with the
/// listing's own contact fields overlaid for display. The persisted vendor
/// row is never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorContact {
    pub vendor_id: i64,
    pub username: String,
    pub email: String,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

impl VendorContact {
    pub fn overlay(vendor: &Vendor, listing: &Listing) -> Self {
        Self {
            vendor_id: vendor.vendor_id,
            username: vendor.username.clone(),
            email: vendor.email.clone(),
            contact_phone: listing.contact_phone.clone(),
            contact_email: listing.contact_email.clone(),
        }
    }
}

/// One recommendation: a matching listing joined to its owning vendor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub house: Listing,
    pub vendor: VendorContact,
}
