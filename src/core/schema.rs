use crate::models::Listing;
use std::collections::HashMap;
use thiserror::Error;

/// String values accepted as "true" for string-encoded boolean listing
/// columns such as `central_air` (a VARCHAR in the schema, not a bool).
pub const TRUTHY_STRINGS: &[&str] = &["Y", "Yes", "1", "True", "T", "SI", "SÍ", "ON"];

/// Errors raised while building the attribute schema. These are
/// configuration errors: the service refuses to start on any of them.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("attribute `{attribute}` is declared {kind:?} but the listing column is not {expected}")]
    KindMismatch {
        attribute: &'static str,
        kind: FieldKind,
        expected: &'static str,
    },

    #[error("preference field `{0}` is derived by more than one descriptor")]
    DuplicateField(String),
}

/// Every listing column a preference may constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingField {
    // Numeric columns
    SalePrice,
    OverallQual,
    OverallCond,
    YearBuilt,
    YearRemodAdd,
    RemodAge,
    HouseAge,
    LotArea,
    LotFrontage,
    FirstFlrSf,
    SecondFlrSf,
    GrLivArea,
    TotalBsmtSf,
    TotalSf,
    BedroomAbvGr,
    KitchenAbvGr,
    TotRmsAbvGrd,
    FullBath,
    HalfBath,
    BsmtFullBath,
    BsmtHalfBath,
    TotalBath,
    BsmtFinSf1,
    BsmtFinSf2,
    BsmtUnfSf,
    Fireplaces,
    GarageYrBlt,
    GarageCars,
    GarageArea,
    GarageScore,
    WoodDeckSf,
    OpenPorchSf,
    EnclosedPorch,
    ThreeSsnPorch,
    ScreenPorch,
    TotalPorchSf,
    RoomsPlusBathEq,
    PoolArea,

    // Categorical string columns
    Neighborhood,
    MsZoning,
    LotShape,
    LandContour,
    LotConfig,
    Condition1,
    BldgType,
    HouseStyle,
    RoofStyle,
    Exterior1st,
    Exterior2nd,
    Foundation,
    BsmtQual,
    BsmtCond,
    BsmtExposure,
    BsmtFinType1,
    BsmtFinType2,
    HeatingQc,
    Electrical,
    Functional,
    FireplaceQu,
    GarageType,
    GarageFinish,
    GarageQual,
    GarageCond,
    PavedDrive,
    PoolQc,
    Fence,
    MiscFeature,
    SaleType,
    SaleCondition,
    CentralAir,
}

impl ListingField {
    /// Whether the underlying listing column is numeric.
    pub fn is_numeric(self) -> bool {
        use ListingField::*;
        matches!(
            self,
            SalePrice
                | OverallQual
                | OverallCond
                | YearBuilt
                | YearRemodAdd
                | RemodAge
                | HouseAge
                | LotArea
                | LotFrontage
                | FirstFlrSf
                | SecondFlrSf
                | GrLivArea
                | TotalBsmtSf
                | TotalSf
                | BedroomAbvGr
                | KitchenAbvGr
                | TotRmsAbvGrd
                | FullBath
                | HalfBath
                | BsmtFullBath
                | BsmtHalfBath
                | TotalBath
                | BsmtFinSf1
                | BsmtFinSf2
                | BsmtUnfSf
                | Fireplaces
                | GarageYrBlt
                | GarageCars
                | GarageArea
                | GarageScore
                | WoodDeckSf
                | OpenPorchSf
                | EnclosedPorch
                | ThreeSsnPorch
                | ScreenPorch
                | TotalPorchSf
                | RoomsPlusBathEq
                | PoolArea
        )
    }
}

impl Listing {
    /// Numeric value of a listing column. `None` for string columns or when
    /// the column is unset, so a missing value simply fails the constraint.
    pub fn numeric(&self, field: ListingField) -> Option<f64> {
        use ListingField::*;
        match field {
            SalePrice => Some(self.sale_price),
            OverallQual => self.overall_qual,
            OverallCond => self.overall_cond,
            YearBuilt => self.year_built,
            YearRemodAdd => self.year_remod_add,
            RemodAge => self.remod_age,
            HouseAge => self.house_age,
            LotArea => self.lot_area,
            LotFrontage => self.lot_frontage,
            FirstFlrSf => self.first_flr_sf,
            SecondFlrSf => self.second_flr_sf,
            GrLivArea => self.gr_liv_area,
            TotalBsmtSf => self.total_bsmt_sf,
            TotalSf => self.total_sf,
            BedroomAbvGr => self.bedroom_abv_gr,
            KitchenAbvGr => self.kitchen_abv_gr,
            TotRmsAbvGrd => self.tot_rms_abv_grd,
            FullBath => self.full_bath,
            HalfBath => self.half_bath,
            BsmtFullBath => self.bsmt_full_bath,
            BsmtHalfBath => self.bsmt_half_bath,
            TotalBath => self.total_bath,
            BsmtFinSf1 => self.bsmt_fin_sf1,
            BsmtFinSf2 => self.bsmt_fin_sf2,
            BsmtUnfSf => self.bsmt_unf_sf,
            Fireplaces => self.fireplaces,
            GarageYrBlt => self.garage_yr_blt,
            GarageCars => self.garage_cars,
            GarageArea => self.garage_area,
            GarageScore => self.garage_score,
            WoodDeckSf => self.wood_deck_sf,
            OpenPorchSf => self.open_porch_sf,
            EnclosedPorch => self.enclosed_porch,
            ThreeSsnPorch => self.three_ssn_porch,
            ScreenPorch => self.screen_porch,
            TotalPorchSf => self.total_porch_sf,
            RoomsPlusBathEq => self.rooms_plus_bath_eq,
            PoolArea => self.pool_area,
            _ => None,
        }
    }

    /// String value of a listing column. `None` for numeric columns or when
    /// the column is unset.
    pub fn text(&self, field: ListingField) -> Option<&str> {
        use ListingField::*;
        match field {
            Neighborhood => self.neighborhood.as_deref(),
            MsZoning => self.ms_zoning.as_deref(),
            LotShape => self.lot_shape.as_deref(),
            LandContour => self.land_contour.as_deref(),
            LotConfig => self.lot_config.as_deref(),
            Condition1 => self.condition1.as_deref(),
            BldgType => self.bldg_type.as_deref(),
            HouseStyle => self.house_style.as_deref(),
            RoofStyle => self.roof_style.as_deref(),
            Exterior1st => self.exterior1st.as_deref(),
            Exterior2nd => self.exterior2nd.as_deref(),
            Foundation => self.foundation.as_deref(),
            BsmtQual => self.bsmt_qual.as_deref(),
            BsmtCond => self.bsmt_cond.as_deref(),
            BsmtExposure => self.bsmt_exposure.as_deref(),
            BsmtFinType1 => self.bsmt_fin_type1.as_deref(),
            BsmtFinType2 => self.bsmt_fin_type2.as_deref(),
            HeatingQc => self.heating_qc.as_deref(),
            Electrical => self.electrical.as_deref(),
            Functional => self.functional.as_deref(),
            FireplaceQu => self.fireplace_qu.as_deref(),
            GarageType => self.garage_type.as_deref(),
            GarageFinish => self.garage_finish.as_deref(),
            GarageQual => self.garage_qual.as_deref(),
            GarageCond => self.garage_cond.as_deref(),
            PavedDrive => self.paved_drive.as_deref(),
            PoolQc => self.pool_qc.as_deref(),
            Fence => self.fence.as_deref(),
            MiscFeature => self.misc_feature.as_deref(),
            SaleType => self.sale_type.as_deref(),
            SaleCondition => self.sale_condition.as_deref(),
            CentralAir => self.central_air.as_deref(),
            _ => None,
        }
    }
}

/// Kind of constraint a preference field compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `min_<attr>` / `max_<attr>` pair over a numeric column.
    Range,
    /// `preferred_<attr>` exact match over a string column.
    Equality,
    /// `<attr>_required` boolean over a string-encoded boolean column.
    Flag,
}

/// One attribute descriptor: the preference-field naming stem, the listing
/// column it constrains, and the constraint kind.
#[derive(Debug)]
pub struct Descriptor {
    pub attribute: &'static str,
    pub field: ListingField,
    pub kind: FieldKind,
}

impl Descriptor {
    /// Preference-field names this descriptor answers to.
    pub fn field_names(&self) -> Vec<(String, Slot)> {
        match self.kind {
            FieldKind::Range => vec![
                (format!("min_{}", self.attribute), Slot::Min),
                (format!("max_{}", self.attribute), Slot::Max),
            ],
            FieldKind::Equality => vec![(format!("preferred_{}", self.attribute), Slot::Equals)],
            FieldKind::Flag => vec![(format!("{}_required", self.attribute), Slot::Required)],
        }
    }
}

/// Which side of a descriptor a preference field feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Min,
    Max,
    Equals,
    Required,
}

/// The exhaustive descriptor table, in declaration order. Constraint
/// compilation walks this table top to bottom, so the order here is the
/// order constraints appear in diagnostics and fixtures.
static DESCRIPTORS: &[Descriptor] = &[
    // Price
    Descriptor { attribute: "sale_price", field: ListingField::SalePrice, kind: FieldKind::Range },
    // Location and lot
    Descriptor { attribute: "neighborhood", field: ListingField::Neighborhood, kind: FieldKind::Equality },
    Descriptor { attribute: "ms_zoning", field: ListingField::MsZoning, kind: FieldKind::Equality },
    Descriptor { attribute: "lot_shape", field: ListingField::LotShape, kind: FieldKind::Equality },
    Descriptor { attribute: "land_contour", field: ListingField::LandContour, kind: FieldKind::Equality },
    Descriptor { attribute: "lot_config", field: ListingField::LotConfig, kind: FieldKind::Equality },
    Descriptor { attribute: "condition1", field: ListingField::Condition1, kind: FieldKind::Equality },
    Descriptor { attribute: "lot_area", field: ListingField::LotArea, kind: FieldKind::Range },
    Descriptor { attribute: "lot_frontage", field: ListingField::LotFrontage, kind: FieldKind::Range },
    // Type and style
    Descriptor { attribute: "bldg_type", field: ListingField::BldgType, kind: FieldKind::Equality },
    Descriptor { attribute: "house_style", field: ListingField::HouseStyle, kind: FieldKind::Equality },
    Descriptor { attribute: "roof_style", field: ListingField::RoofStyle, kind: FieldKind::Equality },
    Descriptor { attribute: "exterior1st", field: ListingField::Exterior1st, kind: FieldKind::Equality },
    Descriptor { attribute: "exterior2nd", field: ListingField::Exterior2nd, kind: FieldKind::Equality },
    Descriptor { attribute: "foundation", field: ListingField::Foundation, kind: FieldKind::Equality },
    // Quality and condition
    Descriptor { attribute: "overall_qual", field: ListingField::OverallQual, kind: FieldKind::Range },
    Descriptor { attribute: "overall_cond", field: ListingField::OverallCond, kind: FieldKind::Range },
    // Years
    Descriptor { attribute: "year_built", field: ListingField::YearBuilt, kind: FieldKind::Range },
    Descriptor { attribute: "year_remod_add", field: ListingField::YearRemodAdd, kind: FieldKind::Range },
    Descriptor { attribute: "remod_age", field: ListingField::RemodAge, kind: FieldKind::Range },
    Descriptor { attribute: "house_age", field: ListingField::HouseAge, kind: FieldKind::Range },
    // Sizes and areas
    Descriptor { attribute: "first_flr_sf", field: ListingField::FirstFlrSf, kind: FieldKind::Range },
    Descriptor { attribute: "second_flr_sf", field: ListingField::SecondFlrSf, kind: FieldKind::Range },
    Descriptor { attribute: "gr_liv_area", field: ListingField::GrLivArea, kind: FieldKind::Range },
    Descriptor { attribute: "total_bsmt_sf", field: ListingField::TotalBsmtSf, kind: FieldKind::Range },
    Descriptor { attribute: "total_sf", field: ListingField::TotalSf, kind: FieldKind::Range },
    // Rooms and bathrooms
    Descriptor { attribute: "bedroom_abv_gr", field: ListingField::BedroomAbvGr, kind: FieldKind::Range },
    Descriptor { attribute: "kitchen_abv_gr", field: ListingField::KitchenAbvGr, kind: FieldKind::Range },
    Descriptor { attribute: "tot_rms_abv_grd", field: ListingField::TotRmsAbvGrd, kind: FieldKind::Range },
    Descriptor { attribute: "full_bath", field: ListingField::FullBath, kind: FieldKind::Range },
    Descriptor { attribute: "half_bath", field: ListingField::HalfBath, kind: FieldKind::Range },
    Descriptor { attribute: "bsmt_full_bath", field: ListingField::BsmtFullBath, kind: FieldKind::Range },
    Descriptor { attribute: "bsmt_half_bath", field: ListingField::BsmtHalfBath, kind: FieldKind::Range },
    Descriptor { attribute: "total_bath", field: ListingField::TotalBath, kind: FieldKind::Range },
    Descriptor { attribute: "rooms_plus_bath_eq", field: ListingField::RoomsPlusBathEq, kind: FieldKind::Range },
    // Basement
    Descriptor { attribute: "bsmt_qual", field: ListingField::BsmtQual, kind: FieldKind::Equality },
    Descriptor { attribute: "bsmt_cond", field: ListingField::BsmtCond, kind: FieldKind::Equality },
    Descriptor { attribute: "bsmt_exposure", field: ListingField::BsmtExposure, kind: FieldKind::Equality },
    Descriptor { attribute: "bsmt_fin_type1", field: ListingField::BsmtFinType1, kind: FieldKind::Equality },
    Descriptor { attribute: "bsmt_fin_type2", field: ListingField::BsmtFinType2, kind: FieldKind::Equality },
    Descriptor { attribute: "bsmt_fin_sf1", field: ListingField::BsmtFinSf1, kind: FieldKind::Range },
    Descriptor { attribute: "bsmt_fin_sf2", field: ListingField::BsmtFinSf2, kind: FieldKind::Range },
    Descriptor { attribute: "bsmt_unf_sf", field: ListingField::BsmtUnfSf, kind: FieldKind::Range },
    // AC/Heating/Electrical
    Descriptor { attribute: "heating_qc", field: ListingField::HeatingQc, kind: FieldKind::Equality },
    Descriptor { attribute: "central_air", field: ListingField::CentralAir, kind: FieldKind::Flag },
    Descriptor { attribute: "electrical", field: ListingField::Electrical, kind: FieldKind::Equality },
    // Functionality
    Descriptor { attribute: "functional", field: ListingField::Functional, kind: FieldKind::Equality },
    // Fireplaces
    Descriptor { attribute: "fireplaces", field: ListingField::Fireplaces, kind: FieldKind::Range },
    Descriptor { attribute: "fireplace_qu", field: ListingField::FireplaceQu, kind: FieldKind::Equality },
    // Garage
    Descriptor { attribute: "garage_type", field: ListingField::GarageType, kind: FieldKind::Equality },
    Descriptor { attribute: "garage_yr_blt", field: ListingField::GarageYrBlt, kind: FieldKind::Range },
    Descriptor { attribute: "garage_finish", field: ListingField::GarageFinish, kind: FieldKind::Equality },
    Descriptor { attribute: "garage_cars", field: ListingField::GarageCars, kind: FieldKind::Range },
    Descriptor { attribute: "garage_area", field: ListingField::GarageArea, kind: FieldKind::Range },
    Descriptor { attribute: "garage_qual", field: ListingField::GarageQual, kind: FieldKind::Equality },
    Descriptor { attribute: "garage_cond", field: ListingField::GarageCond, kind: FieldKind::Equality },
    Descriptor { attribute: "paved_drive", field: ListingField::PavedDrive, kind: FieldKind::Equality },
    Descriptor { attribute: "garage_score", field: ListingField::GarageScore, kind: FieldKind::Range },
    // Decks and porches
    Descriptor { attribute: "wood_deck_sf", field: ListingField::WoodDeckSf, kind: FieldKind::Range },
    Descriptor { attribute: "open_porch_sf", field: ListingField::OpenPorchSf, kind: FieldKind::Range },
    Descriptor { attribute: "enclosed_porch", field: ListingField::EnclosedPorch, kind: FieldKind::Range },
    Descriptor { attribute: "three_ssn_porch", field: ListingField::ThreeSsnPorch, kind: FieldKind::Range },
    Descriptor { attribute: "screen_porch", field: ListingField::ScreenPorch, kind: FieldKind::Range },
    Descriptor { attribute: "total_porch_sf", field: ListingField::TotalPorchSf, kind: FieldKind::Range },
    // Pool
    Descriptor { attribute: "pool_area", field: ListingField::PoolArea, kind: FieldKind::Range },
    Descriptor { attribute: "pool_qc", field: ListingField::PoolQc, kind: FieldKind::Equality },
    // Fences/Misc
    Descriptor { attribute: "fence", field: ListingField::Fence, kind: FieldKind::Equality },
    Descriptor { attribute: "misc_feature", field: ListingField::MiscFeature, kind: FieldKind::Equality },
    // Sale info
    Descriptor { attribute: "sale_type", field: ListingField::SaleType, kind: FieldKind::Equality },
    Descriptor { attribute: "sale_condition", field: ListingField::SaleCondition, kind: FieldKind::Equality },
];

/// Resolution of a preference-field name to its descriptor.
#[derive(Debug, Clone, Copy)]
pub struct Binding {
    pub descriptor: &'static Descriptor,
    pub slot: Slot,
}

/// The validated attribute schema: the static descriptor table plus a lookup
/// from derived preference-field names.
///
/// Built once at startup via [`Schema::load`], which fails fast if any
/// descriptor points at a listing column of the wrong type or two
/// descriptors derive the same field name.
#[derive(Debug)]
pub struct Schema {
    lookup: HashMap<String, Binding>,
}

impl Schema {
    pub fn load() -> Result<Self, SchemaError> {
        let mut lookup = HashMap::new();

        for descriptor in DESCRIPTORS {
            match descriptor.kind {
                FieldKind::Range if !descriptor.field.is_numeric() => {
                    return Err(SchemaError::KindMismatch {
                        attribute: descriptor.attribute,
                        kind: descriptor.kind,
                        expected: "numeric",
                    });
                }
                FieldKind::Equality | FieldKind::Flag if descriptor.field.is_numeric() => {
                    return Err(SchemaError::KindMismatch {
                        attribute: descriptor.attribute,
                        kind: descriptor.kind,
                        expected: "a string column",
                    });
                }
                _ => {}
            }

            for (name, slot) in descriptor.field_names() {
                if lookup
                    .insert(name.clone(), Binding { descriptor, slot })
                    .is_some()
                {
                    return Err(SchemaError::DuplicateField(name));
                }
            }
        }

        Ok(Self { lookup })
    }

    /// All descriptors in declaration order.
    pub fn descriptors(&self) -> &'static [Descriptor] {
        DESCRIPTORS
    }

    /// Resolve a preference-field name (`min_sale_price`,
    /// `preferred_neighborhood`, `central_air_required`, ...). `None` means
    /// the name matches no descriptor and the field is ignored.
    pub fn resolve(&self, field_name: &str) -> Option<Binding> {
        self.lookup.get(field_name).copied()
    }
}
