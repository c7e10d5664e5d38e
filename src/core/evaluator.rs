use crate::core::constraint::Constraint;
use crate::models::{Listing, ListingStatus};
use serde::{Deserialize, Serialize};

/// Caller-selected matching policy: must a listing satisfy every constraint
/// (`All`, precision-oriented, the default) or at least one (`Any`, broad
/// discovery)?
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    All,
    Any,
}

/// Whether a single listing satisfies a single constraint.
///
/// A missing or non-numeric column value fails the constraint rather than
/// erroring: one malformed row only excludes itself, never the whole run.
#[inline]
pub fn satisfies(listing: &Listing, constraint: &Constraint) -> bool {
    match constraint {
        Constraint::Range { field, min, max } => match listing.numeric(*field) {
            Some(value) => {
                min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
            }
            None => false,
        },
        Constraint::Equality { field, value } => match listing.text(*field) {
            Some(stored) => !stored.is_empty() && stored == value,
            None => false,
        },
        Constraint::Truthy { field, accepted } => match listing.text(*field) {
            Some(stored) => accepted.contains(&stored),
            None => false,
        },
    }
}

/// Apply a constraint set to the candidate pool under the given mode.
///
/// Non-available listings are dropped unconditionally. An empty constraint
/// set passes every available candidate: an unconstrained profile matches
/// the whole pool by design.
pub fn evaluate(
    candidates: Vec<Listing>,
    constraints: &[Constraint],
    mode: MatchMode,
) -> Vec<Listing> {
    candidates
        .into_iter()
        .filter(|listing| listing.status == ListingStatus::Available)
        .filter(|listing| {
            if constraints.is_empty() {
                return true;
            }
            match mode {
                MatchMode::All => constraints.iter().all(|c| satisfies(listing, c)),
                MatchMode::Any => constraints.iter().any(|c| satisfies(listing, c)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{ListingField, TRUTHY_STRINGS};

    fn priced(house_id: i64, sale_price: f64) -> Listing {
        Listing {
            house_id,
            vendor_id: 1,
            title: format!("House {}", house_id),
            sale_price,
            ..Default::default()
        }
    }

    fn price_range(min: Option<f64>, max: Option<f64>) -> Constraint {
        Constraint::Range {
            field: ListingField::SalePrice,
            min,
            max,
        }
    }

    #[test]
    fn non_available_listings_never_pass() {
        let mut sold = priced(1, 250000.0);
        sold.status = ListingStatus::Sold;
        let mut rented = priced(2, 250000.0);
        rented.status = ListingStatus::Rented;
        let available = priced(3, 250000.0);

        let passed = evaluate(vec![sold, rented, available], &[], MatchMode::All);
        assert_eq!(passed.len(), 1);
        assert_eq!(passed[0].house_id, 3);
    }

    #[test]
    fn empty_constraint_set_is_identity_on_available_pool() {
        let candidates = vec![priced(1, 100.0), priced(2, 200.0), priced(3, 300.0)];

        let all = evaluate(candidates.clone(), &[], MatchMode::All);
        assert_eq!(all.len(), 3);

        // The rule holds under Any as well.
        let any = evaluate(candidates, &[], MatchMode::Any);
        assert_eq!(any.len(), 3);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let constraint = price_range(Some(200000.0), Some(300000.0));

        assert!(satisfies(&priced(1, 200000.0), &constraint));
        assert!(satisfies(&priced(2, 300000.0), &constraint));
        assert!(!satisfies(&priced(3, 199999.99), &constraint));
        assert!(!satisfies(&priced(4, 300000.01), &constraint));
    }

    #[test]
    fn half_open_ranges() {
        let lower_only = price_range(Some(200000.0), None);
        assert!(satisfies(&priced(1, 1e9), &lower_only));
        assert!(!satisfies(&priced(2, 100.0), &lower_only));

        let upper_only = price_range(None, Some(300000.0));
        assert!(satisfies(&priced(3, 100.0), &upper_only));
        assert!(!satisfies(&priced(4, 1e9), &upper_only));
    }

    #[test]
    fn missing_numeric_value_fails_the_constraint() {
        let constraint = Constraint::Range {
            field: ListingField::LotArea,
            min: Some(1000.0),
            max: None,
        };
        // lot_area unset: the listing is excluded, not an error.
        assert!(!satisfies(&priced(1, 250000.0), &constraint));
    }

    #[test]
    fn equality_is_exact_and_case_sensitive() {
        let constraint = Constraint::Equality {
            field: ListingField::Neighborhood,
            value: "NridgHt".to_string(),
        };

        let mut listing = priced(1, 250000.0);
        listing.neighborhood = Some("NridgHt".to_string());
        assert!(satisfies(&listing, &constraint));

        listing.neighborhood = Some("nridght".to_string());
        assert!(!satisfies(&listing, &constraint));

        listing.neighborhood = Some(String::new());
        assert!(!satisfies(&listing, &constraint));

        listing.neighborhood = None;
        assert!(!satisfies(&listing, &constraint));
    }

    #[test]
    fn truthy_set_membership() {
        let constraint = Constraint::Truthy {
            field: ListingField::CentralAir,
            accepted: TRUTHY_STRINGS,
        };

        for value in ["Y", "Yes", "1", "True", "T", "SI", "SÍ", "ON"] {
            let mut listing = priced(1, 250000.0);
            listing.central_air = Some(value.to_string());
            assert!(satisfies(&listing, &constraint), "{} should pass", value);
        }

        let mut listing = priced(2, 250000.0);
        listing.central_air = Some("N".to_string());
        assert!(!satisfies(&listing, &constraint));

        listing.central_air = None;
        assert!(!satisfies(&listing, &constraint));
    }

    #[test]
    fn conjunction_and_disjunction_laws() {
        let constraints = vec![
            price_range(Some(200000.0), Some(300000.0)),
            Constraint::Equality {
                field: ListingField::Neighborhood,
                value: "NridgHt".to_string(),
            },
        ];

        let mut both = priced(1, 250000.0);
        both.neighborhood = Some("NridgHt".to_string());
        let mut price_only = priced(2, 250000.0);
        price_only.neighborhood = Some("OldTown".to_string());
        let mut neither = priced(3, 50000.0);
        neither.neighborhood = Some("OldTown".to_string());

        let pool = vec![both, price_only, neither];

        let all = evaluate(pool.clone(), &constraints, MatchMode::All);
        assert_eq!(all.iter().map(|l| l.house_id).collect::<Vec<_>>(), vec![1]);

        let any = evaluate(pool, &constraints, MatchMode::Any);
        assert_eq!(
            any.iter().map(|l| l.house_id).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }
}
