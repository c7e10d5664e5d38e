use crate::models::{Listing, MatchRecord, Vendor, VendorContact};
use std::collections::HashMap;

/// Join each passing listing to its owning vendor.
///
/// Pure read/join: the caller supplies the vendors it prefetched for the
/// matched listings. A listing whose vendor is missing (orphaned foreign
/// key) is dropped from the output and logged; referential-integrity
/// failures never break a recommendation response.
pub fn assemble(matches: Vec<Listing>, vendors: &HashMap<i64, Vendor>) -> Vec<MatchRecord> {
    matches
        .into_iter()
        .filter_map(|listing| match vendors.get(&listing.vendor_id) {
            Some(vendor) => {
                let vendor = VendorContact::overlay(vendor, &listing);
                Some(MatchRecord {
                    house: listing,
                    vendor,
                })
            }
            None => {
                tracing::warn!(
                    "dropping listing {}: vendor {} not found",
                    listing.house_id,
                    listing.vendor_id
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendor(vendor_id: i64) -> Vendor {
        Vendor {
            vendor_id,
            username: format!("vendor_{}", vendor_id),
            email: format!("vendor{}@example.test", vendor_id),
        }
    }

    fn listing(house_id: i64, vendor_id: i64) -> Listing {
        Listing {
            house_id,
            vendor_id,
            title: format!("House {}", house_id),
            sale_price: 200000.0,
            contact_phone: Some("555-0100".to_string()),
            contact_email: Some("listing@example.test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn joins_listings_to_vendors() {
        let vendors: HashMap<i64, Vendor> = [(1, vendor(1)), (2, vendor(2))].into();
        let records = assemble(vec![listing(10, 1), listing(11, 2)], &vendors);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].house.house_id, 10);
        assert_eq!(records[0].vendor.vendor_id, 1);
        assert_eq!(records[1].vendor.username, "vendor_2");
    }

    #[test]
    fn orphaned_listing_is_dropped_silently() {
        let vendors: HashMap<i64, Vendor> = [(1, vendor(1))].into();
        let records = assemble(vec![listing(10, 1), listing(11, 99)], &vendors);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].house.house_id, 10);
    }

    #[test]
    fn contact_fields_come_from_the_listing() {
        let vendors: HashMap<i64, Vendor> = [(1, vendor(1))].into();
        let records = assemble(vec![listing(10, 1)], &vendors);

        assert_eq!(records[0].vendor.contact_phone.as_deref(), Some("555-0100"));
        assert_eq!(
            records[0].vendor.contact_email.as_deref(),
            Some("listing@example.test")
        );
        // The vendor's own email is untouched.
        assert_eq!(records[0].vendor.email, "vendor1@example.test");
    }
}
