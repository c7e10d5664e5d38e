// Integration tests for the HouseLink matching engine

use houselink_match::core::{assemble, MatchMode, Matcher, Schema};
use houselink_match::models::{Listing, ListingStatus, PrefValue, PreferenceProfile, Vendor};
use std::collections::HashMap;
use std::sync::Arc;

fn create_listing(house_id: i64, vendor_id: i64, sale_price: f64) -> Listing {
    Listing {
        house_id,
        vendor_id,
        title: format!("House {}", house_id),
        sale_price,
        status: ListingStatus::Available,
        neighborhood: Some("NAmes".to_string()),
        bedroom_abv_gr: Some(3.0),
        full_bath: Some(2.0),
        gr_liv_area: Some(1500.0),
        year_built: Some(1995.0),
        central_air: Some("Y".to_string()),
        garage_cars: Some(2.0),
        contact_phone: Some(format!("555-01{:02}", house_id)),
        contact_email: Some(format!("vendor{}@houselink.test", vendor_id)),
        ..Default::default()
    }
}

fn create_vendor(vendor_id: i64) -> Vendor {
    Vendor {
        vendor_id,
        username: format!("vendor{}", vendor_id),
        email: format!("vendor{}@houselink.test", vendor_id),
    }
}

fn create_profile(fields: &[(&str, PrefValue)]) -> PreferenceProfile {
    let mut profile = PreferenceProfile::new(1);
    for (name, value) in fields {
        profile.fields.insert(name.to_string(), value.clone());
    }
    profile
}

fn matcher() -> Matcher {
    Matcher::new(Arc::new(Schema::load().expect("schema must load")))
}

#[test]
fn test_end_to_end_conjunction_matching() {
    let matcher = matcher();
    let profile = create_profile(&[
        ("min_sale_price", PrefValue::Number(150000.0)),
        ("max_sale_price", PrefValue::Number(300000.0)),
        ("min_bedroom_abv_gr", PrefValue::Number(3.0)),
        ("preferred_neighborhood", PrefValue::Text("NAmes".to_string())),
    ]);

    let mut too_cheap = create_listing(1, 10, 120000.0);
    too_cheap.bedroom_abv_gr = Some(4.0);

    let good = create_listing(2, 10, 250000.0);

    let mut wrong_neighborhood = create_listing(3, 11, 250000.0);
    wrong_neighborhood.neighborhood = Some("OldTown".to_string());

    let mut too_few_bedrooms = create_listing(4, 11, 250000.0);
    too_few_bedrooms.bedroom_abv_gr = Some(2.0);

    let outcome = matcher.find_matches(
        &profile,
        vec![too_cheap, good, wrong_neighborhood, too_few_bedrooms],
        MatchMode::All,
    );

    assert_eq!(outcome.total_candidates, 4);
    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].house_id, 2);
}

#[test]
fn test_mode_divergence_on_same_profile() {
    // Two constraints where every listing satisfies exactly one: All matches
    // nothing, Any matches everything.
    let matcher = matcher();
    let profile = create_profile(&[
        ("preferred_neighborhood", PrefValue::Text("NridgHt".to_string())),
        ("min_garage_cars", PrefValue::Number(3.0)),
    ]);

    let mut right_place = create_listing(1, 10, 200000.0);
    right_place.neighborhood = Some("NridgHt".to_string());
    right_place.garage_cars = Some(1.0);

    let mut big_garage = create_listing(2, 10, 200000.0);
    big_garage.neighborhood = Some("OldTown".to_string());
    big_garage.garage_cars = Some(3.0);

    let candidates = vec![right_place, big_garage];

    let strict = matcher.find_matches(&profile, candidates.clone(), MatchMode::All);
    assert!(strict.matches.is_empty());

    let broad = matcher.find_matches(&profile, candidates, MatchMode::Any);
    assert_eq!(broad.matches.len(), 2);
}

#[test]
fn test_unavailable_listings_never_match() {
    let matcher = matcher();
    let profile = create_profile(&[("min_sale_price", PrefValue::Number(0.0))]);

    let available = create_listing(1, 10, 200000.0);
    let mut sold = create_listing(2, 10, 200000.0);
    sold.status = ListingStatus::Sold;
    let mut rented = create_listing(3, 10, 200000.0);
    rented.status = ListingStatus::Rented;

    let outcome = matcher.find_matches(&profile, vec![available, sold, rented], MatchMode::All);

    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].house_id, 1);

    // The status filter also applies when no constraints compiled at all.
    let mut sold_again = create_listing(4, 10, 200000.0);
    sold_again.status = ListingStatus::Sold;
    let outcome = matcher.find_matches(&PreferenceProfile::new(1), vec![sold_again], MatchMode::All);
    assert!(outcome.matches.is_empty());
}

#[test]
fn test_truthy_central_air_encodings() {
    let matcher = matcher();
    let profile = create_profile(&[("central_air_required", PrefValue::Flag(true))]);

    let truthy = ["Y", "Yes", "1", "True", "T", "SI", "SÍ", "ON"];
    for (i, encoding) in truthy.iter().enumerate() {
        let mut listing = create_listing(i as i64 + 1, 10, 200000.0);
        listing.central_air = Some(encoding.to_string());
        let outcome = matcher.find_matches(&profile, vec![listing], MatchMode::All);
        assert_eq!(outcome.matches.len(), 1, "'{}' should count as truthy", encoding);
    }

    for falsy in ["N", "No", "0", "False", ""] {
        let mut listing = create_listing(100, 10, 200000.0);
        listing.central_air = Some(falsy.to_string());
        let outcome = matcher.find_matches(&profile, vec![listing], MatchMode::All);
        assert!(outcome.matches.is_empty(), "'{}' should not count as truthy", falsy);
    }
}

#[test]
fn test_flag_false_compiles_nothing() {
    // central_air_required: false expresses "don't care", not "must lack AC".
    let matcher = matcher();
    let profile = create_profile(&[("central_air_required", PrefValue::Flag(false))]);
    assert!(matcher.compile_profile(&profile).is_empty());

    let mut no_air = create_listing(1, 10, 200000.0);
    no_air.central_air = Some("N".to_string());
    let outcome = matcher.find_matches(&profile, vec![no_air], MatchMode::All);
    assert_eq!(outcome.matches.len(), 1);
}

#[test]
fn test_assembly_joins_vendors_and_drops_orphans() {
    let matcher = matcher();
    let profile = create_profile(&[("min_sale_price", PrefValue::Number(100000.0))]);

    let candidates = vec![
        create_listing(1, 10, 200000.0),
        create_listing(2, 11, 220000.0),
        create_listing(3, 99, 240000.0), // vendor 99 no longer exists
    ];

    let outcome = matcher.find_matches(&profile, candidates, MatchMode::All);
    assert_eq!(outcome.matches.len(), 3);

    let mut vendors = HashMap::new();
    vendors.insert(10, create_vendor(10));
    vendors.insert(11, create_vendor(11));

    let records = assemble(outcome.matches, &vendors);

    assert_eq!(records.len(), 2);
    for record in &records {
        assert_eq!(record.vendor.vendor_id, record.house.vendor_id);
        // Listing-level contact details override the vendor profile's
        assert_eq!(
            record.vendor.contact_email.as_deref(),
            Some(format!("vendor{}@houselink.test", record.vendor.vendor_id).as_str())
        );
    }
}

#[test]
fn test_missing_attribute_fails_range_but_not_any() {
    let matcher = matcher();
    let profile = create_profile(&[
        ("min_gr_liv_area", PrefValue::Number(1000.0)),
        ("min_sale_price", PrefValue::Number(100000.0)),
    ]);

    let mut no_area = create_listing(1, 10, 200000.0);
    no_area.gr_liv_area = None;

    // Under All the null attribute sinks the listing.
    let strict = matcher.find_matches(&profile, vec![no_area.clone()], MatchMode::All);
    assert!(strict.matches.is_empty());

    // Under Any the price constraint still rescues it.
    let broad = matcher.find_matches(&profile, vec![no_area], MatchMode::Any);
    assert_eq!(broad.matches.len(), 1);
}

#[test]
fn test_constraint_order_follows_schema() {
    // Profile insertion order is irrelevant; compiled order is the schema's.
    let matcher = matcher();
    let profile = create_profile(&[
        ("preferred_neighborhood", PrefValue::Text("NAmes".to_string())),
        ("min_sale_price", PrefValue::Number(1.0)),
    ]);

    let constraints = matcher.compile_profile(&profile);
    assert_eq!(constraints.len(), 2);
    assert!(
        matches!(constraints[0], houselink_match::core::Constraint::Range { .. }),
        "sale_price range should compile before the neighborhood equality"
    );
}

#[test]
fn test_large_pool_scan() {
    let matcher = matcher();
    let profile = create_profile(&[
        ("min_sale_price", PrefValue::Number(200000.0)),
        ("max_sale_price", PrefValue::Number(400000.0)),
    ]);

    let candidates: Vec<Listing> = (0..500)
        .map(|i| create_listing(i, 10 + (i % 5), 100000.0 + (i as f64) * 1000.0))
        .collect();

    let outcome = matcher.find_matches(&profile, candidates, MatchMode::All);

    assert_eq!(outcome.total_candidates, 500);
    assert_eq!(outcome.matches.len(), 201);
    for listing in &outcome.matches {
        assert!(listing.sale_price >= 200000.0 && listing.sale_price <= 400000.0);
    }
}
