/// Integration test: a raw dashboard payload flows through normalization
/// into every dashboard projection (cards, summary, provinces, map).

use serde_json::json;

use denguex_screens::dashboard::{map_markers, province_breakdown, summarize};
use denguex_types::normalize::city_stats_from_payload;
use denguex_types::RiskTier;

#[test]
fn dashboard_payload_renders_end_to_end() {
    let payload = json!({
        "stats": [
            {
                "city": "Lahore",
                "active_cases": 120,
                "recovered": 40,
                "deaths": 2,
                "lat": "31.5204",
                "lon": 74.3587
            },
            {
                "city_name": "Karachi",
                "cases": "85",
                "recovered": 10,
                "deaths": 1,
                "latitude": 24.8607,
                "longitude": 67.0011
            },
            { "city": "Gilgit", "active": 4, "recovered": 0, "deaths": 0 }
        ]
    });

    let stats = city_stats_from_payload(payload);
    assert_eq!(stats.len(), 3);

    // Card values and classification.
    let lahore = &stats[0];
    assert_eq!(lahore.city, "Lahore");
    assert_eq!((lahore.active, lahore.recovered, lahore.deaths), (120, 40, 2));
    assert_eq!(lahore.risk(), RiskTier::Alert);
    assert_eq!(RiskTier::badge(lahore.active), "Alert");

    // Summary totals reduce across all cities.
    let summary = summarize(&stats);
    assert_eq!(summary.active, 209);
    assert_eq!(summary.total, 262);

    // Province bucketing, including the Others catch-all.
    let provinces = province_breakdown(&stats);
    assert_eq!(provinces.iter().find(|(p, _)| *p == "Punjab").unwrap().1, 120);
    assert_eq!(provinces.iter().find(|(p, _)| *p == "Sindh").unwrap().1, 85);
    assert_eq!(provinces.iter().find(|(p, _)| *p == "Others").unwrap().1, 4);

    // Gilgit has no coordinates and is left off the map; the others land
    // with their sizes offset.
    let markers = map_markers(&stats);
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].name, "Lahore");
    assert!((markers[0].lat - 31.5204).abs() < 1e-9);
    assert_eq!(markers[0].z, 125);
}

#[test]
fn bare_array_payload_is_accepted_too() {
    let payload = json!([
        { "city": "Quetta", "active_cases": 9, "recovered": 3, "deaths": 0 }
    ]);
    let stats = city_stats_from_payload(payload);
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].risk(), RiskTier::Safe);
}
