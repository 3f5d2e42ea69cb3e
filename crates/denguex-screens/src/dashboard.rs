//! Dashboard screen: city cards, summary totals, province breakdown, the
//! outbreak map and the daily-cases chart.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use denguex_client::{ApiClient, ApiError};
use denguex_types::{CityStat, DailyCases, HealthTip};

use crate::state::Slice;

// ── Province buckets ─────────────────────────────────────────────────────

/// Known cities per province. Matching is a case-insensitive substring
/// check so "Lahore Cantt" still lands in Punjab.
const PROVINCES: &[(&str, &[&str])] = &[
    ("Punjab", &[
        "lahore", "rawalpindi", "faisalabad", "multan", "gujranwala",
        "sialkot", "bahawalpur", "sargodha",
    ]),
    ("Sindh", &["karachi", "hyderabad", "sukkur", "larkana"]),
    ("KPK", &["peshawar", "mardan", "abbottabad", "swat", "mingora"]),
    ("Balochistan", &["quetta", "gwadar", "turbat"]),
    ("Islamabad", &["islamabad"]),
];

pub fn province_of(city: &str) -> &'static str {
    let needle = city.to_lowercase();
    for (province, cities) in PROVINCES {
        if cities.iter().any(|c| needle.contains(c)) {
            return province;
        }
    }
    "Others"
}

/// Active-case totals per province, always all six buckets in fixed order.
pub fn province_breakdown(stats: &[CityStat]) -> Vec<(&'static str, u32)> {
    let mut buckets: Vec<(&'static str, u32)> = PROVINCES
        .iter()
        .map(|(p, _)| (*p, 0))
        .chain(std::iter::once(("Others", 0)))
        .collect();
    for stat in stats {
        let province = province_of(&stat.city);
        if let Some(bucket) = buckets.iter_mut().find(|(p, _)| *p == province) {
            bucket.1 += stat.active;
        }
    }
    buckets
}

// ── Summary & map projection ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub active: u32,
    pub recovered: u32,
    pub deaths: u32,
    pub total: u32,
}

pub fn summarize(stats: &[CityStat]) -> Summary {
    stats.iter().fold(Summary::default(), |mut acc, s| {
        acc.active += s.active;
        acc.recovered += s.recovered;
        acc.deaths += s.deaths;
        acc.total += s.total();
        acc
    })
}

/// One bubble on the outbreak map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub active: u32,
    /// Bubble size; offset keeps zero-case cities visible.
    pub z: u32,
}

/// Cities without a full, finite coordinate pair are left off the map.
pub fn map_markers(stats: &[CityStat]) -> Vec<MapMarker> {
    stats
        .iter()
        .filter_map(|s| {
            let (lat, lon) = s.coordinates()?;
            Some(MapMarker { name: s.city.clone(), lat, lon, active: s.active, z: s.active + 5 })
        })
        .collect()
}

// ── Chart window ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartWindow {
    Week,
    Month,
}

impl ChartWindow {
    fn days(self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
        }
    }
}

/// Keep only the trailing window of the series, measured from the series'
/// own latest date. Anchoring on the data rather than the wall clock makes
/// the filter idempotent and stable in tests.
pub fn windowed(series: &[DailyCases], window: ChartWindow) -> Vec<DailyCases> {
    let parse = |d: &DailyCases| NaiveDate::parse_from_str(&d.date, "%Y-%m-%d").ok();
    let Some(latest) = series.iter().filter_map(parse).max() else {
        return Vec::new();
    };
    let cutoff = latest - Duration::days(window.days() - 1);
    series
        .iter()
        .filter(|d| parse(d).is_some_and(|date| date >= cutoff))
        .cloned()
        .collect()
}

// ── Controller ───────────────────────────────────────────────────────────

pub struct DashboardController {
    api: Arc<ApiClient>,
    pub stats: Slice<Vec<CityStat>>,
    pub tips: Slice<Vec<HealthTip>>,
    pub series: Slice<Vec<DailyCases>>,
    pub window: ChartWindow,
}

impl DashboardController {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            stats: Slice::new(),
            tips: Slice::new(),
            series: Slice::new(),
            window: ChartWindow::Week,
        }
    }

    pub async fn load(&mut self) {
        let stats_ticket = self.stats.begin();
        let result = self.api.dashboard_stats().await;
        self.stats.settle(stats_ticket, result);

        let tips_ticket = self.tips.begin();
        let result = self.api.health_tips().await;
        self.tips.settle(tips_ticket, result);

        let series_ticket = self.series.begin();
        let result = self.load_series().await;
        self.series.settle(series_ticket, result);
    }

    async fn load_series(&self) -> Result<Vec<DailyCases>, ApiError> {
        self.api.analytics("All", "", "").await
    }

    pub fn summary(&self) -> Summary {
        self.stats.ready().map(|s| summarize(s)).unwrap_or_default()
    }

    pub fn provinces(&self) -> Vec<(&'static str, u32)> {
        self.stats.ready().map(|s| province_breakdown(s)).unwrap_or_default()
    }

    pub fn markers(&self) -> Vec<MapMarker> {
        self.stats.ready().map(|s| map_markers(s)).unwrap_or_default()
    }

    /// The chart series trimmed to the selected window.
    pub fn chart_series(&self) -> Vec<DailyCases> {
        self.series.ready().map(|s| windowed(s, self.window)).unwrap_or_default()
    }

    pub fn set_window(&mut self, window: ChartWindow) {
        self.window = window;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(city: &str, active: u32, lat: Option<f64>, lon: Option<f64>) -> CityStat {
        CityStat {
            id: None,
            city: city.into(),
            active,
            recovered: 0,
            deaths: 0,
            latitude: lat,
            longitude: lon,
        }
    }

    fn day(date: &str, cases: u32) -> DailyCases {
        DailyCases { date: date.into(), cases, moving_avg: None, prev_year: None }
    }

    #[test]
    fn provinces_match_case_insensitively() {
        assert_eq!(province_of("LAHORE"), "Punjab");
        assert_eq!(province_of("Karachi East"), "Sindh");
        assert_eq!(province_of("Islamabad"), "Islamabad");
        assert_eq!(province_of("Muzaffarabad"), "Others");
    }

    #[test]
    fn breakdown_includes_others_bucket() {
        let stats = vec![
            stat("Lahore", 120, None, None),
            stat("Multan", 30, None, None),
            stat("Gilgit", 8, None, None),
        ];
        let buckets = province_breakdown(&stats);
        assert_eq!(buckets.iter().find(|(p, _)| *p == "Punjab").unwrap().1, 150);
        assert_eq!(buckets.iter().find(|(p, _)| *p == "Others").unwrap().1, 8);
        assert_eq!(buckets.len(), 6);
    }

    #[test]
    fn markers_skip_unmappable_cities() {
        let stats = vec![
            stat("Lahore", 120, Some(31.52), Some(74.35)),
            stat("Ghost Town", 50, None, Some(70.0)),
            stat("NaN City", 50, Some(f64::NAN), Some(70.0)),
        ];
        let markers = map_markers(&stats);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].name, "Lahore");
        assert_eq!(markers[0].z, 125);
    }

    #[test]
    fn summary_reduces_all_counters() {
        let mut a = stat("Lahore", 120, None, None);
        a.recovered = 40;
        a.deaths = 2;
        let b = stat("Quetta", 10, None, None);
        let summary = summarize(&[a, b]);
        assert_eq!(summary.active, 130);
        assert_eq!(summary.recovered, 40);
        assert_eq!(summary.deaths, 2);
        assert_eq!(summary.total, 172);
    }

    #[test]
    fn window_filter_is_idempotent() {
        let series: Vec<DailyCases> = (1..=31).map(|d| day(&format!("2026-08-{d:02}"), d)).collect();
        let once = windowed(&series, ChartWindow::Week);
        assert_eq!(once.len(), 7);
        assert_eq!(once.first().unwrap().date, "2026-08-25");
        assert_eq!(once.last().unwrap().date, "2026-08-31");
        let twice = windowed(&once, ChartWindow::Week);
        assert_eq!(once, twice);
    }

    #[test]
    fn month_window_takes_thirty_days() {
        let series: Vec<DailyCases> = (1..=31).map(|d| day(&format!("2026-08-{d:02}"), d)).collect();
        let month = windowed(&series, ChartWindow::Month);
        assert_eq!(month.len(), 30);
        assert_eq!(month.first().unwrap().date, "2026-08-02");
    }

    #[test]
    fn empty_or_unparsable_series_filters_to_empty() {
        assert!(windowed(&[], ChartWindow::Week).is_empty());
        assert!(windowed(&[day("yesterday", 3)], ChartWindow::Week).is_empty());
    }
}
