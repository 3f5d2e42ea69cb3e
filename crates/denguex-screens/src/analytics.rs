//! Analytics screen: filtered daily-case series, year-over-year deltas and
//! CSV export.

use std::sync::Arc;

use denguex_client::ApiClient;
use denguex_types::DailyCases;

use crate::state::Slice;

/// Server-side filter. A city of "All" and empty dates mean no filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsFilter {
    pub city: String,
    pub start_date: String,
    pub end_date: String,
}

impl Default for AnalyticsFilter {
    fn default() -> Self {
        Self { city: "All".into(), start_date: String::new(), end_date: String::new() }
    }
}

/// Render the series as CSV, one row per day. Absent moving averages and
/// previous-year values export as empty cells.
pub fn to_csv(series: &[DailyCases]) -> String {
    let mut out = String::from("Date, Active Cases, Moving Average, Previous Year\n");
    for day in series {
        let avg = day.moving_avg.map(|v| v.to_string()).unwrap_or_default();
        let prev = day.prev_year.map(|v| v.to_string()).unwrap_or_default();
        out.push_str(&format!("{}, {}, {}, {}\n", day.date, day.cases, avg, prev));
    }
    out
}

pub struct AnalyticsController {
    api: Arc<ApiClient>,
    pub filter: AnalyticsFilter,
    pub series: Slice<Vec<DailyCases>>,
}

impl AnalyticsController {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api, filter: AnalyticsFilter::default(), series: Slice::new() }
    }

    pub async fn load(&mut self) {
        let ticket = self.series.begin();
        let result = self
            .api
            .analytics(&self.filter.city, &self.filter.start_date, &self.filter.end_date)
            .await;
        self.series.settle(ticket, result);
    }

    pub async fn apply_filter(&mut self, filter: AnalyticsFilter) {
        self.filter = filter;
        self.load().await;
    }

    pub fn export_csv(&self) -> String {
        to_csv(self.series.ready().map(Vec::as_slice).unwrap_or_default())
    }

    /// Per-day delta against the previous year, where the server gave one.
    pub fn year_over_year(&self) -> Vec<(String, Option<i64>)> {
        self.series
            .ready()
            .map(|s| s.iter().map(|d| (d.date.clone(), d.year_over_year())).collect())
            .unwrap_or_default()
    }
}
