use serde::{Deserialize, Serialize};

/// The authenticated identity held for the duration of a visit.
///
/// Persisted by the session store; every authenticated request reads the
/// token from here. The token itself is opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Per-city case counts as displayed on cards, the map, and the admin grid.
///
/// Always produced by the normalizer — renderers never see raw server keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityStat {
    pub id: Option<i64>,
    pub city: String,
    pub active: u32,
    pub recovered: u32,
    pub deaths: u32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CityStat {
    pub fn total(&self) -> u32 {
        self.active + self.recovered + self.deaths
    }

    pub fn risk(&self) -> RiskTier {
        RiskTier::for_active(self.active)
    }

    /// Both coordinates present and finite, or the city is not mappable.
    /// A missing coordinate must never default to (0, 0).
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Severity tiers shared by the dashboard cards and the map legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    Safe,
    Elevated,
    Alert,
    Critical,
}

impl RiskTier {
    pub fn for_active(active: u32) -> Self {
        if active >= 200 {
            Self::Critical
        } else if active >= 100 {
            Self::Alert
        } else if active >= 10 {
            Self::Elevated
        } else {
            Self::Safe
        }
    }

    /// Card badge text: anything above 100 active cases reads "Alert".
    pub fn badge(active: u32) -> &'static str {
        if active > 100 { "Alert" } else { "Safe" }
    }
}

/// A breeding-site report submitted by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub username: String,
    pub description: String,
    pub area_name: String,
    pub image: Option<String>,
    pub location: Option<String>,
    pub status: ReportStatus,
    /// Raw status text as the server sent it (may carry decorations).
    pub status_text: String,
    pub created_at: Option<String>,
}

/// Review status of a report. The backend embeds the status inside a free
/// text field, so parsing is by substring and unknown text stays Pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    Pending,
    Resolved,
    Rejected,
    Fake,
}

impl ReportStatus {
    pub fn parse(raw: &str) -> Self {
        if raw.contains("Resolved") {
            Self::Resolved
        } else if raw.contains("Rejected") {
            Self::Rejected
        } else if raw.contains("Fake") {
            Self::Fake
        } else {
            Self::Pending
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSessionMeta {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self { text: text.into(), sender: Sender::User }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self { text: text.into(), sender: Sender::Bot }
    }
}

/// Admin-authored public announcement, optionally scoped to one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub city: String,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthTip {
    pub id: i64,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Standard,
}

/// Account row in the admin user directory. Admin accounts are immutable
/// from this client; only standard accounts can be blocked or unblocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub is_active: bool,
    pub role: Role,
}

impl UserAccount {
    pub fn is_mutable(&self) -> bool {
        self.role != Role::Admin
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub is_vaccinated: Option<String>,
    #[serde(default)]
    pub recent_test_date: Option<String>,
}

impl Profile {
    /// Display name falls back to the username when no full name is set.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.username,
        }
    }
}

/// One day of the analytics series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCases {
    pub date: String,
    pub cases: u32,
    #[serde(default)]
    pub moving_avg: Option<f64>,
    #[serde(default)]
    pub prev_year: Option<u32>,
}

impl DailyCases {
    /// Delta against the same day last year, when the server provided one.
    pub fn year_over_year(&self) -> Option<i64> {
        self.prev_year.map(|p| self.cases as i64 - p as i64)
    }
}

/// Result of a mosquito lab identification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifyResult {
    pub species: String,
    pub confidence: f64,
    pub risk: String,
    pub details: String,
    pub habitat: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_tiers_follow_source_thresholds() {
        assert_eq!(RiskTier::for_active(0), RiskTier::Safe);
        assert_eq!(RiskTier::for_active(9), RiskTier::Safe);
        assert_eq!(RiskTier::for_active(10), RiskTier::Elevated);
        assert_eq!(RiskTier::for_active(100), RiskTier::Alert);
        assert_eq!(RiskTier::for_active(199), RiskTier::Alert);
        assert_eq!(RiskTier::for_active(200), RiskTier::Critical);
    }

    #[test]
    fn card_badge_uses_strict_threshold() {
        assert_eq!(RiskTier::badge(100), "Safe");
        assert_eq!(RiskTier::badge(101), "Alert");
        assert_eq!(RiskTier::badge(120), "Alert");
    }

    #[test]
    fn missing_coordinate_is_not_mappable() {
        let mut stat = CityStat {
            id: None,
            city: "Quetta".into(),
            active: 5,
            recovered: 1,
            deaths: 0,
            latitude: Some(30.18),
            longitude: None,
        };
        assert_eq!(stat.coordinates(), None);
        stat.longitude = Some(66.99);
        assert_eq!(stat.coordinates(), Some((30.18, 66.99)));
        stat.latitude = Some(f64::NAN);
        assert_eq!(stat.coordinates(), None);
    }

    #[test]
    fn report_status_parses_decorated_text() {
        assert_eq!(ReportStatus::parse("Resolved ✅"), ReportStatus::Resolved);
        assert_eq!(ReportStatus::parse("Rejected ❌"), ReportStatus::Rejected);
        assert_eq!(ReportStatus::parse("Fake Report"), ReportStatus::Fake);
        assert_eq!(ReportStatus::parse("Under Review"), ReportStatus::Pending);
    }

    #[test]
    fn profile_display_name_falls_back() {
        let mut p = Profile { username: "asad".into(), ..Profile::default() };
        assert_eq!(p.display_name(), "asad");
        p.full_name = Some(String::new());
        assert_eq!(p.display_name(), "asad");
        p.full_name = Some("Asad Khan".into());
        assert_eq!(p.display_name(), "Asad Khan");
    }
}
