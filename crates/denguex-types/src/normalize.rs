//! The single ingestion boundary for inconsistently-shaped server payloads.
//!
//! The backend spells the same concept several ways depending on the
//! endpoint (`city` vs `city_name`, `active` vs `cases` vs `active_cases`,
//! numbers that are sometimes JSON strings). Raw structs here mirror every
//! observed spelling; folding is first-present-wins in a fixed order and
//! happens exactly once, so every renderer sees the same canonical record.

use serde::Deserialize;
use serde_json::Value;

use crate::models::{
    ChatMessage, ChatSessionMeta, CityStat, HealthTip, NewsItem, Report, ReportStatus, Sender,
    UserAccount,
};
use crate::models::Role;

/// A JSON field that may arrive as a number or a numeric string.
/// Unparsable strings count as absent, matching the source's `parseInt`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MaybeNum {
    Int(i64),
    Float(f64),
    Text(String),
}

impl MaybeNum {
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::Int(n) => u32::try_from(*n).ok(),
            Self::Float(f) if f.is_finite() && *f >= 0.0 => Some(*f as u32),
            Self::Float(_) => None,
            Self::Text(s) => s.trim().parse::<u32>().ok(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(f) if f.is_finite() => Some(*f),
            Self::Float(_) => None,
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        }
    }
}

fn first_u32(fields: &[&Option<MaybeNum>]) -> u32 {
    fields
        .iter()
        .find_map(|f| f.as_ref().and_then(MaybeNum::as_u32))
        .unwrap_or(0)
}

fn first_f64(fields: &[&Option<MaybeNum>]) -> Option<f64> {
    fields.iter().find_map(|f| f.as_ref().and_then(MaybeNum::as_f64))
}

// ── City statistics ─────────────────────────────────────────────────────

/// Wire shape of a city record; every alternate key the server has been
/// seen to use. Fold with [`RawCityStat::normalize`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCityStat {
    pub id: Option<i64>,
    pub city: Option<String>,
    pub city_name: Option<String>,
    pub active: Option<MaybeNum>,
    pub cases: Option<MaybeNum>,
    pub active_cases: Option<MaybeNum>,
    pub recovered: Option<MaybeNum>,
    pub deaths: Option<MaybeNum>,
    pub latitude: Option<MaybeNum>,
    pub lat: Option<MaybeNum>,
    pub longitude: Option<MaybeNum>,
    pub lon: Option<MaybeNum>,
}

impl RawCityStat {
    pub fn normalize(self) -> CityStat {
        let city = [self.city, self.city_name]
            .into_iter()
            .flatten()
            .map(|c| c.trim().to_string())
            .find(|c| !c.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        CityStat {
            id: self.id,
            city,
            active: first_u32(&[&self.active, &self.cases, &self.active_cases]),
            recovered: first_u32(&[&self.recovered]),
            deaths: first_u32(&[&self.deaths]),
            latitude: first_f64(&[&self.latitude, &self.lat]),
            longitude: first_f64(&[&self.longitude, &self.lon]),
        }
    }
}

/// The dashboard payload envelope varies: `{"stats": [...]}`,
/// `{"city_stats": [...]}`, or a bare array. Anything else is empty.
pub fn city_stats_from_payload(payload: Value) -> Vec<CityStat> {
    let list = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("stats").or_else(|| map.remove("city_stats")) {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    list.into_iter()
        .filter_map(|item| serde_json::from_value::<RawCityStat>(item).ok())
        .map(RawCityStat::normalize)
        .collect()
}

// ── Reports ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct RawReport {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub area_name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ai_result: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl RawReport {
    /// `api_base` absolutizes relative image paths the way the source
    /// prefixes them with the backend origin.
    pub fn normalize(self, api_base: &str) -> Report {
        let status_text = self
            .status
            .or(self.ai_result)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Pending".to_string());
        let image = self.image.filter(|i| !i.is_empty()).map(|i| {
            if i.starts_with("http") {
                i
            } else {
                format!("{}{}", api_base.trim_end_matches('/'), i)
            }
        });

        Report {
            id: self.id,
            username: self.username.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            area_name: self
                .area_name
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| "Unknown Location".to_string()),
            image,
            location: self.location.filter(|l| !l.is_empty()),
            status: ReportStatus::parse(&status_text),
            status_text,
            created_at: self.created_at.or(self.date),
        }
    }
}

// ── Content ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct RawNewsItem {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl RawNewsItem {
    pub fn normalize(self) -> NewsItem {
        NewsItem {
            id: self.id,
            title: self.title.unwrap_or_default(),
            body: self.content.or(self.description).unwrap_or_default(),
            city: self
                .city
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "All Pakistan".to_string()),
            date: self.date,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHealthTip {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl RawHealthTip {
    pub fn normalize(self) -> HealthTip {
        HealthTip {
            id: self.id,
            title: self.title.unwrap_or_default(),
            description: self.description.or(self.content).unwrap_or_default(),
        }
    }
}

// ── Users ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct RawUserAccount {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub role: Option<String>,
}

fn default_true() -> bool {
    true
}

impl RawUserAccount {
    pub fn normalize(self) -> UserAccount {
        let role = if self.role.as_deref() == Some("Admin") || self.is_superuser {
            Role::Admin
        } else {
            Role::Standard
        };
        UserAccount {
            id: self.id,
            username: self.username,
            email: self.email.filter(|e| !e.is_empty()),
            is_active: self.is_active,
            role,
        }
    }
}

// ── Chat ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct RawChatSession {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
}

impl RawChatSession {
    pub fn normalize(self) -> ChatSessionMeta {
        ChatSessionMeta {
            id: self.id,
            title: self
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "New chat".to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawChatMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
}

impl RawChatMessage {
    pub fn normalize(self) -> ChatMessage {
        let sender = match self.sender.as_deref() {
            Some("bot") => Sender::Bot,
            _ => Sender::User,
        };
        ChatMessage {
            text: self.text.or(self.message).unwrap_or_default(),
            sender,
        }
    }
}

/// Security-question responses use `question` or `security_question`.
pub fn security_question_from_payload(payload: &Value) -> Option<String> {
    payload
        .get("question")
        .or_else(|| payload.get("security_question"))
        .and_then(Value::as_str)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn active_cases_first_present_wins() {
        // Same record under each alternate key must resolve identically.
        for key in ["active", "cases", "active_cases"] {
            let raw: RawCityStat =
                serde_json::from_value(json!({ "city": "Lahore", key: 120 })).unwrap();
            assert_eq!(raw.normalize().active, 120, "key {key}");
        }
        // Earlier keys shadow later ones.
        let raw: RawCityStat =
            serde_json::from_value(json!({ "city": "Lahore", "active": 7, "active_cases": 120 }))
                .unwrap();
        assert_eq!(raw.normalize().active, 7);
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let raw: RawCityStat = serde_json::from_value(json!({
            "city_name": " Karachi ",
            "cases": "45",
            "recovered": "12",
            "lat": "24.86",
            "lon": "67.0"
        }))
        .unwrap();
        let stat = raw.normalize();
        assert_eq!(stat.city, "Karachi");
        assert_eq!(stat.active, 45);
        assert_eq!(stat.recovered, 12);
        assert_eq!(stat.coordinates(), Some((24.86, 67.0)));
    }

    #[test]
    fn garbage_numbers_count_as_absent() {
        let raw: RawCityStat =
            serde_json::from_value(json!({ "city": "Swat", "active": "lots", "lat": "north" }))
                .unwrap();
        let stat = raw.normalize();
        assert_eq!(stat.active, 0);
        assert_eq!(stat.latitude, None);
    }

    #[test]
    fn dashboard_envelope_variants() {
        let inner = json!([{ "city": "Multan", "active": 3 }]);
        for payload in [
            json!({ "stats": inner.clone() }),
            json!({ "city_stats": inner.clone() }),
            inner.clone(),
        ] {
            let stats = city_stats_from_payload(payload);
            assert_eq!(stats.len(), 1);
            assert_eq!(stats[0].city, "Multan");
        }
        assert!(city_stats_from_payload(json!({ "unrelated": 1 })).is_empty());
        assert!(city_stats_from_payload(json!(null)).is_empty());
    }

    #[test]
    fn lahore_scenario_classifies_alert() {
        let stats = city_stats_from_payload(json!([
            { "city": "Lahore", "active_cases": 120, "recovered": 40, "deaths": 2 }
        ]));
        let stat = &stats[0];
        assert_eq!(stat.city, "Lahore");
        assert_eq!((stat.active, stat.recovered, stat.deaths), (120, 40, 2));
        assert_eq!(crate::models::RiskTier::badge(stat.active), "Alert");
    }

    #[test]
    fn report_image_is_absolutized() {
        let raw: RawReport = serde_json::from_value(json!({
            "id": 9,
            "username": "sara",
            "ai_result": "Resolved ✅",
            "image": "/media/report9.jpg"
        }))
        .unwrap();
        let report = raw.normalize("http://127.0.0.1:8000");
        assert_eq!(report.image.as_deref(), Some("http://127.0.0.1:8000/media/report9.jpg"));
        assert_eq!(report.status, ReportStatus::Resolved);
        assert_eq!(report.status_text, "Resolved ✅");
    }

    #[test]
    fn news_body_falls_back_to_description() {
        let raw: RawNewsItem = serde_json::from_value(json!({
            "id": 1, "title": "Fogging drive", "description": "Starts Monday"
        }))
        .unwrap();
        let item = raw.normalize();
        assert_eq!(item.body, "Starts Monday");
        assert_eq!(item.city, "All Pakistan");
    }

    #[test]
    fn superuser_is_admin_role() {
        let raw: RawUserAccount = serde_json::from_value(json!({
            "id": 1, "username": "root", "is_superuser": true, "is_active": true
        }))
        .unwrap();
        let account = raw.normalize();
        assert_eq!(account.role, Role::Admin);
        assert!(!account.is_mutable());
    }

    #[test]
    fn security_question_key_fallback() {
        assert_eq!(
            security_question_from_payload(&json!({ "question": "Pet name?" })).as_deref(),
            Some("Pet name?")
        );
        assert_eq!(
            security_question_from_payload(&json!({ "security_question": "Pet name?" })).as_deref(),
            Some("Pet name?")
        );
        assert_eq!(security_question_from_payload(&json!({})), None);
    }
}
