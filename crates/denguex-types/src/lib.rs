pub mod api;
pub mod models;
pub mod normalize;

pub use models::{
    ChatMessage, ChatSessionMeta, CityStat, DailyCases, HealthTip, IdentifyResult, NewsItem,
    Profile, Report, ReportStatus, RiskTier, Role, Sender, Session, UserAccount,
};
