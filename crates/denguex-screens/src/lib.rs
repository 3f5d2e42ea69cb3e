//! Screen controllers for the DengueX client.
//!
//! Each screen owns a controller: a plain struct holding the remote-data
//! slices it renders from, with explicit `load` methods instead of implicit
//! fetching. Controllers never render; they expose normalized state for
//! whatever shell embeds them.

pub mod admin;
pub mod analytics;
pub mod chat;
pub mod dashboard;
pub mod lab;
pub mod news;
pub mod profile;
pub mod report;
pub mod state;

pub use state::{Pending, ScreenState, Slice, Ticket};
