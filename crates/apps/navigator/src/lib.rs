//! Headless navigator host: REST client, application loop and CLI plumbing.

pub mod action;
pub mod api;
pub mod app;
pub mod config;
pub mod format;

pub use action::{HostAction, HostInput};
pub use api::{ApiClient, HealthStatus, PoiSearch};
pub use app::{Navigator, Services, UserFix};
pub use config::{ConfigError, NavigatorConfig, parse_bbox, parse_categories};
