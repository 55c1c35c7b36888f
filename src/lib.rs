//! Docads - promotional banner rotation and analytics for documentation sites
//!
//! This library provides the core functionality for the docads widget:
//! a timer-driven content rotation, per-session visibility flags, and a
//! bounded local analytics log with best-effort delivery to an external
//! endpoint.
//!
//! # Architecture
//! - `catalog`: static promotional content, validated at construction
//! - `render`: renderer seam and deterministic markup templates
//! - `rotation`: the rotation driver (Idle/Running, injectable randomness)
//! - `session`: session identity and per-placement dismissal flags
//! - `tracker`: click/impression entry points and the host tag hook
//! - `analytics`: event model, capped event log, sinks, reports
//! - `widget`: the assembled instance with explicit lifecycle
//! - `config`: TOML configuration with env overrides
//! - `system`: logging setup
//!
//! # Runtime
//! Background rotation and event delivery are spawned onto the ambient
//! Tokio runtime. Outside a runtime both degrade gracefully: rotation
//! stays idle (manual ticks still work) and events are recorded locally
//! without delivery, each with a warning log.

pub mod analytics;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod render;
pub mod rotation;
pub mod session;
pub mod system;
pub mod tracker;
pub mod widget;

pub use analytics::{AdEvent, AnalyticsManager, AnalyticsReport, EventKind, PageContext};
pub use catalog::{AdEntry, CallToAction, Catalog, CatalogSet};
pub use config::AdsConfig;
pub use errors::{DocadsError, Result};
pub use render::{Placement, Renderer};
pub use widget::{AdsWidget, WidgetOptions};
