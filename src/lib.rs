//! # Scrim Stats
//!
//! Typed ingestion and derived analytics for exported Overwatch scrim logs.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (events, stat rows, fights, duels, leaderboards)
//! - **schema**: Positional record validation into typed events
//! - **stream**: Ordered event sequence for one map and its queries
//! - **ingest**: Log-line tokenizing and per-map ingestion
//! - **calculate**: Fights, ultimate timing, duels, X-Factor and Composite SR
//! - **config**: Configuration loading and validation
//! - **error**: Analytics error taxonomy

pub mod calculate;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod schema;
pub mod stream;

pub use error::AnalyticsError;
pub use models::*;
pub use schema::ValidationError;
pub use stream::EventStream;
