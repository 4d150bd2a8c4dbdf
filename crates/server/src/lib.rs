//! Lost & Found Server - HTTP API for the campus lost & found
//!
//! This crate exposes the item store and the Smart Match engine over HTTP:
//!
//! - **Browsing**: Recent items, filtered listings, item detail with variants
//! - **Reporting**: Found-item reports (held for review) and lost-item reports
//! - **Smart Match**: Ranked candidates for a lost-item description
//! - **Moderation**: Session-protected admin dashboard and actions
//! - **Health & Metrics**: Liveness/readiness probes and Prometheus metrics
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! ## Public Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics
//! - `GET /api/overview` - Six newest items and totals
//! - `GET /api/items?q=&category=` - Browse approved items
//! - `POST /api/items` - Report a found item
//! - `GET /api/items/{id}` - Item detail with variants
//! - `POST /api/items/{id}/claim` - Claim an item
//! - `GET /api/categories` - Categories in use
//! - `GET /api/search?q=` - Quick search (10 rows)
//! - `POST /api/notify` - Keyword alert sign-up
//! - `POST /api/smart-match` - Rank items for a lost-item description
//! - `POST /lost` - Lost-item form submission
//! - `POST /admin/login` - Start an admin session
//!
//! ## Admin Endpoints (Session Required)
//!
//! - `POST /admin/logout`
//! - `GET /admin/dashboard`
//! - `POST /admin/action`
//! - `GET /admin/items/{id}/events`
//! - `GET /admin/metadata`

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
