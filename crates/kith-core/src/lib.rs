#![forbid(unsafe_code)]
//! kith-core: the contact-graph data model shared by the analytics engine
//! and its callers.
//!
//! # Conventions
//!
//! - **Errors**: engine operations return [`error::EngineError`]; loading
//!   and I/O helpers use `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod cancel;
pub mod config;
pub mod error;
pub mod model;

pub use cancel::CancelFlag;
pub use config::EngineConfig;
pub use error::{EngineError, ErrorCode};
