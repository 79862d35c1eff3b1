//! EOS: issue and todo tracking.
//!
//! Clients record issues, convert them into todos assigned to a person with a
//! due date, and track completion and lateness.
//!
//! # Architecture
//!
//! EOS follows hexagonal architecture principles:
//!
//! - **Domain**: lifecycle rules with no infrastructure dependencies
//! - **Ports**: repository traits the services depend on
//! - **Adapters**: in-memory and `PostgreSQL` implementations of the ports
//!
//! # Modules
//!
//! - [`tracker`]: issue and todo lifecycles, persistence and orchestration
//! - [`api`]: axum router and server
//! - [`config`]: layered configuration
//! - [`telemetry`]: tracing subscriber setup

pub mod api;
pub mod config;
pub mod telemetry;
pub mod tracker;
