//! Issue and todo tracking.
//!
//! Issues are created, edited, moved between the short- and long-term
//! horizons, and converted into todos assigned to a person with a due date.
//! Converting an issue resolves it. Todos advance from pending to late as
//! their due date passes and end when completed. The module follows
//! hexagonal architecture:
//!
//! - Domain types and lifecycle rules in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
