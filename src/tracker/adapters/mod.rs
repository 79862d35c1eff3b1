//! Adapter implementations of the tracker repository ports.

pub mod memory;
pub mod postgres;
