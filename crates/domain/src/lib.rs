//! Domain types for the replicating market maker swap quoter.
//!
//! This crate holds the value objects shared by the curve primitives and the
//! quoting engine: fixed-point amounts with explicit decimal precision, pool
//! state, curve calibration parameters, and trade direction.

pub mod enums;
pub mod error;
pub mod pool;
pub mod value_objects;
