//! fs-core: stable foundation for the flowsheet workspace.
//!
//! Contains:
//! - ids (compact ids for units and streams, assigned in insertion order)
//! - numeric (Real + convergence tolerances + float helpers)
//! - units (uom SI types for stream conditions)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{FsError, FsResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
