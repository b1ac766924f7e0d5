//! Structural error types for flowsheets and network decomposition.

use fs_core::{FsError, StreamId, UnitId};
use thiserror::Error;

/// Flowsheet construction and network decomposition errors.
///
/// All of these are fatal for the operation that raised them: no partial
/// flowsheet or network is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A unit consumes a stream that is neither a feed nor produced by a
    /// unit in the set being decomposed.
    #[error("Stream '{stream}' consumed by unit '{consumer}' has no producer in the unit set and is not a feed")]
    DisconnectedGraph { stream: String, consumer: String },

    /// A cyclic component produced no cut. Cannot happen with the
    /// entry-unit rule, but is reported rather than looping forever.
    #[error("No recycle cut found for the cycle through units [{}]", .units.join(", "))]
    AmbiguousRecycleCut { units: Vec<String> },

    /// A unit refers to a stream id that was never created.
    #[error("Unit '{unit}' refers to unknown stream {stream}")]
    UnknownStream { unit: String, stream: StreamId },

    /// A unit id that does not belong to the flowsheet.
    #[error("Unknown unit {unit}")]
    UnknownUnit { unit: UnitId },

    /// Two units write the same stream.
    #[error("Stream '{stream}' is produced by both '{first}' and '{second}'")]
    MultipleProducers {
        stream: String,
        first: String,
        second: String,
    },

    /// Two units read the same stream.
    #[error("Stream '{stream}' is consumed by both '{first}' and '{second}'")]
    MultipleConsumers {
        stream: String,
        first: String,
        second: String,
    },

    /// A declared feed is also an outlet of some unit.
    #[error("Feed '{stream}' cannot be produced by unit '{producer}'")]
    ProducedFeed { stream: String, producer: String },

    /// A unit model declared a fixed number of slots and got another.
    #[error("Unit '{unit}' expects {expected} {what} but has {actual}")]
    SlotCount {
        unit: String,
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A feed vector does not match the flowsheet's component count.
    #[error("Stream '{stream}' has {actual} components (expected {expected})")]
    DimensionMismatch {
        stream: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },

    #[error(transparent)]
    Core(#[from] FsError),
}

pub type GraphResult<T> = Result<T, GraphError>;
