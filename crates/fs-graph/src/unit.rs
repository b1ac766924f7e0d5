//! The unit contract consumed by the network and convergence layers.

use fs_core::FsError;
use thiserror::Error;

use crate::stream::Stream;

/// Errors raised by a unit model while evaluating.
///
/// These are propagated unchanged by the convergence layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Missing {what} slot {index}")]
    MissingSlot { what: &'static str, index: usize },

    #[error("Backend error: {message}")]
    Backend { message: String },

    #[error(transparent)]
    Core(#[from] FsError),
}

pub type UnitResult<T> = Result<T, UnitError>;

/// A processing unit: an opaque function from inlet streams to outlet streams.
///
/// The flowsheet owns the wiring (which streams are connected to which
/// slots); a model only sees copies of its inlets and its own outlet
/// slots, in declaration order. Evaluation must be deterministic and
/// must not touch anything but `outs`.
pub trait Unit {
    /// Short model name used in diagnostics ("Mixer", "Splitter", ...).
    fn kind(&self) -> &'static str;

    /// Number of inlet slots the model requires, if fixed.
    fn inlet_count(&self) -> Option<usize> {
        None
    }

    /// Number of outlet slots the model requires, if fixed.
    fn outlet_count(&self) -> Option<usize> {
        None
    }

    /// Read `ins`, write `outs`.
    fn evaluate(&mut self, ins: &[Stream], outs: &mut [Stream]) -> UnitResult<()>;
}

impl std::fmt::Debug for dyn Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind())
    }
}
