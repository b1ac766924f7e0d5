//! Common utilities for unit calculations.

use fs_core::Real;
use fs_core::numeric::ensure_finite;
use fs_graph::{Stream, UnitError, UnitResult};

/// Total molar flow below which a stream is treated as empty.
pub const EPSILON_FLOW: Real = 1e-12;

/// Ensure a value is finite, returning `UnitError` if not.
pub fn check_finite(value: Real, what: &'static str) -> UnitResult<()> {
    ensure_finite(value, what).map_err(|_| UnitError::NonPhysical { what })?;
    Ok(())
}

/// Ensure a split fraction or effectiveness lies in `[0, 1]`.
pub fn check_fraction(value: Real, what: &'static str) -> UnitResult<()> {
    check_finite(value, what)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(UnitError::InvalidArg { what });
    }
    Ok(())
}

/// Inlet slot `index`, or `MissingSlot`.
pub fn inlet(ins: &[Stream], index: usize) -> UnitResult<&Stream> {
    ins.get(index).ok_or(UnitError::MissingSlot {
        what: "inlet",
        index,
    })
}

/// Outlet slot `index`, or `MissingSlot`.
pub fn outlet(outs: &mut [Stream], index: usize) -> UnitResult<&mut Stream> {
    outs.get_mut(index).ok_or(UnitError::MissingSlot {
        what: "outlet",
        index,
    })
}
