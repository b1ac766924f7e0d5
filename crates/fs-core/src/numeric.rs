use crate::FsError;

/// Floating point type used throughout the workspace.
pub type Real = f64;

/// Absolute and relative tolerance pair.
///
/// Recycle comparisons accept `|new - old| <= abs + rel * |new|`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Tolerances {
    /// Create a tolerance pair, rejecting negative or non-finite values.
    pub fn new(abs: Real, rel: Real) -> Result<Self, FsError> {
        let abs = ensure_finite(abs, "absolute tolerance")?;
        let rel = ensure_finite(rel, "relative tolerance")?;
        if abs < 0.0 || rel < 0.0 {
            return Err(FsError::InvalidArg {
                what: "tolerances must be non-negative",
            });
        }
        Ok(Self { abs, rel })
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-6,
            rel: 1e-4,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Convergence test for one component of an iterate.
///
/// The relative part scales with the newly computed value.
pub fn within_tolerance(old: Real, new: Real, tol: Tolerances) -> bool {
    (new - old).abs() <= tol.abs + tol.rel * new.abs()
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, FsError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FsError::NonFinite { what, value: v })
    }
}
