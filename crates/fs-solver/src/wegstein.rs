//! Wegstein acceleration of recycle fixed-point iteration.

use fs_core::Real;
use nalgebra::DVector;

use crate::config::Acceleration;

/// Differences below this are treated as zero when forming secant slopes.
const SLOPE_EPS: Real = 1e-12;

/// Produces the next recycle guess from the current guess `x` and the
/// state `g(x)` computed by a sweep.
///
/// Per component, with the previous pair `(x_{k-1}, g_{k-1})`:
///
/// ```text
/// s       = (g_k - g_{k-1}) / (x_k - x_{k-1})
/// q       = clamp(s / (s - 1), q_min, q_max)
/// x_{k+1} = q * x_k + (1 - q) * g_k
/// ```
///
/// Without history, or where the secant is degenerate, the step falls back
/// to damped substitution `x_k + damping * (g_k - x_k)`.
#[derive(Debug, Clone)]
pub struct Accelerator {
    acceleration: Acceleration,
    damping: Real,
    previous: Option<(DVector<Real>, DVector<Real>)>,
}

impl Accelerator {
    pub fn new(acceleration: Acceleration, damping: Real) -> Self {
        Self {
            acceleration,
            damping,
            previous: None,
        }
    }

    /// Forget the iteration history.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    pub fn has_history(&self) -> bool {
        self.previous.is_some()
    }

    /// Next guess for `x` given `g = g(x)`.
    pub fn next_guess(&mut self, x: &DVector<Real>, g: &DVector<Real>) -> DVector<Real> {
        let next = match (self.acceleration, &self.previous) {
            (Acceleration::Wegstein { q_min, q_max }, Some((x_prev, g_prev)))
                if x_prev.len() == x.len() =>
            {
                DVector::from_fn(x.len(), |i, _| {
                    let dx = x[i] - x_prev[i];
                    if dx.abs() < SLOPE_EPS {
                        return self.substitute(x[i], g[i]);
                    }
                    let s = (g[i] - g_prev[i]) / dx;
                    if (s - 1.0).abs() < SLOPE_EPS {
                        return self.substitute(x[i], g[i]);
                    }
                    let q = (s / (s - 1.0)).clamp(q_min, q_max);
                    q * x[i] + (1.0 - q) * g[i]
                })
            }
            _ => DVector::from_fn(x.len(), |i, _| self.substitute(x[i], g[i])),
        };
        self.previous = Some((x.clone(), g.clone()));
        next
    }

    fn substitute(&self, x: Real, g: Real) -> Real {
        x + self.damping * (g - x)
    }
}
