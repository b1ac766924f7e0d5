//! Convergence configuration.

use fs_core::{Real, Tolerances};

use crate::error::{SolverError, SolverResult};

/// How the next recycle guess is formed from the last sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Acceleration {
    /// Wegstein's secant extrapolation, `q` clamped to `[q_min, q_max]`.
    Wegstein { q_min: Real, q_max: Real },
    /// Plain (damped) successive substitution.
    Substitution,
}

impl Default for Acceleration {
    fn default() -> Self {
        Acceleration::Wegstein {
            q_min: -5.0,
            q_max: 0.0,
        }
    }
}

/// Recycle convergence configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergenceConfig {
    /// Per-component acceptance `|g - x| <= abs + rel * |g|`
    pub tolerances: Tolerances,
    /// Sweeps allowed per loop invocation
    pub max_iterations: usize,
    pub acceleration: Acceleration,
    /// Substitution step `x + damping * (g - x)`; 1.0 takes `g` as is
    pub damping: Real,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            max_iterations: 200,
            acceleration: Acceleration::default(),
            damping: 1.0,
        }
    }
}

impl ConvergenceConfig {
    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_acceleration(mut self, acceleration: Acceleration) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn with_damping(mut self, damping: Real) -> Self {
        self.damping = damping;
        self
    }

    /// Check that the configuration can drive a loop.
    pub fn validate(&self) -> SolverResult<()> {
        let tol = self.tolerances;
        if !(tol.abs.is_finite() && tol.rel.is_finite()) || tol.abs < 0.0 || tol.rel < 0.0 {
            return Err(SolverError::InvalidConfig {
                what: "tolerances must be finite and non-negative",
            });
        }
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidConfig {
                what: "max_iterations must be at least 1",
            });
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(SolverError::InvalidConfig {
                what: "damping must be in (0, 1]",
            });
        }
        if let Acceleration::Wegstein { q_min, q_max } = self.acceleration {
            if !(q_min.is_finite() && q_max.is_finite()) || q_min > q_max {
                return Err(SolverError::InvalidConfig {
                    what: "Wegstein bounds must be finite with q_min <= q_max",
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ConvergenceConfig::default();
        assert_eq!(config.tolerances.abs, 1e-6);
        assert_eq!(config.tolerances.rel, 1e-4);
        assert_eq!(config.max_iterations, 200);
        assert_eq!(config.damping, 1.0);
        assert_eq!(
            config.acceleration,
            Acceleration::Wegstein {
                q_min: -5.0,
                q_max: 0.0
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_methods() {
        let config = ConvergenceConfig::default()
            .with_max_iterations(10)
            .with_damping(0.5)
            .with_acceleration(Acceleration::Substitution)
            .with_tolerances(Tolerances::new(1e-9, 0.0).unwrap());
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.damping, 0.5);
        assert_eq!(config.acceleration, Acceleration::Substitution);
        assert_eq!(config.tolerances.abs, 1e-9);
    }

    #[test]
    fn invalid_configs() {
        let base = ConvergenceConfig::default();
        assert!(base.with_max_iterations(0).validate().is_err());
        assert!(base.with_damping(0.0).validate().is_err());
        assert!(base.with_damping(1.5).validate().is_err());
        assert!(
            base.with_acceleration(Acceleration::Wegstein {
                q_min: 0.0,
                q_max: -1.0
            })
            .validate()
            .is_err()
        );
        let mut negative = base;
        negative.tolerances.abs = -1.0;
        assert!(negative.validate().is_err());
    }
}
