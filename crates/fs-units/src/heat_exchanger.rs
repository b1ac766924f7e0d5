//! Two-stream process heat exchanger.

use fs_core::Real;
use fs_core::units::k;
use fs_graph::{Stream, Unit, UnitError, UnitResult};

use crate::common::{EPSILON_FLOW, check_finite, check_fraction, inlet, outlet};

/// Molar heat capacity of liquid water near ambient, J/(mol K).
pub const DEFAULT_HEAT_CAPACITY: Real = 75.3;

/// Process/process exchanger rated by effectiveness.
///
/// Inlet `i` leaves through outlet `i`. Every component has the same molar
/// heat capacity `cp`, so each side's capacity rate is proportional to its
/// total molar flow:
///
/// ```text
/// C_i   = cp * F_i
/// Q     = eff * min(C_0, C_1) * (T_0 - T_1)
/// T_0'  = T_0 - Q / C_0
/// T_1'  = T_1 + Q / C_1
/// ```
///
/// Positive `Q` flows from side 0 to side 1. If either side carries no
/// flow both streams pass through unchanged.
#[derive(Clone, Debug)]
pub struct HeatExchanger {
    effectiveness: Real,
    heat_capacity: Real,
    duty: Real,
}

impl HeatExchanger {
    /// Create an exchanger with effectiveness in `[0, 1]`.
    pub fn new(effectiveness: Real) -> UnitResult<Self> {
        check_fraction(effectiveness, "effectiveness must be in [0, 1]")?;
        Ok(Self {
            effectiveness,
            heat_capacity: DEFAULT_HEAT_CAPACITY,
            duty: 0.0,
        })
    }

    /// Override the molar heat capacity used for the reported duty.
    pub fn with_heat_capacity(mut self, cp: Real) -> UnitResult<Self> {
        check_finite(cp, "heat capacity")?;
        if cp <= 0.0 {
            return Err(UnitError::InvalidArg {
                what: "heat capacity must be positive",
            });
        }
        self.heat_capacity = cp;
        Ok(self)
    }

    pub fn effectiveness(&self) -> Real {
        self.effectiveness
    }

    /// Heat moved from side 0 to side 1 at the last evaluation (W for mol/s flows).
    pub fn duty(&self) -> Real {
        self.duty
    }
}

impl Unit for HeatExchanger {
    fn kind(&self) -> &'static str {
        "HeatExchanger"
    }

    fn inlet_count(&self) -> Option<usize> {
        Some(2)
    }

    fn outlet_count(&self) -> Option<usize> {
        Some(2)
    }

    fn evaluate(&mut self, ins: &[Stream], outs: &mut [Stream]) -> UnitResult<()> {
        let (a, b) = (inlet(ins, 0)?, inlet(ins, 1)?);
        let (f0, f1) = (a.total_flow(), b.total_flow());
        let (t0, t1) = (a.temperature().value, b.temperature().value);

        let (t0_out, t1_out, duty) = if f0 > EPSILON_FLOW && f1 > EPSILON_FLOW {
            let (c0, c1) = (self.heat_capacity * f0, self.heat_capacity * f1);
            let q = self.effectiveness * c0.min(c1) * (t0 - t1);
            (t0 - q / c0, t1 + q / c1, q)
        } else {
            (t0, t1, 0.0)
        };
        check_finite(t0_out, "exchanger outlet temperature")?;
        check_finite(t1_out, "exchanger outlet temperature")?;

        for (index, source, t) in [(0, a, t0_out), (1, b, t1_out)] {
            let out = outlet(outs, index)?;
            out.copy_state_from(source);
            out.set_temperature(k(t));
        }
        self.duty = duty;
        Ok(())
    }
}
