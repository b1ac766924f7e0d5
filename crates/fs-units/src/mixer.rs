//! Stream mixer.

use fs_core::Real;
use fs_core::units::k;
use fs_graph::{Stream, Unit, UnitError, UnitResult};

use crate::common::{EPSILON_FLOW, check_finite, inlet, outlet};

/// Adiabatic mixer with any number of inlets and one outlet.
///
/// ## Model
///
/// ```text
/// n_out = sum(n_i)
/// T_out = sum(F_i * T_i) / sum(F_i)     (F_i = total molar flow of inlet i)
/// P_out = min(P_i)
/// ```
///
/// All components share one molar heat capacity, so the energy balance
/// reduces to a flow-weighted temperature. With no flow at all the outlet
/// takes the first inlet's temperature.
#[derive(Clone, Debug, Default)]
pub struct Mixer;

impl Mixer {
    pub fn new() -> Self {
        Self
    }
}

impl Unit for Mixer {
    fn kind(&self) -> &'static str {
        "Mixer"
    }

    fn outlet_count(&self) -> Option<usize> {
        Some(1)
    }

    fn evaluate(&mut self, ins: &[Stream], outs: &mut [Stream]) -> UnitResult<()> {
        let first = inlet(ins, 0)?;
        let out = outlet(outs, 0)?;

        let mut mol = first.mol().clone();
        let mut pressure = first.pressure();
        let mut total: Real = 0.0;
        let mut enthalpy: Real = 0.0;
        for (i, s) in ins.iter().enumerate() {
            if s.component_count() != mol.len() {
                return Err(UnitError::InvalidArg {
                    what: "mixer inlets carry different component counts",
                });
            }
            if i > 0 {
                mol += s.mol();
            }
            let flow = s.total_flow();
            total += flow;
            enthalpy += flow * s.temperature().value;
            pressure = pressure.min(s.pressure());
        }

        let t_out = if total.abs() > EPSILON_FLOW {
            enthalpy / total
        } else {
            first.temperature().value
        };
        check_finite(t_out, "mixer outlet temperature")?;

        out.mol_mut().copy_from(&mol);
        out.set_temperature(k(t_out));
        out.set_pressure(pressure);
        Ok(())
    }
}
