//! Pump unit model.

use fs_core::units::Pressure;
use fs_graph::{Stream, Unit, UnitResult};

use crate::common::{check_finite, inlet, outlet};

/// Liquid pump.
///
/// Material and temperature pass straight through. With a discharge
/// pressure set, the outlet leaves at that pressure, otherwise at the
/// inlet pressure.
#[derive(Clone, Debug, Default)]
pub struct Pump {
    /// Commanded outlet pressure.
    pub discharge: Option<Pressure>,
}

impl Pump {
    /// Create a pass-through pump.
    pub fn new() -> Self {
        Self { discharge: None }
    }

    /// Create a pump with a fixed discharge pressure.
    ///
    /// # Errors
    /// Returns error if the pressure is not finite and positive.
    pub fn with_discharge(discharge: Pressure) -> UnitResult<Self> {
        check_finite(discharge.value, "discharge pressure")?;
        if discharge.value <= 0.0 {
            return Err(fs_graph::UnitError::InvalidArg {
                what: "discharge pressure must be positive",
            });
        }
        Ok(Self {
            discharge: Some(discharge),
        })
    }
}

impl Unit for Pump {
    fn kind(&self) -> &'static str {
        "Pump"
    }

    fn inlet_count(&self) -> Option<usize> {
        Some(1)
    }

    fn outlet_count(&self) -> Option<usize> {
        Some(1)
    }

    fn evaluate(&mut self, ins: &[Stream], outs: &mut [Stream]) -> UnitResult<()> {
        let feed = inlet(ins, 0)?;
        let out = outlet(outs, 0)?;
        out.copy_state_from(feed);
        if let Some(p) = self.discharge {
            out.set_pressure(p);
        }
        Ok(())
    }
}
