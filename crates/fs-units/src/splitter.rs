//! Stream splitter.

use fs_core::Real;
use fs_graph::{Stream, Unit, UnitError, UnitResult};
use nalgebra::DVector;

use crate::common::{check_fraction, inlet, outlet};

/// How a splitter divides its feed.
#[derive(Clone, Debug, PartialEq)]
pub enum Split {
    /// The same fraction of every component goes to the first outlet.
    Uniform(Real),
    /// Per-component fractions to the first outlet.
    PerComponent(DVector<Real>),
}

/// One inlet, two outlets; the remainder of each component leaves through
/// the second outlet. Both outlets keep the inlet temperature and pressure.
#[derive(Clone, Debug)]
pub struct Splitter {
    split: Split,
}

impl Splitter {
    /// Send `fraction` of the feed to the first outlet.
    pub fn new(fraction: Real) -> UnitResult<Self> {
        check_fraction(fraction, "split fraction must be in [0, 1]")?;
        Ok(Self {
            split: Split::Uniform(fraction),
        })
    }

    /// Send `fractions[i]` of component `i` to the first outlet.
    pub fn per_component(fractions: &[Real]) -> UnitResult<Self> {
        for &f in fractions {
            check_fraction(f, "split fraction must be in [0, 1]")?;
        }
        Ok(Self {
            split: Split::PerComponent(DVector::from_column_slice(fractions)),
        })
    }

    pub fn split(&self) -> &Split {
        &self.split
    }

    fn top(&self, feed: &DVector<Real>) -> UnitResult<DVector<Real>> {
        match &self.split {
            Split::Uniform(f) => Ok(feed * *f),
            Split::PerComponent(fractions) => {
                if fractions.len() != feed.len() {
                    return Err(UnitError::InvalidArg {
                        what: "split fractions do not match component count",
                    });
                }
                Ok(feed.component_mul(fractions))
            }
        }
    }
}

impl Unit for Splitter {
    fn kind(&self) -> &'static str {
        "Splitter"
    }

    fn inlet_count(&self) -> Option<usize> {
        Some(1)
    }

    fn outlet_count(&self) -> Option<usize> {
        Some(2)
    }

    fn evaluate(&mut self, ins: &[Stream], outs: &mut [Stream]) -> UnitResult<()> {
        let feed = inlet(ins, 0)?;
        let top = self.top(feed.mol())?;
        let bottom = feed.mol() - &top;

        for (index, mol) in [(0, top), (1, bottom)] {
            let out = outlet(outs, index)?;
            out.mol_mut().copy_from(&mol);
            out.set_temperature(feed.temperature());
            out.set_pressure(feed.pressure());
        }
        Ok(())
    }
}
