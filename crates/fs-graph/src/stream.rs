//! Material streams: the edges of a flowsheet.

use fs_core::constants::{p_ref, t_ref};
use fs_core::{Pressure, Real, StreamId, Temperature, k};
use nalgebra::DVector;

/// A material stream carrying one molar flow per chemical component plus
/// its temperature and pressure.
///
/// The convergence state of a stream is its molar flows followed by its
/// temperature in kelvin (see [`Stream::state_vector`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    id: StreamId,
    name: String,
    mol: DVector<Real>,
    temperature: Temperature,
    pressure: Pressure,
}

impl Stream {
    /// Create an empty stream with `n_components` zero flows at reference conditions.
    pub fn new(id: StreamId, name: impl Into<String>, n_components: usize) -> Self {
        Self {
            id,
            name: name.into(),
            mol: DVector::zeros(n_components),
            temperature: t_ref(),
            pressure: p_ref(),
        }
    }

    pub fn id(&self) -> StreamId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Molar flow of each component.
    pub fn mol(&self) -> &DVector<Real> {
        &self.mol
    }

    pub fn mol_mut(&mut self) -> &mut DVector<Real> {
        &mut self.mol
    }

    pub(crate) fn set_mol(&mut self, mol: DVector<Real>) {
        self.mol = mol;
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn set_temperature(&mut self, temperature: Temperature) {
        self.temperature = temperature;
    }

    pub fn pressure(&self) -> Pressure {
        self.pressure
    }

    pub fn set_pressure(&mut self, pressure: Pressure) {
        self.pressure = pressure;
    }

    pub fn component_count(&self) -> usize {
        self.mol.len()
    }

    /// Total molar flow.
    pub fn total_flow(&self) -> Real {
        self.mol.sum()
    }

    /// True when every component flow is zero.
    pub fn is_empty(&self) -> bool {
        self.mol.iter().all(|&v| v == 0.0)
    }

    /// Reset to the neutral state: zero flows at reference conditions.
    pub fn empty(&mut self) {
        self.mol.fill(0.0);
        self.temperature = t_ref();
        self.pressure = p_ref();
    }

    /// Copy flows and conditions from another stream, keeping identity.
    pub fn copy_state_from(&mut self, other: &Stream) {
        self.mol.copy_from(&other.mol);
        self.temperature = other.temperature;
        self.pressure = other.pressure;
    }

    /// Length of [`Stream::state_vector`].
    pub fn state_len(&self) -> usize {
        self.mol.len() + 1
    }

    /// Converged quantities: molar flows then temperature (K).
    pub fn state_vector(&self) -> DVector<Real> {
        let n = self.mol.len();
        DVector::from_fn(n + 1, |i, _| {
            if i < n {
                self.mol[i]
            } else {
                self.temperature.value
            }
        })
    }

    /// Inverse of [`Stream::state_vector`]. `state` must have `state_len()` entries.
    pub fn write_state(&mut self, state: &[Real]) {
        let n = self.mol.len();
        debug_assert_eq!(state.len(), n + 1);
        self.mol.copy_from_slice(&state[..n]);
        self.temperature = k(state[n]);
    }
}
