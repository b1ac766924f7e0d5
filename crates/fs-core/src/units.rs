// fs-core/src/units.rs

use uom::si::f64::{
    Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

pub mod constants {
    use super::*;

    /// Reference temperature of an empty stream.
    pub const T_REF_K: f64 = 298.15;
    /// Reference pressure of an empty stream.
    pub const P_REF_PA: f64 = 101_325.0;

    #[inline]
    pub fn t_ref() -> Temperature {
        k(T_REF_K)
    }

    #[inline]
    pub fn p_ref() -> Pressure {
        pa(P_REF_PA)
    }
}
