// pk-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, HeatTransfer as UomHeatTransfer, MassDensity as UomMassDensity,
    Power as UomPower, SpecificHeatCapacity as UomSpecificHeatCapacity,
    TemperatureCoefficient as UomTemperatureCoefficient,
    ThermalConductivity as UomThermalConductivity,
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
    Volume as UomVolume,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type HeatTransferCoeff = UomHeatTransfer;
pub type Density = UomMassDensity;
pub type Power = UomPower;
pub type SpecificHeat = UomSpecificHeatCapacity;
pub type TempCoefficient = UomTemperatureCoefficient;
pub type Temperature = UomThermodynamicTemperature;
pub type ThermalConductivity = UomThermalConductivity;
pub type Time = UomTime;
pub type Volume = UomVolume;

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn m3(v: f64) -> Volume {
    use uom::si::volume::cubic_meter;
    Volume::new::<cubic_meter>(v)
}

#[inline]
pub fn w(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn kw(v: f64) -> Power {
    use uom::si::power::kilowatt;
    Power::new::<kilowatt>(v)
}

#[inline]
pub fn w_per_m2k(v: f64) -> HeatTransferCoeff {
    use uom::si::heat_transfer::watt_per_square_meter_kelvin;
    HeatTransferCoeff::new::<watt_per_square_meter_kelvin>(v)
}

#[inline]
pub fn j_per_kgk(v: f64) -> SpecificHeat {
    use uom::si::specific_heat_capacity::joule_per_kilogram_kelvin;
    SpecificHeat::new::<joule_per_kilogram_kelvin>(v)
}

#[inline]
pub fn w_per_mk(v: f64) -> ThermalConductivity {
    use uom::si::thermal_conductivity::watt_per_meter_kelvin;
    ThermalConductivity::new::<watt_per_meter_kelvin>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

/// Reactivity feedback coefficient in Δk/k per kelvin.
#[inline]
pub fn per_k(v: f64) -> TempCoefficient {
    use uom::si::temperature_coefficient::per_kelvin;
    TempCoefficient::new::<per_kelvin>(v)
}

/// Reactivity feedback coefficient in pcm per kelvin (1 pcm = 1e-5 Δk/k).
#[inline]
pub fn pcm_per_k(v: f64) -> TempCoefficient {
    per_k(v * constants::PCM)
}

pub mod constants {
    /// One per-cent-mille of reactivity, in Δk/k.
    pub const PCM: f64 = 1.0e-5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _t = k(500.0);
        let _dt = s(0.0005);
        let _a = m2(2.5);
        let _v = m3(0.022);
        let _h = w_per_m2k(7000.0);
        let _cp = j_per_kgk(4181.3);
        let _k = w_per_mk(0.58);
        let _rho = kg_per_m3(1000.0);
    }

    #[test]
    fn si_values_are_base_units() {
        assert_eq!(kw(250.0).value, 250_000.0);
        assert_eq!(k(500.0).value, 500.0);
        assert_eq!(m3(0.5).value, 0.5);
    }

    #[test]
    fn pcm_scaling() {
        let alpha = pcm_per_k(-1.1);
        assert!((alpha.value + 1.1e-5).abs() < 1e-18);
    }
}
