//! Reference kinetics tables and group collapse.
//!
//! Delayed-neutron data are Keepin's six-group fits; decay-heat data are the
//! eleven-group fit used for light-water fuel. Relative abundances are stored per
//! group and scaled by the total delayed fraction on lookup.

use core::fmt;
use core::str::FromStr;

use crate::error::{KineticsError, KineticsResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Isotope {
    U235,
    Pu239,
    U233,
    U238,
}

impl Isotope {
    pub const ALL: [Isotope; 4] = [Isotope::U235, Isotope::Pu239, Isotope::U233, Isotope::U238];

    pub fn as_str(self) -> &'static str {
        match self {
            Isotope::U235 => "u235",
            Isotope::Pu239 => "pu239",
            Isotope::U233 => "u233",
            Isotope::U238 => "u238",
        }
    }
}

impl fmt::Display for Isotope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Isotope {
    type Err = KineticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Isotope::ALL
            .into_iter()
            .find(|iso| iso.as_str() == key)
            .ok_or_else(|| KineticsError::UnknownIsotope {
                name: s.to_string(),
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Spectrum {
    Thermal,
    Fast,
}

impl Spectrum {
    pub fn as_str(self) -> &'static str {
        match self {
            Spectrum::Thermal => "thermal",
            Spectrum::Fast => "fast",
        }
    }

    /// Prompt neutron generation time Λ in seconds.
    pub fn generation_time_s(self) -> f64 {
        match self {
            Spectrum::Thermal => 5.0e-5,
            Spectrum::Fast => 5.0e-7,
        }
    }
}

impl fmt::Display for Spectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Spectrum {
    type Err = KineticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thermal" => Ok(Spectrum::Thermal),
            "fast" => Ok(Spectrum::Fast),
            _ => Err(KineticsError::UnknownSpectrum {
                name: s.to_string(),
            }),
        }
    }
}

/// Six-group delayed-neutron fit for one (isotope, spectrum) pair.
#[derive(Debug, Clone, Copy)]
struct DelayedNeutronFit {
    isotope: Isotope,
    spectrum: Spectrum,
    /// Decay constants [1/s].
    lambdas: [f64; 6],
    /// Relative abundances a_i, summing to ~1.
    abundances: [f64; 6],
    /// Total delayed fraction β.
    beta: f64,
}

const DELAYED_NEUTRON_FITS: [DelayedNeutronFit; 6] = [
    DelayedNeutronFit {
        isotope: Isotope::U235,
        spectrum: Spectrum::Thermal,
        lambdas: [0.0124, 0.0305, 0.111, 0.301, 1.14, 3.01],
        abundances: [0.033, 0.219, 0.196, 0.395, 0.115, 0.042],
        beta: 0.0065,
    },
    DelayedNeutronFit {
        isotope: Isotope::U235,
        spectrum: Spectrum::Fast,
        lambdas: [0.0127, 0.0317, 0.115, 0.311, 1.40, 3.87],
        abundances: [0.038, 0.213, 0.188, 0.407, 0.128, 0.026],
        beta: 0.0064,
    },
    DelayedNeutronFit {
        isotope: Isotope::Pu239,
        spectrum: Spectrum::Thermal,
        lambdas: [0.0128, 0.0301, 0.124, 0.325, 1.12, 2.69],
        abundances: [0.035, 0.298, 0.211, 0.326, 0.086, 0.044],
        beta: 0.0021,
    },
    DelayedNeutronFit {
        isotope: Isotope::Pu239,
        spectrum: Spectrum::Fast,
        lambdas: [0.0129, 0.0311, 0.134, 0.331, 1.26, 3.21],
        abundances: [0.038, 0.280, 0.216, 0.328, 0.103, 0.035],
        beta: 0.0020,
    },
    DelayedNeutronFit {
        isotope: Isotope::U233,
        spectrum: Spectrum::Thermal,
        lambdas: [0.0126, 0.0337, 0.139, 0.325, 1.13, 2.50],
        abundances: [0.086, 0.299, 0.252, 0.278, 0.051, 0.034],
        beta: 0.0026,
    },
    DelayedNeutronFit {
        isotope: Isotope::U238,
        spectrum: Spectrum::Fast,
        lambdas: [0.0132, 0.0321, 0.139, 0.358, 1.41, 4.02],
        abundances: [0.013, 0.137, 0.162, 0.388, 0.225, 0.075],
        beta: 0.0148,
    },
];

pub const DELAYED_NEUTRON_GROUPS: usize = 6;
pub const DECAY_HEAT_GROUPS: usize = 11;

/// Decay-heat group decay constants [1/s].
const DECAY_HEAT_LAMBDAS: [f64; DECAY_HEAT_GROUPS] = [
    1.772, 5.774e-1, 6.743e-2, 6.214e-3, 4.739e-4, 4.810e-5, 5.344e-6, 5.726e-7, 1.036e-7,
    2.959e-8, 7.585e-10,
];

/// Decay-heat group energy fractions κ.
const DECAY_HEAT_KAPPAS: [f64; DECAY_HEAT_GROUPS] = [
    0.00299, 0.00825, 0.01550, 0.01935, 0.01165, 0.00645, 0.00231, 0.00164, 0.00085, 0.00043,
    0.00057,
];

/// Per-group yields and decay constants after collapse.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupConstants {
    /// β_i for precursors, κ_k for decay heat.
    pub yields: Vec<f64>,
    /// λ in 1/s.
    pub lambdas: Vec<f64>,
}

impl GroupConstants {
    pub fn len(&self) -> usize {
        self.yields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.yields.is_empty()
    }

    pub fn total_yield(&self) -> f64 {
        self.yields.iter().sum()
    }
}

/// Collapse `yields`/`lambdas` into `groups` contiguous bins.
///
/// Each bin keeps the summed yield and the yield-weighted mean lifetime,
/// λ_bin = Σy / Σ(y/λ).
pub fn collapse(
    what: &'static str,
    yields: &[f64],
    lambdas: &[f64],
    groups: usize,
) -> KineticsResult<GroupConstants> {
    let available = yields.len().min(lambdas.len());
    if groups > available {
        return Err(KineticsError::TooManyGroups {
            what,
            requested: groups,
            available,
        });
    }

    let mut out = GroupConstants {
        yields: Vec::with_capacity(groups),
        lambdas: Vec::with_capacity(groups),
    };
    for bin in 0..groups {
        let lo = bin * available / groups;
        let hi = (bin + 1) * available / groups;
        let y: f64 = yields[lo..hi].iter().sum();
        let lifetime: f64 = yields[lo..hi]
            .iter()
            .zip(&lambdas[lo..hi])
            .map(|(y, l)| y / l)
            .sum();
        out.yields.push(y);
        out.lambdas.push(y / lifetime);
    }
    Ok(out)
}

/// Delayed-neutron constants for `isotope`/`spectrum`, collapsed to `groups`.
pub fn delayed_neutrons(
    isotope: Isotope,
    spectrum: Spectrum,
    groups: usize,
) -> KineticsResult<GroupConstants> {
    let fit = DELAYED_NEUTRON_FITS
        .iter()
        .find(|fit| fit.isotope == isotope && fit.spectrum == spectrum)
        .ok_or_else(|| KineticsError::NoData {
            isotope: isotope.to_string(),
            spectrum: spectrum.to_string(),
        })?;

    let betas = fit.abundances.map(|a| a * fit.beta);
    collapse("precursor", &betas, &fit.lambdas, groups)
}

/// Decay-heat constants collapsed to `groups`.
pub fn decay_heat(groups: usize) -> KineticsResult<GroupConstants> {
    collapse("decay heat", &DECAY_HEAT_KAPPAS, &DECAY_HEAT_LAMBDAS, groups)
}

/// Every (isotope, spectrum) pair with delayed-neutron data.
pub fn available_pairs() -> impl Iterator<Item = (Isotope, Spectrum)> {
    DELAYED_NEUTRON_FITS
        .iter()
        .map(|fit| (fit.isotope, fit.spectrum))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_isotope_names() {
        assert_eq!("u235".parse::<Isotope>().unwrap(), Isotope::U235);
        assert_eq!("U-235".parse::<Isotope>().unwrap(), Isotope::U235);
        assert_eq!("pu_239".parse::<Isotope>().unwrap(), Isotope::Pu239);
        assert!(matches!(
            "th232".parse::<Isotope>(),
            Err(KineticsError::UnknownIsotope { .. })
        ));
        assert_eq!("Fast".parse::<Spectrum>().unwrap(), Spectrum::Fast);
        assert!("epithermal".parse::<Spectrum>().is_err());
    }

    #[test]
    fn full_table_keeps_keepin_values() {
        let c = delayed_neutrons(Isotope::U235, Spectrum::Thermal, 6).unwrap();
        assert_eq!(c.lambdas[0], 0.0124);
        assert!((c.yields[3] - 0.395 * 0.0065).abs() < 1e-15);
        assert!((c.total_yield() - 0.0065).abs() < 1e-12);
    }

    #[test]
    fn one_group_collapse() {
        let c = delayed_neutrons(Isotope::U235, Spectrum::Thermal, 1).unwrap();
        assert_eq!(c.len(), 1);
        assert!((c.yields[0] - 0.0065).abs() < 1e-12);

        let a = [0.033, 0.219, 0.196, 0.395, 0.115, 0.042];
        let l = [0.0124, 0.0305, 0.111, 0.301, 1.14, 3.01];
        let mean_life: f64 = a.iter().zip(&l).map(|(a, l)| a / l).sum();
        let expected = a.iter().sum::<f64>() / mean_life;
        assert!((c.lambdas[0] - expected).abs() < 1e-12);
        // ~0.0767 1/s, the classic one-group value
        assert!((c.lambdas[0] - 0.0767).abs() < 1e-3);
    }

    #[test]
    fn collapse_bins_are_contiguous() {
        let c = collapse("test", &[1.0, 1.0, 2.0, 2.0], &[1.0, 1.0, 4.0, 4.0], 2).unwrap();
        assert_eq!(c.yields, vec![2.0, 4.0]);
        assert_eq!(c.lambdas, vec![1.0, 4.0]);
    }

    #[test]
    fn zero_groups_is_empty() {
        assert!(delayed_neutrons(Isotope::U235, Spectrum::Fast, 0).unwrap().is_empty());
        assert!(decay_heat(0).unwrap().is_empty());
    }

    #[test]
    fn too_many_groups_rejected() {
        assert_eq!(
            delayed_neutrons(Isotope::U235, Spectrum::Thermal, 7).unwrap_err(),
            KineticsError::TooManyGroups {
                what: "precursor",
                requested: 7,
                available: 6
            }
        );
        assert!(decay_heat(12).is_err());
        assert_eq!(decay_heat(11).unwrap().len(), 11);
    }

    #[test]
    fn missing_pair_rejected() {
        assert!(matches!(
            delayed_neutrons(Isotope::U238, Spectrum::Thermal, 6),
            Err(KineticsError::NoData { .. })
        ));
        assert_eq!(available_pairs().count(), 6);
    }
}
