//! Validated thermal network and its temperature right-hand side.

use std::collections::HashMap;

use crate::component::{ComponentId, ThermalComponent};
use crate::error::{ThermalError, ThermalResult};

/// A link resolved to arena indices, as seen from `from`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedLink {
    pub from: ComponentId,
    pub to: ComponentId,
    pub conductance_w_per_k: f64,
}

/// A component's temperature reactivity coefficient (Δk/k per K).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeedbackCoefficient {
    pub component: ComponentId,
    pub alpha_per_k: f64,
}

/// Immutable arena of thermal components.
///
/// Components are keyed by name; links were declared by neighbor name and are
/// resolved to indices once, at build time. Temperature vectors passed in and out
/// follow arena order.
#[derive(Debug, Clone)]
pub struct ThermalNetwork {
    components: Vec<ThermalComponent>,
    index: HashMap<String, usize>,
    /// Per component: (neighbor index, h·A in W/K), in declaration order.
    adjacency: Vec<Vec<(usize, f64)>>,
}

impl ThermalNetwork {
    pub(crate) fn from_validated(
        components: Vec<ThermalComponent>,
        index: HashMap<String, usize>,
    ) -> Self {
        let adjacency = components
            .iter()
            .map(|comp| {
                comp.links()
                    .iter()
                    .filter_map(|link| {
                        index
                            .get(&link.neighbor)
                            .map(|&j| (j, link.conductance_w_per_k()))
                    })
                    .collect()
            })
            .collect();
        Self {
            components,
            index,
            adjacency,
        }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[ThermalComponent] {
        &self.components
    }

    pub fn component(&self, id: ComponentId) -> Option<&ThermalComponent> {
        self.components.get(id.index())
    }

    pub fn id_of(&self, name: &str) -> Option<ComponentId> {
        self.index.get(name).copied().map(ComponentId::from_index)
    }

    /// Component names in arena order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.components.iter().map(|c| c.name())
    }

    /// Initial temperatures in kelvin, arena order.
    pub fn initial_temperatures(&self) -> Vec<f64> {
        self.components
            .iter()
            .map(|c| c.initial_temperature().value)
            .collect()
    }

    /// Every directed link declaration.
    pub fn links(&self) -> Vec<ResolvedLink> {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(i, links)| {
                links.iter().map(move |&(j, g)| ResolvedLink {
                    from: ComponentId::from_index(i),
                    to: ComponentId::from_index(j),
                    conductance_w_per_k: g,
                })
            })
            .collect()
    }

    /// Components with a non-zero feedback coefficient.
    pub fn feedback_coefficients(&self) -> Vec<FeedbackCoefficient> {
        self.components
            .iter()
            .enumerate()
            .filter_map(|(i, c)| {
                c.feedback_coefficient()
                    .map(|alpha| alpha.value)
                    .filter(|&alpha| alpha != 0.0)
                    .map(|alpha_per_k| FeedbackCoefficient {
                        component: ComponentId::from_index(i),
                        alpha_per_k,
                    })
            })
            .collect()
    }

    fn check_len(&self, actual: usize) -> ThermalResult<()> {
        if actual != self.components.len() {
            return Err(ThermalError::StateLength {
                expected: self.components.len(),
                actual,
            });
        }
        Ok(())
    }

    /// Net heat into component `i` in watts.
    fn net_heat_w(&self, i: usize, t: f64, temps: &[f64], thermal_power: f64) -> f64 {
        let comp = &self.components[i];
        let t_i = temps[i];

        let generated = comp
            .power_reference()
            .map_or(0.0, |p| p.value * thermal_power);
        let exchanged: f64 = self.adjacency[i]
            .iter()
            .map(|&(j, g)| g * (t_i - temps[j]))
            .sum();
        let removed = comp
            .heat_removal()
            .map_or(0.0, |sink| sink.heat_removed_w(t, t_i));

        generated - exchanged - removed
    }

    /// Temperature derivatives dT/dt [K/s] for every component.
    ///
    /// `thermal_power` is the normalized heating rate supplied by the neutronics
    /// (1.0 = each heat-generating component produces its reference power).
    pub fn derivatives(
        &self,
        t: f64,
        temps: &[f64],
        thermal_power: f64,
        dtdt: &mut [f64],
    ) -> ThermalResult<()> {
        self.check_len(temps.len())?;
        self.check_len(dtdt.len())?;

        for (i, comp) in self.components.iter().enumerate() {
            let capacity = comp.heat_capacity_j_per_k(temps[i])?;
            dtdt[i] = self.net_heat_w(i, t, temps, thermal_power) / capacity;
        }
        Ok(())
    }

    /// Total stored energy Σ ρ(T)·V·cp·T in joules.
    pub fn total_energy_j(&self, temps: &[f64]) -> ThermalResult<f64> {
        self.check_len(temps.len())?;
        self.components
            .iter()
            .zip(temps)
            .map(|(comp, &t)| Ok(comp.heat_capacity_j_per_k(t)? * t))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::NetworkBuilder;
    use crate::component::{HeatRemoval, RemovalSchedule};
    use pk_core::units::{k, kw, m2, m3, pcm_per_k, w_per_m2k};
    use pk_materials::catalog;

    fn pair(t_fuel: f64, t_cool: f64) -> ThermalNetwork {
        let mut fuel = ThermalComponent::new("fuel", catalog::graphite().unwrap(), m3(0.1), k(t_fuel))
            .with_heat_generation(kw(100.0))
            .with_feedback(pcm_per_k(-1.1));
        fuel.add_convection("cool", w_per_m2k(1000.0), m2(2.0));
        let mut cool = ThermalComponent::new("cool", catalog::water().unwrap(), m3(1.0), k(t_cool));
        cool.add_convection("fuel", w_per_m2k(1000.0), m2(2.0));

        let mut builder = NetworkBuilder::new();
        builder.add(fuel);
        builder.add(cool);
        builder.build().unwrap()
    }

    #[test]
    fn generation_only_heats_generating_component() {
        let net = pair(500.0, 500.0);
        let mut dtdt = [0.0; 2];
        net.derivatives(0.0, &[500.0, 500.0], 1.0, &mut dtdt).unwrap();

        let cap_fuel = 1740.0 * 0.1 * 1650.0;
        assert!((dtdt[0] - 100_000.0 / cap_fuel).abs() < 1e-12);
        assert_eq!(dtdt[1], 0.0);
    }

    #[test]
    fn heat_flows_hot_to_cold() {
        let net = pair(600.0, 500.0);
        let mut dtdt = [0.0; 2];
        net.derivatives(0.0, &[600.0, 500.0], 0.0, &mut dtdt).unwrap();
        assert!(dtdt[0] < 0.0);
        assert!(dtdt[1] > 0.0);

        // exchanged watts cancel exactly
        let cap_fuel = 1740.0 * 0.1 * 1650.0;
        let cap_cool = 1000.0 * 1.0 * 4181.3;
        assert!((dtdt[0] * cap_fuel + dtdt[1] * cap_cool).abs() < 1e-9);
    }

    #[test]
    fn feedback_coefficients_skip_zero() {
        let net = pair(500.0, 500.0);
        let fb = net.feedback_coefficients();
        assert_eq!(fb.len(), 1);
        assert_eq!(fb[0].component, net.id_of("fuel").unwrap());
        assert!((fb[0].alpha_per_k + 1.1e-5).abs() < 1e-18);
    }

    #[test]
    fn resolved_links_are_directed_pairs() {
        let net = pair(500.0, 500.0);
        let links = net.links();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].from, links[1].to);
        assert_eq!(links[0].conductance_w_per_k, 2000.0);
    }

    #[test]
    fn heat_removal_cools_toward_inlet() {
        let pool = ThermalComponent::new("pool", catalog::water().unwrap(), m3(1.0), k(320.0))
            .with_heat_removal(HeatRemoval {
                t_in: k(300.0),
                h: w_per_m2k(100.0),
                area: m2(1.0),
                schedule: RemovalSchedule::Step {
                    t_step: 5.0,
                    eff_init: 1.0,
                    eff_final: 0.0,
                },
            });
        let mut builder = NetworkBuilder::new();
        builder.add(pool);
        let net = builder.build().unwrap();

        let mut dtdt = [0.0];
        net.derivatives(0.0, &[320.0], 0.0, &mut dtdt).unwrap();
        assert!(dtdt[0] < 0.0);
        net.derivatives(6.0, &[320.0], 0.0, &mut dtdt).unwrap();
        assert_eq!(dtdt[0], 0.0);
    }

    #[test]
    fn length_mismatch_is_reported() {
        let net = pair(500.0, 500.0);
        let mut dtdt = [0.0; 2];
        assert_eq!(
            net.derivatives(0.0, &[500.0], 1.0, &mut dtdt).unwrap_err(),
            ThermalError::StateLength {
                expected: 2,
                actual: 1
            }
        );
        assert!(net.total_energy_j(&[1.0, 2.0, 3.0]).is_err());
    }
}
