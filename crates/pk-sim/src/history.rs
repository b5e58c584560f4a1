//! Per-step simulation record.

use crate::error::{SimError, SimResult};

/// Borrowed view of one recorded step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryRow<'a> {
    pub step: usize,
    pub time: f64,
    pub reactivity: f64,
    pub power: f64,
    pub thermal_power: f64,
    pub precursors: &'a [f64],
    pub decay_heat: &'a [f64],
    pub temperatures: &'a [f64],
}

/// Append-only, step-ordered history of a run.
///
/// Storage is sized once for the whole time grid; per-group and per-component
/// values are stored row-major in flat arrays.
#[derive(Debug, Clone)]
pub struct SimulationHistory {
    component_names: Vec<String>,
    n_pg: usize,
    n_dg: usize,
    capacity: usize,
    times: Vec<f64>,
    reactivity: Vec<f64>,
    power: Vec<f64>,
    thermal_power: Vec<f64>,
    precursors: Vec<f64>,
    decay_heat: Vec<f64>,
    temperatures: Vec<f64>,
}

impl SimulationHistory {
    pub fn with_capacity(
        capacity: usize,
        n_pg: usize,
        n_dg: usize,
        component_names: Vec<String>,
    ) -> Self {
        let n_comp = component_names.len();
        Self {
            n_pg,
            n_dg,
            capacity,
            times: Vec::with_capacity(capacity),
            reactivity: Vec::with_capacity(capacity),
            power: Vec::with_capacity(capacity),
            thermal_power: Vec::with_capacity(capacity),
            precursors: Vec::with_capacity(capacity * n_pg),
            decay_heat: Vec::with_capacity(capacity * n_dg),
            temperatures: Vec::with_capacity(capacity * n_comp),
            component_names,
        }
    }

    /// Append one row. `neutronics` is the flat `[p, ζ.., ω..]` state.
    pub fn push(
        &mut self,
        time: f64,
        reactivity: f64,
        neutronics: &[f64],
        thermal_power: f64,
        temperatures: &[f64],
    ) -> SimResult<()> {
        if self.times.len() >= self.capacity {
            return Err(SimError::Domain {
                what: format!("history is full ({} rows)", self.capacity),
            });
        }
        if neutronics.len() != 1 + self.n_pg + self.n_dg
            || temperatures.len() != self.component_names.len()
        {
            return Err(SimError::configuration("history row has the wrong width"));
        }

        self.times.push(time);
        self.reactivity.push(reactivity);
        self.power.push(neutronics[0]);
        self.thermal_power.push(thermal_power);
        self.precursors
            .extend_from_slice(&neutronics[1..=self.n_pg]);
        self.decay_heat
            .extend_from_slice(&neutronics[1 + self.n_pg..]);
        self.temperatures.extend_from_slice(temperatures);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn precursor_groups(&self) -> usize {
        self.n_pg
    }

    pub fn decay_heat_groups(&self) -> usize {
        self.n_dg
    }

    pub fn component_names(&self) -> &[String] {
        &self.component_names
    }

    pub fn component_index(&self, name: &str) -> Option<usize> {
        self.component_names.iter().position(|n| n == name)
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn reactivity(&self) -> &[f64] {
        &self.reactivity
    }

    pub fn power(&self) -> &[f64] {
        &self.power
    }

    pub fn thermal_power(&self) -> &[f64] {
        &self.thermal_power
    }

    pub fn row(&self, step: usize) -> Option<HistoryRow<'_>> {
        if step >= self.len() {
            return None;
        }
        let n_comp = self.component_names.len();
        Some(HistoryRow {
            step,
            time: self.times[step],
            reactivity: self.reactivity[step],
            power: self.power[step],
            thermal_power: self.thermal_power[step],
            precursors: &self.precursors[step * self.n_pg..(step + 1) * self.n_pg],
            decay_heat: &self.decay_heat[step * self.n_dg..(step + 1) * self.n_dg],
            temperatures: &self.temperatures[step * n_comp..(step + 1) * n_comp],
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = HistoryRow<'_>> + '_ {
        (0..self.len()).filter_map(|step| self.row(step))
    }

    pub fn last(&self) -> Option<HistoryRow<'_>> {
        self.len().checked_sub(1).and_then(|step| self.row(step))
    }

    /// Temperature series of one component.
    pub fn temperature_series(&self, component: usize) -> Option<Vec<f64>> {
        let n_comp = self.component_names.len();
        if component >= n_comp {
            return None;
        }
        Some(
            self.temperatures
                .iter()
                .skip(component)
                .step_by(n_comp)
                .copied()
                .collect(),
        )
    }

    /// Series of precursor group `group`.
    pub fn precursor_series(&self, group: usize) -> Option<Vec<f64>> {
        if group >= self.n_pg {
            return None;
        }
        Some(
            self.precursors
                .iter()
                .skip(group)
                .step_by(self.n_pg)
                .copied()
                .collect(),
        )
    }

    /// Series of decay-heat group `group`.
    pub fn decay_heat_series(&self, group: usize) -> Option<Vec<f64>> {
        if group >= self.n_dg {
            return None;
        }
        Some(
            self.decay_heat
                .iter()
                .skip(group)
                .step_by(self.n_dg)
                .copied()
                .collect(),
        )
    }
}
