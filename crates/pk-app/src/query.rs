//! Query helpers for extracting data from loaded runs.

use std::io::Write;

use pk_neutronics::{GroupConstants, Isotope, Neutronics, Spectrum};
use pk_results::TimeseriesRecord;

use crate::error::{AppError, AppResult};

/// Summary of a run's time range and data.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub time_range: (f64, f64),
    pub record_count: usize,
    pub component_count: usize,
    pub peak_power: f64,
    pub peak_power_time_s: f64,
    pub final_power: f64,
}

/// Get run summary from timeseries records.
pub fn get_run_summary(records: &[TimeseriesRecord]) -> AppResult<RunSummary> {
    let (first, last) = match (records.first(), records.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(AppError::InvalidInput("No records in run".to_string())),
    };

    let peak = records
        .iter()
        .fold(first, |best, r| if r.power > best.power { r } else { best });

    Ok(RunSummary {
        time_range: (first.time_s, last.time_s),
        record_count: records.len(),
        component_count: first.components.len(),
        peak_power: peak.power,
        peak_power_time_s: peak.time_s,
        final_power: last.power,
    })
}

/// List all component names in a run.
pub fn list_component_names(records: &[TimeseriesRecord]) -> Vec<String> {
    records
        .first()
        .map(|r| r.components.iter().map(|c| c.name.clone()).collect())
        .unwrap_or_default()
}

/// Extract `(time_s, value)` pairs for a named series.
///
/// Accepted names: `power`, `reactivity`, `thermal_power`, `T:<component>`,
/// `precursor:<group>` and `decay_heat:<group>` (groups are 0-based).
pub fn extract_series(records: &[TimeseriesRecord], series: &str) -> AppResult<Vec<(f64, f64)>> {
    let pick: Box<dyn Fn(&TimeseriesRecord) -> Option<f64>> = match series.split_once(':') {
        None => match series {
            "power" => Box::new(|r: &TimeseriesRecord| Some(r.power)),
            "reactivity" | "rho" => Box::new(|r: &TimeseriesRecord| Some(r.reactivity)),
            "thermal_power" => Box::new(|r: &TimeseriesRecord| Some(r.thermal_power)),
            _ => return Err(unknown_series(series)),
        },
        Some(("T" | "temperature", name)) => {
            let name = name.to_string();
            Box::new(move |r: &TimeseriesRecord| {
                r.components.iter().find(|c| c.name == name).map(|c| c.t_k)
            })
        }
        Some(("precursor", group)) => {
            let g = parse_group(series, group)?;
            Box::new(move |r: &TimeseriesRecord| r.precursors.get(g).copied())
        }
        Some(("decay_heat", group)) => {
            let g = parse_group(series, group)?;
            Box::new(move |r: &TimeseriesRecord| r.decay_heat.get(g).copied())
        }
        Some(_) => return Err(unknown_series(series)),
    };

    let values: Vec<(f64, f64)> = records
        .iter()
        .filter_map(|r| pick(r).map(|v| (r.time_s, v)))
        .collect();

    if values.is_empty() && !records.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "Series '{}' has no data in this run",
            series
        )));
    }
    Ok(values)
}

fn parse_group(series: &str, group: &str) -> AppResult<usize> {
    group
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("Bad group index in series '{}'", series)))
}

fn unknown_series(series: &str) -> AppError {
    AppError::InvalidInput(format!("Unknown series: {}", series))
}

/// Write a series as two-column CSV with a `time_s,<label>` header.
pub fn write_series_csv<W: Write>(
    out: &mut W,
    label: &str,
    series: &[(f64, f64)],
) -> AppResult<()> {
    writeln!(out, "time_s,{}", label)?;
    for (t, v) in series {
        writeln!(out, "{},{}", t, v)?;
    }
    Ok(())
}

/// Collapsed kinetics constants for one isotope/spectrum/group-count choice.
#[derive(Debug, Clone)]
pub struct KineticsTable {
    pub isotope: Isotope,
    pub spectrum: Spectrum,
    pub generation_time_s: f64,
    pub beta_total: f64,
    pub precursors: GroupConstants,
    pub decay_heat: GroupConstants,
}

pub fn kinetics_table(
    isotope: &str,
    spectrum: &str,
    precursor_groups: usize,
    decay_heat_groups: usize,
) -> AppResult<KineticsTable> {
    let isotope: Isotope = isotope.parse()?;
    let spectrum: Spectrum = spectrum.parse()?;
    let kinetics = Neutronics::new(isotope, spectrum, precursor_groups, decay_heat_groups)?;

    Ok(KineticsTable {
        isotope,
        spectrum,
        generation_time_s: kinetics.generation_time().value,
        beta_total: kinetics.beta_total(),
        precursors: kinetics.precursor_constants().clone(),
        decay_heat: kinetics.decay_heat_constants().clone(),
    })
}
