//! Scenario validation logic.

use std::collections::HashSet;

use pk_neutronics::data::{self, DECAY_HEAT_GROUPS};
use pk_neutronics::{Isotope, Spectrum};

use crate::schema::{ComponentDef, DensityDef, MaterialDef, RemovalScheduleDef, Scenario};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported feature: {feature} - {reason}")]
    Unsupported { feature: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: impl Into<String>, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

fn finite(field: impl Into<String>, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, value, "must be finite"))
    }
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }
    if scenario.name.trim().is_empty() {
        return Err(invalid("name", "", "must not be empty"));
    }

    let time = &scenario.time;
    finite("time.t0_s", time.t0_s)?;
    finite("time.tf_s", time.tf_s)?;
    positive("time.dt_s", time.dt_s)?;
    if time.tf_s <= time.t0_s {
        return Err(invalid("time.tf_s", time.tf_s, "must exceed t0_s"));
    }
    if !(time.t0_s..=time.tf_s).contains(&time.t_feedback_s) {
        return Err(invalid(
            "time.t_feedback_s",
            time.t_feedback_s,
            "must lie in [t0_s, tf_s]",
        ));
    }

    validate_neutronics(scenario)?;

    scenario
        .reactivity
        .validate()
        .map_err(|e| invalid("reactivity", scenario.reactivity.shape(), &e.to_string()))?;

    if scenario.components.iter().any(|c| c.heat_generating) {
        positive("power_tot_w", scenario.power_tot_w)?;
    } else {
        finite("power_tot_w", scenario.power_tot_w)?;
    }

    let solver = &scenario.solver;
    positive("solver.rtol", solver.rtol)?;
    positive("solver.atol", solver.atol)?;
    if solver.max_substeps == 0 {
        return Err(invalid("solver.max_substeps", 0, "must be positive"));
    }
    if solver.rk4_substeps == 0 {
        return Err(invalid("solver.rk4_substeps", 0, "must be positive"));
    }

    validate_components(&scenario.components)
}

fn validate_neutronics(scenario: &Scenario) -> Result<(), ValidationError> {
    let n = &scenario.neutronics;
    let isotope: Isotope = n
        .isotope
        .parse()
        .map_err(|_| invalid("neutronics.isotope", &n.isotope, "unknown isotope"))?;
    let spectrum: Spectrum = n
        .spectrum
        .parse()
        .map_err(|_| invalid("neutronics.spectrum", &n.spectrum, "unknown spectrum"))?;

    if !data::available_pairs().any(|pair| pair == (isotope, spectrum)) {
        return Err(ValidationError::Unsupported {
            feature: format!("{isotope} {spectrum}"),
            reason: "no delayed-neutron data for this isotope and spectrum".to_string(),
        });
    }
    if n.precursor_groups > data::DELAYED_NEUTRON_GROUPS {
        return Err(invalid(
            "neutronics.precursor_groups",
            n.precursor_groups,
            "exceeds the six-group table",
        ));
    }
    if n.decay_heat_groups > DECAY_HEAT_GROUPS {
        return Err(invalid(
            "neutronics.decay_heat_groups",
            n.decay_heat_groups,
            "exceeds the eleven-group table",
        ));
    }
    Ok(())
}

fn validate_components(components: &[ComponentDef]) -> Result<(), ValidationError> {
    if components.is_empty() {
        return Err(invalid("components", "[]", "at least one component is required"));
    }

    let mut names = HashSet::new();
    for component in components {
        if !names.insert(component.name.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: component.name.clone(),
                context: "components".to_string(),
            });
        }
        validate_component(component)?;
    }

    // every link must be declared from both ends
    let links: HashSet<(&str, &str)> = components
        .iter()
        .flat_map(|c| {
            c.convection
                .iter()
                .map(move |l| (c.name.as_str(), l.neighbor.as_str()))
        })
        .collect();
    for component in components {
        for link in &component.convection {
            if !names.contains(link.neighbor.as_str()) {
                return Err(ValidationError::MissingReference {
                    id: link.neighbor.clone(),
                    context: format!("component '{}' convection", component.name),
                });
            }
            if !links.contains(&(link.neighbor.as_str(), component.name.as_str())) {
                return Err(ValidationError::MissingReference {
                    id: component.name.clone(),
                    context: format!("component '{}' convection", link.neighbor),
                });
            }
        }
    }
    Ok(())
}

fn validate_component(component: &ComponentDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("components.{}.{}", component.name, name);

    if component.name.trim().is_empty() {
        return Err(invalid("components.name", "", "must not be empty"));
    }
    positive(field("volume_m3"), component.volume_m3)?;
    positive(field("t0_k"), component.t0_k)?;
    if let Some(alpha) = component.alpha_pcm_per_k {
        finite(field("alpha_pcm_per_k"), alpha)?;
    }

    match &component.material {
        MaterialDef::Catalog { id } => {
            if pk_materials::lookup(id).is_err() {
                return Err(ValidationError::MissingReference {
                    id: id.clone(),
                    context: format!("component '{}' material catalog", component.name),
                });
            }
        }
        MaterialDef::Custom {
            k_w_mk,
            cp_j_kgk,
            density,
            ..
        } => {
            positive(field("material.k_w_mk"), *k_w_mk)?;
            positive(field("material.cp_j_kgk"), *cp_j_kgk)?;
            match density {
                DensityDef::Constant { rho_kg_m3 } => {
                    positive(field("material.density.rho_kg_m3"), *rho_kg_m3)?
                }
                DensityDef::Linear {
                    a_kg_m3,
                    b_kg_m3_per_k,
                } => {
                    finite(field("material.density.a_kg_m3"), *a_kg_m3)?;
                    finite(field("material.density.b_kg_m3_per_k"), *b_kg_m3_per_k)?;
                }
                DensityDef::Polynomial { coeffs } => {
                    if coeffs.is_empty() || coeffs.iter().any(|c| !c.is_finite()) {
                        return Err(invalid(
                            field("material.density.coeffs"),
                            format!("{coeffs:?}"),
                            "must be a non-empty list of finite numbers",
                        ));
                    }
                }
            }
        }
    }

    let mut neighbors = HashSet::new();
    for link in &component.convection {
        if link.neighbor == component.name {
            return Err(invalid(field("convection"), &link.neighbor, "self link"));
        }
        if !neighbors.insert(link.neighbor.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: link.neighbor.clone(),
                context: format!("component '{}' convection", component.name),
            });
        }
        positive(field("convection.h_w_m2k"), link.h_w_m2k)?;
        positive(field("convection.area_m2"), link.area_m2)?;
    }

    if let Some(removal) = &component.heat_removal {
        positive(field("heat_removal.t_in_k"), removal.t_in_k)?;
        positive(field("heat_removal.h_w_m2k"), removal.h_w_m2k)?;
        positive(field("heat_removal.area_m2"), removal.area_m2)?;
        let effs = match removal.schedule {
            RemovalScheduleDef::Constant { efficiency } => [efficiency, efficiency],
            RemovalScheduleDef::Step {
                eff_init,
                eff_final,
                ..
            } => [eff_init, eff_final],
        };
        if let Some(eff) = effs.iter().find(|e| !(0.0..=1.0).contains(*e)) {
            return Err(invalid(
                field("heat_removal.schedule"),
                eff,
                "efficiency must lie in [0, 1]",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;
    use pk_reactivity::ReactivityInsertion;

    fn component(name: &str, neighbor: Option<&str>) -> ComponentDef {
        ComponentDef {
            name: name.to_string(),
            material: MaterialDef::Catalog {
                id: "water".to_string(),
            },
            volume_m3: 1.0,
            t0_k: 300.0,
            heat_generating: false,
            alpha_pcm_per_k: None,
            convection: neighbor
                .map(|n| ConvectionDef {
                    neighbor: n.to_string(),
                    h_w_m2k: 100.0,
                    area_m2: 1.0,
                })
                .into_iter()
                .collect(),
            heat_removal: None,
        }
    }

    fn scenario() -> Scenario {
        Scenario {
            version: 1,
            name: "pair".to_string(),
            time: TimeDef {
                t0_s: 0.0,
                tf_s: 1.0,
                dt_s: 0.01,
                t_feedback_s: 0.5,
            },
            neutronics: NeutronicsDef {
                isotope: "u235".to_string(),
                spectrum: "thermal".to_string(),
                precursor_groups: 6,
                decay_heat_groups: 0,
                feedback: true,
                precursor_init: PrecursorInitDef::Zero,
            },
            reactivity: ReactivityInsertion::default(),
            power_tot_w: 1000.0,
            solver: SolverDef::default(),
            components: vec![component("a", Some("b")), component("b", Some("a"))],
        }
    }

    #[test]
    fn valid_scenario_passes() {
        validate_scenario(&scenario()).unwrap();
    }

    #[test]
    fn future_version_rejected() {
        let mut s = scenario();
        s.version = 2;
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::UnsupportedVersion { version: 2 })
        ));
    }

    #[test]
    fn missing_reciprocal_link_rejected() {
        let mut s = scenario();
        s.components[1].convection.clear();
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn unknown_neighbor_and_material_rejected() {
        let mut s = scenario();
        s.components[0].convection[0].neighbor = "ghost".to_string();
        assert!(validate_scenario(&s).is_err());

        let mut s = scenario();
        s.components[0].material = MaterialDef::Catalog {
            id: "unobtainium".to_string(),
        };
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn group_counts_and_data_checked() {
        let mut s = scenario();
        s.neutronics.precursor_groups = 7;
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::InvalidValue { .. })
        ));

        let mut s = scenario();
        s.neutronics.isotope = "u238".to_string();
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::Unsupported { .. })
        ));
    }

    #[test]
    fn time_grid_checked() {
        let mut s = scenario();
        s.time.tf_s = 0.0;
        assert!(validate_scenario(&s).is_err());

        let mut s = scenario();
        s.time.t_feedback_s = 2.0;
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn bad_insertion_window_rejected() {
        let mut s = scenario();
        s.reactivity = ReactivityInsertion::Impulse {
            t_start: 2.0,
            t_end: 1.0,
            rho_init: 0.0,
            rho_max: 0.001,
        };
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut s = scenario();
        s.components.push(component("a", None));
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::DuplicateId { .. })
        ));
    }
}
