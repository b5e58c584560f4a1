//! Network validation logic.

use std::collections::{HashMap, HashSet};

use pk_core::numeric::{Tolerances, nearly_equal};

use crate::component::ThermalComponent;
use crate::error::{ThermalError, ThermalResult};

/// Tolerance on h·A when matching reciprocal links.
const RECIPROCAL_TOL: Tolerances = Tolerances { abs: 0.0, rel: 1e-9 };

/// Validate component parameters and name uniqueness; return the name index.
pub(crate) fn validate_components(
    components: &[ThermalComponent],
) -> ThermalResult<HashMap<String, usize>> {
    if components.is_empty() {
        return Err(ThermalError::Empty);
    }

    let mut index = HashMap::with_capacity(components.len());
    for (i, comp) in components.iter().enumerate() {
        comp.check_parameters()?;
        if index.insert(comp.name().to_string(), i).is_some() {
            return Err(ThermalError::DuplicateName {
                name: comp.name().to_string(),
            });
        }
    }
    Ok(index)
}

/// Validate that every link resolves and is declared symmetrically with the same h·A.
pub(crate) fn validate_links(
    components: &[ThermalComponent],
    index: &HashMap<String, usize>,
) -> ThermalResult<()> {
    for comp in components {
        let mut seen = HashSet::new();
        for link in comp.links() {
            if link.neighbor == comp.name() {
                return Err(ThermalError::SelfLink {
                    component: comp.name().to_string(),
                });
            }
            if !seen.insert(link.neighbor.as_str()) {
                return Err(ThermalError::DuplicateLink {
                    component: comp.name().to_string(),
                    neighbor: link.neighbor.clone(),
                });
            }
            let Some(&j) = index.get(&link.neighbor) else {
                return Err(ThermalError::UnknownNeighbor {
                    component: comp.name().to_string(),
                    neighbor: link.neighbor.clone(),
                });
            };

            let neighbor = &components[j];
            let Some(back) = neighbor.links().iter().find(|l| l.neighbor == comp.name()) else {
                return Err(ThermalError::MissingReciprocal {
                    component: comp.name().to_string(),
                    neighbor: neighbor.name().to_string(),
                });
            };

            let forward = link.conductance_w_per_k();
            let reverse = back.conductance_w_per_k();
            if !nearly_equal(forward, reverse, RECIPROCAL_TOL) {
                return Err(ThermalError::AsymmetricLink {
                    component: comp.name().to_string(),
                    neighbor: neighbor.name().to_string(),
                    forward_w_per_k: forward,
                    reverse_w_per_k: reverse,
                });
            }
        }
    }
    Ok(())
}
