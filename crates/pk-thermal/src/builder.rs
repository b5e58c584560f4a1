//! Incremental network builder.

use crate::component::{ComponentId, ThermalComponent};
use crate::error::ThermalResult;
use crate::network::ThermalNetwork;
use crate::validate;

/// Builder for a thermal network.
///
/// Components are added in order (their arena index is their insertion order),
/// then `build()` validates parameters and link symmetry and freezes the network.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    components: Vec<ThermalComponent>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component and return the id it will have in the built network.
    pub fn add(&mut self, component: ThermalComponent) -> ComponentId {
        let id = ComponentId::from_index(self.components.len());
        self.components.push(component);
        id
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Validate and freeze.
    pub fn build(self) -> ThermalResult<ThermalNetwork> {
        let index = validate::validate_components(&self.components)?;
        validate::validate_links(&self.components, &index)?;
        Ok(ThermalNetwork::from_validated(self.components, index))
    }
}
