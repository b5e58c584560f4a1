//! Built-in materials for reactor scenarios.

use crate::density::DensityModel;
use crate::error::{MaterialError, MaterialResult};
use crate::material::Material;
use pk_core::units::{j_per_kgk, kg_per_m3, w_per_mk};

#[derive(Debug, Clone, Copy)]
pub struct MaterialCatalogEntry {
    pub canonical_id: &'static str,
    pub display_name: &'static str,
    pub aliases: &'static [&'static str],
    build: fn() -> MaterialResult<Material>,
}

impl MaterialCatalogEntry {
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return true;
        }

        self.canonical_id.to_ascii_lowercase().contains(&query)
            || self.display_name.to_ascii_lowercase().contains(&query)
            || self
                .aliases
                .iter()
                .any(|alias| alias.to_ascii_lowercase().contains(&query))
    }

    fn is_exact(&self, id: &str) -> bool {
        let id = id.trim();
        self.canonical_id.eq_ignore_ascii_case(id)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(id))
    }

    pub fn build(&self) -> MaterialResult<Material> {
        (self.build)()
    }
}

const MATERIAL_CATALOG: [MaterialCatalogEntry; 6] = [
    MaterialCatalogEntry {
        canonical_id: "uzrh",
        display_name: "U-ZrH fuel (U0.3ZrH1.6)",
        aliases: &["triga fuel", "uranium zirconium hydride"],
        build: triga_uzrh,
    },
    MaterialCatalogEntry {
        canonical_id: "water",
        display_name: "Light water",
        aliases: &["h2o", "light water"],
        build: water,
    },
    MaterialCatalogEntry {
        canonical_id: "flibe",
        display_name: "FLiBe molten salt",
        aliases: &["2lif-bef2", "li2bef4"],
        build: flibe,
    },
    MaterialCatalogEntry {
        canonical_id: "sodium",
        display_name: "Liquid sodium",
        aliases: &["na"],
        build: sodium,
    },
    MaterialCatalogEntry {
        canonical_id: "graphite",
        display_name: "Nuclear graphite",
        aliases: &["c", "moderator"],
        build: graphite,
    },
    MaterialCatalogEntry {
        canonical_id: "stainless_steel",
        display_name: "Stainless steel 316",
        aliases: &["ss316", "steel"],
        build: stainless_steel,
    },
];

pub fn material_catalog() -> &'static [MaterialCatalogEntry] {
    &MATERIAL_CATALOG
}

pub fn filter_material_catalog(query: &str) -> Vec<MaterialCatalogEntry> {
    MATERIAL_CATALOG
        .iter()
        .copied()
        .filter(|entry| entry.matches_query(query))
        .collect()
}

/// Build the catalog material with id (or alias) `id`.
pub fn lookup(id: &str) -> MaterialResult<Material> {
    MATERIAL_CATALOG
        .iter()
        .find(|entry| entry.is_exact(id))
        .ok_or_else(|| MaterialError::UnknownMaterial { id: id.to_string() })?
        .build()
}

fn triga_uzrh() -> MaterialResult<Material> {
    uzrh(1.6, 0.45)
}

/// Uranium-zirconium hydride fuel, `U_y ZrH_x`.
///
/// `x` is the H/Zr atom ratio and `w_u` the uranium weight fraction. Density follows
/// the hydride correlation of Olander et al. mixed with metallic uranium by volume;
/// specific heat is the room-temperature hydride value from the same survey.
pub fn uzrh(x: f64, w_u: f64) -> MaterialResult<Material> {
    if !(x.is_finite() && x > 0.0) {
        return Err(MaterialError::InvalidArg {
            what: "H/Zr ratio must be positive",
        });
    }
    if !(0.0..1.0).contains(&w_u) {
        return Err(MaterialError::InvalidArg {
            what: "uranium weight fraction must lie in [0, 1)",
        });
    }
    // g/cm³
    const RHO_U: f64 = 19.9;
    let rho_zrh = if x < 1.6 {
        1.0 / (0.1540 + 0.0145 * x)
    } else {
        1.0 / (0.1706 + 0.0042 * x)
    };
    let rho_g_cm3 = 1.0 / (w_u / RHO_U + (1.0 - w_u) / rho_zrh);

    Material::new(
        "uzrh",
        w_per_mk(18.0),
        j_per_kgk(340.0),
        DensityModel::constant(kg_per_m3(rho_g_cm3 * 1000.0)),
    )
}

pub fn water() -> MaterialResult<Material> {
    Material::new(
        "water",
        w_per_mk(0.58),
        j_per_kgk(4181.3),
        DensityModel::constant(kg_per_m3(1000.0)),
    )
}

pub fn flibe() -> MaterialResult<Material> {
    Material::new(
        "flibe",
        w_per_mk(1.1),
        j_per_kgk(2386.0),
        DensityModel::linear(kg_per_m3(2413.0), -0.488),
    )
}

pub fn sodium() -> MaterialResult<Material> {
    Material::new(
        "sodium",
        w_per_mk(62.0),
        j_per_kgk(1270.0),
        DensityModel::linear(kg_per_m3(1014.0), -0.235),
    )
}

pub fn graphite() -> MaterialResult<Material> {
    Material::new(
        "graphite",
        w_per_mk(60.0),
        j_per_kgk(1650.0),
        DensityModel::constant(kg_per_m3(1740.0)),
    )
}

pub fn stainless_steel() -> MaterialResult<Material> {
    Material::new(
        "stainless_steel",
        w_per_mk(16.2),
        j_per_kgk(500.0),
        DensityModel::constant(kg_per_m3(8000.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pk_core::units::k;
    use std::collections::HashSet;

    #[test]
    fn canonical_ids_are_unique() {
        let mut seen = HashSet::new();
        for entry in material_catalog() {
            assert!(
                seen.insert(entry.canonical_id),
                "duplicate canonical id: {}",
                entry.canonical_id
            );
        }
    }

    #[test]
    fn every_entry_builds() {
        for entry in material_catalog() {
            let material = entry.build().unwrap();
            assert_eq!(material.name(), entry.canonical_id);
            assert!(material.density(k(600.0)).unwrap().value > 0.0);
        }
    }

    #[test]
    fn lookup_by_alias_is_case_insensitive() {
        assert_eq!(lookup("H2O").unwrap().name(), "water");
        assert_eq!(lookup("SS316").unwrap().name(), "stainless_steel");
        assert!(matches!(
            lookup("corium"),
            Err(MaterialError::UnknownMaterial { .. })
        ));
    }

    #[test]
    fn search_finds_fuel() {
        let results = filter_material_catalog("triga");
        assert!(results.iter().any(|entry| entry.canonical_id == "uzrh"));
        assert_eq!(filter_material_catalog("").len(), material_catalog().len());
    }

    #[test]
    fn uzrh_density_is_physical() {
        let fuel = uzrh(1.6, 0.45).unwrap();
        let rho = fuel.density(k(500.0)).unwrap().value;
        // between the hydride (~5.6 g/cm³) and uranium metal (19.9 g/cm³)
        assert!(rho > 5_600.0 && rho < 19_900.0, "rho = {rho}");

        let lean = uzrh(1.6, 0.085).unwrap().density(k(500.0)).unwrap().value;
        assert!(lean < rho);
        assert!(uzrh(1.6, 1.0).is_err());
        assert!(uzrh(0.0, 0.2).is_err());
    }

    #[test]
    fn uzrh_heat_capacity_is_the_hydride_value() {
        let fuel = uzrh(1.6, 0.45).unwrap();
        let pool = water().unwrap();
        assert_eq!(fuel.specific_heat().value, 340.0);
        assert!(fuel.specific_heat().value < pool.specific_heat().value / 10.0);
    }
}
