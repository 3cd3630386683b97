use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::EngineError;

/// Name reserved for the cell that becomes the player body.
pub const PLAYER_MATERIAL: &str = "Player";

/// Stable integer identity of a material (index into the registry).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub u16);

impl MaterialId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Mass per unit area [kg/m^2]
    pub density: f32,
    /// Label color for palette UIs (RGB, 0..1)
    #[serde(default)]
    pub color: [f32; 3],
}

impl Material {
    pub fn new(name: &str, density: f32, color: [f32; 3]) -> Self {
        Self { name: name.to_string(), density, color }
    }
}

#[derive(Deserialize)]
struct BundleRoot {
    materials: Vec<Material>,
}

#[derive(Serialize)]
struct ManifestEntry<'a> {
    id: u16,
    name: &'a str,
    density: f32,
    color: [f32; 3],
    player: bool,
}

/// Ordered set of materials the grid can be painted with.
///
/// Ids are assigned in bundle order and never change for the lifetime of
/// the registry, so material pairs can be keyed by id instead of identity.
#[derive(Clone, Debug)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
    name_to_id: HashMap<String, MaterialId>,
    player: Option<MaterialId>,
}

impl MaterialRegistry {
    pub fn from_defaults() -> Self {
        let materials = vec![
            Material::new("Rock", 3500.0, [0.38, 0.38, 0.38]),
            Material::new("Soil", 1500.0, [0.25, 0.50, 0.25]),
            Material::new("Concrete", 2400.0, [0.75, 0.75, 0.75]),
            Material::new("Wood", 600.0, [0.80, 0.45, 0.10]),
            Material::new("Steel", 8050.0, [0.50, 0.63, 0.70]),
            Material::new("Water", 1000.0, [0.29, 0.22, 1.00]),
            Material::new(PLAYER_MATERIAL, 1000.0, [1.00, 0.00, 0.50]),
        ];
        // Defaults are valid by construction.
        Self::from_materials(materials).unwrap_or_else(|_| Self::empty())
    }

    pub fn from_bundle_json(json: &str) -> Result<Self, EngineError> {
        let bundle: BundleRoot = serde_json::from_str(json)?;
        Self::from_materials(bundle.materials)
    }

    pub fn from_materials(materials: Vec<Material>) -> Result<Self, EngineError> {
        if materials.is_empty() {
            return Err(EngineError::InvalidConfiguration {
                reason: "material bundle is empty".to_string(),
            });
        }
        if materials.len() > u16::MAX as usize {
            return Err(EngineError::InvalidConfiguration {
                reason: format!("too many materials: {}", materials.len()),
            });
        }

        let mut name_to_id = HashMap::with_capacity(materials.len());
        let mut player = None;
        for (idx, m) in materials.iter().enumerate() {
            if !(m.density > 0.0) {
                return Err(EngineError::InvalidConfiguration {
                    reason: format!("material {} has non-positive density {}", m.name, m.density),
                });
            }
            let id = MaterialId(idx as u16);
            if name_to_id.insert(m.name.clone(), id).is_some() {
                return Err(EngineError::InvalidConfiguration {
                    reason: format!("duplicate material name {}", m.name),
                });
            }
            if m.name == PLAYER_MATERIAL {
                player = Some(id);
            }
        }

        log::debug!("material registry loaded: {} materials", materials.len());
        Ok(Self { materials, name_to_id, player })
    }

    fn empty() -> Self {
        Self { materials: Vec::new(), name_to_id: HashMap::new(), player: None }
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.index())
    }

    pub fn contains(&self, id: MaterialId) -> bool {
        id.index() < self.materials.len()
    }

    pub fn id_by_name(&self, name: &str) -> Option<MaterialId> {
        self.name_to_id.get(name).copied()
    }

    pub fn player_id(&self) -> Option<MaterialId> {
        self.player
    }

    #[inline]
    pub fn is_player(&self, id: MaterialId) -> bool {
        self.player == Some(id)
    }

    /// Next material in palette order, wrapping at the end.
    pub fn next_id(&self, id: MaterialId) -> MaterialId {
        let n = self.materials.len().max(1);
        MaterialId(((id.index() + 1) % n) as u16)
    }

    /// Previous material in palette order, wrapping at the start.
    pub fn prev_id(&self, id: MaterialId) -> MaterialId {
        let n = self.materials.len().max(1);
        MaterialId(((id.index() + n - 1) % n) as u16)
    }

    pub fn manifest_json(&self) -> String {
        let entries: Vec<ManifestEntry> = self
            .materials
            .iter()
            .enumerate()
            .map(|(idx, m)| ManifestEntry {
                id: idx as u16,
                name: &m.name,
                density: m.density,
                color: m.color,
                player: self.player == Some(MaterialId(idx as u16)),
            })
            .collect();
        serde_json::to_string(&entries).unwrap_or_else(|_| "[]".to_string())
    }
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        Self::from_defaults()
    }
}
