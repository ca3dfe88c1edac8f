use std::collections::BTreeMap;

use serde::Serialize;

/// Flat metadata summary of a generated model, consumed by the external
/// reporting layer.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub total_cells: usize,
    pub lx: f64,
    pub ly: f64,
    pub lz: f64,
    pub fault_planes_x: usize,
    pub fault_planes_y: usize,
    /// Fracture planes per meter along each axis.
    pub fracture_density_x: f64,
    pub fracture_density_y: f64,
    pub pore_volume: f64,
    pub avg_porosity: f64,
    pub avg_permeability: f64,
    /// Shallowest and deepest ZCORN value, after throw application.
    pub top: f64,
    pub bottom: f64,
}

impl ModelInfo {
    /// Plain key-to-scalar map form of the summary.
    pub fn to_map(&self) -> BTreeMap<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        }
    }
}
