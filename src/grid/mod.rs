//! The sugar-cube model: a fractured, optionally vuggy carbonate grid built
//! from geometric and statistical parameters, exported as a corner-point
//! grid.
//!
//! Construction order is fixed: the constructor partitions index space and
//! builds the pillar mesh and the fracture/streak tagging, after which the
//! setters may run in any order. Vug sampling always sees finalized fracture
//! and streak arrays. The model is single-owner and not thread safe.

pub mod fracture_planes;
pub mod index_geometry;
pub mod mesh;
pub mod properties;
pub mod vugs;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Local;
use ndarray::Array3;

use crate::constants::{BACKGROUND, VUG_CATEGORY_COUNT};
use crate::error::{GridError, GridResult};
use crate::grdecl::{self, Throw};
use crate::report::ModelInfo;

use fracture_planes::{FaultPlaneFractions, tag_fracture_planes};
use index_geometry::{
    LayerStack, StreakSpec, axis_total_cells, build_layer_stack, fracture_start_indices,
};
use mesh::{Mesh, MeshParams, build_mesh};
use properties::{
    FractureProperty, LayerProperty, PropertyKind, VugValue, distribute, distribute_int,
};
use vugs::{VugParams, VugProperties, sample_vugs};

/// Constructor inputs, consumed once at model creation.
#[derive(Debug, Clone)]
pub struct ModelProps {
    /// Matrix block widths (cells) along X and Y.
    pub matrix_x: Vec<usize>,
    pub matrix_y: Vec<usize>,
    /// Background layer count along Z.
    pub nz: usize,
    /// Background cell sizes.
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub streaks: StreakSpec,
    /// Physical thickness of one fracture cell.
    pub fracture_thickness: f64,
    /// Cells per fracture slab.
    pub fracture_cells: usize,
    /// Place fracture slabs at both extremes of each axis.
    pub boundary_fracture: bool,
    pub mesh: MeshParams,
    /// Per-plane extent fractions; `None` means full-extent planes.
    pub fracture_x: Option<FaultPlaneFractions>,
    pub fracture_y: Option<FaultPlaneFractions>,
    pub seed: u64,
}

/// The grid model. Owns every array and property table; collaborators only
/// see the export files and the metadata summary.
pub struct Model {
    nx: usize,
    ny: usize,
    nz: usize,
    dx_cells: Vec<f64>,
    dy_cells: Vec<f64>,
    layer_stack: LayerStack,
    x_fracture_starts: Vec<usize>,
    y_fracture_starts: Vec<usize>,
    mesh: Mesh,
    streak_count: usize,
    streak_idx: Array3<i32>,
    layer_idx: Array3<i32>,
    fracture_idx: Array3<i32>,
    vug_idx: Array3<i32>,
    layer_props: HashMap<PropertyKind, LayerProperty>,
    fracture_props: HashMap<PropertyKind, FractureProperty>,
    vug_props: Option<[VugProperties; VUG_CATEGORY_COUNT]>,
    throws: Vec<Throw>,
    seed: u64,
}

impl Model {
    pub fn new(props: ModelProps) -> GridResult<Model> {
        let nx = axis_total_cells(&props.matrix_x, props.fracture_cells, props.boundary_fracture);
        let ny = axis_total_cells(&props.matrix_y, props.fracture_cells, props.boundary_fracture);
        let x_fracture_starts = fracture_start_indices(
            &props.matrix_x,
            props.fracture_cells,
            props.boundary_fracture,
        );
        let y_fracture_starts = fracture_start_indices(
            &props.matrix_y,
            props.fracture_cells,
            props.boundary_fracture,
        );

        let layer_stack = build_layer_stack(props.nz, props.dz, &props.streaks)?;
        let nz = layer_stack.nz();

        let mut dx_cells = vec![props.dx; nx];
        for &s in &x_fracture_starts {
            for c in dx_cells.iter_mut().skip(s).take(props.fracture_cells) {
                *c = props.fracture_thickness;
            }
        }
        let mut dy_cells = vec![props.dy; ny];
        for &s in &y_fracture_starts {
            for c in dy_cells.iter_mut().skip(s).take(props.fracture_cells) {
                *c = props.fracture_thickness;
            }
        }

        let mesh = build_mesh(&dx_cells, &dy_cells, &layer_stack.dz_per_k, &props.mesh);

        // streak and layer classification
        let streak_count = props.streaks.count();
        let mut streak_idx = Array3::from_elem((nx, ny, nz), BACKGROUND);
        for k in 0..nz {
            let s = layer_stack.prts[k];
            if s == BACKGROUND {
                continue;
            }
            let rect = match props.streaks.rect_of(s as usize) {
                Some(r) => {
                    if r[0] > r[1] || r[2] > r[3] || r[1] >= nx || r[3] >= ny {
                        return Err(GridError::invalid_streak(
                            s as usize,
                            format!(
                                "box [{}..{}, {}..{}] does not fit {} x {} grid",
                                r[0], r[1], r[2], r[3], nx, ny
                            ),
                        ));
                    }
                    r
                }
                None => [0, nx - 1, 0, ny - 1],
            };
            for i in rect[0]..=rect[1] {
                for j in rect[2]..=rect[3] {
                    streak_idx[[i, j, k]] = s;
                }
            }
        }

        let layer_of_k = layer_stack.layer_of_k();
        let mut layer_idx = Array3::zeros((nx, ny, nz));
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    layer_idx[[i, j, k]] = layer_of_k[k];
                }
            }
        }

        let x_fractions = props
            .fracture_x
            .unwrap_or_else(|| FaultPlaneFractions::full(x_fracture_starts.len()));
        let y_fractions = props
            .fracture_y
            .unwrap_or_else(|| FaultPlaneFractions::full(y_fracture_starts.len()));
        let mut fracture_idx = Array3::zeros((nx, ny, nz));
        tag_fracture_planes(
            &mut fracture_idx,
            &x_fracture_starts,
            &y_fracture_starts,
            props.fracture_cells,
            &x_fractions,
            &y_fractions,
            &mesh.y_local,
            &mesh.x_local,
            &mesh.z_local,
        )?;

        Ok(Model {
            nx,
            ny,
            nz,
            dx_cells,
            dy_cells,
            layer_stack,
            x_fracture_starts,
            y_fracture_starts,
            mesh,
            streak_count,
            streak_idx,
            layer_idx,
            fracture_idx,
            vug_idx: Array3::zeros((nx, ny, nz)),
            layer_props: HashMap::new(),
            fracture_props: HashMap::new(),
            vug_props: None,
            throws: Vec::new(),
            seed: props.seed,
        })
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn nz(&self) -> usize {
        self.nz
    }

    pub fn lx(&self) -> f64 {
        self.mesh.lx()
    }

    pub fn ly(&self) -> f64 {
        self.mesh.ly()
    }

    pub fn lz(&self) -> f64 {
        self.mesh.lz()
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn streak_idx(&self) -> &Array3<i32> {
        &self.streak_idx
    }

    pub fn layer_idx(&self) -> &Array3<i32> {
        &self.layer_idx
    }

    pub fn fracture_idx(&self) -> &Array3<i32> {
        &self.fracture_idx
    }

    pub fn vug_idx(&self) -> &Array3<i32> {
        &self.vug_idx
    }

    /// Background and per-streak values for one keyword.
    pub fn set_layers_property(
        &mut self,
        kind: PropertyKind,
        matrix: f64,
        streaks: &[f64],
    ) -> GridResult<()> {
        if streaks.len() != self.streak_count {
            return Err(GridError::list_length_mismatch(
                format!("streak {} values", kind.as_str()),
                self.streak_count,
                streaks.len(),
            ));
        }
        self.layer_props.insert(
            kind,
            LayerProperty {
                matrix,
                streaks: streaks.to_vec(),
            },
        );
        Ok(())
    }

    /// One isotropic value for every fracture plane.
    pub fn set_fracture_property(&mut self, kind: PropertyKind, value: f64) {
        self.fracture_props
            .insert(kind, FractureProperty::Isotropic(value));
    }

    /// Per-plane values, separate for X- and Y-direction planes.
    pub fn set_fracture_anisotropy_property(
        &mut self,
        kind: PropertyKind,
        x_values: &[f64],
        y_values: &[f64],
    ) -> GridResult<()> {
        if x_values.len() != self.x_fracture_starts.len() {
            return Err(GridError::list_length_mismatch(
                format!("x-direction fracture {} values", kind.as_str()),
                self.x_fracture_starts.len(),
                x_values.len(),
            ));
        }
        if y_values.len() != self.y_fracture_starts.len() {
            return Err(GridError::list_length_mismatch(
                format!("y-direction fracture {} values", kind.as_str()),
                self.y_fracture_starts.len(),
                y_values.len(),
            ));
        }
        self.fracture_props.insert(
            kind,
            FractureProperty::Anisotropic {
                x: x_values.to_vec(),
                y: y_values.to_vec(),
            },
        );
        Ok(())
    }

    pub fn set_throws(&mut self, throws: Vec<Throw>) -> GridResult<()> {
        for t in &throws {
            if t.i1 > t.i2 || t.j1 > t.j2 || t.i2 >= self.nx || t.j2 >= self.ny {
                return Err(GridError::InvalidThrow {
                    i1: t.i1,
                    i2: t.i2,
                    j1: t.j1,
                    j2: t.j2,
                    nx: self.nx,
                    ny: self.ny,
                });
            }
        }
        self.throws = throws;
        Ok(())
    }

    pub fn clear_throws(&mut self) {
        self.throws.clear();
    }

    /// Run the vug sampler and keep the realized tags and sampled values.
    pub fn set_vug(&mut self, params: &VugParams) {
        let props = sample_vugs(
            &mut self.vug_idx,
            &self.streak_idx,
            &self.fracture_idx,
            self.streak_count,
            params,
            self.seed,
        );
        self.vug_props = Some(props);
    }

    /// Clear all vug tags and sampled values.
    pub fn remove_vug(&mut self) {
        self.vug_idx.fill(0);
        self.vug_props = None;
    }

    fn layer_value_for(&self, kind: PropertyKind) -> GridResult<&LayerProperty> {
        let fallback = match kind {
            PropertyKind::Permx | PropertyKind::Permy => Some(PropertyKind::Perm),
            _ => None,
        };
        self.layer_props
            .get(&kind)
            .or_else(|| fallback.and_then(|f| self.layer_props.get(&f)))
            .ok_or(GridError::MissingProperty {
                keyword: kind.as_str(),
                scope: "layer",
            })
    }

    fn fracture_value_for(&self, kind: PropertyKind) -> GridResult<&FractureProperty> {
        let fallback = match kind {
            PropertyKind::Permx | PropertyKind::Permy => Some(PropertyKind::Perm),
            _ => None,
        };
        self.fracture_props
            .get(&kind)
            .or_else(|| fallback.and_then(|f| self.fracture_props.get(&f)))
            .ok_or(GridError::MissingProperty {
                keyword: kind.as_str(),
                scope: "fracture",
            })
    }

    fn vug_values_for(&self, kind: PropertyKind) -> Option<[VugValue; VUG_CATEGORY_COUNT]> {
        let props = self.vug_props.as_ref()?;
        let value = |p: &VugProperties| match kind {
            PropertyKind::Poro => VugValue::Cells(p.porosity.clone()),
            PropertyKind::Perm | PropertyKind::Permx | PropertyKind::Permy => {
                VugValue::Cells(p.permeability.clone())
            }
            PropertyKind::Multx => VugValue::Scalar(p.multx),
            PropertyKind::Multy => VugValue::Scalar(p.multy),
            PropertyKind::Multpv => VugValue::Scalar(p.multpv),
        };
        Some([value(&props[0]), value(&props[1]), value(&props[2])])
    }

    /// Compose the dense array of one property from the zone classification
    /// and the stored per-category values.
    pub fn distribute_property(&self, kind: PropertyKind) -> GridResult<Array3<f64>> {
        let layer = self.layer_value_for(kind)?;
        let fracture = self.fracture_value_for(kind)?;
        let vug = self.vug_values_for(kind);
        distribute(
            &self.streak_idx,
            &self.vug_idx,
            &self.fracture_idx,
            layer.matrix,
            &layer.streaks,
            self.streak_count,
            vug.as_ref(),
            fracture,
        )
    }

    /// Integer region-style property, explicit dtype.
    pub fn distribute_int_property(
        &self,
        background: i32,
        streaks: &[i32],
        fracture: i32,
    ) -> GridResult<Array3<i32>> {
        distribute_int(
            &self.streak_idx,
            &self.fracture_idx,
            background,
            streaks,
            self.streak_count,
            fracture,
        )
    }

    fn multiplier_or_default(&self, kind: PropertyKind) -> GridResult<Array3<f64>> {
        if self.layer_props.contains_key(&kind) || self.fracture_props.contains_key(&kind) {
            let layer = self
                .layer_props
                .get(&kind)
                .cloned()
                .unwrap_or(LayerProperty {
                    matrix: 1.0,
                    streaks: vec![1.0; self.streak_count],
                });
            let fracture = self
                .fracture_props
                .get(&kind)
                .cloned()
                .unwrap_or(FractureProperty::Isotropic(1.0));
            distribute(
                &self.streak_idx,
                &self.vug_idx,
                &self.fracture_idx,
                layer.matrix,
                &layer.streaks,
                self.streak_count,
                self.vug_values_for(kind).as_ref(),
                &fracture,
            )
        } else {
            let mut out = Array3::from_elem((self.nx, self.ny, self.nz), 1.0);
            if let Some(values) = self.vug_values_for(kind) {
                // multipliers default to 1 everywhere except sampled vugs
                out = distribute(
                    &self.streak_idx,
                    &self.vug_idx,
                    &self.fracture_idx,
                    1.0,
                    &vec![1.0; self.streak_count],
                    self.streak_count,
                    Some(&values),
                    &FractureProperty::Isotropic(1.0),
                )?;
            }
            Ok(out)
        }
    }

    fn cell_volume(&self, i: usize, j: usize, k: usize) -> f64 {
        self.dx_cells[i] * self.dy_cells[j] * self.layer_stack.dz_per_k[k]
    }

    /// Pore volume, bulk-volume-weighted average porosity and permeability.
    pub fn statistics(&self) -> GridResult<(f64, f64, f64)> {
        let poro = self.distribute_property(PropertyKind::Poro)?;
        let permx = self.distribute_property(PropertyKind::Permx)?;
        let mut bulk = 0.0;
        let mut pore = 0.0;
        let mut perm_weighted = 0.0;
        for k in 0..self.nz {
            for j in 0..self.ny {
                for i in 0..self.nx {
                    let vol = self.cell_volume(i, j, k);
                    bulk += vol;
                    pore += poro[[i, j, k]] * vol;
                    perm_weighted += permx[[i, j, k]] * vol;
                }
            }
        }
        if bulk == 0.0 {
            return Ok((0.0, 0.0, 0.0));
        }
        Ok((pore, pore / bulk, perm_weighted / bulk))
    }

    /// Metadata summary for the reporting layer. Top and bottom reflect the
    /// throw-adjusted ZCORN extent.
    pub fn info(&self) -> GridResult<ModelInfo> {
        let (pore_volume, avg_porosity, avg_permeability) = self.statistics()?;
        let zcorn = grdecl::build_zcorn(&self.mesh.z_top, &self.layer_stack.dz_per_k, &self.throws);
        let top = zcorn.iter().cloned().fold(f64::INFINITY, f64::min);
        let bottom = zcorn.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let lx = self.lx();
        let ly = self.ly();
        Ok(ModelInfo {
            nx: self.nx,
            ny: self.ny,
            nz: self.nz,
            total_cells: self.nx * self.ny * self.nz,
            lx,
            ly,
            lz: self.lz(),
            fault_planes_x: self.x_fracture_starts.len(),
            fault_planes_y: self.y_fracture_starts.len(),
            fracture_density_x: if lx > 0.0 {
                self.x_fracture_starts.len() as f64 / lx
            } else {
                0.0
            },
            fracture_density_y: if ly > 0.0 {
                self.y_fracture_starts.len() as f64 / ly
            } else {
                0.0
            },
            pore_volume,
            avg_porosity,
            avg_permeability,
            top,
            bottom,
        })
    }

    /// Plain key-to-scalar form of [`Model::info`].
    pub fn dict_info(
        &self,
    ) -> GridResult<std::collections::BTreeMap<String, serde_json::Value>> {
        Ok(self.info()?.to_map())
    }

    fn write_header<W: Write>(&self, writer: &mut W, description: Option<&str>) -> GridResult<()> {
        writeln!(
            writer,
            "-- Generated by sugarcube-grid on {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(
            writer,
            "-- Fractured sugar-cube model, {} x {} x {} cells",
            self.nx, self.ny, self.nz
        )?;
        if let Some(text) = description {
            for line in text.lines() {
                writeln!(writer, "-- {}", line)?;
            }
        }
        writeln!(writer)?;
        Ok(())
    }

    /// Serialize the model to the corner-point interchange format:
    /// `SPECGRID`, `COORD`, `ZCORN`, then `PORO`, `PERMX` and the
    /// multiplier sections, all run-length encoded.
    pub fn export_grdecl(&self, path: &Path, description: Option<&str>) -> GridResult<()> {
        let poro = self.distribute_property(PropertyKind::Poro)?;
        let permx = self.distribute_property(PropertyKind::Permx)?;
        let multx = self.multiplier_or_default(PropertyKind::Multx)?;
        let multy = self.multiplier_or_default(PropertyKind::Multy)?;
        let multpv = self.multiplier_or_default(PropertyKind::Multpv)?;

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_header(&mut writer, description)?;

        writeln!(writer, "SPECGRID")?;
        writeln!(writer, " {} {} {} 1 F", self.nx, self.ny, self.nz)?;
        writeln!(writer, "/")?;
        writeln!(writer)?;

        grdecl::write_coord(&mut writer, &self.mesh.x, &self.mesh.y)?;

        let zcorn = grdecl::build_zcorn(&self.mesh.z_top, &self.layer_stack.dz_per_k, &self.throws);
        grdecl::write_section(&mut writer, "ZCORN", &zcorn)?;

        grdecl::write_section(&mut writer, "PORO", &grdecl::flatten_f(&poro))?;
        grdecl::write_section(&mut writer, "PERMX", &grdecl::flatten_f(&permx))?;
        grdecl::write_section(&mut writer, "MULTX", &grdecl::flatten_f(&multx))?;
        grdecl::write_section(&mut writer, "MULTY", &grdecl::flatten_f(&multy))?;
        grdecl::write_section(&mut writer, "MULTPV", &grdecl::flatten_f(&multpv))?;

        writer.flush()?;
        Ok(())
    }

    /// Write one property as a standalone run-length-encoded file.
    pub fn export_props(
        &self,
        path: &Path,
        kind: PropertyKind,
        description: Option<&str>,
    ) -> GridResult<()> {
        let array = self.distribute_property(kind)?;
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_header(&mut writer, description)?;
        grdecl::write_section(&mut writer, kind.as_str(), &grdecl::flatten_f(&array))?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_deviation;

    fn basic_props() -> ModelProps {
        ModelProps {
            matrix_x: vec![3, 3],
            matrix_y: vec![3, 3],
            nz: 5,
            dx: 10.0,
            dy: 10.0,
            dz: 2.0,
            streaks: StreakSpec::default(),
            fracture_thickness: 0.1,
            fracture_cells: 1,
            boundary_fracture: true,
            mesh: MeshParams {
                top: 2000.0,
                ..MeshParams::default()
            },
            fracture_x: None,
            fracture_y: None,
            seed: 12345,
        }
    }

    #[test]
    fn test_dimension_invariant() {
        let model = Model::new(basic_props()).unwrap();
        // sum(widths) + fracture_cells * (blocks + 1) with boundary fractures
        assert_eq!(model.nx(), 3 + 3 + 3);
        assert_eq!(model.ny(), 9);
        assert_eq!(model.nz(), 5);
    }

    #[test]
    fn test_extent_round_trip() {
        let model = Model::new(basic_props()).unwrap();
        // 6 matrix cells of 10 m plus 3 fracture cells of 0.1 m
        assert!((model.lx() - 60.3).abs() < 1e-9);
        assert!((model.ly() - 60.3).abs() < 1e-9);
        assert!((model.lz() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_fracture_tagging_covers_slabs() {
        let model = Model::new(basic_props()).unwrap();
        // boundary slab columns: 0, 4, 8
        assert_eq!(model.fracture_idx()[[0, 1, 0]], 1);
        assert_eq!(model.fracture_idx()[[4, 1, 0]], 2);
        assert_eq!(model.fracture_idx()[[8, 1, 0]], 3);
        // Y-direction slabs overwrite on shared cells
        assert_eq!(model.fracture_idx()[[0, 0, 0]], -1);
        assert_eq!(model.fracture_idx()[[1, 4, 0]], -2);
        // matrix interior untouched
        assert_eq!(model.fracture_idx()[[2, 2, 2]], 0);
    }

    #[test]
    fn test_streak_rect_confines_streak() {
        let mut props = basic_props();
        props.streaks = StreakSpec {
            k: vec![1],
            nz: vec![2],
            dz: vec![0.5],
            rect: vec![Some([1, 3, 1, 3])],
        };
        let model = Model::new(props).unwrap();
        assert_eq!(model.streak_idx()[[2, 2, 1]], 0);
        assert_eq!(model.streak_idx()[[5, 5, 1]], -1);
        assert_eq!(model.streak_idx()[[2, 2, 0]], -1);
    }

    #[test]
    fn test_invalid_streak_rect_fails() {
        let mut props = basic_props();
        props.streaks = StreakSpec {
            k: vec![1],
            nz: vec![1],
            dz: vec![0.5],
            rect: vec![Some([0, 50, 0, 2])],
        };
        assert!(matches!(
            Model::new(props),
            Err(GridError::InvalidStreak { .. })
        ));
    }

    #[test]
    fn test_layers_property_length_check() {
        let mut model = Model::new(basic_props()).unwrap();
        assert!(
            model
                .set_layers_property(PropertyKind::Poro, 0.2, &[0.3])
                .is_err()
        );
        assert!(
            model
                .set_layers_property(PropertyKind::Poro, 0.2, &[])
                .is_ok()
        );
    }

    #[test]
    fn test_anisotropy_length_check_names_axis() {
        let mut model = Model::new(basic_props()).unwrap();
        let err = model
            .set_fracture_anisotropy_property(PropertyKind::Permx, &[1.0, 2.0], &[1.0, 2.0, 3.0])
            .unwrap_err();
        assert!(err.to_string().contains("x-direction fracture PERMX"));
    }

    #[test]
    fn test_throw_validation() {
        let mut model = Model::new(basic_props()).unwrap();
        assert!(
            model
                .set_throws(vec![Throw {
                    i1: 0,
                    i2: 20,
                    j1: 0,
                    j2: 1,
                    dz: 5.0
                }])
                .is_err()
        );
        assert!(
            model
                .set_throws(vec![Throw {
                    i1: 0,
                    i2: 1,
                    j1: 0,
                    j2: 1,
                    dz: 5.0
                }])
                .is_ok()
        );
        model.clear_throws();
        assert!(model.throws.is_empty());
    }

    #[test]
    fn test_distribute_requires_properties() {
        let model = Model::new(basic_props()).unwrap();
        assert!(matches!(
            model.distribute_property(PropertyKind::Poro),
            Err(GridError::MissingProperty { .. })
        ));
    }

    #[test]
    fn test_permx_falls_back_to_perm() {
        let mut model = Model::new(basic_props()).unwrap();
        model
            .set_layers_property(PropertyKind::Perm, 5.0, &[])
            .unwrap();
        model.set_fracture_property(PropertyKind::Perm, 1000.0);
        let permx = model.distribute_property(PropertyKind::Permx).unwrap();
        assert_eq!(permx[[2, 2, 2]], 5.0);
        assert_eq!(permx[[0, 1, 0]], 1000.0);
    }

    #[test]
    fn test_distribute_int_property_regions() {
        let mut props = basic_props();
        props.streaks = StreakSpec {
            k: vec![1],
            nz: vec![2],
            dz: vec![0.5],
            rect: vec![],
        };
        let model = Model::new(props).unwrap();
        let regions = model.distribute_int_property(1, &[2], 3).unwrap();
        assert_eq!(regions[[2, 2, 0]], 1); // matrix background
        assert_eq!(regions[[2, 2, 1]], 2); // streak layer
        assert_eq!(regions[[0, 1, 1]], 3); // fracture beats streak
        // streak list must match the streak count
        assert!(model.distribute_int_property(1, &[2, 4], 3).is_err());
    }

    #[test]
    fn test_info_reports_throw_extent() {
        let mut model = Model::new(basic_props()).unwrap();
        model
            .set_layers_property(PropertyKind::Poro, 0.2, &[])
            .unwrap();
        model.set_fracture_property(PropertyKind::Poro, 1.0);
        model
            .set_layers_property(PropertyKind::Perm, 10.0, &[])
            .unwrap();
        model.set_fracture_property(PropertyKind::Perm, 1000.0);

        let info = model.info().unwrap();
        assert_eq!(info.top, 2000.0);
        assert!((info.bottom - 2010.0).abs() < 1e-9);

        model
            .set_throws(vec![Throw {
                i1: 0,
                i2: 1,
                j1: 0,
                j2: 1,
                dz: 5.0,
            }])
            .unwrap();
        let info = model.info().unwrap();
        assert!((info.bottom - 2015.0).abs() < 1e-9);
    }

    #[test]
    fn test_statistics_uniform_model() {
        let mut model = Model::new(basic_props()).unwrap();
        model
            .set_layers_property(PropertyKind::Poro, 0.25, &[])
            .unwrap();
        model.set_fracture_property(PropertyKind::Poro, 0.25);
        model
            .set_layers_property(PropertyKind::Perm, 100.0, &[])
            .unwrap();
        model.set_fracture_property(PropertyKind::Perm, 100.0);
        let (pore, avg_poro, avg_perm) = model.statistics().unwrap();
        let bulk = 60.3 * 60.3 * 10.0;
        assert_deviation!(pore, 0.25 * bulk, 1e-6);
        assert_deviation!(avg_poro, 0.25, 1e-9);
        assert_deviation!(avg_perm, 100.0, 1e-9, "uniform model must average its input");
    }
}
