use colored::Colorize;

use crate::constants::BACKGROUND;
use crate::error::{GridError, GridResult};

/// Starting cell index of every fracture slab along one axis.
///
/// With `boundary_fracture` a slab sits before the first matrix block and
/// after every block, including the last. Without it, slabs are only placed
/// between interior blocks, so fewer than two blocks yield no slabs at all.
///
/// # Examples
/// ```
/// use sugarcube_grid::grid::index_geometry::fracture_start_indices;
///
/// assert_eq!(fracture_start_indices(&[3, 3], 1, true), vec![0, 4, 8]);
/// assert_eq!(fracture_start_indices(&[5], 1, false), Vec::<usize>::new());
/// ```
pub fn fracture_start_indices(
    block_widths: &[usize],
    fracture_cells: usize,
    boundary_fracture: bool,
) -> Vec<usize> {
    let mut starts = Vec::new();
    if boundary_fracture {
        let mut acc = 0;
        starts.push(acc);
        acc += fracture_cells;
        for w in block_widths {
            acc += w;
            starts.push(acc);
            acc += fracture_cells;
        }
    } else if block_widths.len() >= 2 {
        let mut acc = 0;
        for w in &block_widths[..block_widths.len() - 1] {
            acc += w;
            starts.push(acc);
            acc += fracture_cells;
        }
    }
    starts
}

/// Starting cell index of every matrix block, derived from the fracture
/// slab starts. With boundary fractures each block starts one slab after a
/// fracture (the trailing fracture start has no block behind it); without
/// them the first block starts at 0.
pub fn matrix_start_indices(
    fracture_starts: &[usize],
    fracture_cells: usize,
    boundary_fracture: bool,
) -> Vec<usize> {
    if boundary_fracture {
        fracture_starts[..fracture_starts.len().saturating_sub(1)]
            .iter()
            .map(|s| s + fracture_cells)
            .collect()
    } else {
        let mut starts = vec![0];
        starts.extend(fracture_starts.iter().map(|s| s + fracture_cells));
        starts
    }
}

/// Number of fault planes along one axis.
pub fn fault_plane_count(block_count: usize, boundary_fracture: bool) -> usize {
    if boundary_fracture {
        block_count + 1
    } else {
        block_count.saturating_sub(1)
    }
}

/// Total cell count along one axis: all matrix blocks plus all fracture slabs.
pub fn axis_total_cells(
    block_widths: &[usize],
    fracture_cells: usize,
    boundary_fracture: bool,
) -> usize {
    let blocks: usize = block_widths.iter().sum();
    blocks + fracture_cells * fault_plane_count(block_widths.len(), boundary_fracture)
}

/// Streak specification: parallel lists, one entry per streak.
#[derive(Debug, Clone, Default)]
pub struct StreakSpec {
    /// Starting K layer of each streak.
    pub k: Vec<i64>,
    /// Number of K layers each streak occupies.
    pub nz: Vec<usize>,
    /// Cell thickness inside each streak.
    pub dz: Vec<f64>,
    /// Optional areal box `[i1, i2, j1, j2]` (inclusive) per streak.
    /// `None` means the streak covers the whole areal extent.
    pub rect: Vec<Option<[usize; 4]>>,
}

impl StreakSpec {
    pub fn count(&self) -> usize {
        self.k.len()
    }

    /// All parallel lists must have the same length.
    pub fn validate(&self) -> GridResult<()> {
        if self.nz.len() != self.k.len() {
            return Err(GridError::list_length_mismatch(
                "streak layer counts",
                self.k.len(),
                self.nz.len(),
            ));
        }
        if self.dz.len() != self.k.len() {
            return Err(GridError::list_length_mismatch(
                "streak dz values",
                self.k.len(),
                self.dz.len(),
            ));
        }
        if !self.rect.is_empty() && self.rect.len() != self.k.len() {
            return Err(GridError::list_length_mismatch(
                "streak boxes",
                self.k.len(),
                self.rect.len(),
            ));
        }
        Ok(())
    }

    pub fn rect_of(&self, streak: usize) -> Option<[usize; 4]> {
        self.rect.get(streak).copied().flatten()
    }
}

/// One maximal run of K layers sharing the same streak membership.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// `BACKGROUND` (-1) or the streak ordinal.
    pub streak: i32,
    /// First K index of the run.
    pub k0: usize,
    /// Number of K layers in the run.
    pub cell_count: usize,
    /// Cell thickness within the run.
    pub dz: f64,
}

/// The Z-axis decomposition: per-K streak assignment, per-K thickness, and
/// the run-length grouping of K layers into `Layer`s.
#[derive(Debug, Clone)]
pub struct LayerStack {
    /// One entry per K layer: `BACKGROUND` or a streak ordinal.
    pub prts: Vec<i32>,
    /// Cell thickness per K layer.
    pub dz_per_k: Vec<f64>,
    pub layers: Vec<Layer>,
}

impl LayerStack {
    pub fn nz(&self) -> usize {
        self.prts.len()
    }

    pub fn total_thickness(&self) -> f64 {
        self.dz_per_k.iter().sum()
    }

    /// Layer ordinal of every K index.
    pub fn layer_of_k(&self) -> Vec<i32> {
        let mut out = vec![0; self.prts.len()];
        for (ordinal, layer) in self.layers.iter().enumerate() {
            for item in out.iter_mut().skip(layer.k0).take(layer.cell_count) {
                *item = ordinal as i32;
            }
        }
        out
    }
}

/// Build the Z-axis layer stack from the background layer count and the
/// streak specification.
///
/// Streaks whose K range falls outside `[0, nz)` are rejected with a console
/// warning and ignored. Where two streaks overlap, the earlier streak keeps
/// the contested K layers and the later one is dropped there, again with a
/// warning.
pub fn build_layer_stack(nz: usize, dz: f64, streaks: &StreakSpec) -> GridResult<LayerStack> {
    streaks.validate()?;

    let mut prts = vec![BACKGROUND; nz];
    for s in 0..streaks.count() {
        let k0 = streaks.k[s];
        let count = streaks.nz[s];
        if k0 < 0 || (k0 as usize) + count > nz {
            println!(
                "{}",
                format!(
                    "Warning: streak {} with K range [{}, {}) is outside [0, {}), ignored",
                    s,
                    k0,
                    k0 + count as i64,
                    nz
                )
                .yellow()
            );
            continue;
        }
        for k in (k0 as usize)..(k0 as usize) + count {
            if prts[k] != BACKGROUND {
                println!(
                    "{}",
                    format!(
                        "Warning: streak {} overlaps streak {} at K layer {}, dropped there",
                        s, prts[k], k
                    )
                    .yellow()
                );
            } else {
                prts[k] = s as i32;
            }
        }
    }

    let dz_per_k: Vec<f64> = prts
        .iter()
        .map(|&p| {
            if p == BACKGROUND {
                dz
            } else {
                streaks.dz[p as usize]
            }
        })
        .collect();

    // Group the per-K assignment into maximal runs of identical value.
    let mut layers = Vec::new();
    let mut k = 0;
    while k < nz {
        let tag = prts[k];
        let mut end = k + 1;
        while end < nz && prts[end] == tag {
            end += 1;
        }
        layers.push(Layer {
            streak: tag,
            k0: k,
            cell_count: end - k,
            dz: dz_per_k[k],
        });
        k = end;
    }

    Ok(LayerStack {
        prts,
        dz_per_k,
        layers,
    })
}
