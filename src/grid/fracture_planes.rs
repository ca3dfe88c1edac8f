use ndarray::Array3;

use crate::error::{GridError, GridResult};
use crate::math_utils::{clamp, nearest_index};

/// Per-fault-plane extent fractions, all in `[0, 1]`, one entry per plane
/// along the axis the planes cut.
#[derive(Debug, Clone, Default)]
pub struct FaultPlaneFractions {
    /// Lateral extent as a fraction of the orthogonal axis length.
    pub length: Vec<f64>,
    /// Lateral start as a fraction of the orthogonal axis length.
    pub offset: Vec<f64>,
    /// Vertical extent as a fraction of the total thickness.
    pub height: Vec<f64>,
    /// Vertical start as a fraction of the total thickness.
    pub zoffset: Vec<f64>,
}

impl FaultPlaneFractions {
    /// Full-extent planes, one per fault.
    pub fn full(count: usize) -> Self {
        FaultPlaneFractions {
            length: vec![1.0; count],
            offset: vec![0.0; count],
            height: vec![1.0; count],
            zoffset: vec![0.0; count],
        }
    }

    pub fn validate(&self, axis: &str, expected: usize) -> GridResult<()> {
        for (name, list) in [
            ("length", &self.length),
            ("offset", &self.offset),
            ("height", &self.height),
            ("zoffset", &self.zoffset),
        ] {
            if list.len() != expected {
                return Err(GridError::list_length_mismatch(
                    format!("{axis}-direction fracture {name}"),
                    expected,
                    list.len(),
                ));
            }
        }
        Ok(())
    }
}

/// Index sub-range `[start, end)` for one plane along one axis, from its
/// extent fractions and the physical boundary coordinates of that axis.
///
/// The start is pulled back to `min(offset, 1 - length)` so a plane never
/// extends past the far boundary even when `offset + length > 1`. Physical
/// positions convert to cell indices by nearest boundary coordinate.
fn fraction_range(coords: &[f64], length: f64, offset: f64) -> (usize, usize) {
    let extent = *coords.last().unwrap_or(&0.0);
    let length = clamp(length, 0.0, 1.0);
    let start = offset.min(1.0 - length) * extent;
    let end = start + length * extent;
    (nearest_index(coords, start), nearest_index(coords, end))
}

/// Stamp every fault plane into `fracture_idx`.
///
/// X-direction planes (slabs normal to X) get positive 1-based ordinals,
/// Y-direction planes negative ordinals. Y-direction tagging runs second and
/// overwrites X-direction tags on cells belonging to both. This ordering is
/// legacy behavior and kept as is.
#[allow(clippy::too_many_arguments)]
pub fn tag_fracture_planes(
    fracture_idx: &mut Array3<i32>,
    x_starts: &[usize],
    y_starts: &[usize],
    fracture_cells: usize,
    x_fractions: &FaultPlaneFractions,
    y_fractions: &FaultPlaneFractions,
    y_coords: &[f64],
    x_coords: &[f64],
    z_coords: &[f64],
) -> GridResult<()> {
    x_fractions.validate("x", x_starts.len())?;
    y_fractions.validate("y", y_starts.len())?;

    for (n, &slab_start) in x_starts.iter().enumerate() {
        let (j1, j2) = fraction_range(y_coords, x_fractions.length[n], x_fractions.offset[n]);
        let (k1, k2) = fraction_range(z_coords, x_fractions.height[n], x_fractions.zoffset[n]);
        for i in slab_start..slab_start + fracture_cells {
            for j in j1..j2 {
                for k in k1..k2 {
                    fracture_idx[[i, j, k]] = (n + 1) as i32;
                }
            }
        }
    }

    for (n, &slab_start) in y_starts.iter().enumerate() {
        let (i1, i2) = fraction_range(x_coords, y_fractions.length[n], y_fractions.offset[n]);
        let (k1, k2) = fraction_range(z_coords, y_fractions.height[n], y_fractions.zoffset[n]);
        for j in slab_start..slab_start + fracture_cells {
            for i in i1..i2 {
                for k in k1..k2 {
                    fracture_idx[[i, j, k]] = -((n + 1) as i32);
                }
            }
        }
    }

    Ok(())
}
