use glam::{DMat2, DVec2};
use ndarray::Array2;

use crate::math_utils::{clamp, cumulative_sum};

/// Shape and placement parameters for the top surface and the world-space
/// transform of the pillar mesh.
#[derive(Debug, Clone)]
pub struct MeshParams {
    /// Ellipsoid semi-axes. Any zero value switches to the flat slab shape.
    pub radius_x: f64,
    pub radius_y: f64,
    pub radius_z: f64,
    /// Tilt around the X offset from the centroid, degrees.
    pub tilt: f64,
    /// Shape centroid as a fraction of the X/Y extent.
    pub centroid_x: f64,
    pub centroid_y: f64,
    /// World coordinates of the reference point after rotation.
    pub origin_x: f64,
    pub origin_y: f64,
    /// Location of the reference point in the grid, as extent fractions.
    pub origin_x_pos: f64,
    pub origin_y_pos: f64,
    /// Areal rotation, degrees counter-clockwise.
    pub rotation: f64,
    /// Depth of the shallowest point when `origin_top` is not used.
    pub top: f64,
    /// If positive, anchor the surface so the reference point sits at this
    /// depth instead of anchoring the minimum to `top`.
    pub origin_top: f64,
}

impl Default for MeshParams {
    fn default() -> Self {
        MeshParams {
            radius_x: 0.0,
            radius_y: 0.0,
            radius_z: 0.0,
            tilt: 0.0,
            centroid_x: 0.5,
            centroid_y: 0.5,
            origin_x: 0.0,
            origin_y: 0.0,
            origin_x_pos: 0.0,
            origin_y_pos: 0.0,
            rotation: 0.0,
            top: 0.0,
            origin_top: 0.0,
        }
    }
}

/// The corner-point pillar mesh: world X/Y per pillar, the top-surface depth
/// per pillar, and the unrotated local boundary coordinates along each axis.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// World X of each pillar, shape `(nx + 1, ny + 1)`.
    pub x: Array2<f64>,
    /// World Y of each pillar, same shape.
    pub y: Array2<f64>,
    /// Top-surface depth of each pillar, same shape. Smaller is shallower.
    pub z_top: Array2<f64>,
    /// Unrotated cell boundary coordinates, lengths `nx + 1` / `ny + 1` /
    /// `nz + 1`.
    pub x_local: Vec<f64>,
    pub y_local: Vec<f64>,
    pub z_local: Vec<f64>,
}

impl Mesh {
    pub fn lx(&self) -> f64 {
        *self.x_local.last().unwrap_or(&0.0)
    }

    pub fn ly(&self) -> f64 {
        *self.y_local.last().unwrap_or(&0.0)
    }

    pub fn lz(&self) -> f64 {
        *self.z_local.last().unwrap_or(&0.0)
    }
}

/// Top-surface depth at an offset from the shape centroid.
///
/// With all three semi-axes non-zero this is the lower half of an ellipsoid
/// plus the tilt term. The radicand is floored at zero so points outside the
/// ellipsoid's horizontal footprint flatten to the rim depth instead of
/// going complex. With any semi-axis zero the surface is a flat plane tilted
/// around the centroid.
pub fn surface_depth(params: &MeshParams, dx: f64, dy: f64) -> f64 {
    let tilt_term = dx * params.tilt.to_radians().tan();
    if params.radius_x == 0.0 || params.radius_y == 0.0 || params.radius_z == 0.0 {
        tilt_term
    } else {
        let radicand = 1.0
            - (dx / params.radius_x).powi(2)
            - (dy / params.radius_y).powi(2);
        -params.radius_z * clamp(radicand, 0.0, f64::INFINITY).sqrt() + tilt_term
    }
}

/// Build the pillar mesh from per-cell sizes and the shape parameters.
///
/// `dx_cells` / `dy_cells` already carry the fracture slab thickness in the
/// slab columns and rows; `dz_layers` carries the per-K thickness from the
/// layer stack.
pub fn build_mesh(
    dx_cells: &[f64],
    dy_cells: &[f64],
    dz_layers: &[f64],
    params: &MeshParams,
) -> Mesh {
    let x_local = cumulative_sum(dx_cells);
    let y_local = cumulative_sum(dy_cells);
    let z_local = cumulative_sum(dz_layers);

    let lx = *x_local.last().unwrap_or(&0.0);
    let ly = *y_local.last().unwrap_or(&0.0);
    let x_mid = params.centroid_x * lx;
    let y_mid = params.centroid_y * ly;

    let n_px = x_local.len();
    let n_py = y_local.len();

    let mut z_top = Array2::zeros((n_px, n_py));
    for i in 0..n_px {
        for j in 0..n_py {
            z_top[[i, j]] = surface_depth(params, x_local[i] - x_mid, y_local[j] - y_mid);
        }
    }

    // Rotate around the local origin, then translate so the reference point
    // lands on (origin_x, origin_y).
    let rot = DMat2::from_angle(params.rotation.to_radians());
    let reference = DVec2::new(params.origin_x_pos * lx, params.origin_y_pos * ly);
    let turned = rot * reference;
    let shift = DVec2::new(params.origin_x - turned.x, params.origin_y - turned.y);

    let mut x = Array2::zeros((n_px, n_py));
    let mut y = Array2::zeros((n_px, n_py));
    for i in 0..n_px {
        for j in 0..n_py {
            let p = rot * DVec2::new(x_local[i], y_local[j]) + shift;
            x[[i, j]] = p.x;
            y[[i, j]] = p.y;
        }
    }

    // Vertical anchoring: either pin the reference point to origin_top, or
    // pin the shallowest point of the surface to top.
    let z_shift = if params.origin_top > 0.0 {
        let z_ref = surface_depth(params, reference.x - x_mid, reference.y - y_mid);
        params.origin_top - z_ref
    } else {
        let z_min = z_top.iter().cloned().fold(f64::INFINITY, f64::min);
        params.top - z_min
    };
    z_top.mapv_inplace(|z| z + z_shift);

    Mesh {
        x,
        y,
        z_top,
        x_local,
        y_local,
        z_local,
    }
}
