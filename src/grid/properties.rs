use ndarray::Array3;
use serde::{Deserialize, Serialize};

use crate::constants::{BACKGROUND, VUG_CATEGORY_COUNT};
use crate::error::{GridError, GridResult};

/// The recognized property keywords. A fixed enum instead of raw keyword
/// strings so typos fail at compile time rather than at lookup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    Poro,
    Perm,
    Permx,
    Permy,
    Multx,
    Multy,
    Multpv,
}

impl PropertyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::Poro => "PORO",
            PropertyKind::Perm => "PERM",
            PropertyKind::Permx => "PERMX",
            PropertyKind::Permy => "PERMY",
            PropertyKind::Multx => "MULTX",
            PropertyKind::Multy => "MULTY",
            PropertyKind::Multpv => "MULTPV",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PORO" => Some(PropertyKind::Poro),
            "PERM" => Some(PropertyKind::Perm),
            "PERMX" => Some(PropertyKind::Permx),
            "PERMY" => Some(PropertyKind::Permy),
            "MULTX" => Some(PropertyKind::Multx),
            "MULTY" => Some(PropertyKind::Multy),
            "MULTPV" => Some(PropertyKind::Multpv),
            _ => None,
        }
    }
}

/// Background scalar plus one value per streak.
#[derive(Debug, Clone)]
pub struct LayerProperty {
    pub matrix: f64,
    pub streaks: Vec<f64>,
}

/// Fracture value: one scalar for all planes, or one value per plane with
/// separate X- and Y-direction lists (anisotropic permeability).
#[derive(Debug, Clone)]
pub enum FractureProperty {
    Isotropic(f64),
    Anisotropic { x: Vec<f64>, y: Vec<f64> },
}

/// Per-vug-category value: a sampled value per tagged cell, or one scalar
/// for the whole category (multipliers).
#[derive(Debug, Clone)]
pub enum VugValue {
    Cells(Vec<f64>),
    Scalar(f64),
}

/// Compose a dense property array from the zone classification, with the
/// precedence fracture > vug > streak > matrix background.
///
/// Per-cell vug values are consumed in the canonical cell order (K outer,
/// J middle, I inner), the same order the sampler realizes cells in.
pub fn distribute(
    streak_idx: &Array3<i32>,
    vug_idx: &Array3<i32>,
    fracture_idx: &Array3<i32>,
    background: f64,
    streak_values: &[f64],
    streak_count: usize,
    vug_values: Option<&[VugValue; VUG_CATEGORY_COUNT]>,
    fracture: &FractureProperty,
) -> GridResult<Array3<f64>> {
    if streak_values.len() != streak_count {
        return Err(GridError::list_length_mismatch(
            "streak property values",
            streak_count,
            streak_values.len(),
        ));
    }

    let dim = streak_idx.dim();
    let (nx, ny, nz) = dim;
    let mut out = Array3::from_elem(dim, background);

    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let s = streak_idx[[i, j, k]];
                if s != BACKGROUND {
                    out[[i, j, k]] = streak_values[s as usize];
                }
            }
        }
    }

    if let Some(values) = vug_values {
        for (category, value) in values.iter().enumerate() {
            let tag = (category + 1) as i32;
            let mut consumed = 0;
            for k in 0..nz {
                for j in 0..ny {
                    for i in 0..nx {
                        if vug_idx[[i, j, k]] != tag {
                            continue;
                        }
                        out[[i, j, k]] = match value {
                            VugValue::Scalar(v) => *v,
                            VugValue::Cells(cells) => {
                                let v = cells.get(consumed).copied().ok_or_else(|| {
                                    GridError::list_length_mismatch(
                                        format!("vug category {} cell values", category + 1),
                                        consumed + 1,
                                        cells.len(),
                                    )
                                })?;
                                consumed += 1;
                                v
                            }
                        };
                    }
                }
            }
        }
    }

    match fracture {
        FractureProperty::Isotropic(v) => {
            for cell in out.iter_mut().zip(fracture_idx.iter()) {
                if *cell.1 != 0 {
                    *cell.0 = *v;
                }
            }
        }
        FractureProperty::Anisotropic { x, y } => {
            for k in 0..nz {
                for j in 0..ny {
                    for i in 0..nx {
                        let f = fracture_idx[[i, j, k]];
                        if f > 0 {
                            let plane = (f - 1) as usize;
                            out[[i, j, k]] = *x.get(plane).ok_or_else(|| {
                                GridError::list_length_mismatch(
                                    "x-direction fracture property values",
                                    plane + 1,
                                    x.len(),
                                )
                            })?;
                        } else if f < 0 {
                            let plane = (-f - 1) as usize;
                            out[[i, j, k]] = *y.get(plane).ok_or_else(|| {
                                GridError::list_length_mismatch(
                                    "y-direction fracture property values",
                                    plane + 1,
                                    y.len(),
                                )
                            })?;
                        }
                    }
                }
            }
        }
    }

    Ok(out)
}

/// Integer variant of [`distribute`] for region-style properties. The
/// explicit function replaces the dtype-from-value heuristic of the legacy
/// generator. Vug categories carry no integer values, so only background,
/// streak and fracture apply.
pub fn distribute_int(
    streak_idx: &Array3<i32>,
    fracture_idx: &Array3<i32>,
    background: i32,
    streak_values: &[i32],
    streak_count: usize,
    fracture: i32,
) -> GridResult<Array3<i32>> {
    if streak_values.len() != streak_count {
        return Err(GridError::list_length_mismatch(
            "streak property values",
            streak_count,
            streak_values.len(),
        ));
    }

    let dim = streak_idx.dim();
    let mut out = Array3::from_elem(dim, background);
    for ((o, &s), &f) in out
        .iter_mut()
        .zip(streak_idx.iter())
        .zip(fracture_idx.iter())
    {
        if f != 0 {
            *o = fracture;
        } else if s != BACKGROUND {
            *o = streak_values[s as usize];
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn zone_arrays() -> (Array3<i32>, Array3<i32>, Array3<i32>) {
        // 3x1x1 grid: cell 0 background, cell 1 streak 0, cell 2 fracture 1
        let mut streak = Array3::from_elem((3, 1, 1), -1);
        streak[[1, 0, 0]] = 0;
        let vug = Array3::zeros((3, 1, 1));
        let mut fracture = Array3::zeros((3, 1, 1));
        fracture[[2, 0, 0]] = 1;
        (streak, vug, fracture)
    }

    #[test]
    fn test_precedence_background_streak_fracture() {
        let (streak, vug, fracture) = zone_arrays();
        let out = distribute(
            &streak,
            &vug,
            &fracture,
            0.1,
            &[0.2],
            1,
            None,
            &FractureProperty::Isotropic(0.9),
        )
        .unwrap();
        assert_eq!(out[[0, 0, 0]], 0.1);
        assert_eq!(out[[1, 0, 0]], 0.2);
        assert_eq!(out[[2, 0, 0]], 0.9);
    }

    #[test]
    fn test_fracture_overrides_vug_overrides_streak() {
        let (streak, mut vug, mut fracture) = zone_arrays();
        // tag the streak cell as a near-fracture vug and the fracture cell too
        vug[[1, 0, 0]] = 1;
        vug[[2, 0, 0]] = 1;
        fracture[[1, 0, 0]] = 0;
        let values = [
            VugValue::Cells(vec![0.33, 0.44]),
            VugValue::Scalar(0.0),
            VugValue::Scalar(0.0),
        ];
        let out = distribute(
            &streak,
            &vug,
            &fracture,
            0.1,
            &[0.2],
            1,
            Some(&values),
            &FractureProperty::Isotropic(0.9),
        )
        .unwrap();
        // vug beats streak; fracture beats vug
        assert_eq!(out[[1, 0, 0]], 0.33);
        assert_eq!(out[[2, 0, 0]], 0.9);
    }

    #[test]
    fn test_anisotropic_fracture_values() {
        let mut fracture = Array3::zeros((3, 1, 1));
        fracture[[0, 0, 0]] = 1; // X plane 1
        fracture[[2, 0, 0]] = -1; // Y plane 1
        let streak = Array3::from_elem((3, 1, 1), -1);
        let vug = Array3::zeros((3, 1, 1));
        let out = distribute(
            &streak,
            &vug,
            &fracture,
            1.0,
            &[],
            0,
            None,
            &FractureProperty::Anisotropic {
                x: vec![100.0],
                y: vec![200.0],
            },
        )
        .unwrap();
        assert_eq!(out[[0, 0, 0]], 100.0);
        assert_eq!(out[[1, 0, 0]], 1.0);
        assert_eq!(out[[2, 0, 0]], 200.0);
    }

    #[test]
    fn test_distribute_is_idempotent() {
        let (streak, vug, fracture) = zone_arrays();
        let args = (
            0.15,
            vec![0.3],
            FractureProperty::Isotropic(0.5),
        );
        let a = distribute(&streak, &vug, &fracture, args.0, &args.1, 1, None, &args.2).unwrap();
        let b = distribute(&streak, &vug, &fracture, args.0, &args.1, 1, None, &args.2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_streak_value_count_mismatch_fails() {
        let (streak, vug, fracture) = zone_arrays();
        let err = distribute(
            &streak,
            &vug,
            &fracture,
            0.1,
            &[0.2, 0.3],
            1,
            None,
            &FractureProperty::Isotropic(0.9),
        )
        .unwrap_err();
        assert!(matches!(err, GridError::ListLengthMismatch { .. }));
    }

    #[test]
    fn test_distribute_int() {
        let (streak, _, fracture) = zone_arrays();
        let out = distribute_int(&streak, &fracture, 1, &[2], 1, 3).unwrap();
        assert_eq!(out[[0, 0, 0]], 1);
        assert_eq!(out[[1, 0, 0]], 2);
        assert_eq!(out[[2, 0, 0]], 3);
    }

    #[test]
    fn test_property_kind_round_trip() {
        for kind in [
            PropertyKind::Poro,
            PropertyKind::Perm,
            PropertyKind::Permx,
            PropertyKind::Permy,
            PropertyKind::Multx,
            PropertyKind::Multy,
            PropertyKind::Multpv,
        ] {
            assert_eq!(PropertyKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(PropertyKind::from_str("SWATINIT"), None);
    }
}
