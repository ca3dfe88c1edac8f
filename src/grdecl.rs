//! Run-length-encoded corner-point grid serialization.
//!
//! The interchange format collapses consecutive identical values in a
//! flattened property array to `<count>*<value>` tokens, wraps lines at 132
//! characters and terminates each keyword section with a standalone `/`.

use std::fmt::Display;
use std::io::Write;

use ndarray::{Array2, Array3};

use crate::constants::GRDECL_LINE_WIDTH;
use crate::error::GridResult;

/// A vertical fault throw: the top surface of the inclusive areal cell box
/// `[i1..=i2, j1..=j2]` is shifted by `dz`, and the shift carries through
/// every layer below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throw {
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
    pub dz: f64,
}

/// Collapse runs of identical values into `<count>*<value>` tokens.
pub fn rle_tokens<T: PartialEq + Display>(values: &[T]) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut idx = 0;
    while idx < values.len() {
        let mut run = 1;
        while idx + run < values.len() && values[idx + run] == values[idx] {
            run += 1;
        }
        if run > 1 {
            tokens.push(format!("{}*{}", run, values[idx]));
        } else {
            tokens.push(format!("{}", values[idx]));
        }
        idx += run;
    }
    tokens
}

/// Join tokens into lines no wider than `width` characters.
pub fn wrap_tokens(tokens: &[String], width: usize) -> String {
    let mut out = String::new();
    let mut line_len = 0;
    for token in tokens {
        if line_len == 0 {
            out.push_str(token);
            line_len = token.len();
        } else if line_len + 1 + token.len() > width {
            out.push('\n');
            out.push_str(token);
            line_len = token.len();
        } else {
            out.push(' ');
            out.push_str(token);
            line_len += 1 + token.len();
        }
    }
    out
}

/// Write one run-length-encoded keyword section.
pub fn write_section<W: Write, T: PartialEq + Display>(
    writer: &mut W,
    keyword: &str,
    values: &[T],
) -> GridResult<()> {
    writeln!(writer, "{}", keyword)?;
    writeln!(writer, "{}", wrap_tokens(&rle_tokens(values), GRDECL_LINE_WIDTH))?;
    writeln!(writer, "/")?;
    writeln!(writer)?;
    Ok(())
}

/// Decode a run-length-encoded section body back into values. Inverse of
/// [`rle_tokens`], used to verify round trips.
pub fn rle_decode(body: &str) -> Vec<f64> {
    let mut out = Vec::new();
    for token in body.split_whitespace() {
        if token == "/" {
            break;
        }
        if let Some((count, value)) = token.split_once('*') {
            let count: usize = count.parse().unwrap_or(0);
            let value: f64 = value.parse().unwrap_or(f64::NAN);
            out.extend(std::iter::repeat_n(value, count));
        } else if let Ok(value) = token.parse::<f64>() {
            out.push(value);
        }
    }
    out
}

/// Flatten a 3D array in Fortran (column-major) order: I fastest, then J,
/// then K, as the interchange format requires.
pub fn flatten_f<T: Copy>(array: &Array3<T>) -> Vec<T> {
    let (nx, ny, nz) = array.dim();
    let mut out = Vec::with_capacity(nx * ny * nz);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                out.push(array[[i, j, k]]);
            }
        }
    }
    out
}

/// Write the `COORD` section: one line per pillar with coincident top and
/// bottom points. The true depths live in `ZCORN`, so z holds a placeholder
/// zero. Pillar order is I outer, J inner.
pub fn write_coord<W: Write>(writer: &mut W, x: &Array2<f64>, y: &Array2<f64>) -> GridResult<()> {
    writeln!(writer, "COORD")?;
    let (n_px, n_py) = x.dim();
    for i in 0..n_px {
        for j in 0..n_py {
            writeln!(
                writer,
                "{:12.8} {:12.8} {:12.8} {:12.8} {:12.8} {:12.8}",
                x[[i, j]],
                y[[i, j]],
                0.0,
                x[[i, j]],
                y[[i, j]],
                0.0
            )?;
        }
    }
    writeln!(writer, "/")?;
    writeln!(writer)?;
    Ok(())
}

/// Build the full `ZCORN` value list from the per-pillar top surface, the
/// per-layer thicknesses and the fault throws.
///
/// The top surface is first expanded to the 2nx-by-2ny corner lattice by
/// duplicating each pillar value for the two cells it borders. Each throw
/// then shifts the four surface corners of every cell inside its box. The
/// thrown surface is finally replicated downward by cumulative layer
/// thickness, yielding the eight depths per cell the corner-point format
/// requires. Values run I fastest, then J, top face before bottom face,
/// layer by layer.
pub fn build_zcorn(z_top: &Array2<f64>, dz_layers: &[f64], throws: &[Throw]) -> Vec<f64> {
    let (n_px, n_py) = z_top.dim();
    let nx = n_px - 1;
    let ny = n_py - 1;

    // corner lattice: corner column m borders pillar (m + 1) / 2
    let mut surface = Array2::zeros((2 * nx, 2 * ny));
    for ci in 0..2 * nx {
        for cj in 0..2 * ny {
            surface[[ci, cj]] = z_top[[(ci + 1) / 2, (cj + 1) / 2]];
        }
    }

    for throw in throws {
        for i in throw.i1..=throw.i2 {
            for j in throw.j1..=throw.j2 {
                surface[[2 * i, 2 * j]] += throw.dz;
                surface[[2 * i + 1, 2 * j]] += throw.dz;
                surface[[2 * i, 2 * j + 1]] += throw.dz;
                surface[[2 * i + 1, 2 * j + 1]] += throw.dz;
            }
        }
    }

    let nz = dz_layers.len();
    let mut zcorn = Vec::with_capacity(nz * 2 * 4 * nx * ny);
    let mut depth = 0.0;
    for dz in dz_layers {
        for face_depth in [depth, depth + dz] {
            for cj in 0..2 * ny {
                for ci in 0..2 * nx {
                    zcorn.push(surface[[ci, cj]] + face_depth);
                }
            }
        }
        depth += dz;
    }
    zcorn
}
