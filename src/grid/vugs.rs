use colored::Colorize;
use ndarray::Array3;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::constants::{
    BACKGROUND, SEED_OFFSET_FRACTION, SEED_OFFSET_PERMEABILITY, SEED_OFFSET_PLACEMENT,
    SEED_OFFSET_POROSITY, VUG_CATEGORY_COUNT, VUG_NEAR_FRACTURE, VUG_NEAR_STREAK, VUG_RANDOM,
};
/// Distribution parameters for one vug category.
#[derive(Debug, Clone, Copy)]
pub struct VugDistribution {
    /// Uniform bounds for the target fraction of matrix cells.
    pub fraction: (f64, f64),
    /// Uniform bounds for the per-cell porosity draw.
    pub porosity: (f64, f64),
    /// Uniform bounds for the per-cell permeability draw.
    pub permeability: (f64, f64),
    pub multx: f64,
    pub multy: f64,
    pub multpv: f64,
}

impl Default for VugDistribution {
    fn default() -> Self {
        VugDistribution {
            fraction: (0.0, 0.0),
            porosity: (0.0, 0.0),
            permeability: (0.0, 0.0),
            multx: 1.0,
            multy: 1.0,
            multpv: 1.0,
        }
    }
}

/// Full vug sampling specification: one distribution per category plus the
/// spatial constraints.
#[derive(Debug, Clone)]
pub struct VugParams {
    pub near_fracture: VugDistribution,
    pub random: VugDistribution,
    pub near_streak: VugDistribution,
    /// Minimum lateral distance (in cells) between a fracture and a
    /// near-fracture vug.
    pub distance_to_fracture: usize,
    /// Minimum candidate-domain cells per targeted vug cell before sampling.
    pub dispersion_factor: f64,
}

impl Default for VugParams {
    fn default() -> Self {
        VugParams {
            near_fracture: VugDistribution::default(),
            random: VugDistribution::default(),
            near_streak: VugDistribution::default(),
            distance_to_fracture: 1,
            dispersion_factor: crate::constants::DEFAULT_DISPERSION_FACTOR,
        }
    }
}

impl VugParams {
    fn by_category(&self, category: usize) -> &VugDistribution {
        match category {
            0 => &self.near_fracture,
            1 => &self.random,
            _ => &self.near_streak,
        }
    }
}

/// Sampled per-cell values and multipliers for one realized vug category.
#[derive(Debug, Clone, Default)]
pub struct VugProperties {
    pub porosity: Vec<f64>,
    pub permeability: Vec<f64>,
    pub multx: f64,
    pub multy: f64,
    pub multpv: f64,
}

/// Lateral Chebyshev distance (in cells, per K slice) from every cell to the
/// nearest fracture cell. `i32::MAX` where the slice holds no fracture.
fn lateral_fracture_distance(fracture_idx: &Array3<i32>) -> Array3<i32> {
    let (nx, ny, nz) = fracture_idx.dim();
    let mut dist = Array3::from_elem((nx, ny, nz), i32::MAX);

    for k in 0..nz {
        // multi-source BFS over the 8-neighborhood of the K slice
        let mut frontier: Vec<(usize, usize)> = Vec::new();
        for i in 0..nx {
            for j in 0..ny {
                if fracture_idx[[i, j, k]] != 0 {
                    dist[[i, j, k]] = 0;
                    frontier.push((i, j));
                }
            }
        }
        let mut d = 0;
        while !frontier.is_empty() {
            d += 1;
            let mut next = Vec::new();
            for &(i, j) in &frontier {
                for di in -1i64..=1 {
                    for dj in -1i64..=1 {
                        let ni = i as i64 + di;
                        let nj = j as i64 + dj;
                        if ni < 0 || nj < 0 || ni >= nx as i64 || nj >= ny as i64 {
                            continue;
                        }
                        let (ni, nj) = (ni as usize, nj as usize);
                        if dist[[ni, nj, k]] > d {
                            dist[[ni, nj, k]] = d;
                            next.push((ni, nj));
                        }
                    }
                }
            }
            frontier = next;
        }
    }
    dist
}

/// Inclusive bounding box of one streak in index space.
#[derive(Debug, Clone, Copy)]
struct StreakBox {
    i: (usize, usize),
    j: (usize, usize),
    k: (usize, usize),
}

fn streak_bounding_boxes(streak_idx: &Array3<i32>, streak_count: usize) -> Vec<StreakBox> {
    let (nx, ny, nz) = streak_idx.dim();
    let mut boxes: Vec<Option<StreakBox>> = vec![None; streak_count];
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let s = streak_idx[[i, j, k]];
                if s == BACKGROUND {
                    continue;
                }
                let entry = &mut boxes[s as usize];
                match entry {
                    None => {
                        *entry = Some(StreakBox {
                            i: (i, i),
                            j: (j, j),
                            k: (k, k),
                        })
                    }
                    Some(b) => {
                        b.i = (b.i.0.min(i), b.i.1.max(i));
                        b.j = (b.j.0.min(j), b.j.1.max(j));
                        b.k = (b.k.0.min(k), b.k.1.max(k));
                    }
                }
            }
        }
    }
    boxes.into_iter().flatten().collect()
}

/// Choose exactly `target` cells out of `candidates` by shuffling a boolean
/// flag vector, and tag them in `vug_idx`.
fn place_cells(
    vug_idx: &mut Array3<i32>,
    candidates: &[(usize, usize, usize)],
    target: usize,
    tag: i32,
    rng: &mut StdRng,
) {
    let mut flags = vec![false; candidates.len()];
    for f in flags.iter_mut().take(target) {
        *f = true;
    }
    flags.shuffle(rng);
    for (&(i, j, k), &chosen) in candidates.iter().zip(flags.iter()) {
        if chosen {
            vug_idx[[i, j, k]] = tag;
        }
    }
}

fn draw_fraction(bounds: (f64, f64), rng: &mut StdRng) -> f64 {
    rng.random_range(bounds.0..=bounds.1)
}

fn draw_cells(bounds: (f64, f64), count: usize, rng: &mut StdRng) -> Vec<f64> {
    (0..count)
        .map(|_| rng.random_range(bounds.0..=bounds.1))
        .collect()
}

/// Cells in canonical order (K outer, J middle, I inner) passing `keep`.
fn collect_cells<F>(dim: (usize, usize, usize), keep: F) -> Vec<(usize, usize, usize)>
where
    F: Fn(usize, usize, usize) -> bool,
{
    let (nx, ny, nz) = dim;
    let mut cells = Vec::new();
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                if keep(i, j, k) {
                    cells.push((i, j, k));
                }
            }
        }
    }
    cells
}

fn warn(message: String) {
    println!("{}", message.yellow());
}

/// Stochastically tag matrix cells as vugs and sample their properties.
///
/// Category order is fixed: near-fracture first, then near-streak (which may
/// claim cells already tagged near-fracture), then random in whatever matrix
/// cells remain untagged. Every draw owns its own generator seeded from
/// `base_seed` plus a fixed offset, so results are reproducible and
/// decorrelated across categories and properties.
///
/// Returns the sampled properties in internal category order: 0 =
/// near-fracture, 1 = random, 2 = near-streak.
pub fn sample_vugs(
    vug_idx: &mut Array3<i32>,
    streak_idx: &Array3<i32>,
    fracture_idx: &Array3<i32>,
    streak_count: usize,
    params: &VugParams,
    base_seed: u64,
) -> [VugProperties; VUG_CATEGORY_COUNT] {
    vug_idx.fill(0);

    let mut properties: [VugProperties; VUG_CATEGORY_COUNT] = Default::default();
    for (category, props) in properties.iter_mut().enumerate() {
        let dist = params.by_category(category);
        props.multx = dist.multx;
        props.multy = dist.multy;
        props.multpv = dist.multpv;
    }

    // all upper bounds zero: clearing the state is the whole operation
    if params.near_fracture.fraction.1 == 0.0
        && params.random.fraction.1 == 0.0
        && params.near_streak.fraction.1 == 0.0
    {
        return properties;
    }

    let dim = vug_idx.dim();
    let (nx, ny, nz) = dim;
    let max_growth = nx.max(ny).max(nz);
    let is_matrix =
        |i: usize, j: usize, k: usize| fracture_idx[[i, j, k]] == 0 && streak_idx[[i, j, k]] == BACKGROUND;
    let total_matrix_cells = collect_cells(dim, is_matrix).len();

    // --- near-fracture vugs (category 0, tag 1) ---
    let mut rng = StdRng::seed_from_u64(base_seed + SEED_OFFSET_FRACTION[0]);
    let fraction = draw_fraction(params.near_fracture.fraction, &mut rng);
    let mut target_near_fracture = (fraction * total_matrix_cells as f64).round() as usize;
    if target_near_fracture > 0 {
        let distance = lateral_fracture_distance(fracture_idx);
        let d0 = params.distance_to_fracture as i32;
        let mut thickness = 1;
        let mut candidates;
        loop {
            let band_end = d0 + thickness as i32;
            candidates = collect_cells(dim, |i, j, k| {
                is_matrix(i, j, k) && distance[[i, j, k]] >= d0 && distance[[i, j, k]] <= band_end
            });
            // legacy termination: ratio of domain size to target
            if candidates.len() as f64 / target_near_fracture as f64 >= params.dispersion_factor {
                break;
            }
            if thickness > max_growth {
                break;
            }
            thickness += 1;
        }
        if target_near_fracture > candidates.len() {
            warn(format!(
                "Warning: near-fracture vug target {} exceeds candidate domain {}, reduced",
                target_near_fracture,
                candidates.len()
            ));
            target_near_fracture = candidates.len();
        }
        let mut rng = StdRng::seed_from_u64(base_seed + SEED_OFFSET_PLACEMENT[0]);
        place_cells(
            vug_idx,
            &candidates,
            target_near_fracture,
            VUG_NEAR_FRACTURE,
            &mut rng,
        );
    }

    // --- near-streak vugs (category 2, tag 3) ---
    let mut rng = StdRng::seed_from_u64(base_seed + SEED_OFFSET_FRACTION[2]);
    let fraction = draw_fraction(params.near_streak.fraction, &mut rng);
    let mut target_near_streak = (fraction * total_matrix_cells as f64).round() as usize;
    if target_near_streak > 0 {
        let boxes = streak_bounding_boxes(streak_idx, streak_count);
        let mut thickness = 1usize;
        let mut candidates;
        loop {
            let in_grown_box = |i: usize, j: usize, k: usize| {
                boxes.iter().any(|b| {
                    i + thickness >= b.i.0
                        && i <= b.i.1 + thickness
                        && j + thickness >= b.j.0
                        && j <= b.j.1 + thickness
                        && k + thickness >= b.k.0
                        && k <= b.k.1 + thickness
                })
            };
            // the domain may claim cells already tagged near-fracture
            candidates = collect_cells(dim, |i, j, k| {
                fracture_idx[[i, j, k]] == 0
                    && streak_idx[[i, j, k]] == BACKGROUND
                    && in_grown_box(i, j, k)
            });
            // legacy termination: note the flipped comparison relative to the
            // near-fracture loop
            if candidates.len() as f64 >= params.dispersion_factor * target_near_streak as f64 {
                break;
            }
            if thickness > max_growth {
                break;
            }
            thickness += 1;
        }
        if target_near_streak > candidates.len() {
            warn(format!(
                "Warning: near-streak vug target {} exceeds candidate domain {}, reduced",
                target_near_streak,
                candidates.len()
            ));
            target_near_streak = candidates.len();
        }
        let mut rng = StdRng::seed_from_u64(base_seed + SEED_OFFSET_PLACEMENT[2]);
        place_cells(
            vug_idx,
            &candidates,
            target_near_streak,
            VUG_NEAR_STREAK,
            &mut rng,
        );
    }

    // near-streak placement may have overwritten near-fracture cells
    let realized_near_fracture = vug_idx.iter().filter(|&&v| v == VUG_NEAR_FRACTURE).count();
    if realized_near_fracture < target_near_fracture {
        warn(format!(
            "Warning: near-fracture vug count reduced from {} to {} ({:.1}% of target) by near-streak overlap",
            target_near_fracture,
            realized_near_fracture,
            100.0 * realized_near_fracture as f64 / target_near_fracture as f64
        ));
    }

    // --- random vugs (category 1, tag 2) ---
    let mut rng = StdRng::seed_from_u64(base_seed + SEED_OFFSET_FRACTION[1]);
    let fraction = draw_fraction(params.random.fraction, &mut rng);
    let mut target_random = (fraction * total_matrix_cells as f64).round() as usize;
    if target_random > 0 {
        let candidates =
            collect_cells(dim, |i, j, k| is_matrix(i, j, k) && vug_idx[[i, j, k]] == 0);
        if target_random > candidates.len() {
            warn(format!(
                "Warning: random vug target {} exceeds candidate domain {}, reduced",
                target_random,
                candidates.len()
            ));
            target_random = candidates.len();
        }
        let mut rng = StdRng::seed_from_u64(base_seed + SEED_OFFSET_PLACEMENT[1]);
        place_cells(vug_idx, &candidates, target_random, VUG_RANDOM, &mut rng);
    }

    // --- property draws, sized by the realized counts ---
    for (category, props) in properties.iter_mut().enumerate() {
        let tag = (category + 1) as i32;
        let realized = vug_idx.iter().filter(|&&v| v == tag).count();
        let dist = params.by_category(category);
        let mut rng = StdRng::seed_from_u64(base_seed + SEED_OFFSET_POROSITY[category]);
        props.porosity = draw_cells(dist.porosity, realized, &mut rng);
        let mut rng = StdRng::seed_from_u64(base_seed + SEED_OFFSET_PERMEABILITY[category]);
        props.permeability = draw_cells(dist.permeability, realized, &mut rng);
    }

    properties
}

#[cfg(test)]
mod tests {
    use super::*;
    use more_asserts::assert_ge;
    use ndarray::Array3;

    fn fracture_column(nx: usize, ny: usize, nz: usize, i: usize) -> Array3<i32> {
        let mut idx = Array3::zeros((nx, ny, nz));
        for j in 0..ny {
            for k in 0..nz {
                idx[[i, j, k]] = 1;
            }
        }
        idx
    }

    #[test]
    fn test_lateral_distance_field() {
        let fracture = fracture_column(5, 1, 1, 0);
        let dist = lateral_fracture_distance(&fracture);
        assert_eq!(dist[[0, 0, 0]], 0);
        assert_eq!(dist[[1, 0, 0]], 1);
        assert_eq!(dist[[4, 0, 0]], 4);
    }

    #[test]
    fn test_lateral_distance_no_fracture() {
        let fracture = Array3::zeros((3, 3, 1));
        let dist = lateral_fracture_distance(&fracture);
        assert!(dist.iter().all(|&d| d == i32::MAX));
    }

    #[test]
    fn test_no_op_when_all_fractions_zero() {
        let mut vug = Array3::from_elem((4, 4, 2), VUG_RANDOM);
        let streak = Array3::from_elem((4, 4, 2), -1);
        let fracture = Array3::zeros((4, 4, 2));
        let props =
            sample_vugs(&mut vug, &streak, &fracture, 0, &VugParams::default(), 42);
        assert!(vug.iter().all(|&v| v == 0), "existing state must be cleared");
        assert!(props[0].porosity.is_empty());
    }

    #[test]
    fn test_degenerate_fraction_places_exact_count() {
        // scenario: equal low/high bound must deterministically yield
        // round(0.1 * matrix cells) near-fracture vugs
        let fracture = fracture_column(11, 10, 2, 5);
        let streak = Array3::from_elem((11, 10, 2), -1);
        let mut vug = Array3::zeros((11, 10, 2));
        let params = VugParams {
            near_fracture: VugDistribution {
                fraction: (0.1, 0.1),
                porosity: (0.2, 0.3),
                permeability: (100.0, 1000.0),
                ..VugDistribution::default()
            },
            distance_to_fracture: 1,
            dispersion_factor: 1.0,
            ..VugParams::default()
        };
        let props = sample_vugs(&mut vug, &streak, &fracture, 0, &params, 7);

        let matrix_cells = 10 * 10 * 2; // one column of 11 is fracture
        let expected = (0.1 * matrix_cells as f64).round() as usize;
        let tagged = vug.iter().filter(|&&v| v == VUG_NEAR_FRACTURE).count();
        assert_eq!(tagged, expected);
        assert_eq!(props[0].porosity.len(), expected);
        assert_eq!(props[0].permeability.len(), expected);
        for &p in &props[0].porosity {
            assert!((0.2..=0.3).contains(&p));
        }
    }

    #[test]
    fn test_near_fracture_band_respects_distance() {
        let fracture = fracture_column(11, 5, 1, 5);
        let streak = Array3::from_elem((11, 5, 1), -1);
        let mut vug = Array3::zeros((11, 5, 1));
        let params = VugParams {
            near_fracture: VugDistribution {
                fraction: (0.05, 0.05),
                ..VugDistribution::default()
            },
            distance_to_fracture: 2,
            dispersion_factor: 1.0,
            ..VugParams::default()
        };
        sample_vugs(&mut vug, &streak, &fracture, 0, &params, 3);
        for i in 0..11usize {
            for j in 0..5 {
                if vug[[i, j, 0]] == VUG_NEAR_FRACTURE {
                    let d = (i as i32 - 5).abs();
                    assert_ge!(d, 2, "vug at lateral distance {} from fracture", d);
                }
            }
        }
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let fracture = fracture_column(9, 8, 3, 4);
        let mut streak = Array3::from_elem((9, 8, 3), -1);
        for i in 0..9 {
            for j in 2..5 {
                streak[[i, j, 1]] = 0;
            }
        }
        let params = VugParams {
            near_fracture: VugDistribution {
                fraction: (0.02, 0.08),
                porosity: (0.25, 0.35),
                permeability: (500.0, 2000.0),
                ..VugDistribution::default()
            },
            random: VugDistribution {
                fraction: (0.01, 0.05),
                porosity: (0.1, 0.2),
                permeability: (10.0, 50.0),
                ..VugDistribution::default()
            },
            near_streak: VugDistribution {
                fraction: (0.02, 0.06),
                porosity: (0.3, 0.4),
                permeability: (1000.0, 5000.0),
                ..VugDistribution::default()
            },
            distance_to_fracture: 1,
            dispersion_factor: 1.5,
        };

        let mut vug_a = Array3::zeros((9, 8, 3));
        let props_a = sample_vugs(&mut vug_a, &streak, &fracture, 1, &params, 1234);
        let mut vug_b = Array3::zeros((9, 8, 3));
        let props_b = sample_vugs(&mut vug_b, &streak, &fracture, 1, &params, 1234);

        assert_eq!(vug_a, vug_b);
        for c in 0..3 {
            assert_eq!(props_a[c].porosity, props_b[c].porosity);
            assert_eq!(props_a[c].permeability, props_b[c].permeability);
        }
    }

    #[test]
    fn test_near_streak_overwrite_reduces_near_fracture() {
        // streak box sits right next to the fracture column, and the
        // near-streak target equals the whole matrix domain, so every
        // near-fracture cell is claimed by near-streak afterwards
        let fracture = fracture_column(9, 8, 1, 4);
        let mut streak = Array3::from_elem((9, 8, 1), -1);
        for i in 5..=6 {
            for j in 3..=4 {
                streak[[i, j, 0]] = 0;
            }
        }
        let params = VugParams {
            near_fracture: VugDistribution {
                fraction: (0.1, 0.1),
                porosity: (0.2, 0.3),
                permeability: (100.0, 1000.0),
                ..VugDistribution::default()
            },
            near_streak: VugDistribution {
                fraction: (1.0, 1.0),
                porosity: (0.3, 0.4),
                permeability: (1000.0, 5000.0),
                ..VugDistribution::default()
            },
            distance_to_fracture: 1,
            dispersion_factor: 1.0,
            ..VugParams::default()
        };
        let mut vug = Array3::zeros((9, 8, 1));
        let props = sample_vugs(&mut vug, &streak, &fracture, 1, &params, 11);

        let matrix_cells = 9 * 8 - 8 - 4; // minus fracture column and streak box
        let near_fracture_target = (0.1 * matrix_cells as f64).round() as usize;
        let tag1 = vug.iter().filter(|&&v| v == VUG_NEAR_FRACTURE).count();
        let tag3 = vug.iter().filter(|&&v| v == VUG_NEAR_STREAK).count();
        assert_eq!(tag3, matrix_cells);
        assert_eq!(tag1, 0);
        assert!(tag1 < near_fracture_target);

        // property arrays are sized by the realized counts, not the targets
        assert_eq!(props[0].porosity.len(), tag1);
        assert_eq!(props[0].permeability.len(), tag1);
        assert_eq!(props[2].porosity.len(), tag3);
        assert_eq!(props[2].permeability.len(), tag3);
    }

    #[test]
    fn test_zone_exclusivity() {
        let fracture = fracture_column(9, 8, 3, 4);
        let mut streak = Array3::from_elem((9, 8, 3), -1);
        for i in 0..9 {
            for j in 2..5 {
                streak[[i, j, 1]] = 0;
            }
        }
        let params = VugParams {
            near_fracture: VugDistribution {
                fraction: (0.05, 0.05),
                ..VugDistribution::default()
            },
            random: VugDistribution {
                fraction: (0.05, 0.05),
                ..VugDistribution::default()
            },
            near_streak: VugDistribution {
                fraction: (0.05, 0.05),
                ..VugDistribution::default()
            },
            distance_to_fracture: 1,
            dispersion_factor: 1.0,
        };
        let mut vug = Array3::zeros((9, 8, 3));
        sample_vugs(&mut vug, &streak, &fracture, 1, &params, 99);

        for k in 0..3 {
            for j in 0..8 {
                for i in 0..9 {
                    if vug[[i, j, k]] != 0 {
                        assert_eq!(fracture[[i, j, k]], 0, "vug inside a fracture cell");
                        assert_eq!(streak[[i, j, k]], -1, "vug inside a streak cell");
                    }
                }
            }
        }
    }
}
