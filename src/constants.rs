// Format and sampling constants for the sugar-cube grid generator.

/// Maximum line width for run-length-encoded GRDECL sections. Eclipse-style
/// readers reject lines longer than 132 characters.
pub const GRDECL_LINE_WIDTH: usize = 132;

/// Background tag in `streak_idx` and in the per-K streak assignment list.
pub const BACKGROUND: i32 = -1;

/// `vug_idx` tags. 0 means no vug.
pub const VUG_NEAR_FRACTURE: i32 = 1;
pub const VUG_RANDOM: i32 = 2;
pub const VUG_NEAR_STREAK: i32 = 3;

/// Number of vug categories (near-fracture, random, near-streak).
pub const VUG_CATEGORY_COUNT: usize = 3;

// Seed offsets added to the model's base seed, one per sub-draw, so every
// draw is reproducible and decorrelated across categories and properties.
// Indexed by internal vug category: 0 = near-fracture, 1 = random,
// 2 = near-streak.
pub const SEED_OFFSET_FRACTION: [u64; 3] = [1, 2, 3];
pub const SEED_OFFSET_PLACEMENT: [u64; 3] = [4, 5, 6];
pub const SEED_OFFSET_POROSITY: [u64; 3] = [7, 8, 9];
pub const SEED_OFFSET_PERMEABILITY: [u64; 3] = [10, 11, 12];

/// Default minimum spatial dilution for vug placement: the candidate domain
/// must hold at least this many cells per targeted vug cell before sampling.
pub const DEFAULT_DISPERSION_FACTOR: f64 = 1.0;
