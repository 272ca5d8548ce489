// Runtime defaults
pub const CANVAS_WIDTH: usize = 1024;
pub const CANVAS_HEIGHT: usize = 768;
pub const FIELD_OF_VIEW: f64 = 1.0;
pub const OUT_FILE: &'static str = "./out.png";

// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Maximum recursion depth; depths 0 through MAX_DEPTH are shaded
pub const MAX_DEPTH: usize = 4;

// Hits at or beyond this distance count as misses
pub const MAX_DISTANCE: f64 = 1000.0;

// Secondary ray origins are pushed off the surface by this much
pub const SURFACE_OFFSET: f64 = 1e-3;

// Rays flatter than this never meet the floor
pub const FLOOR_PARALLEL_EPSILON: f64 = 1e-3;

// Background (sky) color, in 8-bit channel units
pub const BACKGROUND_RGB: (u8, u8, u8) = (55, 176, 202);

// Common refraction indices
pub const VACUUM_RI: f64 = 1.0;
pub const GLASS_RI: f64 = 1.5;
