//! Default settings and fixed proportions (lengths in inches)

use crate::types::Length as Inches;

/// Device units per inch: PDF points.
pub const DEVICE_UNITS_PER_INCH: f64 = 72.0;

pub const SHAPE_LAYER: i32 = 0;
pub const TEXT_LAYER: i32 = 100;
pub const IMAGE_LAYER: i32 = 100;

pub const FONT_FAMILY: &str = "Helvetica";
pub const FONT_SIZE: f64 = 12.0;
pub const MIN_FONT_SIZE: f64 = 6.0;
pub const MAX_FONT_SIZE: f64 = 144.0;
pub const MAX_TEXT_CHARS: usize = 1000;

pub const STAR_POINTS: u32 = 5;
pub const MIN_STAR_POINTS: u32 = 3;
pub const MAX_STAR_POINTS: u32 = 20;

pub const MIN_STOPS: usize = 2;
pub const MAX_STOPS: usize = 20;

pub const MAX_PATH_SCALE: f64 = 10.0;

pub const PATTERN_SPACING: Inches = Inches(0.25);
pub const MAX_PATTERN_SPACING: Inches = Inches(2.0);
pub const MAX_PATTERN_SCALE: f64 = 5.0;
pub const MAX_PATTERN_COLORS: usize = 2;

/// Smallest pattern tile edge, in device units
pub const MIN_TILE: f64 = 2.0;
/// Dot radius as a fraction of the tile edge
pub const DOT_RATIO: f64 = 0.3;
/// Grid line width as a fraction of the tile edge (at least one device unit)
pub const GRID_LINE_RATIO: f64 = 0.05;

/// Control-point distance for a quarter circle drawn as one cubic
pub const KAPPA: f64 = 0.552_284_749_830_793_4;
