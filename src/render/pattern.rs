//! Pattern tiles and the shared tile cache.
//!
//! A tile is a square in device units with its origin at the bottom-left
//! corner. Backends repeat it across the fill area (rotated about the area's
//! center) and clip it to the shape outline.

use std::collections::HashMap;
use std::sync::Arc;

use glam::{DVec2, dvec2};
use parking_lot::RwLock;

use crate::color::Color;
use crate::fill::PatternKind;
use crate::types::BBox;

use super::defaults::{DOT_RATIO, GRID_LINE_RATIO, MIN_TILE};

#[derive(Clone, Debug, PartialEq)]
pub enum TilePrimitive {
    Rect { origin: DVec2, size: DVec2, color: Color },
    Circle { center: DVec2, radius: f64, color: Color },
    Line { start: DVec2, end: DVec2, width: f64, color: Color },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatternTile {
    pub kind: PatternKind,
    /// Edge length in device units
    pub size: f64,
    /// Painted across the whole tile before the primitives
    pub background: Option<Color>,
    pub primitives: Vec<TilePrimitive>,
}

impl PatternTile {
    /// Build the tile for `kind`. `size` is clamped to the minimum tile edge.
    pub fn build(kind: PatternKind, size: f64, colors: &[Color]) -> PatternTile {
        let size = size.max(MIN_TILE);
        let first = colors.first().copied().unwrap_or(Color::BLACK);
        let second = colors.get(1).copied();

        let mut background = None;
        let primitives = match kind {
            PatternKind::Stripes => {
                let bands = colors.len().max(1);
                let band = size / bands as f64;
                colors
                    .iter()
                    .enumerate()
                    .map(|(i, &color)| TilePrimitive::Rect {
                        origin: dvec2(band * i as f64, 0.0),
                        size: dvec2(band, size),
                        color,
                    })
                    .collect()
            }
            PatternKind::Dots => {
                background = second;
                vec![TilePrimitive::Circle {
                    center: DVec2::splat(size / 2.0),
                    radius: size * DOT_RATIO,
                    color: first,
                }]
            }
            PatternKind::Grid => {
                let width = (size * GRID_LINE_RATIO).max(1.0);
                vec![
                    TilePrimitive::Line { start: DVec2::ZERO, end: dvec2(size, 0.0), width, color: first },
                    TilePrimitive::Line { start: DVec2::ZERO, end: dvec2(0.0, size), width, color: first },
                ]
            }
            PatternKind::Checkerboard => {
                let half = size / 2.0;
                let cell = DVec2::splat(half);
                let other = second.unwrap_or(Color::WHITE);
                vec![
                    TilePrimitive::Rect { origin: dvec2(0.0, half), size: cell, color: first },
                    TilePrimitive::Rect { origin: dvec2(half, 0.0), size: cell, color: first },
                    TilePrimitive::Rect { origin: dvec2(half, half), size: cell, color: other },
                    TilePrimitive::Rect { origin: DVec2::ZERO, size: cell, color: other },
                ]
            }
        };

        PatternTile { kind, size, background, primitives }
    }

    /// Bottom-left corners of the tiles needed to cover `area`, starting at
    /// its bottom-left corner, with one extra row and column of margin.
    pub fn placements(&self, area: &BBox<f64>) -> Vec<DVec2> {
        if area.is_empty() {
            return Vec::new();
        }
        let cols = (area.width() / self.size).ceil() as usize + 1;
        let rows = (area.height() / self.size).ceil() as usize + 1;
        let origin = area.min_corner();
        let mut out = Vec::with_capacity(cols * rows);
        for i in 0..cols {
            for j in 0..rows {
                out.push(origin + dvec2(i as f64, j as f64) * self.size);
            }
        }
        out
    }
}

/// Cache identity: kind, exact tile edge and colors.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileKey {
    kind: PatternKind,
    size_bits: u64,
    colors: Vec<Color>,
}

impl TileKey {
    pub fn new(kind: PatternKind, size: f64, colors: &[Color]) -> Self {
        TileKey {
            kind,
            size_bits: size.max(MIN_TILE).to_bits(),
            colors: colors.to_vec(),
        }
    }
}

/// Tiles shared across regions rendered concurrently.
///
/// Tiles are built outside the lock and published with a single insert; if
/// two regions race on the same key the first insert wins and both get the
/// same `Arc`.
#[derive(Debug, Default)]
pub struct TileCache {
    tiles: RwLock<HashMap<TileKey, Arc<PatternTile>>>,
}

impl TileCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(&self, kind: PatternKind, size: f64, colors: &[Color]) -> Arc<PatternTile> {
        let key = TileKey::new(kind, size, colors);
        if let Some(tile) = self.tiles.read().get(&key) {
            return Arc::clone(tile);
        }

        let tile = Arc::new(PatternTile::build(kind, size, colors));
        crate::log::debug!(kind = kind.name(), size = tile.size, "built pattern tile");
        let mut tiles = self.tiles.write();
        Arc::clone(tiles.entry(key).or_insert(tile))
    }

    pub fn len(&self) -> usize {
        self.tiles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);
    const GREEN: Color = Color::rgb(0, 255, 0);

    #[test]
    fn stripes_split_tile_evenly() {
        let tile = PatternTile::build(PatternKind::Stripes, 18.0, &[RED, GREEN]);
        assert_eq!(
            tile.primitives,
            vec![
                TilePrimitive::Rect { origin: dvec2(0.0, 0.0), size: dvec2(9.0, 18.0), color: RED },
                TilePrimitive::Rect { origin: dvec2(9.0, 0.0), size: dvec2(9.0, 18.0), color: GREEN },
            ]
        );
        assert_eq!(tile.background, None);
    }

    #[test]
    fn dots_use_second_color_as_background() {
        let tile = PatternTile::build(PatternKind::Dots, 10.0, &[RED, GREEN]);
        assert_eq!(tile.background, Some(GREEN));
        assert_eq!(
            tile.primitives,
            vec![TilePrimitive::Circle { center: dvec2(5.0, 5.0), radius: 3.0, color: RED }]
        );
    }

    #[test]
    fn grid_line_width_has_floor() {
        let tile = PatternTile::build(PatternKind::Grid, 10.0, &[RED]);
        match &tile.primitives[0] {
            TilePrimitive::Line { width, .. } => assert_eq!(*width, 1.0),
            other => panic!("expected line, got {other:?}"),
        }
        let wide = PatternTile::build(PatternKind::Grid, 100.0, &[RED]);
        match &wide.primitives[1] {
            TilePrimitive::Line { width, end, .. } => {
                assert_eq!(*width, 5.0);
                assert_eq!(*end, dvec2(0.0, 100.0));
            }
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn checkerboard_defaults_second_color_to_white() {
        let tile = PatternTile::build(PatternKind::Checkerboard, 4.0, &[RED]);
        let whites = tile
            .primitives
            .iter()
            .filter(|p| matches!(p, TilePrimitive::Rect { color, .. } if *color == Color::WHITE))
            .count();
        assert_eq!(whites, 2);
    }

    #[test]
    fn tiny_tiles_are_clamped() {
        let tile = PatternTile::build(PatternKind::Dots, 0.5, &[RED]);
        assert_eq!(tile.size, MIN_TILE);
    }

    #[test]
    fn placements_cover_area_with_margin() {
        let tile = PatternTile::build(PatternKind::Dots, 10.0, &[RED]);
        let area = BBox::from_origin_size(dvec2(5.0, 5.0), dvec2(25.0, 10.0));
        let spots = tile.placements(&area);
        // ceil(2.5) + 1 columns, ceil(1) + 1 rows
        assert_eq!(spots.len(), 4 * 2);
        assert_eq!(spots[0], dvec2(5.0, 5.0));
        assert_eq!(spots[7], dvec2(35.0, 15.0));
    }

    #[test]
    fn cache_shares_tiles_by_key() {
        let cache = TileCache::new();
        let a = cache.get_or_build(PatternKind::Stripes, 18.0, &[RED, GREEN]);
        let b = cache.get_or_build(PatternKind::Stripes, 18.0, &[RED, GREEN]);
        assert!(Arc::ptr_eq(&a, &b));
        let _ = cache.get_or_build(PatternKind::Stripes, 18.0, &[GREEN, RED]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn cache_is_safe_across_threads() {
        let cache = TileCache::new();
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| cache.get_or_build(PatternKind::Grid, 36.0, &[RED]));
            }
        });
        assert_eq!(cache.len(), 1);
    }
}
