//! Clip mask resolution for images.
//!
//! Mask coordinates are relative to the image's bottom-left corner. The
//! resolved region is in device units in the same frame as the image, so the
//! image's rotation carries the clip along with it.

use glam::{DVec2, dvec2};

use crate::elements::{ClipMask, ImageElement};
use crate::errors::{Advisory, PathError, PathWarning};
use crate::path::parse_path;
use crate::types::{BBox, PtIn, Scaler};

use super::geometry::{Outline, star_vertices};

#[derive(Clone, Debug, PartialEq)]
pub struct ClipRegion {
    /// Mask kind, for logs and backends that special-case simple shapes
    pub kind: &'static str,
    pub outline: Outline,
    pub bounds: BBox<f64>,
    /// False when the mask misses the image entirely
    pub visible: bool,
}

#[derive(Debug)]
pub struct ResolvedClip {
    pub region: ClipRegion,
    pub advisory: Option<Advisory>,
    /// Truncation warnings from a path mask
    pub path_warnings: Vec<PathWarning>,
}

/// Resolve `image`'s mask (if any) into device space.
///
/// A path mask that does not parse, or parses but is not closed, rejects the
/// image with a [`PathError`].
pub fn resolve_clip(
    image: &ImageElement,
    region_origin: PtIn,
    scaler: &Scaler,
) -> Result<Option<ResolvedClip>, PathError> {
    let Some(mask) = &image.clip else {
        return Ok(None);
    };

    let origin = scaler.point(region_origin) + scaler.point(image.origin);
    let image_rect = BBox::from_origin_size(
        origin,
        dvec2(scaler.len(image.width), scaler.len(image.height)),
    );

    let (local, path_warnings) = mask_outline(mask)?;
    let outline = local.map(|p| origin + scaler.vec(p));
    let bounds = outline.bounds();

    let visible = bounds.intersects(&image_rect);
    let advisory = if !visible {
        crate::log::warn!(element = %image.id, "clip mask lies outside the image");
        Some(Advisory::ClipOutside { element: image.id.clone() })
    } else if !image_rect.contains(&bounds) {
        crate::log::debug!(element = %image.id, "clip mask overhangs the image");
        Some(Advisory::ClipOverhang { element: image.id.clone() })
    } else {
        None
    };

    Ok(Some(ResolvedClip {
        region: ClipRegion { kind: mask.kind(), outline, bounds, visible },
        advisory,
        path_warnings,
    }))
}

/// Mask outline in image-relative inches.
fn mask_outline(mask: &ClipMask) -> Result<(Outline, Vec<PathWarning>), PathError> {
    let outline = match mask {
        ClipMask::Circle { center, radius } => {
            Outline::ellipse(center.to_dvec2(), DVec2::splat(radius.raw()))
        }
        ClipMask::Rectangle { origin, width, height } => {
            Outline::rect(origin.to_dvec2(), dvec2(width.raw(), height.raw()))
        }
        ClipMask::Ellipse { center, radius_x, radius_y } => {
            Outline::ellipse(center.to_dvec2(), dvec2(radius_x.raw(), radius_y.raw()))
        }
        ClipMask::Star { center, outer_radius, inner_radius, points } => Outline::polygon(&star_vertices(
            center.to_dvec2(),
            outer_radius.raw(),
            inner_radius.raw(),
            *points,
        )),
        ClipMask::Path { data, scale } => {
            let parsed = parse_path(data)?;
            if !parsed.is_closed() {
                return Err(PathError::NotClosed);
            }
            let outline = Outline::from_segments(&parsed.segments).map(|p| p * *scale);
            return Ok((outline, parsed.warnings));
        }
    };
    Ok((outline, Vec::new()))
}
