//! Region compositing.
//!
//! This module is organized into submodules:
//! - `defaults`: Default sizes, layers and fixed proportions
//! - `context`: RenderContext shared by every region of a render
//! - `geometry`: Outlines for shapes and parsed paths
//! - `style`: Fill and stroke resolution
//! - `pattern`: Pattern tiles and their cache
//! - `composite`: The composite library and element expansion
//! - `clip`: Image clip masks
//! - `backend`: The drawing surface trait and a recording backend
//!
//! [`render_region`] turns a region's element list into backend calls:
//! composites are expanded in place, every element is validated and
//! resolved into device units, the survivors are stably sorted by layer and
//! each is emitted as exactly one draw call. A rejected element is recorded
//! in the [`RegionReport`] and the rest of the region still renders.

pub mod backend;
pub mod clip;
pub mod composite;
pub mod context;
pub mod defaults;
pub mod geometry;
pub mod pattern;
pub mod style;

pub use backend::{Backend, DrawCall, ImageDraw, PathDraw, Recorder, TextDraw};
pub use clip::ClipRegion;
pub use composite::{CompositeLibrary, Expansion, expand};
pub use context::{RenderConfig, RenderContext};
pub use geometry::{Outline, PathEl};
pub use style::{Paint, ResolvedStyle, StrokePaint};

use glam::{DVec2, dvec2};
use rayon::prelude::*;

use crate::elements::{CompositeElement, Element, ImageElement, Region, Template, TextRun};
use crate::errors::{BackendError, ElementError, Warning};
use crate::path::parse_path;
use crate::shapes::{Geometry, Shape};
use crate::types::{Angle, BBox};
use crate::validate::{check, validate_composite, validate_image, validate_text};

use clip::resolve_clip;
use geometry::shape_outline;
use style::resolve_style;

/// What happened while rendering one region.
#[derive(Debug, Default)]
pub struct RegionReport {
    pub region: String,
    /// Elements handed to the backend
    pub draw_calls: usize,
    /// Valid elements that would not have put anything on the page
    pub skipped: usize,
    /// Elements that were rejected
    pub errors: Vec<ElementError>,
    pub warnings: Vec<Warning>,
}

impl RegionReport {
    fn new(region: &str) -> Self {
        RegionReport { region: region.to_string(), ..Default::default() }
    }

    /// No element was rejected.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn reject(&mut self, error: impl Into<ElementError>) {
        let error = error.into();
        crate::log::warn!(region = %self.region, "{error}");
        self.errors.push(error);
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn skip(&mut self, id: &str) {
        crate::log::debug!(region = %self.region, element = id, "nothing to draw, skipping");
        self.skipped += 1;
    }
}

/// An element resolved into device units, ready to emit.
struct Item<'a> {
    layer: i32,
    rotation: Angle,
    pivot: DVec2,
    draw: Prepared<'a>,
}

enum Prepared<'a> {
    Path {
        id: String,
        outline: Outline,
        style: ResolvedStyle,
    },
    Text {
        text: &'a TextRun,
        origin: DVec2,
        font_size: f64,
    },
    Image {
        image: &'a ImageElement,
        dest: BBox<f64>,
        clip: Option<ClipRegion>,
    },
}

/// Render one region to `backend`.
///
/// Only a backend failure aborts; everything else lands in the report.
pub fn render_region<B: Backend + ?Sized>(
    region: &Region,
    ctx: &RenderContext,
    backend: &mut B,
) -> Result<RegionReport, BackendError> {
    let mut report = RegionReport::new(&region.name);
    let mut items = Vec::with_capacity(region.elements.len());

    for element in &region.elements {
        match element {
            Element::Shape(shape) => items.extend(prepare_shape(shape, region, ctx, &mut report)),
            Element::Composite(composite) => match expand_checked(composite, ctx) {
                Ok(expansion) => {
                    for error in expansion.errors {
                        report.reject(error);
                    }
                    for shape in &expansion.shapes {
                        items.extend(prepare_shape(shape, region, ctx, &mut report));
                    }
                }
                Err(error) => report.reject(error),
            },
            Element::Text(text) => items.extend(prepare_text(text, region, ctx, &mut report)),
            Element::Image(image) => items.extend(prepare_image(image, region, ctx, &mut report)),
        }
    }

    // Stable: equal layers keep declaration order
    items.sort_by_key(|item| item.layer);

    for item in &items {
        emit(item, backend)?;
        report.draw_calls += 1;
    }

    crate::log::debug!(
        region = %region.name,
        draw_calls = report.draw_calls,
        skipped = report.skipped,
        errors = report.errors.len(),
        "rendered region"
    );
    Ok(report)
}

/// Render every region of a template in order, stopping at the first
/// backend failure.
pub fn render_template<B: Backend + ?Sized>(
    template: &Template,
    ctx: &RenderContext,
    backend: &mut B,
) -> Result<Vec<RegionReport>, BackendError> {
    template
        .regions
        .iter()
        .map(|region| render_region(region, ctx, backend))
        .collect()
}

/// Render independent regions concurrently, one backend per region.
///
/// Results come back in region order. The context (and its tile cache) is
/// shared; a failing region does not affect the others.
pub fn render_regions_parallel<B, F>(
    regions: &[Region],
    ctx: &RenderContext,
    make_backend: F,
) -> Vec<(B, Result<RegionReport, BackendError>)>
where
    B: Backend + Send,
    F: Fn(&Region) -> B + Sync,
{
    regions
        .par_iter()
        .map(|region| {
            let mut backend = make_backend(region);
            let result = render_region(region, ctx, &mut backend);
            (backend, result)
        })
        .collect()
}

fn emit<B: Backend + ?Sized>(item: &Item<'_>, backend: &mut B) -> Result<(), BackendError> {
    let rotated = !item.rotation.is_zero();
    if rotated {
        backend.push_transform(item.rotation, item.pivot)?;
    }
    match &item.draw {
        Prepared::Path { id, outline, style } => backend.draw_path(&PathDraw {
            id,
            outline,
            fill: style.fill.as_ref(),
            stroke: style.stroke.as_ref(),
            fill_opacity: style.fill_opacity,
            stroke_opacity: style.stroke_opacity,
        })?,
        Prepared::Text { text, origin, font_size } => backend.draw_text(&TextDraw {
            id: &text.id,
            text,
            origin: *origin,
            font_size: *font_size,
        })?,
        Prepared::Image { image, dest, clip } => backend.draw_image(&ImageDraw {
            id: &image.id,
            source: &image.source,
            dest: *dest,
            preserve_aspect: image.preserve_aspect,
            clip: clip.as_ref(),
            opacity: image.opacity,
        })?,
    }
    if rotated {
        backend.pop_transform()?;
    }
    Ok(())
}

/// A composite with a bad placement is rejected whole, before any member is
/// expanded.
fn expand_checked(composite: &CompositeElement, ctx: &RenderContext) -> Result<Expansion, ElementError> {
    validate_composite(composite)?;
    Ok(expand(composite, &ctx.library)?)
}

fn prepare_shape<'a>(
    shape: &Shape,
    region: &Region,
    ctx: &RenderContext,
    report: &mut RegionReport,
) -> Option<Item<'a>> {
    let advisories = match check(shape) {
        Ok(advisories) => advisories,
        Err(error) => {
            report.reject(error);
            return None;
        }
    };
    report.warnings.extend(advisories.into_iter().map(Warning::from));

    let attrs = shape.attrs();
    if attrs.opacity == 0.0 || attrs.is_noop() {
        report.skip(&attrs.id);
        return None;
    }

    let parsed = match shape {
        Shape::Path(p) => match parse_path(&p.data) {
            Ok(mut parsed) => {
                report.warnings.extend(
                    parsed
                        .warnings
                        .drain(..)
                        .map(|source| Warning::Path { element: attrs.id.clone(), source }),
                );
                Some(parsed)
            }
            Err(source) => {
                report.reject(ElementError::Path { element: attrs.id.clone(), source });
                return None;
            }
        },
        _ => None,
    };

    let offset = ctx.scaler.point(region.origin);
    let outline = shape_outline(shape, parsed.as_ref()).map(|p| offset + ctx.scaler.vec(p));
    let bounds = outline.bounds();

    let mut style = match resolve_style(attrs, &bounds, ctx) {
        Ok(style) => style,
        Err(error) => {
            report.reject(error);
            return None;
        }
    };
    if matches!(shape, Shape::Line(_)) {
        style.fill = None;
    }
    if style.is_invisible() {
        report.skip(&attrs.id);
        return None;
    }

    let pivot = match shape {
        // Same answer as `Geometry::pivot`, without parsing the path again
        Shape::Path(p) if p.pivot.is_none() => bounds.center(),
        _ => offset + ctx.scaler.point(shape.pivot()),
    };

    Some(Item {
        layer: attrs.layer,
        rotation: attrs.rotation,
        pivot,
        draw: Prepared::Path { id: attrs.id.clone(), outline, style },
    })
}

fn prepare_text<'a>(
    text: &'a TextRun,
    region: &Region,
    ctx: &RenderContext,
    report: &mut RegionReport,
) -> Option<Item<'a>> {
    if let Err(error) = validate_text(text) {
        report.reject(error);
        return None;
    }
    let origin = ctx.scaler.point(region.origin) + ctx.scaler.point(text.origin);
    Some(Item {
        layer: text.layer,
        rotation: text.rotation,
        pivot: origin,
        draw: Prepared::Text {
            text,
            origin,
            font_size: ctx.scaler.points(text.font_size),
        },
    })
}

fn prepare_image<'a>(
    image: &'a ImageElement,
    region: &Region,
    ctx: &RenderContext,
    report: &mut RegionReport,
) -> Option<Item<'a>> {
    if let Err(error) = validate_image(image) {
        report.reject(error);
        return None;
    }
    if image.opacity == 0.0 {
        report.skip(&image.id);
        return None;
    }

    let clip = match resolve_clip(image, region.origin, &ctx.scaler) {
        Ok(clip) => clip,
        Err(source) => {
            report.reject(ElementError::Path { element: image.id.clone(), source });
            return None;
        }
    };
    let clip = clip.map(|resolved| {
        report.warnings.extend(resolved.advisory.map(Warning::from));
        report.warnings.extend(
            resolved
                .path_warnings
                .into_iter()
                .map(|source| Warning::Path { element: image.id.clone(), source }),
        );
        resolved.region
    });

    let offset = ctx.scaler.point(region.origin);
    let dest = BBox::from_origin_size(
        offset + ctx.scaler.point(image.origin),
        dvec2(ctx.scaler.len(image.width), ctx.scaler.len(image.height)),
    );
    Some(Item {
        layer: image.layer,
        rotation: image.rotation,
        pivot: offset + ctx.scaler.point(image.pivot()),
        draw: Prepared::Image { image, dest, clip },
    })
}
