//! The drawing surface the compositor talks to, and a recording backend.
//!
//! All geometry handed to a [`Backend`] is in device units with y up. The
//! compositor wraps every rotated element in exactly one
//! `push_transform`/`pop_transform` pair.

use std::fmt::{self, Write};

use glam::DVec2;

use crate::elements::TextRun;
use crate::errors::BackendError;
use crate::types::{Angle, BBox};

use super::clip::ClipRegion;
use super::geometry::Outline;
use super::style::{Paint, StrokePaint};

/// A filled and/or stroked outline.
#[derive(Clone, Copy, Debug)]
pub struct PathDraw<'a> {
    pub id: &'a str,
    pub outline: &'a Outline,
    pub fill: Option<&'a Paint>,
    pub stroke: Option<&'a StrokePaint>,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct TextDraw<'a> {
    pub id: &'a str,
    pub text: &'a TextRun,
    /// Baseline anchor in device units
    pub origin: DVec2,
    /// Font size in device units
    pub font_size: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct ImageDraw<'a> {
    pub id: &'a str,
    pub source: &'a str,
    pub dest: BBox<f64>,
    pub preserve_aspect: bool,
    pub clip: Option<&'a ClipRegion>,
    pub opacity: f64,
}

/// A drawing surface.
///
/// Any error aborts the region being rendered; the compositor does not try
/// to rebalance transforms after a failure.
pub trait Backend {
    fn draw_path(&mut self, draw: &PathDraw<'_>) -> Result<(), BackendError>;

    fn draw_text(&mut self, draw: &TextDraw<'_>) -> Result<(), BackendError>;

    fn draw_image(&mut self, draw: &ImageDraw<'_>) -> Result<(), BackendError>;

    /// Rotate subsequent drawing counter-clockwise by `angle` about `pivot`.
    fn push_transform(&mut self, angle: Angle, pivot: DVec2) -> Result<(), BackendError>;

    fn pop_transform(&mut self) -> Result<(), BackendError>;
}

// ============================================================================
// Recorder
// ============================================================================

/// One call received by a [`Recorder`], owned.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Path {
        id: String,
        bounds: BBox<f64>,
        fill: Option<Paint>,
        stroke: Option<StrokePaint>,
        opacity: f64,
    },
    Text {
        id: String,
        content: String,
        origin: DVec2,
        font_size: f64,
    },
    Image {
        id: String,
        source: String,
        dest: BBox<f64>,
        clip: Option<(&'static str, bool)>,
        opacity: f64,
    },
    Push { angle: Angle, pivot: DVec2 },
    Pop,
}

impl DrawCall {
    /// Id of the element drawn, for draw calls.
    pub fn id(&self) -> Option<&str> {
        match self {
            DrawCall::Path { id, .. } | DrawCall::Text { id, .. } | DrawCall::Image { id, .. } => Some(id),
            DrawCall::Push { .. } | DrawCall::Pop => None,
        }
    }
}

/// Backend that remembers every call. Used by tests and for debugging
/// templates without a real surface.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub calls: Vec<DrawCall>,
    depth: usize,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of drawn elements, in draw order.
    pub fn drawn_ids(&self) -> Vec<&str> {
        self.calls.iter().filter_map(DrawCall::id).collect()
    }

    /// Transforms pushed and not yet popped.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// One line per call.
    pub fn log(&self) -> String {
        let mut out = String::new();
        for call in &self.calls {
            // Writing into a String cannot fail
            let _ = writeln!(out, "{call}");
        }
        out
    }
}

impl Backend for Recorder {
    fn draw_path(&mut self, draw: &PathDraw<'_>) -> Result<(), BackendError> {
        self.calls.push(DrawCall::Path {
            id: draw.id.to_string(),
            bounds: draw.outline.bounds(),
            fill: draw.fill.cloned(),
            stroke: draw.stroke.copied(),
            opacity: draw.fill_opacity,
        });
        Ok(())
    }

    fn draw_text(&mut self, draw: &TextDraw<'_>) -> Result<(), BackendError> {
        self.calls.push(DrawCall::Text {
            id: draw.id.to_string(),
            content: draw.text.content.clone(),
            origin: draw.origin,
            font_size: draw.font_size,
        });
        Ok(())
    }

    fn draw_image(&mut self, draw: &ImageDraw<'_>) -> Result<(), BackendError> {
        self.calls.push(DrawCall::Image {
            id: draw.id.to_string(),
            source: draw.source.to_string(),
            dest: draw.dest,
            clip: draw.clip.map(|c| (c.kind, c.visible)),
            opacity: draw.opacity,
        });
        Ok(())
    }

    fn push_transform(&mut self, angle: Angle, pivot: DVec2) -> Result<(), BackendError> {
        self.depth += 1;
        self.calls.push(DrawCall::Push { angle, pivot });
        Ok(())
    }

    fn pop_transform(&mut self) -> Result<(), BackendError> {
        self.depth = self
            .depth
            .checked_sub(1)
            .ok_or_else(|| BackendError::new("pop_transform", "transform stack is empty"))?;
        self.calls.push(DrawCall::Pop);
        Ok(())
    }
}

impl fmt::Display for DrawCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawCall::Path { id, bounds, fill, stroke, opacity } => {
                write!(f, "path {id} bounds={} fill=", fmt_box(bounds))?;
                match fill {
                    None => write!(f, "none")?,
                    Some(Paint::Solid(c)) => write!(f, "solid({c})")?,
                    Some(Paint::LinearGradient { .. }) => write!(f, "linear")?,
                    Some(Paint::RadialGradient { .. }) => write!(f, "radial")?,
                    Some(Paint::Pattern(p)) => write!(f, "pattern({})", p.tile.kind.name())?,
                }
                match stroke {
                    None => write!(f, " stroke=none")?,
                    Some(s) => write!(f, " stroke={}@{}", s.color, fmt_num(s.width))?,
                }
                write!(f, " opacity={}", fmt_num(*opacity))
            }
            DrawCall::Text { id, content, origin, font_size } => write!(
                f,
                "text {id} {content:?} at={} size={}",
                fmt_point(*origin),
                fmt_num(*font_size)
            ),
            DrawCall::Image { id, source, dest, clip, opacity } => {
                write!(f, "image {id} src={source} dest={}", fmt_box(dest))?;
                match clip {
                    None => write!(f, " clip=none")?,
                    Some((kind, visible)) => write!(f, " clip={kind} visible={visible}")?,
                }
                write!(f, " opacity={}", fmt_num(*opacity))
            }
            DrawCall::Push { angle, pivot } => {
                write!(f, "push rotate={} pivot={}", fmt_num(angle.degrees()), fmt_point(*pivot))
            }
            DrawCall::Pop => write!(f, "pop"),
        }
    }
}

/// Three decimals, trailing zeros trimmed, no negative zero.
pub fn fmt_num(value: f64) -> String {
    let s = format!("{value:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        s => s.to_string(),
    }
}

fn fmt_point(p: DVec2) -> String {
    format!("({},{})", fmt_num(p.x), fmt_num(p.y))
}

fn fmt_box(b: &BBox<f64>) -> String {
    format!("{}-{}", fmt_point(b.min_corner()), fmt_point(b.max_corner()))
}
