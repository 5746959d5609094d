//! Everything a region can contain besides bare shapes: text runs, images
//! with clip masks, and composite elements, plus the region and template
//! containers.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::color::Color;
use crate::render::defaults;
use crate::shapes::{Geometry, Shape};
use crate::types::{Angle, Length, PtIn};

/// Layering keys assigned when a template does not give one.
///
/// Text and images default above shapes so templates written before
/// layering existed keep rendering the way they always did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerDefaults {
    pub shape: i32,
    pub text: i32,
    pub image: i32,
}

impl LayerDefaults {
    pub const BACKWARD_COMPATIBLE: LayerDefaults = LayerDefaults {
        shape: defaults::SHAPE_LAYER,
        text: defaults::TEXT_LAYER,
        image: defaults::IMAGE_LAYER,
    };
}

impl Default for LayerDefaults {
    fn default() -> Self {
        LayerDefaults::BACKWARD_COMPATIBLE
    }
}

// ============================================================================
// Text
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub id: String,
    pub content: String,
    /// Baseline anchor; alignment is relative to it
    pub origin: PtIn,
    pub font_family: String,
    /// Font size in points
    pub font_size: f64,
    pub font_style: FontStyle,
    pub color: Color,
    pub alignment: TextAlign,
    pub rotation: Angle,
    pub layer: i32,
}

impl TextRun {
    pub fn new(id: impl Into<String>, content: impl Into<String>, origin: PtIn, layer: i32) -> Self {
        TextRun {
            id: id.into(),
            content: content.into(),
            origin,
            font_family: defaults::FONT_FAMILY.to_string(),
            font_size: defaults::FONT_SIZE,
            font_style: FontStyle::Normal,
            color: Color::BLACK,
            alignment: TextAlign::Left,
            rotation: Angle::ZERO,
            layer,
        }
    }
}

// ============================================================================
// Images and clip masks
// ============================================================================

/// Clip geometry in coordinates relative to the image's bottom-left corner.
#[derive(Clone, Debug, PartialEq)]
pub enum ClipMask {
    Circle { center: PtIn, radius: Length },
    Rectangle { origin: PtIn, width: Length, height: Length },
    Ellipse { center: PtIn, radius_x: Length, radius_y: Length },
    Star { center: PtIn, outer_radius: Length, inner_radius: Length, points: u32 },
    /// Must be closed. Path units are scaled by `scale`.
    Path { data: String, scale: f64 },
}

impl ClipMask {
    pub fn kind(&self) -> &'static str {
        match self {
            ClipMask::Circle { .. } => "circle",
            ClipMask::Rectangle { .. } => "rectangle",
            ClipMask::Ellipse { .. } => "ellipse",
            ClipMask::Star { .. } => "star",
            ClipMask::Path { .. } => "path",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageElement {
    pub id: String,
    /// Opaque to the engine; the backend resolves it
    pub source: String,
    /// Bottom-left corner of the placement rectangle
    pub origin: PtIn,
    pub width: Length,
    pub height: Length,
    pub preserve_aspect: bool,
    pub rotation: Angle,
    pub opacity: f64,
    pub layer: i32,
    pub clip: Option<ClipMask>,
}

impl ImageElement {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        origin: PtIn,
        width: f64,
        height: f64,
        layer: i32,
    ) -> Self {
        ImageElement {
            id: id.into(),
            source: source.into(),
            origin,
            width: Length(width),
            height: Length(height),
            preserve_aspect: true,
            rotation: Angle::ZERO,
            opacity: 1.0,
            layer,
            clip: None,
        }
    }

    pub fn with_clip(mut self, clip: ClipMask) -> Self {
        self.clip = Some(clip);
        self
    }

    /// Rotation pivot: the center of the placement rectangle.
    pub fn pivot(&self) -> PtIn {
        PtIn::new(self.origin.x + self.width / 2.0, self.origin.y + self.height / 2.0)
    }
}

// ============================================================================
// Composites
// ============================================================================

/// A placed instance of a named composite definition.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeElement {
    pub id: String,
    pub name: String,
    pub anchor: PtIn,
    pub scale: f64,
    pub rotation: Angle,
    /// Role overrides laid over the definition's defaults
    pub palette: BTreeMap<String, Color>,
    pub layer: i32,
}

impl CompositeElement {
    pub fn new(id: impl Into<String>, name: impl Into<String>, anchor: PtIn) -> Self {
        CompositeElement {
            id: id.into(),
            name: name.into(),
            anchor,
            scale: 1.0,
            rotation: Angle::ZERO,
            palette: BTreeMap::new(),
            layer: defaults::SHAPE_LAYER,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>, color: Color) -> Self {
        self.palette.insert(role.into(), color);
        self
    }
}

/// One shape of a composite definition, in the composite's local frame.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeMember {
    pub shape: Shape,
    /// Explicit layer; when absent the member takes the element's layer
    pub layer: Option<i32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompositeDefinition {
    pub name: String,
    pub description: String,
    pub default_width: Length,
    pub default_height: Length,
    /// Default color for each role
    pub roles: BTreeMap<String, Color>,
    pub members: Vec<CompositeMember>,
}

impl CompositeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        CompositeDefinition {
            name: name.into(),
            description: String::new(),
            default_width: Length(1.0),
            default_height: Length(1.0),
            roles: BTreeMap::new(),
            members: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>, color: Color) -> Self {
        self.roles.insert(role.into(), color);
        self
    }

    pub fn with_member(mut self, shape: impl Into<Shape>, layer: Option<i32>) -> Self {
        self.members.push(CompositeMember { shape: shape.into(), layer });
        self
    }
}

// ============================================================================
// Compositor input
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Shape(Shape),
    Composite(CompositeElement),
    Text(TextRun),
    Image(ImageElement),
}

impl Element {
    pub fn id(&self) -> &str {
        match self {
            Element::Shape(s) => s.id(),
            Element::Composite(c) => &c.id,
            Element::Text(t) => &t.id,
            Element::Image(i) => &i.id,
        }
    }

    /// The layering key the compositor sorts by.
    pub fn layer(&self) -> i32 {
        match self {
            Element::Shape(s) => s.attrs().layer,
            Element::Composite(c) => c.layer,
            Element::Text(t) => t.layer,
            Element::Image(i) => i.layer,
        }
    }
}

impl From<Shape> for Element {
    fn from(shape: Shape) -> Self {
        Element::Shape(shape)
    }
}

impl From<CompositeElement> for Element {
    fn from(c: CompositeElement) -> Self {
        Element::Composite(c)
    }
}

impl From<TextRun> for Element {
    fn from(t: TextRun) -> Self {
        Element::Text(t)
    }
}

impl From<ImageElement> for Element {
    fn from(i: ImageElement) -> Self {
        Element::Image(i)
    }
}

/// A rectangular area of a page with its own element list.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub name: String,
    /// Offset of the region's bottom-left corner on the page
    pub origin: PtIn,
    pub width: Length,
    pub height: Length,
    pub elements: Vec<Element>,
}

impl Region {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Region {
            name: name.into(),
            origin: PtIn::default(),
            width: Length(width),
            height: Length(height),
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: impl Into<Element>) -> &mut Self {
        self.elements.push(element.into());
        self
    }
}

/// A whole card: named regions rendered in order.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    pub name: String,
    pub regions: Vec<Region>,
}
