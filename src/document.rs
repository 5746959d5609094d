//! TOML template documents and composite libraries.
//!
//! The declaration types mirror the document layout field for field and are
//! private; loading converts them into the engine's element model. Only
//! syntax and types are checked here, ranges are left to validation so a
//! single bad element does not sink a whole template.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::color::{Color, ColorSpec};
use crate::elements::{
    ClipMask, CompositeDefinition, CompositeElement, CompositeMember, Element, FontStyle, ImageElement, LayerDefaults,
    Region, Template, TextAlign, TextRun,
};
use crate::errors::LoadError;
use crate::fill::{ColorStop, Fill, PatternKind};
use crate::render::CompositeLibrary;
use crate::render::defaults;
use crate::shapes::{Circle, Line, PathShape, Rectangle, Shape, ShapeAttrs, Star, Triangle};
use crate::types::{Angle, Length, Point, PtIn};

// ============================================================================
// Public entry points
// ============================================================================

/// Load a template document. Elements that declare no layer get the one
/// `layers` assigns to their kind.
pub fn load_template(src: &str, layers: &LayerDefaults) -> Result<Template, LoadError> {
    let decl: TemplateDecl = toml::from_str(src)?;
    let regions = decl
        .regions
        .into_iter()
        .map(|region| region.into_region(layers))
        .collect();
    crate::log::debug!(template = %decl.name, "loaded template");
    Ok(Template { name: decl.name, regions })
}

/// Load a document holding one composite definition.
pub fn load_definition(src: &str) -> Result<CompositeDefinition, LoadError> {
    let decl: CompositeDefinitionDecl = toml::from_str(src)?;
    decl.into_definition()
}

impl CompositeLibrary {
    /// Load every `[[composites]]` entry of a document. Other top-level
    /// keys are ignored, so a template may carry its own composites.
    pub fn from_toml(src: &str) -> Result<Self, LoadError> {
        let decl: LibraryDecl = toml::from_str(src)?;
        let mut library = CompositeLibrary::new();
        for definition in decl.composites {
            library.insert(definition.into_definition()?);
        }
        Ok(library)
    }

    /// Load one definition per `*.toml` file found under `dir`, recursively,
    /// in path order. A later file with the same name replaces an earlier one.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        let mut files = Vec::new();
        collect_toml_files(dir.as_ref(), &mut files)?;
        files.sort();

        let mut library = CompositeLibrary::new();
        for path in files {
            let src = fs::read_to_string(&path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
            let definition = load_definition(&src).map_err(|e| LoadError::InFile {
                path: path.clone(),
                source: Box::new(e),
            })?;
            library.insert(definition);
        }
        Ok(library)
    }
}

fn collect_toml_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    let io = |source| LoadError::Io { path: dir.to_path_buf(), source };
    for entry in fs::read_dir(dir).map_err(io)? {
        let path = entry.map_err(io)?.path();
        if path.is_dir() {
            collect_toml_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            out.push(path);
        }
    }
    Ok(())
}

// ============================================================================
// Declarations
// ============================================================================

fn one() -> f64 {
    1.0
}

fn half() -> f64 {
    0.5
}

fn yes() -> bool {
    true
}

fn star_points() -> u32 {
    defaults::STAR_POINTS
}

fn pattern_spacing() -> f64 {
    defaults::PATTERN_SPACING.raw()
}

fn font_family() -> String {
    defaults::FONT_FAMILY.to_string()
}

fn font_size() -> f64 {
    defaults::FONT_SIZE
}

#[derive(Debug, Deserialize)]
struct TemplateDecl {
    name: String,
    #[serde(default)]
    regions: Vec<RegionDecl>,
}

#[derive(Debug, Deserialize)]
struct RegionDecl {
    name: String,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    width: f64,
    height: f64,
    #[serde(default)]
    shapes: Vec<ShapeDecl>,
    #[serde(default)]
    texts: Vec<TextDecl>,
    #[serde(default)]
    images: Vec<ImageDecl>,
}

impl RegionDecl {
    /// Shapes keep their order, followed by texts, then images.
    fn into_region(self, layers: &LayerDefaults) -> Region {
        let mut region = Region::new(&self.name, self.width, self.height);
        region.origin = PtIn::inches(self.x, self.y);

        for (index, shape) in self.shapes.into_iter().enumerate() {
            let id = shape.id().map_or_else(|| format!("{}/{}{index}", self.name, shape.kind()), str::to_string);
            region.push(shape.into_element(id, layers.shape));
        }
        for (index, text) in self.texts.into_iter().enumerate() {
            let id = text.id.clone().unwrap_or_else(|| format!("{}/text{index}", self.name));
            region.push(text.into_text(id, layers.text));
        }
        for (index, image) in self.images.into_iter().enumerate() {
            let id = image.id.clone().unwrap_or_else(|| format!("{}/image{index}", self.name));
            region.push(image.into_image(id, layers.image));
        }
        region
    }
}

/// Fields shared by every primitive shape.
#[derive(Debug, Deserialize)]
struct CommonDecl {
    id: Option<String>,
    z_index: Option<i32>,
    /// Shorthand for a solid fill
    fill_color: Option<ColorSpec>,
    fill: Option<FillDecl>,
    stroke_color: Option<ColorSpec>,
    #[serde(default)]
    stroke_width: f64,
    #[serde(default = "one")]
    opacity: f64,
    #[serde(default)]
    rotation: f64,
}

impl CommonDecl {
    /// A `fill` table wins over the `fill_color` shorthand.
    fn into_attrs(self, id: String, layer: i32) -> ShapeAttrs {
        let fill = match self.fill {
            Some(fill) => Some(fill.into_fill()),
            None => self.fill_color.map(Fill::Solid),
        };
        ShapeAttrs {
            id,
            layer: self.z_index.unwrap_or(layer),
            fill,
            stroke_color: self.stroke_color,
            stroke_width: self.stroke_width,
            opacity: self.opacity,
            rotation: Angle(self.rotation),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ShapeDecl {
    Rectangle(RectangleDecl),
    Circle(CircleDecl),
    Triangle(TriangleDecl),
    Star(StarDecl),
    Line(LineDecl),
    #[serde(alias = "svg_path")]
    Path(PathDecl),
    #[serde(alias = "decorative_element")]
    CompositeElement(CompositeElementDecl),
}

#[derive(Debug, Deserialize)]
struct RectangleDecl {
    #[serde(flatten)]
    common: CommonDecl,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[derive(Debug, Deserialize)]
struct CircleDecl {
    #[serde(flatten)]
    common: CommonDecl,
    center_x: f64,
    center_y: f64,
    radius: f64,
}

#[derive(Debug, Deserialize)]
struct TriangleDecl {
    #[serde(flatten)]
    common: CommonDecl,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
}

#[derive(Debug, Deserialize)]
struct StarDecl {
    #[serde(flatten)]
    common: CommonDecl,
    center_x: f64,
    center_y: f64,
    outer_radius: f64,
    inner_radius: f64,
    #[serde(default = "star_points")]
    points: u32,
}

#[derive(Debug, Deserialize)]
struct LineDecl {
    #[serde(flatten)]
    common: CommonDecl,
    start_x: f64,
    start_y: f64,
    end_x: f64,
    end_y: f64,
}

#[derive(Debug, Deserialize)]
struct PathDecl {
    #[serde(flatten)]
    common: CommonDecl,
    path_data: String,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default = "one")]
    scale: f64,
    pivot_x: Option<f64>,
    pivot_y: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CompositeElementDecl {
    id: Option<String>,
    name: String,
    x: f64,
    y: f64,
    #[serde(default = "one")]
    scale: f64,
    #[serde(default)]
    rotation: f64,
    #[serde(default)]
    color_palette: BTreeMap<String, Color>,
    z_index: Option<i32>,
}

impl ShapeDecl {
    fn id(&self) -> Option<&str> {
        match self {
            ShapeDecl::Rectangle(d) => d.common.id.as_deref(),
            ShapeDecl::Circle(d) => d.common.id.as_deref(),
            ShapeDecl::Triangle(d) => d.common.id.as_deref(),
            ShapeDecl::Star(d) => d.common.id.as_deref(),
            ShapeDecl::Line(d) => d.common.id.as_deref(),
            ShapeDecl::Path(d) => d.common.id.as_deref(),
            ShapeDecl::CompositeElement(d) => d.id.as_deref(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ShapeDecl::Rectangle(_) => "rectangle",
            ShapeDecl::Circle(_) => "circle",
            ShapeDecl::Triangle(_) => "triangle",
            ShapeDecl::Star(_) => "star",
            ShapeDecl::Line(_) => "line",
            ShapeDecl::Path(_) => "path",
            ShapeDecl::CompositeElement(_) => "composite",
        }
    }

    /// Explicit layer, if the declaration gives one.
    fn z_index(&self) -> Option<i32> {
        match self {
            ShapeDecl::Rectangle(d) => d.common.z_index,
            ShapeDecl::Circle(d) => d.common.z_index,
            ShapeDecl::Triangle(d) => d.common.z_index,
            ShapeDecl::Star(d) => d.common.z_index,
            ShapeDecl::Line(d) => d.common.z_index,
            ShapeDecl::Path(d) => d.common.z_index,
            ShapeDecl::CompositeElement(d) => d.z_index,
        }
    }

    fn into_element(self, id: String, layer: i32) -> Element {
        let shape: Shape = match self {
            ShapeDecl::Rectangle(d) => {
                Rectangle::new(d.common.into_attrs(id, layer), d.x, d.y, d.width, d.height).into()
            }
            ShapeDecl::Circle(d) => Circle::new(
                d.common.into_attrs(id, layer),
                PtIn::inches(d.center_x, d.center_y),
                d.radius,
            )
            .into(),
            ShapeDecl::Triangle(d) => Triangle::new(
                d.common.into_attrs(id, layer),
                [
                    PtIn::inches(d.x1, d.y1),
                    PtIn::inches(d.x2, d.y2),
                    PtIn::inches(d.x3, d.y3),
                ],
            )
            .into(),
            ShapeDecl::Star(d) => Star::new(
                d.common.into_attrs(id, layer),
                PtIn::inches(d.center_x, d.center_y),
                d.outer_radius,
                d.inner_radius,
                d.points,
            )
            .into(),
            ShapeDecl::Line(d) => Line::new(
                d.common.into_attrs(id, layer),
                PtIn::inches(d.start_x, d.start_y),
                PtIn::inches(d.end_x, d.end_y),
            )
            .into(),
            ShapeDecl::Path(d) => {
                let mut shape = PathShape::new(d.common.into_attrs(id, layer), d.path_data)
                    .at(PtIn::inches(d.x, d.y), d.scale);
                shape.pivot = match (d.pivot_x, d.pivot_y) {
                    (None, None) => None,
                    (x, y) => Some(PtIn::inches(x.unwrap_or(0.0), y.unwrap_or(0.0))),
                };
                shape.into()
            }
            ShapeDecl::CompositeElement(d) => {
                return Element::Composite(CompositeElement {
                    id,
                    name: d.name,
                    anchor: PtIn::inches(d.x, d.y),
                    scale: d.scale,
                    rotation: Angle(d.rotation),
                    palette: d.color_palette,
                    layer: d.z_index.unwrap_or(layer),
                });
            }
        };
        Element::Shape(shape)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum FillDecl {
    Solid {
        color: ColorSpec,
    },
    LinearGradient {
        #[serde(default)]
        angle: f64,
        stops: Vec<StopDecl>,
    },
    RadialGradient {
        #[serde(default = "half")]
        center_x: f64,
        #[serde(default = "half")]
        center_y: f64,
        #[serde(default = "half")]
        radius: f64,
        stops: Vec<StopDecl>,
    },
    Pattern {
        pattern_type: PatternKind,
        colors: Vec<ColorSpec>,
        #[serde(default = "pattern_spacing")]
        spacing: f64,
        #[serde(default = "one")]
        scale: f64,
        #[serde(default)]
        rotation: f64,
    },
}

#[derive(Debug, Deserialize)]
struct StopDecl {
    position: f64,
    color: ColorSpec,
}

impl FillDecl {
    fn into_fill(self) -> Fill {
        let stops = |stops: Vec<StopDecl>| {
            stops
                .into_iter()
                .map(|s| ColorStop { position: s.position, color: s.color })
                .collect()
        };
        match self {
            FillDecl::Solid { color } => Fill::Solid(color),
            FillDecl::LinearGradient { angle, stops: s } => Fill::LinearGradient {
                angle: Angle(angle),
                stops: stops(s),
            },
            FillDecl::RadialGradient { center_x, center_y, radius, stops: s } => Fill::RadialGradient {
                center: Point::new(center_x, center_y),
                radius,
                stops: stops(s),
            },
            FillDecl::Pattern { pattern_type, colors, spacing, scale, rotation } => Fill::Pattern {
                kind: pattern_type,
                spacing: Length(spacing),
                angle: Angle(rotation),
                scale,
                colors,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct TextDecl {
    id: Option<String>,
    content: String,
    x: f64,
    y: f64,
    #[serde(default = "font_family")]
    font_family: String,
    #[serde(default = "font_size")]
    font_size: f64,
    #[serde(default)]
    font_style: FontStyle,
    color: Option<Color>,
    #[serde(default)]
    alignment: TextAlign,
    #[serde(default)]
    rotation: f64,
    z_index: Option<i32>,
}

impl TextDecl {
    fn into_text(self, id: String, layer: i32) -> TextRun {
        TextRun {
            font_family: self.font_family,
            font_size: self.font_size,
            font_style: self.font_style,
            color: self.color.unwrap_or(Color::BLACK),
            alignment: self.alignment,
            rotation: Angle(self.rotation),
            ..TextRun::new(id, self.content, PtIn::inches(self.x, self.y), self.z_index.unwrap_or(layer))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImageDecl {
    id: Option<String>,
    source_path: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    #[serde(default = "yes")]
    preserve_aspect: bool,
    #[serde(default)]
    rotation: f64,
    #[serde(default = "one")]
    opacity: f64,
    z_index: Option<i32>,
    clip_mask: Option<ClipMaskDecl>,
}

impl ImageDecl {
    fn into_image(self, id: String, layer: i32) -> ImageElement {
        let mut image = ImageElement::new(
            id,
            self.source_path,
            PtIn::inches(self.x, self.y),
            self.width,
            self.height,
            self.z_index.unwrap_or(layer),
        );
        image.preserve_aspect = self.preserve_aspect;
        image.rotation = Angle(self.rotation);
        image.opacity = self.opacity;
        image.clip = self.clip_mask.map(ClipMaskDecl::into_mask);
        image
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClipMaskDecl {
    Circle {
        center_x: f64,
        center_y: f64,
        radius: f64,
    },
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Ellipse {
        center_x: f64,
        center_y: f64,
        radius_x: f64,
        radius_y: f64,
    },
    Star {
        center_x: f64,
        center_y: f64,
        outer_radius: f64,
        inner_radius: f64,
        #[serde(default = "star_points")]
        points: u32,
    },
    #[serde(rename = "svg_path", alias = "path")]
    Path {
        path_data: String,
        #[serde(default = "one")]
        scale: f64,
    },
}

impl ClipMaskDecl {
    fn into_mask(self) -> ClipMask {
        match self {
            ClipMaskDecl::Circle { center_x, center_y, radius } => ClipMask::Circle {
                center: PtIn::inches(center_x, center_y),
                radius: Length(radius),
            },
            ClipMaskDecl::Rectangle { x, y, width, height } => ClipMask::Rectangle {
                origin: PtIn::inches(x, y),
                width: Length(width),
                height: Length(height),
            },
            ClipMaskDecl::Ellipse { center_x, center_y, radius_x, radius_y } => ClipMask::Ellipse {
                center: PtIn::inches(center_x, center_y),
                radius_x: Length(radius_x),
                radius_y: Length(radius_y),
            },
            ClipMaskDecl::Star { center_x, center_y, outer_radius, inner_radius, points } => ClipMask::Star {
                center: PtIn::inches(center_x, center_y),
                outer_radius: Length(outer_radius),
                inner_radius: Length(inner_radius),
                points,
            },
            ClipMaskDecl::Path { path_data, scale } => ClipMask::Path { data: path_data, scale },
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompositeDefinitionDecl {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "one")]
    default_width: f64,
    #[serde(default = "one")]
    default_height: f64,
    #[serde(default)]
    color_roles: BTreeMap<String, Color>,
    #[serde(default)]
    shapes: Vec<ShapeDecl>,
}

#[derive(Debug, Deserialize)]
struct LibraryDecl {
    #[serde(default)]
    composites: Vec<CompositeDefinitionDecl>,
}

impl CompositeDefinitionDecl {
    fn into_definition(self) -> Result<CompositeDefinition, LoadError> {
        let mut definition = CompositeDefinition::new(&self.name);
        definition.description = self.description;
        definition.default_width = Length(self.default_width);
        definition.default_height = Length(self.default_height);
        definition.roles = self.color_roles;

        for (index, member) in self.shapes.into_iter().enumerate() {
            let id = member.id().map_or_else(|| format!("{}{index}", member.kind()), str::to_string);
            let layer = member.z_index();
            // The shape's own layer is overwritten when the composite expands
            let Element::Shape(shape) = member.into_element(id, defaults::SHAPE_LAYER) else {
                return Err(LoadError::NestedComposite { definition: self.name, index });
            };
            definition.members.push(CompositeMember { shape, layer });
        }
        Ok(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Geometry;

    const CARD: &str = r##"
name = "Winter"

[[regions]]
name = "front"
x = 0
y = 0
width = 5
height = 7

[[regions.shapes]]
type = "rectangle"
x = 0
y = 0
width = 5
height = 7
fill_color = "#FFFFFF"

[[regions.shapes]]
type = "circle"
id = "moon"
center_x = 4
center_y = 6
radius = 0.5
z_index = 2
fill = { type = "radial_gradient", stops = [
    { position = 0.0, color = "#FFFFEE" },
    { position = 1.0, color = "#CCCC99" },
] }

[[regions.shapes]]
type = "decorative_element"
name = "tree"
x = 1
y = 1
color_palette = { foliage = "#006400" }

[[regions.texts]]
content = "Season's Greetings"
x = 0.5
y = 0.5
font_size = 24

[[regions.images]]
source_path = "family.jpg"
x = 1
y = 2
width = 3
height = 2
clip_mask = { type = "svg_path", path_data = "M0 0 L3 0 L3 2 Z" }
"##;

    #[test]
    fn loads_every_element_kind() {
        let template = load_template(CARD, &LayerDefaults::default()).unwrap();
        assert_eq!(template.name, "Winter");
        let region = &template.regions[0];
        let ids: Vec<&str> = region.elements.iter().map(Element::id).collect();
        assert_eq!(
            ids,
            vec!["front/rectangle0", "moon", "front/composite2", "front/text0", "front/image0"]
        );
        let layers: Vec<i32> = region.elements.iter().map(Element::layer).collect();
        assert_eq!(layers, vec![0, 2, 0, 100, 100]);
    }

    #[test]
    fn legacy_fill_color_is_a_solid_fill() {
        let template = load_template(CARD, &LayerDefaults::default()).unwrap();
        let Element::Shape(shape) = &template.regions[0].elements[0] else {
            panic!("expected a shape");
        };
        assert_eq!(shape.attrs().fill, Some(Fill::solid(Color::WHITE)));
    }

    #[test]
    fn texts_and_images_keep_their_settings() {
        let template = load_template(CARD, &LayerDefaults::default()).unwrap();
        let elements = &template.regions[0].elements;
        let Element::Text(text) = &elements[3] else {
            panic!("expected text");
        };
        assert_eq!(text.font_size, 24.0);
        assert_eq!(text.font_family, "Helvetica");
        let Element::Image(image) = &elements[4] else {
            panic!("expected image");
        };
        assert!(image.preserve_aspect);
        assert_eq!(image.clip.as_ref().map(ClipMask::kind), Some("path"));
    }

    #[test]
    fn custom_layer_defaults_apply() {
        let layers = LayerDefaults { shape: 5, text: 1, image: 2 };
        let template = load_template(CARD, &layers).unwrap();
        let layers: Vec<i32> = template.regions[0].elements.iter().map(Element::layer).collect();
        assert_eq!(layers, vec![5, 2, 5, 1, 2]);
    }

    #[test]
    fn unknown_shape_type_is_a_load_error() {
        let src = r#"
name = "bad"
[[regions]]
name = "front"
width = 5
height = 7
[[regions.shapes]]
type = "hexagon"
"#;
        assert!(matches!(load_template(src, &LayerDefaults::default()), Err(LoadError::Toml(_))));
    }

    #[test]
    fn invalid_hex_is_a_load_error() {
        let src = r##"
name = "bad"
[[regions]]
name = "front"
width = 5
height = 7
[[regions.shapes]]
type = "circle"
center_x = 1
center_y = 1
radius = 1
fill_color = "#12345"
"##;
        assert!(load_template(src, &LayerDefaults::default()).is_err());
    }

    const TREE: &str = r##"
name = "tree"
description = "A simple pine"
default_width = 2
default_height = 3

[color_roles]
foliage = "#228B22"
trunk = "#8B4513"

[[shapes]]
type = "triangle"
x1 = 0
y1 = 0.5
x2 = 2
y2 = 0.5
x3 = 1
y3 = 3
fill_color = "{foliage}"

[[shapes]]
type = "rectangle"
id = "trunk"
x = 0.8
y = 0
width = 0.4
height = 0.5
fill_color = "{trunk}"
z_index = -1
"##;

    #[test]
    fn loads_definition_with_roles() {
        let definition = load_definition(TREE).unwrap();
        assert_eq!(definition.name, "tree");
        assert_eq!(definition.roles.len(), 2);
        assert_eq!(definition.members.len(), 2);
        assert_eq!(definition.members[0].shape.id(), "triangle0");
        assert_eq!(definition.members[0].layer, None);
        assert_eq!(definition.members[1].layer, Some(-1));
        assert_eq!(
            definition.members[1].shape.attrs().fill,
            Some(Fill::Solid(ColorSpec::Role("trunk".into())))
        );
    }

    #[test]
    fn nested_composites_are_rejected() {
        let src = r#"
name = "wreath"
[[shapes]]
type = "composite_element"
name = "tree"
x = 0
y = 0
"#;
        assert!(matches!(
            load_definition(src),
            Err(LoadError::NestedComposite { index: 0, .. })
        ));
    }

    #[test]
    fn library_document_replaces_duplicates() {
        let src = r##"
[[composites]]
name = "dot"
[[composites.shapes]]
type = "circle"
center_x = 0
center_y = 0
radius = 0.1
fill_color = "#000000"

[[composites]]
name = "dot"
[[composites.shapes]]
type = "circle"
center_x = 0
center_y = 0
radius = 0.2
fill_color = "#000000"
"##;
        let library = CompositeLibrary::from_toml(src).unwrap();
        assert_eq!(library.len(), 1);
        let Some(definition) = library.get("dot") else {
            panic!("dot missing");
        };
        let Shape::Circle(c) = &definition.members[0].shape else {
            panic!("expected circle");
        };
        assert_eq!(c.radius, Length(0.2));
    }

    #[test]
    fn loads_a_directory_of_definitions() {
        let dir = std::env::temp_dir().join(format!("cardstock-lib-{}", std::process::id()));
        let nested = dir.join("trees");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("tree.toml"), TREE).unwrap();
        fs::write(dir.join("notes.txt"), "not a definition").unwrap();

        let library = CompositeLibrary::load_dir(&dir).unwrap();
        assert_eq!(library.names(), vec!["tree"]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let err = CompositeLibrary::load_dir("/definitely/not/here").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
