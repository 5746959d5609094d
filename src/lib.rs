//! Vector composition for print-ready greeting cards.
//!
//! A [`Template`] is a list of regions (card panels). Each region holds
//! shapes, text runs, images and composite elements placed in inches with a
//! bottom-left origin. [`render_region`] validates and resolves every element,
//! orders them by layer and drives a [`Backend`] with one draw call each.
//!
//! ```
//! use cardstock::{Color, Fill, Rectangle, Recorder, Region, RenderContext, Shape, ShapeAttrs};
//!
//! let mut region = Region::new("front", 5.0, 7.0);
//! region.push(Shape::from(Rectangle::new(
//!     ShapeAttrs::new("sky").with_fill(Fill::solid(Color::rgb(0x87, 0xCE, 0xEB))),
//!     0.0, 0.0, 5.0, 7.0,
//! )));
//!
//! let mut recorder = Recorder::new();
//! let report = cardstock::render_region(&region, &RenderContext::new(), &mut recorder).unwrap();
//! assert_eq!(report.draw_calls, 1);
//! ```

pub mod color;
pub mod document;
pub mod elements;
pub mod errors;
pub mod fill;
pub mod log;
pub mod path;
pub mod render;
pub mod shapes;
pub mod types;
pub mod validate;

pub use color::{Color, ColorSpec};
pub use document::{load_definition, load_template};
pub use elements::{
    ClipMask, CompositeDefinition, CompositeElement, Element, ImageElement, LayerDefaults, Region, Template,
    TextRun,
};
pub use errors::{
    Advisory, BackendError, ElementError, LoadError, PathError, PathWarning, UnresolvedReference,
    ValidationError, Warning,
};
pub use fill::{ColorStop, Fill, PatternKind};
pub use path::{ParsedPath, PathSegment, parse_path};
pub use render::{
    Backend, CompositeLibrary, Recorder, RegionReport, RenderConfig, RenderContext, render_region,
    render_regions_parallel, render_template,
};
pub use shapes::{Circle, Geometry, Line, PathShape, Rectangle, Shape, ShapeAttrs, Star, Triangle};
pub use types::{Angle, Length, Point, PtIn, Scaler};
pub use validate::validate;
