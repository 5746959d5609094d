//! Range checks for every element kind.
//!
//! Validation is pure: it never mutates the element and never consults
//! anything but the element itself. Hard violations reject the element with a
//! [`ValidationError`]; suspicious but drawable input yields [`Advisory`]s.

use crate::errors::{Advisory, Constraint, ValidationError};
use crate::elements::{ClipMask, CompositeElement, ImageElement, TextRun};
use crate::fill::{ColorStop, Fill};
use crate::render::defaults;
use crate::shapes::{Geometry, Shape, ShapeAttrs};
use crate::types::{Angle, Length, PtIn};

/// Validate a shape, logging any advisories, and hand it back on success.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub fn validate(shape: Shape) -> Result<Shape, ValidationError> {
    for advisory in check(&shape)? {
        crate::log::warn!("{advisory}");
    }
    Ok(shape)
}

/// Validate a shape and return the advisories instead of logging them.
pub fn check(shape: &Shape) -> Result<Vec<Advisory>, ValidationError> {
    let attrs = shape.attrs();
    let c = Checker { element: &attrs.id };
    c.attrs(attrs)?;

    let mut advisories = Vec::new();
    match shape {
        Shape::Rectangle(r) => {
            c.non_negative("x", r.x)?;
            c.non_negative("y", r.y)?;
            c.positive("width", r.width)?;
            c.positive("height", r.height)?;
        }
        Shape::Circle(circle) => {
            c.position(("center_x", "center_y"), circle.center)?;
            c.positive("radius", circle.radius)?;
        }
        Shape::Triangle(t) => {
            const FIELDS: [(&str, &str); 3] = [("x1", "y1"), ("x2", "y2"), ("x3", "y3")];
            for (fields, v) in FIELDS.into_iter().zip(t.vertices) {
                c.position(fields, v)?;
            }
            if t.doubled_area().abs() < f64::EPSILON {
                advisories.push(Advisory::DegenerateTriangle { element: attrs.id.clone() });
            }
        }
        Shape::Star(s) => {
            c.position(("center_x", "center_y"), s.center)?;
            c.star(s.outer_radius, s.inner_radius, s.points)?;
        }
        Shape::Line(l) => {
            c.position(("start_x", "start_y"), l.start)?;
            c.position(("end_x", "end_y"), l.end)?;
        }
        Shape::Path(p) => {
            c.not_empty("path_data", &p.data)?;
            c.position(("x", "y"), p.origin)?;
            c.scale("scale", p.scale, defaults::MAX_PATH_SCALE)?;
            if let Some(pivot) = p.pivot {
                c.finite("pivot_x", pivot.x.raw())?;
                c.finite("pivot_y", pivot.y.raw())?;
            }
        }
    }

    if attrs.is_noop() {
        advisories.push(Advisory::NoPaint { element: attrs.id.clone() });
    }
    Ok(advisories)
}

/// Validate a fill on behalf of `element`.
pub fn validate_fill(fill: &Fill, element: &str) -> Result<(), ValidationError> {
    Checker { element }.fill(fill)
}

pub fn validate_text(text: &TextRun) -> Result<(), ValidationError> {
    let c = Checker { element: &text.id };
    c.not_empty("content", &text.content)?;
    let chars = text.content.chars().count();
    if chars > defaults::MAX_TEXT_CHARS {
        return Err(c.reject("content", chars, Constraint::MaxChars(defaults::MAX_TEXT_CHARS)));
    }
    c.position(("x", "y"), text.origin)?;
    c.finite("font_size", text.font_size)?;
    if !(defaults::MIN_FONT_SIZE..=defaults::MAX_FONT_SIZE).contains(&text.font_size) {
        return Err(c.reject(
            "font_size",
            text.font_size,
            Constraint::Between(defaults::MIN_FONT_SIZE, defaults::MAX_FONT_SIZE),
        ));
    }
    c.angle("rotation", text.rotation)
}

pub fn validate_image(image: &ImageElement) -> Result<(), ValidationError> {
    let c = Checker { element: &image.id };
    c.not_empty("source_path", &image.source)?;
    c.position(("x", "y"), image.origin)?;
    c.positive("width", image.width)?;
    c.positive("height", image.height)?;
    c.unit("opacity", image.opacity)?;
    c.angle("rotation", image.rotation)?;
    if let Some(mask) = &image.clip {
        validate_clip_mask(mask, &image.id)?;
    }
    Ok(())
}

/// Checks the placement of a composite element itself. Its members are
/// checked one by one after expansion.
pub fn validate_composite(element: &CompositeElement) -> Result<(), ValidationError> {
    let c = Checker { element: &element.id };
    c.not_empty("name", &element.name)?;
    c.position(("x", "y"), element.anchor)?;
    c.positive("scale", Length(element.scale))?;
    c.angle("rotation", element.rotation)
}

/// Clip coordinates are image-relative and may lie anywhere; only sizes and
/// counts are constrained. Path closedness is checked when it is parsed.
pub fn validate_clip_mask(mask: &ClipMask, element: &str) -> Result<(), ValidationError> {
    let c = Checker { element };
    match mask {
        ClipMask::Circle { center, radius } => {
            c.finite_point(("clip.center_x", "clip.center_y"), *center)?;
            c.positive("clip.radius", *radius)
        }
        ClipMask::Rectangle { origin, width, height } => {
            c.finite_point(("clip.x", "clip.y"), *origin)?;
            c.positive("clip.width", *width)?;
            c.positive("clip.height", *height)
        }
        ClipMask::Ellipse { center, radius_x, radius_y } => {
            c.finite_point(("clip.center_x", "clip.center_y"), *center)?;
            c.positive("clip.radius_x", *radius_x)?;
            c.positive("clip.radius_y", *radius_y)
        }
        ClipMask::Star { center, outer_radius, inner_radius, points } => {
            c.finite_point(("clip.center_x", "clip.center_y"), *center)?;
            c.star(*outer_radius, *inner_radius, *points)
        }
        ClipMask::Path { data, scale } => {
            c.not_empty("clip.path_data", data)?;
            c.scale("clip.scale", *scale, defaults::MAX_PATH_SCALE)
        }
    }
}

struct Checker<'a> {
    element: &'a str,
}

impl Checker<'_> {
    fn reject(&self, field: &'static str, value: impl std::fmt::Display, constraint: Constraint) -> ValidationError {
        ValidationError::new(self.element, field, value, constraint)
    }

    fn finite(&self, field: &'static str, v: f64) -> Result<(), ValidationError> {
        if v.is_finite() { Ok(()) } else { Err(self.reject(field, v, Constraint::Finite)) }
    }

    fn unit(&self, field: &'static str, v: f64) -> Result<(), ValidationError> {
        if (0.0..=1.0).contains(&v) {
            Ok(())
        } else {
            Err(self.reject(field, v, Constraint::UnitInterval))
        }
    }

    fn angle(&self, field: &'static str, a: Angle) -> Result<(), ValidationError> {
        if a.in_canonical_range() {
            Ok(())
        } else {
            Err(self.reject(field, a, Constraint::AngleRange))
        }
    }

    fn non_negative(&self, field: &'static str, v: Length) -> Result<(), ValidationError> {
        self.finite(field, v.raw())?;
        if v.raw() < 0.0 { Err(self.reject(field, v, Constraint::NonNegative)) } else { Ok(()) }
    }

    fn positive(&self, field: &'static str, v: Length) -> Result<(), ValidationError> {
        self.finite(field, v.raw())?;
        if v.raw() <= 0.0 { Err(self.reject(field, v, Constraint::Positive)) } else { Ok(()) }
    }

    fn position(&self, (fx, fy): (&'static str, &'static str), p: PtIn) -> Result<(), ValidationError> {
        self.non_negative(fx, p.x)?;
        self.non_negative(fy, p.y)
    }

    fn finite_point(&self, (fx, fy): (&'static str, &'static str), p: PtIn) -> Result<(), ValidationError> {
        self.finite(fx, p.x.raw())?;
        self.finite(fy, p.y.raw())
    }

    fn scale(&self, field: &'static str, v: f64, max: f64) -> Result<(), ValidationError> {
        self.positive(field, Length(v))?;
        if v > max { Err(self.reject(field, v, Constraint::AtMost(max))) } else { Ok(()) }
    }

    fn not_empty(&self, field: &'static str, s: &str) -> Result<(), ValidationError> {
        if s.trim().is_empty() {
            Err(self.reject(field, format!("{s:?}"), Constraint::NotEmpty))
        } else {
            Ok(())
        }
    }

    fn star(&self, outer: Length, inner: Length, points: u32) -> Result<(), ValidationError> {
        self.positive("outer_radius", outer)?;
        self.positive("inner_radius", inner)?;
        if inner >= outer {
            return Err(self.reject("inner_radius", inner, Constraint::InnerBelowOuter));
        }
        if !(defaults::MIN_STAR_POINTS..=defaults::MAX_STAR_POINTS).contains(&points) {
            return Err(self.reject("points", points, Constraint::StarPoints));
        }
        Ok(())
    }

    fn attrs(&self, attrs: &ShapeAttrs) -> Result<(), ValidationError> {
        self.unit("opacity", attrs.opacity)?;
        self.angle("rotation", attrs.rotation)?;
        self.finite("stroke_width", attrs.stroke_width)?;
        if attrs.stroke_width < 0.0 {
            return Err(self.reject("stroke_width", attrs.stroke_width, Constraint::NonNegative));
        }
        if let Some(fill) = &attrs.fill {
            self.fill(fill)?;
        }
        Ok(())
    }

    fn fill(&self, fill: &Fill) -> Result<(), ValidationError> {
        match fill {
            Fill::Solid(_) => Ok(()),
            Fill::LinearGradient { angle, stops } => {
                self.angle("fill.angle", *angle)?;
                self.stops(stops)
            }
            Fill::RadialGradient { center, radius, stops } => {
                self.unit("fill.center_x", center.x)?;
                self.unit("fill.center_y", center.y)?;
                self.scale("fill.radius", *radius, 1.0)?;
                self.stops(stops)
            }
            Fill::Pattern { spacing, angle, scale, colors, .. } => {
                self.positive("fill.spacing", *spacing)?;
                if *spacing > defaults::MAX_PATTERN_SPACING {
                    return Err(self.reject(
                        "fill.spacing",
                        spacing,
                        Constraint::AtMost(defaults::MAX_PATTERN_SPACING.raw()),
                    ));
                }
                self.angle("fill.rotation", *angle)?;
                self.scale("fill.scale", *scale, defaults::MAX_PATTERN_SCALE)?;
                if colors.is_empty() || colors.len() > defaults::MAX_PATTERN_COLORS {
                    return Err(self.reject("fill.colors", colors.len(), Constraint::PatternColors));
                }
                Ok(())
            }
        }
    }

    fn stops(&self, stops: &[ColorStop]) -> Result<(), ValidationError> {
        if !(defaults::MIN_STOPS..=defaults::MAX_STOPS).contains(&stops.len()) {
            return Err(self.reject("fill.stops", stops.len(), Constraint::StopCount));
        }
        for stop in stops {
            self.unit("fill.stops.position", stop.position)?;
        }
        for pair in stops.windows(2) {
            if pair[1].position < pair[0].position {
                return Err(self.reject("fill.stops.position", pair[1].position, Constraint::StopOrder));
            }
        }
        let first = stops[0].position;
        if stops.iter().all(|s| s.position == first) {
            return Err(self.reject("fill.stops.position", first, Constraint::DegenerateStops));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, ColorSpec};
    use crate::fill::PatternKind;
    use crate::shapes::{Circle, Rectangle, Star, Triangle};

    fn painted(id: &str) -> ShapeAttrs {
        ShapeAttrs::new(id).with_fill(Fill::solid(Color::rgb(200, 0, 0)))
    }

    fn rect(attrs: ShapeAttrs) -> Shape {
        Rectangle::new(attrs, 1.0, 1.0, 2.0, 1.0).into()
    }

    fn field_of(result: Result<Shape, ValidationError>) -> &'static str {
        result.unwrap_err().field
    }

    // ==================== Attribute ranges ====================

    #[test]
    fn opacity_bounds_are_inclusive() {
        assert!(validate(rect(painted("a").with_opacity(0.0))).is_ok());
        assert!(validate(rect(painted("a").with_opacity(1.0))).is_ok());
        assert_eq!(field_of(validate(rect(painted("a").with_opacity(1.01)))), "opacity");
        assert_eq!(field_of(validate(rect(painted("a").with_opacity(-0.1)))), "opacity");
    }

    #[test]
    fn rotation_is_half_open() {
        assert!(validate(rect(painted("a").with_rotation(0.0))).is_ok());
        assert!(validate(rect(painted("a").with_rotation(359.9))).is_ok());
        let err = validate(rect(painted("a").with_rotation(360.0))).unwrap_err();
        assert_eq!(err.field, "rotation");
        assert_eq!(err.constraint, Constraint::AngleRange);
    }

    #[test]
    fn negative_stroke_width_rejected() {
        let attrs = painted("a").with_stroke(Color::BLACK, -1.0);
        assert_eq!(field_of(validate(rect(attrs))), "stroke_width");
    }

    #[test]
    fn sizes_must_be_positive() {
        let zero_width: Shape = Rectangle::new(painted("r"), 0.0, 0.0, 0.0, 1.0).into();
        assert_eq!(field_of(validate(zero_width)), "width");

        let neg_radius: Shape = Circle::new(painted("c"), PtIn::inches(1.0, 1.0), -0.5).into();
        let err = validate(neg_radius).unwrap_err();
        assert_eq!(err.field, "radius");
        assert_eq!(err.constraint, Constraint::Positive);
        assert_eq!(err.element, "c");
    }

    #[test]
    fn positions_must_not_be_negative() {
        let shape: Shape = Rectangle::new(painted("r"), -1.0, 0.0, 1.0, 1.0).into();
        assert_eq!(field_of(validate(shape)), "x");
    }

    // ==================== Stars ====================

    #[test]
    fn star_inner_must_be_below_outer() {
        let center = PtIn::inches(2.0, 2.0);
        let equal: Shape = Star::new(painted("s"), center, 1.0, 1.0, 5).into();
        assert_eq!(field_of(validate(equal)), "inner_radius");

        let just_below: Shape = Star::new(painted("s"), center, 1.0, 1.0 - 1e-9, 5).into();
        assert!(validate(just_below).is_ok());
    }

    #[test]
    fn star_point_count_range() {
        let center = PtIn::inches(2.0, 2.0);
        let two: Shape = Star::new(painted("s"), center, 1.0, 0.5, 2).into();
        assert_eq!(field_of(validate(two)), "points");
        let twenty: Shape = Star::new(painted("s"), center, 1.0, 0.5, 20).into();
        assert!(validate(twenty).is_ok());
    }

    // ==================== Fills ====================

    #[test]
    fn pattern_color_count() {
        let pattern = |n: usize| Fill::Pattern {
            kind: PatternKind::Stripes,
            spacing: Length(0.25),
            angle: Angle(0.0),
            scale: 1.0,
            colors: vec![ColorSpec::Literal(Color::BLACK); n],
        };
        assert!(validate_fill(&pattern(1), "p").is_ok());
        assert!(validate_fill(&pattern(2), "p").is_ok());
        let err = validate_fill(&pattern(3), "p").unwrap_err();
        assert_eq!(err.constraint, Constraint::PatternColors);
        assert!(validate_fill(&pattern(0), "p").is_err());
    }

    #[test]
    fn gradient_stop_rules() {
        let linear = |positions: &[f64]| Fill::LinearGradient {
            angle: Angle(45.0),
            stops: positions.iter().map(|&p| ColorStop::new(p, Color::WHITE)).collect(),
        };
        assert!(validate_fill(&linear(&[0.0, 1.0]), "g").is_ok());
        assert!(validate_fill(&linear(&[0.0, 0.5, 0.5, 1.0]), "g").is_ok());

        let one = validate_fill(&linear(&[0.0]), "g").unwrap_err();
        assert_eq!(one.constraint, Constraint::StopCount);

        let backwards = validate_fill(&linear(&[0.6, 0.4]), "g").unwrap_err();
        assert_eq!(backwards.constraint, Constraint::StopOrder);

        let same = validate_fill(&linear(&[0.5, 0.5]), "g").unwrap_err();
        assert_eq!(same.constraint, Constraint::DegenerateStops);

        let outside = validate_fill(&linear(&[0.0, 1.5]), "g").unwrap_err();
        assert_eq!(outside.constraint, Constraint::UnitInterval);
    }

    #[test]
    fn radial_center_is_fractional() {
        let fill = Fill::RadialGradient {
            center: crate::types::Point::new(1.5, 0.5),
            radius: 0.5,
            stops: vec![ColorStop::new(0.0, Color::WHITE), ColorStop::new(1.0, Color::BLACK)],
        };
        assert_eq!(validate_fill(&fill, "g").unwrap_err().field, "fill.center_x");
    }

    // ==================== Advisories ====================

    #[test]
    fn validate_hands_back_shapes_with_advisories() {
        let bare: Shape = Rectangle::new(ShapeAttrs::new("bare"), 0.0, 0.0, 1.0, 1.0).into();
        assert_eq!(validate(bare.clone()), Ok(bare));
    }

    #[test]
    fn advisories_do_not_reject() {
        let bare: Shape = Rectangle::new(ShapeAttrs::new("bare"), 0.0, 0.0, 1.0, 1.0).into();
        let advisories = check(&bare).unwrap();
        assert_eq!(advisories, vec![Advisory::NoPaint { element: "bare".into() }]);

        let flat: Shape = Triangle::new(
            painted("flat"),
            [PtIn::inches(0.0, 0.0), PtIn::inches(1.0, 0.0), PtIn::inches(2.0, 0.0)],
        )
        .into();
        assert_eq!(check(&flat).unwrap(), vec![Advisory::DegenerateTriangle { element: "flat".into() }]);
        assert!(validate(flat).is_ok());
    }

    // ==================== Text, images, clip masks ====================

    #[test]
    fn text_font_size_range() {
        let mut text = TextRun::new("t", "Happy Holidays", PtIn::inches(1.0, 1.0), 100);
        assert!(validate_text(&text).is_ok());
        text.font_size = 200.0;
        assert_eq!(validate_text(&text).unwrap_err().field, "font_size");
        text.font_size = 12.0;
        text.content = String::new();
        assert_eq!(validate_text(&text).unwrap_err().field, "content");
    }

    #[test]
    fn image_checks_its_clip() {
        let image = ImageElement::new("img", "photo.jpg", PtIn::inches(0.0, 0.0), 2.0, 2.0, 100)
            .with_clip(ClipMask::Star {
                center: PtIn::inches(1.0, 1.0),
                outer_radius: Length(0.5),
                inner_radius: Length(0.8),
                points: 5,
            });
        let err = validate_image(&image).unwrap_err();
        assert_eq!(err.field, "inner_radius");
        assert_eq!(err.element, "img");
    }

    #[test]
    fn composite_placement_ranges() {
        let element = CompositeElement::new("tree", "pine", PtIn::inches(1.0, 1.0));
        assert!(validate_composite(&element).is_ok());

        let mut flat = element.clone();
        flat.scale = 0.0;
        let err = validate_composite(&flat).unwrap_err();
        assert_eq!((err.field, err.constraint), ("scale", Constraint::Positive));
        assert_eq!(err.element, "tree");

        let mut mirrored = element.clone();
        mirrored.scale = -1.0;
        assert_eq!(validate_composite(&mirrored).unwrap_err().field, "scale");

        let mut spun = element.clone();
        spun.rotation = Angle(720.0);
        let err = validate_composite(&spun).unwrap_err();
        assert_eq!((err.field, err.constraint), ("rotation", Constraint::AngleRange));

        let mut offpage = element;
        offpage.anchor = PtIn::inches(1.0, -0.5);
        assert_eq!(validate_composite(&offpage).unwrap_err().field, "y");
    }

    #[test]
    fn clip_coordinates_may_leave_the_image() {
        let mask = ClipMask::Circle { center: PtIn::inches(-10.0, 50.0), radius: Length(1.0) };
        assert!(validate_clip_mask(&mask, "img").is_ok());
    }
}
