//! Composite element resolution.
//!
//! A composite element places a named, reusable group of shapes: the library
//! definition is looked up, its color roles are filled from the element's
//! palette, and every member is scaled, rotated and translated into the
//! region. The library is read-only once rendering starts.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::color::Color;
use crate::elements::{CompositeDefinition, CompositeElement};
use crate::errors::UnresolvedReference;
use crate::shapes::{Geometry, Shape};
use crate::types::PtIn;

/// Named composite definitions.
#[derive(Debug, Default, Clone)]
pub struct CompositeLibrary {
    definitions: HashMap<String, Arc<CompositeDefinition>>,
}

impl CompositeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a definition. Returns the one it replaced.
    pub fn insert(&mut self, definition: CompositeDefinition) -> Option<Arc<CompositeDefinition>> {
        crate::log::debug!(name = %definition.name, members = definition.members.len(), "registered composite");
        self.definitions.insert(definition.name.clone(), Arc::new(definition))
    }

    /// Take every definition from `other`, replacing same-named ones.
    pub fn merge(&mut self, other: CompositeLibrary) {
        self.definitions.extend(other.definitions);
    }

    pub fn get(&self, name: &str) -> Option<&CompositeDefinition> {
        self.definitions.get(name).map(|d| d.as_ref())
    }

    /// Definition names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl FromIterator<CompositeDefinition> for CompositeLibrary {
    fn from_iter<I: IntoIterator<Item = CompositeDefinition>>(iter: I) -> Self {
        let mut library = CompositeLibrary::new();
        for definition in iter {
            library.insert(definition);
        }
        library
    }
}

/// Outcome of expanding one composite element.
#[derive(Debug, Default, PartialEq)]
pub struct Expansion {
    /// Members that resolved, in definition order, in region coordinates
    pub shapes: Vec<Shape>,
    /// Members dropped because they referenced an undefined role
    pub errors: Vec<UnresolvedReference>,
}

/// Expand `element` into concrete shapes.
///
/// An unknown composite name fails the whole element. A member naming an
/// undefined role is dropped and reported; its siblings still expand.
pub fn expand(
    element: &CompositeElement,
    library: &CompositeLibrary,
) -> Result<Expansion, UnresolvedReference> {
    let Some(definition) = library.get(&element.name) else {
        let names = library.names();
        return Err(UnresolvedReference::Composite {
            name: element.name.clone(),
            element: element.id.clone(),
            available: (!names.is_empty()).then(|| format!("available composites: {}", names.join(", "))),
        });
    };

    let palette = effective_palette(&definition.roles, &element.palette);
    let anchor = element.anchor - PtIn::default();
    let mut expansion = Expansion::default();

    for member in &definition.members {
        let mut shape = member.shape.clone();
        let member_id = shape.attrs().id.clone();
        let id = format!("{}/{}", element.id, member_id);

        if let Err(role) = substitute_roles(&mut shape, &palette) {
            crate::log::warn!(element = %id, role = %role, "undefined color role");
            expansion.errors.push(UnresolvedReference::Role { role, element: id });
            continue;
        }

        shape.scale(element.scale);
        if !element.rotation.is_zero() {
            // Revolve about the anchor (the local origin) and spin in place
            let pivot = shape.pivot();
            let revolved = pivot.rotated_about(PtIn::default(), element.rotation);
            shape.translate(revolved - pivot);
            let attrs = shape.attrs_mut();
            attrs.rotation = attrs.rotation + element.rotation;
        }
        shape.translate(anchor);

        let attrs = shape.attrs_mut();
        attrs.id = id;
        attrs.layer = member.layer.unwrap_or(element.layer);
        expansion.shapes.push(shape);
    }

    crate::log::debug!(
        element = %element.id,
        composite = %element.name,
        shapes = expansion.shapes.len(),
        "expanded composite"
    );
    Ok(expansion)
}

/// Definition defaults overlaid with the element's overrides.
pub fn effective_palette(
    defaults: &BTreeMap<String, Color>,
    overrides: &BTreeMap<String, Color>,
) -> BTreeMap<String, Color> {
    let mut palette = defaults.clone();
    palette.extend(overrides.iter().map(|(k, v)| (k.clone(), *v)));
    palette
}

fn substitute_roles(shape: &mut Shape, palette: &BTreeMap<String, Color>) -> Result<(), String> {
    let lookup = |role: &str| palette.get(role).copied();
    let attrs = shape.attrs_mut();
    attrs.fill = attrs
        .fill
        .as_ref()
        .map(|fill| fill.try_map_colors(|c| c.substitute(lookup)))
        .transpose()?;
    attrs.stroke_color = attrs
        .stroke_color
        .as_ref()
        .map(|c| c.substitute(lookup))
        .transpose()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorSpec;
    use crate::fill::Fill;
    use crate::shapes::{Circle, Rectangle, ShapeAttrs};
    use crate::types::{Angle, Length};

    const RED: Color = Color::rgb(255, 0, 0);
    const GREEN: Color = Color::rgb(0, 255, 0);

    fn role_fill(role: &str) -> Fill {
        Fill::Solid(ColorSpec::Role(role.into()))
    }

    fn ornament() -> CompositeDefinition {
        CompositeDefinition::new("ornament")
            .with_role("primary", GREEN)
            .with_member(
                Rectangle::new(ShapeAttrs::new("body").with_fill(role_fill("primary")), 0.0, 0.0, 1.0, 1.0),
                None,
            )
    }

    fn library() -> CompositeLibrary {
        [ornament()].into_iter().collect()
    }

    fn fill_of(shape: &Shape) -> Option<&Fill> {
        shape.attrs().fill.as_ref()
    }

    #[test]
    fn palette_override_wins() {
        let element = CompositeElement::new("orn", "ornament", PtIn::inches(0.0, 0.0)).with_role("primary", RED);
        let expansion = expand(&element, &library()).unwrap();
        assert_eq!(fill_of(&expansion.shapes[0]), Some(&Fill::solid(RED)));
    }

    #[test]
    fn default_palette_applies_without_override() {
        let element = CompositeElement::new("orn", "ornament", PtIn::inches(0.0, 0.0));
        let expansion = expand(&element, &library()).unwrap();
        assert_eq!(fill_of(&expansion.shapes[0]), Some(&Fill::solid(GREEN)));
    }

    #[test]
    fn scale_then_translate_by_anchor() {
        let mut element = CompositeElement::new("orn", "ornament", PtIn::inches(1.0, 1.0));
        element.scale = 2.0;
        let expansion = expand(&element, &library()).unwrap();
        let Shape::Rectangle(r) = &expansion.shapes[0] else {
            panic!("expected rectangle");
        };
        assert_eq!((r.x, r.y), (Length(1.0), Length(1.0)));
        assert_eq!((r.width, r.height), (Length(2.0), Length(2.0)));
    }

    #[test]
    fn rotation_adds_and_revolves_about_anchor() {
        let definition = CompositeDefinition::new("dot").with_member(
            Circle::new(
                ShapeAttrs::new("c").with_fill(Fill::solid(RED)).with_rotation(300.0),
                PtIn::inches(1.0, 0.0),
                0.25,
            ),
            None,
        );
        let library: CompositeLibrary = [definition].into_iter().collect();
        let mut element = CompositeElement::new("e", "dot", PtIn::inches(2.0, 2.0));
        element.rotation = Angle(90.0);

        let expansion = expand(&element, &library).unwrap();
        let Shape::Circle(c) = &expansion.shapes[0] else {
            panic!("expected circle");
        };
        assert!((c.center.x.raw() - 2.0).abs() < 1e-9);
        assert!((c.center.y.raw() - 3.0).abs() < 1e-9);
        assert_eq!(c.attrs.rotation, Angle(30.0));
    }

    #[test]
    fn members_inherit_or_keep_layer() {
        let definition = ornament().with_member(
            Rectangle::new(ShapeAttrs::new("top").with_fill(Fill::solid(RED)), 0.0, 0.0, 1.0, 1.0),
            Some(7),
        );
        let library: CompositeLibrary = [definition].into_iter().collect();
        let mut element = CompositeElement::new("orn", "ornament", PtIn::inches(0.0, 0.0));
        element.layer = 3;

        let expansion = expand(&element, &library).unwrap();
        let layers: Vec<i32> = expansion.shapes.iter().map(Shape::layer).collect();
        assert_eq!(layers, vec![3, 7]);
        assert_eq!(expansion.shapes[1].id(), "orn/top");
    }

    #[test]
    fn unknown_composite_lists_available() {
        let element = CompositeElement::new("x", "snowman", PtIn::inches(0.0, 0.0));
        let err = expand(&element, &library()).unwrap_err();
        assert_eq!(
            err,
            UnresolvedReference::Composite {
                name: "snowman".into(),
                element: "x".into(),
                available: Some("available composites: ornament".into()),
            }
        );
    }

    #[test]
    fn undefined_role_drops_only_that_member() {
        let definition = ornament().with_member(
            Rectangle::new(ShapeAttrs::new("trim").with_fill(role_fill("accent")), 0.0, 0.0, 1.0, 1.0),
            None,
        );
        let library: CompositeLibrary = [definition].into_iter().collect();
        let element = CompositeElement::new("orn", "ornament", PtIn::inches(0.0, 0.0));

        let expansion = expand(&element, &library).unwrap();
        assert_eq!(expansion.shapes.len(), 1);
        assert_eq!(
            expansion.errors,
            vec![UnresolvedReference::Role { role: "accent".into(), element: "orn/trim".into() }]
        );
    }

    #[test]
    fn merge_replaces_same_name() {
        let mut base = library();
        let replacement = CompositeDefinition::new("ornament").with_role("primary", RED);
        base.merge([replacement, CompositeDefinition::new("bell")].into_iter().collect());
        assert_eq!(base.names(), vec!["bell", "ornament"]);
        assert!(base.get("ornament").unwrap().members.is_empty());
    }

    #[test]
    fn expansion_is_deterministic() {
        let mut element = CompositeElement::new("orn", "ornament", PtIn::inches(0.5, 0.5)).with_role("primary", RED);
        element.rotation = Angle(45.0);
        element.scale = 1.5;
        let lib = library();
        assert_eq!(expand(&element, &lib), expand(&element, &lib));
    }
}
