//! Error types with rich diagnostics using miette
//!
//! Path errors carry source spans into the offending path string. Everything
//! that rejects a single element is collected in a [`RegionReport`]; only a
//! [`BackendError`] aborts a region.
//!
//! [`RegionReport`]: crate::render::RegionReport

use std::fmt;
use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// Validation Errors
// ============================================================================

/// The rule a rejected field broke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    Finite,
    UnitInterval,
    AngleRange,
    NonNegative,
    Positive,
    AtMost(f64),
    Between(f64, f64),
    InnerBelowOuter,
    StarPoints,
    StopCount,
    StopOrder,
    DegenerateStops,
    PatternColors,
    NotEmpty,
    MaxChars(usize),
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Finite => write!(f, "must be a finite number"),
            Constraint::UnitInterval => write!(f, "must lie in [0, 1]"),
            Constraint::AngleRange => write!(f, "must lie in [0, 360)"),
            Constraint::NonNegative => write!(f, "must not be negative"),
            Constraint::Positive => write!(f, "must be greater than zero"),
            Constraint::AtMost(max) => write!(f, "must be at most {max}"),
            Constraint::Between(lo, hi) => write!(f, "must lie in [{lo}, {hi}]"),
            Constraint::InnerBelowOuter => write!(f, "must be smaller than the outer radius"),
            Constraint::StarPoints => write!(f, "must be between 3 and 20"),
            Constraint::StopCount => write!(f, "must contain between 2 and 20 stops"),
            Constraint::StopOrder => write!(f, "stop positions must not decrease"),
            Constraint::DegenerateStops => write!(f, "stops must not all share one position"),
            Constraint::PatternColors => write!(f, "patterns take one or two colors"),
            Constraint::NotEmpty => write!(f, "must not be empty"),
            Constraint::MaxChars(n) => write!(f, "must be at most {n} characters"),
        }
    }
}

/// A field of one element violates its declared range.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
#[error("`{element}`: {field} = {value} {constraint}")]
#[diagnostic(code(cardstock::validate::out_of_range))]
pub struct ValidationError {
    pub element: String,
    pub field: &'static str,
    pub value: String,
    pub constraint: Constraint,
}

impl ValidationError {
    pub fn new(
        element: impl Into<String>,
        field: &'static str,
        value: impl fmt::Display,
        constraint: Constraint,
    ) -> Self {
        ValidationError {
            element: element.into(),
            field,
            value: value.to_string(),
            constraint,
        }
    }
}

/// Suspicious but renderable input. Logged and reported, never fatal.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum Advisory {
    #[error("`{element}` has neither fill nor a visible stroke and will not be drawn")]
    #[diagnostic(code(cardstock::validate::no_paint), severity(Warning))]
    NoPaint { element: String },

    #[error("triangle `{element}` has collinear vertices")]
    #[diagnostic(code(cardstock::validate::degenerate_triangle), severity(Warning))]
    DegenerateTriangle { element: String },

    #[error("clip mask of `{element}` extends beyond the image")]
    #[diagnostic(
        code(cardstock::validate::clip_overhang),
        severity(Warning),
        help("only the part of the mask inside the image has any effect")
    )]
    ClipOverhang { element: String },

    #[error("clip mask of `{element}` does not overlap the image; it will be invisible")]
    #[diagnostic(code(cardstock::clip::outside), severity(Warning))]
    ClipOutside { element: String },
}

// ============================================================================
// Path Errors
// ============================================================================

/// A path string that cannot produce any geometry.
#[derive(Error, Diagnostic, Debug)]
pub enum PathError {
    #[error("empty path")]
    #[diagnostic(code(cardstock::path::empty))]
    Empty,

    #[error("path must start with a move-to command")]
    #[diagnostic(
        code(cardstock::path::missing_move_to),
        help("begin the path with `M x y` or `m dx dy`")
    )]
    MissingMoveTo {
        #[source_code]
        src: NamedSource<String>,
        #[label("first command")]
        span: SourceSpan,
    },

    #[error("path syntax error: {message}")]
    #[diagnostic(code(cardstock::path::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("invalid number: {message}")]
    #[diagnostic(code(cardstock::path::invalid_number))]
    InvalidNumber {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid number")]
        span: SourceSpan,
    },

    #[error("clip path is not closed")]
    #[diagnostic(
        code(cardstock::path::not_closed),
        help("end the clip path with `Z` or `z`")
    )]
    NotClosed,
}

/// Parsing stopped early; the segments before this point are kept.
#[derive(Error, Diagnostic, Debug)]
pub enum PathWarning {
    #[error("unknown path command `{command}`, ignoring the rest of the path")]
    #[diagnostic(code(cardstock::path::unknown_command), severity(Warning))]
    UnknownCommand {
        command: char,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a path command")]
        span: SourceSpan,
    },

    #[error("malformed parameters, ignoring the rest of the path")]
    #[diagnostic(code(cardstock::path::malformed_parameters), severity(Warning))]
    MalformedParameters {
        #[source_code]
        src: NamedSource<String>,
        #[label("cannot be read as parameters")]
        span: SourceSpan,
    },
}

// ============================================================================
// Reference Errors
// ============================================================================

#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum UnresolvedReference {
    #[error("unknown composite `{name}` referenced by `{element}`")]
    #[diagnostic(code(cardstock::composite::unknown))]
    Composite {
        name: String,
        element: String,
        #[help]
        available: Option<String>,
    },

    #[error("color role `{{{role}}}` used by `{element}` is not defined")]
    #[diagnostic(
        code(cardstock::composite::unknown_role),
        help("define the role in the composite's default palette or in the element's overrides")
    )]
    Role { role: String, element: String },
}

// ============================================================================
// Per-Element Errors
// ============================================================================

/// Anything that rejects one element without stopping the region.
#[derive(Error, Diagnostic, Debug)]
pub enum ElementError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Unresolved(#[from] UnresolvedReference),

    #[error("path of `{element}` was rejected")]
    #[diagnostic(code(cardstock::path::rejected))]
    Path {
        element: String,
        #[source]
        #[diagnostic_source]
        source: PathError,
    },
}

/// A non-fatal finding collected while rendering a region.
#[derive(Error, Diagnostic, Debug)]
pub enum Warning {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Advisory(#[from] Advisory),

    #[error("path of `{element}` was truncated")]
    #[diagnostic(code(cardstock::path::truncated), severity(Warning))]
    Path {
        element: String,
        #[source]
        #[diagnostic_source]
        source: PathWarning,
    },
}

// ============================================================================
// Backend Errors
// ============================================================================

/// Failure reported by a drawing backend. Aborts the region being rendered.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
#[error("backend failed during {operation}: {message}")]
#[diagnostic(code(cardstock::backend))]
pub struct BackendError {
    pub operation: &'static str,
    pub message: String,
}

impl BackendError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        BackendError { operation, message: message.into() }
    }
}

// ============================================================================
// Load Errors
// ============================================================================

#[derive(Error, Diagnostic, Debug)]
pub enum LoadError {
    #[error("malformed document: {0}")]
    #[diagnostic(code(cardstock::load::malformed))]
    Toml(#[from] toml::de::Error),

    #[error("composite `{definition}` member {index} is itself a composite element")]
    #[diagnostic(
        code(cardstock::load::nested_composite),
        help("composites may only contain primitive shapes")
    )]
    NestedComposite { definition: String, index: usize },

    #[error("could not read {}", path.display())]
    #[diagnostic(code(cardstock::load::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("in {}", path.display())]
    #[diagnostic(code(cardstock::load::file))]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<LoadError>,
    },
}
