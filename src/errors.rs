//! Error types with diagnostics using miette
//!
//! Structural and configuration failures surface to the caller of the
//! violating operation. Lookup misses (unknown glyph, missing metadata
//! field) are `Option`s at the call site and only become errors here when
//! the caller decides they are fatal.

use miette::Diagnostic;
use thiserror::Error;

use crate::graph::NodeId;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

// ============================================================================
// Numeric Errors
// ============================================================================

/// Error type for invalid numeric values
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum NumericError {
    #[error("value is NaN")]
    #[diagnostic(code(engrave::numeric::nan))]
    NaN,

    #[error("value is infinite")]
    #[diagnostic(code(engrave::numeric::infinite))]
    Infinite,

    #[error("value is zero")]
    #[diagnostic(code(engrave::numeric::zero))]
    Zero,

    #[error("value is negative")]
    #[diagnostic(code(engrave::numeric::negative))]
    Negative,

    #[error("cannot read a measurement from {input:?}")]
    #[diagnostic(
        code(engrave::numeric::unparseable),
        help("write a number optionally followed by one of: pt, in, mm, cm")
    )]
    Unparseable { input: String },
}

// ============================================================================
// Graph Errors
// ============================================================================

/// Structural errors in the object graph.
///
/// A failing operation never leaves the graph half-modified.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("node {0:?} does not exist")]
    #[diagnostic(
        code(engrave::graph::unknown_node),
        help("the node was removed, or the id belongs to another document")
    )]
    UnknownNode(NodeId),

    #[error("cannot parent node {node:?} to itself")]
    #[diagnostic(code(engrave::graph::self_parent))]
    SelfParent { node: NodeId },

    #[error("parenting {node:?} to {parent:?} would create a cycle")]
    #[diagnostic(
        code(engrave::graph::cycle),
        help("the requested parent is a descendant of the node")
    )]
    Cycle { node: NodeId, parent: NodeId },

    #[error("{from:?} and {to:?} share no common ancestor")]
    #[diagnostic(
        code(engrave::graph::disconnected),
        help("attach both nodes to the same document before mapping between them")
    )]
    Disconnected { from: NodeId, to: NodeId },

    #[error("{node:?} is a fixed document node")]
    #[diagnostic(
        code(engrave::graph::fixed_node),
        help("the document root and its pages cannot be moved, reparented or removed")
    )]
    FixedNode { node: NodeId },

    #[error("flowable {node:?} must be parented to a page")]
    #[diagnostic(code(engrave::graph::flowable_outside_page))]
    FlowableOutsidePage { node: NodeId },

    #[error("{node:?} is not inside a flowable")]
    #[diagnostic(code(engrave::graph::not_in_flowable))]
    NotInFlowable { node: NodeId },

    #[error("{a:?} and {b:?} live in different flowables")]
    #[diagnostic(code(engrave::graph::different_flowables))]
    DifferentFlowables { a: NodeId, b: NodeId },

    #[error("{node:?} has no {capability} component")]
    #[diagnostic(code(engrave::graph::missing_capability))]
    MissingCapability {
        node: NodeId,
        capability: &'static str,
    },
}

// ============================================================================
// Layout Errors
// ============================================================================

/// Configuration errors, raised eagerly at construction.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("invalid flowable line length: {value}")]
    #[diagnostic(
        code(engrave::layout::invalid_line_length),
        help("line length must be a positive, finite measurement")
    )]
    InvalidLineLength { value: f64 },

    #[error("invalid {name}: {value}")]
    #[diagnostic(code(engrave::layout::invalid_dimension))]
    InvalidDimension { name: &'static str, value: f64 },

    #[error("paper has no live area ({live_width} x {live_height})")]
    #[diagnostic(
        code(engrave::layout::invalid_paper),
        help("margins and gutter must leave a positive width and height")
    )]
    InvalidPaper { live_width: f64, live_height: f64 },
}

// ============================================================================
// Path Errors
// ============================================================================

/// Structural errors in path element sequences. Not user-recoverable.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("curve at element {index} of path {path:?} has {control_points} control points")]
    #[diagnostic(
        code(engrave::path::malformed_curve),
        help("every CurveTo must follow exactly two ControlPoint elements")
    )]
    MalformedCurve {
        path: NodeId,
        index: usize,
        control_points: usize,
    },

    #[error("control point at element {index} of path {path:?} is not followed by a curve")]
    #[diagnostic(code(engrave::path::dangling_control_point))]
    DanglingControlPoint { path: NodeId, index: usize },
}

// ============================================================================
// Font Errors
// ============================================================================

/// Font registration and lookup errors.
#[derive(Error, Diagnostic, Debug)]
pub enum FontError {
    #[error("font family {family:?} is not registered")]
    #[diagnostic(
        code(engrave::font::unregistered),
        help("register the font with the document's FontRegistry first")
    )]
    UnregisteredFont { family: String },

    #[error("invalid font metadata for {family:?}")]
    #[diagnostic(code(engrave::font::invalid_metadata))]
    InvalidMetadata {
        family: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("glyph {name:?} not found in {family:?}")]
    #[diagnostic(code(engrave::font::glyph_not_found))]
    GlyphNotFound { family: String, name: String },
}

// ============================================================================
// Style Errors
// ============================================================================

#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ColorError {
    #[error("malformed color {input:?}")]
    #[diagnostic(
        code(engrave::style::malformed_color),
        help("use #rgb, #rrggbb or #rrggbbaa")
    )]
    Malformed { input: String },

    #[error("unknown color name {input:?}")]
    #[diagnostic(code(engrave::style::unknown_color))]
    UnknownName { input: String },
}

// ============================================================================
// Crate Error
// ============================================================================

/// Any error the crate can produce.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Numeric(#[from] NumericError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Font(#[from] FontError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Color(#[from] ColorError),
}
