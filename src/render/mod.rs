//! Render pass: walk the document and emit document-space primitives.
//!
//! This module is organized into submodules:
//! - `slice`: cutting paths at flowable line boundaries
//! - `surface`: the `Surface` trait and a recording implementation
//!
//! A pass first drops the previous frame, then walks the graph depth-first
//! from the root. Every visible node draws its own graphic; hidden nodes
//! still have their children drawn. Nothing is cached between passes.

pub mod slice;
pub mod surface;

pub use slice::{ClipSpan, PathSlice};
pub use surface::{Primitive, RecordingSurface, Surface};

use crate::errors::Result;
use crate::graph::{Document, NodeId};
use crate::graphic::Draw;
use crate::log::{debug, trace};
use crate::path::ElementKind;
use crate::style::{Brush, Style};
use crate::types::Point;
use crate::units::Unit;

/// One drawable produced by a render pass, fully resolved.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderItem {
    Path {
        node: NodeId,
        style: Style,
        slice: PathSlice,
    },
    Glyph {
        node: NodeId,
        brush: Brush,
        codepoint: char,
        family: String,
        size: Unit,
        pos: Point<Unit>,
    },
    Text {
        node: NodeId,
        brush: Brush,
        text: String,
        family: String,
        size: Unit,
        pos: Point<Unit>,
    },
}

impl RenderItem {
    pub fn node(&self) -> NodeId {
        match self {
            RenderItem::Path { node, .. }
            | RenderItem::Glyph { node, .. }
            | RenderItem::Text { node, .. } => *node,
        }
    }
}

/// The output of one successful render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    items: Vec<RenderItem>,
    revision: u64,
}

impl Frame {
    /// Walk `doc` and collect everything it draws.
    pub fn build(doc: &Document) -> Result<Frame> {
        let mut items = Vec::new();
        let root = doc.root();
        for id in std::iter::once(root).chain(doc.descendants(root)) {
            let node = doc.node(id)?;
            if !node.is_visible() {
                trace!(?id, "skipping hidden node");
                continue;
            }
            let style = doc.resolved_style(id)?;
            node.graphic().draw(doc, id, style, &mut items)?;
        }
        Ok(Frame {
            items,
            revision: doc.revision(),
        })
    }

    pub fn items(&self) -> &[RenderItem] {
        &self.items
    }

    /// Document revision this frame was built from.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether `doc` changed since this frame was built.
    pub fn is_stale(&self, doc: &Document) -> bool {
        self.revision != doc.revision()
    }

    /// Replay the frame onto `surface`.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        for item in &self.items {
            match item {
                RenderItem::Path { style, slice, .. } => draw_slice(surface, style, slice),
                RenderItem::Glyph {
                    brush,
                    codepoint,
                    family,
                    size,
                    pos,
                    ..
                } => surface.draw_glyph(*codepoint, family, *size, *pos, brush),
                RenderItem::Text {
                    brush,
                    text,
                    family,
                    size,
                    pos,
                    ..
                } => surface.draw_text(text, family, *size, *pos, brush),
            }
        }
    }
}

fn draw_slice<S: Surface + ?Sized>(surface: &mut S, style: &Style, slice: &PathSlice) {
    surface.begin_path(style, slice.clip);
    if let Some(p) = slice.lead_in {
        surface.move_to(slice.to_document(p));
    }
    let mut controls: Vec<Point<Unit>> = Vec::with_capacity(2);
    for element in &slice.elements {
        let p = slice.to_document(element.pos);
        match element.kind {
            ElementKind::MoveTo => surface.move_to(p),
            ElementKind::LineTo => surface.line_to(p),
            ElementKind::ControlPoint => controls.push(p),
            ElementKind::CurveTo => {
                if let [c1, c2] = controls.as_slice() {
                    surface.cubic_to(*c1, *c2, p);
                }
                controls.clear();
            }
        }
    }
    if let Some(p) = slice.lead_out {
        surface.line_to(slice.to_document(p));
    }
    surface.end_path();
}

/// Holds the frame of the latest render pass.
#[derive(Debug, Default)]
pub struct Renderer {
    frame: Option<Frame>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the previous pass.
    pub fn clear(&mut self) {
        self.frame = None;
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Run a full pass over `doc`. On failure no frame is kept.
    pub fn render(&mut self, doc: &Document) -> Result<&Frame> {
        self.clear();
        let frame = Frame::build(doc)?;
        debug!(
            items = frame.items.len(),
            revision = frame.revision,
            "render pass complete"
        );
        Ok(&*self.frame.insert(frame))
    }

    /// Run a pass and replay it onto `surface`.
    pub fn render_to<S: Surface + ?Sized>(
        &mut self,
        doc: &Document,
        surface: &mut S,
    ) -> Result<()> {
        self.render(doc)?.draw(surface);
        Ok(())
    }
}
