//! The object graph: an arena of positioned nodes owned by a [`Document`].
//!
//! Every placeable item is a [`Node`] with a position relative to its parent.
//! Nodes are addressed by generational [`NodeId`]s, so an id that outlives its
//! node is reported as [`GraphError::UnknownNode`] instead of silently
//! aliasing a newer node in the same slot.
//!
//! The document root and its pages are created by the document and are fixed:
//! they cannot be moved, reparented or removed. Page `i` sits at the top-left
//! corner of its live area in document space.

mod mapping;

use std::fmt;

use crate::config::{DocumentConfig, Paper};
use crate::errors::{GraphError, LayoutError};
use crate::flowable::Flowable;
use crate::font::FontRegistry;
use crate::graphic::{Graphic, Group};
use crate::log::{debug, trace};
use crate::spanner::SpannerData;
use crate::staff::StaffContext;
use crate::style::{Brush, Pen};
use crate::types::Point;
use crate::units::Unit;

/// Identifier for a node in a document (slot index, generation).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.0, self.1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    Root,
    Page(usize),
    Item,
}

/// One placeable item.
#[derive(Clone, Debug)]
pub struct Node {
    generation: u32,
    role: Role,
    pos: Point<Unit>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pen: Option<Pen>,
    brush: Option<Brush>,
    visible: bool,
    graphic: Graphic,
    pub(crate) flowable: Option<Flowable>,
    pub(crate) spanner: Option<SpannerData>,
    pub(crate) staff: Option<StaffContext>,
}

impl Node {
    fn new(generation: u32, role: Role, pos: Point<Unit>, graphic: Graphic) -> Self {
        Node {
            generation,
            role,
            pos,
            parent: None,
            children: Vec::new(),
            pen: None,
            brush: None,
            visible: true,
            graphic,
            flowable: None,
            spanner: None,
            staff: None,
        }
    }

    /// Position relative to the parent.
    pub fn pos(&self) -> Point<Unit> {
        self.pos
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in render order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Explicit pen, `None` means the document default.
    pub fn pen(&self) -> Option<&Pen> {
        self.pen.as_ref()
    }

    pub fn brush(&self) -> Option<&Brush> {
        self.brush.as_ref()
    }

    pub fn set_pen(&mut self, pen: Option<Pen>) {
        self.pen = pen;
    }

    pub fn set_brush(&mut self, brush: Option<Brush>) {
        self.brush = brush;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hide or show the node's own drawing. Children are unaffected.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn graphic(&self) -> &Graphic {
        &self.graphic
    }

    pub fn graphic_mut(&mut self) -> &mut Graphic {
        &mut self.graphic
    }

    pub fn flowable(&self) -> Option<&Flowable> {
        self.flowable.as_ref()
    }

    pub fn spanner(&self) -> Option<&SpannerData> {
        self.spanner.as_ref()
    }

    pub fn spanner_mut(&mut self) -> Option<&mut SpannerData> {
        self.spanner.as_mut()
    }

    pub fn staff(&self) -> Option<&StaffContext> {
        self.staff.as_ref()
    }

    /// Whether this node is the document root or a page.
    pub fn is_fixed(&self) -> bool {
        self.role != Role::Item
    }

    pub fn page_index(&self) -> Option<usize> {
        match self.role {
            Role::Page(i) => Some(i),
            _ => None,
        }
    }
}

/// The explicit document context: node arena, pages, fonts and settings.
///
/// Independent documents share nothing.
pub struct Document {
    config: DocumentConfig,
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: NodeId,
    pages: Vec<NodeId>,
    fonts: FontRegistry,
    revision: u64,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("pages", &self.pages.len())
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::build(DocumentConfig::default())
    }
}

impl Document {
    /// Create a document after validating its configuration.
    pub fn new(config: DocumentConfig) -> Result<Self, LayoutError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: DocumentConfig) -> Self {
        let mut doc = Document {
            config,
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
            pages: Vec::new(),
            fonts: FontRegistry::default(),
            revision: 0,
        };
        doc.root = doc.alloc(Node::new(0, Role::Root, Point::ORIGIN, Group.into()));
        doc
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    pub fn paper(&self) -> &Paper {
        &self.config.paper
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontRegistry {
        &mut self.fonts
    }

    /// Monotonic counter bumped by every mutation of the graph.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // --- pages ---

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[NodeId] {
        &self.pages
    }

    /// Page `index`, creating it (and every page before it) if needed.
    pub fn page(&mut self, index: usize) -> NodeId {
        while self.pages.len() <= index {
            let i = self.pages.len();
            let origin = self.page_origin(i);
            let id = self.alloc(Node::new(0, Role::Page(i), origin, Group.into()));
            self.link_parent(id, self.root);
            self.pages.push(id);
            self.touch();
            debug!(page = i, "created page");
        }
        self.pages[index]
    }

    /// Document-space position of page `index`'s live area, whether or not
    /// the page exists yet. Pages are laid out left to right.
    pub fn page_origin(&self, index: usize) -> Point<Unit> {
        let paper = &self.config.paper;
        let (left, top) = paper.live_offset();
        let stride = paper.width + self.config.page_gap;
        Point::new(stride * index as f64 + left, top)
    }

    /// Index of `id` if it is a page of this document.
    pub fn page_index(&self, id: NodeId) -> Option<usize> {
        self.node(id).ok().and_then(Node::page_index)
    }

    // --- arena ---

    fn alloc(&mut self, mut node: Node) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            node.generation = generation;
            self.nodes[idx] = Some(node);
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            node.generation = generation;
            self.nodes.push(Some(node));
            self.generations.push(generation);
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Returns true if `id` refers to a live node of this document.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, GraphError> {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .filter(|n| n.generation == id.1)
            .ok_or(GraphError::UnknownNode(id))
    }

    /// Mutable access to a node's style and graphic. Counts as a mutation.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, GraphError> {
        if !self.is_alive(id) {
            return Err(GraphError::UnknownNode(id));
        }
        self.touch();
        self.nodes[id.idx()]
            .as_mut()
            .ok_or(GraphError::UnknownNode(id))
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, GraphError> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], GraphError> {
        Ok(&self.node(id)?.children)
    }

    /// Insert a new node under `parent`.
    pub fn insert(
        &mut self,
        parent: NodeId,
        pos: Point<Unit>,
        graphic: impl Into<Graphic>,
    ) -> Result<NodeId, GraphError> {
        self.node(parent)?;
        let id = self.alloc(Node::new(0, Role::Item, pos, graphic.into()));
        self.link_parent(id, parent);
        self.touch();
        trace!(?id, ?parent, "inserted node");
        Ok(id)
    }

    /// Insert a node that belongs to no tree yet. Mapping from it fails with
    /// [`GraphError::Disconnected`] until it is parented.
    pub fn insert_detached(&mut self, pos: Point<Unit>, graphic: impl Into<Graphic>) -> NodeId {
        let id = self.alloc(Node::new(0, Role::Item, pos, graphic.into()));
        self.touch();
        id
    }

    /// Insert an empty group, the usual container for other items.
    pub fn add_group(&mut self, parent: NodeId, pos: Point<Unit>) -> Result<NodeId, GraphError> {
        self.insert(parent, pos, Group)
    }

    pub fn set_pos(&mut self, id: NodeId, pos: Point<Unit>) -> Result<(), GraphError> {
        if self.node(id)?.is_fixed() {
            return Err(GraphError::FixedNode { node: id });
        }
        self.node_mut(id)?.pos = pos;
        Ok(())
    }

    /// Move `id` (and its subtree) under `new_parent`.
    ///
    /// Fails without touching the graph when the move would parent a node to
    /// itself or to one of its descendants.
    pub fn set_parent(&mut self, id: NodeId, new_parent: NodeId) -> Result<(), GraphError> {
        let node = self.node(id)?;
        let target = self.node(new_parent)?;
        if node.is_fixed() {
            return Err(GraphError::FixedNode { node: id });
        }
        if id == new_parent {
            return Err(GraphError::SelfParent { node: id });
        }
        if node.flowable.is_some() && target.page_index().is_none() {
            return Err(GraphError::FlowableOutsidePage { node: id });
        }
        if self.ancestors(new_parent).any(|a| a == id) {
            return Err(GraphError::Cycle {
                node: id,
                parent: new_parent,
            });
        }
        if let Some(old) = self.node(id)?.parent {
            self.unlink_parent(id, old);
        }
        self.link_parent(id, new_parent);
        self.touch();
        debug!(?id, ?new_parent, "reparented node");
        Ok(())
    }

    /// Remove `id` from its parent's children. The node stays alive.
    pub fn detach(&mut self, id: NodeId) -> Result<(), GraphError> {
        let node = self.node(id)?;
        if node.is_fixed() {
            return Err(GraphError::FixedNode { node: id });
        }
        if let Some(parent) = node.parent {
            self.unlink_parent(id, parent);
            self.touch();
        }
        Ok(())
    }

    /// Detach `id` and free it together with its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), GraphError> {
        self.detach(id)?;
        let mut doomed: Vec<NodeId> = self.descendants(id).collect();
        doomed.push(id);
        for dead in doomed {
            self.nodes[dead.idx()] = None;
            self.free_list.push(dead.idx());
        }
        self.touch();
        Ok(())
    }

    /// Lazy walk from `id` itself up to its root. Empty for a stale id.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.is_alive(id).then_some(id),
        }
    }

    /// Depth-first walk over the subtree below `id`, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = self
            .node(id)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        Descendants { doc: self, stack }
    }

    /// Whether `ancestor` is `id` or lies above it.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(Some(p)) = self.nodes.get_mut(parent.idx()) {
            p.children.push(id);
        }
        if let Some(Some(n)) = self.nodes.get_mut(id.idx()) {
            n.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(Some(p)) = self.nodes.get_mut(parent.idx()) {
            p.children.retain(|c| *c != id);
        }
        if let Some(Some(n)) = self.nodes.get_mut(id.idx()) {
            n.parent = None;
        }
    }
}

/// Iterator returned by [`Document::ancestors`].
#[derive(Clone)]
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.node(current).ok().and_then(|n| n.parent);
        Some(current)
    }
}

/// Iterator returned by [`Document::descendants`].
#[derive(Clone)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        if let Ok(node) = self.doc.node(current) {
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(current)
    }
}
