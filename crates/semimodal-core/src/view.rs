//! # Retained view tree
//!
//! Views live in a slotmap arena and are addressed by `ViewId`. Frames are in the
//! parent's coordinate space, like UIKit/Android views. Children are ordered back to
//! front: index 0 is drawn first and hit-tested last.
//!
//! ```rust
//! use semimodal_core::*;
//!
//! let mut tree = ViewTree::new();
//! let root = tree.create_with_frame(ViewKind::Plain, Rect::new(0.0, 0.0, 400.0, 800.0));
//! let card = tree.create_with_frame(ViewKind::Plain, Rect::new(0.0, 400.0, 400.0, 400.0));
//! tree.add_subview(root, card).unwrap();
//!
//! assert_eq!(tree.hit_test(root, Vec2::new(10.0, 500.0)), Some(card));
//! assert_eq!(tree.hit_test(root, Vec2::new(10.0, 100.0)), Some(root));
//! ```

use slotmap::{SecondaryMap, SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::error::ViewError;
use crate::input::Recognizer;
use crate::{Color, Corners, Rect, Vec2};

new_key_type! {
    pub struct ViewId;
}

/// Alpha at or below which a view is skipped by hit testing.
pub const HIT_TEST_ALPHA_CUTOFF: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewKind {
    Plain,
    /// A scrolling container; its pan recognizer may run alongside others.
    Scroll,
}

pub struct ViewNode {
    pub kind: ViewKind,
    pub frame: Rect,
    pub alpha: f32,
    pub background: Color,
    pub corner_radius: f32,
    pub masked_corners: Corners,
    pub clips_to_bounds: bool,
    parent: Option<ViewId>,
    children: SmallVec<[ViewId; 4]>,
    recognizers: SmallVec<[Recognizer; 2]>,
}

impl ViewNode {
    fn new(kind: ViewKind, frame: Rect) -> Self {
        Self {
            kind,
            frame,
            alpha: 1.0,
            background: Color::TRANSPARENT,
            corner_radius: 0.0,
            masked_corners: Corners::all(),
            clips_to_bounds: false,
            parent: None,
            children: SmallVec::new(),
            recognizers: SmallVec::new(),
        }
    }

    pub fn parent(&self) -> Option<ViewId> {
        self.parent
    }

    pub fn children(&self) -> &[ViewId] {
        &self.children
    }

    pub fn recognizers(&self) -> &[Recognizer] {
        &self.recognizers
    }
}

/// The properties the host animates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Animatable {
    pub frame: Rect,
    pub alpha: f32,
}

pub type ViewSnapshot = SecondaryMap<ViewId, Animatable>;

#[derive(Default)]
pub struct ViewTree {
    nodes: SlotMap<ViewId, ViewNode>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, kind: ViewKind) -> ViewId {
        self.create_with_frame(kind, Rect::ZERO)
    }

    pub fn create_with_frame(&mut self, kind: ViewKind, frame: Rect) -> ViewId {
        self.nodes.insert(ViewNode::new(kind, frame))
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: ViewId) -> Option<&ViewNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut ViewNode> {
        self.nodes.get_mut(id)
    }

    fn node_mut(&mut self, id: ViewId) -> Result<&mut ViewNode, ViewError> {
        self.nodes.get_mut(id).ok_or(ViewError::UnknownView(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn superview(&self, id: ViewId) -> Option<ViewId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn subviews(&self, id: ViewId) -> &[ViewId] {
        self.nodes.get(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// True if `view` is `ancestor` or lives somewhere below it.
    pub fn is_descendant(&self, view: ViewId, ancestor: ViewId) -> bool {
        let mut cur = Some(view);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.superview(id);
        }
        false
    }

    /// Appends `child` as the front-most subview of `parent`, detaching it from any
    /// previous parent first. Re-adding an existing child brings it to the front.
    pub fn add_subview(&mut self, parent: ViewId, child: ViewId) -> Result<(), ViewError> {
        let index = self.subviews(parent).len();
        self.insert_subview(parent, child, index)
    }

    /// Inserts `child` at `index` (clamped) in `parent`'s subviews.
    pub fn insert_subview(
        &mut self,
        parent: ViewId,
        child: ViewId,
        index: usize,
    ) -> Result<(), ViewError> {
        if !self.contains(parent) {
            return Err(ViewError::UnknownView(parent));
        }
        if !self.contains(child) {
            return Err(ViewError::UnknownView(child));
        }
        if self.is_descendant(parent, child) {
            return Err(ViewError::Cycle { parent, child });
        }
        self.detach(child);

        let p = self.node_mut(parent)?;
        let index = index.min(p.children.len());
        p.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detaches `child` from its parent. Detached views stay in the arena.
    pub fn remove_from_superview(&mut self, child: ViewId) -> Result<(), ViewError> {
        if !self.contains(child) {
            return Err(ViewError::UnknownView(child));
        }
        self.detach(child);
        Ok(())
    }

    fn detach(&mut self, child: ViewId) {
        let Some(parent) = self.superview(child) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|c| *c != child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = None;
        }
    }

    /// Detaches `id` and frees it together with its whole subtree.
    pub fn remove(&mut self, id: ViewId) {
        self.detach(id);
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.nodes.remove(cur) {
                stack.extend(node.children);
            }
        }
    }

    pub fn frame(&self, id: ViewId) -> Option<Rect> {
        self.nodes.get(id).map(|n| n.frame)
    }

    pub fn bounds(&self, id: ViewId) -> Option<Rect> {
        self.frame(id).map(|f| f.bounds())
    }

    pub fn set_frame(&mut self, id: ViewId, frame: Rect) -> Result<(), ViewError> {
        self.node_mut(id)?.frame = frame;
        Ok(())
    }

    pub fn set_center_y(&mut self, id: ViewId, cy: f32) -> Result<(), ViewError> {
        let node = self.node_mut(id)?;
        node.frame = node.frame.with_center_y(cy);
        Ok(())
    }

    pub fn alpha(&self, id: ViewId) -> Option<f32> {
        self.nodes.get(id).map(|n| n.alpha)
    }

    pub fn set_alpha(&mut self, id: ViewId, alpha: f32) -> Result<(), ViewError> {
        self.node_mut(id)?.alpha = alpha.clamp(0.0, 1.0);
        Ok(())
    }

    pub fn add_recognizer(&mut self, id: ViewId, recognizer: Recognizer) -> Result<(), ViewError> {
        self.node_mut(id)?.recognizers.push(recognizer);
        Ok(())
    }

    /// Frame of `id` in the coordinate space of its top-most ancestor.
    pub fn window_frame(&self, id: ViewId) -> Option<Rect> {
        let mut frame = self.frame(id)?;
        let mut cur = self.superview(id);
        while let Some(p) = cur {
            let pf = self.frame(p)?;
            frame = frame.offset(pf.x, pf.y);
            cur = self.superview(p);
        }
        Some(frame)
    }

    /// Front-most view under `p`, where `p` is in `root`'s parent coordinate space.
    ///
    /// Children may be hit outside their parent's bounds unless the parent clips.
    pub fn hit_test(&self, root: ViewId, p: Vec2) -> Option<ViewId> {
        let node = self.nodes.get(root)?;
        if node.alpha <= HIT_TEST_ALPHA_CUTOFF {
            return None;
        }
        let local = Vec2::new(p.x - node.frame.x, p.y - node.frame.y);
        let inside = node.frame.bounds().contains(local);
        if node.clips_to_bounds && !inside {
            return None;
        }
        for child in node.children.iter().rev() {
            if let Some(hit) = self.hit_test(*child, local) {
                return Some(hit);
            }
        }
        inside.then_some(root)
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let mut out = SecondaryMap::with_capacity(self.nodes.len());
        for (id, node) in &self.nodes {
            out.insert(
                id,
                Animatable {
                    frame: node.frame,
                    alpha: node.alpha,
                },
            );
        }
        out
    }

    pub fn apply(&mut self, id: ViewId, value: Animatable) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.frame = value.frame;
            node.alpha = value.alpha;
        }
    }
}
