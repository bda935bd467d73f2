use bitflags::bitflags;
use glam::{Vec2, Vec4};
use slotmap::{SlotMap, new_key_type};
use smol_str::SmolStr;

use crate::error::{Error, Result};
use crate::style::{BackgroundImage, BoxShadow, Color, EdgeInsets};

new_key_type! {
    pub struct NodeKey;
}

bitflags! {
    /// What the paint step has to refresh for a node.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        const GEOMETRY = 1 << 0;
        const MATERIAL = 1 << 1;
        const STENCIL = 1 << 2;
        const ACTIVE = 1 << 3;
        const HIERARCHY = 1 << 4;
    }
}

/// Axis-aligned rectangle. Resolved rectangles are y-up with the origin at
/// the bottom-left; frames passed to [`RectNode::set_top_left_frame`] are
/// y-down.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.min() + self.size() * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x <= self.x + self.width
            && point.y <= self.y + self.height
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaskGraphic {
    pub border_radius: Vec4,
    pub show_mask_graphic: bool,
    /// Bumped whenever the clip shape changes so stencil users re-test.
    pub stencil_revision: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BorderGraphic {
    pub enabled: bool,
    /// `(top, right, bottom, left)`.
    pub border_size: Vec4,
    pub border_radius: Vec4,
    pub colors: EdgeInsets<Color>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageGraphic {
    pub color: Color,
    pub image: Option<BackgroundImage>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShadowGraphic {
    pub shadow: Option<BoxShadow>,
    pub border_radius: Vec4,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Graphic {
    None,
    RoundedMask(MaskGraphic),
    Border(BorderGraphic),
    Image(ImageGraphic),
    Shadow(ShadowGraphic),
}

impl Graphic {
    pub fn rounded_mask() -> Self {
        Self::RoundedMask(MaskGraphic {
            border_radius: Vec4::ZERO,
            show_mask_graphic: true,
            stencil_revision: 0,
        })
    }

    pub fn border() -> Self {
        Self::Border(BorderGraphic {
            enabled: false,
            border_size: Vec4::ZERO,
            border_radius: Vec4::ZERO,
            colors: EdgeInsets::uniform(Color::BLACK),
        })
    }

    pub fn image(color: Color) -> Self {
        Self::Image(ImageGraphic { color, image: None })
    }

    pub fn shadow() -> Self {
        Self::Shadow(ShadowGraphic {
            shadow: None,
            border_radius: Vec4::ZERO,
            color: Color::BLACK,
        })
    }
}

/// One rectangular drawable, positioned relative to its parent the way a
/// rect transform does: anchors pick a sub-rectangle of the parent, the
/// anchored position and size delta grow or shift it from there.
#[derive(Clone, Debug)]
pub struct RectNode {
    name: SmolStr,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    pub anchor_min: Vec2,
    pub anchor_max: Vec2,
    pub pivot: Vec2,
    pub anchored_position: Vec2,
    pub size_delta: Vec2,
    active: bool,
    graphic: Graphic,
    dirty: DirtyFlags,
}

impl RectNode {
    fn new(name: SmolStr, graphic: Graphic) -> Self {
        Self {
            name,
            parent: None,
            children: Vec::new(),
            anchor_min: Vec2::splat(0.5),
            anchor_max: Vec2::splat(0.5),
            pivot: Vec2::splat(0.5),
            anchored_position: Vec2::ZERO,
            size_delta: Vec2::splat(100.0),
            active: true,
            graphic,
            dirty: DirtyFlags::all(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            self.active = active;
            self.dirty |= DirtyFlags::ACTIVE;
        }
    }

    pub fn graphic(&self) -> &Graphic {
        &self.graphic
    }

    pub fn graphic_mut(&mut self) -> &mut Graphic {
        &mut self.graphic
    }

    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    pub fn set_material_dirty(&mut self) {
        self.mark_dirty(DirtyFlags::MATERIAL);
    }

    pub fn offset_min(&self) -> Vec2 {
        self.anchored_position - self.size_delta * self.pivot
    }

    pub fn offset_max(&self) -> Vec2 {
        self.anchored_position + self.size_delta * (Vec2::ONE - self.pivot)
    }

    pub fn set_offset_min(&mut self, value: Vec2) {
        let shift = value - self.offset_min();
        self.size_delta -= shift;
        self.anchored_position += shift * (Vec2::ONE - self.pivot);
        self.dirty |= DirtyFlags::GEOMETRY;
    }

    pub fn set_offset_max(&mut self, value: Vec2) {
        let shift = value - self.offset_max();
        self.size_delta += shift;
        self.anchored_position += shift * self.pivot;
        self.dirty |= DirtyFlags::GEOMETRY;
    }

    pub fn set_anchored_position(&mut self, value: Vec2) {
        if self.anchored_position != value {
            self.anchored_position = value;
            self.dirty |= DirtyFlags::GEOMETRY;
        }
    }

    pub fn set_size_delta(&mut self, value: Vec2) {
        if self.size_delta != value {
            self.size_delta = value;
            self.dirty |= DirtyFlags::GEOMETRY;
        }
    }

    /// Anchors to all four parent edges with no inset.
    pub fn full_stretch(&mut self) {
        self.anchor_min = Vec2::ZERO;
        self.anchor_max = Vec2::ONE;
        self.anchored_position = Vec2::ZERO;
        self.pivot = Vec2::splat(0.5);
        self.size_delta = Vec2::ZERO;
        self.dirty |= DirtyFlags::GEOMETRY;
    }

    /// Pins the node to the parent's top-left corner and places it with a
    /// y-down frame (`frame.y` measured from the parent's top edge).
    pub fn set_top_left_frame(&mut self, frame: Rect) {
        let corner = Vec2::new(0.0, 1.0);
        if self.anchor_min != corner || self.anchor_max != corner || self.pivot != corner {
            self.anchor_min = corner;
            self.anchor_max = corner;
            self.pivot = corner;
            self.dirty |= DirtyFlags::GEOMETRY;
        }
        self.set_anchored_position(Vec2::new(frame.x, -frame.y));
        self.set_size_delta(Vec2::new(frame.width, frame.height));
    }

    /// Rectangle of this node given its parent's resolved rectangle.
    pub fn rect_in(&self, parent: Rect) -> Rect {
        let size = parent.size();
        let min = parent.min() + size * self.anchor_min + self.offset_min();
        let max = parent.min() + size * self.anchor_max + self.offset_max();
        Rect::from_min_max(min, max)
    }
}

/// Owns every drawable. Nodes are addressed by generational keys so a handle
/// to a removed node resolves to nothing instead of to a recycled slot.
#[derive(Debug, Default)]
pub struct DrawableArena {
    nodes: SlotMap<NodeKey, RectNode>,
}

impl DrawableArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn create(&mut self, name: impl Into<SmolStr>, graphic: Graphic) -> NodeKey {
        self.nodes.insert(RectNode::new(name.into(), graphic))
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn get(&self, key: NodeKey) -> Option<&RectNode> {
        self.nodes.get(key)
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut RectNode> {
        self.nodes.get_mut(key)
    }

    pub fn node(&self, key: NodeKey) -> Result<&RectNode> {
        self.nodes.get(key).ok_or(Error::StaleNode(key))
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Result<&mut RectNode> {
        self.nodes.get_mut(key).ok_or(Error::StaleNode(key))
    }

    /// Moves `child` under `parent` (appended last) without touching its
    /// transform. Fails if `parent` is `child` or lies below it.
    pub fn set_parent(&mut self, child: NodeKey, parent: NodeKey) -> Result<()> {
        if !self.nodes.contains_key(parent) {
            return Err(Error::StaleNode(parent));
        }
        let previous = self.node(child)?.parent;
        let mut cursor = Some(parent);
        while let Some(ancestor) = cursor {
            if ancestor == child {
                return Err(Error::CyclicHierarchy(child));
            }
            cursor = self.nodes.get(ancestor).and_then(|node| node.parent);
        }
        if let Some(previous) = previous
            && let Some(node) = self.nodes.get_mut(previous)
        {
            node.children.retain(|key| *key != child);
        }
        self.node_mut(child)?.parent = Some(parent);
        let parent_node = self.node_mut(parent)?;
        parent_node.children.push(child);
        parent_node.dirty |= DirtyFlags::HIERARCHY;
        Ok(())
    }

    /// Parents `child` under `parent` and stretches it over the parent.
    pub fn attach_full_stretch(&mut self, child: NodeKey, parent: NodeKey) -> Result<()> {
        self.set_parent(child, parent)?;
        self.node_mut(child)?.full_stretch();
        Ok(())
    }

    /// Moves the node to the front of its parent's child list, so it is drawn
    /// before (underneath) its siblings.
    pub fn set_as_first_sibling(&mut self, key: NodeKey) -> Result<()> {
        let Some(parent) = self.node(key)?.parent else {
            return Ok(());
        };
        let parent_node = self.node_mut(parent)?;
        parent_node.children.retain(|child| *child != key);
        parent_node.children.insert(0, key);
        parent_node.dirty |= DirtyFlags::HIERARCHY;
        Ok(())
    }

    /// Removes the node and everything below it. Returns how many nodes went.
    pub fn remove_subtree(&mut self, key: NodeKey) -> usize {
        let Some(parent) = self.nodes.get(key).map(|node| node.parent) else {
            return 0;
        };
        if let Some(parent) = parent
            && let Some(node) = self.nodes.get_mut(parent)
        {
            node.children.retain(|child| *child != key);
            node.dirty |= DirtyFlags::HIERARCHY;
        }

        let mut removed = 0;
        let mut stack = vec![key];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        removed
    }

    /// True when the node and all of its ancestors are active.
    pub fn is_active_in_hierarchy(&self, key: NodeKey) -> bool {
        let mut cursor = Some(key);
        while let Some(current) = cursor {
            let Some(node) = self.nodes.get(current) else {
                return false;
            };
            if !node.active {
                return false;
            }
            cursor = node.parent;
        }
        true
    }

    /// Resolves the node's rectangle, treating its topmost ancestor as
    /// occupying `root`.
    pub fn resolve_rect(&self, key: NodeKey, root: Rect) -> Result<Rect> {
        let mut chain = Vec::new();
        let mut cursor = Some(key);
        while let Some(current) = cursor {
            let node = self.node(current)?;
            chain.push(node);
            cursor = node.parent;
        }
        // The topmost ancestor is the root itself.
        chain.pop();
        Ok(chain
            .iter()
            .rev()
            .fold(root, |parent, node| node.rect_in(parent)))
    }

    /// Drains the dirty set for the paint step.
    pub fn take_dirty(&mut self) -> Vec<(NodeKey, DirtyFlags)> {
        let mut dirty = Vec::new();
        for (key, node) in &mut self.nodes {
            if !node.dirty.is_empty() {
                dirty.push((key, node.dirty));
                node.dirty = DirtyFlags::empty();
            }
        }
        dirty
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &RectNode)> {
        self.nodes.iter()
    }
}
