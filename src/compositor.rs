use glam::Vec2;
use rustc_hash::FxHashSet;
use slotmap::{SlotMap, new_key_type};

use crate::error::{Error, Result};
use crate::style::{BoxStyle, LayoutState, ScrollStyle};
use crate::transition::RunResult;
use crate::view::{BoxDecorationTree, DirtyFlags, DrawableArena, Graphic, NodeKey, Rect, ScrollView};

new_key_type! {
    pub struct ElementKey;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ElementKind {
    #[default]
    Box,
    /// A box whose children scroll inside its padding box.
    Scroll,
}

#[derive(Debug)]
struct Element {
    node: NodeKey,
    parent: Option<ElementKey>,
    children: Vec<ElementKey>,
    decoration: BoxDecorationTree,
    scroll: Option<ScrollView>,
    pending_style: Option<BoxStyle>,
    pending_scroll_style: Option<ScrollStyle>,
    pending_layout: Option<LayoutState>,
    layout: Option<LayoutState>,
}

impl Element {
    /// Node that child elements are parented under.
    fn child_host(&self) -> NodeKey {
        self.scroll
            .as_ref()
            .map_or(self.node, ScrollView::content_node)
    }
}

/// Outcome of one [`Compositor::tick`].
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Elements whose queued style or layout was applied this tick.
    pub flushed: usize,
    /// Drawables the paint step has to refresh, drained from the arena.
    pub dirty: Vec<(NodeKey, DirtyFlags)>,
    /// Some scroll animation or spring is still moving.
    pub keep_running: bool,
}

/// Hosts the drawable arena and every element's decoration and scroll state.
///
/// Style and layout handed in between ticks are queued and applied once per
/// element on the next [`tick`](Self::tick), however many times they changed.
#[derive(Debug)]
pub struct Compositor {
    arena: DrawableArena,
    root: NodeKey,
    elements: SlotMap<ElementKey, Element>,
    pending: Vec<ElementKey>,
    pending_set: FxHashSet<ElementKey>,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    pub fn new() -> Self {
        let mut arena = DrawableArena::new();
        let root = arena.create("[Root]", Graphic::None);
        Self {
            arena,
            root,
            elements: SlotMap::with_key(),
            pending: Vec::new(),
            pending_set: FxHashSet::default(),
        }
    }

    pub fn arena(&self) -> &DrawableArena {
        &self.arena
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, key: ElementKey) -> bool {
        self.elements.contains_key(key)
    }

    pub fn create_element(&mut self, parent: Option<ElementKey>, kind: ElementKind) -> Result<ElementKey> {
        let host = match parent {
            Some(parent) => self.element(parent)?.child_host(),
            None => self.root,
        };

        let node = self.arena.create("[Element]", Graphic::None);
        self.arena.set_parent(node, host)?;
        self.arena.node_mut(node)?.set_top_left_frame(Rect::default());
        let decoration = BoxDecorationTree::create(&mut self.arena, node)?;
        let scroll = match kind {
            ElementKind::Box => None,
            ElementKind::Scroll => Some(ScrollView::create(&mut self.arena, decoration.root())?),
        };

        let key = self.elements.insert(Element {
            node,
            parent,
            children: Vec::new(),
            decoration,
            scroll,
            pending_style: None,
            pending_scroll_style: None,
            pending_layout: None,
            layout: None,
        });
        if let Some(parent) = parent {
            self.element_mut(parent)?.children.push(key);
        }
        tracing::debug!(?key, ?kind, ?node, "created element");
        Ok(key)
    }

    /// Removes the element, its descendants and all of their drawables.
    /// Returns how many elements went.
    pub fn destroy_element(&mut self, key: ElementKey) -> Result<usize> {
        let element = self.element(key)?;
        let (node, parent) = (element.node, element.parent);
        if let Some(parent) = parent
            && let Some(parent) = self.elements.get_mut(parent)
        {
            parent.children.retain(|child| *child != key);
        }

        let mut removed = 0;
        let mut stack = vec![key];
        while let Some(next) = stack.pop() {
            if let Some(element) = self.elements.remove(next) {
                stack.extend(element.children);
                self.pending_set.remove(&next);
                removed += 1;
            }
        }
        self.pending.retain(|pending| self.elements.contains_key(*pending));
        let nodes = self.arena.remove_subtree(node);
        tracing::debug!(?key, removed, nodes, "destroyed element");
        Ok(removed)
    }

    pub fn set_style(&mut self, key: ElementKey, style: BoxStyle) -> Result<()> {
        self.element_mut(key)?.pending_style = Some(style);
        self.enqueue(key);
        Ok(())
    }

    /// Ignored, with a warning, on elements that do not scroll.
    pub fn set_scroll_style(&mut self, key: ElementKey, style: ScrollStyle) -> Result<()> {
        let element = self.element_mut(key)?;
        if element.scroll.is_none() {
            tracing::warn!(?key, "scroll style on an element that does not scroll");
            return Ok(());
        }
        element.pending_scroll_style = Some(style);
        self.enqueue(key);
        Ok(())
    }

    pub fn set_layout(&mut self, key: ElementKey, layout: LayoutState) -> Result<()> {
        self.element_mut(key)?.pending_layout = Some(layout);
        self.enqueue(key);
        Ok(())
    }

    pub fn element_node(&self, key: ElementKey) -> Result<NodeKey> {
        Ok(self.element(key)?.node)
    }

    pub fn layout(&self, key: ElementKey) -> Result<Option<&LayoutState>> {
        Ok(self.element(key)?.layout.as_ref())
    }

    pub fn decoration(&self, key: ElementKey) -> Result<&BoxDecorationTree> {
        Ok(&self.element(key)?.decoration)
    }

    pub fn scroll_view(&self, key: ElementKey) -> Result<&ScrollView> {
        self.element(key)?.scroll.as_ref().ok_or(Error::NotScrollable)
    }

    pub fn set_scroll_left(&mut self, key: ElementKey, value: f32) -> Result<()> {
        self.with_scroll(key, |view, arena| view.set_scroll_left(arena, value))
    }

    pub fn set_scroll_top(&mut self, key: ElementKey, value: f32) -> Result<()> {
        self.with_scroll(key, |view, arena| view.set_scroll_top(arena, value))
    }

    pub fn scroll_to(&mut self, key: ElementKey, x: f32, y: f32, duration: Option<f32>) -> Result<()> {
        self.with_scroll(key, |view, arena| view.scroll_to(arena, x, y, duration))
    }

    pub fn scroll_by(&mut self, key: ElementKey, dx: f32, dy: f32, duration: Option<f32>) -> Result<()> {
        self.with_scroll(key, |view, arena| view.scroll_by(arena, dx, dy, duration))
    }

    pub fn on_wheel(&mut self, key: ElementKey, delta: Vec2) -> Result<()> {
        self.with_scroll(key, |view, arena| view.on_wheel(arena, delta))
    }

    /// Runs `f` against the element's scroll view and the arena it draws into.
    pub fn with_scroll<R>(
        &mut self,
        key: ElementKey,
        f: impl FnOnce(&mut ScrollView, &mut DrawableArena) -> R,
    ) -> Result<R> {
        let element = self.elements.get_mut(key).ok_or(Error::StaleElement)?;
        let view = element.scroll.as_mut().ok_or(Error::NotScrollable)?;
        Ok(f(view, &mut self.arena))
    }

    /// Applies queued style and layout, steps every scroll view by
    /// `dt_seconds` and drains the dirty drawables.
    pub fn tick(&mut self, dt_seconds: f32) -> FrameReport {
        let pending = std::mem::take(&mut self.pending);
        self.pending_set.clear();

        let mut flushed = 0;
        for key in pending {
            let Some(element) = self.elements.get_mut(key) else {
                continue;
            };
            flush_element(&mut self.arena, element);
            tracing::trace!(?key, "flushed element");
            flushed += 1;
        }

        let mut run = RunResult::none();
        for element in self.elements.values_mut() {
            if let Some(view) = element.scroll.as_mut() {
                run = run.merge(view.advance(&mut self.arena, dt_seconds));
            }
        }

        FrameReport {
            flushed,
            dirty: self.arena.take_dirty(),
            keep_running: run.keep_running,
        }
    }

    fn enqueue(&mut self, key: ElementKey) {
        if self.pending_set.insert(key) {
            self.pending.push(key);
        }
    }

    fn element(&self, key: ElementKey) -> Result<&Element> {
        self.elements.get(key).ok_or(Error::StaleElement)
    }

    fn element_mut(&mut self, key: ElementKey) -> Result<&mut Element> {
        self.elements.get_mut(key).ok_or(Error::StaleElement)
    }
}

fn flush_element(arena: &mut DrawableArena, element: &mut Element) {
    let layout = element.pending_layout.take();
    if let Some(layout) = layout {
        match arena.get_mut(element.node) {
            Some(node) => node.set_top_left_frame(Rect::new(layout.x, layout.y, layout.width, layout.height)),
            None => tracing::warn!(node = ?element.node, "element drawable is gone; skipping layout"),
        }
        element.decoration.apply_border_metrics(arena, &layout);
        element.layout = Some(layout);
    }
    if let Some(style) = element.pending_style.take() {
        element.decoration.apply_style(arena, &style);
    }

    let Some(view) = element.scroll.as_mut() else {
        return;
    };
    if let Some(style) = element.pending_scroll_style.take() {
        view.apply_style(arena, &style);
    }
    if let Some(layout) = layout {
        view.apply_layout(arena, &layout, element.decoration.border_widths());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{BorderLayout, Color};

    #[test]
    fn elements_nest_under_parent_host() {
        let mut compositor = Compositor::new();
        let scroller = compositor.create_element(None, ElementKind::Scroll).unwrap();
        let child = compositor.create_element(Some(scroller), ElementKind::Box).unwrap();

        let content = compositor.scroll_view(scroller).unwrap().content_node();
        let child_node = compositor.element_node(child).unwrap();
        assert_eq!(compositor.arena().node(child_node).unwrap().parent(), Some(content));
        assert_eq!(
            compositor.arena().node(compositor.element_node(scroller).unwrap()).unwrap().parent(),
            Some(compositor.root())
        );
    }

    #[test]
    fn queued_changes_flush_once_per_tick() {
        let mut compositor = Compositor::new();
        let key = compositor.create_element(None, ElementKind::Box).unwrap();
        compositor.tick(0.0);

        compositor
            .set_style(key, BoxStyle::new().background_color(Color::rgb(1, 1, 1)))
            .unwrap();
        compositor
            .set_style(key, BoxStyle::new().background_color(Color::rgb(2, 2, 2)))
            .unwrap();
        compositor
            .set_layout(key, LayoutState::new(0.0, 0.0, 50.0, 50.0))
            .unwrap();

        let report = compositor.tick(1.0 / 60.0);
        assert_eq!(report.flushed, 1);
        assert!(!report.dirty.is_empty());
        assert_eq!(compositor.tick(1.0 / 60.0).flushed, 0);
    }

    #[test]
    fn layout_applies_border_and_frame() {
        let mut compositor = Compositor::new();
        let key = compositor.create_element(None, ElementKind::Box).unwrap();
        let layout = LayoutState::new(10.0, 20.0, 100.0, 60.0).with_border(BorderLayout::uniform(4.0));
        compositor.set_layout(key, layout).unwrap();
        compositor.tick(0.0);

        let decoration = compositor.decoration(key).unwrap();
        assert_eq!(decoration.border_widths().left, 4.0);
        let screen = Rect::new(0.0, 0.0, 400.0, 300.0);
        let rect = compositor
            .arena()
            .resolve_rect(decoration.root(), screen)
            .unwrap();
        assert_eq!(rect, Rect::new(14.0, 224.0, 92.0, 52.0));
    }

    #[test]
    fn scroll_calls_require_scroll_element() {
        let mut compositor = Compositor::new();
        let key = compositor.create_element(None, ElementKind::Box).unwrap();
        assert_eq!(compositor.scroll_to(key, 0.0, 10.0, None), Err(Error::NotScrollable));
        assert!(compositor.set_scroll_style(key, ScrollStyle::new()).is_ok());
    }

    #[test]
    fn destroy_takes_descendants_and_drawables() {
        let mut compositor = Compositor::new();
        let parent = compositor.create_element(None, ElementKind::Scroll).unwrap();
        let child = compositor.create_element(Some(parent), ElementKind::Box).unwrap();
        compositor.set_layout(child, LayoutState::new(0.0, 0.0, 10.0, 10.0)).unwrap();

        assert_eq!(compositor.destroy_element(parent), Ok(2));
        assert!(compositor.is_empty());
        assert_eq!(compositor.arena().len(), 1);
        assert_eq!(compositor.set_style(child, BoxStyle::new()), Err(Error::StaleElement));
        assert_eq!(compositor.tick(0.0).flushed, 0);
    }
}
