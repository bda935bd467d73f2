//! Scroll containers: position and animation ([`ScrollViewport`]), one
//! [`ScrollbarController`] per axis, and [`ScrollView`] tying both to the
//! drawables.
//!
//! ```text
//! parent (padding box)
//! └── [ScrollViewport]    clip
//!     ├── [Content]       pinned top-left, shifted by the scroll offset
//!     ├── [HorizontalTrack]
//!     │   └── [HorizontalThumb]
//!     └── [VerticalTrack]
//!         └── [VerticalThumb]
//! ```

mod physics;
mod scrollbar;
mod viewport;

pub use physics::*;
pub use scrollbar::*;
pub use viewport::*;

use glam::Vec2;

use crate::error::Result;
use crate::style::{EdgeInsets, LayoutState, ScrollStyle};
use crate::transition::{RunResult, ScrollAxis};
use crate::view::node::{DrawableArena, Graphic, NodeKey, Rect};

#[derive(Debug)]
pub struct ScrollView {
    viewport: ScrollViewport,
    horizontal: ScrollbarController,
    vertical: ScrollbarController,
    viewport_node: NodeKey,
    content: NodeKey,
    style: ScrollStyle,
}

impl ScrollView {
    /// Builds the scroll drawables under `parent`, which should cover the
    /// padding box of the scrolling element.
    pub fn create(arena: &mut DrawableArena, parent: NodeKey) -> Result<Self> {
        arena.node(parent)?;

        let viewport_node = arena.create("[ScrollViewport]", Graphic::rounded_mask());
        if let Graphic::RoundedMask(mask) = arena.node_mut(viewport_node)?.graphic_mut() {
            mask.show_mask_graphic = false;
        }
        arena.attach_full_stretch(viewport_node, parent)?;

        let content = arena.create("[Content]", Graphic::None);
        arena.set_parent(content, viewport_node)?;
        arena.node_mut(content)?.set_top_left_frame(Rect::default());

        let horizontal = ScrollbarController::create(arena, viewport_node, ScrollAxis::X)?;
        let vertical = ScrollbarController::create(arena, viewport_node, ScrollAxis::Y)?;

        tracing::debug!(?parent, ?viewport_node, "created scroll view");

        Ok(Self {
            viewport: ScrollViewport::new(),
            horizontal,
            vertical,
            viewport_node,
            content,
            style: ScrollStyle::default(),
        })
    }

    pub fn viewport(&self) -> &ScrollViewport {
        &self.viewport
    }

    pub fn style(&self) -> &ScrollStyle {
        &self.style
    }

    pub fn viewport_node(&self) -> NodeKey {
        self.viewport_node
    }

    /// Node that the scrolled children hang under.
    pub fn content_node(&self) -> NodeKey {
        self.content
    }

    pub fn scrollbar(&self, axis: ScrollAxis) -> &ScrollbarController {
        match axis {
            ScrollAxis::X => &self.horizontal,
            ScrollAxis::Y => &self.vertical,
        }
    }

    fn scrollbar_mut(&mut self, axis: ScrollAxis) -> &mut ScrollbarController {
        match axis {
            ScrollAxis::X => &mut self.horizontal,
            ScrollAxis::Y => &mut self.vertical,
        }
    }

    pub fn scroll_left(&self) -> f32 {
        self.viewport.scroll_left()
    }

    pub fn scroll_top(&self) -> f32 {
        self.viewport.scroll_top()
    }

    pub fn client_width(&self) -> f32 {
        self.viewport.client_width()
    }

    pub fn client_height(&self) -> f32 {
        self.viewport.client_height()
    }

    pub fn scroll_width(&self) -> f32 {
        self.viewport.scroll_width()
    }

    pub fn scroll_height(&self) -> f32 {
        self.viewport.scroll_height()
    }

    pub fn apply_style(&mut self, arena: &mut DrawableArena, style: &ScrollStyle) {
        self.viewport.apply_style(style);
        for axis in ScrollAxis::ALL {
            let visibility = style.always_show.visibility(axis);
            self.scrollbar_mut(axis)
                .apply_style(style.scrollbar_style(axis), visibility);
        }
        self.style = *style;
        self.sync(arena);
    }

    /// The client area is the layout box minus the border; the content
    /// extent comes straight from layout.
    pub fn apply_layout(&mut self, arena: &mut DrawableArena, layout: &LayoutState, border: EdgeInsets<f32>) {
        let client = Vec2::new(
            layout.width - border.left - border.right,
            layout.height - border.top - border.bottom,
        );
        let content = Vec2::new(layout.content_width, layout.content_height);
        self.viewport.apply_layout(client, content);
        self.sync(arena);
    }

    pub fn set_scroll_left(&mut self, arena: &mut DrawableArena, value: f32) {
        self.viewport.set_scroll_left(value);
        self.sync(arena);
    }

    pub fn set_scroll_top(&mut self, arena: &mut DrawableArena, value: f32) {
        self.viewport.set_scroll_top(value);
        self.sync(arena);
    }

    pub fn scroll_to(&mut self, arena: &mut DrawableArena, x: f32, y: f32, duration: Option<f32>) {
        self.viewport.scroll_to(x, y, duration);
        self.sync(arena);
    }

    pub fn scroll_by(&mut self, arena: &mut DrawableArena, dx: f32, dy: f32, duration: Option<f32>) {
        self.viewport.scroll_by(dx, dy, duration);
        self.sync(arena);
    }

    /// Raw wheel delta, scaled by the configured sensitivity and animated
    /// with the configured smoothness.
    pub fn on_wheel(&mut self, arena: &mut DrawableArena, delta: Vec2) {
        let scaled = delta * self.viewport.sensitivity();
        self.scroll_by(arena, scaled.x, scaled.y, None);
    }

    pub fn begin_drag(&mut self) {
        self.viewport.begin_drag();
    }

    pub fn drag_by(&mut self, arena: &mut DrawableArena, delta: Vec2) {
        self.viewport.drag_by(delta);
        self.sync(arena);
    }

    pub fn end_drag(&mut self) {
        self.viewport.end_drag();
    }

    /// `pointer` is in viewport coordinates, y-down.
    pub fn begin_thumb_drag(&mut self, axis: ScrollAxis, pointer: Vec2) -> bool {
        let viewport = &self.viewport;
        let bar = match axis {
            ScrollAxis::X => &mut self.horizontal,
            ScrollAxis::Y => &mut self.vertical,
        };
        bar.begin_thumb_drag(pointer, viewport)
    }

    pub fn drag_thumb(&mut self, arena: &mut DrawableArena, axis: ScrollAxis, pointer: Vec2) {
        let bar = match axis {
            ScrollAxis::X => &mut self.horizontal,
            ScrollAxis::Y => &mut self.vertical,
        };
        if bar.drag_thumb(pointer, &mut self.viewport) {
            self.sync(arena);
        }
    }

    pub fn end_thumb_drag(&mut self, axis: ScrollAxis) {
        self.scrollbar_mut(axis).end_thumb_drag();
    }

    /// Per-frame step of the scroll animation and elastic spring.
    pub fn advance(&mut self, arena: &mut DrawableArena, dt_seconds: f32) -> RunResult {
        let result = self.viewport.advance(dt_seconds);
        if result.needs_paint {
            self.sync(arena);
        }
        result
    }

    /// Pushes the current offset and extents to the content node and both
    /// scrollbars.
    pub fn sync(&mut self, arena: &mut DrawableArena) {
        let offset = self.viewport.offset();
        let size = self.viewport.content_size();
        match arena.get_mut(self.content) {
            Some(node) => node.set_top_left_frame(Rect::new(-offset.x, -offset.y, size.x, size.y)),
            None => tracing::warn!(key = ?self.content, "scroll content node is gone; skipping update"),
        }
        self.horizontal.update(arena, &self.viewport);
        self.vertical.update(arena, &self.viewport);
    }

    /// Removes every scroll drawable, content included.
    pub fn destroy(self, arena: &mut DrawableArena) {
        arena.remove_subtree(self.viewport_node);
    }
}
