use glam::Vec2;

use super::viewport::ScrollViewport;
use crate::error::Result;
use crate::style::{Color, ScrollDirection, ScrollbarStyle, ScrollbarVisibility};
use crate::transition::ScrollAxis;
use crate::view::node::{DrawableArena, Graphic, NodeKey, Rect, RectNode};

/// Track and thumb placement, y-down. The track is relative to the scroll
/// viewport, the thumb relative to the track.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollbarGeometry {
    pub track: Rect,
    pub thumb: Rect,
}

impl ScrollbarGeometry {
    /// Thumb rectangle in viewport coordinates.
    pub fn thumb_in_viewport(&self) -> Rect {
        Rect::new(
            self.track.x + self.thumb.x,
            self.track.y + self.thumb.y,
            self.thumb.width,
            self.thumb.height,
        )
    }
}

pub fn scrollbar_visible(
    direction: ScrollDirection,
    visibility: ScrollbarVisibility,
    axis: ScrollAxis,
    overflows: bool,
) -> bool {
    direction.allows(axis) && (overflows || visibility == ScrollbarVisibility::Permanent)
}

/// The vertical track hugs the right edge and the horizontal one the bottom
/// edge; the cross-axis inset (`left` for vertical, `top` for horizontal)
/// pushes the track inward from that edge, the other two insets shorten it.
pub fn track_rect(axis: ScrollAxis, style: &ScrollbarStyle, client: Vec2) -> Rect {
    let thickness = style.thickness.max(0.0);
    let insets = style.insets;
    match axis {
        ScrollAxis::Y => Rect::new(
            client.x - thickness - insets.left,
            insets.top,
            thickness,
            (client.y - insets.top - insets.bottom).max(0.0),
        ),
        ScrollAxis::X => Rect::new(
            insets.left,
            client.y - thickness - insets.top,
            (client.x - insets.left - insets.right).max(0.0),
            thickness,
        ),
    }
}

/// Thumb length follows `client / content`, its travel `offset / range`.
pub fn thumb_rect(axis: ScrollAxis, style: &ScrollbarStyle, track: Rect, viewport: &ScrollViewport) -> Rect {
    let run = axis.pick(track.width, track.height);
    let client = axis.pick(viewport.client_width(), viewport.client_height());
    let content = axis.pick(viewport.scroll_width(), viewport.scroll_height());
    let ratio = if content > 0.0 {
        (client / content).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let length = (run * ratio).clamp(style.min_thumb_length.max(0.0).min(run), run);

    let range = axis.pick(viewport.max_offset().x, viewport.max_offset().y);
    let offset = axis.pick(viewport.scroll_left(), viewport.scroll_top());
    let progress = if range > 0.0 {
        (offset / range).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let position = progress * (run - length);
    let thickness = style.thickness.max(0.0);

    match axis {
        ScrollAxis::X => Rect::new(position, 0.0, length, thickness),
        ScrollAxis::Y => Rect::new(0.0, position, thickness, length),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ThumbDrag {
    pointer_start: f32,
    offset_start: f32,
}

/// One scrollbar: a track drawable with the thumb drawable inside it.
#[derive(Debug)]
pub struct ScrollbarController {
    axis: ScrollAxis,
    style: ScrollbarStyle,
    visibility: ScrollbarVisibility,
    visible: bool,
    geometry: Option<ScrollbarGeometry>,
    track: NodeKey,
    thumb: NodeKey,
    drag: Option<ThumbDrag>,
}

impl ScrollbarController {
    pub fn create(arena: &mut DrawableArena, parent: NodeKey, axis: ScrollAxis) -> Result<Self> {
        let style = ScrollbarStyle::default();
        let (track_name, thumb_name) = match axis {
            ScrollAxis::X => ("[HorizontalTrack]", "[HorizontalThumb]"),
            ScrollAxis::Y => ("[VerticalTrack]", "[VerticalThumb]"),
        };
        let track = arena.create(track_name, Graphic::image(style.resolved_track_color()));
        let thumb = arena.create(thumb_name, Graphic::image(style.resolved_thumb_color()));
        arena.set_parent(track, parent)?;
        arena.set_parent(thumb, track)?;
        for key in [track, thumb] {
            let node = arena.node_mut(key)?;
            node.set_top_left_frame(Rect::default());
            node.set_active(false);
        }

        Ok(Self {
            axis,
            style,
            visibility: ScrollbarVisibility::AutoHide,
            visible: false,
            geometry: None,
            track,
            thumb,
            drag: None,
        })
    }

    pub fn axis(&self) -> ScrollAxis {
        self.axis
    }

    pub fn style(&self) -> &ScrollbarStyle {
        &self.style
    }

    pub fn visibility(&self) -> ScrollbarVisibility {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn geometry(&self) -> Option<ScrollbarGeometry> {
        self.geometry
    }

    pub fn track(&self) -> NodeKey {
        self.track
    }

    pub fn thumb(&self) -> NodeKey {
        self.thumb
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Takes effect on the next [`update`](Self::update).
    pub fn apply_style(&mut self, style: &ScrollbarStyle, visibility: ScrollbarVisibility) {
        self.style = *style;
        self.visibility = visibility;
    }

    /// Recomputes visibility and geometry from the viewport and pushes them
    /// to the drawables. Returns whether anything changed.
    pub fn update(&mut self, arena: &mut DrawableArena, viewport: &ScrollViewport) -> bool {
        let visible = scrollbar_visible(
            viewport.direction(),
            self.visibility,
            self.axis,
            viewport.overflows(self.axis),
        );
        let track = track_rect(self.axis, &self.style, viewport.client_size());
        let thumb = thumb_rect(self.axis, &self.style, track, viewport);
        let geometry = ScrollbarGeometry { track, thumb };

        let mut changed = false;
        if visible != self.visible {
            tracing::debug!(axis = ?self.axis, visible, "scrollbar visibility changed");
            self.visible = visible;
            changed = true;
        }
        if !visible {
            self.drag = None;
        }
        if self.geometry != Some(geometry) {
            self.geometry = Some(geometry);
            changed = true;
        }

        let track_color = self.style.resolved_track_color();
        let thumb_color = self.style.resolved_thumb_color();
        changed |= sync_node(arena, self.track, visible, geometry.track, track_color);
        changed |= sync_node(arena, self.thumb, visible, geometry.thumb, thumb_color);
        changed
    }

    /// Starts a thumb drag if `pointer` (viewport coordinates, y-down) lands
    /// on the visible thumb.
    pub fn begin_thumb_drag(&mut self, pointer: Vec2, viewport: &ScrollViewport) -> bool {
        let Some(geometry) = self.geometry.filter(|_| self.visible) else {
            return false;
        };
        if !geometry.thumb_in_viewport().contains(pointer) {
            return false;
        }
        self.drag = Some(ThumbDrag {
            pointer_start: self.axis.pick(pointer.x, pointer.y),
            offset_start: self.axis.pick(viewport.scroll_left(), viewport.scroll_top()),
        });
        true
    }

    /// Maps pointer travel along the track to content travel and jumps the
    /// viewport there without animation. The thumb cannot be dragged past
    /// either end of the track, so the offset stays within `0..=range` in
    /// every movement mode.
    pub fn drag_thumb(&mut self, pointer: Vec2, viewport: &mut ScrollViewport) -> bool {
        let (Some(drag), Some(geometry)) = (self.drag, self.geometry) else {
            return false;
        };
        let run = self.axis.pick(geometry.track.width, geometry.track.height);
        let length = self.axis.pick(geometry.thumb.width, geometry.thumb.height);
        let travel = run - length;
        if travel <= 0.0 {
            return false;
        }
        let range = self.axis.pick(viewport.max_offset().x, viewport.max_offset().y);
        let start = if range > 0.0 {
            (drag.offset_start / range).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let delta = self.axis.pick(pointer.x, pointer.y) - drag.pointer_start;
        let progress = (start + delta / travel).clamp(0.0, 1.0);
        viewport.scroll_axis_to(self.axis, progress * range, Some(0.0));
        true
    }

    pub fn end_thumb_drag(&mut self) {
        self.drag = None;
    }

    pub fn destroy(self, arena: &mut DrawableArena) {
        arena.remove_subtree(self.track);
    }
}

fn sync_node(arena: &mut DrawableArena, key: NodeKey, active: bool, frame: Rect, color: Color) -> bool {
    let Some(node) = arena.get_mut(key) else {
        tracing::warn!(?key, "scrollbar drawable is gone; skipping update");
        return false;
    };
    let before = node.dirty();
    node.set_active(active);
    node.set_top_left_frame(frame);
    let recolored = paint_fill(node, color);
    recolored || node.dirty() != before
}

fn paint_fill(node: &mut RectNode, color: Color) -> bool {
    let Graphic::Image(image) = node.graphic_mut() else {
        return false;
    };
    if image.color == color {
        return false;
    }
    image.color = color;
    node.set_material_dirty();
    true
}
