//! Border, background and drop shadow drawables for one element.
//!
//! The hierarchy built under the owner node is:
//!
//! ```text
//! owner
//! └── [MaskRoot]          rounded clip, inset by the border widths
//!     ├── [Shadows]       stretched back out to the border box
//!     │   └── [Shadow]
//!     ├── [BackgroundImage]
//!     └── [BorderImage]
//! ```
//!
//! The mask root is moved to the front of the owner's children so content
//! added later draws above the decoration.

mod background;
mod border;
mod radius;
mod shadow;

pub use background::*;
pub use border::*;
pub use radius::*;
pub use shadow::*;

use glam::Vec2;

use crate::error::Result;
use crate::style::{BackgroundImage, BoxShadow, BoxStyle, Color, CornerRadii, EdgeInsets, LayoutState};
use crate::view::node::{DrawableArena, Graphic, NodeKey, RectNode};

#[derive(Debug)]
pub struct BoxDecorationTree {
    owner: NodeKey,
    root: NodeKey,
    border: NodeKey,
    background: NodeKey,
    shadow_root: NodeKey,
    shadow: NodeKey,
    border_widths: Option<EdgeInsets<f32>>,
    applied_style: Option<BoxStyle>,
}

impl BoxDecorationTree {
    pub fn create(arena: &mut DrawableArena, owner: NodeKey) -> Result<Self> {
        arena.node(owner)?;

        let root = arena.create("[MaskRoot]", Graphic::rounded_mask());
        let border = arena.create("[BorderImage]", Graphic::border());
        let background = arena.create("[BackgroundImage]", Graphic::image(Color::TRANSPARENT));
        let shadow_root = arena.create("[Shadows]", Graphic::None);
        let shadow = arena.create("[Shadow]", Graphic::shadow());

        if let Graphic::RoundedMask(mask) = arena.node_mut(root)?.graphic_mut() {
            mask.show_mask_graphic = false;
        }
        arena.node_mut(shadow)?.set_active(false);

        arena.attach_full_stretch(shadow_root, root)?;
        arena.attach_full_stretch(shadow, shadow_root)?;
        arena.attach_full_stretch(background, root)?;
        arena.attach_full_stretch(border, root)?;
        arena.attach_full_stretch(root, owner)?;
        arena.set_as_first_sibling(root)?;

        tracing::debug!(?owner, ?root, "created box decoration tree");

        Ok(Self {
            owner,
            root,
            border,
            background,
            shadow_root,
            shadow,
            border_widths: None,
            applied_style: None,
        })
    }

    pub fn owner(&self) -> NodeKey {
        self.owner
    }

    /// The clip-mask root; element content hangs below this.
    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn border(&self) -> NodeKey {
        self.border
    }

    pub fn background(&self) -> NodeKey {
        self.background
    }

    pub fn shadow_root(&self) -> NodeKey {
        self.shadow_root
    }

    pub fn shadow(&self) -> NodeKey {
        self.shadow
    }

    pub fn border_widths(&self) -> EdgeInsets<f32> {
        self.border_widths.unwrap_or(EdgeInsets::ZERO)
    }

    /// Resolves the four border widths from layout and re-insets the
    /// drawables: the mask root shrinks to the padding box, its children grow
    /// back out to the border box. Unchanged widths leave the drawables
    /// untouched.
    pub fn apply_border_metrics(
        &mut self,
        arena: &mut DrawableArena,
        layout: &LayoutState,
    ) -> EdgeInsets<f32> {
        let widths = resolve_border_widths(&layout.border, layout.direction);
        if self.border_widths == Some(widths) {
            return widths;
        }
        self.border_widths = Some(widths);

        let min = Vec2::new(-widths.left, -widths.bottom);
        let max = Vec2::new(widths.right, widths.top);

        with_node(arena, self.root, |node| {
            node.set_offset_min(-min);
            node.set_offset_max(-max);
        });
        for key in [self.border, self.background, self.shadow_root] {
            with_node(arena, key, |node| {
                node.set_offset_min(min);
                node.set_offset_max(max);
            });
        }

        with_node(arena, self.border, |node| {
            let enabled = widths.any_positive();
            if let Graphic::Border(border) = node.graphic_mut() {
                border.enabled = enabled;
                border.border_size = widths.to_vec4();
            }
            node.set_active(enabled);
            node.set_material_dirty();
        });

        widths
    }

    pub fn apply_radius(&mut self, arena: &mut DrawableArena, radii: CornerRadii<f32>) {
        for key in [self.root, self.border, self.shadow] {
            with_node(arena, key, |node| {
                apply_radius(node, radii);
            });
        }
    }

    pub fn apply_border_color(&mut self, arena: &mut DrawableArena, colors: EdgeInsets<Color>) {
        with_node(arena, self.border, |node| {
            if let Graphic::Border(border) = node.graphic_mut() {
                border.colors = colors;
            }
            node.set_material_dirty();
        });
    }

    pub fn apply_background(
        &mut self,
        arena: &mut DrawableArena,
        color: Option<Color>,
        image: Option<&BackgroundImage>,
    ) {
        with_node(arena, self.background, |node| {
            let changed = match node.graphic_mut() {
                Graphic::Image(graphic) => paint_background(graphic, color, image),
                _ => false,
            };
            if changed {
                node.set_material_dirty();
            }
        });
    }

    pub fn apply_box_shadow(&mut self, arena: &mut DrawableArena, shadow: Option<&BoxShadow>) {
        let layout = compose_shadow(shadow);
        with_node(arena, self.shadow, |node| {
            node.set_active(layout.active);
            if !layout.active {
                return;
            }
            node.set_size_delta(layout.size_delta);
            node.set_anchored_position(layout.anchored_position);
            if let Graphic::Shadow(graphic) = node.graphic_mut() {
                graphic.shadow = shadow.copied();
                graphic.color = layout.color;
            }
            node.set_material_dirty();
        });
    }

    /// Applies the decoration-facing style, skipping every part that is
    /// unchanged since the previous call.
    pub fn apply_style(&mut self, arena: &mut DrawableArena, style: &BoxStyle) {
        let previous = self.applied_style.take();
        let changed = |f: fn(&BoxStyle, &BoxStyle) -> bool| {
            previous.as_ref().is_none_or(|previous| !f(previous, style))
        };

        if changed(|a, b| a.border_radii == b.border_radii) {
            self.apply_radius(arena, style.border_radii);
        }
        if changed(|a, b| a.border_colors == b.border_colors) {
            self.apply_border_color(arena, style.border_colors);
        }
        if changed(|a, b| {
            a.background_color == b.background_color && a.background_image == b.background_image
        }) {
            self.apply_background(
                arena,
                style.background_color,
                style.background_image.as_ref(),
            );
        }
        if changed(|a, b| a.box_shadow == b.box_shadow) {
            self.apply_box_shadow(arena, style.box_shadow.as_ref());
        }

        self.applied_style = Some(style.clone());
    }

    /// Whether any decoration drawable still waits for the paint step.
    pub fn needs_repaint(&self, arena: &DrawableArena) -> bool {
        [
            self.root,
            self.border,
            self.background,
            self.shadow_root,
            self.shadow,
        ]
        .into_iter()
        .filter_map(|key| arena.get(key))
        .any(|node| !node.dirty().is_empty())
    }

    /// Removes every decoration drawable. The owner node is left alone.
    pub fn destroy(self, arena: &mut DrawableArena) {
        arena.remove_subtree(self.root);
    }
}

fn with_node(arena: &mut DrawableArena, key: NodeKey, f: impl FnOnce(&mut RectNode)) {
    match arena.get_mut(key) {
        Some(node) => f(node),
        None => tracing::warn!(?key, "decoration drawable is gone; skipping update"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{BorderLayout, LayoutDirection};
    use crate::view::node::{DirtyFlags, Rect};
    use glam::Vec4;

    fn setup() -> (DrawableArena, BoxDecorationTree) {
        let mut arena = DrawableArena::new();
        let owner = arena.create("element", Graphic::None);
        let tree = BoxDecorationTree::create(&mut arena, owner).expect("owner exists");
        (arena, tree)
    }

    fn graphic(arena: &DrawableArena, key: NodeKey) -> &Graphic {
        arena.get(key).expect("node exists").graphic()
    }

    #[test]
    fn create_builds_hierarchy_with_mask_first() {
        let mut arena = DrawableArena::new();
        let owner = arena.create("element", Graphic::None);
        let content = arena.create("content", Graphic::None);
        arena.set_parent(content, owner).expect("content");

        let tree = BoxDecorationTree::create(&mut arena, owner).expect("owner exists");

        assert_eq!(arena.get(owner).expect("owner").children(), &[tree.root(), content]);
        assert_eq!(
            arena.get(tree.root()).expect("root").children(),
            &[tree.shadow_root(), tree.background(), tree.border()]
        );
        assert_eq!(
            arena.get(tree.shadow_root()).expect("shadow root").children(),
            &[tree.shadow()]
        );
        let Graphic::RoundedMask(mask) = graphic(&arena, tree.root()) else {
            panic!("mask root carries the mask graphic");
        };
        assert!(!mask.show_mask_graphic);
        assert!(!arena.get(tree.shadow()).expect("shadow").is_active());
    }

    #[test]
    fn create_rejects_stale_owner() {
        let mut arena = DrawableArena::new();
        let owner = arena.create("element", Graphic::None);
        arena.remove_subtree(owner);
        assert_eq!(
            BoxDecorationTree::create(&mut arena, owner).err(),
            Some(crate::Error::StaleNode(owner))
        );
    }

    #[test]
    fn border_metrics_inset_mask_and_outset_children() {
        let (mut arena, mut tree) = setup();
        let layout = LayoutState::new(0.0, 0.0, 100.0, 60.0).with_border(BorderLayout {
            width: Some(2.0),
            left: Some(4.0),
            start: Some(6.0),
            ..BorderLayout::default()
        });

        let widths = tree.apply_border_metrics(&mut arena, &layout);
        assert_eq!(widths, EdgeInsets::new(2.0, 2.0, 2.0, 6.0));

        let outer = Rect::new(0.0, 0.0, 100.0, 60.0);
        let mask = arena.resolve_rect(tree.root(), outer).expect("mask");
        assert_eq!(mask, Rect::new(6.0, 2.0, 92.0, 56.0));
        for key in [tree.border(), tree.background(), tree.shadow_root()] {
            assert_eq!(arena.resolve_rect(key, outer).expect("child"), outer);
        }

        let Graphic::Border(border) = graphic(&arena, tree.border()) else {
            panic!("border graphic expected");
        };
        assert!(border.enabled);
        assert_eq!(border.border_size, Vec4::new(2.0, 2.0, 2.0, 6.0));
    }

    #[test]
    fn zero_border_disables_border_drawable() {
        let (mut arena, mut tree) = setup();
        let layout = LayoutState::new(0.0, 0.0, 10.0, 10.0)
            .with_direction(LayoutDirection::Rtl);
        tree.apply_border_metrics(&mut arena, &layout);
        let node = arena.get(tree.border()).expect("border");
        assert!(!node.is_active());
        let Graphic::Border(border) = node.graphic() else {
            panic!("border graphic expected");
        };
        assert!(!border.enabled);
    }

    #[test]
    fn radius_is_shared_by_mask_border_and_shadow() {
        let (mut arena, mut tree) = setup();
        arena.take_dirty();
        tree.apply_radius(&mut arena, CornerRadii::new(1.0, 2.0, 3.0, 4.0));

        let expected = Vec4::new(1.0, 2.0, 3.0, 4.0);
        match (
            graphic(&arena, tree.root()),
            graphic(&arena, tree.border()),
            graphic(&arena, tree.shadow()),
        ) {
            (Graphic::RoundedMask(mask), Graphic::Border(border), Graphic::Shadow(shadow)) => {
                assert_eq!(mask.border_radius, expected);
                assert_eq!(border.border_radius, expected);
                assert_eq!(shadow.border_radius, expected);
                assert_eq!(mask.stencil_revision, 1);
            }
            other => panic!("unexpected graphics: {other:?}"),
        }
        let dirty = arena.take_dirty();
        assert!(dirty.contains(&(tree.root(), DirtyFlags::MATERIAL | DirtyFlags::STENCIL)));
        assert!(dirty.contains(&(tree.border(), DirtyFlags::MATERIAL)));
    }

    #[test]
    fn border_colors_land_on_border_graphic() {
        let (mut arena, mut tree) = setup();
        let colors = EdgeInsets::new(
            Color::rgb(255, 0, 0),
            Color::rgb(0, 255, 0),
            Color::rgb(0, 0, 255),
            Color::WHITE,
        );
        tree.apply_border_color(&mut arena, colors);
        let Graphic::Border(border) = graphic(&arena, tree.border()) else {
            panic!("border graphic expected");
        };
        assert_eq!(border.colors, colors);
    }

    #[test]
    fn background_image_without_color_is_white() {
        let (mut arena, mut tree) = setup();
        let image = BackgroundImage::solid(4, 4, Color::rgb(9, 9, 9));
        tree.apply_background(&mut arena, None, Some(&image));
        let Graphic::Image(bg) = graphic(&arena, tree.background()) else {
            panic!("image graphic expected");
        };
        assert_eq!(bg.color, Color::WHITE);
        assert_eq!(bg.image.as_ref(), Some(&image));

        tree.apply_background(&mut arena, None, None);
        let Graphic::Image(bg) = graphic(&arena, tree.background()) else {
            panic!("image graphic expected");
        };
        assert_eq!(bg.color, Color::TRANSPARENT);
        assert!(bg.image.is_none());
    }

    #[test]
    fn shadow_toggles_and_sizes() {
        let (mut arena, mut tree) = setup();
        let shadow = BoxShadow::new()
            .spread(2.0)
            .blur(6.0)
            .offset(3.0, 5.0)
            .color(Color::rgba(0, 0, 0, 128));
        tree.apply_box_shadow(&mut arena, Some(&shadow));

        let node = arena.get(tree.shadow()).expect("shadow");
        assert!(node.is_active());
        assert_eq!(node.size_delta, Vec2::splat(16.0));
        assert_eq!(node.anchored_position, Vec2::new(3.0, -5.0));
        let rect = arena
            .resolve_rect(tree.shadow(), Rect::new(0.0, 0.0, 50.0, 50.0))
            .expect("rect");
        assert_eq!(rect.size(), Vec2::new(66.0, 66.0));
        assert_eq!(rect.center(), Vec2::new(28.0, 20.0));

        tree.apply_box_shadow(&mut arena, None);
        assert!(!arena.get(tree.shadow()).expect("shadow").is_active());
    }

    #[test]
    fn apply_style_only_touches_changed_sections() {
        let (mut arena, mut tree) = setup();
        let style = BoxStyle::new()
            .border_radius(4.0)
            .background_color(Color::rgb(1, 2, 3));
        tree.apply_style(&mut arena, &style);
        arena.take_dirty();

        tree.apply_style(&mut arena, &style);
        assert!(arena.take_dirty().is_empty());
        assert!(!tree.needs_repaint(&arena));

        tree.apply_style(&mut arena, &style.clone().border_radius(8.0));
        let dirty: Vec<NodeKey> = arena.take_dirty().into_iter().map(|(key, _)| key).collect();
        assert!(dirty.contains(&tree.root()));
        assert!(!dirty.contains(&tree.background()));
    }

    #[test]
    fn destroy_removes_all_five_nodes() {
        let (mut arena, tree) = setup();
        let owner = tree.owner();
        assert_eq!(arena.len(), 6);
        tree.destroy(&mut arena);
        assert_eq!(arena.len(), 1);
        assert!(arena.get(owner).expect("owner").children().is_empty());
    }
}
