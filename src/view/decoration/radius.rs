use crate::style::CornerRadii;
use crate::view::node::{DirtyFlags, Graphic, RectNode};

/// Pushes one radius set onto a rounded drawable. The clip mask additionally
/// gets its stencil revision bumped, since rounding is a stencil test and not
/// a plain rectangle clip. Returns `false` for graphics that have no corners.
pub fn apply_radius(node: &mut RectNode, radii: CornerRadii<f32>) -> bool {
    let radius = radii.to_vec4();
    let flags = match node.graphic_mut() {
        Graphic::RoundedMask(mask) => {
            mask.border_radius = radius;
            mask.stencil_revision = mask.stencil_revision.wrapping_add(1);
            DirtyFlags::MATERIAL | DirtyFlags::STENCIL
        }
        Graphic::Border(border) => {
            border.border_radius = radius;
            DirtyFlags::MATERIAL
        }
        Graphic::Shadow(shadow) => {
            shadow.border_radius = radius;
            DirtyFlags::MATERIAL
        }
        Graphic::Image(_) | Graphic::None => return false,
    };
    node.mark_dirty(flags);
    true
}
