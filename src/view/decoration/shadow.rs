use glam::Vec2;

use crate::style::{BoxShadow, Color};

/// Placement of the shadow drawable relative to its full-stretch parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowLayout {
    pub active: bool,
    /// Growth past the shadow root on each axis.
    pub size_delta: Vec2,
    pub anchored_position: Vec2,
    pub color: Color,
}

impl ShadowLayout {
    pub const HIDDEN: Self = Self {
        active: false,
        size_delta: Vec2::ZERO,
        anchored_position: Vec2::ZERO,
        color: Color::TRANSPARENT,
    };
}

/// Style offsets are y-down, drawables are y-up, hence the flipped `y`.
pub fn compose_shadow(shadow: Option<&BoxShadow>) -> ShadowLayout {
    let Some(shadow) = shadow else {
        return ShadowLayout::HIDDEN;
    };
    ShadowLayout {
        active: true,
        size_delta: Vec2::splat(shadow.extent() * 2.0),
        anchored_position: Vec2::new(shadow.offset_x, -shadow.offset_y),
        color: shadow.color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_twice_spread_plus_blur() {
        let shadow = BoxShadow::new().spread(3.0).blur(5.0).offset(4.0, 6.0);
        let layout = compose_shadow(Some(&shadow));
        assert!(layout.active);
        assert_eq!(layout.size_delta, Vec2::splat(16.0));
        assert_eq!(layout.anchored_position, Vec2::new(4.0, -6.0));
    }

    #[test]
    fn absent_shadow_is_hidden() {
        assert_eq!(compose_shadow(None), ShadowLayout::HIDDEN);
    }
}
