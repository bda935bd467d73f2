use std::fmt;
use std::sync::Arc;

use glam::{Vec2, Vec4};
use image::RgbaImage;

use crate::style::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Copy> EdgeInsets<T> {
    pub const fn new(top: T, right: T, bottom: T, left: T) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(value: T) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> EdgeInsets<U> {
        EdgeInsets {
            top: f(self.top),
            right: f(self.right),
            bottom: f(self.bottom),
            left: f(self.left),
        }
    }
}

impl EdgeInsets<f32> {
    pub const ZERO: Self = Self::uniform(0.0);

    pub fn any_positive(&self) -> bool {
        self.top > 0.0 || self.right > 0.0 || self.bottom > 0.0 || self.left > 0.0
    }

    /// Packed as `(top, right, bottom, left)` for the border material.
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.top, self.right, self.bottom, self.left)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadii<T> {
    pub top_left: T,
    pub top_right: T,
    pub bottom_right: T,
    pub bottom_left: T,
}

impl<T: Copy> CornerRadii<T> {
    pub const fn new(top_left: T, top_right: T, bottom_right: T, bottom_left: T) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    pub const fn uniform(value: T) -> Self {
        Self::new(value, value, value, value)
    }
}

impl CornerRadii<f32> {
    pub const ZERO: Self = Self::uniform(0.0);

    /// Packed as `(tl, tr, br, bl)`.
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxShadow {
    pub color: Color,
    pub offset_x: f32,
    pub offset_y: f32,
    pub blur: f32,
    pub spread: f32,
}

impl Default for BoxShadow {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxShadow {
    pub const fn new() -> Self {
        Self {
            color: Color::rgb(0, 0, 0),
            offset_x: 0.0,
            offset_y: 0.0,
            blur: 0.0,
            spread: 0.0,
        }
    }

    pub const fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub const fn offset(mut self, x: f32, y: f32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    pub const fn blur(mut self, value: f32) -> Self {
        self.blur = if value < 0.0 { 0.0 } else { value };
        self
    }

    pub const fn spread(mut self, value: f32) -> Self {
        self.spread = if value < 0.0 { 0.0 } else { value };
        self
    }

    pub fn offset_vec(&self) -> Vec2 {
        Vec2::new(self.offset_x, self.offset_y)
    }

    /// How far the halo reaches past the box on each side.
    pub fn extent(&self) -> f32 {
        self.spread.max(0.0) + self.blur.max(0.0)
    }
}

/// Shared, immutable image resource used as a background fill.
///
/// Equality is identity: two handles are equal only when they point at the
/// same decoded image.
#[derive(Clone)]
pub struct BackgroundImage(Arc<RgbaImage>);

impl BackgroundImage {
    pub fn new(image: RgbaImage) -> Self {
        Self(Arc::new(image))
    }

    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        Self::new(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba(color.to_rgba_u8()),
        ))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.0
    }
}

impl PartialEq for BackgroundImage {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BackgroundImage({}x{})", self.width(), self.height())
    }
}

/// The decoration-facing slice of a resolved style.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStyle {
    pub border_radii: CornerRadii<f32>,
    pub border_colors: EdgeInsets<Color>,
    pub background_color: Option<Color>,
    pub background_image: Option<BackgroundImage>,
    pub box_shadow: Option<BoxShadow>,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            border_radii: CornerRadii::ZERO,
            border_colors: EdgeInsets::uniform(Color::BLACK),
            background_color: None,
            background_image: None,
            box_shadow: None,
        }
    }
}

impl BoxStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn border_radius(mut self, radius: f32) -> Self {
        self.border_radii = CornerRadii::uniform(radius);
        self
    }

    pub fn border_radii(mut self, radii: CornerRadii<f32>) -> Self {
        self.border_radii = radii;
        self
    }

    pub fn border_color(mut self, color: Color) -> Self {
        self.border_colors = EdgeInsets::uniform(color);
        self
    }

    pub fn border_colors(mut self, colors: EdgeInsets<Color>) -> Self {
        self.border_colors = colors;
        self
    }

    pub fn background_color(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn background_image(mut self, image: BackgroundImage) -> Self {
        self.background_image = Some(image);
        self
    }

    pub fn box_shadow(mut self, shadow: BoxShadow) -> Self {
        self.box_shadow = Some(shadow);
        self
    }
}

/// Treats NaN and infinities as "unset".
pub fn defined(value: Option<f32>) -> Option<f32> {
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadow_builder_clamps_negative_blur_and_spread() {
        let shadow = BoxShadow::new().blur(-3.0).spread(-1.0).offset(2.0, 4.0);
        assert_eq!(shadow.blur, 0.0);
        assert_eq!(shadow.spread, 0.0);
        assert_eq!(shadow.offset_vec(), Vec2::new(2.0, 4.0));
        assert_eq!(BoxShadow::new().blur(3.0).spread(2.0).extent(), 5.0);
    }

    #[test]
    fn background_image_equality_is_identity() {
        let a = BackgroundImage::solid(2, 2, Color::WHITE);
        let b = BackgroundImage::solid(2, 2, Color::WHITE);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn defined_filters_non_finite() {
        assert_eq!(defined(Some(f32::NAN)), None);
        assert_eq!(defined(Some(f32::INFINITY)), None);
        assert_eq!(defined(Some(2.0)), Some(2.0));
        assert_eq!(defined(None), None);
    }
}
