use std::str::FromStr;

use crate::error::Error;
use crate::style::color::Color;
use crate::style::computed_style::EdgeInsets;
use crate::transition::ScrollAxis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    None,
    Vertical,
    Horizontal,
    #[default]
    Both,
}

impl ScrollDirection {
    pub const fn allows(self, axis: ScrollAxis) -> bool {
        match (self, axis) {
            (Self::Both, _) => true,
            (Self::Horizontal, ScrollAxis::X) => true,
            (Self::Vertical, ScrollAxis::Y) => true,
            _ => false,
        }
    }
}

impl FromStr for ScrollDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "vertical" => Ok(Self::Vertical),
            "horizontal" => Ok(Self::Horizontal),
            "both" => Ok(Self::Both),
            other => Err(Error::unknown_keyword("direction", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollbarVisibility {
    /// Shown only while the axis overflows.
    #[default]
    AutoHide,
    /// Shown whenever the axis is scrollable, overflowing or not.
    Permanent,
}

/// Per-axis "always show scrollbar" directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlwaysShow {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl AlwaysShow {
    pub const fn visibility(self, axis: ScrollAxis) -> ScrollbarVisibility {
        match (self, axis) {
            (Self::Both, _) | (Self::Horizontal, ScrollAxis::X) | (Self::Vertical, ScrollAxis::Y) => {
                ScrollbarVisibility::Permanent
            }
            _ => ScrollbarVisibility::AutoHide,
        }
    }
}

impl FromStr for AlwaysShow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            "both" => Ok(Self::Both),
            other => Err(Error::unknown_keyword("always-show", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollbarStyle {
    pub thickness: f32,
    pub insets: EdgeInsets<f32>,
    pub track_color: Option<Color>,
    pub thumb_color: Option<Color>,
    pub min_thumb_length: f32,
}

impl ScrollbarStyle {
    pub const DEFAULT_THICKNESS: f32 = 6.0;
    pub const DEFAULT_MIN_THUMB: f32 = 24.0;
    pub const DEFAULT_THUMB_COLOR: Color = Color::rgba(128, 128, 128, 160);

    pub const fn new() -> Self {
        Self {
            thickness: Self::DEFAULT_THICKNESS,
            insets: EdgeInsets::uniform(0.0),
            track_color: None,
            thumb_color: None,
            min_thumb_length: Self::DEFAULT_MIN_THUMB,
        }
    }

    pub const fn thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    pub const fn insets(mut self, insets: EdgeInsets<f32>) -> Self {
        self.insets = insets;
        self
    }

    pub const fn track_color(mut self, color: Color) -> Self {
        self.track_color = Some(color);
        self
    }

    pub const fn thumb_color(mut self, color: Color) -> Self {
        self.thumb_color = Some(color);
        self
    }

    pub const fn min_thumb_length(mut self, length: f32) -> Self {
        self.min_thumb_length = length;
        self
    }

    pub fn resolved_track_color(&self) -> Color {
        self.track_color.unwrap_or(Color::TRANSPARENT)
    }

    pub fn resolved_thumb_color(&self) -> Color {
        self.thumb_color.unwrap_or(Self::DEFAULT_THUMB_COLOR)
    }
}

impl Default for ScrollbarStyle {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollStyle {
    pub direction: ScrollDirection,
    pub always_show: AlwaysShow,
    pub sensitivity: f32,
    /// 0 keeps scrolling hard-clamped; anything above lets it overshoot and
    /// spring back with this smoothing time.
    pub elasticity: f32,
    /// Seconds taken by an animated scroll; 0 jumps immediately.
    pub smoothness: f32,
    pub horizontal_scrollbar: ScrollbarStyle,
    pub vertical_scrollbar: ScrollbarStyle,
}

impl ScrollStyle {
    pub const DEFAULT_SENSITIVITY: f32 = 50.0;
    pub const DEFAULT_SMOOTHNESS: f32 = 0.12;

    pub const fn new() -> Self {
        Self {
            direction: ScrollDirection::Both,
            always_show: AlwaysShow::None,
            sensitivity: Self::DEFAULT_SENSITIVITY,
            elasticity: 0.0,
            smoothness: Self::DEFAULT_SMOOTHNESS,
            horizontal_scrollbar: ScrollbarStyle::new(),
            vertical_scrollbar: ScrollbarStyle::new(),
        }
    }

    pub const fn direction(mut self, direction: ScrollDirection) -> Self {
        self.direction = direction;
        self
    }

    pub const fn always_show(mut self, always_show: AlwaysShow) -> Self {
        self.always_show = always_show;
        self
    }

    pub const fn sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub const fn elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = elasticity;
        self
    }

    pub const fn smoothness(mut self, smoothness: f32) -> Self {
        self.smoothness = smoothness;
        self
    }

    pub const fn scrollbar(mut self, style: ScrollbarStyle) -> Self {
        self.horizontal_scrollbar = style;
        self.vertical_scrollbar = style;
        self
    }

    pub const fn horizontal_scrollbar(mut self, style: ScrollbarStyle) -> Self {
        self.horizontal_scrollbar = style;
        self
    }

    pub const fn vertical_scrollbar(mut self, style: ScrollbarStyle) -> Self {
        self.vertical_scrollbar = style;
        self
    }

    pub const fn scrollbar_style(&self, axis: ScrollAxis) -> &ScrollbarStyle {
        match axis {
            ScrollAxis::X => &self.horizontal_scrollbar,
            ScrollAxis::Y => &self.vertical_scrollbar,
        }
    }
}

impl Default for ScrollStyle {
    fn default() -> Self {
        Self::new()
    }
}
