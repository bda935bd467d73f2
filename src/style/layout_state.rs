use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    #[default]
    Ltr,
    Rtl,
}

impl FromStr for LayoutDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ltr" => Ok(Self::Ltr),
            "rtl" => Ok(Self::Rtl),
            other => Err(Error::unknown_keyword("direction", other)),
        }
    }
}

/// Border widths exactly as the layout engine hands them over: every field is
/// optional, `None` (or a non-finite value) meaning "unset".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BorderLayout {
    pub width: Option<f32>,
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
    pub left: Option<f32>,
    pub start: Option<f32>,
    pub end: Option<f32>,
}

impl BorderLayout {
    pub fn uniform(width: f32) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutState {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub content_width: f32,
    pub content_height: f32,
    pub direction: LayoutDirection,
    pub border: BorderLayout,
}

impl LayoutState {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            content_width: width,
            content_height: height,
            direction: LayoutDirection::Ltr,
            border: BorderLayout::default(),
        }
    }

    pub fn with_content(mut self, content_width: f32, content_height: f32) -> Self {
        self.content_width = content_width;
        self.content_height = content_height;
        self
    }

    pub fn with_border(mut self, border: BorderLayout) -> Self {
        self.border = border;
        self
    }

    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_keywords_parse() {
        assert_eq!("LTR".parse::<LayoutDirection>(), Ok(LayoutDirection::Ltr));
        assert_eq!(" rtl ".parse::<LayoutDirection>(), Ok(LayoutDirection::Rtl));
        assert!("sideways".parse::<LayoutDirection>().is_err());
    }

    #[test]
    fn content_defaults_to_box_size() {
        let layout = LayoutState::new(0.0, 0.0, 200.0, 120.0);
        assert_eq!(layout.content_width, 200.0);
        assert_eq!(layout.content_height, 120.0);
        let layout = layout.with_content(400.0, 420.0);
        assert_eq!((layout.content_width, layout.content_height), (400.0, 420.0));
    }
}
