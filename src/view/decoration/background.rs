use crate::style::{BackgroundImage, Color};
use crate::view::node::ImageGraphic;

/// Fill tint for a background. An explicit color always wins; an image on
/// its own is drawn untinted (white); with neither the fill is transparent.
pub fn resolve_background_fill(color: Option<Color>, image: Option<&BackgroundImage>) -> Color {
    match (color, image) {
        (Some(color), _) => color,
        (None, Some(_)) => Color::WHITE,
        (None, None) => Color::TRANSPARENT,
    }
}

/// Returns whether the graphic changed.
pub fn paint_background(
    graphic: &mut ImageGraphic,
    color: Option<Color>,
    image: Option<&BackgroundImage>,
) -> bool {
    let fill = resolve_background_fill(color, image);
    if graphic.color == fill && graphic.image.as_ref() == image {
        return false;
    }
    graphic.color = fill;
    graphic.image = image.cloned();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_defaults() {
        let image = BackgroundImage::solid(1, 1, Color::rgb(10, 20, 30));
        assert_eq!(resolve_background_fill(None, Some(&image)), Color::WHITE);
        assert_eq!(resolve_background_fill(None, None), Color::TRANSPARENT);
        assert_eq!(
            resolve_background_fill(Some(Color::rgb(255, 0, 0)), Some(&image)),
            Color::rgb(255, 0, 0)
        );
        assert_eq!(
            resolve_background_fill(Some(Color::rgb(0, 0, 255)), None),
            Color::rgb(0, 0, 255)
        );
    }

    #[test]
    fn unchanged_paint_is_reported() {
        let mut graphic = ImageGraphic {
            color: Color::TRANSPARENT,
            image: None,
        };
        assert!(!paint_background(&mut graphic, None, None));
        let image = BackgroundImage::solid(2, 2, Color::BLACK);
        assert!(paint_background(&mut graphic, None, Some(&image)));
        assert_eq!(graphic.color, Color::WHITE);
        assert_eq!(graphic.image.as_ref(), Some(&image));
        assert!(!paint_background(&mut graphic, None, Some(&image)));
    }
}
