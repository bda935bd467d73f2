use crate::style::{BorderLayout, EdgeInsets, LayoutDirection, defined};

/// Maps logical start/end widths to physical `(left, right)`.
pub fn resolve_edge(
    direction: LayoutDirection,
    start: Option<f32>,
    end: Option<f32>,
) -> (Option<f32>, Option<f32>) {
    match direction {
        LayoutDirection::Ltr => (start, end),
        LayoutDirection::Rtl => (end, start),
    }
}

/// First finite candidate, floored at zero; zero when every candidate is
/// unset.
pub fn first_defined_width(candidates: &[Option<f32>]) -> f32 {
    candidates
        .iter()
        .find_map(|candidate| defined(*candidate))
        .map_or(0.0, |width| width.max(0.0))
}

/// Per-edge border widths. Left and right prefer the bidi value, then the
/// physical side, then the uniform width; top and bottom skip the bidi step.
pub fn resolve_border_widths(border: &BorderLayout, direction: LayoutDirection) -> EdgeInsets<f32> {
    let (bidi_left, bidi_right) = resolve_edge(direction, border.start, border.end);

    let widths = EdgeInsets {
        top: first_defined_width(&[border.top, border.width]),
        right: first_defined_width(&[bidi_right, border.right, border.width]),
        bottom: first_defined_width(&[border.bottom, border.width]),
        left: first_defined_width(&[bidi_left, border.left, border.width]),
    };
    tracing::trace!(?direction, ?widths, "resolved border widths");
    widths
}
