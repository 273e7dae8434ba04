use crate::{
    models::{Rect, Size},
    settings::OverlaySettings,
};

/// Which side of the overlay the pointer arrow sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowSide {
    /// Overlay above the anchor, arrow on its bottom edge pointing down.
    Bottom,
    /// Flipped below the anchor, arrow on its top edge pointing up.
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub arrow: ArrowSide,
}

/// Centers the overlay above `anchor`, clamped horizontally to the viewport
/// margin and flipped below the anchor when it would leave the top edge.
pub fn place_overlay(
    anchor: Rect,
    overlay_height: f64,
    viewport: Size,
    settings: &OverlaySettings,
) -> Placement {
    let margin = settings.margin;
    let width = settings.width;

    let mut left = anchor.center_x() - width / 2.0;
    if left < margin {
        left = margin;
    }
    if left + width > viewport.width - margin {
        left = viewport.width - width - margin;
    }

    let above = anchor.top - overlay_height - margin;
    let (top, arrow) = if above < margin {
        (anchor.bottom() + margin, ArrowSide::Top)
    } else {
        (above, ArrowSide::Bottom)
    };

    Placement {
        left,
        top,
        width,
        arrow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Size {
        Size::new(1024.0, 768.0)
    }

    #[test]
    fn centered_above_anchor() {
        let settings = OverlaySettings::default();
        let placed = place_overlay(Rect::new(500.0, 300.0, 40.0, 18.0), 80.0, viewport(), &settings);
        assert_eq!(placed.left, 520.0 - 140.0);
        assert_eq!(placed.top, 300.0 - 80.0 - 8.0);
        assert_eq!(placed.arrow, ArrowSide::Bottom);
    }

    #[test]
    fn clamped_to_left_margin() {
        let settings = OverlaySettings::default();
        let placed = place_overlay(Rect::new(2.0, 300.0, 30.0, 18.0), 80.0, viewport(), &settings);
        assert_eq!(placed.left, 8.0);
    }

    #[test]
    fn clamped_to_right_margin() {
        let settings = OverlaySettings::default();
        let placed = place_overlay(Rect::new(1000.0, 300.0, 20.0, 18.0), 80.0, viewport(), &settings);
        assert_eq!(placed.left, 1024.0 - 280.0 - 8.0);
    }

    #[test]
    fn flips_below_near_top_edge() {
        let settings = OverlaySettings::default();
        let anchor = Rect::new(500.0, 40.0, 40.0, 18.0);
        let placed = place_overlay(anchor, 80.0, viewport(), &settings);
        assert_eq!(placed.top, anchor.bottom() + 8.0);
        assert_eq!(placed.arrow, ArrowSide::Top);
    }
}
