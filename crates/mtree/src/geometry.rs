use gpui::{Bounds, Pixels, Point, px};

/// Distance from a viewport edge within which a drag starts auto-scrolling.
pub const CLOSE_THRESHOLD: Pixels = px(50.);

/// Which edge of a hovered row a drop would land against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropEdge {
    /// Insert before the hovered row.
    Top,
    /// Insert after the hovered row.
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Point predicates over a row or viewport rectangle.
pub trait BoundsExt {
    fn is_point_in_upper_half(&self, point: Point<Pixels>) -> bool;
    fn is_point_in_lower_half(&self, point: Point<Pixels>) -> bool;
    fn is_point_close_to_top(&self, point: Point<Pixels>) -> bool;
    fn is_point_close_to_bottom(&self, point: Point<Pixels>) -> bool;

    fn drop_edge(&self, point: Point<Pixels>) -> DropEdge {
        if self.is_point_in_upper_half(point) {
            DropEdge::Top
        } else {
            DropEdge::Bottom
        }
    }
}

impl BoundsExt for Bounds<Pixels> {
    #[inline]
    fn is_point_in_upper_half(&self, point: Point<Pixels>) -> bool {
        point.y < self.center().y
    }

    #[inline]
    fn is_point_in_lower_half(&self, point: Point<Pixels>) -> bool {
        point.y >= self.center().y
    }

    #[inline]
    fn is_point_close_to_top(&self, point: Point<Pixels>) -> bool {
        point.y < self.top() + CLOSE_THRESHOLD
    }

    #[inline]
    fn is_point_close_to_bottom(&self, point: Point<Pixels>) -> bool {
        point.y > self.bottom() - CLOSE_THRESHOLD
    }
}

/// Compute the vertical scroll offset that brings `frame` into `viewport`, flush to the top edge
/// when scrolling up and to the bottom edge when scrolling down.
///
/// Offsets follow gpui's convention: `0` at the top of the content, growing negative as the
/// content scrolls down. The result is clamped to `[-max_offset_y, 0]`.
pub fn reveal_offset(
    offset_y: Pixels,
    max_offset_y: Pixels,
    viewport: Bounds<Pixels>,
    frame: Bounds<Pixels>,
    direction: ScrollDirection,
) -> Pixels {
    let next = match direction {
        ScrollDirection::Up => {
            let overshoot = viewport.top() - frame.top();
            if overshoot > px(0.) {
                offset_y + overshoot
            } else {
                offset_y
            }
        }
        ScrollDirection::Down => {
            let overshoot = frame.bottom() - viewport.bottom();
            if overshoot > px(0.) {
                offset_y - overshoot
            } else {
                offset_y
            }
        }
    };

    next.max(-max_offset_y.max(px(0.))).min(px(0.))
}
