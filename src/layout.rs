//! The master/stack tile geometry for one monitor.
use crate::{pure::geometry::Rect, Xid};

/// Pixel gap left around and between tiles.
pub const GAP: u32 = 10;
/// Height of the workspace indicator bar along the top of each monitor.
pub const BAR_HEIGHT: u32 = 20;
/// Fraction of the monitor width given to the master tile.
pub const MASTER_FRACTION: f32 = 0.55;

/// Compute the tile position for every client on the given monitor rect.
///
/// There are three cases:
///   1. no clients: nothing to position
///   2. a single client: it gets the whole monitor minus the bar and gaps
///   3. two or more: the master takes the left `MASTER_FRACTION` of the
///      width and the remaining clients split the right column evenly
///
/// All coordinates are monitor relative offsets from `m` so multi-head
/// setups tile correctly on non-origin monitors. Extents are not clamped:
/// on real monitor geometries every computed extent is positive.
pub fn tile(m: Rect, clients: &[Xid]) -> Vec<(Xid, Rect)> {
    let (left, top) = (m.x + GAP, m.y + BAR_HEIGHT + GAP);

    match clients {
        [] => vec![],
        [only] => vec![(
            *only,
            Rect::new(left, top, m.w - 3 * GAP, m.h - 3 * GAP - BAR_HEIGHT),
        )],
        [master, stack @ ..] => {
            let master_w = (MASTER_FRACTION * m.w as f32) as u32;
            let mut positions = vec![(
                *master,
                Rect::new(left, top, master_w, m.h - 2 * GAP - BAR_HEIGHT),
            )];

            let n = stack.len() as u32;
            let stack_x = m.x + master_w + 3 * GAP;
            let stack_w = m.w - master_w - 5 * GAP;
            let row_h = m.h / n;

            let mut y = top;
            for c in stack {
                positions.push((*c, Rect::new(stack_x, y, stack_w, row_h - 2 * GAP)));
                y += row_h;
            }

            positions
        }
    }
}
