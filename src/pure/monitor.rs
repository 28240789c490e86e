//! A physical output region as reported by RandR at startup.
use crate::{pure::geometry::Rect, Xid};

/// One physical monitor: its rectangle in root window coordinates, the bar
/// window rendered along its top edge and the index of the workspace it is
/// currently displaying.
///
/// Monitors are discovered once at startup and never re-queried: hot
/// plugging outputs is explicitly unsupported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monitor {
    /// The position and extent of this monitor.
    pub r: Rect,
    /// The bar window owned by this monitor.
    pub bar: Xid,
    /// Index into the workspace table of the workspace shown on this monitor.
    pub active_ws: usize,
    /// Whether this is the primary output (the first one discovered).
    pub primary: bool,
}

impl Monitor {
    /// Create a new monitor displaying workspace 0.
    pub fn new(r: Rect, bar: Xid, primary: bool) -> Self {
        Self {
            r,
            bar,
            active_ws: 0,
            primary,
        }
    }
}
