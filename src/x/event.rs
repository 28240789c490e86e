//! Data types for working with X events
use crate::{bindings::KeyPress, Xid};

/// Wrapper around the low level X event types that the window manager needs
/// to react to.
///
/// Backends build these from raw wire events so that the core never sees X
/// structs directly; anything not represented here is dropped inside the
/// backend before it reaches the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XEvent {
    /// A grabbed key combination has been entered by the user
    KeyPress(KeyPress),

    /// A client window is requesting to be positioned and rendered on screen
    MapRequest(Xid),

    /// A client window has been destroyed
    Destroy(Xid),

    /// The mouse pointer has entered a client window
    Enter(Xid),

    /// A client is asking for a specific geometry / stacking position
    ConfigureRequest(ConfigureRequest),

    /// A window's configuration changed (ignored: outputs are not re-queried)
    ConfigureNotify(Xid),

    /// Part of a window was exposed and may need repainting
    Expose(ExposeEvent),
}

/// A verbatim ConfigureRequest from a client.
///
/// The request is honored exactly as received; tiling reasserts geometry on
/// the next relayout anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureRequest {
    /// The window asking to be configured
    pub id: Xid,
    /// Requested x position
    pub x: i32,
    /// Requested y position
    pub y: i32,
    /// Requested width
    pub w: u32,
    /// Requested height
    pub h: u32,
    /// Requested border width
    pub border_px: u32,
    /// Requested stacking sibling
    pub sibling: Xid,
    /// Requested stacking mode
    pub stack_mode: i32,
    /// Which of the fields the client actually set
    pub mask: u64,
}

/// An Expose event for some window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExposeEvent {
    /// The exposed window
    pub id: Xid,
    /// The number of Expose events still to follow for this window; bars are
    /// only repainted when this reaches zero
    pub count: usize,
}
