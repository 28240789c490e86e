//! Logic for interacting with the X server
//!
//! The [`XConn`] trait is the boundary between the window manager core and
//! the display server: the core holds opaque [`Xid`] handles and asks the
//! connection to act on them. The live implementation is
//! [`crate::xlib::XlibConn`]; [`mock::MockXConn`] records every call for use
//! in tests.
use crate::{
    bindings::KeyPress,
    pure::geometry::Rect,
    x::event::{ConfigureRequest, XEvent},
    Color, Result, Xid,
};

pub mod event;
pub mod mock;

/// A handle on a running X connection that we can use for issuing requests.
///
/// All methods take `&self`: implementations are expected to manage any
/// interior mutability themselves (the Xlib backend is a pile of C pointers
/// anyway and the mock records through `RefCell`s).
pub trait XConn {
    /// The ID of the window manager root window.
    fn root(&self) -> Xid;

    /// The geometry of the root window, used as the synthetic monitor when
    /// the output query comes back empty.
    fn root_geometry(&self) -> Result<Rect>;

    /// The rectangle of each connected output with an active CRTC, in
    /// discovery order.
    fn screen_details(&self) -> Result<Vec<Rect>>;

    /// Create, map and return an override-redirect bar window filling `r`.
    fn create_bar(&self, r: Rect, bg: Color) -> Result<Xid>;

    /// Grab the given key specs on the root window.
    fn grab_keys(&self, keys: &[KeyPress]) -> Result<()>;

    /// Release every key grabbed on the root window.
    fn ungrab_keys(&self) -> Result<()>;

    /// Block and wait for the next event from the X server.
    fn next_event(&self) -> Result<XEvent>;

    /// Flush any pending requests to the X server.
    fn flush(&self);

    /// Map the given client window, making it visible.
    fn map(&self, id: Xid) -> Result<()>;

    /// Unmap the given client window, hiding it.
    fn unmap(&self, id: Xid) -> Result<()>;

    /// Raise the given client window to the top of the stacking order.
    fn raise(&self, id: Xid) -> Result<()>;

    /// Direct keyboard input focus to the given client window, reverting to
    /// its parent if the window later disappears.
    fn focus(&self, id: Xid) -> Result<()>;

    /// Move and resize a client window to the given rect.
    fn position(&self, id: Xid, r: Rect) -> Result<()>;

    /// Set the border width in pixels for a client window.
    fn set_border_width(&self, id: Xid, px: u32) -> Result<()>;

    /// Set the border color for a client window.
    fn set_border_color(&self, id: Xid, color: Color) -> Result<()>;

    /// Subscribe to EnterNotify events on a newly managed client so that
    /// focus can follow the mouse into it.
    fn watch_enter(&self, id: Xid) -> Result<()>;

    /// Apply a client's ConfigureRequest verbatim.
    fn configure(&self, req: &ConfigureRequest) -> Result<()>;

    /// Ask a client to close itself by sending WM_DELETE_WINDOW through
    /// WM_PROTOCOLS. Clients that ignore the message are not force killed.
    fn send_wm_delete(&self, id: Xid) -> Result<()>;

    /// The current top level children of the root window.
    fn root_children(&self) -> Result<Vec<Xid>>;

    /// The horizontal advance in pixels of the given text in the bar font.
    fn text_extent(&self, text: &str) -> Result<u32>;

    /// The ascent of the bar font, for baseline positioning.
    fn font_ascent(&self) -> u32;

    /// Fill a rectangle on the given bar window. Coordinates are relative
    /// to the bar window itself.
    fn fill_rect(&self, id: Xid, r: Rect, color: Color) -> Result<()>;

    /// Draw text on the given bar window with its baseline at `(x, y)`.
    fn draw_text(&self, id: Xid, x: u32, y: u32, color: Color, text: &str) -> Result<()>;
}
