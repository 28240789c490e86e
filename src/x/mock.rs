//! A recording mock implementation of [`XConn`] for driving the window
//! manager in tests without an X server.
use crate::{
    bindings::KeyPress,
    pure::geometry::Rect,
    x::{
        event::{ConfigureRequest, XEvent},
        XConn,
    },
    Color, Error, Result, Xid,
};
use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
};

/// Every side effecting call a [`MockXConn`] has been asked to perform, in
/// order. Tests assert on these to pin down the call sequences the manager
/// issues to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    /// A window was mapped
    Map(Xid),
    /// A window was unmapped
    Unmap(Xid),
    /// A window was raised
    Raise(Xid),
    /// Input focus was set
    Focus(Xid),
    /// A window was moved / resized
    Position(Xid, Rect),
    /// A border width was set
    BorderWidth(Xid, u32),
    /// A border color was set
    BorderColor(Xid, Color),
    /// EnterNotify was subscribed for a window
    WatchEnter(Xid),
    /// A ConfigureRequest was honored
    Configure(Xid),
    /// WM_DELETE_WINDOW was sent
    SendWmDelete(Xid),
    /// A bar window was created
    CreateBar(Rect),
    /// Key grabs were installed
    GrabKeys(usize),
    /// Key grabs were released
    UngrabKeys,
    /// A bar rectangle was filled
    FillRect(Xid, Rect, Color),
    /// Bar text was drawn
    DrawText(Xid, u32, u32, Color, String),
}

/// A scriptable, recording [`XConn`].
///
/// Events handed to [`MockXConn::new`] are replayed in order from
/// [`next_event`]; once they run dry the connection reports
/// [`Error::EventsExhausted`]. The mock keeps a root child set in sync with
/// the map request / destroy events it delivers so that the quit drain can
/// be exercised end to end.
///
/// Text metrics are deterministic fakes: every glyph is [`GLYPH_W`] wide and
/// the font ascent is [`ASCENT`].
///
/// [`next_event`]: XConn::next_event
#[derive(Debug, Default)]
pub struct MockXConn {
    screens: Vec<Rect>,
    events: RefCell<VecDeque<XEvent>>,
    calls: RefCell<Vec<Recorded>>,
    children: RefCell<Vec<Xid>>,
    next_bar_id: Cell<u32>,
}

/// The fixed per-glyph advance reported by the mock's text metrics.
pub const GLYPH_W: u32 = 7;
/// The fixed font ascent reported by the mock.
pub const ASCENT: u32 = 11;

const FIRST_BAR_ID: u32 = 9000;

impl MockXConn {
    /// Create a mock for the given screens that will replay `events`.
    pub fn new(screens: Vec<Rect>, events: Vec<XEvent>) -> Self {
        Self {
            screens,
            events: RefCell::new(events.into()),
            next_bar_id: Cell::new(FIRST_BAR_ID),
            ..Default::default()
        }
    }

    /// Everything this connection has been asked to do so far.
    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.borrow().clone()
    }

    /// Drain and return the recorded calls, leaving the log empty.
    pub fn take_calls(&self) -> Vec<Recorded> {
        self.calls.borrow_mut().drain(..).collect()
    }

    fn record(&self, call: Recorded) {
        self.calls.borrow_mut().push(call);
    }
}

impl XConn for MockXConn {
    fn root(&self) -> Xid {
        Xid(0)
    }

    fn root_geometry(&self) -> Result<Rect> {
        Ok(self
            .screens
            .first()
            .copied()
            .unwrap_or_else(|| Rect::new(0, 0, 1920, 1080)))
    }

    fn screen_details(&self) -> Result<Vec<Rect>> {
        Ok(self.screens.clone())
    }

    fn create_bar(&self, r: Rect, _bg: Color) -> Result<Xid> {
        self.record(Recorded::CreateBar(r));
        let id = self.next_bar_id.get();
        self.next_bar_id.set(id + 1);

        Ok(Xid(id))
    }

    fn grab_keys(&self, keys: &[KeyPress]) -> Result<()> {
        self.record(Recorded::GrabKeys(keys.len()));
        Ok(())
    }

    fn ungrab_keys(&self) -> Result<()> {
        self.record(Recorded::UngrabKeys);
        Ok(())
    }

    fn next_event(&self) -> Result<XEvent> {
        let event = self
            .events
            .borrow_mut()
            .pop_front()
            .ok_or(Error::EventsExhausted)?;

        // keep the root child set in step with the event stream so that
        // root_children reflects what a live server would report
        match event {
            XEvent::MapRequest(id) => {
                let mut children = self.children.borrow_mut();
                if !children.contains(&id) {
                    children.push(id);
                }
            }
            XEvent::Destroy(id) => self.children.borrow_mut().retain(|&c| c != id),
            _ => (),
        }

        Ok(event)
    }

    fn flush(&self) {}

    fn map(&self, id: Xid) -> Result<()> {
        self.record(Recorded::Map(id));
        Ok(())
    }

    fn unmap(&self, id: Xid) -> Result<()> {
        self.record(Recorded::Unmap(id));
        Ok(())
    }

    fn raise(&self, id: Xid) -> Result<()> {
        self.record(Recorded::Raise(id));
        Ok(())
    }

    fn focus(&self, id: Xid) -> Result<()> {
        self.record(Recorded::Focus(id));
        Ok(())
    }

    fn position(&self, id: Xid, r: Rect) -> Result<()> {
        self.record(Recorded::Position(id, r));
        Ok(())
    }

    fn set_border_width(&self, id: Xid, px: u32) -> Result<()> {
        self.record(Recorded::BorderWidth(id, px));
        Ok(())
    }

    fn set_border_color(&self, id: Xid, color: Color) -> Result<()> {
        self.record(Recorded::BorderColor(id, color));
        Ok(())
    }

    fn watch_enter(&self, id: Xid) -> Result<()> {
        self.record(Recorded::WatchEnter(id));
        Ok(())
    }

    fn configure(&self, req: &ConfigureRequest) -> Result<()> {
        self.record(Recorded::Configure(req.id));
        Ok(())
    }

    fn send_wm_delete(&self, id: Xid) -> Result<()> {
        self.record(Recorded::SendWmDelete(id));
        Ok(())
    }

    fn root_children(&self) -> Result<Vec<Xid>> {
        Ok(self.children.borrow().clone())
    }

    fn text_extent(&self, text: &str) -> Result<u32> {
        Ok(GLYPH_W * text.chars().count() as u32)
    }

    fn font_ascent(&self) -> u32 {
        ASCENT
    }

    fn fill_rect(&self, id: Xid, r: Rect, color: Color) -> Result<()> {
        self.record(Recorded::FillRect(id, r, color));
        Ok(())
    }

    fn draw_text(&self, id: Xid, x: u32, y: u32, color: Color, text: &str) -> Result<()> {
        self.record(Recorded::DrawText(id, x, y, color, text.to_owned()));
        Ok(())
    }
}
