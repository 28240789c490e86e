//! Shared helpers for driving a WindowManager against the recording mock.
use std::{cell::RefCell, rc::Rc};
use stupidwm::{
    bindings::{default_bindings, KeyPress, Keysym},
    pure::geometry::Rect,
    spawn::Spawner,
    x::{event::XEvent, mock::MockXConn},
    Config, Result, WindowManager,
};

pub const SCREEN: Rect = Rect::new(0, 0, 1920, 1080);

/// A Spawner that records what it was asked to launch instead of forking.
#[derive(Default)]
pub struct RecordingSpawner {
    pub spawned: Rc<RefCell<Vec<Vec<String>>>>,
}

impl Spawner for RecordingSpawner {
    fn spawn(&self, argv: &[&str]) -> Result<()> {
        self.spawned
            .borrow_mut()
            .push(argv.iter().map(|s| s.to_string()).collect());

        Ok(())
    }
}

pub fn key(mask: u32, keysym: Keysym) -> XEvent {
    XEvent::KeyPress(KeyPress::new(mask, keysym))
}

/// A manager on a single 1920x1080 screen with the startup call noise
/// (bar creation, key grabs, the initial bar paint) already drained.
pub fn new_wm(events: Vec<XEvent>) -> WindowManager<MockXConn> {
    new_wm_with_screens(vec![SCREEN], events).0
}

pub fn new_wm_with_screens(
    screens: Vec<Rect>,
    events: Vec<XEvent>,
) -> (WindowManager<MockXConn>, Rc<RefCell<Vec<Vec<String>>>>) {
    let spawner = RecordingSpawner::default();
    let spawned = Rc::clone(&spawner.spawned);
    let conn = MockXConn::new(screens, events);

    let wm = WindowManager::new(conn, Config::default(), default_bindings(), Box::new(spawner))
        .expect("mock connection setup cannot fail");
    wm.conn().take_calls();

    (wm, spawned)
}
