//! The window manager itself: event dispatch, the command layer and the
//! logic that pushes pure state back to the X server.
use crate::{
    bar,
    bindings::{action_for, Action, KeyBinding, KeyPress},
    config::Config,
    layout::{self, BAR_HEIGHT},
    pure::{geometry::Rect, Monitor},
    spawn::Spawner,
    state::{Status, WmState},
    x::{
        event::{ConfigureRequest, ExposeEvent, XEvent},
        XConn,
    },
    Error, Result, Xid,
};
use tracing::{debug, info, trace};

/// A tiling window manager bound to an [`XConn`] backend.
///
/// The manager owns the connection, the pure [`WmState`] and the binding
/// table. Each event is handled to completion before the next one is pulled
/// from the server, so handlers are free to mutate state without further
/// synchronisation.
pub struct WindowManager<X: XConn> {
    conn: X,
    config: Config,
    bindings: Vec<KeyBinding>,
    spawner: Box<dyn Spawner>,
    state: WmState,
}

impl<X: XConn> WindowManager<X> {
    /// Discover monitors, create their bars, grab the binding table and
    /// paint the initial bar state.
    ///
    /// If the output query reports no usable outputs a single synthetic
    /// monitor covering the root window is used instead.
    pub fn new(
        conn: X,
        config: Config,
        bindings: Vec<KeyBinding>,
        spawner: Box<dyn Spawner>,
    ) -> Result<Self> {
        let mut rects = conn.screen_details()?;
        if rects.is_empty() {
            rects = vec![conn.root_geometry()?];
        }

        info!(monitors = rects.len(), "discovered monitors");

        let monitors = rects
            .into_iter()
            .enumerate()
            .map(|(i, r)| {
                let bar_r = Rect::new(r.x, r.y, r.w, BAR_HEIGHT);
                let bar = conn.create_bar(bar_r, config.unfocused)?;

                Ok(Monitor::new(r, bar, i == 0))
            })
            .collect::<Result<Vec<Monitor>>>()?;

        let keys: Vec<KeyPress> = bindings.iter().map(|b| b.key).collect();
        conn.grab_keys(&keys)?;

        let wm = Self {
            conn,
            config,
            bindings,
            spawner,
            state: WmState::new(monitors),
        };
        wm.draw_bars()?;

        Ok(wm)
    }

    /// The pure state being managed. Primarily of interest for testing.
    pub fn state(&self) -> &WmState {
        &self.state
    }

    /// The underlying connection.
    pub fn conn(&self) -> &X {
        &self.conn
    }

    /// Run the main event loop until the shutdown latch reaches `Stopped`.
    pub fn run(&mut self) -> Result<()> {
        info!("entering the main event loop");

        while self.state.status != Status::Stopped {
            let event = self.conn.next_event()?;
            self.handle_xevent(event)?;
            self.conn.flush();
        }

        info!("shutting down");
        self.conn.ungrab_keys()
    }

    /// Handle a single event from the server.
    pub fn handle_xevent(&mut self, event: XEvent) -> Result<()> {
        trace!(?event, "handling event");

        match event {
            XEvent::KeyPress(k) => self.key_press(k),
            XEvent::MapRequest(id) => self.map_request(id),
            XEvent::Destroy(id) => self.destroy(id),
            XEvent::Enter(id) => self.enter(id),
            XEvent::ConfigureRequest(req) => self.configure_request(&req),
            XEvent::ConfigureNotify(_) => Ok(()), // outputs are never re-queried
            XEvent::Expose(ev) => self.expose(ev),
        }
    }

    fn key_press(&mut self, key: KeyPress) -> Result<()> {
        match action_for(&self.bindings, key) {
            Some(action) => self.run_action(action),
            None => Ok(()),
        }
    }

    fn map_request(&mut self, id: Xid) -> Result<()> {
        // already managed: the client is just asking to be shown again
        if self.state.current_workspace().contains(id) {
            return self.conn.map(id);
        }

        debug!(%id, "managing new client");
        self.state.current_workspace_mut().append(id);
        self.conn.watch_enter(id)?;
        self.conn.map(id)?;
        self.apply_layout()?;
        self.refresh_focus()
    }

    fn destroy(&mut self, id: Xid) -> Result<()> {
        if !self.state.current_workspace().contains(id) {
            return Ok(());
        }

        debug!(%id, "removing client");
        self.state.current_workspace_mut().remove(id);
        self.apply_layout()?;
        self.refresh_focus()
    }

    fn enter(&mut self, id: Xid) -> Result<()> {
        // pointer motion over the root background is not a focus change
        if id == self.conn.root() {
            return Ok(());
        }

        if self.state.current_workspace().contains(id) {
            self.state.current_workspace_mut().focus_client(id);
            self.refresh_focus()?;
        }

        Ok(())
    }

    fn configure_request(&self, req: &ConfigureRequest) -> Result<()> {
        // honored verbatim: tiling reasserts geometry on the next relayout
        self.conn.configure(req)
    }

    fn expose(&self, ev: ExposeEvent) -> Result<()> {
        if ev.count != 0 {
            return Ok(());
        }

        match self.state.monitor_with_bar(ev.id) {
            Some(m) => bar::draw_bar(&self.conn, &self.config, m),
            None => Ok(()),
        }
    }

    fn run_action(&mut self, action: Action) -> Result<()> {
        debug!(?action, "running keybinding action");

        match action {
            Action::Spawn(argv) => self.spawner.spawn(argv),
            Action::KillFocused => self.kill_focused(),
            Action::FocusWorkspace(ix) => self.change_workspace(ix),
            Action::MoveToWorkspace(ix) => self.client_to_workspace(ix),
            Action::FocusMaster => {
                self.state.current_workspace_mut().focus_master();
                self.refresh_focus()
            }
            Action::FocusStack => {
                self.state.current_workspace_mut().focus_stack();
                self.refresh_focus()
            }
            Action::FocusPrev => {
                self.state.current_workspace_mut().focus_prev();
                self.refresh_focus()
            }
            Action::FocusNext => {
                self.state.current_workspace_mut().focus_next();
                self.refresh_focus()
            }
            Action::SwapMaster => self.swap_with_master(),
            Action::NextMonitor => self.focus_next_monitor(),
            Action::Quit => self.quit(),
        }
    }

    /// Ask the focused client to close itself. The message is sent twice,
    /// mirroring the original; clients that ignore WM_DELETE_WINDOW are not
    /// force killed.
    fn kill_focused(&self) -> Result<()> {
        if let Some(id) = self.state.current_workspace().focused_client() {
            self.conn.send_wm_delete(id)?;
            self.conn.send_wm_delete(id)?;
        }

        Ok(())
    }

    fn change_workspace(&mut self, ix: usize) -> Result<()> {
        if ix == self.state.active_ws() {
            return Ok(());
        }

        debug!(ws = ix, "switching workspace");

        for &c in self.state.current_workspace().clients() {
            self.conn.unmap(c)?;
        }

        self.state.switch_to(ix);

        for &c in self.state.current_workspace().clients() {
            self.conn.map(c)?;
        }

        self.apply_layout()?;
        self.refresh_focus()?;
        bar::draw_bar(&self.conn, &self.config, self.state.selected_monitor())
    }

    fn client_to_workspace(&mut self, ix: usize) -> Result<()> {
        if ix == self.state.active_ws() {
            return Ok(());
        }

        let id = match self.state.current_workspace().focused_client() {
            Some(id) => id,
            None => return Ok(()),
        };

        debug!(%id, ws = ix, "sending client to workspace");
        self.state.workspace_mut(ix).append(id);
        self.state.current_workspace_mut().remove(id);
        self.conn.unmap(id)?;
        self.apply_layout()?;
        self.refresh_focus()
    }

    fn swap_with_master(&mut self) -> Result<()> {
        if self.state.current_workspace_mut().swap_with_master() {
            self.apply_layout()?;
            self.refresh_focus()?;
        }

        Ok(())
    }

    fn focus_next_monitor(&mut self) -> Result<()> {
        if self.state.focus_next_monitor() {
            self.refresh_focus()?;
            self.draw_bars()?;
        }

        Ok(())
    }

    /// Two phase shutdown.
    ///
    /// The first invocation latches `Draining`, asks every managed top level
    /// window to close and keeps dispatching events until the root window
    /// has no children left, then latches `Stopped` for the main loop to
    /// observe. Invoking quit again while the drain is running tears down
    /// immediately through the fatal exit path.
    fn quit(&mut self) -> Result<()> {
        match self.state.status {
            Status::Stopped => Ok(()),
            Status::Draining => {
                self.conn.ungrab_keys()?;
                Err(Error::Shutdown)
            }
            Status::Running => {
                info!("quit requested: asking all clients to close");
                self.state.status = Status::Draining;

                for child in self.conn.root_children()? {
                    self.conn.send_wm_delete(child)?;
                }

                while !self.conn.root_children()?.is_empty() {
                    let event = self.conn.next_event()?;
                    self.handle_xevent(event)?;
                }

                self.state.status = Status::Stopped;
                Ok(())
            }
        }
    }

    /// Re-tile the selected monitor's workspace.
    fn apply_layout(&self) -> Result<()> {
        let m = self.state.selected_monitor();
        let ws = self.state.current_workspace();

        for (id, r) in layout::tile(m.r, ws.clients()) {
            self.conn.position(id, r)?;
        }

        Ok(())
    }

    /// Update borders, stacking and input focus for the active workspace.
    fn refresh_focus(&self) -> Result<()> {
        let ws = self.state.current_workspace();
        let focused = ws.focused_client();

        for &c in ws.clients() {
            if Some(c) == focused {
                self.conn.set_border_width(c, self.config.border_px)?;
                self.conn.set_border_color(c, self.config.focused)?;
                self.conn.raise(c)?;
                self.conn.focus(c)?;
            } else {
                self.conn.set_border_color(c, self.config.unfocused)?;
            }
        }

        Ok(())
    }

    fn draw_bars(&self) -> Result<()> {
        for m in self.state.monitors() {
            bar::draw_bar(&self.conn, &self.config, m)?;
        }

        Ok(())
    }
}
