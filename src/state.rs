//! Mutable window manager state shared by all of the event handlers.
use crate::{
    pure::{Monitor, Workspace},
    Xid,
};

/// The number of virtual workspaces. Fixed for the life of the process.
pub const WORKSPACE_COUNT: usize = 10;

/// Where the window manager is in its lifecycle.
///
/// `quit` moves the state from `Running` to `Draining` while WM_DELETE
/// messages are broadcast and their resulting destroy notifications are
/// processed; once the root window has no children left the state latches
/// `Stopped` and the event loop exits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Normal event processing
    #[default]
    Running,
    /// Shutdown requested: waiting for the managed windows to die
    Draining,
    /// Terminal: the main loop should exit
    Stopped,
}

/// All pure window manager state: the workspace table, the monitors and the
/// shutdown latch.
///
/// The workspace table is global: every monitor shows one of the ten shared
/// slots, selected by its `active_ws` index. Exactly one monitor is selected
/// at any time and all commands act on the selected monitor's workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmState {
    workspaces: [Workspace; WORKSPACE_COUNT],
    monitors: Vec<Monitor>,
    selected: usize,
    /// The current lifecycle state of the manager.
    pub status: Status,
}

impl WmState {
    /// Create a new state from the monitors discovered at startup.
    ///
    /// The first monitor is the selected one; all workspaces start empty.
    pub fn new(monitors: Vec<Monitor>) -> Self {
        debug_assert!(!monitors.is_empty());

        Self {
            workspaces: Default::default(),
            monitors,
            selected: 0,
            status: Status::default(),
        }
    }

    /// The monitor that currently holds the selection.
    pub fn selected_monitor(&self) -> &Monitor {
        &self.monitors[self.selected]
    }

    /// All known monitors in discovery order.
    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    /// The index of the workspace shown on the selected monitor.
    pub fn active_ws(&self) -> usize {
        self.monitors[self.selected].active_ws
    }

    /// The workspace shown on the selected monitor.
    pub fn current_workspace(&self) -> &Workspace {
        &self.workspaces[self.active_ws()]
    }

    /// Mutable access to the workspace shown on the selected monitor.
    pub fn current_workspace_mut(&mut self) -> &mut Workspace {
        let ix = self.active_ws();
        &mut self.workspaces[ix]
    }

    /// The workspace in the given table slot.
    pub fn workspace(&self, ix: usize) -> &Workspace {
        &self.workspaces[ix]
    }

    /// Mutable access to the workspace in the given table slot.
    pub fn workspace_mut(&mut self, ix: usize) -> &mut Workspace {
        &mut self.workspaces[ix]
    }

    /// Re-bind the selected monitor to the given workspace slot.
    ///
    /// This is all that "saving" and "loading" a workspace amounts to: the
    /// table is the single owner of every client list so switching is a
    /// matter of moving the monitor's index.
    pub fn switch_to(&mut self, ix: usize) {
        self.monitors[self.selected].active_ws = ix;
    }

    /// Move the selection to the next monitor in discovery order.
    ///
    /// Returns `true` if the selection changed. The selection does not wrap:
    /// on the last monitor this is a no-op, matching the original behaviour.
    pub fn focus_next_monitor(&mut self) -> bool {
        if self.selected + 1 < self.monitors.len() {
            self.selected += 1;
            true
        } else {
            false
        }
    }

    /// The monitor owning the given bar window, if any.
    pub fn monitor_with_bar(&self, bar: Xid) -> Option<&Monitor> {
        self.monitors.iter().find(|m| m.bar == bar)
    }
}
