//! A single virtual workspace: an ordered list of clients and a focus cursor.
use crate::Xid;

/// The ordered set of clients on one workspace along with the client that
/// currently holds focus.
///
/// The first client in the list is the "master" and receives the wide left
/// tile; the remaining clients are the "stack" and share the right column.
/// Clients are stored in insertion order in a flat `Vec` with the focus
/// cursor as an index into it: the focused client is a member of the list
/// whenever the list is non-empty and `None` otherwise.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    clients: Vec<Xid>,
    focused: Option<usize>,
}

impl Workspace {
    /// The clients on this workspace in master-first order.
    pub fn clients(&self) -> &[Xid] {
        &self.clients
    }

    /// The number of clients on this workspace.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether or not this workspace has any clients.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// The id of the client holding focus, if there is one.
    pub fn focused_client(&self) -> Option<Xid> {
        self.focused.map(|ix| self.clients[ix])
    }

    /// Check whether the given client is on this workspace.
    pub fn contains(&self, id: Xid) -> bool {
        self.clients.contains(&id)
    }

    /// Add a client at the tail of the list and give it focus.
    pub fn append(&mut self, id: Xid) {
        self.clients.push(id);
        self.focused = Some(self.clients.len() - 1);
    }

    /// Remove the first client matching the given id, returning it if found.
    ///
    /// If the removed client held focus, focus moves to the previous client
    /// when there is one, otherwise to the next, otherwise it clears.
    pub fn remove(&mut self, id: Xid) -> Option<Xid> {
        let ix = self.clients.iter().position(|&c| c == id)?;
        let removed = self.clients.remove(ix);

        self.focused = match self.focused {
            Some(f) if f == ix => {
                if ix > 0 {
                    Some(ix - 1)
                } else if self.clients.is_empty() {
                    None
                } else {
                    Some(0)
                }
            }
            // removal below the cursor shifts everything after it down one
            Some(f) if f > ix => Some(f - 1),
            other => other,
        };

        Some(removed)
    }

    /// Focus the given client if it is a member of this workspace.
    pub fn focus_client(&mut self, id: Xid) {
        if let Some(ix) = self.clients.iter().position(|&c| c == id) {
            self.focused = Some(ix);
        }
    }

    /// Move focus to the master client.
    pub fn focus_master(&mut self) {
        if self.focused.is_some() {
            self.focused = Some(0);
        }
    }

    /// Move focus from the master into the first client of the stack.
    ///
    /// Focus is already in the stack (or there is no stack): no-op.
    pub fn focus_stack(&mut self) {
        if self.focused == Some(0) && self.clients.len() > 1 {
            self.focused = Some(1);
        }
    }

    /// Move focus to the previous client in the list, stopping at the master.
    pub fn focus_prev(&mut self) {
        if let Some(f) = self.focused {
            if f > 0 {
                self.focused = Some(f - 1);
            }
        }
    }

    /// Move focus to the next client in the list if there is one.
    pub fn focus_next(&mut self) {
        if let Some(f) = self.focused {
            if f + 1 < self.clients.len() {
                self.focused = Some(f + 1);
            }
        }
    }

    /// Swap the window ids held by the focused client and the master, then
    /// focus the master. No-op when focus is absent or already the master.
    ///
    /// Returns `true` if a swap took place.
    pub fn swap_with_master(&mut self) -> bool {
        match self.focused {
            Some(f) if f != 0 => {
                self.clients.swap(0, f);
                self.focused = Some(0);
                true
            }
            _ => false,
        }
    }
}
