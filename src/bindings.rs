//! The keybinding schema: key specs, the action sum type and the default
//! binding table.
//!
//! Bindings are data, not closures: each table entry pairs a keysym plus an
//! exact modifier mask with the [`Action`] the command layer should run. The
//! table is resolved on every key press by scanning for the first entry
//! whose keysym and mask both match; unknown combinations are ignored.

/// An X keysym value.
pub type Keysym = u64;

/// X modifier masks for binding definitions.
pub mod modmask {
    /// Shift
    pub const SHIFT: u32 = 1 << 0;
    /// Caps lock
    pub const LOCK: u32 = 1 << 1;
    /// Control
    pub const CONTROL: u32 = 1 << 2;
    /// Mod1 (usually Alt)
    pub const MOD1: u32 = 1 << 3;
    /// Mod4 (usually Super / the "windows" key)
    pub const MOD4: u32 = 1 << 6;
}

/// The keysyms used by the default binding table.
///
/// Latin keysyms are their ASCII values so there is no need to pull the
/// backend's keysym tables into the pure side of the crate.
#[allow(non_upper_case_globals, missing_docs)]
pub mod keysym {
    use super::Keysym;

    pub const XK_Return: Keysym = 0xff0d;
    pub const XK_period: Keysym = 0x2e;
    pub const XK_0: Keysym = 0x30;
    pub const XK_1: Keysym = 0x31;
    pub const XK_e: Keysym = 0x65;
    pub const XK_h: Keysym = 0x68;
    pub const XK_j: Keysym = 0x6a;
    pub const XK_k: Keysym = 0x6b;
    pub const XK_l: Keysym = 0x6c;
    pub const XK_p: Keysym = 0x70;
    pub const XK_q: Keysym = 0x71;
}

/// A key press: the resolved primary keysym and the held modifier mask.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct KeyPress {
    /// The primary keysym for the pressed key code
    pub keysym: Keysym,
    /// The exact modifier mask held when the key was pressed
    pub mask: u32,
}

impl KeyPress {
    /// Create a new key press spec.
    pub const fn new(mask: u32, keysym: Keysym) -> Self {
        Self { keysym, mask }
    }
}

/// Everything a keybinding can ask the window manager to do.
///
/// The argument is baked into the variant: a command vector for [`Spawn`],
/// a workspace index for the workspace operations, nothing for the rest.
///
/// [`Spawn`]: Action::Spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Launch a detached external command
    Spawn(&'static [&'static str]),
    /// Ask the focused client to close itself via WM_DELETE_WINDOW
    KillFocused,
    /// Switch the selected monitor to the given workspace
    FocusWorkspace(usize),
    /// Send the focused client to the given workspace
    MoveToWorkspace(usize),
    /// Focus the master client
    FocusMaster,
    /// Move focus from the master into the stack
    FocusStack,
    /// Focus the previous client in the list
    FocusPrev,
    /// Focus the next client in the list
    FocusNext,
    /// Swap the focused client's window with the master's
    SwapMaster,
    /// Move the monitor selection to the next monitor
    NextMonitor,
    /// Begin the two phase shutdown
    Quit,
}

/// One entry in the binding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    /// The key press that triggers this binding
    pub key: KeyPress,
    /// What to do when it fires
    pub action: Action,
}

impl KeyBinding {
    /// Create a new binding table entry.
    pub const fn new(mask: u32, keysym: Keysym, action: Action) -> Self {
        Self {
            key: KeyPress::new(mask, keysym),
            action,
        }
    }
}

const DMENU: &[&str] = &["dmenu_run"];
const TERMINAL: &[&str] = &["kitty"];

/// The default binding table.
///
/// `Super` is the common modifier: Shift-ed chords spawn programs, kill the
/// focused client, move clients between workspaces and quit; bare chords
/// switch workspaces and move focus with h/l/k/j.
pub fn default_bindings() -> Vec<KeyBinding> {
    use {keysym::*, modmask::*, Action::*};

    let mut bindings = vec![
        KeyBinding::new(MOD4 | SHIFT, XK_p, Spawn(DMENU)),
        KeyBinding::new(MOD4 | SHIFT, XK_Return, Spawn(TERMINAL)),
        KeyBinding::new(MOD4 | SHIFT, XK_q, KillFocused),
        KeyBinding::new(MOD4 | SHIFT, XK_e, Quit),
        KeyBinding::new(MOD4, XK_h, FocusMaster),
        KeyBinding::new(MOD4, XK_l, FocusStack),
        KeyBinding::new(MOD4, XK_k, FocusPrev),
        KeyBinding::new(MOD4, XK_j, FocusNext),
        KeyBinding::new(MOD4, XK_Return, SwapMaster),
        KeyBinding::new(MOD4, XK_period, NextMonitor),
    ];

    // Super+1..9,0 selects a workspace, shifted sends the focused client there
    for ws in 0..crate::state::WORKSPACE_COUNT {
        let ks = if ws == 9 { XK_0 } else { XK_1 + ws as Keysym };
        bindings.push(KeyBinding::new(MOD4, ks, FocusWorkspace(ws)));
        bindings.push(KeyBinding::new(MOD4 | SHIFT, ks, MoveToWorkspace(ws)));
    }

    bindings
}

/// Find the action for a key press: the first table entry with a matching
/// keysym and an exactly equal modifier mask.
pub fn action_for(bindings: &[KeyBinding], key: KeyPress) -> Option<Action> {
    bindings
        .iter()
        .find(|b| b.key.keysym == key.keysym && b.key.mask == key.mask)
        .map(|b| b.action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    #[test]
    fn the_default_table_has_no_duplicate_chords() {
        let bindings = default_bindings();

        for (i, b) in bindings.iter().enumerate() {
            for other in bindings.iter().skip(i + 1) {
                assert_ne!(b.key, other.key, "{:?} bound twice", b.key);
            }
        }
    }

    #[test_case(modmask::MOD4, keysym::XK_1, Some(Action::FocusWorkspace(0)); "first workspace")]
    #[test_case(modmask::MOD4, keysym::XK_0, Some(Action::FocusWorkspace(9)); "zero is the tenth workspace")]
    #[test_case(modmask::MOD4 | modmask::SHIFT, keysym::XK_0, Some(Action::MoveToWorkspace(9)); "shifted digit moves the client")]
    #[test_case(modmask::MOD4, keysym::XK_q, None; "mask must match exactly")]
    #[test_case(modmask::MOD4, 0xffff, None; "unbound keysym")]
    #[test]
    fn action_lookup(mask: u32, keysym: Keysym, expected: Option<Action>) {
        let bindings = default_bindings();

        assert_eq!(action_for(&bindings, KeyPress::new(mask, keysym)), expected);
    }
}
