//! stupidwm :: a stupidly simple tiling window manager for X11
//!
//! stupidwm arranges top level client windows in a master/stack tiled layout
//! across one or more monitors, with ten virtual workspaces and a small
//! per-monitor workspace indicator bar. It reparents nothing and it does not
//! composite: the entire window manager is a single threaded event loop that
//! reacts to X events and pushes geometry back to the server.
//!
//! All interaction with the display server goes through the [`XConn`] trait
//! so that the manager itself can be driven end to end in tests against a
//! recording mock. The only real backend is the Xlib one behind the `xlib`
//! feature.
//!
//! [`XConn`]: crate::x::XConn
#![warn(missing_docs, rust_2018_idioms)]
#![deny(clippy::all)]

use std::ops::Deref;

pub mod bar;
pub mod bindings;
pub mod config;
pub mod layout;
pub mod manager;
pub mod pure;
pub mod spawn;
pub mod state;
pub mod x;

#[cfg(feature = "xlib")]
pub mod xlib;

#[doc(inline)]
pub use crate::{
    config::Config,
    manager::WindowManager,
    state::{WmState, WORKSPACE_COUNT},
};

/// An X11 ID for a given resource
#[derive(Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Xid(pub u32);

impl std::fmt::Display for Xid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for Xid {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u32> for Xid {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A simple RGB color used for window borders and bar rendering.
///
/// Stored as `0xRRGGBB`. Backends are responsible for mapping this to
/// whatever pixel / color representation the display server wants.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Color(u32);

impl Color {
    /// The raw `0xRRGGBB` value of this color.
    pub fn rgb(&self) -> u32 {
        self.0
    }

    /// Render this color as a `#RRGGBB` hex string.
    pub fn as_hex_string(&self) -> String {
        format!("#{:06x}", self.0)
    }
}

impl From<u32> for Color {
    fn from(rgb: u32) -> Self {
        Self(rgb & 0x00ff_ffff)
    }
}

impl TryFrom<&str> for Color {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| Error::InvalidHexColor(s.to_owned()))?;

        if hex.len() != 6 {
            return Err(Error::InvalidHexColor(s.to_owned()));
        }

        let rgb =
            u32::from_str_radix(hex, 16).map_err(|_| Error::InvalidHexColor(s.to_owned()))?;

        Ok(Self(rgb))
    }
}

/// Enum of the ways in which stupidwm can fail.
///
/// The window manager has no recovery story beyond dying: any error that
/// propagates out of the event loop is printed on the `stupid:` fatal path
/// and the process exits with code 1.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Unable to establish a connection to the X server
    #[error("cannot open display")]
    CannotOpenDisplay,

    /// A named font could not be loaded by the backend
    #[error("failed to load font '{0}'")]
    FontLoad(String),

    /// A color string could not be parsed or allocated
    #[error("error parsing color '{0}'")]
    ColorAlloc(String),

    /// A color hex literal was malformed
    #[error("invalid hex color '{0}'")]
    InvalidHexColor(String),

    /// The backend ran out of events to deliver.
    ///
    /// Never produced by a live X connection (the event wait blocks); only
    /// the mock backend reports this when its scripted stream runs dry.
    #[error("no more events")]
    EventsExhausted,

    /// Spawning a child process failed before exec
    #[error("unable to spawn subprocess: {0}")]
    Spawn(String),

    /// Installing the SIGCHLD reaper failed
    #[error("sigchld handler failed")]
    SigChld,

    /// The user forced an immediate shutdown while the quit drain was running
    #[error("shutdown")]
    Shutdown,

    /// An X request was rejected by the server
    #[error("X request failed: {0}")]
    XRequest(&'static str),
}

/// A result using the enum of all stupidwm errors
pub type Result<T> = std::result::Result<T, Error>;
