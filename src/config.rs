//! Build time configuration.
use crate::{state::WORKSPACE_COUNT, Color};

/// The user facing configuration: colors, the bar font and the workspace
/// tag labels.
///
/// The binding table lives in [`crate::bindings`]; everything else a user
/// would want to tweak is here, compiled in the way suckless-style window
/// managers do it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Border and bar highlight color for the focused client / active tag.
    pub focused: Color,
    /// Border and bar background color for everything else.
    pub unfocused: Color,
    /// Border width in pixels for the focused client.
    pub border_px: u32,
    /// The font used for bar text, as an Xft font name with size.
    pub font: String,
    /// The workspace tag labels shown in the bar.
    pub tags: [&'static str; WORKSPACE_COUNT],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            focused: "#f9f5d7".try_into().expect("valid hex code"),
            unfocused: "#282828".try_into().expect("valid hex code"),
            border_px: 5,
            font: "Iosevka Comfy:size=13".to_owned(),
            tags: ["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"],
        }
    }
}
