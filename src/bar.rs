//! Rendering of the per-monitor workspace indicator bar.
use crate::{
    config::Config,
    layout::BAR_HEIGHT,
    pure::{geometry::Rect, Monitor},
    x::XConn,
    Result,
};

/// Repaint one monitor's bar.
///
/// The bar is a single row of workspace tags: each tag cell is the tag's
/// text width plus 10px, the active tag is drawn highlighted and every
/// glyph is drawn in the color opposite to its cell background, 5px in from
/// the cell's left edge.
pub fn draw_bar<X: XConn>(conn: &X, config: &Config, m: &Monitor) -> Result<()> {
    conn.fill_rect(
        m.bar,
        Rect::new(0, 0, m.r.w, BAR_HEIGHT),
        config.unfocused,
    )?;

    let baseline = BAR_HEIGHT - (BAR_HEIGHT - conn.font_ascent()) / 2;
    let mut x = 0;

    for (i, tag) in config.tags.iter().enumerate() {
        let cell_w = conn.text_extent(tag)? + 10;
        let (bg, fg) = if i == m.active_ws {
            (config.focused, config.unfocused)
        } else {
            (config.unfocused, config.focused)
        };

        conn.fill_rect(m.bar, Rect::new(x, 0, cell_w, BAR_HEIGHT), bg)?;
        conn.draw_text(m.bar, x + 5, baseline, fg, tag)?;

        x += cell_w;
    }

    Ok(())
}
