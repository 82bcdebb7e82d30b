#![forbid(unsafe_code)]

//! Shared styles for the dashboard, backed by ftui-extras themes.

use asset_hunter_core::Category;
use ftui_extras::theme as core_theme;
use ftui_style::{Style, StyleFlags};

pub use core_theme::{ColorToken, accent, alpha, bg, fg, with_alpha};

/// Product accent, indigo like the nav mark.
pub const BRAND: ColorToken = accent::PRIMARY;

/// Badge color per category: zombies amber, ghosts emerald.
pub const fn category_accent(category: Category) -> ColorToken {
    match category {
        Category::GithubZombie => accent::WARNING,
        Category::ChromeGhost => accent::SUCCESS,
    }
}

// ---------------------------------------------------------------------------
// Semantic styles
// ---------------------------------------------------------------------------

pub fn title() -> Style {
    Style::new().fg(fg::PRIMARY).attrs(StyleFlags::BOLD)
}

pub fn body() -> Style {
    Style::new().fg(fg::PRIMARY)
}

pub fn muted() -> Style {
    Style::new().fg(fg::MUTED)
}

pub fn label() -> Style {
    Style::new().fg(fg::MUTED).attrs(StyleFlags::BOLD)
}

pub fn nav_rail() -> Style {
    Style::new().bg(bg::BASE).fg(fg::SECONDARY)
}

pub fn header_bar() -> Style {
    Style::new().bg(alpha::SURFACE).fg(fg::SECONDARY)
}

pub fn status_bar() -> Style {
    Style::new().bg(alpha::SURFACE).fg(fg::MUTED)
}

pub fn content_border() -> Style {
    Style::new().fg(fg::MUTED)
}

/// Card border, brighter when focused.
pub fn card_border(focused: bool) -> Style {
    if focused {
        Style::new().fg(BRAND).bg(bg::SURFACE)
    } else {
        Style::new().fg(fg::MUTED).bg(bg::SURFACE)
    }
}

pub fn help_overlay() -> Style {
    Style::new().bg(alpha::OVERLAY).fg(fg::PRIMARY)
}

pub fn drawer_panel() -> Style {
    Style::new().bg(bg::DEEP).fg(fg::PRIMARY)
}

/// Primary call-to-action button.
pub fn button_primary() -> Style {
    Style::new()
        .bg(fg::PRIMARY)
        .fg(bg::DEEP)
        .attrs(StyleFlags::BOLD)
}

pub fn button_disabled() -> Style {
    Style::new().bg(bg::HIGHLIGHT).fg(fg::MUTED)
}

pub fn error() -> Style {
    Style::new().fg(accent::ERROR).attrs(StyleFlags::BOLD)
}
