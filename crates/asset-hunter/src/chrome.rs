#![forbid(unsafe_code)]

//! Shared UI chrome: nav rail, header, account menu, status bar, and help
//! overlay.

use asset_hunter_core::ScanId;
use ftui_core::geometry::Rect;
use ftui_render::frame::Frame;
use ftui_style::{Style, StyleFlags};
use ftui_text::{Line, Span, Text, display_width, truncate_with_ellipsis};
use ftui_widgets::Widget;
use ftui_widgets::block::{Alignment, Block};
use ftui_widgets::borders::{BorderType, Borders};
use ftui_widgets::paragraph::Paragraph;

use crate::theme;

/// Columns taken by the nav rail.
pub const NAV_RAIL_WIDTH: u16 = 20;
/// Narrowest terminal that still shows the nav rail.
pub const NAV_RAIL_MIN_TERMINAL: u16 = 60;

pub const PRODUCT_MARK: &str = "◆ Asset Hunter";
pub const BREADCRUMB: [&str; 2] = ["Home", "Dashboard"];
pub const ACCOUNT_LABEL: &str = "◉ Account";
pub const LOG_OUT_LABEL: &str = "Log out";

/// Nav entries; only the first is live.
pub const NAV_ENTRIES: [(&str, bool); 2] = [("▣ Dashboard", true), ("☰ Customers", false)];

// ---------------------------------------------------------------------------
// Nav rail
// ---------------------------------------------------------------------------

pub fn render_nav_rail(frame: &mut Frame, area: Rect) {
    if area.is_empty() {
        return;
    }
    Paragraph::new("").style(theme::nav_rail()).render(area, frame);

    let width = area.width.saturating_sub(2) as usize;
    let row = |i: u16| Rect::new(area.x + 1, area.y + i, area.width.saturating_sub(2), 1);

    Paragraph::new(truncate_with_ellipsis(PRODUCT_MARK, width, "…"))
        .style(
            Style::new()
                .bg(theme::bg::BASE)
                .fg(theme::BRAND)
                .attrs(StyleFlags::BOLD),
        )
        .render(row(0), frame);

    for (i, (label, active)) in NAV_ENTRIES.iter().enumerate() {
        let y = 2 + i as u16;
        if y >= area.height {
            break;
        }
        let style = if *active {
            Style::new()
                .bg(theme::bg::HIGHLIGHT)
                .fg(theme::fg::PRIMARY)
                .attrs(StyleFlags::BOLD)
        } else {
            Style::new().bg(theme::bg::BASE).fg(theme::fg::MUTED)
        };
        Paragraph::new(truncate_with_ellipsis(label, width, "…"))
            .style(style)
            .render(row(y), frame);
    }
}

// ---------------------------------------------------------------------------
// Header + account menu
// ---------------------------------------------------------------------------

/// Render the breadcrumb header and return the account toggle rect.
pub fn render_header(menu_open: bool, frame: &mut Frame, area: Rect) -> Rect {
    if area.is_empty() {
        return Rect::default();
    }
    let bar = theme::header_bar();
    Paragraph::new("").style(bar).render(area, frame);

    let sep = Style::new().bg(theme::alpha::SURFACE).fg(theme::fg::DISABLED);
    let mut spans = vec![Span::styled(" ", bar)];
    for (i, crumb) in BREADCRUMB.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" / ", sep));
        }
        let style = if i + 1 == BREADCRUMB.len() {
            bar.fg(theme::fg::PRIMARY).attrs(StyleFlags::BOLD)
        } else {
            bar.fg(theme::fg::MUTED)
        };
        spans.push(Span::styled(*crumb, style));
    }
    Paragraph::new(Text::from_lines([Line::from_spans(spans)]))
        .style(bar)
        .render(Rect::new(area.x, area.y, area.width, 1), frame);

    let label = if menu_open {
        format!("{ACCOUNT_LABEL} ▴ ")
    } else {
        format!("{ACCOUNT_LABEL} ▾ ")
    };
    let toggle_w = (display_width(&label) as u16).min(area.width);
    let toggle = Rect::new(area.right() - toggle_w, area.y, toggle_w, 1);
    let style = if menu_open {
        Style::new().bg(theme::bg::HIGHLIGHT).fg(theme::fg::PRIMARY)
    } else {
        bar.fg(theme::fg::SECONDARY)
    };
    Paragraph::new(label).style(style).render(toggle, frame);
    toggle
}

/// Menu rect hanging below `toggle`, clipped to `bounds`.
pub fn account_menu_rect(toggle: Rect, bounds: Rect) -> Rect {
    let width = (display_width(LOG_OUT_LABEL) as u16 + 6).min(bounds.width);
    let x = toggle.right().saturating_sub(width).max(bounds.x);
    let y = toggle.bottom();
    let height = 3.min(bounds.bottom().saturating_sub(y));
    Rect::new(x, y, width, height)
}

/// Render the account dropdown and return its rect.
pub fn render_account_menu(toggle: Rect, frame: &mut Frame, bounds: Rect) -> Rect {
    let rect = account_menu_rect(toggle, bounds);
    if rect.is_empty() {
        return rect;
    }
    let block = Block::new()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(theme::help_overlay());
    let inner = block.inner(rect);
    block.render(rect, frame);
    if !inner.is_empty() {
        Paragraph::new(format!(" ⏻ {LOG_OUT_LABEL}"))
            .style(theme::help_overlay().fg(theme::accent::ERROR))
            .render(inner, frame);
    }
    rect
}

// ---------------------------------------------------------------------------
// Status bar
// ---------------------------------------------------------------------------

/// State needed to render the status bar.
pub struct StatusBarState<'a> {
    pub busy: bool,
    pub in_flight: Option<ScanId>,
    pub last_applied: Option<ScanId>,
    pub records: usize,
    pub last_error: Option<&'a str>,
    pub source_name: &'a str,
    pub tick_count: u64,
    pub terminal_width: u16,
    pub terminal_height: u16,
}

impl StatusBarState<'_> {
    /// Short scan-state label.
    pub fn scan_label(&self) -> String {
        match (self.busy, self.in_flight, self.last_error) {
            (true, Some(id), _) => format!("SCANNING {id}"),
            (true, None, _) => "SCANNING".to_string(),
            (false, _, Some(_)) => "SCAN FAILED".to_string(),
            (false, _, None) => "READY".to_string(),
        }
    }
}

/// Render the status bar at the bottom of the screen.
///
/// Left: scan state and source. Center: record count and last applied scan.
/// Right: terminal size and elapsed time.
pub fn render_status_bar(state: &StatusBarState<'_>, frame: &mut Frame, area: Rect) {
    if area.is_empty() {
        return;
    }
    let bg_style = theme::status_bar();
    let bg_color = theme::alpha::SURFACE;
    Paragraph::new("").style(bg_style).render(area, frame);

    let total_secs = state.tick_count / 10;
    let mins = total_secs / 60;
    let secs = total_secs % 60;

    let state_color = if state.busy {
        theme::accent::WARNING
    } else if state.last_error.is_some() {
        theme::accent::ERROR
    } else {
        theme::accent::SUCCESS
    };
    let state_style = Style::new()
        .bg(bg_color)
        .fg(state_color)
        .attrs(StyleFlags::BOLD);
    let muted_style = Style::new().bg(bg_color).fg(theme::fg::MUTED);
    let dim_style = Style::new()
        .bg(bg_color)
        .fg(theme::fg::MUTED)
        .attrs(StyleFlags::DIM);
    let time_style = Style::new().bg(bg_color).fg(theme::fg::SECONDARY);
    let pad_style = Style::new().bg(bg_color);

    let state_str = state.scan_label();
    let source_str = format!("  {}", state.source_name);
    let last = state
        .last_applied
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    let center_str = format!("assets:{} last:{}", state.records, last);
    let dims_str = format!("{}x{}", state.terminal_width, state.terminal_height);
    let time_str = format!("{mins:02}:{secs:02}");

    let left_len = 1 + display_width(&state_str) + display_width(&source_str);
    let center_len = center_str.len();
    let right_len = dims_str.len() + 1 + time_str.len() + 1;
    let available = area.width as usize;
    let total = left_len + center_len + right_len;

    let mut spans = Vec::with_capacity(10);
    spans.push(Span::styled(" ", pad_style));
    spans.push(Span::styled(state_str, state_style));
    spans.push(Span::styled(source_str, muted_style));

    if total < available {
        let padding = available - total;
        let left_pad = padding / 2;
        let right_pad = padding - left_pad;
        if left_pad > 0 {
            spans.push(Span::styled(" ".repeat(left_pad), pad_style));
        }
        spans.push(Span::styled(center_str, dim_style));
        if right_pad > 0 {
            spans.push(Span::styled(" ".repeat(right_pad), pad_style));
        }
    } else {
        let pad = available.saturating_sub(left_len + right_len);
        if pad > 0 {
            spans.push(Span::styled(" ".repeat(pad), pad_style));
        }
    }
    spans.push(Span::styled(dims_str, muted_style));
    spans.push(Span::styled(" ", pad_style));
    spans.push(Span::styled(time_str, time_style));
    spans.push(Span::styled(" ", pad_style));

    Paragraph::new(Text::from_lines([Line::from_spans(spans)])).render(area, frame);
}

// ---------------------------------------------------------------------------
// Help overlay
// ---------------------------------------------------------------------------

/// Per-screen keybinding entry for the help overlay.
pub struct HelpEntry {
    pub key: &'static str,
    pub action: &'static str,
}

/// Bindings handled by the app shell on every screen.
pub const GLOBAL_BINDINGS: [HelpEntry; 4] = [
    HelpEntry {
        key: "?",
        action: "Toggle this help overlay",
    },
    HelpEntry {
        key: "u",
        action: "Toggle account menu",
    },
    HelpEntry {
        key: "Enter / l",
        action: "Log out (menu open)",
    },
    HelpEntry {
        key: "q / Ctrl+C",
        action: "Quit application",
    },
];

fn help_lines<'a>(screen_title: &'a str, screen_bindings: &'a [HelpEntry]) -> Vec<Line<'a>> {
    let key_style = Style::new().bold().fg(theme::accent::PRIMARY);
    let desc_style = theme::body();
    let category_style = Style::new().bold().underline().fg(theme::fg::SECONDARY);
    let key_w = GLOBAL_BINDINGS
        .iter()
        .chain(screen_bindings)
        .map(|e| display_width(e.key) + 2)
        .max()
        .unwrap_or(0);

    let entry = |e: &HelpEntry| {
        let key = format!("[{}]", e.key);
        let pad = key_w.saturating_sub(display_width(&key)) + 2;
        Line::from_spans([
            Span::styled(key, key_style),
            Span::raw(" ".repeat(pad)),
            Span::styled(e.action, desc_style),
        ])
    };

    let mut lines = vec![Line::from_spans([Span::styled("Global", category_style)])];
    lines.extend(GLOBAL_BINDINGS.iter().map(entry));
    if !screen_bindings.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::from_spans([Span::styled(
            format!("{screen_title} Controls"),
            category_style,
        )]));
        lines.extend(screen_bindings.iter().map(entry));
    }
    lines
}

/// Render a centered help overlay with global and screen-specific keybindings.
pub fn render_help_overlay(
    screen_title: &str,
    screen_bindings: &[HelpEntry],
    frame: &mut Frame,
    area: Rect,
) {
    let overlay_width = ((area.width as u32 * 60) / 100).clamp(36, 72) as u16;
    let overlay_height = ((area.height as u32 * 70) / 100).clamp(14, 24) as u16;
    let overlay_width = overlay_width.min(area.width.saturating_sub(2));
    let overlay_height = overlay_height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    let block = Block::new()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .title(" ⌨ Keyboard Shortcuts ")
        .title_alignment(Alignment::Center)
        .style(theme::help_overlay());
    let inner = block.inner(overlay_area);
    block.render(overlay_area, frame);

    if inner.width < 10 || inner.height < 5 {
        return;
    }

    let content_area = Rect::new(
        inner.x + 1,
        inner.y,
        inner.width.saturating_sub(2),
        inner.height.saturating_sub(1),
    );
    Paragraph::new(Text::from_lines(help_lines(screen_title, screen_bindings)))
        .style(theme::help_overlay())
        .render(content_area, frame);

    let footer_y = overlay_area.bottom().saturating_sub(1);
    if footer_y > inner.y {
        let footer = "Press ? or Esc to close";
        let footer_w = display_width(footer) as u16;
        let footer_x = inner.x + (inner.width.saturating_sub(footer_w)) / 2;
        Paragraph::new(footer)
            .style(Style::new().fg(theme::fg::MUTED))
            .render(Rect::new(footer_x, footer_y, footer_w, 1), frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftui_harness::buffer_to_text;
    use ftui_render::grapheme_pool::GraphemePool;

    fn with_frame(w: u16, h: u16, f: impl FnOnce(&mut Frame)) -> String {
        let mut pool = GraphemePool::new();
        let mut frame = Frame::new(w, h, &mut pool);
        f(&mut frame);
        buffer_to_text(&frame.buffer)
    }

    fn status(busy: bool, error: Option<&str>) -> StatusBarState<'_> {
        StatusBarState {
            busy,
            in_flight: busy.then(|| ScanId::new(4)),
            last_applied: Some(ScanId::new(3)),
            records: 3,
            last_error: error,
            source_name: "mock",
            tick_count: 125,
            terminal_width: 120,
            terminal_height: 40,
        }
    }

    #[test]
    fn nav_rail_lists_entries() {
        let text = with_frame(NAV_RAIL_WIDTH, 10, |frame| {
            render_nav_rail(frame, Rect::new(0, 0, NAV_RAIL_WIDTH, 10));
        });
        assert!(text.contains("Asset Hunter"));
        assert!(text.contains("Dashboard"));
        assert!(text.contains("Customers"));
    }

    #[test]
    fn header_shows_breadcrumb_and_returns_toggle() {
        let mut toggle = Rect::default();
        let text = with_frame(80, 1, |frame| {
            toggle = render_header(false, frame, Rect::new(0, 0, 80, 1));
        });
        assert!(text.contains("Home / Dashboard"));
        assert!(text.contains("Account"));
        assert_eq!(toggle.right(), 80);
        assert!(!toggle.is_empty());
    }

    #[test]
    fn account_menu_hangs_below_toggle() {
        let toggle = Rect::new(60, 0, 20, 1);
        let bounds = Rect::new(0, 0, 80, 24);
        let menu = account_menu_rect(toggle, bounds);
        assert_eq!(menu.y, 1);
        assert_eq!(menu.right(), 80);
        let text = with_frame(80, 24, |frame| {
            render_account_menu(toggle, frame, bounds);
        });
        assert!(text.contains(LOG_OUT_LABEL));
    }

    #[test]
    fn status_bar_reports_scan_state() {
        let text = with_frame(120, 1, |frame| {
            render_status_bar(&status(true, None), frame, Rect::new(0, 0, 120, 1));
        });
        assert!(text.contains("SCANNING #4"));
        assert!(text.contains("assets:3 last:#3"));
        assert!(text.contains("120x40"));
        assert!(text.contains("00:12"));

        assert_eq!(status(false, None).scan_label(), "READY");
        assert_eq!(status(false, Some("boom")).scan_label(), "SCAN FAILED");
    }

    #[test]
    fn narrow_status_bar_drops_center() {
        let text = with_frame(40, 1, |frame| {
            render_status_bar(&status(false, None), frame, Rect::new(0, 0, 40, 1));
        });
        assert!(text.contains("READY"));
        assert!(!text.contains("assets:"));
    }

    #[test]
    fn help_overlay_lists_global_and_screen_bindings() {
        let bindings = [HelpEntry {
            key: "s",
            action: "Initiate system scan",
        }];
        let text = with_frame(100, 30, |frame| {
            render_help_overlay("Dashboard", &bindings, frame, Rect::new(0, 0, 100, 30));
        });
        assert!(text.contains("Keyboard Shortcuts"));
        assert!(text.contains("Quit application"));
        assert!(text.contains("Dashboard Controls"));
        assert!(text.contains("Initiate system scan"));
        assert!(text.contains("Press ? or Esc to close"));
    }

    #[test]
    fn chrome_survives_tiny_areas() {
        for (w, h) in [(0, 0), (1, 1), (5, 2), (12, 4)] {
            let _ = with_frame(w.max(1), h.max(1), |frame| {
                let area = Rect::new(0, 0, w, h);
                render_nav_rail(frame, area);
                let toggle = render_header(true, frame, area);
                render_account_menu(toggle, frame, area);
                render_status_bar(&status(false, None), frame, area);
                render_help_overlay("Dashboard", &[], frame, area);
            });
        }
    }
}
