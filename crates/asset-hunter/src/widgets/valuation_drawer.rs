#![forbid(unsafe_code)]

//! Right-side valuation drawer with a dimmed backdrop.
//!
//! Rendering follows [`DrawerView`]: nothing when hidden, a spinner while the
//! slot is empty, and the full valuation breakdown when populated.

use asset_hunter_core::{CONFIDENCE_LABEL, DrawerView, SelectedValuation};
use ftui_core::geometry::Rect;
use ftui_render::cell::{Cell as RenderCell, PackedRgba};
use ftui_render::frame::Frame;
use ftui_style::{Style, StyleFlags};
use ftui_text::{WrapMode, display_width, truncate_with_ellipsis, wrap_text};
use ftui_widgets::block::{Alignment, Block};
use ftui_widgets::borders::{BorderType, Borders};
use ftui_widgets::paragraph::Paragraph;
use ftui_widgets::spinner::{Spinner, SpinnerState};
use ftui_widgets::{StatefulWidget, Widget};

use crate::theme;

/// Widest the drawer panel gets.
pub const DRAWER_MAX_WIDTH: u16 = 56;

pub const DRAWER_TITLE: &str = "V6.0 Valuation Protocol";
pub const LOADING_LABEL: &str = "Processing Asset Data...";
pub const EXPORT_HINT: &str = "[e] Export Report";

/// Panel rect inside `area`: right-aligned, full height.
pub fn panel_rect(area: Rect) -> Rect {
    let width = area.width.min(DRAWER_MAX_WIDTH);
    Rect::new(area.right() - width, area.y, width, area.height)
}

/// Recolor everything in `area` outside `keep` to a muted backdrop.
fn dim_backdrop(frame: &mut Frame, area: Rect, keep: Rect) {
    let fg = PackedRgba::from(theme::fg::DISABLED);
    let bg = PackedRgba::from(theme::bg::DEEP);
    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if keep.contains(x, y) {
                continue;
            }
            if let Some(cell) = frame.buffer.get_mut(x, y) {
                cell.fg = fg;
                cell.bg = bg;
            }
        }
    }
}

/// The detail drawer.
#[derive(Debug, Clone, Copy)]
pub struct ValuationDrawer<'a> {
    view: DrawerView<'a>,
    tick: u64,
    notice: Option<&'a str>,
}

impl<'a> ValuationDrawer<'a> {
    pub fn new(view: DrawerView<'a>) -> Self {
        Self {
            view,
            tick: 0,
            notice: None,
        }
    }

    /// Animation tick for the loading spinner.
    pub fn tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }

    /// One-line message shown above the footer (export result).
    pub fn notice(mut self, notice: Option<&'a str>) -> Self {
        self.notice = notice;
        self
    }

    fn render_loading(&self, frame: &mut Frame, body: Rect) {
        if body.is_empty() {
            return;
        }
        let label_w = display_width(LOADING_LABEL) as u16 + 2;
        let w = label_w.min(body.width);
        let x = body.x + (body.width - w) / 2;
        let y = body.y + body.height / 2;
        let spinner = Spinner::new()
            .label(LOADING_LABEL)
            .style(Style::new().fg(theme::BRAND));
        let mut state = SpinnerState {
            current_frame: self.tick as usize,
        };
        StatefulWidget::render(&spinner, Rect::new(x, y, w, 1), frame, &mut state);
    }

    fn render_populated(&self, v: &SelectedValuation, frame: &mut Frame, body: Rect) {
        let width = body.width as usize;
        let mut y = body.y;
        let bottom = body.bottom();
        let mut line = |frame: &mut Frame, text: &str, style: Style, align: Alignment| {
            if y >= bottom {
                return;
            }
            Paragraph::new(truncate_with_ellipsis(text, width, "…"))
                .style(style)
                .alignment(align)
                .render(Rect::new(body.x, y, body.width, 1), frame);
            y += 1;
        };

        let section = Style::new().fg(theme::fg::MUTED).attrs(StyleFlags::BOLD);

        line(
            frame,
            "AI ESTIMATED VALUE",
            Style::new().fg(theme::BRAND).attrs(StyleFlags::BOLD),
            Alignment::Left,
        );
        line(
            frame,
            &v.valuation,
            Style::new().fg(theme::fg::PRIMARY).attrs(StyleFlags::BOLD),
            Alignment::Left,
        );
        line(frame, "", Style::new(), Alignment::Left);

        line(frame, "✔ ANALYSIS REASONING", section.fg(theme::accent::SUCCESS), Alignment::Left);
        for wrapped in wrap_text(&v.reasoning, width, WrapMode::Word) {
            line(frame, &wrapped, Style::new().fg(theme::fg::SECONDARY), Alignment::Left);
        }
        line(frame, "", Style::new(), Alignment::Left);

        line(frame, "⚠ LEVERAGE POINTS", section.fg(theme::accent::WARNING), Alignment::Left);
        for wrapped in wrap_text(&v.details, width, WrapMode::Word) {
            line(frame, &wrapped, Style::new().fg(theme::fg::MUTED), Alignment::Left);
        }
        line(frame, "", Style::new(), Alignment::Left);

        line(
            frame,
            CONFIDENCE_LABEL,
            Style::new().fg(theme::accent::SUCCESS),
            Alignment::Center,
        );
    }
}

impl Widget for ValuationDrawer<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        if matches!(self.view, DrawerView::Hidden) || area.is_empty() {
            return;
        }

        let panel = panel_rect(area);
        dim_backdrop(frame, area, panel);

        frame.buffer.fill(
            panel,
            RenderCell::default().with_bg(theme::bg::DEEP.into()),
        );
        let block = Block::new()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" ◈ ")
            .style(theme::drawer_panel());
        let inner = block.inner(panel);
        block.render(panel, frame);
        if inner.width < 6 || inner.height < 3 {
            return;
        }

        let content = Rect::new(
            inner.x + 1,
            inner.y,
            inner.width.saturating_sub(2),
            inner.height,
        );

        // Header: title + close hint.
        let close = "Esc ✕";
        Paragraph::new(truncate_with_ellipsis(
            DRAWER_TITLE,
            (content.width as usize).saturating_sub(display_width(close) + 1),
            "…",
        ))
        .style(theme::title())
        .render(Rect::new(content.x, content.y, content.width, 1), frame);
        let close_w = display_width(close) as u16;
        if content.width > close_w + 1 {
            Paragraph::new(close).style(theme::muted()).render(
                Rect::new(content.right() - close_w, content.y, close_w, 1),
                frame,
            );
        }

        // Footer: export hint, with an optional notice above it.
        let footer_y = content.bottom() - 1;
        let export_style = match self.view {
            DrawerView::OpenPopulated(_) => theme::button_primary(),
            _ => theme::button_disabled(),
        };
        let hint_w = (display_width(EXPORT_HINT) as u16 + 4).min(content.width);
        Paragraph::new(EXPORT_HINT)
            .style(export_style)
            .alignment(Alignment::Center)
            .render(
                Rect::new(
                    content.x + (content.width - hint_w) / 2,
                    footer_y,
                    hint_w,
                    1,
                ),
                frame,
            );
        let mut body_bottom = footer_y.saturating_sub(1);
        if let Some(notice) = self.notice
            && body_bottom > content.y + 1
        {
            Paragraph::new(truncate_with_ellipsis(notice, content.width as usize, "…"))
                .style(theme::muted())
                .alignment(Alignment::Center)
                .render(Rect::new(content.x, body_bottom, content.width, 1), frame);
            body_bottom = body_bottom.saturating_sub(1);
        }

        let body_top = content.y + 2;
        if body_bottom <= body_top {
            return;
        }
        let body = Rect::new(content.x, body_top, content.width, body_bottom - body_top);

        match self.view {
            DrawerView::Hidden => {}
            DrawerView::OpenEmpty => self.render_loading(frame, body),
            DrawerView::OpenPopulated(v) => self.render_populated(v, frame, body),
        }
    }
}
