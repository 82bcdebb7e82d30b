#![forbid(unsafe_code)]

//! Dashboard screen: scan trigger, card grid, and valuation drawer.
//!
//! Owns the [`DashboardState`] plus view-only concerns (card focus, cached
//! hit rects, export notices). Scans are dispatched as background tasks that
//! come back as [`AppMsg::ScanFinished`].

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use asset_hunter_core::{
    DEFAULT_SCAN_LATENCY, DashboardState, DrawerView, EMPTY_STATE_MESSAGE, MockSource, ScanApply,
    ScanId, ScanOutcome, ScanSource, export_valuation, run_scan,
};
use ftui_core::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind};
use ftui_core::geometry::Rect;
use ftui_layout::{Constraint, Flex};
use ftui_render::frame::Frame;
use ftui_runtime::Cmd;
use ftui_style::{Style, StyleFlags};
use ftui_text::{Line, Span, Text, display_width, truncate_with_ellipsis};
use ftui_widgets::block::{Alignment, Block};
use ftui_widgets::borders::{BorderType, Borders};
use ftui_widgets::paragraph::Paragraph;
use ftui_widgets::spinner::{Spinner, SpinnerState};
use ftui_widgets::{StatefulWidget, Widget};

use super::{HelpEntry, Screen};
use crate::app::AppMsg;
use crate::theme;
use crate::widgets::valuation_drawer::panel_rect;
use crate::widgets::{CARD_HEIGHT, CARD_MIN_WIDTH, DealCard, ValuationDrawer};

pub const HEADLINE: &str = "Asset Hunter";
pub const VERSION_MARK: &str = "V6.0";
pub const TAGLINE: &str = "Identify, Analyze, and Valuate Digital Ghosts & Zombies.";
pub const SCAN_IDLE_LABEL: &str = "Initiate System Scan";
pub const SCAN_BUSY_LABEL: &str = "Scanning Ecosystem...";

const CARD_GAP: u16 = 2;
const HEADER_HEIGHT: u16 = 3;
const BUTTON_WIDTH: u16 = 26;

/// Number of card columns that fit in `width`.
pub fn grid_columns(width: u16) -> u16 {
    if width >= 3 * CARD_MIN_WIDTH + 2 * CARD_GAP {
        3
    } else if width >= 2 * CARD_MIN_WIDTH + CARD_GAP {
        2
    } else {
        1
    }
}

pub struct Dashboard {
    state: DashboardState,
    source: Arc<dyn ScanSource>,
    scan_latency: Duration,
    report_dir: PathBuf,
    /// Index of the focused card.
    focus: usize,
    tick_count: u64,
    /// Result of the last export, shown in the drawer.
    export_notice: Option<String>,
    /// Cached from the last render for mouse hit testing.
    last_area: Cell<Rect>,
    button_rect: Cell<Rect>,
    card_rects: RefCell<Vec<(usize, Rect)>>,
    columns: Cell<u16>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(Arc::new(MockSource), DEFAULT_SCAN_LATENCY, PathBuf::from("."))
    }
}

impl Dashboard {
    pub fn new(source: Arc<dyn ScanSource>, scan_latency: Duration, report_dir: PathBuf) -> Self {
        Self {
            state: DashboardState::new(),
            source,
            scan_latency,
            report_dir,
            focus: 0,
            tick_count: 0,
            export_notice: None,
            last_area: Cell::new(Rect::default()),
            button_rect: Cell::new(Rect::default()),
            card_rects: RefCell::new(Vec::new()),
            columns: Cell::new(1),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn export_notice(&self) -> Option<&str> {
        self.export_notice.as_deref()
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Start a scan unless one is already running.
    pub fn start_scan(&mut self) -> Cmd<AppMsg> {
        if self.state.is_busy() {
            tracing::debug!(
                target: "asset_hunter.scan",
                in_flight = self.state.in_flight().map(ScanId::get),
                "scan trigger ignored while busy"
            );
            return Cmd::none();
        }
        let ticket = self.state.trigger_scan();
        let id = ticket.id();
        let token = ticket.token().clone();
        let source = Arc::clone(&self.source);
        let latency = self.scan_latency;
        Cmd::task_named("asset-scan", move || AppMsg::ScanFinished {
            id,
            outcome: run_scan(source.as_ref(), &token, latency),
        })
    }

    pub fn cancel_scan(&mut self) -> bool {
        self.state.cancel_scan()
    }

    /// Feed a finished scan task back into the state.
    pub fn apply_scan(&mut self, id: ScanId, outcome: ScanOutcome) -> ScanApply {
        let applied = self.state.complete_scan(id, outcome);
        if let ScanApply::Applied { records } = applied {
            self.focus = self.focus.min(records.saturating_sub(1));
        }
        applied
    }

    pub fn analyze_focused(&mut self) -> bool {
        let opened = self.state.analyze_index(self.focus);
        if opened {
            self.export_notice = None;
        }
        opened
    }

    pub fn close_drawer(&mut self) {
        self.state.close_drawer();
    }

    pub fn reopen_drawer(&mut self) {
        self.state.reopen_drawer();
    }

    /// Write the open valuation to the report directory.
    pub fn export(&mut self) {
        let DrawerView::OpenPopulated(valuation) = self.state.drawer_view() else {
            return;
        };
        self.export_notice = Some(match export_valuation(&self.report_dir, valuation) {
            Ok(path) => format!("Saved {}", path.display()),
            Err(e) => {
                tracing::warn!(
                    target: "asset_hunter.report",
                    error = %e,
                    "valuation export failed"
                );
                format!("Export failed: {e}")
            }
        });
    }

    fn move_focus(&mut self, delta: isize) {
        let len = self.state.assets().len();
        if len == 0 {
            return;
        }
        let next = (self.focus as isize + delta).clamp(0, len as isize - 1);
        self.focus = next as usize;
    }

    fn handle_key(&mut self, code: KeyCode) -> Cmd<AppMsg> {
        if self.state.is_drawer_open() {
            match code {
                KeyCode::Escape => self.close_drawer(),
                KeyCode::Char('e') | KeyCode::Char('E') => self.export(),
                _ => {}
            }
            return Cmd::none();
        }

        let cols = self.columns.get().max(1) as isize;
        match code {
            KeyCode::Char('s') | KeyCode::Char('S') => return self.start_scan(),
            KeyCode::Char('x') | KeyCode::Char('X') => {
                self.cancel_scan();
            }
            KeyCode::Char('o') | KeyCode::Char('O') => self.reopen_drawer(),
            KeyCode::Enter => {
                self.analyze_focused();
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => self.move_focus(1),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => self.move_focus(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_focus(cols),
            KeyCode::Up | KeyCode::Char('k') => self.move_focus(-cols),
            KeyCode::Home => self.focus = 0,
            KeyCode::End => self.focus = self.state.assets().len().saturating_sub(1),
            _ => {}
        }
        Cmd::none()
    }

    fn handle_click(&mut self, x: u16, y: u16) -> Cmd<AppMsg> {
        if self.state.is_drawer_open() {
            if !panel_rect(self.last_area.get()).contains(x, y) {
                self.close_drawer();
            }
            return Cmd::none();
        }
        if self.button_rect.get().contains(x, y) {
            return self.start_scan();
        }
        let hit = self
            .card_rects
            .borrow()
            .iter()
            .find(|(_, rect)| rect.contains(x, y))
            .map(|(index, _)| *index);
        if let Some(index) = hit {
            self.focus = index;
            self.analyze_focused();
        }
        Cmd::none()
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let button_w = BUTTON_WIDTH
            .max(scan_button_label_width() as u16 + 2)
            .min(area.width / 2);
        let text_w = area.width.saturating_sub(button_w + 1);

        let headline = Line::from_spans([
            Span::styled(HEADLINE, theme::title()),
            Span::raw(" "),
            Span::styled(
                VERSION_MARK,
                Style::new().fg(theme::BRAND).attrs(StyleFlags::BOLD),
            ),
        ]);
        Paragraph::new(Text::from_lines([headline]))
            .render(Rect::new(area.x, area.y, text_w, 1), frame);
        if area.height > 1 {
            Paragraph::new(truncate_with_ellipsis(TAGLINE, text_w as usize, "…"))
                .style(theme::muted())
                .render(Rect::new(area.x, area.y + 1, text_w, 1), frame);
        }
        if area.height > 2
            && let Some(err) = self.state.last_error()
        {
            Paragraph::new(truncate_with_ellipsis(
                &format!("Scan failed: {err}"),
                area.width as usize,
                "…",
            ))
            .style(theme::error())
            .render(Rect::new(area.x, area.y + 2, area.width, 1), frame);
        }

        let button = Rect::new(area.right() - button_w, area.y, button_w, 1.min(area.height));
        self.button_rect.set(button);
        if button.is_empty() {
            return;
        }
        if self.state.is_busy() {
            frame.buffer.fill(
                button,
                ftui_render::cell::Cell::default().with_bg(theme::bg::HIGHLIGHT.into()),
            );
            let spinner = Spinner::new()
                .label(SCAN_BUSY_LABEL)
                .style(theme::button_disabled().fg(theme::BRAND));
            let mut state = SpinnerState {
                current_frame: self.tick_count as usize,
            };
            let inner = Rect::new(button.x + 1, button.y, button.width.saturating_sub(1), 1);
            StatefulWidget::render(&spinner, inner, frame, &mut state);
        } else {
            Paragraph::new(format!("⌕ {SCAN_IDLE_LABEL}"))
                .style(theme::button_primary())
                .alignment(Alignment::Center)
                .render(button, frame);
        }
    }

    fn render_empty_state(&self, frame: &mut Frame, area: Rect) {
        let height = 5.min(area.height);
        let rect = Rect::new(area.x, area.y, area.width, height);
        let block = Block::new()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .style(Style::new().fg(theme::fg::DISABLED).bg(theme::bg::BASE));
        let inner = block.inner(rect);
        block.render(rect, frame);
        if inner.is_empty() {
            return;
        }
        let y = inner.y + inner.height / 2;
        Paragraph::new(EMPTY_STATE_MESSAGE)
            .style(Style::new().fg(theme::fg::MUTED).bg(theme::bg::BASE))
            .alignment(Alignment::Center)
            .render(Rect::new(inner.x, y, inner.width, 1), frame);
    }

    fn render_grid(&self, frame: &mut Frame, area: Rect) {
        let assets = self.state.assets();
        let cols = grid_columns(area.width);
        self.columns.set(cols);
        let mut rects = self.card_rects.borrow_mut();
        rects.clear();
        if assets.is_empty() || area.is_empty() {
            return;
        }

        let card_w = (area.width - CARD_GAP * (cols - 1)) / cols;
        let visible_rows = ((area.height + 1) / (CARD_HEIGHT + 1)).max(1) as usize;
        let focus_row = self.focus / cols as usize;
        let first_row = (focus_row + 1).saturating_sub(visible_rows);

        for (index, record) in assets.iter().enumerate() {
            let row = index / cols as usize;
            if row < first_row || row >= first_row + visible_rows {
                continue;
            }
            let col = (index % cols as usize) as u16;
            let x = area.x + col * (card_w + CARD_GAP);
            let y = area.y + (row - first_row) as u16 * (CARD_HEIGHT + 1);
            let h = CARD_HEIGHT.min(area.bottom().saturating_sub(y));
            if h == 0 {
                continue;
            }
            let rect = Rect::new(x, y, card_w, h);
            DealCard::new(record)
                .focused(index == self.focus)
                .render(rect, frame);
            rects.push((index, rect));
        }
    }
}

impl Screen for Dashboard {
    type Message = AppMsg;

    fn update(&mut self, event: &Event) -> Cmd<Self::Message> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(*code),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => self.handle_click(mouse.x, mouse.y),
                MouseEventKind::ScrollDown if !self.state.is_drawer_open() => {
                    self.move_focus(self.columns.get().max(1) as isize);
                    Cmd::none()
                }
                MouseEventKind::ScrollUp if !self.state.is_drawer_open() => {
                    self.move_focus(-(self.columns.get().max(1) as isize));
                    Cmd::none()
                }
                _ => Cmd::none(),
            },
            _ => Cmd::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        self.last_area.set(area);
        if area.is_empty() {
            return;
        }
        let padded = Rect::new(
            area.x + 1,
            area.y,
            area.width.saturating_sub(2),
            area.height,
        );
        let chunks = Flex::vertical()
            .constraints([Constraint::Fixed(HEADER_HEIGHT), Constraint::Min(1)])
            .split(padded);

        self.render_header(frame, chunks[0]);
        if self.state.show_empty_state() {
            self.card_rects.borrow_mut().clear();
            self.render_empty_state(frame, chunks[1]);
        } else {
            self.render_grid(frame, chunks[1]);
        }

        ValuationDrawer::new(self.state.drawer_view())
            .tick(self.tick_count)
            .notice(self.export_notice.as_deref())
            .render(area, frame);
    }

    fn keybindings(&self) -> Vec<HelpEntry> {
        vec![
            HelpEntry {
                key: "s",
                action: "Initiate system scan",
            },
            HelpEntry {
                key: "x",
                action: "Cancel running scan",
            },
            HelpEntry {
                key: "←↑↓→ / hjkl",
                action: "Move card focus",
            },
            HelpEntry {
                key: "Enter / Click",
                action: "Analyze card",
            },
            HelpEntry {
                key: "o",
                action: "Reopen valuation drawer",
            },
            HelpEntry {
                key: "e",
                action: "Export valuation report",
            },
            HelpEntry {
                key: "Esc",
                action: "Close drawer",
            },
        ]
    }

    fn tick(&mut self, tick_count: u64) {
        self.tick_count = tick_count;
    }

    fn has_modal(&self) -> bool {
        self.state.is_drawer_open()
    }

    fn title(&self) -> &'static str {
        "Dashboard"
    }
}

/// Width the idle scan button label needs, glyph included.
fn scan_button_label_width() -> usize {
    display_width(SCAN_IDLE_LABEL) + 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_hunter_core::mock_batch;
    use ftui_core::event::{Modifiers, MouseEvent};
    use ftui_harness::buffer_to_text;
    use ftui_render::grapheme_pool::GraphemePool;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        })
    }

    fn click(x: u16, y: u16) -> Event {
        Event::Mouse(MouseEvent::new(MouseEventKind::Down(MouseButton::Left), x, y))
    }

    fn render(screen: &Dashboard, w: u16, h: u16) -> String {
        let mut pool = GraphemePool::new();
        let mut frame = Frame::new(w, h, &mut pool);
        screen.view(&mut frame, Rect::new(0, 0, w, h));
        buffer_to_text(&frame.buffer)
    }

    /// Dashboard with the mock batch already applied.
    fn loaded() -> Dashboard {
        let mut screen = Dashboard::new(Arc::new(MockSource), Duration::ZERO, PathBuf::from("."));
        let ticket = screen.state.trigger_scan();
        screen.apply_scan(ticket.id(), ScanOutcome::Completed(mock_batch()));
        screen
    }

    #[test]
    fn idle_dashboard_shows_empty_state_and_no_cards() {
        let screen = Dashboard::default();
        let text = render(&screen, 100, 30);
        assert_eq!(text.matches(EMPTY_STATE_MESSAGE).count(), 1);
        assert!(text.contains(SCAN_IDLE_LABEL));
        assert!(text.contains(TAGLINE));
        assert!(!text.contains("Analyze →"));
    }

    #[test]
    fn busy_dashboard_shows_scanning_label() {
        let mut screen = Dashboard::default();
        let _ticket = screen.state.trigger_scan();
        let text = render(&screen, 100, 30);
        assert!(text.contains(SCAN_BUSY_LABEL));
        assert!(!text.contains(EMPTY_STATE_MESSAGE));
    }

    #[test]
    fn scan_key_is_ignored_while_busy() {
        let mut screen = Dashboard::default();
        let _ = screen.update(&press(KeyCode::Char('s')));
        let first = screen.state.in_flight();
        assert!(first.is_some());
        let _ = screen.update(&press(KeyCode::Char('s')));
        assert_eq!(screen.state.in_flight(), first);
    }

    #[test]
    fn cancel_key_clears_busy() {
        let mut screen = Dashboard::default();
        let _ = screen.update(&press(KeyCode::Char('s')));
        let _ = screen.update(&press(KeyCode::Char('x')));
        assert!(!screen.state.is_busy());
    }

    #[test]
    fn loaded_dashboard_renders_three_cards() {
        let screen = loaded();
        let text = render(&screen, 120, 30);
        assert_eq!(text.matches("Analyze →").count(), 3);
        assert!(!text.contains(EMPTY_STATE_MESSAGE));
        assert_eq!(screen.card_rects.borrow().len(), 3);
        assert_eq!(screen.columns.get(), 3);
    }

    #[test]
    fn focus_moves_and_clamps() {
        let mut screen = loaded();
        let _ = render(&screen, 120, 30);
        let _ = screen.update(&press(KeyCode::Right));
        assert_eq!(screen.focus(), 1);
        let _ = screen.update(&press(KeyCode::End));
        assert_eq!(screen.focus(), 2);
        let _ = screen.update(&press(KeyCode::Right));
        assert_eq!(screen.focus(), 2);
        let _ = screen.update(&press(KeyCode::Up));
        assert_eq!(screen.focus(), 0);
    }

    #[test]
    fn enter_opens_drawer_and_escape_closes_it() {
        let mut screen = loaded();
        let _ = screen.update(&press(KeyCode::Down));
        let _ = screen.update(&press(KeyCode::Enter));
        assert!(screen.state.is_drawer_open());
        assert!(screen.has_modal());
        let _ = screen.update(&press(KeyCode::Escape));
        assert!(!screen.state.is_drawer_open());
        assert!(screen.state.selected().is_some());
        let _ = screen.update(&press(KeyCode::Char('o')));
        assert!(screen.state.is_drawer_open());
    }

    #[test]
    fn clicking_a_card_analyzes_it() {
        let mut screen = loaded();
        let _ = render(&screen, 120, 30);
        let rect = screen.card_rects.borrow()[1].1;
        let _ = screen.update(&click(rect.x + 2, rect.y + 2));
        assert_eq!(screen.focus(), 1);
        assert_eq!(
            screen.state.selected().unwrap().title,
            "Shadow API: /v1/internal/admin"
        );

        let text = render(&screen, 120, 30);
        assert!(text.contains("V6.0 Valuation Protocol"));
        assert!(text.contains("$50,000+"));
    }

    #[test]
    fn clicking_backdrop_closes_drawer() {
        let mut screen = loaded();
        let _ = screen.update(&press(KeyCode::Enter));
        let _ = render(&screen, 120, 30);
        let _ = screen.update(&click(100, 10));
        assert!(screen.state.is_drawer_open());
        let _ = screen.update(&click(2, 10));
        assert!(!screen.state.is_drawer_open());
    }

    #[test]
    fn clicking_scan_button_starts_scan() {
        let mut screen = Dashboard::default();
        let _ = render(&screen, 100, 30);
        let button = screen.button_rect.get();
        let _ = screen.update(&click(button.x + 1, button.y));
        assert!(screen.state.is_busy());
    }

    #[test]
    fn export_writes_report_and_sets_notice() {
        let dir = tempfile::tempdir().unwrap();
        let mut screen = loaded();
        screen.report_dir = dir.path().to_path_buf();
        let _ = screen.update(&press(KeyCode::Right));
        let _ = screen.update(&press(KeyCode::Enter));
        let _ = screen.update(&press(KeyCode::Char('e')));
        let notice = screen.export_notice().unwrap();
        assert!(notice.starts_with("Saved "), "{notice}");
        assert!(
            dir.path()
                .join("valuation-shadow-api-v1-internal-admin.json")
                .exists()
        );
    }

    #[test]
    fn export_without_selection_does_nothing() {
        let mut screen = Dashboard::default();
        let _ = screen.update(&press(KeyCode::Char('o')));
        let _ = screen.update(&press(KeyCode::Char('e')));
        assert!(screen.export_notice().is_none());
    }

    #[test]
    fn grid_columns_follow_width() {
        assert_eq!(grid_columns(40), 1);
        assert_eq!(grid_columns(2 * CARD_MIN_WIDTH + CARD_GAP), 2);
        assert_eq!(grid_columns(200), 3);
    }

    #[test]
    fn small_areas_do_not_panic() {
        let screen = loaded();
        for (w, h) in [(1, 1), (10, 3), (30, 6), (60, 12)] {
            let _ = render(&screen, w, h);
        }
        let empty = Dashboard::default();
        let mut pool = GraphemePool::new();
        let mut frame = Frame::new(10, 10, &mut pool);
        empty.view(&mut frame, Rect::new(0, 0, 0, 0));
    }

    #[test]
    fn button_label_fits_button() {
        assert!(scan_button_label_width() as u16 <= BUTTON_WIDTH);
    }
}
