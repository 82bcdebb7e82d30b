#![forbid(unsafe_code)]

//! Main application model and message routing.
//!
//! [`AppModel`] implements the Elm architecture via [`Model`]. It owns the
//! dashboard screen, handles global keybindings (quit, help, account menu),
//! feeds finished scan tasks back into the dashboard, and renders the chrome
//! around it.

use std::cell::Cell;
use std::time::Duration;

use asset_hunter_core::{ScanId, ScanOutcome};
use ftui_core::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, MouseEventKind,
};
use ftui_core::geometry::Rect;
use ftui_layout::{Constraint, Flex};
use ftui_render::cell::Cell as RenderCell;
use ftui_render::frame::Frame;
use ftui_runtime::{Cmd, Every, Model, Subscription};
use ftui_widgets::Widget;
use ftui_widgets::block::{Alignment, Block};
use ftui_widgets::borders::{BorderType, Borders};

use crate::chrome::{self, NAV_RAIL_MIN_TERMINAL, NAV_RAIL_WIDTH, StatusBarState};
use crate::cli::Opts;
use crate::screens::Screen;
use crate::screens::dashboard::Dashboard;
use crate::theme;
use crate::widgets::DealTicker;

/// Top-level application message.
#[derive(Debug)]
pub enum AppMsg {
    /// A raw terminal event forwarded to the dashboard.
    ScreenEvent(Event),
    /// Periodic tick for the ticker and spinners.
    Tick,
    /// Terminal resize.
    Resize {
        /// New terminal width.
        width: u16,
        /// New terminal height.
        height: u16,
    },
    /// A background scan finished.
    ScanFinished { id: ScanId, outcome: ScanOutcome },
    /// Toggle the help overlay.
    ToggleHelp,
    /// Toggle the account menu.
    ToggleAccountMenu,
    /// End the session from the account menu.
    LogOut,
    /// Quit the application.
    Quit,
}

impl From<Event> for AppMsg {
    fn from(event: Event) -> Self {
        if let Event::Resize { width, height } = event {
            return Self::Resize { width, height };
        }

        Self::ScreenEvent(event)
    }
}

pub struct AppModel {
    dashboard: Dashboard,
    help_visible: bool,
    account_menu_open: bool,
    tick_count: u64,
    terminal_width: u16,
    terminal_height: u16,
    /// Auto-exit after this many milliseconds (0 = disabled).
    exit_after_ms: u64,
    /// Cached from the last render for mouse hit testing.
    account_toggle: Cell<Rect>,
    account_menu: Cell<Rect>,
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new(Dashboard::default())
    }
}

impl AppModel {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            help_visible: false,
            account_menu_open: false,
            tick_count: 0,
            terminal_width: 0,
            terminal_height: 0,
            exit_after_ms: 0,
            account_toggle: Cell::new(Rect::default()),
            account_menu: Cell::new(Rect::default()),
        }
    }

    pub fn from_opts(opts: &Opts) -> Self {
        let dashboard = Dashboard::new(
            opts.source.build(),
            opts.scan_latency,
            opts.report_dir.clone(),
        );
        let mut model = Self::new(dashboard);
        model.exit_after_ms = opts.exit_after_ms;
        model
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn dashboard_mut(&mut self) -> &mut Dashboard {
        &mut self.dashboard
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn account_menu_open(&self) -> bool {
        self.account_menu_open
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    fn log_out(&mut self) -> Cmd<AppMsg> {
        self.account_menu_open = false;
        tracing::info!(
            target: "asset_hunter",
            tick = self.tick_count,
            "session ended by log out"
        );
        Cmd::quit()
    }

    fn handle_event(&mut self, event: Event) -> Cmd<AppMsg> {
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = &event
        {
            match (*code, *modifiers) {
                (KeyCode::Char('q'), Modifiers::NONE) => return Cmd::quit(),
                (KeyCode::Char('c'), Modifiers::CTRL) => return Cmd::quit(),
                _ => {}
            }

            if self.help_visible {
                if matches!(code, KeyCode::Char('?') | KeyCode::Escape) {
                    return self.update(AppMsg::ToggleHelp);
                }
                return Cmd::none();
            }

            if self.account_menu_open {
                return match code {
                    KeyCode::Enter | KeyCode::Char('l') => self.update(AppMsg::LogOut),
                    KeyCode::Escape | KeyCode::Char('u') => self.update(AppMsg::ToggleAccountMenu),
                    _ => Cmd::none(),
                };
            }

            match code {
                KeyCode::Char('?') => return self.update(AppMsg::ToggleHelp),
                KeyCode::Char('u') if !self.dashboard.has_modal() => {
                    return self.update(AppMsg::ToggleAccountMenu);
                }
                _ => {}
            }
        }

        if let Event::Mouse(mouse) = &event
            && matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left))
        {
            if self.help_visible {
                return Cmd::none();
            }
            if self.account_menu_open {
                if self.account_menu.get().contains(mouse.x, mouse.y) {
                    return self.update(AppMsg::LogOut);
                }
                self.account_menu_open = false;
                return Cmd::none();
            }
            if self.account_toggle.get().contains(mouse.x, mouse.y) && !self.dashboard.has_modal()
            {
                return self.update(AppMsg::ToggleAccountMenu);
            }
        }

        if self.help_visible || self.account_menu_open {
            return Cmd::none();
        }
        self.dashboard.update(&event)
    }
}

impl Model for AppModel {
    type Message = AppMsg;

    fn init(&mut self) -> Cmd<Self::Message> {
        tracing::info!(
            target: "asset_hunter",
            source = self.dashboard.source_name(),
            "dashboard ready"
        );
        if self.exit_after_ms > 0 {
            let ms = self.exit_after_ms;
            Cmd::task(move || {
                std::thread::sleep(Duration::from_millis(ms));
                AppMsg::Quit
            })
        } else {
            Cmd::none()
        }
    }

    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message> {
        match msg {
            AppMsg::Quit => Cmd::quit(),
            AppMsg::LogOut => self.log_out(),

            AppMsg::ToggleHelp => {
                self.help_visible = !self.help_visible;
                Cmd::none()
            }

            AppMsg::ToggleAccountMenu => {
                self.account_menu_open = !self.account_menu_open;
                Cmd::none()
            }

            AppMsg::Tick => {
                self.tick_count += 1;
                self.dashboard.tick(self.tick_count);
                Cmd::none()
            }

            AppMsg::Resize { width, height } => {
                self.terminal_width = width;
                self.terminal_height = height;
                Cmd::none()
            }

            AppMsg::ScanFinished { id, outcome } => {
                self.dashboard.apply_scan(id, outcome);
                Cmd::none()
            }

            AppMsg::ScreenEvent(event) => self.handle_event(event),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let area = Rect::from_size(frame.buffer.width(), frame.buffer.height());
        frame
            .buffer
            .fill(area, RenderCell::default().with_bg(theme::bg::DEEP.into()));
        if area.is_empty() {
            return;
        }

        let main = if area.width >= NAV_RAIL_MIN_TERMINAL {
            let cols = Flex::horizontal()
                .constraints([Constraint::Fixed(NAV_RAIL_WIDTH), Constraint::Min(1)])
                .split(area);
            chrome::render_nav_rail(frame, cols[0]);
            cols[1]
        } else {
            area
        };

        // Header, ticker, content, status bar.
        let rows = Flex::vertical()
            .constraints([
                Constraint::Fixed(1),
                Constraint::Fixed(1),
                Constraint::Min(1),
                Constraint::Fixed(1),
            ])
            .split(main);

        let toggle = chrome::render_header(self.account_menu_open, frame, rows[0]);
        self.account_toggle.set(toggle);
        DealTicker::new(self.tick_count).render(rows[1], frame);

        let content_block = Block::new()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(self.dashboard.title())
            .title_alignment(Alignment::Center)
            .style(theme::content_border());
        let inner = content_block.inner(rows[2]);
        content_block.render(rows[2], frame);
        self.dashboard.view(frame, inner);

        let state = self.dashboard.state();
        let status = StatusBarState {
            busy: state.is_busy(),
            in_flight: state.in_flight(),
            last_applied: state.last_applied(),
            records: state.assets().len(),
            last_error: state.last_error(),
            source_name: self.dashboard.source_name(),
            tick_count: self.tick_count,
            terminal_width: if self.terminal_width > 0 {
                self.terminal_width
            } else {
                area.width
            },
            terminal_height: if self.terminal_height > 0 {
                self.terminal_height
            } else {
                area.height
            },
        };
        chrome::render_status_bar(&status, frame, rows[3]);

        if self.account_menu_open {
            let menu = chrome::render_account_menu(toggle, frame, area);
            self.account_menu.set(menu);
        } else {
            self.account_menu.set(Rect::default());
        }

        if self.help_visible {
            let bindings = self.dashboard.keybindings();
            chrome::render_help_overlay(self.dashboard.title(), &bindings, frame, area);
        }
    }

    fn subscriptions(&self) -> Vec<Box<dyn Subscription<Self::Message>>> {
        vec![Box::new(Every::new(Duration::from_millis(100), || {
            AppMsg::Tick
        }))]
    }
}
