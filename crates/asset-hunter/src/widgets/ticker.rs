#![forbid(unsafe_code)]

//! Scrolling "LIVE FEED" strip.
//!
//! The five feed items are laid end to end and scrolled left one column per
//! tick. The strip wraps at the width of one copy, so the scroll is seamless
//! for any viewport width.

use ftui_core::geometry::Rect;
use ftui_render::frame::Frame;
use ftui_style::{Style, StyleFlags};
use ftui_text::{Line, Span, Text, display_width};
use ftui_widgets::Widget;
use ftui_widgets::paragraph::Paragraph;

use crate::theme;

/// Constant feed items.
pub const TICKER_ITEMS: [&str; 5] = [
    "Github Zombie found: repo/legacy-core ($12k Est)",
    "Chrome Ghost detected: /api/v1/admin-hidden",
    "New Asset: user-db-snapshot.sql",
    "Scanning network specific nodes...",
    "Gemini 3 Flash: Valuation complete for Asset #492",
];

const LABEL: &str = " ● LIVE FEED ";
const ITEM_MARK: &str = "✦ ";
const ITEM_GAP: &str = "    ";

/// One copy of the strip: every item with its marker and trailing gap.
pub fn strip() -> String {
    let mut out = String::new();
    for item in TICKER_ITEMS {
        out.push_str(ITEM_MARK);
        out.push_str(item);
        out.push_str(ITEM_GAP);
    }
    out
}

/// Display width of one copy of the strip.
pub fn strip_width() -> usize {
    display_width(&strip())
}

/// The `width` columns visible after scrolling `offset` columns to the left.
pub fn visible_window(offset: usize, width: usize) -> String {
    let one = strip();
    let cycle: Vec<char> = one.chars().collect();
    if cycle.is_empty() || width == 0 {
        return String::new();
    }
    let total = strip_width();
    let mut skip = offset % total;
    let mut idx = 0;
    let mut buf = [0u8; 4];
    // Drop whole columns from the front.
    while skip > 0 {
        let w = display_width(cycle[idx].encode_utf8(&mut buf)).max(1);
        skip = skip.saturating_sub(w);
        idx = (idx + 1) % cycle.len();
    }
    let mut out = String::with_capacity(width);
    let mut used = 0;
    while used < width {
        let c = cycle[idx];
        let w = display_width(c.encode_utf8(&mut buf)).max(1);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
        idx = (idx + 1) % cycle.len();
    }
    out
}

/// Scrolling feed widget. A pure function of the tick count.
#[derive(Debug, Clone, Copy, Default)]
pub struct DealTicker {
    tick: u64,
}

impl DealTicker {
    pub fn new(tick: u64) -> Self {
        Self { tick }
    }

    /// Scroll offset in columns, wrapped to one copy.
    pub fn offset(&self) -> usize {
        (self.tick % strip_width() as u64) as usize
    }
}

impl Widget for DealTicker {
    fn render(&self, area: Rect, frame: &mut Frame) {
        if area.is_empty() {
            return;
        }
        let bar = Style::new().bg(theme::bg::BASE).fg(theme::fg::MUTED);
        let label_style = Style::new()
            .bg(theme::bg::SURFACE)
            .fg(theme::fg::SECONDARY)
            .attrs(StyleFlags::BOLD);
        let dot_style = Style::new()
            .bg(theme::bg::SURFACE)
            .fg(theme::accent::SUCCESS)
            .attrs(StyleFlags::BOLD);

        let label_width = display_width(LABEL) + 1;
        let feed_width = (area.width as usize).saturating_sub(label_width);

        let mut spans = Vec::with_capacity(4);
        spans.push(Span::styled(" ●", dot_style));
        spans.push(Span::styled(" LIVE FEED ", label_style));
        spans.push(Span::styled("│", Style::new().bg(theme::bg::BASE).fg(theme::fg::DISABLED)));
        spans.push(Span::styled(visible_window(self.offset(), feed_width), bar));

        Paragraph::new(Text::from_lines([Line::from_spans(spans)]))
            .style(bar)
            .render(Rect::new(area.x, area.y, area.width, 1), frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftui_harness::buffer_to_text;
    use ftui_render::grapheme_pool::GraphemePool;
    use proptest::prelude::*;

    fn render(tick: u64, width: u16) -> String {
        let mut pool = GraphemePool::new();
        let mut frame = Frame::new(width, 1, &mut pool);
        DealTicker::new(tick).render(Rect::new(0, 0, width, 1), &mut frame);
        buffer_to_text(&frame.buffer)
    }

    #[test]
    fn strip_holds_every_item_once() {
        let s = strip();
        for item in TICKER_ITEMS {
            assert_eq!(s.matches(item).count(), 1, "{item}");
        }
    }

    #[test]
    fn label_and_first_item_at_tick_zero() {
        let text = render(0, 120);
        assert!(text.contains("LIVE FEED"));
        assert!(text.contains("Github Zombie found: repo/legacy-core ($12k Est)"));
    }

    #[test]
    fn scrolls_left_with_ticks() {
        let at0 = visible_window(0, 20);
        let at1 = visible_window(1, 20);
        assert_eq!(&at0[at0.char_indices().nth(1).unwrap().0..], &at1[..at1.len() - 1]);
    }

    #[test]
    fn wraps_at_one_copy() {
        let w = strip_width();
        assert_eq!(visible_window(w, 40), visible_window(0, 40));
        assert_eq!(DealTicker::new(w as u64).offset(), 0);
    }

    #[test]
    fn viewport_wider_than_strip_is_filled() {
        let w = strip_width();
        let window = visible_window(3, w * 2 + 5);
        assert_eq!(display_width(&window), w * 2 + 5);
    }

    #[test]
    fn empty_area_renders_nothing() {
        let mut pool = GraphemePool::new();
        let mut frame = Frame::new(10, 1, &mut pool);
        DealTicker::new(5).render(Rect::new(0, 0, 0, 0), &mut frame);
        assert!(buffer_to_text(&frame.buffer).trim().is_empty());
    }

    #[test]
    fn narrow_area_keeps_label() {
        let text = render(7, 14);
        assert!(text.contains("LIVE FEED"));
    }

    proptest! {
        #[test]
        fn window_width_is_exact(offset in 0usize..5_000, width in 0usize..400) {
            prop_assert_eq!(display_width(&visible_window(offset, width)), width);
        }

        #[test]
        fn window_is_periodic(offset in 0usize..5_000, width in 1usize..120) {
            prop_assert_eq!(
                visible_window(offset, width),
                visible_window(offset + strip_width(), width)
            );
        }
    }
}
