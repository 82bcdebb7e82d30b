#![forbid(unsafe_code)]

//! Opportunity card.

use asset_hunter_core::OpportunityRecord;
use ftui_core::geometry::Rect;
use ftui_render::frame::Frame;
use ftui_style::{Style, StyleFlags};
use ftui_text::{WrapMode, display_width, truncate_with_ellipsis, wrap_text};
use ftui_widgets::Widget;
use ftui_widgets::badge::Badge;
use ftui_widgets::block::{Alignment, Block};
use ftui_widgets::borders::{BorderType, Borders};
use ftui_widgets::paragraph::Paragraph;

use crate::theme;

/// Rows a card occupies, borders included.
pub const CARD_HEIGHT: u16 = 9;
/// Narrowest card that still shows every row legibly.
pub const CARD_MIN_WIDTH: u16 = 28;

const DESCRIPTION_LINES: usize = 2;

/// One record rendered as a card. Activation is handled by the owner.
#[derive(Debug, Clone, Copy)]
pub struct DealCard<'a> {
    record: &'a OpportunityRecord,
    focused: bool,
}

impl<'a> DealCard<'a> {
    pub fn new(record: &'a OpportunityRecord) -> Self {
        Self {
            record,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

/// Wrap `text` to `width` and keep at most `max_lines`, marking the cut.
pub fn clamp_lines(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return Vec::new();
    }
    let mut lines = wrap_text(text, width, WrapMode::Word);
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let room = width.saturating_sub(1);
            let mut cut = truncate_with_ellipsis(last, room, "");
            cut.push('…');
            *last = cut;
        }
    }
    lines
}

impl Widget for DealCard<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        if area.is_empty() {
            return;
        }

        let block = Block::new()
            .borders(Borders::ALL)
            .border_type(if self.focused {
                BorderType::Double
            } else {
                BorderType::Rounded
            })
            .style(theme::card_border(self.focused));
        let inner = block.inner(area);
        block.render(area, frame);
        if inner.width < 4 || inner.height == 0 {
            return;
        }

        let surface = Style::new().bg(theme::bg::SURFACE);
        let row = |i: u16| Rect::new(inner.x + 1, inner.y + i, inner.width.saturating_sub(2), 1);
        let width = inner.width.saturating_sub(2) as usize;
        let rows = inner.height;
        let category = self.record.category;

        // Row 0: category badge + live marker.
        let badge = Badge::new(category.label()).with_style(
            Style::new()
                .bg(theme::bg::HIGHLIGHT)
                .fg(theme::category_accent(category))
                .attrs(StyleFlags::BOLD),
        );
        let r0 = row(0);
        let badge_w = badge.width().min(r0.width);
        badge.render(Rect::new(r0.x, r0.y, badge_w, 1), frame);
        let marker = "● Active Opportunity";
        if (r0.width as usize) >= badge_w as usize + display_width(marker) + 1 {
            Paragraph::new(marker)
                .style(surface.fg(theme::fg::MUTED))
                .alignment(Alignment::Right)
                .render(
                    Rect::new(r0.x + badge_w, r0.y, r0.width - badge_w, 1),
                    frame,
                );
        }

        // Row 1: title.
        if rows > 1 {
            let style = if self.focused {
                surface.fg(theme::BRAND).attrs(StyleFlags::BOLD)
            } else {
                surface.fg(theme::fg::PRIMARY).attrs(StyleFlags::BOLD)
            };
            Paragraph::new(truncate_with_ellipsis(&self.record.title, width, "…"))
                .style(style)
                .render(row(1), frame);
        }

        // Rows 2-3: description, clipped to two lines.
        for (i, line) in clamp_lines(&self.record.description, width, DESCRIPTION_LINES)
            .into_iter()
            .enumerate()
        {
            let y = 2 + i as u16;
            if y >= rows {
                break;
            }
            Paragraph::new(line)
                .style(surface.fg(theme::fg::MUTED))
                .render(row(y), frame);
        }

        // Row 4: divider.
        if rows > 4 {
            Paragraph::new("─".repeat(width))
                .style(surface.fg(theme::fg::DISABLED))
                .render(row(4), frame);
        }

        // Row 5: value label + revenue pill.
        if rows > 5 {
            Paragraph::new("EST. VALUE")
                .style(surface.fg(theme::fg::MUTED))
                .render(row(5), frame);
            let pill = format!("↗ {}", self.record.revenue);
            let pill_w = display_width(&pill).min(width.saturating_sub(12)) as u16;
            if pill_w > 2 {
                let r = row(5);
                Paragraph::new(truncate_with_ellipsis(&pill, pill_w as usize, "…"))
                    .style(
                        Style::new()
                            .bg(theme::bg::HIGHLIGHT)
                            .fg(theme::accent::SUCCESS),
                    )
                    .render(Rect::new(r.right() - pill_w, r.y, pill_w, 1), frame);
            }
        }

        // Row 6: price + analyze affordance.
        if rows > 6 {
            let action = "Analyze →";
            let action_w = display_width(action);
            let price_room = width.saturating_sub(action_w + 1);
            Paragraph::new(truncate_with_ellipsis(&self.record.price, price_room, "…"))
                .style(surface.fg(theme::fg::PRIMARY).attrs(StyleFlags::BOLD))
                .render(row(6), frame);
            if width > action_w {
                let style = if self.focused {
                    Style::new()
                        .bg(theme::BRAND)
                        .fg(theme::fg::PRIMARY)
                        .attrs(StyleFlags::BOLD)
                } else {
                    surface.fg(theme::fg::MUTED)
                };
                let r = row(6);
                Paragraph::new(action)
                    .style(style)
                    .render(Rect::new(r.right() - action_w as u16, r.y, action_w as u16, 1), frame);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_hunter_core::mock_batch;
    use ftui_harness::buffer_to_text;
    use ftui_render::grapheme_pool::GraphemePool;

    fn render(record: &OpportunityRecord, focused: bool, w: u16, h: u16) -> String {
        let mut pool = GraphemePool::new();
        let mut frame = Frame::new(w, h, &mut pool);
        DealCard::new(record)
            .focused(focused)
            .render(Rect::new(0, 0, w, h), &mut frame);
        buffer_to_text(&frame.buffer)
    }

    #[test]
    fn card_shows_every_field() {
        let batch = mock_batch();
        let record = &batch.records()[1];
        let text = render(record, false, 48, CARD_HEIGHT);
        assert!(text.contains("Ghost API"));
        assert!(text.contains("Active Opportunity"));
        assert!(text.contains("Shadow API: /v1/internal/admin"));
        assert!(text.contains("EST. VALUE"));
        assert!(text.contains("$50,000+"));
        assert!(text.contains("Critical Vulnerability"));
        assert!(text.contains("Analyze →"));
    }

    #[test]
    fn zombie_badge_label() {
        let batch = mock_batch();
        let text = render(&batch.records()[0], true, 48, CARD_HEIGHT);
        assert!(text.contains("Zombie Code"));
    }

    #[test]
    fn description_is_clipped_to_two_lines() {
        let lines = clamp_lines(
            "one two three four five six seven eight nine ten eleven twelve",
            12,
            2,
        );
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with('…'));
        assert!(lines.iter().all(|l| display_width(l) <= 12));
    }

    #[test]
    fn short_description_is_untouched() {
        assert_eq!(clamp_lines("short", 20, 2), vec!["short".to_string()]);
        assert!(clamp_lines("anything", 0, 2).is_empty());
    }

    #[test]
    fn tiny_areas_do_not_panic() {
        let batch = mock_batch();
        let record = &batch.records()[2];
        for (w, h) in [(1, 1), (3, 3), (10, 4), (CARD_MIN_WIDTH, CARD_HEIGHT), (80, 2)] {
            let _ = render(record, true, w, h);
        }
        let mut pool = GraphemePool::new();
        let mut frame = Frame::new(10, 10, &mut pool);
        DealCard::new(record).render(Rect::new(0, 0, 0, 0), &mut frame);
    }
}
