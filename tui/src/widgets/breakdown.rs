//! Breakdown Widget
//!
//! Renders projected class entries as rows: color swatch, name and count.
//! With more than one entry each row also gets its share of the total as a
//! percentage and a bar.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use classifier_core::{total_count, DisplayEntry};

use crate::theme::{token_color, DIM_GRAY, INPUT_TEXT};

/// Swatch drawn before each class name
const SWATCH: &str = "■";

/// Widest bar drawn, in cells
const MAX_BAR_WIDTH: usize = 30;

/// Class breakdown rows
pub struct Breakdown<'a> {
    entries: &'a [DisplayEntry],
}

impl<'a> Breakdown<'a> {
    pub fn new(entries: &'a [DisplayEntry]) -> Self {
        Self { entries }
    }

    /// Whether rows carry a percentage and a bar
    pub fn shows_shares(&self) -> bool {
        self.entries.len() > 1
    }

    /// Text of each row, without styling
    pub fn rows(&self, width: usize) -> Vec<String> {
        let total = total_count(self.entries);
        let name_width = self
            .entries
            .iter()
            .map(|e| e.name.width())
            .max()
            .unwrap_or(0);
        let count_width = self
            .entries
            .iter()
            .map(|e| e.count.to_string().len())
            .max()
            .unwrap_or(1);

        self.entries
            .iter()
            .map(|entry| {
                let pad = " ".repeat(name_width.saturating_sub(entry.name.width()));
                let mut row = format!(
                    "{SWATCH} {}{pad}  {:>count_width$}",
                    entry.name, entry.count
                );

                if self.shows_shares() {
                    let share = entry.share_of(total);
                    row.push_str(&format!("  {:>3.0}%  ", share * 100.0));
                    let room = width.saturating_sub(row.width()).min(MAX_BAR_WIDTH);
                    row.push_str(&bar(share, room));
                }

                row
            })
            .collect()
    }
}

/// Bar of `room` cells filled to `share`
fn bar(share: f64, room: usize) -> String {
    let filled = ((share * room as f64).round() as usize).min(room);
    "█".repeat(filled)
}

impl Widget for Breakdown<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let rows = self.rows(area.width as usize);

        for (i, (entry, row)) in self
            .entries
            .iter()
            .zip(rows.iter())
            .take(area.height as usize)
            .enumerate()
        {
            let y = area.y + i as u16;
            let color = token_color(&entry.color);

            buf.set_stringn(area.x, y, row, area.width as usize, Style::default().fg(INPUT_TEXT));
            buf.set_stringn(area.x, y, SWATCH, area.width as usize, Style::default().fg(color));

            // Recolor the bar so it matches the swatch
            if self.shows_shares() {
                if let Some(start) = row.find('█') {
                    let x = area.x + row[..start].width() as u16;
                    let bar_text = &row[start..];
                    let room = area.width.saturating_sub(x - area.x) as usize;
                    buf.set_stringn(x, y, bar_text, room, Style::default().fg(color));
                }
            }
        }

        if self.entries.len() > area.height as usize {
            let hidden = self.entries.len() - area.height as usize;
            let y = area.y + area.height - 1;
            let note = format!("... and {hidden} more");
            buf.set_stringn(area.x, y, &note, area.width as usize, Style::default().fg(DIM_GRAY));
        }
    }
}
