//! TextBlock Widget
//!
//! Borderless word-wrapped text, cut at the area's height.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;
use textwrap::wrap;

/// A borderless, word-wrapped text block
pub struct TextBlock<'a> {
    content: &'a str,
    style: Style,
}

impl<'a> TextBlock<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            style: Style::default(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Lines the content wraps to at `width`
    pub fn wrapped_lines(&self, width: u16) -> Vec<String> {
        if width == 0 {
            return Vec::new();
        }
        self.content
            .lines()
            .flat_map(|line| {
                if line.is_empty() {
                    vec![String::new()]
                } else {
                    wrap(line, width as usize)
                        .into_iter()
                        .map(|cow| cow.to_string())
                        .collect()
                }
            })
            .collect()
    }

    /// Rows needed to show all of the content at `width`
    pub fn height(&self, width: u16) -> u16 {
        u16::try_from(self.wrapped_lines(width).len()).unwrap_or(u16::MAX)
    }
}

impl Widget for TextBlock<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (i, line) in self
            .wrapped_lines(area.width)
            .iter()
            .take(area.height as usize)
            .enumerate()
        {
            let y = area.y + i as u16;
            buf.set_stringn(area.x, y, line, area.width as usize, self.style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_to_width() {
        let block = TextBlock::new("Could not connect to the classification service");
        let lines = block.wrapped_lines(20);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
        assert_eq!(block.height(20) as usize, lines.len());
    }

    #[test]
    fn test_keeps_blank_lines() {
        let block = TextBlock::new("one\n\ntwo");
        assert_eq!(block.wrapped_lines(40), vec!["one", "", "two"]);
    }

    #[test]
    fn test_zero_width_is_empty() {
        assert!(TextBlock::new("text").wrapped_lines(0).is_empty());
    }
}
