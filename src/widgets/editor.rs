use ratatui::{
    buffer::Buffer as TuiBuffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::buffer::Buffer;

const LINE_NUMBER_COLOR: Color = Color::Rgb(100, 100, 120);

pub struct Editor<'a> {
    pub buffer: &'a Buffer,
    pub scroll_offset: (usize, usize), // (row, col) offset for viewport scrolling
    pub show_line_numbers: bool,       // Whether to display line numbers
    pub background: Color,
}

impl<'a> Editor<'a> {
    pub fn new(buffer: &'a Buffer) -> Self {
        Self {
            buffer,
            scroll_offset: (0, 0),
            show_line_numbers: true, // Enable line numbers by default
            background: Color::Black,
        }
    }

    pub fn scroll_offset(mut self, scroll_offset: (usize, usize)) -> Self {
        self.scroll_offset = scroll_offset;
        self
    }

    pub fn show_line_numbers(mut self, show_line_numbers: bool) -> Self {
        self.show_line_numbers = show_line_numbers;
        self
    }

    pub fn background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }
}

impl Widget for Editor<'_> {
    fn render(self, area: Rect, buf: &mut TuiBuffer) {
        // Determine visible portion of the buffer
        let start_row = self.scroll_offset.0;
        let end_row = (start_row + area.height as usize).min(self.buffer.content.len());
        let h_offset = self.scroll_offset.1;

        // Use consistent width based on total buffer size, not visible area
        let line_number_width = if self.show_line_numbers {
            self.buffer.line_number_width()
        } else {
            0
        };

        let mut lines = Vec::with_capacity(end_row.saturating_sub(start_row));
        for i in start_row..end_row {
            let line = &self.buffer.content[i];

            // Skip whole characters so multi-byte text never splits
            let visible_content: String = line.chars().skip(h_offset).collect();

            if self.show_line_numbers {
                let line_num_str = format!("{:>width$}", i + 1, width = line_number_width - 1);
                lines.push(Line::from(vec![
                    Span::styled(line_num_str, Style::default().fg(LINE_NUMBER_COLOR)),
                    Span::raw(" "), // Separator
                    Span::raw(visible_content),
                ]));
            } else {
                lines.push(Line::from(visible_content));
            }
        }

        // Create paragraph with all visible lines (no block, just content)
        let paragraph =
            Paragraph::new(lines).style(Style::default().fg(Color::White).bg(self.background));
        paragraph.render(area, buf);
    }
}
