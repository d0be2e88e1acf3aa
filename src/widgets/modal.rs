use ratatui::{
    buffer::Buffer as TuiBuffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Center a `width` x `height` box in `area`, `top_share` of the free rows above it
fn place(area: Rect, width: u16, height: u16, top_share: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / top_share),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(rows[1])[1]
}

/// A centered modal box for dialogs
pub struct Modal<'a> {
    title: &'a str,
    content: Vec<Line<'a>>,
    width: u16,
    height: u16,
}

impl<'a> Modal<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            content: Vec::new(),
            width: 60,
            height: 20,
        }
    }

    pub fn content(mut self, content: Vec<Line<'a>>) -> Self {
        self.content = content;
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: u16) -> Self {
        self.height = height;
        self
    }

    /// Where the modal lands inside `area`
    pub fn area(&self, area: Rect) -> Rect {
        place(area, self.width, self.height, 2)
    }
}

impl Widget for Modal<'_> {
    fn render(self, area: Rect, buf: &mut TuiBuffer) {
        let modal_area = self.area(area);

        // Nothing underneath may show through
        Clear.render(modal_area, buf);

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Black));

        let inner_area = block.inner(modal_area);
        block.render(modal_area, buf);

        Paragraph::new(self.content)
            .style(Style::default().fg(Color::White))
            .alignment(Alignment::Left)
            .render(inner_area, buf);
    }
}

/// Command palette listing menu commands
pub struct CommandPalette<'a> {
    input: &'a str,
    entries: Vec<(&'a str, &'a str)>,
    selected: usize,
}

impl<'a> CommandPalette<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            entries: Vec::new(),
            selected: 0,
        }
    }

    /// Commands to list, as (id, label)
    pub fn entries(mut self, entries: Vec<(&'a str, &'a str)>) -> Self {
        self.entries = entries;
        self
    }

    pub fn selected(mut self, selected: usize) -> Self {
        self.selected = selected.min(self.entries.len().saturating_sub(1));
        self
    }

    /// Where the palette lands inside `area`
    pub fn area(&self, area: Rect) -> Rect {
        // Input line, borders and at least one row for the list
        let height = (self.entries.len().max(1) as u16 + 3).min(15);
        let width = 70.min(area.width.saturating_sub(4));
        place(area, width, height, 3)
    }
}

impl Widget for CommandPalette<'_> {
    fn render(self, area: Rect, buf: &mut TuiBuffer) {
        let palette_area = self.area(area);
        Clear.render(palette_area, buf);

        let block = Block::default()
            .title(Span::styled(
                " Commands ",
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Rgb(0, 100, 200))
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(0, 150, 255)))
            .style(Style::default().bg(Color::Rgb(20, 20, 30)));

        let inner_area = block.inner(palette_area);
        block.render(palette_area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner_area);

        let input_line = Line::from(vec![
            Span::styled(
                "> ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(self.input, Style::default().fg(Color::White)),
        ]);
        Paragraph::new(input_line)
            .style(Style::default().bg(Color::Rgb(30, 30, 50)))
            .render(chunks[0], buf);

        let lines: Vec<Line> = if self.entries.is_empty() {
            vec![Line::from(Span::styled(
                "  No matching commands",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            self.entries
                .iter()
                .enumerate()
                .map(|(i, (id, label))| {
                    let style = if i == self.selected {
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::LightBlue)
                    };
                    Line::from(vec![
                        Span::styled(format!("  {label} "), style),
                        Span::styled(format!(" {id}"), Style::default().fg(Color::DarkGray)),
                    ])
                })
                .collect()
        };
        Paragraph::new(lines).render(chunks[1], buf);
    }
}
