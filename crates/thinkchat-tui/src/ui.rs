use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block as Panel, Borders, List, ListItem, Paragraph},
};
use thinkchat_core::render::ERROR_HINT;
use thinkchat_core::settings::{MAX_TEMPERATURE, TEMPERATURE_STEP};
use thinkchat_core::{Block, ChatMessage, ChatRole, Theme};

use crate::app::{App, FocusPane, InputMode, EXAMPLE_PROMPTS};
use crate::markup::{decode_entities, parse_fragment, Segment};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Colors for one display mode.
#[derive(Debug, Clone, Copy)]
struct Palette {
    bg: Color,
    fg: Color,
    dim: Color,
    border: Color,
    focus: Color,
    user: Color,
    assistant: Color,
    step: Color,
    answer: Color,
    code: Color,
    error: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                bg: Color::Black,
                fg: Color::White,
                dim: Color::DarkGray,
                border: Color::DarkGray,
                focus: Color::Cyan,
                user: Color::Cyan,
                assistant: Color::Yellow,
                step: Color::LightBlue,
                answer: Color::LightGreen,
                code: Color::LightMagenta,
                error: Color::LightRed,
            },
            Theme::Light => Self {
                bg: Color::White,
                fg: Color::Black,
                dim: Color::Gray,
                border: Color::Gray,
                focus: Color::Blue,
                user: Color::Blue,
                assistant: Color::Magenta,
                step: Color::Blue,
                answer: Color::Green,
                code: Color::Red,
                error: Color::Red,
            },
        }
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let palette = Palette::for_theme(app.theme);

    frame.render_widget(Panel::default().style(Style::default().bg(palette.bg).fg(palette.fg)), area);

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    // Chat on the left, settings and examples on the right
    let [chat_column, side_column] = Layout::horizontal([
        Constraint::Percentage(70),
        Constraint::Percentage(30),
    ])
    .areas(body_area);

    let [chat_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(app.input_height()),
    ])
    .areas(chat_column);

    let [settings_area, examples_area] = Layout::vertical([
        Constraint::Length(6),
        Constraint::Min(0),
    ])
    .areas(side_column);

    // Store areas for mouse hit-testing
    app.chat_area = Some(chat_area);
    app.input_area = Some(input_area);
    app.examples_area = Some(examples_area);

    render_chat(app, &palette, frame, chat_area);
    render_input(app, &palette, frame, input_area);
    render_settings(app, &palette, frame, settings_area);
    render_examples(app, &palette, frame, examples_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" thinkchat ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(app.client.base_url().to_string(), Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn border_color(focused: bool, palette: &Palette) -> Color {
    if focused {
        palette.focus
    } else {
        palette.border
    }
}

fn segment_span(segment: &Segment, palette: &Palette) -> Span<'static> {
    let mut style = Style::default();
    if segment.style.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if segment.style.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if segment.style.code {
        style = style.fg(palette.code);
    }
    Span::styled(segment.text.clone(), style)
}

fn fragment_lines(html: &str, palette: &Palette, indent: &str) -> Vec<Line<'static>> {
    parse_fragment(html)
        .iter()
        .map(|segments| {
            let mut spans = vec![Span::raw(indent.to_string())];
            spans.extend(segments.iter().map(|s| segment_span(s, palette)));
            Line::from(spans)
        })
        .collect()
}

fn message_lines(message: &ChatMessage, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    let (label, color) = match message.role {
        ChatRole::User => ("You:", palette.user),
        ChatRole::Assistant => ("AI:", palette.assistant),
    };
    lines.push(Line::from(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));

    for block in &message.blocks {
        match block {
            // Literal text: no markup to read back
            Block::Text(text) => {
                lines.extend(text.split('\n').map(|line| Line::from(line.to_string())));
            }
            Block::Unstructured { html } => lines.extend(fragment_lines(html, palette, "")),
            Block::Step { number, title, html } => {
                lines.push(Line::from(Span::styled(
                    format!("Step {}: {}", number, decode_entities(title)),
                    Style::default().fg(palette.step).add_modifier(Modifier::BOLD),
                )));
                lines.extend(fragment_lines(html, palette, "  "));
            }
            Block::FinalAnswer { html } => {
                lines.push(Line::from(Span::styled(
                    "Final answer",
                    Style::default().fg(palette.answer).add_modifier(Modifier::BOLD),
                )));
                lines.extend(fragment_lines(html, palette, "  "));
            }
            Block::Error { message } => {
                lines.push(Line::from(Span::styled(
                    format!("! Error: {}", decode_entities(message)),
                    Style::default().fg(palette.error).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(ERROR_HINT, Style::default().fg(palette.dim))));
            }
        }
    }

    lines.push(Line::default());
    lines
}

/// Split text into alternating runs of whitespace and non-whitespace.
fn split_runs(text: &str) -> Vec<(&str, bool)> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (i, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        if let Some(prev) = in_space.filter(|prev| *prev != space) {
            runs.push((&text[start..i], prev));
            start = i;
        }
        in_space = Some(space);
    }
    if let Some(space) = in_space {
        runs.push((&text[start..], space));
    }

    runs
}

/// Word-wrap a styled line into rows of at most `width` columns.
/// Words wider than a whole row are split by character.
fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut rows: Vec<Line<'static>> = Vec::new();
    let mut row: Vec<Span<'static>> = Vec::new();
    let mut row_width = 0;

    for span in line.spans {
        let style = span.style;
        for (word, is_space) in split_runs(&span.content) {
            let word_width = word.width();

            if row_width + word_width <= width {
                row.push(Span::styled(word.to_string(), style));
                row_width += word_width;
            } else if is_space {
                // Whitespace at a break is dropped
                if row_width > 0 {
                    rows.push(Line::from(std::mem::take(&mut row)));
                    row_width = 0;
                }
            } else if row_width > 0 && word_width <= width {
                rows.push(Line::from(std::mem::take(&mut row)));
                row.push(Span::styled(word.to_string(), style));
                row_width = word_width;
            } else {
                for ch in word.chars() {
                    let ch_width = ch.width().unwrap_or(0);
                    if row_width > 0 && row_width + ch_width > width {
                        rows.push(Line::from(std::mem::take(&mut row)));
                        row_width = 0;
                    }
                    row.push(Span::styled(ch.to_string(), style));
                    row_width += ch_width;
                }
            }
        }
    }
    rows.push(Line::from(row));

    rows
}

fn render_chat(app: &mut App, palette: &Palette, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Transcript;
    let chat_block = Panel::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(focused, palette)))
        .title(" Conversation ");

    let transcript = &app.session.transcript;
    let mut lines: Vec<Line<'static>> = Vec::new();

    if transcript.is_empty() && !app.is_busy() {
        lines.push(Line::from(Span::styled(
            "Ask a question, or pick an example on the right...",
            Style::default().fg(palette.dim),
        )));
    }

    for message in transcript.messages() {
        lines.extend(message_lines(message, palette));
    }

    // Loading indicator
    if app.is_busy() {
        lines.push(Line::from(Span::styled(
            "AI:",
            Style::default().fg(palette.assistant).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(palette.dim).add_modifier(Modifier::ITALIC),
        )));
    }

    // Inner size minus borders
    let inner_height = area.height.saturating_sub(2);
    let inner_width = area.width.saturating_sub(2);
    // Wrap here so the scroll bounds count exactly the rows that get drawn
    let rows: Vec<Line<'static>> = lines
        .into_iter()
        .flat_map(|line| wrap_line(line, inner_width as usize))
        .collect();
    let total_rows = u16::try_from(rows.len()).unwrap_or(u16::MAX);
    app.max_chat_scroll = total_rows.saturating_sub(inner_height);

    if app.session.transcript.take_scroll_request() {
        app.chat_scroll = app.max_chat_scroll;
    }
    app.chat_scroll = app.chat_scroll.min(app.max_chat_scroll);

    let chat = Paragraph::new(Text::from(rows))
        .block(chat_block)
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &App, palette: &Palette, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let busy = app.is_busy();

    let title = if busy {
        " Waiting for response... "
    } else {
        " Ask (Enter to send, Shift+Enter for newline) "
    };
    let input_block = Panel::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(editing && !busy, palette)))
        .title(title);

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let (row, col) = app.cursor_row_col();

    // Keep the cursor visible in both directions
    let row_offset = (row + 1).saturating_sub(inner_height);
    let col_offset = (col + 1).saturating_sub(inner_width);

    let text_style = if busy {
        Style::default().fg(palette.dim)
    } else {
        Style::default().fg(palette.fg)
    };
    let input = Paragraph::new(app.query_input.as_str())
        .style(text_style)
        .block(input_block)
        .scroll((row_offset as u16, col_offset as u16));

    frame.render_widget(input, area);

    // Show cursor when editing
    if editing && !busy {
        frame.set_cursor_position((
            area.x + 1 + (col - col_offset) as u16,
            area.y + 1 + (row - row_offset) as u16,
        ));
    }
}

fn render_settings(app: &App, palette: &Palette, frame: &mut Frame, area: Rect) {
    let settings = &app.settings;

    let notches = (MAX_TEMPERATURE / TEMPERATURE_STEP).round() as usize;
    let filled = ((settings.temperature / TEMPERATURE_STEP).round() as usize).min(notches);
    let slider = format!("{}{}", "█".repeat(filled), "░".repeat(notches - filled));

    let on_off = |enabled: bool| if enabled { "on" } else { "off" };
    let key = |k: &'static str| Span::styled(k, Style::default().fg(palette.dim));

    let lines = vec![
        Line::from(vec![
            Span::raw("Temperature "),
            Span::styled(slider, Style::default().fg(palette.focus)),
            Span::raw(format!(" {:.1} ", settings.temperature)),
            key("-/+"),
        ]),
        Line::from(vec![
            Span::raw(format!("Structured output: {} ", on_off(settings.structured_output))),
            key("s"),
        ]),
        Line::from(vec![
            Span::raw(format!("Use tools: {} ", on_off(settings.use_tools))),
            key("o"),
        ]),
        Line::from(vec![
            Span::raw(format!("Theme: {} ", app.theme.as_str())),
            key("t"),
        ]),
    ];

    let panel = Paragraph::new(lines).block(
        Panel::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .title(" Settings "),
    );
    frame.render_widget(panel, area);
}

fn render_examples(app: &mut App, palette: &Palette, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Examples;

    let items: Vec<ListItem> = EXAMPLE_PROMPTS
        .iter()
        .enumerate()
        .map(|(i, prompt)| ListItem::new(format!("{}. {}", i + 1, prompt)))
        .collect();

    let list = List::new(items)
        .block(
            Panel::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color(focused, palette)))
                .title(" Examples (1-3 or click) "),
        )
        .highlight_style(if focused {
            Style::default().bg(palette.focus).fg(palette.bg).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        })
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.examples_state);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Editing => " EDIT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = if let Some(status) = &app.status_message {
        vec![Span::styled(format!(" {} ", status), label_style)]
    } else {
        match app.input_mode {
            InputMode::Editing => vec![
                Span::styled(" Enter ", key_style),
                Span::styled(" send ", label_style),
                Span::styled(" Shift+Enter ", key_style),
                Span::styled(" newline ", label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" stop typing ", label_style),
            ],
            InputMode::Normal => vec![
                Span::styled(" i ", key_style),
                Span::styled(" type ", label_style),
                Span::styled(" Tab ", key_style),
                Span::styled(" focus ", label_style),
                Span::styled(" j/k ", key_style),
                Span::styled(" scroll ", label_style),
                Span::styled(" 1-3 ", key_style),
                Span::styled(" example ", label_style),
                Span::styled(" e ", key_style),
                Span::styled(" export ", label_style),
                Span::styled(" q ", key_style),
                Span::styled(" quit ", label_style),
            ],
        }
    };

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use thinkchat_core::{render_error, render_result, ReasoningResult, ReasoningStep};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_step_message_lines() {
        let palette = Palette::for_theme(Theme::Dark);
        let message = ChatMessage::assistant(render_result(&ReasoningResult::Steps {
            steps: vec![ReasoningStep {
                title: "Add <apples>".to_string(),
                content: "5 - 2 = **3**".to_string(),
            }],
            final_answer: Some("6".to_string()),
        }));

        let texts: Vec<String> = message_lines(&message, &palette).iter().map(line_text).collect();
        assert_eq!(texts, vec!["AI:", "Step 1: Add <apples>", "  5 - 2 = 3", "Final answer", "  6", ""]);
    }

    #[test]
    fn test_error_message_lines() {
        let palette = Palette::for_theme(Theme::Light);
        let message = ChatMessage::assistant(vec![render_error("Server responded with status: 500")]);
        let texts: Vec<String> = message_lines(&message, &palette).iter().map(line_text).collect();
        assert_eq!(texts[1], "! Error: Server responded with status: 500");
        assert_eq!(texts[2], ERROR_HINT);
    }

    #[test]
    fn test_user_text_is_shown_verbatim() {
        let palette = Palette::for_theme(Theme::Light);
        let message = ChatMessage::user("what is <b>?\nsecond line");
        let texts: Vec<String> = message_lines(&message, &palette).iter().map(line_text).collect();
        assert_eq!(texts, vec!["You:", "what is <b>?", "second line", ""]);
    }

    fn row_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_wrap_line_breaks_at_word_boundaries() {
        let prose = "aaaaaa bbbbbb cccccc dddddd ".repeat(40);
        let rows = wrap_line(Line::from(prose), 40);

        // Five 6-letter words fill 34 columns; a sixth would need 41
        assert_eq!(rows.len(), 32);
        assert!(rows.iter().all(|row| row.width() <= 40));
        assert_eq!(row_text(&rows[1]).trim_end(), "bbbbbb cccccc dddddd aaaaaa bbbbbb");
    }

    #[test]
    fn test_wrap_line_splits_long_words_and_keeps_styles() {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let line = Line::from(vec![Span::raw("ab "), Span::styled("cdefghij", bold)]);
        let rows = wrap_line(line, 4);

        let texts: Vec<String> = rows.iter().map(row_text).collect();
        assert_eq!(texts, vec!["ab c", "defg", "hij"]);
        assert_eq!(rows[2].spans[0].style, bold);
    }

    #[test]
    fn test_wrap_line_keeps_empty_line() {
        assert_eq!(wrap_line(Line::default(), 10).len(), 1);
        assert_eq!(wrap_line(Line::from("short"), 0).len(), 5);
    }

    #[test]
    fn test_auto_scroll_shows_last_line_of_long_answer() {
        use ratatui::{backend::TestBackend, Terminal};
        use thinkchat_core::ReasonClient;

        let mut app = App::new(ReasonClient::new("http://127.0.0.1:1"), Theme::Dark, None);
        let content = format!("{}\nLASTLINE", "aaaaaa bbbbbb cccccc dddddd ".repeat(40));
        app.session.transcript.push(ChatMessage::user("tell me a lot"));
        app.session
            .transcript
            .push(ChatMessage::assistant(render_result(&ReasoningResult::Unstructured { content })));

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let screen: Vec<String> = buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect();
        assert!(screen.iter().any(|row| row.contains("LASTLINE")));
        assert_eq!(app.chat_scroll, app.max_chat_scroll);

        // Scrolling further stays at the bottom
        app.scroll_down();
        assert_eq!(app.chat_scroll, app.max_chat_scroll);
    }
}
