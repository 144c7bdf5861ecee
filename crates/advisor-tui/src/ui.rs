use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        block::Title, Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
    },
};

use advisor_core::{ChatRole, SessionStatus};

use crate::app::{App, LandingSelection, Screen};
use crate::content;

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c == '*' && chars.peek() == Some(&'*') {
            chars.next();

            if !current_text.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_text)));
            }

            let mut bold_text = String::new();
            let mut found_close = false;
            while let Some(c) = chars.next() {
                if c == '*' && chars.peek() == Some(&'*') {
                    chars.next();
                    found_close = true;
                    break;
                }
                bold_text.push(c);
            }

            if found_close && !bold_text.is_empty() {
                spans.push(Span::styled(
                    bold_text,
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            } else {
                // No closing **, treat as literal
                current_text.push_str("**");
                current_text.push_str(&bold_text);
            }
        } else {
            current_text.push(c);
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    Line::from(spans)
}

/// Wrap text on word boundaries to fit within `width` columns.
///
/// Pre-wrapping keeps one `Line` per screen row, so scroll offsets and
/// section positions can be computed from line counts.
fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len == 0 {
            current_line = word.to_string();
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current_line.push(' ');
            current_line.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line = word.to_string();
            current_len = word_len;
        }

        // Hard-break words longer than the line
        while current_len > width {
            let split = current_line
                .char_indices()
                .nth(width)
                .map(|(i, _)| i)
                .unwrap_or(current_line.len());
            let rest = current_line.split_off(split);
            lines.push(std::mem::replace(&mut current_line, rest));
            current_len = current_line.chars().count();
        }
    }

    if !current_line.is_empty() || lines.is_empty() {
        lines.push(current_line);
    }

    lines
}

/// Wrap a line of markdown to `width` columns.
///
/// Markers are parsed before wrapping, so a bold run that crosses a row
/// boundary stays bold on both rows.
fn wrap_markdown_line(text: &str, width: usize) -> Vec<Line<'static>> {
    let parsed = parse_markdown_line(text);
    let plain: String = parsed.spans.iter().map(|span| span.content.as_ref()).collect();

    // Wrapping only rewrites whitespace, so visible chars keep their order
    let mut styles = parsed.spans.iter().flat_map(|span| {
        span.content
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(move |_| span.style)
    });

    wrap_text_to_width(&plain, width)
        .into_iter()
        .map(|row| {
            let mut spans: Vec<Span<'static>> = Vec::new();
            let mut style = Style::default();
            for c in row.chars() {
                if !c.is_whitespace() {
                    style = styles.next().unwrap_or_default();
                }
                match spans.last_mut() {
                    Some(last) if last.style == style => last.content.to_mut().push(c),
                    _ => spans.push(Span::styled(c.to_string(), style)),
                }
            }
            Line::from(spans)
        })
        .collect()
}

/// Scroll offset that keeps `line` inside a window of `height` rows
fn scroll_to_show(scroll: u16, line: u16, height: u16) -> u16 {
    let height = height.max(1);
    if line < scroll {
        line
    } else if line >= scroll + height {
        line + 1 - height
    } else {
        scroll
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.screen {
        Screen::Landing => render_landing(app, frame, body_area),
        Screen::Chat => render_chat(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", content::TITLE),
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ];

    if app.screen == Screen::Landing {
        spans.push(Span::raw("   "));
        spans.push(Span::styled("About", Style::default().fg(Color::White).underlined()));
        spans.push(Span::raw("  "));
        spans.push(Span::styled("FAQs", Style::default().fg(Color::White).underlined()));
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = match app.screen {
        Screen::Landing => (" HOME ", Style::default().bg(Color::Blue).fg(Color::White)),
        Screen::Chat => (" CHAT ", Style::default().bg(Color::Yellow).fg(Color::Black)),
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints: &[(&str, &str)] = match app.screen {
        Screen::Landing => &[
            (" j/k ", " select "),
            (" Enter ", " open "),
            (" a ", " about "),
            (" f ", " faqs "),
            (" c ", " chat "),
            (" q ", " quit "),
        ],
        Screen::Chat if app.is_thinking() => &[
            (" PgUp/PgDn ", " scroll "),
            (" Esc ", " logout "),
        ],
        Screen::Chat => &[
            (" Enter ", " send "),
            (" PgUp/PgDn ", " scroll "),
            (" Esc ", " logout "),
        ],
    };

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints.iter().flat_map(|&(key, label)| {
            [Span::styled(key, key_style), Span::styled(label, label_style)]
        }))
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn render_landing(app: &mut App, frame: &mut Frame, area: Rect) {
    app.landing_area = Some(area);
    app.chat_area = None;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    let width = inner.width.saturating_sub(4) as usize;

    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let selected = Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line: u16 = 0;

    // Hero
    lines.push(Line::default());
    lines.push(Line::styled(content::TITLE, heading).centered());
    for row in wrap_text_to_width(content::TAGLINE, width) {
        lines.push(Line::raw(row).centered());
    }
    lines.push(Line::default());

    let cta_style = if app.selection == LandingSelection::GetStarted {
        selected
    } else {
        Style::default().fg(Color::Cyan)
    };
    if app.selection == LandingSelection::GetStarted {
        selected_line = lines.len() as u16;
    }
    lines.push(Line::styled(format!("  {}  ➤  ", content::CALL_TO_ACTION), cta_style).centered());
    lines.push(Line::default());

    // About
    app.about_line = lines.len() as u16;
    for row in wrap_text_to_width(content::ABOUT_HEADING, width) {
        lines.push(Line::styled(format!("  {}", row), heading));
    }
    lines.push(Line::default());
    for paragraph in content::ABOUT {
        for row in wrap_text_to_width(paragraph, width) {
            lines.push(Line::raw(format!("  {}", row)));
        }
        lines.push(Line::default());
    }

    // FAQs
    app.faq_line = lines.len() as u16;
    lines.push(Line::styled("  FAQs", heading));
    lines.push(Line::default());
    for (i, faq) in app.faqs.iter().enumerate() {
        let is_selected = app.selection == LandingSelection::Faq(i);
        if is_selected {
            selected_line = lines.len() as u16;
        }
        let marker = if faq.expanded { "▾" } else { "▸" };
        let style = if is_selected {
            selected
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        for (n, row) in wrap_text_to_width(faq.question, width.saturating_sub(2)).into_iter().enumerate() {
            let prefix = if n == 0 { marker } else { " " };
            lines.push(Line::styled(format!("  {} {}", prefix, row), style));
        }
        if faq.expanded {
            for row in wrap_text_to_width(faq.answer, width.saturating_sub(4)) {
                lines.push(Line::styled(
                    format!("      {}", row),
                    Style::default().fg(Color::Gray),
                ));
            }
        }
        lines.push(Line::default());
    }

    let total = lines.len() as u16;
    let max_scroll = total.saturating_sub(inner.height);
    if app.follow_selection {
        app.landing_scroll = scroll_to_show(app.landing_scroll, selected_line, inner.height);
    }
    app.landing_scroll = app.landing_scroll.min(max_scroll);

    let landing = Paragraph::new(Text::from(lines))
        .block(block)
        .scroll((app.landing_scroll, 0));
    frame.render_widget(landing, area);

    if max_scroll > 0 {
        let mut scrollbar_state =
            ScrollbarState::new(max_scroll as usize).position(app.landing_scroll as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area,
            &mut scrollbar_state,
        );
    }
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Sidebar (left) and conversation (right)
    let [sidebar_area, main_area] = Layout::horizontal([
        Constraint::Length(24),
        Constraint::Min(0),
    ])
    .areas(area);

    app.landing_area = None;
    render_sidebar(app, frame, sidebar_area);

    // Only the greeting so far: centered first-screen layout
    if app.turns().len() <= 1 && !app.is_thinking() {
        app.chat_area = None;
        let [_, greeting_area, input_area, _] = Layout::vertical([
            Constraint::Percentage(35),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .areas(main_area);

        let greeting = app
            .turns()
            .first()
            .map(|t| t.text().to_string())
            .unwrap_or_default();
        frame.render_widget(
            Paragraph::new(Line::styled(
                greeting,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            greeting_area,
        );

        let [_, centered_input, _] = Layout::horizontal([
            Constraint::Percentage(15),
            Constraint::Percentage(70),
            Constraint::Percentage(15),
        ])
        .areas(input_area);
        render_input(app, frame, centered_input);
        return;
    }

    let [messages_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(main_area);

    render_messages(app, frame, messages_area);
    render_input(app, frame, input_area);
}

fn render_sidebar(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" ☰ ");

    let (status_text, status_color) = match app.session_status() {
        SessionStatus::Idle => ("● ready", Color::Green),
        SessionStatus::AwaitingResponse => ("● thinking", Color::Yellow),
        SessionStatus::Errored => ("● last reply failed", Color::Red),
    };

    let provider_name = app
        .session
        .as_ref()
        .map(|s| s.provider_kind().display_name())
        .unwrap_or_default();

    let lines = vec![
        Line::default(),
        Line::styled("( U )", Style::default().fg(Color::Magenta).bold()).centered(),
        Line::styled(content::USER_NAME, Style::default().bold()).centered(),
        Line::default(),
        Line::styled(status_text, Style::default().fg(status_color)).centered(),
        Line::styled(provider_name, Style::default().fg(Color::Gray)).centered(),
        Line::default(),
        Line::from(vec![
            Span::styled(" Esc ", Style::default().bg(Color::DarkGray).fg(Color::White)),
            Span::raw(" Logout"),
        ])
        .centered(),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_messages(app: &mut App, frame: &mut Frame, area: Rect) {
    app.chat_area = Some(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    let width = inner.width.saturating_sub(2) as usize;

    let mut lines: Vec<Line> = Vec::new();

    // The greeting is shown on the first screen only
    for turn in app.turns().iter().skip(1) {
        match turn.role() {
            ChatRole::User => {
                lines.push(
                    Line::styled(
                        "You ",
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    )
                    .right_aligned(),
                );
                for row in wrap_text_to_width(turn.text(), width.saturating_mul(3) / 4) {
                    lines.push(Line::raw(format!("{} ", row)).right_aligned());
                }
            }
            ChatRole::Assistant => {
                lines.push(Line::styled(
                    " Advisor",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ));
                for source_line in turn.text().lines() {
                    for mut line in wrap_markdown_line(source_line, width) {
                        line.spans.insert(0, Span::raw(" "));
                        lines.push(line);
                    }
                }
            }
        }
        lines.push(Line::default());
    }

    if app.is_thinking() {
        lines.push(Line::styled(
            " Advisor",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        // Animated dots: "Thinking .", "Thinking . .", "Thinking . . ."
        let dots = " .".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::styled(
            format!(" Thinking{}", dots),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ));
    }

    let total = lines.len() as u16;
    app.chat_total_lines = total;
    app.chat_height = inner.height;
    let max_scroll = total.saturating_sub(inner.height);
    app.chat_scroll = if app.follow_tail {
        max_scroll
    } else {
        app.chat_scroll.min(max_scroll)
    };

    let messages = Paragraph::new(Text::from(lines))
        .block(block)
        .scroll((app.chat_scroll, 0));
    frame.render_widget(messages, area);

    if max_scroll > 0 {
        let mut scrollbar_state =
            ScrollbarState::new(max_scroll as usize).position(app.chat_scroll as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area,
            &mut scrollbar_state,
        );
    }
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let border_color = if app.is_thinking() { Color::DarkGray } else { Color::Cyan };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Title::from(" ↑ Enter ").alignment(Alignment::Right));
    let inner = block.inner(area);
    let width = inner.width.saturating_sub(1) as usize;

    // Keep the cursor in view for long input
    let start = app.input_cursor.saturating_sub(width);
    let text = if app.input.is_empty() {
        Line::styled(content::INPUT_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        Line::raw(app.input.chars().skip(start).take(width + 1).collect::<String>())
    };

    frame.render_widget(Paragraph::new(text).block(block), area);
    frame.set_cursor_position((
        inner.x + (app.input_cursor - start) as u16,
        inner.y,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{CannedProvider, SessionOptions};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use std::time::Duration;

    fn test_app(delay: Duration) -> App {
        let provider = CannedProvider::with_responses(delay, vec!["Try **CSE 332**.".to_string()]);
        App::new(Arc::new(provider), SessionOptions::default())
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_wrap_text_respects_width() {
        let lines = wrap_text_to_width("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 9));
    }

    #[test]
    fn test_wrap_breaks_long_words() {
        let lines = wrap_text_to_width("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_empty_text_keeps_one_line() {
        assert_eq!(wrap_text_to_width("", 10), vec![String::new()]);
    }

    #[test]
    fn test_markdown_bold() {
        let line = parse_markdown_line("Try **CSE 332** next");
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "CSE 332");
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));

        let unclosed = parse_markdown_line("a **b");
        assert_eq!(unclosed.spans.len(), 2);
        assert_eq!(unclosed.spans[1].content, "**b");
    }

    #[test]
    fn test_bold_run_survives_wrapping() {
        let rows = wrap_markdown_line("Take **CSE 332 and CSE 421** next", 14);
        let text: Vec<String> = rows
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(text, vec!["Take CSE 332", "and CSE 421", "next"]);

        let bold = |span: &Span| span.style.add_modifier.contains(Modifier::BOLD);
        assert_eq!(rows[0].spans[0].content, "Take ");
        assert!(!bold(&rows[0].spans[0]));
        assert!(bold(&rows[0].spans[1]));
        assert!(rows[1].spans.iter().all(bold));
        assert!(!rows[2].spans.iter().any(bold));
    }

    #[test]
    fn test_scroll_to_show() {
        assert_eq!(scroll_to_show(10, 4, 5), 4);
        assert_eq!(scroll_to_show(0, 7, 5), 3);
        assert_eq!(scroll_to_show(2, 4, 5), 2);
    }

    #[test]
    fn test_landing_renders_hero_and_faqs() {
        let mut app = test_app(Duration::ZERO);
        let screen = draw(&mut app);
        assert!(screen.contains(content::TITLE));
        assert!(screen.contains(content::CALL_TO_ACTION));
        assert!(screen.contains("FAQs"));
        assert!(screen.contains(content::FAQS[0].0));
        assert!(!screen.contains("Any UW student can use"));
        assert!(app.faq_line > app.about_line);
    }

    #[test]
    fn test_expanded_faq_shows_answer() {
        let mut app = test_app(Duration::ZERO);
        draw(&mut app);
        app.faqs[3].toggle();
        app.jump_to_faqs();
        let screen = draw(&mut app);
        assert!(screen.contains("Yes! This tool is accurate"));
    }

    #[tokio::test]
    async fn test_chat_first_screen_shows_greeting() {
        let mut app = test_app(Duration::ZERO);
        app.enter_chat();
        let screen = draw(&mut app);
        assert!(screen.contains("Hey User, how's the quarter going?"));
        assert!(screen.contains(content::INPUT_PLACEHOLDER));
        assert!(screen.contains("Logout"));
    }

    #[tokio::test]
    async fn test_thinking_indicator_then_reply() {
        let mut app = test_app(Duration::from_millis(5));
        app.enter_chat();
        app.insert_str("What classes should I take?");
        app.submit_input();

        let screen = draw(&mut app);
        assert!(screen.contains("What classes should I take?"));
        assert!(screen.contains("Thinking ."));
        // Greeting moves off screen once the conversation starts
        assert!(!screen.contains("how's the quarter going"));

        app.await_reply().await;
        let screen = draw(&mut app);
        assert!(screen.contains("CSE 332"));
        assert!(!screen.contains("Thinking"));
    }
}
