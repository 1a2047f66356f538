use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use crate::app::{App, InputMode, Notice, NoticeKind, Screen};
use crate::credential;
use crate::session::Speaker;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let notice_height = if app.notice.is_some() { 1 } else { 0 };

    // Main layout: header, body, optional notice line, footer
    let [header_area, body_area, notice_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(notice_height),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.screen {
        Screen::Chat => render_chat_screen(app, frame, body_area),
        Screen::Image => render_image_screen(app, frame, body_area),
    }

    if let Some(notice) = app.notice.clone() {
        render_notice(&notice, frame, notice_area);
    }

    render_footer(app, frame, footer_area);

    // Popups (credential entry wins if both are somehow open)
    if app.show_credential_input {
        render_credential_input(app, frame, area);
    } else if app.show_role_picker {
        render_role_picker(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let key_indicator = if app.credential.is_empty() {
        Span::styled(" no key ", Style::default().fg(Color::Red))
    } else {
        Span::styled(" key set ", Style::default().fg(Color::Green))
    };

    let image_indicator = if app.config.image_generation {
        Span::styled(" image gen on ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" image gen off ", Style::default().fg(Color::Gray))
    };

    let title = Line::from(vec![
        Span::styled(" Creative Studio ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!(" {} ", app.session.active_role()),
            Style::default().fg(Color::Yellow),
        ),
        key_indicator,
        image_indicator,
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_chat_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [transcript_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    // Store transcript dimensions for scroll calculations (inner size minus borders)
    app.chat_height = transcript_area.height.saturating_sub(2);
    app.chat_width = transcript_area.width.saturating_sub(2);

    let transcript_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(
            " Chat with {} ({}) ",
            app.session.active_role(),
            app.config.chat_model
        ));

    let transcript_text = if app.session.turns().is_empty() {
        Text::from(Span::styled(
            "Send a message to start the conversation...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for turn in app.session.turns() {
            match turn.speaker {
                Speaker::User => {
                    lines.push(Line::from(Span::styled(
                        "You:",
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    )));
                }
                Speaker::Assistant => {
                    lines.push(Line::from(Span::styled(
                        format!("{}:", app.session.active_role()),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    )));
                }
            }
            for line in turn.text.lines() {
                lines.push(Line::from(line.to_string()));
            }
            lines.push(Line::default());
        }

        Text::from(lines)
    };

    let transcript = Paragraph::new(transcript_text)
        .block(transcript_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(transcript, transcript_area);

    render_input_box(
        frame,
        input_area,
        " Message (i to edit, Enter to send) ",
        &app.chat_input,
        app.chat_cursor,
        app.input_mode == InputMode::Editing,
    );
}

fn render_image_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [input_area, result_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    render_input_box(
        frame,
        input_area,
        " Image prompt (i to edit, Enter to generate) ",
        &app.image_prompt,
        app.image_cursor,
        app.input_mode == InputMode::Editing,
    );

    let result_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(
            " Image Studio ({}, {}) ",
            app.config.image_model, app.config.image_size
        ));

    let result_text = match &app.generated_image {
        Some(image) => Text::from(vec![
            Line::from(vec![
                Span::styled("Prompt: ", Style::default().fg(Color::Cyan)),
                Span::raw(image.prompt.clone()),
            ]),
            Line::from(vec![
                Span::styled("Decoded: ", Style::default().fg(Color::Cyan)),
                Span::raw(format!("{} bytes", image.bytes.len())),
            ]),
            Line::default(),
            Line::from(Span::styled(
                "The image is held in memory for this session.",
                Style::default().fg(Color::DarkGray),
            )),
        ]),
        None if !app.config.image_generation => Text::from(Span::styled(
            "Image generation is off. Press g to enable it, then describe an image above.",
            Style::default().fg(Color::DarkGray),
        )),
        None => Text::from(Span::styled(
            "Describe an image above and press Enter to generate...",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let result = Paragraph::new(result_text)
        .block(result_block)
        .wrap(Wrap { trim: true });

    frame.render_widget(result, result_area);
}

/// A single-line bordered input with horizontal scrolling and a cursor.
fn render_input_box(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    input: &str,
    cursor: usize,
    editing: bool,
) {
    let border_color = if editing { Color::Yellow } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title.to_string());

    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;

    // Scroll offset keeps the cursor visible
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor >= inner_width {
        cursor - inner_width + 1
    } else {
        0
    };

    let visible_text: String = input.chars().skip(scroll_offset).take(inner_width).collect();

    let widget = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(block);

    frame.render_widget(widget, area);

    if editing {
        let cursor_x = (cursor - scroll_offset).min(inner_width) as u16;
        frame.set_cursor_position((area.x + 1 + cursor_x, area.y + 1));
    }
}

fn render_notice(notice: &Notice, frame: &mut Frame, area: Rect) {
    let style = match notice.kind {
        NoticeKind::Info => Style::default().fg(Color::Green),
        NoticeKind::Warning => Style::default().fg(Color::Black).bg(Color::Yellow),
        NoticeKind::Error => Style::default().fg(Color::White).bg(Color::Red),
    };

    let line = Paragraph::new(format!(" {} ", notice.text)).style(style);
    frame.render_widget(line, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match app.screen {
        Screen::Chat => " CHAT ",
        Screen::Image => " IMAGE ",
    };

    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = match app.input_mode {
        InputMode::Normal => {
            let mut hints = vec![
                Span::styled(" i ", key_style),
                Span::styled(" edit ", label_style),
                Span::styled(" Tab ", key_style),
                Span::styled(
                    if app.screen == Screen::Chat { " image " } else { " chat " },
                    label_style,
                ),
                Span::styled(" r ", key_style),
                Span::styled(" role ", label_style),
                Span::styled(" K ", key_style),
                Span::styled(" API key ", label_style),
                Span::styled(" g ", key_style),
                Span::styled(" image gen ", label_style),
            ];
            if app.screen == Screen::Chat {
                hints.extend(vec![
                    Span::styled(" j/k ", key_style),
                    Span::styled(" scroll ", label_style),
                ]);
            }
            hints.extend(vec![
                Span::styled(" q ", key_style),
                Span::styled(" quit ", label_style),
            ]);
            hints
        }
        InputMode::Editing => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(
                if app.screen == Screen::Chat { " send " } else { " generate " },
                label_style,
            ),
            Span::styled(" Esc ", key_style),
            Span::styled(" done ", label_style),
        ],
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    spans.extend(hints);

    let footer = Paragraph::new(Line::from(spans));
    frame.render_widget(footer, area);
}

fn render_role_picker(app: &mut App, frame: &mut Frame, area: Rect) {
    let names = app.registry.names();

    let popup_width = 40.min(area.width.saturating_sub(4));
    let popup_height = (names.len() + 2) as u16;

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Choose a Role ");

    let items: Vec<ListItem> = names
        .iter()
        .map(|name| ListItem::new(format!(" {} ", name)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, popup_area, &mut app.role_picker_state);
}

fn render_credential_input(app: &App, frame: &mut Frame, area: Rect) {
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 7;

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Enter your OpenAI API Key ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let instructions =
        Paragraph::new("The key is kept in memory for this session only. Enter saves, Esc cancels.")
            .style(Style::default().fg(Color::DarkGray));

    let instructions_area = Rect::new(inner.x, inner.y, inner.width, 1);
    frame.render_widget(instructions, instructions_area);

    let input_area = Rect::new(inner.x, inner.y + 2, inner.width, 1);

    // Mask the key; only the last four characters stay readable
    let display_text = credential::mask(&app.credential_input);

    let input = Paragraph::new(display_text).style(Style::default().fg(Color::Cyan));
    frame.render_widget(input, input_area);

    let cursor_x = app.credential_cursor.min(input_area.width as usize) as u16;
    frame.set_cursor_position((input_area.x + cursor_x, input_area.y));

    let char_count = format!("{} characters", app.credential_input.chars().count());
    let status = Paragraph::new(char_count).style(Style::default().fg(Color::DarkGray));

    let status_area = Rect::new(inner.x, inner.y + 4, inner.width, 1);
    frame.render_widget(status, status_area);
}
