//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use todo_core::view::{AuthPanel, TextInput};
use todo_core::Screen;

use super::app::{App, Focus};

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, app, outer_chunks[0]);

    match app.todo.screen() {
        Screen::Authenticated => draw_list(frame, app, outer_chunks[1]),
        Screen::Unauthenticated(panel) => {
            let pane_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
                .split(outer_chunks[1]);
            draw_auth_panel(frame, app, panel, pane_chunks[0]);
            draw_list(frame, app, pane_chunks[1]);
        }
    }

    draw_todo_form(frame, app, outer_chunks[2]);
    draw_status_bar(frame, app, outer_chunks[3]);

    if app.show_help {
        draw_help_overlay(frame);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let mode = if app.todo.is_authenticated() {
        Span::styled(
            format!("● {}", app.todo.api_url()),
            Style::default().fg(Color::Green),
        )
    } else {
        Span::styled("○ local", Style::default().add_modifier(Modifier::DIM))
    };

    let line = Line::from(vec![
        Span::styled("Todo  ", Style::default().add_modifier(Modifier::BOLD)),
        mode,
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn border_style(active: bool) -> Style {
    if active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

/// One labelled input line
fn input_line<'a>(label: &'a str, input: &TextInput, focused: bool) -> Line<'a> {
    let label_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    Line::from(vec![
        Span::styled(label, label_style),
        Span::raw(input.display()),
    ])
}

fn cursor_for(area: Rect, row: u16, label: &str, input: &TextInput) -> (u16, u16) {
    let x = area.x + 1 + label.chars().count() as u16 + input.display().chars().count() as u16;
    (x.min(area.right().saturating_sub(2)), area.y + 1 + row)
}

fn draw_auth_panel(frame: &mut Frame, app: &App, panel: AuthPanel, area: Rect) {
    let todo = &app.todo;
    let active = matches!(
        app.focus,
        Focus::LoginEmail
            | Focus::LoginPassword
            | Focus::RegisterEmail
            | Focus::RegisterPassword
            | Focus::RegisterConfirm
    );

    let (title, mut lines, error, submitting, hint) = match panel {
        AuthPanel::Login => {
            let form = &todo.login;
            let lines = vec![
                input_line("Email:    ", &form.email, app.focus == Focus::LoginEmail),
                input_line("Password: ", &form.password, app.focus == Focus::LoginPassword),
            ];
            (" Login ", lines, &form.error, form.submitting, "l: create an account")
        }
        AuthPanel::Register => {
            let form = &todo.register;
            let lines = vec![
                input_line("Email:    ", &form.email, app.focus == Focus::RegisterEmail),
                input_line(
                    "Password: ",
                    &form.password,
                    app.focus == Focus::RegisterPassword,
                ),
                input_line(
                    "Confirm:  ",
                    &form.confirm,
                    app.focus == Focus::RegisterConfirm,
                ),
            ];
            (" Register ", lines, &form.error, form.submitting, "l: back to login")
        }
    };

    lines.push(Line::from(""));
    if submitting {
        lines.push(Line::from(Span::styled(
            "Submitting...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(err) = error {
        lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(Span::styled(
        hint,
        Style::default().add_modifier(Modifier::DIM),
    )));

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(active));
    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);

    let cursor = match app.focus {
        Focus::LoginEmail => Some(cursor_for(area, 0, "Email:    ", &todo.login.email)),
        Focus::LoginPassword => Some(cursor_for(area, 1, "Password: ", &todo.login.password)),
        Focus::RegisterEmail => Some(cursor_for(area, 0, "Email:    ", &todo.register.email)),
        Focus::RegisterPassword => {
            Some(cursor_for(area, 1, "Password: ", &todo.register.password))
        }
        Focus::RegisterConfirm => Some(cursor_for(area, 2, "Confirm:  ", &todo.register.confirm)),
        _ => None,
    };
    if let Some(position) = cursor {
        frame.set_cursor_position(position);
    }
}

fn draw_list(frame: &mut Frame, app: &App, area: Rect) {
    let todo = &app.todo;
    let active = app.focus == Focus::List;
    let todos = todo.todos();

    let title = if todo.is_authenticated() {
        format!(" Todos ({}) ", todos.len())
    } else {
        format!(" Local todos ({}) ", todos.len())
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(active));

    if let Some(err) = &todo.list.error {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(err.as_str(), Style::default().fg(Color::Red))),
            Line::from(""),
            Line::from(Span::styled(
                "Press r to retry",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    if todo.list.loading && todos.is_empty() {
        let loading = Paragraph::new(Span::styled(
            "Loading...",
            Style::default().add_modifier(Modifier::DIM),
        ))
        .block(block);
        frame.render_widget(loading, area);
        return;
    }

    if todos.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No todos yet. Press a to add one.",
            Style::default().add_modifier(Modifier::DIM),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let max_len = area.width.saturating_sub(8) as usize;
    let items: Vec<ListItem> = todos
        .iter()
        .map(|item| {
            let check = if item.completed { "[x] " } else { "[ ] " };
            let mut title_style = Style::default();
            if item.completed {
                title_style = title_style.add_modifier(Modifier::CROSSED_OUT | Modifier::DIM);
            }
            if todo.list.is_busy(item.id) {
                title_style = title_style.fg(Color::Yellow);
            }

            let mut lines = vec![Line::from(vec![
                Span::raw(check),
                Span::styled(clip(&item.title, max_len), title_style),
            ])];
            if let Some(desc) = item.description_text() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", clip(desc, max_len)),
                    Style::default().add_modifier(Modifier::DIM),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let highlight_style = if active {
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style);

    let mut state = ListState::default();
    state.select(Some(todo.list.selected()));

    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_todo_form(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.todo.todo_form;
    let active = matches!(app.focus, Focus::TodoTitle | Focus::TodoDescription);

    let mut lines = vec![
        input_line("Title:       ", &form.title, app.focus == Focus::TodoTitle),
        input_line(
            "Description: ",
            &form.description,
            app.focus == Focus::TodoDescription,
        ),
    ];
    if form.submitting {
        lines.push(Line::from(Span::styled(
            "Creating...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(Color::Red),
        )));
    }

    let block = Block::default()
        .title(" New todo ")
        .borders(Borders::ALL)
        .border_style(border_style(active));
    frame.render_widget(Paragraph::new(lines).block(block), area);

    match app.focus {
        Focus::TodoTitle => {
            frame.set_cursor_position(cursor_for(area, 0, "Title:       ", &form.title))
        }
        Focus::TodoDescription => frame.set_cursor_position(cursor_for(
            area,
            1,
            "Description: ",
            &form.description,
        )),
        _ => {}
    }
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let paragraph = if let Some(banner) = app.todo.banner() {
        let color = if banner.is_error() {
            Color::Red
        } else {
            Color::Green
        };
        Paragraph::new(banner.message.as_str()).style(Style::default().fg(color))
    } else {
        let hints = if app.focus.is_input() {
            "Enter:submit  Tab:next field  Esc:back to list"
        } else if app.todo.is_authenticated() {
            "a:add  space:toggle  d:del  r:refresh  L:logout  ?:help  q:quit"
        } else {
            "a:add  space:toggle  d:del  Tab:login  l:register  ?:help  q:quit"
        };
        Paragraph::new(hints).style(Style::default().add_modifier(Modifier::DIM))
    };

    frame.render_widget(paragraph, area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    let popup_width = 50.min(area.width.saturating_sub(4));
    let popup_height = 19.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("List:"),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  space       Toggle done"),
        Line::from("  d           Delete"),
        Line::from("  a           Add a todo"),
        Line::from("  r           Refresh / retry"),
        Line::from("  l           Switch login / register"),
        Line::from("  L           Log out"),
        Line::from(""),
        Line::from("Forms:"),
        Line::from("  Tab         Next field"),
        Line::from("  Enter       Submit"),
        Line::from("  Esc         Back to list"),
        Line::from("  q, Ctrl-C   Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, popup_area);
}

/// Clip to `max` characters with a trailing ellipsis
fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
