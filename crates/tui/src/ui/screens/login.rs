use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{AppState, LoginField},
    ui::{components::dialog::centered_box, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card_area = centered_box(44, 8, area);
    frame.render_widget(Clear, card_area);

    let block = Block::default()
        .title(" carbonboard admin ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Email
            Constraint::Length(1),
            Constraint::Length(1), // Password
            Constraint::Length(1),
            Constraint::Length(1), // Submit hint
        ])
        .margin(1)
        .split(inner);

    let login = &state.login;
    render_input(
        frame,
        rows[0],
        "email",
        &login.email,
        login.focus == LoginField::Email,
        theme,
    );
    render_input(
        frame,
        rows[2],
        "password",
        &mask_password(&login.password),
        login.focus == LoginField::Password,
        theme,
    );

    let footer = if login.busy {
        "please wait..."
    } else {
        "Tab switch · Enter log in · Ctrl+C quit"
    };
    frame.render_widget(
        Paragraph::new(Span::styled(footer, Style::default().fg(theme.text_muted)))
            .alignment(Alignment::Center),
        rows[4],
    );

    if let Some(message) = &login.message {
        let message_area = Rect {
            x: card_area.x,
            y: (card_area.y + card_area.height + 1).min(area.bottom().saturating_sub(1)),
            width: card_area.width,
            height: 1,
        };
        let color = if login.busy { theme.text_muted } else { theme.error };
        frame.render_widget(
            Paragraph::new(Span::styled(message.as_str(), Style::default().fg(color)))
                .alignment(Alignment::Center),
            message_area,
        );
    }
}

fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
    theme: &Theme,
) {
    let cursor = if focused { "│" } else { "" };
    let style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text_muted)
    };
    let line = Line::from(vec![
        Span::styled(format!("{label:>9} "), Style::default().fg(theme.text_muted)),
        Span::styled(format!("{value}{cursor}"), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// One bullet per character.
fn mask_password(password: &str) -> String {
    "•".repeat(password.chars().count())
}
