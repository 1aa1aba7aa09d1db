use api_types::{Page, user::User};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use crate::{
    app::AppState,
    ui::{components::card::Card, status_line, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let users = &state.users;
    let card = Card::new("Users", theme).focused(true);

    if let Some(line) = status_line(users.page.loading, users.page.error.as_deref(), theme)
        && users.page.data.is_none()
    {
        card.render_with(frame, layout[0], Paragraph::new(line));
        return;
    }

    let Some(page) = users.page.data.as_ref() else {
        card.render_with(frame, layout[0], Paragraph::new(""));
        return;
    };

    let first_row = page.first_row();
    let rows = page.data.iter().enumerate().map(|(i, user)| {
        Row::new(vec![
            Cell::from(format!("{}", first_row + i as u64)),
            Cell::from(user.user_name.clone()),
            Cell::from(user.email.clone()),
            Cell::from(user.phone_number.clone().unwrap_or_else(|| "-".to_string())),
            Cell::from(user.subscription_type.label()),
            Cell::from(user.role.label()),
        ])
    });
    let header = Row::new(["#", "Name", "Email", "Phone", "Plan", "Role"])
        .style(Style::default().fg(theme.text_muted));

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(20),
            Constraint::Percentage(30),
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(card.block())
    .row_highlight_style(
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("» ");

    let mut table_state = TableState::default();
    if !page.data.is_empty() {
        table_state.select(Some(users.selected));
    }
    frame.render_stateful_widget(table, layout[0], &mut table_state);

    let mut footer = vec![Span::styled(
        page_summary(page),
        Style::default().fg(theme.text_muted),
    )];
    if let Some(error) = &users.page.error {
        footer.push(Span::styled(
            format!("   {error}"),
            Style::default().fg(theme.error),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(footer)), layout[1]);
}

fn page_summary(page: &Page<User>) -> String {
    if page.total_count == 0 {
        return "No users.".to_string();
    }
    format!(
        "Showing {}-{} of {} · page {}/{}",
        page.first_row(),
        page.last_row(),
        page.total_count,
        page.page,
        page.total_pages.max(1),
    )
}
