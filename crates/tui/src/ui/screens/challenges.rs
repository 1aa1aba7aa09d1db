use api_types::challenge::Challenge;
use engine::{DayKey, is_null_date};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use crate::{
    app::AppState,
    ui::{components::card::Card, status_line, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let challenges = &state.challenges;
    let card = Card::new("Challenges", theme).focused(true);

    if challenges.list.data.is_none() {
        let line = status_line(
            challenges.list.loading,
            challenges.list.error.as_deref(),
            theme,
        )
        .unwrap_or_default();
        card.render_with(frame, area, Paragraph::new(line));
        return;
    }

    let rows = challenges.items().iter().map(|challenge| {
        let (badge, color) = if challenge.is_complete {
            ("DONE", theme.positive)
        } else {
            ("NOT DONE", theme.error)
        };
        Row::new(vec![
            Cell::from(challenge.name.clone()),
            Cell::from(challenge.description.clone()),
            Cell::from(period(challenge)),
            Cell::from(Span::styled(badge, Style::default().fg(color))),
        ])
    });
    let header = Row::new(["Name", "Description", "Period", "Status"])
        .style(Style::default().fg(theme.text_muted));
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(25),
            Constraint::Percentage(40),
            Constraint::Length(24),
            Constraint::Length(9),
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
    if !challenges.items().is_empty() {
        table_state.select(Some(challenges.selected));
    }
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// `start .. end` as calendar days; unknown ends show as `-`.
fn period(challenge: &Challenge) -> String {
    let day = |raw: Option<&str>| {
        if is_null_date(raw) {
            return "-".to_string();
        }
        raw.and_then(DayKey::normalize)
            .map_or_else(|| "-".to_string(), |d| d.to_string())
    };
    format!(
        "{} .. {}",
        day(challenge.start_date.as_deref()),
        day(challenge.end_date.as_deref())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_shows_days() {
        let challenge = Challenge {
            start_date: Some("2025-10-02T00:00:00Z".to_string()),
            end_date: Some("0001-01-01T00:00:00".to_string()),
            ..Default::default()
        };
        assert_eq!(period(&challenge), "2025-10-02 .. -");
    }
}
