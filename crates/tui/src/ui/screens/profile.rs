use api_types::user::User;
use engine::{DayKey, is_null_date};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::AppState,
    ui::{components::card::Card, status_line, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let profile = &state.profile;
    let mut lines = profile
        .data
        .as_ref()
        .map(|user| profile_lines(user, theme))
        .unwrap_or_default();
    if let Some(line) = status_line(profile.loading, profile.error.as_deref(), theme) {
        lines.push(Line::default());
        lines.push(line);
    }
    Card::new("Profile", theme)
        .focused(true)
        .render_with(frame, area, Paragraph::new(lines));
}

fn profile_lines(user: &User, theme: &Theme) -> Vec<Line<'static>> {
    let optional = |value: Option<&str>| {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map_or_else(|| "-".to_string(), str::to_string)
    };
    let date = |value: Option<&str>| {
        if is_null_date(value) {
            return "-".to_string();
        }
        value
            .and_then(DayKey::normalize)
            .map_or_else(|| "-".to_string(), |d| d.to_string())
    };

    [
        ("Name", user.user_name.clone()),
        ("Email", user.email.clone()),
        ("Phone", optional(user.phone_number.as_deref())),
        ("Birthday", date(user.date_of_birth.as_deref())),
        ("Role", user.role.label().to_string()),
        ("Plan", user.subscription_type.label().to_string()),
        ("Joined", date(user.created_at.as_deref())),
    ]
    .into_iter()
    .map(|(name, value)| {
        Line::from(vec![
            Span::styled(format!("{name:<10}"), Style::default().fg(theme.text_muted)),
            Span::styled(value, Style::default().fg(theme.text)),
        ])
    })
    .collect()
}
