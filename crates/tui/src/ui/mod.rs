pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Screen, Section};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();
    match state.screen {
        Screen::Login => screens::login::render(frame, area, state, &theme),
        Screen::Main => render_shell(frame, area, state, &theme),
    }
    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tabs
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Hints
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, theme);
    components::tabs::render_tabs(frame, layout[1], state.section, theme);

    let content = layout[2];
    match state.section {
        Section::Dashboard => screens::dashboard::render(frame, content, state, theme),
        Section::Users => screens::users::render(frame, content, state, theme),
        Section::Transactions => screens::transactions::render(frame, content, state, theme),
        Section::Challenges => screens::challenges::render(frame, content, state, theme),
        Section::Profile => screens::profile::render(frame, content, state, theme),
    }

    render_bottom_bar(frame, layout[3], state, theme);

    if let Some(pending) = &state.confirm {
        components::dialog::render_modal(
            frame,
            area,
            "confirm",
            vec![Line::from(pending.prompt())],
            theme,
        );
    }
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let (user, role) = state
        .user
        .as_ref()
        .map(|u| (u.user_name.as_str(), u.role.label()))
        .unwrap_or(("-", "-"));
    let loading = [
        state.dashboard.activities.loading,
        state.dashboard.leaderboard.loading,
        state.users.page.loading,
        state.transactions.list.loading,
        state.challenges.list.loading,
        state.profile.loading,
    ]
    .iter()
    .any(|l| *l);

    let mut spans = vec![
        Span::styled("API", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {user} ({role})  ")),
    ];
    if loading {
        spans.push(Span::styled("loading...", Style::default().fg(theme.warning)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = components::hints::hints_to_spans(&components::hints::global(), theme);

    let context = components::hints::contextual(state);
    if !context.is_empty() {
        parts.push(components::hints::separator(theme));
        parts.extend(components::hints::hints_to_spans(&context, theme));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

/// Inline status line shared by list screens: error, loading or nothing.
pub(crate) fn status_line<'a>(
    loading: bool,
    error: Option<&'a str>,
    theme: &Theme,
) -> Option<Line<'a>> {
    if let Some(error) = error {
        return Some(Line::from(Span::styled(
            error,
            Style::default().fg(theme.error),
        )));
    }
    loading.then(|| {
        Line::from(Span::styled(
            "Loading...",
            Style::default().fg(theme.text_muted),
        ))
    })
}
