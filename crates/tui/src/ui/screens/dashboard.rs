use engine::{ActivityBreakdown, Ranked};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{AppState, TREND_DAYS},
    ui::{
        components::{
            card::{Card, StatCard},
            charts::{format_percent, render_sparkline, share_bar, sparkline_points},
        },
        status_line,
        theme::Theme,
    },
};

const BAR_WIDTH: usize = 24;

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(6),
        ])
        .split(area);

    let dashboard = &state.dashboard;
    let breakdown = dashboard.breakdown();
    render_stats(frame, rows[0], state, breakdown.as_ref(), theme);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    let title = format!("Activity on {}", dashboard.day);
    let card = Card::new(&title, theme).focused(true);
    let status = status_line(
        dashboard.activities.loading,
        dashboard.activities.error.as_deref(),
        theme,
    );
    let lines = match (&status, breakdown.as_ref()) {
        (Some(line), _) => vec![line.clone()],
        (None, Some(breakdown)) => breakdown_lines(breakdown, theme),
        (None, None) => Vec::new(),
    };
    card.render_with(frame, middle[0], Paragraph::new(lines));

    let status = status_line(
        dashboard.leaderboard.loading,
        dashboard.leaderboard.error.as_deref(),
        theme,
    );
    let lines = match (status, dashboard.leaderboard.data.as_deref()) {
        (Some(line), _) => vec![line],
        (None, Some(ranked)) => leaderboard_lines(ranked, theme),
        (None, None) => Vec::new(),
    };
    Card::new("Lowest emitters", theme).render_with(frame, middle[1], Paragraph::new(lines));

    let trend = dashboard.trend(TREND_DAYS);
    let values: Vec<f64> = trend.iter().map(|(_, total)| *total).collect();
    let title = match (trend.first(), trend.last()) {
        (Some((from, _)), Some((to, _))) => format!("Daily total {from} .. {to}"),
        _ => "Daily total".to_string(),
    };
    render_sparkline(frame, rows[2], &title, &sparkline_points(&values), theme);
}

fn render_stats(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    breakdown: Option<&ActivityBreakdown>,
    theme: &Theme,
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    StatCard::new("Day", state.dashboard.day.to_string(), theme)
        .caption("←/→ change · t today")
        .render(frame, cols[0]);

    let total = breakdown.map_or(0.0, |b| b.total_raw);
    StatCard::new("Total emission", format!("{total:.2} CO₂e"), theme)
        .caption("all users, selected day")
        .render(frame, cols[1]);

    let leader = state
        .dashboard
        .leaderboard
        .data
        .as_deref()
        .and_then(|ranked| ranked.first());
    let (name, caption) = match leader {
        Some(leader) => (leader.name.clone(), format!("{:.2} CO₂e", leader.total)),
        None => ("-".to_string(), "no data".to_string()),
    };
    StatCard::new("Greenest user", name, theme)
        .caption(caption)
        .render(frame, cols[2]);
}

/// One bar per visible slice, then a legend with every non-zero raw total.
fn breakdown_lines(breakdown: &ActivityBreakdown, theme: &Theme) -> Vec<Line<'static>> {
    if breakdown.is_empty() {
        return vec![Line::from(Span::styled(
            "No activity recorded on this day.",
            Style::default().fg(theme.text_muted),
        ))
        .alignment(Alignment::Center)];
    }

    let mut lines: Vec<Line<'static>> = breakdown
        .visible_slices()
        .map(|slice| {
            let color = theme.category(slice.category);
            let label = if slice.show_label() {
                format_percent(slice.percentage)
            } else {
                String::new()
            };
            Line::from(vec![
                Span::styled(
                    format!("{:<15}", slice.category.label()),
                    Style::default().fg(theme.text),
                ),
                Span::styled(share_bar(slice.percentage, BAR_WIDTH), Style::default().fg(color)),
                Span::raw(format!(" {label}")),
            ])
        })
        .collect();

    lines.push(Line::default());
    let legend: Vec<Span<'static>> = breakdown
        .slices
        .iter()
        .filter(|slice| slice.raw_total > 0.0)
        .flat_map(|slice| {
            [
                Span::styled("■ ", Style::default().fg(theme.category(slice.category))),
                Span::styled(
                    format!("{} {:.2}   ", slice.category.label(), slice.raw_total),
                    Style::default().fg(theme.text_muted),
                ),
            ]
        })
        .collect();
    lines.push(Line::from(legend));
    lines
}

fn leaderboard_lines(ranked: &[Ranked], theme: &Theme) -> Vec<Line<'static>> {
    if ranked.is_empty() {
        return vec![Line::from(Span::styled(
            "No users yet.",
            Style::default().fg(theme.text_muted),
        ))];
    }

    ranked
        .iter()
        .map(|entry| {
            let place = Span::styled(
                format!("{:>2}. ", entry.rank + 1),
                Style::default().fg(theme.text_muted),
            );
            let name_style = match entry.medal {
                Some(medal) => Style::default()
                    .fg(theme.medal(medal))
                    .add_modifier(Modifier::BOLD),
                None => Style::default().fg(theme.text),
            };
            let medal = entry
                .medal
                .map(|m| format!(" [{}]", m.label()))
                .unwrap_or_default();
            Line::from(vec![
                place,
                Span::styled(format!("{:<18}", entry.name), name_style),
                Span::raw(format!("{:>10.2}", entry.total)),
                Span::styled(medal, name_style),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use engine::{ActivityRecord, DayKey, aggregate, rank};

    use super::*;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn empty_day_shows_no_data() {
        let day: DayKey = "2025-01-01".parse().unwrap();
        let lines = breakdown_lines(&aggregate(&[], day), &Theme::default());
        assert_eq!(lines.len(), 1);
        assert_eq!(text(&lines[0]), "No activity recorded on this day.");
    }

    #[test]
    fn zero_slices_are_hidden_and_small_ones_unlabelled() {
        let day: DayKey = "2025-01-01".parse().unwrap();
        let records = [ActivityRecord {
            date: Some("2025-01-01".to_string()),
            plastic: Some(999.0),
            food: Some(1.0),
            ..Default::default()
        }];
        let lines = breakdown_lines(&aggregate(&records, day), &Theme::default());

        // Plastic, Food, blank, legend.
        assert_eq!(lines.len(), 4);
        assert!(text(&lines[0]).starts_with("Plastic"));
        assert!(text(&lines[0]).ends_with("99.90%"));
        assert!(text(&lines[1]).starts_with("Food"));
        assert!(!text(&lines[1]).contains('%'));
        assert!(text(&lines[3]).contains("Food 1.00"));
        assert!(!text(&lines[3]).contains("Energy"));
    }

    #[test]
    fn leaderboard_marks_medals() {
        let ranked = rank(
            [
                (Some("a"), Some(3.0)),
                (Some("b"), Some(1.0)),
                (Some("c"), Some(2.0)),
                (Some("d"), Some(4.0)),
            ],
            5,
        );
        let lines = leaderboard_lines(&ranked, &Theme::default());
        assert_eq!(lines.len(), 4);
        assert!(text(&lines[0]).contains("b"));
        assert!(text(&lines[0]).ends_with("[Gold]"));
        assert!(text(&lines[2]).ends_with("[Bronze]"));
        assert!(!text(&lines[3]).contains('['));
    }
}
