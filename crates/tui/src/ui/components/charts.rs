use ratatui::{Frame, layout::Rect, style::Style, widgets::Sparkline};

use crate::ui::{components::card::Card, theme::Theme};

/// Percentage with two decimals, e.g. `33.33%`.
#[must_use]
pub fn format_percent(percentage: f64) -> String {
    format!("{percentage:.2}%")
}

/// Horizontal bar for a share in `0..=100`: `████████░░`.
///
/// Any strictly positive share gets at least one filled cell.
#[must_use]
pub fn share_bar(percentage: f64, width: usize) -> String {
    let ratio = (percentage / 100.0).clamp(0.0, 1.0);
    let mut filled = ((ratio * width as f64).round() as usize).min(width);
    if filled == 0 && ratio > 0.0 && width > 0 {
        filled = 1;
    }
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Scales emission totals to integer heights for a [`Sparkline`].
#[must_use]
pub fn sparkline_points(values: &[f64]) -> Vec<u64> {
    values
        .iter()
        .map(|v| {
            if v.is_finite() && *v > 0.0 {
                (v * 100.0).round() as u64
            } else {
                0
            }
        })
        .collect()
}

pub fn render_sparkline(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    data: &[u64],
    theme: &Theme,
) {
    let sparkline = Sparkline::default()
        .data(data)
        .style(Style::default().fg(theme.accent));
    Card::new(title, theme).render_with(frame, area, sparkline);
}
