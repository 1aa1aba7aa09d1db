use ratatui::{style::Style, text::Span};

use crate::{
    app::{AppState, Section},
    ui::theme::Theme,
};

/// A key and what it does, shown in the bottom bar.
#[derive(Debug, Clone, Copy)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

const fn hint(key: &'static str, action: &'static str) -> KeyHint {
    KeyHint { key, action }
}

pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }
    spans
}

pub fn separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

pub fn global() -> Vec<KeyHint> {
    vec![
        hint("1-5/Tab", "nav"),
        hint("r", "refresh"),
        hint("L", "logout"),
        hint("q", "quit"),
    ]
}

/// Hints for whatever currently has the keyboard.
pub fn contextual(state: &AppState) -> Vec<KeyHint> {
    if state.confirm.is_some() {
        return vec![hint("y", "confirm"), hint("any", "cancel")];
    }
    if state.transactions.prompt.is_some() {
        return vec![hint("Enter", "send"), hint("Esc", "cancel")];
    }
    match state.section {
        Section::Dashboard => vec![hint("←/→", "day"), hint("t", "today")],
        Section::Users => vec![
            hint("↑↓", "select"),
            hint("n/p", "page"),
            hint("o", "role"),
            hint("s", "plan"),
            hint("d", "delete"),
        ],
        Section::Transactions => vec![
            hint("↑↓", "select"),
            hint("n/p", "page"),
            hint("c", "complete"),
            hint("f", "fail"),
            hint("x", "cancel"),
        ],
        Section::Challenges => vec![
            hint("↑↓", "select"),
            hint("Enter", "toggle done"),
            hint("d", "delete"),
        ],
        Section::Profile => Vec::new(),
    }
}
