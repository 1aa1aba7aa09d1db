use engine::{DayKey, Transaction, is_null_date};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use crate::{
    app::{AppState, StatusPrompt},
    ui::{
        components::{card::Card, dialog::render_modal},
        status_line,
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let transactions = &state.transactions;
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let title = format!("Transactions · page {}", transactions.page_no);
    let card = Card::new(&title, theme).focused(true);
    let list = &transactions.list;

    if list.data.is_none() {
        let line = status_line(list.loading, list.error.as_deref(), theme).unwrap_or_default();
        card.render_with(frame, layout[0], Paragraph::new(line));
    } else {
        let rows = transactions.items().iter().map(|tx| {
            Row::new(vec![
                Cell::from(tx.id.to_string()),
                Cell::from(tx.user_name.clone()),
                Cell::from(format_amount(tx.total_payment)),
                Cell::from(display_date(&tx.payment_date)),
                Cell::from(Span::styled(
                    tx.status.label(),
                    Style::default().fg(theme.status(tx.status)),
                )),
            ])
        });
        let header = Row::new(["ID", "User", "Amount", "Date", "Status"])
            .style(Style::default().fg(theme.text_muted));
        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Percentage(30),
                Constraint::Length(14),
                Constraint::Length(11),
                Constraint::Length(10),
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
        if !transactions.items().is_empty() {
            table_state.select(Some(transactions.selected));
        }
        frame.render_stateful_widget(table, layout[0], &mut table_state);
    }

    let mut detail = transactions
        .selected_transaction()
        .map(|tx| detail_lines(tx, theme))
        .unwrap_or_default();
    if let Some(error) = list.data.as_ref().and(list.error.as_deref()) {
        detail.push(Line::default());
        detail.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(theme.error),
        )));
    }
    Card::new("Detail", theme).render_with(frame, layout[1], Paragraph::new(detail));

    if let Some(prompt) = &transactions.prompt {
        render_prompt(frame, area, prompt, theme);
    }
}

fn detail_lines(tx: &Transaction, theme: &Theme) -> Vec<Line<'static>> {
    let field = |name: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{name:<9}"), Style::default().fg(theme.text_muted)),
            Span::raw(value),
        ])
    };
    let mut lines = vec![
        field("ID", tx.id.to_string()),
        field(
            "User",
            match tx.user_id {
                Some(id) => format!("{} (#{id})", tx.user_name),
                None => tx.user_name.clone(),
            },
        ),
        field("Amount", format_amount(tx.total_payment)),
        field("Date", display_date(&tx.payment_date)),
        Line::from(vec![
            Span::styled(format!("{:<9}", "Status"), Style::default().fg(theme.text_muted)),
            Span::styled(
                tx.status.label(),
                Style::default()
                    .fg(theme.status(tx.status))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    if let Some(reason) = tx.reason.as_deref().filter(|r| !r.trim().is_empty()) {
        lines.push(field("Reason", reason.to_string()));
    }
    if tx.status.is_terminal() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Final: status can no longer change.",
            Style::default().fg(theme.text_muted),
        )));
    }
    lines
}

fn render_prompt(frame: &mut Frame<'_>, area: Rect, prompt: &StatusPrompt, theme: &Theme) {
    let lines = vec![
        Line::from(format!(
            "Mark transaction {} as {}?",
            prompt.transaction_id, prompt.target
        )),
        Line::default(),
        Line::from(vec![
            Span::styled("reason: ", Style::default().fg(theme.text_muted)),
            Span::styled(
                format!("{}│", prompt.reason),
                Style::default().fg(theme.accent),
            ),
        ]),
        Line::from(Span::styled(
            "(optional) Enter send · Esc cancel",
            Style::default().fg(theme.text_muted),
        )),
    ];
    render_modal(frame, area, "change status", lines, theme);
}

/// Whole amounts with thousands separators, `1,300,000`; fractions keep two
/// decimals.
fn format_amount(amount: f64) -> String {
    let negative = amount < 0.0;
    let amount = amount.abs();
    let whole = amount.trunc() as u64;
    let cents = ((amount - amount.trunc()) * 100.0).round() as u64;
    let (whole, cents) = if cents == 100 { (whole + 1, 0) } else { (whole, cents) };

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if cents == 0 {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{cents:02}")
    }
}

fn display_date(raw: &str) -> String {
    if is_null_date(Some(raw)) {
        return "-".to_string();
    }
    DayKey::normalize(raw).map_or_else(|| raw.to_string(), |day| day.to_string())
}
