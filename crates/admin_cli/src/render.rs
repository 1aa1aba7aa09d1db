//! Plain-text output of the admin commands.

use api_types::{Page, challenge::Challenge, user::User};
use engine::{ActivityBreakdown, Category, DayKey, Ranked, Transaction, is_null_date};

pub fn user_row(user: &User) -> String {
    format!(
        "{:>6}  {:<20} {:<30} {:<6} {}",
        user.id.to_string(),
        user.user_name,
        user.email,
        user.role.label(),
        user.subscription_type.label()
    )
}

pub fn user_detail(user: &User) -> Vec<String> {
    let optional = |value: Option<&str>| value.map_or_else(|| "-".to_string(), date_or_raw);
    vec![
        format!("{:<14}{}", "Id", user.id),
        format!("{:<14}{}", "Name", user.user_name),
        format!("{:<14}{}", "Email", user.email),
        format!("{:<14}{}", "Phone", user.phone_number.as_deref().unwrap_or("-")),
        format!("{:<14}{}", "Birthday", optional(user.date_of_birth.as_deref())),
        format!("{:<14}{}", "Role", user.role.label()),
        format!("{:<14}{}", "Subscription", user.subscription_type.label()),
        format!("{:<14}{}", "Joined", optional(user.created_at.as_deref())),
    ]
}

pub fn page_footer<T>(page: &Page<T>) -> String {
    if page.total_count == 0 {
        return "No rows.".to_string();
    }
    format!(
        "Rows {}-{} of {} (page {}/{})",
        page.first_row(),
        page.last_row(),
        page.total_count,
        page.page,
        page.total_pages.max(1)
    )
}

pub fn challenge_row(challenge: &Challenge) -> String {
    format!(
        "{:>6}  {:<24} {:<23} {}",
        challenge.id.to_string(),
        challenge.name,
        period(challenge),
        if challenge.is_complete { "DONE" } else { "NOT DONE" }
    )
}

pub fn challenge_detail(challenge: &Challenge) -> Vec<String> {
    vec![
        format!("{:<13}{}", "Id", challenge.id),
        format!("{:<13}{}", "Name", challenge.name),
        format!("{:<13}{}", "Description", challenge.description),
        format!("{:<13}{}", "Period", period(challenge)),
        format!(
            "{:<13}{}",
            "Complete",
            if challenge.is_complete { "yes" } else { "no" }
        ),
    ]
}

fn period(challenge: &Challenge) -> String {
    let date = |raw: Option<&str>| {
        if is_null_date(raw) {
            "-".to_string()
        } else {
            raw.map_or_else(|| "-".to_string(), date_or_raw)
        }
    };
    format!(
        "{} .. {}",
        date(challenge.start_date.as_deref()),
        date(challenge.end_date.as_deref())
    )
}

pub fn transaction_row(transaction: &Transaction) -> String {
    let mut line = format!(
        "{:>6}  {:<20} {:>12} {:<10} {}",
        transaction.id,
        transaction.user_name,
        format!("{:.2}", transaction.total_payment),
        date_or_raw(&transaction.payment_date),
        transaction.status
    );
    if let Some(reason) = transaction.reason.as_deref().filter(|r| !r.is_empty()) {
        line.push_str(&format!("  ({reason})"));
    }
    line
}

pub fn leaderboard(rows: &[Ranked]) -> Vec<String> {
    if rows.is_empty() {
        return vec!["No leaderboard data.".to_string()];
    }
    rows.iter()
        .map(|row| {
            let medal = row
                .medal
                .map(|m| format!("  [{}]", m.label()))
                .unwrap_or_default();
            format!(
                "{:>2}. {:<20} {:>10.2} kg CO2e{medal}",
                row.rank + 1,
                row.name,
                row.total
            )
        })
        .collect()
}

pub fn breakdown(breakdown: &ActivityBreakdown) -> Vec<String> {
    if breakdown.is_empty() {
        return vec![format!("No activity recorded on {}.", breakdown.day)];
    }
    let mut lines = vec![format!(
        "Activity on {}: {:.2} kg CO2e",
        breakdown.day, breakdown.total_raw
    )];
    lines.extend(Category::ALL.iter().map(|category| {
        let slice = breakdown.slice(*category);
        format!(
            "  {:<15}{:>10.2} {:>6.1}%",
            category.label(),
            slice.raw_total,
            slice.percentage
        )
    }));
    lines
}

/// `YYYY-MM-DD` when the value reads as a date, the raw value otherwise.
fn date_or_raw(raw: &str) -> String {
    DayKey::normalize(raw).map_or_else(|| raw.to_string(), |day| day.to_string())
}
