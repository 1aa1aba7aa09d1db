//! Leaderboard ranking: the users with the lowest total emission come first.

use std::cmp::Ordering;

/// Number of entries shown on the dashboard.
pub const TOP_CONTRIBUTORS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            0 => Some(Self::Gold),
            1 => Some(Self::Silver),
            2 => Some(Self::Bronze),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Gold => "Gold",
            Self::Silver => "Silver",
            Self::Bronze => "Bronze",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ranked {
    pub rank: usize,
    pub name: String,
    pub total: f64,
    pub medal: Option<Medal>,
}

/// Sorts `(name, total)` pairs by ascending total and keeps the first `limit`.
///
/// Blank names become `Unknown`; missing or non-finite totals count as 0.
/// Ties keep their input order.
pub fn rank<I, S>(rows: I, limit: usize) -> Vec<Ranked>
where
    I: IntoIterator<Item = (Option<S>, Option<f64>)>,
    S: AsRef<str>,
{
    let mut entries: Vec<(String, f64)> = rows
        .into_iter()
        .map(|(name, total)| {
            let name = name
                .as_ref()
                .map(|n| n.as_ref().trim())
                .filter(|n| !n.is_empty())
                .unwrap_or("Unknown")
                .to_string();
            let total = total.filter(|t| t.is_finite()).unwrap_or(0.0);
            (name, total)
        })
        .collect();

    entries.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    entries
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(rank, (name, total))| Ranked {
            rank,
            name,
            total,
            medal: Medal::for_rank(rank),
        })
        .collect()
}
