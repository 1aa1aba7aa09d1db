//! Daily activity aggregation.
//!
//! Each user logs one [`ActivityRecord`] per day with four CO₂e readings.
//! [`aggregate`] sums the readings of every record that falls on the
//! selected day and turns the sums into percentages for a breakdown chart.
//!
//! The result always carries all four categories in [`Category::ALL`] order;
//! hiding empty slices is left to [`ActivityBreakdown::visible_slices`].

use std::{collections::BTreeMap, fmt};

use crate::DayKey;

/// Slices at or below this percentage are not drawn.
pub const VISIBLE_EPSILON: f64 = 0.000_001;
/// Slices below this percentage are drawn without a label.
pub const MIN_LABEL_PERCENT: f64 = 1.0;

/// Emission category. The declaration order is the display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Plastic,
    Transportation,
    Energy,
    Food,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Plastic,
        Category::Transportation,
        Category::Energy,
        Category::Food,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Plastic => "Plastic",
            Self::Transportation => "Transportation",
            Self::Energy => "Energy",
            Self::Food => "Food",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One user's readings for one day.
///
/// `date` is kept as the raw server value; it is normalized during
/// aggregation and records whose date cannot be read are skipped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActivityRecord {
    pub date: Option<String>,
    pub plastic: Option<f64>,
    pub transportation: Option<f64>,
    pub energy: Option<f64>,
    pub food: Option<f64>,
}

impl ActivityRecord {
    /// Reading for `category`; missing, negative and non-finite values count as 0.
    #[must_use]
    pub fn reading(&self, category: Category) -> f64 {
        let value = match category {
            Category::Plastic => self.plastic,
            Category::Transportation => self.transportation,
            Category::Energy => self.energy,
            Category::Food => self.food,
        };
        value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0)
    }

    fn day(&self) -> Option<DayKey> {
        self.date.as_deref().and_then(DayKey::normalize)
    }

    fn total(&self) -> f64 {
        Category::ALL.iter().map(|c| self.reading(*c)).sum()
    }
}

/// Aggregated value of one category for the selected day.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub raw_total: f64,
    pub percentage: f64,
}

impl CategoryTotal {
    /// Whether the chart should print the percentage on this slice.
    #[must_use]
    pub fn show_label(&self) -> bool {
        self.percentage >= MIN_LABEL_PERCENT
    }
}

/// Result of [`aggregate`].
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityBreakdown {
    pub day: DayKey,
    pub slices: [CategoryTotal; 4],
    pub total_raw: f64,
}

impl ActivityBreakdown {
    /// `true` when nothing was emitted on the day: callers show a "no data"
    /// state instead of a chart.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_raw <= 0.0
    }

    /// Slices worth drawing, in display order.
    pub fn visible_slices(&self) -> impl Iterator<Item = &CategoryTotal> {
        self.slices
            .iter()
            .filter(|slice| slice.percentage > VISIBLE_EPSILON)
    }

    #[must_use]
    pub fn slice(&self, category: Category) -> &CategoryTotal {
        // `slices` is built from `Category::ALL`, so the index always matches.
        &self.slices[category as usize]
    }
}

/// Sums the readings of every record on `day` and derives percentages.
///
/// Records for other days, and records whose date cannot be normalized, do
/// not contribute. Several records on the same day are summed together.
#[must_use]
pub fn aggregate<'a, I>(records: I, day: DayKey) -> ActivityBreakdown
where
    I: IntoIterator<Item = &'a ActivityRecord>,
{
    let mut sums = [0.0f64; 4];
    for record in records {
        if record.day() != Some(day) {
            continue;
        }
        for (sum, category) in sums.iter_mut().zip(Category::ALL) {
            *sum += record.reading(category);
        }
    }

    let total_raw: f64 = sums.iter().sum();
    let percentage = |value: f64| {
        if total_raw > 0.0 {
            value / total_raw * 100.0
        } else {
            0.0
        }
    };

    let slices = Category::ALL.map(|category| {
        let raw_total = sums[category as usize];
        CategoryTotal {
            category,
            raw_total,
            percentage: percentage(raw_total),
        }
    });

    ActivityBreakdown {
        day,
        slices,
        total_raw,
    }
}

/// Grand total per day, oldest day first. Records without a readable date
/// are skipped.
#[must_use]
pub fn daily_totals<'a, I>(records: I) -> Vec<(DayKey, f64)>
where
    I: IntoIterator<Item = &'a ActivityRecord>,
{
    let mut totals: BTreeMap<DayKey, f64> = BTreeMap::new();
    for record in records {
        if let Some(day) = record.day() {
            *totals.entry(day).or_default() += record.total();
        }
    }
    totals.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    fn record(date: &str, p: f64, t: f64, e: f64, f: f64) -> ActivityRecord {
        ActivityRecord {
            date: Some(date.to_string()),
            plastic: Some(p),
            transportation: Some(t),
            energy: Some(e),
            food: Some(f),
        }
    }

    #[test]
    fn single_plastic_reading_is_whole_pie() {
        let records = [record("2025-01-01", 10.0, 0.0, 0.0, 0.0)];
        let breakdown = aggregate(&records, day("2025-01-01"));

        assert_eq!(breakdown.total_raw, 10.0);
        let plastic = breakdown.slice(Category::Plastic);
        assert_eq!(plastic.raw_total, 10.0);
        assert_eq!(plastic.percentage, 100.0);
        for category in [Category::Transportation, Category::Energy, Category::Food] {
            assert_eq!(breakdown.slice(category).percentage, 0.0);
            assert_eq!(breakdown.slice(category).raw_total, 0.0);
        }
    }

    #[test]
    fn empty_input_is_no_data() {
        let breakdown = aggregate(&[], day("2025-01-01"));
        assert!(breakdown.is_empty());
        assert!(breakdown.slices.iter().all(|s| s.percentage == 0.0));
        assert_eq!(breakdown.visible_slices().count(), 0);
    }

    #[test]
    fn missing_readings_count_as_zero() {
        let records = [ActivityRecord {
            date: Some("2025-01-01".to_string()),
            energy: Some(4.0),
            ..Default::default()
        }];
        let breakdown = aggregate(&records, day("2025-01-01"));
        assert_eq!(breakdown.total_raw, 4.0);
        assert_eq!(breakdown.slice(Category::Energy).percentage, 100.0);
    }

    #[test]
    fn negative_and_nan_readings_are_ignored() {
        let records = [record("2025-01-01", -5.0, f64::NAN, 2.0, 2.0)];
        let breakdown = aggregate(&records, day("2025-01-01"));
        assert_eq!(breakdown.total_raw, 4.0);
        assert_eq!(breakdown.slice(Category::Plastic).raw_total, 0.0);
    }

    #[test]
    fn visible_slices_skip_zero_percent() {
        let records = [record("2025-01-01", 0.0, 3.0, 0.0, 1.0)];
        let breakdown = aggregate(&records, day("2025-01-01"));
        let visible: Vec<_> = breakdown.visible_slices().map(|s| s.category).collect();
        assert_eq!(visible, vec![Category::Transportation, Category::Food]);
        assert_eq!(breakdown.slices.len(), 4);
    }

    #[test]
    fn label_threshold() {
        let records = [record("2025-01-01", 0.5, 99.5, 0.0, 0.0)];
        let breakdown = aggregate(&records, day("2025-01-01"));
        assert!(!breakdown.slice(Category::Plastic).show_label());
        assert!(breakdown.slice(Category::Transportation).show_label());
    }

    #[test]
    fn daily_totals_are_sorted_by_day() {
        let records = [
            record("2025-01-02T10:00:00Z", 1.0, 1.0, 0.0, 0.0),
            record("2025-01-01", 1.0, 0.0, 0.0, 0.0),
            record("2025-01-02", 0.0, 0.0, 0.0, 3.0),
            ActivityRecord {
                date: Some("broken".to_string()),
                plastic: Some(100.0),
                ..Default::default()
            },
        ];
        assert_eq!(
            daily_totals(&records),
            vec![(day("2025-01-01"), 1.0), (day("2025-01-02"), 5.0)]
        );
    }
}
