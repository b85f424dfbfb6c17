/// Learning streak analysis
///
/// Collects the dates of every `YYYY-MM-DD.md` note in the workspace and
/// derives streaks, learning rate and a weekday histogram from them.

use crate::core::dates::note_date_from_path;
use crate::core::walker::NoteWalker;
use crate::core::WorkspaceContext;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Learning dates per weekday, Monday first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeeklyPattern {
    counts: [u32; 7],
}

impl WeeklyPattern {
    pub fn from_dates<'a>(dates: impl IntoIterator<Item = &'a NaiveDate>) -> Self {
        let mut counts = [0u32; 7];
        for date in dates {
            counts[date.weekday().num_days_from_monday() as usize] += 1;
        }
        Self { counts }
    }

    pub fn count(&self, day: Weekday) -> u32 {
        self.counts[day.num_days_from_monday() as usize]
    }

    pub fn max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.max() == 0
    }

    /// (weekday, count) Monday through Sunday
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, u32)> + '_ {
        WEEKDAYS.iter().map(move |&day| (day, self.count(day)))
    }
}

// Serialized as {"Monday": 3, ...} with zero days left out
impl Serialize for WeeklyPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present: Vec<(Weekday, u32)> = self.iter().filter(|(_, n)| *n > 0).collect();
        let mut map = serializer.serialize_map(Some(present.len()))?;
        for (day, count) in present {
            map.serialize_entry(weekday_name(day), &count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreakResult {
    pub current_streak: u32,
    pub max_streak: u32,
    pub max_streak_start: Option<NaiveDate>,
    pub max_streak_end: Option<NaiveDate>,
    pub total_learning_days: u32,
    pub first_learning_date: Option<NaiveDate>,
    pub last_learning_date: Option<NaiveDate>,
    pub total_days: i64,
    pub learning_rate: f64,
    pub weekly_pattern: WeeklyPattern,
    pub learning_dates: Vec<NaiveDate>,
}

impl StreakResult {
    pub fn has_notes(&self) -> bool {
        !self.learning_dates.is_empty()
    }

    /// Compute every statistic from a set of learning dates
    pub fn from_dates(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> Self {
        let sorted: Vec<NaiveDate> = dates.iter().copied().collect();
        let (Some(&first), Some(&last)) = (sorted.first(), sorted.last()) else {
            return Self::default();
        };

        let (max_streak, max_start, max_end) = longest_run(&sorted);

        let total_days = (last - first).num_days() + 1;
        let learning_rate = if total_days > 0 {
            round_one_decimal(sorted.len() as f64 / total_days as f64 * 100.0)
        } else {
            0.0
        };

        Self {
            current_streak: current_streak(&sorted, today),
            max_streak,
            max_streak_start: Some(max_start),
            max_streak_end: Some(max_end),
            total_learning_days: sorted.len() as u32,
            first_learning_date: Some(first),
            last_learning_date: Some(last),
            total_days,
            learning_rate,
            weekly_pattern: WeeklyPattern::from_dates(&sorted),
            learning_dates: sorted,
        }
    }
}

pub struct StreakAnalyzer<'a> {
    ctx: &'a WorkspaceContext,
}

impl<'a> StreakAnalyzer<'a> {
    pub fn new(ctx: &'a WorkspaceContext) -> Self {
        Self { ctx }
    }

    /// Dates of all dated notes, skipping hidden directories and `venv`
    pub fn learning_dates(&self) -> BTreeSet<NaiveDate> {
        NoteWalker::dated_notes()
            .markdown_files(self.ctx)
            .iter()
            .filter_map(|path| note_date_from_path(path))
            .collect()
    }

    pub fn analyze_at(&self, today: NaiveDate) -> StreakResult {
        let dates = self.learning_dates();
        tracing::debug!("Found {} learning dates", dates.len());
        StreakResult::from_dates(&dates, today)
    }

    pub fn analyze(&self) -> StreakResult {
        self.analyze_at(crate::core::dates::today())
    }
}

// A note today counts as exactly 1 and does not chain into earlier days.
// Otherwise the streak is the run of consecutive days ending yesterday.
fn current_streak(sorted: &[NaiveDate], today: NaiveDate) -> u32 {
    let yesterday = today - Duration::days(1);

    for (i, &date) in sorted.iter().enumerate().rev() {
        if date == today {
            return 1;
        }
        if date == yesterday {
            let mut streak = 1;
            let mut expected = yesterday;
            for &earlier in sorted[..i].iter().rev() {
                expected -= Duration::days(1);
                if earlier != expected {
                    break;
                }
                streak += 1;
            }
            return streak;
        }
        if date < yesterday {
            break;
        }
    }

    0
}

/// Longest run of consecutive days; ties keep the earliest run
fn longest_run(sorted: &[NaiveDate]) -> (u32, NaiveDate, NaiveDate) {
    let mut best = (0, sorted[0], sorted[0]);
    let mut run = 1;
    let mut run_start = sorted[0];

    for pair in sorted.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if (next - prev).num_days() == 1 {
            run += 1;
        } else {
            if run > best.0 {
                best = (run, run_start, prev);
            }
            run = 1;
            run_start = next;
        }
    }

    if run > best.0 {
        best = (run, run_start, sorted[sorted.len() - 1]);
    }
    best
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
