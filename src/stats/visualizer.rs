// Terminal rendering for streak results: summary, grass calendar and
// weekday bar chart. Pure string building, no I/O.

use crate::stats::streak_analyzer::{weekday_name, StreakResult, WeeklyPattern};
use chrono::{Datelike, Duration, NaiveDate};
use colored::Colorize;
use std::collections::HashSet;

pub const GRASS_WEEKS: i64 = 52;
pub const MAX_BAR_WIDTH: u32 = 20;

const FILLED: &str = "■";
const EMPTY: &str = "·";
const BAR: &str = "█";
const NO_NOTES: &str = "📚 No TIL notes yet. Write your first one with `til note <topic>`!";

/// Plain streak summary
pub fn format_summary(result: &StreakResult) -> String {
    summary_lines(result, false).join("\n")
}

/// Summary followed by the optional grass calendar and weekday chart
pub fn render(result: &StreakResult, show_grass: bool, show_weekly: bool, today: NaiveDate) -> String {
    if !result.has_notes() {
        return NO_NOTES.to_string();
    }

    let mut out = summary_lines(result, true);
    out.push(String::new());

    if show_grass {
        out.push("🌱 Learning grass:".to_string());
        out.push(render_grass(&result.learning_dates, today));
        out.push(String::new());
    }

    if show_weekly {
        out.push(render_weekly(&result.weekly_pattern));
        out.push(String::new());
    }

    out.join("\n")
}

fn summary_lines(result: &StreakResult, emphasize: bool) -> Vec<String> {
    if !result.has_notes() {
        return vec![NO_NOTES.to_string()];
    }

    let bold = |text: String| {
        if emphasize {
            text.bold().to_string()
        } else {
            text
        }
    };

    let mut lines = Vec::new();
    if result.current_streak > 0 {
        lines.push(bold(format!("🔥 Current streak: {} day(s)", result.current_streak)));
    } else {
        lines.push("💤 Current streak: 0 days (nothing written today)".to_string());
    }
    lines.push(bold(format!("🏆 Longest streak: {} day(s)", result.max_streak)));

    if let (Some(start), Some(end)) = (result.max_streak_start, result.max_streak_end) {
        lines.push(format!("   📅 {} ~ {}", start, end));
    }

    lines.push(format!("📊 Learning days: {}", result.total_learning_days));
    lines.push(format!("📈 Learning rate: {:.1}%", result.learning_rate));

    if let Some(first) = result.first_learning_date {
        lines.push(format!("🎯 First note: {}", first));
    }
    if let Some(last) = result.last_learning_date {
        lines.push(format!("📝 Latest note: {}", last));
    }

    lines
}

/// First Monday on or after `today - 52 weeks`
pub fn grass_start(today: NaiveDate) -> NaiveDate {
    let mut start = today - Duration::weeks(GRASS_WEEKS);
    while start.weekday().num_days_from_monday() != 0 {
        start += Duration::days(1);
    }
    start
}

/// One row per week, Monday to Sunday, with a month label every 4 weeks
pub fn render_grass(dates: &[NaiveDate], today: NaiveDate) -> String {
    let learned: HashSet<NaiveDate> = dates.iter().copied().collect();
    let start = grass_start(today);

    let mut out = vec!["    M T W T F S S".to_string(), String::new()];

    for week in 0..GRASS_WEEKS {
        if week % 4 == 0 {
            let labelled = today - Duration::weeks(GRASS_WEEKS - week);
            out.push(format!("{:>4}", labelled.format("%b")));
        }

        let week_start = start + Duration::weeks(week);
        let cells: Vec<String> = (0..7)
            .map(|offset| {
                let day = week_start + Duration::days(offset);
                if learned.contains(&day) {
                    FILLED.green().to_string()
                } else {
                    EMPTY.to_string()
                }
            })
            .collect();
        out.push(format!("    {}", cells.join(" ")));
    }

    out.push(String::new());
    out.push(format!("    {} learned   {} no notes", FILLED.green(), EMPTY));
    out.join("\n")
}

/// Monday-to-Sunday bar chart, scaled to the busiest weekday
pub fn render_weekly(pattern: &WeeklyPattern) -> String {
    if pattern.is_empty() {
        return "📊 No weekday data yet.".to_string();
    }

    let max = pattern.max();
    let mut out = vec!["📊 Weekday pattern:".to_string()];

    for (day, count) in pattern.iter() {
        let width = (count * MAX_BAR_WIDTH / max) as usize;
        let bar = BAR.repeat(width);
        let bar = if count == max {
            bar.green().to_string()
        } else if count > 0 {
            bar.yellow().to_string()
        } else {
            bar
        };
        out.push(format!("  {:>9}: {} ({})", weekday_name(day), bar, count));
    }

    out.join("\n")
}
