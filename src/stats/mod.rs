/// Learning statistics
///
/// Streak analysis over dated notes and its terminal rendering.

pub mod streak_analyzer;
pub mod visualizer;

pub use streak_analyzer::{StreakAnalyzer, StreakResult, WeeklyPattern};
pub use visualizer::{format_summary, render};
