// Journal features working together on a scratch workspace

use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;
use til_lib::core::{DigestGenerator, IndexGenerator, LinkManager, NoteWriter, Searcher};
use til_lib::schedule::{Platform, ScheduleRegistrar};
use til_lib::stats::StreakAnalyzer;
use til_lib::WorkspaceContext;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn workspace() -> (TempDir, WorkspaceContext) {
    let temp = TempDir::new().unwrap();
    let ctx = WorkspaceContext::new(temp.path()).unwrap();
    (temp, ctx)
}

#[test]
fn test_notes_feed_streak_index_and_digest() {
    let (_temp, ctx) = workspace();
    let writer = NoteWriter::new(&ctx);

    for (topic, date) in [
        ("android", "2025-01-01"),
        ("android", "2025-01-02"),
        ("rust", "2025-01-03"),
        ("rust", "2025-01-10"),
    ] {
        writer.create_or_open(topic, d(date)).unwrap();
    }
    fs::write(
        ctx.join("rust/2025-01-10.md"),
        "# TIL - 2025-01-10\n\n- Borrow checker and lifetimes",
    )
    .unwrap();

    let streak = StreakAnalyzer::new(&ctx).analyze_at(d("2025-01-11"));
    assert_eq!(streak.max_streak, 3);
    assert_eq!(streak.max_streak_start, Some(d("2025-01-01")));
    assert_eq!(streak.max_streak_end, Some(d("2025-01-03")));
    assert_eq!(streak.total_learning_days, 4);
    assert_eq!(streak.current_streak, 1);

    let report = IndexGenerator::new(&ctx).update().unwrap();
    assert_eq!(report.topic_count, 2);
    let readme = fs::read_to_string(ctx.index_path()).unwrap();
    assert!(readme.contains("android"));
    assert!(readme.contains("rust/2025-01-10.md"));

    let hits = Searcher::new(&ctx).search("LIFETIMES").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].path, "rust/2025-01-10.md");

    let digest = DigestGenerator::new(&ctx)
        .digest_range(d("2025-01-02"), d("2025-01-03"))
        .unwrap()
        .unwrap();
    assert_eq!(digest.entry_count, 2);
    assert!(digest.path.ends_with("zip-2025-01-02_to_2025-01-03.md"));

    // The digest and README are not notes
    let again = StreakAnalyzer::new(&ctx).analyze_at(d("2025-01-11"));
    assert_eq!(again.total_learning_days, 4);
}

#[test]
fn test_links_are_deduplicated_per_day() {
    let (_temp, ctx) = workspace();
    let links = LinkManager::new(&ctx);
    let url = "https://doc.rust-lang.org/book/";

    links.add_link(url, d("2025-01-20"), Some("rust"), Some("The Book")).unwrap();
    links.add_link(url, d("2025-01-20"), Some("rust"), Some("The Book")).unwrap();
    links.add_link(url, d("2025-01-21"), None, None).unwrap();

    let content = fs::read_to_string(ctx.join("2025-01-Links.md")).unwrap();
    assert_eq!(content.matches(url).count(), 2);
    assert!(content.contains("#### 2025-01-20"));
    assert!(content.contains("#### 2025-01-21"));
}

#[test]
fn test_schedule_round_trip_without_backend() {
    let (_temp, ctx) = workspace();
    fs::write(ctx.auto_git_config_path(), r#"{"other": 1}"#).unwrap();

    let registrar =
        ScheduleRegistrar::with_backend(&ctx, Platform::Other("test".to_string()), None).unwrap();

    assert!(registrar.setup("25:00", None).is_err());
    assert!(!registrar.status().enabled);

    // Persisted even though this platform cannot register a job
    assert!(registrar.setup("20:00", Some("msg")).is_err());
    let status = registrar.status();
    assert!(status.enabled);
    assert_eq!(status.time.as_deref(), Some("20:00"));
    assert_eq!(status.message.as_deref(), Some("msg"));

    registrar.remove().unwrap();
    assert!(!registrar.status().enabled);

    let raw = fs::read_to_string(ctx.auto_git_config_path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json, serde_json::json!({"other": 1}));
}
