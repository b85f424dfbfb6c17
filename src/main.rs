// til - a Today-I-Learned journal that keeps itself backed up
//
// This is the main entry point. Parses CLI args and dispatches to handlers.

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use til_lib::{
    core::{
        dates, highlight_keyword, DigestGenerator, IndexGenerator, LinkManager, LinkStatus,
        NoteStatus, NoteWriter, Searcher,
    },
    git::{AutoCommitWorkflow, GitCli, RunOutcome},
    schedule::{format_status, ScheduleRegistrar},
    stats::{self, StreakAnalyzer},
    Result, TilConfig, TilError, WorkspaceContext,
};

#[derive(Parser, Debug)]
#[command(name = "til")]
#[command(author, version, about = "Today I Learned notes with streaks and scheduled git backups")]
struct Cli {
    /// Journal directory (defaults to the current directory)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create or open today's note for a topic
    Note {
        /// Topic folder, e.g. android (falls back to default_category)
        topic: Option<String>,

        /// Note date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Search all notes for a keyword
    Search { keyword: String },

    /// Fuzzy-find note files
    Find {
        query: String,

        /// Maximum number of results
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },

    /// Regenerate README.md
    Index,

    /// Bundle notes into one file (current month by default)
    Zip {
        /// Start date (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<String>,
    },

    /// Add a link to this month's Links file
    Link {
        url: String,

        #[arg(long)]
        title: Option<String>,

        /// Tag, e.g. kotlin (falls back to default_link_tag)
        #[arg(long)]
        tag: Option<String>,

        /// Date section (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Stage, commit and push everything
    Save { message: String },

    /// Show learning streaks
    Streak {
        #[arg(long)]
        no_grass: bool,

        #[arg(long)]
        no_weekly: bool,

        /// Print raw statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scheduled auto-commit
    #[command(subcommand)]
    Auto(AutoCommand),
}

#[derive(Subcommand, Debug)]
enum AutoCommand {
    /// Schedule a daily auto-commit
    Setup {
        /// Time of day (HH:MM)
        #[arg(long)]
        time: String,

        #[arg(long)]
        message: Option<String>,
    },

    /// Show the current schedule
    Status,

    /// Remove the schedule
    Remove,

    /// Commit and push pending changes (used by the scheduler)
    Run {
        #[arg(long)]
        message: Option<String>,
    },

    /// Run the auto-commit once, right now
    Test,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let ctx = match &cli.dir {
        Some(dir) => WorkspaceContext::new(dir)
            .with_context(|| format!("Cannot use '{}' as the journal directory", dir.display()))?,
        None => WorkspaceContext::current().context("Cannot resolve the current directory")?,
    };
    tracing::debug!("Workspace: {}", ctx.root().display());

    // Scheduled runs must not die on a bad .tilrc
    let config = match cli.command {
        Command::Auto(_) => TilConfig::load_or_default(&ctx),
        _ => TilConfig::load(&ctx).context("Failed to load .tilrc")?,
    };

    if let Err(e) = dispatch(cli.command, &ctx, &config) {
        eprintln!("{} {}", "✗".red(), e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

fn dispatch(command: Command, ctx: &WorkspaceContext, config: &TilConfig) -> Result<()> {
    match command {
        Command::Note { topic, date } => handle_note(ctx, config, topic, date),
        Command::Search { keyword } => handle_search(ctx, &keyword),
        Command::Find { query, limit } => handle_find(ctx, &query, limit),
        Command::Index => handle_index(ctx),
        Command::Zip { from, to } => handle_zip(ctx, from, to),
        Command::Link {
            url,
            title,
            tag,
            date,
        } => handle_link(ctx, config, &url, title, tag, date),
        Command::Save { message } => handle_save(ctx, config, &message),
        Command::Streak {
            no_grass,
            no_weekly,
            json,
        } => handle_streak(ctx, !no_grass, !no_weekly, json),
        Command::Auto(auto) => match auto {
            AutoCommand::Setup { time, message } => handle_auto_setup(ctx, config, &time, message),
            AutoCommand::Status => handle_auto_status(ctx, config),
            AutoCommand::Remove => handle_auto_remove(ctx, config),
            AutoCommand::Run { message } => handle_auto_run(ctx, config, message.as_deref()),
            AutoCommand::Test => {
                println!("Running auto-commit now...");
                handle_auto_run(ctx, config, None)
            }
        },
    }
}

fn date_or_today(date: Option<String>) -> Result<chrono::NaiveDate> {
    match date {
        Some(d) => dates::parse_date(&d),
        None => Ok(dates::today()),
    }
}

fn handle_note(
    ctx: &WorkspaceContext,
    config: &TilConfig,
    topic: Option<String>,
    date: Option<String>,
) -> Result<()> {
    let topic = topic
        .or_else(|| config.general.default_category.clone())
        .ok_or_else(|| {
            TilError::Config(
                "Give a topic or set default_category in .tilrc".to_string(),
            )
        })?;
    let date = date_or_today(date)?;

    let note = NoteWriter::new(ctx).create_or_open(&topic, date)?;
    match note.status {
        NoteStatus::Created => println!("📄 Created new TIL entry: {}", note.path.display()),
        NoteStatus::Existing => println!("📂 Existing TIL entry: {}", note.path.display()),
    }

    Ok(())
}

fn handle_search(ctx: &WorkspaceContext, keyword: &str) -> Result<()> {
    let matches = Searcher::new(ctx).search(keyword)?;

    if matches.is_empty() {
        println!("No notes found matching '{}'", keyword);
        return Ok(());
    }

    println!("\nFound {} line(s) matching '{}':", matches.len(), keyword);
    println!("{}", "=".repeat(60));
    for m in &matches {
        println!(
            "{}:{}: {}",
            m.path.cyan(),
            m.line_number,
            highlight_keyword(&m.line, keyword)
        );
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

fn handle_find(ctx: &WorkspaceContext, query: &str, limit: usize) -> Result<()> {
    let results = Searcher::new(ctx).find(query, limit);

    if results.is_empty() {
        println!("📭 No TIL files match '{}'", query);
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        println!("{:3}. {}", i + 1, result.path);
    }

    Ok(())
}

fn handle_index(ctx: &WorkspaceContext) -> Result<()> {
    let report = IndexGenerator::new(ctx).update()?;
    println!(
        "✓ README.md updated: {} topic(s), {} link file(s), {} lines",
        report.topic_count, report.link_file_count, report.line_count
    );
    Ok(())
}

fn handle_zip(ctx: &WorkspaceContext, from: Option<String>, to: Option<String>) -> Result<()> {
    let generator = DigestGenerator::new(ctx);

    let digest = match (from, to) {
        (Some(from), Some(to)) => {
            generator.digest_range(dates::parse_date(&from)?, dates::parse_date(&to)?)?
        }
        _ => {
            use chrono::Datelike;
            let today = dates::today();
            generator.digest_month(today.year(), today.month())?
        }
    };

    match digest {
        Some(digest) => println!(
            "📦 Wrote {} ({} note(s))",
            digest.path.display(),
            digest.entry_count
        ),
        None => println!("📭 No TIL notes in that period."),
    }

    Ok(())
}

fn handle_link(
    ctx: &WorkspaceContext,
    config: &TilConfig,
    url: &str,
    title: Option<String>,
    tag: Option<String>,
    date: Option<String>,
) -> Result<()> {
    let date = date_or_today(date)?;
    let tag = tag.or_else(|| config.general.default_link_tag.clone());

    let outcome = LinkManager::new(ctx).add_link(url, date, tag.as_deref(), title.as_deref())?;
    match outcome.status {
        LinkStatus::CreatedFile => println!("🆕 Created {}", outcome.path.display()),
        LinkStatus::Added => println!("🔗 Added link to {}", outcome.path.display()),
        LinkStatus::AlreadyExists => println!("⚠️  Link already listed for {}", date),
    }

    Ok(())
}

fn handle_save(ctx: &WorkspaceContext, config: &TilConfig, message: &str) -> Result<()> {
    let client = GitCli::new(ctx);
    client.ensure_repository()?;

    let steps = AutoCommitWorkflow::new(&client, &config.git).save(message)?;
    for step in steps {
        println!("✓ {}", step);
    }
    println!("🚀 Saved to git");

    Ok(())
}

fn handle_streak(ctx: &WorkspaceContext, show_grass: bool, show_weekly: bool, json: bool) -> Result<()> {
    let today = dates::today();
    let result = StreakAnalyzer::new(ctx).analyze_at(today);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if show_grass || show_weekly {
        println!("{}", stats::render(&result, show_grass, show_weekly, today));
    } else {
        println!("{}", stats::format_summary(&result));
    }

    Ok(())
}

fn handle_auto_setup(
    ctx: &WorkspaceContext,
    config: &TilConfig,
    time: &str,
    message: Option<String>,
) -> Result<()> {
    let registrar = ScheduleRegistrar::new(ctx, &config.schedule)?;
    let schedule = registrar.setup(time, message.as_deref())?;

    println!("✓ Auto-commit scheduled daily at {}", schedule.time);
    if let Some(message) = &schedule.message {
        println!("  Message: {}", message);
    }
    Ok(())
}

fn handle_auto_status(ctx: &WorkspaceContext, config: &TilConfig) -> Result<()> {
    let registrar = ScheduleRegistrar::new(ctx, &config.schedule)?;
    print!("{}", format_status(&registrar.status()));
    Ok(())
}

fn handle_auto_remove(ctx: &WorkspaceContext, config: &TilConfig) -> Result<()> {
    ScheduleRegistrar::new(ctx, &config.schedule)?.remove()?;
    println!("✓ Auto-commit schedule removed");
    Ok(())
}

fn handle_auto_run(ctx: &WorkspaceContext, config: &TilConfig, message: Option<&str>) -> Result<()> {
    let client = GitCli::new(ctx);

    match AutoCommitWorkflow::new(&client, &config.git).run(message)? {
        RunOutcome::NothingToCommit => println!("Nothing to commit."),
        RunOutcome::Committed {
            message,
            files,
            pushed,
        } => {
            println!("✓ Committed {} file(s): {}", files.len(), message);
            if pushed {
                println!("✓ Pushed to {}/{}", config.git.remote, config.git.branch);
            } else {
                println!("  No remote configured, skipped push");
            }
        }
    }

    Ok(())
}
