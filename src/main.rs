// src/main.rs

use algo_tracker_lib::config::Config;
use algo_tracker_lib::constants::{DAY_FORMAT, EXPORT_FILE_NAME};
use algo_tracker_lib::models::{NewProblem, Problem, ProblemId, ProblemQuery, SortKey};
use algo_tracker_lib::repository::ProblemStore;
use algo_tracker_lib::{analytics, query, scheduler, tracker, TrackerError};
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "algo-tracker", about = "Spaced repetition tracker for algorithm problems", version)]
struct Cli {
    /// SQLite database file (default: $ALGO_TRACKER_DB or the user data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Treat this day (YYYY-MM-DD) as today
    #[arg(long, global = true, value_parser = parse_day)]
    today: Option<NaiveDate>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Log filter, overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Track a new problem, scheduled from today
    Add {
        title: String,
        url: String,
        /// Easy, Medium or Hard (default Easy)
        #[arg(long, default_value = "")]
        difficulty: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// Accept an ADD_PROBLEM message (JSON argument, or stdin when omitted or "-")
    Receive { message: Option<String> },
    /// Record a review outcome (success unless --fail)
    Review {
        id: ProblemId,
        #[arg(long)]
        fail: bool,
    },
    /// Stop tracking a problem
    Delete { id: ProblemId },
    /// List problems with optional filters and sorting
    List {
        /// Case-insensitive title substring
        #[arg(long)]
        title: Option<String>,
        /// Comma-separated tags, any match
        #[arg(long)]
        tags: Option<String>,
        /// difficulty, reviewCount or nextReview
        #[arg(long, value_parser = parse_sort)]
        sort: Option<SortKey>,
    },
    /// Problems scheduled for today
    Today,
    /// Number of problems scheduled per day
    Calendar,
    /// Counts by difficulty and by tag
    Stats,
    /// Streak, weak-tag recommendation and today's workload
    Summary,
    /// Write the collection to a JSON backup
    Export { path: Option<PathBuf> },
    /// Replace the collection with a JSON backup
    Import { path: PathBuf },
    /// Open a problem's URL in the browser
    Open { id: ProblemId },
}

fn parse_day(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DAY_FORMAT).map_err(|e| format!("{}: {}", s, e))
}

fn parse_sort(s: &str) -> std::result::Result<SortKey, String> {
    s.parse()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.log_level.as_deref() {
        Some(level) => env_logger::Builder::new().parse_filters(level).init(),
        None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .init(),
    }

    let config = Config::resolve(cli.db.clone(), cli.today)?;
    let mut store = ProblemStore::open(&config.db_path)?;
    let problems = store.load()?;
    debug!("Loaded {} problems, today is {}", problems.len(), config.today);

    run(cli.command, cli.format, &config, &mut store, problems)
}

fn run(
    command: Command,
    format: OutputFormat,
    config: &Config,
    store: &mut ProblemStore,
    problems: Vec<Problem>,
) -> Result<()> {
    let today = config.today;

    match command {
        Command::Add {
            title,
            url,
            difficulty,
            tags,
        } => {
            let candidate = NewProblem {
                title,
                url,
                difficulty: difficulty.parse().unwrap_or_default(),
                tags: tracker::parse_tags(&tags),
            };
            let updated = tracker::add_problem(&problems, candidate, today)?;
            store.save(&updated)?;
            print_added(updated.last(), format)?;
        }
        Command::Receive { message } => {
            let message = read_message(message)?;
            let event = tracker::parse_inbound(&message)?;
            let updated = tracker::handle_inbound(&problems, event, today)?;
            store.save(&updated)?;
            print_added(updated.last(), format)?;
        }
        Command::Review { id, fail } => {
            let updated = tracker::mark_reviewed(&problems, id, today, !fail)?;
            store.save(&updated)?;
            if let OutputFormat::Plain = format {
                println!(
                    "{}",
                    if fail { "Marked as failed ❌" } else { "Marked as reviewed ✅" }
                );
            }
            let reviewed: Vec<Problem> = updated.into_iter().filter(|p| p.id == id).collect();
            print_problems(&reviewed, format)?;
        }
        Command::Delete { id } => {
            let updated = tracker::delete_problem(&problems, id)?;
            store.save(&updated)?;
            println!("Deleted problem {}", id);
        }
        Command::List { title, tags, sort } => {
            let q = ProblemQuery {
                title,
                tags,
                sort,
            };
            print_problems(&query::query_problems(&problems, &q), format)?;
        }
        Command::Today => {
            let due: Vec<Problem> = scheduler::due_on(&problems, today).into_iter().cloned().collect();
            if due.is_empty() {
                if let OutputFormat::Plain = format {
                    println!("No reviews scheduled for today.");
                    return Ok(());
                }
            }
            print_problems(&due, format)?;
        }
        Command::Calendar => {
            let calendar = scheduler::review_calendar(&problems);
            match format {
                OutputFormat::Json => print_json(&calendar)?,
                OutputFormat::Plain => {
                    for (day, count) in &calendar {
                        let marker = if *day == today { " <- today" } else { "" };
                        println!("{}  {}{}", day, count, marker);
                    }
                }
            }
        }
        Command::Stats => {
            let by_difficulty = analytics::difficulty_chart(&problems);
            let by_tag = analytics::tag_distribution(&problems);
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "difficulty": by_difficulty,
                    "tags": by_tag,
                }))?,
                OutputFormat::Plain => {
                    println!("By difficulty:");
                    for row in &by_difficulty {
                        println!("  {:<8} {}", row.difficulty, row.count);
                    }
                    println!("By tag:");
                    for row in &by_tag {
                        println!("  {:<20} {}", row.tag, row.count);
                    }
                }
            }
        }
        Command::Summary => {
            let summary = analytics::summarize(&problems, today);
            match format {
                OutputFormat::Json => print_json(&summary)?,
                OutputFormat::Plain => {
                    println!("🎯 {}", summary.recommendation);
                    println!("🔥 Streak: {} day(s) in a row", summary.streak);
                    println!(
                        "📅 Today's reviews: {} of {} problems",
                        summary.due_today, summary.total_problems
                    );
                }
            }
        }
        Command::Export { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));
            tracker::export_to_path(&problems, &path)?;
            info!("Exported {} problems to {:?}", problems.len(), path);
            println!("Exported {} problems to {}", problems.len(), path.display());
        }
        Command::Import { path } => {
            let imported = tracker::import_from_path(&path)?;
            store.save(&imported)?;
            println!("Problems imported successfully! ({} problems)", imported.len());
        }
        Command::Open { id } => {
            let problem = problems
                .iter()
                .find(|p| p.id == id)
                .ok_or(TrackerError::ProblemNotFound(id))?;
            webbrowser::open(&problem.url)?;
        }
    }

    Ok(())
}

fn read_message(message: Option<String>) -> Result<String> {
    match message {
        Some(text) if text != "-" => Ok(text),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_added(problem: Option<&Problem>, format: OutputFormat) -> Result<()> {
    let Some(p) = problem else { return Ok(()) };
    match format {
        OutputFormat::Json => print_json(p)?,
        OutputFormat::Plain => {
            println!("Added \"{}\" (ID: {})", p.title, p.id);
            println!("  Reviews: {}", join_days(&p.reviews));
        }
    }
    Ok(())
}

fn print_problems(problems: &[Problem], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(problems)?,
        OutputFormat::Plain => {
            for p in problems {
                let rate = analytics::success_rate(p);
                println!("[{}] {} ({})", p.id, p.title, p.difficulty);
                println!("    {}", p.url);
                if !p.tags.is_empty() {
                    println!("    Tags: {}", p.tags.join(", "));
                }
                println!(
                    "    Next Review: {} | Success Rate: {}/{}",
                    analytics::next_review_label(p),
                    rate.success,
                    rate.total
                );
            }
        }
    }
    Ok(())
}

fn join_days(days: &[NaiveDate]) -> String {
    days.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_sort(args: &[&str]) -> Option<SortKey> {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::List { sort, .. } => sort,
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_list_sort_values() {
        assert_eq!(list_sort(&["algo-tracker", "list"]), None);
        assert_eq!(
            list_sort(&["algo-tracker", "list", "--sort", "reviewCount"]),
            Some(SortKey::ReviewCount)
        );
        assert_eq!(
            list_sort(&["algo-tracker", "list", "--sort", "nextReview"]),
            Some(SortKey::NextReview)
        );
        assert_eq!(
            list_sort(&["algo-tracker", "list", "--sort", "difficulty"]),
            Some(SortKey::Difficulty)
        );
    }

    #[test]
    fn test_list_rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["algo-tracker", "list", "--sort", "review-count"]).is_err());
    }
}
