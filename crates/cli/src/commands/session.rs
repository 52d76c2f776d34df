//! `tripweaver session`: Plan interactively and switch between sections.
//!
//! All agent work happens once per plan; switching sections afterwards is
//! instant. The plan cache lives as long as the session.

use std::collections::BTreeSet;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};
use tripweaver_core::plan::{SectionKind, TravelPlan};
use tripweaver_core::trip::{ContentFilter, Pace, TripDraft, TripRequest};
use tripweaver_planner::{ExpiringCache, SharedPlanCache, TravelPlanner};

use super::{
    build_planner, load_config, print_section, report_warnings, save_markdown, saved_message,
};

/// What the user typed at the session prompt.
#[derive(Debug, Clone, PartialEq)]
enum SessionCommand {
    New,
    Show(SectionKind),
    All,
    Save,
    CacheSize,
    CacheClear,
    Help,
    Exit,
    Unknown(String),
}

impl SessionCommand {
    fn parse(input: &str) -> Self {
        let input = input.trim();
        match input.to_ascii_lowercase().as_str() {
            "new" | "n" => SessionCommand::New,
            "1" => SessionCommand::Show(SectionKind::PlacesToStay),
            "2" => SessionCommand::Show(SectionKind::Activities),
            "3" => SessionCommand::Show(SectionKind::Transportation),
            "4" => SessionCommand::Show(SectionKind::Itinerary),
            "all" | "md" => SessionCommand::All,
            "save" | "s" => SessionCommand::Save,
            "cache" => SessionCommand::CacheSize,
            "cache clear" => SessionCommand::CacheClear,
            "help" | "?" => SessionCommand::Help,
            "exit" | "quit" | "/exit" | "/quit" | ":q" => SessionCommand::Exit,
            other => match SectionKind::from_alias(other) {
                Some(kind) => SessionCommand::Show(kind),
                None => SessionCommand::Unknown(input.to_string()),
            },
        }
    }
}

/// Line-oriented stdin with a visible prompt.
struct Prompter {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompter {
    fn new() -> Self {
        Self {
            lines: BufReader::new(io::stdin()).lines(),
        }
    }

    /// Ask for one line. `None` on end of input.
    async fn ask(&mut self, label: &str) -> std::io::Result<Option<String>> {
        print!("  {label} > ");
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?.map(|l| l.trim().to_string()))
    }

    /// Ask with a default used when the answer is blank.
    async fn ask_or(&mut self, label: &str, default: &str) -> std::io::Result<Option<String>> {
        let answer = self.ask(&label_with_default(label, default)).await?;
        Ok(answer.map(|a| if a.is_empty() { default.to_string() } else { a }))
    }
}

/// `label [default]`, or just `label` when there is no default to show.
fn label_with_default(label: &str, default: &str) -> String {
    if default.is_empty() {
        label.to_string()
    } else {
        format!("{label} [{default}]")
    }
}

/// Empty the session cache, if there is one, and say what happened.
fn clear_cache(cache: Option<&SharedPlanCache>) -> &'static str {
    match cache {
        Some(cache) => {
            cache.lock().unwrap_or_else(|e| e.into_inner()).clear();
            "Cache cleared!"
        }
        None => "Cache is disabled",
    }
}

fn comma_set(input: &str) -> BTreeSet<String> {
    input.split(',').map(str::to_string).collect()
}

fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{input}': {e} (expected YYYY-MM-DD)"))
}

fn parse_amount(input: &str) -> Result<f64, String> {
    input
        .trim()
        .trim_start_matches('$')
        .replace(',', "")
        .parse::<f64>()
        .map_err(|_| format!("Invalid amount '{input}'"))
}

/// Walk the user through the trip form. `Ok(None)` on end of input.
async fn ask_trip(
    prompter: &mut Prompter,
) -> Result<Option<TripRequest>, Box<dyn std::error::Error>> {
    macro_rules! field {
        ($e:expr) => {
            match $e.await? {
                Some(value) => value,
                None => return Ok(None),
            }
        };
    }

    let destination = field!(prompter.ask("Destination"));
    let start = parse_date(&field!(prompter.ask("Start date (YYYY-MM-DD)")))?;
    let end = parse_date(&field!(prompter.ask("End date (YYYY-MM-DD)")))?;
    let budget_min = parse_amount(&field!(prompter.ask_or("Budget min (USD)", "1000")))?;
    let budget_max = parse_amount(&field!(prompter.ask_or("Budget max (USD)", "3000")))?;
    let pace: Pace = field!(prompter.ask_or("Pace (relaxed/moderate/packed)", "moderate")).parse()?;
    let food = field!(prompter.ask_or("Food preferences (comma-separated)", ""));
    let activities = field!(prompter.ask_or("Activity types (comma-separated)", ""));
    let content_filter: ContentFilter = field!(prompter.ask_or(
        "Content filter (family-friendly/adults-only)",
        "family-friendly"
    ))
    .parse()?;

    let request = TripDraft {
        destination,
        start_date: start,
        end_date: end,
        budget_range: (budget_min, budget_max),
        pace,
        food_preferences: comma_set(&food),
        activity_types: comma_set(&activities),
        content_filter,
    }
    .validate()?;

    Ok(Some(request))
}

fn print_help() {
    println!();
    println!("  Commands:");
    println!("    new           Plan a new trip");
    println!("    1 / stay      🏨 Places to Stay");
    println!("    2 / activities 🎭 Activities");
    println!("    3 / transport 🚗 Transportation");
    println!("    4 / itinerary 📅 Day-by-Day Itinerary");
    println!("    all           Whole plan as markdown");
    println!("    save          Write the markdown file");
    println!("    cache         Show cache size ('cache clear' to empty it)");
    println!("    exit          Leave the session");
    println!();
}

async fn plan_new(
    prompter: &mut Prompter,
    planner: &TravelPlanner,
) -> Result<Option<TravelPlan>, Box<dyn std::error::Error>> {
    let Some(request) = ask_trip(prompter).await? else {
        return Ok(None);
    };

    println!();
    println!("  🤖 AI agents are planning your trip...");
    println!("  📋 This usually takes 20-40 seconds. Everything is gathered once, then you can switch sections freely.");

    let outcome = planner.plan(&request).await?;
    tracing::debug!(strategy = ?outcome.strategy, cached = outcome.cached, "Plan ready");
    report_warnings(&outcome);
    if outcome.cached {
        println!("  ♻️  Reused a plan from this session's cache");
    }
    println!("  ✅ Travel plan generated! Pick a section (1-4), or 'help'.");
    Ok(Some(outcome.plan))
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;

    let cache: Option<SharedPlanCache> = config.cache.enabled.then(|| {
        Arc::new(Mutex::new(ExpiringCache::new(Duration::from_secs(
            config.cache.ttl_secs,
        ))))
    });
    let planner = build_planner(&config, cache.clone())?;

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║       🌍 TripWeaver — Interactive Planner      ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", config.provider);
    println!("  Model:     {} (supervisor: {})", config.model, config.supervisor_model);
    println!("  Cache:     {}", if cache.is_some() { "on" } else { "off" });
    print_help();

    let mut prompter = Prompter::new();
    let mut current: Option<TravelPlan> = None;

    loop {
        let Some(line) = prompter.ask("tripweaver").await? else {
            break;
        };
        if line.is_empty() {
            continue;
        }

        match SessionCommand::parse(&line) {
            SessionCommand::Exit => break,
            SessionCommand::Help => print_help(),
            SessionCommand::New => match plan_new(&mut prompter, &planner).await {
                Ok(Some(plan)) => current = Some(plan),
                Ok(None) => break,
                Err(e) => eprintln!("  [Error] {e}"),
            },
            SessionCommand::Show(kind) => match &current {
                Some(plan) => print_section(plan, kind),
                None => println!("  No plan yet. Type 'new' to create one."),
            },
            SessionCommand::All => match &current {
                Some(plan) => println!("\n{}\n", plan.to_markdown()),
                None => println!("  No plan yet. Type 'new' to create one."),
            },
            SessionCommand::Save => match &current {
                Some(plan) => match save_markdown(plan, &config.output_dir()) {
                    Ok(path) => println!("  📥 {}", saved_message(&path)),
                    Err(e) => eprintln!("  [Error] Could not save plan: {e}"),
                },
                None => println!("  No plan yet. Type 'new' to create one."),
            },
            SessionCommand::CacheSize => match &cache {
                Some(cache) => {
                    let size = cache.lock().unwrap_or_else(|e| e.into_inner()).size();
                    println!("  Cache size: {size} items");
                }
                None => println!("  Cache is disabled"),
            },
            SessionCommand::CacheClear => println!("  {}", clear_cache(cache.as_ref())),
            SessionCommand::Unknown(input) => {
                println!("  Unknown command '{input}'. Type 'help' for options.");
            }
        }
    }

    println!();
    println!("  Goodbye! 👋");
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_and_aliases_pick_sections() {
        assert_eq!(
            SessionCommand::parse("1"),
            SessionCommand::Show(SectionKind::PlacesToStay)
        );
        assert_eq!(
            SessionCommand::parse(" Transport "),
            SessionCommand::Show(SectionKind::Transportation)
        );
        assert_eq!(
            SessionCommand::parse("itinerary"),
            SessionCommand::Show(SectionKind::Itinerary)
        );
    }

    #[test]
    fn session_commands() {
        assert_eq!(SessionCommand::parse("new"), SessionCommand::New);
        assert_eq!(SessionCommand::parse("Cache Clear"), SessionCommand::CacheClear);
        assert_eq!(SessionCommand::parse("cache"), SessionCommand::CacheSize);
        assert_eq!(SessionCommand::parse(":q"), SessionCommand::Exit);
        assert_eq!(
            SessionCommand::parse("nightlife"),
            SessionCommand::Unknown("nightlife".into())
        );
    }

    #[test]
    fn blank_default_not_shown_in_prompt() {
        assert_eq!(label_with_default("Food preferences", ""), "Food preferences");
        assert_eq!(label_with_default("Pace", "moderate"), "Pace [moderate]");
    }

    #[test]
    fn clearing_reports_disabled_cache() {
        assert_eq!(clear_cache(None), "Cache is disabled");

        let cache: SharedPlanCache =
            Arc::new(Mutex::new(ExpiringCache::new(Duration::from_secs(60))));
        cache.lock().unwrap().set("trip", "plan".to_string());
        assert_eq!(clear_cache(Some(&cache)), "Cache cleared!");
        assert_eq!(cache.lock().unwrap().size(), 0);
    }

    #[test]
    fn amounts_accept_dollar_formatting() {
        assert_eq!(parse_amount("$1,500").unwrap(), 1500.0);
        assert_eq!(parse_amount(" 3000 ").unwrap(), 3000.0);
        assert!(parse_amount("lots").is_err());
    }

    #[test]
    fn dates_need_iso_format() {
        assert_eq!(
            parse_date("2025-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        assert!(parse_date("06/01/2025").unwrap_err().contains("YYYY-MM-DD"));
    }

    #[test]
    fn blank_preferences_dropped_by_validation() {
        let set = comma_set("vegan, ,local");
        assert_eq!(set.len(), 3);
        let request = TripDraft {
            destination: "Rome".into(),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            budget_range: (0.0, 0.0),
            pace: Pace::Relaxed,
            food_preferences: set,
            activity_types: comma_set(""),
            content_filter: ContentFilter::AdultsOnly,
        }
        .validate()
        .unwrap();
        assert_eq!(request.food_preferences().len(), 2);
        assert!(request.activity_types().is_empty());
    }
}
