//! `tripweaver plan`: Plan one trip from command-line flags.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use clap::Args;
use tripweaver_core::error::TripError;
use tripweaver_core::plan::SectionKind;
use tripweaver_core::trip::{ContentFilter, Pace, TripDraft, TripRequest};

use super::{
    build_planner, load_config, print_section, report_warnings, save_markdown, saved_message,
};

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Where to go (e.g., "Paris, France")
    #[arg(short, long)]
    pub destination: String,

    /// First day of the trip (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Last day of the trip (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,

    /// Lower end of the budget in USD
    #[arg(long, default_value_t = 1000.0)]
    pub budget_min: f64,

    /// Upper end of the budget in USD
    #[arg(long, default_value_t = 3000.0)]
    pub budget_max: f64,

    /// relaxed, moderate, or packed
    #[arg(long, default_value = "moderate")]
    pub pace: String,

    /// Food preferences, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub food: Vec<String>,

    /// Activity types, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub activities: Vec<String>,

    /// family-friendly or adults-only
    #[arg(long, default_value = "family-friendly")]
    pub filter: String,

    /// Print only this section (stay, activities, transport, itinerary)
    #[arg(short, long)]
    pub section: Option<String>,

    /// Also write the markdown file to the output directory
    #[arg(long)]
    pub save: bool,
}

impl PlanArgs {
    /// Validate the flags into a trip request.
    pub fn to_request(&self) -> Result<TripRequest, TripError> {
        TripDraft {
            destination: self.destination.clone(),
            start_date: self.start,
            end_date: self.end,
            budget_range: (self.budget_min, self.budget_max),
            pace: self.pace.parse::<Pace>()?,
            food_preferences: self.food.iter().cloned().collect::<BTreeSet<_>>(),
            activity_types: self.activities.iter().cloned().collect::<BTreeSet<_>>(),
            content_filter: self.filter.parse::<ContentFilter>()?,
        }
        .validate()
    }
}

pub async fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Bad input never reaches the model.
    let request = args.to_request()?;
    let section = match args.section.as_deref() {
        Some(name) => Some(
            SectionKind::from_alias(name).ok_or_else(|| format!("Unknown section: {name}"))?,
        ),
        None => None,
    };

    let config = load_config()?;
    let planner = build_planner(&config, None)?;

    eprintln!(
        "  🤖 AI agents are planning your trip to {} ({} days)...",
        request.destination(),
        request.duration_days()
    );
    let outcome = planner.plan(&request).await?;
    tracing::debug!(strategy = ?outcome.strategy, "Plan ready");
    report_warnings(&outcome);

    match section {
        Some(kind) => print_section(&outcome.plan, kind),
        None => println!("{}", outcome.plan.to_markdown()),
    }

    if args.save {
        let path = save_markdown(&outcome.plan, &config.output_dir())?;
        eprintln!("  ✅ {}", saved_message(&path));
    }

    Ok(())
}
