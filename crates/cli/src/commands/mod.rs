//! Subcommands and the pieces they share.

pub mod doctor;
pub mod onboard;
pub mod plan;
pub mod session;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tripweaver_agent::{HandoffRuntime, Roster};
use tripweaver_config::AppConfig;
use tripweaver_core::plan::{MARKDOWN_CONTENT_TYPE, SectionKind, TravelPlan};
use tripweaver_planner::{PlanOutcome, SharedPlanCache, TravelPlanner};

/// Load config and fail early, with setup guidance, when no key is set.
pub(crate) fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if config.provider != "ollama" {
        if let Err(e) = config.require_api_key() {
            eprintln!();
            eprintln!("  ERROR: {e}");
            eprintln!();
            return Err("No API key found. See above for setup instructions.".into());
        }
    }

    Ok(config)
}

/// Wire provider → runtime → planner from config.
pub(crate) fn build_planner(
    config: &AppConfig,
    cache: Option<SharedPlanCache>,
) -> Result<TravelPlanner, Box<dyn std::error::Error>> {
    let provider = tripweaver_providers::build_from_config(config)?;
    let runtime = HandoffRuntime::new(provider)
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens);

    let planner = TravelPlanner::new(Arc::new(runtime), Roster::from_config(config))
        .with_max_turns(config.max_turns);

    Ok(match cache {
        Some(cache) => planner.with_cache(cache),
        None => planner,
    })
}

/// Print the warnings a plan came back with.
pub(crate) fn report_warnings(outcome: &PlanOutcome) {
    if !outcome.under_filled.is_empty() {
        eprintln!(
            "  ⚠️  Empty sections detected: {}",
            outcome.under_filled_titles().join(", ")
        );
        eprintln!("      The supervisor did not follow instructions properly. Run with --verbose to see the transcript.");
    }
    if outcome.plan.has_parse_failure() {
        eprintln!("  ⚠️  Could not split the reply into sections; the full text is under the itinerary.");
    }
}

pub(crate) fn print_section(plan: &TravelPlan, kind: SectionKind) {
    println!();
    println!("## {}", kind.heading());
    println!();
    println!("{}", plan.section(kind));
    println!();
}

/// Write the markdown download into `dir` and return its path.
pub(crate) fn save_markdown(plan: &TravelPlan, dir: &Path) -> std::io::Result<PathBuf> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    let path = dir.join(TravelPlan::download_file_name(
        chrono::Local::now().date_naive(),
    ));
    std::fs::write(&path, plan.to_markdown())?;
    Ok(path)
}

/// One-line confirmation for a saved download.
pub(crate) fn saved_message(path: &Path) -> String {
    format!("Saved {} ({MARKDOWN_CONTENT_TYPE})", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_writes_markdown_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("plans");
        let plan = TravelPlan::new("a", "b", "c", "d");

        let path = save_markdown(&plan, &target).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("travel_plan_") && name.ends_with(".md"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), plan.to_markdown());
        assert!(saved_message(&path).ends_with(".md (text/markdown)"));
    }

    #[test]
    fn planner_requires_key_for_hosted_provider() {
        let config = AppConfig::default();
        assert!(build_planner(&config, None).is_err());

        let config = AppConfig {
            api_key: Some("sk-test".into()),
            ..AppConfig::default()
        };
        assert!(build_planner(&config, None).is_ok());
    }
}
