//! One planning run, end to end.
//!
//! `TripRequest` → task description → one `AgentRuntime::run` → last
//! message → section extraction → `TravelPlan` plus warnings.
//!
//! The runtime call is all-or-nothing: no retry and no partial plan. Once
//! it succeeds, nothing after it can fail.

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{debug, error, info, warn};
use tripweaver_agent::Roster;
use tripweaver_core::agent::{AgentRuntime, RunRequest, RunResponse};
use tripweaver_core::error::RuntimeError;
use tripweaver_core::message::Message;
use tripweaver_core::plan::{SectionKind, TravelPlan};
use tripweaver_core::trip::TripRequest;

use crate::cache::ExpiringCache;
use crate::extract::{Strategy, extract_sections};
use crate::prompt::task_description;

/// Sections shorter than this (trimmed, in characters) are reported back.
pub const MIN_SECTION_CHARS: usize = 50;

/// Default ceiling on model calls per run.
pub const DEFAULT_MAX_TURNS: u32 = 20;

/// Cache of raw plan text keyed by trip request.
pub type SharedPlanCache = Arc<Mutex<ExpiringCache<String>>>;

/// Terminal failures of one planning run.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("No response received from agents")]
    NoResponse,

    #[error("Error generating travel plan: {0}")]
    Generation(#[from] RuntimeError),
}

/// A finished plan and what the caller should know about it.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub plan: TravelPlan,

    /// Sections under [`MIN_SECTION_CHARS`], in document order.
    pub under_filled: Vec<SectionKind>,

    /// How the sections were recovered from the model output
    pub strategy: Strategy,

    /// True when the plan text came from the cache instead of the runtime
    pub cached: bool,
}

impl PlanOutcome {
    /// Human titles of the under-filled sections, for warnings.
    pub fn under_filled_titles(&self) -> Vec<&'static str> {
        self.under_filled.iter().map(SectionKind::title).collect()
    }
}

/// Drives the supervisor and its specialists for one trip at a time.
pub struct TravelPlanner {
    runtime: Arc<dyn AgentRuntime>,
    roster: Roster,
    max_turns: u32,
    cache: Option<SharedPlanCache>,
}

impl TravelPlanner {
    pub fn new(runtime: Arc<dyn AgentRuntime>, roster: Roster) -> Self {
        Self {
            runtime,
            roster,
            max_turns: DEFAULT_MAX_TURNS,
            cache: None,
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Reuse plan text for identical requests while it is fresh.
    pub fn with_cache(mut self, cache: SharedPlanCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Produce a plan for `request`.
    pub async fn plan(&self, request: &TripRequest) -> Result<PlanOutcome, PlanError> {
        info!(
            destination = %request.destination(),
            days = request.duration_days(),
            "Planning trip"
        );

        if let Some(text) = self.cached_text(request) {
            info!("Using cached plan text");
            return Ok(Self::assemble(&text, true));
        }

        let text = self.generate(request).await?;
        self.store(request, &text);
        Ok(Self::assemble(&text, false))
    }

    async fn generate(&self, request: &TripRequest) -> Result<String, PlanError> {
        let run = RunRequest {
            agent: self.roster.supervisor.clone(),
            messages: vec![Message::user(task_description(request))],
            max_turns: self.max_turns,
            delegates: self.roster.delegates(),
        };

        let response = self.runtime.run(run).await.map_err(|e| {
            error!(runtime = %self.runtime.name(), error = %e, "Generation failed");
            PlanError::Generation(e)
        })?;

        log_transcript(&response);

        match response.final_message() {
            Some(message) => Ok(message.content.clone()),
            None => {
                error!("Runtime returned no messages");
                Err(PlanError::NoResponse)
            }
        }
    }

    fn assemble(text: &str, cached: bool) -> PlanOutcome {
        let extraction = extract_sections(text);
        match &extraction.strategy {
            Strategy::Markers(found) => {
                debug!(found = found.len(), "Sections recovered from markers");
            }
            Strategy::Heuristic => warn!("Structured markers not found, used heuristic parsing"),
            Strategy::Fallback => warn!("Parsing failed, whole reply placed in itinerary"),
        }

        let plan = TravelPlan::from(extraction.sections);
        for kind in SectionKind::ALL {
            debug!(section = %kind, chars = plan.section(kind).chars().count(), "Section length");
        }

        let under_filled = plan.sections_shorter_than(MIN_SECTION_CHARS);
        if !under_filled.is_empty() {
            warn!(sections = ?under_filled, "Under-filled sections in plan");
        }

        PlanOutcome {
            plan,
            under_filled,
            strategy: extraction.strategy,
            cached,
        }
    }

    fn cached_text(&self, request: &TripRequest) -> Option<String> {
        let cache = self.cache.as_ref()?;
        let mut guard = cache.lock().unwrap_or_else(|e| e.into_inner());
        guard.get(request)
    }

    fn store(&self, request: &TripRequest, text: &str) {
        if let Some(cache) = &self.cache {
            let mut guard = cache.lock().unwrap_or_else(|e| e.into_inner());
            guard.set(request, text.to_string());
        }
    }
}

fn log_transcript(response: &RunResponse) {
    debug!(messages = response.messages.len(), "Agent transcript");
    for (i, message) in response.messages.iter().enumerate() {
        debug!(
            index = i + 1,
            role = ?message.role,
            sender = message.sender.as_deref().unwrap_or("unknown"),
            chars = message.content.len(),
            "Transcript message"
        );
    }
}
