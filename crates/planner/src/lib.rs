//! Turning a trip request into a four-section travel plan.
//!
//! - [`orchestrator`]: one planning run through an `AgentRuntime`
//! - [`prompt`]: the task description the supervisor receives
//! - [`extract`]: model output → sections, with graceful degradation
//! - [`cache`]: expiring, content-addressed cache

pub mod cache;
pub mod extract;
pub mod orchestrator;
pub mod prompt;

pub use cache::{Clock, ExpiringCache, ManualClock, SystemClock, cache_key};
pub use extract::{Extraction, Sections, Strategy, extract_sections};
pub use orchestrator::{
    DEFAULT_MAX_TURNS, MIN_SECTION_CHARS, PlanError, PlanOutcome, SharedPlanCache, TravelPlanner,
};
pub use prompt::task_description;
