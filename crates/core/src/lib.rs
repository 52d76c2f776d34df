//! # TripWeaver Core
//!
//! Domain types, traits, and error definitions for the TripWeaver travel
//! planner. Every crate in the workspace depends inward on this one.
//!
//! ## Seams
//!
//! - [`Provider`]: one LLM completion call (HTTP backends live in
//!   `tripweaver-providers`).
//! - [`AgentRuntime`]: the opaque multi-step generation capability that
//!   runs a supervisor agent with its delegates (implemented in
//!   `tripweaver-agent`, stubbed in tests).
//!
//! The value objects [`TripRequest`] and [`TravelPlan`] are the input and
//! output of one planning run.

pub mod agent;
pub mod error;
pub mod message;
pub mod plan;
pub mod provider;
pub mod trip;

// Re-export key types at crate root for ergonomics
pub use agent::{AgentRuntime, AgentSpec, RunRequest, RunResponse};
pub use error::{ProviderError, RuntimeError, TripError};
pub use message::{Message, Role};
pub use plan::{SectionKind, TravelPlan};
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use trip::{ContentFilter, Pace, TripDraft, TripRequest};
