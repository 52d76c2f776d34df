//! The agents behind a travel plan and the runtime that drives them.
//!
//! A run works like this:
//!
//! 1. The **supervisor** receives the task description
//! 2. It hands work to the **research**, **budget**, **itinerary**, and
//!    **recommendation** agents through `transfer_to_*` tool calls
//! 3. Each delegate answers once; the answer comes back as a tool result
//! 4. The supervisor replies without tool calls, and that reply is the plan
//!
//! The run stops with an error if the turn ceiling is exhausted first.

pub mod roster;
pub mod runtime;

#[cfg(test)]
mod test_helpers;

pub use roster::Roster;
pub use runtime::HandoffRuntime;
