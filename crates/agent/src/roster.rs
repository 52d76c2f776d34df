//! The five planning agents.
//!
//! The supervisor drives the run and writes the final answer; the four
//! specialists are only reachable through handoffs from the supervisor.

use tripweaver_config::AppConfig;
use tripweaver_core::agent::AgentSpec;

const SUPERVISOR_INSTRUCTIONS: &str = r#"You are the travel planning supervisor coordinating specialized agents.

Your workflow:
1. Analyze the request.
2. Call the agents in this order and collect every answer:
   - Research Agent: destination information, attractions, airports, tips
   - Budget Agent: cost estimates and breakdown
   - Itinerary Agent: day-by-day schedule
   - Recommendation Agent: restaurants and activities, with content filtering
3. After ALL agents finish, synthesize one plan with four complete sections.

Every section needs substantial, specific content (at least 200 words):
- Places to Stay: 3-5 options across budget, mid-range and luxury, with location, price per night and why.
- Activities: 8-12 specific attractions as recommendations, not a schedule. No day numbers here.
- Transportation: major airports with 3-letter codes and distance to the center, flight costs, transfers into the city, local transit with prices.
- Itinerary: EVERY day of the trip with morning, afternoon and evening blocks and meal suggestions.

Wrap each section in the exact markers you are given in the task. Apply the content filter throughout.

Start by calling the Research Agent."#;

const RESEARCH_INSTRUCTIONS: &str = r#"You are a travel research specialist with extensive knowledge of destinations worldwide.

Provide comprehensive destination information:
1. Top attractions: at least 10-15 specific must-see places.
2. Airports: major airports serving the destination with their 3-letter codes.
3. Local transportation: metro, buses, taxis, bike shares with typical costs.
4. Accommodation areas: best neighborhoods with 3-5 specific hotel examples.
5. Local tips: customs, safety, best times to visit attractions.
6. Weather during the travel dates.
7. Popular events and festivals.

Be specific: use actual names of attractions, airports, hotels and transport options with estimated prices. Format with clear sections and bullet points."#;

const BUDGET_INSTRUCTIONS: &str = r#"You are a travel budget specialist with knowledge of typical travel costs worldwide.

Estimate the cost of the trip:
1. Accommodation: total for the stay, with budget, mid-range and luxury options.
2. Food: daily budget times number of days.
3. Activities: entry fees, tours, attractions.
4. Transportation: airport transfers and local transport.

Format:
TOTAL ESTIMATED COST: $X,XXX - $X,XXX

Breakdown:
- Accommodation: $X,XXX (X nights x $XX-XX/night)
- Food: $XXX (X days x $XX/day)
- Activities: $XXX
- Transportation: $XXX

Daily Average: $XXX per day
Budget Status: Within/Over/Under budget

Compare the total against the traveller's budget range and note any adjustments needed."#;

const ITINERARY_INSTRUCTIONS: &str = r#"You are a travel itinerary specialist.

Create a detailed day-by-day schedule using three time blocks:
- Morning: 9:00 AM - 12:00 PM
- Afternoon: 12:00 PM - 6:00 PM (include lunch)
- Evening: 6:00 PM - 10:00 PM (include dinner)

Pacing:
- Relaxed: 2-3 activities per day, lots of downtime
- Moderate: 3-4 activities per day, balanced
- Packed: 5-6 activities per day, efficient scheduling

Format each day as `### Day X - [Date]` followed by the three blocks, each listing activity, location, duration and a short description.

Group nearby attractions together, include 15-30 minutes of travel between locations, match the requested pace and respect opening hours."#;

const RECOMMENDATION_INSTRUCTIONS: &str = r#"You are a travel recommendation specialist with content filtering expertise.

CRITICAL: content filtering.
- FAMILY-FRIENDLY: exclude bars, nightclubs, casinos, wine bars, cocktail lounges and adult entertainment. Include family restaurants, kid-friendly activities, museums, parks and playgrounds.
- ADULTS-ONLY: include nightlife, bars, wine tastings, fine dining, rooftop bars, jazz clubs and other sophisticated experiences.

Provide:
1. Popular attractions and activities (10-15), each with a specific name, type, description, why recommended, duration, cost estimate and best time of day.
2. Restaurants (5-7) matching the food preferences, with specialty, neighborhood and price range.

Double-check that every suggestion respects the content filter."#;

/// The supervisor plus its four specialists.
#[derive(Debug, Clone)]
pub struct Roster {
    pub supervisor: AgentSpec,
    pub research: AgentSpec,
    pub budget: AgentSpec,
    pub itinerary: AgentSpec,
    pub recommendation: AgentSpec,
}

impl Roster {
    /// Build the roster. The supervisor gets its own model because it does
    /// the instruction-heavy synthesis.
    pub fn new(model: &str, supervisor_model: &str) -> Self {
        Self {
            supervisor: AgentSpec::new(
                "Travel Planning Supervisor",
                supervisor_model,
                SUPERVISOR_INSTRUCTIONS,
            ),
            research: AgentSpec::new("Research Agent", model, RESEARCH_INSTRUCTIONS),
            budget: AgentSpec::new("Budget Agent", model, BUDGET_INSTRUCTIONS),
            itinerary: AgentSpec::new("Itinerary Agent", model, ITINERARY_INSTRUCTIONS),
            recommendation: AgentSpec::new(
                "Recommendation Agent",
                model,
                RECOMMENDATION_INSTRUCTIONS,
            ),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.model, &config.supervisor_model)
    }

    /// The specialists, in the order the supervisor is told to call them.
    pub fn delegates(&self) -> Vec<AgentSpec> {
        vec![
            self.research.clone(),
            self.budget.clone(),
            self.itinerary.clone(),
            self.recommendation.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supervisor_uses_its_own_model() {
        let roster = Roster::new("gpt-4o-mini", "gpt-4o");
        assert_eq!(roster.supervisor.model, "gpt-4o");
        assert!(roster.delegates().iter().all(|a| a.model == "gpt-4o-mini"));
    }

    #[test]
    fn delegates_in_calling_order() {
        let handles: Vec<String> = Roster::new("m", "m")
            .delegates()
            .iter()
            .map(AgentSpec::handle)
            .collect();
        assert_eq!(
            handles,
            [
                "research_agent",
                "budget_agent",
                "itinerary_agent",
                "recommendation_agent"
            ]
        );
    }

    #[test]
    fn from_config_reads_models() {
        let config = AppConfig {
            model: "llama3".into(),
            supervisor_model: "llama3:70b".into(),
            ..AppConfig::default()
        };
        let roster = Roster::from_config(&config);
        assert_eq!(roster.research.model, "llama3");
        assert_eq!(roster.supervisor.model, "llama3:70b");
    }

    #[test]
    fn recommendation_mentions_both_filters() {
        let roster = Roster::new("m", "m");
        assert!(roster.recommendation.instructions.contains("FAMILY-FRIENDLY"));
        assert!(roster.recommendation.instructions.contains("ADULTS-ONLY"));
    }

    #[test]
    fn itinerary_keeps_day_heading_format() {
        let roster = Roster::new("m", "m");
        let text = &roster.itinerary.instructions;
        assert!(text.contains("`### Day X - [Date]`"));
        assert!(text.ends_with("respect opening hours."));
    }
}
