//! The task description handed to the supervisor.

use tripweaver_core::plan::SectionKind;
use tripweaver_core::trip::{TripRequest, format_dollars};

/// What each marked block should contain. Advisory only: the model is
/// asked, nothing checks beyond the minimum-length warning.
fn density_directive(kind: SectionKind, days: i64) -> String {
    match kind {
        SectionKind::PlacesToStay => {
            "[Write 3-5 hotel recommendations here with names, prices, locations]".into()
        }
        SectionKind::Activities => {
            "[Write 8-12 specific attraction/activity recommendations here - NO day numbers, just a list!]\n\
             Examples: \"Eiffel Tower\", \"Louvre Museum\", \"Seine River Cruise\", etc."
                .into()
        }
        SectionKind::Transportation => {
            "[Write complete transportation guide here]\n\
             MUST include: Airport names with codes (e.g., \"JFK\", \"CDG\"), how to get from \
             airport to city, local transport options with costs"
                .into()
        }
        SectionKind::Itinerary => format!(
            "[Write complete day-by-day schedule for ALL {days} days here]\n\
             Day 1: [morning, afternoon, evening]\n\
             ...\n\
             Day {days}: [morning, afternoon, evening]"
        ),
    }
}

/// Build the single task description for one planning run.
pub fn task_description(request: &TripRequest) -> String {
    let days = request.duration_days();
    let mut out = String::from(
        "Create a COMPLETE travel plan. Follow these steps EXACTLY:\n\n\
         STEP 1: Call Research Agent\n\
         STEP 2: Call Budget Agent\n\
         STEP 3: Call Itinerary Agent\n\
         STEP 4: Call Recommendation Agent\n\
         STEP 5: Create final plan using ALL the information gathered\n",
    );

    out.push_str(&request.to_prompt_context());
    out.push_str("\nFINAL OUTPUT MUST HAVE EXACTLY 4 SECTIONS WITH THESE EXACT HEADERS:\n");

    for kind in SectionKind::ALL {
        let label = kind.marker_label();
        out.push_str(&format!(
            "\n=== SECTION START: {label} ===\n{}\n=== SECTION END: {label} ===\n",
            density_directive(kind, days)
        ));
    }

    out.push_str(&format!(
        "\n⚠️ CRITICAL: DO NOT SKIP ANY SECTION! Each section MUST have real content!\n\
         ⚠️ Use EXACT section markers: \"=== SECTION START: [NAME] ===\" and \"=== SECTION END: [NAME] ===\"\n\
         ⚠️ Pace is {pace}: plan {per_day} activities per day\n\
         ⚠️ Apply {filter} filter\n\
         ⚠️ Budget: ${min}-${max}\n",
        pace = request.pace(),
        per_day = request.pace().activities_per_day(),
        filter = request.content_filter(),
        min = format_dollars(request.budget_min()),
        max = format_dollars(request.budget_max()),
    ));

    out
}
