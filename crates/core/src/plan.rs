//! Travel plan: the four-section output of one planning run.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Shown in place of a section the extractor could not recover at all.
pub const PARSE_ERROR_PLACEHOLDER: &str = "⚠️ Parsing error - check debug output";

/// Content type for the markdown download.
pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown";

/// One of the four named parts of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    PlacesToStay,
    Activities,
    Transportation,
    Itinerary,
}

impl SectionKind {
    /// All sections in document (and tie-break) order.
    pub const ALL: [SectionKind; 4] = [
        SectionKind::PlacesToStay,
        SectionKind::Activities,
        SectionKind::Transportation,
        SectionKind::Itinerary,
    ];

    /// Stable identifier, e.g. `places_to_stay`.
    pub fn id(&self) -> &'static str {
        match self {
            SectionKind::PlacesToStay => "places_to_stay",
            SectionKind::Activities => "activities",
            SectionKind::Transportation => "transportation",
            SectionKind::Itinerary => "itinerary",
        }
    }

    /// Label used inside the `=== SECTION START: <LABEL> ===` markers.
    pub fn marker_label(&self) -> &'static str {
        match self {
            SectionKind::PlacesToStay => "PLACES TO STAY",
            SectionKind::Activities => "ACTIVITIES",
            SectionKind::Transportation => "TRANSPORTATION",
            SectionKind::Itinerary => "ITINERARY",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            SectionKind::PlacesToStay => "🏨",
            SectionKind::Activities => "🎭",
            SectionKind::Transportation => "🚗",
            SectionKind::Itinerary => "📅",
        }
    }

    /// Human title without the glyph.
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::PlacesToStay => "Places to Stay",
            SectionKind::Activities => "Activities",
            SectionKind::Transportation => "Transportation",
            SectionKind::Itinerary => "Day-by-Day Itinerary",
        }
    }

    /// Glyph and title, as used in markdown headings.
    pub fn heading(&self) -> String {
        format!("{} {}", self.glyph(), self.title())
    }

    /// Lookup by identifier or a loose alias (`stay`, `transport`, ...).
    pub fn from_alias(s: &str) -> Option<SectionKind> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "places_to_stay" | "places" | "stay" | "hotels" => Some(SectionKind::PlacesToStay),
            "activities" | "activity" => Some(SectionKind::Activities),
            "transportation" | "transport" => Some(SectionKind::Transportation),
            "itinerary" | "day_by_day" | "days" => Some(SectionKind::Itinerary),
            _ => None,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A complete travel plan with exactly four sections.
///
/// Deserialization rejects unknown keys, so a plan can never silently carry
/// extra sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TravelPlan {
    pub places_to_stay: String,
    pub activities: String,
    pub transportation: String,
    pub itinerary: String,
}

impl TravelPlan {
    pub fn new(
        places_to_stay: impl Into<String>,
        activities: impl Into<String>,
        transportation: impl Into<String>,
        itinerary: impl Into<String>,
    ) -> Self {
        Self {
            places_to_stay: places_to_stay.into(),
            activities: activities.into(),
            transportation: transportation.into(),
            itinerary: itinerary.into(),
        }
    }

    pub fn section(&self, kind: SectionKind) -> &str {
        match kind {
            SectionKind::PlacesToStay => &self.places_to_stay,
            SectionKind::Activities => &self.activities,
            SectionKind::Transportation => &self.transportation,
            SectionKind::Itinerary => &self.itinerary,
        }
    }

    /// Sections whose trimmed text is shorter than `min_chars` characters.
    /// A placeholder section always counts, whatever its length.
    pub fn sections_shorter_than(&self, min_chars: usize) -> Vec<SectionKind> {
        SectionKind::ALL
            .into_iter()
            .filter(|kind| {
                let text = self.section(*kind);
                text == PARSE_ERROR_PLACEHOLDER || text.trim().chars().count() < min_chars
            })
            .collect()
    }

    /// True when the extractor fell back to dumping the raw text.
    pub fn has_parse_failure(&self) -> bool {
        SectionKind::ALL
            .into_iter()
            .any(|kind| self.section(kind) == PARSE_ERROR_PLACEHOLDER)
    }

    /// Render the fixed markdown layout. Sections are separated by a
    /// horizontal rule; nothing follows the itinerary.
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Your Travel Plan\n");
        for (i, kind) in SectionKind::ALL.into_iter().enumerate() {
            if i > 0 {
                out.push_str("\n\n---\n\n");
            }
            out.push_str("## ");
            out.push_str(&kind.heading());
            out.push('\n');
            out.push_str(self.section(kind));
        }
        out
    }

    /// Download name for a plan produced on `date`: `travel_plan_20250601.md`.
    pub fn download_file_name(date: NaiveDate) -> String {
        format!("travel_plan_{}.md", date.format("%Y%m%d"))
    }
}
