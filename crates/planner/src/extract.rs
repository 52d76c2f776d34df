//! Split the model's final answer into the four plan sections.
//!
//! Two tiers, then a last resort:
//!
//! 1. **Markers**: `=== SECTION START: <LABEL> === ... === SECTION END: <LABEL> ===`,
//!    matched per section, case-insensitively, in any order. If at least one
//!    section matches, the result is final; unmatched sections stay empty.
//! 2. **Heuristic**: only when no marker matched. A line scan that switches
//!    section on keywords or glyphs and flushes on `---` rules.
//! 3. **Fallback**: when every section is still empty, the whole text goes
//!    to the itinerary and the rest carry [`PARSE_ERROR_PLACEHOLDER`].
//!
//! Extraction is pure and never fails. Callers log the [`Strategy`] if they
//! want to narrate what happened.

use regex_lite::Regex;
use tripweaver_core::plan::{PARSE_ERROR_PLACEHOLDER, SectionKind, TravelPlan};

/// The four section texts. Unmatched sections are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    pub places_to_stay: String,
    pub activities: String,
    pub transportation: String,
    pub itinerary: String,
}

impl Sections {
    pub fn get(&self, kind: SectionKind) -> &str {
        match kind {
            SectionKind::PlacesToStay => &self.places_to_stay,
            SectionKind::Activities => &self.activities,
            SectionKind::Transportation => &self.transportation,
            SectionKind::Itinerary => &self.itinerary,
        }
    }

    fn slot(&mut self, kind: SectionKind) -> &mut String {
        match kind {
            SectionKind::PlacesToStay => &mut self.places_to_stay,
            SectionKind::Activities => &mut self.activities,
            SectionKind::Transportation => &mut self.transportation,
            SectionKind::Itinerary => &mut self.itinerary,
        }
    }

    pub fn is_empty(&self) -> bool {
        SectionKind::ALL.into_iter().all(|kind| self.get(kind).is_empty())
    }
}

impl From<Sections> for TravelPlan {
    fn from(s: Sections) -> Self {
        TravelPlan::new(s.places_to_stay, s.activities, s.transportation, s.itinerary)
    }
}

/// Which tier produced the sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Marker pairs were found for these sections.
    Markers(Vec<SectionKind>),
    /// No markers; the line scan found something.
    Heuristic,
    /// Nothing usable; raw text dumped into the itinerary.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub sections: Sections,
    pub strategy: Strategy,
}

/// Extract the four sections from `text`.
pub fn extract_sections(text: &str) -> Extraction {
    let (mut sections, found) = extract_marked(text);

    let mut strategy = if found.is_empty() {
        sections = extract_heuristic(text);
        Strategy::Heuristic
    } else {
        Strategy::Markers(found)
    };

    if sections.is_empty() {
        sections = Sections {
            places_to_stay: PARSE_ERROR_PLACEHOLDER.to_string(),
            activities: PARSE_ERROR_PLACEHOLDER.to_string(),
            transportation: PARSE_ERROR_PLACEHOLDER.to_string(),
            itinerary: text.to_string(),
        };
        strategy = Strategy::Fallback;
    }

    Extraction { sections, strategy }
}

/// Whitespace between marker tokens. regex-lite's `\s` is ASCII only, so
/// the Unicode spaces models emit (no-break, ideographic, ...) are listed.
const MARKER_SPACE: &str =
    "[\\s\u{85}\u{a0}\u{1680}\u{2000}-\u{200a}\u{2028}\u{2029}\u{202f}\u{205f}\u{3000}]*";

fn marker_pattern(kind: SectionKind) -> String {
    let label = regex_lite::escape(kind.marker_label());
    let ws = MARKER_SPACE;
    format!(
        "(?is)==={ws}SECTION START:{ws}{label}{ws}==={ws}(.+?){ws}==={ws}SECTION END:{ws}{label}{ws}==="
    )
}

/// Tier 1. Returns the sections plus which ones had a marker pair.
fn extract_marked(text: &str) -> (Sections, Vec<SectionKind>) {
    let mut sections = Sections::default();
    let mut found = Vec::new();

    for kind in SectionKind::ALL {
        let captured = Regex::new(&marker_pattern(kind))
            .ok()
            .and_then(|re| re.captures(text))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string());

        if let Some(content) = captured {
            *sections.slot(kind) = content;
            found.push(kind);
        }
    }

    (sections, found)
}

/// Section a heuristic line switches to, first match wins.
fn classify(line: &str) -> Option<SectionKind> {
    let lower = line.to_lowercase();
    let has_glyph = |kind: SectionKind| line.contains(kind.glyph());

    if lower.contains("places to stay") || has_glyph(SectionKind::PlacesToStay) {
        Some(SectionKind::PlacesToStay)
    } else if (lower.contains("activities") || has_glyph(SectionKind::Activities))
        && !lower.contains("day-by-day")
        && !lower.contains("itinerary")
    {
        // Itinerary days list their own activities; those lines stay put.
        Some(SectionKind::Activities)
    } else if lower.contains("transportation") || has_glyph(SectionKind::Transportation) {
        Some(SectionKind::Transportation)
    } else if lower.contains("itinerary")
        || lower.contains("day-by-day")
        || has_glyph(SectionKind::Itinerary)
    {
        Some(SectionKind::Itinerary)
    } else {
        None
    }
}

/// Tier 2.
fn extract_heuristic(text: &str) -> Sections {
    let mut sections = Sections::default();
    let mut current: Option<SectionKind> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for line in text.lines() {
        if let Some(kind) = classify(line) {
            flush(&mut sections, current, &mut buffer);
            buffer.clear();
            current = Some(kind);
        } else if line.trim() == "---" {
            flush(&mut sections, current, &mut buffer);
        } else if line.trim_start().starts_with('#') {
            continue;
        } else if current.is_some() {
            buffer.push(line);
        }
    }
    flush(&mut sections, current, &mut buffer);

    sections
}

/// Replace the current section's text with the buffered lines.
fn flush(sections: &mut Sections, current: Option<SectionKind>, buffer: &mut Vec<&str>) {
    let Some(kind) = current else {
        return;
    };
    if buffer.is_empty() {
        return;
    }
    *sections.slot(kind) = buffer.join("\n").trim().to_string();
    buffer.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKED: &str = "Here is your plan.\n\
        === SECTION START: ITINERARY ===\n\nDay 1: Louvre\nDay 2: Versailles\n\n=== SECTION END: ITINERARY ===\n\
        === SECTION START: PLACES TO STAY ===\n  Hotel Lutetia  \n=== SECTION END: PLACES TO STAY ===\n\
        === section start: transportation ===\nMetro line 1\n=== section end: transportation ===\n\
        ===SECTION START:ACTIVITIES===Seine cruise===SECTION END:ACTIVITIES===";

    #[test]
    fn markers_in_any_order() {
        let extraction = extract_sections(MARKED);
        assert_eq!(extraction.sections.places_to_stay, "Hotel Lutetia");
        assert_eq!(extraction.sections.activities, "Seine cruise");
        assert_eq!(extraction.sections.transportation, "Metro line 1");
        assert_eq!(extraction.sections.itinerary, "Day 1: Louvre\nDay 2: Versailles");
        assert_eq!(extraction.strategy, Strategy::Markers(SectionKind::ALL.to_vec()));
    }

    #[test]
    fn partial_markers_are_final() {
        let text = "=== SECTION START: ACTIVITIES ===\nLouvre\n=== SECTION END: ACTIVITIES ===\n\
                    # 🚗 Transportation\nMetro";
        let extraction = extract_sections(text);
        assert_eq!(extraction.sections.activities, "Louvre");
        assert!(extraction.sections.transportation.is_empty());
        assert!(extraction.sections.places_to_stay.is_empty());
        assert_eq!(
            extraction.strategy,
            Strategy::Markers(vec![SectionKind::Activities])
        );
    }

    #[test]
    fn unicode_spaces_around_marker_tokens() {
        let text = "===\u{a0}SECTION START:\u{a0}ITINERARY\u{3000}===\nDay 1: Louvre\n\
                    ===\u{2009}SECTION END: ITINERARY\u{a0}===";
        let extraction = extract_sections(text);
        assert_eq!(extraction.sections.itinerary, "Day 1: Louvre");
        assert_eq!(
            extraction.strategy,
            Strategy::Markers(vec![SectionKind::Itinerary])
        );
    }

    #[test]
    fn mismatched_end_label_does_not_match() {
        let text = "=== SECTION START: ACTIVITIES ===\nLouvre\n=== SECTION END: ITINERARY ===";
        let (_, found) = extract_marked(text);
        assert!(found.is_empty());
    }

    #[test]
    fn heuristic_assigns_blocks() {
        let text = "# 🏨 Places to Stay\n\
                    Hotel Lutetia, Saint-Germain\n\
                    ---\n\
                    # 🎭 Activities\n\
                    Louvre Museum\n\
                    Seine cruise\n\
                    ---\n\
                    # 🚗 Transportation\n\
                    CDG airport, RER B\n\
                    ---\n\
                    # 📅 Day-by-Day Itinerary\n\
                    Day 1: Eiffel Tower\n\
                    Day 2: Montmartre";
        let extraction = extract_sections(text);
        assert_eq!(extraction.strategy, Strategy::Heuristic);
        assert_eq!(extraction.sections.places_to_stay, "Hotel Lutetia, Saint-Germain");
        assert_eq!(extraction.sections.activities, "Louvre Museum\nSeine cruise");
        assert_eq!(extraction.sections.transportation, "CDG airport, RER B");
        assert_eq!(extraction.sections.itinerary, "Day 1: Eiffel Tower\nDay 2: Montmartre");
    }

    #[test]
    fn heuristic_keywords_without_glyphs() {
        let text = "Places to Stay\nHotel A\nActivities\nMuseum\nTransportation\nBus\nDay-by-Day\nDay 1";
        let sections = extract_sections(text).sections;
        assert_eq!(sections.places_to_stay, "Hotel A");
        assert_eq!(sections.activities, "Museum");
        assert_eq!(sections.transportation, "Bus");
        assert_eq!(sections.itinerary, "Day 1");
    }

    #[test]
    fn activities_with_day_by_day_is_not_activities() {
        assert_eq!(
            classify("Day-by-day activities overview"),
            Some(SectionKind::Itinerary)
        );
        assert_eq!(classify("## Activities"), Some(SectionKind::Activities));
        assert_eq!(classify("Itinerary activities"), Some(SectionKind::Itinerary));

        let text = "Transportation\nMetro\nMorning activities, day-by-day\nDay 1: Louvre";
        let sections = extract_sections(text).sections;
        assert!(sections.activities.is_empty());
        assert_eq!(sections.itinerary, "Day 1: Louvre");
    }

    #[test]
    fn places_beats_activities_on_shared_line() {
        assert_eq!(
            classify("Places to stay near activities"),
            Some(SectionKind::PlacesToStay)
        );
    }

    #[test]
    fn heuristic_skips_headings_and_preamble() {
        let text = "Intro line dropped\n🏨 Hotels\n## Budget picks\nIbis\n### Luxury\nRitz";
        let sections = extract_sections(text).sections;
        assert_eq!(sections.places_to_stay, "Ibis\nRitz");
    }

    #[test]
    fn later_flush_replaces_section_text() {
        let text = "Transportation\nMetro\n---\nTaxi";
        let sections = extract_sections(text).sections;
        assert_eq!(sections.transportation, "Taxi");
    }

    #[test]
    fn unstructured_text_falls_back() {
        let text = "Sorry, I could not produce a plan for that city.";
        let extraction = extract_sections(text);
        assert_eq!(extraction.strategy, Strategy::Fallback);
        assert_eq!(extraction.sections.itinerary, text);
        assert_eq!(extraction.sections.places_to_stay, PARSE_ERROR_PLACEHOLDER);
        assert_eq!(extraction.sections.activities, PARSE_ERROR_PLACEHOLDER);
        assert_eq!(extraction.sections.transportation, PARSE_ERROR_PLACEHOLDER);

        let plan: TravelPlan = extraction.sections.into();
        assert!(plan.has_parse_failure());
    }

    #[test]
    fn empty_markers_fall_back() {
        let text = "=== SECTION START: ITINERARY ===\n \n=== SECTION END: ITINERARY ===";
        let extraction = extract_sections(text);
        assert_eq!(extraction.strategy, Strategy::Fallback);
        assert_eq!(extraction.sections.itinerary, text);
    }

    #[test]
    fn empty_input_falls_back() {
        let extraction = extract_sections("");
        assert_eq!(extraction.strategy, Strategy::Fallback);
        assert_eq!(extraction.sections.itinerary, "");
    }

    #[test]
    fn sections_convert_to_plan() {
        let sections = Sections {
            places_to_stay: "a".into(),
            activities: "b".into(),
            transportation: "c".into(),
            itinerary: "d".into(),
        };
        let plan = TravelPlan::from(sections);
        assert_eq!(plan.section(SectionKind::Transportation), "c");
    }
}
