//! Trip request: the validated input of one planning run.
//!
//! A [`TripDraft`] is the raw, unchecked form (what a form or a config file
//! hands us). [`TripDraft::validate`] is the only way to obtain a
//! [`TripRequest`], so every request in circulation satisfies:
//!
//! - destination has at least 2 characters after trimming
//! - `end_date >= start_date`
//! - `0 <= budget_min <= budget_max`, both finite
//!
//! Deserializing a `TripRequest` goes through the same validation.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TripError;

/// How full each day should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    Relaxed,
    Moderate,
    Packed,
}

impl Pace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pace::Relaxed => "relaxed",
            Pace::Moderate => "moderate",
            Pace::Packed => "packed",
        }
    }

    /// Activity count per day the itinerary should aim for.
    pub fn activities_per_day(&self) -> &'static str {
        match self {
            Pace::Relaxed => "2-3",
            Pace::Moderate => "3-4",
            Pace::Packed => "5-6",
        }
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pace {
    type Err = TripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "relaxed" => Ok(Pace::Relaxed),
            "moderate" => Ok(Pace::Moderate),
            "packed" => Ok(Pace::Packed),
            _ => Err(TripError::UnknownPace(s.to_string())),
        }
    }
}

/// Which recommendation categories are admissible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentFilter {
    FamilyFriendly,
    AdultsOnly,
}

impl ContentFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentFilter::FamilyFriendly => "family_friendly",
            ContentFilter::AdultsOnly => "adults_only",
        }
    }
}

impl fmt::Display for ContentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentFilter {
    type Err = TripError;

    /// Accepts both the wire form (`family_friendly`) and the display form
    /// (`Family-Friendly`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "family_friendly" => Ok(ContentFilter::FamilyFriendly),
            "adults_only" => Ok(ContentFilter::AdultsOnly),
            _ => Err(TripError::UnknownContentFilter(s.to_string())),
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

/// Unvalidated trip parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripDraft {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget_range: (f64, f64),
    pub pace: Pace,
    #[serde(default)]
    pub food_preferences: BTreeSet<String>,
    #[serde(default)]
    pub activity_types: BTreeSet<String>,
    pub content_filter: ContentFilter,
}

impl TripDraft {
    /// Check every invariant and freeze the draft into a [`TripRequest`].
    pub fn validate(self) -> Result<TripRequest, TripError> {
        let destination = self.destination.trim().to_string();
        if destination.chars().count() < 2 {
            return Err(TripError::DestinationTooShort(self.destination));
        }

        if self.end_date < self.start_date {
            return Err(TripError::EndBeforeStart {
                start: self.start_date,
                end: self.end_date,
            });
        }

        let (min, max) = self.budget_range;
        for amount in [min, max] {
            if !amount.is_finite() || amount < 0.0 {
                return Err(TripError::InvalidBudget(amount));
            }
        }
        if min > max {
            return Err(TripError::BudgetInverted { min, max });
        }

        Ok(TripRequest {
            destination,
            start_date: self.start_date,
            end_date: self.end_date,
            budget_range: self.budget_range,
            pace: self.pace,
            food_preferences: clean_set(self.food_preferences),
            activity_types: clean_set(self.activity_types),
            content_filter: self.content_filter,
        })
    }
}

fn clean_set(set: BTreeSet<String>) -> BTreeSet<String> {
    set.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// A validated, immutable trip request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TripDraft")]
pub struct TripRequest {
    destination: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    budget_range: (f64, f64),
    pace: Pace,
    food_preferences: BTreeSet<String>,
    activity_types: BTreeSet<String>,
    content_filter: ContentFilter,
}

impl TryFrom<TripDraft> for TripRequest {
    type Error = TripError;

    fn try_from(draft: TripDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl TripRequest {
    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn budget_min(&self) -> f64 {
        self.budget_range.0
    }

    pub fn budget_max(&self) -> f64 {
        self.budget_range.1
    }

    pub fn pace(&self) -> Pace {
        self.pace
    }

    pub fn food_preferences(&self) -> &BTreeSet<String> {
        &self.food_preferences
    }

    pub fn activity_types(&self) -> &BTreeSet<String> {
        &self.activity_types
    }

    pub fn content_filter(&self) -> ContentFilter {
        self.content_filter
    }

    /// Inclusive day count; a same-day trip is 1 day.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Budget as `$1,500 - $3,000`.
    pub fn budget_label(&self) -> String {
        format!(
            "${} - ${}",
            format_dollars(self.budget_min()),
            format_dollars(self.budget_max())
        )
    }

    /// The context block every agent sees.
    pub fn to_prompt_context(&self) -> String {
        let food = if self.food_preferences.is_empty() {
            "No specific preferences".to_string()
        } else {
            join(&self.food_preferences)
        };
        let activities = if self.activity_types.is_empty() {
            "Open to all".to_string()
        } else {
            join(&self.activity_types)
        };

        format!(
            "\nDestination: {}\n\
             Travel Dates: {} to {} ({} days)\n\
             Budget: {}\n\
             Pace: {}\n\
             Food Preferences: {}\n\
             Activities: {}\n\
             Content Filter: {} ← CRITICAL: Apply this filter!\n",
            self.destination,
            self.start_date,
            self.end_date,
            self.duration_days(),
            self.budget_label(),
            self.pace,
            food,
            activities,
            self.content_filter,
        )
    }
}

fn join(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Whole dollars with thousands separators: `1500.0` → `1,500`.
pub fn format_dollars(amount: f64) -> String {
    let digits = format!("{:.0}", amount.max(0.0));
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
