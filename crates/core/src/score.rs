//! Monetization potential rubric.
//!
//! Five independent, capped bands are summed:
//!
//! | band          | input              | points                         |
//! |---------------|--------------------|--------------------------------|
//! | popularity    | `stars`            | 10 / 15 / 20 / 25 / 30         |
//! | momentum      | `trending_stars`   | 5 / 10 / 15 / 20 / 25          |
//! | domain fit    | AI keywords, lang  | +15 and +5, max 20             |
//! | monetization  | keyword sets       | 15 / 10 / 0, first match wins  |
//! | business      | keyword tiers      | 10 / 7 / 5 / 0, first match    |
//!
//! The total is not clamped; only the tier boundaries are fixed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ScoringRules;
use crate::descriptor::{contains_any, Descriptor};

/// `(exclusive lower bound, points)`, checked top-down.
const POPULARITY_BANDS: [(u64, u32); 4] = [(1000, 30), (500, 25), (100, 20), (50, 15)];
const POPULARITY_FLOOR: u32 = 10;

const MOMENTUM_BANDS: [(u64, u32); 4] = [(100, 25), (50, 20), (20, 15), (10, 10)];
const MOMENTUM_FLOOR: u32 = 5;

const AI_KEYWORD_POINTS: u32 = 15;
const HOT_LANGUAGE_POINTS: u32 = 5;
const MONETIZATION_POINTS: u32 = 15;
const LIBRARY_POINTS: u32 = 10;

pub const HIGH_TIER_MIN: u32 = 70;
pub const MEDIUM_TIER_MIN: u32 = 50;

/// Coarse potential classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Low => "low",
            Tier::Medium => "medium",
            Tier::High => "high",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Points awarded per band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandBreakdown {
    pub popularity: u32,
    pub momentum: u32,
    pub domain: u32,
    pub monetization: u32,
    pub business: u32,
}

impl BandBreakdown {
    pub fn total(&self) -> u32 {
        self.popularity + self.momentum + self.domain + self.monetization + self.business
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotentialScore {
    pub tier: Tier,
    pub score: u32,
    pub bands: BandBreakdown,
}

/// Score a descriptor against the rubric.
pub fn score(descriptor: &Descriptor, rules: &ScoringRules) -> PotentialScore {
    let text = descriptor.match_text();
    let bands = BandBreakdown {
        popularity: popularity_points(descriptor.stars()),
        momentum: momentum_points(descriptor.momentum()),
        domain: domain_points(&text, &descriptor.language_lower(), rules),
        monetization: monetization_points(&text, rules),
        business: business_points(&text, rules),
    };
    let total = bands.total();
    PotentialScore {
        tier: tier_for(total),
        score: total,
        bands,
    }
}

/// `>= 70` high, `>= 50` medium, otherwise low.
pub fn tier_for(score: u32) -> Tier {
    if score >= HIGH_TIER_MIN {
        Tier::High
    } else if score >= MEDIUM_TIER_MIN {
        Tier::Medium
    } else {
        Tier::Low
    }
}

fn banded(value: u64, bands: &[(u64, u32)], floor: u32) -> u32 {
    bands
        .iter()
        .find(|(above, _)| value > *above)
        .map(|(_, points)| *points)
        .unwrap_or(floor)
}

pub fn popularity_points(stars: u64) -> u32 {
    banded(stars, &POPULARITY_BANDS, POPULARITY_FLOOR)
}

pub fn momentum_points(trending_stars: u64) -> u32 {
    banded(trending_stars, &MOMENTUM_BANDS, MOMENTUM_FLOOR)
}

fn domain_points(text: &str, language: &str, rules: &ScoringRules) -> u32 {
    let mut points = 0;
    if contains_any(text, &rules.ai_keywords) {
        points += AI_KEYWORD_POINTS;
    }
    if !language.is_empty()
        && rules
            .hot_languages
            .iter()
            .any(|l| l.eq_ignore_ascii_case(language))
    {
        points += HOT_LANGUAGE_POINTS;
    }
    points
}

fn monetization_points(text: &str, rules: &ScoringRules) -> u32 {
    if contains_any(text, &rules.monetization_keywords) {
        MONETIZATION_POINTS
    } else if contains_any(text, &rules.library_keywords) {
        LIBRARY_POINTS
    } else {
        0
    }
}

fn business_points(text: &str, rules: &ScoringRules) -> u32 {
    rules
        .business_tiers
        .iter()
        .find(|tier| contains_any(text, &tier.keywords))
        .map(|tier| tier.points)
        .unwrap_or(0)
}
