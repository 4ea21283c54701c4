//! Composite ranking of idea candidates.

use std::cmp::Ordering;

use crate::generate::IdeaCandidate;

/// `income/1000 + 10/max(time, 1) + 10/max(cost/100, 1)`.
///
/// Higher income, shorter time and lower cost all raise the score.
pub fn composite_score(idea: &IdeaCandidate) -> f64 {
    let income = idea.expected_income as f64 / 1000.0;
    let time = 10.0 / idea.time_needed.max(1.0);
    let cost = 10.0 / (idea.cost as f64 / 100.0).max(1.0);
    income + time + cost
}

/// Sort by composite score, highest first.
///
/// The sort is stable: ideas with equal scores keep their input order.
pub fn rank(mut ideas: Vec<IdeaCandidate>) -> Vec<IdeaCandidate> {
    ideas.sort_by(|a, b| {
        composite_score(b)
            .partial_cmp(&composite_score(a))
            .unwrap_or(Ordering::Equal)
    });
    ideas
}
