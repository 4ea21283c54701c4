//! Plain-text rendering for terminal output.

use ideapool_core::{Descriptor, IdeaCandidate, PotentialScore};
use ideapool_sources::FetchOutcome;
use ideapool_storage::{ExecutionRecord, IdeaRecord, Overview, RevenueStats};

use crate::pipeline::{ProjectAnalysis, ScoredRepo};

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn emit_line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

// ──────────────────────────────────────────────
// Ideas
// ──────────────────────────────────────────────

fn write_candidate(out: &mut String, index: usize, idea: &IdeaCandidate) {
    emit_line(out, &format!("[Idea #{}] {}", index, idea.name));
    emit_line(out, &format!("  Type: {}", idea.idea_type));
    if !idea.description.is_empty() {
        emit_line(out, &format!("  Description: {}", idea.description));
    }
    if !idea.target_users.is_empty() {
        emit_line(out, &format!("  Target users: {}", idea.target_users.join(", ")));
    }
    emit_line(out, &format!("  Startup cost: ¥{}", idea.cost));
    emit_line(out, &format!("  Expected income: ¥{}/month", idea.expected_income));
    emit_line(out, &format!("  Time needed: {} days", idea.time_needed));
    if let (Some(source), Some(potential)) = (&idea.source, idea.potential) {
        emit_line(out, &format!("  Source: {} (potential {})", source, potential));
    }
    if !idea.implementation.is_empty() {
        emit_line(out, "  Steps:");
        for step in &idea.implementation {
            emit_line(out, &format!("    - {}", step));
        }
    }
    if !idea.project_url.is_empty() {
        emit_line(out, &format!("  Link: {}", idea.project_url));
    }
}

/// The numbered daily report.
pub(crate) fn daily_report(ideas: &[IdeaCandidate], generated_at: &str) -> String {
    let mut out = String::new();
    emit_line(&mut out, &rule());
    emit_line(&mut out, "Money ideas for today");
    emit_line(&mut out, &rule());
    emit_line(&mut out, &format!("Generated: {}", generated_at));
    out.push('\n');
    for (i, idea) in ideas.iter().enumerate() {
        write_candidate(&mut out, i + 1, idea);
        out.push('\n');
    }
    out
}

/// One warning line per failed source; empty when all succeeded.
pub(crate) fn source_warnings(outcomes: &[FetchOutcome]) -> String {
    let mut out = String::new();
    for outcome in outcomes {
        if let Some(error) = &outcome.error {
            emit_line(&mut out, &format!("warning: {} skipped: {}", outcome.source, error));
        }
    }
    out
}

// ──────────────────────────────────────────────
// Scores and repositories
// ──────────────────────────────────────────────

fn write_score(out: &mut String, potential: &PotentialScore) {
    let b = &potential.bands;
    emit_line(out, &format!("  Potential: {} ({})", potential.tier, potential.score));
    emit_line(
        out,
        &format!(
            "  Bands: popularity {}, momentum {}, domain {}, monetization {}, business {}",
            b.popularity, b.momentum, b.domain, b.monetization, b.business
        ),
    );
}

fn write_repo_header(out: &mut String, repo: &Descriptor) {
    emit_line(out, &format!("{}  stars {}", repo.name, repo.stars()));
    if !repo.description.is_empty() {
        emit_line(out, &format!("  {}", repo.description));
    }
    if let Some(language) = &repo.language {
        emit_line(out, &format!("  Language: {}", language));
    }
    if !repo.url.is_empty() {
        emit_line(out, &format!("  Link: {}", repo.url));
    }
}

pub(crate) fn score_report(descriptor: &Descriptor, potential: &PotentialScore) -> String {
    let mut out = String::new();
    write_repo_header(&mut out, descriptor);
    write_score(&mut out, potential);
    out
}

pub(crate) fn analysis_report(analysis: &ProjectAnalysis) -> String {
    let mut out = String::new();
    write_repo_header(&mut out, &analysis.project);
    write_score(&mut out, &analysis.potential);
    out.push('\n');
    for (i, idea) in analysis.ideas.iter().enumerate() {
        write_candidate(&mut out, i + 1, idea);
        out.push('\n');
    }
    out
}

pub(crate) fn opportunities_report(repos: &[ScoredRepo]) -> String {
    if repos.is_empty() {
        return "No opportunities found.\n".to_string();
    }
    let mut out = String::new();
    for (i, scored) in repos.iter().enumerate() {
        out.push_str(&format!("{}. ", i + 1));
        write_repo_header(&mut out, &scored.repo);
        write_score(&mut out, &scored.potential);
    }
    out
}

// ──────────────────────────────────────────────
// Pool records
// ──────────────────────────────────────────────

pub(crate) fn idea_list(ideas: &[IdeaRecord]) -> String {
    if ideas.is_empty() {
        return "No ideas.\n".to_string();
    }
    let mut out = String::new();
    for idea in ideas {
        emit_line(
            &mut out,
            &format!(
                "{}  [{}]  {}  ({})",
                idea.id, idea.status, idea.name, idea.created_at
            ),
        );
    }
    out
}

pub(crate) fn idea_detail(idea: &IdeaRecord, executions: &[&ExecutionRecord]) -> String {
    let mut out = String::new();
    emit_line(&mut out, &format!("{}  {}", idea.id, idea.name));
    emit_line(&mut out, &format!("  Status: {}", idea.status));
    if !idea.idea_type.is_empty() {
        emit_line(&mut out, &format!("  Type: {}", idea.idea_type));
    }
    if !idea.description.is_empty() {
        emit_line(&mut out, &format!("  Description: {}", idea.description));
    }
    if !idea.tags.is_empty() {
        emit_line(&mut out, &format!("  Tags: {}", idea.tags.join(", ")));
    }
    emit_line(&mut out, &format!("  Created: {}", idea.created_at));
    if let Some(updated) = &idea.updated_at {
        emit_line(&mut out, &format!("  Updated: {}", updated));
    }
    if let Some(notes) = &idea.notes {
        emit_line(&mut out, &format!("  Notes: {}", notes));
    }
    for (key, value) in &idea.extra {
        emit_line(&mut out, &format!("  {}: {}", key, value));
    }
    for exec in executions {
        emit_line(
            &mut out,
            &format!(
                "  Execution {} [{}] {} steps, {} logs",
                exec.id,
                exec.status,
                exec.steps.len(),
                exec.logs.len()
            ),
        );
    }
    out
}

pub(crate) fn revenue_stats(stats: &RevenueStats) -> String {
    let mut out = String::new();
    emit_line(&mut out, &format!("Total: ¥{}", stats.total.round_dp(2)));
    emit_line(&mut out, &format!("Records: {}", stats.count));
    emit_line(&mut out, &format!("Average: ¥{}", stats.average.round_dp(2)));
    for (source, amount) in &stats.by_source {
        emit_line(&mut out, &format!("  {}: ¥{}", source, amount.round_dp(2)));
    }
    out
}

pub(crate) fn overview(overview: &Overview) -> String {
    let ideas = &overview.ideas;
    let execs = &overview.executions;
    let mut out = String::new();
    emit_line(
        &mut out,
        &format!(
            "Ideas: {} total ({} pending, {} in progress, {} completed, {} failed)",
            ideas.total, ideas.pending, ideas.in_progress, ideas.completed, ideas.failed
        ),
    );
    emit_line(&mut out, &format!("Success rate: {:.1}%", overview.success_rate * 100.0));
    emit_line(
        &mut out,
        &format!(
            "Executions: {} total ({} in progress, {} success, {} failed)",
            execs.total, execs.in_progress, execs.success, execs.failed
        ),
    );
    emit_line(
        &mut out,
        &format!(
            "Revenue: ¥{} over {} records",
            overview.revenue.total.round_dp(2),
            overview.revenue.count
        ),
    );
    out
}
