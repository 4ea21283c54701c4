//! Asset-pool commands: ideas, executions, revenue and the overview.

use std::str::FromStr;

use ideapool_storage::{IdeaStatus, NewIdea};
use rust_decimal::Decimal;
use serde_json::json;

use crate::{fail, print_json, report, Globals, OutputFormat};

/// Print a one-line confirmation, or `{"id": ...}` in JSON mode.
fn confirm(id: &str, text: &str, globals: &Globals) {
    match globals.output {
        OutputFormat::Json => print_json(&json!({ "id": id }), globals),
        OutputFormat::Text => {
            if globals.quiet {
                println!("{}", id);
            } else {
                println!("{}", text);
            }
        }
    }
}

fn not_found(kind: &str, id: &str, globals: &Globals) -> ! {
    fail(&format!("{} '{}' not found", kind, id), globals)
}

// ──────────────────────────────────────────────
// Ideas
// ──────────────────────────────────────────────

pub(crate) fn cmd_idea_add(
    name: &str,
    description: Option<&str>,
    idea_type: Option<&str>,
    tags: Vec<String>,
    globals: &Globals,
) {
    let mut idea = NewIdea::new(name).with_tags(tags);
    if let Some(description) = description {
        idea = idea.with_description(description);
    }
    if let Some(idea_type) = idea_type {
        idea = idea.with_type(idea_type);
    }

    let mut pool = globals.pool();
    match pool.add_idea(idea) {
        Ok(id) => confirm(&id, &format!("Added idea {}", id), globals),
        Err(e) => fail(&e.to_string(), globals),
    }
}

pub(crate) fn cmd_idea_list(status: Option<IdeaStatus>, limit: usize, globals: &Globals) {
    let pool = globals.pool();
    let ideas = pool.list_ideas(status, limit);
    match globals.output {
        OutputFormat::Json => print_json(&ideas, globals),
        OutputFormat::Text => print!("{}", report::idea_list(&ideas)),
    }
}

pub(crate) fn cmd_idea_show(id: &str, globals: &Globals) {
    let pool = globals.pool();
    let Some(idea) = pool.get_idea(id) else {
        not_found("idea", id, globals);
    };
    let executions = pool.executions_for(id);
    match globals.output {
        OutputFormat::Json => print_json(
            &json!({ "idea": idea, "executions": executions }),
            globals,
        ),
        OutputFormat::Text => print!("{}", report::idea_detail(idea, &executions)),
    }
}

pub(crate) fn cmd_idea_status(
    id: &str,
    status: IdeaStatus,
    notes: Option<&str>,
    globals: &Globals,
) {
    let mut pool = globals.pool();
    match pool.update_idea_status(id, status, notes) {
        Ok(true) => confirm(id, &format!("Idea {} is now {}", id, status), globals),
        Ok(false) => not_found("idea", id, globals),
        Err(e) => fail(&e.to_string(), globals),
    }
}

// ──────────────────────────────────────────────
// Executions
// ──────────────────────────────────────────────

pub(crate) fn cmd_exec_start(idea_id: &str, globals: &Globals) {
    let mut pool = globals.pool();
    if pool.get_idea(idea_id).is_none() {
        tracing::warn!(idea_id, "starting an execution for an unknown idea");
    }
    match pool.start_execution(idea_id) {
        Ok(id) => confirm(&id, &format!("Started execution {}", id), globals),
        Err(e) => fail(&e.to_string(), globals),
    }
}

pub(crate) fn cmd_exec_step(exec_id: &str, step: &str, status: &str, globals: &Globals) {
    let mut pool = globals.pool();
    match pool.add_execution_step(exec_id, step, status) {
        Ok(true) => confirm(exec_id, &format!("Step recorded on {}", exec_id), globals),
        Ok(false) => not_found("execution", exec_id, globals),
        Err(e) => fail(&e.to_string(), globals),
    }
}

pub(crate) fn cmd_exec_log(exec_id: &str, message: &str, globals: &Globals) {
    let mut pool = globals.pool();
    match pool.add_execution_log(exec_id, message) {
        Ok(true) => confirm(exec_id, &format!("Log recorded on {}", exec_id), globals),
        Ok(false) => not_found("execution", exec_id, globals),
        Err(e) => fail(&e.to_string(), globals),
    }
}

pub(crate) fn cmd_exec_complete(
    exec_id: &str,
    failed: bool,
    notes: Option<&str>,
    globals: &Globals,
) {
    let mut pool = globals.pool();
    match pool.complete_execution(exec_id, !failed, notes) {
        Ok(true) => {
            let outcome = if failed { "failed" } else { "success" };
            confirm(
                exec_id,
                &format!("Execution {} closed as {}", exec_id, outcome),
                globals,
            );
        }
        Ok(false) => match pool.get_execution(exec_id) {
            Some(exec) => fail(
                &format!("execution '{}' is already {}", exec_id, exec.status),
                globals,
            ),
            None => not_found("execution", exec_id, globals),
        },
        Err(e) => fail(&e.to_string(), globals),
    }
}

// ──────────────────────────────────────────────
// Revenue and overview
// ──────────────────────────────────────────────

pub(crate) fn cmd_revenue_add(
    idea_id: &str,
    amount: &str,
    source: &str,
    notes: Option<&str>,
    globals: &Globals,
) {
    let amount = match Decimal::from_str(amount) {
        Ok(a) => a,
        Err(e) => fail(&format!("invalid amount '{}': {}", amount, e), globals),
    };

    let mut pool = globals.pool();
    match pool.add_revenue(idea_id, amount, source, notes) {
        Ok(id) => confirm(
            &id,
            &format!("Recorded ¥{} for {} as {}", amount, idea_id, id),
            globals,
        ),
        Err(e) => fail(&e.to_string(), globals),
    }
}

pub(crate) fn cmd_revenue_stats(idea_id: Option<&str>, globals: &Globals) {
    let pool = globals.pool();
    let stats = pool.get_revenue_stats(idea_id);
    match globals.output {
        OutputFormat::Json => print_json(&stats, globals),
        OutputFormat::Text => print!("{}", report::revenue_stats(&stats)),
    }
}

pub(crate) fn cmd_overview(globals: &Globals) {
    let pool = globals.pool();
    let overview = pool.get_overview();
    match globals.output {
        OutputFormat::Json => print_json(&overview, globals),
        OutputFormat::Text => print!("{}", report::overview(&overview)),
    }
}
