//! Discovery commands: `daily`, `analyze`, `hot`, `score` and `config`.

use std::path::Path;

use ideapool_core::{generate_all, score, Descriptor};
use ideapool_sources::{enabled_sources, GithubClient, Source};
use serde_json::json;
use time::OffsetDateTime;

use crate::pipeline::{save_ideas, DailyOptions, Pipeline};
use crate::{fail, print_json, report, Globals, OutputFormat};

fn generated_at() -> String {
    let now = OffsetDateTime::now_utc();
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02} UTC",
        now.year(),
        now.month() as u8,
        now.day(),
        now.hour(),
        now.minute()
    )
}

pub(crate) fn cmd_daily(count: usize, save: bool, multi_source: bool, globals: &Globals) {
    let config = globals.config();
    let github = GithubClient::new(&config.sources, &config.search);
    let sources: Vec<Box<dyn Source>> = if multi_source {
        enabled_sources(&config)
    } else {
        Vec::new()
    };

    let run = Pipeline::new(&config, &github, &sources).daily_ideas(DailyOptions {
        count,
        multi_source,
    });

    let saved = if save {
        let mut pool = globals.pool();
        match save_ideas(&mut pool, &run.ideas) {
            Ok(ids) => ids,
            Err(e) => fail(&format!("error saving ideas: {}", e), globals),
        }
    } else {
        Vec::new()
    };

    match globals.output {
        OutputFormat::Json => {
            let failed: Vec<_> = run
                .outcomes
                .iter()
                .filter_map(|o| {
                    o.error
                        .as_ref()
                        .map(|e| json!({"source": o.source, "error": e.to_string()}))
                })
                .collect();
            print_json(
                &json!({
                    "generated_at": generated_at(),
                    "ideas": run.ideas,
                    "saved": saved,
                    "used_fallback": run.used_fallback,
                    "failed_sources": failed,
                }),
                globals,
            );
        }
        OutputFormat::Text => {
            if !globals.quiet {
                eprint!("{}", report::source_warnings(&run.outcomes));
            }
            print!("{}", report::daily_report(&run.ideas, &generated_at()));
            if !globals.quiet && !saved.is_empty() {
                println!(
                    "Saved {} ideas to {}",
                    saved.len(),
                    globals.data_dir.display()
                );
            }
        }
    }
}

pub(crate) fn cmd_analyze(url: &str, globals: &Globals) {
    let config = globals.config();
    let github = GithubClient::new(&config.sources, &config.search);
    let pipeline = Pipeline::new(&config, &github, &[]);

    let analysis = match pipeline.analyze_project(url) {
        Ok(a) => a,
        Err(e) => fail(&e.to_string(), globals),
    };

    match globals.output {
        OutputFormat::Json => print_json(&analysis, globals),
        OutputFormat::Text => print!("{}", report::analysis_report(&analysis)),
    }
}

pub(crate) fn cmd_hot(globals: &Globals) {
    let config = globals.config();
    let github = GithubClient::new(&config.sources, &config.search);
    let found = Pipeline::new(&config, &github, &[]).hot_opportunities();

    match globals.output {
        OutputFormat::Json => print_json(
            &json!({
                "repos": found.repos,
                "error": found.error.as_ref().map(|e| e.to_string()),
            }),
            globals,
        ),
        OutputFormat::Text => {
            if let Some(error) = &found.error {
                if !globals.quiet {
                    eprintln!("warning: {}", error);
                }
            }
            print!("{}", report::opportunities_report(&found.repos));
        }
    }
}

/// Score a descriptor read from a JSON file, offline.
pub(crate) fn cmd_score(path: &Path, globals: &Globals) {
    let config = globals.config();
    let content = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => fail(
            &format!("error reading file '{}': {}", path.display(), e),
            globals,
        ),
    };
    let descriptor: Descriptor = match serde_json::from_str(&content) {
        Ok(d) => d,
        Err(e) => fail(
            &format!("error parsing descriptor in '{}': {}", path.display(), e),
            globals,
        ),
    };

    let potential = score(&descriptor, &config.scoring);
    let ideas = generate_all(&descriptor, Some(&config.preferences), &config);

    match globals.output {
        OutputFormat::Json => print_json(
            &json!({
                "descriptor": descriptor,
                "potential": potential,
                "ideas": ideas,
            }),
            globals,
        ),
        OutputFormat::Text => {
            print!("{}", report::score_report(&descriptor, &potential));
            let kinds: Vec<&str> = ideas.iter().map(|i| i.idea_type.as_str()).collect();
            println!("  Suitable: {}", kinds.join(", "));
        }
    }
}

/// Print the effective configuration.
pub(crate) fn cmd_config(globals: &Globals) {
    let config = globals.config();
    match globals.output {
        OutputFormat::Json => print_json(&config, globals),
        OutputFormat::Text => match config.to_toml_string() {
            Ok(text) => print!("{}", text),
            Err(e) => fail(&e.to_string(), globals),
        },
    }
}
