mod discover;
mod pipeline;
mod pool;
mod report;
mod settings;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use ideapool_core::Config;
use ideapool_storage::{AssetPool, IdeaStatus, DEFAULT_LIST_LIMIT};
use serde::Serialize;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Find money-making ideas in trending projects and track their execution.
#[derive(Parser)]
#[command(
    name = "ideapool",
    version,
    about = "Score trending projects into money-making ideas and track them"
)]
struct Cli {
    /// Directory holding ideas.json, executions.json and revenue.json
    #[arg(long, global = true, env = settings::DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// TOML config file (defaults to <data-dir>/config.toml when present)
    #[arg(long, global = true, env = settings::CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log progress to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect sources and print today's ranked ideas
    Daily {
        /// Number of ideas to keep
        #[arg(long, default_value = "5")]
        count: usize,
        /// Do not store the ideas in the pool
        #[arg(long)]
        no_save: bool,
        /// Skip hot-content sources and use repository search only
        #[arg(long)]
        no_multi_source: bool,
    },

    /// Score one repository and generate its ideas
    Analyze {
        /// Repository URL, e.g. https://github.com/owner/repo
        url: String,
    },

    /// Trending repositories that look like AI opportunities
    Hot,

    /// Score a descriptor JSON file offline
    Score {
        /// Path to the descriptor JSON file
        file: PathBuf,
    },

    /// Print the effective configuration
    Config,

    /// Manage stored ideas
    Idea {
        #[command(subcommand)]
        command: IdeaCommands,
    },

    /// Track execution of an idea
    Exec {
        #[command(subcommand)]
        command: ExecCommands,
    },

    /// Record and summarize revenue
    Revenue {
        #[command(subcommand)]
        command: RevenueCommands,
    },

    /// Idea, execution and revenue totals
    Overview,
}

#[derive(Subcommand)]
enum IdeaCommands {
    /// Add an idea
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Idea type, e.g. consulting or training
        #[arg(long = "type")]
        idea_type: Option<String>,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// List ideas, newest first
    List {
        /// pending, in_progress, completed or failed
        #[arg(long)]
        status: Option<IdeaStatus>,
        #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: usize,
    },

    /// Show one idea and its executions
    Show { id: String },

    /// Set an idea's status
    Status {
        id: String,
        /// pending, in_progress, completed or failed
        status: IdeaStatus,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
enum ExecCommands {
    /// Start an execution; the idea moves to in_progress
    Start { idea_id: String },

    /// Append a step
    Step {
        exec_id: String,
        step: String,
        #[arg(long, default_value = "completed")]
        status: String,
    },

    /// Append a log line
    Log { exec_id: String, message: String },

    /// Close an execution; the idea follows its outcome
    Complete {
        exec_id: String,
        /// Close as failed instead of success
        #[arg(long)]
        failed: bool,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
enum RevenueCommands {
    /// Record income for an idea
    Add {
        idea_id: String,
        /// Amount, e.g. 199.5
        #[arg(allow_hyphen_values = true)]
        amount: String,
        #[arg(long)]
        source: String,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Totals, optionally for one idea
    Stats {
        #[arg(long = "idea")]
        idea_id: Option<String>,
    },
}

/// Global flags shared by every command.
pub(crate) struct Globals {
    pub(crate) data_dir: PathBuf,
    config_path: Option<PathBuf>,
    pub(crate) output: OutputFormat,
    pub(crate) quiet: bool,
}

impl Globals {
    /// The effective config; exits on a bad file.
    pub(crate) fn config(&self) -> Config {
        match settings::resolve_config(self.config_path.as_deref(), &self.data_dir) {
            Ok(config) => config,
            Err(e) => fail(&e.to_string(), self),
        }
    }

    pub(crate) fn pool(&self) -> AssetPool {
        AssetPool::open(&self.data_dir)
    }
}

fn main() {
    let cli = Cli::parse();
    settings::init_logging(cli.verbose);

    let globals = Globals {
        data_dir: settings::resolve_data_dir(cli.data_dir),
        config_path: cli.config,
        output: cli.output,
        quiet: cli.quiet,
    };
    tracing::debug!(data_dir = %globals.data_dir.display(), "starting");

    match cli.command {
        Commands::Daily {
            count,
            no_save,
            no_multi_source,
        } => discover::cmd_daily(count, !no_save, !no_multi_source, &globals),
        Commands::Analyze { url } => discover::cmd_analyze(&url, &globals),
        Commands::Hot => discover::cmd_hot(&globals),
        Commands::Score { file } => discover::cmd_score(&file, &globals),
        Commands::Config => discover::cmd_config(&globals),
        Commands::Idea { command } => cmd_idea(command, &globals),
        Commands::Exec { command } => cmd_exec(command, &globals),
        Commands::Revenue { command } => cmd_revenue(command, &globals),
        Commands::Overview => pool::cmd_overview(&globals),
    }
}

fn cmd_idea(command: IdeaCommands, globals: &Globals) {
    match command {
        IdeaCommands::Add {
            name,
            description,
            idea_type,
            tags,
        } => pool::cmd_idea_add(
            &name,
            description.as_deref(),
            idea_type.as_deref(),
            tags,
            globals,
        ),
        IdeaCommands::List { status, limit } => pool::cmd_idea_list(status, limit, globals),
        IdeaCommands::Show { id } => pool::cmd_idea_show(&id, globals),
        IdeaCommands::Status { id, status, notes } => {
            pool::cmd_idea_status(&id, status, notes.as_deref(), globals)
        }
    }
}

fn cmd_exec(command: ExecCommands, globals: &Globals) {
    match command {
        ExecCommands::Start { idea_id } => pool::cmd_exec_start(&idea_id, globals),
        ExecCommands::Step {
            exec_id,
            step,
            status,
        } => pool::cmd_exec_step(&exec_id, &step, &status, globals),
        ExecCommands::Log { exec_id, message } => pool::cmd_exec_log(&exec_id, &message, globals),
        ExecCommands::Complete {
            exec_id,
            failed,
            notes,
        } => pool::cmd_exec_complete(&exec_id, failed, notes.as_deref(), globals),
    }
}

fn cmd_revenue(command: RevenueCommands, globals: &Globals) {
    match command {
        RevenueCommands::Add {
            idea_id,
            amount,
            source,
            notes,
        } => pool::cmd_revenue_add(&idea_id, &amount, &source, notes.as_deref(), globals),
        RevenueCommands::Stats { idea_id } => pool::cmd_revenue_stats(idea_id.as_deref(), globals),
    }
}

/// Pretty-print a value as JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T, globals: &Globals) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => fail(&format!("error serializing output: {}", e), globals),
    }
}

/// Report an error and exit with status 1.
pub(crate) fn fail(msg: &str, globals: &Globals) -> ! {
    report_error(msg, globals.output, globals.quiet);
    process::exit(1);
}

/// Report an error to stderr in the appropriate format.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{{\"error\": \"{}\"}}", msg.replace('"', "\\\""));
        }
    }
}
