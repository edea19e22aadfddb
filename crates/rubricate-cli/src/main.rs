//! rubricate CLI: score generated questions and lists against a rubric.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

mod commands;
mod display;

#[derive(Parser)]
#[command(
    name = "rubricate",
    version,
    about = "Rubric scoring for generated questions and question lists"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Dataset path or http(s) URL (overrides the config)
    #[arg(long, global = true)]
    pub dataset: Option<String>,

    /// Criteria variant: question, list, or a custom variant from the config
    #[arg(long, global = true)]
    pub variant: Option<String>,

    /// Directory holding the session store (overrides the config)
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and a sample dataset
    Init,

    /// Load the dataset and report what was found
    Validate,

    /// List the subjects in the dataset
    Subjects,

    /// Choose subject and locale, and start evaluating
    Start {
        /// Subject to evaluate, or ALL
        #[arg(long, default_value = "ALL")]
        subject: String,

        /// Locale code (en_US, pt_BR), or BOTH
        #[arg(long, default_value = "BOTH")]
        locale: String,

        /// Your name, recorded with every evaluation
        #[arg(long)]
        evaluator: Option<String>,
    },

    /// Show the current item and its scorecard
    Show,

    /// Preview the total for some criterion values without saving
    Score {
        /// Criterion value, e.g. completeness=PASS or prompt_quality=2
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = commands::parse_assignment)]
        set: Vec<(String, String)>,

        /// Quick-entry digits filling criteria in form order, e.g. 11212
        #[arg(long)]
        keys: Option<String>,
    },

    /// Save the current item's evaluation and move on
    Save {
        /// Criterion value, e.g. completeness=PASS or prompt_quality=2
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = commands::parse_assignment)]
        set: Vec<(String, String)>,

        /// Quick-entry digits filling criteria in form order, e.g. 11212
        #[arg(long)]
        keys: Option<String>,

        /// Free-text reasoning or summary
        #[arg(long)]
        reasoning: Option<String>,
    },

    /// Move to the next item
    Next,

    /// Move to the previous item
    Prev,

    /// Jump to a 1-based position
    Goto {
        position: usize,
    },

    /// Show how many items have been evaluated
    Progress,

    /// Return to subject/locale selection (evaluations are kept)
    Back,

    /// Export saved evaluations
    Export {
        /// Output format: csv or yaml (default depends on the variant)
        #[arg(long)]
        format: Option<String>,

        /// Output directory (defaults to export_dir from the config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Evaluator name for the file name
        #[arg(long)]
        evaluator: Option<String>,
    },

    /// Delete every stored evaluation and the saved position
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Print the criteria descriptions
    Criteria,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rubricate=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let global = cli.global;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate => commands::validate::execute(&global).await,
        Commands::Subjects => commands::subjects::execute(&global).await,
        Commands::Start {
            subject,
            locale,
            evaluator,
        } => commands::start::execute(&global, subject, locale, evaluator).await,
        Commands::Show => commands::show::execute(&global).await,
        Commands::Score { set, keys } => commands::score::execute(&global, set, keys).await,
        Commands::Save {
            set,
            keys,
            reasoning,
        } => commands::save::execute(&global, set, keys, reasoning).await,
        Commands::Next => commands::nav::next(&global).await,
        Commands::Prev => commands::nav::prev(&global).await,
        Commands::Goto { position } => commands::nav::goto(&global, position).await,
        Commands::Progress => commands::progress::execute(&global).await,
        Commands::Back => commands::back::execute(&global).await,
        Commands::Export {
            format,
            output,
            evaluator,
        } => commands::export::execute(&global, format, output, evaluator),
        Commands::Reset { yes } => commands::reset::execute(&global, yes),
        Commands::Criteria => commands::criteria::execute(&global).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
