use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use leanlab::cli::commands;
use leanlab::model::IdeaInputs;
use leanlab::output;

#[derive(Parser)]
#[command(name = "leanlab")]
#[command(about = "Leanlab - Startup idea evaluation\nScores, lean canvas drafts and revision comparisons")]
#[command(version)]
struct Cli {
  /// Print machine-readable JSON instead of formatted output
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

/// The five idea fields, all optional
#[derive(Args)]
struct IdeaArgs {
  /// The problem being solved
  #[arg(long)]
  problem: Option<String>,
  /// The proposed solution
  #[arg(long)]
  solution: Option<String>,
  /// Who has the problem
  #[arg(long)]
  audience: Option<String>,
  /// Existing alternatives and competitors
  #[arg(long)]
  alternatives: Option<String>,
  /// Technology the solution relies on
  #[arg(long)]
  technology: Option<String>,
}

impl From<IdeaArgs> for IdeaInputs {
  fn from(args: IdeaArgs) -> Self {
    IdeaInputs {
      problem: args.problem,
      solution: args.solution,
      audience: args.audience,
      alternatives: args.alternatives,
      technology: args.technology,
    }
  }
}

#[derive(Subcommand)]
enum Command {
  /// Analyze an idea locally without storing it
  Assess {
    #[command(flatten)]
    idea: IdeaArgs,
  },
  /// Submit a new idea to the server
  Submit {
    #[command(flatten)]
    idea: IdeaArgs,
  },
  /// Show an idea and its latest insights
  Show {
    /// Idea identifier
    id: String,
  },
  /// Save a revision of an existing idea
  Revise {
    /// Idea identifier
    id: String,
    #[command(flatten)]
    idea: IdeaArgs,
  },
  /// List the versions of an idea
  Versions {
    /// Idea identifier
    id: String,
  },
  /// Compare the first version of an idea with its latest
  Compare {
    /// Idea identifier
    id: String,
  },
  /// Submit every idea in a JSON array file, one at a time
  Seed {
    /// Path to a JSON array of idea inputs
    file: PathBuf,
  },
  /// List analyzed demo ideas, or store one with revisions
  Demo {
    /// Store the demo idea and its revisions instead of listing samples
    #[arg(long)]
    populate: bool,
  },
  /// Remove every stored idea (requires the admin secret)
  Clear {
    /// Admin secret configured on the server
    #[arg(long, env = "ADMIN_SECRET", hide_env_values = true)]
    secret: String,
  },
  /// Export every idea from the local store to JSON
  Export {
    /// Directory to write export files into
    #[arg(long)]
    out: Option<PathBuf>,
    /// Feed each idea to the generation service and save the responses
    #[arg(long)]
    feed: bool,
    /// Clear the store after a successful export
    #[arg(long)]
    delete: bool,
  },
  /// Print JSON schemas of the output shapes
  Schema,
}

async fn handle(command: Command, json: bool) -> Result<()> {
  match command {
    Command::Assess { idea } => commands::assess(idea.into(), json).await,
    Command::Submit { idea } => commands::submit(idea.into(), json).await,
    Command::Show { id } => commands::show(&id, json).await,
    Command::Revise { id, idea } => commands::revise(&id, idea.into(), json).await,
    Command::Versions { id } => commands::versions(&id, json).await,
    Command::Compare { id } => commands::compare(&id, json).await,
    Command::Seed { file } => commands::seed(&file).await,
    Command::Demo { populate } => commands::demo(populate, json).await,
    Command::Clear { secret } => commands::clear(&secret).await,
    Command::Export { out, feed, delete } => commands::export(out, feed, delete).await,
    Command::Schema => commands::schema(),
  }
}

#[tokio::main]
async fn main() {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(EnvFilter::try_from_env("LEANLAB_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
    .init();

  let cli = Cli::parse();
  if let Err(e) = handle(cli.command, cli.json).await {
    output::error(&format!("{e:#}"));
    std::process::exit(1);
  }
}
