use anyhow::Result;
use clap::Parser;
use tracing::Level;

use slim_docgen::cli;

#[derive(Parser)]
#[command(name = "slim-docgen", version)]
#[command(
    about = "Generate a documentation site for a repository using the SLIM docsite template",
    long_about = None
)]
struct Cli {
    /// Path to the repository to document
    #[arg(required_unless_present_any = ["template_only", "revise_site"])]
    repo_path: Option<String>,

    /// Directory where documentation should be generated
    #[arg(short = 'o', long, default_value = "./docsite")]
    output_dir: String,

    /// URL or path to the template repository
    #[arg(short = 't', long)]
    template_repo: Option<String>,

    /// Enable AI enhancement with specified model (e.g., "openai/gpt-4o", "ollama/mistral")
    #[arg(long)]
    use_ai: Option<String>,

    /// Generate the template scaffold without analyzing a repository
    #[arg(long)]
    template_only: bool,

    /// Regenerate landing-page files of an existing site (requires --use-ai)
    #[arg(long)]
    revise_site: bool,

    /// Install dependencies after generation
    #[arg(long)]
    install: bool,

    /// Start development server after generation
    #[arg(long)]
    start: bool,

    /// Path to config file (defaults to ./docgen.toml or ~/.config/slim-docgen/config.toml)
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// Use a mock LLM client instead of a live provider
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    cli::run(
        cli.repo_path,
        cli.output_dir,
        cli.template_repo,
        cli.use_ai,
        cli.template_only,
        cli.revise_site,
        cli.install,
        cli.start,
        cli.config,
        cli.dry_run,
    )
    .await
}
