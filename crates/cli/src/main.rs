mod check;
mod schema_file;

use anyhow::{Context, Result};
use argkit::ArgumentTable;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "argkit")]
#[command(version, about = "Check command lines against argkit parser schemas", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample argkit.json schema
    Init(InitArgs),

    /// Parse an argument vector against a schema and print the results
    Check(CheckArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Overwrite an existing schema
    #[arg(long)]
    force: bool,
}

#[derive(Parser)]
struct CheckArgs {
    /// Path to the schema (default: ./argkit.json)
    #[arg(short, long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Print the results as JSON
    #[arg(long)]
    json: bool,

    /// Treat every ARGV element as a token (no leading program name)
    #[arg(long)]
    no_program_name: bool,

    /// Argument vector to parse; the first element is the program name
    #[arg(value_name = "ARGV", trailing_var_arg = true, allow_hyphen_values = true)]
    argv: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Check(args) => check_command(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let path = schema_file::write_default_schema(&dir, args.force)?;

    eprintln!("Created: {}", path.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit {} to describe your command line", path.display());
    eprintln!("  2. Run: argkit check -- my-cli --verbose build");

    Ok(())
}

fn check_command(args: CheckArgs) -> Result<()> {
    tracing::debug!("executing check command");

    let loaded = schema_file::load_schema(args.schema.as_deref())?;
    let parser = loaded
        .schema
        .build()
        .with_context(|| format!("invalid schema: {}", loaded.path.display()))?;

    let table = if args.no_program_name {
        ArgumentTable::new(loaded.schema.name.clone(), args.argv)
    } else {
        ArgumentTable::from_argv(args.argv)
    };

    let results = parser
        .parse(&table)
        .with_context(|| format!("{}: invalid arguments", table.app_name()))?;
    let report = check::report(&results);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        check::print_human(&report);
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
