//! numcall CLI

use clap::{Parser, Subcommand};
use numcall::config::Config;
use numcall::error::report_error;
use numcall::interp::Evaluator;
use numcall::loadpath::PathChange;
use numcall::repl::Repl;
use numcall::shell;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "numcall", version, about = "Function-call runtime for a numerical interpreter")]
struct Cli {
    /// Configuration file (default: ./numcall.toml, then ~/.numcall.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the interactive shell
    Repl,
    /// Run one command line, e.g. `numcall call plus 1 2`
    Call {
        /// Command words
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    /// Modify the load path and print the result
    Path {
        /// Directory to add (or remove with --rm)
        #[arg(long = "add", value_name = "DIR")]
        dirs: Vec<PathBuf>,
        /// Remove the directories instead of adding them
        #[arg(long)]
        rm: bool,
        /// Include all subdirectories
        #[arg(long)]
        subdirs: bool,
        /// Print the path as JSON
        #[arg(long)]
        json: bool,
        /// Save the result to the configured pathdef file
        #[arg(long)]
        save: bool,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = Config::discover(cli.config.as_deref())
        .map_err(numcall::Error::from)
        .and_then(|config| match cli.command {
            Command::Repl => run_repl(&config),
            Command::Call { words } => call(&config, &words.join(" ")),
            Command::Path {
                dirs,
                rm,
                subdirs,
                json,
                save,
            } => modify_path(&config, PathChange { dirs, remove: rm, subdirs }, json, save),
        });

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run_repl(config: &Config) -> numcall::Result<()> {
    let mut repl = Repl::new(config).map_err(|e| std::io::Error::other(e.to_string()))?;
    repl.run().map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(())
}

fn call(config: &Config, line: &str) -> numcall::Result<()> {
    let mut tw = Evaluator::from_config(config);
    if let Err(err) = shell::run_line(&mut tw, line) {
        report_error("<command line>", line, &err)?;
        std::process::exit(1);
    }
    Ok(())
}

fn modify_path(config: &Config, change: PathChange, json: bool, save: bool) -> numcall::Result<()> {
    let mut tw = Evaluator::from_config(config);
    if !change.dirs.is_empty() {
        let warnings = tw.load_path_mut().apply(&change);
        for warning in warnings {
            tw.warning(&warning);
        }
    }

    if save {
        match tw.pathdef_file() {
            Some(file) => tw.load_path().save(file)?,
            None => tracing::warn!("no pathdef file configured; path not saved"),
        }
    }

    let dirs = tw.load_path().dirs();
    if json {
        let text = serde_json::to_string_pretty(dirs).map_err(std::io::Error::other)?;
        println!("{text}");
    } else {
        for dir in dirs {
            println!("{}", dir.display());
        }
    }
    Ok(())
}
