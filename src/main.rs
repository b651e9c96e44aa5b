//! CLI entry point for ctgrzr

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use ctgrzr::commands::{self, CommandOutcome, SymlinkReport};
use ctgrzr::logging::{Verbosity, init_logging};
use ctgrzr::paths::{resolve_config_path, to_absolute_path};
use ctgrzr::{
    Error, Result, TerminalPrompt, WalkOptions, load_config, load_operations, save_config,
};
use termcolor::{ColorChoice, StandardStream};
use tracing::debug;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ctgrzr")]
#[command(about = "Sort filesystem paths into categories and run per-category commands")]
#[command(version)]
struct Args {
    /// Path categories config (default: $CTGRZR_CONFIG or ~/.ctgrzr/config.yaml)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto", global = true)]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add path to categories
    Add {
        path: PathBuf,
        #[arg(required = true)]
        categories: Vec<String>,
        /// Overwrite if exists
        #[arg(short, long)]
        force: bool,
        /// Allow adding a symlink
        #[arg(short = 's', long = "allow-symlink")]
        allow_symlink: bool,
    },
    /// Remove path from categories
    Remove {
        path: PathBuf,
        #[arg(required = true)]
        categories: Vec<String>,
        /// Ignore categories that do not contain the path
        #[arg(short, long)]
        force: bool,
    },
    /// Walk the filesystem interactively and categorize paths
    Interactive {
        /// YAML file mapping categories to command templates
        operations: PathBuf,
        /// Root paths (default: current directory)
        paths: Vec<PathBuf>,
        /// Deepest level that can be stepped into
        #[arg(short = 'd', long = "max-depth", conflicts_with = "no_recurse")]
        max_depth: Option<usize>,
        /// Step into the roots only (same as --max-depth 1)
        #[arg(short = 'n', long = "no-recurse")]
        no_recurse: bool,
        /// Offer symlinks instead of skipping them
        #[arg(short = 's', long = "include-symlinks")]
        include_symlinks: bool,
        /// Pick several categories per path
        #[arg(short = 'm', long = "multi")]
        multi: bool,
        /// Leave out children matching pattern (can be used multiple times)
        #[arg(short = 'I', long = "ignore")]
        ignore: Vec<String>,
        /// Start from an empty config instead of resuming the existing one
        #[arg(long)]
        overwrite: bool,
        /// Do not ask before overwriting
        #[arg(short = 'y', long = "yes", requires = "overwrite")]
        yes: bool,
    },
    /// Apply operations defined in a YAML file
    Apply {
        /// YAML file mapping categories to command templates
        operations: PathBuf,
        /// Log failing commands and continue
        #[arg(short = 'k', long = "keep-going")]
        keep_going: bool,
    },
    /// Replicate categorization from another config file
    Autoadd {
        /// Template config file (same format as the -c option)
        template: PathBuf,
        /// Overwrite if exists
        #[arg(short, long)]
        force: bool,
        /// Allow adding symlinks
        #[arg(short = 's', long = "allow-symlinks")]
        allow_symlinks: bool,
    },
    /// Check that configured paths exist on the current filesystem
    Validate {
        /// Categories to check (default: all)
        categories: Vec<String>,
    },
    /// Look for symlinks among and under configured paths
    Symlinks {
        /// Choose which configured directories to scan
        #[arg(short, long)]
        interactive: bool,
        /// Report through the logger instead of stdout
        #[arg(long, conflicts_with = "json")]
        log: bool,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn terminal_prompt(color: ColorMode) -> TerminalPrompt<io::StdinLock<'static>, StandardStream> {
    let choice = if should_use_color(color) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    TerminalPrompt::new(io::stdin().lock(), StandardStream::stdout(choice))
}

fn run(args: Args) -> Result<i32> {
    let config_path = resolve_config_path(args.config.as_deref());
    debug!(path = %config_path.display(), "using config");
    let mut prompt = terminal_prompt(args.color);

    let (config, outcome) = match args.command {
        Command::Add {
            path,
            categories,
            force,
            allow_symlink,
        } => {
            let mut config = load_config(&config_path)?;
            let path = to_absolute_path(&path);
            let outcome = commands::add(&mut config, &path, &categories, force, allow_symlink)?;
            (config, outcome)
        }
        Command::Remove {
            path,
            categories,
            force,
        } => {
            let mut config = load_config(&config_path)?;
            let path = to_absolute_path(&path);
            let outcome = commands::remove(&mut config, &path, &categories, force)?;
            (config, outcome)
        }
        Command::Interactive {
            operations,
            paths,
            max_depth,
            no_recurse,
            include_symlinks,
            multi,
            ignore,
            overwrite,
            yes,
        } => {
            let start =
                match commands::prepare_interactive(&config_path, overwrite, yes, &mut prompt)? {
                    Some(start) => start,
                    None => return Ok(0),
                };
            let operations = load_operations(&to_absolute_path(&operations), None)?;
            let roots: Vec<PathBuf> = if paths.is_empty() {
                vec![to_absolute_path(Path::new("."))]
            } else {
                paths.iter().map(|p| to_absolute_path(p)).collect()
            };
            let options = WalkOptions {
                max_depth: if no_recurse { Some(1) } else { max_depth },
                include_symlinks,
                multi_category: multi,
                ignore_patterns: ignore,
            };
            let mut config = start.config;
            let mut outcome = commands::interactive(
                &mut config,
                start.classified,
                &operations,
                &roots,
                options,
                &mut prompt,
            )?;
            // A confirmed overwrite replaces the old file even if nothing was picked
            outcome.config_changed |= overwrite;
            (config, outcome)
        }
        Command::Apply {
            operations,
            keep_going,
        } => {
            let config = load_config(&config_path)?;
            let operations =
                load_operations(&to_absolute_path(&operations), Some(&config.category_names()))?;
            let outcome = commands::apply(&config, &operations, !keep_going)?;
            (config, outcome)
        }
        Command::Autoadd {
            template,
            force,
            allow_symlinks,
        } => {
            let template_path = to_absolute_path(&template);
            if template_path == config_path {
                return Err(Error::SameConfigAndTemplate);
            }
            let mut config = load_config(&config_path)?;
            let template = load_config(&template_path)?;
            let outcome = commands::autoadd(&mut config, &template, force, allow_symlinks)?;
            (config, outcome)
        }
        Command::Validate { categories } => {
            let config = load_config(&config_path)?;
            let outcome = commands::validate(&config, &categories)?;
            (config, outcome)
        }
        Command::Symlinks {
            interactive,
            log,
            json,
        } => {
            let config = load_config(&config_path)?;
            let report = if json {
                SymlinkReport::Json
            } else if log {
                SymlinkReport::Log
            } else {
                SymlinkReport::Print
            };
            let mut stdout = io::stdout().lock();
            let outcome =
                commands::search_symlinks(&config, interactive, report, &mut prompt, &mut stdout)?;
            (config, outcome)
        }
    };

    let CommandOutcome {
        exit_code,
        config_changed,
    } = outcome;
    if config_changed {
        save_config(&config_path, &config)?;
    }
    Ok(exit_code)
}

fn main() {
    let args = Args::parse();
    init_logging(Verbosity::from_flags(args.verbose, args.quiet));

    match run(args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("ctgrzr: error: {}", e);
            process::exit(1);
        }
    }
}
