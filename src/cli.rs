//! The nestmsg Command-Line Interface.
//!
//! Loads a catalog and configuration, then resolves messages or raw
//! templates with the library. All failures are rendered as miette
//! diagnostics on stderr.

pub mod output;

use std::{path::PathBuf, process, sync::Once};

use clap::{Args, Parser, Subcommand};
use miette::Diagnostic;

use crate::{
    catalog::{Locale, MapCatalog},
    config::ResolverConfig,
    errors::print_error,
    NestMessageSource, Value,
};

// ============================================================================
// CLI ARGUMENTS - Command-line argument definitions
// ============================================================================

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "nestmsg",
    version,
    about = "Resolve nested message templates from a message catalog."
)]
pub struct NestArgs {
    #[command(flatten)]
    pub options: GlobalOptions,
    #[command(subcommand)]
    pub command: ArgsCommand,
}

/// Configuration shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalOptions {
    /// YAML or JSON resolver configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Override the expression prefix.
    #[arg(long, global = true)]
    pub prefix: Option<String>,
    /// Override the expression suffix.
    #[arg(long, global = true)]
    pub suffix: Option<String>,
    /// Override the parameter separator.
    #[arg(long, global = true)]
    pub separator: Option<String>,
    /// Override the argument marker.
    #[arg(long, global = true)]
    pub arg_marker: Option<String>,
    /// Override the escaper.
    #[arg(long, global = true)]
    pub escaper: Option<String>,
    /// Override the quoter.
    #[arg(long, global = true)]
    pub quoter: Option<String>,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum ArgsCommand {
    /// Look up a message code and print its fully resolved text.
    Resolve {
        /// The message code to resolve.
        code: String,
        /// Positional arguments; numeric text is passed as numbers.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
        /// Catalog file or bundle directory.
        #[arg(long, short)]
        catalog: PathBuf,
        /// Locale tag; defaults to the root locale.
        #[arg(long, short)]
        locale: Option<String>,
    },
    /// Resolve a template given on the command line.
    Expand {
        /// The raw template to resolve.
        template: String,
        /// Positional arguments; numeric text is passed as numbers.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
        /// Catalog file or bundle directory used for nested codes.
        #[arg(long, short)]
        catalog: Option<PathBuf>,
        /// Locale tag; defaults to the root locale.
        #[arg(long, short)]
        locale: Option<String>,
    },
    /// List the codes visible for a locale with their raw templates.
    List {
        /// Catalog file or bundle directory.
        #[arg(long, short)]
        catalog: PathBuf,
        /// Locale tag; defaults to the root locale.
        #[arg(long, short)]
        locale: Option<String>,
    },
    /// Resolve every code of a catalog and report the failures.
    Check {
        /// Catalog file or bundle directory.
        #[arg(long, short)]
        catalog: PathBuf,
        /// Locale tag; defaults to the root locale.
        #[arg(long, short)]
        locale: Option<String>,
        /// Arguments passed to every message.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    init_tracing();
    let args = NestArgs::parse();
    let config = load_config(&args.options);

    match args.command {
        ArgsCommand::Resolve {
            code,
            args,
            catalog,
            locale,
        } => {
            let source = open_source(Some(&catalog), config);
            let text = source
                .get_message(&code, &coerce_args(&args), &parse_locale(locale))
                .unwrap_or_else(|e| exit_with(e));
            println!("{text}");
        }

        ArgsCommand::Expand {
            template,
            args,
            catalog,
            locale,
        } => {
            let source = open_source(catalog.as_ref(), config);
            let text = source
                .resolve_template(&template, &coerce_args(&args), &parse_locale(locale))
                .unwrap_or_else(|e| exit_with(e));
            println!("{text}");
        }

        ArgsCommand::List { catalog, locale } => {
            let source = open_source(Some(&catalog), config);
            let locale = parse_locale(locale);
            let entries: Vec<(&str, &str)> = source
                .catalog()
                .codes(&locale)
                .into_iter()
                .filter_map(|code| {
                    let (_, template) = source.catalog().raw_template(code, &locale)?;
                    Some((code, template))
                })
                .collect();
            output::print_codes(&entries);
        }

        ArgsCommand::Check {
            catalog,
            locale,
            args,
        } => {
            let source = open_source(Some(&catalog), config);
            let failed = run_check(&source, &parse_locale(locale), &coerce_args(&args));
            if failed > 0 {
                process::exit(1);
            }
        }
    }
}

// ============================================================================
// CHECK RUNNER
// ============================================================================

/// Resolves every visible code, printing one line per code. Returns the failure count.
fn run_check(source: &NestMessageSource<MapCatalog>, locale: &Locale, args: &[Value]) -> usize {
    let codes = source.catalog().codes(locale);
    let mut passed = 0;
    let mut failed = 0;

    for code in codes {
        match source.get_message(code, args, locale) {
            Ok(_) => {
                passed += 1;
                output::print_check(code, true);
            }
            Err(e) => {
                failed += 1;
                output::print_check(code, false);
                print_error(e);
            }
        }
    }

    output::print_summary(passed, failed);
    failed
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

static TRACING_INIT: Once = Once::new();

/// Installs a stderr subscriber when `NESTMSG_LOG` or `RUST_LOG` is set.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter =
            EnvFilter::try_from_env("NESTMSG_LOG").or_else(|_| EnvFilter::try_from_default_env());
        if let Ok(filter) = filter {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

fn load_config(options: &GlobalOptions) -> ResolverConfig {
    let mut config = match &options.config {
        Some(path) => ResolverConfig::from_path(path).unwrap_or_else(|e| exit_with(e)),
        None => ResolverConfig::default(),
    };

    let delimiters = &mut config.delimiters;
    let overrides = [
        (&mut delimiters.prefix, &options.prefix),
        (&mut delimiters.suffix, &options.suffix),
        (&mut delimiters.separator, &options.separator),
        (&mut delimiters.arg_marker, &options.arg_marker),
        (&mut delimiters.escaper, &options.escaper),
        (&mut delimiters.quoter, &options.quoter),
    ];
    for (slot, value) in overrides {
        if let Some(value) = value {
            slot.clone_from(value);
        }
    }

    config.validate().unwrap_or_else(|e| exit_with(e));
    config
}

fn open_source(catalog: Option<&PathBuf>, config: ResolverConfig) -> NestMessageSource<MapCatalog> {
    let catalog = match catalog {
        Some(path) => MapCatalog::from_path(path).unwrap_or_else(|e| exit_with(e)),
        None => MapCatalog::new(),
    };
    NestMessageSource::with_config(catalog, config).unwrap_or_else(|e| exit_with(e))
}

fn parse_locale(tag: Option<String>) -> Locale {
    tag.map(Locale::new).unwrap_or_default()
}

fn coerce_args(raw: &[String]) -> Vec<Value> {
    raw.iter().map(|arg| Value::coerce_literal(arg)).collect()
}

fn exit_with<E: Diagnostic + Send + Sync + 'static>(error: E) -> ! {
    print_error(error);
    process::exit(1);
}
