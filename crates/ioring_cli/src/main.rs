//! ioring: the command-line interface of the IO-ring intent-graph compiler.
//!
//! Provides `ioring compile` to turn requirement files into intent graphs,
//! `ioring check` to validate requirements without writing output,
//! `ioring stats` and `ioring list` to inspect compiled graphs, and
//! `ioring init` for a starter requirement file.

#![warn(missing_docs)]

mod check;
mod compile;
mod init;
mod pipeline;
mod stats;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// ioring: compile IO-ring requirements into intent graphs.
#[derive(Parser, Debug)]
#[command(name = "ioring", version, about = "IO-Ring Intent-Graph Compiler")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile requirement files into intent graphs.
    Compile(CompileArgs),
    /// Validate requirement files without writing graphs.
    Check(CheckArgs),
    /// Print statistics of a compiled intent graph.
    Stats {
        /// Intent graph JSON file.
        graph: PathBuf,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// List intent graph files in a directory.
    List {
        /// Directory to scan (defaults to the current directory).
        dir: Option<PathBuf>,
    },
    /// Write a starter requirement file.
    Init {
        /// File stem of the requirement (default `io_ring`).
        name: Option<String>,
    },
}

/// Arguments for the `ioring compile` subcommand.
#[derive(Parser, Debug)]
pub struct CompileArgs {
    /// Requirement TOML files.
    #[arg(required = true, num_args = 1..)]
    pub requirements: Vec<PathBuf>,

    /// Write the graph to this file (single requirement only).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write each graph to `DIR/<stem>_intent_graph.json`.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Output format for diagnostics and results.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Fail when any warning is reported.
    #[arg(long)]
    pub deny_warnings: bool,

    /// Fail when the graph differs from this golden graph.
    #[arg(long)]
    pub golden: Option<PathBuf>,

    /// Print the resolved voltage domains.
    #[arg(long)]
    pub report: bool,
}

/// Arguments for the `ioring check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Requirement TOML files.
    #[arg(required = true, num_args = 1..)]
    pub requirements: Vec<PathBuf>,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Fail when any warning is reported.
    #[arg(long)]
    pub deny_warnings: bool,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
    };
    pipeline::init_logging(&global);

    let result = match cli.command {
        Command::Compile(ref args) => compile::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
        Command::Stats { ref graph, format } => stats::run_stats(graph, format),
        Command::List { ref dir } => stats::run_list(dir.as_deref(), &global),
        Command::Init { name } => init::run(name, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_compile_default() {
        let cli = Cli::parse_from(["ioring", "compile", "ring.toml"]);
        match cli.command {
            Command::Compile(ref args) => {
                assert_eq!(args.requirements, vec![PathBuf::from("ring.toml")]);
                assert!(args.output.is_none());
                assert!(args.out_dir.is_none());
                assert_eq!(args.format, ReportFormat::Text);
                assert!(!args.deny_warnings);
                assert!(!args.report);
            }
            _ => panic!("expected Compile command"),
        }
    }

    #[test]
    fn parse_compile_with_args() {
        let cli = Cli::parse_from([
            "ioring",
            "compile",
            "a.toml",
            "b.toml",
            "--out-dir",
            "out",
            "--format",
            "json",
            "--deny-warnings",
            "--golden",
            "golden.json",
            "--report",
        ]);
        match cli.command {
            Command::Compile(ref args) => {
                assert_eq!(args.requirements.len(), 2);
                assert_eq!(args.out_dir.as_deref(), Some(std::path::Path::new("out")));
                assert_eq!(args.format, ReportFormat::Json);
                assert!(args.deny_warnings);
                assert_eq!(
                    args.golden.as_deref(),
                    Some(std::path::Path::new("golden.json"))
                );
                assert!(args.report);
            }
            _ => panic!("expected Compile command"),
        }
    }

    #[test]
    fn parse_compile_requires_input() {
        assert!(Cli::try_parse_from(["ioring", "compile"]).is_err());
    }

    #[test]
    fn parse_check() {
        let cli = Cli::parse_from(["ioring", "check", "ring.toml", "--deny-warnings"]);
        match cli.command {
            Command::Check(ref args) => {
                assert_eq!(args.requirements.len(), 1);
                assert!(args.deny_warnings);
            }
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_stats_and_list() {
        let cli = Cli::parse_from(["ioring", "stats", "g.json", "--format", "json"]);
        match cli.command {
            Command::Stats { graph, format } => {
                assert_eq!(graph, PathBuf::from("g.json"));
                assert_eq!(format, ReportFormat::Json);
            }
            _ => panic!("expected Stats command"),
        }
        let cli = Cli::parse_from(["ioring", "list"]);
        match cli.command {
            Command::List { dir } => assert!(dir.is_none()),
            _ => panic!("expected List command"),
        }
    }

    #[test]
    fn parse_init() {
        let cli = Cli::parse_from(["ioring", "init", "adc_ring"]);
        match cli.command {
            Command::Init { name } => assert_eq!(name.as_deref(), Some("adc_ring")),
            _ => panic!("expected Init command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["ioring", "--quiet", "--color", "never", "list"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_verbose_flag() {
        let cli = Cli::parse_from(["ioring", "--verbose", "init"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
    }
}
