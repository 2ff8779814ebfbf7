//! The `ioring check` command.
//!
//! Runs the full pipeline on each requirement and reports diagnostics
//! without writing any graph.

use serde_json::json;

use crate::pipeline;
use crate::{CheckArgs, GlobalArgs, ReportFormat};

/// Runs the check command and returns the process exit code.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let outcomes = pipeline::compile_files(&args.requirements);
    let mut exit_code = 0;
    let mut total_errors = 0;
    let mut total_warnings = 0;
    let mut json_results = Vec::new();

    for outcome in &outcomes {
        if !global.quiet && args.format == ReportFormat::Text {
            eprintln!("   Checking {}", outcome.path.display());
        }
        let report = match &outcome.result {
            Ok(report) => report,
            Err(message) => {
                eprintln!("error: {message}");
                json_results.push(json!({
                    "file": outcome.path.display().to_string(),
                    "error": message,
                }));
                total_errors += 1;
                exit_code = 1;
                continue;
            }
        };

        let (errors, warnings) = pipeline::counts(report);
        total_errors += errors;
        total_warnings += warnings;
        if pipeline::is_failure(report, args.deny_warnings) {
            exit_code = 1;
        }

        match args.format {
            ReportFormat::Text => {
                if !report.diagnostics.is_empty() {
                    eprint!("{}", pipeline::render_diagnostics(&report.diagnostics, global.color));
                }
            }
            ReportFormat::Json => json_results.push(json!({
                "file": outcome.path.display().to_string(),
                "diagnostics": report.diagnostics,
                "compiled": report.compilation.is_some(),
            })),
        }
    }

    match args.format {
        ReportFormat::Text => {
            if !global.quiet {
                eprintln!("   Result: {total_errors} error(s), {total_warnings} warning(s)");
            }
        }
        ReportFormat::Json => {
            let output =
                serde_json::to_string_pretty(&json_results).unwrap_or_else(|_| "[]".to_string());
            println!("{output}");
        }
    }

    Ok(exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn global() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
        }
    }

    fn check(requirements: Vec<PathBuf>, deny_warnings: bool) -> i32 {
        let args = CheckArgs {
            requirements,
            format: ReportFormat::Text,
            deny_warnings,
        };
        run(&args, &global()).unwrap()
    }

    #[test]
    fn clean_requirement_passes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ring.toml");
        fs::write(
            &path,
            "signals = [\"VCM\", \"AVDD\", \"AVSS\", \"VREF\"]\n\n[ring]\nwidth = 0\nheight = 2\n",
        )
        .unwrap();
        assert_eq!(check(vec![path], true), 0);
    }

    #[test]
    fn incomplete_domain_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ring.toml");
        fs::write(
            &path,
            "signals = [\"AVDDH1\", \"CLK\", \"AVDDH1\"]\n\n[ring]\nwidth = 0\nheight = 3\n",
        )
        .unwrap();
        assert_eq!(check(vec![path], false), 1);
    }

    #[test]
    fn warnings_fail_only_when_denied() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ring.toml");
        fs::write(
            &path,
            "signals = [\"VCM\", \"AVDD\", \"AVSS\"]\n\n[ring]\nwidth = 2\nheight = 3\n",
        )
        .unwrap();
        assert_eq!(check(vec![path.clone()], false), 0);
        assert_eq!(check(vec![path], true), 1);
    }

    #[test]
    fn unreadable_file_fails() {
        let dir = TempDir::new().unwrap();
        assert_eq!(check(vec![dir.path().join("nope.toml")], false), 1);
    }
}
