//! Shared plumbing for the compile and check commands.
//!
//! Loads requirement files, runs the compiler over them in parallel, and
//! renders the resulting diagnostics.

use std::error::Error;
use std::path::{Path, PathBuf};

use ioring_compiler::{compile_requirement, CompileReport};
use ioring_config::{load_requirement, Requirement};
use ioring_diagnostics::{Diagnostic, DiagnosticRenderer, TerminalRenderer};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::GlobalArgs;

/// The outcome of compiling one requirement file.
pub struct FileOutcome {
    /// The requirement file.
    pub path: PathBuf,
    /// The compile report, or why the file could not be compiled.
    pub result: Result<CompileReport, String>,
}

/// Installs the global tracing subscriber on stderr.
///
/// `RUST_LOG` takes precedence over the `--quiet` and `--verbose` flags.
pub fn init_logging(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(global.quiet, global.verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(global.color)
        .with_target(false)
        .try_init();
}

/// The log level used when `RUST_LOG` is unset.
pub fn default_level(quiet: bool, verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

/// Loads a requirement file, prefixing errors with its path.
pub fn load(path: &Path) -> Result<Requirement, Box<dyn Error>> {
    load_requirement(path).map_err(|e| format!("{}: {e}", path.display()).into())
}

/// Loads and compiles one requirement file.
pub fn compile_file(path: &Path) -> Result<CompileReport, String> {
    let requirement = load(path).map_err(|e| e.to_string())?;
    compile_requirement(&requirement).map_err(|e| format!("{}: {e}", path.display()))
}

/// Compiles every file in parallel; outcomes keep the input order.
pub fn compile_files(paths: &[PathBuf]) -> Vec<FileOutcome> {
    paths
        .par_iter()
        .map(|path| {
            let _span = tracing::debug_span!("file", path = %path.display()).entered();
            FileOutcome {
                path: path.clone(),
                result: compile_file(path),
            }
        })
        .collect()
}

/// Renders diagnostics for the terminal.
pub fn render_diagnostics(diagnostics: &[Diagnostic], color: bool) -> String {
    let renderer = TerminalRenderer::new(color);
    diagnostics
        .iter()
        .map(|d| renderer.render(d))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Error and warning totals of a report.
pub fn counts(report: &CompileReport) -> (usize, usize) {
    let warnings = report.warning_count();
    (report.diagnostics.len() - warnings, warnings)
}

/// Returns `true` if the report fails under the given warning policy.
pub fn is_failure(report: &CompileReport, deny_warnings: bool) -> bool {
    report.has_errors() || (deny_warnings && report.warning_count() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MINIMAL: &str = r#"
signals = ["VCM", "AVDD", "AVSS", "VREF"]

[ring]
width = 0
height = 2
"#;

    const UNDERFILLED: &str = r#"
signals = ["VCM", "AVDD", "AVSS"]

[ring]
width = 2
height = 3
"#;

    #[test]
    fn default_levels() {
        assert_eq!(default_level(false, false), "warn");
        assert_eq!(default_level(true, false), "error");
        assert_eq!(default_level(false, true), "debug");
        assert_eq!(default_level(true, true), "debug");
    }

    #[test]
    fn compile_files_keeps_order() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.toml");
        let b = dir.path().join("b.toml");
        let missing = dir.path().join("missing.toml");
        fs::write(&a, MINIMAL).unwrap();
        fs::write(&b, UNDERFILLED).unwrap();

        let outcomes = compile_files(&[a.clone(), missing.clone(), b.clone()]);
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].path, a);
        assert_eq!(outcomes[1].path, missing);
        assert_eq!(outcomes[2].path, b);

        let first = outcomes[0].result.as_ref().unwrap();
        assert!(first.compilation.is_some());
        assert_eq!(counts(first), (0, 0));

        let err = outcomes[1].result.as_ref().unwrap_err();
        assert!(err.contains("missing.toml"));

        let third = outcomes[2].result.as_ref().unwrap();
        assert_eq!(counts(third), (0, 1));
        assert!(!is_failure(third, false));
        assert!(is_failure(third, true));
    }

    #[test]
    fn load_reports_path_on_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "signals = [").unwrap();
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn render_without_color() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(
            &path,
            r#"
signals = ["VCM", "???", "AVSS"]

[ring]
width = 0
height = 3
"#,
        )
        .unwrap();
        let report = compile_file(&path).unwrap();
        assert!(report.has_errors());
        let text = render_diagnostics(&report.diagnostics, false);
        assert!(text.contains("E101"));
        assert!(!text.contains("\x1b["));
    }
}
