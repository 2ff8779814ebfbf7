//! The `ioring compile` command.
//!
//! Compiles each requirement into an intent graph, writes the graph to a
//! file, a directory, or stdout, and optionally compares it with a golden
//! graph.

use std::fs;
use std::path::{Path, PathBuf};

use ioring_compiler::{Compilation, IntentGraph};
use serde_json::json;

use crate::pipeline::{self, FileOutcome};
use crate::{CompileArgs, GlobalArgs, ReportFormat};

/// Runs the compile command and returns the process exit code.
pub fn run(args: &CompileArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    if args.output.is_some() && args.requirements.len() > 1 {
        return Err("--output accepts a single requirement; use --out-dir for several".into());
    }
    if let Some(dir) = &args.out_dir {
        fs::create_dir_all(dir)?;
    }

    if !global.quiet && args.format == ReportFormat::Text {
        for path in &args.requirements {
            eprintln!("   Compiling {}", path.display());
        }
    }

    let outcomes = pipeline::compile_files(&args.requirements);
    let mut exit_code = 0;
    let mut json_results = Vec::new();

    for outcome in &outcomes {
        let FileOutcome { path, result } = outcome;
        let report = match result {
            Ok(report) => report,
            Err(message) => {
                eprintln!("error: {message}");
                json_results.push(json!({ "file": path.display().to_string(), "error": message }));
                exit_code = 1;
                continue;
            }
        };

        if args.format == ReportFormat::Text && !report.diagnostics.is_empty() {
            eprint!("{}", pipeline::render_diagnostics(&report.diagnostics, global.color));
        }
        if pipeline::is_failure(report, args.deny_warnings) {
            exit_code = 1;
        }

        let mut entry = json!({
            "file": path.display().to_string(),
            "diagnostics": report.diagnostics,
        });

        if let Some(compilation) = &report.compilation {
            let graph_json = compilation.graph.to_json()?;
            let fingerprint = compilation.graph.fingerprint()?;
            entry["fingerprint"] = json!(fingerprint.to_string());

            match destination(args, path) {
                Some(target) => {
                    fs::write(&target, format!("{graph_json}\n"))?;
                    entry["output"] = json!(target.display().to_string());
                    if !global.quiet && args.format == ReportFormat::Text {
                        eprintln!("     Wrote {}", target.display());
                    }
                }
                None => match args.format {
                    ReportFormat::Text => println!("{graph_json}"),
                    ReportFormat::Json => entry["graph"] = serde_json::to_value(&compilation.graph)?,
                },
            }

            if args.report {
                match args.format {
                    ReportFormat::Text => eprint!("{}", domain_report(compilation)),
                    ReportFormat::Json => {
                        entry["domains"] = serde_json::to_value(compilation.domain_summaries())?
                    }
                }
            }

            if let Some(golden) = &args.golden {
                let matches = matches_golden(&compilation.graph, golden)?;
                entry["golden_match"] = json!(matches);
                if !matches {
                    eprintln!(
                        "error: {}: intent graph differs from golden {}",
                        path.display(),
                        golden.display()
                    );
                    exit_code = 1;
                }
            }

            if !global.quiet && args.format == ReportFormat::Text {
                eprintln!(
                    "    Finished {} ({} instances, fingerprint {})",
                    path.display(),
                    compilation.graph.instances.len(),
                    fingerprint.short()
                );
            }
        }

        if !global.quiet && args.format == ReportFormat::Text {
            let (errors, warnings) = pipeline::counts(report);
            eprintln!("   Result: {errors} error(s), {warnings} warning(s)");
        }
        json_results.push(entry);
    }

    if args.format == ReportFormat::Json {
        let output = serde_json::to_string_pretty(&json_results).unwrap_or_else(|_| "[]".to_string());
        println!("{output}");
    }

    Ok(exit_code)
}

/// Where the graph for `input` is written, or `None` for stdout.
fn destination(args: &CompileArgs, input: &Path) -> Option<PathBuf> {
    if let Some(output) = &args.output {
        return Some(output.clone());
    }
    args.out_dir.as_ref().map(|dir| dir.join(graph_file_name(input)))
}

/// `<stem>_intent_graph.json` for a requirement path.
pub fn graph_file_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "io_ring".to_string());
    format!("{stem}_intent_graph.json")
}

/// Compares `graph` structurally with the graph stored at `golden`.
fn matches_golden(graph: &IntentGraph, golden: &Path) -> Result<bool, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(golden)
        .map_err(|e| format!("failed to read golden {}: {e}", golden.display()))?;
    let expected = IntentGraph::from_json(&content)
        .map_err(|e| format!("failed to parse golden {}: {e}", golden.display()))?;
    Ok(&expected == graph)
}

/// A human-readable table of the resolved domains.
fn domain_report(compilation: &Compilation) -> String {
    let mut out = String::new();
    for summary in compilation.domain_summaries() {
        let origin = if summary.declared { "declared" } else { "automatic" };
        out.push_str(&format!(
            "  domain {} ({origin}): vdd {}, vss {}\n",
            summary.name, summary.vdd_provider, summary.vss_provider
        ));
        out.push_str(&format!("    members:   {}\n", summary.members.join(", ")));
        if !summary.consumers.is_empty() {
            out.push_str(&format!("    consumers: {}\n", summary.consumers.join(", ")));
        }
        if !summary.adopted.is_empty() {
            out.push_str(&format!("    adopted:   {}\n", summary.adopted.join(", ")));
        }
        if !summary.analog_io.is_empty() {
            out.push_str(&format!("    analog io: {}\n", summary.analog_io.join(", ")));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RING: &str = r#"
signals = ["VCM", "AVDD", "AVSS", "CLK", "DOUT", "VIOL", "GIOL", "VREF"]

[ring]
width = 2
height = 2
"#;

    fn global() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
        }
    }

    fn args(requirements: Vec<PathBuf>) -> CompileArgs {
        CompileArgs {
            requirements,
            output: None,
            out_dir: None,
            format: ReportFormat::Text,
            deny_warnings: false,
            golden: None,
            report: false,
        }
    }

    #[test]
    fn graph_file_name_uses_stem() {
        assert_eq!(graph_file_name(Path::new("rings/adc.toml")), "adc_intent_graph.json");
    }

    #[test]
    fn writes_graph_to_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("ring.toml");
        fs::write(&input, RING).unwrap();
        let output = dir.path().join("graph.json");

        let mut a = args(vec![input]);
        a.output = Some(output.clone());
        assert_eq!(run(&a, &global()).unwrap(), 0);

        let graph = IntentGraph::from_json(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(graph.instances.len(), 12);
    }

    #[test]
    fn out_dir_holds_one_graph_per_input() {
        let dir = TempDir::new().unwrap();
        let a_path = dir.path().join("a.toml");
        let b_path = dir.path().join("b.toml");
        fs::write(&a_path, RING).unwrap();
        fs::write(&b_path, RING).unwrap();
        let out = dir.path().join("out");

        let mut a = args(vec![a_path, b_path]);
        a.out_dir = Some(out.clone());
        assert_eq!(run(&a, &global()).unwrap(), 0);
        assert!(out.join("a_intent_graph.json").exists());
        assert!(out.join("b_intent_graph.json").exists());
    }

    #[test]
    fn output_rejects_several_inputs() {
        let mut a = args(vec![PathBuf::from("a.toml"), PathBuf::from("b.toml")]);
        a.output = Some(PathBuf::from("g.json"));
        assert!(run(&a, &global()).is_err());
    }

    #[test]
    fn golden_comparison() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("ring.toml");
        fs::write(&input, RING).unwrap();
        let golden = dir.path().join("golden.json");

        let mut a = args(vec![input.clone()]);
        a.output = Some(golden.clone());
        assert_eq!(run(&a, &global()).unwrap(), 0);

        let mut b = args(vec![input.clone()]);
        b.out_dir = Some(dir.path().join("out"));
        b.golden = Some(golden.clone());
        assert_eq!(run(&b, &global()).unwrap(), 0);

        let swapped = r#"
signals = ["VCM", "AVSS", "AVDD", "CLK", "DOUT", "VIOL", "GIOL", "VREF"]

[ring]
width = 2
height = 2
"#;
        let other = dir.path().join("other.toml");
        fs::write(&other, swapped).unwrap();
        let mut c = args(vec![other]);
        c.out_dir = Some(dir.path().join("out"));
        c.golden = Some(golden);
        assert_eq!(run(&c, &global()).unwrap(), 1);
    }

    #[test]
    fn errors_and_denied_warnings_fail() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("bad.toml");
        fs::write(
            &bad,
            r#"
signals = ["VCM", "???", "AVSS"]

[ring]
width = 0
height = 3
"#,
        )
        .unwrap();
        let mut a = args(vec![bad]);
        a.out_dir = Some(dir.path().join("out"));
        assert_eq!(run(&a, &global()).unwrap(), 1);
        assert!(!dir.path().join("out").join("bad_intent_graph.json").exists());

        let underfilled = dir.path().join("under.toml");
        fs::write(
            &underfilled,
            r#"
signals = ["VCM", "AVDD", "AVSS"]

[ring]
width = 2
height = 3
"#,
        )
        .unwrap();
        let mut b = args(vec![underfilled.clone()]);
        b.out_dir = Some(dir.path().join("out"));
        assert_eq!(run(&b, &global()).unwrap(), 0);
        b.deny_warnings = true;
        assert_eq!(run(&b, &global()).unwrap(), 1);
    }

    #[test]
    fn missing_input_fails_without_aborting() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.toml");
        fs::write(&good, RING).unwrap();
        let mut a = args(vec![dir.path().join("missing.toml"), good]);
        a.out_dir = Some(dir.path().join("out"));
        assert_eq!(run(&a, &global()).unwrap(), 1);
        assert!(dir.path().join("out").join("good_intent_graph.json").exists());
    }
}
