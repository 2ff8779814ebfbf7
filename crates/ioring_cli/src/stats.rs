//! The `ioring stats` and `ioring list` commands.

use std::fs;
use std::path::{Path, PathBuf};

use ioring_compiler::{GraphStats, IntentGraph};

use crate::{GlobalArgs, ReportFormat};

/// Prints statistics of one intent graph file.
pub fn run_stats(path: &Path, format: ReportFormat) -> Result<i32, Box<dyn std::error::Error>> {
    let graph = read_graph(path)?;
    let stats = graph.stats();
    match format {
        ReportFormat::Text => println!("{stats}"),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
    }
    Ok(0)
}

/// Lists the intent graphs found in `dir`.
pub fn run_list(dir: Option<&Path>, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let dir = dir.unwrap_or_else(|| Path::new("."));
    let graphs = find_graphs(dir)?;
    if graphs.is_empty() {
        if !global.quiet {
            eprintln!("   No intent graphs in {}", dir.display());
        }
        return Ok(0);
    }
    for (path, stats) in &graphs {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        println!(
            "{name:<40} {:>7}  {:>3} pads  {:>2} inner",
            stats.ring_size, stats.total_pads, stats.inner_pads
        );
    }
    Ok(0)
}

/// Reads an intent graph JSON file.
fn read_graph(path: &Path) -> Result<IntentGraph, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let graph = IntentGraph::from_json(&content)
        .map_err(|e| format!("{} is not an intent graph: {e}", path.display()))?;
    Ok(graph)
}

/// JSON files in `dir` that parse as intent graphs, sorted by file name.
///
/// Other JSON files are skipped silently.
pub fn find_graphs(dir: &Path) -> std::io::Result<Vec<(PathBuf, GraphStats)>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match read_graph(&path) {
            Ok(graph) => found.push((path, graph.stats())),
            Err(e) => tracing::debug!("skipping {}: {e}", path.display()),
        }
    }
    found.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ioring_compiler::compile_requirement;
    use ioring_config::load_requirement_from_str;
    use tempfile::TempDir;

    fn graph_json() -> String {
        let requirement = load_requirement_from_str(
            "signals = [\"VCM\", \"AVDD\", \"AVSS\"]\n\n[ring]\nwidth = 0\nheight = 3\n",
        )
        .unwrap();
        let report = compile_requirement(&requirement).unwrap();
        report.compilation.unwrap().graph.to_json().unwrap()
    }

    #[test]
    fn find_graphs_skips_other_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b_intent_graph.json"), graph_json()).unwrap();
        fs::write(dir.path().join("a_intent_graph.json"), graph_json()).unwrap();
        fs::write(dir.path().join("package.json"), "{\"name\": \"x\"}").unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        let graphs = find_graphs(dir.path()).unwrap();
        let names: Vec<String> = graphs
            .iter()
            .map(|(p, _)| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a_intent_graph.json", "b_intent_graph.json"]);
        assert_eq!(graphs[0].1.ring_size, "0x3");
        assert_eq!(graphs[0].1.total_pads, 3);
        assert_eq!(graphs[0].1.corners, 4);
    }

    #[test]
    fn stats_rejects_non_graph() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.json");
        fs::write(&path, "[]").unwrap();
        assert!(run_stats(&path, ReportFormat::Text).is_err());
    }

    #[test]
    fn stats_of_graph_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("g.json");
        fs::write(&path, graph_json()).unwrap();
        assert_eq!(run_stats(&path, ReportFormat::Json).unwrap(), 0);
    }

    #[test]
    fn list_empty_directory() {
        let dir = TempDir::new().unwrap();
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
        };
        assert_eq!(run_list(Some(dir.path()), &global).unwrap(), 0);
    }
}
