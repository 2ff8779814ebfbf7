//! The `ioring init` command.
//!
//! Writes a commented starter requirement that compiles cleanly.

use std::fs;
use std::path::Path;

use crate::GlobalArgs;

/// Starter requirement written by `ioring init`.
pub const TEMPLATE: &str = r#"# IO ring requirement.
#
# Signals are laid around the ring in the order listed, starting at left_0
# for counterclockwise rings and top_0 for clockwise rings.

signals = [
  "VCM",
  "AVDD",
  "AVSS",
  { name = "CLK", direction = "input" },
  { name = "DOUT", direction = "output" },
  "VIOL",
  "GIOL",
  "VREF",
]

[ring]
width = 2
height = 2
placement_order = "counterclockwise"
# library_name = "LLM_Layout_Design"
# cell_name = "IO_RING"
# view_name = "schematic"

# Pads between two adjacent outer pads of one side.
# [[inner_pads]]
# position = "left_0_1"
# name = "IBIAS"

# Explicit voltage domains override the automatic grouping.
# [[domains]]
# name = "CORE"
# members = ["left_0", "left_1", "bottom_0"]
# vdd_provider = "AVDD"
# vss_provider = "AVSS"

[nets]
digital_vdd = "VIOL"
digital_vss = "GIOL"
digital_io_vdd = "VIOH"
digital_io_vss = "GIOH"
core_suffix = "_CORE"
incomplete_domains = "error"
"#;

/// Creates `<name>.toml` in the current directory.
pub fn run(name: Option<String>, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let stem = name.unwrap_or_else(|| "io_ring".to_string());
    let path = Path::new(".").join(format!("{stem}.toml"));
    create(&path)?;
    if !global.quiet {
        eprintln!("     Created {}", path.display());
    }
    Ok(0)
}

/// Writes the template to `path`, refusing to overwrite.
pub fn create(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        return Err(format!("'{}' already exists", path.display()).into());
    }
    fs::write(path, TEMPLATE)?;
    Ok(())
}
