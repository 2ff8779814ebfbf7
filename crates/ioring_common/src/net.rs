//! Net-name helpers for pad signals with bracketed bus indices.
//!
//! Pad names such as `D<3>` or `IB<0>` carry a trailing bus index. Name
//! pattern matching works on the base name, and core-net suffixes must be
//! inserted before the index rather than appended after it.

/// Splits a name into its base and an optional trailing bracketed index.
///
/// The index part keeps its brackets: `IB<0>` splits into `("IB", Some("<0>"))`.
/// A name without a well-formed trailing `<...>` group is returned whole.
pub fn split_bus_index(name: &str) -> (&str, Option<&str>) {
    if !name.ends_with('>') {
        return (name, None);
    }
    match name.rfind('<') {
        Some(open) if open > 0 && open + 2 <= name.len() - 1 => {
            (&name[..open], Some(&name[open..]))
        }
        _ => (name, None),
    }
}

/// Returns the name without its bus index.
pub fn base_name(name: &str) -> &str {
    split_bus_index(name).0
}

/// Appends `suffix` to the base of `name`, keeping any bus index last.
///
/// `AVDD` becomes `AVDD_CORE` and `IB<0>` becomes `IB_CORE<0>`.
pub fn with_core_suffix(name: &str, suffix: &str) -> String {
    match split_bus_index(name) {
        (base, Some(index)) => format!("{base}{suffix}{index}"),
        (base, None) => format!("{base}{suffix}"),
    }
}
