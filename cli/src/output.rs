//! Output rendering shared by the commands.

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strategy_paths_core::{Path, PathKind, PathSet};

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable lines (default)
    #[default]
    Text,
    /// JSON for machine consumption
    Json,
}

/// One path-set entry as printed: its kind and edge-id sequence.
#[derive(Debug, Serialize)]
pub struct EntryView<'a> {
    pub kind: PathKind,
    pub edges: Vec<&'a str>,
}

impl<'a> From<&'a Path> for EntryView<'a> {
    fn from(path: &'a Path) -> Self {
        Self {
            kind: path.kind(),
            edges: path.edge_ids(),
        }
    }
}

pub fn entries(paths: &PathSet) -> Vec<EntryView<'_>> {
    paths.iter().map(EntryView::from).collect()
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn kind_str(kind: PathKind) -> &'static str {
    match kind {
        PathKind::Route => "route",
        PathKind::Induced => "induced",
        PathKind::Direct => "direct",
    }
}

/// `  route    e1 e4 e5  (validator > safe1 > safe3 > receiver1)`
///
/// The node walk is shown for routes only; induced and direct entries are
/// edge bags with no single walk.
pub fn entry_line(path: &Path) -> String {
    let edges = path.edge_ids().join(" ");
    match path.kind() {
        PathKind::Route => format!("  {:<8} {}  ({})", kind_str(path.kind()), edges, path.nodes().join(" > ")),
        kind => format!("  {:<8} {}", kind_str(kind), edges),
    }
}

pub fn print_entries(paths: &PathSet) {
    if paths.is_empty() {
        println!("  (no path)");
        return;
    }
    for path in paths {
        println!("{}", entry_line(path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strategy_paths_core::Edge;

    #[test]
    fn test_entry_line_route() {
        let path = Path::route(vec![Edge::new("e1", "A", "B"), Edge::new("e2", "B", "C")]);
        assert_eq!(entry_line(&path), "  route    e1 e2  (A > B > C)");
    }

    #[test]
    fn test_entry_line_induced() {
        let path = Path::induced(vec![Edge::new("e3", "A", "C"), Edge::new("e9", "C", "A")]);
        assert_eq!(entry_line(&path), "  induced  e3 e9");
    }

    #[test]
    fn test_entry_view_json() {
        let path = Path::direct(vec![Edge::new("e1", "A", "B")]);
        let json = serde_json::to_string(&EntryView::from(&path)).unwrap();
        assert_eq!(json, r#"{"kind":"direct","edges":["e1"]}"#);
    }
}
