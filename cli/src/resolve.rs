use anyhow::{bail, Result};
use serde::Serialize;
use strategy_paths_core::{resolve_all, EndpointRole, ResolvedStrategy, Strategy, StrategyId};

use crate::load::LoadedTopology;
use crate::output::{entries, print_entries, print_json, EntryView, OutputFormat};

#[derive(Debug, Serialize)]
struct TargetView<'a> {
    node: &'a str,
    ordinal: usize,
}

#[derive(Debug, Serialize)]
struct StrategyView<'a> {
    id: StrategyId,
    start: &'a str,
    targets: Vec<TargetView<'a>>,
    paths: Vec<EntryView<'a>>,
    highlighted_edges: Vec<&'a str>,
}

impl<'a> From<&'a ResolvedStrategy> for StrategyView<'a> {
    fn from(resolved: &'a ResolvedStrategy) -> Self {
        let targets = resolved
            .targets
            .iter()
            .filter_map(|t| match t.role {
                EndpointRole::Target(ordinal) => Some(TargetView { node: &t.node, ordinal }),
                EndpointRole::Start => None,
            })
            .collect();
        Self {
            id: resolved.id,
            start: &resolved.start.node,
            targets,
            paths: entries(&resolved.paths),
            highlighted_edges: resolved.paths.highlighted_edges(),
        }
    }
}

/// Keep the strategies named in `ids`, in descriptor order. Every requested
/// id must exist.
pub fn select(strategies: Vec<Strategy>, ids: &[StrategyId]) -> Result<Vec<Strategy>> {
    if ids.is_empty() {
        return Ok(strategies);
    }
    if let Some(missing) = ids.iter().find(|id| !strategies.iter().any(|s| s.id == **id)) {
        bail!("strategy {} not found in the strategy file", missing);
    }
    Ok(strategies.into_iter().filter(|s| ids.contains(&s.id)).collect())
}

pub fn run(loaded: &LoadedTopology, strategies: &[Strategy], format: OutputFormat) -> Result<()> {
    let resolved = resolve_all(&loaded.graph, &loaded.index, strategies);
    let views: Vec<StrategyView<'_>> = resolved.iter().map(StrategyView::from).collect();

    match format {
        OutputFormat::Json => print_json(&views)?,
        OutputFormat::Text => {
            for (view, strategy) in views.iter().zip(&resolved) {
                let targets: Vec<String> = view
                    .targets
                    .iter()
                    .map(|t| format!("[{}] {}", t.ordinal, t.node))
                    .collect();
                println!("strategy {}: {} -> {}", view.id, view.start, targets.join(", "));
                print_entries(&strategy.paths);
                println!("  highlighted: {}", view.highlighted_edges.join(" "));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strategy_paths_core::{Route, SearchMode};

    fn strategy(id: StrategyId) -> Strategy {
        Strategy {
            id,
            start: "a".into(),
            targets: vec!["b".into()],
            route: Route::Waypoints(SearchMode::Exhaustive),
        }
    }

    #[test]
    fn test_select_all_when_no_ids() {
        let picked = select(vec![strategy(1), strategy(2)], &[]).unwrap();
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn test_select_keeps_descriptor_order() {
        let picked = select(vec![strategy(1), strategy(2), strategy(3)], &[3, 1]).unwrap();
        let ids: Vec<StrategyId> = picked.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_select_unknown_id() {
        let err = select(vec![strategy(1)], &[4]).unwrap_err();
        assert!(err.to_string().contains("strategy 4 not found"));
    }
}
