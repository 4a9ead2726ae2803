//! Stage DAG building and topological sorting
//!
//! The task compiler never keeps a graph object around: each task
//! re-derives its dependencies from its own serialized subtree. `StageDag`
//! materializes that implicit graph on demand so planners can validate
//! stage uniqueness and obtain a dependency-first execution order.

use crate::error::{CoreError, CoreResult};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// A directed acyclic graph of stage dependencies, keyed by stage index
#[derive(Debug)]
pub struct StageDag {
    /// The underlying graph; edges point from dependency to dependent
    graph: DiGraph<u32, ()>,

    /// Map from stage index to node index
    node_map: HashMap<u32, NodeIndex>,
}

impl StageDag {
    /// Create a new empty DAG
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Add a stage. Stage indices must be unique across the DAG.
    pub fn add_stage(&mut self, stage: u32) -> CoreResult<NodeIndex> {
        if self.node_map.contains_key(&stage) {
            return Err(CoreError::DuplicateStage { stage });
        }
        let idx = self.graph.add_node(stage);
        self.node_map.insert(stage, idx);
        Ok(idx)
    }

    /// Add a dependency edge (`stage` depends on `dependency`)
    pub fn add_dependency(&mut self, stage: u32, dependency: u32) -> CoreResult<()> {
        let (Some(&from), Some(&to)) = (self.node_map.get(&stage), self.node_map.get(&dependency))
        else {
            return Err(CoreError::UnknownStage { stage, dependency });
        };
        // Edge goes from dependency to dependent so toposort yields
        // dependencies first
        self.graph.add_edge(to, from, ());
        Ok(())
    }

    /// Build the DAG from `(stage, dependencies)` pairs
    pub fn build(stages: &[(u32, Vec<u32>)]) -> CoreResult<Self> {
        let mut dag = Self::new();

        for (stage, _) in stages {
            dag.add_stage(*stage)?;
        }

        for (stage, deps) in stages {
            for dep in deps {
                dag.add_dependency(*stage, *dep)?;
            }
        }

        dag.validate()?;

        Ok(dag)
    }

    /// Validate the DAG has no cycles
    pub fn validate(&self) -> CoreResult<()> {
        self.execution_order().map(|_| ())
    }

    /// Find a cycle path starting from a node for error reporting
    fn find_cycle_path(&self, start: NodeIndex) -> String {
        let mut path: Vec<String> = vec![self.graph[start].to_string()];
        let mut current = start;
        let mut visited = HashSet::new();
        visited.insert(current);

        while let Some(edge) = self.graph.edges(current).next() {
            let target = edge.target();
            path.push(self.graph[target].to_string());

            if target == start || visited.contains(&target) {
                break;
            }

            visited.insert(target);
            current = target;
        }

        path.join(" -> ")
    }

    /// Stages in execution order (dependencies first)
    pub fn execution_order(&self) -> CoreResult<Vec<u32>> {
        match toposort(&self.graph, None) {
            Ok(indices) => Ok(indices.into_iter().map(|idx| self.graph[idx]).collect()),
            Err(cycle) => {
                let cycle_str = self.find_cycle_path(cycle.node_id());
                Err(CoreError::CircularDependency { cycle: cycle_str })
            }
        }
    }

    /// Direct dependencies of a stage, sorted
    pub fn dependencies(&self, stage: u32) -> Vec<u32> {
        self.neighbors(stage, petgraph::Direction::Incoming)
    }

    /// Direct dependents of a stage, sorted
    pub fn dependents(&self, stage: u32) -> Vec<u32> {
        self.neighbors(stage, petgraph::Direction::Outgoing)
    }

    fn neighbors(&self, stage: u32, direction: petgraph::Direction) -> Vec<u32> {
        let Some(&idx) = self.node_map.get(&stage) else {
            return Vec::new();
        };
        let mut out: Vec<u32> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| match direction {
                petgraph::Direction::Incoming => self.graph[e.source()],
                petgraph::Direction::Outgoing => self.graph[e.target()],
            })
            .collect();
        out.sort_unstable();
        out
    }

    /// Stages with no dependencies (base dataset loads)
    pub fn leaves(&self) -> Vec<u32> {
        let mut out: Vec<u32> = self
            .node_map
            .keys()
            .copied()
            .filter(|s| self.dependencies(*s).is_empty())
            .collect();
        out.sort_unstable();
        out
    }

    /// Check if a stage exists in the DAG
    pub fn contains(&self, stage: u32) -> bool {
        self.node_map.contains_key(&stage)
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// True if the DAG has no stages
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }
}

impl Default for StageDag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "dag_test.rs"]
mod tests;
