//! Graph snapshots that can be recorded into the debug archive.

use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Anything that can render its current state on demand, once as raw bytes
/// and once in DOT graph format.
pub trait GraphSnapshot {
    /// Identifier used in the entry file names.
    fn name(&self) -> &str;

    fn raw_bytes(&self) -> Vec<u8>;

    fn dot_bytes(&self) -> Vec<u8>;
}

/// A small directed graph that also keeps a textual log of how it was built.
///
/// The raw form is the log; the DOT form lists vertices and edges in sorted
/// order so the same graph always renders to the same bytes.
#[derive(Debug, Clone, Default)]
pub struct DebugGraph {
    name: String,
    log: String,
    vertices: BTreeSet<String>,
    edges: BTreeSet<(String, String)>,
}

impl DebugGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_vertex(&mut self, vertex: impl Into<String>) {
        let vertex = vertex.into();
        let _ = writeln!(self.log, "add vertex {vertex}");
        self.vertices.insert(vertex);
    }

    /// Adds the edge and both endpoints.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let (from, to) = (from.into(), to.into());
        let _ = writeln!(self.log, "add edge {from} -> {to}");
        self.vertices.insert(from.clone());
        self.vertices.insert(to.clone());
        self.edges.insert((from, to));
    }

    /// Append a free-form line to the raw log.
    pub fn log(&mut self, line: impl AsRef<str>) {
        self.log.push_str(line.as_ref());
        self.log.push('\n');
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl GraphSnapshot for DebugGraph {
    fn name(&self) -> &str {
        &self.name
    }

    fn raw_bytes(&self) -> Vec<u8> {
        self.log.as_bytes().to_vec()
    }

    fn dot_bytes(&self) -> Vec<u8> {
        let mut out = String::from("digraph {\n\tcompound = \"true\"\n\tnewrank = \"true\"\n");
        let _ = writeln!(out, "\tsubgraph \"root\" {{");
        for vertex in &self.vertices {
            let _ = writeln!(out, "\t\t{} [label = {}]", quote(vertex), quote(vertex));
        }
        for (from, to) in &self.edges {
            let _ = writeln!(out, "\t\t{} -> {}", quote(from), quote(to));
        }
        out.push_str("\t}\n}\n");
        out.into_bytes()
    }
}

fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}
