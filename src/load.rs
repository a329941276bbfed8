//! Text-format graph loading and label interning.
//!
//! Input format: one ignorable header line, then `v <index> <label>` lines
//! with strictly increasing contiguous indices from 0, then
//! `e <from> <to> <label>` lines. Label tokens are arbitrary strings,
//! interned to dense ids in first-seen order; the inverse dictionary is kept
//! for rendering. Any malformed line aborts the load — no partial graph is
//! ever returned.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::info;

use crate::error::{GrafitoError, Result};
use crate::graph::GraphStore;
use crate::index::{GraphStats, TargetIndex};
use crate::types::{Direction, EdgeLabelId, LabelId, VertexId};

/// String-to-dense-id interner with its inverse, first-seen order.
#[derive(Debug, Default, Clone)]
pub struct LabelDict {
    ids: FxHashMap<String, u32>,
    names: Vec<String>,
}

impl LabelDict {
    /// Interns `token`, returning its dense id.
    pub fn intern(&mut self, token: &str) -> u32 {
        if let Some(&id) = self.ids.get(token) {
            return id;
        }
        let id = self.names.len() as u32;
        self.ids.insert(token.to_owned(), id);
        self.names.push(token.to_owned());
        id
    }

    /// Resolves a dense id back to its token.
    pub fn resolve(&self, id: u32) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    /// Dense id of `token`, if interned.
    pub fn lookup(&self, token: &str) -> Option<u32> {
        self.ids.get(token).copied()
    }

    /// Number of interned tokens.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A fully loaded target graph: the index plus both dictionaries.
#[derive(Debug)]
pub struct LoadedGraph {
    /// Index over the loaded graph; no threshold applied yet.
    pub index: TargetIndex,
    /// Vertex label dictionary.
    pub vertex_labels: LabelDict,
    /// Edge label dictionary.
    pub edge_labels: LabelDict,
}

/// Loads a graph file from disk.
pub fn load_path(path: impl AsRef<Path>) -> Result<LoadedGraph> {
    let text = fs::read_to_string(path.as_ref())?;
    let loaded = load_str(&text)?;
    info!(
        path = %path.as_ref().display(),
        vertices = loaded.index.store().vertex_count(),
        edges = loaded.index.store().edge_count(),
        "graph loaded"
    );
    Ok(loaded)
}

/// Parses graph text. See the module docs for the format.
pub fn load_str(text: &str) -> Result<LoadedGraph> {
    let mut store = GraphStore::new();
    let mut stats = GraphStats::new();
    let mut vertex_labels = LabelDict::default();
    let mut edge_labels = LabelDict::default();
    let mut vertices: Vec<(VertexId, LabelId)> = Vec::new();
    let mut seen_edges = false;

    // Line 1 is a header and carries no records.
    for (line_no, line) in text.lines().enumerate().skip(1) {
        let line_no = line_no + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut parts = trimmed.split_whitespace();
        match parts.next() {
            Some("v") => {
                if seen_edges {
                    return Err(GrafitoError::parse(
                        line_no,
                        "vertex line after the first edge line",
                    ));
                }
                let index = parse_number(parts.next(), line_no, "vertex index")?;
                let token = parts
                    .next()
                    .ok_or_else(|| GrafitoError::parse(line_no, "missing vertex label"))?;
                if index != vertices.len() {
                    return Err(GrafitoError::parse(
                        line_no,
                        format!(
                            "vertex list is not sorted: expected index {}, found {index}",
                            vertices.len()
                        ),
                    ));
                }
                let label = LabelId(vertex_labels.intern(token));
                let vertex = store.add_vertex(label);
                stats.record_vertex(vertex, label);
                vertices.push((vertex, label));
            }
            Some("e") => {
                seen_edges = true;
                let from = parse_number(parts.next(), line_no, "edge source")?;
                let to = parse_number(parts.next(), line_no, "edge target")?;
                let token = parts
                    .next()
                    .ok_or_else(|| GrafitoError::parse(line_no, "missing edge label"))?;
                let (source, source_label) = *vertices.get(from).ok_or_else(|| {
                    GrafitoError::parse(line_no, format!("edge source {from} out of range"))
                })?;
                let (target, target_label) = *vertices.get(to).ok_or_else(|| {
                    GrafitoError::parse(line_no, format!("edge target {to} out of range"))
                })?;
                let label = EdgeLabelId(edge_labels.intern(token));
                store.add_edge(source, target, label, Direction::Forward);
                stats.record_edge(source, source_label, target, target_label, label);
            }
            Some(other) => {
                return Err(GrafitoError::parse(
                    line_no,
                    format!("unrecognized record '{other}'"),
                ));
            }
            None => unreachable!("non-empty line has a first token"),
        }
    }

    Ok(LoadedGraph {
        index: TargetIndex::new(store, stats),
        vertex_labels,
        edge_labels,
    })
}

fn parse_number(token: Option<&str>, line_no: usize, what: &str) -> Result<usize> {
    let token = token.ok_or_else(|| GrafitoError::parse(line_no, format!("missing {what}")))?;
    token
        .parse::<usize>()
        .map_err(|_| GrafitoError::parse(line_no, format!("{what} '{token}' is not a number")))
}
