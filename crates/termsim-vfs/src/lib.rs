//! Scenario-keyed virtual filesystem.
//!
//! The whole file tree of the active scenario lives in a
//! `BTreeMap<String, FsNode>` whose keys are absolute paths, plus a single
//! mutable working-directory cursor. Nodes are immutable fixtures; switching
//! scenarios replaces the tree and resets the cursor.

pub mod scenario;

pub use scenario::{FsNode, NodeKind, Scenario, builtin_scenarios, parse_size};

use std::collections::BTreeMap;

use termsim_types::error::{Result, TermsimError};

/// The virtual filesystem view: a set of scenarios, one active, and the
/// working-directory cursor.
#[derive(Debug)]
pub struct VirtualFs {
    scenarios: Vec<Scenario>,
    active: usize,
    cursor: String,
}

impl VirtualFs {
    /// Create a filesystem over the built-in scenario fixtures. The first
    /// scenario becomes active.
    pub fn new() -> Result<Self> {
        Self::with_scenarios(builtin_scenarios()?)
    }

    /// Create a filesystem over a caller-supplied scenario set.
    pub fn with_scenarios(scenarios: Vec<Scenario>) -> Result<Self> {
        if scenarios.is_empty() {
            return Err(TermsimError::Scenario("no scenarios loaded".to_string()));
        }
        let cursor = scenarios[0].initial_path.clone();
        Ok(Self {
            scenarios,
            active: 0,
            cursor,
        })
    }

    /// The active scenario.
    pub fn active_scenario(&self) -> &Scenario {
        &self.scenarios[self.active]
    }

    /// All scenarios, for presentation-layer listings.
    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    /// Switch the active scenario and reset the cursor to its default path.
    pub fn switch_scenario(&mut self, id: &str) -> Result<()> {
        match self.scenarios.iter().position(|s| s.id == id) {
            Some(idx) => {
                self.active = idx;
                self.cursor = self.scenarios[idx].initial_path.clone();
                log::debug!("switched to scenario '{id}', cwd {}", self.cursor);
                Ok(())
            },
            None => Err(TermsimError::Scenario(format!("unknown scenario: {id}"))),
        }
    }

    /// The current working directory.
    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    /// Move the working directory. The caller is responsible for validating
    /// that the target exists and is a directory.
    pub fn set_cursor(&mut self, path: impl Into<String>) {
        self.cursor = path.into();
    }

    /// Resolve a user-supplied path against the cursor.
    ///
    /// Absolute inputs are returned as-is; relative inputs are joined to the
    /// cursor with a single separator. No `.`/`..` segment handling is
    /// performed: callers supply already-meaningful paths.
    pub fn resolve(&self, input: &str) -> String {
        resolve_against(input, &self.cursor)
    }

    /// Look up a node in the active scenario.
    pub fn stat(&self, path: &str) -> Option<&FsNode> {
        self.active_scenario().nodes.get(path)
    }

    /// Immediate child names of a directory, in lexicographic order.
    /// Returns empty for files and for paths with no children.
    pub fn list_children(&self, path: &str) -> Vec<String> {
        let prefix = if path == "/" {
            "/".to_string()
        } else {
            format!("{path}/")
        };
        let mut children = Vec::new();
        // BTreeMap range scan: keys sharing the prefix are contiguous.
        for key in self.active_scenario().nodes.range(prefix.clone()..).map(|(k, _)| k) {
            if !key.starts_with(&prefix) {
                break;
            }
            let rest = &key[prefix.len()..];
            if !rest.is_empty() && !rest.contains('/') {
                children.push(rest.to_string());
            }
        }
        children
    }

    /// All (path, node) pairs under a start path, the start itself included.
    /// Used by the recursive-search simulator.
    pub fn walk<'a>(&'a self, start: &'a str) -> Vec<(&'a str, &'a FsNode)> {
        let nodes = &self.active_scenario().nodes;
        let prefix = if start == "/" {
            "/".to_string()
        } else {
            format!("{start}/")
        };
        let mut out = Vec::new();
        if let Some(node) = nodes.get(start) {
            out.push((start, node));
        }
        for (key, node) in nodes.range(prefix.clone()..) {
            if !key.starts_with(&prefix) {
                break;
            }
            // The root start is its own prefix; skip the duplicate.
            if key.as_str() == start {
                continue;
            }
            out.push((key.as_str(), node));
        }
        out
    }
}

/// Join a possibly-relative path to a cursor directory.
pub fn resolve_against(input: &str, cursor: &str) -> String {
    if input.starts_with('/') {
        input.to_string()
    } else if cursor == "/" {
        format!("/{input}")
    } else {
        format!("{cursor}/{input}")
    }
}
