//! Scenario fixtures: named virtual filesystem snapshots.
//!
//! A scenario bundles an immutable map of absolute paths to filesystem nodes
//! with a default working directory. Scenarios are declared as TOML documents
//! embedded in the crate and deserialized at startup.

use std::collections::BTreeMap;

use serde::Deserialize;
use termsim_types::error::{Result, TermsimError};

/// Whether a node is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// One entry in a scenario's filesystem snapshot.
///
/// Metadata fields are display strings, not parsed values: the simulator
/// renders them as-is in long listings. `size` may be a plain byte count
/// (`"4096"`) or carry a unit suffix (`"12K"`); `size_bytes` parses both.
#[derive(Debug, Clone, Deserialize)]
pub struct FsNode {
    pub kind: NodeKind,
    pub permissions: String,
    pub owner: String,
    pub group: String,
    pub size: String,
    pub modified: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl FsNode {
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// True when the owner-execute bit is set in the permission string
    /// (`-rwxr-xr-x` style, position 3).
    pub fn is_executable(&self) -> bool {
        self.permissions.as_bytes().get(3) == Some(&b'x')
    }

    /// Parse the size string into bytes. Accepts a bare number or a
    /// `K`/`M`/`G` suffix. Returns `None` for unparseable strings.
    pub fn size_bytes(&self) -> Option<u64> {
        parse_size(&self.size)
    }
}

/// Parse a size string (`"4096"`, `"12K"`, `"1.5M"`, `"2G"`) into bytes.
pub fn parse_size(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let (num_part, multiplier) = match s.as_bytes()[s.len() - 1] {
        b'K' | b'k' => (&s[..s.len() - 1], 1024u64),
        b'M' => (&s[..s.len() - 1], 1024 * 1024),
        b'G' => (&s[..s.len() - 1], 1024 * 1024 * 1024),
        b'B' => (&s[..s.len() - 1], 1),
        _ => (s, 1),
    };
    let value: f64 = num_part.parse().ok()?;
    if value < 0.0 {
        return None;
    }
    Some((value * multiplier as f64) as u64)
}

/// A named, self-contained filesystem fixture.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub description: String,
    pub initial_path: String,
    pub nodes: BTreeMap<String, FsNode>,
}

impl Scenario {
    /// Parse a scenario from TOML and validate its invariants: every node
    /// key absolute, the root present, and the initial path resolvable to a
    /// directory node.
    pub fn from_toml(source: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(source)?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<()> {
        for key in self.nodes.keys() {
            if !key.starts_with('/') {
                return Err(TermsimError::Scenario(format!(
                    "scenario '{}': node path is not absolute: {key}",
                    self.id
                )));
            }
        }
        if !self.nodes.contains_key("/") {
            return Err(TermsimError::Scenario(format!(
                "scenario '{}': missing root directory",
                self.id
            )));
        }
        match self.nodes.get(&self.initial_path) {
            Some(node) if node.is_dir() => Ok(()),
            Some(_) => Err(TermsimError::Scenario(format!(
                "scenario '{}': initial path is not a directory: {}",
                self.id, self.initial_path
            ))),
            None => Err(TermsimError::Scenario(format!(
                "scenario '{}': initial path not in node map: {}",
                self.id, self.initial_path
            ))),
        }
    }
}

/// Load the scenarios shipped with the crate.
pub fn builtin_scenarios() -> Result<Vec<Scenario>> {
    Ok(vec![
        Scenario::from_toml(include_str!("../fixtures/webapp.toml"))?,
        Scenario::from_toml(include_str!("../fixtures/sysadmin.toml"))?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_scenarios_load() {
        let scenarios = builtin_scenarios().unwrap();
        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].id, "webapp");
        assert_eq!(scenarios[1].id, "sysadmin");
    }

    #[test]
    fn webapp_contains_index_html() {
        let scenarios = builtin_scenarios().unwrap();
        let webapp = &scenarios[0];
        let node = webapp
            .nodes
            .get("/home/user/projects/webapp/index.html")
            .unwrap();
        assert!(node.is_file());
        assert!(node.content.is_some());
    }

    #[test]
    fn relative_node_key_rejected() {
        let bad = r#"
id = "broken"
description = "bad fixture"
initial_path = "/"

[nodes."/"]
kind = "directory"
permissions = "drwxr-xr-x"
owner = "root"
group = "root"
size = "4096"
modified = "Jan  1 00:00"

[nodes."home"]
kind = "directory"
permissions = "drwxr-xr-x"
owner = "root"
group = "root"
size = "4096"
modified = "Jan  1 00:00"
"#;
        assert!(Scenario::from_toml(bad).is_err());
    }

    #[test]
    fn initial_path_must_be_directory() {
        let bad = r#"
id = "broken"
description = "bad fixture"
initial_path = "/notes.txt"

[nodes."/"]
kind = "directory"
permissions = "drwxr-xr-x"
owner = "root"
group = "root"
size = "4096"
modified = "Jan  1 00:00"

[nodes."/notes.txt"]
kind = "file"
permissions = "-rw-r--r--"
owner = "user"
group = "user"
size = "120"
modified = "Jan  1 00:00"
"#;
        assert!(Scenario::from_toml(bad).is_err());
    }

    #[test]
    fn parse_size_forms() {
        assert_eq!(parse_size("4096"), Some(4096));
        assert_eq!(parse_size("4K"), Some(4096));
        assert_eq!(parse_size("1.5K"), Some(1536));
        assert_eq!(parse_size("2M"), Some(2 * 1024 * 1024));
        assert_eq!(parse_size("1G"), Some(1024 * 1024 * 1024));
        assert_eq!(parse_size("0"), Some(0));
        assert_eq!(parse_size("512B"), Some(512));
        assert_eq!(parse_size("garbage"), None);
        assert_eq!(parse_size(""), None);
    }

    #[test]
    fn executable_bit_detection() {
        let scenarios = builtin_scenarios().unwrap();
        let webapp = &scenarios[0];
        let script = webapp
            .nodes
            .get("/home/user/projects/webapp/build.sh")
            .unwrap();
        assert!(script.is_executable());
        let page = webapp
            .nodes
            .get("/home/user/projects/webapp/index.html")
            .unwrap();
        assert!(!page.is_executable());
    }
}
