//! Recursive-search simulator (`find`).
//!
//! Walks every node under the start path and applies the supplied predicates
//! conjunctively: a path matches only when all of them hold. Predicates are
//! independent, so evaluation order does not matter.

use termsim_vfs::{FsNode, VirtualFs};

use crate::invocation::InvocationState;

pub fn simulate(state: &InvocationState, fs: &VirtualFs) -> String {
    let start = match state.nonempty_input("path") {
        Some(p) => fs.resolve(p),
        None => fs.cursor().to_string(),
    };
    if fs.stat(&start).is_none() {
        return format!("find: '{start}': No such file or directory");
    }

    let predicates = match Predicates::from_state(state) {
        Ok(p) => p,
        Err(message) => return message,
    };

    let matches: Vec<&str> = fs
        .walk(&start)
        .into_iter()
        .filter(|(path, node)| predicates.matches(&start, path, node, fs))
        .map(|(path, _)| path)
        .collect();

    if matches.is_empty() {
        "find: no matches found".to_string()
    } else {
        matches.join("\n")
    }
}

/// Size comparison direction: `+` strictly greater, `-` strictly less,
/// no prefix exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SizeCmp {
    Exact,
    Greater,
    Less,
}

#[derive(Debug, Default)]
struct Predicates {
    name: Option<String>,
    name_ci: bool,
    kind: Option<String>,
    empty: bool,
    user: Option<String>,
    min_depth: Option<usize>,
    max_depth: Option<usize>,
    size: Option<(SizeCmp, u64)>,
}

impl Predicates {
    /// Collect predicates from the invocation state. Malformed numeric or
    /// size arguments become inline error messages.
    fn from_state(state: &InvocationState) -> Result<Self, String> {
        let mut p = Predicates::default();
        if let Some(glob) = state.nonempty_input("name") {
            p.name = Some(glob.to_string());
        } else if let Some(glob) = state.nonempty_input("iname") {
            p.name = Some(glob.to_string());
            p.name_ci = true;
        }
        p.kind = state.nonempty_input("type").map(str::to_string);
        p.empty = state.has_flag("-empty");
        p.user = state.nonempty_input("user").map(str::to_string);
        p.min_depth = parse_depth(state, "mindepth", "-mindepth")?;
        p.max_depth = parse_depth(state, "maxdepth", "-maxdepth")?;
        if let Some(spec) = state.nonempty_input("size") {
            p.size = Some(
                parse_size_predicate(spec)
                    .ok_or_else(|| format!("find: invalid -size argument '{spec}'"))?,
            );
        }
        Ok(p)
    }

    fn matches(&self, start: &str, path: &str, node: &FsNode, fs: &VirtualFs) -> bool {
        let depth = depth_of(start, path);
        if let Some(min) = self.min_depth
            && depth < min
        {
            return false;
        }
        if let Some(max) = self.max_depth
            && depth > max
        {
            return false;
        }
        if let Some(glob) = &self.name {
            let file_name = path.rsplit('/').next().unwrap_or(path);
            if !glob_match(glob, file_name, self.name_ci) {
                return false;
            }
        }
        if let Some(kind) = &self.kind {
            let matches_kind = match kind.as_str() {
                "f" => node.is_file(),
                "d" => node.is_dir(),
                _ => false,
            };
            if !matches_kind {
                return false;
            }
        }
        if self.empty && !is_empty(path, node, fs) {
            return false;
        }
        if let Some(user) = &self.user
            && node.owner != *user
        {
            return false;
        }
        if let Some((cmp, want)) = self.size {
            let Some(actual) = node.size_bytes() else {
                return false;
            };
            let ok = match cmp {
                SizeCmp::Exact => actual == want,
                SizeCmp::Greater => actual > want,
                SizeCmp::Less => actual < want,
            };
            if !ok {
                return false;
            }
        }
        true
    }
}

fn parse_depth(
    state: &InvocationState,
    key: &str,
    flag: &str,
) -> Result<Option<usize>, String> {
    match state.nonempty_input(key) {
        Some(v) => v
            .parse::<usize>()
            .map(Some)
            .map_err(|_| format!("find: invalid {flag} argument '{v}'")),
        None => Ok(None),
    }
}

/// Depth of `path` relative to `start`: the start itself is depth 0, its
/// immediate children depth 1.
fn depth_of(start: &str, path: &str) -> usize {
    if path == start {
        return 0;
    }
    let prefix_len = if start == "/" { 1 } else { start.len() + 1 };
    path[prefix_len..].split('/').count()
}

/// A file is empty when it has no stored content; a directory when it has
/// no children.
fn is_empty(path: &str, node: &FsNode, fs: &VirtualFs) -> bool {
    if node.is_dir() {
        fs.list_children(path).is_empty()
    } else {
        node.content.as_deref().is_none_or(str::is_empty)
    }
}

/// Parse `[+-]?<number><unit>` where unit is `c` (bytes), `k`, `M`, or `G`.
fn parse_size_predicate(spec: &str) -> Option<(SizeCmp, u64)> {
    let (cmp, rest) = match spec.as_bytes().first()? {
        b'+' => (SizeCmp::Greater, &spec[1..]),
        b'-' => (SizeCmp::Less, &spec[1..]),
        _ => (SizeCmp::Exact, spec),
    };
    if rest.len() < 2 {
        return None;
    }
    let (number, unit) = rest.split_at(rest.len() - 1);
    let multiplier = match unit {
        "c" => 1u64,
        "k" => 1024,
        "M" => 1024 * 1024,
        "G" => 1024 * 1024 * 1024,
        _ => return None,
    };
    let value: u64 = number.parse().ok()?;
    Some((cmp, value * multiplier))
}

/// Glob matching with `*` (any run) and `?` (one character). Bounded
/// recursion keeps pathological patterns from blowing the stack.
fn glob_match(pattern: &str, text: &str, case_insensitive: bool) -> bool {
    let (pattern, text) = if case_insensitive {
        (pattern.to_lowercase(), text.to_lowercase())
    } else {
        (pattern.to_string(), text.to_string())
    };
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    glob_match_inner(&p, &t, 0, 0, 0)
}

const GLOB_MAX_DEPTH: usize = 256;

fn glob_match_inner(p: &[char], t: &[char], pi: usize, ti: usize, depth: usize) -> bool {
    if depth >= GLOB_MAX_DEPTH {
        return false;
    }
    if pi == p.len() {
        return ti == t.len();
    }
    if p[pi] == '*' {
        for skip in 0..=(t.len() - ti) {
            if glob_match_inner(p, t, pi + 1, ti + skip, depth + 1) {
                return true;
            }
        }
        false
    } else if ti < t.len() && (p[pi] == '?' || p[pi] == t[ti]) {
        glob_match_inner(p, t, pi + 1, ti + 1, depth + 1)
    } else {
        false
    }
}
