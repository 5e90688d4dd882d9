//! Directory-listing simulator (`ls`).

use termsim_vfs::{FsNode, VirtualFs};

use crate::invocation::InvocationState;

pub fn simulate(state: &InvocationState, fs: &VirtualFs) -> String {
    let operand = state.nonempty_input("path");
    let target = match operand {
        Some(p) => fs.resolve(p),
        None => fs.cursor().to_string(),
    };

    let Some(node) = fs.stat(&target) else {
        let shown = operand.unwrap_or(target.as_str());
        return format!("ls: cannot access '{shown}': No such file or directory");
    };

    if node.is_file() {
        let shown = operand.unwrap_or(target.as_str());
        return if state.has_flag("-l") {
            long_line(state, &target, node, shown)
        } else {
            decorate(state, &target, node, shown)
        };
    }

    let mut names: Vec<String> = fs
        .list_children(&target)
        .into_iter()
        .filter(|name| state.has_flag("-a") || !name.starts_with('.'))
        .collect();
    names.sort();
    if state.has_flag("-r") {
        names.reverse();
    }
    if names.is_empty() {
        return String::new();
    }

    if state.has_flag("-l") {
        let lines: Vec<String> = names
            .iter()
            .map(|name| {
                let child = child_path(&target, name);
                match fs.stat(&child) {
                    Some(n) => long_line(state, &child, n, name),
                    None => name.clone(),
                }
            })
            .collect();
        lines.join("\n")
    } else {
        let entries: Vec<String> = names
            .iter()
            .map(|name| {
                let child = child_path(&target, name);
                match fs.stat(&child) {
                    Some(n) => decorate(state, &child, n, name),
                    None => name.clone(),
                }
            })
            .collect();
        entries.join("  ")
    }
}

fn child_path(dir: &str, name: &str) -> String {
    if dir == "/" {
        format!("/{name}")
    } else {
        format!("{dir}/{name}")
    }
}

/// Short-form entry: optional inode prefix, optional type indicator suffix.
fn decorate(state: &InvocationState, path: &str, node: &FsNode, name: &str) -> String {
    let mut out = String::new();
    if state.has_flag("-i") {
        out.push_str(&format!("{} ", inode_for(path)));
    }
    out.push_str(name);
    if state.has_flag("-F") {
        out.push_str(classify_suffix(node));
    }
    out
}

/// Long-form metadata line: permissions, owner, group, size, timestamp, name.
fn long_line(state: &InvocationState, path: &str, node: &FsNode, name: &str) -> String {
    let size = if state.has_flag("-h") {
        match node.size_bytes() {
            Some(bytes) => human_size(bytes),
            None => node.size.clone(),
        }
    } else {
        node.size.clone()
    };
    let suffix = if state.has_flag("-F") {
        classify_suffix(node)
    } else {
        ""
    };
    let mut out = String::new();
    if state.has_flag("-i") {
        out.push_str(&format!("{:>7} ", inode_for(path)));
    }
    out.push_str(&format!(
        "{} {:<8} {:<8} {:>8} {} {name}{suffix}",
        node.permissions, node.owner, node.group, size, node.modified
    ));
    out
}

fn classify_suffix(node: &FsNode) -> &'static str {
    if node.is_dir() {
        "/"
    } else if node.is_executable() {
        "*"
    } else {
        ""
    }
}

/// Synthetic but stable inode number, derived from the path (FNV-1a).
fn inode_for(path: &str) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for b in path.bytes() {
        h ^= u64::from(b);
        h = h.wrapping_mul(0x0100_0000_01b3);
    }
    100_000 + h % 900_000
}

fn human_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes}")
    } else if bytes < 1024 * 1024 {
        format!("{:.1}K", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1}M", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1}G", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
