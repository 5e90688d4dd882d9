//! Text-search simulator (`grep`).
//!
//! Matches against canned line-sets keyed by well-known sample paths, with a
//! small generic sample for anything else. The canned sets mirror the
//! scenario fixtures so that `cat` and `grep` tell a consistent story.

use termsim_vfs::VirtualFs;

use crate::invocation::InvocationState;

/// Canned sample content, keyed by absolute path.
const SAMPLES: [(&str, &[&str]); 5] = [
    (
        "/var/log/syslog",
        &[
            "Mar 15 06:25:01 web-01 CRON[2114]: (root) CMD (logrotate /etc/logrotate.conf)",
            "Mar 15 06:25:03 web-01 systemd[1]: Started Daily apt upgrade and clean activities.",
            "Mar 15 06:25:17 web-01 kernel: [12034.551] eth0: link up, 1000Mbps, full-duplex",
            "Mar 15 06:26:02 web-01 nginx[988]: reloading configuration",
            "Mar 15 06:26:40 web-01 sshd[2201]: Accepted publickey for admin from 10.0.0.12",
        ],
    ),
    (
        "/var/log/auth.log",
        &[
            "Mar 15 06:10:11 web-01 sshd[2150]: Failed password for invalid user test from 203.0.113.7",
            "Mar 15 06:10:15 web-01 sshd[2150]: Connection closed by invalid user test 203.0.113.7",
            "Mar 15 06:26:40 web-01 sshd[2201]: Accepted publickey for admin from 10.0.0.12",
            "Mar 15 06:26:40 web-01 sshd[2201]: pam_unix(sshd:session): session opened for user admin",
        ],
    ),
    (
        "/etc/passwd",
        &[
            "root:x:0:0:root:/root:/bin/bash",
            "daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin",
            "www-data:x:33:33:www-data:/var/www:/usr/sbin/nologin",
            "sshd:x:105:65534::/run/sshd:/usr/sbin/nologin",
            "admin:x:1000:1000:admin:/home/admin:/bin/bash",
        ],
    ),
    (
        "/home/user/projects/webapp/app.js",
        &[
            "import { fetchUsers } from './src/api.js';",
            "",
            "async function main() {",
            "  const users = await fetchUsers();",
            "  console.log('loaded', users.length, 'users');",
            "}",
            "",
            "main();",
        ],
    ),
    (
        "/home/user/notes.txt",
        &[
            "TODO: deploy the webapp to staging",
            "TODO: ask ops about the firewall rules",
        ],
    ),
];

/// Fallback lines for paths with no canned sample.
const GENERIC_SAMPLE: [&str; 5] = [
    "The quick brown fox jumps over the lazy dog",
    "Pack my box with five dozen liquor jugs",
    "How vexingly quick daft zebras jump",
    "Sphinx of black quartz, judge my vow",
    "The five boxing wizards jump quickly",
];

pub fn simulate(state: &InvocationState, fs: &VirtualFs) -> String {
    let Some(pattern) = state.nonempty_input("pattern") else {
        return "grep: missing search pattern".to_string();
    };

    let operand = state.nonempty_input("path");
    let lines: &[&str] = match operand {
        Some(p) => {
            let resolved = fs.resolve(p);
            SAMPLES
                .iter()
                .find(|(path, _)| *path == resolved)
                .map(|(_, lines)| *lines)
                .unwrap_or(&GENERIC_SAMPLE)
        },
        None => &GENERIC_SAMPLE,
    };

    let ignore_case = state.has_flag("-i");
    let word_match = state.has_flag("-w");
    let invert = state.has_flag("-v");

    let mut matches: Vec<(usize, &str)> = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let found = if word_match {
            matches_word(line, pattern, ignore_case)
        } else {
            matches_substring(line, pattern, ignore_case)
        };
        if found != invert {
            matches.push((i + 1, line));
        }
    }

    if state.has_flag("-c") {
        return matches.len().to_string();
    }
    if state.has_flag("-l") {
        return if matches.is_empty() {
            "(no matches)".to_string()
        } else {
            operand.unwrap_or("(standard input)").to_string()
        };
    }
    if matches.is_empty() {
        return "(no matches)".to_string();
    }
    let rendered: Vec<String> = matches
        .iter()
        .map(|(num, line)| {
            if state.has_flag("-n") {
                format!("{num}:{line}")
            } else {
                (*line).to_string()
            }
        })
        .collect();
    rendered.join("\n")
}

fn matches_substring(line: &str, pattern: &str, ignore_case: bool) -> bool {
    if ignore_case {
        line.to_lowercase().contains(&pattern.to_lowercase())
    } else {
        line.contains(pattern)
    }
}

/// Whole-word match: the pattern occurs with non-word characters (or the
/// line boundary) on both sides.
fn matches_word(line: &str, pattern: &str, ignore_case: bool) -> bool {
    let (hay, needle) = if ignore_case {
        (line.to_lowercase(), pattern.to_lowercase())
    } else {
        (line.to_string(), pattern.to_string())
    };
    if needle.is_empty() {
        return false;
    }
    let mut search_from = 0;
    while let Some(pos) = hay[search_from..].find(&needle) {
        let start = search_from + pos;
        let end = start + needle.len();
        let left_ok = start == 0 || !is_word_char(hay[..start].chars().next_back());
        let right_ok = end == hay.len() || !is_word_char(hay[end..].chars().next());
        if left_ok && right_ok {
            return true;
        }
        search_from = start + 1;
    }
    false
}

fn is_word_char(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fs() -> VirtualFs {
        VirtualFs::new().unwrap()
    }

    fn state_with(pattern: &str, path: Option<&str>) -> InvocationState {
        let mut s = InvocationState::default();
        s.set_input("pattern", pattern);
        if let Some(p) = path {
            s.set_input("path", p);
        }
        s
    }

    #[test]
    fn missing_pattern_message() {
        let s = InvocationState::default();
        assert_eq!(simulate(&s, &fs()), "grep: missing search pattern");
    }

    #[test]
    fn substring_match_over_canned_sample() {
        let s = state_with("sshd", Some("/var/log/auth.log"));
        let out = simulate(&s, &fs());
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn case_insensitive_flag() {
        let mut s = state_with("TODO", Some("/home/user/notes.txt"));
        let strict = simulate(&s, &fs());
        assert_eq!(strict.lines().count(), 2);

        s = state_with("todo", Some("/home/user/notes.txt"));
        assert_eq!(simulate(&s, &fs()), "(no matches)");
        s.toggle_flag("-i");
        assert_eq!(simulate(&s, &fs()).lines().count(), 2);
    }

    #[test]
    fn word_match_rejects_partial_words() {
        // "user" appears inside "users" in app.js; -w only accepts the
        // whole word (the import path segment and the log call both contain
        // "users", not "user").
        let mut s = state_with("users", Some("/home/user/projects/webapp/app.js"));
        s.toggle_flag("-w");
        let out = simulate(&s, &fs());
        assert_eq!(out.lines().count(), 2);

        let mut s = state_with("user", Some("/home/user/projects/webapp/app.js"));
        s.toggle_flag("-w");
        assert_eq!(simulate(&s, &fs()), "(no matches)");
    }

    #[test]
    fn invert_returns_complement() {
        let s = state_with("sshd", Some("/var/log/syslog"));
        let normal = simulate(&s, &fs());
        let mut inverted_state = state_with("sshd", Some("/var/log/syslog"));
        inverted_state.toggle_flag("-v");
        let inverted = simulate(&inverted_state, &fs());
        let total = SAMPLES
            .iter()
            .find(|(p, _)| *p == "/var/log/syslog")
            .unwrap()
            .1
            .len();
        assert_eq!(
            normal.lines().count() + inverted.lines().count(),
            total
        );
        for line in normal.lines() {
            assert!(!inverted.contains(line));
        }
    }

    #[test]
    fn count_only_returns_number() {
        let mut s = state_with("root", Some("/etc/passwd"));
        s.toggle_flag("-c");
        assert_eq!(simulate(&s, &fs()), "1");
    }

    #[test]
    fn files_with_matches_returns_operand() {
        let mut s = state_with("root", Some("/etc/passwd"));
        s.toggle_flag("-l");
        assert_eq!(simulate(&s, &fs()), "/etc/passwd");
    }

    #[test]
    fn line_numbers_are_one_based() {
        let mut s = state_with("Accepted", Some("/var/log/syslog"));
        s.toggle_flag("-n");
        let out = simulate(&s, &fs());
        assert!(out.starts_with("5:"));
    }

    #[test]
    fn unknown_path_falls_back_to_generic_sample() {
        let s = state_with("zebras", Some("/no/such/file.txt"));
        let out = simulate(&s, &fs());
        assert_eq!(out, "How vexingly quick daft zebras jump");
    }

    #[test]
    fn relative_path_resolves_against_cursor() {
        // Cursor starts at /home/user/projects/webapp, so "app.js" hits the
        // canned sample for the absolute path.
        let s = state_with("fetchUsers", Some("app.js"));
        let out = simulate(&s, &fs());
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn no_match_message() {
        let s = state_with("kubernetes", Some("/etc/passwd"));
        assert_eq!(simulate(&s, &fs()), "(no matches)");
    }
}
