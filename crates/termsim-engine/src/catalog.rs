//! The built-in command catalog.
//!
//! Declarative definitions for every simulated command. The catalog is
//! loaded once and read-only afterwards; duplicate registrations by id
//! resolve to "last wins" at load time.

use termsim_types::error::{Result, TermsimError};
use termsim_types::schema::{CommandDefinition, ParameterOption};

/// The static catalog of command definitions.
#[derive(Debug)]
pub struct CommandCatalog {
    commands: Vec<CommandDefinition>,
}

impl CommandCatalog {
    /// A catalog with the built-in command set.
    pub fn new() -> Self {
        Self::with_definitions(builtin_definitions())
    }

    /// Build a catalog from explicit definitions, de-duplicating by command
    /// id. A later definition replaces an earlier one with the same id.
    pub fn with_definitions(defs: Vec<CommandDefinition>) -> Self {
        let mut commands: Vec<CommandDefinition> = Vec::with_capacity(defs.len());
        for def in defs {
            if let Some(existing) = commands.iter_mut().find(|d| d.id == def.id) {
                log::debug!("catalog: replacing duplicate definition for '{}'", def.id);
                *existing = def;
            } else {
                commands.push(def);
            }
        }
        Self { commands }
    }

    /// Look up a command by id.
    pub fn lookup(&self, name: &str) -> Result<&CommandDefinition> {
        self.commands
            .iter()
            .find(|d| d.id == name)
            .ok_or_else(|| TermsimError::Schema(format!("unknown command: {name}")))
    }

    /// All definitions, in registration order.
    pub fn commands(&self) -> &[CommandDefinition] {
        &self.commands
    }
}

impl Default for CommandCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in command set.
fn builtin_definitions() -> Vec<CommandDefinition> {
    vec![
        ls_definition(),
        cd_definition(),
        pwd_definition(),
        cat_definition(),
        find_definition(),
        grep_definition(),
        ping_definition(),
        ps_definition(),
        top_definition(),
        iptables_definition(),
    ]
}

fn ls_definition() -> CommandDefinition {
    CommandDefinition {
        id: "ls",
        name: "ls",
        description: "List directory contents",
        usage: "ls [-l] [-a] [-h] [-r] [-i] [-F] [path]",
        options: vec![
            ParameterOption::boolean("-l", "long", "long listing format").in_group("format"),
            ParameterOption::boolean("-a", "all", "do not hide dotfiles").in_group("filtering"),
            ParameterOption::boolean("-h", "human", "human-readable sizes").in_group("format"),
            ParameterOption::boolean("-r", "reverse", "reverse sort order").in_group("sorting"),
            ParameterOption::boolean("-i", "inode", "print inode numbers").in_group("format"),
            ParameterOption::boolean("-F", "classify", "append type indicators").in_group("format"),
            ParameterOption::input("", "path", "target path"),
        ],
    }
}

fn cd_definition() -> CommandDefinition {
    CommandDefinition {
        id: "cd",
        name: "cd",
        description: "Change the working directory",
        usage: "cd <path>",
        options: vec![ParameterOption::input("", "path", "target directory").required()],
    }
}

fn pwd_definition() -> CommandDefinition {
    CommandDefinition {
        id: "pwd",
        name: "pwd",
        description: "Print the working directory",
        usage: "pwd",
        options: Vec::new(),
    }
}

fn cat_definition() -> CommandDefinition {
    CommandDefinition {
        id: "cat",
        name: "cat",
        description: "Display file contents",
        usage: "cat <file>",
        options: vec![ParameterOption::input("", "path", "file to display").required()],
    }
}

fn find_definition() -> CommandDefinition {
    CommandDefinition {
        id: "find",
        name: "find",
        description: "Search for files and directories",
        usage: "find [path] [-name pattern] [-type f|d] [-empty] [-user name] \
                [-mindepth n] [-maxdepth n] [-size [+-]n[ckMG]]",
        options: vec![
            ParameterOption::boolean("-empty", "empty", "match empty files and directories")
                .in_group("tests"),
            ParameterOption::select("-type", "type", "entry type", &["f", "d"]).in_group("tests"),
            ParameterOption::number("-mindepth", "mindepth", "minimum depth").in_group("depth"),
            ParameterOption::number("-maxdepth", "maxdepth", "maximum depth").in_group("depth"),
            ParameterOption::input("-name", "name", "name glob (case-sensitive)")
                .in_group("tests"),
            ParameterOption::input("-iname", "iname", "name glob (case-insensitive)")
                .in_group("tests"),
            ParameterOption::input("-user", "user", "owning user").in_group("tests"),
            ParameterOption::input("-size", "size", "size predicate, e.g. +10k")
                .in_group("tests"),
            ParameterOption::input("", "path", "start path"),
        ],
    }
}

fn grep_definition() -> CommandDefinition {
    CommandDefinition {
        id: "grep",
        name: "grep",
        description: "Search file contents for a pattern",
        usage: "grep [-i] [-w] [-v] [-c] [-l] [-n] <pattern> [file]",
        options: vec![
            ParameterOption::boolean("-i", "ignoreCase", "ignore case").in_group("matching"),
            ParameterOption::boolean("-w", "wordMatch", "match whole words").in_group("matching"),
            ParameterOption::boolean("-v", "invert", "invert the match").in_group("matching"),
            ParameterOption::boolean("-c", "count", "print only a match count").in_group("output"),
            ParameterOption::boolean("-l", "filesWithMatches", "print only the file name")
                .in_group("output"),
            ParameterOption::boolean("-n", "lineNumbers", "prefix line numbers")
                .in_group("output"),
            ParameterOption::input("", "pattern", "search pattern").required(),
            ParameterOption::input("", "path", "file to search"),
        ],
    }
}

fn ping_definition() -> CommandDefinition {
    CommandDefinition {
        id: "ping",
        name: "ping",
        description: "Send simulated ICMP echo requests",
        usage: "ping [-c count] [-i interval] <host>",
        options: vec![
            ParameterOption::number("-c", "count", "number of echo requests").with_default("4"),
            ParameterOption::number("-i", "interval", "seconds between requests"),
            ParameterOption::input("", "host", "destination host").required(),
        ],
    }
}

fn ps_definition() -> CommandDefinition {
    CommandDefinition {
        id: "ps",
        name: "ps",
        description: "Report a snapshot of running processes",
        usage: "ps [aux] [-e] [-f]",
        options: vec![
            ParameterOption::boolean("aux", "bsdAll", "every process, BSD syntax"),
            ParameterOption::boolean("-e", "every", "every process"),
            ParameterOption::boolean("-f", "fullFormat", "full-format listing"),
        ],
    }
}

fn top_definition() -> CommandDefinition {
    CommandDefinition {
        id: "top",
        name: "top",
        description: "Display a process activity snapshot",
        usage: "top [-b] [-n iterations]",
        options: vec![
            ParameterOption::boolean("-b", "batch", "batch mode"),
            ParameterOption::number("-n", "iterations", "number of refreshes").with_default("1"),
        ],
    }
}

fn iptables_definition() -> CommandDefinition {
    CommandDefinition {
        id: "iptables",
        name: "iptables",
        description: "Administer simulated firewall rules",
        usage: "iptables [-t table] <action> [match options] [-j target]",
        options: vec![
            ParameterOption::select("-t", "table", "table", &["filter", "nat", "mangle", "raw"])
                .with_default("filter")
                .in_group("table"),
            // Primary actions; at most one takes effect, in this priority order.
            ParameterOption::input("-A", "append", "append to chain").in_group("action"),
            ParameterOption::input("-I", "insert", "insert into chain").in_group("action"),
            ParameterOption::input("-D", "delete", "delete from chain").in_group("action"),
            ParameterOption::input("-R", "replace", "replace in chain").in_group("action"),
            ParameterOption::boolean("-L", "list", "list rules").in_group("action"),
            ParameterOption::input("-F", "flush", "flush chain (empty: whole table)")
                .in_group("action"),
            ParameterOption::boolean("-Z", "zero", "zero counters").in_group("action"),
            ParameterOption::input("-N", "newChain", "create chain").in_group("action"),
            ParameterOption::input("-X", "deleteChain", "delete chain").in_group("action"),
            ParameterOption::input("-P", "policy", "set policy: CHAIN POLICY").in_group("action"),
            ParameterOption::input("-E", "rename", "rename chain: OLD NEW").in_group("action"),
            // Match conditions.
            ParameterOption::input("-s", "source", "source address").in_group("match"),
            ParameterOption::input("-d", "destination", "destination address").in_group("match"),
            ParameterOption::select("-p", "protocol", "protocol", &["tcp", "udp", "icmp", "all"])
                .in_group("match"),
            ParameterOption::input("-i", "inInterface", "input interface").in_group("match"),
            ParameterOption::input("-o", "outInterface", "output interface").in_group("match"),
            ParameterOption::number("--sport", "sport", "source port").in_group("match"),
            ParameterOption::number("--dport", "dport", "destination port").in_group("match"),
            // Target.
            ParameterOption::select("-j", "jump", "jump target", &["ACCEPT", "DROP", "REJECT"])
                .in_group("target"),
            // Modifiers.
            ParameterOption::boolean("-v", "verbose", "verbose output").in_group("output"),
            ParameterOption::boolean("-n", "numeric", "numeric addresses").in_group("output"),
            ParameterOption::boolean("--line-numbers", "lineNumbers", "number the rules")
                .in_group("output"),
            ParameterOption::boolean("-h", "help", "show usage help"),
        ],
    }
}
