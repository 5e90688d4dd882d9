//! Command-line assembly: selection state -> display string.
//!
//! The general algorithm covers most commands. Commands whose real syntax is
//! order-sensitive get an override function, looked up by command id, so the
//! default path stays auditable and each exception is testable on its own.

use termsim_types::schema::{CommandDefinition, ParamKind};

use crate::invocation::InvocationState;

type AssembleFn = fn(&CommandDefinition, &InvocationState) -> String;

/// Commands that need a reordered assembly.
const OVERRIDES: [(&str, AssembleFn); 2] =
    [("grep", assemble_grep), ("iptables", assemble_iptables)];

/// Assemble the command-line string for a selection. Pure: reads only the
/// definition and the invocation state.
pub fn assemble(def: &CommandDefinition, state: &InvocationState) -> String {
    match OVERRIDES.iter().find(|(id, _)| *id == def.id) {
        Some((_, f)) => f(def, state),
        None => assemble_default(def, state),
    }
}

/// General case: name, toggled booleans, `flag value` pairs for
/// select/number options, then input options (positional values quoted and
/// appended alone, flagged values quoted after their flag). All in schema
/// order within each pass.
fn assemble_default(def: &CommandDefinition, state: &InvocationState) -> String {
    let mut tokens = vec![def.name.to_string()];
    push_booleans(&mut tokens, def, state, &[]);
    for opt in &def.options {
        if matches!(opt.kind, ParamKind::Select | ParamKind::Number)
            && let Some(value) = state.nonempty_input(opt.key)
        {
            if opt.flag.is_empty() {
                tokens.push(value.to_string());
            } else {
                tokens.push(opt.flag.to_string());
                tokens.push(value.to_string());
            }
        }
    }
    for opt in &def.options {
        if opt.kind == ParamKind::Input
            && let Some(value) = state.nonempty_input(opt.key)
        {
            if opt.is_positional() {
                tokens.push(format!("\"{value}\""));
            } else {
                tokens.push(opt.flag.to_string());
                tokens.push(format!("\"{value}\""));
            }
        }
    }
    tokens.join(" ")
}

/// grep: the pattern must be the first positional token right after the
/// boolean flags, and the target path (if present) comes last.
fn assemble_grep(def: &CommandDefinition, state: &InvocationState) -> String {
    let mut tokens = vec![def.name.to_string()];
    push_booleans(&mut tokens, def, state, &[]);
    if let Some(pattern) = state.nonempty_input("pattern") {
        tokens.push(format!("\"{pattern}\""));
    }
    if let Some(path) = state.nonempty_input("path") {
        tokens.push(path.to_string());
    }
    tokens.join(" ")
}

/// Primary iptables actions, in emission priority order. At most one is
/// emitted; an `Input`-kind action is considered selected when its key has
/// been recorded at all (a chain-less `-F` flushes the whole table).
const IPTABLES_ACTIONS: [(&str, &str); 11] = [
    ("-A", "append"),
    ("-I", "insert"),
    ("-D", "delete"),
    ("-R", "replace"),
    ("-L", "list"),
    ("-F", "flush"),
    ("-Z", "zero"),
    ("-N", "newChain"),
    ("-X", "deleteChain"),
    ("-P", "policy"),
    ("-E", "rename"),
];

/// Match-condition flags, in their fixed emission order.
const IPTABLES_MATCHES: [(&str, &str); 7] = [
    ("-s", "source"),
    ("-d", "destination"),
    ("-p", "protocol"),
    ("-i", "inInterface"),
    ("-o", "outInterface"),
    ("--sport", "sport"),
    ("--dport", "dport"),
];

/// iptables: table selector, then exactly one primary action with its chain
/// argument, then match conditions in fixed order, then the jump target,
/// then any remaining boolean flags. Chain names and match values are not
/// quoted: the real tool never sees them quoted.
fn assemble_iptables(def: &CommandDefinition, state: &InvocationState) -> String {
    let mut tokens = vec![def.name.to_string()];

    if let Some(table) = state.nonempty_input("table")
        && table != "filter"
    {
        tokens.push("-t".to_string());
        tokens.push(table.to_string());
    }

    for (flag, key) in IPTABLES_ACTIONS {
        let selected = match def.option_by_flag(flag).map(|o| o.kind) {
            Some(ParamKind::Boolean) => state.has_flag(flag),
            _ => state.input(key).is_some(),
        };
        if selected {
            tokens.push(flag.to_string());
            if let Some(value) = state.nonempty_input(key) {
                tokens.push(value.to_string());
            }
            break;
        }
    }

    for (flag, key) in IPTABLES_MATCHES {
        if let Some(value) = state.nonempty_input(key) {
            tokens.push(flag.to_string());
            tokens.push(value.to_string());
        }
    }

    if let Some(target) = state.nonempty_input("jump") {
        tokens.push("-j".to_string());
        tokens.push(target.to_string());
    }

    let action_flags: Vec<&str> = IPTABLES_ACTIONS.iter().map(|(f, _)| *f).collect();
    push_booleans(&mut tokens, def, state, &action_flags);

    tokens.join(" ")
}

/// Append every toggled boolean flag in schema order, skipping `exclude`.
fn push_booleans(
    tokens: &mut Vec<String>,
    def: &CommandDefinition,
    state: &InvocationState,
    exclude: &[&str],
) {
    for opt in &def.options {
        if opt.kind == ParamKind::Boolean
            && state.has_flag(opt.flag)
            && !exclude.contains(&opt.flag)
        {
            tokens.push(opt.flag.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CommandCatalog;

    fn def(name: &str) -> CommandDefinition {
        CommandCatalog::new().lookup(name).unwrap().clone()
    }

    #[test]
    fn bare_command_name() {
        let d = def("pwd");
        let state = InvocationState::default();
        assert_eq!(assemble(&d, &state), "pwd");
    }

    #[test]
    fn default_order_booleans_then_values_then_positionals() {
        let d = def("ls");
        let mut state = InvocationState::default();
        state.toggle_flag("-l");
        state.toggle_flag("-a");
        state.set_input("path", "/var/log");
        assert_eq!(assemble(&d, &state), "ls -l -a \"/var/log\"");
    }

    #[test]
    fn untoggled_flags_do_not_appear() {
        let d = def("ls");
        let mut state = InvocationState::default();
        state.toggle_flag("-l");
        state.toggle_flag("-l");
        assert_eq!(assemble(&d, &state), "ls");
    }

    #[test]
    fn number_options_emit_flag_value_unquoted() {
        let d = def("ping");
        let mut state = InvocationState::default();
        state.set_input("count", "3");
        state.set_input("host", "example.com");
        assert_eq!(assemble(&d, &state), "ping -c 3 \"example.com\"");
    }

    #[test]
    fn find_emits_predicates_before_positional_path() {
        let d = def("find");
        let mut state = InvocationState::default();
        state.toggle_flag("-empty");
        state.set_input("type", "f");
        state.set_input("maxdepth", "2");
        state.set_input("name", "*.js");
        state.set_input("path", "/home/user");
        assert_eq!(
            assemble(&d, &state),
            "find -empty -type f -maxdepth 2 -name \"*.js\" \"/home/user\""
        );
    }

    #[test]
    fn grep_pattern_first_path_last() {
        let d = def("grep");
        let mut state = InvocationState::default();
        state.toggle_flag("-n");
        state.toggle_flag("-i");
        state.set_input("pattern", "error");
        state.set_input("path", "/var/log/syslog");
        // Booleans keep schema order (-i before -n), pattern follows them,
        // path trails.
        assert_eq!(
            assemble(&d, &state),
            "grep -i -n \"error\" /var/log/syslog"
        );
    }

    #[test]
    fn grep_without_path_omits_trailing_operand() {
        let d = def("grep");
        let mut state = InvocationState::default();
        state.set_input("pattern", "root");
        assert_eq!(assemble(&d, &state), "grep \"root\"");
    }

    #[test]
    fn iptables_full_append_ordering() {
        let d = def("iptables");
        let mut state = InvocationState::for_command(&d);
        state.set_input("append", "INPUT");
        state.set_input("protocol", "tcp");
        state.set_input("dport", "22");
        state.set_input("source", "10.0.0.0/8");
        state.set_input("jump", "ACCEPT");
        state.toggle_flag("-v");
        assert_eq!(
            assemble(&d, &state),
            "iptables -A INPUT -s 10.0.0.0/8 -p tcp --dport 22 -j ACCEPT -v"
        );
    }

    #[test]
    fn iptables_non_default_table_leads() {
        let d = def("iptables");
        let mut state = InvocationState::for_command(&d);
        state.set_input("table", "nat");
        state.set_input("append", "PREROUTING");
        state.set_input("jump", "ACCEPT");
        assert_eq!(
            assemble(&d, &state),
            "iptables -t nat -A PREROUTING -j ACCEPT"
        );
    }

    #[test]
    fn iptables_default_table_is_elided() {
        let d = def("iptables");
        let mut state = InvocationState::for_command(&d);
        state.toggle_flag("-L");
        assert_eq!(assemble(&d, &state), "iptables -L");
    }

    #[test]
    fn iptables_action_priority_append_beats_list() {
        let d = def("iptables");
        let mut state = InvocationState::for_command(&d);
        state.toggle_flag("-L");
        state.set_input("append", "INPUT");
        let line = assemble(&d, &state);
        assert!(line.contains("-A INPUT"));
        assert!(!line.contains("-L"));
    }

    #[test]
    fn iptables_chainless_flush() {
        let d = def("iptables");
        let mut state = InvocationState::for_command(&d);
        state.set_input("flush", "");
        assert_eq!(assemble(&d, &state), "iptables -F");
    }

    #[test]
    fn assembly_is_pure() {
        let d = def("ls");
        let mut state = InvocationState::default();
        state.toggle_flag("-l");
        state.set_input("path", "/tmp");
        let first = assemble(&d, &state);
        let second = assemble(&d, &state);
        assert_eq!(first, second);
    }
}
