//! Firewall-management simulator (`iptables`).
//!
//! A state machine over the session's `FirewallState`. Exactly one primary
//! action takes effect per invocation, chosen in the same priority order the
//! assembler uses. All failures degrade to `iptables: ...` messages.

use termsim_firewall::{FirewallState, Policy, Table};
use termsim_types::error::TermsimError;

use crate::invocation::InvocationState;

const USAGE: &str = "\
Usage: iptables [-t table] -[ACDRLFZNXPE] [chain] [options]
  -A chain        append a rule to the chain
  -I chain        insert a rule into the chain
  -D chain        delete the most recent rule from the chain
  -R chain        replace the most recent rule in the chain
  -L              list rules in the selected table
  -F [chain]      flush a chain, or every chain in the table
  -Z              zero packet and byte counters
  -N chain        create a user-defined chain
  -X chain        delete an empty user-defined chain
  -P chain policy set a chain's default policy (ACCEPT, DROP, REJECT)
  -E old new      rename a user-defined chain
Match options: -s source, -d destination, -p protocol, -i/-o interface,
--sport/--dport port; -j target selects the rule target.";

pub fn simulate(state: &InvocationState, fw: &mut FirewallState) -> String {
    if state.has_flag("-h") {
        return USAGE.to_string();
    }

    let table = state.nonempty_input("table").unwrap_or("filter");
    if fw.table(table).is_none() {
        return format!("iptables: can't initialize iptables table '{table}': Table does not exist");
    }

    if let Some(chain) = state.nonempty_input("append") {
        let rule = build_rule_description(state);
        return match fw.append_rule(table, chain, rule) {
            Ok(()) => format!("Rule appended to chain '{chain}'"),
            Err(e) => error_text(e),
        };
    }
    if let Some(chain) = state.nonempty_input("insert") {
        // Insert is modeled as append: the simplified store keeps no rule
        // numbering.
        let rule = build_rule_description(state);
        return match fw.append_rule(table, chain, rule) {
            Ok(()) => format!("Rule inserted into chain '{chain}'"),
            Err(e) => error_text(e),
        };
    }
    if let Some(chain) = state.nonempty_input("delete") {
        return match fw.delete_last_rule(table, chain) {
            Ok(Some(_)) => format!("Rule deleted from chain '{chain}'"),
            Ok(None) => format!("iptables: chain '{chain}' has no rules to delete"),
            Err(e) => error_text(e),
        };
    }
    if let Some(chain) = state.nonempty_input("replace") {
        let rule = build_rule_description(state);
        return match fw.replace_last_rule(table, chain, rule) {
            Ok(Some(_)) => format!("Rule replaced in chain '{chain}'"),
            Ok(None) => format!("iptables: chain '{chain}' has no rule to replace"),
            Err(e) => error_text(e),
        };
    }
    if state.has_flag("-L") {
        return match fw.table(table) {
            Some(t) => render_table(t, state.has_flag("--line-numbers")),
            None => format!("iptables: can't initialize iptables table '{table}'"),
        };
    }
    if state.input("flush").is_some() {
        let chain = state.nonempty_input("flush");
        return match fw.flush(table, chain) {
            Ok(n) => match chain {
                Some(c) => format!("Flushed chain '{c}' ({n} rule(s) removed)"),
                None => format!("Flushed all chains in table '{table}' ({n} rule(s) removed)"),
            },
            Err(e) => error_text(e),
        };
    }
    if state.has_flag("-Z") {
        return format!("Zeroed packet and byte counters in table '{table}'");
    }
    if let Some(name) = state.nonempty_input("newChain") {
        return match fw.new_chain(table, name) {
            Ok(()) => format!("Chain '{name}' created in table '{table}'"),
            Err(e) => error_text(e),
        };
    }
    if let Some(name) = state.nonempty_input("deleteChain") {
        return match fw.delete_chain(table, name) {
            Ok(()) => format!("Chain '{name}' deleted from table '{table}'"),
            Err(e) => error_text(e),
        };
    }
    if let Some(spec) = state.nonempty_input("policy") {
        let mut parts = spec.split_whitespace();
        let (Some(chain), Some(word), None) = (parts.next(), parts.next(), parts.next()) else {
            return "iptables: -P requires a chain name and a policy".to_string();
        };
        let Some(policy) = Policy::parse(word) else {
            return format!("iptables: invalid policy '{word}' (expected ACCEPT, DROP or REJECT)");
        };
        return match fw.set_policy(table, chain, policy) {
            Ok(()) => format!("Policy of chain '{chain}' set to {}", policy.as_str()),
            Err(e) => error_text(e),
        };
    }
    if let Some(spec) = state.nonempty_input("rename") {
        let mut parts = spec.split_whitespace();
        let (Some(old), Some(new), None) = (parts.next(), parts.next(), parts.next()) else {
            return "iptables: -E requires the old and the new chain name".to_string();
        };
        return match fw.rename_chain(table, old, new) {
            Ok(()) => format!("Chain '{old}' renamed to '{new}'"),
            Err(e) => error_text(e),
        };
    }

    "iptables: no command specified".to_string()
}

/// `iptables -L`-style rendering: per chain a header, the fixed column row,
/// and the accumulated rule lines.
fn render_table(table: &Table, line_numbers: bool) -> String {
    let mut blocks = Vec::new();
    for chain in table.chains() {
        let mut lines = vec![format!(
            "Chain {} (policy {})",
            chain.name,
            chain.policy.as_str()
        )];
        let header = "target     prot opt source               destination";
        if line_numbers {
            lines.push(format!("num  {header}"));
        } else {
            lines.push(header.to_string());
        }
        for (i, rule) in chain.rules.iter().enumerate() {
            if line_numbers {
                lines.push(format!("{:<4} {rule}", i + 1));
            } else {
                lines.push(rule.clone());
            }
        }
        blocks.push(lines.join("\n"));
    }
    blocks.join("\n\n")
}

/// Compose the stored rule line from whichever match options were supplied,
/// shaped like an `iptables -L` row.
fn build_rule_description(state: &InvocationState) -> String {
    let target = state.nonempty_input("jump").unwrap_or("");
    let proto = state.nonempty_input("protocol").unwrap_or("all");
    let source = state.nonempty_input("source").unwrap_or("anywhere");
    let dest = state.nonempty_input("destination").unwrap_or("anywhere");

    let mut extras = Vec::new();
    if let Some(v) = state.nonempty_input("inInterface") {
        extras.push(format!("in:{v}"));
    }
    if let Some(v) = state.nonempty_input("outInterface") {
        extras.push(format!("out:{v}"));
    }
    if let Some(v) = state.nonempty_input("sport") {
        extras.push(format!("spt:{v}"));
    }
    if let Some(v) = state.nonempty_input("dport") {
        extras.push(format!("dpt:{v}"));
    }

    let mut line = format!("{target:<10} {proto:<4} --  {source:<20} {dest:<20}");
    if !extras.is_empty() {
        line.push(' ');
        line.push_str(&extras.join(" "));
    }
    line.trim_end().to_string()
}

fn error_text(e: TermsimError) -> String {
    match e {
        TermsimError::Firewall(msg) => format!("iptables: {msg}"),
        other => format!("iptables: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> InvocationState {
        InvocationState::default()
    }

    #[test]
    fn no_action_message() {
        let mut fw = FirewallState::new();
        assert_eq!(simulate(&state(), &mut fw), "iptables: no command specified");
    }

    #[test]
    fn help_wins_over_everything() {
        let mut fw = FirewallState::new();
        let mut s = state();
        s.toggle_flag("-h");
        s.set_input("append", "INPUT");
        let out = simulate(&s, &mut fw);
        assert!(out.starts_with("Usage: iptables"));
        assert!(fw.table("filter").unwrap().chain("INPUT").unwrap().rules.is_empty());
    }

    #[test]
    fn append_then_list_shows_one_rule() {
        let mut fw = FirewallState::new();
        let mut s = state();
        s.set_input("append", "INPUT");
        s.set_input("jump", "ACCEPT");
        assert_eq!(simulate(&s, &mut fw), "Rule appended to chain 'INPUT'");

        let mut list = state();
        list.toggle_flag("-L");
        let out = simulate(&list, &mut fw);
        assert!(out.contains("Chain INPUT (policy ACCEPT)"));
        let input_block: &str = out.split("\n\n").find(|b| b.starts_with("Chain INPUT")).unwrap();
        assert_eq!(input_block.lines().count(), 3, "header + columns + 1 rule");
        assert!(input_block.contains("ACCEPT"));
    }

    #[test]
    fn flush_chain_spares_other_chains() {
        let mut fw = FirewallState::new();
        for chain in ["INPUT", "OUTPUT"] {
            let mut s = state();
            s.set_input("append", chain);
            s.set_input("jump", "DROP");
            simulate(&s, &mut fw);
        }
        let mut s = state();
        s.set_input("flush", "INPUT");
        assert_eq!(
            simulate(&s, &mut fw),
            "Flushed chain 'INPUT' (1 rule(s) removed)"
        );
        assert!(fw.table("filter").unwrap().chain("INPUT").unwrap().rules.is_empty());
        assert_eq!(fw.table("filter").unwrap().chain("OUTPUT").unwrap().rules.len(), 1);
    }

    #[test]
    fn chainless_flush_clears_whole_table() {
        let mut fw = FirewallState::new();
        for chain in ["INPUT", "FORWARD"] {
            let mut s = state();
            s.set_input("append", chain);
            simulate(&s, &mut fw);
        }
        let mut s = state();
        s.set_input("flush", "");
        let out = simulate(&s, &mut fw);
        assert_eq!(out, "Flushed all chains in table 'filter' (2 rule(s) removed)");
    }

    #[test]
    fn rule_description_includes_match_options() {
        let mut fw = FirewallState::new();
        let mut s = state();
        s.set_input("append", "INPUT");
        s.set_input("protocol", "tcp");
        s.set_input("source", "10.0.0.0/8");
        s.set_input("dport", "22");
        s.set_input("jump", "ACCEPT");
        simulate(&s, &mut fw);
        let rule = &fw.table("filter").unwrap().chain("INPUT").unwrap().rules[0];
        assert!(rule.starts_with("ACCEPT"));
        assert!(rule.contains("tcp"));
        assert!(rule.contains("10.0.0.0/8"));
        assert!(rule.contains("dpt:22"));
    }

    #[test]
    fn bare_rule_defaults_to_anywhere() {
        let mut fw = FirewallState::new();
        let mut s = state();
        s.set_input("append", "OUTPUT");
        simulate(&s, &mut fw);
        let rule = &fw.table("filter").unwrap().chain("OUTPUT").unwrap().rules[0];
        assert!(rule.contains("all"));
        assert!(rule.contains("anywhere"));
    }

    #[test]
    fn delete_pops_most_recent_rule() {
        let mut fw = FirewallState::new();
        for _ in 0..2 {
            let mut s = state();
            s.set_input("append", "INPUT");
            simulate(&s, &mut fw);
        }
        let mut s = state();
        s.set_input("delete", "INPUT");
        assert_eq!(simulate(&s, &mut fw), "Rule deleted from chain 'INPUT'");
        assert_eq!(fw.table("filter").unwrap().chain("INPUT").unwrap().rules.len(), 1);

        simulate(&s, &mut fw);
        assert_eq!(
            simulate(&s, &mut fw),
            "iptables: chain 'INPUT' has no rules to delete"
        );
    }

    #[test]
    fn policy_action_updates_store() {
        let mut fw = FirewallState::new();
        let mut s = state();
        s.set_input("policy", "INPUT DROP");
        assert_eq!(simulate(&s, &mut fw), "Policy of chain 'INPUT' set to DROP");
        let mut list = state();
        list.toggle_flag("-L");
        assert!(simulate(&list, &mut fw).contains("Chain INPUT (policy DROP)"));
    }

    #[test]
    fn policy_action_rejects_bad_input() {
        let mut fw = FirewallState::new();
        let mut s = state();
        s.set_input("policy", "INPUT");
        assert!(simulate(&s, &mut fw).contains("-P requires"));
        s.set_input("policy", "INPUT MAYBE");
        assert!(simulate(&s, &mut fw).contains("invalid policy 'MAYBE'"));
    }

    #[test]
    fn new_chain_and_delete_chain_are_stateful() {
        let mut fw = FirewallState::new();
        let mut s = state();
        s.set_input("newChain", "LOGDROP");
        assert_eq!(
            simulate(&s, &mut fw),
            "Chain 'LOGDROP' created in table 'filter'"
        );
        let mut list = state();
        list.toggle_flag("-L");
        assert!(simulate(&list, &mut fw).contains("Chain LOGDROP (policy ACCEPT)"));

        let mut s = state();
        s.set_input("deleteChain", "LOGDROP");
        assert_eq!(
            simulate(&s, &mut fw),
            "Chain 'LOGDROP' deleted from table 'filter'"
        );
        assert!(!simulate(&list, &mut fw).contains("LOGDROP"));
    }

    #[test]
    fn rename_chain_action() {
        let mut fw = FirewallState::new();
        let mut s = state();
        s.set_input("newChain", "OLD");
        simulate(&s, &mut fw);
        let mut s = state();
        s.set_input("rename", "OLD NEW");
        assert_eq!(simulate(&s, &mut fw), "Chain 'OLD' renamed to 'NEW'");
    }

    #[test]
    fn unknown_chain_reported_inline() {
        let mut fw = FirewallState::new();
        let mut s = state();
        s.set_input("append", "SIDEDOOR");
        let out = simulate(&s, &mut fw);
        assert!(out.starts_with("iptables: "));
        assert!(out.contains("SIDEDOOR"));
    }

    #[test]
    fn unknown_table_reported_inline() {
        let mut fw = FirewallState::new();
        let mut s = state();
        s.set_input("table", "broute");
        s.toggle_flag("-L");
        assert!(
            simulate(&s, &mut fw)
                .starts_with("iptables: can't initialize iptables table 'broute'")
        );
    }

    #[test]
    fn non_default_table_is_independent() {
        let mut fw = FirewallState::new();
        let mut s = state();
        s.set_input("table", "nat");
        s.set_input("append", "PREROUTING");
        simulate(&s, &mut fw);
        assert_eq!(
            fw.table("nat").unwrap().chain("PREROUTING").unwrap().rules.len(),
            1
        );
        for chain in fw.table("filter").unwrap().chains() {
            assert!(chain.rules.is_empty());
        }
    }

    #[test]
    fn list_with_line_numbers() {
        let mut fw = FirewallState::new();
        let mut s = state();
        s.set_input("append", "INPUT");
        s.set_input("jump", "DROP");
        simulate(&s, &mut fw);
        let mut list = state();
        list.toggle_flag("-L");
        list.toggle_flag("--line-numbers");
        let out = simulate(&list, &mut fw);
        assert!(out.contains("num  target"));
        assert!(out.lines().any(|l| l.starts_with("1    DROP")));
    }

    #[test]
    fn zero_returns_confirmation_only() {
        let mut fw = FirewallState::new();
        let mut s = state();
        s.set_input("append", "INPUT");
        simulate(&s, &mut fw);
        let mut s = state();
        s.toggle_flag("-Z");
        assert_eq!(
            simulate(&s, &mut fw),
            "Zeroed packet and byte counters in table 'filter'"
        );
        // Rules untouched.
        assert_eq!(fw.table("filter").unwrap().chain("INPUT").unwrap().rules.len(), 1);
    }
}
