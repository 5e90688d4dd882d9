//! In-memory firewall rule store.
//!
//! Models the iptables data shape: four fixed tables, each owning named
//! chains with a default policy and an ordered list of rule-description
//! strings. The store is session-scoped and survives scenario switches;
//! it is passed explicitly into every firewall-simulator call.

use termsim_types::error::{Result, TermsimError};

/// The four standard tables.
pub const TABLE_NAMES: [&str; 4] = ["filter", "nat", "mangle", "raw"];

/// A chain's default policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Accept,
    Drop,
    Reject,
}

impl Policy {
    pub fn as_str(self) -> &'static str {
        match self {
            Policy::Accept => "ACCEPT",
            Policy::Drop => "DROP",
            Policy::Reject => "REJECT",
        }
    }

    /// Parse a policy word. Case-sensitive, as iptables is.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACCEPT" => Some(Policy::Accept),
            "DROP" => Some(Policy::Drop),
            "REJECT" => Some(Policy::Reject),
            _ => None,
        }
    }
}

/// A named rule chain: default policy plus ordered rule descriptions.
#[derive(Debug, Clone)]
pub struct Chain {
    pub name: String,
    pub policy: Policy,
    pub rules: Vec<String>,
    /// Built-in chains cannot be deleted.
    built_in: bool,
}

impl Chain {
    fn built_in(name: &str) -> Self {
        Self {
            name: name.to_string(),
            policy: Policy::Accept,
            rules: Vec::new(),
            built_in: true,
        }
    }

    fn user_defined(name: &str) -> Self {
        Self {
            name: name.to_string(),
            policy: Policy::Accept,
            rules: Vec::new(),
            built_in: false,
        }
    }

    pub fn is_built_in(&self) -> bool {
        self.built_in
    }
}

/// One table: an ordered set of chains. Chains keep their definition order
/// (INPUT before FORWARD before OUTPUT), not lexicographic order.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: &'static str,
    chains: Vec<Chain>,
}

impl Table {
    fn new(name: &'static str, chain_names: &[&str]) -> Self {
        Self {
            name,
            chains: chain_names.iter().map(|n| Chain::built_in(n)).collect(),
        }
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn chain(&self, name: &str) -> Option<&Chain> {
        self.chains.iter().find(|c| c.name == name)
    }

    fn chain_mut(&mut self, name: &str) -> Option<&mut Chain> {
        self.chains.iter_mut().find(|c| c.name == name)
    }
}

/// The whole firewall rule store.
#[derive(Debug, Clone)]
pub struct FirewallState {
    tables: Vec<Table>,
}

impl FirewallState {
    /// A store with the standard tables and their built-in chains, all
    /// policies ACCEPT, no rules.
    pub fn new() -> Self {
        Self {
            tables: vec![
                Table::new("filter", &["INPUT", "FORWARD", "OUTPUT"]),
                Table::new("nat", &["PREROUTING", "INPUT", "OUTPUT", "POSTROUTING"]),
                Table::new(
                    "mangle",
                    &["PREROUTING", "INPUT", "FORWARD", "OUTPUT", "POSTROUTING"],
                ),
                Table::new("raw", &["PREROUTING", "OUTPUT"]),
            ],
        }
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| TermsimError::Firewall(format!("no such table: {name}")))
    }

    fn require_chain(&mut self, table: &str, chain: &str) -> Result<&mut Chain> {
        self.table_mut(table)?
            .chain_mut(chain)
            .ok_or_else(|| TermsimError::Firewall(format!("no chain/target by that name: {chain}")))
    }

    /// Append a rule description to a chain.
    pub fn append_rule(&mut self, table: &str, chain: &str, rule: String) -> Result<()> {
        let c = self.require_chain(table, chain)?;
        log::debug!("{table}/{chain}: append rule '{rule}'");
        c.rules.push(rule);
        Ok(())
    }

    /// Remove the most recently added rule of a chain. Returns the removed
    /// description, or `None` if the chain was empty.
    pub fn delete_last_rule(&mut self, table: &str, chain: &str) -> Result<Option<String>> {
        let c = self.require_chain(table, chain)?;
        let removed = c.rules.pop();
        log::debug!("{table}/{chain}: delete last rule -> {removed:?}");
        Ok(removed)
    }

    /// Replace the most recently added rule of a chain. Returns the old
    /// description, or `None` (and leaves the chain unchanged) if the chain
    /// has no rules.
    pub fn replace_last_rule(
        &mut self,
        table: &str,
        chain: &str,
        rule: String,
    ) -> Result<Option<String>> {
        let c = self.require_chain(table, chain)?;
        match c.rules.last_mut() {
            Some(last) => {
                let old = std::mem::replace(last, rule);
                log::debug!("{table}/{chain}: replaced rule '{old}'");
                Ok(Some(old))
            },
            None => Ok(None),
        }
    }

    /// Clear one chain's rules, or every chain in the table when `chain` is
    /// `None`. Returns the number of rules removed.
    pub fn flush(&mut self, table: &str, chain: Option<&str>) -> Result<usize> {
        let t = self.table_mut(table)?;
        let removed = match chain {
            Some(name) => {
                let c = t
                    .chain_mut(name)
                    .ok_or_else(|| {
                        TermsimError::Firewall(format!("no chain/target by that name: {name}"))
                    })?;
                std::mem::take(&mut c.rules).len()
            },
            None => t
                .chains
                .iter_mut()
                .map(|c| std::mem::take(&mut c.rules).len())
                .sum(),
        };
        log::debug!("{table}: flushed {removed} rule(s)");
        Ok(removed)
    }

    /// Set a chain's default policy.
    pub fn set_policy(&mut self, table: &str, chain: &str, policy: Policy) -> Result<()> {
        let c = self.require_chain(table, chain)?;
        c.policy = policy;
        Ok(())
    }

    /// Create a new user-defined chain with policy ACCEPT and no rules.
    pub fn new_chain(&mut self, table: &str, name: &str) -> Result<()> {
        let t = self.table_mut(table)?;
        if t.chain(name).is_some() {
            return Err(TermsimError::Firewall(format!("chain already exists: {name}")));
        }
        t.chains.push(Chain::user_defined(name));
        Ok(())
    }

    /// Rename a user-defined chain. Built-in chains keep their names, and
    /// the new name must be free.
    pub fn rename_chain(&mut self, table: &str, old: &str, new: &str) -> Result<()> {
        let t = self.table_mut(table)?;
        if t.chain(new).is_some() {
            return Err(TermsimError::Firewall(format!("chain already exists: {new}")));
        }
        match t.chain_mut(old) {
            Some(c) if c.built_in => Err(TermsimError::Firewall(format!(
                "cannot rename built-in chain: {old}"
            ))),
            Some(c) => {
                c.name = new.to_string();
                Ok(())
            },
            None => Err(TermsimError::Firewall(format!(
                "no chain/target by that name: {old}"
            ))),
        }
    }

    /// Delete an empty user-defined chain. Built-in chains and non-empty
    /// chains are refused.
    pub fn delete_chain(&mut self, table: &str, name: &str) -> Result<()> {
        let t = self.table_mut(table)?;
        match t.chain(name) {
            Some(c) if c.built_in => Err(TermsimError::Firewall(format!(
                "cannot delete built-in chain: {name}"
            ))),
            Some(c) if !c.rules.is_empty() => {
                Err(TermsimError::Firewall(format!("chain is not empty: {name}")))
            },
            Some(_) => {
                t.chains.retain(|c| c.name != name);
                Ok(())
            },
            None => Err(TermsimError::Firewall(format!(
                "no chain/target by that name: {name}"
            ))),
        }
    }
}

impl Default for FirewallState {
    fn default() -> Self {
        Self::new()
    }
}
