//! The engine boundary consumed by the presentation layer.
//!
//! A `Session` owns every piece of mutable state: the active command
//! selection, the virtual filesystem (with its cursor), the firewall rule
//! store, and the random generator feeding the network simulators. The
//! firewall store deliberately survives scenario switches; everything else
//! about the filesystem view is scenario-scoped.

use rand::SeedableRng;
use rand::rngs::StdRng;
use termsim_firewall::FirewallState;
use termsim_types::error::{Result, TermsimError};
use termsim_types::schema::{CommandDefinition, ParamKind};
use termsim_vfs::{Scenario, VirtualFs};

use crate::assemble::assemble;
use crate::catalog::CommandCatalog;
use crate::invocation::InvocationState;
use crate::sim::{self, SimContext};

const NO_SELECTION: &str = "(no command selected)";

#[derive(Debug)]
struct Selection {
    command: CommandDefinition,
    state: InvocationState,
}

/// One learner session.
pub struct Session {
    catalog: CommandCatalog,
    vfs: VirtualFs,
    firewall: FirewallState,
    rng: StdRng,
    selection: Option<Selection>,
}

impl Session {
    /// A session over the built-in catalog and scenarios, with an
    /// entropy-seeded generator.
    pub fn new() -> Result<Self> {
        Self::build(StdRng::from_entropy())
    }

    /// A session whose network simulators are reproducible: the same seed
    /// yields the same ping times and process percentages.
    pub fn with_seed(seed: u64) -> Result<Self> {
        Self::build(StdRng::seed_from_u64(seed))
    }

    fn build(rng: StdRng) -> Result<Self> {
        Ok(Self {
            catalog: CommandCatalog::new(),
            vfs: VirtualFs::new()?,
            firewall: FirewallState::new(),
            rng,
            selection: None,
        })
    }

    pub fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }

    /// Select the active command, replacing any previous selection and
    /// pre-filling option defaults.
    pub fn select_command(&mut self, name: &str) -> Result<()> {
        let command = self.catalog.lookup(name)?.clone();
        log::debug!("selected command '{name}'");
        let state = InvocationState::for_command(&command);
        self.selection = Some(Selection { command, state });
        Ok(())
    }

    /// The active command definition, if any.
    pub fn active_command(&self) -> Option<&CommandDefinition> {
        self.selection.as_ref().map(|s| &s.command)
    }

    /// Toggle a boolean parameter of the active command. Returns the new
    /// on/off state.
    pub fn toggle_flag(&mut self, flag: &str) -> Result<bool> {
        let sel = self
            .selection
            .as_mut()
            .ok_or_else(|| TermsimError::Command("no command selected".to_string()))?;
        match sel.command.option_by_flag(flag) {
            Some(opt) if opt.kind == ParamKind::Boolean => Ok(sel.state.toggle_flag(flag)),
            Some(_) => Err(TermsimError::Command(format!(
                "not a boolean flag: {flag}"
            ))),
            None => Err(TermsimError::Command(format!(
                "unknown flag for {}: {flag}",
                sel.command.id
            ))),
        }
    }

    /// Record a value for an input/select/number parameter of the active
    /// command. Boolean options never store values.
    pub fn set_input(&mut self, key: &str, value: &str) -> Result<()> {
        let sel = self
            .selection
            .as_mut()
            .ok_or_else(|| TermsimError::Command("no command selected".to_string()))?;
        match sel.command.option_by_key(key) {
            Some(opt) if opt.kind == ParamKind::Boolean => Err(TermsimError::Command(format!(
                "boolean option does not take a value: {key}"
            ))),
            Some(_) => {
                sel.state.set_input(key, value);
                Ok(())
            },
            None => Err(TermsimError::Command(format!(
                "unknown parameter for {}: {key}",
                sel.command.id
            ))),
        }
    }

    /// Reset the active command's toggles and values back to its defaults.
    /// The command itself stays selected.
    pub fn clear_selection(&mut self) {
        if let Some(sel) = &mut self.selection {
            sel.state = InvocationState::for_command(&sel.command);
        }
    }

    /// The command line the current selection assembles to.
    pub fn assemble_command_string(&self) -> String {
        match &self.selection {
            Some(sel) => assemble(&sel.command, &sel.state),
            None => NO_SELECTION.to_string(),
        }
    }

    /// Run the matching output simulator for the current selection.
    pub fn simulate_output(&mut self) -> String {
        let Some(sel) = &self.selection else {
            return NO_SELECTION.to_string();
        };
        let mut ctx = SimContext {
            vfs: &mut self.vfs,
            firewall: &mut self.firewall,
            rng: &mut self.rng,
        };
        sim::simulate(&sel.command, &sel.state, &mut ctx)
    }

    /// Replace the filesystem view. Firewall state is intentionally kept:
    /// it is session-global, not scenario-scoped.
    pub fn switch_scenario(&mut self, id: &str) -> Result<()> {
        self.vfs.switch_scenario(id)
    }

    /// The working directory of the active scenario.
    pub fn current_path(&self) -> &str {
        self.vfs.cursor()
    }

    /// Available scenarios.
    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.vfs.scenarios()
    }
}
