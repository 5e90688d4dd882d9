//! Per-command selection state: toggled flags and entered values.

use std::collections::{BTreeMap, BTreeSet};

use termsim_types::schema::{CommandDefinition, ParamKind};

/// The learner's current selection for the active command: which boolean
/// flags are toggled on, and what values have been entered for the
/// input/select/number options.
///
/// Boolean options never store a value here; only the flag set records them.
#[derive(Debug, Default, Clone)]
pub struct InvocationState {
    flags: BTreeSet<String>,
    inputs: BTreeMap<String, String>,
}

impl InvocationState {
    /// Fresh state for a command, with option defaults pre-filled.
    pub fn for_command(def: &CommandDefinition) -> Self {
        let mut state = Self::default();
        for opt in &def.options {
            if let Some(default) = opt.default
                && opt.kind != ParamKind::Boolean
            {
                state.inputs.insert(opt.key.to_string(), default.to_string());
            }
        }
        state
    }

    /// Toggle a boolean flag. Returns the new on/off state.
    pub fn toggle_flag(&mut self, flag: &str) -> bool {
        if self.flags.remove(flag) {
            false
        } else {
            self.flags.insert(flag.to_string());
            true
        }
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Record an entered value. An empty value still records presence; the
    /// assembler and simulators decide whether presence alone matters.
    pub fn set_input(&mut self, key: &str, value: &str) {
        self.inputs.insert(key.to_string(), value.to_string());
    }

    /// The recorded value for a key, if any (possibly empty).
    pub fn input(&self, key: &str) -> Option<&str> {
        self.inputs.get(key).map(String::as_str)
    }

    /// The recorded value for a key, only if non-empty.
    pub fn nonempty_input(&self, key: &str) -> Option<&str> {
        self.input(key).filter(|v| !v.is_empty())
    }

    /// Drop all toggles and values.
    pub fn clear(&mut self) {
        self.flags.clear();
        self.inputs.clear();
    }
}
