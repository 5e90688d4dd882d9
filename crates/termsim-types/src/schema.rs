//! Command schema: declarative descriptions of simulated commands.
//!
//! A `CommandDefinition` is a static catalog entry: the command name, a
//! one-line description, a usage template, and the ordered list of parameter
//! options the learner can toggle or fill in. The schema carries no behavior;
//! the assembler and the output simulators interpret it.

/// The kind of a parameter option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A pure on/off flag (`-l`). Never stores an input value.
    Boolean,
    /// A free-text value. An empty flag token makes it positional.
    Input,
    /// A value restricted to an enumerated set of choices.
    Select,
    /// A numeric value.
    Number,
}

/// One toggleable/fillable parameter of a command.
#[derive(Debug, Clone)]
pub struct ParameterOption {
    /// The literal switch string (`-l`, `--dport`). Empty for positionals.
    pub flag: &'static str,
    /// What kind of value (if any) this option carries.
    pub kind: ParamKind,
    /// Key under which an entered value is stored in the invocation state.
    pub key: &'static str,
    /// Human label for the option.
    pub label: &'static str,
    /// Pre-filled value offered to the learner.
    pub default: Option<&'static str>,
    /// Allowed values for `Select` options.
    pub choices: &'static [&'static str],
    /// Whether the command is incomplete without this option.
    pub required: bool,
    /// Display grouping label. Not evaluated by the engine.
    pub group: &'static str,
}

impl ParameterOption {
    /// A boolean flag option.
    pub fn boolean(flag: &'static str, key: &'static str, label: &'static str) -> Self {
        Self {
            flag,
            kind: ParamKind::Boolean,
            key,
            label,
            default: None,
            choices: &[],
            required: false,
            group: "",
        }
    }

    /// A free-text input option. Empty `flag` means positional.
    pub fn input(flag: &'static str, key: &'static str, label: &'static str) -> Self {
        Self {
            flag,
            kind: ParamKind::Input,
            key,
            label,
            default: None,
            choices: &[],
            required: false,
            group: "",
        }
    }

    /// An enumerated-choice option.
    pub fn select(
        flag: &'static str,
        key: &'static str,
        label: &'static str,
        choices: &'static [&'static str],
    ) -> Self {
        Self {
            flag,
            kind: ParamKind::Select,
            key,
            label,
            default: None,
            choices,
            required: false,
            group: "",
        }
    }

    /// A numeric option.
    pub fn number(flag: &'static str, key: &'static str, label: &'static str) -> Self {
        Self {
            flag,
            kind: ParamKind::Number,
            key,
            label,
            default: None,
            choices: &[],
            required: false,
            group: "",
        }
    }

    /// Mark the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a default value.
    pub fn with_default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    /// Attach a display group label.
    pub fn in_group(mut self, group: &'static str) -> Self {
        self.group = group;
        self
    }

    /// True for `Input` options with an empty flag token: the entered value
    /// is appended to the command line by itself, not as `flag value`.
    pub fn is_positional(&self) -> bool {
        self.kind == ParamKind::Input && self.flag.is_empty()
    }
}

/// A catalog entry describing one simulated command.
#[derive(Debug, Clone)]
pub struct CommandDefinition {
    /// Identifier the engine dispatches on (`ls`, `iptables`).
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Usage template shown to the learner.
    pub usage: &'static str,
    /// Ordered parameter options.
    pub options: Vec<ParameterOption>,
}

impl CommandDefinition {
    /// Find an option by its flag token.
    pub fn option_by_flag(&self, flag: &str) -> Option<&ParameterOption> {
        self.options.iter().find(|o| o.flag == flag)
    }

    /// Find an option by its input key.
    pub fn option_by_key(&self, key: &str) -> Option<&ParameterOption> {
        self.options.iter().find(|o| o.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_option_has_no_value_fields() {
        let opt = ParameterOption::boolean("-l", "long", "long listing");
        assert_eq!(opt.kind, ParamKind::Boolean);
        assert!(opt.default.is_none());
        assert!(opt.choices.is_empty());
        assert!(!opt.required);
    }

    #[test]
    fn positional_is_empty_flag_input() {
        let opt = ParameterOption::input("", "path", "target path");
        assert!(opt.is_positional());
        let flagged = ParameterOption::input("-f", "file", "file");
        assert!(!flagged.is_positional());
    }

    #[test]
    fn select_carries_choices() {
        let opt = ParameterOption::select("-t", "type", "entry type", &["f", "d"]);
        assert_eq!(opt.choices, &["f", "d"]);
    }

    #[test]
    fn builder_modifiers_compose() {
        let opt = ParameterOption::input("", "pattern", "search pattern")
            .required()
            .with_default("*.txt")
            .in_group("matching");
        assert!(opt.required);
        assert_eq!(opt.default, Some("*.txt"));
        assert_eq!(opt.group, "matching");
    }

    #[test]
    fn option_lookup_by_flag_and_key() {
        let def = CommandDefinition {
            id: "demo",
            name: "demo",
            description: "demo command",
            usage: "demo [-x]",
            options: vec![
                ParameterOption::boolean("-x", "xflag", "toggle x"),
                ParameterOption::input("", "path", "path"),
            ],
        };
        assert!(def.option_by_flag("-x").is_some());
        assert!(def.option_by_flag("-y").is_none());
        assert_eq!(def.option_by_key("path").unwrap().key, "path");
    }
}
