//! Error types for termsim.

/// Errors produced by the termsim engine.
#[derive(Debug, thiserror::Error)]
pub enum TermsimError {
    #[error("schema error: {0}")]
    Schema(String),

    #[error("VFS error: {0}")]
    Vfs(String),

    #[error("scenario error: {0}")]
    Scenario(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("firewall error: {0}")]
    Firewall(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TermsimError>;
