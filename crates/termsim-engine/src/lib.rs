//! termsim core engine.
//!
//! The engine is schema-driven: a static catalog describes each simulated
//! command's parameter options; the learner's toggles and inputs accumulate
//! in an `InvocationState`; the assembler renders the selection into a
//! command-line string; and the output simulators interpret the same
//! selection against the virtual filesystem and firewall store to produce
//! plausible output text. `Session` ties the pieces together behind the
//! boundary the presentation layer consumes.

mod assemble;
mod catalog;
mod invocation;
mod session;
pub mod sim;

/// Render a selection into a command-line string.
pub use assemble::assemble;
/// The static catalog of simulated commands.
pub use catalog::CommandCatalog;
/// Toggled flags and entered values for the active command.
pub use invocation::InvocationState;
/// The engine boundary object owning all session state.
pub use session::Session;
