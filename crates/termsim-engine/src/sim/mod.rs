//! Output simulators: one evaluator per simulated command family.
//!
//! Every simulator is a function from the invocation state (plus read access
//! to the virtual filesystem and, for the firewall family, read/write access
//! to the rule store) to display text. Failures degrade to a message in the
//! simulated command's own error style; simulators never panic and never
//! return `Err` to the boundary.

pub mod content;
pub mod firewall;
pub mod listing;
pub mod net;
pub mod search;
pub mod textsearch;

use rand::rngs::StdRng;
use termsim_firewall::FirewallState;
use termsim_types::schema::CommandDefinition;
use termsim_vfs::VirtualFs;

use crate::invocation::InvocationState;

/// Mutable backing stores handed to the simulators.
pub struct SimContext<'a> {
    pub vfs: &'a mut VirtualFs,
    pub firewall: &'a mut FirewallState,
    pub rng: &'a mut StdRng,
}

/// Dispatch a selection to the matching simulator. Unrecognized commands
/// get a placeholder instead of an error.
pub fn simulate(def: &CommandDefinition, state: &InvocationState, ctx: &mut SimContext<'_>) -> String {
    log::debug!("simulating '{}'", def.id);
    match def.id {
        "ls" => listing::simulate(state, ctx.vfs),
        "cd" => content::change_directory(state, ctx.vfs),
        "pwd" => ctx.vfs.cursor().to_string(),
        "cat" => content::simulate(state, ctx.vfs),
        "find" => search::simulate(state, ctx.vfs),
        "grep" => textsearch::simulate(state, ctx.vfs),
        "ping" => net::ping(state, ctx.rng),
        "ps" => net::ps(state, ctx.rng),
        "top" => net::top(state, ctx.rng),
        "iptables" => firewall::simulate(state, ctx.firewall),
        other => format!("{other}: simulation not implemented yet"),
    }
}
