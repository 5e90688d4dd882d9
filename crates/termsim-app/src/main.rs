//! termsim demo entry point.
//!
//! A line-oriented driver for the engine, meant for development and manual
//! testing: pick a command, toggle flags, fill values, then `run` to see the
//! assembled command line next to its simulated output.
//!
//! Set `TERMSIM_SEED` to make the network simulators reproducible.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use termsim_engine::Session;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut session = match std::env::var("TERMSIM_SEED").ok().and_then(|s| s.parse().ok()) {
        Some(seed) => Session::with_seed(seed)?,
        None => Session::new()?,
    };

    log::info!(
        "termsim started: {} commands, {} scenarios",
        session.catalog().commands().len(),
        session.scenarios().count(),
    );
    println!("termsim -- type 'help' for driver commands, 'quit' to exit.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("termsim:{}> ", session.current_path());
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }
        let response = dispatch(&mut session, line);
        if !response.is_empty() {
            println!("{response}");
        }
    }
    Ok(())
}

const HELP: &str = "\
Driver commands:
  commands              list the simulated commands
  use <name>            select a command
  options               show the selected command's parameter options
  flag <token>          toggle a boolean flag (e.g. flag -l)
  set <key> <value...>  record a parameter value (e.g. set path /var/log)
  clear                 reset the selection to its defaults
  show                  print the assembled command line
  run                   print the command line and its simulated output
  scenario [id]         list scenarios, or switch to one
  pwd                   print the current working directory
  quit                  exit";

fn dispatch(session: &mut Session, line: &str) -> String {
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((v, r)) => (v, r.trim()),
        None => (line, ""),
    };
    match verb {
        "help" => HELP.to_string(),
        "commands" => session
            .catalog()
            .commands()
            .iter()
            .map(|d| format!("  {:<10} {}", d.name, d.description))
            .collect::<Vec<_>>()
            .join("\n"),
        "use" => match session.select_command(rest) {
            Ok(()) => format!("using '{rest}'"),
            Err(e) => e.to_string(),
        },
        "options" => match session.active_command() {
            Some(def) => def
                .options
                .iter()
                .map(|o| {
                    let flag = if o.flag.is_empty() { "(positional)" } else { o.flag };
                    format!("  {flag:<14} key={:<14} {}", o.key, o.label)
                })
                .collect::<Vec<_>>()
                .join("\n"),
            None => "no command selected".to_string(),
        },
        "flag" => match session.toggle_flag(rest) {
            Ok(true) => format!("{rest} on"),
            Ok(false) => format!("{rest} off"),
            Err(e) => e.to_string(),
        },
        "set" => match rest.split_once(char::is_whitespace) {
            Some((key, value)) => match session.set_input(key, value.trim()) {
                Ok(()) => format!("{key} = {}", value.trim()),
                Err(e) => e.to_string(),
            },
            None => "usage: set <key> <value...>".to_string(),
        },
        "clear" => {
            session.clear_selection();
            "selection cleared".to_string()
        },
        "show" => format!("$ {}", session.assemble_command_string()),
        "run" => {
            let assembled = session.assemble_command_string();
            let output = session.simulate_output();
            format!("$ {assembled}\n{output}")
        },
        "scenario" => {
            if rest.is_empty() {
                session
                    .scenarios()
                    .map(|s| format!("  {:<10} {}", s.id, s.description))
                    .collect::<Vec<_>>()
                    .join("\n")
            } else {
                match session.switch_scenario(rest) {
                    Ok(()) => format!("scenario '{rest}', cwd {}", session.current_path()),
                    Err(e) => e.to_string(),
                }
            }
        },
        "pwd" => session.current_path().to_string(),
        other => format!("unknown driver command: {other} (try 'help')"),
    }
}
