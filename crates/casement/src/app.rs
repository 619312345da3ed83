use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, value_parser};
use clap_complete::Shell;

pub fn build_cli() -> Command {
    Command::new("casement")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run a desktop app host and talk to it over the command bridge")
        .long_about("Casement hosts a UI surface inside native windows and exposes window control, file access, dialogs and app info to it through a typed command bridge. 'casement run' starts the host; the other commands are clients of a running host.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("runtime-dir")
                .long("runtime-dir")
                .help("Directory for the lock file and sockets (overrides config)")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Start the host in the foreground")
                .arg(
                    Arg::new("dev")
                        .long("dev")
                        .help("Load the UI from the development server and open devtools")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Use this config file instead of the user/project hierarchy")
                        .value_parser(value_parser!(PathBuf))
                )
        )
        .subcommand(
            Command::new("invoke")
                .about("Invoke a bridge command on the running host and print the response envelope")
                .arg(
                    Arg::new("command")
                        .help("Command name, e.g. window:getAllWindows")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("args")
                        .help("Positional arguments; each is parsed as JSON, or taken as a string if it is not valid JSON")
                        .num_args(0..)
                        .allow_hyphen_values(true)
                        .index(2)
                )
        )
        .subcommand(
            Command::new("windows")
                .about("List the host's open windows")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("quit")
                .about("Ask the running host to shut down")
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate completions for")
                        .required(true)
                        .value_parser(value_parser!(Shell))
                        .index(1)
                )
        )
}
