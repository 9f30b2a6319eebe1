use crate::app::cli::{help_text, parse_cli_verb, CliVerb};

pub mod check_schedule;
pub mod next;
pub mod reconstruct;

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }

    match parse_cli_verb(args[0].as_str()) {
        CliVerb::Reconstruct => reconstruct::cmd_reconstruct(&args[1..]),
        CliVerb::Next => next::cmd_next(&args[1..]),
        CliVerb::CheckSchedule => check_schedule::cmd_check_schedule(&args[1..]),
        CliVerb::Help => Ok(help_text()),
        CliVerb::Unknown => Err(format!("unknown command `{}`", args[0])),
    }
}
