use clap::Command;

use super::{db, payment};

pub fn command() -> Command {
    Command::new("moneris")
        .about("runs moneris gateway operations against the configured store")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(payment::authorize_command())
        .subcommand(payment::purchase_command())
        .subcommand(payment::capture_command())
        .subcommand(payment::void_command())
        .subcommand(payment::credit_command())
        .subcommand(payment::add_card_command())
        .subcommand(payment::create_profile_command())
        .subcommand(payment::disable_profile_command())
        .subcommand(db::migrate_command())
        .subcommand(db::log_entries_command())
}
