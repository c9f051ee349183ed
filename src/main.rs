mod alpha_bleed;
mod atlas;
mod commands;
mod data;
mod discover;
mod image;
mod input_name;
mod options;

use std::process;

use structopt::StructOpt;

use crate::options::{Options, Subcommand};

fn main() {
    let options = Options::from_args();

    let log_filter = match options.global.verbosity {
        0 => "info",
        1 => "info,texatlas=debug,gridpack=debug",
        _ => "info,texatlas=trace,gridpack=trace",
    };

    let log_env = env_logger::Env::default().default_filter_or(log_filter);
    env_logger::Builder::from_env(log_env)
        .format_module_path(false)
        .init();

    if let Err(err) = run(options) {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run(options: Options) -> anyhow::Result<()> {
    match options.command {
        Subcommand::Build(build_options) => commands::build(build_options)?,
        Subcommand::List(list_options) => commands::list(list_options)?,
    }

    Ok(())
}
