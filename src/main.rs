mod app;

use app::cli::Cli;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Cli::parse();
    let debug = args.debug;

    let default_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();

    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if debug {
                log::error!("{:?}", err);
            } else {
                log::error!("{:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}
