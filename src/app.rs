use std::process::ExitCode;

use clap::Parser;

use self::arg::Args;
use self::arg::Command;

mod arg;
mod fetch;
mod header;
mod io;
mod logging;
mod negotiate;

pub fn run() -> ExitCode {
    match run_impl() {
        Ok(exit_code) => exit_code,
        Err(error) => {
            tracing::error!(?error);
            eprintln!("{:#}", error);
            ExitCode::FAILURE
        }
    }
}

fn run_impl() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    self::logging::set_up_logging(args.log_level, args.log_file.as_deref(), args.log_json)?;

    let exit_code = match args.command {
        Command::Negotiate(args) => self::negotiate::negotiate(&args)?,
        Command::Header(args) => self::header::header(&args)?,
        Command::Fetch(args) => {
            self::fetch::fetch(&args)?;
            ExitCode::SUCCESS
        }
    };

    Ok(exit_code)
}
