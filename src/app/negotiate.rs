use std::process::ExitCode;

use anyhow::Context;

use super::arg::NegotiateCommand;

pub fn negotiate(args: &NegotiateCommand) -> anyhow::Result<ExitCode> {
    let found = crate::negotiate::negotiate(&args.accept, &args.supported)
        .context("malformed Accept value")?;

    match found {
        Some(media_type) => {
            println!("{}", media_type);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            tracing::info!(accept = %args.accept, "no acceptable media type");
            Ok(ExitCode::FAILURE)
        }
    }
}
