use std::{io::Write, process::ExitCode};

use crate::header::Header;

use super::arg::HeaderCommand;

pub fn header(args: &HeaderCommand) -> anyhow::Result<ExitCode> {
    let mut output = super::io::open_output(&args.output)?;
    let mut exit_code = ExitCode::SUCCESS;

    let lines: Box<dyn Iterator<Item = std::io::Result<String>>> = if args.line.is_empty() {
        super::io::open_input(&args.input)?.lines()
    } else {
        Box::new(args.line.clone().into_iter().map(Ok))
    };

    for line in lines {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);

        if line.is_empty() {
            continue;
        }

        let parsed = if args.lenient {
            Ok(Header::parse_line_lenient(line))
        } else {
            Header::parse_line(line)
        };

        match parsed {
            Ok(Some(header)) => {
                serde_json::to_writer(&mut output, &header)?;
                output.write_all(b"\n")?;
            }
            Ok(None) => {
                tracing::warn!(line, "not a header line");
                exit_code = ExitCode::FAILURE;
            }
            Err(error) => {
                eprintln!("{}: {}", line, error);
                exit_code = ExitCode::FAILURE;
            }
        }
    }

    output.flush()?;

    Ok(exit_code)
}
