use std::fs;
use std::io::{IsTerminal, Read};
use std::path::Path;

use photonwire_targeting::PipelineResult;
use serde::Serialize;

use crate::cmd::EncodeArgs;
use crate::exit::{io_error, json_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{hex, print_json, print_raw, OutputFormat};

#[derive(Serialize)]
struct EncodeOutput<'a> {
    target_count: usize,
    packet_size: usize,
    out: Option<String>,
    packet_hex: &'a str,
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let document = resolve_document(&args)?;
    let result = parse_result(&document)?;

    let packet = result.to_packet();
    tracing::info!(
        targets = result.targets().len(),
        bytes = packet.len(),
        "encoded pipeline result"
    );

    if let Some(path) = &args.out {
        fs::write(path, packet.as_slice())
            .map_err(|err| io_error(&format!("failed writing {}", path.display()), err))?;
    }

    match format {
        OutputFormat::Raw if args.out.is_none() => print_raw(packet.as_slice()),
        OutputFormat::Raw => {}
        OutputFormat::Json => {
            let packet_hex = hex(packet.as_slice());
            print_json(&EncodeOutput {
                target_count: result.targets().len(),
                packet_size: packet.len(),
                out: args.out.as_ref().map(|p| p.display().to_string()),
                packet_hex: &packet_hex,
            });
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("targets: {}", result.targets().len());
            println!("packet:  {} bytes", packet.len());
            if let Some(path) = &args.out {
                println!("wrote:   {}", path.display());
            } else {
                println!("{}", hex(packet.as_slice()));
            }
        }
    }

    Ok(SUCCESS)
}

fn resolve_document(args: &EncodeArgs) -> CliResult<String> {
    if let Some(json) = &args.json {
        return Ok(json.clone());
    }
    match &args.file {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err)),
        Some(_) => read_stdin(),
        None if std::io::stdin().is_terminal() => Err(CliError::new(
            USAGE,
            "no input: pass --json, --file, or pipe a document on stdin",
        )),
        None => read_stdin(),
    }
}

fn read_stdin() -> CliResult<String> {
    let mut document = String::new();
    std::io::stdin()
        .read_to_string(&mut document)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(document)
}

/// Parse a pipeline result document. Unknown fields are ignored and missing
/// ones take their defaults; more than 255 targets is rejected.
fn parse_result(document: &str) -> CliResult<PipelineResult> {
    serde_json::from_str(document).map_err(|err| json_error("invalid pipeline result", err))
}
