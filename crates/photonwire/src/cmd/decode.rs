use std::fs;
use std::io::Read;
use std::path::Path;

use photonwire_packet::Packet;
use photonwire_targeting::PipelineResult;

use crate::cmd::DecodeArgs;
use crate::exit::{io_error, packet_error, CliResult, SUCCESS};
use crate::output::{print_result, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let data = read_input(&args.path)?;
    let mut packet = Packet::from_bytes(&data);

    let mut result = PipelineResult::new();
    result
        .create_from_packet(&mut packet)
        .map_err(|err| packet_error("decode failed", err))?;
    if let Some(timestamp) = args.timestamp {
        result.set_timestamp_seconds(timestamp);
    }

    let consumed = packet.read_position();
    let trailing = packet.remaining();
    if trailing > 0 {
        tracing::warn!(trailing, consumed, "packet has bytes after the pipeline result");
    }
    tracing::debug!(targets = result.targets().len(), consumed, "decoded packet");

    print_result(&result, &data[..consumed], trailing, format);
    Ok(SUCCESS)
}

fn read_input(path: &Path) -> CliResult<Vec<u8>> {
    if path == Path::new("-") {
        let mut data = Vec::new();
        std::io::stdin()
            .read_to_end(&mut data)
            .map_err(|err| io_error("failed reading stdin", err))?;
        return Ok(data);
    }
    fs::read(path).map_err(|err| io_error(&format!("failed reading {}", path.display()), err))
}
