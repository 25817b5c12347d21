use photonwire_packet::PacketRecord;
use photonwire_targeting::{
    packet_size_for, MultiTargetPnpResult, TargetingError, TrackedTarget, EMPTY_PACKET_SIZE,
    MAX_TARGETS,
};
use serde::Serialize;

use crate::cmd::SizeArgs;
use crate::exit::{targeting_error, CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct SizeOutput {
    target_count: usize,
    packet_size: usize,
    fixed_bytes: usize,
    target_bytes: usize,
    multi_tag_bytes: usize,
}

pub fn run(args: SizeArgs, format: OutputFormat) -> CliResult<i32> {
    let out = size_for(args.targets).map_err(|err| targeting_error("invalid size", err))?;

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!(
                "{} targets x {} B + {} B fixed = {} bytes",
                out.target_count, out.target_bytes, out.fixed_bytes, out.packet_size
            );
        }
        OutputFormat::Raw => println!("{}", out.packet_size),
    }
    Ok(SUCCESS)
}

fn size_for(target_count: usize) -> Result<SizeOutput, TargetingError> {
    if target_count > MAX_TARGETS {
        return Err(TargetingError::TooManyTargets {
            count: target_count,
            max: MAX_TARGETS,
        });
    }
    Ok(SizeOutput {
        target_count,
        packet_size: packet_size_for(target_count),
        fixed_bytes: EMPTY_PACKET_SIZE,
        target_bytes: TrackedTarget::PACK_SIZE_BYTES,
        multi_tag_bytes: MultiTargetPnpResult::PACK_SIZE_BYTES,
    })
}
