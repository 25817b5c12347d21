use photonwire_packet::PacketRecord;
use photonwire_targeting::{MultiTargetPnpResult, TrackedTarget};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("photonwire {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: photonwire");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "build_target: {}",
        option_env!("PHOTONWIRE_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "build_profile: {}",
        option_env!("PHOTONWIRE_BUILD_PROFILE").unwrap_or("unknown")
    );
    println!("byte_order: big-endian");
    println!(
        "record_sizes: target={}, multi_tag={}",
        TrackedTarget::PACK_SIZE_BYTES,
        MultiTargetPnpResult::PACK_SIZE_BYTES
    );

    Ok(SUCCESS)
}
