use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use photonwire_targeting::PipelineResult;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct DecodedOutput<'a> {
    packet_size: usize,
    trailing_bytes: usize,
    has_targets: bool,
    result: &'a PipelineResult,
}

/// Print a decoded result. `packet` is the exact byte span it was decoded from.
pub fn print_result(
    result: &PipelineResult,
    packet: &[u8],
    trailing_bytes: usize,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => print_json(&DecodedOutput {
            packet_size: result.packet_size(),
            trailing_bytes,
            has_targets: result.has_targets(),
            result,
        }),
        OutputFormat::Table => {
            println!(
                "latency: {} ms  timestamp: {} s  packet: {} bytes",
                result.latency_millis(),
                result.timestamp_seconds(),
                result.packet_size()
            );
            let multi = result.multi_tag_result();
            println!(
                "multi-tag: {}  ids: {:?}",
                if multi.estimated_pose.is_present {
                    "present"
                } else {
                    "none"
                },
                multi.fiducial_ids_used()
            );

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "FIDUCIAL", "YAW", "PITCH", "AREA", "SKEW", "AMBIGUITY"]);
            for (index, target) in result.targets().iter().enumerate() {
                table.add_row(vec![
                    index.to_string(),
                    target.fiducial_id.to_string(),
                    format!("{:.3}", target.yaw),
                    format!("{:.3}", target.pitch),
                    format!("{:.3}", target.area),
                    format!("{:.3}", target.skew),
                    format!("{:.3}", target.pose_ambiguity),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{result}");
        }
        OutputFormat::Raw => {
            print_raw(packet);
        }
    }
}

/// Print a serializable value as one line of JSON.
pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02x}")).collect()
}
