use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use photonwire_packet::{PacketRecord, F64_SIZE};
use photonwire_targeting::{MultiTargetPnpResult, TrackedTarget};
use serde::Serialize;

use crate::cmd::LayoutArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct LayoutField {
    offset: String,
    field: &'static str,
    width: String,
    encoding: &'static str,
}

#[derive(Serialize)]
struct LayoutOutput {
    fields: Vec<LayoutField>,
}

pub fn run(_args: LayoutArgs, format: OutputFormat) -> CliResult<i32> {
    let out = LayoutOutput {
        fields: layout_fields(),
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OFFSET", "FIELD", "WIDTH", "ENCODING"]);
            for f in &out.fields {
                table.add_row(vec![
                    f.offset.clone(),
                    f.field.to_string(),
                    f.width.clone(),
                    f.encoding.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for f in &out.fields {
                println!("{:>6}  {:<16} {:>10}  {}", f.offset, f.field, f.width, f.encoding);
            }
        }
    }
    Ok(SUCCESS)
}

fn layout_fields() -> Vec<LayoutField> {
    let multi = MultiTargetPnpResult::PACK_SIZE_BYTES;
    vec![
        LayoutField {
            offset: "0".to_string(),
            field: "latency_millis",
            width: F64_SIZE.to_string(),
            encoding: "f64, big-endian",
        },
        LayoutField {
            offset: F64_SIZE.to_string(),
            field: "multi_tag_result",
            width: multi.to_string(),
            encoding: "fixed record",
        },
        LayoutField {
            offset: (F64_SIZE + multi).to_string(),
            field: "target_count",
            width: "1".to_string(),
            encoding: "u8",
        },
        LayoutField {
            offset: (F64_SIZE + multi + 1).to_string(),
            field: "targets",
            width: format!("n x {}", TrackedTarget::PACK_SIZE_BYTES),
            encoding: "fixed records, in rank order",
        },
    ]
}
