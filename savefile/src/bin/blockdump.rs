//! Print the blocks and records of a save file.
//!
//! usage: blockdump <path> [--versioned]

use std::env;

use anyhow::{bail, Context, Result};
use savefile::{Blockfile, BlockfileOptions, Format, Map, Mode, Value};

fn describe(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("{s:?}"),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
        Value::Bool(v) => v.to_string(),
        Value::Char(v) => v.to_string(),
        Value::Byte(v) => v.to_string(),
        Value::I16(v) => v.to_string(),
        Value::U16(v) => v.to_string(),
        Value::I32(v) => v.to_string(),
        Value::U32(v) => v.to_string(),
    }
}

fn main() -> Result<()> {
    let mut path = None;
    let mut options = BlockfileOptions::default();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--versioned" => options.format = Format::Versioned,
            _ if path.is_none() => path = Some(arg),
            _ => bail!("unexpected argument {arg:?}"),
        }
    }
    let Some(path) = path else {
        bail!("usage: blockdump <path> [--versioned]");
    };

    let mut bf = Blockfile::open_with(&path, Mode::Read, options)
        .with_context(|| format!("failed to load {path}"))?;

    println!("{}: {} blocks", path, bf.block_count());
    while let Some(block) = bf.next_block() {
        println!(
            "[{}] {} records, {} bytes",
            block.name(),
            block.record_count(),
            block.block_size()
        );
        let mut index = 0;
        while let Some(record) = block.next_record() {
            match Map::from_bytes(record) {
                Ok(map) => {
                    println!("  #{index}: map, {} entries", map.len());
                    for entry in map.iter() {
                        println!(
                            "    {} ({:?}) = {}",
                            entry.key(),
                            entry.value_type(),
                            describe(entry.value())
                        );
                    }
                }
                Err(_) => println!("  #{index}: {} raw bytes", record.len()),
            }
            index += 1;
        }
    }
    Ok(())
}
