//! meshbin - Wavefront OBJ to binary mesh converter
//!
//! Usage:
//!   meshbin model.obj                    Convert to model.bin
//!   meshbin model.obj -o assets/m.bin    Convert to an explicit path
//!   meshbin model.obj --dump-json m.json Also dump the built surfaces

use anyhow::{Context, Result};
use clap::Parser;
use meshbin_io::{encoder, obj, DirSource};
use std::fs;
use std::path::{Path, PathBuf};

/// Convert Wavefront OBJ/MTL geometry into the runtime binary mesh format.
#[derive(Parser)]
#[command(name = "meshbin", version, about)]
struct Args {
    /// Input OBJ file; mtllib references resolve relative to it
    input: PathBuf,

    /// Output path, defaults to the input with a .bin extension
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the built surface list as JSON, for debugging
    #[arg(long, value_name = "PATH")]
    dump_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let root = args.input.parent().unwrap_or_else(|| Path::new("."));

    let document = obj::parse_document(&text, &DirSource::new(root))
        .with_context(|| format!("failed to convert {}", args.input.display()))?;

    if let Some(path) = &args.dump_json {
        let json = serde_json::to_string_pretty(&document.surfaces)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    }

    let bytes = encoder::encode(&document.surfaces, &document.materials)
        .with_context(|| format!("failed to encode {}", args.input.display()))?;

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("bin"));
    fs::write(&output, &bytes).with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "{} -> {} ({} surfaces, {} bytes)",
        args.input.display(),
        output.display(),
        document.surfaces.len(),
        bytes.len()
    );
    Ok(())
}
