//! `stockscan decode`: run the decode stage on still images.
//!
//! Handy for checking that a label prints legibly before it goes on the
//! shelf. Never opens the inventory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use stockscan_scanner::{DecodedCode, Frame, FrameDecoder, RxingDecoder};

#[derive(Debug, Serialize)]
struct ImageCodes {
    image: PathBuf,
    codes: Vec<DecodedCode>,
}

pub fn run(images: &[PathBuf], json: bool) -> Result<()> {
    let decoder = RxingDecoder::new();

    let results = images
        .iter()
        .enumerate()
        .map(|(i, path)| decode_image(&decoder, path, i as u64 + 1))
        .collect::<Result<Vec<_>>>()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for result in &results {
        if result.codes.is_empty() {
            println!("{}: no barcode found", result.image.display());
        }
        for code in &result.codes {
            println!("{}: {} ({})", result.image.display(), code.text, code.format);
        }
    }
    Ok(())
}

fn decode_image(decoder: &impl FrameDecoder, path: &Path, sequence: u64) -> Result<ImageCodes> {
    let image = image::open(path).with_context(|| format!("Cannot read image {}", path.display()))?;
    let frame = Frame::from_dynamic(image, sequence);

    Ok(ImageCodes {
        image: path.to_path_buf(),
        codes: decoder.decode(&frame),
    })
}
