//! PNG output

use crate::Result;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Encode `image` as PNG into `writer`
pub fn write_png<W: Write>(image: &RgbaImage, writer: W) -> Result<()> {
    PngEncoder::new(writer).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgba8,
    )?;
    Ok(())
}

/// Write `image` as a PNG file
pub fn save_png<P: AsRef<Path>>(image: &RgbaImage, path: P) -> Result<()> {
    let file = File::create(path.as_ref())
        .map_err(|e| format!("Failed to create '{}': {}", path.as_ref().display(), e))?;
    let mut writer = BufWriter::new(file);
    write_png(image, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// `<stem>.png` next to the input file
pub fn default_output_name<P: AsRef<Path>>(input: P) -> PathBuf {
    input.as_ref().with_extension("png")
}
