use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use lumen::framebuffer::FrameBuffer;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("could not write image: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode PNG: {0}")]
    Png(#[from] png::EncodingError),
}

/// Picks the format from the output extension; anything that is not `.png`
/// gets the plain-text PPM.
pub fn write_image<P: AsRef<Path>>(path: P, fb: &FrameBuffer) -> Result<(), WriteError> {
    let is_png = path
        .as_ref()
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("png"));

    if is_png {
        write_png(path, fb)
    } else {
        write_ppm(path, fb)
    }
}

/// P3 text format: magic, dimensions, max channel value, then row-major
/// R G B triples from the top left.
pub fn write_ppm<P: AsRef<Path>>(path: P, fb: &FrameBuffer) -> Result<(), WriteError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", fb.width(), fb.height())?;
    writeln!(writer, "255")?;

    for row in fb.rows() {
        let mut line = String::with_capacity(row.len() * 12);
        for pixel in row {
            line.push_str(&format!("{} {} {} ", pixel.r(), pixel.g(), pixel.b()));
        }
        writeln!(writer, "{}", line.trim_end())?;
    }

    writer.flush()?;

    Ok(())
}

pub fn write_png<P: AsRef<Path>>(path: P, fb: &FrameBuffer) -> Result<(), WriteError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, fb.width() as u32, fb.height() as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let data: Vec<u8> = fb
        .buffer()
        .iter()
        .flat_map(|pixel| pixel.to_bytes())
        .collect();

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&data)?;

    Ok(())
}
