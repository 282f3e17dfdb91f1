use anyhow::{Context, Result};
use gif87::{GifEncoder, Rgb, RgbPlanes};
use std::{fs::File, io::BufWriter};

fn main() -> Result<()> {
    env_logger::init();

    // Concentric rings, cycling through 16 shades of blue.
    let (width, height) = (320usize, 240usize);
    let planes = RgbPlanes::from_fn(width, height, |x, y| {
        let dx = x as i32 - width as i32 / 2;
        let dy = y as i32 - height as i32 / 2;
        let ring = ((dx * dx + dy * dy) as f64).sqrt() as u32 / 8 % 16;
        Rgb::new(0, ring as u8 * 8, 128 + ring as u8 * 8)
    })?;

    let encoder = GifEncoder::new(&planes)?;

    let path = std::env::temp_dir().join("rings.gif");
    let file = File::create(&path).with_context(|| format!("Creating {}", path.display()))?;
    encoder.write(BufWriter::new(file))?;

    println!(
        "Wrote {}x{} image with {} colors to {}",
        encoder.width(),
        encoder.height(),
        encoder.palette().used(),
        path.display()
    );

    Ok(())
}
