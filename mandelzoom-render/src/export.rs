//! PNG snapshots of rendered frames, with view metadata as tEXt chunks.

use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use mandelzoom_core::ViewState;

use crate::frame::PixelBuffer;

/// Metadata embedded in an exported snapshot.
pub struct SnapshotInfo {
    pub view: ViewState,
    pub threshold: u32,
    pub scheme: String,
}

/// Write a frame to `path` as an RGBA PNG.
///
/// The view coordinates go into tEXt chunks so a deep zoom can be located
/// again from the image file alone.
pub fn export_png(frame: &PixelBuffer, path: &Path, info: &SnapshotInfo) -> crate::Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, frame.width, frame.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    encoder.add_text_chunk("Software".into(), "mandelzoom".into())?;
    encoder.add_text_chunk(
        "mandelzoom.TopLeft".into(),
        format!("{} {}", info.view.top_left.re, info.view.top_left.im),
    )?;
    encoder.add_text_chunk(
        "mandelzoom.Scale".into(),
        format!("{} {}", info.view.x_scale, info.view.y_scale),
    )?;
    encoder.add_text_chunk("mandelzoom.Threshold".into(), info.threshold.to_string())?;
    encoder.add_text_chunk("mandelzoom.Scheme".into(), info.scheme.clone())?;

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&frame.pixels)?;

    debug!(
        width = frame.width,
        height = frame.height,
        path = %path.display(),
        "snapshot written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn sample_info() -> SnapshotInfo {
        SnapshotInfo {
            view: ViewState::initial(4, 4).unwrap(),
            threshold: 800,
            scheme: "smooth/classic".into(),
        }
    }

    #[test]
    fn export_writes_a_valid_png() {
        let frame = PixelBuffer::new(4, 4);
        let dir = std::env::temp_dir().join("mandelzoom_export_test");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("snapshot.png");

        export_png(&frame, &path, &sample_info()).unwrap();

        let mut file = std::fs::File::open(&path).unwrap();
        let mut header = [0u8; 8];
        file.read_exact(&mut header).unwrap();
        assert_eq!(&header, b"\x89PNG\r\n\x1a\n");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_embeds_view_metadata() {
        let frame = PixelBuffer::new(2, 2);
        let dir = std::env::temp_dir().join("mandelzoom_export_meta_test");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("meta.png");

        export_png(&frame, &path, &sample_info()).unwrap();

        let decoder = png::Decoder::new(std::fs::File::open(&path).unwrap());
        let reader = decoder.read_info().unwrap();
        let texts = &reader.info().uncompressed_latin1_text;
        assert!(texts
            .iter()
            .any(|t| t.keyword == "Software" && t.text == "mandelzoom"));
        assert!(texts.iter().any(|t| t.keyword == "mandelzoom.Threshold" && t.text == "800"));
        assert!(texts.iter().any(|t| t.keyword == "mandelzoom.TopLeft"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
