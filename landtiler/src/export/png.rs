//! Colour-mapped PNG rendering.

use std::path::Path;

use image::{ImageFormat, RgbImage};
use rayon::prelude::*;
use tracing::debug;

use super::colormap::ColorMap;
use super::error::ExportError;
use crate::raster::RasterBuffer;

/// Renders `raster` to an RGB image, one pixel per cell.
///
/// Rows are coloured in parallel.
pub fn render_image(raster: &RasterBuffer, colormap: &ColorMap) -> Result<RgbImage, ExportError> {
    let (width, height) = (raster.width(), raster.height());
    let unrenderable = ExportError::UnrenderableSize { width, height };
    if width == 0 || height == 0 {
        return Err(unrenderable);
    }
    let (Ok(img_width), Ok(img_height)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(unrenderable);
    };

    let mut pixels = vec![0u8; width * height * 3];
    pixels
        .par_chunks_mut(width * 3)
        .enumerate()
        .for_each(|(r, out)| {
            for (px, code) in out.chunks_exact_mut(3).zip(raster.row(r)) {
                px.copy_from_slice(&colormap.color(*code).0);
            }
        });

    RgbImage::from_raw(img_width, img_height, pixels).ok_or(unrenderable)
}

/// Renders `raster` and writes it as a PNG file.
pub fn render_png(raster: &RasterBuffer, colormap: &ColorMap, path: &Path) -> Result<(), ExportError> {
    let image = render_image(raster, colormap)?;
    image.save_with_format(path, ImageFormat::Png)?;
    debug!(path = %path.display(), width = image.width(), height = image.height(), "Saved PNG");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_render_colours_each_cell() {
        let raster = RasterBuffer::from_cells(3, 2, vec![0, 13, 99, 17, 15, 0]).unwrap();
        let image = render_image(&raster, &ColorMap::modis_igbp()).unwrap();

        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(*image.get_pixel(0, 0), Rgb([0, 0, 255]));
        assert_eq!(*image.get_pixel(1, 0), Rgb([255, 0, 0]));
        assert_eq!(*image.get_pixel(2, 0), crate::export::FALLBACK_COLOR);
        assert_eq!(*image.get_pixel(0, 1), Rgb([0, 0, 0]));
        assert_eq!(*image.get_pixel(1, 1), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_render_empty_raster_fails() {
        let raster = RasterBuffer::from_cells(0, 0, vec![]).unwrap();
        assert!(matches!(
            render_image(&raster, &ColorMap::modis_igbp()),
            Err(ExportError::UnrenderableSize { .. })
        ));
    }

    #[test]
    fn test_render_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("landcover.png");
        let raster = RasterBuffer::from_cells(2, 2, vec![1, 2, 3, 4]).unwrap();

        render_png(&raster, &ColorMap::modis_igbp(), &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(*decoded.get_pixel(0, 0), Rgb([0, 100, 0]));
    }
}
