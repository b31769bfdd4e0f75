use std::io::Cursor;

use image::io::{Limits, Reader};
use image::DynamicImage;
use log::debug;

use crate::error::{Error, Result};
use crate::matrix::{swap_red_blue, ColorSpace, PixelMatrix};
use crate::normalize::{MAX_BUFFER_BYTES, MAX_DIMENSION};

fn limits() -> Limits {
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_DIMENSION);
    limits.max_image_height = Some(MAX_DIMENSION);
    limits.max_alloc = Some(MAX_BUFFER_BYTES);
    limits
}

/// Decodes `bytes` with format sniffing. The result is labelled with the
/// canonical order (GRAY, BGR or BGRA).
pub fn decode(bytes: &[u8]) -> Result<PixelMatrix> {
    if bytes.is_empty() {
        return Err(Error::DecodeFailed("empty buffer".to_string()));
    }

    let mut reader = Reader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| Error::DecodeFailed(e.to_string()))?;
    reader.limits(limits());
    let image = reader
        .decode()
        .map_err(|e| Error::DecodeFailed(e.to_string()))?;

    debug!(
        "decoded {}x{} image with color type {:?}",
        image.width(),
        image.height(),
        image.color()
    );

    from_dynamic(image)
}

/// Narrows any decoded image to 8 bits per channel and reorders it to
/// GRAY/BGR/BGRA.
pub fn from_dynamic(image: DynamicImage) -> Result<PixelMatrix> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(Error::DecodeFailed(format!(
            "decoded image is empty ({}x{})",
            width, height
        )));
    }

    let (label, mut data) = match image {
        DynamicImage::ImageLuma8(buf) => (ColorSpace::Gray, buf.into_raw()),
        wide @ DynamicImage::ImageLuma16(_) => (ColorSpace::Gray, wide.into_luma8().into_raw()),
        DynamicImage::ImageRgb8(buf) => (ColorSpace::Bgr, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (ColorSpace::Bgra, buf.into_raw()),
        other if other.color().has_alpha() => (ColorSpace::Bgra, other.into_rgba8().into_raw()),
        other => (ColorSpace::Bgr, other.into_rgb8().into_raw()),
    };
    swap_red_blue(&mut data, label.channels());

    PixelMatrix::from_canonical(width, height, label, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageOutputFormat, Luma, Rgb, RgbImage, Rgba, RgbaImage};

    fn png_bytes(image: DynamicImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageOutputFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn rgb_png_becomes_bgr() {
        let img = RgbImage::from_pixel(2, 1, Rgb([10, 20, 30]));
        let m = decode(&png_bytes(DynamicImage::ImageRgb8(img))).unwrap();
        assert_eq!(m.label(), ColorSpace::Bgr);
        assert_eq!(m.data(), &[30, 20, 10, 30, 20, 10]);
    }

    #[test]
    fn rgba_png_becomes_bgra() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 4]));
        let m = decode(&png_bytes(DynamicImage::ImageRgba8(img))).unwrap();
        assert_eq!(m.label(), ColorSpace::Bgra);
        assert_eq!(m.data(), &[3, 2, 1, 4]);
    }

    #[test]
    fn gray_png_stays_single_channel() {
        let img = GrayImage::from_pixel(3, 2, Luma([99]));
        let m = decode(&png_bytes(DynamicImage::ImageLuma8(img))).unwrap();
        assert_eq!(m.label(), ColorSpace::Gray);
        assert_eq!((m.width(), m.height(), m.channels()), (3, 2, 1));
        assert!(m.data().iter().all(|&p| p == 99));
    }

    #[test]
    fn gray_alpha_is_widened_to_bgra() {
        let img = image::GrayAlphaImage::from_pixel(1, 1, image::LumaA([50, 200]));
        let m = from_dynamic(DynamicImage::ImageLumaA8(img)).unwrap();
        assert_eq!(m.label(), ColorSpace::Bgra);
        assert_eq!(m.data(), &[50, 50, 50, 200]);
    }

    #[test]
    fn garbage_fails_with_decode_failure() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, Error::DecodeFailed(_)));
    }

    #[test]
    fn empty_buffer_fails_with_decode_failure() {
        assert!(matches!(decode(&[]).unwrap_err(), Error::DecodeFailed(_)));
    }
}
