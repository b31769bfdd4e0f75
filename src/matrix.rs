use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColorSpace {
    Gray,
    Rgb,
    Bgr,
    Rgba,
    Bgra,
}

impl ColorSpace {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorSpace::Gray => "GRAY",
            ColorSpace::Rgb => "RGB",
            ColorSpace::Bgr => "BGR",
            ColorSpace::Rgba => "RGBA",
            ColorSpace::Bgra => "BGRA",
        }
    }

    pub fn channels(self) -> usize {
        match self {
            ColorSpace::Gray => 1,
            ColorSpace::Rgb | ColorSpace::Bgr => 3,
            ColorSpace::Rgba | ColorSpace::Bgra => 4,
        }
    }

    /// Order assumed when only the channel count is known.
    pub fn default_for(channels: usize) -> Option<ColorSpace> {
        match channels {
            1 => Some(ColorSpace::Gray),
            3 => Some(ColorSpace::Rgb),
            4 => Some(ColorSpace::Rgba),
            _ => None,
        }
    }

    /// Whether bytes in this order differ from the canonical order by a
    /// red/blue swap.
    pub fn is_red_first(self) -> bool {
        matches!(self, ColorSpace::Rgb | ColorSpace::Rgba)
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorSpace {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "GRAY" => Ok(ColorSpace::Gray),
            "RGB" => Ok(ColorSpace::Rgb),
            "BGR" => Ok(ColorSpace::Bgr),
            "RGBA" => Ok(ColorSpace::Rgba),
            "BGRA" => Ok(ColorSpace::Bgra),
            other => Err(Error::UnsupportedColorSpace(other.to_string())),
        }
    }
}

/// Swaps the first and third byte of every pixel (RGB <-> BGR, RGBA <-> BGRA).
pub fn swap_red_blue(data: &mut [u8], channels: usize) {
    if channels < 3 {
        return;
    }
    for pixel in data.chunks_exact_mut(channels) {
        pixel.swap(0, 2);
    }
}

/// Owned, tightly packed 8-bit image in GRAY/BGR/BGRA byte order.
///
/// `label` records which order the image had when it entered the crate; it
/// decides how [`PixelMatrix::to_raw`] writes the bytes back out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelMatrix {
    width: u32,
    height: u32,
    label: ColorSpace,
    data: Vec<u8>,
}

impl PixelMatrix {
    /// Wraps bytes that are already in canonical order.
    pub fn from_canonical(
        width: u32,
        height: u32,
        label: ColorSpace,
        data: Vec<u8>,
    ) -> Result<Self> {
        let channels = label.channels();
        let expected = width as u64 * height as u64 * channels as u64;
        if data.len() as u64 != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
                width,
                height,
                channels,
            });
        }
        Ok(PixelMatrix {
            width,
            height,
            label,
            data,
        })
    }

    /// Copies `src`, which is laid out in `label` order, into a fresh
    /// canonical buffer.
    pub fn copy_from(width: u32, height: u32, label: ColorSpace, src: &[u8]) -> Result<Self> {
        let mut data = Vec::with_capacity(src.len());
        data.extend_from_slice(src);
        if label.is_red_first() {
            swap_red_blue(&mut data, label.channels());
        }
        PixelMatrix::from_canonical(width, height, label, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.label.channels()
    }

    pub fn label(&self) -> ColorSpace {
        self.label
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn to_raw(&self) -> RawImage {
        let mut data = self.data.clone();
        if self.label.is_red_first() {
            swap_red_blue(&mut data, self.channels());
        }
        RawImage {
            width: self.width,
            height: self.height,
            color_space: self.label,
            dtype: "uint8",
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImage {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub dtype: &'static str,
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_space_round_trips_through_strings() {
        for cs in [
            ColorSpace::Gray,
            ColorSpace::Rgb,
            ColorSpace::Bgr,
            ColorSpace::Rgba,
            ColorSpace::Bgra,
        ] {
            assert_eq!(cs.as_str().parse::<ColorSpace>().unwrap(), cs);
        }
        assert!("HSV".parse::<ColorSpace>().is_err());
        assert!("rgb".parse::<ColorSpace>().is_err());
    }

    #[test]
    fn swap_only_touches_first_and_third_byte() {
        let mut rgba = vec![1, 2, 3, 4, 5, 6, 7, 8];
        swap_red_blue(&mut rgba, 4);
        assert_eq!(rgba, vec![3, 2, 1, 4, 7, 6, 5, 8]);

        let mut gray = vec![1, 2, 3];
        swap_red_blue(&mut gray, 1);
        assert_eq!(gray, vec![1, 2, 3]);
    }

    #[test]
    fn copy_from_rgb_stores_bgr() {
        let src = [10, 20, 30];
        let m = PixelMatrix::copy_from(1, 1, ColorSpace::Rgb, &src).unwrap();
        assert_eq!(m.data(), &[30, 20, 10]);
        assert_eq!(m.label(), ColorSpace::Rgb);
        assert_ne!(m.data().as_ptr(), src.as_ptr());
    }

    #[test]
    fn to_raw_writes_label_order_back() {
        let src = [10, 20, 30, 40, 50, 60];
        let m = PixelMatrix::copy_from(2, 1, ColorSpace::Rgb, &src).unwrap();
        let raw = m.to_raw();
        assert_eq!(raw.data, src);
        assert_eq!(raw.color_space, ColorSpace::Rgb);
        assert_eq!(raw.dtype, "uint8");
    }

    #[test]
    fn from_canonical_rejects_wrong_length() {
        let err = PixelMatrix::from_canonical(2, 2, ColorSpace::Bgr, vec![0; 11]).unwrap_err();
        assert!(matches!(
            err,
            Error::SizeMismatch {
                expected: 12,
                actual: 11,
                ..
            }
        ));
    }

    #[test]
    fn raw_image_serializes_with_wire_names() {
        let m = PixelMatrix::from_canonical(1, 1, ColorSpace::Gray, vec![7]).unwrap();
        let json = serde_json::to_string(&m.to_raw()).unwrap();
        assert_eq!(
            json,
            r#"{"width":1,"height":1,"colorSpace":"GRAY","dtype":"uint8","data":[7]}"#
        );
    }
}
