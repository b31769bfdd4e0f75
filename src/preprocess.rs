use image::GrayImage;
use imageproc::contrast::{equalize_histogram, otsu_level, threshold};

use crate::error::Result;
use crate::matrix::{ColorSpace, PixelMatrix};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Original,
    Histogram,
    Otsu,
}

impl Method {
    pub fn apply(self, matrix: &PixelMatrix) -> Result<PixelMatrix> {
        let gray = to_gray_image(matrix);
        let out = match self {
            Method::Original => gray,
            Method::Histogram => equalize_histogram(&gray),
            Method::Otsu => binarize(&equalize_histogram(&gray)),
        };
        let (width, height) = out.dimensions();
        PixelMatrix::from_canonical(width, height, ColorSpace::Gray, out.into_raw())
    }
}

/// BT.601 luma of a canonical BGR(A) pixel, 14-bit fixed point.
fn luma(b: u8, g: u8, r: u8) -> u8 {
    const B: u32 = 1868;
    const G: u32 = 9617;
    const R: u32 = 4899;
    ((B * b as u32 + G * g as u32 + R * r as u32 + (1 << 13)) >> 14) as u8
}

pub fn to_gray(matrix: &PixelMatrix) -> Vec<u8> {
    let channels = matrix.channels();
    if channels == 1 {
        return matrix.data().to_vec();
    }
    matrix
        .data()
        .chunks_exact(channels)
        .map(|px| luma(px[0], px[1], px[2]))
        .collect()
}

fn to_gray_image(matrix: &PixelMatrix) -> GrayImage {
    let (width, height) = (matrix.width(), matrix.height());
    let mut gray = GrayImage::new(width, height);
    gray.copy_from_slice(&to_gray(matrix));
    gray
}

fn binarize(image: &GrayImage) -> GrayImage {
    threshold(image, otsu_level(image))
}
