//! Boundary operations. Every entry point goes through [`normalize`] first
//! and hands the resulting matrix to exactly one consumer.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma, Pixel, Rgb, Rgba};
use log::debug;

use crate::decoder::{DecodeOptions, DecodeOutcome, Decoder, MultiFormatScanner, QrScanner};
use crate::descriptor::ImageDescriptor;
use crate::error::{Error, Result};
use crate::matrix::{PixelMatrix, RawImage};
use crate::normalize::normalize;
use crate::preprocess::Method;

pub fn decode_qr(input: &ImageDescriptor<'_>) -> Result<DecodeOutcome> {
    run_decoder(&QrScanner::new(), input)
}

pub fn decode_multi(input: &ImageDescriptor<'_>, options: DecodeOptions) -> Result<DecodeOutcome> {
    run_decoder(&MultiFormatScanner::new(options), input)
}

/// Input problems propagate as errors; a colour matrix reaching the
/// engine is reported inside the outcome.
fn run_decoder<D: Decoder>(decoder: &D, input: &ImageDescriptor<'_>) -> Result<DecodeOutcome> {
    let matrix = normalize(input)?;
    match decoder.decode(&matrix) {
        Ok(results) => Ok(DecodeOutcome::Results { results }),
        Err(e @ Error::NotGrayscale { .. }) => Ok(DecodeOutcome::Error {
            error: e.to_string(),
        }),
        Err(e) => Err(e),
    }
}

pub fn preprocess(input: &ImageDescriptor<'_>, method: Method) -> Result<RawImage> {
    let matrix = normalize(input)?;
    Ok(method.apply(&matrix)?.to_raw())
}

pub fn convert(input: &ImageDescriptor<'_>) -> Result<RawImage> {
    Ok(normalize(input)?.to_raw())
}

pub fn resize(input: &ImageDescriptor<'_>, percentage: f64) -> Result<RawImage> {
    let matrix = normalize(input)?;
    if !percentage.is_finite() || percentage <= 0.0 || percentage > 100.0 {
        return Err(Error::InvalidPercentage(percentage));
    }
    if percentage == 100.0 {
        return Ok(matrix.to_raw());
    }
    Ok(scale(&matrix, percentage / 100.0)?.to_raw())
}

fn scaled_dimension(size: u32, factor: f64) -> u32 {
    ((size as f64 * factor).round() as u32).max(1)
}

pub fn scale(matrix: &PixelMatrix, factor: f64) -> Result<PixelMatrix> {
    let width = scaled_dimension(matrix.width(), factor);
    let height = scaled_dimension(matrix.height(), factor);
    debug!(
        "resizing {}x{} -> {}x{}",
        matrix.width(),
        matrix.height(),
        width,
        height
    );

    let data = match matrix.channels() {
        1 => resample::<Luma<u8>>(matrix, width, height),
        3 => resample::<Rgb<u8>>(matrix, width, height),
        _ => resample::<Rgba<u8>>(matrix, width, height),
    }?;
    PixelMatrix::from_canonical(width, height, matrix.label(), data)
}

fn resample<P>(matrix: &PixelMatrix, width: u32, height: u32) -> Result<Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let src: ImageBuffer<P, Vec<u8>> =
        ImageBuffer::from_raw(matrix.width(), matrix.height(), matrix.data().to_vec()).ok_or(
            Error::SizeMismatch {
                expected: matrix.width() as u64
                    * matrix.height() as u64
                    * P::CHANNEL_COUNT as u64,
                actual: matrix.data().len(),
                width: matrix.width(),
                height: matrix.height(),
                channels: P::CHANNEL_COUNT as usize,
            },
        )?;
    Ok(imageops::resize(&src, width, height, FilterType::Triangle).into_raw())
}
