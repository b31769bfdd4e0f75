//! Barcode engines behind one grayscale-only interface.
//!
//! Both engines report corners in the same labelling: `x1,y1` top-right,
//! `x2,y2` top-left, `x3,y3` bottom-left, `x4,y4` bottom-right. Each engine's
//! native point order is remapped explicitly in its `scan`.

use std::collections::HashSet;

use log::{debug, warn};
use maplit::{hashmap, hashset};
use rqrr::PreparedImage;
use rxing::{BarcodeFormat, DecodeHintType, DecodeHintValue, DecodingHintDictionary};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::matrix::PixelMatrix;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quad {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Corners {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub x3: i32,
    pub y3: i32,
    pub x4: i32,
    pub y4: i32,
}

impl From<Quad> for Corners {
    fn from(q: Quad) -> Self {
        Corners {
            x1: q.top_right.x,
            y1: q.top_right.y,
            x2: q.top_left.x,
            y2: q.top_left.y,
            x3: q.bottom_left.x,
            y3: q.bottom_left.y,
            x4: q.bottom_right.x,
            y4: q.bottom_right.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detection {
    #[serde(rename = "type")]
    pub symbology: String,
    pub data: String,
    pub points: Corners,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DecodeOutcome {
    Results { results: Vec<Detection> },
    Error { error: String },
}

impl DecodeOutcome {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

pub trait Decoder {
    fn scan(&self, width: u32, height: u32, luma: &[u8]) -> Vec<Detection>;

    /// Rejects anything but single-channel matrices, never converting.
    fn decode(&self, matrix: &PixelMatrix) -> Result<Vec<Detection>> {
        if matrix.channels() != 1 {
            return Err(Error::NotGrayscale {
                channels: matrix.channels(),
            });
        }
        Ok(self.scan(matrix.width(), matrix.height(), matrix.data()))
    }
}

#[derive(Debug, Default)]
pub struct QrScanner;

impl QrScanner {
    pub const SYMBOLOGY: &'static str = "QR-Code";

    pub fn new() -> Self {
        QrScanner
    }

    /// rqrr reports bounds clockwise from the top-left corner.
    pub fn quad_from_bounds(bounds: &[rqrr::Point; 4]) -> Quad {
        let p = |i: usize| Point::new(bounds[i].x, bounds[i].y);
        Quad {
            top_left: p(0),
            top_right: p(1),
            bottom_right: p(2),
            bottom_left: p(3),
        }
    }
}

impl Decoder for QrScanner {
    fn scan(&self, width: u32, height: u32, luma: &[u8]) -> Vec<Detection> {
        let w = width as usize;
        let mut img =
            PreparedImage::prepare_from_greyscale(w, height as usize, |x, y| luma[y * w + x]);
        let grids = img.detect_grids();
        debug!("rqrr found {} candidate grids", grids.len());

        grids
            .iter()
            .filter_map(|grid| match grid.decode() {
                Ok((_, content)) => Some(Detection {
                    symbology: Self::SYMBOLOGY.to_string(),
                    data: content,
                    points: Self::quad_from_bounds(&grid.bounds).into(),
                }),
                Err(e) => {
                    debug!("skipping undecodable grid: {:?}", e);
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Exhaustive search, including rotated symbols.
    pub try_harder: bool,
}

#[derive(Debug, Default)]
pub struct MultiFormatScanner {
    options: DecodeOptions,
}

impl MultiFormatScanner {
    /// The MaxiCode bullseye search walks rows and columns 6 px in from each
    /// edge and underflows on anything narrower.
    pub const MAXICODE_MIN_SIDE: u32 = 13;

    pub fn new(options: DecodeOptions) -> Self {
        MultiFormatScanner { options }
    }

    /// TRY_HARDER is always set explicitly; rxing turns it on when absent.
    fn hints(&self, width: u32, height: u32) -> DecodingHintDictionary {
        let mut hints = hashmap! {
            DecodeHintType::TRY_HARDER => DecodeHintValue::TryHarder(self.options.try_harder),
        };
        if width.min(height) < Self::MAXICODE_MIN_SIDE {
            debug!("{}x{} is too small for MaxiCode, skipping it", width, height);
            hints.insert(
                DecodeHintType::POSSIBLE_FORMATS,
                DecodeHintValue::PossibleFormats(formats_without_maxicode()),
            );
        }
        hints
    }

    /// Matrix codes come back as the four symbol corners clockwise from
    /// top-left. Linear codes give the two ends of the scan line.
    pub fn quad_from_points(points: &[(f32, f32)]) -> Quad {
        let p = |(x, y): (f32, f32)| Point::new(x.round() as i32, y.round() as i32);
        match *points {
            [tl, tr, br, bl, ..] => Quad {
                top_left: p(tl),
                top_right: p(tr),
                bottom_right: p(br),
                bottom_left: p(bl),
            },
            [left, right] => {
                let (left, right) = (p(left), p(right));
                Quad {
                    top_left: left,
                    top_right: right,
                    bottom_right: right,
                    bottom_left: left,
                }
            }
            _ => Quad::default(),
        }
    }
}

fn formats_without_maxicode() -> HashSet<BarcodeFormat> {
    hashset! {
        BarcodeFormat::AZTEC,
        BarcodeFormat::CODABAR,
        BarcodeFormat::CODE_39,
        BarcodeFormat::CODE_93,
        BarcodeFormat::CODE_128,
        BarcodeFormat::DATA_MATRIX,
        BarcodeFormat::EAN_8,
        BarcodeFormat::EAN_13,
        BarcodeFormat::ITF,
        BarcodeFormat::PDF_417,
        BarcodeFormat::QR_CODE,
        BarcodeFormat::MICRO_QR_CODE,
        BarcodeFormat::RSS_14,
        BarcodeFormat::RSS_EXPANDED,
        BarcodeFormat::TELEPEN,
        BarcodeFormat::UPC_A,
        BarcodeFormat::UPC_E,
    }
}

pub fn symbology_name(format: &BarcodeFormat) -> String {
    let name = match format {
        BarcodeFormat::AZTEC => "Aztec",
        BarcodeFormat::CODABAR => "Codabar",
        BarcodeFormat::CODE_39 => "Code39",
        BarcodeFormat::CODE_93 => "Code93",
        BarcodeFormat::CODE_128 => "Code128",
        BarcodeFormat::DATA_MATRIX => "DataMatrix",
        BarcodeFormat::EAN_8 => "EAN-8",
        BarcodeFormat::EAN_13 => "EAN-13",
        BarcodeFormat::ITF => "ITF",
        BarcodeFormat::MAXICODE => "MaxiCode",
        BarcodeFormat::PDF_417 => "PDF417",
        BarcodeFormat::QR_CODE => "QRCode",
        BarcodeFormat::RSS_14 => "DataBar",
        BarcodeFormat::RSS_EXPANDED => "DataBarExpanded",
        BarcodeFormat::UPC_A => "UPC-A",
        BarcodeFormat::UPC_E => "UPC-E",
        other => return format!("{:?}", other),
    };
    name.to_string()
}

impl Decoder for MultiFormatScanner {
    fn scan(&self, width: u32, height: u32, luma: &[u8]) -> Vec<Detection> {
        let mut hints = self.hints(width, height);
        let results = match rxing::helpers::detect_multiple_in_luma_with_hints(
            luma.to_vec(),
            width,
            height,
            &mut hints,
        ) {
            Ok(results) => results,
            Err(e) => {
                debug!("rxing found nothing: {:?}", e);
                return Vec::new();
            }
        };

        debug!("rxing decoded {} symbols", results.len());
        results
            .iter()
            .map(|result| {
                let points: Vec<(f32, f32)> =
                    result.getPoints().iter().map(|p| (p.x, p.y)).collect();
                if points.len() < 2 {
                    warn!("{:?} result carries no usable position", result.getBarcodeFormat());
                }
                Detection {
                    symbology: symbology_name(result.getBarcodeFormat()),
                    data: result.getText().to_string(),
                    points: Self::quad_from_points(&points).into(),
                }
            })
            .collect()
    }
}
