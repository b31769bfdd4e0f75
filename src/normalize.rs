//! Turns an [`ImageDescriptor`] into a [`PixelMatrix`] or a precise error.
//!
//! Raw descriptors are validated in a fixed order: geometry first, then the
//! buffer, then the optional layout hints. Channel layout is resolved by the
//! first applicable rule out of `colorSpace`, `channels` and the buffer
//! length; later rules are only consulted when the earlier fields are unset.

use log::debug;

use crate::codec;
use crate::descriptor::{ImageDescriptor, Prop, RawDescriptor};
use crate::error::{Error, Result};
use crate::matrix::{ColorSpace, PixelMatrix};

pub const MAX_DIMENSION: u32 = 32768;

pub const MAX_BUFFER_BYTES: u64 = 500 * 1024 * 1024;

pub fn normalize(input: &ImageDescriptor<'_>) -> Result<PixelMatrix> {
    match input {
        ImageDescriptor::Encoded(bytes) => codec::decode(bytes),
        ImageDescriptor::Raw(raw) => normalize_raw(raw),
    }
}

pub fn normalize_raw(raw: &RawDescriptor<'_>) -> Result<PixelMatrix> {
    let width = dimension("width", &raw.width)?;
    let height = dimension("height", &raw.height)?;

    let data: &[u8] = match &raw.data {
        Prop::Absent => return Err(Error::MissingField("data")),
        Prop::Null => return Err(Error::NullField("data")),
        Prop::Bytes(bytes) => bytes.as_ref(),
        _ => {
            return Err(Error::TypeMismatch {
                field: "data",
                expected: "a Buffer",
            })
        }
    };

    let dtype = optional_text("dtype", &raw.dtype)?;
    let color_space = optional_text("colorSpace", &raw.color_space)?;
    if !matches!(raw.channels, Prop::Absent | Prop::Null | Prop::Number(_) | Prop::Text(_)) {
        return Err(Error::TypeMismatch {
            field: "channels",
            expected: "a number or string",
        });
    }

    if let Some(dtype) = dtype {
        if dtype != "uint8" {
            return Err(Error::UnsupportedDtype(dtype.to_string()));
        }
    }

    let label = resolve_layout(color_space, &raw.channels, data.len(), width, height)?;
    let channels = label.channels();

    let expected = width as u64 * height as u64 * channels as u64;
    if expected > MAX_BUFFER_BYTES {
        return Err(Error::CapacityExceeded {
            bytes: expected,
            max: MAX_BUFFER_BYTES,
        });
    }
    if data.len() as u64 != expected {
        return Err(Error::SizeMismatch {
            expected,
            actual: data.len(),
            width,
            height,
            channels,
        });
    }

    debug!("normalized {}x{} raw image as {}", width, height, label);
    PixelMatrix::copy_from(width, height, label, data)
}

/// Reads a required width/height the way a host int32 conversion would:
/// truncated toward zero, then range checked.
fn dimension(field: &'static str, prop: &Prop<'_>) -> Result<u32> {
    let value = match prop {
        Prop::Absent => return Err(Error::MissingField(field)),
        Prop::Null => return Err(Error::NullField(field)),
        Prop::Number(n) if n.is_finite() => n.trunc() as i64,
        Prop::Number(_) => 0,
        _ => {
            return Err(Error::TypeMismatch {
                field,
                expected: "a number",
            })
        }
    };

    if value <= 0 {
        return Err(Error::NonPositiveDimension { field, value });
    }
    if value > MAX_DIMENSION as i64 {
        return Err(Error::DimensionTooLarge {
            field,
            value,
            max: MAX_DIMENSION,
        });
    }
    Ok(value as u32)
}

fn optional_text<'p>(field: &'static str, prop: &'p Prop<'_>) -> Result<Option<&'p str>> {
    match prop {
        Prop::Absent | Prop::Null => Ok(None),
        Prop::Text(s) => Ok(Some(s.as_str())),
        _ => Err(Error::TypeMismatch {
            field,
            expected: "a string",
        }),
    }
}

fn resolve_layout(
    color_space: Option<&str>,
    channels: &Prop<'_>,
    len: usize,
    width: u32,
    height: u32,
) -> Result<ColorSpace> {
    if let Some(name) = color_space {
        return name.parse();
    }

    match channels {
        Prop::Number(n) => {
            if n.fract() != 0.0 {
                return Err(Error::UnsupportedChannels(*n));
            }
            return ColorSpace::default_for(*n as usize).ok_or(Error::UnsupportedChannels(*n));
        }
        Prop::Text(label) => {
            let order = label.split_once('_').map_or(label.as_str(), |(_, rest)| rest);
            match order.parse::<ColorSpace>() {
                Ok(cs) => return Ok(cs),
                Err(_) => debug!("channels label {:?} names no order, inferring", label),
            }
        }
        _ => {}
    }

    let pixels = width as u64 * height as u64;
    if len as u64 % pixels != 0 {
        return Err(Error::IndivisibleLength { len, pixels });
    }
    let inferred = (len as u64 / pixels) as usize;
    ColorSpace::default_for(inferred).ok_or(Error::UninferableChannels(inferred))
}
