//! JavaScript bindings.
//!
//! Images arrive as either a `Uint8Array`/`Buffer` of encoded file contents
//! or a plain object `{ data, width, height, dtype?, colorSpace?, channels? }`.
//! Failures surface as a JS `Error` whose `name` is the error kind.

use std::borrow::Cow;

use js_sys::{Object, Reflect, Uint8Array, Uint8ClampedArray};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::decoder::DecodeOptions;
use crate::descriptor::{ImageDescriptor, Prop, RawDescriptor};
use crate::error::{Error, Result};
use crate::matrix::RawImage;
use crate::ops;
use crate::preprocess::Method;

impl From<Error> for JsValue {
    fn from(err: Error) -> Self {
        let js = js_sys::Error::new(&err.to_string());
        js.set_name(err.kind().as_str());
        js.into()
    }
}

fn bytes_of(value: &JsValue) -> Option<Vec<u8>> {
    if let Some(array) = value.dyn_ref::<Uint8Array>() {
        Some(array.to_vec())
    } else {
        value.dyn_ref::<Uint8ClampedArray>().map(|a| a.to_vec())
    }
}

fn to_prop(value: &JsValue) -> Prop<'static> {
    if value.is_null() || value.is_undefined() {
        Prop::Null
    } else if let Some(bytes) = bytes_of(value) {
        Prop::Bytes(Cow::Owned(bytes))
    } else if let Some(n) = value.as_f64() {
        Prop::Number(n)
    } else if let Some(s) = value.as_string() {
        Prop::Text(s)
    } else if let Some(b) = value.as_bool() {
        Prop::Bool(b)
    } else {
        Prop::Other
    }
}

fn read_prop(object: &JsValue, key: &str) -> Prop<'static> {
    let key = JsValue::from_str(key);
    match Reflect::has(object, &key) {
        Ok(true) => {}
        _ => return Prop::Absent,
    }
    Reflect::get(object, &key)
        .map(|value| to_prop(&value))
        .unwrap_or(Prop::Other)
}

fn descriptor_from_js(value: &JsValue) -> Result<ImageDescriptor<'static>> {
    if value.is_null() || value.is_undefined() {
        return Err(Error::NullField("image"));
    }
    if let Some(bytes) = bytes_of(value) {
        return Ok(ImageDescriptor::Encoded(Cow::Owned(bytes)));
    }
    if !value.is_object() {
        return Err(Error::InvalidInput("Expected Buffer or raw image object"));
    }

    Ok(ImageDescriptor::Raw(RawDescriptor {
        data: read_prop(value, "data"),
        width: read_prop(value, "width"),
        height: read_prop(value, "height"),
        dtype: read_prop(value, "dtype"),
        color_space: read_prop(value, "colorSpace"),
        channels: read_prop(value, "channels"),
    }))
}

fn raw_to_js(raw: &RawImage) -> Result<JsValue, JsValue> {
    let object = Object::new();
    Reflect::set(&object, &"width".into(), &raw.width.into())?;
    Reflect::set(&object, &"height".into(), &raw.height.into())?;
    Reflect::set(&object, &"colorSpace".into(), &raw.color_space.as_str().into())?;
    Reflect::set(&object, &"dtype".into(), &raw.dtype.into())?;
    Reflect::set(&object, &"data".into(), &Uint8Array::from(raw.data.as_slice()))?;
    Ok(object.into())
}

#[wasm_bindgen]
pub fn decode_rqrr(image: JsValue) -> Result<String, JsValue> {
    let input = descriptor_from_js(&image)?;
    Ok(ops::decode_qr(&input)?.to_json()?)
}

/// Decodes any supported symbology. `tryHarder` defaults to `false`.
#[wasm_bindgen]
pub fn decode_rxing(image: JsValue, try_harder: JsValue) -> Result<String, JsValue> {
    let input = descriptor_from_js(&image)?;
    let try_harder = if try_harder.is_undefined() {
        false
    } else {
        try_harder.as_bool().ok_or(Error::InvalidArgument {
            name: "tryHarder",
            expected: "a boolean",
        })?
    };
    Ok(ops::decode_multi(&input, DecodeOptions { try_harder })?.to_json()?)
}

fn preprocess_with(image: &JsValue, method: Method) -> Result<JsValue, JsValue> {
    let input = descriptor_from_js(image)?;
    raw_to_js(&ops::preprocess(&input, method)?)
}

#[wasm_bindgen]
pub fn preprocess_original(image: JsValue) -> Result<JsValue, JsValue> {
    preprocess_with(&image, Method::Original)
}

#[wasm_bindgen]
pub fn preprocess_histogram(image: JsValue) -> Result<JsValue, JsValue> {
    preprocess_with(&image, Method::Histogram)
}

#[wasm_bindgen]
pub fn preprocess_otsu(image: JsValue) -> Result<JsValue, JsValue> {
    preprocess_with(&image, Method::Otsu)
}

#[wasm_bindgen(js_name = convertImage)]
pub fn convert_image(image: JsValue) -> Result<JsValue, JsValue> {
    let input = descriptor_from_js(&image)?;
    raw_to_js(&ops::convert(&input)?)
}

#[wasm_bindgen(js_name = resizeImage)]
pub fn resize_image(image: JsValue, percentage: JsValue) -> Result<JsValue, JsValue> {
    let input = descriptor_from_js(&image)?;
    let percentage = percentage.as_f64().ok_or(Error::InvalidArgument {
        name: "percentage",
        expected: "a number",
    })?;
    raw_to_js(&ops::resize(&input, percentage)?)
}
