#![cfg(target_arch = "wasm32")]

use barcode_engine::wasm::{convert_image, decode_rqrr, decode_rxing, preprocess_otsu, resize_image};
use js_sys::{Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

fn raw_object(data: &[u8], width: u32, height: u32, color_space: Option<&str>) -> JsValue {
    let obj = Object::new();
    Reflect::set(&obj, &"data".into(), &Uint8Array::from(data)).unwrap();
    Reflect::set(&obj, &"width".into(), &width.into()).unwrap();
    Reflect::set(&obj, &"height".into(), &height.into()).unwrap();
    if let Some(cs) = color_space {
        Reflect::set(&obj, &"colorSpace".into(), &cs.into()).unwrap();
    }
    obj.into()
}

fn get(obj: &JsValue, key: &str) -> JsValue {
    Reflect::get(obj, &key.into()).unwrap()
}

fn error_name(err: JsValue) -> String {
    err.dyn_into::<js_sys::Error>().unwrap().name().into()
}

#[wasm_bindgen_test]
fn convert_returns_a_fresh_raw_object() {
    let data = [10u8, 20, 30, 40, 50, 60];
    let out = convert_image(raw_object(&data, 2, 1, Some("RGB"))).unwrap();
    assert_eq!(get(&out, "width").as_f64(), Some(2.0));
    assert_eq!(get(&out, "colorSpace").as_string().as_deref(), Some("RGB"));
    assert_eq!(get(&out, "dtype").as_string().as_deref(), Some("uint8"));
    let bytes: Uint8Array = get(&out, "data").dyn_into().unwrap();
    assert_eq!(bytes.to_vec(), data);
}

#[wasm_bindgen_test]
fn errors_carry_their_kind_as_name() {
    let err = convert_image(raw_object(&[0; 10], 2, 2, Some("RGB"))).unwrap_err();
    assert_eq!(error_name(err), "SizeMismatch");

    let err = convert_image(JsValue::NULL).unwrap_err();
    assert_eq!(error_name(err), "MissingField");

    let err = convert_image(42.into()).unwrap_err();
    assert_eq!(error_name(err), "TypeMismatch");

    let err = convert_image(Object::new().into()).unwrap_err();
    assert_eq!(error_name(err), "MissingField");

    let err = resize_image(raw_object(&[0; 4], 2, 2, None), 0.into()).unwrap_err();
    assert_eq!(error_name(err), "StructuralError");

    let err = resize_image(raw_object(&[0; 4], 2, 2, None), "50".into()).unwrap_err();
    assert_eq!(error_name(err), "TypeMismatch");
}

#[wasm_bindgen_test]
fn decoders_return_json() {
    let blank = raw_object(&[255; 64 * 64], 64, 64, Some("GRAY"));
    assert_eq!(decode_rqrr(blank.clone()).unwrap(), r#"{"results":[]}"#);
    assert_eq!(
        decode_rxing(blank, JsValue::TRUE).unwrap(),
        r#"{"results":[]}"#
    );

    let colour = raw_object(&[0; 2 * 2 * 3], 2, 2, None);
    assert_eq!(
        decode_rqrr(colour).unwrap(),
        r#"{"error":"Expected grayscale image (1 channel), got 3 channels"}"#
    );

    let err = decode_rxing(raw_object(&[0; 4], 2, 2, None), "yes".into()).unwrap_err();
    assert_eq!(error_name(err), "TypeMismatch");
}

#[wasm_bindgen_test]
fn preprocess_yields_gray() {
    let data: Vec<u8> = (0..8 * 8 * 4).map(|i| i as u8).collect();
    let out = preprocess_otsu(raw_object(&data, 8, 8, Some("BGRA"))).unwrap();
    assert_eq!(get(&out, "colorSpace").as_string().as_deref(), Some("GRAY"));
    let bytes: Uint8Array = get(&out, "data").dyn_into().unwrap();
    assert_eq!(bytes.length(), 64);
}
