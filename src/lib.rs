pub mod codec;
pub mod decoder;
pub mod descriptor;
pub mod error;
pub mod matrix;
pub mod normalize;
pub mod ops;
pub mod preprocess;
pub mod wasm;

use wasm_bindgen::prelude::*;

pub use decoder::{DecodeOptions, DecodeOutcome, Decoder, Detection, MultiFormatScanner, QrScanner};
pub use descriptor::{ImageDescriptor, Prop, RawDescriptor};
pub use error::{Error, ErrorKind, Result};
pub use matrix::{ColorSpace, PixelMatrix, RawImage};
pub use normalize::normalize;
pub use preprocess::Method;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn main_js() -> Result<(), JsValue> {
    #[cfg(debug_assertions)]
    console_error_panic_hook::set_once();

    Ok(())
}
