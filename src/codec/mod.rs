//! Transport encodings

mod image;

pub use image::{decode_image, decode_str, encode_bytes, encode_image_into_base64};
