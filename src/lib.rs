//! Encoder and decoder for version 1 and 2 QR codes in alphanumeric mode.
//!
//! A symbol is represented as an `image::GrayImage` with one pixel per module,
//! black (0) for a set bit and white (255) for a cleared one.

use image::{DynamicImage, GrayImage};
use tracing::debug;

pub use config::{RenderOptions, Version};
pub use error::{DecodeError, EncodeError};
pub use imaging::render;

pub mod config;
pub mod tables;
pub mod error;
pub mod bitcoding;
pub mod reedsolomon;
pub mod serialization;
pub mod imaging;

use bitcoding::{check_input, decode_data_segment, encode_data_segment, finalize_bitstream, QrBitRecorder};
use reedsolomon::{construct_codewords, rs_decode};
use serialization::{create_qr_canvas, extract_data_payload, insert_data_payload, insert_format_info};
use tables::lookup_capacity;


/// Create the module grid of a QR code holding `text`. The text must consist of
/// at most 47 characters of the alphanumeric set `0-9 A-Z $%*+-./:` and space.
pub fn generate_qr_code(text: &str) -> Result<GrayImage, EncodeError> {
    check_input(text)?;

    let num_chars = text.chars().count();
    let version = Version::for_text_len(num_chars);
    debug!(version = version.number(), chars = num_chars, "encoding text");

    // encode the data and compute the ecc bytes
    let (data_words, ecc_words) = {
        let mut encoder = QrBitRecorder::new();
        encode_data_segment(&mut encoder, text, version);
        let data_content = finalize_bitstream(encoder, version);
        construct_codewords(&data_content, version)
    };

    let mut symbol = create_qr_canvas(version);
    insert_data_payload(&mut symbol, version, &data_words, &ecc_words);
    insert_format_info(&mut symbol, version);

    Ok(symbol)
}

/// Read the text back from a module grid. The grid may be scaled by any integer
/// factor, it is normalized to one pixel per module before decoding.
pub fn read_qr_code(grid: &GrayImage) -> Result<String, DecodeError> {
    let (width, height) = grid.dimensions();
    if width != height {
        return Err(DecodeError::NotSquare { width, height });
    }

    let version = Version::from_side_length(height).ok_or(DecodeError::UnknownVersion(height))?;
    let size = version.dimensions();
    debug!(version = version.number(), side = height, "decoding symbol");

    let symbol = imaging::binarize(&imaging::scale_to(grid, size, size));

    let capacity = lookup_capacity(version);
    let words = extract_data_payload(&symbol, version);
    let (data_words, ecc_words) = words.split_at(capacity.data_codewords as usize);

    let corrected = rs_decode(data_words, ecc_words)?;
    decode_data_segment(&corrected, version)
}

/// Read the text from an arbitrary image of a symbol, e.g. one produced by `render`:
/// any quiet zone around the symbol is stripped first.
pub fn read_qr_code_from_image(image: &DynamicImage) -> Result<String, DecodeError> {
    read_qr_code(&imaging::prepare_image(image)?)
}
