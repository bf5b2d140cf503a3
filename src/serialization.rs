use bitstream_io::{BigEndian, BitRead, BitReader};
use image;
use itertools::iproduct;
use tracing::trace;

use std::cmp;
use std::io::Cursor;

use crate::bitcoding::QrBitRecorder;
use crate::config::Version;
use crate::tables::lookup_capacity;

// CONSTANTS
pub const MARKER_ENCODING_REGION: image::Luma<u8> = image::Luma([100u8]);
pub const MARKER_FORMAT_INFORMATION: image::Luma<u8> = image::Luma([120u8]);

pub const BIT_WHITE: image::Luma<u8> = image::Luma([255u8]);
pub const BIT_BLACK: image::Luma<u8> = image::Luma([0u8]);

pub mod masking;

use masking::apply_mask;

/// Creates a finder pattern image (concentric squares
/// including the white separator around the finder
/// pattern)
fn create_finder_pattern() -> image::GrayImage {
    image::GrayImage::from_fn(9,9, |x, y| {
        let r = cmp::max((x as i32 - 4).abs(), (y as i32 - 4).abs());
        if r < 2 || r == 3 {
            BIT_BLACK
        } else {
            BIT_WHITE
        }
    })
}

/// Creates an alignment pattern image
fn create_alignment_pattern() -> image::GrayImage {
    image::GrayImage::from_fn(5, 5, |x, y| {
        let r = cmp::max((x as i32 - 2).abs(), (y as i32 - 2).abs());
        if r % 2 == 0 {
            BIT_BLACK
        } else {
            BIT_WHITE
        }
    })
}

/// Paint `pattern` with its top left corner at (x0, y0), dropping whatever falls outside
/// the symbol. The finder markers start one module outside, so their separator is cut.
fn paint_clipped(symbol: &mut image::GrayImage, pattern: &image::GrayImage, x0: i32, y0: i32) {
    let (width, height) = symbol.dimensions();
    for (px, py, &pix) in pattern.enumerate_pixels() {
        let x = x0 + px as i32;
        let y = y0 + py as i32;
        if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
            symbol[(x as u32, y as u32)] = pix;
        }
    }
}

/// Whether the module at (x, y) carries data or ecc bits, as opposed to being part of
/// a finder marker, separator, timing strip, format information or the alignment pattern.
/// Coordinates outside the symbol are never free.
pub fn is_module_free(version: Version, x: i32, y: i32) -> bool {
    let size = version.dimensions() as i32;
    if x < 0 || y < 0 || x >= size || y >= size {
        return false;
    }
    if let Some((ax, ay)) = version.alignment_origin() {
        let (ax, ay) = (ax as i32, ay as i32);
        if x >= ax && x < ax + 5 && y >= ay && y < ay + 5 {
            return false;
        }
    }
    if y > 8 && y < size - 8 {
        // rows between the markers: only the vertical timing strip is reserved
        return x != 6;
    }
    if x > 8 && x < size - 8 {
        // columns between the markers: only the horizontal timing strip is reserved
        return y != 6;
    }
    // corners: the three marker corners (with format bits) are reserved, bottom right is free
    x > 8 && y > 8
}

/// Return a basic QR image with all the functional patterns
/// painted in: the finder patterns, the alignment pattern (version 2)
/// and timing patterns.
///
/// During the assembly of the QR code pixel matrix
/// there are different value codes used as pixel values
/// to indicate pixels that will be filled in later.
/// Final values are only 0 (black) and 255 (white).
///   100: the encoding region, which receives the data and ecc bits
///   120: marks the format information bits (stripes along finders),
///        2x 15 bits
pub fn create_qr_canvas(version: Version) -> image::GrayImage {
    let s = version.dimensions();
    let mut canvas = image::GrayImage::from_pixel(s, s, BIT_WHITE);

    // apply 3 finder patterns in top and left corners
    let finder = create_finder_pattern();
    let far = version.far_marker_offset();
    for &(x0, y0) in [(-1, -1), (-1, far), (far, -1)].iter() {
        paint_clipped(&mut canvas, &finder, x0, y0);
    }

    // single alignment pattern for version 2
    if let Some((ax, ay)) = version.alignment_origin() {
        image::imageops::overlay(&mut canvas, &create_alignment_pattern(), ax, ay);
    }

    // mark timing patterns
    for i in 8..s-8 {
        let val = if i % 2 == 0 {BIT_BLACK} else {BIT_WHITE};
        canvas[(6, i)] = val;
        canvas[(i, 6)] = val;
    }

    // mark format bits
    for coords in [&FORMAT_INFO_COORDS_QR_MAIN, &FORMAT_INFO_COORDS_QR_SIDE].iter() {
        for &(x, y) in coords.iter() {
            canvas[resolve(x, y, s)] = MARKER_FORMAT_INFORMATION;
        }
    }

    // everything else receives codewords
    for (x, y) in iproduct!(0..s, 0..s) {
        if is_module_free(version, x as i32, y as i32) {
            canvas[(x, y)] = MARKER_ENCODING_REGION;
        }
    }

    canvas
}

/// The order in which data and ecc bits are placed: two module wide columns from right
/// to left, alternating upwards and downwards, the right module of a row before the left
/// one. The vertical timing strip in column 6 is skipped entirely. Only free modules are
/// yielded, so the path covers every free module exactly once.
pub fn placement_path(version: Version) -> Vec<(u32, u32)> {
    let size = version.dimensions() as i32;
    let mut path = Vec::with_capacity(lookup_capacity(version).free_modules() as usize);

    let mut x = size - 1;
    let mut upwards = true;
    while x > 0 {
        if x == 6 {
            x -= 1;
        }
        for step in 0..size {
            let y = if upwards { size - 1 - step } else { step };
            for &column in [x, x - 1].iter() {
                if is_module_free(version, column, y) {
                    path.push((column as u32, y as u32));
                }
            }
        }
        upwards = !upwards;
        x -= 2;
    }
    path
}

/// Insert the data into the encoding region of a QR canvas created by the create_qr_canvas
/// function, applying mask pattern 0 on the way. Free modules left over after the last
/// codeword (the remainder bits of version 2) are filled with masked zeros.
pub fn insert_data_payload(canvas: &mut image::GrayImage, version: Version, data_words: &[u8], ecc_words: &[u8]) {
    let capacity = lookup_capacity(version);
    assert_eq!(data_words.len() + ecc_words.len(), capacity.codewords as usize,
               "codewords do not match the symbol capacity");

    let words: Vec<u8> = data_words.iter().chain(ecc_words).copied().collect();
    let mut reader = BitReader::endian(Cursor::new(&words), BigEndian);

    let path = placement_path(version);
    assert_eq!(path.len(), capacity.free_modules() as usize, "placement path misses free modules");

    for &(x, y) in &path {
        assert!(canvas[(x, y)] == MARKER_ENCODING_REGION, "module ({}, {}) visited twice", x, y);
        // past the last codeword the reader runs dry, remainder bits are zero
        let bit = reader.read_bit().unwrap_or(false);
        canvas[(x, y)] = if apply_mask(bit, x, y) { BIT_BLACK } else { BIT_WHITE };
    }
    trace!(modules = path.len(), codewords = words.len(), "placed data payload");
}

/// Read back the codewords (data followed by ecc) from a binarized symbol by walking
/// the same path as insert_data_payload and removing the mask.
pub fn extract_data_payload(symbol: &image::GrayImage, version: Version) -> Vec<u8> {
    let num_bits = lookup_capacity(version).codewords as usize * 8;
    let mut recorder = QrBitRecorder::new();
    for &(x, y) in placement_path(version).iter().take(num_bits) {
        let dark = symbol[(x, y)].0[0] < 128;
        recorder.write_bit(apply_mask(dark, x, y));
    }
    trace!(bits = recorder.len(), "extracted data payload");
    recorder.into_bytes()
}

//-------------------------------------------------------------------
// FORMAT INFO BITS
//-------------------------------------------------------------------

/// Format information for error correction level L and mask pattern 0, i.e. entry
/// 0b01000 of table C.1 in Annex C of the standard: 111011111000100.
pub const FORMAT_INFO_L_MASK0: u16 = 0x77c4;

// coordinates in the QR symbol where to write format bits, negative values count from
// the far edge.
static FORMAT_INFO_COORDS_QR_MAIN: [(i16, i16); 15] = [
    (0, 8), (1, 8), (2, 8), (3, 8), (4, 8), (5, 8), (7, 8), (8, 8),
    (8, 7), (8, 5), (8, 4), (8, 3), (8, 2), (8, 1), (8, 0),
];

static FORMAT_INFO_COORDS_QR_SIDE: [(i16, i16); 15] = [
    (8, -1), (8, -2), (8, -3), (8, -4), (8, -5), (8, -6), (8, -7), (-8, 8),
    (-7, 8), (-6, 8), (-5, 8), (-4, 8), (-3, 8), (-2, 8), (-1, 8),
];

fn resolve(xoff: i16, yoff: i16, symbol_size: u32) -> (u32, u32) {
    let s = symbol_size as i16;
    let x = if xoff < 0 { xoff + s } else { xoff };
    let y = if yoff < 0 { yoff + s } else { yoff };
    (x as u32, y as u32)
}

// helper function to write format bits to given coordinates in QR code
// bits are the bits actually to be written (big-endian order), num_bits is how many
// bits to write.
fn insert_bits_at(symbol: &mut image::GrayImage, bits: u32, num_bits: u32, coords: &[(i16, i16)]) {
    let mut mask = 1 << (num_bits - 1);
    let size = symbol.width();

    for &(xoff, yoff) in coords {
        let color = if (mask & bits) == 0 { BIT_WHITE } else { BIT_BLACK };
        symbol[resolve(xoff, yoff, size)] = color;
        mask >>= 1;
    }
}

/// Write format bits into symbol, together with the dark module above the
/// bottom left marker
pub fn insert_format_info(symbol: &mut image::GrayImage, version: Version) {
    insert_bits_at(symbol, FORMAT_INFO_L_MASK0 as u32, 15, &FORMAT_INFO_COORDS_QR_MAIN);
    insert_bits_at(symbol, FORMAT_INFO_L_MASK0 as u32, 15, &FORMAT_INFO_COORDS_QR_SIDE);
    symbol[(8, version.dimensions() - 8)] = BIT_BLACK;
}
