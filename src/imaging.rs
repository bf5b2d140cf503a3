//! Pixel level helpers around the module grid: scaling, binarization, and turning a bare
//! symbol into a printable image with quiet zone (and back).

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};

use crate::config::RenderOptions;
use crate::error::DecodeError;
use crate::serialization::{BIT_BLACK, BIT_WHITE};

/// Nearest-neighbour resize of a grid by an integer factor.
pub fn scale(grid: &GrayImage, factor: u32) -> GrayImage {
    scale_to(grid, grid.width() * factor, grid.height() * factor)
}

/// Nearest-neighbour resize of a grid to the given dimensions.
pub fn scale_to(grid: &GrayImage, width: u32, height: u32) -> GrayImage {
    if grid.dimensions() == (width, height) {
        return grid.clone();
    }
    imageops::resize(grid, width, height, FilterType::Nearest)
}

/// Threshold a grid to pure black and white, luma above 127 is white.
pub fn binarize(grid: &GrayImage) -> GrayImage {
    let mut result = grid.clone();
    for pix in result.pixels_mut() {
        *pix = if pix.0[0] > 127 { BIT_WHITE } else { BIT_BLACK };
    }
    result
}

/// Scale a symbol up and surround it with a white quiet zone.
pub fn render(grid: &GrayImage, options: &RenderOptions) -> GrayImage {
    let module_size = options.module_size.max(1);
    let scaled = scale(grid, module_size);
    let border = options.quiet_zone * module_size;
    let mut canvas = GrayImage::from_pixel(
        scaled.width() + 2 * border,
        scaled.height() + 2 * border,
        BIT_WHITE,
    );
    imageops::overlay(&mut canvas, &scaled, border, border);
    canvas
}

/// Cut a binarized image down to the bounding box of its dark pixels. For a QR symbol
/// this is exactly the symbol itself, since the outer rings of the three finder markers
/// touch the top, left, right and bottom edges.
pub fn crop_to_symbol(image: &GrayImage) -> Result<GrayImage, DecodeError> {
    let dark: Vec<(u32, u32)> = image
        .enumerate_pixels()
        .filter(|&(_, _, pix)| *pix == BIT_BLACK)
        .map(|(x, y, _)| (x, y))
        .collect();
    let min_x = dark.iter().map(|&(x, _)| x).min().ok_or(DecodeError::NoSymbol)?;
    let max_x = dark.iter().map(|&(x, _)| x).max().ok_or(DecodeError::NoSymbol)?;
    let min_y = dark.iter().map(|&(_, y)| y).min().ok_or(DecodeError::NoSymbol)?;
    let max_y = dark.iter().map(|&(_, y)| y).max().ok_or(DecodeError::NoSymbol)?;

    Ok(imageops::crop_imm(image, min_x, min_y, max_x - min_x + 1, max_y - min_y + 1).to_image())
}

/// Prepare an arbitrary image (e.g. a PNG written by `render`) for decoding:
/// convert to luma, binarize and strip the quiet zone.
pub fn prepare_image(image: &DynamicImage) -> Result<GrayImage, DecodeError> {
    crop_to_symbol(&binarize(&image.to_luma8()))
}

/// Whether every pixel of the grid is pure black or white
pub fn is_binary(grid: &GrayImage) -> bool {
    grid.pixels().all(|&p: &Luma<u8>| p == BIT_BLACK || p == BIT_WHITE)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(size: u32) -> GrayImage {
        GrayImage::from_fn(size, size, |x, y| if (x + y) % 2 == 0 { BIT_BLACK } else { BIT_WHITE })
    }

    #[test]
    fn test_scale_roundtrip() {
        let grid = checkerboard(21);
        let big = scale(&grid, 10);
        assert_eq!(big.dimensions(), (210, 210));
        assert_eq!(big[(15, 3)], grid[(1, 0)]);
        assert_eq!(big[(209, 209)], grid[(20, 20)]);
        assert_eq!(scale_to(&big, 21, 21), grid);
    }

    #[test]
    fn test_binarize() {
        let grid = GrayImage::from_fn(4, 1, |x, _| Luma([[0u8, 127, 128, 255][x as usize]]));
        let bw = binarize(&grid);
        assert_eq!(bw[(0, 0)], BIT_BLACK);
        assert_eq!(bw[(1, 0)], BIT_BLACK);
        assert_eq!(bw[(2, 0)], BIT_WHITE);
        assert_eq!(bw[(3, 0)], BIT_WHITE);
        assert!(is_binary(&bw));
        assert!(!is_binary(&grid));
    }

    #[test]
    fn test_render_and_crop() {
        let grid = checkerboard(21);
        let rendered = render(&grid, &RenderOptions::new(3, 4));
        assert_eq!(rendered.dimensions(), (21 * 3 + 24, 21 * 3 + 24));
        assert_eq!(rendered[(0, 0)], BIT_WHITE);
        assert_eq!(rendered[(12, 12)], BIT_BLACK);
        let cropped = crop_to_symbol(&rendered).unwrap();
        assert_eq!(cropped, scale(&grid, 3));
    }

    #[test]
    fn test_crop_blank_image() {
        let blank = GrayImage::from_pixel(10, 10, BIT_WHITE);
        assert_eq!(crop_to_symbol(&blank), Err(DecodeError::NoSymbol));
    }
}
