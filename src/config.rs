/// Contains enums and structs that will also be exported as the public
/// API of this crate.

//-------------------------------------------------------------------------------------------------

/// The symbol versions this codec can produce and read. Every symbol uses
/// error correction level L with mask pattern 0.
#[derive(Clone,Copy,Hash,Eq,PartialEq,Debug)]
pub enum Version {
    V1,     // 21x21 modules, 19 data + 7 ecc codewords
    V2      // 25x25 modules, 34 data + 10 ecc codewords, one alignment pattern
}

impl Version {
    /// Pick the smallest version that holds a text of the given length
    /// in alphanumeric mode.
    pub fn for_text_len(num_chars: usize) -> Version {
        if num_chars > 25 {
            Version::V2
        } else {
            Version::V1
        }
    }

    /// Infer the version of a (possibly scaled) square symbol from its side length
    /// in pixels. A side that is a multiple of 21 is read as version 1 first.
    pub fn from_side_length(side: u32) -> Option<Version> {
        if side == 0 {
            None
        } else if side % Version::V1.dimensions() == 0 {
            Some(Version::V1)
        } else if side % Version::V2.dimensions() == 0 {
            Some(Version::V2)
        } else {
            None
        }
    }

    /// Simply return the version number
    pub fn number(self) -> u8 {
        match self {
            Version::V1 => 1,
            Version::V2 => 2
        }
    }

    /// Return the width & height of the symbol, not counting the quiet region
    pub fn dimensions(self) -> u32 {
        17 + 4 * self.number() as u32
    }

    /// Offset of the finder markers sitting at the far end of the top row and left column.
    /// Markers are drawn including their separator, starting one module outside the symbol.
    pub fn far_marker_offset(self) -> i32 {
        13 + 4 * (self.number() as i32 - 1)
    }

    /// Top left corner of the single alignment pattern, if the version has one.
    pub fn alignment_origin(self) -> Option<(u32, u32)> {
        match self {
            Version::V1 => None,
            Version::V2 => Some((16, 16))
        }
    }

    /// Return the number of mode indicator bits
    pub fn num_mode_indicator_bits(self) -> u32 {
        4
    }

    /// Return the number of bits of the character count indicator in alphanumeric mode
    pub fn num_char_count_bits(self) -> u32 {
        9
    }

    /// Return terminator length (terminator is always only zero bits)
    pub fn terminator_length(self) -> usize {
        4
    }
}

//-------------------------------------------------------------------------------------------------

/// Options for turning a bare module grid into a printable image.
#[derive(Clone,Copy,Hash,Eq,PartialEq,Debug)]
pub struct RenderOptions {
    pub module_size: u32,   // pixels per module side
    pub quiet_zone: u32,    // width of the white border, in modules
}

impl RenderOptions {
    pub const fn new(module_size: u32, quiet_zone: u32) -> RenderOptions {
        RenderOptions { module_size, quiet_zone }
    }
}

impl Default for RenderOptions {
    /// Ten pixels per module and the four module quiet zone required for
    /// standard symbols.
    fn default() -> Self {
        RenderOptions::new(10, 4)
    }
}
