/// Contains lookup tables and other computation functions that provide reference
/// data needed for encoding or decoding a QR code, such as the capacity of each
/// symbol version and the alphanumeric character set.

use crate::config::Version;

use lazy_static::lazy_static;

use std::collections::HashMap;

#[derive(Clone,Copy,Hash,Eq,PartialEq,Debug)]
pub struct SymbolCapacity {
    pub codewords: u32,         // total number of codewords in this symbol type (depends only on size)
    pub data_codewords: u32,    // of those codewords, how many carry data (as opposed to ecc)
    pub data_bits: u32,         // how many data bits?
    pub chars_alphanum: u32,    // data capacity measured in alphanum chars
    pub remainder_bits: u32,    // free modules left over once all codewords are placed
}

impl SymbolCapacity {
    pub const fn new(words_total: u32,
                     words: u32,
                     bits: u32,
                     charsalphanum: u32,
                     remainder: u32) -> SymbolCapacity {
        SymbolCapacity {
            codewords: words_total,
            data_codewords: words,
            data_bits: bits,
            chars_alphanum: charsalphanum,
            remainder_bits: remainder,
        }
    }

    pub fn ecc_words(&self) -> u32 {
        self.codewords - self.data_codewords
    }

    /// Number of modules available for data, ecc and remainder bits
    pub fn free_modules(&self) -> u32 {
        self.codewords * 8 + self.remainder_bits
    }
}


macro_rules! define_capacity_table {
    {$(
        $version:expr,
        $total_words:expr,
        $words:expr,
        $bits:expr,
        $chars_a:expr,
        $remainder:expr;
    )*} => {
        lazy_static! {
            pub static ref SYMBOL_CAPACITY_TABLE: HashMap<Version, SymbolCapacity> = [
                $(
                    ($version, SymbolCapacity::new($total_words, $words, $bits, $chars_a, $remainder)),
                )*
            ].iter().copied().collect();
        }
    }
}


// error correction level L only
define_capacity_table!(
    Version::V1, 26, 19, 152, 25, 0;
    Version::V2, 44, 34, 272, 47, 7;
);

/// Convenience function that just indexes into the static table
pub fn lookup_capacity(version: Version) -> SymbolCapacity {
    SYMBOL_CAPACITY_TABLE[&version]
}

/// Longest text any supported version can hold.
pub const MAX_ALPHANUMERIC_CHARS: usize = 47;

//-------------------------------------------------------------------
// ALPHANUMERIC CHARACTER SET
//-------------------------------------------------------------------

/// Characters of alphanumeric mode, indexed by their value.
pub const ALPHANUMERIC_CHARSET: [char; 45] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I',
    'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', ' ', '$',
    '%', '*', '+', '-', '.', '/', ':',
];

lazy_static! {
    static ref ALPHANUMERIC_VALUES: HashMap<char, u8> = ALPHANUMERIC_CHARSET
        .iter()
        .enumerate()
        .map(|(value, &c)| (c, value as u8))
        .collect();
}

/// Value of a character in alphanumeric mode, `None` if it is not part of the set.
pub fn alphanumeric_value(c: char) -> Option<u8> {
    ALPHANUMERIC_VALUES.get(&c).copied()
}

/// Character for a value in 0..45, `None` otherwise.
pub fn alphanumeric_char(value: u32) -> Option<char> {
    ALPHANUMERIC_CHARSET.get(value as usize).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table() {
        assert_eq!(lookup_capacity(Version::V1).data_codewords, 19);
        assert_eq!(lookup_capacity(Version::V1).ecc_words(), 7);
        assert_eq!(lookup_capacity(Version::V2).ecc_words(), 10);
        assert_eq!(lookup_capacity(Version::V2).data_bits, 34 * 8);
        assert_eq!(lookup_capacity(Version::V1).free_modules(), 208);
        assert_eq!(lookup_capacity(Version::V2).free_modules(), 359);
        assert_eq!(lookup_capacity(Version::V2).chars_alphanum as usize, MAX_ALPHANUMERIC_CHARS);
    }

    #[test]
    fn test_charset_is_bijection() {
        assert_eq!(ALPHANUMERIC_VALUES.len(), 45);
        for (value, &c) in ALPHANUMERIC_CHARSET.iter().enumerate() {
            assert_eq!(alphanumeric_value(c), Some(value as u8));
            assert_eq!(alphanumeric_char(value as u32), Some(c));
        }
        assert_eq!(alphanumeric_value('a'), None);
        assert_eq!(alphanumeric_value('#'), None);
        assert_eq!(alphanumeric_char(45), None);
    }

    #[test]
    fn test_values_match_ascii_layout() {
        assert_eq!(alphanumeric_value('0'), Some(0));
        assert_eq!(alphanumeric_value('A'), Some(10));
        assert_eq!(alphanumeric_value('Z'), Some(35));
        assert_eq!(alphanumeric_value(' '), Some(36));
        assert_eq!(alphanumeric_value(':'), Some(44));
    }
}
