use crate::config::Version;
use crate::error::{DecodeError, EncodeError};
use crate::tables::{alphanumeric_char, alphanumeric_value, lookup_capacity, MAX_ALPHANUMERIC_CHARS};

use std::fmt;
use std::io::Cursor;

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use itertools::Itertools;

const MODE_ALPHANUMERIC: u32 = 0b0010;
const PAD_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

/// A growable big-endian bit string that keeps track of how many bits were written.
pub struct QrBitRecorder {
    writer: BitWriter<Vec<u8>, BigEndian>,
    len: usize,
    bits: Vec<bool>,
}

impl QrBitRecorder {
    pub fn new() -> QrBitRecorder {
        QrBitRecorder {
            writer: BitWriter::endian(Vec::new(), BigEndian),
            len: 0,
            bits: Vec::new(),
        }
    }

    /// number of bits written so far
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append the lowest `num_bits` bits of `value`, most significant first.
    pub fn write(&mut self, num_bits: u32, value: u32) {
        if num_bits == 0 {
            return;
        }
        // writes into a Vec cannot fail, only a value wider than num_bits can
        self.writer.write(num_bits, value).expect("value does not fit the requested bit width");
        self.bits.extend((0..num_bits).rev().map(|i| (value >> i) & 1 == 1));
        self.len += num_bits as usize;
    }

    pub fn write_bit(&mut self, bit: bool) {
        self.write(1, bit as u32);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write(8, b as u32);
        }
    }

    pub fn is_byte_aligned(&self) -> bool {
        self.len % 8 == 0
    }

    /// Finish the bit string, filling a trailing partial byte with zeros.
    pub fn into_bytes(mut self) -> Vec<u8> {
        if !self.is_byte_aligned() {
            let fill = 8 - (self.len % 8) as u32;
            self.write(fill, 0);
        }
        self.writer.into_writer()
    }
}

impl Default for QrBitRecorder {
    fn default() -> Self {
        QrBitRecorder::new()
    }
}

impl fmt::Debug for QrBitRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QrBitRecorder({})", self)
    }
}

impl fmt::Display for QrBitRecorder {
    /// Prints the bits as a string of ones and zeros
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits.iter().map(|&b| if b { '1' } else { '0' }).join(""))
    }
}

//-------------------------------------------------------------------
// INPUT VALIDATION
//-------------------------------------------------------------------

/// Whether a text can be encoded: uppercase alphanumeric charset, at most 47 characters.
pub fn validate(text: &str) -> bool {
    check_input(text).is_ok()
}

/// Like `validate`, but tells what is wrong with the text.
pub fn check_input(text: &str) -> Result<(), EncodeError> {
    if let Some(c) = text.chars().find(|&c| alphanumeric_value(c).is_none()) {
        return Err(EncodeError::InvalidInput(format!("character {:?} is not in the alphanumeric set", c)));
    }
    let num_chars = text.chars().count();
    if num_chars > MAX_ALPHANUMERIC_CHARS {
        return Err(EncodeError::InvalidInput(format!(
            "{} characters exceed the maximum of {}", num_chars, MAX_ALPHANUMERIC_CHARS)));
    }
    Ok(())
}

//-------------------------------------------------------------------
// ENCODING
//-------------------------------------------------------------------

fn write_mode_indicator(stream: &mut QrBitRecorder, version: Version) {
    stream.write(version.num_mode_indicator_bits(), MODE_ALPHANUMERIC);
}

fn write_charcount_indicator(stream: &mut QrBitRecorder, count: u32, version: Version) {
    stream.write(version.num_char_count_bits(), count);
}

fn map_alphanumeric(in_char: char) -> u32 {
    match alphanumeric_value(in_char) {
        Some(value) => value as u32,
        None => panic!("Invalid char for alphanumeric mode!")
    }
}

fn encode_alphanumeric_data(stream: &mut QrBitRecorder, input: &str) {
    // iterate over input; group into
    // two chars and multiply the first by 45, sum with second one.
    // encode that number in 11 binary digits.
    for pair in &input.chars().chunks(2) {
        let values: Vec<u32> = pair.map(map_alphanumeric).collect();
        match values[..] {
            [first, second] => stream.write(11, first * 45 + second),
            // remaining char as 6bit code
            [single] => stream.write(6, single),
            _ => unreachable!("chunks of two yield one or two chars")
        }
    }
}

/// Write the alphanumeric segment (mode indicator, character count, payload) of
/// an already validated text to the bit stream.
pub fn encode_data_segment(stream: &mut QrBitRecorder, input: &str, version: Version) {
    write_mode_indicator(stream, version);
    write_charcount_indicator(stream, input.chars().count() as u32, version);
    encode_alphanumeric_data(stream, input);
}

/// Pad the encoded segment up to the data capacity of the symbol and return the
/// data codewords: a terminator of at most four zero bits, zero bits up to the
/// next byte boundary, then alternating 0xEC, 0x11 pad codewords.
pub fn finalize_bitstream(mut stream: QrBitRecorder, version: Version) -> Vec<u8> {
    let capacity_bits = lookup_capacity(version).data_bits as usize;
    assert!(stream.len() <= capacity_bits, "segment exceeds the symbol capacity");

    let terminator = std::cmp::min(version.terminator_length(), capacity_bits - stream.len());
    stream.write(terminator as u32, 0);

    if stream.len() < capacity_bits && !stream.is_byte_aligned() {
        let fill = 8 - stream.len() % 8;
        stream.write(fill as u32, 0);
    }

    for &pad in PAD_CODEWORDS.iter().cycle() {
        if stream.len() >= capacity_bits {
            break;
        }
        stream.write(8, pad as u32);
    }

    assert_eq!(stream.len(), capacity_bits, "data segment must fill the symbol exactly");
    stream.into_bytes()
}

//-------------------------------------------------------------------
// DECODING
//-------------------------------------------------------------------

fn read_bits(reader: &mut BitReader<Cursor<&[u8]>, BigEndian>, num_bits: u32) -> Result<u32, DecodeError> {
    reader.read::<u32>(num_bits)
        .map_err(|_| DecodeError::InvalidSegment("data segment ends prematurely".to_string()))
}

fn unmap_alphanumeric(value: u32) -> Result<char, DecodeError> {
    alphanumeric_char(value)
        .ok_or_else(|| DecodeError::InvalidSegment(format!("{} is not an alphanumeric value", value)))
}

/// Parse the (corrected) data codewords of a symbol back into text.
pub fn decode_data_segment(data_words: &[u8], version: Version) -> Result<String, DecodeError> {
    let mut reader = BitReader::endian(Cursor::new(data_words), BigEndian);

    let mode = read_bits(&mut reader, version.num_mode_indicator_bits())?;
    if mode != MODE_ALPHANUMERIC {
        return Err(DecodeError::InvalidSegment(format!("unsupported mode indicator {:04b}", mode)));
    }

    let count = read_bits(&mut reader, version.num_char_count_bits())? as usize;
    if count > lookup_capacity(version).chars_alphanum as usize {
        return Err(DecodeError::InvalidSegment(format!("character count {} exceeds the symbol capacity", count)));
    }

    let mut text = String::with_capacity(count);
    for _ in 0..count / 2 {
        let pair = read_bits(&mut reader, 11)?;
        text.push(unmap_alphanumeric(pair / 45)?);
        text.push(unmap_alphanumeric(pair % 45)?);
    }
    if count % 2 == 1 {
        text.push(unmap_alphanumeric(read_bits(&mut reader, 6)?)?);
    }
    Ok(text)
}
