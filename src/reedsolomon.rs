//! Systematic Reed-Solomon coding over GF(256) for the error correction codewords
//! of a QR symbol. Blocks are written highest degree coefficient first, i.e. the
//! first data codeword is the coefficient of the highest power of x.

use thiserror::Error;
use tracing::debug;

use crate::config::Version;
use crate::tables::lookup_capacity;

pub mod galois;

/// A codeword block holds more errors than its parity can repair.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("codeword block is corrupt beyond its correction capacity")]
pub struct Corrupt;

/// The generator polynomial (x - a^0)(x - a^1)...(x - a^(n-1)), highest degree first.
pub fn generator_polynomial(ecc_count: usize) -> Vec<u8> {
    (0..ecc_count).fold(vec![1u8], |generator, i| {
        galois::poly_multiply(&generator, &[1, galois::exp(i)])
    })
}

/// Compute the `ecc_count` parity bytes for the given data block.
pub fn rs_encode(data: &[u8], ecc_count: usize) -> Vec<u8> {
    if ecc_count == 0 {
        return Vec::new();
    }
    let generator = generator_polynomial(ecc_count);

    // polynomial long division of data * x^n by the generator, done as a shift register
    let mut remainder = vec![0u8; ecc_count];
    for &byte in data {
        let factor = byte ^ remainder[0];
        remainder.rotate_left(1);
        remainder[ecc_count - 1] = 0;
        for (r, &g) in remainder.iter_mut().zip(&generator[1..]) {
            *r ^= galois::multiply(g, factor);
        }
    }
    remainder
}

/// Syndromes S_j = c(a^j) for j in 0..ecc_count. All zero iff the block is a codeword.
fn compute_syndromes(block: &[u8], ecc_count: usize) -> Vec<u8> {
    (0..ecc_count)
        .map(|j| galois::poly_eval(block, galois::exp(j)))
        .collect()
}

/// Berlekamp-Massey. Returns the error locator polynomial (lowest degree first)
/// and the number of errors it claims.
fn find_error_locator(syndromes: &[u8]) -> (Vec<u8>, usize) {
    let mut locator = vec![1u8];
    let mut previous = vec![1u8];
    let mut num_errors = 0usize;
    let mut shift = 1usize;
    let mut previous_discrepancy = 1u8;

    for r in 0..syndromes.len() {
        let discrepancy = (1..=num_errors).fold(syndromes[r], |acc, i| {
            acc ^ galois::multiply(locator.get(i).copied().unwrap_or(0), syndromes[r - i])
        });

        if discrepancy == 0 {
            shift += 1;
            continue;
        }

        // locator - (d / b) * x^shift * previous
        let scale = galois::divide(discrepancy, previous_discrepancy);
        let mut updated = locator.clone();
        if updated.len() < previous.len() + shift {
            updated.resize(previous.len() + shift, 0);
        }
        for (i, &b) in previous.iter().enumerate() {
            updated[i + shift] ^= galois::multiply(scale, b);
        }

        if 2 * num_errors <= r {
            previous = locator;
            num_errors = r + 1 - num_errors;
            previous_discrepancy = discrepancy;
            shift = 1;
        } else {
            shift += 1;
        }
        locator = updated;
    }

    while locator.len() > 1 && locator.last() == Some(&0) {
        locator.pop();
    }
    (locator, num_errors)
}

/// Check the block `data || ecc` and repair up to `ecc.len() / 2` erroneous bytes.
/// Returns the (corrected) data bytes.
pub fn rs_decode(data: &[u8], ecc: &[u8]) -> Result<Vec<u8>, Corrupt> {
    let ecc_count = ecc.len();
    let mut block: Vec<u8> = data.iter().chain(ecc).copied().collect();
    let n = block.len();
    if n > 255 {
        return Err(Corrupt);
    }

    let syndromes = compute_syndromes(&block, ecc_count);
    if syndromes.iter().all(|&s| s == 0) {
        return Ok(data.to_vec());
    }

    let (locator, num_errors) = find_error_locator(&syndromes);
    if 2 * num_errors > ecc_count || locator.len() != num_errors + 1 {
        debug!(num_errors, ecc_count, "error locator exceeds correction capacity");
        return Err(Corrupt);
    }

    // Chien search: position i holds the coefficient of x^(n-1-i), so it is in error
    // iff the locator vanishes at a^-(n-1-i).
    let positions: Vec<usize> = (0..n)
        .filter(|&i| galois::poly_eval_low(&locator, galois::exp(255 - (n - 1 - i))) == 0)
        .collect();
    if positions.len() != num_errors {
        debug!(roots = positions.len(), num_errors, "error locator roots do not match its degree");
        return Err(Corrupt);
    }

    // Forney: evaluator = S(x) * locator(x) mod x^ecc_count, magnitude = X * evaluator(X^-1) / locator'(X^-1)
    let mut evaluator = galois::poly_multiply(&syndromes, &locator);
    evaluator.truncate(ecc_count);
    let derivative: Vec<u8> = locator
        .iter()
        .enumerate()
        .skip(1)
        .map(|(k, &c)| if k % 2 == 1 { c } else { 0 })
        .collect();

    for &i in &positions {
        let x = galois::exp(n - 1 - i);
        let x_inv = galois::inverse(x);
        let denominator = galois::poly_eval_low(&derivative, x_inv);
        if denominator == 0 {
            return Err(Corrupt);
        }
        let numerator = galois::multiply(x, galois::poly_eval_low(&evaluator, x_inv));
        block[i] ^= galois::divide(numerator, denominator);
    }

    if compute_syndromes(&block, ecc_count).iter().any(|&s| s != 0) {
        debug!("correction left non-zero syndromes");
        return Err(Corrupt);
    }

    debug!(corrected = num_errors, "repaired codeword errors");
    block.truncate(data.len());
    Ok(block)
}

/// Compute the error correction codewords for the data codewords of a symbol.
/// Version 1 and 2 at level L use a single block, so there is no interleaving.
pub fn construct_codewords(data: &[u8], version: Version) -> (Vec<u8>, Vec<u8>) {
    let capacity = lookup_capacity(version);
    assert_eq!(data.len(), capacity.data_codewords as usize, "data codewords do not fill the symbol");
    let ecc = rs_encode(data, capacity.ecc_words() as usize);
    (data.to_vec(), ecc)
}


//-------------------------------------------------------------------
// TESTS
//-------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;

    // "HELLO WORLD" as a 1-M symbol, see the worked example on thonky.com
    const HELLO_WORLD_1M_DATA: [u8; 16] = [32, 91, 11, 120, 209, 114, 220, 77, 67, 64, 236, 17, 236, 17, 236, 17];
    const HELLO_WORLD_1M_ECC: [u8; 10] = [196, 35, 39, 119, 235, 215, 231, 226, 93, 23];

    fn sample_block() -> (Vec<u8>, Vec<u8>) {
        let data: Vec<u8> = (0..19u8).map(|i| i.wrapping_mul(37).wrapping_add(11)).collect();
        let ecc = rs_encode(&data, 7);
        (data, ecc)
    }

    #[test]
    fn test_generator_polynomial() {
        // (x - 1)(x - 2) = x^2 + 3x + 2
        assert_eq!(generator_polynomial(2), vec![1, 3, 2]);
        let generator = generator_polynomial(7);
        assert_eq!(generator.len(), 8);
        // every root a^0..a^6 must vanish
        for i in 0..7 {
            assert_eq!(galois::poly_eval(&generator, galois::exp(i)), 0);
        }
    }

    #[test]
    fn test_known_parity() {
        assert_eq!(rs_encode(&HELLO_WORLD_1M_DATA, 10), HELLO_WORLD_1M_ECC.to_vec());
    }

    #[test]
    fn test_clean_block() {
        let (data, ecc) = sample_block();
        assert_eq!(rs_decode(&data, &ecc), Ok(data));
    }

    #[test]
    fn test_single_error_everywhere() {
        let (data, ecc) = sample_block();
        for i in 0..(data.len() + ecc.len()) {
            let mut broken_data = data.clone();
            let mut broken_ecc = ecc.clone();
            if i < data.len() {
                broken_data[i] ^= 0x5A;
            } else {
                broken_ecc[i - data.len()] ^= 0x5A;
            }
            assert_eq!(rs_decode(&broken_data, &broken_ecc), Ok(data.clone()), "error at {}", i);
        }
    }

    #[test]
    fn test_three_errors() {
        let (data, ecc) = sample_block();
        let mut broken_data = data.clone();
        let mut broken_ecc = ecc.clone();
        broken_data[0] = !broken_data[0];
        broken_data[10] ^= 0x01;
        broken_ecc[6] ^= 0xFF;
        assert_eq!(rs_decode(&broken_data, &broken_ecc), Ok(data));
    }

    #[test]
    fn test_too_many_errors() {
        let (data, ecc) = sample_block();
        let mut broken_data = data.clone();
        for i in [1usize, 4, 7, 12, 18].iter() {
            broken_data[*i] ^= 0xA5;
        }
        assert_eq!(rs_decode(&broken_data, &ecc), Err(Corrupt));
    }

    #[test]
    fn test_construct_codewords() {
        let data = vec![0xECu8; 34];
        let (words, ecc) = construct_codewords(&data, Version::V2);
        assert_eq!(words, data);
        assert_eq!(ecc.len(), 10);
    }

    #[test]
    #[should_panic]
    fn test_construct_codewords_wrong_length() {
        construct_codewords(&[0u8; 18], Version::V1);
    }
}
