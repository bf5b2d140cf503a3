//! Arithmetic in GF(2^8) as used by QR codes, built on log/antilog tables
//! over the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1.

use lazy_static::lazy_static;

pub const PRIMITIVE_POLYNOMIAL: u16 = 0x11D;

struct FieldTables {
    exp: [u8; 512],     // doubled so that sums of two logarithms need no reduction
    log: [u8; 256],
}

lazy_static! {
    static ref TABLES: FieldTables = {
        let mut exp = [0u8; 512];
        let mut log = [0u8; 256];
        let mut x: u16 = 1;
        for i in 0..255 {
            exp[i] = x as u8;
            log[x as usize] = i as u8;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= PRIMITIVE_POLYNOMIAL;
            }
        }
        for i in 255..512 {
            exp[i] = exp[i - 255];
        }
        FieldTables { exp, log }
    };
}

/// alpha^power, for any power
pub fn exp(power: usize) -> u8 {
    TABLES.exp[power % 255]
}

/// discrete logarithm of a non-zero element
pub fn log(value: u8) -> usize {
    assert!(value != 0, "zero has no logarithm in GF(256)");
    TABLES.log[value as usize] as usize
}

pub fn multiply(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    TABLES.exp[log(a) + log(b)]
}

pub fn divide(a: u8, b: u8) -> u8 {
    assert!(b != 0, "division by zero in GF(256)");
    if a == 0 {
        return 0;
    }
    TABLES.exp[log(a) + 255 - log(b)]
}

pub fn inverse(a: u8) -> u8 {
    divide(1, a)
}

/// Product of two polynomials. The coefficient order of the result follows the
/// order of the inputs, so this works for both highest-first and lowest-first.
pub fn poly_multiply(p: &[u8], q: &[u8]) -> Vec<u8> {
    let mut product = vec![0u8; p.len() + q.len() - 1];
    for (i, &a) in p.iter().enumerate() {
        for (j, &b) in q.iter().enumerate() {
            product[i + j] ^= multiply(a, b);
        }
    }
    product
}

/// Evaluate a polynomial given highest degree coefficient first (Horner's scheme).
pub fn poly_eval(p: &[u8], x: u8) -> u8 {
    p.iter().fold(0, |acc, &c| multiply(acc, x) ^ c)
}

/// Evaluate a polynomial given lowest degree coefficient first.
pub fn poly_eval_low(p: &[u8], x: u8) -> u8 {
    p.iter().rev().fold(0, |acc, &c| multiply(acc, x) ^ c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_powers() {
        assert_eq!(exp(0), 1);
        assert_eq!(exp(7), 128);
        assert_eq!(exp(8), 29);     // 0x100 reduced by 0x11D
        assert_eq!(exp(25), 3);
        assert_eq!(exp(255), 1);
        assert_eq!(log(3), 25);
        assert_eq!(multiply(2, 128), 29);
    }

    #[test]
    fn test_field_axioms() {
        for a in 1..=255u8 {
            assert_eq!(multiply(a, inverse(a)), 1);
            assert_eq!(multiply(a, 0), 0);
            assert_eq!(multiply(a, 1), a);
            for b in 1..=255u8 {
                assert_eq!(multiply(a, b), multiply(b, a));
                assert_eq!(divide(multiply(a, b), b), a);
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_division_by_zero() {
        divide(5, 0);
    }

    #[test]
    fn test_polynomials() {
        // (x + 1)(x + 2) = x^2 + 3x + 2
        assert_eq!(poly_multiply(&[1, 1], &[1, 2]), vec![1, 3, 2]);
        assert_eq!(poly_eval(&[1, 3, 2], 1), 0);
        assert_eq!(poly_eval(&[1, 3, 2], 2), 0);
        assert_eq!(poly_eval_low(&[2, 3, 1], 2), 0);
        assert_eq!(poly_eval(&[1, 3, 2], 0), 2);
    }
}
