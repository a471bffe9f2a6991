//! Digit counting and digit-bounded random numbers

use rand::Rng;

use crate::error::GenerationError;

/// Largest digit count any generated value may have (fits in an `i64`)
pub const MAX_DIGITS: u32 = 18;

/// Number of base-10 digits of `n`
///
/// Zero has one digit. Negative numbers count one extra position for the
/// sign glyph.
pub fn digit_count(n: i64) -> u32 {
    let magnitude = n.unsigned_abs().checked_ilog10().map_or(1, |d| d + 1);
    if n < 0 {
        magnitude + 1
    } else {
        magnitude
    }
}

/// `10^exp`, or `None` on overflow
pub fn pow10(exp: u32) -> Option<i64> {
    10_i64.checked_pow(exp)
}

/// Smallest and largest numbers with exactly `digits` digits
pub fn digit_bounds(digits: u32) -> Result<(i64, i64), GenerationError> {
    if digits == 0 || digits > MAX_DIGITS {
        return Err(GenerationError::InvalidDigits(digits));
    }
    let lower = pow10(digits - 1).ok_or(GenerationError::InvalidDigits(digits))?;
    let upper = pow10(digits).ok_or(GenerationError::InvalidDigits(digits))? - 1;
    Ok((lower, upper))
}

/// Uniform random integer in `[10^(d-1), 10^d - 1]`
pub fn random_with_digits<R: Rng + ?Sized>(rng: &mut R, digits: u32) -> Result<i64, GenerationError> {
    let (lower, upper) = digit_bounds(digits)?;
    Ok(rng.random_range(lower..=upper))
}

/// Decimal digits of a non-negative number, most significant first
pub fn digits_of(n: i64) -> Vec<u8> {
    n.unsigned_abs()
        .to_string()
        .bytes()
        .map(|b| b - b'0')
        .collect()
}
