//! CPF checksum validation and formatting.
//!
//! A CPF is 11 digits: a 9-digit base followed by two check digits. The
//! backend runs the same checksum, so this must stay bit-for-bit compatible.

use super::cep::digits_only;

/// Returns `true` if `input` is a CPF with valid check digits.
///
/// Punctuation is ignored, so `111.444.777-35` and `11144477735` are
/// equivalent. Sequences of one repeated digit (`000.000.000-00`) satisfy
/// the checksum arithmetic but are rejected.
///
/// # Example
///
/// ```
/// use docreg_forms::validation::validate_cpf;
///
/// assert!(validate_cpf("111.444.777-35"));
/// assert!(!validate_cpf("111.444.777-36"));
/// ```
pub fn validate_cpf(input: &str) -> bool {
    let digits: Vec<u32> = input.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 {
        return false;
    }
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
}

/// Computes a check digit over `base` with weights `len + 1` down to 2.
fn check_digit(base: &[u32]) -> u32 {
    let top = base.len() as u32 + 1;
    let sum: u32 = base
        .iter()
        .zip((2..=top).rev())
        .map(|(digit, weight)| digit * weight)
        .sum();

    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

/// Formats a CPF as `000.000.000-00`.
///
/// Returns `None` unless the input contains exactly 11 digits. The checksum
/// is not verified here.
pub fn format_cpf(input: &str) -> Option<String> {
    let digits = digits_only(input);
    if digits.len() != 11 {
        return None;
    }
    Some(format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    ))
}
