//! CEP (postal code) helpers.

/// Strips everything but ASCII digits.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Returns `true` if `input` holds exactly 8 digits once punctuation is removed.
pub fn is_valid_cep(input: &str) -> bool {
    digits_only(input).len() == 8
}

/// Applies the `00000-000` input mask.
///
/// Partial input is masked progressively: the hyphen only appears once a
/// sixth digit is typed, and anything past 8 digits is dropped.
///
/// ```
/// use docreg_forms::validation::mask_cep;
///
/// assert_eq!(mask_cep("01310100"), "01310-100");
/// assert_eq!(mask_cep("0131"), "0131");
/// assert_eq!(mask_cep("013101"), "01310-1");
/// ```
pub fn mask_cep(input: &str) -> String {
    let mut digits = digits_only(input);
    digits.truncate(8);
    if digits.len() > 5 {
        digits.insert(5, '-');
    }
    digits
}
