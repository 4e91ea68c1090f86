//! Luhn mod 16 check digit used by the `nih:` form.

/// Compute the check digit of a hexadecimal string.
///
/// Digits are weighted from the right, doubling the rightmost digit and every
/// second digit after it. A doubled value of 16 or more contributes one extra
/// unit, which folds the radix carry back in. Characters that are not hex
/// digits are skipped.
pub fn check_digit(hex: &str) -> char {
    let sum: u32 = hex
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(16))
        .enumerate()
        .map(|(index, digit)| {
            let weighted = digit * if index % 2 == 0 { 2 } else { 1 };
            if weighted >= 16 {
                weighted + 1
            } else {
                weighted
            }
        })
        .sum();

    let check = (16 - sum % 16) % 16;
    // check < 16, always a valid radix-16 digit
    std::char::from_digit(check, 16).unwrap_or('0')
}

/// Check a supplied digit against the one computed for `hex`, ignoring case.
pub fn verify(hex: &str, digit: &str) -> bool {
    let mut expected = [0u8; 4];
    digit.eq_ignore_ascii_case(check_digit(hex).encode_utf8(&mut expected))
}
