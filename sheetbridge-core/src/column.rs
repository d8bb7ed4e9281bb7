//! Spreadsheet column labels.
//!
//! Labels are a bijective base-26 numeral with no zero digit: `A` is 1, `Z` is
//! 26, `AA` is 27. Every digit is therefore shifted by one compared to plain
//! base 26, which is why both directions subtract 1 per step.

use crate::error::{SheetsError, SheetsResult};

const RADIX: i64 = 26;

/// Convert a 1-based column number into its label (1 -> "A", 27 -> "AA").
pub fn number_to_letter(number: i64) -> SheetsResult<String> {
    if number <= 0 {
        return Err(SheetsError::InvalidArgument(format!(
            "column number must be positive, got {}",
            number
        )));
    }

    let mut n = number;
    let mut letters = Vec::new();

    while n > 0 {
        let remainder = (n - 1) % RADIX;
        letters.push(b'A' + remainder as u8);
        n = (n - 1) / RADIX;
    }

    letters.reverse();
    Ok(letters.into_iter().map(char::from).collect())
}

/// Convert a column label into a 0-based column index ("A" -> 0, "AA" -> 26).
pub fn letter_to_number(label: &str) -> SheetsResult<u32> {
    if label.is_empty() {
        return Err(SheetsError::InvalidArgument(
            "column label must not be empty".into(),
        ));
    }

    let mut num: u32 = 0;
    for c in label.chars() {
        if !c.is_ascii_uppercase() {
            return Err(SheetsError::InvalidArgument(format!(
                "column label \"{}\" may only contain A-Z",
                label
            )));
        }

        let digit = c as u32 - 'A' as u32 + 1;
        num = num
            .checked_mul(RADIX as u32)
            .and_then(|n| n.checked_add(digit))
            .ok_or_else(|| {
                SheetsError::InvalidArgument(format!("column label \"{}\" is too long", label))
            })?;
    }

    Ok(num - 1)
}
