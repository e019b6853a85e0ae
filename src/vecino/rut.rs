//! Chilean RUT codec: input cleaning, check-digit validation and display
//! formatting. All functions are pure and operate on the canonical
//! `body-checkDigit` form, where the body is digits only and the check
//! digit is `0`-`9` or `K`.

use regex::Regex;

/// Strip everything but digits and the check letter from free-form input,
/// normalizing `k` to uppercase. Inputs with fewer than two significant
/// characters are returned as typed, without a separator; anything longer
/// is split into `body-checkDigit`.
#[must_use]
pub fn clean(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || c.eq_ignore_ascii_case(&'k'))
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if cleaned.len() < 2 {
        return cleaned;
    }

    let (body, check) = cleaned.split_at(cleaned.len() - 1);

    format!("{body}-{check}")
}

/// Validate a canonical RUT against the weighted modulo-11 algorithm.
/// Returns false for anything that does not match `digits+ '-' [digit|K]`.
#[must_use]
pub fn is_valid(rut: &str) -> bool {
    if !Regex::new(r"^[0-9]+-[0-9kK]$").is_ok_and(|regex| regex.is_match(rut)) {
        return false;
    }

    let Some((body, check)) = rut.split_once('-') else {
        return false;
    };

    check.eq_ignore_ascii_case(&check_digit(body).to_string())
}

/// Group the body with periods (es-CL convention) and reattach the check
/// digit. Empty input stays empty; a missing or non-numeric body comes
/// back unchanged.
#[must_use]
pub fn format_for_display(rut: &str) -> String {
    if rut.is_empty() {
        return String::new();
    }

    let (body, check) = match rut.split_once('-') {
        Some((body, check)) => (body, Some(check)),
        None => (rut, None),
    };

    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
        return rut.to_string();
    }

    let grouped = group_thousands(body.trim_start_matches('0'));

    match check {
        Some(check) if !check.is_empty() => format!("{grouped}-{check}"),
        _ => grouped,
    }
}

/// Expected check digit for a digit-only body: weights cycle 2..7 from the
/// rightmost digit, `11 - (sum % 11)`, with 11 -> '0' and 10 -> 'K'.
fn check_digit(body: &str) -> char {
    let mut sum: u32 = 0;
    let mut multiplier = 2;

    for digit in body.chars().rev() {
        sum += digit.to_digit(10).unwrap_or(0) * multiplier;
        multiplier = if multiplier < 7 { multiplier + 1 } else { 2 };
    }

    match 11 - (sum % 11) {
        11 => '0',
        10 => 'K',
        digit => char::from_digit(digit, 10).unwrap_or('0'),
    }
}

fn group_thousands(digits: &str) -> String {
    // A body of only zeros collapses to a single zero.
    let digits = if digits.is_empty() { "0" } else { digits };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    grouped
}
