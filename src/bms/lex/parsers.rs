//! Lenient value parsers for command arguments.
//!
//! Chart files in the wild are sloppy, so the values are read the way the classic players read them:
//! the longest valid numeric prefix is used, and a value without such prefix is zero. These never fail.

/// Reads two characters as base 36, case-insensitive. Reading stops at the first non-digit, so
/// `1!` is `1` and `!1` is `0`.
pub(crate) fn base36_pair(hi: u8, lo: u8) -> u16 {
    let digit = |b: u8| char::from(b).to_digit(36);
    match (digit(hi), digit(lo)) {
        (Some(hi), Some(lo)) => (hi * 36 + lo) as u16,
        (Some(hi), None) => hi as u16,
        _ => 0,
    }
}

/// Reads the first two bytes of the source by [`base36_pair`]. Missing bytes read as non-digits.
pub(crate) fn base36_lenient(source: &str) -> u16 {
    let bytes = source.as_bytes();
    base36_pair(
        bytes.first().copied().unwrap_or_default(),
        bytes.get(1).copied().unwrap_or_default(),
    )
}

/// Returns the value of the leading decimal digits after optional spaces. `0` if there is none.
pub(crate) fn unsigned_prefix(source: &str) -> u32 {
    source
        .trim_start()
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0u32, |acc, digit| acc.saturating_mul(10).saturating_add(digit))
}

/// Parses a signed decimal integer prefix after optional spaces. `0` if there is none.
pub(crate) fn int_prefix(source: &str) -> i64 {
    let trimmed = source.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let magnitude = digits
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0i64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(i64::from(digit))
        });
    if negative { -magnitude } else { magnitude }
}

/// Parses a decimal float prefix after optional spaces, like `strtod`. `0.0` if there is none.
pub(crate) fn float_prefix(source: &str) -> f64 {
    let trimmed = source.trim_start();
    let candidate_len = trimmed
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .unwrap_or(trimmed.len());
    let candidate = &trimmed[..candidate_len];
    (1..=candidate.len())
        .rev()
        .find_map(|len| {
            let prefix = &candidate[..len];
            prefix
                .ends_with(|c: char| c.is_ascii_digit() || c == '.')
                .then(|| prefix.parse::<f64>().ok())
                .flatten()
        })
        .unwrap_or(0.0)
}

/// Removes a pair of surrounding double quotes. A lone quote is kept.
pub(crate) fn strip_quotes(source: &str) -> &str {
    source
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(source)
}
