//! String canonicalisation used by the `CleanVersion` and `NormalizeBrand` steps.

/// Canonicalise a version string.
///
/// - `_` and runs of whitespace become `.`
/// - runs of `.` collapse into one
/// - leading and trailing `.` are dropped
///
/// ```
/// use uawalk::clean_version;
///
/// assert_eq!(clean_version("10_3_2"), "10.3.2");
/// assert_eq!(clean_version("4..0"), "4.0");
/// assert_eq!(clean_version("_1_2_"), "1.2");
/// ```
#[must_use]
pub fn clean_version(version: &str) -> String {
    let mut out = String::with_capacity(version.len());
    let mut pending_dot = false;
    for c in version.chars() {
        if c == '.' || c == '_' || c.is_whitespace() {
            pending_dot = true;
            continue;
        }
        if pending_dot && !out.is_empty() {
            out.push('.');
        }
        pending_dot = false;
        out.push(c);
    }
    out
}

/// Title-case a brand name, token by token.
///
/// Tokens are separated by whitespace, which is kept verbatim. A token of at
/// most three characters without any lower-case letter (`HTC`, `LG`, `ZTE`) is
/// kept as written; every other token gets an upper-case first character and
/// lower-case remainder.
///
/// ```
/// use uawalk::normalize_brand;
///
/// assert_eq!(normalize_brand("SAMSUNG"), "Samsung");
/// assert_eq!(normalize_brand("sony ericsson"), "Sony Ericsson");
/// assert_eq!(normalize_brand("HTC"), "HTC");
/// ```
#[must_use]
pub fn normalize_brand(brand: &str) -> String {
    let mut out = String::with_capacity(brand.len());
    let mut rest = brand;
    while !rest.is_empty() {
        let split = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (token, tail) = rest.split_at(split);
        push_brand_token(&mut out, token);

        let gap = tail
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(tail.len());
        out.push_str(&tail[..gap]);
        rest = &tail[gap..];
    }
    out
}

fn push_brand_token(out: &mut String, token: &str) {
    if token.chars().count() <= 3 && !token.chars().any(char::is_lowercase) {
        out.push_str(token);
        return;
    }

    let mut chars = token.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        for c in chars {
            out.extend(c.to_lowercase());
        }
    }
}
