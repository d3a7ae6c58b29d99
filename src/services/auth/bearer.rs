use crate::services::auth::failure::AuthFailure;

const SCHEME: &str = "bearer ";

/// Pull the token out of a raw `Authorization` header value.
///
/// The scheme is matched case-insensitively and must be followed by a single
/// space and exactly one non-empty token. No surrounding whitespace is allowed.
pub fn extract_bearer(header: &str) -> Result<&str, AuthFailure> {
    if header.len() < SCHEME.len() || !header.is_char_boundary(SCHEME.len()) {
        return Err(AuthFailure::MalformedHeader);
    }

    let (scheme, rest) = header.split_at(SCHEME.len());
    if !scheme.eq_ignore_ascii_case(SCHEME) {
        return Err(AuthFailure::MalformedHeader);
    }

    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return Err(AuthFailure::MalformedHeader);
    }
    Ok(rest)
}

/// At most 20 characters of a header, for log lines.
pub fn log_prefix(header: &str) -> &str {
    match header.char_indices().nth(20) {
        Some((idx, _)) => &header[..idx],
        None => header,
    }
}
