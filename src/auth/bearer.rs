//! `Authorization` header parsing.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BearerError {
    #[error("missing Authorization header")]
    MissingHeader,

    #[error("malformed Authorization header")]
    MalformedHeader,

    #[error("unsupported authorization scheme")]
    UnsupportedScheme,
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
///
/// The header must split into exactly a scheme and a token; the scheme is
/// compared case-insensitively against `bearer`.
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, BearerError> {
    let value = header.ok_or(BearerError::MissingHeader)?;

    let mut parts = value.split_whitespace();
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(BearerError::MalformedHeader);
    };

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(BearerError::UnsupportedScheme);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_token() {
        assert_eq!(extract_bearer_token(Some("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        assert_eq!(extract_bearer_token(Some("bearer tok")), Ok("tok"));
        assert_eq!(extract_bearer_token(Some("BEARER tok")), Ok("tok"));
    }

    #[test]
    fn missing_header() {
        assert_eq!(extract_bearer_token(None), Err(BearerError::MissingHeader));
    }

    #[test]
    fn malformed_headers() {
        assert_eq!(
            extract_bearer_token(Some("Bearer")),
            Err(BearerError::MalformedHeader)
        );
        assert_eq!(
            extract_bearer_token(Some("Bearer one two")),
            Err(BearerError::MalformedHeader)
        );
        assert_eq!(extract_bearer_token(Some("")), Err(BearerError::MalformedHeader));
        assert_eq!(extract_bearer_token(Some("   ")), Err(BearerError::MalformedHeader));
    }

    #[test]
    fn wrong_scheme() {
        assert_eq!(
            extract_bearer_token(Some("Basic dXNlcjpwdw==")),
            Err(BearerError::UnsupportedScheme)
        );
    }
}
