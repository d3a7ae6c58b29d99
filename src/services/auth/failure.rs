use thiserror::Error;

/// Why a token's claims were rejected after the signature checked out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimIssue {
    #[error("token expired")]
    Expired,
    #[error("token not yet valid")]
    NotYetValid,
    #[error("unexpected issuer")]
    Issuer,
    #[error("unexpected audience")]
    Audience,
    #[error("missing or empty '{0}' claim")]
    MissingClaim(String),
}

/// Every way an authorization attempt can fail.
///
/// None of these ever reach the caller: `Authorizer::authorize` logs the
/// variant and answers with a plain Deny.
#[derive(Debug, Error)]
pub enum AuthFailure {
    #[error("authorization header missing or not of the form 'Bearer <token>'")]
    MalformedHeader,

    #[error("token is not a decodable three-part JWT: {0}")]
    MalformedToken(String),

    #[error("key-set fetch failed: {0}")]
    KeyFetchFailure(String),

    #[error("key-set fetch timed out")]
    KeyFetchTimeout,

    #[error("no usable signing key: {0}")]
    KeyNotFound(String),

    #[error("signature rejected: {0}")]
    SignatureInvalid(String),

    #[error("claim rejected: {0}")]
    ClaimInvalid(#[from] ClaimIssue),
}

impl AuthFailure {
    /// Stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedHeader => "MalformedHeader",
            Self::MalformedToken(_) => "MalformedToken",
            Self::KeyFetchFailure(_) => "KeyFetchFailure",
            Self::KeyFetchTimeout => "KeyFetchTimeout",
            Self::KeyNotFound(_) => "KeyNotFound",
            Self::SignatureInvalid(_) => "SignatureInvalid",
            Self::ClaimInvalid(_) => "ClaimInvalid",
        }
    }

    /// Pipeline stage the failure came from.
    pub fn step(&self) -> &'static str {
        match self {
            Self::MalformedHeader => "extract",
            Self::MalformedToken(_) => "decode",
            Self::KeyFetchFailure(_) | Self::KeyFetchTimeout | Self::KeyNotFound(_) => {
                "resolve_key"
            }
            Self::SignatureInvalid(_) => "verify_signature",
            Self::ClaimInvalid(_) => "validate_claims",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthFailure {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => Self::ClaimInvalid(ClaimIssue::Expired),
            ErrorKind::ImmatureSignature => Self::ClaimInvalid(ClaimIssue::NotYetValid),
            ErrorKind::InvalidIssuer => Self::ClaimInvalid(ClaimIssue::Issuer),
            ErrorKind::InvalidAudience => Self::ClaimInvalid(ClaimIssue::Audience),
            ErrorKind::MissingRequiredClaim(name) => {
                Self::ClaimInvalid(ClaimIssue::MissingClaim(name.clone()))
            }
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => Self::MalformedToken(e.to_string()),
            ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidKeyFormat => {
                Self::KeyNotFound(format!("certificate material unusable: {}", e))
            }
            // InvalidSignature, InvalidAlgorithm, InvalidAlgorithmName, crypto errors
            _ => Self::SignatureInvalid(e.to_string()),
        }
    }
}
