//! Where key sets come from.
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::services::auth::failure::AuthFailure;
use crate::services::auth::key_set::KeySet;

/// Source of the issuer's current key set.
///
/// Implementations must be safe to call concurrently; the authorizer holds
/// one behind an `Arc` and calls it once per request.
#[async_trait]
pub trait KeySetProvider: Send + Sync {
    // Where the keys come from (for logs).
    fn source(&self) -> &str;

    // Current key set.
    //
    // Returns `KeyFetchFailure`/`KeyFetchTimeout` when the endpoint cannot be
    // reached and `KeyNotFound` when the document is unusable.
    async fn fetch(&self) -> Result<KeySet, AuthFailure>;

    // Key set that should be searched for `kid`.
    //
    // Caching providers override this to go back to the issuer when their
    // copy does not know `kid` (the issuer may have rotated).
    async fn fetch_for(&self, _kid: &str) -> Result<KeySet, AuthFailure> {
        self.fetch().await
    }
}

/// Fetches the key-discovery document over HTTP on every call.
#[derive(Clone, Debug)]
pub struct HttpKeySetProvider {
    client: reqwest::Client,
    url: Url,
}

impl HttpKeySetProvider {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

fn transport_failure(e: reqwest::Error) -> AuthFailure {
    if e.is_timeout() {
        AuthFailure::KeyFetchTimeout
    } else {
        AuthFailure::KeyFetchFailure(e.to_string())
    }
}

#[async_trait]
impl KeySetProvider for HttpKeySetProvider {
    fn source(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch(&self) -> Result<KeySet, AuthFailure> {
        tracing::debug!(url = %self.url, "fetching key set");

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthFailure::KeyFetchFailure(format!(
                "key-set endpoint answered {}",
                status
            )));
        }

        let body = response.bytes().await.map_err(transport_failure)?;
        KeySet::from_json(&body)
    }
}
