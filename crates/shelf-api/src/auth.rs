use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::Error;

/// Name of the project-key header the table service expects.
pub const API_KEY_HEADER: &str = "apikey";

/// Build the static auth headers sent with every resource request.
///
/// The table service wants the same key twice: raw in `apikey` and as a
/// bearer token in `Authorization`. Both values are marked sensitive so
/// they never show up in `Debug` output.
pub fn api_key_headers(api_key: &SecretString) -> Result<HeaderMap, Error> {
    let key = api_key.expose_secret();

    let mut raw = HeaderValue::from_str(key)
        .map_err(|e| Error::InvalidHeader(format!("invalid API key header value: {e}")))?;
    raw.set_sensitive(true);

    let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
        .map_err(|e| Error::InvalidHeader(format!("invalid bearer header value: {e}")))?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(API_KEY_HEADER, raw);
    headers.insert(AUTHORIZATION, bearer);
    Ok(headers)
}
