use url::Url;

use crate::error::X402Error;

/// Derive the socket endpoint that belongs to an HTTP(S) gateway base.
///
/// `https` becomes `wss`, every other scheme becomes `ws`. The path is
/// replaced by `ws_path` (with exactly one leading slash) and any query or
/// fragment is dropped.
pub fn derive_ws_url(http_base: &str, ws_path: &str) -> Result<String, X402Error> {
    let mut url = Url::parse(http_base)
        .map_err(|e| X402Error::ConfigError(format!("invalid gateway URL {http_base:?}: {e}")))?;

    let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
    url.set_scheme(scheme).map_err(|_| {
        X402Error::ConfigError(format!(
            "cannot derive a {scheme} URL from {http_base:?}; set ws_base explicitly"
        ))
    })?;
    url.set_path(&format!("/{}", ws_path.trim_start_matches('/')));
    url.set_query(None);
    url.set_fragment(None);
    Ok(url.to_string())
}

/// Flatten headers into newline-separated `name: value` lines.
pub fn headers_to_string(headers: &[(String, String)]) -> String {
    headers
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Percent-encode a single path segment or query value.
pub fn encode_component(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
