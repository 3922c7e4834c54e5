use futures::future::BoxFuture;
use street402::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, X402Error};

/// Default [`HttpTransport`] backed by `reqwest::Client`.
///
/// Redirects are not followed: the gateway answers `402` directly and a
/// redirect would drop the challenge header.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, X402Error> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| X402Error::ConfigError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// Use a preconfigured reqwest client (proxies, custom TLS, timeouts).
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, X402Error>> {
        Box::pin(async move {
            let method = match request.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
            };

            let mut req = self.http.request(method, &request.url);
            for (name, value) in &request.headers {
                req = req.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                req = req.body(body);
            }

            let resp = req
                .send()
                .await
                .map_err(|e| X402Error::HttpError(format!("request failed: {e}")))?;

            let status = resp.status().as_u16();
            let headers = resp
                .headers()
                .iter()
                .map(|(k, v)| {
                    (
                        k.as_str().to_string(),
                        String::from_utf8_lossy(v.as_bytes()).into_owned(),
                    )
                })
                .collect();
            let body = resp
                .bytes()
                .await
                .map_err(|e| X402Error::HttpError(format!("failed to read response body: {e}")))?
                .to_vec();

            tracing::trace!(status, url = %request.url, "gateway response");
            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        })
    }
}
