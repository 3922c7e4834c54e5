use std::env;
use std::sync::Arc;

use street402::{HttpTransport, WsConnector, X402Error};

/// Construction-time configuration for [`X402Client`](crate::X402Client).
///
/// Only `gateway_base` is required. Transports left as `None` fall back to
/// the built-in `reqwest` / `tokio-tungstenite` implementations when the
/// corresponding cargo features are enabled.
#[derive(Clone)]
pub struct SdkOptions {
    /// Gateway base URL, e.g. `https://gateway.402-street.com`
    pub gateway_base: String,
    /// Socket base URL, e.g. `ws://localhost:8080/ws` (derived when `None`)
    pub ws_base: Option<String>,
    pub http: Option<Arc<dyn HttpTransport>>,
    pub connector: Option<Arc<dyn WsConnector>>,
    pub default_currency: Option<String>,
    pub default_amount: Option<f64>,
}

impl std::fmt::Debug for SdkOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let describe = |custom: bool| if custom { "<custom>" } else { "<ambient>" };
        f.debug_struct("SdkOptions")
            .field("gateway_base", &self.gateway_base)
            .field("ws_base", &self.ws_base)
            .field("http", &describe(self.http.is_some()))
            .field("connector", &describe(self.connector.is_some()))
            .field("default_currency", &self.default_currency)
            .field("default_amount", &self.default_amount)
            .finish()
    }
}

impl SdkOptions {
    pub fn new(gateway_base: impl Into<String>) -> Self {
        Self {
            gateway_base: gateway_base.into(),
            ws_base: None,
            http: None,
            connector: None,
            default_currency: None,
            default_amount: None,
        }
    }

    pub fn with_ws_base(mut self, ws_base: impl Into<String>) -> Self {
        self.ws_base = Some(ws_base.into());
        self
    }

    pub fn with_http_transport(mut self, http: Arc<dyn HttpTransport>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_connector(mut self, connector: Arc<dyn WsConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = Some(currency.into());
        self
    }

    pub fn with_default_amount(mut self, amount: f64) -> Self {
        self.default_amount = Some(amount);
        self
    }

    /// Load options from the environment.
    ///
    /// | Variable | Required |
    /// |---|---|
    /// | `X402_GATEWAY_BASE` | yes |
    /// | `X402_WS_BASE` | no |
    /// | `X402_DEFAULT_CURRENCY` | no |
    /// | `X402_DEFAULT_AMOUNT` | no |
    pub fn from_env() -> Result<Self, X402Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, X402Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let gateway_base = non_empty("X402_GATEWAY_BASE").ok_or_else(|| {
            X402Error::ConfigError("missing required environment variable: X402_GATEWAY_BASE".into())
        })?;

        let default_amount = match non_empty("X402_DEFAULT_AMOUNT") {
            Some(raw) => {
                let amount: f64 = raw.trim().parse().map_err(|_| {
                    X402Error::ConfigError(format!("invalid X402_DEFAULT_AMOUNT: {raw}"))
                })?;
                if !amount.is_finite() {
                    return Err(X402Error::ConfigError(format!(
                        "invalid X402_DEFAULT_AMOUNT: {raw}"
                    )));
                }
                Some(amount)
            }
            None => None,
        };

        Ok(Self {
            gateway_base,
            ws_base: non_empty("X402_WS_BASE"),
            http: None,
            connector: None,
            default_currency: non_empty("X402_DEFAULT_CURRENCY"),
            default_amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_requires_gateway_base() {
        let err = SdkOptions::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("X402_GATEWAY_BASE"));

        let err = SdkOptions::from_lookup(lookup(&[("X402_GATEWAY_BASE", "  ")])).unwrap_err();
        assert!(matches!(err, X402Error::ConfigError(_)));
    }

    #[test]
    fn test_from_lookup_reads_all_fields() {
        let opts = SdkOptions::from_lookup(lookup(&[
            ("X402_GATEWAY_BASE", "https://gw.test/"),
            ("X402_WS_BASE", "ws://localhost:8080/ws"),
            ("X402_DEFAULT_CURRENCY", "402ST"),
            ("X402_DEFAULT_AMOUNT", "1.5"),
        ]))
        .unwrap();
        assert_eq!(opts.gateway_base, "https://gw.test/");
        assert_eq!(opts.ws_base.as_deref(), Some("ws://localhost:8080/ws"));
        assert_eq!(opts.default_currency.as_deref(), Some("402ST"));
        assert_eq!(opts.default_amount, Some(1.5));
        assert!(opts.http.is_none());
        assert!(opts.connector.is_none());
    }

    #[test]
    fn test_from_lookup_rejects_bad_amount() {
        for raw in ["abc", "NaN", "inf"] {
            let err = SdkOptions::from_lookup(lookup(&[
                ("X402_GATEWAY_BASE", "https://gw.test"),
                ("X402_DEFAULT_AMOUNT", raw),
            ]))
            .unwrap_err();
            assert!(err.to_string().contains("X402_DEFAULT_AMOUNT"), "{raw}");
        }
    }

    #[test]
    fn test_debug_hides_transports() {
        let opts = SdkOptions::new("https://gw.test").with_default_amount(2.0);
        let dbg = format!("{opts:?}");
        assert!(dbg.contains("https://gw.test"));
        assert!(dbg.contains("<ambient>"));
    }
}
