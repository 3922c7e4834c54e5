use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use street402::utils::encode_component;
use street402::{
    derive_ws_url, headers_to_string, HttpRequest, HttpTransport, InboundMessage, PayResponse,
    PaymentRequest, UnlockEvent, VerifyBody, VerifyResult, WsConnection, WsConnector, X402Error,
    DEFAULT_AMOUNT, DEFAULT_CURRENCY, DEFAULT_UNLOCK_TIMEOUT, PAYMENT_REQUEST_HEADER,
    PAYMENT_REQUIRED_MESSAGE, UNLOCK_EVENT_TYPE, WS_PATH,
};

use crate::config::SdkOptions;

/// Client for the street402 gateway.
///
/// Configuration is fixed at construction; every method takes `&self` and
/// calls share no mutable state, so one client can serve concurrent tasks.
pub struct X402Client {
    gateway_base: String,
    ws_base: String,
    http: Arc<dyn HttpTransport>,
    connector: Arc<dyn WsConnector>,
    default_currency: String,
    default_amount: f64,
}

impl std::fmt::Debug for X402Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("X402Client")
            .field("gateway_base", &self.gateway_base)
            .field("ws_base", &self.ws_base)
            .field("default_currency", &self.default_currency)
            .field("default_amount", &self.default_amount)
            .finish_non_exhaustive()
    }
}

/// Input of [`X402Client::pay_and_unlock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayAndUnlockRequest {
    pub device_id: String,
    /// Transaction signature produced by the payer's wallet.
    pub txid: String,
    /// `reference` of the challenge returned by `request_payment`.
    pub reference: String,
    pub timeout: Option<Duration>,
}

/// Result of [`X402Client::pay_and_unlock`].
#[derive(Debug, Clone, PartialEq)]
pub enum PayAndUnlockOutcome {
    /// The gateway did not accept the transaction; no socket was opened.
    Rejected { verify: VerifyResult },
    Unlocked {
        unlock: UnlockEvent,
        verify: VerifyResult,
    },
}

impl PayAndUnlockOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, PayAndUnlockOutcome::Unlocked { .. })
    }

    pub fn verify(&self) -> &VerifyResult {
        match self {
            PayAndUnlockOutcome::Rejected { verify } => verify,
            PayAndUnlockOutcome::Unlocked { verify, .. } => verify,
        }
    }

    pub fn unlock(&self) -> Option<&UnlockEvent> {
        match self {
            PayAndUnlockOutcome::Rejected { .. } => None,
            PayAndUnlockOutcome::Unlocked { unlock, .. } => Some(unlock),
        }
    }
}

impl X402Client {
    /// Build a client.
    ///
    /// Fails with [`X402Error::ConfigError`] when the gateway URL cannot be
    /// turned into a socket URL, or when a transport was neither supplied nor
    /// compiled in (`reqwest` / `websocket` features).
    pub fn new(options: SdkOptions) -> Result<Self, X402Error> {
        let gateway_base = options.gateway_base.trim_end_matches('/').to_string();
        let ws_base = match options.ws_base {
            Some(ws_base) => ws_base,
            None => derive_ws_url(&gateway_base, WS_PATH)?,
        };

        let http = match options.http {
            Some(http) => http,
            None => ambient_http()?.ok_or_else(|| {
                X402Error::ConfigError(
                    "fetch not available; provide an HTTP transport in SdkOptions".to_string(),
                )
            })?,
        };
        let connector = match options.connector {
            Some(connector) => connector,
            None => ambient_connector().ok_or_else(|| {
                X402Error::ConfigError(
                    "WebSocket not available; provide a connector in SdkOptions".to_string(),
                )
            })?,
        };

        Ok(Self {
            gateway_base,
            ws_base,
            http,
            connector,
            default_currency: options
                .default_currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            default_amount: options.default_amount.unwrap_or(DEFAULT_AMOUNT),
        })
    }

    pub fn gateway_base(&self) -> &str {
        &self.gateway_base
    }

    pub fn ws_base(&self) -> &str {
        &self.ws_base
    }

    pub fn default_currency(&self) -> &str {
        &self.default_currency
    }

    pub fn default_amount(&self) -> f64 {
        self.default_amount
    }

    /// Ask the gateway for a payment challenge for `device_id`.
    ///
    /// The gateway normally answers `402 Payment Required`; that is the
    /// successful outcome of this call and is never turned into an error.
    /// The challenge is read from the `X-Payment-Request` header first and
    /// from the body's `payment` field otherwise.
    pub async fn request_payment(
        &self,
        device_id: &str,
        amount: Option<f64>,
        currency: Option<&str>,
    ) -> Result<PayResponse, X402Error> {
        let url = self.pay_url(
            device_id,
            amount.unwrap_or(self.default_amount),
            currency.unwrap_or(&self.default_currency),
        );
        tracing::debug!(%url, "requesting payment challenge");

        let resp = self.http.send(HttpRequest::get(url)).await?;
        let status = resp.status;
        let raw_headers = Some(headers_to_string(&resp.headers));

        // Unparseable bodies count as `{}`
        let body: Value = resp
            .json()
            .unwrap_or_else(|_| Value::Object(Default::default()));

        let header_challenge = resp
            .header(PAYMENT_REQUEST_HEADER)
            .filter(|raw| !raw.is_empty());
        let body_challenge = body.get("payment").filter(|v| !v.is_null());

        let payment = match (header_challenge, body_challenge) {
            (Some(raw), _) => Some(serde_json::from_str::<PaymentRequest>(raw).map_err(|e| {
                X402Error::InvalidChallenge(format!("{PAYMENT_REQUEST_HEADER} header: {e}"))
            })?),
            (None, Some(value)) => {
                let payment = PaymentRequest::deserialize(value)
                    .map_err(|e| X402Error::InvalidChallenge(format!("body payment: {e}")))?;
                return Ok(PayResponse {
                    ok: body.get("ok").and_then(Value::as_bool).unwrap_or(false),
                    message: body
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    payment: Some(payment),
                    raw_headers,
                    status,
                });
            }
            (None, None) => None,
        };

        Ok(PayResponse {
            ok: false,
            message: PAYMENT_REQUIRED_MESSAGE.to_string(),
            payment,
            raw_headers,
            status,
        })
    }

    /// Submit a signed transaction for verification.
    ///
    /// The gateway's JSON answer is returned as-is. Network failures and
    /// undecodable answers are errors; nothing is retried.
    pub async fn verify_payment(&self, body: &VerifyBody) -> Result<VerifyResult, X402Error> {
        let url = format!("{}/verify", self.gateway_base);
        tracing::debug!(%url, device_id = %body.device_id, reference = %body.reference, "verifying payment");

        let payload = serde_json::to_vec(body)?;
        let resp = self.http.send(HttpRequest::post_json(url, payload)).await?;
        resp.json::<VerifyResult>().map_err(|e| {
            X402Error::HttpError(format!(
                "failed to parse verify response (status {}): {e}",
                resp.status
            ))
        })
    }

    /// Wait for the gateway to push an unlock event for `device_id`.
    ///
    /// The deadline (default 15 s) starts before the socket is opened and is
    /// not extended by unrelated traffic. Binary, non-JSON and non-unlock
    /// messages are skipped. The socket is closed on every exit path.
    pub async fn wait_for_unlock(
        &self,
        device_id: &str,
        timeout: Option<Duration>,
    ) -> Result<UnlockEvent, X402Error> {
        let timeout = timeout.unwrap_or(DEFAULT_UNLOCK_TIMEOUT);
        let url = self.unlock_url(device_id);
        tracing::debug!(%url, ?timeout, "waiting for unlock");

        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        let mut conn = tokio::select! {
            conn = self.connector.connect(&url) => conn?,
            _ = &mut deadline => return Err(X402Error::Timeout(timeout)),
        };

        let outcome = tokio::select! {
            res = next_unlock(&mut *conn) => res,
            _ = &mut deadline => Err(X402Error::Timeout(timeout)),
        };

        if let Err(e) = conn.close().await {
            tracing::debug!(error = %e, "ignoring socket close error");
        }
        outcome
    }

    /// Verify a payment and, if accepted, wait for the matching unlock.
    ///
    /// `reference` comes from an earlier [`request_payment`](Self::request_payment)
    /// and `txid` from the payer's wallet; this method does neither step.
    pub async fn pay_and_unlock(
        &self,
        request: PayAndUnlockRequest,
    ) -> Result<PayAndUnlockOutcome, X402Error> {
        let PayAndUnlockRequest {
            device_id,
            txid,
            reference,
            timeout,
        } = request;

        let verify = self
            .verify_payment(&VerifyBody {
                txid,
                device_id: device_id.clone(),
                reference,
            })
            .await?;
        if !verify.ok {
            return Ok(PayAndUnlockOutcome::Rejected { verify });
        }

        let unlock = self.wait_for_unlock(&device_id, timeout).await?;
        Ok(PayAndUnlockOutcome::Unlocked { unlock, verify })
    }

    fn pay_url(&self, device_id: &str, amount: f64, currency: &str) -> String {
        format!(
            "{}/pay/{}?amount={}&currency={}",
            self.gateway_base,
            encode_component(device_id),
            amount,
            encode_component(currency)
        )
    }

    fn unlock_url(&self, device_id: &str) -> String {
        format!("{}?deviceId={}", self.ws_base, encode_component(device_id))
    }
}

/// Read until the first unlock event. Connection errors end the wait; a
/// stream closed by the peer leaves only the deadline to end it.
async fn next_unlock(conn: &mut dyn WsConnection) -> Result<UnlockEvent, X402Error> {
    while let Some(msg) = conn.next_message().await {
        match msg? {
            InboundMessage::Text(text) => {
                if let Some(event) = decode_unlock(&text) {
                    return Ok(event);
                }
            }
            InboundMessage::Binary(data) => {
                tracing::trace!(len = data.len(), "ignoring binary message");
            }
        }
    }
    tracing::debug!("socket closed by gateway before unlock");
    futures::future::pending().await
}

fn decode_unlock(text: &str) -> Option<UnlockEvent> {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(_) => {
            tracing::trace!("ignoring non-JSON message");
            return None;
        }
    };
    if value.get("type").and_then(Value::as_str) != Some(UNLOCK_EVENT_TYPE) {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring incomplete unlock message");
            None
        }
    }
}

#[cfg(feature = "reqwest")]
fn ambient_http() -> Result<Option<Arc<dyn HttpTransport>>, X402Error> {
    Ok(Some(Arc::new(crate::http_client::ReqwestTransport::new()?)))
}

#[cfg(not(feature = "reqwest"))]
fn ambient_http() -> Result<Option<Arc<dyn HttpTransport>>, X402Error> {
    Ok(None)
}

#[cfg(feature = "websocket")]
fn ambient_connector() -> Option<Arc<dyn WsConnector>> {
    Some(Arc::new(crate::ws_client::TungsteniteConnector::new()))
}

#[cfg(not(feature = "websocket"))]
fn ambient_connector() -> Option<Arc<dyn WsConnector>> {
    None
}
