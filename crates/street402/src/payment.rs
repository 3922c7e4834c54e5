use serde::{Deserialize, Serialize};

/// Currency symbol, e.g. `"USDC"` or `"402ST"`.
pub type Currency = String;

/// A gateway-issued payment challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: f64,
    pub currency: Currency,
    pub recipient: String,
    /// Correlates this challenge with the later `/verify` call.
    pub reference: String,
    /// Seconds the challenge stays valid.
    pub ttl: u64,
}

/// Result of `request_payment`.
///
/// `ok == false` together with a populated `payment` is the normal
/// "payment required" answer, not a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayResponse {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentRequest>,
    /// Response headers as `name: value` lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_headers: Option<String>,
    /// HTTP status of the gateway response.
    #[serde(default)]
    pub status: u16,
}

/// Body of `POST /verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyBody {
    pub txid: String,
    pub device_id: String,
    pub reference: String,
}

/// Response of `POST /verify`, returned to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResult {
    #[serde(default)]
    pub ok: bool,
    /// Number of sockets the unlock was pushed to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnlockKind {
    #[serde(rename = "unlock")]
    Unlock,
}

/// Notification pushed over the socket once a device is unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockEvent {
    #[serde(rename = "type")]
    pub kind: UnlockKind,
    pub device_id: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub txid: String,
}
