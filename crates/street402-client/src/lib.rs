//! Client SDK for the street402 device-unlock gateway.
//!
//! Wraps the gateway's three calls: fetch a payment challenge, verify a
//! signed transaction, and wait for the unlock notification on the gateway's
//! WebSocket. Signing the transaction is left to the caller's wallet.
//!
//! # Quick Example
//!
//! ```no_run
//! use street402_client::{PayAndUnlockRequest, SdkOptions, X402Client};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), street402_client::X402Error> {
//! let client = X402Client::new(SdkOptions::new("https://gateway.402-street.com"))?;
//!
//! let challenge = client.request_payment("vending-7", None, None).await?;
//! let payment = challenge.payment.expect("gateway sent no challenge");
//!
//! // ... pay `payment.amount` to `payment.recipient` with a wallet ...
//! let txid = "5xSig".to_string();
//!
//! let outcome = client
//!     .pay_and_unlock(PayAndUnlockRequest {
//!         device_id: "vending-7".to_string(),
//!         txid,
//!         reference: payment.reference,
//!         timeout: None,
//!     })
//!     .await?;
//!
//! if let Some(unlock) = outcome.unlock() {
//!     println!("unlocked {} via {}", unlock.device_id, unlock.txid);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
#[cfg(feature = "reqwest")]
mod http_client;
#[cfg(feature = "websocket")]
mod ws_client;

pub use client::{PayAndUnlockOutcome, PayAndUnlockRequest, X402Client};
pub use config::SdkOptions;
#[cfg(feature = "reqwest")]
pub use http_client::ReqwestTransport;
#[cfg(feature = "websocket")]
pub use ws_client::TungsteniteConnector;

// Re-export commonly needed types from core
pub use street402::{
    derive_ws_url, headers_to_string, Currency, HttpMethod, HttpRequest, HttpResponse,
    HttpTransport, InboundMessage, PayResponse, PaymentRequest, UnlockEvent, UnlockKind,
    VerifyBody, VerifyResult, WsConnection, WsConnector, X402Error, DEFAULT_AMOUNT,
    DEFAULT_CURRENCY, DEFAULT_UNLOCK_TIMEOUT,
};
