//! Core types for the street402 device-unlock gateway.
//!
//! The gateway sells access to devices over HTTP 402:
//!
//! 1. `GET /pay/{deviceId}` answers `402` with a [`PaymentRequest`] challenge
//! 2. the payer signs a transaction out of band and `POST /verify`s it
//! 3. the gateway pushes an [`UnlockEvent`] on its WebSocket
//!
//! This crate holds the wire model, the error type and the transport traits.
//! The client itself lives in `street402-client`.

pub mod constants;
pub mod error;
pub mod payment;
pub mod transport;
pub mod utils;

pub use constants::*;
pub use error::X402Error;
pub use payment::*;
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, InboundMessage, WsConnection,
    WsConnector,
};
pub use utils::{derive_ws_url, headers_to_string};
