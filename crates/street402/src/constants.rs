use std::time::Duration;

/// Currency used when a call does not name one.
pub const DEFAULT_CURRENCY: &str = "USDC";

/// Gateway-native token symbol.
pub const STREET_TOKEN: &str = "402ST";

/// Amount requested when a call does not name one.
pub const DEFAULT_AMOUNT: f64 = 0.25;

/// How long `wait_for_unlock` waits when no timeout is given.
pub const DEFAULT_UNLOCK_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Path of the gateway's unlock notification socket.
pub const WS_PATH: &str = "/ws";

/// Response header carrying the JSON-encoded payment challenge.
pub const PAYMENT_REQUEST_HEADER: &str = "X-Payment-Request";

/// Message attached to a synthesized "payment required" response.
pub const PAYMENT_REQUIRED_MESSAGE: &str = "Payment Required (x402)";

/// Value of the `type` field on unlock notifications.
pub const UNLOCK_EVENT_TYPE: &str = "unlock";
