use std::time::Duration;

use serde_json::json;
use street402_client::{
    PayAndUnlockOutcome, PayAndUnlockRequest, SdkOptions, VerifyBody, X402Client, X402Error,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "\
usage:
  street402 request <device-id> [amount] [currency]
  street402 verify <device-id> <reference> <txid>
  street402 wait <device-id> [timeout-ms]
  street402 pay-and-unlock <device-id> <reference> <txid> [timeout-ms]

environment:
  X402_GATEWAY_BASE      gateway URL (required)
  X402_WS_BASE           socket URL (default: derived from X402_GATEWAY_BASE)
  X402_DEFAULT_CURRENCY  default currency (default: USDC)
  X402_DEFAULT_AMOUNT    default amount (default: 0.25)";

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        usage_exit();
    };

    let client = match SdkOptions::from_env().and_then(X402Client::new) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("ERROR: {e}\n\n{USAGE}");
            std::process::exit(1);
        }
    };
    tracing::info!(gateway = client.gateway_base(), ws = client.ws_base(), "street402");

    let result = match (command.as_str(), &args[1..]) {
        ("request", [device_id, rest @ ..]) if rest.len() <= 2 => {
            let amount = match rest.first() {
                Some(raw) => Some(parse_or_exit::<f64>(raw, "amount")),
                None => None,
            };
            let currency = rest.get(1).map(String::as_str);
            client
                .request_payment(device_id, amount, currency)
                .await
                .and_then(|resp| Ok(serde_json::to_value(resp)?))
        }
        ("verify", [device_id, reference, txid]) => client
            .verify_payment(&VerifyBody {
                txid: txid.clone(),
                device_id: device_id.clone(),
                reference: reference.clone(),
            })
            .await
            .and_then(|res| Ok(serde_json::to_value(res)?)),
        ("wait", [device_id, rest @ ..]) if rest.len() <= 1 => {
            let timeout = rest.first().map(|raw| timeout_or_exit(raw));
            client
                .wait_for_unlock(device_id, timeout)
                .await
                .and_then(|ev| Ok(serde_json::to_value(ev)?))
        }
        ("pay-and-unlock", [device_id, reference, txid, rest @ ..]) if rest.len() <= 1 => {
            let timeout = rest.first().map(|raw| timeout_or_exit(raw));
            client
                .pay_and_unlock(PayAndUnlockRequest {
                    device_id: device_id.clone(),
                    txid: txid.clone(),
                    reference: reference.clone(),
                    timeout,
                })
                .await
                .and_then(outcome_json)
        }
        _ => usage_exit(),
    };

    match result {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("ERROR: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    }
}

fn outcome_json(outcome: PayAndUnlockOutcome) -> Result<serde_json::Value, X402Error> {
    Ok(match outcome {
        PayAndUnlockOutcome::Rejected { verify } => json!({
            "ok": false,
            "verifyRes": verify,
        }),
        PayAndUnlockOutcome::Unlocked { unlock, verify } => json!({
            "ok": true,
            "unlock": unlock,
            "verifyRes": verify,
        }),
    })
}

fn timeout_or_exit(raw: &str) -> Duration {
    Duration::from_millis(parse_or_exit::<u64>(raw, "timeout-ms"))
}

fn parse_or_exit<T: std::str::FromStr>(raw: &str, what: &str) -> T {
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            eprintln!("ERROR: invalid {what}: {raw}\n\n{USAGE}");
            std::process::exit(2);
        }
    }
}

fn usage_exit() -> ! {
    eprintln!("{USAGE}");
    std::process::exit(2);
}
