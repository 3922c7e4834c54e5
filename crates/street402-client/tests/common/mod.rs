//! In-memory transports for driving `X402Client` without a network.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use street402_client::{
    HttpRequest, HttpResponse, HttpTransport, InboundMessage, SdkOptions, WsConnection,
    WsConnector, X402Error,
};

type Responder = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse, X402Error> + Send + Sync>;

/// Answers every request with `responder` and records what was sent.
pub struct MockHttp {
    responder: Responder,
    pub requests: Mutex<Vec<HttpRequest>>,
}

impl MockHttp {
    pub fn new(
        responder: impl Fn(&HttpRequest) -> Result<HttpResponse, X402Error> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Always answer with the same status, headers and body.
    pub fn fixed(status: u16, headers: &[(&str, &str)], body: &str) -> Arc<Self> {
        let resp = HttpResponse {
            status,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.as_bytes().to_vec(),
        };
        Self::new(move |_| Ok(resp.clone()))
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for MockHttp {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, X402Error>> {
        let result = (self.responder)(&request);
        self.requests.lock().unwrap().push(request);
        Box::pin(async move { result })
    }
}

/// One scripted event on a mock socket.
#[derive(Debug, Clone)]
pub enum Step {
    Text(String),
    Binary(Vec<u8>),
    Error(String),
    Delay(Duration),
}

pub fn text(s: &str) -> Step {
    Step::Text(s.to_string())
}

/// What the socket does once the script runs out.
#[derive(Debug, Clone, Copy)]
pub enum End {
    /// Stay open and silent.
    Hang,
    /// Report the stream as closed by the peer.
    Close,
}

/// Hands out connections that replay a fixed script.
pub struct MockConnector {
    script: Vec<Step>,
    end: End,
    fail_connect: bool,
    close_fails: bool,
    pub opened: Mutex<Vec<String>>,
    pub closes: Arc<AtomicUsize>,
    pub consumed: Arc<AtomicUsize>,
}

impl MockConnector {
    pub fn new(script: Vec<Step>, end: End) -> Arc<Self> {
        Arc::new(Self::build(script, end, false, false))
    }

    pub fn refusing() -> Arc<Self> {
        Arc::new(Self::build(Vec::new(), End::Hang, true, false))
    }

    pub fn with_failing_close(script: Vec<Step>) -> Arc<Self> {
        Arc::new(Self::build(script, End::Hang, false, true))
    }

    fn build(script: Vec<Step>, end: End, fail_connect: bool, close_fails: bool) -> Self {
        Self {
            script,
            end,
            fail_connect,
            close_fails,
            opened: Mutex::new(Vec::new()),
            closes: Arc::new(AtomicUsize::new(0)),
            consumed: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Data/error steps handed to the client so far.
    pub fn consumed_count(&self) -> usize {
        self.consumed.load(Ordering::SeqCst)
    }
}

impl WsConnector for MockConnector {
    fn connect<'a>(
        &'a self,
        url: &'a str,
    ) -> BoxFuture<'a, Result<Box<dyn WsConnection>, X402Error>> {
        Box::pin(async move {
            if self.fail_connect {
                return Err(X402Error::ConnectionError("connection refused".to_string()));
            }
            self.opened.lock().unwrap().push(url.to_string());
            Ok(Box::new(MockConnection {
                steps: self.script.clone().into(),
                end: self.end,
                close_fails: self.close_fails,
                closes: self.closes.clone(),
                consumed: self.consumed.clone(),
            }) as Box<dyn WsConnection>)
        })
    }
}

struct MockConnection {
    steps: VecDeque<Step>,
    end: End,
    close_fails: bool,
    closes: Arc<AtomicUsize>,
    consumed: Arc<AtomicUsize>,
}

impl WsConnection for MockConnection {
    fn next_message(&mut self) -> BoxFuture<'_, Option<Result<InboundMessage, X402Error>>> {
        Box::pin(async move {
            loop {
                let step = match self.steps.pop_front() {
                    Some(step) => step,
                    None => match self.end {
                        End::Hang => futures::future::pending().await,
                        End::Close => return None,
                    },
                };
                let item = match step {
                    Step::Delay(d) => {
                        tokio::time::sleep(d).await;
                        continue;
                    }
                    Step::Text(s) => Ok(InboundMessage::Text(s)),
                    Step::Binary(b) => Ok(InboundMessage::Binary(b)),
                    Step::Error(e) => Err(X402Error::ConnectionError(e)),
                };
                self.consumed.fetch_add(1, Ordering::SeqCst);
                return Some(item);
            }
        })
    }

    fn close(&mut self) -> BoxFuture<'_, Result<(), X402Error>> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        let fails = self.close_fails;
        Box::pin(async move {
            if fails {
                Err(X402Error::ConnectionError("already closed".to_string()))
            } else {
                Ok(())
            }
        })
    }
}

pub fn options(
    gateway_base: &str,
    http: Arc<MockHttp>,
    connector: Arc<MockConnector>,
) -> SdkOptions {
    SdkOptions::new(gateway_base)
        .with_http_transport(http)
        .with_connector(connector)
}

pub fn json_response(status: u16, body: serde_json::Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: serde_json::to_vec(&body).unwrap(),
    }
}

pub const UNLOCK_DEV1: &str = r#"{"type":"unlock","deviceId":"dev1","ref":"ref1","txid":"tx1"}"#;
