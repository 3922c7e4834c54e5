use futures::future::BoxFuture;
use futures::StreamExt;
use street402::{InboundMessage, WsConnection, WsConnector, X402Error};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// Default [`WsConnector`] backed by `tokio-tungstenite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

impl TungsteniteConnector {
    pub fn new() -> Self {
        Self
    }
}

impl WsConnector for TungsteniteConnector {
    fn connect<'a>(
        &'a self,
        url: &'a str,
    ) -> BoxFuture<'a, Result<Box<dyn WsConnection>, X402Error>> {
        Box::pin(async move {
            let (stream, _) = tokio_tungstenite::connect_async(url)
                .await
                .map_err(|e| X402Error::ConnectionError(format!("connect failed: {e}")))?;
            tracing::debug!(url, "socket open");
            Ok(Box::new(TungsteniteConnection { stream }) as Box<dyn WsConnection>)
        })
    }
}

struct TungsteniteConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsConnection for TungsteniteConnection {
    fn next_message(&mut self) -> BoxFuture<'_, Option<Result<InboundMessage, X402Error>>> {
        Box::pin(async move {
            loop {
                match self.stream.next().await? {
                    Ok(Message::Text(text)) => {
                        return Some(Ok(InboundMessage::Text(text.as_str().to_owned())))
                    }
                    Ok(Message::Binary(data)) => return Some(Ok(InboundMessage::Binary(data.to_vec()))),
                    Ok(Message::Close(_)) => return None,
                    // ping/pong are answered by tungstenite itself
                    Ok(_) => continue,
                    Err(e) => return Some(Err(X402Error::ConnectionError(e.to_string()))),
                }
            }
        })
    }

    fn close(&mut self) -> BoxFuture<'_, Result<(), X402Error>> {
        Box::pin(async move {
            self.stream
                .close(None)
                .await
                .map_err(|e| X402Error::ConnectionError(format!("close failed: {e}")))
        })
    }
}
