//! The tokio connection loop in front of a [`Dispatcher`].

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use log::{debug, error, info, warn};

use crate::parser::{declared_content_length, head_length, parse_request};
use crate::server::config::ServerConfig;
use crate::server::dispatcher::Dispatcher;
use crate::server::error::Error;
use crate::server::response::{HttpResponse, StatusCode};

/// How long in-flight connections may run once shutdown starts.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Back-off after a failed `accept`.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// An HTTP server answering every connection through a shared [`Dispatcher`].
pub struct HttpServer {
    pub config: ServerConfig,
    /// The frozen routing state shared by all connections.
    pub dispatcher: Arc<Dispatcher>,
}

impl HttpServer {
    /// Create a server for the routes of `dispatcher`.
    pub fn new(config: ServerConfig, dispatcher: Dispatcher) -> Self {
        Self {
            config,
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Bind the configured address and serve until Ctrl+C.
    pub async fn start(&self) -> Result<(), Error> {
        let listener = TcpListener::bind(self.config.addr).await?;
        info!("Server listening on http://{}", self.config.addr);

        self.serve_with_shutdown(listener, async {
            match signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
                Err(e) => {
                    error!("Error setting up Ctrl+C handler: {e}");
                    // Without a signal handler the server runs until the process is killed
                    std::future::pending::<()>().await;
                }
            }
        })
        .await
    }

    /// Serve connections from `listener` until `shutdown` completes.
    ///
    /// At most `max_connections` connections are handled at once; any above
    /// that are answered with `503 Service Unavailable`. After `shutdown`
    /// fires no new connections are accepted and running ones get a grace
    /// period to finish.
    pub async fn serve_with_shutdown<S>(&self, listener: TcpListener, shutdown: S) -> Result<(), Error>
    where
        S: Future<Output = ()>,
    {
        self.log_routes();

        let permits = Arc::new(Semaphore::new(self.config.max_connections));
        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutting down server...");
                    break;
                }

                accepted = listener.accept() => match accepted {
                    Ok((socket, addr)) => self.spawn_connection(socket, addr, &permits, &mut connections).await,
                    Err(e) => {
                        error!("Error accepting connection: {e}");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },

                // Reap finished connections so the set does not grow unbounded
                Some(finished) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(e) = finished {
                        error!("Connection task failed: {e}");
                    }
                }
            }
        }

        Self::drain(connections).await;
        Ok(())
    }

    fn log_routes(&self) {
        info!("Registered endpoints:");
        for (method, pattern) in self.dispatcher.routes() {
            info!("  {method:>4} {pattern}");
        }
    }

    /// Hand an accepted socket to its own task, or turn it away when the
    /// server is at capacity.
    async fn spawn_connection(
        &self,
        mut socket: TcpStream,
        addr: SocketAddr,
        permits: &Arc<Semaphore>,
        connections: &mut JoinSet<()>,
    ) {
        let Ok(permit) = Arc::clone(permits).try_acquire_owned() else {
            warn!("Connection limit reached, rejecting connection from {addr}");
            let response = HttpResponse::new(StatusCode::ServiceUnavailable)
                .with_content_type("text/plain")
                .with_body_string("Server is at capacity, please try again later");
            if let Err(e) = socket.write_all(&response.to_bytes()).await {
                debug!("Could not send 503 to {addr}: {e}");
            }
            return;
        };

        let dispatcher = Arc::clone(&self.dispatcher);
        let config = self.config.clone();
        connections.spawn(async move {
            // Held until the connection is done
            let _permit = permit;

            match Self::handle_connection(&mut socket, &dispatcher, &config).await {
                Ok(()) => {}
                Err(e @ (Error::ParseError(_) | Error::IncompleteRequest { .. } | Error::RequestTooLarge(_))) => {
                    warn!("Rejected request from {addr}: {e}")
                }
                Err(e) => error!("Error handling connection from {addr}: {e}"),
            }
        });
    }

    /// Wait for the remaining connections, up to [`SHUTDOWN_GRACE`].
    async fn drain(mut connections: JoinSet<()>) {
        info!("Waiting for {} active connections to complete...", connections.len());

        let finished = tokio::time::timeout(SHUTDOWN_GRACE, async {
            while let Some(res) = connections.join_next().await {
                if let Err(e) = res {
                    error!("Task failed during shutdown: {e}");
                }
            }
        })
        .await;

        if finished.is_err() {
            warn!("Aborting {} connections still running after {SHUTDOWN_GRACE:?}", connections.len());
            connections.abort_all();
        }
        info!("Server shutdown complete");
    }

    /// Handle a single connection.
    ///
    /// Reads one request, runs it through the dispatcher and writes the
    /// response. Unmatched routes are answered by the dispatcher with a `404`
    /// and are not an error here. Unparsable or truncated requests get a `400`
    /// and requests above `max_request_size` a `413`; both return the error.
    pub async fn handle_connection(
        socket: &mut (impl AsyncRead + AsyncWrite + Unpin),
        dispatcher: &Dispatcher,
        config: &ServerConfig,
    ) -> Result<(), Error> {
        let raw = match read_request(socket, config.read_buffer_size, config.max_request_size).await {
            Ok(Some(raw)) => raw,
            // Closed before sending anything
            Ok(None) => return Ok(()),
            Err(e @ Error::IncompleteRequest { .. }) => return reject(socket, StatusCode::BadRequest, e).await,
            Err(e @ Error::RequestTooLarge(_)) => return reject(socket, StatusCode::PayloadTooLarge, e).await,
            Err(e) => return Err(e),
        };

        match parse_request(&raw) {
            Ok(request) => {
                let response = dispatcher.dispatch(request);
                write_response(socket, &response).await?;
                Ok(())
            }
            Err(e) => reject(socket, StatusCode::BadRequest, Error::ParseError(e)).await,
        }
    }
}

/// Buffer one request off `socket`.
///
/// Reads in chunks of `chunk_size` until the blank line after the headers has
/// arrived, then until the `Content-Length` body is complete. Returns `None`
/// if the peer closes without sending anything. A peer that closes before the
/// head is complete leaves the verdict to the parser.
async fn read_request(
    socket: &mut (impl AsyncRead + Unpin),
    chunk_size: usize,
    max_size: usize,
) -> Result<Option<Vec<u8>>, Error> {
    let mut buf = Vec::new();
    let mut chunk = vec![0; chunk_size.max(1)];
    let mut expected = None;

    loop {
        if expected.is_none() {
            expected = head_length(&buf).map(|head| head + declared_content_length(&buf[..head]));
        }
        match expected {
            Some(total) if total > max_size => return Err(Error::RequestTooLarge(max_size)),
            Some(total) if buf.len() >= total => return Ok(Some(buf)),
            None if buf.len() > max_size => return Err(Error::RequestTooLarge(max_size)),
            _ => {}
        }

        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return match expected {
                Some(total) => Err(Error::IncompleteRequest { expected: total, received: buf.len() }),
                None if buf.is_empty() => Ok(None),
                None => Ok(Some(buf)),
            };
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

/// Answer with a plain-text error and hand `error` back to the caller.
async fn reject(
    socket: &mut (impl AsyncWrite + Unpin),
    status: StatusCode,
    error: Error,
) -> Result<(), Error> {
    let message = match &error {
        Error::ParseError(e) => format!("Error parsing request: {e}"),
        e => e.to_string(),
    };
    let response = HttpResponse::new(status)
        .with_content_type("text/plain")
        .with_body_string(message);
    write_response(socket, &response).await?;
    Err(error)
}

async fn write_response(socket: &mut (impl AsyncWrite + Unpin), response: &HttpResponse) -> io::Result<()> {
    socket.write_all(&response.to_bytes()).await?;
    socket.flush().await
}
