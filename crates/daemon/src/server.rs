// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket server and connection handling.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use al_adapters::{IdentityError, IdentityResolver};
use al_core::{BadRequest, Clock, Credential, Fields, LockManager, LockResponse, LockStore};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Notify;
use tracing::{debug, error, info, Instrument};

use crate::protocol::{self, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION};

/// Shared state for all connections
pub struct ServerContext<S: LockStore, C: Clock, R: IdentityResolver> {
    pub manager: LockManager<S, C>,
    pub resolver: R,
    /// When the daemon started
    pub start_time: Instant,
    shutdown: Notify,
}

impl<S: LockStore, C: Clock, R: IdentityResolver> ServerContext<S, C, R> {
    pub fn new(manager: LockManager<S, C>, resolver: R) -> Self {
        Self {
            manager,
            resolver,
            start_time: Instant::now(),
            shutdown: Notify::new(),
        }
    }

    pub fn request_shutdown(&self) {
        self.shutdown.notify_one();
    }

    /// Resolves once a shutdown has been requested
    pub async fn shutdown_requested(&self) {
        self.shutdown.notified().await;
    }
}

/// Accept connections until a shutdown is requested, one task per connection
pub async fn serve<S, C, R>(listener: &UnixListener, ctx: Arc<ServerContext<S, C, R>>)
where
    S: LockStore + 'static,
    C: Clock + 'static,
    R: IdentityResolver,
{
    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, _)) => {
                        let ctx = Arc::clone(&ctx);
                        let span = tracing::info_span!("request", id = %uuid::Uuid::new_v4());
                        tokio::spawn(
                            async move {
                                if let Err(e) = handle_connection(&ctx, stream).await {
                                    error!("Error handling connection: {}", e);
                                }
                            }
                            .instrument(span),
                        );
                    }
                    Err(e) => {
                        error!("Error accepting connection: {}", e);
                    }
                }
            }

            _ = ctx.shutdown_requested() => {
                info!("Shutdown requested via IPC");
                break;
            }
        }
    }
}

/// Handle a single client connection
pub async fn handle_connection<S, C, R>(
    ctx: &ServerContext<S, C, R>,
    stream: UnixStream,
) -> Result<(), ServerError>
where
    S: LockStore,
    C: Clock,
    R: IdentityResolver,
{
    let (mut reader, mut writer) = stream.into_split();

    let request = match protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await {
        Ok(req) => req,
        Err(protocol::ProtocolError::Timeout) => {
            error!("Request read timeout");
            return Err(ServerError::Timeout);
        }
        Err(protocol::ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected before sending request");
            return Ok(());
        }
        Err(e) => {
            error!("Failed to read request: {}", e);
            let response = Response::Error {
                message: e.to_string(),
            };
            let _ = protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT).await;
            return Err(ServerError::Protocol(e));
        }
    };

    debug!("Received request: {:?}", request);

    let response = handle_request(ctx, request).await;

    debug!("Sending response: {:?}", response);

    protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT)
        .await
        .map_err(ServerError::Protocol)?;

    Ok(())
}

/// Handle a single request and return a response
pub async fn handle_request<S, C, R>(ctx: &ServerContext<S, C, R>, request: Request) -> Response
where
    S: LockStore,
    C: Clock,
    R: IdentityResolver,
{
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version: _ } => Response::Hello {
            version: PROTOCOL_VERSION.to_string(),
        },

        Request::Status => match ctx.manager.store().counts() {
            Ok(counts) => {
                let apps: BTreeMap<String, usize> = ctx
                    .manager
                    .apps()
                    .iter()
                    .map(|app| (app.to_string(), counts.get(app).copied().unwrap_or(0)))
                    .collect();
                Response::Status {
                    uptime_secs: ctx.start_time.elapsed().as_secs(),
                    apps,
                    records: counts.values().sum(),
                }
            }
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        },

        Request::Shutdown => {
            ctx.request_shutdown();
            Response::ShuttingDown
        }

        Request::Command {
            command,
            fields,
            credential,
        } => handle_command(ctx, &command, fields, &credential).await,
    }
}

async fn handle_command<S, C, R>(
    ctx: &ServerContext<S, C, R>,
    command: &str,
    fields: Fields,
    credential: &Credential,
) -> Response
where
    S: LockStore,
    C: Clock,
    R: IdentityResolver,
{
    let identity = match ctx.resolver.resolve(credential).await {
        Ok(identity) => identity,
        Err(IdentityError::UnknownUser) => {
            debug!(command, subject = %credential.subject, "unknown user");
            return Response::Outcome {
                response: LockResponse::bad_request(BadRequest::UnknownUser),
            };
        }
        Err(e) => {
            error!(command, error = %e, "identity resolution failed");
            return Response::Error {
                message: e.to_string(),
            };
        }
    };

    match ctx.manager.execute(command, fields, &identity).await {
        Ok(response) => Response::Outcome { response },
        Err(e) => Response::Error {
            message: e.to_string(),
        },
    }
}

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),

    #[error("Request timeout")]
    Timeout,
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
