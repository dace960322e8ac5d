// Network front-end. Every TCP connection is its own shell session; sessions
// share the file system and the audit sink and nothing else.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_stream::StreamExt;
use tracing::Instrument;
use uuid::Uuid;

use crate::audit::AuditSink;
use crate::connection::Connection;
use crate::errors::{Result, ShellError, ShellErrorType};
use crate::shell::Shell;
use crate::vfs::VirtualFileSystem;

pub struct Server<S> {
    vfs: Arc<VirtualFileSystem>,
    audit: S,
    hostname: String,
    listener: TcpListener,
}

impl<S> Server<S>
where
    S: AuditSink + Clone + Send + 'static,
{
    pub async fn bind(
        addr: &str,
        vfs: Arc<VirtualFileSystem>,
        audit: S,
        hostname: &str,
    ) -> Result<Server<S>> {
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            ShellError::new(
                ShellErrorType::ConfigError,
                format!("Failed to listen on {}: {}", addr, e),
            )
        })?;
        Ok(Server {
            vfs,
            audit,
            hostname: hostname.to_string(),
            listener,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until Ctrl-C.
    pub async fn start(self) -> Result<()> {
        self.serve_with_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await
    }

    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tracing::info!("Serving shell sessions on {}", self.local_addr()?);
        let Server {
            vfs,
            audit,
            hostname,
            listener,
        } = self;
        let mut incoming = TcpListenerStream::new(listener);
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutting down server...");
                    return Ok(());
                }
                next = incoming.next() => match next {
                    Some(Ok(stream)) => {
                        let shell = Shell::new(vfs.clone(), audit.clone(), &hostname);
                        spawn_session(shell, stream);
                    }
                    Some(Err(e)) => tracing::warn!("Failed to accept connection: {}", e),
                    None => return Ok(()),
                }
            }
        }
    }
}

fn spawn_session<S>(shell: Shell<S>, stream: TcpStream)
where
    S: AuditSink + Send + 'static,
{
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    let span = tracing::info_span!("session", id = %Uuid::new_v4(), peer = %peer);
    tokio::spawn(
        async move {
            tracing::info!("Session started");
            match run_session(shell, Connection::new(stream)).await {
                Ok(()) => tracing::info!("Session ended"),
                Err(e) => tracing::error!("Session failed: {}", e),
            }
        }
        .instrument(span),
    );
}

async fn run_session<S: AuditSink>(mut shell: Shell<S>, mut conn: Connection) -> Result<()> {
    loop {
        conn.send(&shell.prompt()).await?;
        let line = match conn.read_line().await? {
            Some(line) => line,
            None => return Ok(()),
        };
        let reply = shell.execute(&line)?;
        if !reply.output.is_empty() {
            conn.send(&format!("{}\n", reply.output)).await?;
        }
        if reply.terminated {
            return Ok(());
        }
    }
}
