use std::{
    io::{Error as IoError, ErrorKind, Result as IoResult},
    net::SocketAddr,
};

use hyper::server::conn::AddrIncoming;
use tokio::net::{TcpListener, ToSocketAddrs};

use crate::{service::MakeEndpointService, Endpoint};

/// An HTTP server.
pub struct Server {
    incoming: AddrIncoming,
}

impl Server {
    /// Binds to the provided address, and returns a [`Server`].
    pub async fn bind(addr: impl ToSocketAddrs) -> IoResult<Self> {
        let listener = TcpListener::bind(addr).await?;
        let incoming = AddrIncoming::from_listener(listener)
            .map_err(|err| IoError::new(ErrorKind::Other, err))?;
        Ok(Self { incoming })
    }

    /// Returns the local address that this server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.incoming.local_addr()
    }

    /// Run this server.
    pub async fn run(self, ep: impl Endpoint) -> IoResult<()> {
        tracing::info!(addr = %self.local_addr(), "listening");
        hyper::Server::builder(self.incoming)
            .serve(MakeEndpointService::new(ep))
            .await
            .map_err(|err| IoError::new(ErrorKind::Other, err))
    }
}
