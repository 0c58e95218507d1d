//! Server configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::registry::source::DEFAULT_FETCH_TIMEOUT;
use crate::registry::{BuiltinSource, FileSource, FrameSource, HttpSource, RegistryError};
use crate::server::classifier::CURL_SIGNATURE;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// User-agent substring a client must send to get a stream
    pub client_signature: String,

    /// Remote JSON catalog to load frames from
    pub frames_url: Option<String>,

    /// Local JSON catalog to load frames from (ignored if `frames_url` is set)
    pub frames_file: Option<PathBuf>,

    /// Timeout for fetching `frames_url`
    pub fetch_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            client_signature: CURL_SIGNATURE.to_owned(),
            frames_url: None,
            frames_file: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// Create a config listening on all interfaces at `port`
    ///
    /// The port is mandatory; `None` is a configuration error.
    pub fn from_port(port: Option<u16>) -> Result<Self> {
        let port = port.ok_or_else(|| Error::Config("Environment variable PORT not set".into()))?;
        Ok(Self::default().port(port))
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the bind host, keeping the port
    pub fn host(mut self, host: IpAddr) -> Self {
        self.bind_addr.set_ip(host);
        self
    }

    /// Set the bind port, keeping the host
    pub fn port(mut self, port: u16) -> Self {
        self.bind_addr.set_port(port);
        self
    }

    /// Set the accepted user-agent substring
    pub fn client_signature(mut self, signature: impl Into<String>) -> Self {
        self.client_signature = signature.into();
        self
    }

    /// Load frames from a remote catalog
    pub fn frames_url(mut self, url: impl Into<String>) -> Self {
        self.frames_url = Some(url.into());
        self
    }

    /// Load frames from a catalog file
    pub fn frames_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.frames_file = Some(path.into());
        self
    }

    /// Set the remote catalog timeout
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Build the frame source this config points at
    ///
    /// URL first, then file, then the built-in animations.
    pub fn frame_source(&self) -> std::result::Result<Arc<dyn FrameSource>, RegistryError> {
        if let Some(url) = &self.frames_url {
            return Ok(Arc::new(HttpSource::with_timeout(
                url.clone(),
                self.fetch_timeout,
            )?));
        }

        if let Some(path) = &self.frames_file {
            return Ok(Arc::new(FileSource::new(path.clone())));
        }

        Ok(Arc::new(BuiltinSource))
    }
}
