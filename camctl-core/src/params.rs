//! Connection parameters supplied by the caller on every operation
//!
//! A [`DeviceAddress`] is validated when it is parsed, so a malformed
//! address fails fast here and never reaches the session manager.

use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{Error, Result};

/// Establishment timeout used when the caller does not supply one
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Speed magnitude used when the caller does not supply one
pub const DEFAULT_SPEED: f32 = 0.1;

/// Network address of a camera
///
/// Accepts `host`, `host:port`, `[v6]:port`, a bare IPv6 literal, or an
/// `http(s)://` URL (any path is dropped).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceAddress {
    host: String,
    port: Option<u16>,
    https: bool,
}

impl DeviceAddress {
    /// Parse and validate an address
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || Error::InvalidAddress(input.to_string());

        let (https, rest) = if let Some(rest) = trimmed.strip_prefix("https://") {
            (true, rest)
        } else if let Some(rest) = trimmed.strip_prefix("http://") {
            (false, rest)
        } else {
            (false, trimmed)
        };

        let authority = rest.split('/').next().unwrap_or_default();

        let (host, port) = if let Some(bracketed) = authority.strip_prefix('[') {
            let end = bracketed.find(']').ok_or_else(invalid)?;
            let host = &bracketed[..end];
            host.parse::<Ipv6Addr>().map_err(|_| invalid())?;
            let port = match &bracketed[end + 1..] {
                "" => None,
                tail => Some(tail.strip_prefix(':').ok_or_else(invalid)?),
            };
            (host, port)
        } else {
            match authority.matches(':').count() {
                0 => (authority, None),
                1 => {
                    let (host, port) = authority.split_once(':').ok_or_else(invalid)?;
                    (host, Some(port))
                }
                // Bare IPv6 literal without a port
                _ => {
                    authority.parse::<Ipv6Addr>().map_err(|_| invalid())?;
                    (authority, None)
                }
            }
        };

        if host.is_empty() || host.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        let port = match port {
            None => None,
            Some(raw) => match raw.parse::<u16>() {
                Ok(0) | Err(_) => return Err(invalid()),
                Ok(port) => Some(port),
            },
        };

        Ok(Self {
            host: host.to_string(),
            port,
            https,
        })
    }

    /// Replace the port, validating it is non-zero
    pub fn with_port(mut self, port: u16) -> Result<Self> {
        if port == 0 {
            return Err(Error::InvalidAddress(format!("{}:0", self.host)));
        }
        self.port = Some(port);
        Ok(self)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Whether the address was given with an `https://` scheme
    pub fn is_https(&self) -> bool {
        self.https
    }

    /// `host` or `host:port`, with IPv6 hosts bracketed
    pub fn authority(&self) -> String {
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        match self.port {
            Some(port) => format!("{}:{}", host, port),
            None => host,
        }
    }

    /// Cache key for this address: the authority, prefixed with `https://`
    /// when the address uses TLS
    pub fn key(&self) -> String {
        if self.https {
            format!("https://{}", self.authority())
        } else {
            self.authority()
        }
    }
}

impl FromStr for DeviceAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Username and password for a camera
///
/// The password is held in a `SecretString` and never appears in `Debug`
/// output or logs.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Expose the password. Only call this when building a request.
    pub fn expose_password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Everything needed to reach and drive one camera
#[derive(Debug, Clone)]
pub struct ConnectionParameters {
    address: DeviceAddress,
    credentials: Credentials,
    timeout: Duration,
    speed: f32,
}

impl ConnectionParameters {
    pub fn new(address: DeviceAddress, credentials: Credentials) -> Self {
        Self {
            address,
            credentials,
            timeout: DEFAULT_TIMEOUT,
            speed: DEFAULT_SPEED,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn address(&self) -> &DeviceAddress {
        &self.address
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Default speed magnitude for moves issued with these parameters
    pub fn speed(&self) -> f32 {
        self.speed
    }
}
