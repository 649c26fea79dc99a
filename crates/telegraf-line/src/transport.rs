// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Socket transports for Telegraf's `socket_listener` input.
//!
//! Endpoints use the same service-address URLs as the Telegraf side:
//!
//! ```toml
//! [[inputs.socket_listener]]
//!   service_address = "udp://127.0.0.1:8094"
//!   # service_address = "tcp://127.0.0.1:8094"
//!   # service_address = "unix:///var/run/telegraf.sock"
//!   # service_address = "unixgram:///var/run/telegraf.sock"
//! ```
//!
//! Every [`LineSink::send`] call carries exactly one complete line. Datagram
//! transports emit one datagram per line; keeping a line under the path MTU
//! is left to the caller.

use crate::error::{Error, Result};
use std::fmt;
use std::io::{self, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs, UdpSocket};
use std::str::FromStr;
use std::time::Duration;

/// Socket family used to reach Telegraf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Connected UDP socket, one datagram per line.
    Udp,
    /// TCP stream.
    Tcp,
    /// Unix domain stream socket.
    Unix,
    /// Unix domain datagram socket, one datagram per line.
    Unixgram,
}

impl Scheme {
    /// URL scheme name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Udp => "udp",
            Scheme::Tcp => "tcp",
            Scheme::Unix => "unix",
            Scheme::Unixgram => "unixgram",
        }
    }

    /// Whether each send becomes its own datagram.
    pub fn is_datagram(&self) -> bool {
        matches!(self, Scheme::Udp | Scheme::Unixgram)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "udp" | "udp4" | "udp6" => Ok(Scheme::Udp),
            "tcp" | "tcp4" | "tcp6" => Ok(Scheme::Tcp),
            "unix" => Ok(Scheme::Unix),
            "unixgram" => Ok(Scheme::Unixgram),
            other => Err(Error::UnsupportedScheme(other.to_string())),
        }
    }
}

/// A parsed service address such as `udp://127.0.0.1:8094`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Socket family.
    pub scheme: Scheme,
    /// `host:port` for network schemes, a filesystem path for unix schemes.
    pub address: String,
}

impl Endpoint {
    /// Create an endpoint from its parts.
    pub fn new(scheme: Scheme, address: impl Into<String>) -> Self {
        Self {
            scheme,
            address: address.into(),
        }
    }

    /// Parse a `scheme://address` URL.
    pub fn parse(url: &str) -> Result<Self> {
        let (scheme, address) = url
            .split_once("://")
            .ok_or_else(|| Error::InvalidAddress(format!("missing scheme in '{}'", url)))?;
        let scheme: Scheme = scheme.parse()?;
        if address.is_empty() {
            return Err(Error::InvalidAddress(format!("missing address in '{}'", url)));
        }
        if !matches!(scheme, Scheme::Unix | Scheme::Unixgram) && !has_port(address) {
            return Err(Error::InvalidAddress(format!("missing port in '{}'", url)));
        }
        Ok(Self::new(scheme, address))
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Endpoint::parse(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.address)
    }
}

/// `host:port` or `[v6]:port`; a bare IPv6 literal has no port.
fn has_port(address: &str) -> bool {
    match address.strip_prefix('[') {
        Some(rest) => rest
            .split_once(']')
            .is_some_and(|(_, tail)| tail.starts_with(':')),
        None => address.contains(':'),
    }
}

/// Socket options applied when a connection is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Write timeout for blocking sends. `None` blocks indefinitely.
    pub write_timeout: Option<Duration>,
}

/// A destination that accepts one encoded line at a time, in order.
pub trait LineSink {
    /// Write one complete line, terminator included.
    fn send(&mut self, line: &[u8]) -> io::Result<()>;

    /// Release the sink.
    fn close(self) -> io::Result<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// In-memory sink collecting every line, used for dry runs and tests.
impl LineSink for Vec<u8> {
    fn send(&mut self, line: &[u8]) -> io::Result<()> {
        self.extend_from_slice(line);
        Ok(())
    }
}

/// An open connection to Telegraf.
#[derive(Debug)]
pub enum Connection {
    /// Connected UDP socket.
    Udp(UdpSocket),
    /// TCP stream.
    Tcp(TcpStream),
    /// Unix domain stream socket.
    #[cfg(unix)]
    Unix(std::os::unix::net::UnixStream),
    /// Unbound unix datagram socket connected to the listener path.
    #[cfg(unix)]
    Unixgram(std::os::unix::net::UnixDatagram),
}

/// Dial `address` using `scheme` with default socket options.
pub fn connect(scheme: Scheme, address: &str) -> Result<Connection> {
    Connection::open(&Endpoint::new(scheme, address), &ConnectOptions::default())
}

impl Connection {
    /// Dial an endpoint.
    pub fn open(endpoint: &Endpoint, options: &ConnectOptions) -> Result<Self> {
        let conn = match endpoint.scheme {
            Scheme::Udp => Connection::Udp(dial_udp(&endpoint.address)?),
            Scheme::Tcp => Connection::Tcp(TcpStream::connect(endpoint.address.as_str())?),
            #[cfg(unix)]
            Scheme::Unix => {
                Connection::Unix(std::os::unix::net::UnixStream::connect(&endpoint.address)?)
            }
            #[cfg(unix)]
            Scheme::Unixgram => {
                let socket = std::os::unix::net::UnixDatagram::unbound()?;
                socket.connect(&endpoint.address)?;
                Connection::Unixgram(socket)
            }
            #[cfg(not(unix))]
            Scheme::Unix | Scheme::Unixgram => {
                return Err(Error::UnsupportedScheme(format!(
                    "{} sockets are not supported on this platform",
                    endpoint.scheme
                )));
            }
        };
        conn.set_write_timeout(options.write_timeout)?;
        log::debug!("[TRANSPORT] connected endpoint={}", endpoint);
        Ok(conn)
    }

    /// Socket family of this connection.
    pub fn scheme(&self) -> Scheme {
        match self {
            Connection::Udp(_) => Scheme::Udp,
            Connection::Tcp(_) => Scheme::Tcp,
            #[cfg(unix)]
            Connection::Unix(_) => Scheme::Unix,
            #[cfg(unix)]
            Connection::Unixgram(_) => Scheme::Unixgram,
        }
    }

    fn set_write_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        match self {
            Connection::Udp(s) => s.set_write_timeout(timeout),
            Connection::Tcp(s) => s.set_write_timeout(timeout),
            #[cfg(unix)]
            Connection::Unix(s) => s.set_write_timeout(timeout),
            #[cfg(unix)]
            Connection::Unixgram(s) => s.set_write_timeout(timeout),
        }
    }
}

impl LineSink for Connection {
    fn send(&mut self, line: &[u8]) -> io::Result<()> {
        log::trace!("[TRANSPORT] send scheme={} bytes={}", self.scheme(), line.len());
        match self {
            Connection::Udp(s) => send_datagram(s.send(line)?, line.len()),
            Connection::Tcp(s) => s.write_all(line),
            #[cfg(unix)]
            Connection::Unix(s) => s.write_all(line),
            #[cfg(unix)]
            Connection::Unixgram(s) => send_datagram(s.send(line)?, line.len()),
        }
    }

    fn close(self) -> io::Result<()> {
        log::debug!("[TRANSPORT] closing scheme={}", self.scheme());
        match self {
            Connection::Udp(_) => Ok(()),
            Connection::Tcp(mut s) => {
                s.flush()?;
                s.shutdown(Shutdown::Both)
            }
            #[cfg(unix)]
            Connection::Unix(mut s) => {
                s.flush()?;
                s.shutdown(Shutdown::Both)
            }
            #[cfg(unix)]
            Connection::Unixgram(_) => Ok(()),
        }
    }
}

/// Connect a UDP socket to the first resolved address that accepts it.
fn dial_udp(address: &str) -> io::Result<UdpSocket> {
    let mut last_err = None;
    for target in address.to_socket_addrs()? {
        let local = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let attempt = UdpSocket::bind(local).and_then(|socket| {
            socket.connect(target)?;
            Ok(socket)
        });
        match attempt {
            Ok(socket) => return Ok(socket),
            Err(e) => {
                log::debug!("[TRANSPORT] udp dial failed target={} err={}", target, e);
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("could not resolve {}", address),
        )
    }))
}

fn send_datagram(sent: usize, expected: usize) -> io::Result<()> {
    if sent == expected {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("short datagram write: {} of {} bytes", sent, expected),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_parse_and_display() {
        assert_eq!("udp".parse::<Scheme>().unwrap(), Scheme::Udp);
        assert_eq!("TCP".parse::<Scheme>().unwrap(), Scheme::Tcp);
        assert_eq!("udp6".parse::<Scheme>().unwrap(), Scheme::Udp);
        assert_eq!("unixgram".parse::<Scheme>().unwrap(), Scheme::Unixgram);
        assert_eq!(Scheme::Unix.to_string(), "unix");
        assert!(Scheme::Udp.is_datagram());
        assert!(!Scheme::Tcp.is_datagram());
    }

    #[test]
    fn test_scheme_rejects_unknown() {
        let err = "http".parse::<Scheme>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedScheme(s) if s == "http"));
    }

    #[test]
    fn test_endpoint_parse() {
        let e = Endpoint::parse("udp://127.0.0.1:8094").unwrap();
        assert_eq!(e, Endpoint::new(Scheme::Udp, "127.0.0.1:8094"));

        let e: Endpoint = "unix:///var/run/telegraf.sock".parse().unwrap();
        assert_eq!(e.scheme, Scheme::Unix);
        assert_eq!(e.address, "/var/run/telegraf.sock");
        assert_eq!(e.to_string(), "unix:///var/run/telegraf.sock");
    }

    #[test]
    fn test_endpoint_parse_errors() {
        assert!(matches!(
            Endpoint::parse("127.0.0.1:8094"),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(Endpoint::parse("tcp://"), Err(Error::InvalidAddress(_))));
        assert!(matches!(
            Endpoint::parse("tcp://localhost"),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            Endpoint::parse("sctp://localhost:1"),
            Err(Error::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_endpoint_parse_ipv6() {
        let e = Endpoint::parse("udp://[::1]:8094").unwrap();
        assert_eq!(e.address, "[::1]:8094");

        assert!(matches!(
            Endpoint::parse("udp://[::1]"),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            Endpoint::parse("tcp://[fe80::1%eth0]"),
            Err(Error::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_vec_sink_collects_lines() {
        let mut sink: Vec<u8> = Vec::new();
        sink.send(b"a 1\n").unwrap();
        sink.send(b"b 2\n").unwrap();
        assert_eq!(sink, b"a 1\nb 2\n");
        LineSink::close(sink).unwrap();
    }

    #[test]
    fn test_send_datagram_short_write() {
        assert!(send_datagram(4, 4).is_ok());
        let err = send_datagram(2, 4).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }

    #[test]
    fn test_dial_udp_needs_no_listener() {
        let conn = connect(Scheme::Udp, "127.0.0.1:9").unwrap();
        assert_eq!(conn.scheme(), Scheme::Udp);
    }

    #[test]
    fn test_connect_tcp_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = connect(Scheme::Tcp, &addr.to_string()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
