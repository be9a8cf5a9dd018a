//! Transport seam and the bundled UDP implementation.
//!
//! The engine reaches the wire only through [`OscTransport`], so tests and
//! alternative substrates can swap the socket layer out. [`UdpTransport`]
//! speaks plain OSC-over-UDP datagrams.

use crate::config::BridgeOscConfig;
use crate::error::{BridgeOscError, Result};
use parking_lot::Mutex;
use rosc::{OscMessage, OscPacket};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Whether an inbound message was consumed by this endpoint.
///
/// `No` covers both foreign traffic and malformed messages; on a shared
/// socket the transport may offer the message to other endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Yes,
    No,
}

/// Catch-all inbound callback, invoked once per decoded message on the
/// transport's listener thread.
pub type MessageHandler = Arc<dyn Fn(&OscMessage) -> Handled + Send + Sync>;

/// Parsed `osc.udp://host:port/path` target URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OscUrl {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl OscUrl {
    /// Parse a target URL of the form `osc.udp://host:port/path`.
    pub fn parse(url: &str) -> Result<Self> {
        let invalid = |reason: &'static str| BridgeOscError::InvalidTargetUrl {
            url: url.to_string(),
            reason,
        };

        let rest = url
            .strip_prefix("osc.udp://")
            .ok_or_else(|| invalid("expected osc.udp:// scheme"))?;

        let (authority, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => return Err(invalid("missing path component")),
        };

        let (host, port) = authority
            .rsplit_once(':')
            .ok_or_else(|| invalid("missing port"))?;
        if host.is_empty() {
            return Err(invalid("empty host"));
        }
        let port = port.parse::<u16>().map_err(|_| invalid("invalid port"))?;
        if path == "/" {
            return Err(invalid("empty path"));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            path: path.to_string(),
        })
    }
}

/// Contract with the message-transport collaborator: target resolution,
/// a catch-all listener lifecycle, and a send primitive.
pub trait OscTransport: Send + Sync + 'static {
    /// Opaque send destination.
    type Target: Send + Sync;

    /// Resolve a host/port pair into a send target.
    fn resolve(&self, host: &str, port: u16) -> Result<Self::Target>;

    /// Encode and send one message to `target`.
    fn send(&self, target: &Self::Target, msg: OscMessage) -> Result<()>;

    /// Register the catch-all handler and start the listener thread.
    ///
    /// Returns the URL the listener can be reached at, trailing slash
    /// included.
    fn start(&self, handler: MessageHandler) -> Result<String>;

    /// Stop the listener thread and drop the handler.
    fn stop(&self);
}

/// OSC-over-UDP transport.
///
/// One socket serves both directions: the listener thread reads from it
/// and sends go out through it, so replies carry a consistent source
/// address.
pub struct UdpTransport {
    socket: UdpSocket,
    recv_buffer_size: usize,
    running: Arc<AtomicBool>,
    listener: Mutex<Option<thread::JoinHandle<()>>>,
}

impl UdpTransport {
    /// Bind the local socket. Listening starts later, via
    /// [`OscTransport::start`].
    pub fn bind(config: &BridgeOscConfig) -> Result<Self> {
        let socket = UdpSocket::bind(&config.bind_addr)?;
        socket.set_nonblocking(true)?;
        Ok(Self {
            socket,
            recv_buffer_size: config.recv_buffer_size,
            running: Arc::new(AtomicBool::new(false)),
            listener: Mutex::new(None),
        })
    }

    /// Local address the socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    fn dispatch(packet: OscPacket, handler: &MessageHandler) {
        match packet {
            OscPacket::Message(msg) => {
                handler(&msg);
            }
            OscPacket::Bundle(bundle) => {
                for inner in bundle.content {
                    Self::dispatch(inner, handler);
                }
            }
        }
    }

    fn listen_loop(
        socket: UdpSocket,
        running: Arc<AtomicBool>,
        handler: MessageHandler,
        recv_buffer_size: usize,
    ) {
        let mut buf = vec![0u8; recv_buffer_size];

        while running.load(Ordering::Relaxed) {
            match socket.recv_from(&mut buf) {
                Ok((size, _addr)) => match rosc::decoder::decode_udp(&buf[..size]) {
                    Ok((_rest, packet)) => Self::dispatch(packet, &handler),
                    Err(e) => tracing::error!("failed to decode OSC packet: {}", e),
                },
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(1));
                }
                Err(e) => {
                    tracing::error!("OSC socket error: {}", e);
                    break;
                }
            }
        }
    }
}

impl OscTransport for UdpTransport {
    type Target = SocketAddr;

    fn resolve(&self, host: &str, port: u16) -> Result<SocketAddr> {
        (host, port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| BridgeOscError::InvalidTargetUrl {
                url: format!("{host}:{port}"),
                reason: "host did not resolve",
            })
    }

    fn send(&self, target: &SocketAddr, msg: OscMessage) -> Result<()> {
        let buf = rosc::encoder::encode(&OscPacket::Message(msg))
            .map_err(|e| BridgeOscError::Encode(e.to_string()))?;
        self.socket.send_to(&buf, target)?;
        Ok(())
    }

    fn start(&self, handler: MessageHandler) -> Result<String> {
        let socket = self.socket.try_clone()?;
        let running = Arc::clone(&self.running);
        running.store(true, Ordering::Relaxed);
        let recv_buffer_size = self.recv_buffer_size;

        let join = thread::Builder::new()
            .name("osc-listener".to_string())
            .spawn(move || Self::listen_loop(socket, running, handler, recv_buffer_size))?;
        *self.listener.lock() = Some(join);

        let addr = self.socket.local_addr()?;
        Ok(format!("osc.udp://{addr}/"))
    }

    fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(join) = self.listener.lock().take() {
            let _ = join.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_parse() {
        let url = OscUrl::parse("osc.udp://127.0.0.1:22752/Carla").unwrap();
        assert_eq!(url.host, "127.0.0.1");
        assert_eq!(url.port, 22752);
        assert_eq!(url.path, "/Carla");
    }

    #[test]
    fn test_url_parse_nested_path() {
        let url = OscUrl::parse("osc.udp://localhost:9000/Carla/0").unwrap();
        assert_eq!(url.host, "localhost");
        assert_eq!(url.path, "/Carla/0");
    }

    #[test]
    fn test_url_parse_rejects_malformed() {
        for bad in [
            "udp://127.0.0.1:9000/x",
            "osc.udp://127.0.0.1:9000",
            "osc.udp://127.0.0.1/x",
            "osc.udp://:9000/x",
            "osc.udp://127.0.0.1:notaport/x",
            "osc.udp://127.0.0.1:9000/",
            "",
        ] {
            assert!(
                matches!(
                    OscUrl::parse(bad),
                    Err(BridgeOscError::InvalidTargetUrl { .. })
                ),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_udp_bind_and_resolve() {
        let config = BridgeOscConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            ..Default::default()
        };
        let transport = UdpTransport::bind(&config).unwrap();
        assert_ne!(transport.local_addr().unwrap().port(), 0);

        let target = transport.resolve("127.0.0.1", 9000).unwrap();
        assert_eq!(target.port(), 9000);
    }

    #[test]
    fn test_udp_start_reports_listen_url() {
        let config = BridgeOscConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            ..Default::default()
        };
        let transport = UdpTransport::bind(&config).unwrap();
        let handler: MessageHandler = Arc::new(|_msg| Handled::No);

        let url = transport.start(handler).unwrap();
        assert!(url.starts_with("osc.udp://127.0.0.1:"));
        assert!(url.ends_with('/'));
        transport.stop();
    }
}
