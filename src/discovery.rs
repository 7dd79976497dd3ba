//! Bridge discovery via SSDP.
//!
//! An `M-SEARCH` query goes out to the SSDP multicast group and we listen
//! until something answers with a `LOCATION` header pointing at a Hue
//! `description.xml`. Bridges answer the query by unicast to the sending
//! socket and also announce themselves periodically on the group, so both
//! sockets are read. When another SSDP program already holds port 1900 only
//! the unicast replies are read.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use log::{debug, info, warn};

use crate::bridge::Bridge;
use crate::config::Config;
use crate::errors::Error;
use crate::runtime::{self, AsyncUdpSocket, Instant, UdpSocket};

type Result<T> = std::result::Result<T, Error>;

const SSDP_GROUP: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);
const SSDP_PORT: u16 = 1900;
const DESCRIPTION: &str = "description.xml";
const DATAGRAM_SIZE: usize = 2048;
const RECEIVE_BACKOFF: Duration = Duration::from_millis(50);

fn search_message() -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: {SSDP_GROUP}:{SSDP_PORT}\r\n\
         MAN: \"ssdp:discover\"\r\n\
         MX: 10\r\n\
         ST: ssdp:all\r\n\
         \r\n"
    )
}

/// Find a Hue bridge on the local network.
///
/// Returns the first bridge that answers within `discovery_timeout`, or
/// [`Error::BridgeNotFound`]. The returned bridge is unpaired. When
/// `config.fixed_bridge_address` is set, that bridge is returned without
/// touching the network.
///
/// The multicast listener binds port 1900. If another process already holds
/// that port, discovery still reads the unicast replies to its query but
/// misses the bridges' periodic announcements.
///
/// # Examples
///
/// ```ignore
/// use std::time::Duration;
/// use hue_bridge_rs::{Config, discover_bridge};
///
/// let bridge = discover_bridge(&Config::default(), Duration::from_secs(10)).await?;
/// println!("found {}", bridge.address());
/// ```
pub async fn discover_bridge(config: &Config, discovery_timeout: Duration) -> Result<Bridge> {
    if let Some(address) = &config.fixed_bridge_address {
        info!("using fixed bridge address {}", address);
        return Ok(Bridge::new(address));
    }

    let sender = UdpSocket::bind("0.0.0.0:0")
        .await
        .map_err(|e| Error::socket("bind", e))?;

    let listener = match UdpSocket::bind(&format!("0.0.0.0:{SSDP_PORT}")).await {
        Ok(listener) => {
            listener
                .join_multicast_v4(SSDP_GROUP, Ipv4Addr::UNSPECIFIED)
                .map_err(|e| Error::socket("join_multicast", e))?;
            Some(listener)
        }
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
            warn!(
                "SSDP port {} is in use by another program; reading query replies only",
                SSDP_PORT
            );
            None
        }
        Err(e) => return Err(Error::socket("bind multicast", e)),
    };

    sender
        .send_to(
            search_message().as_bytes(),
            &format!("{SSDP_GROUP}:{SSDP_PORT}"),
        )
        .await
        .map_err(|e| Error::socket("send_to", e))?;

    info!(
        "searching for a Hue bridge (up to {}s)",
        discovery_timeout.as_secs()
    );
    let host = wait_for_bridge(&sender, listener.as_ref(), discovery_timeout).await?;
    info!("found bridge at {}", host);
    Ok(Bridge::new(&host))
}

/// Read both sockets until a datagram names a bridge or the deadline passes.
///
/// Receive errors and datagrams without a bridge location are skipped; only
/// the deadline ends the search unsuccessfully. After a receive error the
/// loop pauses briefly so a socket that keeps failing doesn't spin.
pub(crate) async fn wait_for_bridge<S: AsyncUdpSocket>(
    unicast: &S,
    multicast: Option<&S>,
    discovery_timeout: Duration,
) -> Result<String> {
    let start = Instant::now();
    let mut unicast_buffer = [0u8; DATAGRAM_SIZE];
    let mut multicast_buffer = [0u8; DATAGRAM_SIZE];

    loop {
        let remaining = discovery_timeout.saturating_sub(start.elapsed());
        if remaining.is_zero() {
            return Err(Error::BridgeNotFound);
        }

        let received = runtime::timeout(remaining, async {
            tokio::select! {
                r = unicast.recv_from(&mut unicast_buffer) => r.map(|(n, from)| (n, from, true)),
                r = recv_or_wait(multicast, &mut multicast_buffer) => r.map(|(n, from)| (n, from, false)),
            }
        })
        .await;

        let (size, from, is_unicast) = match received {
            Err(_) => return Err(Error::BridgeNotFound),
            Ok(Err(e)) => {
                warn!("SSDP receive failed: {}", e);
                runtime::sleep(RECEIVE_BACKOFF.min(remaining)).await;
                continue;
            }
            Ok(Ok(datagram)) => datagram,
        };

        let buffer = if is_unicast {
            &unicast_buffer[..size]
        } else {
            &multicast_buffer[..size]
        };
        if let Some(host) = bridge_host(buffer, from) {
            return Ok(host);
        }
    }
}

/// Receive on `socket`, or never complete when there is none.
async fn recv_or_wait<S: AsyncUdpSocket>(
    socket: Option<&S>,
    buffer: &mut [u8],
) -> io::Result<(usize, SocketAddr)> {
    match socket {
        Some(socket) => socket.recv_from(buffer).await,
        None => std::future::pending().await,
    }
}

fn bridge_host(datagram: &[u8], from: SocketAddr) -> Option<String> {
    let Ok(text) = std::str::from_utf8(datagram) else {
        debug!("skipping non-UTF-8 datagram from {}", from);
        return None;
    };
    let location = find_location(text)?;
    let host = url_host(location);
    if host.is_none() {
        debug!("skipping unusable LOCATION {:?} from {}", location, from);
    }
    host.map(String::from)
}

/// The value of the first `LOCATION` header that points at a bridge description.
fn find_location(datagram: &str) -> Option<&str> {
    datagram
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find_map(|(name, value)| {
            let value = value.trim();
            (name.trim().eq_ignore_ascii_case("LOCATION") && value.contains(DESCRIPTION))
                .then_some(value)
        })
}

/// Host part of a URL's authority, without userinfo or port.
fn url_host(url: &str) -> Option<&str> {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next()?;
    let authority = authority.rsplit_once('@').map_or(authority, |(_, host)| host);

    let host = if let Some(bracketed) = authority.strip_prefix('[') {
        &authority[..bracketed.find(']')? + 2]
    } else {
        authority.split(':').next()?
    };
    (!host.is_empty()).then_some(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;
    use std::sync::Mutex;

    const BRIDGE_REPLY: &str = "HTTP/1.1 200 OK\r\n\
        HOST: 239.255.255.250:1900\r\n\
        EXT:\r\n\
        CACHE-CONTROL: max-age=100\r\n\
        LOCATION: http://192.168.1.20:80/description.xml\r\n\
        SERVER: Linux/3.14.0 UPnP/1.0 IpBridge/1.26.0\r\n\
        hue-bridgeid: 001788FFFE09A206\r\n\
        ST: upnp:rootdevice\r\n\
        USN: uuid:2f402f80-da50-11e1-9b23-001788255acc::upnp:rootdevice\r\n\r\n";

    const ROUTER_REPLY: &str = "HTTP/1.1 200 OK\r\n\
        LOCATION: http://192.168.1.1:5000/rootDesc.xml\r\n\
        ST: urn:schemas-upnp-org:device:InternetGatewayDevice:1\r\n\r\n";

    /// Serves queued datagrams, then blocks forever.
    #[derive(Default)]
    struct ScriptedSocket {
        datagrams: Mutex<VecDeque<io::Result<Vec<u8>>>>,
    }

    impl ScriptedSocket {
        fn with(datagrams: Vec<io::Result<Vec<u8>>>) -> Self {
            ScriptedSocket {
                datagrams: Mutex::new(datagrams.into()),
            }
        }

        fn silent() -> Self {
            Self::default()
        }
    }

    impl AsyncUdpSocket for ScriptedSocket {
        async fn bind(_addr: &str) -> io::Result<Self> {
            Ok(Self::silent())
        }

        async fn send_to(&self, buf: &[u8], _addr: &str) -> io::Result<usize> {
            Ok(buf.len())
        }

        async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
            let next = self.datagrams.lock().unwrap().pop_front();
            match next {
                Some(Ok(datagram)) => {
                    buf[..datagram.len()].copy_from_slice(&datagram);
                    Ok((datagram.len(), "192.168.1.20:1900".parse().unwrap()))
                }
                Some(Err(e)) => Err(e),
                None => std::future::pending().await,
            }
        }

        fn join_multicast_v4(&self, _group: Ipv4Addr, _interface: Ipv4Addr) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_search_message() {
        assert_eq!(
            search_message(),
            "M-SEARCH * HTTP/1.1\r\nHOST: 239.255.255.250:1900\r\nMAN: \"ssdp:discover\"\r\nMX: 10\r\nST: ssdp:all\r\n\r\n"
        );
    }

    #[test]
    fn test_find_location() {
        assert_eq!(
            find_location(BRIDGE_REPLY),
            Some("http://192.168.1.20:80/description.xml")
        );
        assert_eq!(find_location(ROUTER_REPLY), None);
        assert_eq!(
            find_location("NOTIFY * HTTP/1.1\r\nLocation: http://10.0.0.5/description.xml\r\n"),
            Some("http://10.0.0.5/description.xml")
        );
        assert_eq!(find_location(""), None);
    }

    #[test]
    fn test_url_host() {
        assert_eq!(url_host("http://192.168.1.20:80/description.xml"), Some("192.168.1.20"));
        assert_eq!(url_host("http://192.168.1.20/description.xml"), Some("192.168.1.20"));
        assert_eq!(url_host("http://user@hub.local:80/description.xml"), Some("hub.local"));
        assert_eq!(url_host("http://[fe80::1]:80/description.xml"), Some("[fe80::1]"));
        assert_eq!(url_host("http:///description.xml"), None);
        assert_eq!(url_host("http://[fe80::1/description.xml"), None);
    }

    #[tokio::test]
    async fn test_zero_deadline_returns_immediately() {
        let silent = ScriptedSocket::silent();
        let result = wait_for_bridge(&silent, Some(&silent), Duration::ZERO).await;
        assert_eq!(result, Err(Error::BridgeNotFound));
    }

    #[tokio::test]
    async fn test_silence_times_out() {
        let silent = ScriptedSocket::silent();
        let result = wait_for_bridge(&silent, Some(&silent), Duration::from_millis(50)).await;
        assert_eq!(result, Err(Error::BridgeNotFound));
    }

    #[tokio::test]
    async fn test_unicast_reply() {
        let unicast = ScriptedSocket::with(vec![
            Ok(ROUTER_REPLY.as_bytes().to_vec()),
            Ok(vec![0xff, 0xfe, 0x00]),
            Err(io::Error::other("connection refused")),
            Ok(BRIDGE_REPLY.as_bytes().to_vec()),
        ]);
        let multicast = ScriptedSocket::silent();

        let host = wait_for_bridge(&unicast, Some(&multicast), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(host, "192.168.1.20");
        assert_eq!(Bridge::new(&host).address(), "http://192.168.1.20");
    }

    #[tokio::test]
    async fn test_multicast_announcement() {
        let unicast = ScriptedSocket::silent();
        let multicast = ScriptedSocket::with(vec![Ok(
            b"NOTIFY * HTTP/1.1\r\nLOCATION: http://10.0.0.5:80/description.xml\r\nNTS: ssdp:alive\r\n\r\n".to_vec(),
        )]);

        let host = wait_for_bridge(&unicast, Some(&multicast), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(host, "10.0.0.5");
    }

    #[tokio::test]
    async fn test_only_unrelated_replies() {
        let unicast = ScriptedSocket::with(vec![Ok(ROUTER_REPLY.as_bytes().to_vec())]);
        let multicast = ScriptedSocket::silent();
        let result = wait_for_bridge(&unicast, Some(&multicast), Duration::from_millis(50)).await;
        assert_eq!(result, Err(Error::BridgeNotFound));
    }

    #[tokio::test]
    async fn test_fixed_address_skips_network() {
        let config = Config::default().with_fixed_bridge("192.168.1.50");
        let bridge = discover_bridge(&config, Duration::ZERO).await.unwrap();
        assert_eq!(bridge.address(), "http://192.168.1.50");
        assert!(bridge.username().is_none());
    }

    #[tokio::test]
    async fn test_unicast_only() {
        let unicast = ScriptedSocket::with(vec![Ok(BRIDGE_REPLY.as_bytes().to_vec())]);
        let host = wait_for_bridge(&unicast, None, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(host, "192.168.1.20");

        let silent = ScriptedSocket::silent();
        let result = wait_for_bridge(&silent, None, Duration::from_millis(50)).await;
        assert_eq!(result, Err(Error::BridgeNotFound));
    }

    #[tokio::test]
    async fn test_failing_socket_backs_off() {
        let failures = (0..1000)
            .map(|_| Err(io::Error::from(io::ErrorKind::ConnectionReset)))
            .collect();
        let unicast = ScriptedSocket::with(failures);
        let multicast = ScriptedSocket::silent();

        let result = wait_for_bridge(&unicast, Some(&multicast), Duration::from_millis(200)).await;
        assert_eq!(result, Err(Error::BridgeNotFound));

        let left = unicast.datagrams.lock().unwrap().len();
        assert!(left > 980, "polled a failing socket {} times", 1000 - left);
    }

    #[tokio::test]
    async fn test_real_sockets_time_out() {
        let result = discover_bridge(&Config::default(), Duration::from_millis(300)).await;
        assert_eq!(result.unwrap_err(), Error::BridgeNotFound);
    }

    #[tokio::test]
    async fn test_ssdp_port_held_elsewhere() {
        // Another test or a local SSDP daemon may already hold the port.
        let _holder = UdpSocket::bind(&format!("0.0.0.0:{SSDP_PORT}")).await.ok();
        let result = discover_bridge(&Config::default(), Duration::from_millis(300)).await;
        assert_eq!(result.unwrap_err(), Error::BridgeNotFound);
    }
}
