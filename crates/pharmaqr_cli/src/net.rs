//! Local network address discovery for the startup banner.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

const PROBE_TARGET: &str = "8.8.8.8:80";

/// Best-effort LAN address of this host.
///
/// Connecting a UDP socket sends no packets; it only asks the OS which
/// interface would route to `PROBE_TARGET`. Falls back to loopback.
pub fn local_ip() -> IpAddr {
    probe_local_ip().unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn probe_local_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect(PROBE_TARGET).ok()?;
    let ip = socket.local_addr().ok()?.ip();
    (!ip.is_unspecified()).then_some(ip)
}

/// Base URLs announced at startup: loopback first, then the LAN address.
pub fn announced_urls(lan_ip: IpAddr, port: u16) -> Vec<String> {
    let mut urls = vec![format!("http://localhost:{port}")];
    if !lan_ip.is_loopback() {
        urls.push(format!("http://{lan_ip}:{port}"));
    }
    urls
}
