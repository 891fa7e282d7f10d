//! Status bar contents: local address, network name and signal level

use std::net::{ToSocketAddrs, UdpSocket};
use std::process::Command;

use crate::config::Config;
use crate::error::{Error, Result};

/// The three fields of the status bar, in drawing order
///
/// All fields are non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusFields {
    address: String,
    network: String,
    signal: String,
}

impl StatusFields {
    /// Build the fields, rejecting empty strings
    pub fn new(
        address: impl Into<String>,
        network: impl Into<String>,
        signal: impl Into<String>,
    ) -> Result<Self> {
        let fields = StatusFields {
            address: address.into(),
            network: network.into(),
            signal: signal.into(),
        };
        for (name, value) in [
            ("address", &fields.address),
            ("network", &fields.network),
            ("signal", &fields.signal),
        ] {
            if value.trim().is_empty() {
                return Err(Error::EmptyStatusField(name));
            }
        }
        Ok(fields)
    }

    /// Query the system for the current address and wireless network
    pub fn probe(config: &Config) -> Result<Self> {
        let address = local_address(&config.probe_target)?;
        let (network, signal) = scan_wireless(&config.wireless_interface)?;
        log::info!("status: {address} on {network} ({signal})");
        StatusFields::new(address, network, signal)
    }

    /// Fields in left-to-right order
    pub fn as_array(&self) -> [&str; 3] {
        [&self.address, &self.network, &self.signal]
    }
}

/// Address of the interface used to reach `target`
///
/// Connecting a UDP socket sends nothing, it only selects a route.
pub fn local_address(target: &str) -> Result<String> {
    let target = target
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| Error::StatusProbe(format!("{target} does not resolve")))?;
    let socket = UdpSocket::bind(("0.0.0.0", 0))?;
    socket.connect(target)?;
    Ok(socket.local_addr()?.ip().to_string())
}

/// Network name and signal level of the first cell `iwlist <interface> scan` reports
pub fn scan_wireless(interface: &str) -> Result<(String, String)> {
    let output = Command::new("iwlist").args([interface, "scan"]).output()?;
    if !output.status.success() {
        return Err(Error::StatusProbe(format!(
            "iwlist {interface} scan exited with {}",
            output.status
        )));
    }
    parse_scan(&String::from_utf8_lossy(&output.stdout))
        .ok_or_else(|| Error::StatusProbe(format!("no network found on {interface}")))
}

/// Pick the first ESSID and the signal level reported before it
///
/// `Quality=70/70  Signal level=-42 dBm` yields `-42`.
pub fn parse_scan(output: &str) -> Option<(String, String)> {
    let mut signal = None;
    for line in output.lines().map(str::trim) {
        if line.contains("Signal level") {
            signal = line
                .rsplit('=')
                .next()
                .and_then(|level| level.split_whitespace().next())
                .map(str::to_string);
        } else if let Some(rest) = line.strip_prefix("ESSID:") {
            let name = rest.trim_matches('"');
            if name.is_empty() {
                continue;
            }
            return Some((name.to_string(), signal?));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCAN: &str = r#"wlan0     Scan completed :
          Cell 01 - Address: 11:22:33:44:55:66
                    Channel:6
                    Frequency:2.437 GHz (Channel 6)
                    Quality=68/70  Signal level=-42 dBm
                    Encryption key:on
                    ESSID:"HomeNet"
                    Bit Rates:1 Mb/s; 2 Mb/s; 5.5 Mb/s; 11 Mb/s
          Cell 02 - Address: 66:55:44:33:22:11
                    Quality=30/70  Signal level=-80 dBm
                    ESSID:"Neighbour"
"#;

    #[test]
    fn rejects_empty_fields() {
        assert!(matches!(
            StatusFields::new("10.0.0.5", "", "-42"),
            Err(Error::EmptyStatusField("network"))
        ));
        assert!(matches!(
            StatusFields::new(" ", "HomeNet", "-42"),
            Err(Error::EmptyStatusField("address"))
        ));
    }

    #[test]
    fn keeps_field_order() {
        let fields = StatusFields::new("10.0.0.5", "HomeNet", "-42").unwrap();
        assert_eq!(fields.as_array(), ["10.0.0.5", "HomeNet", "-42"]);
    }

    #[test]
    fn parses_first_cell() {
        assert_eq!(
            parse_scan(SCAN),
            Some(("HomeNet".to_string(), "-42".to_string()))
        );
    }

    #[test]
    fn skips_hidden_networks() {
        let scan = "Quality=10/70  Signal level=-90 dBm\nESSID:\"\"\n\
                    Quality=50/70  Signal level=-60 dBm\nESSID:\"Visible\"\n";
        assert_eq!(
            parse_scan(scan),
            Some(("Visible".to_string(), "-60".to_string()))
        );
    }

    #[test]
    fn empty_scan_has_no_network() {
        assert_eq!(parse_scan("wlan0     No scan results"), None);
        assert_eq!(parse_scan("ESSID:\"NoSignal\""), None);
    }

    #[test]
    fn loopback_route_resolves() {
        assert_eq!(local_address("127.0.0.1:9").unwrap(), "127.0.0.1");
    }
}
