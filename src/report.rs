//! Nmap-style XML scan reports.
//!
//! Models the subset of the `nmaprun` document that nmap (`-oX`/`-oA`) and
//! masscan (`-oX`) both emit: hosts, their addresses and hostnames, and the
//! ports found on each host. Attributes are deserialized from `@name` keys and
//! serialized under plain field names for JSON export.

use crate::error::{ScanError, ScanResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Root `<nmaprun>` element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NmapRun {
    #[serde(rename(deserialize = "@scanner"), default)]
    pub scanner: String,
    #[serde(rename(deserialize = "@args"), default)]
    pub args: String,
    #[serde(rename(deserialize = "@startstr"), default)]
    pub start: String,
    #[serde(rename(deserialize = "host"), default)]
    pub hosts: Vec<Host>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Host {
    #[serde(default)]
    pub status: Option<HostStatus>,
    #[serde(rename(deserialize = "address"), default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub hostnames: Option<Hostnames>,
    #[serde(default)]
    pub ports: Option<Ports>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostStatus {
    #[serde(rename(deserialize = "@state"), default)]
    pub state: String,
    #[serde(rename(deserialize = "@reason"), default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename(deserialize = "@addr"))]
    pub addr: String,
    #[serde(rename(deserialize = "@addrtype"), default)]
    pub addr_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hostnames {
    #[serde(rename(deserialize = "hostname"), default)]
    pub names: Vec<Hostname>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hostname {
    #[serde(rename(deserialize = "@name"))]
    pub name: String,
    #[serde(rename(deserialize = "@type"), default)]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ports {
    #[serde(rename(deserialize = "port"), default)]
    pub ports: Vec<PortEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortEntry {
    #[serde(rename(deserialize = "@protocol"), default)]
    pub protocol: String,
    #[serde(rename(deserialize = "@portid"))]
    pub port: u16,
    #[serde(default)]
    pub state: Option<PortState>,
    #[serde(default)]
    pub service: Option<Service>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortState {
    #[serde(rename(deserialize = "@state"))]
    pub state: String,
    #[serde(rename(deserialize = "@reason"), default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename(deserialize = "@name"), default)]
    pub name: String,
    #[serde(rename(deserialize = "@product"), default)]
    pub product: Option<String>,
    #[serde(rename(deserialize = "@version"), default)]
    pub version: Option<String>,
}

impl Host {
    /// First IPv4 address of the host, if any.
    pub fn ipv4(&self) -> Option<&str> {
        self.addresses
            .iter()
            .find(|a| a.addr_type == "ipv4")
            .map(|a| a.addr.as_str())
    }

    /// Best label for the host: IPv4, else the first address of any kind.
    pub fn label(&self) -> &str {
        self.ipv4()
            .or_else(|| self.addresses.first().map(|a| a.addr.as_str()))
            .unwrap_or("unknown")
    }

    /// Iterate the host's port entries.
    pub fn port_entries(&self) -> impl Iterator<Item = &PortEntry> {
        self.ports.iter().flat_map(|p| p.ports.iter())
    }
}

impl PortEntry {
    /// Check if the tool reported this port as open.
    ///
    /// `open|filtered` counts too: nmap lists it under `--open`, typically
    /// for UDP ports that sent no reply.
    pub fn is_open(&self) -> bool {
        self.state
            .as_ref()
            .map_or(false, |s| matches!(s.state.as_str(), "open" | "open|filtered"))
    }
}

impl NmapRun {
    /// Decode a raw XML report.
    pub fn parse(raw: &str) -> ScanResult<Self> {
        quick_xml::de::from_str(raw).map_err(|e| ScanError::Decode(e.to_string()))
    }

    /// Read and decode a report from disk.
    pub fn load(path: &Path) -> ScanResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ScanError::ArtifactRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw)
    }

    /// First IPv4 address of every host that has one, in report order.
    pub fn live_hosts(&self) -> Vec<String> {
        self.hosts
            .iter()
            .filter_map(|h| h.ipv4().map(str::to_string))
            .collect()
    }

    /// Every open port across all hosts.
    pub fn open_ports(&self) -> Vec<OpenPort> {
        self.hosts
            .iter()
            .flat_map(|host| {
                host.port_entries()
                    .filter(|p| p.is_open())
                    .map(move |p| OpenPort::from_entry(host.label(), p))
            })
            .collect()
    }
}

/// An open port found on a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenPort {
    pub host: String,
    pub port: u16,
    pub protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl OpenPort {
    fn from_entry(host: &str, entry: &PortEntry) -> Self {
        let service = entry.service.as_ref();
        Self {
            host: host.to_string(),
            port: entry.port,
            protocol: entry.protocol.clone(),
            service: service.map(|s| s.name.clone()).filter(|n| !n.is_empty()),
            product: service.and_then(|s| s.product.clone()),
            version: service.and_then(|s| s.version.clone()),
        }
    }
}

impl fmt::Display for OpenPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.host, self.port, self.protocol)?;
        if let Some(service) = &self.service {
            write!(f, " {}", service)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const HOST_DISCOVERY_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE nmaprun>
<?xml-stylesheet href="file:///usr/bin/../share/nmap/nmap.xsl" type="text/xsl"?>
<nmaprun scanner="nmap" args="nmap -sn -oA hostDiscovery/targets 10.0.0.0/24" start="1700000000" startstr="Tue Nov 14 22:13:20 2023" version="7.94" xmloutputversion="1.05">
<verbose level="0"/>
<debugging level="0"/>
<hosthint><status state="up" reason="unknown-response" reason_ttl="0"/>
<address addr="10.0.0.1" addrtype="ipv4"/>
<hostnames>
</hostnames>
</hosthint>
<host><status state="up" reason="arp-response" reason_ttl="0"/>
<address addr="10.0.0.1" addrtype="ipv4"/>
<address addr="AA:BB:CC:DD:EE:FF" addrtype="mac" vendor="Acme"/>
<hostnames>
<hostname name="gateway.lan" type="PTR"/>
</hostnames>
<times srtt="1000" rttvar="5000" to="100000"/>
</host>
<hosthint><status state="up" reason="unknown-response" reason_ttl="0"/>
<address addr="10.0.0.7" addrtype="ipv4"/>
<hostnames>
</hostnames>
</hosthint>
<host><status state="up" reason="syn-ack" reason_ttl="63"/>
<address addr="10.0.0.7" addrtype="ipv4"/>
<hostnames>
</hostnames>
</host>
<host><status state="up" reason="echo-reply" reason_ttl="63"/>
<address addr="fe80::1" addrtype="ipv6"/>
</host>
<runstats><finished time="1700000003" timestr="Tue Nov 14 22:13:23 2023" summary="Nmap done" elapsed="3.10" exit="success"/><hosts up="3" down="253" total="256"/>
</runstats>
</nmaprun>
"#;

    pub const PORT_SCAN_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<nmaprun scanner="nmap" args="nmap -sV -sC -p 22,80,443 --open -oA portScan/portscan 10.0.0.7" startstr="Tue Nov 14 22:20:00 2023">
<scaninfo type="connect" protocol="tcp" numservices="3" services="22,80,443"/>
<host starttime="1700000400" endtime="1700000410"><status state="up" reason="syn-ack" reason_ttl="0"/>
<address addr="10.0.0.7" addrtype="ipv4"/>
<hostnames>
</hostnames>
<ports><extraports state="closed" count="1">
<extrareasons reason="conn-refused" count="1" proto="tcp" ports="443"/>
</extraports>
<port protocol="tcp" portid="22"><state state="open" reason="syn-ack" reason_ttl="0"/><service name="ssh" product="OpenSSH" version="9.6p1" method="probed" conf="10"/><script id="ssh-hostkey" output="..."/></port>
<port protocol="tcp" portid="80"><state state="open" reason="syn-ack" reason_ttl="0"/><service name="http" product="nginx" method="probed" conf="10"/></port>
<port protocol="tcp" portid="8080"><state state="filtered" reason="no-response" reason_ttl="0"/><service name="http-proxy" method="table" conf="3"/></port>
</ports>
</host>
<host><status state="up" reason="syn-ack" reason_ttl="0"/>
<address addr="10.0.0.9" addrtype="ipv4"/>
<ports><port protocol="udp" portid="53"><state state="open" reason="udp-response" reason_ttl="0"/></port>
</ports>
</host>
</nmaprun>
"#;

    pub const MASSCAN_XML: &str = r#"<?xml version="1.0"?>
<!-- masscan v1.0 scan -->
<?xml-stylesheet href="" type="text/xsl"?>
<nmaprun scanner="masscan" start="1700000000" version="1.0-BETA"  xmloutputversion="1.03">
<scaninfo type="syn" protocol="tcp" />
<host endtime="1700000001"><address addr="192.168.1.20" addrtype="ipv4"/><ports><port protocol="tcp" portid="443"><state state="open" reason="syn-ack" reason_ttl="64"/></port></ports></host>
<host endtime="1700000002"><address addr="192.168.1.21" addrtype="ipv4"/><ports><port protocol="tcp" portid="22"><state state="open" reason="syn-ack" reason_ttl="64"/></port></ports></host>
<runstats>
<finished time="1700000005" timestr="2023-11-14 22:13:25" elapsed="5" />
<hosts up="2" down="0" total="2" />
</runstats>
</nmaprun>
"#;
}
