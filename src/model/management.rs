//! Management-plane settings.

use std::collections::BTreeSet;
use std::net::IpAddr;

use indexmap::IndexMap;
use serde::Serialize;
use smol_str::SmolStr;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NtpServer {
    pub vrf: Option<SmolStr>,
    pub prefer: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ntp {
    pub servers: IndexMap<String, NtpServer>,
    pub source_interface: Option<SmolStr>,
    pub access_group: Option<SmolStr>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Logging {
    pub hosts: BTreeSet<String>,
    pub source_interface: Option<SmolStr>,
    pub buffered: Option<String>,
    pub trap: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnmpCommunity {
    pub read_write: bool,
    pub acl: Option<SmolStr>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snmp {
    pub communities: IndexMap<String, SnmpCommunity>,
    pub hosts: BTreeSet<String>,
    pub source_interface: Option<SmolStr>,
    pub location: Option<String>,
    pub contact: Option<String>,
}

/// `aaa authentication login NAME METHOD...`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AaaLoginList {
    pub name: SmolStr,
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aaa {
    pub new_model: bool,
    pub login_lists: IndexMap<SmolStr, AaaLoginList>,
}

/// One `line` block; `line vty 0 4` gives name `vty 0 4`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub name: SmolStr,
    pub access_class_in: Option<SmolStr>,
    pub access_class_out: Option<SmolStr>,
    pub ipv6_access_class: Option<SmolStr>,
    pub login_authentication: Option<SmolStr>,
    pub transport_input: Vec<String>,
    pub exec_timeout: Option<(u32, u32)>,
}

impl Line {
    pub fn new(name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            access_class_in: None,
            access_class_out: None,
            ipv6_access_class: None,
            login_authentication: None,
            transport_input: Vec::new(),
            exec_timeout: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tacacs {
    pub servers: BTreeSet<IpAddr>,
    pub source_interface: Option<SmolStr>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Management {
    pub domain_name: Option<String>,
    pub name_servers: Vec<IpAddr>,
    pub ntp: Ntp,
    pub logging: Logging,
    pub snmp: Snmp,
    pub aaa: Aaa,
    pub lines: IndexMap<SmolStr, Line>,
    pub tacacs: Tacacs,
    pub ssh_version: Option<u8>,
    /// Banner type (`motd`, `login`, `exec`) to body text.
    pub banners: IndexMap<SmolStr, String>,
}
