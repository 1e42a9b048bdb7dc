//! Object groups and crypto maps.

use std::net::{IpAddr, Ipv4Addr};

use ipnetwork::IpNetwork;
use smol_str::SmolStr;

use crate::base::SubRange;
use crate::error::Result;
use crate::model::{
    CryptoMap, CryptoMapEntry, IpWildcard, NetworkObject, NetworkObjectGroup, ServiceObject,
    ServiceObjectGroup, icmp_type, named_port, network_from_mask, port_ranges, protocol_number,
};
use crate::parser::Stanza;
use crate::symbols::{StructureType, StructureUsage};

use super::Lowerer;
use super::helpers::Cmd;

impl Lowerer<'_> {
    // ========================================================================
    // Network groups
    // ========================================================================

    pub(super) fn lower_network_object_group(
        &mut self,
        stanza: &Stanza,
        cmd: &Cmd,
        name: &str,
    ) -> Result<()> {
        let exists = self.config.network_object_groups.contains_key(name);
        let shadowed = self.redefined(cmd, StructureType::NetworkObjectGroup, name, exists);
        self.define_block(StructureType::NetworkObjectGroup, name, stanza);

        let mut group = NetworkObjectGroup::new(name);
        self.walk_block(stanza, |this, child| {
            let cmd = this.cmd(child);
            let words = cmd.words();
            let words = match words.as_slice() {
                // NX-OS numbers every line.
                [seq, rest @ ..] if seq.parse::<u32>().is_ok() => rest,
                all => all,
            };
            match words {
                ["description", ..] => group.description = Some(cmd.rest(1)),
                ["group-object", member] | ["network-object", "object-group", member] => {
                    this.reference(
                        StructureType::NetworkObjectGroup,
                        member,
                        StructureUsage::NetworkObjectGroupGroupObject,
                        cmd.line,
                    );
                    group.objects.push(NetworkObject::Group(SmolStr::new(*member)));
                }
                spec => {
                    let spec = spec.strip_prefix(&["network-object"]).unwrap_or(spec);
                    match network_object(spec) {
                        Some(object) => group.objects.push(object),
                        None => this.invalid(&cmd, "network object"),
                    }
                }
            }
            Ok(())
        })?;
        if !shadowed {
            self.config
                .network_object_groups
                .insert(SmolStr::new(name), group);
        }
        Ok(())
    }

    // ========================================================================
    // Service groups
    // ========================================================================

    /// `object-group service NAME [tcp|udp|tcp-udp]`.
    pub(super) fn lower_service_object_group(
        &mut self,
        stanza: &Stanza,
        cmd: &Cmd,
        name: &str,
    ) -> Result<()> {
        let exists = self.config.service_object_groups.contains_key(name);
        let shadowed = self.redefined(cmd, StructureType::ServiceObjectGroup, name, exists);
        self.define_block(StructureType::ServiceObjectGroup, name, stanza);

        let header = cmd.words();
        let protocols: Vec<u8> = match header.get(3).copied() {
            Some("tcp-udp") => vec![6, 17],
            Some(protocol) => protocol_number(protocol).into_iter().collect(),
            None => Vec::new(),
        };

        let mut group = ServiceObjectGroup::new(name);
        self.walk_block(stanza, |this, child| {
            let cmd = this.cmd(child);
            let words = cmd.words();
            match words.as_slice() {
                ["description", ..] => group.description = Some(cmd.rest(1)),
                ["group-object", member] => {
                    this.reference(
                        StructureType::ServiceObjectGroup,
                        member,
                        StructureUsage::ServiceObjectGroupGroupObject,
                        cmd.line,
                    );
                    group.objects.push(ServiceObject::Group(SmolStr::new(*member)));
                }
                ["port-object", op, ports @ ..] => {
                    let Some(destination) = port_spec(op, ports) else {
                        this.invalid(&cmd, "port-object");
                        return Ok(());
                    };
                    for protocol in &protocols {
                        group.objects.push(ServiceObject::Ports {
                            protocol: *protocol,
                            source: Vec::new(),
                            destination: destination.clone(),
                        });
                    }
                }
                spec => {
                    let spec = spec.strip_prefix(&["service-object"]).unwrap_or(spec);
                    match service_object(spec) {
                        Some(object) => group.objects.push(object),
                        None => this.invalid(&cmd, "service object"),
                    }
                }
            }
            Ok(())
        })?;
        if !shadowed {
            self.config
                .service_object_groups
                .insert(SmolStr::new(name), group);
        }
        Ok(())
    }

    // ========================================================================
    // Crypto maps
    // ========================================================================

    /// `crypto map NAME SEQ [ipsec-isakmp] [dynamic DYN]` and its entry lines.
    pub(super) fn lower_crypto_map(
        &mut self,
        stanza: &Stanza,
        cmd: &Cmd,
        name: &str,
        seq: &str,
    ) -> Result<()> {
        let Some(seq) = self.num::<u32>(cmd, seq) else {
            return Ok(());
        };
        self.define_block(StructureType::CryptoMap, name, stanza);
        let header = cmd.words();
        let dynamic_map = header
            .iter()
            .position(|w| *w == "dynamic")
            .and_then(|i| header.get(i + 1))
            .map(|d| SmolStr::new(*d));
        self.config
            .crypto_maps
            .entry(SmolStr::new(name))
            .or_insert_with(|| CryptoMap::new(name))
            .entries
            .entry(seq)
            .or_default()
            .dynamic_map = dynamic_map;

        self.walk_block(stanza, |this, child| {
            let cmd = this.cmd(child);
            let words = cmd.words();
            match words.as_slice() {
                ["match", "address", acl] => {
                    this.reference(
                        StructureType::Ipv4AccessList,
                        acl,
                        StructureUsage::CryptoMapMatchAddress,
                        cmd.line,
                    );
                    if let Some(entry) = this.crypto_map_entry(name, seq) {
                        entry.match_address = Some(SmolStr::new(*acl));
                    }
                }
                ["set", "peer", peers @ ..] if !peers.is_empty() => {
                    let mut addresses = Vec::with_capacity(peers.len());
                    for peer in peers {
                        match peer.parse::<IpAddr>() {
                            Ok(ip) => addresses.push(ip),
                            Err(_) if *peer == "default" => {}
                            Err(_) => {
                                this.invalid(&cmd, "crypto map peer");
                                return Ok(());
                            }
                        }
                    }
                    if let Some(entry) = this.crypto_map_entry(name, seq) {
                        entry.peers.extend(addresses);
                    }
                }
                ["set", "transform-set", sets @ ..] if !sets.is_empty() => {
                    if let Some(entry) = this.crypto_map_entry(name, seq) {
                        entry.transform_sets = sets.iter().map(|s| SmolStr::new(*s)).collect();
                    }
                }
                ["set", "isakmp-profile", profile] => {
                    if let Some(entry) = this.crypto_map_entry(name, seq) {
                        entry.isakmp_profile = Some(SmolStr::new(*profile));
                    }
                }
                ["set", "pfs", ..] | ["set", "security-association", ..] => {
                    this.todo(&cmd, "crypto map security association options")
                }
                _ => this.unhandled(&cmd),
            }
            Ok(())
        })
    }

    fn crypto_map_entry(&mut self, name: &str, seq: u32) -> Option<&mut CryptoMapEntry> {
        self.config
            .crypto_maps
            .get_mut(name)
            .and_then(|map| map.entries.get_mut(&seq))
    }
}

/// `host A`, `A MASK`, `A WILDCARD`, `A/LEN` or `range A B`.
fn network_object(words: &[&str]) -> Option<NetworkObject> {
    Some(match words {
        ["host", ip] => NetworkObject::Host(ip.parse().ok()?),
        ["range", start, end] => NetworkObject::Range {
            start: start.parse().ok()?,
            end: end.parse().ok()?,
        },
        [prefix] if prefix.contains('/') => {
            NetworkObject::Network(prefix.parse::<IpNetwork>().ok()?)
        }
        [ip] => NetworkObject::Host(ip.parse().ok()?),
        [ip, mask] => {
            let ip: Ipv4Addr = ip.parse().ok()?;
            let mask: Ipv4Addr = mask.parse().ok()?;
            match network_from_mask(ip, mask) {
                // A leading zero bit means an inverse mask.
                Some(network) if u32::from(mask) & 0x8000_0000 != 0 => {
                    NetworkObject::Network(IpNetwork::V4(network))
                }
                _ => NetworkObject::Wildcard(IpWildcard::new(ip, mask)),
            }
        }
        _ => return None,
    })
}

/// `OP PORT...` as port ranges.
fn port_spec(op: &str, ports: &[&str]) -> Option<Vec<SubRange>> {
    let ports: Option<Vec<u16>> = ports.iter().map(|p| named_port(p)).collect();
    port_ranges(op, &ports?)
}

/// `PROTO [source OP PORT...] [[destination] OP PORT...]`, `icmp [TYPE]`
/// or a bare protocol.
fn service_object(words: &[&str]) -> Option<ServiceObject> {
    let (protocol, rest) = words.split_first()?;
    if matches!(*protocol, "icmp" | "icmp6" | "icmpv6") {
        return Some(ServiceObject::Icmp(match rest {
            [] => None,
            [ty, ..] => Some(icmp_type(ty)?.0),
        }));
    }
    let protocol = protocol_number(protocol)?;
    if rest.is_empty() {
        return Some(ServiceObject::Protocol(protocol));
    }

    let mut source = Vec::new();
    let mut destination = Vec::new();
    let mut rest = rest;
    while let Some((head, tail)) = rest.split_first() {
        let (is_source, tail) = match *head {
            "source" => (true, tail),
            "destination" => (false, tail),
            _ => (false, rest),
        };
        let (op, tail) = tail.split_first()?;
        let count = match *op {
            "range" => 2,
            "eq" => tail
                .iter()
                .take_while(|w| !matches!(**w, "source" | "destination"))
                .count(),
            _ => 1,
        };
        let ranges = port_spec(op, tail.get(..count)?)?;
        if is_source {
            source = ranges;
        } else {
            destination = ranges;
        }
        rest = &tail[count..];
    }
    Some(ServiceObject::Ports {
        protocol,
        source,
        destination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn wildcard(ip: &str, mask: &str) -> NetworkObject {
        NetworkObject::Wildcard(IpWildcard::new(ip.parse().unwrap(), mask.parse().unwrap()))
    }

    fn range(start: &str, end: &str) -> NetworkObject {
        NetworkObject::Range {
            start: start.parse().unwrap(),
            end: end.parse().unwrap(),
        }
    }

    #[rstest]
    #[case(&["host", "10.0.0.1"], NetworkObject::Host("10.0.0.1".parse().unwrap()))]
    #[case(&["10.0.0.0", "255.255.255.0"], NetworkObject::Network("10.0.0.0/24".parse().unwrap()))]
    #[case(&["10.0.0.0", "0.0.0.255"], wildcard("10.0.0.0", "0.0.0.255"))]
    #[case(&["10.0.0.0/8"], NetworkObject::Network("10.0.0.0/8".parse().unwrap()))]
    #[case(&["range", "10.0.0.1", "10.0.0.9"], range("10.0.0.1", "10.0.0.9"))]
    fn test_network_object(#[case] words: &[&str], #[case] expected: NetworkObject) {
        assert_eq!(network_object(words), Some(expected));
    }

    #[test]
    fn test_service_object_ports() {
        let words = ["tcp", "source", "gt", "1023", "destination", "eq", "www", "443"];
        let object = service_object(&words);
        assert_eq!(
            object,
            Some(ServiceObject::Ports {
                protocol: 6,
                source: vec![SubRange::new(1024, 65535)],
                destination: vec![SubRange::single(80), SubRange::single(443)],
            })
        );
    }

    #[rstest]
    #[case(&["udp"], Some(ServiceObject::Protocol(17)))]
    #[case(&["icmp", "echo"], Some(ServiceObject::Icmp(Some(8))))]
    #[case(&["tcp", "eq"], None)]
    fn test_service_object_forms(#[case] words: &[&str], #[case] expected: Option<ServiceObject>) {
        assert_eq!(service_object(words), expected);
    }
}
