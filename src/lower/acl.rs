//! Numbered and named access lists.

use std::iter::{Copied, Peekable};
use std::net::{IpAddr, Ipv4Addr};
use std::slice::Iter;

use ipnetwork::{Ipv4Network, Ipv6Network};
use smol_str::SmolStr;

use crate::base::SubRange;
use crate::error::Result;
use crate::model::{
    AddressSpec, ExtendedAccessList, ExtendedAccessListLine, IpWildcard, LineAction,
    StandardAccessList, StandardAccessListLine, dscp_value, icmp_type, named_port, port_ranges,
    protocol_number,
};
use crate::parser::Stanza;
use crate::symbols::{StructureType, StructureUsage};

use super::Lowerer;
use super::helpers::Cmd;

type Words<'a> = Peekable<Copied<Iter<'a, &'a str>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AclKind {
    Standard,
    Extended,
    Ipv6,
}

impl AclKind {
    fn structure_type(self) -> StructureType {
        match self {
            AclKind::Standard => StructureType::Ipv4AccessListStandard,
            AclKind::Extended => StructureType::Ipv4AccessListExtended,
            AclKind::Ipv6 => StructureType::Ipv6AccessList,
        }
    }

    /// Kind of a numbered list, by number range.
    fn from_number(number: u32) -> Option<Self> {
        match number {
            1..=99 | 1300..=1999 => Some(AclKind::Standard),
            100..=199 | 2000..=2699 => Some(AclKind::Extended),
            _ => None,
        }
    }
}

impl Lowerer<'_> {
    /// `access-list N ...` and ASA-style `access-list NAME [standard|extended] ...`.
    pub(super) fn lower_numbered_access_list(&mut self, cmd: &Cmd) {
        let words = cmd.words();
        let ["access-list", name, rest @ ..] = words.as_slice() else {
            self.invalid(cmd, "access-list");
            return;
        };
        let (kind, rest) = match name.parse::<u32>() {
            Ok(number) => match AclKind::from_number(number) {
                Some(kind) => (kind, rest),
                None => {
                    self.todo(cmd, "access-list number range");
                    return;
                }
            },
            Err(_) => match rest {
                ["standard", rest @ ..] => (AclKind::Standard, rest),
                ["extended", rest @ ..] => (AclKind::Extended, rest),
                ["remark", ..] if self.config.standard_access_lists.contains_key(*name) => {
                    (AclKind::Standard, rest)
                }
                _ => (AclKind::Extended, rest),
            },
        };
        self.define(kind.structure_type(), name, cmd.line);
        self.lower_acl_entry(cmd, kind, name, rest);
    }

    pub(super) fn remove_numbered_access_list(&mut self, name: &str) {
        self.config.standard_access_lists.shift_remove(name);
        self.config.extended_access_lists.shift_remove(name);
        self.undefine(StructureType::Ipv4AccessListStandard, name);
        self.undefine(StructureType::Ipv4AccessListExtended, name);
    }

    pub(super) fn lower_named_access_list(&mut self, stanza: &Stanza, cmd: &Cmd) -> Result<()> {
        let words = cmd.words();
        let (kind, name) = match words.as_slice() {
            ["ip", "access-list", "standard", name] => (AclKind::Standard, *name),
            ["ip", "access-list", "extended", name] => (AclKind::Extended, *name),
            ["ip", "access-list", "logging" | "resequence" | "log-update", ..] => {
                self.unhandled(cmd);
                return Ok(());
            }
            ["ip" | "ipv4", "access-list", name] => (AclKind::Extended, *name),
            ["ipv6", "access-list", name] | ["ipv6", "access-list", "extended", name] => {
                (AclKind::Ipv6, *name)
            }
            _ => {
                self.unhandled(cmd);
                return Ok(());
            }
        };
        self.define_block(kind.structure_type(), name, stanza);
        self.ensure_access_list(kind, name);
        self.walk_block(stanza, |this, child| {
            let cmd = this.cmd(child);
            let words = cmd.words();
            this.lower_acl_entry(&cmd, kind, name, &words);
            Ok(())
        })
    }

    fn ensure_access_list(&mut self, kind: AclKind, name: &str) {
        let key = SmolStr::new(name);
        match kind {
            AclKind::Standard => {
                self.config
                    .standard_access_lists
                    .entry(key)
                    .or_insert_with(|| StandardAccessList::new(name));
            }
            AclKind::Extended => {
                self.config
                    .extended_access_lists
                    .entry(key)
                    .or_insert_with(|| ExtendedAccessList::new(name, false));
            }
            AclKind::Ipv6 => {
                self.config
                    .ipv6_access_lists
                    .entry(key)
                    .or_insert_with(|| ExtendedAccessList::new(name, true));
            }
        }
    }

    fn extended_list_mut(&mut self, kind: AclKind, name: &str) -> Option<&mut ExtendedAccessList> {
        self.ensure_access_list(kind, name);
        match kind {
            AclKind::Standard => None,
            AclKind::Extended => self.config.extended_access_lists.get_mut(name),
            AclKind::Ipv6 => self.config.ipv6_access_lists.get_mut(name),
        }
    }

    /// One entry: `[SEQ] permit|deny ...`, `remark ...` or `no SEQ`.
    fn lower_acl_entry(&mut self, cmd: &Cmd, kind: AclKind, name: &str, words: &[&str]) {
        let (sequence, words) = match words {
            [seq, rest @ ..] if seq.parse::<u32>().is_ok() => (seq.parse().ok(), rest),
            _ => (None, words),
        };
        match words {
            ["remark", text @ ..] => {
                let text = text.join(" ");
                self.ensure_access_list(kind, name);
                match kind {
                    AclKind::Standard => {
                        if let Some(list) = self.config.standard_access_lists.get_mut(name) {
                            list.remarks.push(text);
                        }
                    }
                    _ => {
                        if let Some(list) = self.extended_list_mut(kind, name) {
                            list.remarks.push(text);
                        }
                    }
                }
            }
            ["no", seq] => {
                let Some(seq) = self.num::<u32>(cmd, seq) else {
                    return;
                };
                if let Some(list) = self.config.standard_access_lists.get_mut(name) {
                    list.lines.retain(|l| l.sequence != Some(seq));
                }
                if let Some(list) = self.extended_list_mut(kind, name) {
                    list.lines.retain(|l| l.sequence != Some(seq));
                }
            }
            [action, args @ ..] => {
                let Some(action) = LineAction::parse(action) else {
                    self.unhandled(cmd);
                    return;
                };
                match kind {
                    AclKind::Standard => {
                        self.lower_standard_line(cmd, name, sequence, action, args)
                    }
                    _ => self.lower_extended_line(cmd, kind, name, sequence, action, args),
                }
            }
            [] => {}
        }
    }

    fn lower_standard_line(
        &mut self,
        cmd: &Cmd,
        name: &str,
        sequence: Option<u32>,
        action: LineAction,
        args: &[&str],
    ) {
        let mut words: Words = args.iter().copied().peekable();
        let source = match take_address(&mut words, false) {
            Some(AddressSpec::Any) => IpWildcard::any(),
            Some(AddressSpec::Wildcard(wildcard)) => wildcard,
            _ => {
                self.invalid(cmd, "standard access-list source");
                return;
            }
        };
        self.ensure_access_list(AclKind::Standard, name);
        if let Some(list) = self.config.standard_access_lists.get_mut(name) {
            let line = StandardAccessListLine {
                sequence,
                action,
                source,
            };
            insert_sequenced(&mut list.lines, line, |l| l.sequence);
        }
    }

    fn lower_extended_line(
        &mut self,
        cmd: &Cmd,
        kind: AclKind,
        name: &str,
        sequence: Option<u32>,
        action: LineAction,
        args: &[&str],
    ) {
        let ipv6 = kind == AclKind::Ipv6;
        let mut line = ExtendedAccessListLine::new(action, &cmd.text);
        line.sequence = sequence;
        let mut words: Words = args.iter().copied().peekable();

        match words.next() {
            Some("object-group") => {
                let Some(group) = words.next() else {
                    self.invalid(cmd, "service object-group");
                    return;
                };
                self.reference(
                    StructureType::ServiceObjectGroup,
                    group,
                    StructureUsage::ExtendedAccessListServiceObjectGroup,
                    cmd.line,
                );
                line.service_object_group = Some(SmolStr::new(group));
            }
            Some("ip" | "ipv4" | "ipv6") => {}
            Some(protocol) => match protocol_number(protocol) {
                Some(number) => line.protocol = Some(number),
                None => {
                    self.invalid(cmd, "protocol");
                    return;
                }
            },
            None => {
                self.invalid(cmd, "access-list line");
                return;
            }
        }

        let Some(source) = take_address(&mut words, ipv6) else {
            self.invalid(cmd, "source address");
            return;
        };
        let Some(source_ports) = take_ports(&mut words) else {
            self.invalid(cmd, "source ports");
            return;
        };
        let Some(destination) = take_address(&mut words, ipv6) else {
            self.invalid(cmd, "destination address");
            return;
        };
        let Some(destination_ports) = take_ports(&mut words) else {
            self.invalid(cmd, "destination ports");
            return;
        };
        for spec in [&source, &destination] {
            if let AddressSpec::ObjectGroup(group) = spec {
                self.reference(
                    StructureType::NetworkObjectGroup,
                    group,
                    StructureUsage::ExtendedAccessListNetworkObjectGroup,
                    cmd.line,
                );
            }
        }
        line.source = source;
        line.source_ports = source_ports;
        line.destination = destination;
        line.destination_ports = destination_ports;

        let icmp = matches!(line.protocol, Some(1 | 58));
        while let Some(word) = words.next() {
            match word {
                "established" => line.established = true,
                "dscp" => match words.next().and_then(dscp_value) {
                    Some(dscp) => line.dscp = Some(dscp),
                    None => self.invalid(cmd, "dscp"),
                },
                "log" | "log-input" => {}
                "fragments" => self.todo(cmd, "access-list fragments"),
                word if icmp && line.icmp_type.is_none() => match icmp_type(word) {
                    Some((ty, code)) => {
                        line.icmp_type = Some(ty);
                        line.icmp_code = code.or_else(|| {
                            let code = words.peek().and_then(|w| w.parse::<u8>().ok());
                            if code.is_some() {
                                words.next();
                            }
                            code
                        });
                    }
                    None => tracing::trace!(line = cmd.line, word, "unknown icmp option"),
                },
                word => tracing::trace!(line = cmd.line, word, "ignored access-list option"),
            }
        }

        if let Some(list) = self.extended_list_mut(kind, name) {
            insert_sequenced(&mut list.lines, line, |l| l.sequence);
        }
    }
}

/// Insert `line` in sequence order, replacing a line with the same number.
/// Unnumbered lines go at the end.
fn insert_sequenced<T>(lines: &mut Vec<T>, line: T, sequence: impl Fn(&T) -> Option<u32>) {
    let Some(seq) = sequence(&line) else {
        lines.push(line);
        return;
    };
    if let Some(existing) = lines.iter_mut().find(|l| sequence(l) == Some(seq)) {
        *existing = line;
        return;
    }
    let at = lines
        .iter()
        .position(|l| sequence(l).is_some_and(|s| s > seq))
        .unwrap_or(lines.len());
    lines.insert(at, line);
}

/// `any`, `host A`, `object-group G`, `A/len` or `A WILDCARD`.
fn take_address(words: &mut Words, ipv6: bool) -> Option<AddressSpec> {
    let first = words.next()?;
    Some(match first {
        "any" | "any4" | "any6" => AddressSpec::Any,
        "host" => match words.next()?.parse::<IpAddr>().ok()? {
            IpAddr::V4(ip) => AddressSpec::Wildcard(IpWildcard::host(ip)),
            IpAddr::V6(ip) => AddressSpec::Ipv6Host(ip),
        },
        "object-group" | "addrgroup" => AddressSpec::ObjectGroup(SmolStr::new(words.next()?)),
        prefix if prefix.contains('/') => {
            if ipv6 || prefix.contains(':') {
                AddressSpec::Ipv6(prefix.parse::<Ipv6Network>().ok()?)
            } else {
                AddressSpec::Wildcard(IpWildcard::from_network(prefix.parse::<Ipv4Network>().ok()?))
            }
        }
        address => {
            let ip: Ipv4Addr = address.parse().ok()?;
            match words.peek().and_then(|w| w.parse::<Ipv4Addr>().ok()) {
                Some(wildcard) => {
                    words.next();
                    AddressSpec::Wildcard(IpWildcard::new(ip, wildcard))
                }
                None => AddressSpec::Wildcard(IpWildcard::host(ip)),
            }
        }
    })
}

/// An optional port operator and its ports. `None` when an operator is
/// present but its ports do not parse.
fn take_ports(words: &mut Words) -> Option<Vec<SubRange>> {
    let Some(op) = words
        .peek()
        .copied()
        .filter(|w| matches!(*w, "eq" | "neq" | "lt" | "gt" | "range"))
    else {
        return Some(Vec::new());
    };
    words.next();
    let mut ports = Vec::new();
    let wanted = match op {
        "range" => 2,
        "eq" => usize::MAX,
        _ => 1,
    };
    while ports.len() < wanted {
        match words.peek().and_then(|w| named_port(w)) {
            Some(port) => {
                ports.push(port);
                words.next();
            }
            None => break,
        }
    }
    port_ranges(op, &ports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn words<'a>(text: &'a [&'a str]) -> Words<'a> {
        text.iter().copied().peekable()
    }

    fn wildcard(ip: &str, mask: &str) -> AddressSpec {
        AddressSpec::Wildcard(IpWildcard::new(ip.parse().unwrap(), mask.parse().unwrap()))
    }

    #[rstest]
    #[case(&["any"], AddressSpec::Any)]
    #[case(&["host", "10.0.0.1"], wildcard("10.0.0.1", "0.0.0.0"))]
    #[case(&["10.0.0.0", "0.0.0.255"], wildcard("10.0.0.0", "0.0.0.255"))]
    #[case(&["10.0.0.0/24"], wildcard("10.0.0.0", "0.0.0.255"))]
    #[case(&["addrgroup", "SERVERS"], AddressSpec::ObjectGroup("SERVERS".into()))]
    fn test_take_address(#[case] text: &[&str], #[case] expected: AddressSpec) {
        assert_eq!(take_address(&mut words(text), false), Some(expected));
    }

    #[test]
    fn test_take_ports_stops_at_address() {
        let text = ["eq", "www", "443", "any"];
        let mut iter = words(&text);
        assert_eq!(
            take_ports(&mut iter),
            Some(vec![SubRange::single(80), SubRange::single(443)])
        );
        assert_eq!(iter.next(), Some("any"));
    }

    #[test]
    fn test_take_ports_without_operator() {
        let text = ["any"];
        assert_eq!(take_ports(&mut words(&text)), Some(vec![]));
    }

    #[test]
    fn test_insert_sequenced() {
        let mut lines: Vec<(Option<u32>, &str)> = vec![(Some(10), "a"), (Some(30), "c")];
        insert_sequenced(&mut lines, (Some(20), "b"), |l| l.0);
        insert_sequenced(&mut lines, (Some(30), "C"), |l| l.0);
        insert_sequenced(&mut lines, (None, "d"), |l| l.0);
        assert_eq!(
            lines,
            vec![(Some(10), "a"), (Some(20), "b"), (Some(30), "C"), (None, "d")]
        );
    }

    #[rstest]
    #[case(10, Some(AclKind::Standard))]
    #[case(1300, Some(AclKind::Standard))]
    #[case(101, Some(AclKind::Extended))]
    #[case(2500, Some(AclKind::Extended))]
    #[case(700, None)]
    fn test_numbered_kind(#[case] number: u32, #[case] expected: Option<AclKind>) {
        assert_eq!(AclKind::from_number(number), expected);
    }
}
