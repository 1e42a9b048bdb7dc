//! Management-plane lines: name resolution, NTP, logging, SNMP, AAA,
//! TACACS, SSH, `line` blocks and banners.

use std::net::IpAddr;

use smol_str::SmolStr;

use crate::error::Result;
use crate::model::{AaaLoginList, Line, NtpServer, SnmpCommunity};
use crate::parser::Stanza;
use crate::symbols::{StructureType, StructureUsage};

use super::Lowerer;
use super::helpers::Cmd;

impl Lowerer<'_> {
    /// Top-level management lines. Returns whether the line was one.
    pub(super) fn lower_management(&mut self, _stanza: &Stanza, cmd: &Cmd) -> Result<bool> {
        let words = cmd.words();
        match words.as_slice() {
            ["ip", "domain-name", name]
            | ["ip", "domain", "name", name]
            | ["domain-name", name] => {
                self.config.management.domain_name = Some(name.to_string());
            }
            ["ip", "name-server", servers @ ..] => {
                let servers = match servers {
                    ["vrf", _, rest @ ..] => rest,
                    all => all,
                };
                for server in servers {
                    if let Some(ip) = self.num::<IpAddr>(cmd, server) {
                        self.config.management.name_servers.push(ip);
                    }
                }
            }
            ["ntp", rest @ ..] => self.lower_ntp(cmd, rest),
            ["logging", rest @ ..] => self.lower_logging(cmd, rest),
            ["snmp-server", rest @ ..] => self.lower_snmp(cmd, rest),
            ["aaa", "new-model"] => self.config.management.aaa.new_model = true,
            ["aaa", "authentication", "login", name, methods @ ..] => {
                self.define(StructureType::AaaLoginList, name, cmd.line);
                self.config.management.aaa.login_lists.insert(
                    SmolStr::new(*name),
                    AaaLoginList {
                        name: SmolStr::new(*name),
                        methods: methods.iter().map(|m| m.to_string()).collect(),
                    },
                );
            }
            ["aaa", ..] => self.todo(cmd, "aaa"),
            ["tacacs-server", "host", host, ..] => {
                if let Some(ip) = self.num::<IpAddr>(cmd, host) {
                    self.config.management.tacacs.servers.insert(ip);
                }
            }
            ["ip", "tacacs", "source-interface", name @ ..] if !name.is_empty() => {
                let name = self.reference_interface(
                    &name.concat(),
                    StructureUsage::TacacsSourceInterface,
                    cmd.line,
                );
                self.config.management.tacacs.source_interface = Some(name);
            }
            ["ip", "ssh", "version", version] => {
                if let Some(version) = self.num::<u8>(cmd, version) {
                    self.config.management.ssh_version = Some(version);
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn lower_ntp(&mut self, cmd: &Cmd, args: &[&str]) {
        match args {
            ["server", rest @ ..] => {
                let (vrf, rest) = match rest {
                    ["vrf", vrf, rest @ ..] => (Some(SmolStr::new(*vrf)), rest),
                    _ => (None, rest),
                };
                let Some((host, options)) = rest.split_first() else {
                    self.invalid(cmd, "ntp server");
                    return;
                };
                let server = NtpServer {
                    vrf,
                    prefer: options.contains(&"prefer"),
                };
                self.config
                    .management
                    .ntp
                    .servers
                    .insert(host.to_string(), server);
            }
            ["source" | "source-interface", name @ ..] if !name.is_empty() => {
                let name = self.reference_interface(
                    &name.concat(),
                    StructureUsage::NtpSourceInterface,
                    cmd.line,
                );
                self.config.management.ntp.source_interface = Some(name);
            }
            ["access-group", _, acl, ..] => {
                self.reference(
                    StructureType::Ipv4AccessList,
                    acl,
                    StructureUsage::NtpAccessGroup,
                    cmd.line,
                );
                self.config.management.ntp.access_group = Some(SmolStr::new(*acl));
            }
            _ => self.unhandled(cmd),
        }
    }

    fn lower_logging(&mut self, cmd: &Cmd, args: &[&str]) {
        match args {
            ["source-interface", name @ ..] if !name.is_empty() => {
                let name = self.reference_interface(
                    &name.concat(),
                    StructureUsage::LoggingSourceInterface,
                    cmd.line,
                );
                self.config.management.logging.source_interface = Some(name);
            }
            ["buffered", rest @ ..] => {
                self.config.management.logging.buffered = Some(rest.join(" "));
            }
            ["trap", level] => self.config.management.logging.trap = Some(level.to_string()),
            ["host" | "server", rest @ ..] => {
                let host = match rest {
                    ["vrf", _, host, ..] => host,
                    [host, ..] => host,
                    [] => {
                        self.invalid(cmd, "logging host");
                        return;
                    }
                };
                self.config.management.logging.hosts.insert(host.to_string());
            }
            [host] if host.parse::<IpAddr>().is_ok() => {
                self.config.management.logging.hosts.insert(host.to_string());
            }
            _ => self.unhandled(cmd),
        }
    }

    fn lower_snmp(&mut self, cmd: &Cmd, args: &[&str]) {
        match args {
            ["community", name, options @ ..] => {
                let mut read_write = false;
                let mut acl = None;
                let mut iter = options.iter();
                while let Some(option) = iter.next() {
                    match *option {
                        "view" => {
                            iter.next();
                        }
                        "RO" | "ro" => read_write = false,
                        "RW" | "rw" => read_write = true,
                        "ipv6" => {
                            iter.next();
                        }
                        other => acl = Some(SmolStr::new(other)),
                    }
                }
                if let Some(acl) = &acl {
                    self.reference(
                        StructureType::Ipv4AccessList,
                        acl,
                        StructureUsage::SnmpCommunityAcl,
                        cmd.line,
                    );
                }
                self.config
                    .management
                    .snmp
                    .communities
                    .insert(name.to_string(), SnmpCommunity { read_write, acl });
            }
            ["host", host, ..] => {
                self.config.management.snmp.hosts.insert(host.to_string());
            }
            ["source-interface", _, name @ ..] | ["trap-source", name @ ..]
                if !name.is_empty() =>
            {
                let name = self.reference_interface(
                    &name.concat(),
                    StructureUsage::SnmpSourceInterface,
                    cmd.line,
                );
                self.config.management.snmp.source_interface = Some(name);
            }
            ["location", ..] => self.config.management.snmp.location = Some(cmd.rest(2)),
            ["contact", ..] => self.config.management.snmp.contact = Some(cmd.rest(2)),
            _ => self.unhandled(cmd),
        }
    }

    // ========================================================================
    // Lines and banners
    // ========================================================================

    /// `line vty 0 4`, `line con 0` and their settings.
    pub(super) fn lower_line(&mut self, stanza: &Stanza, cmd: &Cmd) -> Result<()> {
        let name = SmolStr::new(cmd.rest(1));
        if name.is_empty() {
            self.invalid(cmd, "line");
            return Ok(());
        }
        self.define_block(StructureType::Line, &name, stanza);
        self.config
            .management
            .lines
            .entry(name.clone())
            .or_insert_with(|| Line::new(&name));

        self.walk_block(stanza, |this, child| {
            let cmd = this.cmd(child);
            let words = cmd.words();
            match words.as_slice() {
                ["access-class", acl, rest @ ..] => {
                    let inbound = !rest.contains(&"out");
                    let usage = if inbound {
                        StructureUsage::LineAccessClassIn
                    } else {
                        StructureUsage::LineAccessClassOut
                    };
                    this.reference(StructureType::Ipv4AccessList, acl, usage, cmd.line);
                    if let Some(line) = this.config.management.lines.get_mut(&name) {
                        let acl = Some(SmolStr::new(*acl));
                        if inbound {
                            line.access_class_in = acl;
                        } else {
                            line.access_class_out = acl;
                        }
                    }
                }
                ["ipv6", "access-class", acl, ..] => {
                    this.reference(
                        StructureType::Ipv6AccessList,
                        acl,
                        StructureUsage::LineIpv6AccessClass,
                        cmd.line,
                    );
                    if let Some(line) = this.config.management.lines.get_mut(&name) {
                        line.ipv6_access_class = Some(SmolStr::new(*acl));
                    }
                }
                ["login", "authentication", list] => {
                    this.reference(
                        StructureType::AaaLoginList,
                        list,
                        StructureUsage::LineLoginAuthentication,
                        cmd.line,
                    );
                    if let Some(line) = this.config.management.lines.get_mut(&name) {
                        line.login_authentication = Some(SmolStr::new(*list));
                    }
                }
                ["transport", "input", protocols @ ..] => {
                    if let Some(line) = this.config.management.lines.get_mut(&name) {
                        line.transport_input = protocols.iter().map(|p| p.to_string()).collect();
                    }
                }
                ["exec-timeout", minutes, seconds @ ..] => {
                    let Some(minutes) = this.num::<u32>(&cmd, minutes) else {
                        return Ok(());
                    };
                    let seconds = match seconds.first() {
                        Some(seconds) => match this.num::<u32>(&cmd, seconds) {
                            Some(seconds) => seconds,
                            None => return Ok(()),
                        },
                        None => 0,
                    };
                    if let Some(line) = this.config.management.lines.get_mut(&name) {
                        line.exec_timeout = Some((minutes, seconds));
                    }
                }
                _ => this.unhandled(&cmd),
            }
            Ok(())
        })
    }

    /// `banner TYPE DELIM ... DELIM`, on one line or spanning several.
    pub(super) fn lower_banner(&mut self, stanza: &Stanza, cmd: &Cmd, kind: &str) {
        let body = stanza.banner().map(|b| b.text());
        match banner_text(&cmd.text, body.as_deref()) {
            Some(text) => {
                self.config
                    .management
                    .banners
                    .insert(SmolStr::new(kind), text);
            }
            None => self.invalid(cmd, "banner"),
        }
    }
}

/// Banner text between the opening and closing delimiters. `^C` counts as
/// one two-character delimiter; otherwise the first character after the
/// banner type is the delimiter.
fn banner_text(header: &str, body: Option<&str>) -> Option<String> {
    let mut words = header.split_whitespace();
    let opener = words.nth(2)?;
    let delim: String = if opener.starts_with('^') && opener.len() >= 2 {
        opener.chars().take(2).collect()
    } else {
        opener.chars().take(1).collect()
    };
    let open_at = header.find(delim.as_str())?;
    let mut text = header[open_at + delim.len()..].to_string();
    if let Some(body) = body {
        text.push('\n');
        text.push_str(body);
    }
    let text = match text.find(delim.as_str()) {
        Some(close_at) => &text[..close_at],
        None => text.as_str(),
    };
    Some(text.trim_matches(|c| c == '\n' || c == '\r').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("banner motd ^C Authorized only ^C", None, " Authorized only ")]
    #[case("banner login #", Some("Line one\nLine two\n#\n"), "Line one\nLine two")]
    #[case("banner exec ^CHello", Some("world^C\n"), "Hello\nworld")]
    fn test_banner_text(#[case] header: &str, #[case] body: Option<&str>, #[case] expected: &str) {
        assert_eq!(banner_text(header, body).as_deref(), Some(expected));
    }

    #[test]
    fn test_banner_text_needs_delimiter() {
        assert_eq!(banner_text("banner motd", None), None);
    }
}
