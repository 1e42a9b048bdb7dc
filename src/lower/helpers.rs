//! Shared plumbing for the per-block handlers.

use std::net::Ipv4Addr;
use std::str::FromStr;

use ipnetwork::Ipv4Network;

use smol_str::SmolStr;

use crate::base::RoutingProtocol;
use crate::diagnostics::{Warning, codes};
use crate::error::Result;
use crate::model::{Redistribution, canonical_network, canonicalize_interface_name};
use crate::parser::{AstNode, ErrorLine, Item, Stanza};
use crate::policy::{IsisLevel, OspfMetricType};
use crate::symbols::{DuplicatePolicy, StructureType, StructureUsage};

use super::Lowerer;

/// One command line, ready for slice-pattern dispatch.
#[derive(Debug, Clone)]
pub(super) struct Cmd {
    pub line: u32,
    pub text: String,
    words: Vec<String>,
}

impl Cmd {
    /// Words with quotes stripped.
    pub fn words(&self) -> Vec<&str> {
        self.words.iter().map(String::as_str).collect()
    }

    /// Words from index `n` on, joined by single spaces.
    pub fn rest(&self, n: usize) -> String {
        self.words.get(n..).map(|w| w.join(" ")).unwrap_or_default()
    }
}

impl Lowerer<'_> {
    pub(super) fn line_of(&self, stanza: &Stanza) -> u32 {
        self.line_index.line(stanza.syntax().text_range().start())
    }

    pub(super) fn cmd(&self, stanza: &Stanza) -> Cmd {
        Cmd {
            line: self.line_of(stanza),
            text: stanza.text(),
            words: stanza
                .words()
                .iter()
                .map(|w| w.value().to_string())
                .collect(),
        }
    }

    /// Walk the nested lines of `stanza`, handing each to `handle`.
    pub(super) fn walk_block(
        &mut self,
        stanza: &Stanza,
        mut handle: impl FnMut(&mut Self, &Stanza) -> Result<()>,
    ) -> Result<()> {
        let line = self.line_of(stanza);
        tracing::debug!(line, block = %stanza.text(), "enter block");
        for item in stanza.items() {
            match item {
                Item::Stanza(child) => handle(self, &child)?,
                Item::Error(error) => self.unrecognized(&error),
            }
        }
        tracing::debug!(line, "exit block");
        Ok(())
    }

    /// Every line of a block, header first, in source order.
    pub(super) fn block_lines(&self, stanza: &Stanza) -> Vec<u32> {
        let mut lines = vec![self.line_of(stanza)];
        for child in stanza.children() {
            lines.extend(self.block_lines(&child));
        }
        lines
    }

    // ========================================================================
    // Registry
    // ========================================================================

    pub(super) fn define(&mut self, ty: StructureType, name: &str, line: u32) {
        self.registry.define(ty, name, line);
    }

    /// Drop a removed structure's definition.
    pub(super) fn undefine(&mut self, ty: StructureType, name: &str) {
        self.registry.undefine(ty, name);
    }

    /// Define `name` on the header line and every nested line of `stanza`.
    pub(super) fn define_block(&mut self, ty: StructureType, name: &str, stanza: &Stanza) {
        for line in self.block_lines(stanza) {
            self.registry.define(ty, name, line);
        }
    }

    pub(super) fn reference(
        &mut self,
        ty: StructureType,
        name: &str,
        usage: StructureUsage,
        line: u32,
    ) {
        self.registry.reference(ty, name, usage, line);
    }

    /// Canonicalize an interface name and record the reference.
    pub(super) fn reference_interface(
        &mut self,
        name: &str,
        usage: StructureUsage,
        line: u32,
    ) -> SmolStr {
        let canonical = SmolStr::new(canonicalize_interface_name(name));
        self.registry
            .reference(StructureType::Interface, &canonical, usage, line);
        canonical
    }

    // ========================================================================
    // Warnings
    // ========================================================================

    pub(super) fn unrecognized(&mut self, error: &ErrorLine) {
        let line = self.line_index.line(error.syntax().text_range().start());
        let text = error.text();
        self.config.unrecognized = true;
        self.warnings.add(Warning::unrecognized(line, text.as_str()));
        if self.options.unrecognized_as_red_flag {
            self.warnings.add(
                Warning::red_flag(format!("Unrecognized line: {text}"))
                    .with_line(line)
                    .with_text(text.as_str())
                    .with_code(codes::UNRECOGNIZED_LINE),
            );
        }
    }

    pub(super) fn red_flag(&mut self, cmd: &Cmd, code: &'static str, message: impl Into<String>) {
        let message: String = message.into();
        self.warnings.add(
            Warning::red_flag(message)
                .with_line(cmd.line)
                .with_text(cmd.text.as_str())
                .with_code(code),
        );
    }

    /// Warn about a second block of a structure whose duplicates do not
    /// merge. Returns whether the block is such a duplicate.
    pub(super) fn redefined(
        &mut self,
        cmd: &Cmd,
        ty: StructureType,
        name: &str,
        exists: bool,
    ) -> bool {
        if !exists {
            return false;
        }
        let outcome = match ty.duplicate_policy() {
            DuplicatePolicy::Accumulate => return false,
            DuplicatePolicy::ShadowWithDummy => "The later block is ignored.",
            DuplicatePolicy::ReplaceWithWarning => "The later definition replaces the earlier one.",
        };
        self.red_flag(
            cmd,
            codes::DUPLICATE_DEFINITION,
            format!("{ty} '{name}' is defined more than once. {outcome}"),
        );
        true
    }

    /// A number, address or keyword on `cmd` that does not parse.
    pub(super) fn invalid(&mut self, cmd: &Cmd, what: &str) {
        self.red_flag(cmd, codes::INVALID_VALUE, format!("Invalid {what} in: {}", cmd.text));
    }

    pub(super) fn todo(&mut self, cmd: &Cmd, feature: &str) {
        self.warnings.todo(cmd.line, &cmd.text, feature);
    }

    pub(super) fn pedantic(&mut self, line: u32, message: impl Into<String>) {
        if self.options.pedantic {
            let message: String = message.into();
            self.warnings.add(Warning::pedantic(message).with_line(line));
        }
    }

    /// A line with no handler in the current block.
    pub(super) fn unhandled(&self, cmd: &Cmd) {
        tracing::trace!(line = cmd.line, text = %cmd.text, "no handler");
    }

    // ========================================================================
    // Values
    // ========================================================================

    /// Parse `text`, flagging the line when it does not parse.
    pub(super) fn num<T: FromStr>(&mut self, cmd: &Cmd, text: &str) -> Option<T> {
        match text.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                self.invalid(cmd, &format!("value '{text}'"));
                None
            }
        }
    }

    /// Parse the words after `redistribute`. Unknown source protocols are
    /// logged as unsupported.
    pub(super) fn redistribution(&mut self, cmd: &Cmd, args: &[&str]) -> Option<Redistribution> {
        let (protocol, rest) = args.split_first()?;
        let Some(protocol) = RoutingProtocol::parse(protocol) else {
            self.todo(cmd, &format!("redistribute {protocol}"));
            return None;
        };
        let mut redist = Redistribution::new(protocol);
        let mut iter = rest.iter().peekable();
        if let Some(source) = iter.peek() {
            if !is_redistribute_keyword(source) {
                redist.source = Some(SmolStr::new(*source));
                iter.next();
            }
        }
        while let Some(word) = iter.next() {
            match *word {
                "subnets" => redist.subnets = true,
                "metric" => redist.metric = iter.next().and_then(|v| v.parse().ok()),
                "metric-type" => {
                    redist.metric_type = iter.next().and_then(|v| OspfMetricType::parse(v))
                }
                "route-map" => redist.route_map = iter.next().map(|v| SmolStr::new(*v)),
                "route-policy" => {
                    redist.route_policy = iter.next().map(|v| SmolStr::new(policy_name(v)))
                }
                "tag" => redist.tag = iter.next().and_then(|v| v.parse().ok()),
                "level-1" | "level-2" | "level-1-2" => redist.level = IsisLevel::parse(word),
                _ => {}
            }
        }
        Some(redist)
    }

    /// Record the route-map or route-policy a redistribution names.
    pub(super) fn reference_redistribution(
        &mut self,
        cmd: &Cmd,
        redist: &Redistribution,
        usage: StructureUsage,
    ) {
        if let Some(map) = &redist.route_map {
            self.reference(StructureType::RouteMap, map, usage, cmd.line);
        }
        if let Some(policy) = &redist.route_policy {
            self.reference(StructureType::RoutePolicy, policy, usage, cmd.line);
        }
    }
}

fn is_redistribute_keyword(word: &str) -> bool {
    matches!(
        word,
        "subnets"
            | "metric"
            | "metric-type"
            | "route-map"
            | "route-policy"
            | "tag"
            | "level-1"
            | "level-2"
            | "level-1-2"
            | "match"
            | "include-connected"
    )
}

/// `NAME(arg, ...)` names policy `NAME`.
pub(super) fn policy_name(text: &str) -> &str {
    text.split('(').next().unwrap_or(text)
}

/// The classful network an address falls in, for commands that take a
/// bare network address.
pub(super) fn classful_network(ip: Ipv4Addr) -> Option<Ipv4Network> {
    let len = match ip.octets()[0] {
        0..=127 => 8,
        128..=191 => 16,
        _ => 24,
    };
    Ipv4Network::new(ip, len).ok().map(canonical_network)
}

/// `in`/`out` as a flag.
pub(super) fn inbound(direction: &str) -> Option<bool> {
    match direction {
        "in" => Some(true),
        "out" => Some(false),
        _ => None,
    }
}
