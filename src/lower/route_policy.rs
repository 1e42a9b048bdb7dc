//! `route-policy` bodies and the `prefix-set`, `community-set` and
//! `as-path-set` blocks they use.

use smol_str::SmolStr;

use crate::diagnostics::{Warning, codes};
use crate::model::{AsPathSet, CommunitySet, PrefixSet};
use crate::parser::Stanza;
use crate::policy::{
    PolicyLine, PolicyReference, compile_policy, parse_as_path_set_elem, parse_community_set_elem,
    parse_prefix_range,
};
use crate::symbols::{StructureType, StructureUsage};

use super::Lowerer;
use super::helpers::{Cmd, policy_name};

impl Lowerer<'_> {
    /// Every nested line of `stanza` in source order, depth first, with the
    /// set and policy terminators dropped.
    fn body_lines(&self, stanza: &Stanza) -> Vec<PolicyLine> {
        let mut lines = Vec::new();
        let mut stack: Vec<Stanza> = stanza.children().into_iter().rev().collect();
        while let Some(child) = stack.pop() {
            let text = child.text();
            if !matches!(text.as_str(), "end-policy" | "end-set") {
                lines.push(PolicyLine::new(text, self.line_of(&child)));
            }
            stack.extend(child.children().into_iter().rev());
        }
        lines
    }

    pub(super) fn lower_route_policy(&mut self, stanza: &Stanza, cmd: &Cmd, name: &str) {
        let name = policy_name(name);
        let exists = self.config.route_policies.contains_key(name);
        self.redefined(cmd, StructureType::RoutePolicy, name, exists);
        self.define_block(StructureType::RoutePolicy, name, stanza);

        let lines = self.body_lines(stanza);
        let compiled = compile_policy(name, &lines);
        for issue in &compiled.issues {
            self.warnings.add(
                Warning::todo(&format!("route-policy statement: {}", issue.message))
                    .with_line(issue.line)
                    .with_text(issue.text.as_str())
                    .with_code(codes::POLICY_STATEMENT_DEGRADED),
            );
        }

        for located in &compiled.references {
            let (ty, usage, target) = match &located.reference {
                PolicyReference::Policy(target) => (
                    StructureType::RoutePolicy,
                    StructureUsage::RoutePolicyApply,
                    target,
                ),
                PolicyReference::PrefixSet(target) => (
                    StructureType::PrefixSet,
                    StructureUsage::RoutePolicyPrefixSet,
                    target,
                ),
                PolicyReference::CommunitySet(target) => (
                    StructureType::CommunitySet,
                    StructureUsage::RoutePolicyCommunitySet,
                    target,
                ),
                PolicyReference::AsPathSet(target) => (
                    StructureType::AsPathSet,
                    StructureUsage::RoutePolicyAsPathSet,
                    target,
                ),
            };
            self.reference(ty, target, usage, located.line);
        }

        tracing::debug!(
            line = cmd.line,
            policy = name,
            statements = compiled.policy.statements.len(),
            issues = compiled.issues.len(),
            "compiled route-policy"
        );
        self.config
            .route_policies
            .insert(SmolStr::new(name), compiled.policy);
    }

    // ========================================================================
    // Named sets
    // ========================================================================

    /// Comma-separated elements of a set body, comments dropped.
    fn set_elements(&self, stanza: &Stanza) -> Vec<(String, u32)> {
        let mut elements = Vec::new();
        for line in self.body_lines(stanza) {
            let text = line.text.trim();
            if text.starts_with('#') {
                continue;
            }
            elements.extend(
                text.split(',')
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(|e| (e.to_string(), line.line)),
            );
        }
        elements
    }

    /// Flag an element that does not parse; the rest of the set is kept.
    fn invalid_element(&mut self, line: u32, text: &str, message: &str) {
        self.warnings.add(
            Warning::red_flag(format!("Invalid set element '{text}': {message}"))
                .with_line(line)
                .with_text(text)
                .with_code(codes::INVALID_VALUE),
        );
    }

    pub(super) fn lower_prefix_set(&mut self, stanza: &Stanza, cmd: &Cmd, name: &str) {
        let exists = self.config.prefix_sets.contains_key(name);
        self.redefined(cmd, StructureType::PrefixSet, name, exists);
        self.define_block(StructureType::PrefixSet, name, stanza);

        let mut set = PrefixSet::new(name);
        for (text, line) in self.set_elements(stanza) {
            let words: Vec<&str> = text.split_whitespace().collect();
            match parse_prefix_range(&words) {
                Ok(range) => set.elements.push(range),
                Err(message) => self.invalid_element(line, &text, &message),
            }
        }
        self.config.prefix_sets.insert(SmolStr::new(name), set);
    }

    pub(super) fn lower_community_set(&mut self, stanza: &Stanza, cmd: &Cmd, name: &str) {
        let exists = self.config.community_sets.contains_key(name);
        self.redefined(cmd, StructureType::CommunitySet, name, exists);
        self.define_block(StructureType::CommunitySet, name, stanza);

        let mut set = CommunitySet::new(name);
        for (text, line) in self.set_elements(stanza) {
            let words: Vec<&str> = text
                .split_whitespace()
                .map(|w| w.trim_matches('\''))
                .collect();
            match parse_community_set_elem(&words) {
                Ok(element) => set.elements.push(element),
                Err(message) => self.invalid_element(line, &text, &message),
            }
        }
        self.config.community_sets.insert(SmolStr::new(name), set);
    }

    pub(super) fn lower_as_path_set(&mut self, stanza: &Stanza, cmd: &Cmd, name: &str) {
        let exists = self.config.as_path_sets.contains_key(name);
        self.redefined(cmd, StructureType::AsPathSet, name, exists);
        self.define_block(StructureType::AsPathSet, name, stanza);

        let mut set = AsPathSet::new(name);
        for (text, line) in self.set_elements(stanza) {
            match parse_as_path_set_elem(&text) {
                Ok(element) => set.elements.push(element),
                Err(message) => self.invalid_element(line, &text, &message),
            }
        }
        self.config.as_path_sets.insert(SmolStr::new(name), set);
    }
}
