//! `route-map NAME [permit|deny] [SEQ]` blocks.

use std::net::IpAddr;

use smol_str::SmolStr;

use crate::base::{RoutingProtocol, parse_asn, parse_community};
use crate::diagnostics::codes;
use crate::error::{LowerError, Result};
use crate::model::{LineAction, MatchLine, RouteMap, RouteMapClause, SetLine};
use crate::parser::Stanza;
use crate::policy::{IntExpr, OriginType, OspfMetricType};
use crate::symbols::{StructureType, StructureUsage};

use super::Lowerer;
use super::helpers::Cmd;

impl Lowerer<'_> {
    pub(super) fn lower_route_map(
        &mut self,
        stanza: &Stanza,
        cmd: &Cmd,
        name: &str,
        rest: &[&str],
    ) -> Result<()> {
        let (action, rest) = match rest {
            [first, tail @ ..] => match LineAction::parse(first) {
                Some(action) => (action, tail),
                None => (LineAction::Permit, rest),
            },
            [] => (LineAction::Permit, rest),
        };
        let sequence = match rest {
            [] => self.dialect().default_route_map_sequence(),
            [seq, ..] => match self.num::<u32>(cmd, seq) {
                Some(seq) => seq,
                None => return Ok(()),
            },
        };

        self.define_block(StructureType::RouteMap, name, stanza);
        let (_, existed) = self
            .config
            .route_maps
            .entry(SmolStr::new(name))
            .or_insert_with(|| RouteMap::new(name))
            .clause_mut(sequence, action);
        if existed {
            self.red_flag(
                cmd,
                codes::DUPLICATE_DEFINITION,
                format!(
                    "Route map '{name}' already contains clause numbered '{sequence}'. \
                     Duplicate clause will be merged with original clause."
                ),
            );
        }

        let saved = self
            .ctx
            .route_map_clause
            .replace((SmolStr::new(name), sequence));
        let walked = self.walk_block(stanza, |this, child| this.lower_route_map_line(child));
        self.ctx.route_map_clause = saved;
        walked
    }

    /// The clause of the enclosing `route-map` block.
    fn clause_mut(&mut self, cmd: &Cmd) -> Result<&mut RouteMapClause> {
        let missing = || LowerError::missing_scope(cmd.line, "route-map line", "route-map clause");
        let (name, sequence) = self.ctx.route_map_clause.clone().ok_or_else(missing)?;
        self.config
            .route_maps
            .get_mut(&name)
            .and_then(|map| map.clauses.get_mut(&sequence))
            .ok_or_else(missing)
    }

    fn lower_route_map_line(&mut self, stanza: &Stanza) -> Result<()> {
        let cmd = self.cmd(stanza);
        let words = cmd.words();
        match words.as_slice() {
            ["description", ..] => self.clause_mut(&cmd)?.description = Some(cmd.rest(1)),
            ["match", args @ ..] => {
                if let Some(line) = self.route_map_match(&cmd, args) {
                    self.clause_mut(&cmd)?.set_match(line);
                }
            }
            ["set", args @ ..] => {
                if let Some(line) = self.route_map_set(&cmd, args) {
                    self.clause_mut(&cmd)?.set_set(line);
                }
            }
            ["continue"] => self.clause_mut(&cmd)?.continue_to = Some(None),
            ["continue", target] => {
                if let Some(target) = self.num::<u32>(&cmd, target) {
                    self.clause_mut(&cmd)?.continue_to = Some(Some(target));
                }
            }
            _ => self.unhandled(&cmd),
        }
        Ok(())
    }

    /// Reference every name in `names` and collect them.
    fn reference_all(
        &mut self,
        cmd: &Cmd,
        ty: StructureType,
        usage: StructureUsage,
        names: &[&str],
    ) -> Vec<SmolStr> {
        names
            .iter()
            .map(|name| {
                self.reference(ty, name, usage, cmd.line);
                SmolStr::new(name)
            })
            .collect()
    }

    fn route_map_match(&mut self, cmd: &Cmd, args: &[&str]) -> Option<MatchLine> {
        Some(match args {
            ["ip", "address", "prefix-list", names @ ..] if !names.is_empty() => {
                MatchLine::IpPrefixList(self.reference_all(
                    cmd,
                    StructureType::PrefixList,
                    StructureUsage::RouteMapMatchIpPrefixList,
                    names,
                ))
            }
            ["ip", "address", names @ ..] if !names.is_empty() => {
                MatchLine::IpAccessList(self.reference_all(
                    cmd,
                    StructureType::Ipv4AccessList,
                    StructureUsage::RouteMapMatchIpAccessList,
                    names,
                ))
            }
            ["ipv6", "address", "prefix-list", names @ ..] if !names.is_empty() => {
                MatchLine::Ipv6PrefixList(self.reference_all(
                    cmd,
                    StructureType::Prefix6List,
                    StructureUsage::RouteMapMatchIpv6PrefixList,
                    names,
                ))
            }
            ["ipv6", "address", names @ ..] if !names.is_empty() => {
                MatchLine::Ipv6AccessList(self.reference_all(
                    cmd,
                    StructureType::Ipv6AccessList,
                    StructureUsage::RouteMapMatchIpv6AccessList,
                    names,
                ))
            }
            ["community", names @ ..] if !names.is_empty() => {
                let exact = names.last() == Some(&"exact-match");
                let names = if exact {
                    &names[..names.len() - 1]
                } else {
                    names
                };
                MatchLine::Community {
                    lists: self.reference_all(
                        cmd,
                        StructureType::CommunityList,
                        StructureUsage::RouteMapMatchCommunityList,
                        names,
                    ),
                    exact,
                }
            }
            ["as-path", names @ ..] if !names.is_empty() => MatchLine::AsPath(self.reference_all(
                cmd,
                StructureType::AsPathAccessList,
                StructureUsage::RouteMapMatchAsPathAccessList,
                names,
            )),
            ["tag", tags @ ..] if !tags.is_empty() => {
                let mut values = Vec::with_capacity(tags.len());
                for tag in tags {
                    values.push(self.num::<u32>(cmd, tag)?);
                }
                MatchLine::Tag(values)
            }
            ["interface", names @ ..] if !names.is_empty() => MatchLine::Interface(
                names
                    .iter()
                    .map(|name| {
                        self.reference_interface(
                            name,
                            StructureUsage::RouteMapMatchInterface,
                            cmd.line,
                        )
                    })
                    .collect(),
            ),
            ["metric", metric] => MatchLine::Metric(self.num(cmd, metric)?),
            ["source-protocol", protocols @ ..] if !protocols.is_empty() => {
                let mut parsed = Vec::new();
                for protocol in protocols {
                    match RoutingProtocol::parse(protocol) {
                        Some(protocol) => parsed.push(protocol),
                        None if protocol.parse::<u32>().is_ok() => {}
                        None => {
                            self.invalid(cmd, "source protocol");
                            return None;
                        }
                    }
                }
                MatchLine::SourceProtocol(parsed)
            }
            _ => {
                self.todo(cmd, &format!("route-map match {}", args.first().unwrap_or(&"")));
                return None;
            }
        })
    }

    fn route_map_set(&mut self, cmd: &Cmd, args: &[&str]) -> Option<SetLine> {
        Some(match args {
            ["community", "none"] => SetLine::CommunityNone,
            ["community", values @ ..] if !values.is_empty() => {
                let additive = values.last() == Some(&"additive");
                let values = if additive {
                    &values[..values.len() - 1]
                } else {
                    values
                };
                let mut communities = Vec::with_capacity(values.len());
                for value in values {
                    match parse_community(value) {
                        Some(community) => communities.push(community),
                        None => {
                            self.invalid(cmd, &format!("community '{value}'"));
                            return None;
                        }
                    }
                }
                SetLine::Community {
                    communities,
                    additive,
                }
            }
            ["comm-list", list, "delete"] => {
                self.reference(
                    StructureType::CommunityList,
                    list,
                    StructureUsage::RouteMapSetCommListDelete,
                    cmd.line,
                );
                SetLine::CommListDelete(SmolStr::new(*list))
            }
            ["local-preference", value] => SetLine::LocalPreference(self.num(cmd, value)?),
            ["metric", value] => match metric_expr(value) {
                Some(expr) => SetLine::Metric(expr),
                None => {
                    self.invalid(cmd, "metric");
                    return None;
                }
            },
            ["metric-type", value] => match OspfMetricType::parse(value) {
                Some(ty) => SetLine::MetricType(ty),
                None => {
                    self.todo(cmd, &format!("set metric-type {value}"));
                    return None;
                }
            },
            ["ip", "next-hop", "peer-address"] => SetLine::NextHopPeerAddress,
            ["ip" | "ipv6", "next-hop", hops @ ..] if !hops.is_empty() => {
                let mut addresses = Vec::with_capacity(hops.len());
                for hop in hops {
                    addresses.push(self.num::<IpAddr>(cmd, hop)?);
                }
                SetLine::NextHop(addresses)
            }
            ["origin", origin, ..] => SetLine::Origin(match *origin {
                "igp" => OriginType::Igp,
                "egp" => OriginType::Egp,
                "incomplete" => OriginType::Incomplete,
                _ => {
                    self.invalid(cmd, "origin");
                    return None;
                }
            }),
            ["as-path", "prepend", asns @ ..] if !asns.is_empty() => {
                let mut parsed = Vec::with_capacity(asns.len());
                for asn in asns {
                    match parse_asn(asn) {
                        Some(asn) => parsed.push(asn),
                        None => {
                            self.todo(cmd, "set as-path prepend last-as");
                            return None;
                        }
                    }
                }
                SetLine::AsPathPrepend(parsed)
            }
            ["tag", value] => SetLine::Tag(self.num(cmd, value)?),
            ["weight", value] => SetLine::Weight(self.num(cmd, value)?),
            _ => {
                self.todo(cmd, &format!("route-map set {}", args.first().unwrap_or(&"")));
                return None;
            }
        })
    }
}

/// `N`, `+N` or `-N`.
fn metric_expr(text: &str) -> Option<IntExpr> {
    if let Some(value) = text.strip_prefix('+') {
        return value.parse().ok().map(IntExpr::Increment);
    }
    if let Some(value) = text.strip_prefix('-') {
        return value.parse().ok().map(IntExpr::Decrement);
    }
    text.parse().ok().map(IntExpr::Literal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("100", Some(IntExpr::Literal(100)))]
    #[case("+10", Some(IntExpr::Increment(10)))]
    #[case("-5", Some(IntExpr::Decrement(5)))]
    #[case("igp", None)]
    fn test_metric_expr(#[case] text: &str, #[case] expected: Option<IntExpr>) {
        assert_eq!(metric_expr(text), expected);
    }
}
