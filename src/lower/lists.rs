//! Prefix lists, community lists and AS-path access lists.

use smol_str::SmolStr;

use crate::base::parse_community;
use crate::model::{
    AsPathAccessList, AsPathAccessListLine, ExpandedCommunityList, ExpandedCommunityListLine,
    LineAction, PrefixList, PrefixListLine, StandardCommunityList, StandardCommunityListLine,
    is_expanded_community_list_number,
};
use crate::policy::parse_prefix_range;
use crate::symbols::StructureType;

use super::Lowerer;
use super::helpers::Cmd;

impl Lowerer<'_> {
    /// `ip|ipv6 prefix-list NAME [seq N] permit|deny PREFIX [ge N] [le N]`
    /// and `... NAME description TEXT`.
    pub(super) fn lower_prefix_list(&mut self, cmd: &Cmd) {
        let words = cmd.words();
        let [family @ ("ip" | "ipv6"), "prefix-list", name, rest @ ..] = words.as_slice() else {
            self.unhandled(cmd);
            return;
        };
        if matches!(*name, "sequence-number") {
            self.unhandled(cmd);
            return;
        }
        let ipv6 = *family == "ipv6";
        let ty = if ipv6 {
            StructureType::Prefix6List
        } else {
            StructureType::PrefixList
        };
        self.define(ty, name, cmd.line);

        if let ["description", text @ ..] = rest {
            self.prefix_list_mut(name, ipv6).description = Some(text.join(" "));
            return;
        }
        let (sequence, rest) = match rest {
            ["seq", seq, rest @ ..] => match seq.parse::<u32>() {
                Ok(seq) => (Some(seq), rest),
                Err(_) => {
                    self.invalid(cmd, "prefix-list sequence");
                    return;
                }
            },
            _ => (None, rest),
        };
        let Some((action, range)) = rest.split_first() else {
            self.invalid(cmd, "prefix-list line");
            return;
        };
        let Some(action) = LineAction::parse(action) else {
            self.invalid(cmd, "prefix-list action");
            return;
        };
        let range = match parse_prefix_range(range) {
            Ok(range) => range,
            Err(message) => {
                self.invalid(cmd, &message);
                return;
            }
        };
        let list = self.prefix_list_mut(name, ipv6);
        let sequence = sequence.unwrap_or_else(|| list.next_sequence());
        let replaced = list.add_line(PrefixListLine {
            sequence,
            action,
            range,
        });
        if replaced {
            self.pedantic(
                cmd.line,
                format!("Prefix list '{name}' sequence {sequence} redefined"),
            );
        }
    }

    fn prefix_list_mut(&mut self, name: &str, ipv6: bool) -> &mut PrefixList {
        let lists = if ipv6 {
            &mut self.config.prefix6_lists
        } else {
            &mut self.config.prefix_lists
        };
        lists
            .entry(SmolStr::new(name))
            .or_insert_with(|| PrefixList::new(name, ipv6))
    }

    pub(super) fn remove_prefix_list(&mut self, name: &str, ipv6: bool) {
        if ipv6 {
            self.config.prefix6_lists.shift_remove(name);
            self.undefine(StructureType::Prefix6List, name);
        } else {
            self.config.prefix_lists.shift_remove(name);
            self.undefine(StructureType::PrefixList, name);
        }
    }

    /// `ip community-list N ...` or `ip community-list standard|expanded NAME ...`.
    pub(super) fn lower_community_list(&mut self, cmd: &Cmd) {
        let words = cmd.words();
        let (expanded, name, rest) = match words.as_slice() {
            ["ip", "community-list", "standard", name, rest @ ..] => (false, *name, rest),
            ["ip", "community-list", "expanded", name, rest @ ..] => (true, *name, rest),
            ["ip", "community-list", number, rest @ ..] => {
                match number
                    .parse::<u32>()
                    .ok()
                    .and_then(is_expanded_community_list_number)
                {
                    Some(expanded) => (expanded, *number, rest),
                    None => {
                        self.invalid(cmd, "community-list number");
                        return;
                    }
                }
            }
            _ => {
                self.unhandled(cmd);
                return;
            }
        };
        let rest = skip_sequence(rest);
        let Some((action, values)) = rest.split_first() else {
            self.invalid(cmd, "community-list line");
            return;
        };
        let Some(action) = LineAction::parse(action) else {
            self.invalid(cmd, "community-list action");
            return;
        };

        if expanded {
            self.define(StructureType::CommunityListExpanded, name, cmd.line);
            self.config
                .expanded_community_lists
                .entry(SmolStr::new(name))
                .or_insert_with(|| ExpandedCommunityList::new(name))
                .lines
                .push(ExpandedCommunityListLine {
                    action,
                    regex: values.join(" "),
                });
            return;
        }

        self.define(StructureType::CommunityListStandard, name, cmd.line);
        let mut communities = Vec::with_capacity(values.len());
        for value in values {
            match parse_community(value) {
                Some(community) => communities.push(community),
                None => {
                    self.invalid(cmd, &format!("community '{value}'"));
                    return;
                }
            }
        }
        self.config
            .standard_community_lists
            .entry(SmolStr::new(name))
            .or_insert_with(|| StandardCommunityList::new(name))
            .lines
            .push(StandardCommunityListLine {
                action,
                communities,
            });
    }

    /// `ip as-path access-list NAME [seq N] permit|deny REGEX`.
    pub(super) fn lower_as_path_access_list(&mut self, cmd: &Cmd) {
        let words = cmd.words();
        let ["ip", "as-path", "access-list", name, rest @ ..] = words.as_slice() else {
            self.unhandled(cmd);
            return;
        };
        let rest = skip_sequence(rest);
        let Some((action, regex)) = rest.split_first() else {
            self.invalid(cmd, "as-path access-list line");
            return;
        };
        let Some(action) = LineAction::parse(action) else {
            self.invalid(cmd, "as-path access-list action");
            return;
        };
        self.define(StructureType::AsPathAccessList, name, cmd.line);
        self.config
            .as_path_access_lists
            .entry(SmolStr::new(*name))
            .or_insert_with(|| AsPathAccessList::new(name))
            .lines
            .push(AsPathAccessListLine {
                action,
                regex: regex.join(" "),
            });
    }
}

/// Drop a leading NX-OS `seq N`. Lines are kept in source order.
fn skip_sequence<'a>(words: &'a [&'a str]) -> &'a [&'a str] {
    match words {
        ["seq", seq, rest @ ..] if seq.parse::<u32>().is_ok() => rest,
        _ => words,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["seq", "10", "permit", "_65000_"], &["permit", "_65000_"])]
    #[case(&["permit", "_65000_"], &["permit", "_65000_"])]
    #[case(&["seq", "x", "permit"], &["seq", "x", "permit"])]
    fn test_skip_sequence(#[case] words: &[&str], #[case] expected: &[&str]) {
        assert_eq!(skip_sequence(words), expected);
    }
}
