//! Route-policy compiler.
//!
//! Input is the flat, ordered list of lines between `route-policy NAME` and
//! `end-policy`. `if`/`elseif`/`else`/`endif` are recognised by keyword, so
//! indentation inside the body does not matter. Construction is purely
//! syntax directed; nothing is evaluated.
//!
//! A line that does not compile becomes a [`Statement::Comment`] holding
//! its text and an entry in [`CompiledPolicy::issues`]. A guard that does
//! not compile becomes [`Boolean::Unsupported`] and its branch is kept. The
//! rest of the policy still compiles.

use std::net::IpAddr;

use ipnetwork::IpNetwork;
use smol_str::SmolStr;

use crate::base::{RoutingProtocol, SubRange, parse_asn, parse_community};

use super::ast::*;
use super::visit::{LineReference, PolicyReference, boolean_refs, statement_refs};

/// One source line of a policy body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyLine {
    pub text: String,
    pub line: u32,
}

impl PolicyLine {
    pub fn new(text: impl Into<String>, line: u32) -> Self {
        Self {
            text: text.into(),
            line,
        }
    }

    fn keyword(&self) -> &str {
        self.text.split_whitespace().next().unwrap_or("")
    }
}

/// A line that degraded to a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileIssue {
    pub line: u32,
    pub text: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPolicy {
    pub policy: RoutePolicy,
    pub issues: Vec<CompileIssue>,
    /// Named structures used by the body, in source order, each at its own line.
    pub references: Vec<LineReference>,
}

/// Compile a policy body.
pub fn compile_policy(name: &str, lines: &[PolicyLine]) -> CompiledPolicy {
    let mut compiler = Compiler {
        lines,
        pos: 0,
        issues: Vec::new(),
        references: Vec::new(),
    };
    let mut statements = compiler.block(&[]);
    // Stray branch keywords at top level end a block early; keep going.
    while compiler.pos < lines.len() {
        let line = &lines[compiler.pos];
        compiler.pos += 1;
        statements.push(compiler.degrade(line, format!("'{}' without 'if'", line.keyword())));
        statements.extend(compiler.block(&[]));
    }
    CompiledPolicy {
        policy: RoutePolicy {
            name: SmolStr::new(name),
            statements,
        },
        issues: compiler.issues,
        references: compiler.references,
    }
}

struct Compiler<'a> {
    lines: &'a [PolicyLine],
    pos: usize,
    issues: Vec<CompileIssue>,
    references: Vec<LineReference>,
}

impl<'a> Compiler<'a> {
    fn peek_keyword(&self) -> Option<&'a str> {
        let lines = self.lines;
        lines.get(self.pos).map(PolicyLine::keyword)
    }

    fn issue(&mut self, line: &PolicyLine, message: impl Into<String>) {
        self.issues.push(CompileIssue {
            line: line.line,
            text: line.text.trim().to_string(),
            message: message.into(),
        });
    }

    fn degrade(&mut self, line: &PolicyLine, message: impl Into<String>) -> Statement {
        self.issue(line, message);
        Statement::Comment(line.text.trim().to_string())
    }

    fn record(&mut self, line: &PolicyLine, found: Vec<PolicyReference>) {
        self.references.extend(found.into_iter().map(|reference| LineReference {
            line: line.line,
            reference,
        }));
    }

    /// The guard of an `if`/`elseif` line. One that does not compile is
    /// kept as [`Boolean::Unsupported`] so the chain keeps its shape.
    fn branch_guard(&mut self, line: &PolicyLine, keyword: &str) -> Boolean {
        match guard(&line.text, keyword) {
            Ok(guard) => {
                let mut found = Vec::new();
                boolean_refs(&guard, &mut found);
                self.record(line, found);
                guard
            }
            Err(message) => {
                self.issue(line, message);
                Boolean::Unsupported {
                    text: guard_text(&line.text, keyword),
                }
            }
        }
    }

    /// Statements up to (not including) a line starting with a terminator,
    /// or a branch keyword at top level.
    fn block(&mut self, terminators: &[&str]) -> Vec<Statement> {
        let mut statements = Vec::new();
        while let Some(keyword) = self.peek_keyword() {
            if terminators.contains(&keyword)
                || matches!(keyword, "elseif" | "else" | "endif")
            {
                break;
            }
            let lines = self.lines;
            let line = &lines[self.pos];
            self.pos += 1;
            match keyword {
                "end-policy" => {
                    self.pos = self.lines.len();
                    break;
                }
                "if" => statements.push(self.if_chain(line)),
                _ if keyword.starts_with('#') => {
                    let text = line.text.trim().trim_start_matches('#').trim();
                    statements.push(Statement::Comment(text.to_string()));
                }
                "" => {}
                _ => match simple_statement(&line.text) {
                    Ok(statement) => {
                        let mut found = Vec::new();
                        statement_refs(&statement, &mut found);
                        self.record(line, found);
                        statements.push(statement);
                    }
                    Err(message) => statements.push(self.degrade(line, message)),
                },
            }
        }
        statements
    }

    fn if_chain(&mut self, if_line: &PolicyLine) -> Statement {
        let guard = self.branch_guard(if_line, "if");
        let body = self.block(&["elseif", "else", "endif"]);
        let mut else_ifs = Vec::new();
        while self.peek_keyword() == Some("elseif") {
            let lines = self.lines;
            let line = &lines[self.pos];
            self.pos += 1;
            let guard = self.branch_guard(line, "elseif");
            let body = self.block(&["elseif", "else", "endif"]);
            else_ifs.push(ElseIf { guard, body });
        }
        let mut otherwise = None;
        if self.peek_keyword() == Some("else") {
            self.pos += 1;
            otherwise = Some(self.block(&["endif"]));
        }
        if self.peek_keyword() == Some("endif") {
            self.pos += 1;
        } else {
            self.issue(if_line, "missing 'endif'");
        }
        Statement::If(IfStatement {
            guard,
            body,
            else_ifs,
            otherwise,
        })
    }
}

/// Guard text without the branch keyword and the trailing `then`.
fn guard_text(text: &str, keyword: &str) -> String {
    let text = text.trim();
    let text = text.strip_prefix(keyword).unwrap_or(text).trim();
    text.strip_suffix("then").unwrap_or(text).trim().to_string()
}

// ============================================================================
// TOKENS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Word(String),
    Quoted(String),
    LParen,
    RParen,
    Comma,
}

fn tokenize(text: &str) -> Result<Vec<Tok>, String> {
    let mut toks = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' | ')' | ',' => {
                chars.next();
                toks.push(match c {
                    '(' => Tok::LParen,
                    ')' => Tok::RParen,
                    _ => Tok::Comma,
                });
            }
            '\'' | '"' => {
                chars.next();
                let mut quoted = String::new();
                loop {
                    match chars.next() {
                        Some(q) if q == c => break,
                        Some(other) => quoted.push(other),
                        None => return Err("unterminated quote".to_string()),
                    }
                }
                toks.push(Tok::Quoted(quoted));
            }
            _ => {
                let mut word = String::new();
                while let Some(&w) = chars.peek() {
                    if w.is_whitespace() || matches!(w, '(' | ')' | ',' | '\'' | '"') {
                        break;
                    }
                    word.push(w);
                    chars.next();
                }
                toks.push(Tok::Word(word));
            }
        }
    }
    Ok(toks)
}

struct Cursor {
    toks: Vec<Tok>,
    pos: usize,
}

impl Cursor {
    fn new(text: &str) -> Result<Self, String> {
        Ok(Self {
            toks: tokenize(text)?,
            pos: 0,
        })
    }

    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.pos)
    }

    fn peek_word(&self) -> Option<&str> {
        match self.peek() {
            Some(Tok::Word(w)) => Some(w.as_str()),
            _ => None,
        }
    }

    fn next(&mut self) -> Option<Tok> {
        let tok = self.toks.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn word(&mut self) -> Result<String, String> {
        match self.next() {
            Some(Tok::Word(w)) => Ok(w),
            Some(other) => Err(format!("expected a word, found {other:?}")),
            None => Err("unexpected end of line".to_string()),
        }
    }

    fn expect(&mut self, keyword: &str) -> Result<(), String> {
        let word = self.word()?;
        if word == keyword {
            Ok(())
        } else {
            Err(format!("expected '{keyword}', found '{word}'"))
        }
    }

    fn eat(&mut self, keyword: &str) -> bool {
        if self.peek_word() == Some(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.toks.len()
    }

    fn finish(&self) -> Result<(), String> {
        match self.peek() {
            None => Ok(()),
            Some(tok) => Err(format!("unexpected trailing {tok:?}")),
        }
    }

    /// Comma separated items inside parentheses; the `(` is already consumed.
    fn list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, String>,
    ) -> Result<Vec<T>, String> {
        let mut items = Vec::new();
        loop {
            if self.peek() == Some(&Tok::RParen) {
                self.pos += 1;
                return Ok(items);
            }
            items.push(item(self)?);
            match self.next() {
                Some(Tok::Comma) => continue,
                Some(Tok::RParen) => return Ok(items),
                Some(other) => return Err(format!("expected ',' or ')', found {other:?}")),
                None => return Err("unterminated inline set".to_string()),
            }
        }
    }
}

// ============================================================================
// BOOLEANS
// ============================================================================

/// Parse the guard of an `if`/`elseif` line, dropping the keyword and the
/// trailing `then`.
fn guard(text: &str, keyword: &str) -> Result<Boolean, String> {
    let mut cursor = Cursor::new(text)?;
    cursor.expect(keyword)?;
    if cursor.toks.last() == Some(&Tok::Word("then".to_string())) {
        cursor.toks.pop();
    } else {
        return Err(format!("'{keyword}' without 'then'"));
    }
    if cursor.at_end() {
        return Err("empty guard".to_string());
    }
    let expr = or_expr(&mut cursor)?;
    cursor.finish()?;
    Ok(expr)
}

/// Parse a standalone boolean expression.
pub fn parse_boolean(text: &str) -> Result<Boolean, String> {
    let mut cursor = Cursor::new(text)?;
    let expr = or_expr(&mut cursor)?;
    cursor.finish()?;
    Ok(expr)
}

fn or_expr(c: &mut Cursor) -> Result<Boolean, String> {
    let mut lhs = and_expr(c)?;
    while c.eat("or") {
        let rhs = and_expr(c)?;
        lhs = Boolean::or(lhs, rhs);
    }
    Ok(lhs)
}

fn and_expr(c: &mut Cursor) -> Result<Boolean, String> {
    let mut lhs = not_expr(c)?;
    while c.eat("and") {
        let rhs = not_expr(c)?;
        lhs = Boolean::and(lhs, rhs);
    }
    Ok(lhs)
}

fn not_expr(c: &mut Cursor) -> Result<Boolean, String> {
    if c.eat("not") {
        Ok(Boolean::not(primary(c)?))
    } else {
        primary(c)
    }
}

fn primary(c: &mut Cursor) -> Result<Boolean, String> {
    if c.peek() == Some(&Tok::LParen) {
        c.pos += 1;
        let expr = or_expr(c)?;
        return match c.next() {
            Some(Tok::RParen) => Ok(expr),
            _ => Err("missing ')'".to_string()),
        };
    }
    let head = c.word()?;
    match head.as_str() {
        "apply" => Ok(Boolean::Apply {
            policy: apply_target(c)?,
        }),
        "destination" => {
            c.expect("in")?;
            Ok(Boolean::DestinationIn {
                set: prefix_set_expr(c)?,
            })
        }
        "next-hop" => {
            c.expect("in")?;
            Ok(Boolean::NextHopIn {
                set: prefix_set_expr(c)?,
            })
        }
        "rib-has-route" => {
            c.expect("in")?;
            Ok(Boolean::RibHasRoute {
                set: prefix_set_expr(c)?,
            })
        }
        "community" => match c.word()?.as_str() {
            "matches-any" => Ok(Boolean::CommunityMatchesAny {
                set: community_set_expr(c)?,
            }),
            "matches-every" => Ok(Boolean::CommunityMatchesEvery {
                set: community_set_expr(c)?,
            }),
            other => Err(format!("unsupported community predicate '{other}'")),
        },
        "as-path" => {
            let op = c.word()?;
            let position = match op.as_str() {
                "in" => {
                    return Ok(Boolean::AsPathIn {
                        set: as_path_set_expr(c)?,
                    });
                }
                "originates-from" => AsPathPosition::OriginatesFrom,
                "passes-through" => AsPathPosition::PassesThrough,
                "neighbor-is" => AsPathPosition::NeighborIs,
                other => return Err(format!("unsupported as-path predicate '{other}'")),
            };
            let ranges = match c.next() {
                Some(Tok::Quoted(q)) => parse_as_ranges(&q)?,
                _ => return Err(format!("as-path {op} expects a quoted AS list")),
            };
            let exact = c.eat("exact");
            Ok(Boolean::AsPath {
                position,
                ranges,
                exact,
            })
        }
        "med" | "local-preference" | "tag" => {
            let comparator = match c.word()?.as_str() {
                "eq" | "is" => IntComparator::Eq,
                "ge" => IntComparator::Ge,
                "le" => IntComparator::Le,
                other => return Err(format!("unknown comparator '{other}'")),
            };
            let value = int_expr(&c.word()?, false, false)?;
            Ok(match head.as_str() {
                "med" => Boolean::MedIs { comparator, value },
                "local-preference" => Boolean::LocalPreferenceIs { comparator, value },
                _ => Boolean::TagIs { comparator, value },
            })
        }
        "protocol" => {
            c.expect("is")?;
            let name = c.word()?;
            let protocol = RoutingProtocol::parse(&name)
                .ok_or_else(|| format!("unknown protocol '{name}'"))?;
            // optional process id
            if c.peek_word().is_some_and(|w| !matches!(w, "and" | "or")) {
                c.pos += 1;
            }
            Ok(Boolean::ProtocolIs { protocol })
        }
        "route-type" => {
            c.expect("is")?;
            let name = c.word()?;
            let route_type =
                RouteType::parse(&name).ok_or_else(|| format!("unknown route-type '{name}'"))?;
            Ok(Boolean::RouteTypeIs { route_type })
        }
        other => Err(format!("unsupported condition '{other}'")),
    }
}

/// `NAME` or `NAME(args)`; arguments are not modelled.
fn apply_target(c: &mut Cursor) -> Result<SmolStr, String> {
    let name = c.word()?;
    if c.peek() == Some(&Tok::LParen) {
        c.pos += 1;
        c.list(|c| c.next().ok_or_else(|| "unterminated arguments".to_string()))?;
    }
    Ok(SmolStr::new(name))
}

// ============================================================================
// SET EXPRESSIONS
// ============================================================================

fn prefix_set_expr(c: &mut Cursor) -> Result<PrefixSetExpr, String> {
    match c.next() {
        Some(Tok::LParen) => {
            let ranges = c.list(|c| {
                let mut words = vec![c.word()?];
                while let Some(w) = c.peek_word() {
                    if !matches!(w, "ge" | "le" | "eq") {
                        break;
                    }
                    words.push(c.word()?);
                    words.push(c.word()?);
                }
                let refs: Vec<&str> = words.iter().map(String::as_str).collect();
                parse_prefix_range(&refs)
            })?;
            Ok(PrefixSetExpr::Inline(ranges))
        }
        Some(Tok::Word(w)) if w.starts_with('$') => Ok(PrefixSetExpr::Var(SmolStr::new(w))),
        Some(Tok::Word(w)) => Ok(PrefixSetExpr::Named(SmolStr::new(w))),
        _ => Err("expected a prefix-set".to_string()),
    }
}

fn community_set_expr(c: &mut Cursor) -> Result<CommunitySetExpr, String> {
    match c.next() {
        Some(Tok::LParen) => {
            let elems = c.list(|c| {
                let mut words = vec![c.word()?];
                if let Some(Tok::Quoted(q)) = c.peek().cloned() {
                    c.pos += 1;
                    words.push(q);
                }
                let refs: Vec<&str> = words.iter().map(String::as_str).collect();
                parse_community_set_elem(&refs)
            })?;
            Ok(CommunitySetExpr::Inline(elems))
        }
        Some(Tok::Word(w)) if w.starts_with('$') => Ok(CommunitySetExpr::Var(SmolStr::new(w))),
        Some(Tok::Word(w)) => Ok(CommunitySetExpr::Named(SmolStr::new(w))),
        _ => Err("expected a community-set".to_string()),
    }
}

fn as_path_set_expr(c: &mut Cursor) -> Result<AsPathSetExpr, String> {
    match c.next() {
        Some(Tok::LParen) => {
            let elems = c.list(|c| {
                let mut parts = Vec::new();
                while let Some(tok) = c.peek().cloned() {
                    match tok {
                        Tok::Word(w) => parts.push(w),
                        Tok::Quoted(q) => parts.push(format!("'{q}'")),
                        Tok::Comma | Tok::RParen | Tok::LParen => break,
                    }
                    c.pos += 1;
                }
                parse_as_path_set_elem(&parts.join(" "))
            })?;
            Ok(AsPathSetExpr::Inline(elems))
        }
        Some(Tok::Word(w)) if w.starts_with('$') => Ok(AsPathSetExpr::Var(SmolStr::new(w))),
        Some(Tok::Word(w)) => Ok(AsPathSetExpr::Named(SmolStr::new(w))),
        _ => Err("expected an as-path-set".to_string()),
    }
}

/// Parse `PREFIX [ge N] [le N] [eq N]`.
///
/// A bare prefix matches its own length only. `ge` alone extends to the
/// address family maximum.
pub fn parse_prefix_range(words: &[&str]) -> Result<PrefixRange, String> {
    let (first, rest) = words
        .split_first()
        .ok_or_else(|| "empty prefix element".to_string())?;
    let prefix: IpNetwork = match first.parse::<IpNetwork>() {
        Ok(p) => p,
        Err(_) => return Err(format!("invalid prefix '{first}'")),
    };
    let len = u32::from(prefix.prefix());
    let max = if prefix.is_ipv4() { 32 } else { 128 };
    let mut length = SubRange::single(len);
    let mut iter = rest.iter();
    while let Some(op) = iter.next() {
        let value: u32 = iter
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| format!("'{op}' needs a length"))?;
        match *op {
            "ge" => {
                length.start = value;
                length.end = length.end.max(max);
            }
            "le" => length.end = value,
            "eq" => length = SubRange::single(value),
            other => return Err(format!("unexpected '{other}' in prefix element")),
        }
    }
    if length.start > length.end || length.end > max {
        return Err(format!("invalid length range {length}"));
    }
    Ok(PrefixRange { prefix, length })
}

fn community_half(text: &str) -> Result<CommunityHalf, String> {
    Ok(match text {
        "*" => CommunityHalf::Any,
        "peeras" => CommunityHalf::PeerAs,
        "private-as" => CommunityHalf::PrivateAs,
        _ if text.starts_with('$') => CommunityHalf::Var(SmolStr::new(text)),
        _ if text.starts_with('[') && text.ends_with(']') => {
            let inner = &text[1..text.len() - 1];
            let (a, b) = inner
                .split_once("..")
                .ok_or_else(|| format!("invalid community range '{text}'"))?;
            let start = a.parse().map_err(|_| format!("invalid community range '{text}'"))?;
            let end = b.parse().map_err(|_| format!("invalid community range '{text}'"))?;
            CommunityHalf::Range(SubRange::new(start, end))
        }
        _ => CommunityHalf::Literal(
            text.parse()
                .map_err(|_| format!("invalid community half '{text}'"))?,
        ),
    })
}

/// Parse one community-set element: `AA:NN` with optional wildcard halves,
/// a well-known name, or `ios-regex 'RE'`.
pub fn parse_community_set_elem(words: &[&str]) -> Result<CommunitySetElem, String> {
    match words {
        ["ios-regex" | "dfa-regex", re] => Ok(CommunitySetElem::Regex(re.to_string())),
        [single] => {
            if let Some((high, low)) = single.split_once(':') {
                let high = community_half(high)?;
                let low = community_half(low)?;
                Ok(match (&high, &low) {
                    (CommunityHalf::Literal(h), CommunityHalf::Literal(l)) => {
                        CommunitySetElem::Value((u32::from(*h) << 16) | u32::from(*l))
                    }
                    _ => CommunitySetElem::Halves { high, low },
                })
            } else {
                parse_community(single)
                    .map(CommunitySetElem::Value)
                    .ok_or_else(|| format!("invalid community '{single}'"))
            }
        }
        _ => Err(format!("invalid community element '{}'", words.join(" "))),
    }
}

/// Parse the inside of `'65000 [100..200] 65001'`.
///
/// `[a..b]` keeps both bounds.
pub fn parse_as_ranges(text: &str) -> Result<Vec<SubRange>, String> {
    text.split_whitespace()
        .map(|item| {
            if let Some(inner) = item.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                let (a, b) = inner
                    .split_once("..")
                    .ok_or_else(|| format!("invalid AS range '{item}'"))?;
                match (parse_asn(a), parse_asn(b)) {
                    (Some(a), Some(b)) if a <= b => Ok(SubRange::new(a, b)),
                    _ => Err(format!("invalid AS range '{item}'")),
                }
            } else {
                parse_asn(item)
                    .map(SubRange::single)
                    .ok_or_else(|| format!("invalid AS number '{item}'"))
            }
        })
        .collect()
}

/// Parse one as-path-set element, e.g. `ios-regex '_65000$'`.
pub fn parse_as_path_set_elem(text: &str) -> Result<AsPathSetElem, String> {
    let (head, rest) = text.trim().split_once(char::is_whitespace).unwrap_or((text.trim(), ""));
    let rest = rest.trim();
    let quoted = || {
        rest.strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .map(str::to_string)
            .ok_or_else(|| format!("'{head}' expects a quoted argument"))
    };
    match head {
        "ios-regex" => Ok(AsPathSetElem::IosRegex(quoted()?)),
        "dfa-regex" => Ok(AsPathSetElem::Regex(quoted()?)),
        "originates-from" => Ok(AsPathSetElem::OriginatesFrom(parse_as_ranges(&quoted()?)?)),
        "passes-through" => Ok(AsPathSetElem::PassesThrough(parse_as_ranges(&quoted()?)?)),
        "neighbor-is" => Ok(AsPathSetElem::NeighborIs(parse_as_ranges(&quoted()?)?)),
        "length" => {
            let mut words = rest.split_whitespace();
            let comparator = match words.next() {
                Some("eq" | "is") => IntComparator::Eq,
                Some("ge") => IntComparator::Ge,
                Some("le") => IntComparator::Le,
                _ => return Err("length expects eq, ge or le".to_string()),
            };
            let value = words
                .next()
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| "length expects a number".to_string())?;
            Ok(AsPathSetElem::Length { comparator, value })
        }
        other => Err(format!("unsupported as-path-set element '{other}'")),
    }
}

// ============================================================================
// STATEMENTS
// ============================================================================

/// `relative` admits `+N`/`-N`; `igp` admits `igp-cost`.
fn int_expr(text: &str, relative: bool, igp: bool) -> Result<IntExpr, String> {
    let bad = || format!("invalid number '{text}'");
    if text.starts_with('$') {
        return Ok(IntExpr::Var(SmolStr::new(text)));
    }
    if igp && text == "igp-cost" {
        return Ok(IntExpr::IgpCost);
    }
    if let Some(n) = text.strip_prefix('+') {
        if !relative {
            return Err(bad());
        }
        return n.parse().map(IntExpr::Increment).map_err(|_| bad());
    }
    if let Some(n) = text.strip_prefix('-') {
        if !relative {
            return Err(bad());
        }
        return n.parse().map(IntExpr::Decrement).map_err(|_| bad());
    }
    text.parse().map(IntExpr::Literal).map_err(|_| bad())
}

fn simple_statement(text: &str) -> Result<Statement, String> {
    let mut c = Cursor::new(text)?;
    let head = c.word()?;
    let statement = match head.as_str() {
        "pass" => Statement::Disposition(Disposition::Pass),
        "drop" => Statement::Disposition(Disposition::Drop),
        "done" => Statement::Disposition(Disposition::Done),
        "unsuppress-route" => Statement::Disposition(Disposition::UnsuppressRoute),
        "apply" => Statement::Apply(apply_target(&mut c)?),
        "delete" => {
            c.expect("community")?;
            if c.eat("all") {
                Statement::DeleteAllCommunities
            } else {
                let negated = c.eat("not");
                c.expect("in")?;
                Statement::DeleteCommunity {
                    negated,
                    set: community_set_expr(&mut c)?,
                }
            }
        }
        "prepend" => {
            c.expect("as-path")?;
            let asn = match c.word()?.as_str() {
                "most-recent" => AsExpr::MostRecent,
                "auto" => AsExpr::Auto,
                w if w.starts_with('$') => AsExpr::Var(SmolStr::new(w)),
                w => AsExpr::Explicit(parse_asn(w).ok_or_else(|| format!("invalid AS '{w}'"))?),
            };
            let count = if c.peek_word().is_some() {
                Some(int_expr(&c.word()?, false, false)?)
            } else {
                None
            };
            Statement::Set(SetStatement::AsPathPrepend { asn, count })
        }
        "set" => Statement::Set(set_statement(&mut c)?),
        other => return Err(format!("unsupported statement '{other}'")),
    };
    c.finish()?;
    Ok(statement)
}

fn set_statement(c: &mut Cursor) -> Result<SetStatement, String> {
    let attribute = c.word()?;
    Ok(match attribute.as_str() {
        "community" => {
            let set = community_set_expr(c)?;
            let additive = c.eat("additive");
            SetStatement::Community { set, additive }
        }
        "local-preference" => SetStatement::LocalPreference(int_expr(&c.word()?, true, false)?),
        "med" => SetStatement::Med(int_expr(&c.word()?, true, true)?),
        "tag" => SetStatement::Tag(int_expr(&c.word()?, false, false)?),
        "weight" => SetStatement::Weight(int_expr(&c.word()?, false, false)?),
        "isis-metric" => SetStatement::IsisMetric(int_expr(&c.word()?, false, false)?),
        "next-hop" => {
            let hop = c.word()?;
            let hop = match hop.as_str() {
                "self" => NextHop::SelfAddress,
                "peer-address" => NextHop::PeerAddress,
                "discard" => NextHop::Discard,
                ip => NextHop::Ip(
                    ip.parse::<IpAddr>()
                        .map_err(|_| format!("invalid next-hop '{ip}'"))?,
                ),
            };
            // destination-vrf only selects the lookup table
            c.eat("destination-vrf");
            SetStatement::NextHop(hop)
        }
        "origin" => {
            let word = c.word()?;
            let origin = match word.as_str() {
                "igp" => OriginExpr::Literal {
                    origin: OriginType::Igp,
                    asn: None,
                },
                "incomplete" => OriginExpr::Literal {
                    origin: OriginType::Incomplete,
                    asn: None,
                },
                "egp" => {
                    let asn = match c.peek_word() {
                        Some(w) => Some(parse_asn(w).ok_or_else(|| format!("invalid AS '{w}'"))?),
                        None => None,
                    };
                    if asn.is_some() {
                        c.pos += 1;
                    }
                    OriginExpr::Literal {
                        origin: OriginType::Egp,
                        asn,
                    }
                }
                w if w.starts_with('$') => OriginExpr::Var(SmolStr::new(w)),
                w => return Err(format!("invalid origin '{w}'")),
            };
            SetStatement::Origin(origin)
        }
        "level" => {
            let word = c.word()?;
            SetStatement::IsisLevel(
                IsisLevel::parse(&word).ok_or_else(|| format!("invalid level '{word}'"))?,
            )
        }
        "metric-type" => {
            let word = c.word()?;
            match word.as_str() {
                "type-1" | "type-2" => SetStatement::OspfMetricType(
                    OspfMetricType::parse(&word).ok_or_else(|| "invalid metric-type".to_string())?,
                ),
                "internal" => SetStatement::IsisMetricType(IsisMetricType::Internal),
                "external" => SetStatement::IsisMetricType(IsisMetricType::External),
                "rib-metric-as-internal" => {
                    SetStatement::IsisMetricType(IsisMetricType::RibMetricAsInternal)
                }
                "rib-metric-as-external" => {
                    SetStatement::IsisMetricType(IsisMetricType::RibMetricAsExternal)
                }
                other => return Err(format!("invalid metric-type '{other}'")),
            }
        }
        other => return Err(format!("unsupported set attribute '{other}'")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn lines(text: &str) -> Vec<PolicyLine> {
        text.lines()
            .enumerate()
            .map(|(i, l)| PolicyLine::new(l, i as u32 + 2))
            .collect()
    }

    // ========================================================================
    // Statements
    // ========================================================================

    #[rstest]
    #[case("set local-preference 200", SetStatement::LocalPreference(IntExpr::Literal(200)))]
    #[case("set local-preference +10", SetStatement::LocalPreference(IntExpr::Increment(10)))]
    #[case("set med -5", SetStatement::Med(IntExpr::Decrement(5)))]
    #[case("set med igp-cost", SetStatement::Med(IntExpr::IgpCost))]
    #[case("set med $m", SetStatement::Med(IntExpr::Var("$m".into())))]
    #[case("set weight 100", SetStatement::Weight(IntExpr::Literal(100)))]
    #[case("set next-hop self", SetStatement::NextHop(NextHop::SelfAddress))]
    #[case("set level level-1-2", SetStatement::IsisLevel(IsisLevel::Level12))]
    #[case("set metric-type type-1", SetStatement::OspfMetricType(OspfMetricType::E1))]
    fn test_set_statements(#[case] text: &str, #[case] expected: SetStatement) {
        assert_eq!(simple_statement(text), Ok(Statement::Set(expected)));
    }

    #[rstest]
    #[case("set tag +1")]
    #[case("set weight igp-cost")]
    #[case("set unknown 5")]
    #[case("suppress-route")]
    fn test_rejected_statements(#[case] text: &str) {
        assert!(simple_statement(text).is_err());
    }

    #[test]
    fn test_delete_community_negated() {
        assert_eq!(
            simple_statement("delete community not in KEEP"),
            Ok(Statement::DeleteCommunity {
                negated: true,
                set: CommunitySetExpr::Named("KEEP".into()),
            })
        );
    }

    #[test]
    fn test_inline_community_set() {
        let statement = simple_statement("set community (65000:100, no-export, 65000:*) additive");
        assert_eq!(
            statement,
            Ok(Statement::Set(SetStatement::Community {
                set: CommunitySetExpr::Inline(vec![
                    CommunitySetElem::Value((65000 << 16) | 100),
                    CommunitySetElem::Value(crate::base::COMMUNITY_NO_EXPORT),
                    CommunitySetElem::Halves {
                        high: CommunityHalf::Literal(65000),
                        low: CommunityHalf::Any,
                    },
                ]),
                additive: true,
            }))
        );
    }

    // ========================================================================
    // Booleans
    // ========================================================================

    #[test]
    fn test_boolean_precedence() {
        let expr = parse_boolean("apply A or apply B and not apply C").unwrap();
        assert_eq!(expr.to_string(), "apply A or apply B and not apply C");
        match expr {
            Boolean::Or { rhs, .. } => assert!(matches!(*rhs, Boolean::And { .. })),
            other => panic!("expected or, got {other:?}"),
        }
    }

    #[test]
    fn test_boolean_left_associative() {
        let expr = parse_boolean("apply A and apply B and apply C").unwrap();
        match expr {
            Boolean::And { lhs, .. } => assert!(matches!(*lhs, Boolean::And { .. })),
            other => panic!("expected and, got {other:?}"),
        }
    }

    #[test]
    fn test_as_path_subrange_keeps_bounds() {
        let expr = parse_boolean("as-path passes-through '65000 [100..200]' exact").unwrap();
        assert_eq!(
            expr,
            Boolean::AsPath {
                position: AsPathPosition::PassesThrough,
                ranges: vec![SubRange::single(65000), SubRange::new(100, 200)],
                exact: true,
            }
        );
    }

    #[test]
    fn test_inline_prefix_set() {
        let expr = parse_boolean("destination in (10.0.0.0/8 le 24, 192.168.1.0/24)").unwrap();
        let Boolean::DestinationIn {
            set: PrefixSetExpr::Inline(ranges),
        } = expr
        else {
            panic!("expected inline prefix set");
        };
        assert_eq!(ranges[0].length, SubRange::new(8, 24));
        assert_eq!(ranges[1].length, SubRange::single(24));
    }

    #[rstest]
    #[case(&["10.0.0.0/8"], SubRange::single(8))]
    #[case(&["10.0.0.0/8", "ge", "16"], SubRange::new(16, 32))]
    #[case(&["10.0.0.0/8", "ge", "16", "le", "24"], SubRange::new(16, 24))]
    #[case(&["10.0.0.0/8", "eq", "24"], SubRange::single(24))]
    #[case(&["2001:db8::/32", "le", "64"], SubRange::new(32, 64))]
    fn test_prefix_range(#[case] words: &[&str], #[case] expected: SubRange) {
        assert_eq!(parse_prefix_range(words).unwrap().length, expected);
    }

    #[test]
    fn test_route_type_level_1_2_is_interarea() {
        assert_eq!(
            parse_boolean("route-type is level-1-2"),
            Ok(Boolean::RouteTypeIs {
                route_type: RouteType::Interarea
            })
        );
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    #[test]
    fn test_if_chain_keeps_branch_order() {
        let body = lines(
            "if destination in PS1 then\n\
             set local-preference 200\n\
             elseif community matches-any CS1 then\n\
             drop\n\
             elseif med eq 10 then\n\
             set weight 5\n\
             else\n\
             pass\n\
             endif\n\
             set med 100",
        );
        let compiled = compile_policy("RP", &body);
        assert!(compiled.issues.is_empty(), "{:?}", compiled.issues);
        assert_eq!(compiled.policy.statements.len(), 2);
        let Statement::If(stmt) = &compiled.policy.statements[0] else {
            panic!("expected if");
        };
        assert_eq!(stmt.branch_count(), 4);
        let guards: Vec<String> = stmt.guards().map(|g| g.to_string()).collect();
        assert_eq!(
            guards,
            vec![
                "destination in PS1",
                "community matches-any CS1",
                "med eq 10"
            ]
        );
    }

    #[test]
    fn test_nested_if() {
        let body = lines(
            "if apply A then\n\
             if apply B then\n\
             done\n\
             endif\n\
             endif",
        );
        let compiled = compile_policy("RP", &body);
        assert!(compiled.issues.is_empty());
        let Statement::If(outer) = &compiled.policy.statements[0] else {
            panic!("expected if");
        };
        assert!(matches!(outer.body[0], Statement::If(_)));
    }

    #[test]
    fn test_bad_statement_degrades_to_comment() {
        let body = lines("set local-preference 200\nfrobnicate now\npass");
        let compiled = compile_policy("RP", &body);
        assert_eq!(compiled.policy.statements.len(), 3);
        assert_eq!(
            compiled.policy.statements[1],
            Statement::Comment("frobnicate now".to_string())
        );
        assert_eq!(compiled.issues.len(), 1);
        assert_eq!(compiled.issues[0].line, 3);
    }

    #[test]
    fn test_bad_guard_keeps_its_branch() {
        let body = lines(
            "if med eq 1 then\n\
             set local-preference 100\n\
             elseif frobnicate now then\n\
             drop\n\
             elseif tag eq 3 then\n\
             set weight 5\n\
             else\n\
             pass\n\
             endif\n\
             done",
        );
        let compiled = compile_policy("RP", &body);
        assert_eq!(compiled.policy.statements.len(), 2);
        let Statement::If(stmt) = &compiled.policy.statements[0] else {
            panic!("expected if");
        };
        assert_eq!(stmt.branch_count(), 4);
        assert_eq!(
            stmt.else_ifs[0].guard,
            Boolean::Unsupported {
                text: "frobnicate now".to_string()
            }
        );
        assert_eq!(stmt.else_ifs[0].body, vec![Statement::Disposition(Disposition::Drop)]);
        assert!(matches!(stmt.else_ifs[1].guard, Boolean::TagIs { .. }));
        assert!(stmt.otherwise.is_some());

        assert_eq!(compiled.issues.len(), 1);
        assert_eq!(compiled.issues[0].line, 4);
        assert_eq!(compiled.issues[0].text, "elseif frobnicate now then");
    }

    #[test]
    fn test_missing_endif_keeps_chain() {
        let body = lines("if apply A then\npass");
        let compiled = compile_policy("RP", &body);
        assert!(matches!(compiled.policy.statements[0], Statement::If(_)));
        assert_eq!(compiled.issues.len(), 1);
        assert_eq!(compiled.issues[0].line, 2);
    }

    #[test]
    fn test_references_carry_their_line() {
        let body = lines(
            "if destination in PS then\n\
             apply CHILD\n\
             endif\n\
             if destination in PS then\n\
             set community CS additive\n\
             endif",
        );
        let compiled = compile_policy("RP", &body);
        let located: Vec<(u32, PolicyReference)> = compiled
            .references
            .into_iter()
            .map(|r| (r.line, r.reference))
            .collect();
        assert_eq!(
            located,
            vec![
                (2, PolicyReference::PrefixSet("PS".into())),
                (3, PolicyReference::Policy("CHILD".into())),
                (5, PolicyReference::PrefixSet("PS".into())),
                (6, PolicyReference::CommunitySet("CS".into())),
            ]
        );
    }

    #[test]
    fn test_end_policy_stops() {
        let body = lines("pass\nend-policy");
        let compiled = compile_policy("RP", &body);
        assert_eq!(compiled.policy.statements.len(), 1);
    }

    #[test]
    fn test_stray_endif() {
        let body = lines("pass\nendif\ndrop");
        let compiled = compile_policy("RP", &body);
        assert_eq!(compiled.policy.statements.len(), 3);
        assert_eq!(compiled.issues.len(), 1);
    }
}
