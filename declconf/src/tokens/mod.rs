//! Token model and the scanner's pattern table

pub mod kind;
pub mod token;

pub use kind::{KindSet, TokenKind};
pub use token::Token;

macro_rules! re_hostname {
    () => {
        r"(?i:([0-9a-z][0-9a-z-]*[0-9a-z]|[0-9a-z]+)(\.([0-9a-z][0-9a-z-]*[0-9a-z]|[0-9a-z]+))+)"
    };
}

macro_rules! re_ipv4 {
    () => {
        r"(([0-9]{1,3}\.){3}[0-9]{1,3})"
    };
}

macro_rules! re_ipv6 {
    () => {
        // The compressed-tail alternatives are longest-first; alternation
        // here is first-match, not longest-match.
        r"(?i:(((([0-9a-f]{1,4}:){1,7}|:)((:[0-9a-f]{1,4}){1,7}|:))|([0-9a-f]{1,4}:){7}[0-9a-f]{1,4}))"
    };
}

/// One entry in the fixed-priority pattern table.
///
/// Patterns are tried in table order at the current offset; the longest
/// match wins, and entries tying for that length merge their kind sets
/// into one token.
pub struct PatternDef {
    pub pattern: &'static str,
    pub kinds: KindSet,
}

const fn def(pattern: &'static str, kinds: KindSet) -> PatternDef {
    PatternDef { pattern, kinds }
}

/// The configuration-language pattern table.
///
/// Address and hostname forms accept an optional `/prefix` so CIDR values
/// scan as a single token. Comments stop before the newline so dialects
/// that terminate statements with newlines still see the terminator.
pub const PATTERNS: &[PatternDef] = &[
    def("\n", KindSet::of(TokenKind::Newline)),
    def(r"\{", KindSet::of(TokenKind::LBrace)),
    def(r"\}", KindSet::of(TokenKind::RBrace)),
    def(r"\(", KindSet::of(TokenKind::LParen)),
    def(r"\)", KindSet::of(TokenKind::RParen)),
    def(r",", KindSet::of(TokenKind::Comma)),
    def(r";", KindSet::of(TokenKind::Semi)),
    def(r"=", KindSet::of(TokenKind::Equals)),
    def(
        r"\*",
        KindSet::of(TokenKind::Ip)
            .with(TokenKind::Ipv4)
            .with(TokenKind::Value),
    ),
    def(
        r"\d+[kKmMgGtT]",
        KindSet::of(TokenKind::Int).with(TokenKind::Value),
    ),
    def(
        r"\d+",
        KindSet::of(TokenKind::Int)
            .with(TokenKind::Float)
            .with(TokenKind::Value),
    ),
    def(
        r"\d+\.\d+",
        KindSet::of(TokenKind::Float).with(TokenKind::Value),
    ),
    def(
        r#""(?:\\"|[^"])+(?:"|$)"#,
        KindSet::of(TokenKind::Str).with(TokenKind::Value),
    ),
    def(
        r"[a-zA-Z][a-zA-Z0-9-]*[a-zA-Z0-9]*",
        KindSet::of(TokenKind::Ident).with(TokenKind::Value),
    ),
    def(
        r"\.{0,2}/[0-9a-zA-Z./_-]+",
        KindSet::of(TokenKind::Filename).with(TokenKind::Value),
    ),
    def(
        re_hostname!(),
        KindSet::of(TokenKind::Hostname).with(TokenKind::Value),
    ),
    def(
        concat!("(", re_hostname!(), r":\d+)"),
        KindSet::of(TokenKind::HostPort).with(TokenKind::Value),
    ),
    def(
        concat!(re_ipv4!(), r"(/\d{1,2})?"),
        KindSet::of(TokenKind::Ip)
            .with(TokenKind::Ipv4)
            .with(TokenKind::Value),
    ),
    def(
        concat!(r"((\*|", re_ipv4!(), r"):\d+)"),
        KindSet::of(TokenKind::IpPort)
            .with(TokenKind::Ipv4Port)
            .with(TokenKind::Value),
    ),
    def(
        concat!(re_ipv6!(), r"(/\d{1,3})?"),
        KindSet::of(TokenKind::Ip)
            .with(TokenKind::Ipv6)
            .with(TokenKind::Value),
    ),
    def(
        concat!(r"(\[", re_ipv6!(), r"\]:\d+)"),
        KindSet::of(TokenKind::IpPort)
            .with(TokenKind::Ipv6Port)
            .with(TokenKind::Value),
    ),
    def(
        r"[@!]?[0-9a-z+_*]+(\.[0-9a-z+_*]+)*",
        KindSet::of(TokenKind::Pattern).with(TokenKind::Value),
    ),
    def(r"end", KindSet::of(TokenKind::End).with(TokenKind::Value)),
    def(r"(//|#)[^\n]*", KindSet::of(TokenKind::Comment)),
];
