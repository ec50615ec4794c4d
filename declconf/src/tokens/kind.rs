//! Token classification
//!
//! A single piece of input text can satisfy several patterns at once
//! (`5` is an integer, a float prefix, and a value; `web.example.com` is a
//! hostname and a value), so tokens carry a [`KindSet`] rather than a single
//! kind. Grammar checks are set-membership tests.

/// Closed set of token classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    Newline = 0,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Semi,
    Equals,
    Int,
    Float,
    Str,
    Ident,
    Filename,
    Hostname,
    HostPort,
    Ip,
    Ipv4,
    Ipv6,
    IpPort,
    Ipv4Port,
    Ipv6Port,
    Pattern,
    End,
    Comment,
    /// Marker carried by every kind usable as a statement value.
    Value,
    Eof,
    Unknown,
}

impl TokenKind {
    const ALL: [TokenKind; 27] = [
        TokenKind::Newline,
        TokenKind::LBrace,
        TokenKind::RBrace,
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::Comma,
        TokenKind::Semi,
        TokenKind::Equals,
        TokenKind::Int,
        TokenKind::Float,
        TokenKind::Str,
        TokenKind::Ident,
        TokenKind::Filename,
        TokenKind::Hostname,
        TokenKind::HostPort,
        TokenKind::Ip,
        TokenKind::Ipv4,
        TokenKind::Ipv6,
        TokenKind::IpPort,
        TokenKind::Ipv4Port,
        TokenKind::Ipv6Port,
        TokenKind::Pattern,
        TokenKind::End,
        TokenKind::Comment,
        TokenKind::Value,
        TokenKind::Eof,
        TokenKind::Unknown,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Newline => "newline",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Semi => "';'",
            TokenKind::Equals => "'='",
            TokenKind::Int => "integer",
            TokenKind::Float => "float",
            TokenKind::Str => "string",
            TokenKind::Ident => "identifier",
            TokenKind::Filename => "filename",
            TokenKind::Hostname => "hostname",
            TokenKind::HostPort => "host:port",
            TokenKind::Ip => "ip-address",
            TokenKind::Ipv4 => "ipv4-address",
            TokenKind::Ipv6 => "ipv6-address",
            TokenKind::IpPort => "ip:port",
            TokenKind::Ipv4Port => "ipv4:port",
            TokenKind::Ipv6Port => "ipv6:port",
            TokenKind::Pattern => "match-pattern",
            TokenKind::End => "\"end\"",
            TokenKind::Comment => "comment",
            TokenKind::Value => "value",
            TokenKind::Eof => "end-of-file",
            TokenKind::Unknown => "unknown",
        }
    }
}

/// Set of token kinds, cheap to copy and test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KindSet(u32);

impl KindSet {
    pub const EMPTY: KindSet = KindSet(0);

    pub const fn empty() -> Self {
        KindSet(0)
    }

    /// Set containing a single kind
    pub const fn of(kind: TokenKind) -> Self {
        KindSet(1 << kind as u32)
    }

    /// Copy of this set with `kind` added
    pub const fn with(self, kind: TokenKind) -> Self {
        KindSet(self.0 | 1 << kind as u32)
    }

    pub const fn union(self, other: KindSet) -> Self {
        KindSet(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, kind: TokenKind) -> bool {
        self.0 & (1 << kind as u32) != 0
    }

    /// True when the two sets share at least one kind
    pub const fn intersects(self, other: KindSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, kind: TokenKind) {
        self.0 |= 1 << kind as u32;
    }

    pub fn merge(&mut self, other: KindSet) {
        self.0 |= other.0;
    }

    pub fn iter(self) -> impl Iterator<Item = TokenKind> {
        TokenKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl std::fmt::Display for KindSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.iter().map(|kind| kind.name()).collect();
        write!(f, "{}", names.join("|"))
    }
}

impl From<TokenKind> for KindSet {
    fn from(kind: TokenKind) -> Self {
        KindSet::of(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let set = KindSet::of(TokenKind::Int).with(TokenKind::Value);
        assert!(set.contains(TokenKind::Int));
        assert!(set.contains(TokenKind::Value));
        assert!(!set.contains(TokenKind::Float));
    }

    #[test]
    fn test_intersects() {
        let numeric = KindSet::of(TokenKind::Int).with(TokenKind::Float);
        assert!(numeric.intersects(KindSet::of(TokenKind::Float)));
        assert!(!numeric.intersects(KindSet::of(TokenKind::Str)));
        assert!(!KindSet::empty().intersects(numeric));
    }

    #[test]
    fn test_merge_and_iter() {
        let mut set = KindSet::of(TokenKind::Hostname);
        set.merge(KindSet::of(TokenKind::Ident).with(TokenKind::Value));
        let kinds: Vec<TokenKind> = set.iter().collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Ident, TokenKind::Hostname, TokenKind::Value]
        );
    }

    #[test]
    fn test_display() {
        let set = KindSet::of(TokenKind::Semi).with(TokenKind::Newline);
        assert_eq!(set.to_string(), "newline|';'");
    }
}
