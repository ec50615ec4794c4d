//! Domain value types for network-flavored configuration fields

use super::convert::{ConvertError, FromText};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

impl FromText for IpAddr {
    fn from_text(text: &str) -> Result<Self, ConvertError> {
        if text == "*" {
            return Ok(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        }
        text.parse().map_err(ConvertError::Addr)
    }
}

impl FromText for Ipv4Addr {
    fn from_text(text: &str) -> Result<Self, ConvertError> {
        if text == "*" {
            return Ok(Ipv4Addr::UNSPECIFIED);
        }
        text.parse().map_err(ConvertError::Addr)
    }
}

impl FromText for Ipv6Addr {
    fn from_text(text: &str) -> Result<Self, ConvertError> {
        text.parse().map_err(ConvertError::Addr)
    }
}

/// A network in CIDR notation. Host bits below the prefix are cleared on
/// parse, so `192.168.1.7/24` stores `192.168.1.0/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpNet {
    pub addr: IpAddr,
    pub prefix: u8,
}

impl IpNet {
    pub fn new(addr: IpAddr, prefix: u8) -> Result<Self, ConvertError> {
        let max = match addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        if prefix > max {
            return Err(ConvertError::BadCidr {
                text: format!("{}/{}", addr, prefix),
            });
        }
        Ok(Self {
            addr: mask_addr(addr, prefix),
            prefix,
        })
    }

    /// True when `addr` falls inside this network
    pub fn contains(&self, addr: IpAddr) -> bool {
        match (self.addr, addr) {
            (IpAddr::V4(_), IpAddr::V4(_)) | (IpAddr::V6(_), IpAddr::V6(_)) => {
                mask_addr(addr, self.prefix) == self.addr
            }
            _ => false,
        }
    }
}

fn mask_addr(addr: IpAddr, prefix: u8) -> IpAddr {
    match addr {
        IpAddr::V4(v4) => {
            let bits = u32::from(v4);
            let mask = if prefix == 0 {
                0
            } else {
                u32::MAX << (32 - prefix as u32)
            };
            IpAddr::V4(Ipv4Addr::from(bits & mask))
        }
        IpAddr::V6(v6) => {
            let bits = u128::from(v6);
            let mask = if prefix == 0 {
                0
            } else {
                u128::MAX << (128 - prefix as u32)
            };
            IpAddr::V6(Ipv6Addr::from(bits & mask))
        }
    }
}

impl fmt::Display for IpNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

impl FromText for IpNet {
    fn from_text(text: &str) -> Result<Self, ConvertError> {
        let (addr_text, prefix_text) = text.split_once('/').ok_or_else(|| {
            ConvertError::BadCidr {
                text: text.to_string(),
            }
        })?;
        let addr = IpAddr::from_text(addr_text)?;
        let prefix: u8 = prefix_text.parse().map_err(|_| ConvertError::BadCidr {
            text: text.to_string(),
        })?;
        IpNet::new(addr, prefix)
    }
}

/// A host and port pair. The host part stays textual so hostnames pass
/// through unresolved; a missing port defaults to 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// True for the `*` wildcard host
    pub fn is_wildcard(&self) -> bool {
        self.host == "*"
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromText for Endpoint {
    fn from_text(text: &str) -> Result<Self, ConvertError> {
        let bad_port = || ConvertError::BadPort {
            text: text.to_string(),
        };

        // [v6]:port
        if let Some(rest) = text.strip_prefix('[') {
            let (host, port_part) = rest.split_once(']').ok_or_else(bad_port)?;
            let port = port_part
                .strip_prefix(':')
                .ok_or_else(bad_port)?
                .parse()
                .map_err(|_| bad_port())?;
            return Ok(Endpoint::new(host, port));
        }

        // Bare v6 addresses contain more than one colon and carry no port.
        if text.matches(':').count() > 1 {
            return Ok(Endpoint::new(text, 0));
        }

        match text.rsplit_once(':') {
            Some((host, port_text)) => {
                let port = port_text.parse().map_err(|_| bad_port())?;
                Ok(Endpoint::new(host, port))
            }
            None => Ok(Endpoint::new(text, 0)),
        }
    }
}

/// Parse a duration like `1h30m`, `500ms`, or `2.5s`. Units are `ns`,
/// `us`, `ms`, `s`, `m`, and `h`; a bare `0` needs no unit.
pub fn parse_duration(text: &str) -> Result<Duration, ConvertError> {
    let bad = || ConvertError::BadDuration {
        text: text.to_string(),
    };

    if text == "0" {
        return Ok(Duration::ZERO);
    }
    if text.is_empty() {
        return Err(bad());
    }

    let mut total_nanos: u128 = 0;
    let mut rest = text;

    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .ok_or_else(bad)?;
        if digits_end == 0 {
            return Err(bad());
        }
        let (number, after) = rest.split_at(digits_end);

        let unit_end = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, tail) = after.split_at(unit_end);

        let unit_nanos: u128 = match unit {
            "ns" => 1,
            "us" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60_000_000_000,
            "h" => 3_600_000_000_000,
            _ => return Err(bad()),
        };

        let nanos = match number.split_once('.') {
            None => {
                let whole: u128 = number.parse().map_err(|_| bad())?;
                whole.checked_mul(unit_nanos).ok_or_else(bad)?
            }
            Some((int_part, frac_part)) => {
                if frac_part.is_empty() || frac_part.contains('.') {
                    return Err(bad());
                }
                let whole: u128 = if int_part.is_empty() {
                    0
                } else {
                    int_part.parse().map_err(|_| bad())?
                };
                let frac: u128 = frac_part.parse().map_err(|_| bad())?;
                let scale = 10u128.pow(frac_part.len() as u32);
                whole
                    .checked_mul(unit_nanos)
                    .and_then(|w| frac.checked_mul(unit_nanos).map(|f| (w, f / scale)))
                    .map(|(w, f)| w + f)
                    .ok_or_else(bad)?
            }
        };

        total_nanos = total_nanos.checked_add(nanos).ok_or_else(bad)?;
        rest = tail;
    }

    let secs = u64::try_from(total_nanos / 1_000_000_000).map_err(|_| bad())?;
    let nanos = (total_nanos % 1_000_000_000) as u32;
    Ok(Duration::new(secs, nanos))
}

impl FromText for Duration {
    fn from_text(text: &str) -> Result<Self, ConvertError> {
        parse_duration(text)
    }
}
