use std::fmt;

/// Opcode page selected by the prefix bytes in front of the final opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Prefix {
    None,
    Cb,
    Ed,
    Dd,
    Fd,
    DdCb,
    FdCb,
}

impl Prefix {
    // Longer prefixes first so that "DDCB" is not read as "DD".
    const PARSE_ORDER: [Prefix; 6] = [
        Prefix::DdCb,
        Prefix::FdCb,
        Prefix::Cb,
        Prefix::Ed,
        Prefix::Dd,
        Prefix::Fd,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Prefix::None => "",
            Prefix::Cb => "CB",
            Prefix::Ed => "ED",
            Prefix::Dd => "DD",
            Prefix::Fd => "FD",
            Prefix::DdCb => "DDCB",
            Prefix::FdCb => "FDCB",
        }
    }

    /// DDCB/FDCB pages, where a displacement byte sits between the prefix
    /// and the final opcode byte.
    #[inline]
    pub const fn is_indexed_bit(self) -> bool {
        matches!(self, Prefix::DdCb | Prefix::FdCb)
    }

    /// The bit-instruction page reached by a CB byte after this prefix.
    pub const fn with_bit_page(self) -> Prefix {
        match self {
            Prefix::Dd => Prefix::DdCb,
            Prefix::Fd => Prefix::FdCb,
            other => other,
        }
    }
}

/// A fully decoded opcode: page plus final opcode byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Opcode {
    pub prefix: Prefix,
    pub code: u8,
}

impl Opcode {
    pub const fn new(prefix: Prefix, code: u8) -> Self {
        Self { prefix, code }
    }

    /// Catalog key: the prefix name followed by the decimal opcode byte,
    /// e.g. `"203"`, `"CB7"`, `"DDCB70"`.
    pub fn key(&self) -> String {
        self.to_string()
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let (prefix, digits) = Prefix::PARSE_ORDER
            .iter()
            .find_map(|&prefix| key.strip_prefix(prefix.as_str()).map(|rest| (prefix, rest)))
            .unwrap_or((Prefix::None, key));
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(|code| Opcode::new(prefix, code))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix.as_str(), self.code)
    }
}
