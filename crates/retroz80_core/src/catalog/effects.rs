use std::str::FromStr;

use crate::component::Flag;
use crate::error::Error;

/// How one instruction treats one flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlagEffect {
    /// `-` or a blank.
    Unaffected,
    /// `+`: set from the result.
    Affected,
    /// `P`: parity of the result.
    Parity,
    /// `V`: signed overflow.
    Overflow,
    /// `*`: instruction specific rule.
    Exceptional,
    Reset,
    Set,
}

impl FlagEffect {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '-' | ' ' => FlagEffect::Unaffected,
            '+' => FlagEffect::Affected,
            'P' => FlagEffect::Parity,
            'V' => FlagEffect::Overflow,
            '*' => FlagEffect::Exceptional,
            '0' => FlagEffect::Reset,
            '1' => FlagEffect::Set,
            _ => return None,
        })
    }
}

/// The six per-flag effects of an instruction, in catalog order
/// (carry, add/subtract, parity/overflow, half-carry, zero, sign).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FlagEffects([FlagEffect; 6]);

impl FlagEffects {
    pub const INERT: FlagEffects = FlagEffects([FlagEffect::Unaffected; 6]);

    /// True when the instruction leaves F alone entirely.
    pub fn is_inert(&self) -> bool {
        *self == Self::INERT
    }

    pub fn effect(&self, flag: Flag) -> FlagEffect {
        self.iter()
            .find(|&(f, _)| f == flag)
            .map_or(FlagEffect::Unaffected, |(_, effect)| effect)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Flag, FlagEffect)> + '_ {
        Flag::CATALOG_ORDER.iter().copied().zip(self.0.iter().copied())
    }
}

impl FromStr for FlagEffects {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::Catalog {
            reason: format!("flag string {s:?} is not six known effect characters"),
        };
        let mut effects = [FlagEffect::Unaffected; 6];
        let mut chars = s.chars();
        for slot in effects.iter_mut() {
            let c = chars.next().ok_or_else(malformed)?;
            *slot = FlagEffect::from_char(c).ok_or_else(malformed)?;
        }
        if chars.next().is_some() {
            return Err(malformed());
        }
        Ok(FlagEffects(effects))
    }
}
