use crate::catalog::InstructionClass;
use crate::component::{Flags, Width};
use crate::error::{Error, Result};
use crate::registers::{Reg16, Register};

/// Branch conditions of `jp`, `jr`, `call` and `ret`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    NonZero,
    Zero,
    NoCarry,
    Carry,
    ParityOdd,
    ParityEven,
    Plus,
    Minus,
}

impl Condition {
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        Some(match mnemonic {
            "nz" => Condition::NonZero,
            "z" => Condition::Zero,
            "nc" => Condition::NoCarry,
            "c" | "cf" => Condition::Carry,
            "po" => Condition::ParityOdd,
            "pe" => Condition::ParityEven,
            "p" => Condition::Plus,
            "m" => Condition::Minus,
            _ => return None,
        })
    }

    pub fn holds(self, flags: Flags) -> bool {
        match self {
            Condition::NonZero => !flags.contains(Flags::ZERO),
            Condition::Zero => flags.contains(Flags::ZERO),
            Condition::NoCarry => !flags.contains(Flags::CARRY),
            Condition::Carry => flags.contains(Flags::CARRY),
            Condition::ParityOdd => !flags.contains(Flags::PARITY_OVERFLOW),
            Condition::ParityEven => flags.contains(Flags::PARITY_OVERFLOW),
            Condition::Plus => !flags.contains(Flags::SIGN),
            Condition::Minus => flags.contains(Flags::SIGN),
        }
    }
}

/// Where an I/O instruction takes its port number from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PortSource {
    /// `(c)`: the C register.
    C,
    /// `(*)`: the next byte of the instruction stream.
    Immediate,
}

/// A validated operand template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    None,
    Register(Register),
    /// `*`
    ImmediateByte,
    /// `**`
    ImmediateWord,
    /// `(hl)`, `(bc)`, `(sp)`...
    Indirect { register: Reg16, width: Width },
    /// `(ix+*)` / `(iy+*)`
    Indexed { index: Reg16 },
    /// `(**)`
    Absolute { width: Width },
    Port(PortSource),
    Condition(Condition),
    /// A bit number, interrupt mode, restart vector or constant.
    Literal(u16),
}

impl Operand {
    /// Parses `template`. The opposite operand decides whether memory
    /// operands are accessed as bytes or words.
    pub fn parse(
        template: Option<&str>,
        opposite: Option<&str>,
        class: InstructionClass,
    ) -> Result<Self> {
        let Some(template) = template else {
            return Ok(Operand::None);
        };
        let invalid = || Error::InvalidOperand {
            template: template.to_string(),
        };

        if class.takes_condition() {
            if let Some(condition) = Condition::from_mnemonic(template) {
                return Ok(Operand::Condition(condition));
            }
        }
        if let Some(value) = parse_literal(template) {
            return Ok(Operand::Literal(value));
        }
        if let Some(register) = Register::from_name(template) {
            return Ok(Operand::Register(register));
        }
        match template {
            "*" => return Ok(Operand::ImmediateByte),
            "**" => return Ok(Operand::ImmediateWord),
            _ => {}
        }

        let inner = template
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;
        match inner {
            "c" => return Ok(Operand::Port(PortSource::C)),
            "*" => return Ok(Operand::Port(PortSource::Immediate)),
            "**" => {
                return Ok(Operand::Absolute {
                    width: access_width(opposite),
                })
            }
            _ => {}
        }
        if let Some(base) = inner.strip_suffix("+*") {
            return match Register::from_name(base) {
                Some(Register::Double(index @ (Reg16::Ix | Reg16::Iy))) => {
                    Ok(Operand::Indexed { index })
                }
                _ => Err(invalid()),
            };
        }
        match Register::from_name(inner) {
            // `jp (hl)` jumps to HL itself rather than through it.
            Some(register @ Register::Double(_)) if class == InstructionClass::Jump => {
                Ok(Operand::Register(register))
            }
            Some(Register::Double(register)) => Ok(Operand::Indirect {
                register,
                width: access_width(opposite),
            }),
            _ => Err(invalid()),
        }
    }

    /// Number of instruction-stream bytes resolving this operand consumes.
    pub fn stream_bytes(&self) -> usize {
        match self {
            Operand::ImmediateByte | Operand::Indexed { .. } => 1,
            Operand::Port(PortSource::Immediate) => 1,
            Operand::ImmediateWord | Operand::Absolute { .. } => 2,
            _ => 0,
        }
    }
}

/// Decimal digits (`"7"`) or a hex constant with an `h` suffix (`"38h"`).
fn parse_literal(template: &str) -> Option<u16> {
    if !template.is_empty() && template.bytes().all(|b| b.is_ascii_digit()) {
        return template.parse().ok();
    }
    let digits = template.strip_suffix('h')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}

fn access_width(opposite: Option<&str>) -> Width {
    match opposite {
        Some("**") => Width::Word,
        Some(name) => match Register::from_name(name) {
            Some(Register::Double(_)) => Width::Word,
            _ => Width::Byte,
        },
        None => Width::Byte,
    }
}
