use bitflags::bitflags;

/// Named flags of the Z80 F register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flag {
    Sign,
    Zero,
    HalfCarry,
    ParityOverflow,
    AddSubtract,
    Carry,
}

impl Flag {
    /// The order in which a catalog flag string lists its six characters.
    pub const CATALOG_ORDER: [Flag; 6] = [
        Flag::Carry,
        Flag::AddSubtract,
        Flag::ParityOverflow,
        Flag::HalfCarry,
        Flag::Zero,
        Flag::Sign,
    ];

    /// Bit position of the flag inside F.
    #[inline]
    pub const fn position(self) -> u8 {
        match self {
            Flag::Sign => 7,
            Flag::Zero => 6,
            Flag::HalfCarry => 4,
            Flag::ParityOverflow => 2,
            Flag::AddSubtract => 1,
            Flag::Carry => 0,
        }
    }
}

bitflags! {
    /// Bit view of the F register, including the two unnamed bits that
    /// leak from intermediate results.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Flags: u8 {
        const SIGN = 0x80;
        const ZERO = 0x40;
        const Y = 0x20;
        const HALF_CARRY = 0x10;
        const X = 0x08;
        const PARITY_OVERFLOW = 0x04;
        const ADD_SUBTRACT = 0x02;
        const CARRY = 0x01;

        const UNDOCUMENTED = Self::Y.bits() | Self::X.bits();
    }
}

impl From<Flag> for Flags {
    fn from(flag: Flag) -> Self {
        Flags::from_bits_retain(1 << flag.position())
    }
}

impl Flags {
    /// Renders the flags as `SZ5H3PNC`, with `-` for each clear bit.
    pub fn describe(self) -> String {
        const LETTERS: [(Flags, char); 8] = [
            (Flags::SIGN, 'S'),
            (Flags::ZERO, 'Z'),
            (Flags::Y, '5'),
            (Flags::HALF_CARRY, 'H'),
            (Flags::X, '3'),
            (Flags::PARITY_OVERFLOW, 'P'),
            (Flags::ADD_SUBTRACT, 'N'),
            (Flags::CARRY, 'C'),
        ];
        LETTERS
            .iter()
            .map(|&(bit, letter)| if self.contains(bit) { letter } else { '-' })
            .collect()
    }
}

/// What each flag would become after an operation.
///
/// Executors fill in whatever their operation defines; the instruction's
/// flag string then decides which entries reach F. `parity` is kept apart
/// from `parity_overflow` because the same flag position carries either
/// meaning depending on the instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PotentialFlags {
    pub sign: Option<bool>,
    pub zero: Option<bool>,
    pub half_carry: Option<bool>,
    pub parity_overflow: Option<bool>,
    pub add_subtract: Option<bool>,
    pub carry: Option<bool>,
    pub parity: Option<bool>,
}

impl PotentialFlags {
    pub fn get(&self, flag: Flag) -> Option<bool> {
        match flag {
            Flag::Sign => self.sign,
            Flag::Zero => self.zero,
            Flag::HalfCarry => self.half_carry,
            Flag::ParityOverflow => self.parity_overflow,
            Flag::AddSubtract => self.add_subtract,
            Flag::Carry => self.carry,
        }
    }

    pub fn set(&mut self, flag: Flag, value: bool) {
        let slot = match flag {
            Flag::Sign => &mut self.sign,
            Flag::Zero => &mut self.zero,
            Flag::HalfCarry => &mut self.half_carry,
            Flag::ParityOverflow => &mut self.parity_overflow,
            Flag::AddSubtract => &mut self.add_subtract,
            Flag::Carry => &mut self.carry,
        };
        *slot = Some(value);
    }
}

/// Operand width of a memory access or an arithmetic operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Width {
    Byte,
    Word,
}

impl Width {
    /// One past the largest representable value.
    #[inline]
    pub const fn max_value(self) -> u32 {
        match self {
            Width::Byte => 0x100,
            Width::Word => 0x1_0000,
        }
    }

    /// One past the largest value of the half-carry window (bit 3 for
    /// bytes, bit 11 for words).
    #[inline]
    pub const fn max_nibble_value(self) -> u32 {
        match self {
            Width::Byte => 0x10,
            Width::Word => 0x1000,
        }
    }

    #[inline]
    pub const fn sign_bit(self) -> u32 {
        match self {
            Width::Byte => 0x80,
            Width::Word => 0x8000,
        }
    }
}

/// Wrapped addition plus the flags it produces, shared by the 8-bit and
/// 16-bit arithmetic paths.
pub(crate) fn add_with_flags(
    lhs: u32,
    rhs: u32,
    carry_in: bool,
    width: Width,
) -> (u32, PotentialFlags) {
    let carry = u32::from(carry_in);
    let nibble = width.max_nibble_value();
    let sign = width.sign_bit();
    let full = lhs + rhs + carry;
    let result = full % width.max_value();

    let flags = PotentialFlags {
        sign: Some(result & sign != 0),
        zero: Some(result == 0),
        half_carry: Some(lhs % nibble + rhs % nibble + carry >= nibble),
        parity_overflow: Some((lhs & sign) == (rhs & sign) && (result & sign) != (lhs & sign)),
        add_subtract: Some(false),
        carry: Some(full >= width.max_value()),
        parity: None,
    };
    (result, flags)
}

/// Wrapped subtraction plus the flags it produces.
pub(crate) fn subtract_with_flags(
    lhs: u32,
    rhs: u32,
    borrow_in: bool,
    width: Width,
) -> (u32, PotentialFlags) {
    let borrow = u32::from(borrow_in);
    let nibble = width.max_nibble_value();
    let sign = width.sign_bit();
    let result = (lhs + width.max_value() - rhs - borrow) % width.max_value();

    let flags = PotentialFlags {
        sign: Some(result & sign != 0),
        zero: Some(result == 0),
        half_carry: Some(lhs % nibble < rhs % nibble + borrow),
        parity_overflow: Some((lhs & sign) != (rhs & sign) && (result & sign) != (lhs & sign)),
        add_subtract: Some(true),
        carry: Some(lhs < rhs + borrow),
        parity: None,
    };
    (result, flags)
}

/// Bitwise operations of the logic instruction group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bitwise {
    And,
    Or,
    Xor,
}

/// The bit shifted into the vacated end of a rotate or shift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fill {
    Zero,
    One,
    /// The carry flag as it was before the operation.
    Carry(bool),
    /// The bit shifted out at the other end (circular rotate).
    Evicted,
    /// A copy of bit 7 (arithmetic right shift).
    Sign,
}

/// An 8-bit register or memory cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Component {
    name: &'static str,
    contents: u8,
}

impl Component {
    pub const fn new(name: &'static str) -> Self {
        Self { name, contents: 0 }
    }

    pub const fn with_contents(name: &'static str, contents: u8) -> Self {
        Self { name, contents }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn get_contents(&self) -> u8 {
        self.contents
    }

    #[inline]
    pub fn set_contents(&mut self, value: u8) {
        self.contents = value;
    }

    /// Adds `value` modulo 256 and returns the carry out of bit 7.
    pub fn add_to_contents(&mut self, value: u8) -> bool {
        let (result, carry) = self.contents.overflowing_add(value);
        self.contents = result;
        carry
    }

    /// Subtracts `value` modulo 256 and returns the borrow into bit 7.
    pub fn subtract_from_contents(&mut self, value: u8) -> bool {
        let (result, borrow) = self.contents.overflowing_sub(value);
        self.contents = result;
        borrow
    }

    pub fn addition_with_flags(&mut self, value: u8, carry_in: bool) -> PotentialFlags {
        let (result, mut flags) = add_with_flags(
            u32::from(self.contents),
            u32::from(value),
            carry_in,
            Width::Byte,
        );
        self.contents = result as u8;
        self.set_potential_flags(&mut flags);
        flags
    }

    pub fn subtraction_with_flags(&mut self, value: u8, borrow_in: bool) -> PotentialFlags {
        let (result, mut flags) = subtract_with_flags(
            u32::from(self.contents),
            u32::from(value),
            borrow_in,
            Width::Byte,
        );
        self.contents = result as u8;
        self.set_potential_flags(&mut flags);
        flags
    }

    /// Applies a logic operation and derives sign, zero and parity from the
    /// result. Half-carry, add/subtract and carry are fixed by the flag
    /// string of each logic instruction.
    pub fn bitwise_with_flags(&mut self, op: Bitwise, value: u8) -> PotentialFlags {
        self.contents = match op {
            Bitwise::And => self.contents & value,
            Bitwise::Or => self.contents | value,
            Bitwise::Xor => self.contents ^ value,
        };
        let mut flags = PotentialFlags::default();
        self.set_potential_flags(&mut flags);
        flags
    }

    /// Sign, zero and parity of the current contents.
    pub fn set_potential_flags(&self, flags: &mut PotentialFlags) {
        flags.sign = Some(self.contents & 0x80 != 0);
        flags.zero = Some(self.contents == 0);
        flags.parity = Some(self.contents.count_ones() % 2 == 0);
    }

    /// Bits of the contents, most significant first.
    pub fn convert_contents_to_bit_list(&self) -> [u8; 8] {
        let mut bits = [0; 8];
        for (index, bit) in bits.iter_mut().enumerate() {
            *bit = (self.contents >> (7 - index)) & 1;
        }
        bits
    }

    /// Inverse of [`Component::convert_contents_to_bit_list`].
    pub fn convert_bit_list_to_contents(&mut self, bits: &[u8; 8]) {
        self.contents = bits
            .iter()
            .fold(0u8, |acc, &bit| (acc << 1) | (bit & 1));
    }

    /// Splits the MSB-first bit list so that the second half holds bits
    /// `position - 1` down to 0.
    pub fn split_bit_list_at_bit_pos(&self, position: u8) -> (Vec<u8>, Vec<u8>) {
        let bits = self.convert_contents_to_bit_list();
        let pivot = 8 - usize::from(position.min(8));
        (bits[..pivot].to_vec(), bits[pivot..].to_vec())
    }

    /// Bit `position`, counted from the least significant bit.
    #[inline]
    pub fn get_bit_position(&self, position: u8) -> bool {
        self.contents & (1 << position) != 0
    }

    #[inline]
    pub fn set_bit_position(&mut self, position: u8, bit: bool) {
        if bit {
            self.contents |= 1 << position;
        } else {
            self.contents &= !(1 << position);
        }
    }

    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        self.get_bit_position(flag.position())
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag) {
        self.set_bit_position(flag.position(), true);
    }

    #[inline]
    pub fn reset_flag(&mut self, flag: Flag) {
        self.set_bit_position(flag.position(), false);
    }

    #[inline]
    pub fn assign_flag(&mut self, flag: Flag, value: bool) {
        self.set_bit_position(flag.position(), value);
    }

    /// Shifts the contents one place left. Bit 7 moves into carry.
    pub fn shift_left(&mut self, fill: Fill) -> PotentialFlags {
        let evicted = self.contents & 0x80 != 0;
        let incoming = match fill {
            Fill::Zero | Fill::Sign => false,
            Fill::One => true,
            Fill::Carry(carry) => carry,
            Fill::Evicted => evicted,
        };
        self.contents = (self.contents << 1) | u8::from(incoming);
        self.shift_flags(evicted)
    }

    /// Shifts the contents one place right. Bit 0 moves into carry.
    pub fn shift_right(&mut self, fill: Fill) -> PotentialFlags {
        let evicted = self.contents & 0x01 != 0;
        let incoming = match fill {
            Fill::Zero => false,
            Fill::One => true,
            Fill::Carry(carry) => carry,
            Fill::Evicted => evicted,
            Fill::Sign => self.contents & 0x80 != 0,
        };
        self.contents = (self.contents >> 1) | (u8::from(incoming) << 7);
        self.shift_flags(evicted)
    }

    fn shift_flags(&self, carry: bool) -> PotentialFlags {
        let mut flags = PotentialFlags {
            carry: Some(carry),
            half_carry: Some(false),
            add_subtract: Some(false),
            ..PotentialFlags::default()
        };
        self.set_potential_flags(&mut flags);
        flags.parity_overflow = flags.parity;
        flags
    }
}
