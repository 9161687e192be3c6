use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use lazy_static::lazy_static;

use crate::component::{self, Component, PotentialFlags, Width};

/// Every 8-bit register cell of the Z80, including the halves of PC and SP
/// so that all 16-bit registers share one storage model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg8 {
    A,
    F,
    B,
    C,
    D,
    E,
    H,
    L,
    I,
    R,
    Ixh,
    Ixl,
    Iyh,
    Iyl,
    AAlt,
    FAlt,
    BAlt,
    CAlt,
    DAlt,
    EAlt,
    HAlt,
    LAlt,
    Pch,
    Pcl,
    Sph,
    Spl,
}

impl Reg8 {
    pub const COUNT: usize = 26;

    pub const ALL: [Reg8; Reg8::COUNT] = [
        Reg8::A,
        Reg8::F,
        Reg8::B,
        Reg8::C,
        Reg8::D,
        Reg8::E,
        Reg8::H,
        Reg8::L,
        Reg8::I,
        Reg8::R,
        Reg8::Ixh,
        Reg8::Ixl,
        Reg8::Iyh,
        Reg8::Iyl,
        Reg8::AAlt,
        Reg8::FAlt,
        Reg8::BAlt,
        Reg8::CAlt,
        Reg8::DAlt,
        Reg8::EAlt,
        Reg8::HAlt,
        Reg8::LAlt,
        Reg8::Pch,
        Reg8::Pcl,
        Reg8::Sph,
        Reg8::Spl,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Reg8::A => "A",
            Reg8::F => "F",
            Reg8::B => "B",
            Reg8::C => "C",
            Reg8::D => "D",
            Reg8::E => "E",
            Reg8::H => "H",
            Reg8::L => "L",
            Reg8::I => "I",
            Reg8::R => "R",
            Reg8::Ixh => "IXH",
            Reg8::Ixl => "IXL",
            Reg8::Iyh => "IYH",
            Reg8::Iyl => "IYL",
            Reg8::AAlt => "A'",
            Reg8::FAlt => "F'",
            Reg8::BAlt => "B'",
            Reg8::CAlt => "C'",
            Reg8::DAlt => "D'",
            Reg8::EAlt => "E'",
            Reg8::HAlt => "H'",
            Reg8::LAlt => "L'",
            Reg8::Pch => "PCH",
            Reg8::Pcl => "PCL",
            Reg8::Sph => "SPH",
            Reg8::Spl => "SPL",
        }
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg16 {
    Af,
    Bc,
    De,
    Hl,
    Ix,
    Iy,
    AfAlt,
    BcAlt,
    DeAlt,
    HlAlt,
    Pc,
    Sp,
}

impl Reg16 {
    pub const ALL: [Reg16; 12] = [
        Reg16::Af,
        Reg16::Bc,
        Reg16::De,
        Reg16::Hl,
        Reg16::Ix,
        Reg16::Iy,
        Reg16::AfAlt,
        Reg16::BcAlt,
        Reg16::DeAlt,
        Reg16::HlAlt,
        Reg16::Pc,
        Reg16::Sp,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Reg16::Af => "AF",
            Reg16::Bc => "BC",
            Reg16::De => "DE",
            Reg16::Hl => "HL",
            Reg16::Ix => "IX",
            Reg16::Iy => "IY",
            Reg16::AfAlt => "AF'",
            Reg16::BcAlt => "BC'",
            Reg16::DeAlt => "DE'",
            Reg16::HlAlt => "HL'",
            Reg16::Pc => "PC",
            Reg16::Sp => "SP",
        }
    }

    /// The `(low, high)` cells the register is made of.
    pub const fn halves(self) -> (Reg8, Reg8) {
        match self {
            Reg16::Af => (Reg8::F, Reg8::A),
            Reg16::Bc => (Reg8::C, Reg8::B),
            Reg16::De => (Reg8::E, Reg8::D),
            Reg16::Hl => (Reg8::L, Reg8::H),
            Reg16::Ix => (Reg8::Ixl, Reg8::Ixh),
            Reg16::Iy => (Reg8::Iyl, Reg8::Iyh),
            Reg16::AfAlt => (Reg8::FAlt, Reg8::AAlt),
            Reg16::BcAlt => (Reg8::CAlt, Reg8::BAlt),
            Reg16::DeAlt => (Reg8::EAlt, Reg8::DAlt),
            Reg16::HlAlt => (Reg8::LAlt, Reg8::HAlt),
            Reg16::Pc => (Reg8::Pcl, Reg8::Pch),
            Reg16::Sp => (Reg8::Spl, Reg8::Sph),
        }
    }

    pub const fn component(self) -> DoubleComponent {
        let (low, high) = self.halves();
        DoubleComponent::new(low, high)
    }
}

/// Either view of the register file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Register {
    Single(Reg8),
    Double(Reg16),
}

impl Register {
    pub const fn name(self) -> &'static str {
        match self {
            Register::Single(r) => r.name(),
            Register::Double(r) => r.name(),
        }
    }

    pub const fn width(self) -> Width {
        match self {
            Register::Single(_) => Width::Byte,
            Register::Double(_) => Width::Word,
        }
    }

    /// Case-insensitive lookup by register name (`"a"`, `"HL"`, `"af'"`).
    pub fn from_name(name: &str) -> Option<Register> {
        REGISTERS_BY_NAME
            .get(name.to_ascii_uppercase().as_str())
            .copied()
    }
}

lazy_static! {
    static ref REGISTERS_BY_NAME: HashMap<&'static str, Register> = {
        let singles = Reg8::ALL.iter().map(|&r| (r.name(), Register::Single(r)));
        let doubles = Reg16::ALL.iter().map(|&r| (r.name(), Register::Double(r)));
        singles.chain(doubles).collect()
    };
}

/// Name to register mapping covering every 8-bit cell and every composite.
pub fn registers_by_name() -> &'static HashMap<&'static str, Register> {
    &REGISTERS_BY_NAME
}

/// The register arena. Each 8-bit cell is stored exactly once; 16-bit
/// registers are views over pairs of cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterFile {
    cells: [Component; Reg8::COUNT],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    pub fn new() -> Self {
        Self {
            cells: Reg8::ALL.map(|r| Component::new(r.name())),
        }
    }

    #[inline]
    pub fn byte(&self, reg: Reg8) -> u8 {
        self[reg].get_contents()
    }

    #[inline]
    pub fn set_byte(&mut self, reg: Reg8, value: u8) {
        self[reg].set_contents(value);
    }

    #[inline]
    pub fn word(&self, reg: Reg16) -> u16 {
        reg.component().get_contents(self)
    }

    #[inline]
    pub fn set_word(&mut self, reg: Reg16, value: u16) {
        reg.component().set_contents_value(self, value);
    }

    pub fn value(&self, reg: Register) -> u16 {
        match reg {
            Register::Single(r) => u16::from(self.byte(r)),
            Register::Double(r) => self.word(r),
        }
    }

    /// Writes `value`; 8-bit registers keep the low byte.
    pub fn set_value(&mut self, reg: Register, value: u16) {
        match reg {
            Register::Single(r) => self.set_byte(r, value as u8),
            Register::Double(r) => self.set_word(r, value),
        }
    }

    /// Swaps the contents of two registers of the same width.
    pub fn swap(&mut self, a: Reg16, b: Reg16) {
        let (a_value, b_value) = (self.word(a), self.word(b));
        self.set_word(a, b_value);
        self.set_word(b, a_value);
    }
}

impl Index<Reg8> for RegisterFile {
    type Output = Component;

    fn index(&self, reg: Reg8) -> &Component {
        &self.cells[reg.index()]
    }
}

impl IndexMut<Reg8> for RegisterFile {
    fn index_mut(&mut self, reg: Reg8) -> &mut Component {
        &mut self.cells[reg.index()]
    }
}

/// A 16-bit register made of two cells of the register arena.
///
/// The view stores no value of its own; reads and writes go straight
/// through to the halves, so changes made through either view are
/// visible through the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DoubleComponent {
    low: Reg8,
    high: Reg8,
}

impl DoubleComponent {
    pub const fn new(low: Reg8, high: Reg8) -> Self {
        Self { low, high }
    }

    pub fn get_contents(&self, file: &RegisterFile) -> u16 {
        u16::from_be_bytes([file.byte(self.high), file.byte(self.low)])
    }

    pub fn set_contents_value(&self, file: &mut RegisterFile, value: u16) {
        let [high, low] = value.to_be_bytes();
        file.set_byte(self.high, high);
        file.set_byte(self.low, low);
    }

    /// Adds modulo 65536 and returns the carry out of bit 15.
    pub fn add_to_contents(&self, file: &mut RegisterFile, value: u16) -> bool {
        let (result, carry) = self.get_contents(file).overflowing_add(value);
        self.set_contents_value(file, result);
        carry
    }

    /// Subtracts modulo 65536 and returns the borrow into bit 15.
    pub fn subtract_from_contents(&self, file: &mut RegisterFile, value: u16) -> bool {
        let (result, borrow) = self.get_contents(file).overflowing_sub(value);
        self.set_contents_value(file, result);
        borrow
    }

    pub fn addition_with_flags(
        &self,
        file: &mut RegisterFile,
        value: u16,
        carry_in: bool,
    ) -> PotentialFlags {
        let (result, flags) = component::add_with_flags(
            u32::from(self.get_contents(file)),
            u32::from(value),
            carry_in,
            Width::Word,
        );
        self.set_contents_value(file, result as u16);
        flags
    }

    pub fn subtraction_with_flags(
        &self,
        file: &mut RegisterFile,
        value: u16,
        borrow_in: bool,
    ) -> PotentialFlags {
        let (result, flags) = component::subtract_with_flags(
            u32::from(self.get_contents(file)),
            u32::from(value),
            borrow_in,
            Width::Word,
        );
        self.set_contents_value(file, result as u16);
        flags
    }
}
