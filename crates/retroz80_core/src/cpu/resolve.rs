use crate::catalog::{Condition, Operand, PortSource};
use crate::component::{Component, Width};
use crate::error::{Error, Result};
use crate::registers::{Reg8, Register};

use super::Cpu;

/// A resolved operand: where to read from or write to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    None,
    Register(Register),
    /// One cell, or two consecutive cells read low byte first.
    Memory { address: u16, width: Width },
    Port(u8),
    Value(u16),
    Condition(Condition),
}

impl Location {
    fn invalid(&self) -> Error {
        Error::InvalidOperand {
            template: format!("{self:?}"),
        }
    }

    /// The condition and the branch target of a `jp`/`jr`/`call`/`ret`
    /// operand pair.
    pub(crate) fn branch(left: Location, right: Location) -> (Option<Condition>, Location) {
        match left {
            Location::Condition(condition) => (Some(condition), right),
            _ => (None, left),
        }
    }
}

impl Cpu {
    /// Resolves an operand to a settable location, consuming any operand
    /// bytes it needs from the instruction stream.
    pub(crate) fn substitute_arg(&mut self, operand: &Operand) -> Result<Location> {
        Ok(match *operand {
            Operand::None => Location::None,
            Operand::Register(register) => Location::Register(register),
            Operand::Literal(value) => Location::Value(value),
            Operand::Condition(condition) => Location::Condition(condition),
            Operand::ImmediateByte => Location::Value(u16::from(self.fetch_byte()?)),
            Operand::ImmediateWord => Location::Value(self.fetch_word()?),
            Operand::Indirect { register, width } => Location::Memory {
                address: self.registers.word(register),
                width,
            },
            Operand::Indexed { index } => {
                let displacement = self.fetch_byte()? as i8;
                Location::Memory {
                    address: self
                        .registers
                        .word(index)
                        .wrapping_add_signed(i16::from(displacement)),
                    width: Width::Byte,
                }
            }
            Operand::Absolute { width } => Location::Memory {
                address: self.fetch_word()?,
                width,
            },
            Operand::Port(PortSource::C) => Location::Port(self.registers.byte(Reg8::C)),
            Operand::Port(PortSource::Immediate) => Location::Port(self.fetch_byte()?),
        })
    }

    /// Like [`Cpu::substitute_arg`] but collapses registers, memory and
    /// ports to the value they hold.
    pub(crate) fn substitute_right_arg(&mut self, operand: &Operand) -> Result<Location> {
        let location = self.substitute_arg(operand)?;
        Ok(match location {
            Location::Register(_) | Location::Memory { .. } | Location::Port(_) => {
                Location::Value(self.read_location(&location)?)
            }
            other => other,
        })
    }

    pub(crate) fn read_location(&self, location: &Location) -> Result<u16> {
        match *location {
            Location::Register(register) => Ok(self.registers.value(register)),
            Location::Memory { address, width: Width::Byte } => {
                self.get_contents_value(address).map(u16::from)
            }
            Location::Memory { address, width: Width::Word } => {
                let low = self.get_contents_value(address)?;
                let high = self.get_contents_value(address.wrapping_add(1))?;
                Ok(u16::from_le_bytes([low, high]))
            }
            Location::Port(port) => self.get_port_value(port).map(u16::from),
            Location::Value(value) => Ok(value),
            Location::None | Location::Condition(_) => Err(location.invalid()),
        }
    }

    pub(crate) fn write_location(&mut self, location: &Location, value: u16) -> Result<()> {
        match *location {
            Location::Register(register) => {
                self.registers.set_value(register, value);
                Ok(())
            }
            Location::Memory { address, width: Width::Byte } => {
                self.set_contents_value(address, value as u8)
            }
            Location::Memory { address, width: Width::Word } => {
                let [low, high] = value.to_le_bytes();
                self.set_contents_value(address, low)?;
                self.set_contents_value(address.wrapping_add(1), high)
            }
            Location::Port(port) => self.set_port_value(port, value as u8),
            Location::Value(_) | Location::None | Location::Condition(_) => {
                Err(location.invalid())
            }
        }
    }

    /// The 8-bit cell behind a location.
    pub(crate) fn component_mut(&mut self, location: &Location) -> Result<&mut Component> {
        match *location {
            Location::Register(Register::Single(reg)) => Ok(&mut self.registers[reg]),
            Location::Memory { address, width: Width::Byte } => {
                self.memory.get_contents_mut(usize::from(address))
            }
            Location::Port(port) => self.ports.get_contents_mut(usize::from(port)),
            _ => Err(location.invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::Reg16;

    #[test]
    fn indexed_displacement_is_signed() {
        let mut cpu = Cpu::new().unwrap();
        cpu.registers.set_word(Reg16::Ix, 0x1000);
        cpu.set_contents_value(0, 0xFE).unwrap();
        let location = cpu.substitute_arg(&Operand::Indexed { index: Reg16::Ix }).unwrap();
        assert_eq!(location, Location::Memory { address: 0x0FFE, width: Width::Byte });
        assert_eq!(cpu.pc(), 1);
    }

    #[test]
    fn absolute_word_reads_low_then_high() {
        let mut cpu = Cpu::new().unwrap();
        cpu.memory.load(&[0x00, 0x20]).unwrap();
        cpu.set_contents_value(0x2000, 0x34).unwrap();
        cpu.set_contents_value(0x2001, 0x12).unwrap();
        let operand = Operand::Absolute { width: Width::Word };
        let value = cpu.substitute_right_arg(&operand).unwrap();
        assert_eq!(value, Location::Value(0x1234));
        assert_eq!(cpu.pc(), 2);
    }

    #[test]
    fn values_are_not_settable() {
        let mut cpu = Cpu::new().unwrap();
        assert!(matches!(
            cpu.write_location(&Location::Value(3), 1),
            Err(Error::InvalidOperand { .. })
        ));
    }

    #[test]
    fn port_c_reads_the_c_register() {
        let mut cpu = Cpu::new().unwrap();
        cpu.registers.set_byte(Reg8::C, 0x42);
        cpu.set_port_value(0x42, 0x99).unwrap();
        let value = cpu.substitute_right_arg(&Operand::Port(PortSource::C)).unwrap();
        assert_eq!(value, Location::Value(0x99));
        assert_eq!(cpu.pc(), 0);
    }
}
