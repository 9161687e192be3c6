use crate::cpu::flags::Outcome;
use crate::cpu::{Cpu, Location};
use crate::error::Result;
use crate::registers::Reg16;

impl Cpu {
    /// Pushes high byte first so the word sits little-endian at the new SP.
    pub(crate) fn push_word(&mut self, value: u16) -> Result<()> {
        let [low, high] = value.to_le_bytes();
        let sp = Reg16::Sp.component();
        sp.subtract_from_contents(&mut self.registers, 1);
        self.set_contents_value(self.sp(), high)?;
        sp.subtract_from_contents(&mut self.registers, 1);
        self.set_contents_value(self.sp(), low)
    }

    pub(crate) fn pop_word(&mut self) -> Result<u16> {
        let sp = Reg16::Sp.component();
        let low = self.get_contents_value(self.sp())?;
        sp.add_to_contents(&mut self.registers, 1);
        let high = self.get_contents_value(self.sp())?;
        sp.add_to_contents(&mut self.registers, 1);
        Ok(u16::from_le_bytes([low, high]))
    }

    pub(super) fn push(&mut self, source: &Location) -> Result<Outcome> {
        let value = self.read_location(source)?;
        self.push_word(value)?;
        Ok(Outcome::default())
    }

    pub(super) fn pop(&mut self, target: &Location) -> Result<Outcome> {
        let value = self.pop_word()?;
        self.write_location(target, value)?;
        Ok(Outcome::default())
    }
}
