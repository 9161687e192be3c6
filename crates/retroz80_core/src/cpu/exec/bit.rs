use crate::catalog::{Instruction, Operand};
use crate::component::{Component, PotentialFlags};
use crate::cpu::flags::Outcome;
use crate::cpu::{Cpu, Location};
use crate::error::Result;

impl Cpu {
    /// `bit n,x`. Zero and P/V both report a clear bit; sign is only ever
    /// set when bit 7 is tested and found set.
    pub(super) fn test_bit(
        &mut self,
        instruction: &Instruction,
        position: &Location,
        target: &Location,
    ) -> Result<Outcome> {
        let position = self.read_location(position)? as u8;
        let value = self.read_location(target)? as u8;
        let set = Component::with_contents("bit", value).get_bit_position(position);

        let flags = PotentialFlags {
            sign: Some(position == 7 && set),
            zero: Some(!set),
            parity_overflow: Some(!set),
            ..PotentialFlags::default()
        };
        // The indexed forms leak the high byte of the effective address.
        let source = match (instruction.right, *target) {
            (Operand::Indexed { .. }, Location::Memory { address, .. }) => (address >> 8) as u8,
            _ => value,
        };
        Ok(Outcome::leaking(flags, source))
    }

    /// `set n,x` and `res n,x`, plus the DDCB/FDCB forms that also copy
    /// the result into a register.
    pub(super) fn assign_bit(
        &mut self,
        instruction: &Instruction,
        position: &Location,
        target: &Location,
        bit: bool,
    ) -> Result<Outcome> {
        let position = self.read_location(position)? as u8;
        let cell = self.component_mut(target)?;
        cell.set_bit_position(position, bit);
        let value = cell.get_contents();
        if let Some(copy) = instruction.copy_to {
            self.registers.set_byte(copy, value);
        }
        Ok(Outcome::default())
    }
}
