use crate::catalog::{Instruction, Shift};
use crate::component::PotentialFlags;
use crate::cpu::flags::Outcome;
use crate::cpu::{Cpu, Location};
use crate::error::Result;
use crate::registers::{Reg16, Reg8};

fn join_nibbles(high: &[u8], low: &[u8]) -> [u8; 8] {
    let mut bits = [0; 8];
    for (slot, &bit) in bits.iter_mut().zip(high.iter().chain(low)) {
        *slot = bit;
    }
    bits
}

impl Cpu {
    pub(super) fn shift(
        &mut self,
        instruction: &Instruction,
        shift: Shift,
        target: &Location,
        carry: bool,
    ) -> Result<Outcome> {
        let cell = self.component_mut(target)?;
        let flags = shift.apply(cell, carry);
        let value = cell.get_contents();
        if let Some(copy) = instruction.copy_to {
            self.registers.set_byte(copy, value);
        }
        Ok(Outcome::leaking(flags, value))
    }

    /// `rlca`, `rla`, `rrca`, `rra`: always on A, and their flag strings
    /// only let carry through.
    pub(super) fn shift_accumulator(&mut self, shift: Shift, carry: bool) -> Outcome {
        let accumulator = &mut self.registers[Reg8::A];
        let flags = shift.apply(accumulator, carry);
        Outcome::leaking(flags, accumulator.get_contents())
    }

    /// `rld` (`left`) and `rrd`: rotate a nibble through A and (HL).
    pub(super) fn rotate_decimal(&mut self, left: bool) -> Result<Outcome> {
        let address = self.registers.word(Reg16::Hl);
        let (a_high, a_low) = self.registers[Reg8::A].split_bit_list_at_bit_pos(4);
        let memory = self.memory.get_contents_mut(usize::from(address))?;
        let (m_high, m_low) = memory.split_bit_list_at_bit_pos(4);

        let (memory_bits, a_bits) = if left {
            (join_nibbles(&m_low, &a_low), join_nibbles(&a_high, &m_high))
        } else {
            (join_nibbles(&a_low, &m_high), join_nibbles(&a_high, &m_low))
        };
        memory.convert_bit_list_to_contents(&memory_bits);

        let accumulator = &mut self.registers[Reg8::A];
        accumulator.convert_bit_list_to_contents(&a_bits);
        let mut flags = PotentialFlags::default();
        accumulator.set_potential_flags(&mut flags);
        Ok(Outcome::leaking(flags, accumulator.get_contents()))
    }
}
