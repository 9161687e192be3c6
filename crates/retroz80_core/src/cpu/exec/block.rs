use crate::catalog::{BlockKind, BlockOp, Step};
use crate::component::PotentialFlags;
use crate::cpu::flags::Outcome;
use crate::cpu::Cpu;
use crate::error::Result;
use crate::registers::{Reg16, Reg8};

/// Bits 5 and 3 of the transfer and compare groups: bit 3 of `n` and bit 1
/// of `n` moved up to bit 5.
fn block_bits(n: u8) -> u8 {
    (n & 0x08) | ((n & 0x02) << 4)
}

impl Cpu {
    /// Runs one block instruction. Repeating forms loop here until their
    /// counter (or, for compares, a match) ends them, so a counter of 0
    /// runs the full 65536 or 256 iterations.
    pub(super) fn block(&mut self, op: BlockOp) -> Result<Outcome> {
        loop {
            let outcome = match op.kind {
                BlockKind::Load => self.block_load(op.step)?,
                BlockKind::Compare => self.block_compare(op.step)?,
                BlockKind::In => self.block_in(op.step)?,
                BlockKind::Out => self.block_out(op.step)?,
            };
            let done = match op.kind {
                BlockKind::Load => self.registers.word(Reg16::Bc) == 0,
                BlockKind::Compare => {
                    outcome.flags.zero == Some(true) || self.registers.word(Reg16::Bc) == 0
                }
                BlockKind::In | BlockKind::Out => self.registers.byte(Reg8::B) == 0,
            };
            if !op.repeat || done {
                return Ok(outcome);
            }
        }
    }

    fn advance_hl(&mut self, step: Step) -> u16 {
        let hl = self.registers.word(Reg16::Hl);
        self.registers.set_word(Reg16::Hl, step.apply(hl));
        hl
    }

    /// Decrements BC and reports whether it is still non-zero.
    fn count_down_bc(&mut self) -> bool {
        let bc = Reg16::Bc.component();
        bc.subtract_from_contents(&mut self.registers, 1);
        bc.get_contents(&self.registers) != 0
    }

    fn block_load(&mut self, step: Step) -> Result<Outcome> {
        let source = self.advance_hl(step);
        let destination = self.registers.word(Reg16::De);
        self.registers.set_word(Reg16::De, step.apply(destination));

        let value = self.get_contents_value(source)?;
        self.set_contents_value(destination, value)?;
        let remaining = self.count_down_bc();

        let flags = PotentialFlags {
            half_carry: Some(false),
            add_subtract: Some(false),
            parity_overflow: Some(remaining),
            ..PotentialFlags::default()
        };
        let n = value.wrapping_add(self.registers.byte(Reg8::A));
        Ok(Outcome::leaking(flags, block_bits(n)))
    }

    fn block_compare(&mut self, step: Step) -> Result<Outcome> {
        let address = self.advance_hl(step);
        let value = self.get_contents_value(address)?;
        let mut scratch = self.registers[Reg8::A].clone();
        let mut flags = scratch.subtraction_with_flags(value, false);
        flags.parity_overflow = Some(self.count_down_bc());

        let n = scratch
            .get_contents()
            .wrapping_sub(u8::from(flags.half_carry == Some(true)));
        Ok(Outcome::leaking(flags, block_bits(n)))
    }

    fn block_in(&mut self, step: Step) -> Result<Outcome> {
        let value = self.get_port_value(self.registers.byte(Reg8::C))?;
        let address = self.advance_hl(step);
        self.set_contents_value(address, value)?;
        Ok(self.count_down_b())
    }

    fn block_out(&mut self, step: Step) -> Result<Outcome> {
        let address = self.advance_hl(step);
        let value = self.get_contents_value(address)?;
        let outcome = self.count_down_b();
        self.set_port_value(self.registers.byte(Reg8::C), value)?;
        Ok(outcome)
    }

    fn count_down_b(&mut self) -> Outcome {
        let b = &mut self.registers[Reg8::B];
        b.subtract_from_contents(1);
        let flags = PotentialFlags {
            zero: Some(b.get_contents() == 0),
            ..PotentialFlags::default()
        };
        Outcome::leaking(flags, b.get_contents())
    }
}
