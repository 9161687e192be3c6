use crate::catalog::Instruction;
use crate::component::{Component, PotentialFlags};
use crate::cpu::flags::Outcome;
use crate::cpu::{Cpu, Location};
use crate::error::Result;
use crate::registers::Reg16;

impl Cpu {
    pub(super) fn load(
        &mut self,
        instruction: &Instruction,
        target: &Location,
        source: &Location,
    ) -> Result<Outcome> {
        let value = self.read_location(source)?;
        self.write_location(target, value)?;

        // Only `ld a,i` and `ld a,r` report anything; both put IFF2 in P/V.
        if instruction.flags.is_inert() {
            return Ok(Outcome::default());
        }
        let mut flags = PotentialFlags {
            half_carry: Some(false),
            add_subtract: Some(false),
            parity_overflow: Some(self.iff2),
            ..PotentialFlags::default()
        };
        Component::with_contents("ld", value as u8).set_potential_flags(&mut flags);
        Ok(flags.into())
    }

    pub(super) fn exchange(&mut self, left: &Location, right: &Location) -> Result<Outcome> {
        let (left_value, right_value) = (self.read_location(left)?, self.read_location(right)?);
        self.write_location(left, right_value)?;
        self.write_location(right, left_value)?;
        Ok(Outcome::default())
    }

    pub(super) fn exchange_all(&mut self) -> Outcome {
        for (main, alternate) in [
            (Reg16::Bc, Reg16::BcAlt),
            (Reg16::De, Reg16::DeAlt),
            (Reg16::Hl, Reg16::HlAlt),
        ] {
            self.registers.swap(main, alternate);
        }
        Outcome::default()
    }
}
