use crate::catalog::Condition;
use crate::cpu::flags::Outcome;
use crate::cpu::{Cpu, Location};
use crate::error::Result;
use crate::registers::Reg8;

impl Cpu {
    fn condition_holds(&self, condition: Option<Condition>) -> bool {
        condition.map_or(true, |condition| condition.holds(self.flags()))
    }

    /// Moves PC by a signed displacement, measured from the address after
    /// the instruction.
    fn jump_by(&mut self, displacement: u8) {
        let pc = self.pc().wrapping_add_signed(i16::from(displacement as i8));
        self.set_pc(pc);
    }

    pub(super) fn jump(&mut self, left: Location, right: Location) -> Result<Outcome> {
        let (condition, target) = Location::branch(left, right);
        let address = self.read_location(&target)?;
        if self.condition_holds(condition) {
            self.set_pc(address);
        }
        Ok(Outcome::default())
    }

    pub(super) fn jump_relative(&mut self, left: Location, right: Location) -> Result<Outcome> {
        let (condition, displacement) = Location::branch(left, right);
        let displacement = self.read_location(&displacement)? as u8;
        if self.condition_holds(condition) {
            self.jump_by(displacement);
        }
        Ok(Outcome::default())
    }

    pub(super) fn decrement_jump_non_zero(&mut self, displacement: &Location) -> Result<Outcome> {
        let displacement = self.read_location(displacement)? as u8;
        let b = &mut self.registers[Reg8::B];
        b.subtract_from_contents(1);
        if b.get_contents() != 0 {
            self.jump_by(displacement);
        }
        Ok(Outcome::default())
    }

    /// Pushes the address after the instruction, then jumps.
    pub(super) fn call(&mut self, left: Location, right: Location) -> Result<Outcome> {
        let (condition, target) = Location::branch(left, right);
        let address = self.read_location(&target)?;
        if self.condition_holds(condition) {
            self.push_word(self.pc())?;
            self.set_pc(address);
        }
        Ok(Outcome::default())
    }

    pub(super) fn ret(&mut self, left: Location) -> Result<Outcome> {
        let (condition, _) = Location::branch(left, Location::None);
        if self.condition_holds(condition) {
            let address = self.pop_word()?;
            self.set_pc(address);
        }
        Ok(Outcome::default())
    }

    /// `reti` and `retn`: pop PC and copy IFF2 back into IFF1.
    pub(super) fn return_restoring_iff1(&mut self) -> Result<Outcome> {
        let address = self.pop_word()?;
        self.set_pc(address);
        self.iff1 = self.iff2;
        Ok(Outcome::default())
    }

    pub(super) fn restart(&mut self, vector: &Location) -> Result<Outcome> {
        let address = self.read_location(vector)?;
        self.push_word(self.pc())?;
        self.set_pc(address);
        Ok(Outcome::default())
    }

    pub(super) fn halt(&mut self) -> Outcome {
        self.halted = true;
        Outcome::default()
    }

    pub(super) fn set_interrupts(&mut self, enabled: bool) -> Outcome {
        self.iff1 = enabled;
        self.iff2 = enabled;
        Outcome::default()
    }

    pub(super) fn set_interrupt_mode(&mut self, mode: &Location) -> Result<Outcome> {
        self.interrupt_mode = self.read_location(mode)? as u8;
        Ok(Outcome::default())
    }
}
