use crate::component::{Bitwise, Component, Flag, PotentialFlags};
use crate::cpu::flags::Outcome;
use crate::cpu::{Cpu, Location};
use crate::error::Result;
use crate::registers::{Reg8, Register};

impl Cpu {
    /// `add`/`adc` on A, HL, IX or IY.
    pub(super) fn add(
        &mut self,
        target: &Location,
        operand: &Location,
        carry_in: bool,
    ) -> Result<Outcome> {
        let value = self.read_location(operand)?;
        let flags = match *target {
            Location::Register(Register::Double(reg)) => {
                reg.component()
                    .addition_with_flags(&mut self.registers, value, carry_in)
            }
            _ => self
                .component_mut(target)?
                .addition_with_flags(value as u8, carry_in),
        };
        Ok(flags.into())
    }

    /// `sbc` on A or HL.
    pub(super) fn subtract(
        &mut self,
        target: &Location,
        operand: &Location,
        borrow_in: bool,
    ) -> Result<Outcome> {
        let value = self.read_location(operand)?;
        let flags = match *target {
            Location::Register(Register::Double(reg)) => {
                reg.component()
                    .subtraction_with_flags(&mut self.registers, value, borrow_in)
            }
            _ => self
                .component_mut(target)?
                .subtraction_with_flags(value as u8, borrow_in),
        };
        Ok(flags.into())
    }

    /// `sub x`: the operand is written as the only argument, A is implied.
    pub(super) fn subtract_from_accumulator(&mut self, operand: &Location) -> Result<Outcome> {
        let value = self.read_location(operand)? as u8;
        let accumulator = &mut self.registers[Reg8::A];
        let flags = accumulator.subtraction_with_flags(value, false);
        Ok(Outcome::leaking(flags, accumulator.get_contents()))
    }

    pub(super) fn increment(&mut self, target: &Location) -> Result<Outcome> {
        match *target {
            Location::Register(Register::Double(reg)) => {
                reg.component().add_to_contents(&mut self.registers, 1);
                Ok(Outcome::default())
            }
            _ => Ok(self.component_mut(target)?.addition_with_flags(1, false).into()),
        }
    }

    pub(super) fn decrement(&mut self, target: &Location) -> Result<Outcome> {
        match *target {
            Location::Register(Register::Double(reg)) => {
                reg.component().subtract_from_contents(&mut self.registers, 1);
                Ok(Outcome::default())
            }
            _ => Ok(self
                .component_mut(target)?
                .subtraction_with_flags(1, false)
                .into()),
        }
    }

    pub(super) fn bitwise(&mut self, op: Bitwise, operand: &Location) -> Result<Outcome> {
        let value = self.read_location(operand)? as u8;
        let accumulator = &mut self.registers[Reg8::A];
        let flags = accumulator.bitwise_with_flags(op, value);
        Ok(Outcome::leaking(flags, accumulator.get_contents()))
    }

    /// `cp x`: subtracts into a copy of A. Bits 5 and 3 come from the
    /// operand, not the result.
    pub(super) fn compare(&mut self, operand: &Location) -> Result<Outcome> {
        let value = self.read_location(operand)? as u8;
        let mut scratch = self.registers[Reg8::A].clone();
        let flags = scratch.subtraction_with_flags(value, false);
        Ok(Outcome::leaking(flags, value))
    }

    pub(super) fn complement(&mut self) -> Outcome {
        let accumulator = &mut self.registers[Reg8::A];
        accumulator.set_contents(0xFF - accumulator.get_contents());
        Outcome::leaking(PotentialFlags::default(), accumulator.get_contents())
    }

    pub(super) fn negate(&mut self) -> Outcome {
        let mut result = Component::new("A");
        let flags = result.subtraction_with_flags(self.registers.byte(Reg8::A), false);
        self.registers.set_byte(Reg8::A, result.get_contents());
        Outcome::leaking(flags, result.get_contents())
    }

    /// BCD correction of A after an addition or subtraction.
    pub(super) fn decimal_adjust(&mut self) -> Outcome {
        let a = self.registers.byte(Reg8::A);
        let subtract = self.get_flag(Flag::AddSubtract);
        let half_carry = self.get_flag(Flag::HalfCarry);
        let mut carry = self.get_flag(Flag::Carry);

        let mut correction = 0;
        if half_carry || (a & 0x0F) > 9 {
            correction |= 0x06;
        }
        if carry || a > 0x99 {
            correction |= 0x60;
            carry = true;
        }
        let result = if subtract {
            a.wrapping_sub(correction)
        } else {
            a.wrapping_add(correction)
        };
        let half_carry = if subtract {
            half_carry && (a & 0x0F) < 6
        } else {
            (a & 0x0F) > 9
        };

        let accumulator = &mut self.registers[Reg8::A];
        accumulator.set_contents(result);
        let mut flags = PotentialFlags {
            carry: Some(carry),
            half_carry: Some(half_carry),
            ..PotentialFlags::default()
        };
        accumulator.set_potential_flags(&mut flags);
        Outcome::leaking(flags, result)
    }

    /// `ccf`: half-carry takes the carry from before the toggle.
    pub(super) fn complement_carry(&mut self) -> Outcome {
        let carry = self.get_flag(Flag::Carry);
        let flags = PotentialFlags {
            carry: Some(!carry),
            half_carry: Some(carry),
            ..PotentialFlags::default()
        };
        Outcome::leaking(flags, self.registers.byte(Reg8::A))
    }

    pub(super) fn set_carry(&mut self) -> Outcome {
        Outcome::leaking(PotentialFlags::default(), self.registers.byte(Reg8::A))
    }
}
