mod alu;
mod bit;
mod block;
mod control;
mod io;
mod load;
mod rotate;
mod stack;

use crate::catalog::{Instruction, InstructionClass};
use crate::component::{Bitwise, Flag, Width};
use crate::error::Result;
use crate::registers::Reg8;

use super::flags::Outcome;
use super::{Cpu, Location};

impl Cpu {
    /// Resolves the operands of one instruction, runs its class executor and
    /// then applies the flag string and the undocumented bits.
    ///
    /// Operands are resolved left before right, so instructions whose two
    /// operands both read from the instruction stream consume their bytes
    /// in encoding order.
    pub(super) fn execute(&mut self, instruction: &Instruction) -> Result<()> {
        use InstructionClass as C;

        let left = self.substitute_arg(&instruction.left)?;
        let right = match instruction.class {
            C::Exchange | C::Bit | C::Set | C::Reset => self.substitute_arg(&instruction.right)?,
            _ => self.substitute_right_arg(&instruction.right)?,
        };
        if instruction.opcode.prefix.is_indexed_bit() {
            // The final opcode byte sits after the displacement.
            self.fetch_byte()?;
        }

        let carry = self.get_flag(Flag::Carry);
        let outcome = match instruction.class {
            C::Nop => Outcome::default(),
            C::Load => self.load(instruction, &left, &right)?,
            C::Exchange => self.exchange(&left, &right)?,
            C::ExchangeAll => self.exchange_all(),
            C::Push => self.push(&left)?,
            C::Pop => self.pop(&left)?,
            C::Add => self.add(&left, &right, false)?,
            C::Adc => self.add(&left, &right, carry)?,
            C::Sub => self.subtract_from_accumulator(&left)?,
            C::Sbc => self.subtract(&left, &right, carry)?,
            C::Inc => self.increment(&left)?,
            C::Dec => self.decrement(&left)?,
            C::And => self.bitwise(Bitwise::And, &left)?,
            C::Or => self.bitwise(Bitwise::Or, &left)?,
            C::Xor => self.bitwise(Bitwise::Xor, &left)?,
            C::Compare => self.compare(&left)?,
            C::Complement => self.complement(),
            C::Negate => self.negate(),
            C::DecimalAdjust => self.decimal_adjust(),
            C::ComplementCarry => self.complement_carry(),
            C::SetCarry => self.set_carry(),
            C::Jump => self.jump(left, right)?,
            C::JumpRelative => self.jump_relative(left, right)?,
            C::DecrementJumpNonZero => self.decrement_jump_non_zero(&left)?,
            C::Call => self.call(left, right)?,
            C::Return => self.ret(left)?,
            C::ReturnFromInterrupt | C::ReturnFromNmi => self.return_restoring_iff1()?,
            C::Restart => self.restart(&left)?,
            C::Halt => self.halt(),
            C::DisableInterrupts => self.set_interrupts(false),
            C::EnableInterrupts => self.set_interrupts(true),
            C::InterruptMode => self.set_interrupt_mode(&left)?,
            C::In => self.input(&left, &right)?,
            C::Out => self.output(&left, &right)?,
            C::Bit => self.test_bit(instruction, &left, &right)?,
            C::Set => self.assign_bit(instruction, &left, &right, true)?,
            C::Reset => self.assign_bit(instruction, &left, &right, false)?,
            C::Shift(shift) => self.shift(instruction, shift, &left, carry)?,
            C::ShiftAccumulator(shift) => self.shift_accumulator(shift, carry),
            C::RotateDecimalLeft => self.rotate_decimal(true)?,
            C::RotateDecimalRight => self.rotate_decimal(false)?,
            C::Block(op) => self.block(op)?,
        };

        if !instruction.flags.is_inert() {
            self.set_flags_if_required(instruction, &outcome.flags)?;
            let source = match outcome.undocumented {
                Some(source) => source,
                None => self.undocumented_source(&left)?,
            };
            self.propagate_undocumented_bits(source);
        }
        Ok(())
    }

    /// The byte touched through the left operand; the high byte for 16-bit
    /// targets.
    fn undocumented_source(&self, left: &Location) -> Result<u8> {
        let width = match *left {
            Location::Register(register) => register.width(),
            Location::Memory { width, .. } => width,
            Location::Port(_) => Width::Byte,
            _ => return Ok(self.registers.byte(Reg8::A)),
        };
        let [low, high] = self.read_location(left)?.to_le_bytes();
        Ok(match width {
            Width::Byte => low,
            Width::Word => high,
        })
    }
}
