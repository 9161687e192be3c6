mod exec;
mod flags;
mod resolve;

#[cfg(test)]
mod fixtures;

use typed_builder::TypedBuilder;

use crate::catalog::{Instruction, InstructionCatalog, Opcode, Prefix};
use crate::component::{Flag, Flags};
use crate::error::{Error, Result};
use crate::memory::Memory;
use crate::registers::{Reg16, Reg8, Register, RegisterFile};

pub use resolve::Location;

/// Sizes of the address spaces a [`Cpu`] is built with.
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct CpuConfig {
    #[builder(default = crate::MEMORY_SIZE)]
    pub memory_size: usize,
    #[builder(default = crate::PORT_COUNT)]
    pub port_count: usize,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Why [`Cpu::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The last instruction ended on the final memory cell.
    EndOfMemory,
    /// PC reached the caller's stop address.
    StopAddress,
    /// A `halt` instruction executed.
    Halted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub stop: StopReason,
    pub instructions: u64,
}

/// Z80 CPU core.
///
/// Owns the register file, main memory, the I/O port space and a shared
/// reference to the instruction catalog that drives decoding.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub registers: RegisterFile,
    pub memory: Memory,
    pub ports: Memory,
    pub iff1: bool,
    pub iff2: bool,
    pub interrupt_mode: u8,
    pub halted: bool,
    catalog: &'static InstructionCatalog,
    /// Set once a fetch has consumed the last memory cell; any further
    /// operand fetch within the same instruction is an error.
    end_of_memory: bool,
}

impl Cpu {
    pub fn new() -> Result<Self> {
        Self::with_config(CpuConfig::default())
    }

    pub fn with_config(config: CpuConfig) -> Result<Self> {
        Ok(Self {
            registers: RegisterFile::new(),
            memory: Memory::new(config.memory_size),
            ports: Memory::new(config.port_count),
            iff1: false,
            iff2: false,
            interrupt_mode: 0,
            halted: false,
            catalog: InstructionCatalog::builtin()?,
            end_of_memory: false,
        })
    }

    pub fn catalog(&self) -> &'static InstructionCatalog {
        self.catalog
    }

    pub fn register(name: &str) -> Result<Register> {
        Register::from_name(name).ok_or_else(|| Error::UnknownRegister {
            name: name.to_string(),
        })
    }

    /// Reads a register by name (`"A"`, `"hl"`, `"AF'"`...).
    pub fn get_register_value(&self, name: &str) -> Result<u16> {
        Ok(self.registers.value(Self::register(name)?))
    }

    pub fn set_register_value(&mut self, name: &str, value: u16) -> Result<()> {
        self.registers.set_value(Self::register(name)?, value);
        Ok(())
    }

    #[inline]
    pub fn pc(&self) -> u16 {
        self.registers.word(Reg16::Pc)
    }

    #[inline]
    pub fn set_pc(&mut self, value: u16) {
        self.registers.set_word(Reg16::Pc, value);
    }

    #[inline]
    pub fn sp(&self) -> u16 {
        self.registers.word(Reg16::Sp)
    }

    #[inline]
    pub fn set_sp(&mut self, value: u16) {
        self.registers.set_word(Reg16::Sp, value);
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        Flags::from_bits_retain(self.registers.byte(Reg8::F))
    }

    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        self.registers[Reg8::F].get_flag(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        self.registers[Reg8::F].assign_flag(flag, value);
    }

    pub fn get_contents_value(&self, address: u16) -> Result<u8> {
        self.memory.get_contents_value(usize::from(address))
    }

    pub fn set_contents_value(&mut self, address: u16, value: u8) -> Result<()> {
        self.memory.set_contents_value(usize::from(address), value)
    }

    pub fn get_port_value(&self, port: u8) -> Result<u8> {
        self.ports.get_contents_value(usize::from(port))
    }

    pub fn set_port_value(&mut self, port: u8, value: u8) -> Result<()> {
        self.ports.set_contents_value(usize::from(port), value)
    }

    /// Reads the byte at PC and advances PC. The flag is true when the byte
    /// was the last memory cell, in which case PC stays where it is.
    pub fn read_memory_and_increment_pc(&mut self) -> Result<(u8, bool)> {
        let pc = self.pc();
        let value = self.memory.get_contents_value(usize::from(pc))?;
        if usize::from(pc) + 1 < self.memory.len() {
            self.set_pc(pc.wrapping_add(1));
            Ok((value, false))
        } else {
            Ok((value, true))
        }
    }

    /// Fetches one instruction-stream byte.
    fn fetch_byte(&mut self) -> Result<u8> {
        if self.end_of_memory {
            return Err(Error::EndOfMemory { address: self.pc() });
        }
        let (value, end) = self.read_memory_and_increment_pc()?;
        self.end_of_memory = end;
        Ok(value)
    }

    /// Fetches a little-endian word.
    fn fetch_word(&mut self) -> Result<u16> {
        let low = self.fetch_byte()?;
        let high = self.fetch_byte()?;
        Ok(u16::from_le_bytes([low, high]))
    }

    /// Opcode and prefix fetches also bump the refresh counter.
    fn fetch_opcode_byte(&mut self) -> Result<u8> {
        let value = self.fetch_byte()?;
        let r = self.registers.byte(Reg8::R);
        self.registers
            .set_byte(Reg8::R, (r & 0x80) | (r.wrapping_add(1) & 0x7F));
        Ok(value)
    }

    /// Reads the opcode bytes at PC, including any prefixes, and looks the
    /// instruction up.
    fn decode(&mut self) -> Result<&'static Instruction> {
        let address = self.pc();
        let catalog = self.catalog;
        let opcode = match self.fetch_opcode_byte()? {
            0xCB => Opcode::new(Prefix::Cb, self.fetch_opcode_byte()?),
            0xED => Opcode::new(Prefix::Ed, self.fetch_opcode_byte()?),
            prefix_byte @ (0xDD | 0xFD) => {
                let prefix = if prefix_byte == 0xDD {
                    Prefix::Dd
                } else {
                    Prefix::Fd
                };
                match self.fetch_opcode_byte()? {
                    0xCB => {
                        // The displacement comes before the final opcode
                        // byte; operand resolution consumes it first.
                        let code_address = self.pc().wrapping_add(1);
                        let code = self.memory.get_contents_value(usize::from(code_address))?;
                        Opcode::new(prefix.with_bit_page(), code)
                    }
                    code => Opcode::new(prefix, code),
                }
            }
            code => Opcode::new(Prefix::None, code),
        };
        catalog.by_opcode(opcode).ok_or_else(|| {
            log::error!("unrecognised opcode {} at {:#06x}", opcode, address);
            Error::UnrecognisedOpcode {
                key: opcode.key(),
                address,
            }
        })
    }

    /// Executes the instruction at PC. Returns true when the instruction
    /// ended on the last memory cell.
    pub fn step(&mut self) -> Result<bool> {
        self.end_of_memory = false;
        let address = self.pc();
        let instruction = self.decode()?;
        log::trace!(
            "{:04X}  {:<7} {}",
            address,
            instruction.opcode.key(),
            instruction.text
        );
        self.execute(instruction)?;
        Ok(self.end_of_memory)
    }

    /// Runs until the end of memory, a `halt`, or until PC reaches
    /// `stop_address`. A halt left over from an earlier run is cleared.
    pub fn run(&mut self, stop_address: Option<u16>) -> Result<RunSummary> {
        log::debug!("run from {:#06x}, stop at {:?}", self.pc(), stop_address);
        self.halted = false;
        let mut instructions = 0;
        let stop = loop {
            if stop_address.is_some_and(|stop| self.pc() >= stop) {
                break StopReason::StopAddress;
            }
            let end = self.step()?;
            instructions += 1;
            if self.halted {
                log::warn!("halted at {:#06x}", self.pc());
                break StopReason::Halted;
            }
            if end {
                break StopReason::EndOfMemory;
            }
        };
        log::debug!(
            "stopped ({:?}) after {} instructions at {:#06x}",
            stop,
            instructions,
            self.pc()
        );
        Ok(RunSummary { stop, instructions })
    }

    /// Executes an already looked-up instruction. Its operand bytes are
    /// read from PC onwards; the opcode itself is not fetched.
    pub fn execute_instruction(&mut self, instruction: &Instruction) -> Result<()> {
        self.end_of_memory = false;
        self.execute(instruction)
    }

    /// Looks an instruction up by its canonical text and executes it.
    pub fn execute_text(&mut self, text: &str) -> Result<()> {
        let catalog = self.catalog;
        let instruction = catalog
            .by_text(text)
            .ok_or_else(|| Error::UnknownInstruction {
                text: text.to_string(),
            })?;
        self.execute_instruction(instruction)
    }

    /// Register line in conformance-fixture order:
    /// `AF BC DE HL AF' BC' DE' HL' IX IY SP PC`.
    pub fn state_line(&self) -> String {
        const ORDER: [Reg16; 12] = [
            Reg16::Af,
            Reg16::Bc,
            Reg16::De,
            Reg16::Hl,
            Reg16::AfAlt,
            Reg16::BcAlt,
            Reg16::DeAlt,
            Reg16::HlAlt,
            Reg16::Ix,
            Reg16::Iy,
            Reg16::Sp,
            Reg16::Pc,
        ];
        ORDER
            .iter()
            .map(|&reg| format!("{:04x}", self.registers.word(reg)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
