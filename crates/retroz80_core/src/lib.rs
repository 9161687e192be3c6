pub mod catalog;
pub mod component;
pub mod cpu;
pub mod error;
pub mod memory;
pub mod registers;

pub use catalog::{Instruction, InstructionCatalog, Opcode, Prefix};
pub use component::{Component, Flag, Flags};
pub use cpu::{Cpu, CpuConfig, RunSummary, StopReason};
pub use error::{Error, Result};
pub use memory::Memory;
pub use registers::{Reg16, Reg8, Register, RegisterFile};

/// Size of the Z80 address space in bytes.
pub const MEMORY_SIZE: usize = 0x1_0000;
/// Number of addressable I/O ports.
pub const PORT_COUNT: usize = 0x100;
