use thiserror::Error;

use crate::component::Flag;

/// Errors raised by the Z80 core and its instruction catalog.
#[derive(Debug, Error)]
pub enum Error {
    #[error("address {address:#06x} is outside memory of {size} cells")]
    AddressOutOfRange { address: usize, size: usize },

    /// An operand fetch was attempted after the last memory cell had
    /// already been consumed.
    #[error("ran off the end of memory fetching operands at {address:#06x}")]
    EndOfMemory { address: u16 },

    #[error("unrecognised opcode {key} at {address:#06x}")]
    UnrecognisedOpcode { key: String, address: u16 },

    #[error("invalid operand {template:?}")]
    InvalidOperand { template: String },

    /// The flag string asks for a flag the executor never computed.
    #[error("'{text}' did not compute the {flag:?} flag")]
    MissingFlag { text: String, flag: Flag },

    #[error("no instruction with text {text:?}")]
    UnknownInstruction { text: String },

    #[error("no register named {name:?}")]
    UnknownRegister { name: String },

    #[error("malformed instruction catalog: {reason}")]
    Catalog { reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
