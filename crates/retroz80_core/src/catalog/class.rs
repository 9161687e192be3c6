use crate::component::{Component, Fill, PotentialFlags};

/// Rotate and shift operations of the CB page and the accumulator group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shift {
    RotateLeftCircular,
    RotateLeft,
    RotateRightCircular,
    RotateRight,
    ShiftLeftArithmetic,
    ShiftLeftLogical,
    ShiftRightArithmetic,
    ShiftRightLogical,
}

impl Shift {
    /// Applies the operation to `cell`; `carry` is the carry flag before
    /// the operation.
    pub fn apply(self, cell: &mut Component, carry: bool) -> PotentialFlags {
        match self {
            Shift::RotateLeftCircular => cell.shift_left(Fill::Evicted),
            Shift::RotateLeft => cell.shift_left(Fill::Carry(carry)),
            Shift::RotateRightCircular => cell.shift_right(Fill::Evicted),
            Shift::RotateRight => cell.shift_right(Fill::Carry(carry)),
            Shift::ShiftLeftArithmetic => cell.shift_left(Fill::Zero),
            Shift::ShiftLeftLogical => cell.shift_left(Fill::One),
            Shift::ShiftRightArithmetic => cell.shift_right(Fill::Sign),
            Shift::ShiftRightLogical => cell.shift_right(Fill::Zero),
        }
    }
}

/// What a block instruction moves or compares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Load,
    Compare,
    In,
    Out,
}

/// Direction HL (and DE) move in after each block iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    Increment,
    Decrement,
}

impl Step {
    #[inline]
    pub fn apply(self, address: u16) -> u16 {
        match self {
            Step::Increment => address.wrapping_add(1),
            Step::Decrement => address.wrapping_sub(1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockOp {
    pub kind: BlockKind,
    pub step: Step,
    pub repeat: bool,
}

impl BlockOp {
    pub const fn new(kind: BlockKind, step: Step, repeat: bool) -> Self {
        Self { kind, step, repeat }
    }
}

/// Execution class of an instruction, decoded from its mnemonic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstructionClass {
    Nop,
    Load,
    Exchange,
    ExchangeAll,
    Push,
    Pop,
    Add,
    Adc,
    Sub,
    Sbc,
    Inc,
    Dec,
    And,
    Or,
    Xor,
    Compare,
    Complement,
    Negate,
    DecimalAdjust,
    ComplementCarry,
    SetCarry,
    Jump,
    JumpRelative,
    DecrementJumpNonZero,
    Call,
    Return,
    ReturnFromInterrupt,
    ReturnFromNmi,
    Restart,
    Halt,
    DisableInterrupts,
    EnableInterrupts,
    InterruptMode,
    In,
    Out,
    Bit,
    Set,
    Reset,
    /// CB-page rotates and shifts on a register or memory byte.
    Shift(Shift),
    /// `rlca`, `rla`, `rrca` and `rra`, which only ever touch A.
    ShiftAccumulator(Shift),
    RotateDecimalLeft,
    RotateDecimalRight,
    Block(BlockOp),
}

const MNEMONICS: &[(&str, InstructionClass)] = {
    use BlockKind as K;
    use InstructionClass as C;
    use Shift as S;
    &[
        ("nop", C::Nop),
        ("ld", C::Load),
        ("ex", C::Exchange),
        ("exx", C::ExchangeAll),
        ("push", C::Push),
        ("pop", C::Pop),
        ("add", C::Add),
        ("adc", C::Adc),
        ("sub", C::Sub),
        ("sbc", C::Sbc),
        ("inc", C::Inc),
        ("dec", C::Dec),
        ("and", C::And),
        ("or", C::Or),
        ("xor", C::Xor),
        ("cp", C::Compare),
        ("cpl", C::Complement),
        ("neg", C::Negate),
        ("daa", C::DecimalAdjust),
        ("ccf", C::ComplementCarry),
        ("scf", C::SetCarry),
        ("jp", C::Jump),
        ("jr", C::JumpRelative),
        ("djnz", C::DecrementJumpNonZero),
        ("call", C::Call),
        ("ret", C::Return),
        ("reti", C::ReturnFromInterrupt),
        ("retn", C::ReturnFromNmi),
        ("rst", C::Restart),
        ("halt", C::Halt),
        ("di", C::DisableInterrupts),
        ("ei", C::EnableInterrupts),
        ("im", C::InterruptMode),
        ("in", C::In),
        ("out", C::Out),
        ("bit", C::Bit),
        ("set", C::Set),
        ("res", C::Reset),
        ("rlc", C::Shift(S::RotateLeftCircular)),
        ("rl", C::Shift(S::RotateLeft)),
        ("rrc", C::Shift(S::RotateRightCircular)),
        ("rr", C::Shift(S::RotateRight)),
        ("sla", C::Shift(S::ShiftLeftArithmetic)),
        ("sll", C::Shift(S::ShiftLeftLogical)),
        ("sra", C::Shift(S::ShiftRightArithmetic)),
        ("srl", C::Shift(S::ShiftRightLogical)),
        ("rlca", C::ShiftAccumulator(S::RotateLeftCircular)),
        ("rla", C::ShiftAccumulator(S::RotateLeft)),
        ("rrca", C::ShiftAccumulator(S::RotateRightCircular)),
        ("rra", C::ShiftAccumulator(S::RotateRight)),
        ("rld", C::RotateDecimalLeft),
        ("rrd", C::RotateDecimalRight),
        ("ldi", C::Block(BlockOp::new(K::Load, Step::Increment, false))),
        ("ldir", C::Block(BlockOp::new(K::Load, Step::Increment, true))),
        ("ldd", C::Block(BlockOp::new(K::Load, Step::Decrement, false))),
        ("lddr", C::Block(BlockOp::new(K::Load, Step::Decrement, true))),
        ("cpi", C::Block(BlockOp::new(K::Compare, Step::Increment, false))),
        ("cpir", C::Block(BlockOp::new(K::Compare, Step::Increment, true))),
        ("cpd", C::Block(BlockOp::new(K::Compare, Step::Decrement, false))),
        ("cpdr", C::Block(BlockOp::new(K::Compare, Step::Decrement, true))),
        ("ini", C::Block(BlockOp::new(K::In, Step::Increment, false))),
        ("inir", C::Block(BlockOp::new(K::In, Step::Increment, true))),
        ("ind", C::Block(BlockOp::new(K::In, Step::Decrement, false))),
        ("indr", C::Block(BlockOp::new(K::In, Step::Decrement, true))),
        ("outi", C::Block(BlockOp::new(K::Out, Step::Increment, false))),
        ("otir", C::Block(BlockOp::new(K::Out, Step::Increment, true))),
        ("outd", C::Block(BlockOp::new(K::Out, Step::Decrement, false))),
        ("otdr", C::Block(BlockOp::new(K::Out, Step::Decrement, true))),
    ]
};

impl InstructionClass {
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        MNEMONICS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(mnemonic))
            .map(|&(_, class)| class)
    }

    pub fn mnemonic(self) -> &'static str {
        MNEMONICS
            .iter()
            .find(|&&(_, class)| class == self)
            .map_or("?", |&(name, _)| name)
    }

    /// Classes whose first operand may be a condition code.
    pub fn takes_condition(self) -> bool {
        matches!(
            self,
            InstructionClass::Jump
                | InstructionClass::JumpRelative
                | InstructionClass::Call
                | InstructionClass::Return
        )
    }
}
