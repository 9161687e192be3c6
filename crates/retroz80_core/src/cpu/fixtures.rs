//! Conformance fixtures in the usual Z80 test-suite text layout:
//!
//! ```text
//! name
//! AF BC DE HL AF' BC' DE' HL' IX IY SP PC [MEMPTR]
//! I R IFF1 IFF2 IM halted tstates
//! addr byte byte ... -1
//! -1
//! ```
//!
//! Expected states use the same layout. Memory runs list only the cells
//! the fixture cares about.

use super::*;

const REGISTER_ORDER: [Reg16; 12] = [
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

#[derive(Debug, Default)]
struct MachineState {
    registers: [u16; 12],
    i: u8,
    r: u8,
    iff1: bool,
    iff2: bool,
    interrupt_mode: u8,
    halted: bool,
    memory: Vec<(u16, Vec<u8>)>,
}

#[derive(Debug)]
struct Fixture {
    name: String,
    before: MachineState,
    after: MachineState,
}

fn hex(token: &str) -> u16 {
    u16::from_str_radix(token, 16).unwrap_or_else(|_| panic!("bad hex token {:?}", token))
}

fn parse_state<'a>(lines: &mut impl Iterator<Item = &'a str>) -> MachineState {
    let mut state = MachineState::default();

    let registers: Vec<u16> = lines
        .next()
        .expect("register line")
        .split_whitespace()
        .map(hex)
        .collect();
    // A trailing MEMPTR column is accepted and ignored.
    assert!(registers.len() >= 12, "short register line");
    state.registers.copy_from_slice(&registers[..12]);

    let states: Vec<&str> = lines.next().expect("states line").split_whitespace().collect();
    assert!(states.len() >= 6, "short states line");
    state.i = hex(states[0]) as u8;
    state.r = hex(states[1]) as u8;
    state.iff1 = states[2] != "0";
    state.iff2 = states[3] != "0";
    state.interrupt_mode = states[4].parse().expect("interrupt mode");
    state.halted = states[5] != "0";

    for line in lines.by_ref() {
        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            continue;
        };
        if first == "-1" {
            break;
        }
        let bytes = tokens
            .take_while(|&token| token != "-1")
            .map(|token| hex(token) as u8)
            .collect();
        state.memory.push((hex(first), bytes));
    }
    state
}

fn parse_fixture(text: &str) -> Fixture {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let name = lines.next().expect("fixture name").to_string();
    let before = parse_state(&mut lines);
    let after = parse_state(&mut lines);
    Fixture {
        name,
        before,
        after,
    }
}

fn apply_state(cpu: &mut Cpu, state: &MachineState) {
    for (&reg, &value) in REGISTER_ORDER.iter().zip(state.registers.iter()) {
        cpu.registers.set_word(reg, value);
    }
    cpu.registers.set_byte(Reg8::I, state.i);
    cpu.registers.set_byte(Reg8::R, state.r);
    cpu.iff1 = state.iff1;
    cpu.iff2 = state.iff2;
    cpu.interrupt_mode = state.interrupt_mode;
    cpu.halted = state.halted;
    for (address, bytes) in &state.memory {
        cpu.memory.load_at(usize::from(*address), bytes).unwrap();
    }
}

fn assert_state(cpu: &Cpu, name: &str, expected: &MachineState) {
    for (&reg, &value) in REGISTER_ORDER.iter().zip(expected.registers.iter()) {
        assert_eq!(
            cpu.registers.word(reg),
            value,
            "{}: {} is {:04x}, expected {:04x}",
            name,
            reg.name(),
            cpu.registers.word(reg),
            value
        );
    }
    assert_eq!(cpu.registers.byte(Reg8::I), expected.i, "{}: I", name);
    assert_eq!(cpu.registers.byte(Reg8::R), expected.r, "{}: R", name);
    assert_eq!(cpu.iff1, expected.iff1, "{}: IFF1", name);
    assert_eq!(cpu.iff2, expected.iff2, "{}: IFF2", name);
    assert_eq!(cpu.interrupt_mode, expected.interrupt_mode, "{}: IM", name);
    assert_eq!(cpu.halted, expected.halted, "{}: halted", name);
    for (address, bytes) in &expected.memory {
        for (offset, &byte) in bytes.iter().enumerate() {
            let address = address.wrapping_add(offset as u16);
            assert_eq!(
                cpu.get_contents_value(address).unwrap(),
                byte,
                "{}: memory at {:04x}",
                name,
                address
            );
        }
    }
}

fn run_fixture(text: &str) {
    let fixture = parse_fixture(text);
    let mut cpu = Cpu::new().unwrap();
    apply_state(&mut cpu, &fixture.before);
    cpu.step()
        .unwrap_or_else(|err| panic!("{}: {}", fixture.name, err));
    assert_state(&cpu, &fixture.name, &fixture.after);
}

const FIXTURES: &[&str] = &[
    "
    00 nop
    0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000
    00 00 0 0 0 0 4
    0000 00 -1
    -1
    0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0001 0000
    00 01 0 0 0 0 4
    -1
    ",
    "
    01 ld bc,nn
    0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000
    00 00 0 0 0 0 10
    0000 01 12 34 -1
    -1
    0000 3412 0000 0000 0000 0000 0000 0000 0000 0000 0000 0003
    00 01 0 0 0 0 10
    -1
    ",
    "
    3c inc a
    7f00 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000
    00 00 0 0 0 0 4
    0000 3c -1
    -1
    8094 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0001
    00 01 0 0 0 0 4
    -1
    ",
    "
    80 add a,b
    0f00 0100 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000
    00 00 0 0 0 0 4
    0000 80 -1
    -1
    1010 0100 0000 0000 0000 0000 0000 0000 0000 0000 0000 0001
    00 01 0 0 0 0 4
    -1
    ",
    "
    ed44 neg
    0100 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000
    00 00 0 0 0 0 8
    0000 ed 44 -1
    -1
    ffbb 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0002
    00 02 0 0 0 0 8
    -1
    ",
    "
    cb07 rlc a
    8100 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000
    00 00 0 0 0 0 8
    0000 cb 07 -1
    -1
    0305 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0002
    00 02 0 0 0 0 8
    -1
    ",
    "
    edb0 ldir
    0000 0002 0200 0100 0000 0000 0000 0000 0000 0000 0000 0000
    00 00 0 0 0 0 37
    0000 ed b0 -1
    0100 11 22 -1
    -1
    0020 0000 0202 0102 0000 0000 0000 0000 0000 0000 0000 0002
    00 02 0 0 0 0 37
    0200 11 22 -1
    -1
    ",
    "
    dd34 inc (ix+d)
    0001 0000 0000 0000 0000 0000 0000 0000 1000 0000 0000 0000
    00 00 0 0 0 0 23
    0000 dd 34 ff -1
    0fff 0f -1
    -1
    0011 0000 0000 0000 0000 0000 0000 0000 1000 0000 0000 0003
    00 02 0 0 0 0 23
    0fff 10 -1
    -1
    ",
    "
    ed47 ld i,a
    a500 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000
    00 00 1 1 1 0 9
    0000 ed 47 -1
    -1
    a500 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0002
    a5 02 1 1 1 0 9
    -1
    ",
    "
    76 halt
    0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000
    00 00 0 0 0 0 4
    0000 76 -1
    -1
    0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0000 0001
    00 01 0 0 0 1 4
    -1
    ",
];

#[test]
fn parses_registers_states_and_memory() {
    let fixture = parse_fixture(FIXTURES[7]);
    assert_eq!(fixture.name, "dd34 inc (ix+d)");
    assert_eq!(fixture.before.registers[8], 0x1000);
    assert_eq!(
        fixture.before.memory,
        vec![(0x0000, vec![0xDD, 0x34, 0xFF]), (0x0FFF, vec![0x0F])]
    );
    assert_eq!(fixture.after.registers[11], 0x0003);
    assert_eq!(fixture.after.r, 0x02);
}

#[test]
fn halt_fixture_records_the_halted_column() {
    let fixture = parse_fixture(FIXTURES[FIXTURES.len() - 1]);
    assert_eq!(fixture.before.halted, false);
    assert_eq!(fixture.after.halted, true);
    run_fixture(FIXTURES[FIXTURES.len() - 1]);
}

#[test]
#[should_panic(expected = "76 halt: halted")]
fn halted_mismatch_fails_the_fixture() {
    let fixture = parse_fixture(FIXTURES[FIXTURES.len() - 1]);
    let mut cpu = Cpu::new().unwrap();
    apply_state(&mut cpu, &fixture.before);
    cpu.step().unwrap();
    cpu.halted = false;
    assert_state(&cpu, &fixture.name, &fixture.after);
}

#[test]
fn inline_fixtures_pass() {
    for text in FIXTURES {
        run_fixture(text);
    }
}
