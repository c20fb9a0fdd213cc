/*!
dispatch::mod - Single-instruction orchestrator.

Fetches the opcode at PC, classifies it (HLT alias / documented opcode /
invalid), and on a documented opcode tries each per-family handler in turn
until one claims it. Each family lives in its own module so that its
addressing-mode and cycle-penalty logic sits next to the opcodes it
applies to, instead of in one enormous match arm:

  load_store   - LDA/LDX/LDY, STA/STX/STY
  logical      - AND/ORA/EOR/BIT
  arithmetic   - ADC/SBC (binary and decimal, mode-agnostic here)
  compare      - CMP/CPX/CPY
  branches     - the eight relative-branch opcodes
  rmw          - ASL/LSR/ROL/ROR (accumulator and memory), INC/DEC memory
  control_flow - JMP/JSR/RTS/RTI/BRK
  misc         - transfers, stack ops, flag set/clear, register inc/dec, NOP

An opcode not claimed by any handler is either 0x9C/0x9E (explicitly
unimplemented per the normative opcode table) or some other undocumented
opcode outside the HLT set; both surface as `CpuError::InvalidOpcode`
with PC left pointing at the opcode byte, not the position after it.
*/

pub(crate) mod arithmetic;
pub(crate) mod branches;
pub(crate) mod compare;
pub(crate) mod control_flow;
pub(crate) mod load_store;
pub(crate) mod logical;
pub(crate) mod misc;
pub(crate) mod rmw;

use crate::bus::Bus;
use crate::cpu::cycles::{base_cycles, is_halt_opcode};
use crate::cpu::state::CpuState;
use crate::error::CpuError;

/// Execute exactly one instruction. The caller (the `Cpu` facade) is
/// responsible for checking `cpu.halted` before calling this - dispatch
/// assumes the CPU is in the Running state.
pub(crate) fn step<B: Bus>(cpu: &mut CpuState, bus: &mut B) -> Result<u32, CpuError<B::Error>> {
    let pc_at_fetch = cpu.pc;
    let opcode = cpu.fetch_u8(bus)?;

    if is_halt_opcode(opcode) {
        cpu.halted = true;
        return Ok(0);
    }

    let mut cycles = base_cycles(opcode);

    let handled = load_store::handle(opcode, cpu, bus, &mut cycles)?
        || logical::handle(opcode, cpu, bus, &mut cycles)?
        || arithmetic::handle(opcode, cpu, bus, &mut cycles)?
        || compare::handle(opcode, cpu, bus, &mut cycles)?
        || branches::handle(opcode, cpu, bus, &mut cycles)?
        || rmw::handle(opcode, cpu, bus, &mut cycles)?
        || control_flow::handle(opcode, cpu, bus, &mut cycles)?
        || misc::handle(opcode, cpu, bus, &mut cycles)?;

    if handled {
        Ok(cycles)
    } else {
        cpu.pc = pc_at_fetch;
        Err(CpuError::InvalidOpcode {
            pc: pc_at_fetch,
            opcode,
        })
    }
}
