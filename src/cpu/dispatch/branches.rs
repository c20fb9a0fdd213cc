/*!
branches.rs - Relative branch opcode family handler.

BPL 0x10, BMI 0x30, BVC 0x50, BVS 0x70, BCC 0x90, BCS 0xB0, BNE 0xD0, BEQ 0xF0.

Base cost is 2 cycles (already in `cycles::base_cycles`). `execute::branch_cond`
fetches the displacement, applies it to PC when the condition holds, and
reports the extra cycles to add: 0 if not taken, 1 if taken, 2 if taken and
the target lands on a different page than the instruction after the branch.
*/

use crate::bus::Bus;
use crate::cpu::execute::branch_cond;
use crate::cpu::state::{CpuState, CARRY, NEGATIVE, OVERFLOW, ZERO};
use crate::error::CpuError;

/// Attempt to execute a conditional branch opcode. Returns `Ok(true)` if handled.
pub(super) fn handle<B: Bus>(
    opcode: u8,
    cpu: &mut CpuState,
    bus: &mut B,
    cycles: &mut u32,
) -> Result<bool, CpuError<B::Error>> {
    let take = match opcode {
        0x10 => !cpu.is_flag_set(NEGATIVE),
        0x30 => cpu.is_flag_set(NEGATIVE),
        0x50 => !cpu.is_flag_set(OVERFLOW),
        0x70 => cpu.is_flag_set(OVERFLOW),
        0x90 => !cpu.is_flag_set(CARRY),
        0xB0 => cpu.is_flag_set(CARRY),
        0xD0 => !cpu.is_flag_set(ZERO),
        0xF0 => cpu.is_flag_set(ZERO),
        _ => return Ok(false),
    };

    let extra = branch_cond(cpu, bus, take)?;
    *cycles += extra;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::cycles::base_cycles;
    use crate::test_utils::FlatBus;

    fn cpu_at(pc: u16) -> CpuState {
        let mut cpu = CpuState::new();
        cpu.pc = pc;
        cpu
    }

    #[test]
    fn bne_taken_same_page() {
        let mut bus = FlatBus::new();
        bus.poke(0x0400, 0xFE); // -2
        let mut cpu = cpu_at(0x0400);
        cpu.assign_flag(ZERO, false);
        let mut cycles = base_cycles(0xD0);
        let handled = handle(0xD0, &mut cpu, &mut bus, &mut cycles).unwrap();
        assert!(handled);
        assert_eq!(cpu.pc, 0x0400);
        assert_eq!(cycles, 3); // base 2 + 1 taken
    }

    #[test]
    fn bne_not_taken() {
        let mut bus = FlatBus::new();
        bus.poke(0x0400, 0xFE);
        let mut cpu = cpu_at(0x0400);
        cpu.assign_flag(ZERO, true);
        let mut cycles = base_cycles(0xD0);
        handle(0xD0, &mut cpu, &mut bus, &mut cycles).unwrap();
        assert_eq!(cpu.pc, 0x0401);
        assert_eq!(cycles, 2);
    }

    #[test]
    fn bcs_taken_crosses_page() {
        let mut bus = FlatBus::new();
        bus.poke(0x80FF, 0x10);
        let mut cpu = cpu_at(0x80FF);
        cpu.assign_flag(CARRY, true);
        let mut cycles = base_cycles(0xB0);
        handle(0xB0, &mut cpu, &mut bus, &mut cycles).unwrap();
        assert_eq!(cycles, 4); // base 2 + 2 taken-and-crossed
    }

    #[test]
    fn unrecognized_opcode_returns_false() {
        let mut bus = FlatBus::new();
        let mut cpu = cpu_at(0x8000);
        let mut cycles = 0;
        assert!(!handle(0xEA, &mut cpu, &mut bus, &mut cycles).unwrap());
    }
}
