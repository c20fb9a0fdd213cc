/*!
compare.rs - Compare opcode family handler (CMP / CPX / CPY).

CMP: 0xC9, 0xC5, 0xD5, 0xCD, 0xDD*, 0xD9*, 0xC1, 0xD1*
CPX: 0xE0, 0xE4, 0xEC
CPY: 0xC0, 0xC4, 0xCC

(*) page-cross-aware addressing helpers return `(addr, crossed)`; this
handler adds the +1 penalty for the documented read modes. All three
compare opcodes route through `execute::cmp_generic`, which sets NZ from
`reg - mem` and C from `reg >= mem`, leaving `reg` unmodified.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{
    addr_abs, addr_abs_x_pc, addr_abs_y_pc, addr_ind_x, addr_ind_y_pc, addr_zp, addr_zp_x,
    fetch_byte,
};
use crate::cpu::execute::cmp_generic;
use crate::cpu::state::CpuState;
use crate::error::CpuError;

fn bus_read<B: Bus>(bus: &mut B, addr: u16) -> Result<u8, CpuError<B::Error>> {
    let (lo, hi) = crate::bus::to_pair(addr);
    bus.read(lo, hi).map_err(CpuError::BusFault)
}

#[inline]
fn add_page_cross_penalty(cycles: &mut u32, crossed: bool) {
    if crossed {
        *cycles += 1;
    }
}

/// Attempt to execute a CMP/CPX/CPY opcode. Returns `Ok(true)` if handled.
pub(super) fn handle<B: Bus>(
    opcode: u8,
    cpu: &mut CpuState,
    bus: &mut B,
    cycles: &mut u32,
) -> Result<bool, CpuError<B::Error>> {
    match opcode {
        // ---------------- CMP ----------------
        0xC9 => {
            let v = fetch_byte(cpu, bus)?;
            cmp_generic(cpu, cpu.a, v);
        }
        0xC5 => {
            let addr = addr_zp(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            cmp_generic(cpu, cpu.a, v);
        }
        0xD5 => {
            let addr = addr_zp_x(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            cmp_generic(cpu, cpu.a, v);
        }
        0xCD => {
            let addr = addr_abs(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            cmp_generic(cpu, cpu.a, v);
        }
        0xDD => {
            let (addr, crossed) = addr_abs_x_pc(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            cmp_generic(cpu, cpu.a, v);
            add_page_cross_penalty(cycles, crossed);
        }
        0xD9 => {
            let (addr, crossed) = addr_abs_y_pc(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            cmp_generic(cpu, cpu.a, v);
            add_page_cross_penalty(cycles, crossed);
        }
        0xC1 => {
            let addr = addr_ind_x(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            cmp_generic(cpu, cpu.a, v);
        }
        0xD1 => {
            let (addr, crossed) = addr_ind_y_pc(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            cmp_generic(cpu, cpu.a, v);
            add_page_cross_penalty(cycles, crossed);
        }

        // ---------------- CPX ----------------
        0xE0 => {
            let v = fetch_byte(cpu, bus)?;
            cmp_generic(cpu, cpu.x, v);
        }
        0xE4 => {
            let addr = addr_zp(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            cmp_generic(cpu, cpu.x, v);
        }
        0xEC => {
            let addr = addr_abs(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            cmp_generic(cpu, cpu.x, v);
        }

        // ---------------- CPY ----------------
        0xC0 => {
            let v = fetch_byte(cpu, bus)?;
            cmp_generic(cpu, cpu.y, v);
        }
        0xC4 => {
            let addr = addr_zp(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            cmp_generic(cpu, cpu.y, v);
        }
        0xCC => {
            let addr = addr_abs(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            cmp_generic(cpu, cpu.y, v);
        }

        _ => return Ok(false),
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::cycles::base_cycles;
    use crate::cpu::state::{CARRY, NEGATIVE, ZERO};
    use crate::test_utils::FlatBus;

    fn cpu_at(pc: u16) -> CpuState {
        let mut cpu = CpuState::new();
        cpu.pc = pc;
        cpu
    }

    #[test]
    fn cmp_equal_sets_zero_and_carry() {
        let mut bus = FlatBus::new();
        bus.poke(0x8000, 0x10);
        let mut cpu = cpu_at(0x8000);
        cpu.a = 0x10;
        let mut cycles = base_cycles(0xC9);
        handle(0xC9, &mut cpu, &mut bus, &mut cycles).unwrap();
        assert!(cpu.is_flag_set(ZERO));
        assert!(cpu.is_flag_set(CARRY));
        assert_eq!(cpu.a, 0x10); // unmodified
    }

    #[test]
    fn cmp_less_than_clears_carry() {
        let mut bus = FlatBus::new();
        bus.poke(0x8000, 0x20);
        let mut cpu = cpu_at(0x8000);
        cpu.a = 0x10;
        let mut cycles = base_cycles(0xC9);
        handle(0xC9, &mut cpu, &mut bus, &mut cycles).unwrap();
        assert!(!cpu.is_flag_set(CARRY));
        assert!(cpu.is_flag_set(NEGATIVE));
    }

    #[test]
    fn cpx_abs_and_cpy_abs() {
        let mut bus = FlatBus::new();
        bus.poke(0x8000, 0x00);
        bus.poke(0x8001, 0x02);
        bus.poke(0x0200, 0x05);
        let mut cpu = cpu_at(0x8000);
        cpu.x = 0x05;
        let mut cycles = base_cycles(0xEC);
        handle(0xEC, &mut cpu, &mut bus, &mut cycles).unwrap();
        assert!(cpu.is_flag_set(ZERO));
    }

    #[test]
    fn cmp_abs_y_page_cross_penalty() {
        let mut bus = FlatBus::new();
        bus.poke(0x8000, 0xFF);
        bus.poke(0x8001, 0x12);
        bus.poke(0x1300, 0x10);
        let mut cpu = cpu_at(0x8000);
        cpu.y = 1;
        cpu.a = 0x10;
        let mut cycles = base_cycles(0xD9);
        handle(0xD9, &mut cpu, &mut bus, &mut cycles).unwrap();
        assert_eq!(cycles, 5);
    }

    #[test]
    fn unrecognized_opcode_returns_false() {
        let mut bus = FlatBus::new();
        let mut cpu = cpu_at(0x8000);
        let mut cycles = 0;
        assert!(!handle(0xEA, &mut cpu, &mut bus, &mut cycles).unwrap());
    }
}
