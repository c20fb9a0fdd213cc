/*!
logical.rs - Logical and bit-test opcode family handler.

AND: 0x29, 0x25, 0x35, 0x2D, 0x3D*, 0x39*, 0x21, 0x31*
ORA: 0x09, 0x05, 0x15, 0x0D, 0x1D*, 0x19*, 0x01, 0x11*
EOR: 0x49, 0x45, 0x55, 0x4D, 0x5D*, 0x59*, 0x41, 0x51*
BIT: 0x24, 0x2C

(*) page-cross-aware addressing helpers return `(addr, crossed)`; this
handler adds the +1 penalty for the documented read modes.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{
    addr_abs, addr_abs_x_pc, addr_abs_y_pc, addr_ind_x, addr_ind_y_pc, addr_zp, addr_zp_x,
    fetch_byte,
};
use crate::cpu::execute::{and as and_exec, bit, eor, ora};
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

/// Attempt to execute a logical/bit-test opcode. Returns `Ok(true)` if handled.
pub(super) fn handle<B: Bus>(
    opcode: u8,
    cpu: &mut CpuState,
    bus: &mut B,
    cycles: &mut u32,
) -> Result<bool, CpuError<B::Error>> {
    match opcode {
        // ---------------- AND ----------------
        0x29 => {
            let v = fetch_byte(cpu, bus)?;
            and_exec(cpu, v);
        }
        0x25 => {
            let addr = addr_zp(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            and_exec(cpu, v);
        }
        0x35 => {
            let addr = addr_zp_x(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            and_exec(cpu, v);
        }
        0x2D => {
            let addr = addr_abs(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            and_exec(cpu, v);
        }
        0x3D => {
            let (addr, crossed) = addr_abs_x_pc(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            and_exec(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }
        0x39 => {
            let (addr, crossed) = addr_abs_y_pc(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            and_exec(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }
        0x21 => {
            let addr = addr_ind_x(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            and_exec(cpu, v);
        }
        0x31 => {
            let (addr, crossed) = addr_ind_y_pc(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            and_exec(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }

        // ---------------- ORA ----------------
        0x09 => {
            let v = fetch_byte(cpu, bus)?;
            ora(cpu, v);
        }
        0x05 => {
            let addr = addr_zp(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            ora(cpu, v);
        }
        0x15 => {
            let addr = addr_zp_x(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            ora(cpu, v);
        }
        0x0D => {
            let addr = addr_abs(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            ora(cpu, v);
        }
        0x1D => {
            let (addr, crossed) = addr_abs_x_pc(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            ora(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }
        0x19 => {
            let (addr, crossed) = addr_abs_y_pc(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            ora(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }
        0x01 => {
            let addr = addr_ind_x(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            ora(cpu, v);
        }
        0x11 => {
            let (addr, crossed) = addr_ind_y_pc(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            ora(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }

        // ---------------- EOR ----------------
        0x49 => {
            let v = fetch_byte(cpu, bus)?;
            eor(cpu, v);
        }
        0x45 => {
            let addr = addr_zp(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            eor(cpu, v);
        }
        0x55 => {
            let addr = addr_zp_x(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            eor(cpu, v);
        }
        0x4D => {
            let addr = addr_abs(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            eor(cpu, v);
        }
        0x5D => {
            let (addr, crossed) = addr_abs_x_pc(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            eor(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }
        0x59 => {
            let (addr, crossed) = addr_abs_y_pc(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            eor(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }
        0x41 => {
            let addr = addr_ind_x(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            eor(cpu, v);
        }
        0x51 => {
            let (addr, crossed) = addr_ind_y_pc(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            eor(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }

        // ---------------- BIT ----------------
        0x24 => {
            let addr = addr_zp(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            bit(cpu, v);
        }
        0x2C => {
            let addr = addr_abs(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            bit(cpu, v);
        }

        _ => return Ok(false),
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::cycles::base_cycles;
    use crate::cpu::state::ZERO;
    use crate::test_utils::FlatBus;

    fn cpu_at(pc: u16) -> CpuState {
        let mut cpu = CpuState::new();
        cpu.pc = pc;
        cpu
    }

    #[test]
    fn and_abs_x_page_cross_penalty() {
        let mut bus = FlatBus::new();
        bus.poke(0x8000, 0xFF);
        bus.poke(0x8001, 0x12);
        bus.poke(0x1300, 0x0F);
        let mut cpu = cpu_at(0x8000);
        cpu.x = 1;
        cpu.a = 0xFF;
        let mut cycles = base_cycles(0x3D);
        handle(0x3D, &mut cpu, &mut bus, &mut cycles).unwrap();
        assert_eq!(cpu.a, 0x0F);
        assert_eq!(cycles, 5);
    }

    #[test]
    fn ora_indirect_y_page_cross_penalty() {
        let mut bus = FlatBus::new();
        bus.poke(0x0010, 0xFF);
        bus.poke(0x0011, 0x12);
        bus.poke(0x1300, 0x01);
        let mut cpu = cpu_at(0x8000);
        bus.poke(0x8000, 0x10);
        cpu.y = 1;
        let mut cycles = base_cycles(0x11);
        handle(0x11, &mut cpu, &mut bus, &mut cycles).unwrap();
        assert_eq!(cpu.a, 0x01);
        assert_eq!(cycles, 6); // base 5 + 1 cross
    }

    #[test]
    fn bit_zero_page_sets_nv_from_memory_z_from_and() {
        let mut bus = FlatBus::new();
        bus.poke(0x8000, 0x02);
        bus.poke(0x0002, 0b1100_0000);
        let mut cpu = cpu_at(0x8000);
        cpu.a = 0xFF;
        let mut cycles = base_cycles(0x24);
        handle(0x24, &mut cpu, &mut bus, &mut cycles).unwrap();
        assert!(cpu.is_flag_set(crate::cpu::state::NEGATIVE));
        assert!(cpu.is_flag_set(crate::cpu::state::OVERFLOW));
        assert!(!cpu.is_flag_set(ZERO));
    }

    #[test]
    fn eor_immediate_updates_accumulator() {
        let mut bus = FlatBus::new();
        bus.poke(0x8000, 0xFF);
        let mut cpu = cpu_at(0x8000);
        cpu.a = 0xFF;
        let mut cycles = base_cycles(0x49);
        handle(0x49, &mut cpu, &mut bus, &mut cycles).unwrap();
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.is_flag_set(ZERO));
    }
}
