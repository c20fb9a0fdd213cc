/*!
load_store.rs - Load / Store opcode family handler.

Loads (set N/Z; read-side addressing modes may incur a page-cross
penalty):
    LDA: A9, A5, B5, AD, BD*, B9*, A1, B1*
    LDX: A2, A6, B6, AE, BE*
    LDY: A0, A4, B4, AC, BC*

Stores (flags unchanged; never page-cross penalized):
    STA: 85, 95, 8D, 9D, 99, 81, 91
    STX: 86, 96, 8E
    STY: 84, 94, 8C

(*) page-cross-aware addressing helpers return `(addr, crossed)`; this
handler adds the +1 penalty only for the documented read cases.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{
    addr_abs, addr_abs_x, addr_abs_x_pc, addr_abs_y, addr_abs_y_pc, addr_ind_x, addr_ind_y,
    addr_ind_y_pc, addr_zp, addr_zp_x, addr_zp_y, fetch_byte,
};
use crate::cpu::execute::{lda, ldx, ldy};
use crate::cpu::state::CpuState;
use crate::error::CpuError;

fn bus_read<B: Bus>(bus: &mut B, addr: u16) -> Result<u8, CpuError<B::Error>> {
    let (lo, hi) = crate::bus::to_pair(addr);
    bus.read(lo, hi).map_err(CpuError::BusFault)
}

fn bus_write<B: Bus>(bus: &mut B, addr: u16, value: u8) -> Result<(), CpuError<B::Error>> {
    let (lo, hi) = crate::bus::to_pair(addr);
    bus.write(lo, hi, value).map_err(CpuError::BusFault)
}

#[inline]
fn add_page_cross_penalty(cycles: &mut u32, crossed: bool) {
    if crossed {
        *cycles += 1;
    }
}

/// Attempt to execute a load/store opcode. Returns `Ok(true)` if handled.
pub(super) fn handle<B: Bus>(
    opcode: u8,
    cpu: &mut CpuState,
    bus: &mut B,
    cycles: &mut u32,
) -> Result<bool, CpuError<B::Error>> {
    match opcode {
        // ---------------- LDA ----------------
        0xA9 => {
            let v = fetch_byte(cpu, bus)?;
            lda(cpu, v);
        }
        0xA5 => {
            let a = addr_zp(cpu, bus)?;
            let v = bus_read(bus, a)?;
            lda(cpu, v);
        }
        0xB5 => {
            let a = addr_zp_x(cpu, bus)?;
            let v = bus_read(bus, a)?;
            lda(cpu, v);
        }
        0xAD => {
            let a = addr_abs(cpu, bus)?;
            let v = bus_read(bus, a)?;
            lda(cpu, v);
        }
        0xBD => {
            let (a, crossed) = addr_abs_x_pc(cpu, bus)?;
            let v = bus_read(bus, a)?;
            lda(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }
        0xB9 => {
            let (a, crossed) = addr_abs_y_pc(cpu, bus)?;
            let v = bus_read(bus, a)?;
            lda(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }
        0xA1 => {
            let a = addr_ind_x(cpu, bus)?;
            let v = bus_read(bus, a)?;
            lda(cpu, v);
        }
        0xB1 => {
            let (a, crossed) = addr_ind_y_pc(cpu, bus)?;
            let v = bus_read(bus, a)?;
            lda(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }

        // ---------------- LDX ----------------
        0xA2 => {
            let v = fetch_byte(cpu, bus)?;
            ldx(cpu, v);
        }
        0xA6 => {
            let a = addr_zp(cpu, bus)?;
            let v = bus_read(bus, a)?;
            ldx(cpu, v);
        }
        0xB6 => {
            let a = addr_zp_y(cpu, bus)?;
            let v = bus_read(bus, a)?;
            ldx(cpu, v);
        }
        0xAE => {
            let a = addr_abs(cpu, bus)?;
            let v = bus_read(bus, a)?;
            ldx(cpu, v);
        }
        0xBE => {
            let (a, crossed) = addr_abs_y_pc(cpu, bus)?;
            let v = bus_read(bus, a)?;
            ldx(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }

        // ---------------- LDY ----------------
        0xA0 => {
            let v = fetch_byte(cpu, bus)?;
            ldy(cpu, v);
        }
        0xA4 => {
            let a = addr_zp(cpu, bus)?;
            let v = bus_read(bus, a)?;
            ldy(cpu, v);
        }
        0xB4 => {
            let a = addr_zp_x(cpu, bus)?;
            let v = bus_read(bus, a)?;
            ldy(cpu, v);
        }
        0xAC => {
            let a = addr_abs(cpu, bus)?;
            let v = bus_read(bus, a)?;
            ldy(cpu, v);
        }
        0xBC => {
            let (a, crossed) = addr_abs_x_pc(cpu, bus)?;
            let v = bus_read(bus, a)?;
            ldy(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }

        // ---------------- STA ----------------
        0x85 => {
            let a = addr_zp(cpu, bus)?;
            bus_write(bus, a, cpu.a)?;
        }
        0x95 => {
            let a = addr_zp_x(cpu, bus)?;
            bus_write(bus, a, cpu.a)?;
        }
        0x8D => {
            let a = addr_abs(cpu, bus)?;
            bus_write(bus, a, cpu.a)?;
        }
        0x9D => {
            let a = addr_abs_x(cpu, bus)?;
            bus_write(bus, a, cpu.a)?;
        }
        0x99 => {
            let a = addr_abs_y(cpu, bus)?;
            bus_write(bus, a, cpu.a)?;
        }
        0x81 => {
            let a = addr_ind_x(cpu, bus)?;
            bus_write(bus, a, cpu.a)?;
        }
        0x91 => {
            let a = addr_ind_y(cpu, bus)?;
            bus_write(bus, a, cpu.a)?;
        }

        // ---------------- STX ----------------
        0x86 => {
            let a = addr_zp(cpu, bus)?;
            bus_write(bus, a, cpu.x)?;
        }
        0x96 => {
            let a = addr_zp_y(cpu, bus)?;
            bus_write(bus, a, cpu.x)?;
        }
        0x8E => {
            let a = addr_abs(cpu, bus)?;
            bus_write(bus, a, cpu.x)?;
        }

        // ---------------- STY ----------------
        0x84 => {
            let a = addr_zp(cpu, bus)?;
            bus_write(bus, a, cpu.y)?;
        }
        0x94 => {
            let a = addr_zp_x(cpu, bus)?;
            bus_write(bus, a, cpu.y)?;
        }
        0x8C => {
            let a = addr_abs(cpu, bus)?;
            bus_write(bus, a, cpu.y)?;
        }

        _ => return Ok(false),
    }
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
    fn lda_abs_x_page_cross_penalty_applied() {
        let mut bus = FlatBus::new();
        bus.poke(0x8000, 0xFF);
        bus.poke(0x8001, 0x12);
        bus.poke(0x1300, 0x42);
        let mut cpu = cpu_at(0x8000);
        cpu.x = 1;
        let mut cycles = base_cycles(0xBD);
        let handled = handle(0xBD, &mut cpu, &mut bus, &mut cycles).unwrap();
        assert!(handled);
        assert_eq!(cpu.a, 0x42);
        assert_eq!(cycles, 5); // base 4 + 1 page cross
    }

    #[test]
    fn sta_abs_x_no_page_cross_penalty() {
        let mut bus = FlatBus::new();
        bus.poke(0x8000, 0xFF);
        bus.poke(0x8001, 0x12);
        let mut cpu = cpu_at(0x8000);
        cpu.x = 1;
        cpu.a = 0x55;
        let mut cycles = base_cycles(0x9D);
        let handled = handle(0x9D, &mut cpu, &mut bus, &mut cycles).unwrap();
        assert!(handled);
        assert_eq!(bus.peek(0x1300), 0x55);
        assert_eq!(cycles, 5); // no penalty regardless of crossing
    }

    #[test]
    fn ldx_immediate_sets_zn() {
        let mut bus = FlatBus::new();
        bus.poke(0x8000, 0x00);
        let mut cpu = cpu_at(0x8000);
        let mut cycles = base_cycles(0xA2);
        handle(0xA2, &mut cpu, &mut bus, &mut cycles).unwrap();
        assert_eq!(cpu.x, 0x00);
        assert!(cpu.is_flag_set(crate::cpu::state::ZERO));
    }

    #[test]
    fn unrecognized_opcode_returns_false() {
        let mut bus = FlatBus::new();
        let mut cpu = cpu_at(0x8000);
        let mut cycles = 0;
        assert!(!handle(0xEA, &mut cpu, &mut bus, &mut cycles).unwrap());
    }
}
