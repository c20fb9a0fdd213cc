/*!
arithmetic.rs - ADC / SBC opcode family handler.

ADC: 0x69, 0x65, 0x75, 0x6D, 0x7D*, 0x79*, 0x61, 0x71
SBC: 0xE9, 0xE5, 0xF5, 0xED, 0xFD*, 0xF9*, 0xE1, 0xF1

(*) page-cross-aware addressing helpers return `(addr, crossed)`; this
handler adds the +1 penalty for the documented read modes. Binary vs
decimal-mode arithmetic is selected inside `execute::adc_with_mode`/
`sbc_with_mode` per the live D flag - this handler is mode-agnostic.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{
    addr_abs, addr_abs_x_pc, addr_abs_y_pc, addr_ind_x, addr_ind_y_pc, addr_zp, addr_zp_x,
    fetch_byte,
};
use crate::cpu::execute::{adc_with_mode, sbc_with_mode};
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

/// Attempt to execute an ADC/SBC opcode. Returns `Ok(true)` if handled.
pub(super) fn handle<B: Bus>(
    opcode: u8,
    cpu: &mut CpuState,
    bus: &mut B,
    cycles: &mut u32,
) -> Result<bool, CpuError<B::Error>> {
    match opcode {
        // ---------------- ADC ----------------
        0x69 => {
            let v = fetch_byte(cpu, bus)?;
            adc_with_mode(cpu, v);
        }
        0x65 => {
            let addr = addr_zp(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            adc_with_mode(cpu, v);
        }
        0x75 => {
            let addr = addr_zp_x(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            adc_with_mode(cpu, v);
        }
        0x6D => {
            let addr = addr_abs(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            adc_with_mode(cpu, v);
        }
        0x7D => {
            let (addr, crossed) = addr_abs_x_pc(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            adc_with_mode(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }
        0x79 => {
            let (addr, crossed) = addr_abs_y_pc(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            adc_with_mode(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }
        0x61 => {
            let addr = addr_ind_x(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            adc_with_mode(cpu, v);
        }
        0x71 => {
            let (addr, crossed) = addr_ind_y_pc(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            adc_with_mode(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }

        // ---------------- SBC ----------------
        0xE9 => {
            let v = fetch_byte(cpu, bus)?;
            sbc_with_mode(cpu, v);
        }
        0xE5 => {
            let addr = addr_zp(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            sbc_with_mode(cpu, v);
        }
        0xF5 => {
            let addr = addr_zp_x(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            sbc_with_mode(cpu, v);
        }
        0xED => {
            let addr = addr_abs(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            sbc_with_mode(cpu, v);
        }
        0xFD => {
            let (addr, crossed) = addr_abs_x_pc(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            sbc_with_mode(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }
        0xF9 => {
            let (addr, crossed) = addr_abs_y_pc(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            sbc_with_mode(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }
        0xE1 => {
            let addr = addr_ind_x(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            sbc_with_mode(cpu, v);
        }
        0xF1 => {
            let (addr, crossed) = addr_ind_y_pc(cpu, bus)?;
            let v = bus_read(bus, addr)?;
            sbc_with_mode(cpu, v);
            add_page_cross_penalty(cycles, crossed);
        }

        _ => return Ok(false),
    }
    Ok(true)
}
