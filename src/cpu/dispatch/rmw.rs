/*!
rmw.rs - Shift/rotate and memory INC/DEC opcode family handler.

Shifts / Rotates
  ASL: 0x0A (A), 0x06 (zp), 0x16 (zp,X), 0x0E (abs), 0x1E (abs,X)
  LSR: 0x4A (A), 0x46 (zp), 0x56 (zp,X), 0x4E (abs), 0x5E (abs,X)
  ROL: 0x2A (A), 0x26 (zp), 0x36 (zp,X), 0x2E (abs), 0x3E (abs,X)
  ROR: 0x6A (A), 0x66 (zp), 0x76 (zp,X), 0x6E (abs), 0x7E (abs,X)
Memory INC/DEC
  INC: 0xE6 (zp), 0xF6 (zp,X), 0xEE (abs), 0xFE (abs,X)
  DEC: 0xC6 (zp), 0xD6 (zp,X), 0xCE (abs), 0xDE (abs,X)

Memory forms route through `execute::rmw_memory`, which performs the
canonical read -> dummy-write(old) -> write(new) bus choreography. None of
these opcodes ever page-cross-penalize (the abs,X forms always pay the
pessimistic cost, already baked into `cycles::base_cycles`), so this
handler never touches `cycles`.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{addr_abs, addr_abs_x, addr_zp, addr_zp_x};
use crate::cpu::execute::{
    asl_acc, asl_mem, dec_mem, inc_mem, lsr_acc, lsr_mem, rol_acc, rol_mem, ror_acc, ror_mem,
};
use crate::cpu::state::CpuState;
use crate::error::CpuError;

/// Attempt to execute a shift/rotate/INC/DEC opcode. Returns `Ok(true)` if handled.
pub(super) fn handle<B: Bus>(
    opcode: u8,
    cpu: &mut CpuState,
    bus: &mut B,
    _cycles: &mut u32,
) -> Result<bool, CpuError<B::Error>> {
    match opcode {
        // ---------------- ASL ----------------
        0x0A => asl_acc(cpu),
        0x06 => {
            let addr = addr_zp(cpu, bus)?;
            asl_mem(cpu, bus, addr)?;
        }
        0x16 => {
            let addr = addr_zp_x(cpu, bus)?;
            asl_mem(cpu, bus, addr)?;
        }
        0x0E => {
            let addr = addr_abs(cpu, bus)?;
            asl_mem(cpu, bus, addr)?;
        }
        0x1E => {
            let addr = addr_abs_x(cpu, bus)?;
            asl_mem(cpu, bus, addr)?;
        }

        // ---------------- LSR ----------------
        0x4A => lsr_acc(cpu),
        0x46 => {
            let addr = addr_zp(cpu, bus)?;
            lsr_mem(cpu, bus, addr)?;
        }
        0x56 => {
            let addr = addr_zp_x(cpu, bus)?;
            lsr_mem(cpu, bus, addr)?;
        }
        0x4E => {
            let addr = addr_abs(cpu, bus)?;
            lsr_mem(cpu, bus, addr)?;
        }
        0x5E => {
            let addr = addr_abs_x(cpu, bus)?;
            lsr_mem(cpu, bus, addr)?;
        }

        // ---------------- ROL ----------------
        0x2A => rol_acc(cpu),
        0x26 => {
            let addr = addr_zp(cpu, bus)?;
            rol_mem(cpu, bus, addr)?;
        }
        0x36 => {
            let addr = addr_zp_x(cpu, bus)?;
            rol_mem(cpu, bus, addr)?;
        }
        0x2E => {
            let addr = addr_abs(cpu, bus)?;
            rol_mem(cpu, bus, addr)?;
        }
        0x3E => {
            let addr = addr_abs_x(cpu, bus)?;
            rol_mem(cpu, bus, addr)?;
        }

        // ---------------- ROR ----------------
        0x6A => ror_acc(cpu),
        0x66 => {
            let addr = addr_zp(cpu, bus)?;
            ror_mem(cpu, bus, addr)?;
        }
        0x76 => {
            let addr = addr_zp_x(cpu, bus)?;
            ror_mem(cpu, bus, addr)?;
        }
        0x6E => {
            let addr = addr_abs(cpu, bus)?;
            ror_mem(cpu, bus, addr)?;
        }
        0x7E => {
            let addr = addr_abs_x(cpu, bus)?;
            ror_mem(cpu, bus, addr)?;
        }

        // ---------------- INC ----------------
        0xE6 => {
            let addr = addr_zp(cpu, bus)?;
            inc_mem(cpu, bus, addr)?;
        }
        0xF6 => {
            let addr = addr_zp_x(cpu, bus)?;
            inc_mem(cpu, bus, addr)?;
        }
        0xEE => {
            let addr = addr_abs(cpu, bus)?;
            inc_mem(cpu, bus, addr)?;
        }
        0xFE => {
            let addr = addr_abs_x(cpu, bus)?;
            inc_mem(cpu, bus, addr)?;
        }

        // ---------------- DEC ----------------
        0xC6 => {
            let addr = addr_zp(cpu, bus)?;
            dec_mem(cpu, bus, addr)?;
        }
        0xD6 => {
            let addr = addr_zp_x(cpu, bus)?;
            dec_mem(cpu, bus, addr)?;
        }
        0xCE => {
            let addr = addr_abs(cpu, bus)?;
            dec_mem(cpu, bus, addr)?;
        }
        0xDE => {
            let addr = addr_abs_x(cpu, bus)?;
            dec_mem(cpu, bus, addr)?;
        }

        _ => return Ok(false),
    }
    Ok(true)
}
