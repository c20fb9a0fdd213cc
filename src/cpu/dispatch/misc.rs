/*!
misc.rs - Transfers / stack / flag / no-op opcode family handler.

Transfers: TAX (0xAA), TAY (0xA8), TXA (0x8A), TYA (0x98), TSX (0xBA), TXS (0x9A)
Stack:     PHA (0x48), PLA (0x68), PHP (0x08), PLP (0x28)
Flags:     CLC (0x18), SEC (0x38), CLI (0x58), SEI (0x78), CLD (0xD8),
           SED (0xF8), CLV (0xB8)
Register inc/dec: INX (0xE8), INY (0xC8), DEX (0xCA), DEY (0x88)
NOP:       0xEA - consumes the documented base cycles only.

All opcodes here are implied-addressing and fixed-cost; none ever carry a
page-cross or branch penalty, so this handler never touches `cycles`.
`TXS` is the one transfer that does not update NZ (it is a pure stack
pointer load), matching real hardware.
*/

use crate::bus::Bus;
use crate::cpu::execute::{
    dex, dey, inx, iny, pha, php, pla, plp, set_flag, tax, tay, tsx, txa, txs, tya,
};
use crate::cpu::state::{CpuState, CARRY, DECIMAL, IRQ_DISABLE, OVERFLOW};
use crate::error::CpuError;

/// Attempt to execute a transfer/stack/flag/NOP opcode. Returns `Ok(true)` if handled.
pub(super) fn handle<B: Bus>(
    opcode: u8,
    cpu: &mut CpuState,
    bus: &mut B,
    _cycles: &mut u32,
) -> Result<bool, CpuError<B::Error>> {
    match opcode {
        // ---------------- Transfers ----------------
        0xAA => tax(cpu),
        0xA8 => tay(cpu),
        0x8A => txa(cpu),
        0x98 => tya(cpu),
        0xBA => tsx(cpu),
        0x9A => txs(cpu),

        // ---------------- Stack ----------------
        0x48 => pha(cpu, bus)?,
        0x68 => pla(cpu, bus)?,
        0x08 => php(cpu, bus)?,
        0x28 => plp(cpu, bus)?,

        // ---------------- Flags ----------------
        0x18 => set_flag(cpu, CARRY, false),
        0x38 => set_flag(cpu, CARRY, true),
        0x58 => set_flag(cpu, IRQ_DISABLE, false),
        0x78 => set_flag(cpu, IRQ_DISABLE, true),
        0xD8 => set_flag(cpu, DECIMAL, false),
        0xF8 => set_flag(cpu, DECIMAL, true),
        0xB8 => set_flag(cpu, OVERFLOW, false),

        // ---------------- Register INC/DEC ----------------
        0xE8 => inx(cpu),
        0xC8 => iny(cpu),
        0xCA => dex(cpu),
        0x88 => dey(cpu),

        // ---------------- NOP ----------------
        0xEA => {}

        _ => return Ok(false),
    }
    Ok(true)
}
