/*!
addressing.rs - Effective-address and operand decoders for every 6502
addressing mode.

Each helper fetches whatever operand bytes the mode requires (advancing
PC through [`CpuState::fetch_u8`]/[`CpuState::fetch_u16`]) and returns
either a resolved 16-bit effective address or, for the indexed read
modes that can incur a page-cross penalty, an `(address, crossed)` pair.
None of these helpers tick a cycle counter themselves - callers look the
opcode's base cost up in [`crate::cpu::cycles::base_cycles`] and add any
page-cross penalty this module reports.

Addresses are carried as `u16` for arithmetic convenience and only split
into the `(low, high)` pair at the point of an actual bus read/write,
per the bus contract.
*/

use crate::bus::{to_pair, Bus};
use crate::cpu::state::CpuState;
use crate::error::CpuError;

/// Fetch the immediate byte at PC, advancing PC by one.
pub(crate) fn fetch_byte<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
) -> Result<u8, CpuError<B::Error>> {
    cpu.fetch_u8(bus)
}

/// Read a byte from zero page at `zp_addr` (wraps within page 0; never
/// escapes into the stack page).
fn zp_read<B: Bus>(bus: &mut B, zp_addr: u8) -> Result<u8, CpuError<B::Error>> {
    bus.read(zp_addr, 0x00).map_err(CpuError::BusFault)
}

pub(crate) fn addr_zp<B: Bus>(cpu: &mut CpuState, bus: &mut B) -> Result<u16, CpuError<B::Error>> {
    Ok(fetch_byte(cpu, bus)? as u16)
}

pub(crate) fn addr_zp_x<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
) -> Result<u16, CpuError<B::Error>> {
    let base = fetch_byte(cpu, bus)?;
    Ok(base.wrapping_add(cpu.x) as u16)
}

pub(crate) fn addr_zp_y<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
) -> Result<u16, CpuError<B::Error>> {
    let base = fetch_byte(cpu, bus)?;
    Ok(base.wrapping_add(cpu.y) as u16)
}

pub(crate) fn addr_abs<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
) -> Result<u16, CpuError<B::Error>> {
    cpu.fetch_u16(bus)
}

/// Absolute,X with no page-cross report - used by store instructions,
/// which always pay the pessimistic cycle cost regardless of crossing.
pub(crate) fn addr_abs_x<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
) -> Result<u16, CpuError<B::Error>> {
    let base = cpu.fetch_u16(bus)?;
    Ok(base.wrapping_add(cpu.x as u16))
}

/// Absolute,Y with no page-cross report (see [`addr_abs_x`]).
pub(crate) fn addr_abs_y<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
) -> Result<u16, CpuError<B::Error>> {
    let base = cpu.fetch_u16(bus)?;
    Ok(base.wrapping_add(cpu.y as u16))
}

/// Absolute,X reporting whether the effective address crossed a page
/// boundary relative to the base address (used by read instructions).
pub(crate) fn addr_abs_x_pc<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
) -> Result<(u16, bool), CpuError<B::Error>> {
    let base = cpu.fetch_u16(bus)?;
    let addr = base.wrapping_add(cpu.x as u16);
    Ok((addr, (base & 0xFF00) != (addr & 0xFF00)))
}

/// Absolute,Y reporting a page-cross (see [`addr_abs_x_pc`]).
pub(crate) fn addr_abs_y_pc<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
) -> Result<(u16, bool), CpuError<B::Error>> {
    let base = cpu.fetch_u16(bus)?;
    let addr = base.wrapping_add(cpu.y as u16);
    Ok((addr, (base & 0xFF00) != (addr & 0xFF00)))
}

/// Read a zero-page pointer at `base`/`base+1`, wrapping within page 0.
fn read_word_zp<B: Bus>(bus: &mut B, base: u8) -> Result<u16, CpuError<B::Error>> {
    let lo = zp_read(bus, base)?;
    let hi = zp_read(bus, base.wrapping_add(1))?;
    Ok(u16::from_le_bytes([lo, hi]))
}

/// `(indirect,X)`: zero-page pointer indexed by X (wrapping in 8 bits)
/// before the pointer is dereferenced. Never page-crosses for cycle
/// purposes (fixed cost).
pub(crate) fn addr_ind_x<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
) -> Result<u16, CpuError<B::Error>> {
    let zp = fetch_byte(cpu, bus)?;
    let pointer = zp.wrapping_add(cpu.x);
    read_word_zp(bus, pointer)
}

/// `(indirect),Y` with no page-cross report.
pub(crate) fn addr_ind_y<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
) -> Result<u16, CpuError<B::Error>> {
    let zp = fetch_byte(cpu, bus)?;
    let base = read_word_zp(bus, zp)?;
    Ok(base.wrapping_add(cpu.y as u16))
}

/// `(indirect),Y` reporting whether adding Y crossed a page boundary.
pub(crate) fn addr_ind_y_pc<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
) -> Result<(u16, bool), CpuError<B::Error>> {
    let zp = fetch_byte(cpu, bus)?;
    let base = read_word_zp(bus, zp)?;
    let addr = base.wrapping_add(cpu.y as u16);
    Ok((addr, (base & 0xFF00) != (addr & 0xFF00)))
}

/// Resolve the target of `JMP (indirect)`, reproducing the documented
/// hardware bug: if the pointer's low byte is `$FF`, the high byte of the
/// target is fetched from the *start* of the same page rather than
/// crossing into the next one.
pub(crate) fn read_word_indirect_bug<B: Bus>(
    bus: &mut B,
    pointer: u16,
) -> Result<u16, CpuError<B::Error>> {
    let (lo, hi) = to_pair(pointer);
    let target_lo = bus.read(lo, hi).map_err(CpuError::BusFault)?;
    let target_hi = bus
        .read(lo.wrapping_add(1), hi)
        .map_err(CpuError::BusFault)?;
    Ok(u16::from_le_bytes([target_lo, target_hi]))
}

/// Resolve a relative branch target from a fetched signed displacement,
/// reporting whether the branch crossed a page boundary.
pub(crate) fn branch_target(pc_after_operand: u16, displacement: u8) -> (u16, bool) {
    let target = pc_after_operand.wrapping_add(displacement as i8 as i16 as u16);
    let crossed = (pc_after_operand & 0xFF00) != (target & 0xFF00);
    (target, crossed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FlatBus;

    fn cpu_at(pc: u16) -> CpuState {
        let mut cpu = CpuState::new();
        cpu.pc = pc;
        cpu
    }

    #[test]
    fn zero_page_x_wraps_at_256() {
        let mut bus = FlatBus::new();
        bus.poke(0x8000, 0xFF);
        let mut cpu = cpu_at(0x8000);
        cpu.x = 1;
        let addr = addr_zp_x(&mut cpu, &mut bus).unwrap();
        assert_eq!(addr, 0x0000);
    }

    #[test]
    fn absolute_x_reports_page_cross() {
        let mut bus = FlatBus::new();
        bus.poke(0x8000, 0xFF);
        bus.poke(0x8001, 0x12);
        let mut cpu = cpu_at(0x8000);
        cpu.x = 1;
        let (addr, crossed) = addr_abs_x_pc(&mut cpu, &mut bus).unwrap();
        assert_eq!(addr, 0x1300);
        assert!(crossed);
    }

    #[test]
    fn indirect_y_wraps_pointer_at_0xffff() {
        let mut bus = FlatBus::new();
        bus.poke(0x8000, 0x10);
        bus.poke(0x0010, 0xFF);
        bus.poke(0x0011, 0xFF);
        let mut cpu = cpu_at(0x8000);
        cpu.y = 1;
        let (addr, crossed) = addr_ind_y_pc(&mut cpu, &mut bus).unwrap();
        assert_eq!(addr, 0x0000);
        assert!(crossed);
    }

    #[test]
    fn jmp_indirect_page_wrap_bug() {
        let mut bus = FlatBus::new();
        bus.poke(0x80FF, 0xAA);
        bus.poke(0x8000, 0x55);
        bus.poke(0x8100, 0xCC);
        let target = read_word_indirect_bug(&mut bus, 0x80FF).unwrap();
        assert_eq!(target, 0x55AA);
    }

    #[test]
    fn branch_same_page_not_crossed() {
        let (target, crossed) = branch_target(0x0402, 0xFE);
        assert_eq!(target, 0x0400);
        assert!(!crossed);
    }

    #[test]
    fn branch_crossing_page_reported() {
        let (_target, crossed) = branch_target(0x00FF, 0x10);
        assert!(crossed);
    }
}
