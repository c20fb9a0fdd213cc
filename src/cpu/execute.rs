/*!
execute.rs - ALU, stack, and register-transfer semantics shared by every
dispatch family.

Scope
=====
Everything here is pure instruction *semantics*: given an already-decoded
operand (or effective address), mutate `CpuState` and, where the mode
touches memory, the bus. Addressing-mode resolution lives in
[`crate::cpu::addressing`]; opcode-to-handler routing and cycle totals
live in [`crate::cpu::dispatch`] and [`crate::cpu::cycles`].

None of these helpers tick a cycle counter; this crate charges each
opcode's documented total cycle cost directly at the dispatch layer.
[`rmw_memory`] still performs the real read -> dummy-write(old) ->
write(new) bus choreography so a caller instrumenting its bus observes
the same access pattern real hardware would, even though no extra
cycles are charged for it.
*/

use crate::bus::Bus;
use crate::cpu::state::{CpuState, CARRY, DECIMAL, NEGATIVE, OVERFLOW, ZERO};
use crate::error::CpuError;

// ---------------------------------------------------------------------------
// Flag helpers
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn set_flag(cpu: &mut CpuState, mask: u8, on: bool) {
    cpu.assign_flag(mask, on);
}

#[inline]
pub(crate) fn get_flag(cpu: &CpuState, mask: u8) -> bool {
    cpu.is_flag_set(mask)
}

#[inline]
pub(crate) fn update_zn(cpu: &mut CpuState, v: u8) {
    cpu.update_zn(v);
}

// ---------------------------------------------------------------------------
// Stack helpers
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn push<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
    v: u8,
) -> Result<(), CpuError<B::Error>> {
    cpu.push_u8(bus, v)
}

#[inline]
pub(crate) fn pop<B: Bus>(cpu: &mut CpuState, bus: &mut B) -> Result<u8, CpuError<B::Error>> {
    cpu.pop_u8(bus)
}

#[inline]
pub(crate) fn push_word<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
    v: u16,
) -> Result<(), CpuError<B::Error>> {
    cpu.push_u16_le(bus, v)
}

#[inline]
pub(crate) fn pop_word<B: Bus>(cpu: &mut CpuState, bus: &mut B) -> Result<u16, CpuError<B::Error>> {
    cpu.pop_u16_le(bus)
}

/// Push P with control over Break flag semantics (BRK/PHP vs IRQ/NMI entry).
pub(crate) fn push_status_with_break<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
    set_break: bool,
) -> Result<(), CpuError<B::Error>> {
    let v = cpu.compose_status_for_push(set_break);
    push(cpu, bus, v)
}

#[inline]
pub(crate) fn php<B: Bus>(cpu: &mut CpuState, bus: &mut B) -> Result<(), CpuError<B::Error>> {
    push_status_with_break(cpu, bus, true)
}

#[inline]
pub(crate) fn plp<B: Bus>(cpu: &mut CpuState, bus: &mut B) -> Result<(), CpuError<B::Error>> {
    let v = pop(cpu, bus)?;
    cpu.load_status_from_pull(v);
    Ok(())
}

#[inline]
pub(crate) fn pha<B: Bus>(cpu: &mut CpuState, bus: &mut B) -> Result<(), CpuError<B::Error>> {
    let a = cpu.a;
    push(cpu, bus, a)
}

#[inline]
pub(crate) fn pla<B: Bus>(cpu: &mut CpuState, bus: &mut B) -> Result<(), CpuError<B::Error>> {
    let v = pop(cpu, bus)?;
    cpu.a = v;
    update_zn(cpu, v);
    Ok(())
}

// ---------------------------------------------------------------------------
// Loads / Transfers
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn lda(cpu: &mut CpuState, v: u8) {
    cpu.a = v;
    update_zn(cpu, v);
}

#[inline]
pub(crate) fn ldx(cpu: &mut CpuState, v: u8) {
    cpu.x = v;
    update_zn(cpu, v);
}

#[inline]
pub(crate) fn ldy(cpu: &mut CpuState, v: u8) {
    cpu.y = v;
    update_zn(cpu, v);
}

#[inline]
pub(crate) fn tax(cpu: &mut CpuState) {
    cpu.x = cpu.a;
    update_zn(cpu, cpu.x);
}

#[inline]
pub(crate) fn tay(cpu: &mut CpuState) {
    cpu.y = cpu.a;
    update_zn(cpu, cpu.y);
}

#[inline]
pub(crate) fn txa(cpu: &mut CpuState) {
    cpu.a = cpu.x;
    update_zn(cpu, cpu.a);
}

#[inline]
pub(crate) fn tya(cpu: &mut CpuState) {
    cpu.a = cpu.y;
    update_zn(cpu, cpu.a);
}

#[inline]
pub(crate) fn tsx(cpu: &mut CpuState) {
    cpu.x = cpu.sp;
    update_zn(cpu, cpu.x);
}

#[inline]
pub(crate) fn txs(cpu: &mut CpuState) {
    cpu.sp = cpu.x;
}

// ---------------------------------------------------------------------------
// Logical / Bit
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn and(cpu: &mut CpuState, v: u8) {
    cpu.a &= v;
    update_zn(cpu, cpu.a);
}

#[inline]
pub(crate) fn ora(cpu: &mut CpuState, v: u8) {
    cpu.a |= v;
    update_zn(cpu, cpu.a);
}

#[inline]
pub(crate) fn eor(cpu: &mut CpuState, v: u8) {
    cpu.a ^= v;
    update_zn(cpu, cpu.a);
}

#[inline]
pub(crate) fn bit(cpu: &mut CpuState, v: u8) {
    set_flag(cpu, ZERO, (cpu.a & v) == 0);
    set_flag(cpu, NEGATIVE, (v & 0x80) != 0);
    set_flag(cpu, OVERFLOW, (v & 0x40) != 0);
}

// ---------------------------------------------------------------------------
// Increment / Decrement (register)
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn inx(cpu: &mut CpuState) {
    cpu.x = cpu.x.wrapping_add(1);
    update_zn(cpu, cpu.x);
}

#[inline]
pub(crate) fn iny(cpu: &mut CpuState) {
    cpu.y = cpu.y.wrapping_add(1);
    update_zn(cpu, cpu.y);
}

#[inline]
pub(crate) fn dex(cpu: &mut CpuState) {
    cpu.x = cpu.x.wrapping_sub(1);
    update_zn(cpu, cpu.x);
}

#[inline]
pub(crate) fn dey(cpu: &mut CpuState) {
    cpu.y = cpu.y.wrapping_sub(1);
    update_zn(cpu, cpu.y);
}

// ---------------------------------------------------------------------------
// Shifts / Rotates - Accumulator
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn asl_acc(cpu: &mut CpuState) {
    let v = cpu.a;
    set_flag(cpu, CARRY, (v & 0x80) != 0);
    cpu.a = v << 1;
    update_zn(cpu, cpu.a);
}

#[inline]
pub(crate) fn lsr_acc(cpu: &mut CpuState) {
    let v = cpu.a;
    set_flag(cpu, CARRY, (v & 0x01) != 0);
    cpu.a = v >> 1;
    update_zn(cpu, cpu.a);
}

#[inline]
pub(crate) fn rol_acc(cpu: &mut CpuState) {
    let v = cpu.a;
    let carry_in = if get_flag(cpu, CARRY) { 1 } else { 0 };
    set_flag(cpu, CARRY, (v & 0x80) != 0);
    cpu.a = (v << 1) | carry_in;
    update_zn(cpu, cpu.a);
}

#[inline]
pub(crate) fn ror_acc(cpu: &mut CpuState) {
    let v = cpu.a;
    let carry_in = if get_flag(cpu, CARRY) { 0x80 } else { 0 };
    set_flag(cpu, CARRY, (v & 0x01) != 0);
    cpu.a = (v >> 1) | carry_in;
    update_zn(cpu, cpu.a);
}

// ---------------------------------------------------------------------------
// ADC / SBC
// ---------------------------------------------------------------------------

/// Binary-mode ADC: returns `(result, carry_out, overflow)` without touching
/// flags, so the decimal path can reuse it for N/V derivation.
fn adc_binary(a: u8, v: u8, carry_in: bool) -> (u8, bool, bool) {
    let carry_in = if carry_in { 1u16 } else { 0 };
    let sum16 = a as u16 + v as u16 + carry_in;
    let result = sum16 as u8;
    let carry_out = sum16 > 0xFF;
    let overflow = ((!(a ^ v)) & (a ^ result) & 0x80) != 0;
    (result, carry_out, overflow)
}

/// ADC (binary mode): `w = A + operand + C`; C <- `w > 0xFF`; V from
/// signed overflow; NZ from the result.
#[inline]
pub(crate) fn adc(cpu: &mut CpuState, v: u8) {
    let carry_in = get_flag(cpu, CARRY);
    let (result, carry_out, overflow) = adc_binary(cpu.a, v, carry_in);
    set_flag(cpu, CARRY, carry_out);
    set_flag(cpu, OVERFLOW, overflow);
    cpu.a = result;
    update_zn(cpu, cpu.a);
}

/// SBC (binary mode): `ADC(~operand)` with the same carry-in semantics.
#[inline]
pub(crate) fn sbc(cpu: &mut CpuState, v: u8) {
    adc(cpu, !v);
}

/// ADC (decimal mode): nibble-corrected BCD addition. N, V, and Z are all
/// derived from the binary (uncorrected) sum, matching the documented NMOS
/// quirk that those flags reflect the intermediate binary computation
/// rather than the decimal-corrected result; only `A` itself takes the
/// decimal-corrected value.
pub(crate) fn adc_decimal(cpu: &mut CpuState, v: u8) {
    let a = cpu.a;
    let carry_in = get_flag(cpu, CARRY);
    let (binary_result, _binary_carry, binary_overflow) = adc_binary(a, v, carry_in);

    let mut lo = (a & 0x0F) + (v & 0x0F) + if carry_in { 1 } else { 0 };
    if lo > 9 {
        lo += 6;
    }
    let carry_from_lo = lo > 0x0F;
    let mut hi = (a >> 4) + (v >> 4) + if carry_from_lo { 1 } else { 0 };
    if hi > 9 {
        hi += 6;
    }
    let carry_out = hi > 0x0F;
    let result = (lo & 0x0F) | ((hi << 4) & 0xF0);

    set_flag(cpu, CARRY, carry_out);
    set_flag(cpu, OVERFLOW, binary_overflow);
    set_flag(cpu, NEGATIVE, (binary_result & 0x80) != 0);
    set_flag(cpu, ZERO, binary_result == 0);
    cpu.a = result;
}

/// SBC (decimal mode): nibble-corrected BCD subtraction. N/V/Z follow the
/// same binary-sum-derivation rule as [`adc_decimal`] (using the binary SBC
/// computation, `ADC(~operand)`); only `A` itself takes the
/// decimal-corrected value.
pub(crate) fn sbc_decimal(cpu: &mut CpuState, v: u8) {
    let a = cpu.a;
    let carry_in = get_flag(cpu, CARRY);
    let (binary_result, _binary_carry, binary_overflow) = adc_binary(a, !v, carry_in);

    let borrow_in: i16 = if carry_in { 0 } else { 1 };
    let mut lo = (a & 0x0F) as i16 - (v & 0x0F) as i16 - borrow_in;
    let borrow_from_lo = lo < 0;
    if borrow_from_lo {
        lo -= 6;
    }
    let mut hi = (a >> 4) as i16 - (v >> 4) as i16 - if borrow_from_lo { 1 } else { 0 };
    let no_borrow = hi >= 0;
    if !no_borrow {
        hi -= 6;
    }
    let result = ((lo & 0x0F) | ((hi << 4) & 0xF0)) as u8;

    set_flag(cpu, CARRY, no_borrow);
    set_flag(cpu, OVERFLOW, binary_overflow);
    set_flag(cpu, NEGATIVE, (binary_result & 0x80) != 0);
    set_flag(cpu, ZERO, binary_result == 0);
    cpu.a = result;
}

/// Dispatch ADC to the decimal or binary path per the live D flag.
#[inline]
pub(crate) fn adc_with_mode(cpu: &mut CpuState, v: u8) {
    if get_flag(cpu, DECIMAL) {
        adc_decimal(cpu, v);
    } else {
        adc(cpu, v);
    }
}

/// Dispatch SBC to the decimal or binary path per the live D flag.
#[inline]
pub(crate) fn sbc_with_mode(cpu: &mut CpuState, v: u8) {
    if get_flag(cpu, DECIMAL) {
        sbc_decimal(cpu, v);
    } else {
        sbc(cpu, v);
    }
}

// ---------------------------------------------------------------------------
// Compare
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn cmp_generic(cpu: &mut CpuState, reg: u8, v: u8) {
    set_flag(cpu, CARRY, reg >= v);
    let r = reg.wrapping_sub(v);
    update_zn(cpu, r);
}

// ---------------------------------------------------------------------------
// Read-Modify-Write (memory) choreography
// ---------------------------------------------------------------------------

/// Perform the canonical 6502 RMW sequence: read -> dummy write(old) ->
/// write(new). No cycles are charged here; the dispatcher already
/// charges the opcode's documented total up front.
pub(crate) fn rmw_memory<B: Bus, F>(
    cpu: &mut CpuState,
    bus: &mut B,
    addr: u16,
    transform: F,
) -> Result<u8, CpuError<B::Error>>
where
    F: FnOnce(&mut CpuState, u8) -> u8,
{
    let (lo, hi) = crate::bus::to_pair(addr);
    let old = bus.read(lo, hi).map_err(CpuError::BusFault)?;
    bus.write(lo, hi, old).map_err(CpuError::BusFault)?;
    let newv = transform(cpu, old);
    bus.write(lo, hi, newv).map_err(CpuError::BusFault)?;
    Ok(newv)
}

// ---------------------------------------------------------------------------
// Shifts / Rotates - Memory
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn asl_mem<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
    addr: u16,
) -> Result<(), CpuError<B::Error>> {
    let r = rmw_memory(cpu, bus, addr, |c, old| {
        set_flag(c, CARRY, (old & 0x80) != 0);
        old << 1
    })?;
    update_zn(cpu, r);
    Ok(())
}

#[inline]
pub(crate) fn lsr_mem<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
    addr: u16,
) -> Result<(), CpuError<B::Error>> {
    let r = rmw_memory(cpu, bus, addr, |c, old| {
        set_flag(c, CARRY, (old & 0x01) != 0);
        old >> 1
    })?;
    update_zn(cpu, r);
    Ok(())
}

#[inline]
pub(crate) fn rol_mem<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
    addr: u16,
) -> Result<(), CpuError<B::Error>> {
    let r = rmw_memory(cpu, bus, addr, |c, old| {
        let carry_in = if get_flag(c, CARRY) { 1 } else { 0 };
        set_flag(c, CARRY, (old & 0x80) != 0);
        (old << 1) | carry_in
    })?;
    update_zn(cpu, r);
    Ok(())
}

#[inline]
pub(crate) fn ror_mem<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
    addr: u16,
) -> Result<(), CpuError<B::Error>> {
    let r = rmw_memory(cpu, bus, addr, |c, old| {
        let carry_in = if get_flag(c, CARRY) { 0x80 } else { 0 };
        set_flag(c, CARRY, (old & 0x01) != 0);
        (old >> 1) | carry_in
    })?;
    update_zn(cpu, r);
    Ok(())
}

// ---------------------------------------------------------------------------
// INC / DEC memory
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn inc_mem<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
    addr: u16,
) -> Result<(), CpuError<B::Error>> {
    let r = rmw_memory(cpu, bus, addr, |_, old| old.wrapping_add(1))?;
    update_zn(cpu, r);
    Ok(())
}

#[inline]
pub(crate) fn dec_mem<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
    addr: u16,
) -> Result<(), CpuError<B::Error>> {
    let r = rmw_memory(cpu, bus, addr, |_, old| old.wrapping_sub(1))?;
    update_zn(cpu, r);
    Ok(())
}

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

/// Fetch the displacement byte, optionally apply the branch, and return
/// the extra cycles (0, 1, or 2) the dispatcher should add to the base cost.
pub(crate) fn branch_cond<B: Bus>(
    cpu: &mut CpuState,
    bus: &mut B,
    take: bool,
) -> Result<u32, CpuError<B::Error>> {
    let displacement = cpu.fetch_u8(bus)?;

    if !take {
        return Ok(0);
    }

    let (target, crossed) = crate::cpu::addressing::branch_target(cpu.pc, displacement);
    cpu.pc = target;
    Ok(if crossed { 2 } else { 1 })
}
