/*!
cpu::mod - Public facade for the 6502 CPU core.

Module layout:

    state.rs     - `CpuState`: registers, flags, reset/stack/fetch primitives.
    addressing.rs- Per-addressing-mode effective-address/operand decoders.
    execute.rs   - ALU, stack, and register-transfer instruction semantics.
    cycles.rs    - The documented base-cycle table and HLT opcode set.
    dispatch/    - Per-instruction-family opcode handlers plus the
                   single-step orchestrator.

[`Cpu`] is the only public type this module exports; everything else is
crate-internal plumbing the facade composes on top of. A `Cpu` owns its
`CpuState` and its bus outright (the bus moves in at construction and
can be moved back out with `into_bus`), matching the single-threaded,
synchronous execution model the rest of the crate assumes.
*/

mod addressing;
mod cycles;
mod dispatch;
mod execute;
mod state;

use std::fmt;

use crate::bus::{to_pair, Bus};
use crate::error::CpuError;
use execute::{push_status_with_break, push_word, set_flag};
use state::{CpuState, IRQ_DISABLE, IRQ_VECTOR, NMI_VECTOR};

/// A cycle-accurate MOS 6502 CPU bound to a caller-supplied [`Bus`].
///
/// `Cpu` owns both its architectural state and its bus; there is no
/// shared ownership or interior mutability here. A caller that needs to
/// observe bus traffic from elsewhere puts that behind its own `Bus`
/// implementation.
pub struct Cpu<B: Bus> {
    state: CpuState,
    bus: B,
}

impl<B: Bus> Cpu<B> {
    /// Construct a CPU bound to `bus` and perform a Reset. Fails if the bus
    /// cannot service the reads the Reset vector fetch requires.
    pub fn new(mut bus: B) -> Result<Self, CpuError<B::Error>> {
        let mut state = CpuState::new();
        state.reset(&mut bus)?;
        Ok(Self { state, bus })
    }

    /// Return CPU state to its power-up condition and reload PC from the
    /// Reset vector (`$FFFC`/`$FFFD`). Clears the sticky halted condition.
    pub fn reset(&mut self) -> Result<(), CpuError<B::Error>> {
        self.state.reset(&mut self.bus)
    }

    /// Service a non-maskable interrupt: push PC and status (U set, B
    /// clear), set I, and load PC from the NMI vector (`$FFFA`/`$FFFB`).
    /// NMI ignores the I mask.
    pub fn nmi(&mut self) -> Result<(), CpuError<B::Error>> {
        service_interrupt(&mut self.state, &mut self.bus, NMI_VECTOR)
    }

    /// Service a maskable interrupt request. A no-op when I is set;
    /// otherwise identical to [`Cpu::nmi`] but using the IRQ/BRK vector
    /// (`$FFFE`/`$FFFF`).
    pub fn irq(&mut self) -> Result<(), CpuError<B::Error>> {
        if self.state.is_flag_set(IRQ_DISABLE) {
            return Ok(());
        }
        service_interrupt(&mut self.state, &mut self.bus, IRQ_VECTOR)
    }

    /// Overwrite PC from its two halves.
    pub fn set_pc(&mut self, lo: u8, hi: u8) {
        self.state.pc = u16::from_le_bytes([lo, hi]);
    }

    /// The low byte of PC.
    pub fn pcl(&self) -> u8 {
        self.state.pc.to_le_bytes()[0]
    }

    /// The high byte of PC.
    pub fn pch(&self) -> u8 {
        self.state.pc.to_le_bytes()[1]
    }

    /// Execute exactly one instruction.
    ///
    /// Returns the instruction's cycle cost and, on anything but ordinary
    /// completion, the failure that interrupted it: a latched halt (sticky
    /// until [`Cpu::reset`]), an invalid-opcode dispatch miss (PC left
    /// pointing at the offending opcode), or a bus fault. A CPU that is
    /// already halted when `step` is called performs no bus access at all
    /// and immediately reports `(0, Some(CpuError::Halted))`.
    pub fn step(&mut self) -> (u32, Option<CpuError<B::Error>>) {
        if self.state.halted {
            return (0, Some(CpuError::Halted));
        }
        match dispatch::step(&mut self.state, &mut self.bus) {
            Ok(cycles) if self.state.halted => (0, Some(CpuError::Halted)),
            Ok(cycles) => (cycles, None),
            Err(e) => (0, Some(e)),
        }
    }

    // -----------------------------------------------------------------
    // Escape-hatch accessors: inspection and test convenience, not part
    // of the instruction-level contract above.
    // -----------------------------------------------------------------

    pub fn a(&self) -> u8 {
        self.state.a
    }
    pub fn x(&self) -> u8 {
        self.state.x
    }
    pub fn y(&self) -> u8 {
        self.state.y
    }
    pub fn sp(&self) -> u8 {
        self.state.sp
    }
    pub fn pc(&self) -> u16 {
        self.state.pc
    }
    pub fn status(&self) -> u8 {
        self.state.status
    }
    pub fn is_halted(&self) -> bool {
        self.state.halted
    }
    pub fn bus(&self) -> &B {
        &self.bus
    }
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
    pub fn into_bus(self) -> B {
        self.bus
    }
}

/// Shared NMI/IRQ entry sequence: push PC, push status (U set, B clear),
/// set I, load PC from `vector`/`vector+1`.
fn service_interrupt<B: Bus>(
    state: &mut CpuState,
    bus: &mut B,
    vector: u16,
) -> Result<(), CpuError<B::Error>> {
    push_word(state, bus, state.pc)?;
    push_status_with_break(state, bus, false)?;
    set_flag(state, IRQ_DISABLE, true);
    let (lo_addr, hi_addr) = to_pair(vector);
    let vec_lo = bus.read(lo_addr, hi_addr).map_err(CpuError::BusFault)?;
    let (lo_addr2, hi_addr2) = to_pair(vector.wrapping_add(1));
    let vec_hi = bus.read(lo_addr2, hi_addr2).map_err(CpuError::BusFault)?;
    state.pc = u16::from_le_bytes([vec_lo, vec_hi]);
    Ok(())
}

impl<B: Bus> fmt::Display for Cpu<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.state.status;
        let bit = |mask: u8, c: char| if s & mask != 0 { c } else { '-' };
        let flags: String = [
            bit(state::NEGATIVE, 'N'),
            bit(state::OVERFLOW, 'V'),
            bit(state::DECIMAL, 'D'),
            bit(state::IRQ_DISABLE, 'I'),
            bit(state::ZERO, 'Z'),
            bit(state::CARRY, 'C'),
        ]
        .into_iter()
        .collect();
        write!(
            f,
            "PC:{:04X} A:{:02X} X:{:02X} Y:{:02X} P:{} S:{:02X}",
            self.state.pc, self.state.a, self.state.x, self.state.y, flags, self.state.sp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FlatBus;

    fn cpu_with_reset_at(target: u16) -> Cpu<FlatBus> {
        let mut bus = FlatBus::new();
        bus.set_reset_vector(target);
        Cpu::new(bus).unwrap()
    }

    #[test]
    fn new_performs_reset() {
        let cpu = cpu_with_reset_at(0x0400);
        assert_eq!(cpu.pc(), 0x0400);
        assert_eq!(cpu.sp(), 0xFF);
        assert_eq!(cpu.status(), 0);
    }

    #[test]
    fn set_pc_and_halves() {
        let mut cpu = cpu_with_reset_at(0x0400);
        cpu.set_pc(0x34, 0x12);
        assert_eq!(cpu.pc(), 0x1234);
        assert_eq!(cpu.pcl(), 0x34);
        assert_eq!(cpu.pch(), 0x12);
    }

    #[test]
    fn step_scenario_lda_immediate() {
        let mut cpu = cpu_with_reset_at(0x0400);
        cpu.bus_mut().poke(0x0400, 0xA9);
        cpu.bus_mut().poke(0x0401, 0x80);
        let (cycles, err) = cpu.step();
        assert!(err.is_none());
        assert_eq!(cycles, 2);
        assert_eq!(cpu.a(), 0x80);
        assert_eq!(cpu.pc(), 0x0402);
    }

    #[test]
    fn halt_then_reset_scenario() {
        let mut cpu = cpu_with_reset_at(0x0400);
        cpu.bus_mut().poke(0x0400, 0x02); // HLT alias
        let (cycles, err) = cpu.step();
        assert_eq!(cycles, 0);
        assert!(matches!(err, Some(CpuError::Halted)));
        assert!(cpu.is_halted());

        let (cycles2, err2) = cpu.step();
        assert_eq!(cycles2, 0);
        assert!(matches!(err2, Some(CpuError::Halted)));

        cpu.reset().unwrap();
        assert!(!cpu.is_halted());
        cpu.bus_mut().poke(0x0400, 0xEA); // NOP
        let (cycles3, err3) = cpu.step();
        assert!(err3.is_none());
        assert_eq!(cycles3, 2);
    }

    #[test]
    fn invalid_opcode_scenario() {
        let mut cpu = cpu_with_reset_at(0x0400);
        cpu.bus_mut().poke(0x0400, 0x9E);
        let (cycles, err) = cpu.step();
        assert_eq!(cycles, 0);
        match err {
            Some(CpuError::InvalidOpcode { pc, opcode }) => {
                assert_eq!(pc, 0x0400);
                assert_eq!(opcode, 0x9E);
            }
            _ => panic!("expected InvalidOpcode"),
        }
        assert_eq!(cpu.pc(), 0x0400);
    }

    #[test]
    fn nmi_pushes_state_and_loads_vector() {
        let mut cpu = cpu_with_reset_at(0x0400);
        cpu.bus_mut().poke(0xFFFA, 0x00);
        cpu.bus_mut().poke(0xFFFB, 0x90);
        cpu.nmi().unwrap();
        assert_eq!(cpu.pc(), 0x9000);
        assert!(cpu.status() & state::IRQ_DISABLE != 0);
        assert_eq!(cpu.sp(), 0xFC); // 3 bytes pushed (PCH, PCL, P)
    }

    #[test]
    fn irq_ignored_when_i_flag_set() {
        let mut cpu = cpu_with_reset_at(0x0400);
        cpu.bus_mut().poke(0x0400, 0x78); // SEI
        cpu.step();
        let sp_before = cpu.sp();
        cpu.irq().unwrap();
        assert_eq!(cpu.sp(), sp_before);
        assert_eq!(cpu.pc(), 0x0401);
    }

    #[test]
    fn irq_serviced_when_i_flag_clear() {
        let mut cpu = cpu_with_reset_at(0x0400); // reset leaves I clear
        cpu.bus_mut().poke(0xFFFE, 0x00);
        cpu.bus_mut().poke(0xFFFF, 0x80);
        cpu.irq().unwrap();
        assert_eq!(cpu.pc(), 0x8000);
    }

    #[test]
    fn display_renders_flag_string() {
        let mut cpu = cpu_with_reset_at(0x0400);
        let rendered = cpu.to_string();
        assert!(rendered.contains("PC:0400"));
        assert!(rendered.contains('-')); // reset leaves every flag clear
        cpu.bus_mut().poke(0x0400, 0x78); // SEI
        cpu.step();
        assert!(cpu.to_string().contains('I'));
    }
}
