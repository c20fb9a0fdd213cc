/*!
test_utils.rs - A minimal flat 64 KiB RAM bus used only by this crate's own
test suite.

Per the crate's own scope, a concrete bus implementation is not part of
the public API: real callers own mapping, mirroring, and I/O decisions
themselves. This type exists purely so unit and integration tests have
something trivial to drive the CPU against.
*/

use crate::bus::{to_addr, Bus};
use std::fmt;

/// The flat bus never fails; this exists only to give it a concrete,
/// `std::error::Error`-compatible associated error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Infallible;

impl fmt::Display for Infallible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unreachable: flat test bus never fails")
    }
}

impl std::error::Error for Infallible {}

/// A flat 64 KiB RAM array addressed directly by `(low, high)`, with no
/// mapping, mirroring, or I/O side effects.
pub struct FlatBus {
    mem: [u8; 0x1_0000],
}

impl FlatBus {
    pub fn new() -> Self {
        Self { mem: [0; 0x1_0000] }
    }

    /// Directly set a byte, bypassing the `Bus` trait (useful for priming
    /// vectors and program images before a test begins stepping the CPU).
    pub fn poke(&mut self, addr: u16, value: u8) {
        self.mem[addr as usize] = value;
    }

    pub fn peek(&self, addr: u16) -> u8 {
        self.mem[addr as usize]
    }

    /// Load a byte slice starting at `addr`.
    pub fn load(&mut self, addr: u16, bytes: &[u8]) {
        for (offset, byte) in bytes.iter().enumerate() {
            self.mem[addr.wrapping_add(offset as u16) as usize] = *byte;
        }
    }

    /// Point the reset vector (`$FFFC/$FFFD`) at `target`.
    pub fn set_reset_vector(&mut self, target: u16) {
        let [lo, hi] = target.to_le_bytes();
        self.poke(0xFFFC, lo);
        self.poke(0xFFFD, hi);
    }

    /// Point the NMI vector (`$FFFA/$FFFB`) at `target`.
    pub fn set_nmi_vector(&mut self, target: u16) {
        let [lo, hi] = target.to_le_bytes();
        self.poke(0xFFFA, lo);
        self.poke(0xFFFB, hi);
    }

    /// Point the IRQ/BRK vector (`$FFFE/$FFFF`) at `target`.
    pub fn set_irq_vector(&mut self, target: u16) {
        let [lo, hi] = target.to_le_bytes();
        self.poke(0xFFFE, lo);
        self.poke(0xFFFF, hi);
    }
}

impl Default for FlatBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for FlatBus {
    type Error = Infallible;

    fn read(&mut self, low: u8, high: u8) -> Result<u8, Self::Error> {
        Ok(self.mem[to_addr(low, high) as usize])
    }

    fn write(&mut self, low: u8, high: u8, value: u8) -> Result<(), Self::Error> {
        self.mem[to_addr(low, high) as usize] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poke_peek_round_trip() {
        let mut bus = FlatBus::new();
        bus.poke(0x1234, 0xAB);
        assert_eq!(bus.peek(0x1234), 0xAB);
    }

    #[test]
    fn read_write_via_bus_trait() {
        let mut bus = FlatBus::new();
        bus.write(0x00, 0x02, 0x42).unwrap();
        assert_eq!(bus.read(0x00, 0x02).unwrap(), 0x42);
    }

    #[test]
    fn vector_setters_place_low_high_correctly() {
        let mut bus = FlatBus::new();
        bus.set_reset_vector(0xC123);
        assert_eq!(bus.peek(0xFFFC), 0x23);
        assert_eq!(bus.peek(0xFFFD), 0xC1);
    }
}
