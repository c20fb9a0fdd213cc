#![doc = r#"
mos6502 - a cycle-accurate MOS 6502 CPU core.

This crate implements the documented instruction set of the MOS 6502 (no
illegal/undocumented opcodes beyond the 12 opcodes that halt the CPU
outright), decoupled from any particular memory map: callers supply
their own [`Bus`] implementation and the CPU drives it one `(low, high)`
addressed byte at a time.

Modules:
- bus: the [`Bus`] trait a caller implements to give the CPU memory.
- cpu: [`Cpu`], the CPU facade: construction, reset, interrupts, and
  single-step execution.
- error: [`CpuError`], the unified failure type `step`/`reset`/`nmi`/`irq`
  report.

In tests, a minimal flat-RAM bus is available under `crate::test_utils`.
"#]

pub mod bus;
pub mod cpu;
pub mod error;

pub use bus::Bus;
pub use cpu::Cpu;
pub use error::CpuError;

#[cfg(test)]
pub mod test_utils;
