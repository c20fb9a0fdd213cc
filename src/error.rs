/*!
error.rs - Unified failure type returned from `Cpu::step`.

Three kinds, matching the three ways an instruction can fail to complete
normally: a latched halt, a dispatch miss, and a bus that refused to
service a read or write. None of these are recovered locally; they are
all surfaced to the caller.
*/

use std::fmt;

/// Failure surfaced from [`crate::Cpu::step`] (and, for bus faults, from
/// [`crate::Cpu::reset`]/`nmi`/`irq`).
///
/// `E` is the associated `Error` type of the caller's [`crate::Bus`]
/// implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CpuError<E> {
    /// The CPU executed a HLT opcode and is latched; cleared only by `reset()`.
    Halted,
    /// No dispatch handler recognized the opcode. `pc` is the address the
    /// opcode was fetched from (PC is left unadvanced).
    InvalidOpcode { pc: u16, opcode: u8 },
    /// The bus returned `Err` while servicing a read or write.
    BusFault(E),
}

impl<E: fmt::Display> fmt::Display for CpuError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuError::Halted => write!(f, "cpu is halted (HLT opcode executed; reset required)"),
            CpuError::InvalidOpcode { pc, opcode } => {
                write!(f, "invalid opcode ${opcode:02X} fetched at ${pc:04X}")
            }
            CpuError::BusFault(e) => write!(f, "bus fault: {e}"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for CpuError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CpuError::BusFault(e) => Some(e),
            _ => None,
        }
    }
}
