//! # Synchronization Primitives
//!
//! Primitivas de sincronização para ambiente SMP.
//!
//! ## Hierarquia de Uso
//!
//! ```text
//! Spinlock   → Seções críticas curtas (não pode dormir)
//! CpuCell    → Estado privado de uma CPU (acesso com IRQs desligadas)
//! ```
//!
//! Primitivas que dormem (sleep/wakeup por canal) ficam em `sched::sleep`,
//! porque são construídas em cima do lock da tabela de tasks.
//!
//! ## Regras
//!
//! - **Spinlock**: Nunca reentrante; interrupções desligadas enquanto seguro
//! - **Ordem de Lock**: lock da tabela de tasks por último

/// Células por-CPU e contadores
pub mod atomic;

/// Spinlock (busy-wait, não dorme)
pub mod spinlock;

pub use atomic::{AtomicCounter, CpuCell};
pub use spinlock::{IrqControl, Spinlock, SpinlockGuard};
