//! Hearth - núcleo de escalonamento do kernel.
//!
//! Ponto central de exportação dos módulos.
//!
//! O kernel que usa este crate fornece uma [`hal::Platform`] (troca de
//! contexto, memória virtual, arquivos) e guarda um único
//! [`sched::Scheduler`] em um `spin::Once`:
//!
//! ```ignore
//! static SCHED: spin::Once<Scheduler<X86Platform>> = spin::Once::new();
//!
//! SCHED.call_once(|| Scheduler::new(X86Platform::new()));
//! SCHED.get().unwrap().spawn_init()?;
//! // em cada CPU, depois do setup:
//! SCHED.get().unwrap().scheduler();
//! ```

#![cfg_attr(not(test), no_std)]

// --- Infraestrutura ---
pub mod debug; // Console e macros de log
pub mod hal; // Contratos com a plataforma
pub mod klib; // Utilitários internos (framework de testes)
pub mod sync; // Spinlock e estado por-CPU
pub mod sys; // Errno e identificadores

// --- Escalonador ---
pub mod sched;

pub use sched::Scheduler;
pub use sys::{Errno, Pid};
