//! Hardware Abstraction Layer (HAL)
//!
//! O núcleo de escalonamento é genérico sobre uma [`Platform`]. O kernel real
//! implementa os traits com x86_64 + mm + vfs; os testes de host implementam
//! com threads.

pub mod traits;

pub use traits::*;

/// Tudo o que o escalonador consome da plataforma
pub trait Platform: CpuOps + MemoryOps + ResourceOps + SwitchOps + Sync {}

impl<T> Platform for T where T: CpuOps + MemoryOps + ResourceOps + SwitchOps + Sync {}
