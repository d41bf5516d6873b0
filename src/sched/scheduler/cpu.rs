//! Estado por-CPU do scheduler

use crate::sched::task::Context;
use crate::sync::CpuCell;

/// Estado privado de uma CPU
///
/// Cada campo só é lido ou escrito pela própria CPU com interrupções
/// desabilitadas (ver [`CpuCell`]). Com interrupções ligadas a thread pode
/// migrar de CPU no meio da leitura.
pub struct Cpu {
    /// Contexto salvo do loop do scheduler desta CPU
    pub scheduler: CpuCell<Context>,
    /// Slot da task que está rodando aqui
    pub current: CpuCell<Option<usize>>,
    /// Profundidade de `push_off`
    pub ncli: CpuCell<u32>,
    /// Interrupções estavam ligadas antes do primeiro `push_off`?
    pub intena: CpuCell<bool>,
}

impl Cpu {
    pub const fn new() -> Self {
        Self {
            scheduler: CpuCell::new(Context::NULL),
            current: CpuCell::new(None),
            ncli: CpuCell::new(0),
            intena: CpuCell::new(false),
        }
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
