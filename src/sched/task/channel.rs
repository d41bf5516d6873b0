//! Canais de espera

use crate::sys::Pid;

/// Token opaco que identifica o evento pelo qual uma task dorme
///
/// O `wakeup` compara canais por igualdade; nada além disso.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Pai esperando filhos dessa task (wait/exit)
    Task(Pid),
    /// Contador global de ticks (sleep por N ticks)
    Ticks,
    /// Endereço de um objeto de kernel (locks que dormem, pipes, buffers...)
    Addr(usize),
}

impl Channel {
    /// Canal associado a um objeto qualquer do kernel
    pub fn of<T>(object: &T) -> Self {
        Self::Addr(object as *const T as usize)
    }
}
