//! Recursos da plataforma pertencentes a uma task

use crate::hal::{MemoryOps, Platform, ResourceOps, SwitchOps};

/// Tudo o que uma task possui fora do escalonador
///
/// Vive no mesmo índice da tabela que o [`Task`](super::Task) correspondente.
/// Os campos são `Option` porque cada recurso nasce e morre em momentos
/// diferentes do ciclo de vida: a stack no `create`, o espaço no
/// `fork`/`launch`, arquivos e cwd saem no `exit` e o resto no reap.
pub struct TaskResources<P: Platform> {
    pub kstack: Option<<P as MemoryOps>::KernelStack>,
    pub space: Option<<P as MemoryOps>::AddressSpace>,
    /// Tamanho do espaço de usuário em bytes
    pub size: usize,
    pub files: Option<<P as ResourceOps>::Files>,
    pub cwd: Option<<P as ResourceOps>::Cwd>,
    pub trapframe: <P as SwitchOps>::TrapFrame,
}

impl<P: Platform> TaskResources<P> {
    pub fn empty() -> Self {
        Self {
            kstack: None,
            space: None,
            size: 0,
            files: None,
            cwd: None,
            trapframe: Default::default(),
        }
    }
}

impl<P: Platform> Default for TaskResources<P> {
    fn default() -> Self {
        Self::empty()
    }
}
