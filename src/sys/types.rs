//! Tipos fundamentais do sistema

/// Process ID
///
/// Atribuído de forma monotônica a partir de 1; nunca reutilizado enquanto a
/// tarefa existir. `Pid(0)` não identifica nenhuma tarefa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Pid(pub u32);

impl Pid {
    /// Primeira tarefa de usuário (initcode). Nunca pode sair.
    pub const INIT: Pid = Pid(1);

    pub const fn as_u32(self) -> u32 {
        self.0
    }
}
