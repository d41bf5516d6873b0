//! Estados de task

/// Estado de uma task
///
/// ```text
/// Unused → Embryo → Runnable ⇄ Running → {Runnable, Sleeping, Zombie}
/// Sleeping → Runnable
/// Zombie → Unused (reap pelo pai)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskState {
    /// Slot livre na tabela
    #[default]
    Unused,
    /// Sendo criada, ainda não escalonável
    Embryo,
    /// Bloqueada em um canal
    Sleeping,
    /// Pronta para executar
    Runnable,
    /// Executando em alguma CPU
    Running,
    /// Terminada, esperando o pai
    Zombie,
}

impl TaskState {
    /// Nome curto usado pelo procdump
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unused => "unused",
            Self::Embryo => "embryo",
            Self::Sleeping => "sleep ",
            Self::Runnable => "runble",
            Self::Running => "run   ",
            Self::Zombie => "zombie",
        }
    }

    /// Estados em que a task fica na runqueue
    pub const fn is_enqueued(self) -> bool {
        matches!(self, Self::Runnable | Self::Running | Self::Sleeping)
    }
}
