//! Process Control Block

use super::accounting::Accounting;
use super::channel::Channel;
use super::context::Context;
use super::state::TaskState;
use crate::sched::config::{BOOTSTRAP_PIDS, MAX_PRIORITY, TASK_NAME_LEN};
use crate::sys::Pid;
use bitflags::bitflags;

bitflags! {
    /// Flags de uma task
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TaskFlags: u8 {
        /// Kill pedido; a task sai no próximo ponto de checagem
        const KILLED = 1 << 0;
        /// Identidade de bootstrap: prioridade presa em MAX_PRIORITY
        const PINNED = 1 << 1;
    }
}

/// Descritor de task
///
/// Só contém estado de escalonamento. Recursos que pertencem à plataforma
/// (stack de kernel, espaço de endereçamento, arquivos) ficam em
/// [`TaskResources`](crate::sched::task::TaskResources), no mesmo índice.
#[derive(Debug, Clone, Copy)]
pub struct Task {
    /// ID único (`Pid(0)` enquanto `Unused`)
    pub pid: Pid,
    /// Estado atual
    pub state: TaskState,
    /// Prioridade (0 = roda primeiro, MAX_PRIORITY = background)
    pub priority: u8,
    /// Quem criou esta task (referência fraca, só identidade)
    pub parent: Option<Pid>,
    /// Canal de espera (só enquanto `Sleeping`)
    pub chan: Option<Channel>,
    pub flags: TaskFlags,
    /// Contexto de kernel salvo
    pub context: Context,
    /// Estatísticas de contabilidade
    pub accounting: Accounting,
    /// Nome (debug)
    pub name: [u8; TASK_NAME_LEN],
}

impl Task {
    /// Slot livre
    pub const EMPTY: Task = Task {
        pid: Pid(0),
        state: TaskState::Unused,
        priority: 0,
        parent: None,
        chan: None,
        flags: TaskFlags::empty(),
        context: Context::NULL,
        accounting: Accounting::new(),
        name: [0; TASK_NAME_LEN],
    };

    /// Ocupa o slot como `Embryo` com a identidade dada
    pub fn embryo(pid: Pid) -> Self {
        let mut flags = TaskFlags::empty();
        if BOOTSTRAP_PIDS.contains(&pid.as_u32()) {
            flags |= TaskFlags::PINNED;
        }
        Self {
            pid,
            state: TaskState::Embryo,
            flags,
            ..Self::EMPTY
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.flags.contains(TaskFlags::PINNED)
    }

    pub fn is_killed(&self) -> bool {
        self.flags.contains(TaskFlags::KILLED)
    }

    /// Prioridade que a task recebe ao virar RUNNABLE (fork/wakeup).
    pub fn promotion(&self, best: u8) -> u8 {
        if self.is_pinned() {
            MAX_PRIORITY
        } else {
            best
        }
    }

    /// Prioridade depois de uma passada de aging
    ///
    /// `prioridade + ticks / DECAY_DIVISOR`, saturada em `MAX_PRIORITY`.
    pub fn aged_priority(&self) -> u8 {
        if self.is_pinned() {
            return MAX_PRIORITY;
        }
        let penalty = self.accounting.ticks / crate::sched::config::DECAY_DIVISOR;
        let aged = (self.priority as u64).saturating_add(penalty);
        aged.min(MAX_PRIORITY as u64) as u8
    }

    /// Copia o nome (truncado em `TASK_NAME_LEN` bytes)
    pub fn set_name(&mut self, name: &str) {
        self.name = [0; TASK_NAME_LEN];
        let bytes = name.as_bytes();
        let len = bytes.len().min(TASK_NAME_LEN);
        self.name[..len].copy_from_slice(&bytes[..len]);
    }

    pub fn name(&self) -> &str {
        let len = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(TASK_NAME_LEN);
        // Truncar no meio de um caractere UTF-8 deixa um prefixo válido
        match core::str::from_utf8(&self.name[..len]) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&self.name[..e.valid_up_to()]).unwrap_or(""),
        }
    }
}
