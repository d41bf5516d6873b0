//! Trait de troca de contexto

use super::MemoryOps;
use crate::sched::task::Context;

/// Registradores de usuário salvos na entrada do kernel
pub trait TrapFrame: Clone + Default + Send {
    /// Define o valor que a syscall em curso devolve ao usuário
    /// (usado pelo fork: o filho vê 0).
    fn set_return_value(&mut self, value: usize);
}

/// Primitiva de troca de contexto
pub trait SwitchOps: MemoryOps {
    type TrapFrame: TrapFrame;

    /// Trap frame inicial da primeira task (entrada do initcode)
    fn init_trapframe(&self) -> Self::TrapFrame;

    /// Prepara o contexto inicial de uma task nova sobre sua stack de kernel.
    ///
    /// Na primeira ativação o contexto DEVE chamar
    /// [`Scheduler::forkret`](crate::sched::Scheduler::forkret) e em seguida
    /// retornar ao modo usuário pelo trap frame da task.
    fn new_context(&self, stack: &Self::KernelStack) -> Context;

    /// Salva o contexto corrente em `*old` e ativa `new`.
    ///
    /// Só retorna quando alguém trocar de volta para o contexto salvo em `*old`.
    ///
    /// # Safety
    ///
    /// - Interrupções desabilitadas
    /// - `old` aponta para um slot válido que sobrevive até a volta
    /// - `new` é um contexto salvo ainda não retomado
    unsafe fn switch(&self, old: *mut Context, new: Context);
}
