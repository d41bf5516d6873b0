//! Sleep / Wakeup por canal
//!
//! Base de todas as esperas do kernel. Uma task dorme em um [`Channel`] e
//! continua na runqueue (o aging também alcança quem está bloqueado); o
//! `wakeup` do mesmo canal a torna RUNNABLE na melhor prioridade ativa.
//!
//! # Sem wakeup perdido
//!
//! Quem dorme adquire o lock da tabela ANTES de soltar o próprio lock, e quem
//! acorda precisa do lock da tabela para varrer. Entre checar a condição e
//! dormir não existe janela para um `wakeup` passar despercebido.

use super::scheduler::{PtableGuard, Scheduler};
use super::task::{Channel, TaskState};
use crate::hal::Platform;
use crate::sync::SpinlockGuard;

impl<P: Platform> Scheduler<P> {
    /// Dorme em `chan`, soltando `guard` atomicamente
    ///
    /// Readquire o lock do chamador antes de retornar. O lock da tabela de
    /// tasks não é alcançável por fora; quem já o segura usa
    /// `sleep_locked`.
    pub fn sleep<'a, T>(&'a self, chan: Channel, guard: SpinlockGuard<'a, T>) -> SpinlockGuard<'a, T> {
        let lock = SpinlockGuard::spinlock(&guard);
        let irq = SpinlockGuard::irq(&guard);

        let mut pt = self.lock();
        drop(guard);

        self.sleep_locked(&mut pt, chan);

        drop(pt);
        lock.lock(irq)
    }

    /// Dorme em `chan` com o lock da tabela já adquirido
    pub(crate) fn sleep_locked(&self, pt: &mut PtableGuard<'_, P>, chan: Channel) {
        let slot = self.expect_current("sleep");

        let t = pt.procs.task_mut(slot);
        t.chan = Some(chan);
        t.state = TaskState::Sleeping;
        t.accounting.account_switch(true);

        self.sched(pt);

        // Acordada (wakeup ou kill)
        pt.procs.task_mut(slot).chan = None;
    }

    /// Acorda todas as tasks dormindo em `chan`
    ///
    /// Retorna quantas acordaram.
    pub fn wakeup(&self, chan: Channel) -> usize {
        let mut pt = self.lock();
        pt.procs.wakeup(chan)
    }
}
