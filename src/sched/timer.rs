//! Caminho do timer: relógio global, cobrança de ticks e preempção

use super::config::{AGING_PERIOD, MAX_PRIORITY};
use super::scheduler::Scheduler;
use super::task::{Channel, TaskState};
use crate::hal::Platform;
use crate::sys::Errno;

impl<P: Platform> Scheduler<P> {
    /// Avança o relógio global um tick
    ///
    /// Acorda quem dorme no canal de ticks e, a cada `AGING_PERIOD` ticks,
    /// roda a passada de aging. No kernel real só a CPU 0 chama isto.
    pub fn clock_tick(&self) {
        let now = self.ticks.inc() + 1;
        let mut pt = self.lock();
        pt.procs.wakeup(Channel::Ticks);
        if now % AGING_PERIOD == 0 {
            let aged = pt.procs.age();
            crate::ktrace!("(Timer) aging, tasks=", aged);
        }
    }

    /// Ticks desde o boot
    pub fn uptime(&self) -> u64 {
        self.ticks.get()
    }

    /// Handler da interrupção do timer (chamado em toda CPU)
    ///
    /// Cobra um tick da task corrente. Se ela tem quota e acabou de
    /// alcançá-la, é rebaixada para `MAX_PRIORITY` uma vez (a quota é
    /// zerada). Se ainda está RUNNING, cede a CPU.
    pub fn timer_interrupt(&self) {
        if self.platform.cpu_id() == 0 {
            self.clock_tick();
        }

        let Some(slot) = self.current_slot() else {
            return;
        };
        let mut pt = self.lock();
        if pt.procs.task(slot).state != TaskState::Running {
            return;
        }

        if pt.procs.task_mut(slot).accounting.charge_tick() {
            pt.procs.task_mut(slot).accounting.quota = 0;
            if !pt.procs.task(slot).is_pinned() {
                pt.procs.set_priority(slot, MAX_PRIORITY);
            }
            crate::kdebug!("(Timer) quota esgotada, pid=", pt.procs.task(slot).pid.as_u32());
        }

        let t = pt.procs.task_mut(slot);
        t.state = TaskState::Runnable;
        t.accounting.account_switch(false);
        self.sched(&mut pt);
    }

    /// Dorme por `n` ticks
    ///
    /// `EINTR` se a task for morta durante a espera.
    pub fn sleep_ticks(&self, n: u64) -> Result<(), Errno> {
        let cur = self.expect_current("sleep_ticks");
        let mut pt = self.lock();
        let start = self.ticks.get();
        while self.ticks.get() - start < n {
            if pt.procs.task(cur).is_killed() {
                return Err(Errno::EINTR);
            }
            self.sleep_locked(&mut pt, Channel::Ticks);
        }
        Ok(())
    }
}
