//! Ferramentas de Debug para o Scheduler

use core::fmt;

use super::scheduler::Scheduler;
use super::task::TaskState;
use crate::debug::console::ConsoleWriter;
use crate::hal::Platform;
use crate::sys::{Errno, Pid};

/// Foto de uma task (para `ps`, testes e debug)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskInfo {
    pub pid: Pid,
    pub state: TaskState,
    pub priority: u8,
    pub parent: Option<Pid>,
    /// Ticks desde a última passada de aging
    pub ticks: u64,
    pub total_ticks: u64,
    pub quota: u64,
    pub voluntary_switches: u64,
    pub involuntary_switches: u64,
    pub killed: bool,
}

impl<P: Platform> Scheduler<P> {
    /// Foto da task `pid`
    pub fn task_info(&self, pid: Pid) -> Result<TaskInfo, Errno> {
        let pt = self.lock();
        let slot = pt.procs.find(pid).ok_or(Errno::ESRCH)?;
        let t = pt.procs.task(slot);
        Ok(TaskInfo {
            pid: t.pid,
            state: t.state,
            priority: t.priority,
            parent: t.parent,
            ticks: t.accounting.ticks,
            total_ticks: t.accounting.total_ticks,
            quota: t.accounting.quota,
            voluntary_switches: t.accounting.voluntary_switches,
            involuntary_switches: t.accounting.involuntary_switches,
            killed: t.is_killed(),
        })
    }

    /// Lista todas as tasks vivas: `pid estado prioridade nome`
    ///
    /// Copia a tabela sob o lock e escreve depois de soltá-lo.
    pub fn procdump(&self, w: &mut dyn fmt::Write) -> fmt::Result {
        let tasks = *self.lock().procs.tasks();
        for t in tasks.iter().filter(|t| t.state != TaskState::Unused) {
            writeln!(
                w,
                "{} {} {} {}",
                t.pid.as_u32(),
                t.state.as_str(),
                t.priority,
                t.name()
            )?;
        }
        Ok(())
    }

    /// `procdump` no console do kernel (Ctrl+P)
    pub fn dump_tasks(&self) {
        crate::ktrace!("--- (Sched) LISTA DE TAREFAS ---");
        let _ = self.procdump(&mut ConsoleWriter);
        crate::ktrace!("--- (Sched) FIM DO DUMP ---");
    }
}
