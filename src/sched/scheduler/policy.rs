//! Algoritmos de escalonamento
//!
//! Funções puras sobre a runqueue e a tabela de tasks. Nenhuma delas muda
//! estado: quem aplica a decisão é a [`ProcTable`](crate::sched::table::ProcTable).

use super::runqueue::RunQueue;
use crate::sched::config::{BUCKET_COUNT, IDLE_BUCKET};
use crate::sched::task::{Task, TaskState};

/// Melhor prioridade entre as tasks enfileiradas fora do bucket de idle
///
/// O primeiro bucket não vazio decide; dentro dele vale o menor número,
/// qualquer que seja o estado. Sem ninguém fora do idle, devolve 0.
pub fn best_active_priority(rq: &RunQueue, tasks: &[Task]) -> u8 {
    for b in 0..IDLE_BUCKET {
        let best = rq.bucket(b).map(|slot| tasks[slot].priority).min();
        if let Some(p) = best {
            return p;
        }
    }
    0
}

/// Próxima task a executar
///
/// Primeiro bucket que tiver alguma task RUNNABLE; dentro dele, a de menor
/// prioridade, com empate resolvido pela ordem FIFO.
pub fn select_next_runnable(rq: &RunQueue, tasks: &[Task]) -> Option<usize> {
    for b in 0..BUCKET_COUNT {
        let mut best: Option<usize> = None;
        for slot in rq.bucket(b) {
            let t = &tasks[slot];
            if t.state != TaskState::Runnable {
                continue;
            }
            match best {
                Some(cur) if tasks[cur].priority <= t.priority => {}
                _ => best = Some(slot),
            }
        }
        if best.is_some() {
            return best;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sched::config::{MAX_PRIORITY, NPROC};
    use crate::sys::Pid;

    fn setup(entries: &[(u8, TaskState)]) -> (RunQueue, [Task; NPROC]) {
        let mut tasks = [Task::EMPTY; NPROC];
        let mut rq = RunQueue::new();
        for (i, &(prio, state)) in entries.iter().enumerate() {
            tasks[i] = Task::embryo(Pid(10 + i as u32));
            tasks[i].priority = prio;
            tasks[i].state = state;
            rq.enqueue(i, prio);
        }
        (rq, tasks)
    }

    #[test]
    fn best_active_ignores_idle_bucket_and_state() {
        let (rq, tasks) = setup(&[
            (MAX_PRIORITY, TaskState::Runnable),
            (42, TaskState::Sleeping),
            (41, TaskState::Running),
        ]);
        assert_eq!(best_active_priority(&rq, &tasks), 41);
    }

    #[test]
    fn best_active_defaults_to_zero() {
        let (rq, tasks) = setup(&[(MAX_PRIORITY, TaskState::Runnable), (97, TaskState::Sleeping)]);
        assert_eq!(best_active_priority(&rq, &tasks), 0);
    }

    #[test]
    fn select_picks_lowest_number_then_fifo() {
        let (rq, tasks) = setup(&[
            (6, TaskState::Runnable),
            (5, TaskState::Runnable),
            (5, TaskState::Runnable),
            (1, TaskState::Sleeping),
        ]);
        assert_eq!(select_next_runnable(&rq, &tasks), Some(1));
    }

    #[test]
    fn select_skips_non_runnable_buckets() {
        let (rq, tasks) = setup(&[
            (0, TaskState::Running),
            (2, TaskState::Sleeping),
            (30, TaskState::Runnable),
        ]);
        assert_eq!(select_next_runnable(&rq, &tasks), Some(2));
    }

    #[test]
    fn select_none_without_runnable() {
        let (rq, tasks) = setup(&[(0, TaskState::Running), (50, TaskState::Sleeping)]);
        assert_eq!(select_next_runnable(&rq, &tasks), None);
    }

    #[test]
    fn selected_priority_is_global_minimum() {
        // Propriedade: nenhuma RUNNABLE tem número menor que a escolhida
        let prios = [77u8, 13, 13, 64, 12, 99, 40, 15];
        let entries: Vec<_> = prios
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let st = if i % 3 == 2 {
                    TaskState::Sleeping
                } else {
                    TaskState::Runnable
                };
                (p, st)
            })
            .collect();
        let (rq, tasks) = setup(&entries);
        let chosen = select_next_runnable(&rq, &tasks).map(|s| tasks[s].priority);
        let min = entries
            .iter()
            .filter(|e| e.1 == TaskState::Runnable)
            .map(|e| e.0)
            .min();
        assert_eq!(chosen, min);
    }
}
