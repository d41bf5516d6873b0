//! Órfãos passam para o init quando o pai sai sem esperar

mod common;

use std::sync::{Arc, Mutex};

use common::*;
use hearth::sched::TaskState;
use hearth::Pid;

#[test]
fn init_reaps_zombie_grandchild_after_parent_exits() {
    let k = boot(2);
    let grandchild = Arc::new(Mutex::new(None));
    let reaped = Arc::new(Mutex::new(Vec::new()));

    let quick = register(k, |_| {});
    let g = grandchild.clone();
    let middle = register(k, move |k| {
        let pid = fork_into(k, quick).unwrap();
        *g.lock().unwrap() = Some(pid);
        // Sai sem wait, com o filho já ZOMBIE
        while k.task_info(pid).map(|i| i.state) != Ok(TaskState::Zombie) {
            let _ = k.sleep_ticks(1);
        }
    });

    let r = reaped.clone();
    let init = register(k, move |k| {
        fork_into(k, middle).unwrap();
        loop {
            match k.wait() {
                Ok(pid) => r.lock().unwrap().push(pid),
                Err(_) => {
                    let _ = k.sleep_ticks(1);
                }
            }
        }
    });
    start_init(k, init);

    wait_until(k, "both reaped", || {
        tick(k, 1);
        reaped.lock().unwrap().len() == 2
    });

    let gc = grandchild.lock().unwrap().unwrap();
    let reaped = reaped.lock().unwrap().clone();
    assert!(reaped.contains(&gc));
    assert!(reaped.contains(&Pid(2)));
    assert_eq!(k.task_info(gc), Err(hearth::Errno::ESRCH));
    assert_eq!(k.platform().live(), [1, 1, 0, 1]);
    k.platform().shutdown();
}
