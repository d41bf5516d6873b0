//! Fila de tasks por bucket de prioridade
//!
//! Um array de `BUCKET_COUNT` listas simplesmente encadeadas, montadas sobre
//! um pool fixo de `NPROC` nós. Cada nó aponta para um índice da tabela de
//! tasks; a fila não sabe nada sobre estados.
//!
//! Toda operação exige o lock da tabela de tasks (a fila vive dentro dele).

use crate::sched::config::{BUCKET_COUNT, BUCKET_WIDTH, NPROC};

/// Bucket de uma prioridade
#[inline]
pub const fn bucket_of(priority: u8) -> usize {
    (priority / BUCKET_WIDTH) as usize
}

#[derive(Clone, Copy)]
struct Link {
    in_use: bool,
    /// Índice na tabela de tasks
    slot: usize,
    next: Option<usize>,
}

impl Link {
    const FREE: Link = Link {
        in_use: false,
        slot: 0,
        next: None,
    };
}

#[derive(Clone, Copy)]
struct Bucket {
    head: Option<usize>,
    tail: Option<usize>,
}

/// Fila de execução
pub struct RunQueue {
    links: [Link; NPROC],
    buckets: [Bucket; BUCKET_COUNT],
    /// Nós livres, encadeados por `next`
    free_head: Option<usize>,
    free_count: usize,
    /// Slot da tabela → tem nó na fila?
    queued: [bool; NPROC],
}

impl RunQueue {
    pub const fn new() -> Self {
        let mut links = [Link::FREE; NPROC];
        let mut i = 0;
        while i + 1 < NPROC {
            links[i].next = Some(i + 1);
            i += 1;
        }
        Self {
            links,
            buckets: [Bucket {
                head: None,
                tail: None,
            }; BUCKET_COUNT],
            free_head: Some(0),
            free_count: NPROC,
            queued: [false; NPROC],
        }
    }

    /// Nós livres no pool
    pub fn free_links(&self) -> usize {
        self.free_count
    }

    pub fn contains(&self, slot: usize) -> bool {
        self.queued[slot]
    }

    /// Adiciona task ao fim do bucket da sua prioridade (FIFO, O(1))
    pub fn enqueue(&mut self, slot: usize, priority: u8) {
        if self.queued[slot] {
            panic!("enqueue: task already queued");
        }
        let node = match self.free_head {
            Some(n) => n,
            None => panic!("enqueue: link pool exhausted"),
        };
        self.free_head = self.links[node].next;
        self.free_count -= 1;

        self.links[node] = Link {
            in_use: true,
            slot,
            next: None,
        };

        let bucket = &mut self.buckets[bucket_of(priority)];
        match bucket.tail {
            Some(tail) => self.links[tail].next = Some(node),
            None => bucket.head = Some(node),
        }
        bucket.tail = Some(node);
        self.queued[slot] = true;
    }

    /// Remove a task do bucket de `priority` e devolve o nó ao pool
    ///
    /// `priority` tem que ser a prioridade com que a task foi enfileirada.
    pub fn dequeue(&mut self, slot: usize, priority: u8) {
        let b = bucket_of(priority);
        let mut prev: Option<usize> = None;
        let mut cur = self.buckets[b].head;

        while let Some(node) = cur {
            if self.links[node].slot == slot {
                break;
            }
            prev = Some(node);
            cur = self.links[node].next;
        }
        let node = match cur {
            Some(n) => n,
            None => panic!("dequeue: task not in its bucket"),
        };

        let next = self.links[node].next;
        match prev {
            Some(p) => self.links[p].next = next,
            None => self.buckets[b].head = next,
        }
        if self.buckets[b].tail == Some(node) {
            self.buckets[b].tail = prev;
        }

        self.links[node] = Link {
            next: self.free_head,
            ..Link::FREE
        };
        self.free_head = Some(node);
        self.free_count += 1;
        self.queued[slot] = false;
    }

    /// Slots do bucket `b` em ordem FIFO
    pub fn bucket(&self, b: usize) -> BucketIter<'_> {
        BucketIter {
            rq: self,
            cur: self.buckets[b].head,
        }
    }

    /// Todos os slots enfileirados, bucket a bucket, em ordem FIFO.
    ///
    /// Escreve em `out` e retorna quantos são.
    pub fn snapshot(&self, out: &mut [usize; NPROC]) -> usize {
        let mut n = 0;
        for b in 0..BUCKET_COUNT {
            for slot in self.bucket(b) {
                out[n] = slot;
                n += 1;
            }
        }
        n
    }
}

impl Default for RunQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterador sobre um bucket
pub struct BucketIter<'a> {
    rq: &'a RunQueue,
    cur: Option<usize>,
}

impl Iterator for BucketIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let node = self.cur?;
        let link = &self.rq.links[node];
        debug_assert!(link.in_use);
        self.cur = link.next;
        Some(link.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sched::config::MAX_PRIORITY;

    fn collect(rq: &RunQueue, b: usize) -> Vec<usize> {
        rq.bucket(b).collect()
    }

    #[test]
    fn bucket_index_is_priority_over_width() {
        assert_eq!(bucket_of(0), 0);
        assert_eq!(bucket_of(3), 0);
        assert_eq!(bucket_of(4), 1);
        assert_eq!(bucket_of(MAX_PRIORITY), BUCKET_COUNT - 1);
    }

    #[test]
    fn fifo_within_bucket() {
        let mut rq = RunQueue::new();
        rq.enqueue(3, 5);
        rq.enqueue(1, 4);
        rq.enqueue(2, 7);
        assert_eq!(collect(&rq, 1), vec![3, 1, 2]);
    }

    #[test]
    fn enqueue_dequeue_restores_pool_and_order() {
        let mut rq = RunQueue::new();
        rq.enqueue(0, 10);
        rq.enqueue(1, 10);
        let before = collect(&rq, bucket_of(10));
        let free = rq.free_links();

        rq.enqueue(5, 10);
        rq.dequeue(5, 10);

        assert_eq!(collect(&rq, bucket_of(10)), before);
        assert_eq!(rq.free_links(), free);
        assert!(!rq.contains(5));
    }

    #[test]
    fn dequeue_head_middle_and_tail_keeps_tail_usable() {
        let mut rq = RunQueue::new();
        for slot in 0..4 {
            rq.enqueue(slot, 20);
        }
        rq.dequeue(3, 20); // tail
        rq.dequeue(0, 20); // head
        rq.dequeue(1, 20); // meio
        rq.enqueue(7, 20);
        assert_eq!(collect(&rq, bucket_of(20)), vec![2, 7]);
        assert_eq!(rq.free_links(), NPROC - 2);
    }

    #[test]
    fn snapshot_walks_buckets_in_order() {
        let mut rq = RunQueue::new();
        rq.enqueue(0, 90);
        rq.enqueue(1, 2);
        rq.enqueue(2, 50);
        rq.enqueue(3, 1);
        let mut out = [0; NPROC];
        let n = rq.snapshot(&mut out);
        assert_eq!(&out[..n], &[1, 3, 2, 0]);
    }

    #[test]
    #[should_panic(expected = "dequeue: task not in its bucket")]
    fn dequeue_with_wrong_priority_is_fatal() {
        let mut rq = RunQueue::new();
        rq.enqueue(4, 8);
        rq.dequeue(4, 40);
    }

    #[test]
    #[should_panic(expected = "dequeue: task not in its bucket")]
    fn dequeue_missing_task_is_fatal() {
        let mut rq = RunQueue::new();
        rq.dequeue(0, 0);
    }

    #[test]
    #[should_panic(expected = "enqueue: task already queued")]
    fn double_enqueue_is_fatal() {
        let mut rq = RunQueue::new();
        rq.enqueue(4, 8);
        rq.enqueue(4, 60);
    }

    #[test]
    fn pool_covers_every_slot() {
        let mut rq = RunQueue::new();
        for slot in 0..NPROC {
            rq.enqueue(slot, (slot % 100) as u8);
        }
        assert_eq!(rq.free_links(), 0);
        for slot in 0..NPROC {
            rq.dequeue(slot, (slot % 100) as u8);
        }
        assert_eq!(rq.free_links(), NPROC);
    }
}
