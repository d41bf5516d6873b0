//! Contabilidade de Recursos (Accounting)
//!
//! Rastreia o consumo de CPU de cada task. `ticks` alimenta o aging e é
//! zerado a cada passada; `total_ticks` só cresce.

/// Estatísticas de uso de CPU de uma tarefa
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accounting {
    /// Ticks consumidos desde a última passada de aging
    pub ticks: u64,

    /// Ticks consumidos desde a criação
    pub total_ticks: u64,

    /// Limite de ticks antes do rebaixamento para `MAX_PRIORITY` (0 = sem limite)
    pub quota: u64,

    /// Número de trocas de contexto voluntárias (sleep, wait, yield)
    pub voluntary_switches: u64,

    /// Número de trocas de contexto involuntárias (timer)
    pub involuntary_switches: u64,
}

impl Accounting {
    /// Cria uma nova estrutura de contabilidade zerada
    pub const fn new() -> Self {
        Self {
            ticks: 0,
            total_ticks: 0,
            quota: 0,
            voluntary_switches: 0,
            involuntary_switches: 0,
        }
    }

    /// Cobra um tick de CPU da task corrente.
    ///
    /// Retorna `true` quando a quota acabou de ser atingida.
    pub fn charge_tick(&mut self) -> bool {
        self.ticks += 1;
        self.total_ticks += 1;
        self.quota != 0 && self.total_ticks >= self.quota
    }

    /// Incrementa contadores de troca de contexto
    pub fn account_switch(&mut self, voluntary: bool) {
        if voluntary {
            self.voluntary_switches += 1;
        } else {
            self.involuntary_switches += 1;
        }
    }
}
