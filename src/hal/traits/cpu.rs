//! Trait de CPU

/// Abstração da CPU corrente
///
/// Todas as operações agem sobre a CPU que está executando a chamada.
pub trait CpuOps {
    /// Retorna ID da CPU atual (`0..NCPU`)
    ///
    /// Só é estável com interrupções desabilitadas: com interrupções ligadas a
    /// thread pode ser reescalonada para outra CPU entre a leitura e o uso.
    fn cpu_id(&self) -> usize;

    /// Interrupções estão habilitadas nesta CPU?
    fn interrupts_enabled(&self) -> bool;

    /// Desabilita interrupções (cli)
    fn disable_interrupts(&self);

    /// Habilita interrupções (sti)
    fn enable_interrupts(&self);

    /// Espera a próxima interrupção (hlt)
    ///
    /// Chamado pelo loop do scheduler quando não há nada RUNNABLE.
    fn halt(&self);
}
