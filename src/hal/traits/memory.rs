//! Trait de memória (stacks de kernel e espaços de endereçamento)

/// Contrato com o gerenciador de memória virtual
///
/// O núcleo de escalonamento nunca inspeciona um espaço de endereçamento:
/// apenas guarda, duplica, ativa e destrói.
pub trait MemoryOps {
    /// Espaço de endereçamento de usuário (page tables)
    type AddressSpace: Send;

    /// Stack de kernel de uma task
    type KernelStack: Send;

    /// Aloca uma stack de kernel. `None` se não há memória.
    fn alloc_kernel_stack(&self) -> Option<Self::KernelStack>;

    fn free_kernel_stack(&self, stack: Self::KernelStack);

    /// Cria o espaço da primeira task (initcode) e devolve seu tamanho em bytes.
    fn init_address_space(&self) -> Option<(Self::AddressSpace, usize)>;

    /// Copia `size` bytes de espaço de usuário para um espaço novo.
    ///
    /// Chamado com o lock global adquirido: não pode dormir.
    fn duplicate_address_space(
        &self,
        space: &Self::AddressSpace,
        size: usize,
    ) -> Option<Self::AddressSpace>;

    fn destroy_address_space(&self, space: Self::AddressSpace);

    /// Ativa o espaço de usuário de uma task (CR3 no x86_64)
    fn switch_user_space(&self, space: &Self::AddressSpace);

    /// Volta para o espaço só de kernel
    fn switch_kernel_space(&self);
}
