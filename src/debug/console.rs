//! Console de diagnóstico.
//!
//! Destino único de todas as linhas de log e do `procdump`. O núcleo não conhece
//! a UART: quem faz o boot instala um [`ConsoleSink`] uma única vez e, a partir
//! daí, os macros `k*!` escrevem nele. Antes da instalação tudo é descartado.
//!
//! Sem `core::fmt` no caminho de log: o hex é formatado à mão em um buffer
//! de stack.

use core::fmt;
use spin::Once;

/// Destino de bytes do console (serial, framebuffer, buffer de teste...).
pub trait ConsoleSink: Sync {
    fn write_str(&self, s: &str);
}

static SINK: Once<&'static dyn ConsoleSink> = Once::new();

/// Instala o sink global. Retorna `false` se já havia um instalado.
pub fn install(sink: &'static dyn ConsoleSink) -> bool {
    let mut installed = false;
    SINK.call_once(|| {
        installed = true;
        sink
    });
    installed
}

#[inline]
pub fn emit_str(s: &str) {
    if let Some(sink) = SINK.get() {
        sink.write_str(s);
    }
}

#[inline]
pub fn emit_nl() {
    emit_str("\n");
}

/// Envia um valor u64 em hexadecimal (`0x` + 16 dígitos).
pub fn emit_hex(value: u64) {
    let buf = hex_digits(value);
    // Só contém ASCII.
    if let Ok(s) = core::str::from_utf8(&buf) {
        emit_str(s);
    }
}

fn hex_digits(value: u64) -> [u8; 18] {
    let mut buf = [0u8; 18];
    buf[0] = b'0';
    buf[1] = b'x';
    for i in 0..16 {
        let nibble = ((value >> ((15 - i) * 4)) & 0xF) as u8;
        buf[2 + i] = nibble_to_ascii(nibble);
    }
    buf
}

#[inline]
const fn nibble_to_ascii(n: u8) -> u8 {
    if n < 10 {
        b'0' + n
    } else {
        b'a' + (n - 10)
    }
}

/// Adaptador `fmt::Write` para o console (usado pelo `procdump` do ^P).
pub struct ConsoleWriter;

impl fmt::Write for ConsoleWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        emit_str(s);
        Ok(())
    }
}
