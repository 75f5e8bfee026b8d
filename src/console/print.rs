//! Console print macros.
//!
//! Output is formatted into a fixed-size buffer and handed to the registered
//! sink in one piece, so lines from different contexts do not interleave.

use core::fmt::{self, Write};

use lazyinit::LazyInit;

use crate::MonitorResult;
use crate::error::MonitorError;
use crate::hal::Mutex;

static PRINT_LOCK: Mutex<()> = Mutex::new(());

/// Byte sink receiving formatted output (usually the UART `puts`).
static SINK: LazyInit<fn(&str)> = LazyInit::new();

/// Buffer size for formatting output before sending it to the sink.
const PRINT_BUFFER_SIZE: usize = 512;

/// Registers the output sink. Can only be done once.
pub fn set_sink(sink: fn(&str)) -> MonitorResult<()> {
    if SINK.is_inited() {
        anyhow::bail!(MonitorError::SinkAlreadySet);
    }
    SINK.init_once(sink);
    Ok(())
}

struct BufferedPrinter {
    buffer: [u8; PRINT_BUFFER_SIZE],
    pos: usize,
}

impl BufferedPrinter {
    const fn new() -> Self {
        Self {
            buffer: [0; PRINT_BUFFER_SIZE],
            pos: 0,
        }
    }

    fn flush(&mut self) {
        if self.pos > 0 {
            // Only whole characters are ever copied in, see `write_str`.
            if let (Ok(s), Some(sink)) = (core::str::from_utf8(&self.buffer[..self.pos]), SINK.get()) {
                sink(s);
            }
            self.pos = 0;
        }
    }
}

impl Write for BufferedPrinter {
    fn write_str(&mut self, mut s: &str) -> fmt::Result {
        while !s.is_empty() {
            let mut take = s.len().min(PRINT_BUFFER_SIZE - self.pos);
            while !s.is_char_boundary(take) {
                take -= 1;
            }
            if take == 0 {
                self.flush();
                continue;
            }
            self.buffer[self.pos..self.pos + take].copy_from_slice(&s.as_bytes()[..take]);
            self.pos += take;
            s = &s[take..];
        }
        Ok(())
    }
}

impl Drop for BufferedPrinter {
    fn drop(&mut self) {
        self.flush();
    }
}

pub fn _print(args: fmt::Arguments) {
    let _guard = PRINT_LOCK.lock();

    let mut printer = BufferedPrinter::new();
    // Printing must never panic.
    let _ = printer.write_fmt(args);
}

/// Simple console print operation.
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ({
        $crate::console::print::_print(format_args!($($arg)*))
    });
}

/// Simple console print operation with newline.
#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)));
}
