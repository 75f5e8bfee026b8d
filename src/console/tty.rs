//! Simple TTY line editor over a byte-level serial port.
//!
//! [`TtyConsole`] echoes input, handles backspace, swallows ANSI escape
//! sequences such as arrow keys, and hands complete lines to the monitor. Output translates
//! `\n` into `\r\n` the way a serial terminal expects.
//!
//! Ctrl-D on an empty line reports a read failure; the monitor simply
//! prompts again.

use alloc::string::String;
use core::fmt;

use super::Console;
use crate::config::monitor::MAX_LINE;

const CTRL_D: u8 = 0x04;
const BACKSPACE: u8 = 0x08;
const ESC: u8 = 0x1B;
const DEL: u8 = 0x7F;

/// Raw byte access to a serial device.
pub trait SerialIo {
    /// Returns the next received byte, if any. Must not block.
    fn getchar(&mut self) -> Option<u8>;

    fn putchar(&mut self, c: u8);

    fn puts(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.putchar(b);
        }
    }
}

/// ANSI escape sequence state machine.
#[derive(Clone, Copy, PartialEq)]
enum EscapeState {
    Normal,
    Escape,  // Got ESC (0x1B)
    Bracket, // Got ESC [
}

/// Line-editing console backed by a [`SerialIo`] device.
pub struct TtyConsole<S: SerialIo> {
    serial: S,
}

impl<S: SerialIo> TtyConsole<S> {
    pub fn new(serial: S) -> Self {
        Self { serial }
    }

    pub fn serial(&self) -> &S {
        &self.serial
    }

    fn getchar_blocking(&mut self) -> u8 {
        loop {
            if let Some(c) = self.serial.getchar() {
                return c;
            }
            core::hint::spin_loop();
        }
    }
}

impl<S: SerialIo> Console for TtyConsole<S> {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.serial.puts(prompt);

        let mut line = String::new();
        let mut esc_state = EscapeState::Normal;

        loop {
            let c = self.getchar_blocking();
            match esc_state {
                EscapeState::Normal => match c {
                    ESC => esc_state = EscapeState::Escape,
                    b'\r' | b'\n' => {
                        self.serial.puts("\r\n");
                        return Some(line);
                    }
                    BACKSPACE | DEL => {
                        if line.pop().is_some() {
                            self.serial.puts("\x08 \x08");
                        }
                    }
                    CTRL_D if line.is_empty() => {
                        self.serial.puts("\r\n");
                        return None;
                    }
                    c if c.is_ascii_graphic() || c == b' ' || c == b'\t' => {
                        if line.len() < MAX_LINE {
                            line.push(c as char);
                            self.serial.putchar(c);
                        }
                    }
                    _ => {}
                },
                EscapeState::Escape => {
                    esc_state = if c == b'[' {
                        EscapeState::Bracket
                    } else {
                        EscapeState::Normal
                    };
                }
                // Final byte of a CSI sequence; cursor keys are not supported.
                EscapeState::Bracket => {
                    if (0x40..=0x7e).contains(&c) {
                        esc_state = EscapeState::Normal;
                    }
                }
            }
        }
    }
}

impl<S: SerialIo> fmt::Write for TtyConsole<S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &b in s.as_bytes() {
            if b == b'\n' {
                self.serial.putchar(b'\r');
            }
            self.serial.putchar(b);
        }
        Ok(())
    }
}
