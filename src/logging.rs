use std::{io, sync::Once};

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::{self, MakeWriter};
use wasm_bindgen::JsValue;
use web_sys::console;

/// Buffers one formatted event and hands it to the browser console on drop,
/// routed by level so warnings and errors keep their console styling.
pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf);
        let line = JsValue::from_str(line.trim_end());
        match self.level {
            Level::ERROR => console::error_1(&line),
            Level::WARN => console::warn_1(&line),
            Level::INFO => console::info_1(&line),
            _ => console::debug_1(&line),
        }
    }
}

pub struct Console;

impl<'a> MakeWriter<'a> for Console {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buf: Vec::new(),
        }
    }
}

pub fn parse_level(level: Option<&str>) -> Level {
    level
        .and_then(|l| l.trim().parse::<Level>().ok())
        .unwrap_or(Level::WARN)
}

static INIT: Once = Once::new();

/// Installs the console subscriber. Only the first call takes effect.
pub fn init_logging(level: Level) {
    INIT.call_once(|| {
        let subscriber = fmt::Subscriber::builder()
            .with_max_level(level)
            .without_time()
            .with_target(false)
            .with_writer(Console)
            .finish();
        // Ignore error if a global subscriber is already set
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
