//! Helpers for asserting on rendered `tracing` output in unit tests.

use crate::format::RecordFormat;
use crate::logging::LogFormat;
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;

/// Writer that appends everything into a shared buffer.
#[derive(Debug, Clone, Default)]
pub(crate) struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CaptureWriter {
    pub(crate) fn contents(&self) -> String {
        let buffer = self.buffer.lock().expect("capture buffer lock");
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .expect("capture buffer lock")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` under a plain-text subscriber and return what it rendered.
///
/// The subscriber lets every level through, so filtering seen in the output
/// comes from the code under test.
pub(crate) fn capture(f: impl FnOnce()) -> String {
    let writer = CaptureWriter::default();
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer.clone())
        .with_ansi(false)
        .event_format(RecordFormat::new(LogFormat::Text));
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    writer.contents()
}
