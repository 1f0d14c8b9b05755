use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing::{dispatcher::DefaultGuard, Dispatch, Level};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct TestWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl<'a> MakeWriter<'a> for TestWriter {
    type Writer = TestWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Info-level log output of the current thread, collected until dropped.
pub struct CapturedLogs {
    writer: TestWriter,
    _guard: DefaultGuard,
}

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.writer.buffer.lock().expect("log buffer")).into_owned()
    }
}

/// Routes this thread's events to a buffer. Only valid on a current-thread runtime.
pub fn capture_logs() -> CapturedLogs {
    let writer = TestWriter::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .finish();

    let guard = tracing::dispatcher::set_default(&Dispatch::new(subscriber));
    CapturedLogs {
        writer,
        _guard: guard,
    }
}
