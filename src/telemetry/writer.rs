use std::io::{self, IsTerminal, Write};
use tracing_subscriber::fmt::{MakeWriter, TestWriter};

use crate::config::ConsoleStream;

/// Implements [`MakeWriter`] for the configured [`ConsoleStream`].
pub struct LoggingStreamMaker(ConsoleStream);

impl LoggingStreamMaker {
    #[must_use]
    pub fn new(variant: ConsoleStream) -> Self {
        Self(variant)
    }

    #[must_use]
    pub fn supports_color(&self) -> bool {
        match self.0 {
            ConsoleStream::Stdout => io::stdout().is_terminal(),
            ConsoleStream::Stderr => io::stderr().is_terminal(),
            ConsoleStream::TestWriter => false,
        }
    }
}

impl<'writer> MakeWriter<'writer> for LoggingStreamMaker {
    type Writer = BoxedWriter;

    fn make_writer(&'writer self) -> Self::Writer {
        match self.0 {
            ConsoleStream::Stdout => BoxedWriter::new(io::stdout()),
            ConsoleStream::Stderr => BoxedWriter::new(io::stderr()),
            ConsoleStream::TestWriter => BoxedWriter::new(TestWriter::new()),
        }
    }
}

/// Any [`Write`] object behind a box.
pub struct BoxedWriter(Box<dyn Write>);

impl BoxedWriter {
    fn new(write: impl Write + 'static) -> Self {
        Self(Box::new(write))
    }
}

impl Write for BoxedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}
