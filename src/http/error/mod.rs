use error_stack::{Context, Report};
use tracing_error::SpanTrace;

use crate::types::ErrorKind;
use crate::util::validator::FieldMessages;

mod impls;

pub type Result<T> = std::result::Result<T, Error>;

/// Error returned by every HTTP handler.
///
/// The kind decides the status code and the public message. The
/// report and span trace are only ever logged.
pub struct Error {
    report: Report<ErrorKind>,
    trace: SpanTrace,
}

impl Error {
    #[must_use]
    pub fn from_context(kind: ErrorKind, context: impl Context) -> Self {
        Self::from_report(kind, Report::new(context))
    }

    #[must_use]
    pub fn from_report(kind: ErrorKind, report: Report<impl Context>) -> Self {
        Self {
            report: report.change_context(kind),
            trace: SpanTrace::capture(),
        }
    }
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        *self.report.current_context()
    }

    #[must_use]
    pub fn report(&self) -> &Report<ErrorKind> {
        &self.report
    }

    /// Validation messages collected somewhere down the report.
    #[must_use]
    pub fn fields(&self) -> Option<&FieldMessages> {
        self.report.downcast_ref::<FieldMessages>()
    }

    #[must_use]
    pub fn downcast_ref<F: Context>(&self) -> Option<&F> {
        self.report.downcast_ref::<F>()
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind())
            .field("report", &self.report)
            .field("trace", &self.trace)
            .finish()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", self.kind().code())?;
        writeln!(f, "{:?}", self.report)?;
        std::fmt::Display::fmt(&self.trace, f)
    }
}
