use crate::error::Error;

/// Receiver of user-facing, non-fatal warnings.
pub trait WarningSink {
    fn warn(&self, message: &str, cause: &Error);
}

/// Forwards warnings to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWarnings;

impl WarningSink for LogWarnings {
    fn warn(&self, message: &str, cause: &Error) {
        log::warn!("{message}: {cause}");
    }
}

impl<F> WarningSink for F
where
    F: Fn(&str, &Error),
{
    fn warn(&self, message: &str, cause: &Error) {
        self(message, cause)
    }
}
