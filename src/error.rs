//! Errors for the steps around the UI: log file, raw mode, alternate screen.
//!
//! Request failures have their own type, `api::ApiError`.
use std::fmt::{Display, Formatter};

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T> = std::result::Result<T, DynError>;

/// A setup step that failed, and why.
#[derive(Debug)]
pub struct StepError {
    pub step: String,
    pub source: DynError,
}

impl Display for StepError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.step, self.source)
    }
}

impl std::error::Error for StepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

pub trait Context<T> {
    /// Name the failed step lazily, e.g. when it includes a path.
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T>;

    fn step(self, step: &str) -> Result<T>
    where
        Self: Sized,
    {
        self.with_ctx(|| step.to_string())
    }
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: Into<DynError>,
{
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            Box::new(StepError {
                step: f(),
                source: e.into(),
            }) as DynError
        })
    }
}
