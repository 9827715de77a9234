use std::{fmt, path::Path};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingError<'i> {
    pub problem: String,
    pub details: String,
    pub filename: &'i Path,
}

impl<'i> fmt::Display for LoadingError<'i> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.problem, self.details)
    }
}

/// A keyed lookup that came up empty. The context says where the lookup was
/// being made so the caller can decide how to report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupError {
    pub key: String,
    pub context: String,
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no value for '{}' in {}", self.key, self.context)
    }
}
