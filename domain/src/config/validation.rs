//! Configuration issues
//!
//! Settings that load fine but cannot drive a forecast run are reported as
//! structured issues with a severity, so callers decide whether to abort.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `runs_per_question` is zero.
    ZeroRuns,
    /// A concurrency limit is zero.
    ZeroConcurrency,
    /// The model name is not one of the built-in models; it is priced as the default.
    UnknownModel,
    /// The model name is empty.
    EmptyModelName,
    /// `timeout_seconds` is zero, so every call would time out.
    ZeroTimeout,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_severity() {
        let err = ConfigIssue::error(ConfigIssueCode::ZeroRuns, "no runs");
        assert!(err.is_error());
        let warn = ConfigIssue::warning(ConfigIssueCode::UnknownModel, "custom");
        assert_eq!(warn.severity, Severity::Warning);
        assert_eq!(warn.message, "custom");
    }
}
