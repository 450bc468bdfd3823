use serde::Deserialize;
use svcmetric_core::error::SettingsError;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterceptorSettings {
    pub version: u32,

    #[serde(default)]
    pub interceptor: InterceptorSection,
}

impl Default for InterceptorSettings {
    fn default() -> Self {
        Self {
            version: 1,
            interceptor: InterceptorSection::default(),
        }
    }
}

impl InterceptorSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.version != 1 {
            return Err(SettingsError::UnsupportedVersion(self.version));
        }
        self.interceptor.validate()
    }
}

/// What happens when a metric handle panics inside `trace`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceFailurePolicy {
    /// Log and hand the delegate's outcome back untouched.
    #[default]
    Isolate,
    /// Log, then resume the panic in the caller.
    Propagate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterceptorSection {
    #[serde(default)]
    pub trace_failure: TraceFailurePolicy,

    /// 0 disables slow call logging.
    #[serde(default)]
    pub slow_call_warn_ms: u64,
}

impl Default for InterceptorSection {
    fn default() -> Self {
        Self {
            trace_failure: TraceFailurePolicy::Isolate,
            slow_call_warn_ms: 0,
        }
    }
}

const MAX_SLOW_CALL_WARN_MS: u64 = 3_600_000;

impl InterceptorSection {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.slow_call_warn_ms > MAX_SLOW_CALL_WARN_MS {
            return Err(SettingsError::Invalid(format!(
                "interceptor.slow_call_warn_ms must be at most {MAX_SLOW_CALL_WARN_MS}"
            )));
        }
        Ok(())
    }

    /// Slow call threshold in nanoseconds, if enabled.
    pub fn slow_call_threshold_nanos(&self) -> Option<u64> {
        (self.slow_call_warn_ms > 0).then(|| self.slow_call_warn_ms.saturating_mul(1_000_000))
    }
}
