//! Session configuration.

use qy_values::DEFAULT_MAX_HASH_BYTES;

/// What the rewrite pass does when a constant refers back to itself while it
/// is still being rewritten.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CyclePolicy {
    /// Leave the back-reference pointing at the original, unrewritten
    /// definition.
    #[default]
    PassThrough,
    /// Point the back-reference at the definition being produced, so
    /// recursive constants stay recursive after substitution.
    Rebind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Serialization budget per value; larger values are rejected.
    pub max_value_hash_bytes: usize,
    /// Maximum nesting of rewrite and evaluation steps.
    pub max_eval_depth: usize,
    pub cycle_policy: CyclePolicy,
}

impl SessionConfig {
    pub const DEFAULT_MAX_EVAL_DEPTH: usize = 10_000;

    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            max_value_hash_bytes: DEFAULT_MAX_HASH_BYTES,
            max_eval_depth: Self::DEFAULT_MAX_EVAL_DEPTH,
            cycle_policy: CyclePolicy::default(),
        }
    }
}

/// Builder for [`SessionConfig`].
#[derive(Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    #[must_use]
    pub fn max_value_hash_bytes(mut self, bytes: usize) -> Self {
        self.config.max_value_hash_bytes = bytes;
        self
    }

    #[must_use]
    pub fn max_eval_depth(mut self, depth: usize) -> Self {
        self.config.max_eval_depth = depth;
        self
    }

    #[must_use]
    pub fn cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.config.cycle_policy = policy;
        self
    }

    pub fn build(self) -> SessionConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.max_value_hash_bytes, 64 * 1024);
        assert_eq!(config.max_eval_depth, SessionConfig::DEFAULT_MAX_EVAL_DEPTH);
        assert_eq!(config.cycle_policy, CyclePolicy::PassThrough);
    }

    #[test]
    fn builder_overrides() {
        let config = SessionConfig::builder()
            .max_value_hash_bytes(128)
            .max_eval_depth(64)
            .cycle_policy(CyclePolicy::Rebind)
            .build();
        assert_eq!(
            config,
            SessionConfig {
                max_value_hash_bytes: 128,
                max_eval_depth: 64,
                cycle_policy: CyclePolicy::Rebind,
            }
        );
    }
}
