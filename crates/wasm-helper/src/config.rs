/// Settings fixed when a helper is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HelperConfig {
    /// Trace every operation at debug level, not just failures.
    pub verbose: bool,
}

impl HelperConfig {
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Verbosity defaults to the `verbose` cargo feature.
impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            verbose: cfg!(feature = "verbose"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_follows_feature_flag() {
        assert_eq!(HelperConfig::default().verbose, cfg!(feature = "verbose"));
        assert!(HelperConfig::default().with_verbose(true).verbose);
    }
}
