#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorPolicy {
    /// Stop at the first error
    ///
    /// Artifacts emitted before the failing entry are left in place
    Abort,
    /// Log and skip entries whose content cannot be decoded
    ///
    /// Errors in the container stream itself (header, file table, short reads) still abort,
    /// since the following entries can no longer be located
    Skip,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        ErrorPolicy::Abort
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Validation {
    /// Accept any magic and any declared offsets, warning on mismatches
    Lenient,
    /// Require the `FUFS` magic, and require every entry's declared offset to match where its
    /// payload actually starts
    Strict,
}

impl Default for Validation {
    fn default() -> Self {
        Validation::Lenient
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    error_policy: ErrorPolicy,
    validation: Validation,
    threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::default(),
            validation: Validation::default(),
            threads: 1,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_error_policy(&mut self, policy: ErrorPolicy) -> &mut Self {
        self.error_policy = policy;
        self
    }

    pub fn set_validation(&mut self, validation: Validation) -> &mut Self {
        self.validation = validation;
        self
    }

    /// Number of threads used to decode payloads
    ///
    /// 1 decodes on the calling thread. 0 uses one thread per CPU
    pub fn set_threads(&mut self, threads: usize) -> &mut Self {
        self.threads = threads;
        self
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    pub fn validation(&self) -> Validation {
        self.validation
    }

    pub fn threads(&self) -> usize {
        match self.threads {
            #[cfg(feature = "parallel")]
            0 => num_cpus::get(),
            #[cfg(not(feature = "parallel"))]
            0 => 1,
            n => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let config = Config::new();
        assert_eq!(config.error_policy(), ErrorPolicy::Abort);
        assert_eq!(config.validation(), Validation::Lenient);
        assert_eq!(config.threads(), 1);
    }

    #[test]
    fn zero_threads_means_all_cpus() {
        let mut config = Config::new();
        config.set_threads(0);
        assert!(config.threads() >= 1);
    }
}
