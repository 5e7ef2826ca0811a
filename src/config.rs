// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Planner settings.

/// Options of one solve.
///
/// ```
/// use lacam::PlannerConfig;
///
/// let config = PlannerConfig::default()
///     .with_verbose(1)
///     .with_threshold(Some(3))
///     .with_allow_following(true);
/// assert_eq!(config.threshold, Some(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlannerConfig {
    /// 0 is silent, 1 logs start and finish, 2 adds periodic progress.
    pub verbose: u8,

    /// Goal-stage advances needed to stop; `None` means every goal of every agent.
    pub threshold: Option<usize>,

    /// Allow an agent to enter a vertex another agent leaves in the same step.
    pub allow_following: bool,
}

impl PlannerConfig {
    pub fn with_verbose(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_threshold(mut self, threshold: Option<usize>) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_allow_following(mut self, allow_following: bool) -> Self {
        self.allow_following = allow_following;
        self
    }
}
