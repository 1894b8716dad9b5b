//! Configuration for a turn context

/// Platform limit on reprompts played when the user stays silent
pub const MAX_NO_INPUT_PROMPTS: usize = 3;

/// What to do when a caller assigns more no-input prompts than allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Keep the first prompts up to the limit and log a warning
    #[default]
    Truncate,
    /// Fail the assignment
    Reject,
}

/// Static configuration for a [`TurnContext`](crate::TurnContext)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnConfig {
    /// Maximum number of no-input prompts kept for a turn
    pub max_no_input_prompts: usize,

    /// Overflow handling for no-input prompts
    pub no_input_overflow: OverflowPolicy,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            max_no_input_prompts: MAX_NO_INPUT_PROMPTS,
            no_input_overflow: OverflowPolicy::default(),
        }
    }
}

impl TurnConfig {
    /// Override the no-input prompt limit
    pub fn with_max_no_input_prompts(mut self, max: usize) -> Self {
        self.max_no_input_prompts = max;
        self
    }

    /// Override the overflow policy
    pub fn with_no_input_overflow(mut self, policy: OverflowPolicy) -> Self {
        self.no_input_overflow = policy;
        self
    }
}
