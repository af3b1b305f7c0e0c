use thiserror::Error;

/// Input errors rejected synchronously by the cook-mode core. None of these
/// change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CookError {
    #[error("timer duration must be greater than zero")]
    InvalidDuration,
    #[error("servings must be greater than zero")]
    InvalidServings,
    #[error("recipe has no steps to cook")]
    EmptyRecipe,
    #[error("no cooking session is active")]
    NoActiveSession,
}
