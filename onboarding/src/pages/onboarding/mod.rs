pub mod actions;
pub mod manager;
pub mod state;

#[cfg(test)]
mod tests;

pub use actions::OnboardingAction;
pub use manager::OnboardingManager;
pub use state::{OnboardingState, OnboardingStep, BANK_DETAILS_STEP, ONBOARDING_STEPS};
