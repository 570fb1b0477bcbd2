use crate::forms::{bank_details_form, profile_form, FormState};
use crate::routes::Route;
use crate::status::UiStatus;
use crate::wizard::WizardState;

pub const ONBOARDING_STEPS: usize = 5;
pub const BANK_DETAILS_STEP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    Consent,
    PersonalDetails,
    Address,
    Identity,
    PayoutBank,
}

impl OnboardingStep {
    pub fn from_index(step: usize) -> Option<Self> {
        match step {
            1 => Some(OnboardingStep::Consent),
            2 => Some(OnboardingStep::PersonalDetails),
            3 => Some(OnboardingStep::Address),
            4 => Some(OnboardingStep::Identity),
            5 => Some(OnboardingStep::PayoutBank),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            OnboardingStep::Consent => 1,
            OnboardingStep::PersonalDetails => 2,
            OnboardingStep::Address => 3,
            OnboardingStep::Identity => 4,
            OnboardingStep::PayoutBank => 5,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            OnboardingStep::Consent => "Terms of Service",
            OnboardingStep::PersonalDetails => "Personal Details",
            OnboardingStep::Address => "Address",
            OnboardingStep::Identity => "Identity Verification",
            OnboardingStep::PayoutBank => "Payout Bank Account",
        }
    }
}

/// Everything the onboarding wizard renders.
#[derive(Debug, Clone)]
pub struct OnboardingState {
    pub wizard: WizardState,
    pub profile_form: FormState,
    pub bank_form: FormState,
    /// Connect account created for this user, once known.
    pub account_id: Option<String>,
    /// Bank name resolved from the routing number; empty until resolved.
    pub bank_name: String,
    pub status: UiStatus,
    /// Set when the flow finished and the UI should move on.
    pub navigate_to: Option<Route>,
}

impl Default for OnboardingState {
    fn default() -> Self {
        Self {
            wizard: WizardState::new(ONBOARDING_STEPS),
            profile_form: FormState::new(profile_form()),
            bank_form: FormState::new(bank_details_form()),
            account_id: None,
            bank_name: String::new(),
            status: UiStatus::new(),
            navigate_to: None,
        }
    }
}

impl OnboardingState {
    pub fn current_step(&self) -> OnboardingStep {
        OnboardingStep::from_index(self.wizard.current_step()).unwrap_or(OnboardingStep::Consent)
    }

    pub fn can_go_back(&self) -> bool {
        !self.wizard.steps.is_first()
    }

    pub fn can_proceed(&self) -> bool {
        !self.wizard.steps.is_last() && self.status.controls_enabled()
    }

    pub fn progress_percent(&self) -> u8 {
        self.wizard.progress_percent()
    }
}
