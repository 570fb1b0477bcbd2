use std::mem;

use crate::lookup::LookupTicket;

#[derive(Debug, Clone)]
pub enum OnboardingAction {
    // Workflow control
    NextStep,
    PreviousStep,
    Reset,

    // Form input
    SetConsent(bool),
    UpdateProfileField { field: String, value: String },
    UpdateBankField { field: String, value: String },

    // Remote calls
    CreateConnectAccount,
    SubmitProfile,
    LookupRoutingNumber(LookupTicket),
    SubmitBankDetails,

    // Error handling
    ClearErrors,
}

impl OnboardingAction {
    pub fn description(&self) -> &'static str {
        match self {
            OnboardingAction::NextStep => "Advancing to next step",
            OnboardingAction::PreviousStep => "Going back to previous step",
            OnboardingAction::Reset => "Resetting onboarding",
            OnboardingAction::SetConsent(_) => "Updating terms-of-service consent",
            OnboardingAction::UpdateProfileField { .. } => "Updating profile field",
            OnboardingAction::UpdateBankField { .. } => "Updating bank field",
            OnboardingAction::CreateConnectAccount => "Creating connect account",
            OnboardingAction::SubmitProfile => "Submitting onboarding profile",
            OnboardingAction::LookupRoutingNumber(_) => "Looking up routing number",
            OnboardingAction::SubmitBankDetails => "Submitting payout bank details",
            OnboardingAction::ClearErrors => "Clearing errors",
        }
    }

    pub fn is_async(&self) -> bool {
        match self {
            OnboardingAction::CreateConnectAccount
            | OnboardingAction::SubmitProfile
            | OnboardingAction::LookupRoutingNumber(_)
            | OnboardingAction::SubmitBankDetails => true,

            OnboardingAction::NextStep
            | OnboardingAction::PreviousStep
            | OnboardingAction::Reset
            | OnboardingAction::SetConsent(_)
            | OnboardingAction::UpdateProfileField { .. }
            | OnboardingAction::UpdateBankField { .. }
            | OnboardingAction::ClearErrors => false,
        }
    }

    /// Two remote actions of the same kind are duplicates of each other; a
    /// second click while the first is still queued is dropped.
    pub fn duplicates(&self, other: &OnboardingAction) -> bool {
        self.is_async()
            && !matches!(self, OnboardingAction::LookupRoutingNumber(_))
            && mem::discriminant(self) == mem::discriminant(other)
    }
}
