//! Page controllers. Each one owns its wizard/form/status state and issues
//! remote calls through the dispatcher in [`crate::status`]; a UI renders the
//! public state and forwards user input to the methods.

pub mod add_bank;
pub mod banking;
pub mod deposit;
pub mod history;
pub mod onboarding;
pub mod withdraw;

pub use add_bank::AddBankPage;
pub use banking::BankingInformationPage;
pub use deposit::DepositPage;
pub use history::HistoryPage;
pub use onboarding::{OnboardingAction, OnboardingManager, OnboardingState, OnboardingStep};
pub use withdraw::WithdrawPage;

use crate::bank_link::TOKEN_CREATION_FAILED;
use crate::lookup::{LookupOutcome, LookupTicket, RoutingNumberLookup, ROUTING_LOOKUP_FAILED};
use crate::status::UiStatus;
use crate::util::ClientError;

pub const GENERIC_FAILURE: &str = "An error occurred. Please try again later.";
pub const INACTIVE_ACCOUNT: &str = "Inactive Account! Please contact support.";
pub const UNEXPECTED_ERROR: &str = "Unexpected error occurred";
pub const PAYOUT_BANK_ADDED: &str = "Payout bank added";
pub const ACCOUNT_ID_MISSING: &str = "Account ID";

/// Fixed message for a failed balance/deposit call; 404 is the one status
/// that gets its own wording.
pub fn transaction_failure_message(error: &ClientError) -> &'static str {
    if error.is_not_found() {
        INACTIVE_ACCOUNT
    } else {
        GENERIC_FAILURE
    }
}

/// Fixed message for a failed payout-bank submission.
pub fn payout_failure_message(error: &ClientError) -> String {
    match error {
        ClientError::Provider(e) => e.message_or(TOKEN_CREATION_FAILED),
        _ => UNEXPECTED_ERROR.to_string(),
    }
}

/// Resolve a routing-number ticket and apply the outcome to the page's
/// bank-name field and status. Superseded tickets leave both untouched.
pub(crate) async fn check_routing_number(
    lookup: &RoutingNumberLookup,
    ticket: &LookupTicket,
    bank_name: &mut String,
    status: &mut UiStatus,
) {
    if !lookup.is_current(ticket) {
        log::debug!("skipping stale routing lookup for {}", ticket.routing_number());
        return;
    }

    status.set_loading(true);
    status.clear_message();
    bank_name.clear();

    match lookup.resolve(ticket).await {
        LookupOutcome::Resolved { bank_name: name } => *bank_name = name,
        LookupOutcome::Superseded => {}
        outcome => status.fail(outcome.error_message().unwrap_or(ROUTING_LOOKUP_FAILED)),
    }

    status.set_loading(false);
}
