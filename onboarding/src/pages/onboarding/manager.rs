use std::collections::VecDeque;
use std::sync::Arc;

use super::state::BANK_DETAILS_STEP;
use super::{OnboardingAction, OnboardingState};
use crate::bank_link::{self, BankLinkProvider};
use crate::client::PaymentApiClient;
use crate::forms::definitions::{bank_details_from_form, profile_from_form};
use crate::forms::fields;
use crate::lookup::{LookupTicket, RoutingNumberLookup};
use crate::pages::{check_routing_number, payout_failure_message, ACCOUNT_ID_MISSING, PAYOUT_BANK_ADDED};
use crate::routes::Route;
use crate::session::SessionContext;
use crate::status::{dispatch, RemoteCallResult};
use crate::util::ClientError;

pub const PROFILE_SUBMIT_FAILED: &str = "Something went wrong. Please try again later.";
pub const CONNECT_ACCOUNT_FAILED: &str = "Failed to create connect account. Please try again.";

pub struct OnboardingManager {
    // Single source of truth for the UI
    state: OnboardingState,

    session: SessionContext,
    client: PaymentApiClient,
    lookup: RoutingNumberLookup,
    provider: Arc<dyn BankLinkProvider>,

    // Sequential action queue
    pending_actions: VecDeque<OnboardingAction>,
    is_processing: bool,
}

impl OnboardingManager {
    pub fn new(
        session: SessionContext,
        client: PaymentApiClient,
        lookup: RoutingNumberLookup,
        provider: Arc<dyn BankLinkProvider>,
    ) -> Self {
        Self {
            state: OnboardingState::default(),
            session,
            client,
            lookup,
            provider,
            pending_actions: VecDeque::new(),
            is_processing: false,
        }
    }

    /// UI calls this; synchronous, only queues the action. A remote action
    /// already waiting in the queue is not queued a second time.
    pub fn dispatch(&mut self, action: OnboardingAction) {
        if self.pending_actions.iter().any(|queued| queued.duplicates(&action)) {
            log::debug!("Dropping duplicate action: {}", action.description());
            return;
        }
        log::debug!("Dispatching action: {}", action.description());
        self.pending_actions.push_back(action);
    }

    /// Processes one action from the queue.
    pub async fn update(&mut self) {
        if self.is_processing {
            return;
        }

        if let Some(action) = self.pending_actions.pop_front() {
            self.is_processing = true;
            log::debug!("Processing action: {}", action.description());

            self.handle_action(action).await;

            self.is_processing = false;
        }
    }

    /// Drain the queue, including actions queued by handlers along the way.
    pub async fn run_pending(&mut self) {
        while !self.pending_actions.is_empty() {
            self.update().await;
        }
    }

    pub fn state(&self) -> &OnboardingState {
        &self.state
    }

    pub fn has_pending_actions(&self) -> bool {
        !self.pending_actions.is_empty() || self.is_processing
    }

    pub fn clear_pending_actions(&mut self) {
        self.pending_actions.clear();
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.state.status.take_alert()
    }

    pub fn take_navigation(&mut self) -> Option<Route> {
        self.state.navigate_to.take()
    }

    async fn handle_action(&mut self, action: OnboardingAction) {
        match action {
            OnboardingAction::NextStep => {
                self.state.wizard.advance();
                log::info!("Advanced to step {}", self.state.wizard.current_step());
            }
            OnboardingAction::PreviousStep => {
                self.state.wizard.retreat();
                log::info!("Went back to step {}", self.state.wizard.current_step());
            }
            OnboardingAction::Reset => self.handle_reset(),

            OnboardingAction::SetConsent(given) => self.handle_consent(given),
            OnboardingAction::UpdateProfileField { field, value } => {
                if field == fields::TOS_CONSENT {
                    self.handle_consent(value == "true");
                } else {
                    self.state.profile_form.set(&field, value);
                }
            }
            OnboardingAction::UpdateBankField { field, value } => {
                self.handle_update_bank_field(&field, value);
            }

            OnboardingAction::CreateConnectAccount => self.handle_create_connect_account().await,
            OnboardingAction::SubmitProfile => self.handle_submit_profile().await,
            OnboardingAction::LookupRoutingNumber(ticket) => self.handle_lookup(ticket).await,
            OnboardingAction::SubmitBankDetails => self.handle_submit_bank_details().await,

            OnboardingAction::ClearErrors => self.state.status.clear_message(),
        }
    }
}

// Action handlers
impl OnboardingManager {
    fn handle_reset(&mut self) {
        self.pending_actions.clear();
        self.state = OnboardingState::default();
        log::info!("Onboarding reset");
    }

    /// Giving consent is what creates the connect account, once per session.
    fn handle_consent(&mut self, given: bool) {
        self.state.wizard.consent_given = given;
        self.state.profile_form.set_flag(fields::TOS_CONSENT, given);

        if given && self.state.account_id.is_none() {
            self.dispatch(OnboardingAction::CreateConnectAccount);
        }
    }

    fn handle_update_bank_field(&mut self, field: &str, value: String) {
        let ticket = (field == fields::ROUTING_NUMBER)
            .then(|| self.lookup.observe(&value))
            .flatten();

        if field == fields::ROUTING_NUMBER {
            self.state.bank_name.clear();
        }
        self.state.bank_form.set(field, value);

        if let Some(ticket) = ticket {
            self.dispatch(OnboardingAction::LookupRoutingNumber(ticket));
        }
    }

    async fn handle_create_connect_account(&mut self) {
        if self.state.account_id.is_some() {
            return;
        }

        let result = dispatch(
            &mut self.state.status,
            "create connect account",
            self.client.create_connect_account(self.session.user_id),
        )
        .await;

        match result {
            RemoteCallResult::Success(response) => {
                self.state.status.clear_failure();
                self.state
                    .profile_form
                    .set(fields::ACCOUNT_ID, response.account_id.clone());
                self.state.account_id = Some(response.account_id);
            }
            RemoteCallResult::Failure(_) => self.state.status.fail(CONNECT_ACCOUNT_FAILED),
        }
    }

    async fn handle_submit_profile(&mut self) {
        if !self.state.profile_form.is_valid() {
            self.state.profile_form.mark_all_touched();
            log::debug!("profile form invalid: {:?}", self.state.profile_form.errors());
            return;
        }

        self.state.status.clear_message();
        let profile = profile_from_form(&self.state.profile_form);
        let result = dispatch(
            &mut self.state.status,
            "submit onboarding profile",
            self.client.submit_onboarding(&profile),
        )
        .await;

        match result {
            RemoteCallResult::Success(_) => {
                self.state.wizard.jump_to(BANK_DETAILS_STEP);
            }
            RemoteCallResult::Failure(_) => self.state.status.fail(PROFILE_SUBMIT_FAILED),
        }
    }

    async fn handle_lookup(&mut self, ticket: LookupTicket) {
        check_routing_number(
            &self.lookup,
            &ticket,
            &mut self.state.bank_name,
            &mut self.state.status,
        )
        .await;
    }

    async fn handle_submit_bank_details(&mut self) {
        if !self.state.bank_form.is_valid() {
            self.state.bank_form.mark_all_touched();
            return;
        }
        let Some(account_id) = self.state.account_id.clone() else {
            self.state
                .status
                .fail(ClientError::MissingContext(ACCOUNT_ID_MISSING).to_string());
            return;
        };

        self.state.status.clear_message();
        let details = bank_details_from_form(&self.state.bank_form);
        let result = dispatch(
            &mut self.state.status,
            "add payout bank",
            bank_link::add_payout_account(&self.client, self.provider.as_ref(), &account_id, &details),
        )
        .await;

        match result {
            RemoteCallResult::Success(_) => {
                self.state.status.alert(PAYOUT_BANK_ADDED);
                self.state.navigate_to = Some(Route::AddBankInfo);
            }
            RemoteCallResult::Failure(error) => {
                self.state.status.fail(payout_failure_message(&error));
            }
        }
    }
}
