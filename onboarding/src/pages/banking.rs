//! Two-step page that links a bank account to the user's customer through
//! Financial Connections. Step 1 collects consent; entering step 2 with
//! consent given starts the link flow.

use std::sync::Arc;

use crate::bank_link::{self, BankLinkProvider, LinkedBankAccount};
use crate::client::PaymentApiClient;
use crate::session::SessionContext;
use crate::status::{dispatch, RemoteCallResult, UiStatus};
use crate::wizard::WizardState;

pub const BANKING_STEPS: usize = 2;
pub const LINK_STEP: usize = 2;

pub const ACCOUNT_INFO_FAILED: &str = "Failed to retrieve account information. Please try again.";
pub const CUSTOMER_CREATE_FAILED: &str = "Failed to create customer account. Please try again.";
pub const CUSTOMER_NOT_FOUND: &str = "Customer account not found. Please try again.";
pub const BANK_LINKED: &str = "Bank account linked successfully!";

pub struct BankingInformationPage {
    session: SessionContext,
    client: PaymentApiClient,
    provider: Arc<dyn BankLinkProvider>,
    pub wizard: WizardState,
    pub connect_account_id: Option<String>,
    pub customer_id: Option<String>,
    pub linked_account: Option<LinkedBankAccount>,
    pub status: UiStatus,
}

impl BankingInformationPage {
    pub fn new(
        session: SessionContext,
        client: PaymentApiClient,
        provider: Arc<dyn BankLinkProvider>,
    ) -> Self {
        Self {
            session,
            client,
            provider,
            wizard: WizardState::new(BANKING_STEPS),
            connect_account_id: None,
            customer_id: None,
            linked_account: None,
            status: UiStatus::new(),
        }
    }

    /// Fetch the user's connect/customer ids, creating the customer when the
    /// backend has none yet.
    pub async fn load(&mut self) {
        self.status.clear_message();

        let details = match dispatch(
            &mut self.status,
            "fetch account information",
            self.client.get_stripe_user_details(self.session.user_id),
        )
        .await
        {
            RemoteCallResult::Success(details) => details,
            RemoteCallResult::Failure(_) => {
                self.status.fail(ACCOUNT_INFO_FAILED);
                return;
            }
        };

        self.connect_account_id = details.connect_id;
        if details.customer_id.is_some() {
            self.customer_id = details.customer_id;
            return;
        }

        let Some(connect_id) = self.connect_account_id.clone() else {
            log::warn!("user {} has no connect account yet", self.session.user_id);
            self.status.fail(CUSTOMER_CREATE_FAILED);
            return;
        };

        match dispatch(
            &mut self.status,
            "create customer",
            self.client.create_customer(self.session.user_id, &connect_id),
        )
        .await
        {
            RemoteCallResult::Success(response) => self.customer_id = Some(response.customer_id),
            RemoteCallResult::Failure(_) => self.status.fail(CUSTOMER_CREATE_FAILED),
        }
    }

    pub fn set_consent(&mut self, given: bool) {
        self.wizard.consent_given = given;
    }

    pub async fn next_step(&mut self) {
        if self.wizard.advance().entered(LINK_STEP) && self.wizard.consent_given {
            self.link_bank_account().await;
        }
    }

    pub fn previous_step(&mut self) {
        self.wizard.retreat();
    }

    pub async fn link_bank_account(&mut self) {
        if !self.status.controls_enabled() {
            return;
        }
        let Some(customer_id) = self.customer_id.clone() else {
            self.status.fail(CUSTOMER_NOT_FOUND);
            return;
        };

        self.status.clear_message();
        let result = dispatch(
            &mut self.status,
            "link bank account",
            bank_link::link_bank_account(&self.client, self.provider.as_ref(), &customer_id),
        )
        .await;

        match result {
            RemoteCallResult::Success(linked) => {
                self.linked_account = Some(linked);
                self.status.alert(BANK_LINKED);
            }
            RemoteCallResult::Failure(error) => {
                self.status.fail(bank_link::link_failure_message(&error));
            }
        }
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.status.take_alert()
    }
}
