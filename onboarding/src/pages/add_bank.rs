use std::sync::Arc;

use crate::bank_link::{self, BankLinkProvider};
use crate::client::PaymentApiClient;
use crate::forms::definitions::bank_details_from_form;
use crate::forms::{bank_details_form, fields, FormState};
use crate::lookup::RoutingNumberLookup;
use crate::pages::{check_routing_number, payout_failure_message, ACCOUNT_ID_MISSING, PAYOUT_BANK_ADDED};
use crate::routes::Route;
use crate::session::SessionContext;
use crate::status::{dispatch, RemoteCallResult, UiStatus};
use crate::util::ClientError;

pub const ACCOUNT_ID_FAILED: &str = "Failed to retrieve account ID";

/// Stand-alone payout bank form for users who skipped it during onboarding.
pub struct AddBankPage {
    session: SessionContext,
    client: PaymentApiClient,
    lookup: RoutingNumberLookup,
    provider: Arc<dyn BankLinkProvider>,
    pub account_id: Option<String>,
    pub bank_form: FormState,
    pub bank_name: String,
    pub status: UiStatus,
    pub navigate_to: Option<Route>,
}

impl AddBankPage {
    pub fn new(
        session: SessionContext,
        client: PaymentApiClient,
        lookup: RoutingNumberLookup,
        provider: Arc<dyn BankLinkProvider>,
    ) -> Self {
        Self {
            session,
            client,
            lookup,
            provider,
            account_id: None,
            bank_form: FormState::new(bank_details_form()),
            bank_name: String::new(),
            status: UiStatus::new(),
            navigate_to: None,
        }
    }

    pub async fn load(&mut self) {
        match dispatch(
            &mut self.status,
            "fetch connect account id",
            self.client.get_stripe_user_details(self.session.user_id),
        )
        .await
        {
            RemoteCallResult::Success(details) => {
                self.status.clear_failure();
                self.account_id = details.connect_id;
            }
            RemoteCallResult::Failure(_) => self.status.fail(ACCOUNT_ID_FAILED),
        }
    }

    /// Apply one field edit; a complete routing number is looked up before
    /// this returns.
    pub async fn update_field(&mut self, field: &str, value: impl Into<String>) {
        let value = value.into();
        if field != fields::ROUTING_NUMBER {
            self.bank_form.set(field, value);
            return;
        }

        let ticket = self.lookup.observe(&value);
        self.bank_name.clear();
        self.bank_form.set(field, value);

        if let Some(ticket) = ticket {
            check_routing_number(&self.lookup, &ticket, &mut self.bank_name, &mut self.status).await;
        }
    }

    pub async fn submit_bank_details(&mut self) {
        if !self.status.controls_enabled() {
            return;
        }
        if !self.bank_form.is_valid() {
            self.bank_form.mark_all_touched();
            return;
        }
        let Some(account_id) = self.account_id.clone() else {
            self.status
                .fail(ClientError::MissingContext(ACCOUNT_ID_MISSING).to_string());
            return;
        };

        self.status.clear_message();
        let details = bank_details_from_form(&self.bank_form);
        let result = dispatch(
            &mut self.status,
            "add payout bank",
            bank_link::add_payout_account(&self.client, self.provider.as_ref(), &account_id, &details),
        )
        .await;

        match result {
            RemoteCallResult::Success(_) => {
                self.status.alert(PAYOUT_BANK_ADDED);
                self.navigate_to = Some(Route::AddBankInfo);
            }
            RemoteCallResult::Failure(error) => self.status.fail(payout_failure_message(&error)),
        }
    }
}
