use crate::client::PaymentApiClient;
use crate::forms::{amount_form, exceeds_balance, fields, FieldError, FormState};
use crate::pages::transaction_failure_message;
use crate::session::SessionContext;
use crate::status::{dispatch, RemoteCallResult, UiStatus};
use crate::util::{ClientError, MinorUnits};

pub const INVALID_AMOUNT: &str = "Please enter a valid amount.";
pub const EXCEEDS_BALANCE: &str = "Deposit amount exceeds available balance.";
pub const INVALID_AMOUNT_OR_SESSION: &str = "Please enter a valid amount or log in again.";
pub const DEPOSIT_INITIATED: &str = "Deposit initiated successfully!";

pub struct DepositPage {
    session: SessionContext,
    client: PaymentApiClient,
    pub form: FormState,
    /// Last balance fetched from the backend.
    pub balance: Option<MinorUnits>,
    pub show_balance: bool,
    pub status: UiStatus,
}

impl DepositPage {
    pub fn new(session: SessionContext, client: PaymentApiClient) -> Self {
        Self {
            session,
            client,
            form: FormState::new(amount_form()),
            balance: None,
            show_balance: true,
            status: UiStatus::new(),
        }
    }

    pub async fn load(&mut self) {
        self.refresh_balance().await;
    }

    pub async fn refresh_balance(&mut self) {
        let result = dispatch(
            &mut self.status,
            "fetch balance",
            self.client.fetch_balance(self.session.user_id),
        )
        .await;

        match result {
            RemoteCallResult::Success(response) => {
                self.status.clear_failure();
                self.balance = Some(response.balance);
                // The balance rule depends on this value.
                self.revalidate_amount();
            }
            RemoteCallResult::Failure(error) => self.handle_error(&error),
        }
    }

    /// Balance in major units, `None` while unknown or hidden.
    pub fn balance_display(&self) -> Option<String> {
        if !self.show_balance {
            return None;
        }
        self.balance.map(MinorUnits::to_major_string)
    }

    pub fn toggle_balance_visibility(&mut self) {
        self.show_balance = !self.show_balance;
    }

    pub fn set_amount(&mut self, value: impl Into<String>) {
        self.form.set(fields::AMOUNT, value);
        match self.revalidate_amount() {
            Some(FieldError::ExceedsBalance) => self.status.fail(EXCEEDS_BALANCE),
            Some(_) => self.status.fail(INVALID_AMOUNT),
            None => self.status.clear_message(),
        }
    }

    pub fn amount(&self) -> Option<MinorUnits> {
        MinorUnits::parse_major(self.form.value(fields::AMOUNT)).ok()
    }

    /// Re-evaluate the amount field, including the balance rule. A value the
    /// form accepts but that does not fit in minor units is not numeric.
    fn revalidate_amount(&mut self) -> Option<FieldError> {
        let cross = match self.amount() {
            Some(amount) => exceeds_balance(amount, self.balance),
            None if self.form.value(fields::AMOUNT).trim().is_empty() => None,
            None => Some(FieldError::NotNumeric),
        };
        self.form.set_external_error(fields::AMOUNT, cross);
        self.form.field(fields::AMOUNT).and_then(|f| f.error.clone())
    }

    pub async fn deposit_funds(&mut self) {
        if !self.status.controls_enabled() {
            return;
        }
        let Some(amount) = self.amount().filter(|_| self.form.is_valid()) else {
            self.form.mark_all_touched();
            self.status.fail(INVALID_AMOUNT_OR_SESSION);
            return;
        };

        let result = dispatch(
            &mut self.status,
            "deposit",
            self.client.deposit(self.session.user_id, amount),
        )
        .await;

        match result {
            RemoteCallResult::Success(_) => {
                self.status.succeed(DEPOSIT_INITIATED);
                self.refresh_balance().await;
            }
            RemoteCallResult::Failure(error) => self.handle_error(&error),
        }
    }

    fn handle_error(&mut self, error: &ClientError) {
        self.status.fail(transaction_failure_message(error));
    }
}
