use crate::client::PaymentApiClient;
use crate::forms::{amount_form, fields, FormState};
use crate::http_client::OpaquePayload;
use crate::pages::deposit::INVALID_AMOUNT;
use crate::session::SessionContext;
use crate::status::{dispatch, RemoteCallResult, UiStatus};
use crate::util::MinorUnits;

pub const WITHDRAW_INITIATED: &str = "Withdraw initiated!";
pub const WITHDRAW_ALERT: &str = "Withdraw Initiated! Check your account balance.";
pub const WITHDRAW_FAILED: &str = "Withdrawal failed. Please try again.";

pub struct WithdrawPage {
    session: SessionContext,
    client: PaymentApiClient,
    pub form: FormState,
    /// Destination bank as reported by the backend, if it could be loaded.
    pub payout_account: Option<OpaquePayload>,
    pub status: UiStatus,
}

impl WithdrawPage {
    pub fn new(session: SessionContext, client: PaymentApiClient) -> Self {
        Self {
            session,
            client,
            form: FormState::new(amount_form()),
            payout_account: None,
            status: UiStatus::new(),
        }
    }

    /// Load the payout destination. Failure only leaves it unknown.
    pub async fn load(&mut self) {
        match self.client.fetch_payout_account(self.session.user_id).await {
            Ok(account) => self.payout_account = Some(account),
            Err(e) => log::warn!("payout account unavailable: {}", e),
        }
    }

    pub fn set_amount(&mut self, value: impl Into<String>) {
        self.form.set(fields::AMOUNT, value);
        if self.form.is_valid() {
            self.status.clear_message();
        } else {
            self.status.fail(INVALID_AMOUNT);
        }
    }

    pub async fn withdraw_funds(&mut self) {
        if !self.status.controls_enabled() {
            return;
        }
        let amount = MinorUnits::parse_major(self.form.value(fields::AMOUNT)).ok();
        let Some(amount) = amount.filter(|_| self.form.is_valid()) else {
            self.form.mark_all_touched();
            self.status.fail(INVALID_AMOUNT);
            return;
        };

        let result = dispatch(
            &mut self.status,
            "withdraw",
            self.client.withdraw(self.session.user_id, amount),
        )
        .await;

        match result {
            RemoteCallResult::Success(_) => {
                self.status.succeed(WITHDRAW_INITIATED);
                self.status.alert(WITHDRAW_ALERT);
                self.form.reset();
            }
            RemoteCallResult::Failure(_) => self.status.fail(WITHDRAW_FAILED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::ApiHttpClient;
    use crate::session::UserId;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page(server: &MockServer) -> WithdrawPage {
        WithdrawPage::new(
            SessionContext::new(UserId(9)),
            PaymentApiClient::new(ApiHttpClient::new(
                &server.uri(),
                Duration::from_secs(5),
                Duration::from_secs(5),
            )),
        )
    }

    #[tokio::test]
    async fn withdraw_sends_minor_units() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/transactions/withdraw"))
            .and(query_param("userId", "9"))
            .and(query_param("amount", "2550"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Payout created"))
            .expect(1)
            .mount(&server)
            .await;

        let mut page = page(&server);
        page.set_amount("25.50");
        page.withdraw_funds().await;

        assert_eq!(page.status.message, WITHDRAW_INITIATED);
        assert_eq!(page.status.take_alert().as_deref(), Some(WITHDRAW_ALERT));
        assert_eq!(page.form.value(fields::AMOUNT), "");
    }

    #[tokio::test]
    async fn failure_message_is_withdraw_specific() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/transactions/withdraw"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let mut page = page(&server);
        page.set_amount("5");
        page.withdraw_funds().await;

        assert_eq!(page.status.message, WITHDRAW_FAILED);
        assert!(!page.status.loading);
    }

    #[tokio::test]
    async fn invalid_amount_is_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut page = page(&server);
        page.set_amount("0.001");
        page.withdraw_funds().await;
        assert_eq!(page.status.message, INVALID_AMOUNT);
    }

    #[tokio::test]
    async fn payout_account_is_optional() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/transactions/payout-acc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bank_name": "STRIPE TEST BANK",
                "last4": "6789"
            })))
            .mount(&server)
            .await;

        let mut page = page(&server);
        page.load().await;
        assert_eq!(
            page.payout_account.as_ref().and_then(|a| a["last4"].as_str()),
            Some("6789")
        );
    }
}
