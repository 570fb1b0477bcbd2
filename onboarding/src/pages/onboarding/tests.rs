#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::bank_link::MockBankLinkProvider;
    use crate::client::{OnboardingProfile, PaymentApiClient};
    use crate::forms::definitions::profile_entries;
    use crate::forms::fields;
    use crate::http_client::ApiHttpClient;
    use crate::lookup::{RoutingLookupClient, RoutingNumberLookup, INVALID_ROUTING_NUMBER};
    use crate::pages::onboarding::manager::{CONNECT_ACCOUNT_FAILED, PROFILE_SUBMIT_FAILED};
    use crate::pages::onboarding::{OnboardingAction, OnboardingManager, OnboardingStep};
    use crate::routes::Route;
    use crate::session::{SessionContext, UserId};
    use crate::util::ProviderError;

    fn http(uri: &str) -> ApiHttpClient {
        ApiHttpClient::new(uri, Duration::from_secs(5), Duration::from_secs(5))
    }

    fn manager(api: &MockServer, routing: &MockServer, provider: MockBankLinkProvider) -> OnboardingManager {
        OnboardingManager::new(
            SessionContext::new(UserId(42)),
            PaymentApiClient::new(http(&api.uri())),
            RoutingNumberLookup::new(RoutingLookupClient::new(http(&format!(
                "{}/api/data.json",
                routing.uri()
            )))),
            Arc::new(provider),
        )
    }

    fn complete_profile() -> OnboardingProfile {
        OnboardingProfile {
            ip: "127.0.0.1".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            phone: "5555550100".into(),
            address_line1: "1 Main St".into(),
            address_line2: "Apt 2".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            postal_code: "62701".into(),
            country: "US".into(),
            ssn_last4: "1234".into(),
            dob: "1990-01-01".into(),
            ..OnboardingProfile::default()
        }
    }

    async fn mount_connect_account(api: &MockServer, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/stripe/create"))
            .and(query_param("userId", "42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accountId": "acct_1",
                "message": "created"
            })))
            .expect(expected_calls)
            .mount(api)
            .await;
    }

    async fn consent_and_fill(manager: &mut OnboardingManager) {
        manager.dispatch(OnboardingAction::SetConsent(true));
        for (field, value) in profile_entries(&complete_profile()) {
            manager.dispatch(OnboardingAction::UpdateProfileField {
                field: field.to_string(),
                value,
            });
        }
        manager.run_pending().await;
    }

    fn fill_bank_form(manager: &mut OnboardingManager, routing_number: &str) {
        for (field, value) in [
            (fields::ACCOUNT_HOLDER_NAME, "Jane Doe"),
            (fields::ACCOUNT_NUMBER, "000123456789"),
            (fields::ROUTING_NUMBER, routing_number),
        ] {
            manager.dispatch(OnboardingAction::UpdateBankField {
                field: field.to_string(),
                value: value.to_string(),
            });
        }
    }

    #[tokio::test]
    async fn test_manager_initialization() {
        let api = MockServer::start().await;
        let routing = MockServer::start().await;
        let manager = manager(&api, &routing, MockBankLinkProvider::new());
        let state = manager.state();

        assert_eq!(state.current_step(), OnboardingStep::Consent);
        assert!(!state.wizard.consent_given);
        assert!(state.account_id.is_none());
        assert!(!manager.has_pending_actions());
    }

    #[tokio::test]
    async fn test_step_navigation_stays_in_bounds() {
        let api = MockServer::start().await;
        let routing = MockServer::start().await;
        let mut manager = manager(&api, &routing, MockBankLinkProvider::new());

        manager.dispatch(OnboardingAction::PreviousStep);
        manager.update().await;
        assert_eq!(manager.state().wizard.current_step(), 1);

        for _ in 0..10 {
            manager.dispatch(OnboardingAction::NextStep);
        }
        manager.run_pending().await;
        assert_eq!(manager.state().wizard.current_step(), 5);
        assert_eq!(manager.state().progress_percent(), 100);
    }

    #[tokio::test]
    async fn test_consent_creates_connect_account_once() {
        let api = MockServer::start().await;
        let routing = MockServer::start().await;
        mount_connect_account(&api, 1).await;
        let mut manager = manager(&api, &routing, MockBankLinkProvider::new());

        manager.dispatch(OnboardingAction::SetConsent(true));
        manager.run_pending().await;
        assert_eq!(manager.state().account_id.as_deref(), Some("acct_1"));
        assert_eq!(manager.state().profile_form.value(fields::ACCOUNT_ID), "acct_1");

        manager.dispatch(OnboardingAction::SetConsent(false));
        manager.dispatch(OnboardingAction::SetConsent(true));
        manager.run_pending().await;
        assert!(manager.state().wizard.consent_given);
    }

    #[tokio::test]
    async fn test_connect_account_retry_clears_failure() {
        let api = MockServer::start().await;
        let routing = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/stripe/create"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&api)
            .await;
        mount_connect_account(&api, 1).await;
        let mut manager = manager(&api, &routing, MockBankLinkProvider::new());

        manager.dispatch(OnboardingAction::SetConsent(true));
        manager.run_pending().await;
        assert!(manager.state().account_id.is_none());
        assert_eq!(manager.state().status.message, CONNECT_ACCOUNT_FAILED);

        manager.dispatch(OnboardingAction::SetConsent(false));
        manager.dispatch(OnboardingAction::SetConsent(true));
        manager.run_pending().await;
        assert_eq!(manager.state().account_id.as_deref(), Some("acct_1"));
        assert!(manager.state().status.message.is_empty());
        assert!(!manager.state().status.failed);
    }

    #[tokio::test]
    async fn test_invalid_profile_is_not_submitted() {
        let api = MockServer::start().await;
        let routing = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/stripe/onboarding"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&api)
            .await;
        let mut manager = manager(&api, &routing, MockBankLinkProvider::new());

        manager.dispatch(OnboardingAction::SubmitProfile);
        manager.run_pending().await;

        let state = manager.state();
        assert_eq!(state.wizard.current_step(), 1);
        assert!(!state.profile_form.visible_errors().is_empty());
        assert!(state.status.message.is_empty());
    }

    #[tokio::test]
    async fn test_profile_submission_jumps_to_bank_step() {
        let api = MockServer::start().await;
        let routing = MockServer::start().await;
        mount_connect_account(&api, 1).await;
        Mock::given(method("POST"))
            .and(path("/stripe/onboarding"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Onboarding complete"))
            .expect(1)
            .mount(&api)
            .await;
        let mut manager = manager(&api, &routing, MockBankLinkProvider::new());

        consent_and_fill(&mut manager).await;
        assert!(manager.state().profile_form.is_valid());

        manager.dispatch(OnboardingAction::SubmitProfile);
        manager.run_pending().await;

        assert_eq!(manager.state().current_step(), OnboardingStep::PayoutBank);
        assert!(!manager.state().status.loading);
    }

    #[tokio::test]
    async fn test_profile_submission_failure_sets_message() {
        let api = MockServer::start().await;
        let routing = MockServer::start().await;
        mount_connect_account(&api, 1).await;
        Mock::given(method("POST"))
            .and(path("/stripe/onboarding"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&api)
            .await;
        let mut manager = manager(&api, &routing, MockBankLinkProvider::new());

        consent_and_fill(&mut manager).await;
        manager.dispatch(OnboardingAction::SubmitProfile);
        manager.run_pending().await;

        assert_eq!(manager.state().status.message, PROFILE_SUBMIT_FAILED);
        assert!(manager.state().status.failed);
        assert_eq!(manager.state().wizard.current_step(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_submit_is_dropped() {
        let api = MockServer::start().await;
        let routing = MockServer::start().await;
        let mut manager = manager(&api, &routing, MockBankLinkProvider::new());

        manager.dispatch(OnboardingAction::SubmitProfile);
        manager.dispatch(OnboardingAction::SubmitProfile);
        manager.update().await;
        assert!(!manager.has_pending_actions());
    }

    #[tokio::test]
    async fn test_routing_number_resolves_bank_name() {
        let api = MockServer::start().await;
        let routing = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/data.json"))
            .and(query_param("rn", "011000015"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "customer_name": "FEDERAL RESERVE BANK"
            })))
            .expect(1)
            .mount(&routing)
            .await;
        let mut manager = manager(&api, &routing, MockBankLinkProvider::new());

        fill_bank_form(&mut manager, "011000015");
        manager.run_pending().await;

        assert_eq!(manager.state().bank_name, "FEDERAL RESERVE BANK");
        assert!(manager.state().status.message.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_routing_number_is_invalid() {
        let api = MockServer::start().await;
        let routing = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/data.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 404,
                "message": "not found"
            })))
            .mount(&routing)
            .await;
        let mut manager = manager(&api, &routing, MockBankLinkProvider::new());

        fill_bank_form(&mut manager, "999999999");
        manager.run_pending().await;

        assert!(manager.state().bank_name.is_empty());
        assert_eq!(manager.state().status.message, INVALID_ROUTING_NUMBER);
    }

    #[tokio::test]
    async fn test_superseded_routing_number_is_ignored() {
        let api = MockServer::start().await;
        let routing = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/data.json"))
            .and(query_param("rn", "222222222"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "customer_name": "SECOND BANK"
            })))
            .mount(&routing)
            .await;
        let mut manager = manager(&api, &routing, MockBankLinkProvider::new());

        // Both edits land before either lookup runs; only the latest is resolved.
        manager.dispatch(OnboardingAction::UpdateBankField {
            field: fields::ROUTING_NUMBER.into(),
            value: "111111111".into(),
        });
        manager.dispatch(OnboardingAction::UpdateBankField {
            field: fields::ROUTING_NUMBER.into(),
            value: "222222222".into(),
        });
        manager.run_pending().await;

        assert_eq!(manager.state().bank_name, "SECOND BANK");
        assert!(manager.state().status.message.is_empty());
    }

    #[tokio::test]
    async fn test_bank_submit_without_account_id() {
        let api = MockServer::start().await;
        let routing = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "customer_name": "FIRST BANK"
            })))
            .mount(&routing)
            .await;
        let mut provider = MockBankLinkProvider::new();
        provider.expect_create_bank_account_token().never();
        let mut manager = manager(&api, &routing, provider);

        fill_bank_form(&mut manager, "011000015");
        manager.run_pending().await;
        manager.dispatch(OnboardingAction::SubmitBankDetails);
        manager.run_pending().await;

        assert_eq!(manager.state().status.message, "Account ID not initialized");
        assert!(manager.take_navigation().is_none());
    }

    #[tokio::test]
    async fn test_bank_submit_adds_payout_account() {
        let api = MockServer::start().await;
        let routing = MockServer::start().await;
        mount_connect_account(&api, 1).await;
        Mock::given(method("POST"))
            .and(path("/stripe/addPayoutAccount"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .expect(1)
            .mount(&api)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "customer_name": "FIRST BANK"
            })))
            .mount(&routing)
            .await;

        let mut provider = MockBankLinkProvider::new();
        provider
            .expect_create_bank_account_token()
            .times(1)
            .returning(|details| {
                assert_eq!(details.routing_number, "011000015");
                assert_eq!(details.currency, "usd");
                Ok("btok_1".to_string())
            });
        let mut manager = manager(&api, &routing, provider);

        manager.dispatch(OnboardingAction::SetConsent(true));
        fill_bank_form(&mut manager, "011000015");
        manager.run_pending().await;
        manager.dispatch(OnboardingAction::SubmitBankDetails);
        manager.run_pending().await;

        assert_eq!(manager.take_alert().as_deref(), Some("Payout bank added"));
        assert_eq!(manager.take_navigation(), Some(Route::AddBankInfo));
    }

    #[tokio::test]
    async fn test_token_failure_uses_provider_message() {
        let api = MockServer::start().await;
        let routing = MockServer::start().await;
        mount_connect_account(&api, 1).await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "customer_name": "FIRST BANK"
            })))
            .mount(&routing)
            .await;

        let mut provider = MockBankLinkProvider::new();
        provider
            .expect_create_bank_account_token()
            .returning(|_| Err(ProviderError::new("Routing number is invalid")));
        let mut manager = manager(&api, &routing, provider);

        manager.dispatch(OnboardingAction::SetConsent(true));
        fill_bank_form(&mut manager, "011000015");
        manager.run_pending().await;
        manager.dispatch(OnboardingAction::SubmitBankDetails);
        manager.run_pending().await;

        assert_eq!(manager.state().status.message, "Routing number is invalid");
        assert!(manager.take_navigation().is_none());
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let api = MockServer::start().await;
        let routing = MockServer::start().await;
        let mut manager = manager(&api, &routing, MockBankLinkProvider::new());

        manager.dispatch(OnboardingAction::NextStep);
        manager.dispatch(OnboardingAction::NextStep);
        manager.run_pending().await;
        manager.dispatch(OnboardingAction::Reset);
        manager.run_pending().await;

        assert_eq!(manager.state().current_step(), OnboardingStep::Consent);
    }
}
