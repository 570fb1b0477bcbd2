//! Shared fixtures: a fake payment backend, a fake routing service and a
//! mocked bank-link SDK.

#![allow(dead_code)]

use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;
use payment_onboarding::bank_link::{BankAccountDetails, BankLinkProvider, LinkedAccount, SetupOutcome};
use payment_onboarding::http_client::ApiHttpClient;
use payment_onboarding::{PaymentApiClient, ProviderError, RoutingLookupClient, RoutingNumberLookup, SessionContext, UserId};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USER: UserId = UserId(33);

mock! {
    pub Provider {}

    #[async_trait]
    impl BankLinkProvider for Provider {
        async fn create_bank_account_token(
            &self,
            details: &BankAccountDetails,
        ) -> Result<String, ProviderError>;

        async fn collect_financial_connections_accounts(
            &self,
            client_secret: &str,
        ) -> Result<Vec<LinkedAccount>, ProviderError>;

        async fn confirm_us_bank_account_setup(
            &self,
            setup_intent_client_secret: &str,
            payment_method: &str,
        ) -> Result<SetupOutcome, ProviderError>;
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn session() -> SessionContext {
    SessionContext::new(USER)
}

pub fn http(uri: &str) -> ApiHttpClient {
    ApiHttpClient::new(uri, Duration::from_secs(5), Duration::from_secs(2))
}

pub fn api_client(server: &MockServer) -> PaymentApiClient {
    PaymentApiClient::new(http(&server.uri()))
}

/// A client pointed at a port nothing listens on.
pub fn unreachable_client() -> PaymentApiClient {
    PaymentApiClient::new(ApiHttpClient::new(
        "http://127.0.0.1:1",
        Duration::from_secs(2),
        Duration::from_secs(1),
    ))
}

pub fn routing_lookup(server: &MockServer) -> RoutingNumberLookup {
    RoutingNumberLookup::new(RoutingLookupClient::new(http(&format!(
        "{}/api/data.json",
        server.uri()
    ))))
}

pub async fn mount_balance(server: &MockServer, balance: i64) {
    Mock::given(method("GET"))
        .and(path("/api/transactions/data"))
        .and(query_param("userId", USER.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "balance": balance })))
        .mount(server)
        .await;
}

pub async fn mount_user_details(server: &MockServer, connect_id: &str, customer_id: Option<&str>) {
    Mock::given(method("GET"))
        .and(path("/stripe/getStripeUserDetails"))
        .and(query_param("userId", USER.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "connect_id": connect_id,
            "customer_id": customer_id
        })))
        .mount(server)
        .await;
}

pub async fn mount_bank_name(server: &MockServer, routing_number: &str, bank_name: &str, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/api/data.json"))
        .and(query_param("rn", routing_number))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 200, "customer_name": bank_name }))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}
