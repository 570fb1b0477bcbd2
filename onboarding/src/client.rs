use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::http_client::{ApiHttpClient, OpaquePayload};
use crate::session::UserId;
use crate::util::{MinorUnits, Result};

/// Typed wrapper around the payment backend's REST surface.
#[derive(Clone)]
pub struct PaymentApiClient {
    http: ApiHttpClient,
}

impl PaymentApiClient {
    pub fn new(http: ApiHttpClient) -> Self {
        Self { http }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(ApiHttpClient::from_config(&config.api))
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    // ============================================
    // Connect account / customer
    // ============================================

    pub async fn get_stripe_user_details(&self, user_id: UserId) -> Result<StripeUserDetails> {
        self.http
            .get_json(
                "/stripe/getStripeUserDetails",
                &[("userId", user_id.to_string())],
            )
            .await
    }

    pub async fn create_customer(
        &self,
        user_id: UserId,
        connect_account_id: &str,
    ) -> Result<CustomerResponse> {
        self.http
            .post_query(
                "/stripe/createCustomer",
                &[
                    ("userId", user_id.to_string()),
                    ("connectAccountId", connect_account_id.to_string()),
                ],
            )
            .await
    }

    pub async fn create_connect_account(&self, user_id: UserId) -> Result<ConnectAccountResponse> {
        self.http
            .post_query("/stripe/create", &[("userId", user_id.to_string())])
            .await
    }

    pub async fn submit_onboarding(&self, profile: &OnboardingProfile) -> Result<OpaquePayload> {
        self.http.post_json_payload("/stripe/onboarding", profile).await
    }

    pub async fn add_payout_account(&self, request: &AddPayoutAccountRequest) -> Result<OpaquePayload> {
        self.http
            .post_json_payload("/stripe/addPayoutAccount", request)
            .await
    }

    // ============================================
    // Financial Connections
    // ============================================

    pub async fn create_financial_connections_session(
        &self,
        customer_id: &str,
    ) -> Result<FinancialConnectionsSession> {
        self.http
            .post_json(
                "/stripe/addPaymentMethod",
                &[("customerId", customer_id.to_string())],
                &serde_json::json!({}),
            )
            .await
    }

    pub async fn attach_payment_method(
        &self,
        request: &AttachPaymentMethodRequest,
    ) -> Result<AttachPaymentMethodResponse> {
        self.http
            .post_json("/stripe/attachPaymentMethodToCustomer", &[], request)
            .await
    }

    // ============================================
    // Transactions
    // ============================================

    pub async fn fetch_balance(&self, user_id: UserId) -> Result<BalanceResponse> {
        self.http
            .get_json("/api/transactions/data", &[("userId", user_id.to_string())])
            .await
    }

    pub async fn deposit(&self, user_id: UserId, amount: MinorUnits) -> Result<OpaquePayload> {
        self.http
            .post_query_payload(
                "/api/transactions/deposit",
                &[
                    ("userId", user_id.to_string()),
                    ("amount", amount.value().to_string()),
                ],
            )
            .await
    }

    pub async fn withdraw(&self, user_id: UserId, amount: MinorUnits) -> Result<OpaquePayload> {
        self.http
            .post_query_payload(
                "/api/transactions/withdraw",
                &[
                    ("userId", user_id.to_string()),
                    ("amount", amount.value().to_string()),
                ],
            )
            .await
    }

    pub async fn fetch_transaction_history(&self, user_id: UserId) -> Result<Vec<TransactionRecord>> {
        self.http
            .get_json(
                "/api/transactions/trans-history",
                &[("userId", user_id.to_string())],
            )
            .await
    }

    /// External payout bank attached to the user's connect account.
    pub async fn fetch_payout_account(&self, user_id: UserId) -> Result<OpaquePayload> {
        self.http
            .get_json(
                "/api/transactions/payout-acc",
                &[("userId", user_id.to_string())],
            )
            .await
    }
}

// Request/Response types for the payment API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StripeUserDetails {
    pub connect_id: Option<String>,
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerResponse {
    pub customer_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectAccountResponse {
    pub account_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Profile fields posted to `/stripe/onboarding`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingProfile {
    pub ip: String,
    pub tos_consent: bool,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub ssn_last4: String,
    pub dob: String,
    pub account_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddPayoutAccountRequest {
    pub account_id: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialConnectionsSession {
    pub client_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttachPaymentMethodRequest {
    pub customer_id: String,
    pub financial_connections_account_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttachPaymentMethodResponse {
    pub setup_intent_client_secret: String,
    pub payment_method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceResponse {
    pub balance: MinorUnits,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Payout,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Succeeded,
    Failed,
    Refunded,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub user_id: u32,
    #[serde(default)]
    pub payment_method_id: Option<String>,
    pub transaction_type: TransactionType,
    /// Major units with two decimals, as stored by the backend.
    pub amount: Decimal,
    pub status: TransactionStatus,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub comments: Option<String>,
}

impl TransactionRecord {
    pub fn amount_minor(&self) -> Option<MinorUnits> {
        self.amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|minor| minor.round().to_i64())
            .map(MinorUnits::new)
    }
}
