//! Bank account tokenisation and Financial Connections linking.
//!
//! The card-network SDK is reached only through [`BankLinkProvider`]; the
//! backend half of each flow goes through [`PaymentApiClient`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::{AddPayoutAccountRequest, AttachPaymentMethodRequest, PaymentApiClient};
use crate::http_client::OpaquePayload;
use crate::util::{ClientError, ProviderError, Result};

pub const TOKEN_CREATION_FAILED: &str = "Token creation failed";
pub const COLLECT_ACCOUNTS_FAILED: &str = "Error collecting bank account information";
pub const CONFIRM_SETUP_FAILED: &str = "Error confirming bank account setup";
pub const LINK_FAILED: &str = "Failed to link bank account. Please try again.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BankAccountDetails {
    pub country: String,
    pub currency: String,
    pub account_holder_name: String,
    pub account_holder_type: String,
    pub routing_number: String,
    pub account_number: String,
    pub account_type: String,
}

impl Default for BankAccountDetails {
    fn default() -> Self {
        Self {
            country: "US".to_string(),
            currency: "usd".to_string(),
            account_holder_name: String::new(),
            account_holder_type: "individual".to_string(),
            routing_number: String::new(),
            account_number: String::new(),
            account_type: "checking".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkedAccount {
    pub id: String,
    #[serde(default)]
    pub institution_name: Option<String>,
    #[serde(default)]
    pub last4: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetupOutcome {
    pub status: String,
}

/// Client-side payment SDK operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BankLinkProvider: Send + Sync {
    /// Exchange raw bank details for an opaque single-use token.
    async fn create_bank_account_token(
        &self,
        details: &BankAccountDetails,
    ) -> std::result::Result<String, ProviderError>;

    /// Run the hosted account-linking flow for a Financial Connections session.
    async fn collect_financial_connections_accounts(
        &self,
        client_secret: &str,
    ) -> std::result::Result<Vec<LinkedAccount>, ProviderError>;

    async fn confirm_us_bank_account_setup(
        &self,
        setup_intent_client_secret: &str,
        payment_method: &str,
    ) -> std::result::Result<SetupOutcome, ProviderError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedBankAccount {
    pub financial_connections_account_id: String,
    pub payment_method: String,
    pub setup_status: String,
}

/// Tokenise `details` and register the token as the connect account's payout
/// destination.
pub async fn add_payout_account(
    client: &PaymentApiClient,
    provider: &dyn BankLinkProvider,
    account_id: &str,
    details: &BankAccountDetails,
) -> Result<OpaquePayload> {
    let token = provider
        .create_bank_account_token(details)
        .await
        .map_err(|e| ProviderError::new(e.message_or(TOKEN_CREATION_FAILED)))?;

    let payload = client
        .add_payout_account(&AddPayoutAccountRequest {
            account_id: account_id.to_string(),
            token,
        })
        .await?;

    log::info!("payout bank added for account {}", account_id);
    Ok(payload)
}

/// Link a bank account to `customer_id`: create session, collect accounts,
/// attach the first one, confirm the setup intent. Each step runs only after
/// the previous one succeeded; the first failure is returned.
pub async fn link_bank_account(
    client: &PaymentApiClient,
    provider: &dyn BankLinkProvider,
    customer_id: &str,
) -> Result<LinkedBankAccount> {
    log::info!("starting bank account connection for customer {}", customer_id);

    let session = client.create_financial_connections_session(customer_id).await?;

    let accounts = provider
        .collect_financial_connections_accounts(&session.client_secret)
        .await
        .map_err(|e| ProviderError::new(e.message_or(COLLECT_ACCOUNTS_FAILED)))?;

    let Some(account) = accounts.first() else {
        return Err(ClientError::NoLinkedAccounts);
    };
    log::debug!("linked {} account(s), attaching {}", accounts.len(), account.id);

    let attached = client
        .attach_payment_method(&AttachPaymentMethodRequest {
            customer_id: customer_id.to_string(),
            financial_connections_account_id: account.id.clone(),
        })
        .await?;

    let setup = provider
        .confirm_us_bank_account_setup(&attached.setup_intent_client_secret, &attached.payment_method)
        .await
        .map_err(|e| ProviderError::new(e.message_or(CONFIRM_SETUP_FAILED)))?;

    log::info!("bank account setup finished with status {}", setup.status);
    Ok(LinkedBankAccount {
        financial_connections_account_id: account.id.clone(),
        payment_method: attached.payment_method,
        setup_status: setup.status,
    })
}

/// User-facing message for a failed link flow: the SDK's own message when it
/// produced one, otherwise a fixed fallback.
pub fn link_failure_message(error: &ClientError) -> String {
    match error {
        ClientError::Provider(e) => e.message_or(LINK_FAILED),
        ClientError::NoLinkedAccounts => error.to_string(),
        _ => LINK_FAILED.to_string(),
    }
}
