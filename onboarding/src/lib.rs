pub mod bank_link;
pub mod client;
pub mod config;
pub mod forms;
pub mod http_client;
pub mod lookup;
pub mod pages;
pub mod routes;
pub mod session;
pub mod status;
pub mod util;
pub mod wizard;

pub use bank_link::{BankAccountDetails, BankLinkProvider, LinkedAccount, LinkedBankAccount, SetupOutcome};
pub use client::PaymentApiClient;
pub use config::ClientConfig;
pub use lookup::{LookupOutcome, RoutingLookupClient, RoutingNumberLookup};
pub use routes::Route;
pub use session::{SessionContext, UserId};
pub use status::{dispatch, RemoteCallResult, UiStatus};
pub use util::{ClientError, MinorUnits, ProviderError, Result};

// Re-export for convenience
pub mod prelude {
    pub use super::bank_link::{BankAccountDetails, BankLinkProvider};
    pub use super::client::PaymentApiClient;
    pub use super::config::ClientConfig;
    pub use super::lookup::{RoutingLookupClient, RoutingNumberLookup};
    pub use super::pages::{
        AddBankPage, BankingInformationPage, DepositPage, HistoryPage, OnboardingAction,
        OnboardingManager, WithdrawPage,
    };
    pub use super::routes::Route;
    pub use super::session::{SessionContext, UserId};
    pub use super::util::{ClientError, MinorUnits};
}
