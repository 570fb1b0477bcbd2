use std::fmt;

/// Navigable pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Onboarding,
    AddBank,
    History,
    Deposit,
    Withdraw,
    AddBankInfo,
    Refresh { connected_account_id: String },
    Return { connected_account_id: String },
    PaymentSuccess,
}

impl Route {
    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim().trim_matches('/');
        let segments: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        match segments.as_slice() {
            [] => Some(Route::Onboarding),
            ["add-bank"] => Some(Route::AddBank),
            ["history"] => Some(Route::History),
            ["deposit"] => Some(Route::Deposit),
            ["withdraw"] => Some(Route::Withdraw),
            ["add-bank-info"] => Some(Route::AddBankInfo),
            ["payment-success"] => Some(Route::PaymentSuccess),
            ["refresh", id] if !id.is_empty() => Some(Route::Refresh {
                connected_account_id: id.to_string(),
            }),
            ["return", id] if !id.is_empty() => Some(Route::Return {
                connected_account_id: id.to_string(),
            }),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Onboarding => "/".to_string(),
            Route::AddBank => "/add-bank".to_string(),
            Route::History => "/history".to_string(),
            Route::Deposit => "/deposit".to_string(),
            Route::Withdraw => "/withdraw".to_string(),
            Route::AddBankInfo => "/add-bank-info".to_string(),
            Route::Refresh {
                connected_account_id,
            } => format!("/refresh/{}", connected_account_id),
            Route::Return {
                connected_account_id,
            } => format!("/return/{}", connected_account_id),
            Route::PaymentSuccess => "/payment-success".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
