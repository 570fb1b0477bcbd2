use crate::client::{PaymentApiClient, TransactionRecord, TransactionType};
use crate::session::SessionContext;
use crate::status::{dispatch, RemoteCallResult, UiStatus};
use crate::util::MinorUnits;

pub const HISTORY_FAILED: &str = "Failed to load transaction history.";

pub struct HistoryPage {
    session: SessionContext,
    client: PaymentApiClient,
    /// Records in the order the backend returned them.
    pub transactions: Vec<TransactionRecord>,
    pub status: UiStatus,
}

impl HistoryPage {
    pub fn new(session: SessionContext, client: PaymentApiClient) -> Self {
        Self {
            session,
            client,
            transactions: Vec::new(),
            status: UiStatus::new(),
        }
    }

    pub async fn load(&mut self) {
        let result = dispatch(
            &mut self.status,
            "fetch transaction history",
            self.client.fetch_transaction_history(self.session.user_id),
        )
        .await;

        match result {
            RemoteCallResult::Success(transactions) => {
                self.status.clear_message();
                self.transactions = transactions;
            }
            RemoteCallResult::Failure(_) => self.status.fail(HISTORY_FAILED),
        }
    }

    pub fn total(&self, kind: TransactionType) -> MinorUnits {
        let cents = self
            .transactions
            .iter()
            .filter(|t| t.transaction_type == kind)
            .filter_map(TransactionRecord::amount_minor)
            .map(MinorUnits::value)
            .sum();
        MinorUnits::new(cents)
    }
}
