use crate::types::{AlertId, TransactionId};

/// A finding raised by the fraud detector against one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub id: Option<AlertId>,
    /// The flagged transaction, when its stored identifier is known.
    pub transaction_id: Option<TransactionId>,
    pub reason: String,
    /// Copied from the flagged transaction.
    pub timestamp: String
}
