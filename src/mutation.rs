//! Write requests the engine hands to the owner of the draft transaction.

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    #[n(0)]
    Add,
    #[n(1)]
    Update,
    #[n(2)]
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationRequest {
    SetAmount { amount: i64, currency: String },
    SetMerchant { merchant: String },
    SetCategory { category: String },
    /// Fill one slot of the tag string; other slots are kept.
    SetTag { index: usize, tag: String },
    SetTaxAmount { amount: i64 },
    SetPendingFields { waypoints: Option<PendingAction> },
}

/// Fire-and-forget surface for mutation requests. Implementations never
/// report back; failures are theirs to log.
pub trait MutationSink {
    fn submit(&mut self, transaction_id: &str, request: MutationRequest);

    fn submit_all(&mut self, transaction_id: &str, requests: Vec<MutationRequest>) {
        for request in requests {
            self.submit(transaction_id, request);
        }
    }
}

/// Collects requests instead of applying them.
impl MutationSink for Vec<(String, MutationRequest)> {
    fn submit(&mut self, transaction_id: &str, request: MutationRequest) {
        self.push((transaction_id.to_string(), request));
    }
}
