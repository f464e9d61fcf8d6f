//! Receipt attachment state and how the confirmation form previews it
use super::context::{RequestContext, RequestType};
use super::policy::Policy;
use super::transaction::Transaction;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceiptState {
    #[n(0)]
    #[default]
    Open,
    #[n(1)]
    ScanReady,
    #[n(2)]
    Scanning,
    #[n(3)]
    ScanComplete,
    #[n(4)]
    ScanFailed,
}

impl ReceiptState {
    pub fn is_scanning(&self) -> bool {
        matches!(
            self,
            ReceiptState::Open | ReceiptState::ScanReady | ReceiptState::Scanning
        )
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    #[n(0)]
    pub source: String,
    #[n(1)]
    pub filename: String,
    #[n(2)]
    pub thumbnail: Option<String>, // server-rendered preview
    #[n(3)]
    pub is_local: bool,
    #[n(4)]
    pub state: ReceiptState,
}

impl Receipt {
    pub fn local(source: &str, filename: &str) -> Self {
        Self {
            source: source.to_string(),
            filename: filename.to_string(),
            thumbnail: None,
            is_local: true,
            state: ReceiptState::Open,
        }
    }
    pub fn is_pdf(&self) -> bool {
        self.filename.to_ascii_lowercase().ends_with(".pdf")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptPreview {
    /// Local PDF. Disabled once found to be password protected.
    Pdf { source: String, enabled: bool },
    Image {
        source: String,
        is_thumbnail: bool,
        auth_token_required: bool,
    },
    /// Prompt to attach a receipt via the scan step.
    EmptyState,
    None,
}

pub fn receipt_preview(
    transaction: &Transaction,
    policy: &Policy,
    context: &RequestContext,
    attachment_invalid: bool,
) -> ReceiptPreview {
    let receipt = transaction
        .receipt
        .as_ref()
        .filter(|r| !r.source.is_empty() && !r.filename.is_empty());

    match receipt {
        Some(r) if r.is_local && r.is_pdf() => ReceiptPreview::Pdf {
            source: r.source.clone(),
            enabled: !attachment_invalid,
        },
        Some(r) => ReceiptPreview::Image {
            source: r.thumbnail.clone().unwrap_or_else(|| r.source.clone()),
            is_thumbnail: r.thumbnail.is_some(),
            auth_token_required: r.thumbnail.is_some(),
        },
        None if policy.is_paid_group_policy()
            && !context.is_distance_request
            && context.request_type == RequestType::Request =>
        {
            ReceiptPreview::EmptyState
        }
        None => ReceiptPreview::None,
    }
}
