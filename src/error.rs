/// User-facing outcomes of a confirmation attempt. Every variant is
/// recoverable by editing the draft.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationError {
    #[error("Merchant is required but missing")]
    InvalidMerchant,
    #[error("Category exceeds the maximum allowed length")]
    InvalidCategoryLength,
    #[error("Amount does not match the currency's decimal precision")]
    InvalidAmount,
    #[error("Required fields are empty after smart scan")]
    SmartscanFailure,
    #[error("Receipt scanning failed and fields are missing")]
    ReceiptScanningFailed,
    #[error("Password protected receipts cannot be previewed")]
    ReceiptUnsupportedFormat,
}

impl ConfirmationError {
    /// Localisation key rendered by the caller.
    pub fn message_key(&self) -> &'static str {
        match self {
            ConfirmationError::InvalidMerchant => "iou.error.invalidMerchant",
            ConfirmationError::InvalidCategoryLength => "iou.error.invalidCategoryLength",
            ConfirmationError::InvalidAmount => "common.error.invalidAmount",
            ConfirmationError::SmartscanFailure => "iou.error.genericSmartscanFailureMessage",
            ConfirmationError::ReceiptScanningFailed => "iou.receiptScanningFailed",
            ConfirmationError::ReceiptUnsupportedFormat => "attachmentPicker.protectedPDFNotSupported",
        }
    }

    /// Blocking errors are shown as a modal instead of inline under the form.
    pub fn is_blocking(&self) -> bool {
        matches!(self, ConfirmationError::ReceiptUnsupportedFormat)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Policy {0} was not found")]
    MissingPolicy(String),
    #[error("Transaction {0} was not found")]
    MissingTransaction(String),
    #[error("Failed to decode stored record under {0}")]
    Decode(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}
