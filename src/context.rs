//! Per-render request parameters and the confirmation state machine
use std::fmt;

/// Kind of money request being confirmed. Exactly one is active per form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, minicbor::Encode, minicbor::Decode)]
pub enum RequestType {
    #[n(0)]
    Request,
    #[n(1)]
    Send,
    #[n(2)]
    Split,
    #[n(3)]
    TrackExpense,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Request => "request",
            RequestType::Send => "send",
            RequestType::Split => "split",
            RequestType::TrackExpense => "track-expense",
        }
    }

    /// Sending money never exposes date or merchant.
    pub fn hides_date_and_merchant(&self) -> bool {
        match self {
            RequestType::Send => true,
            RequestType::Request | RequestType::Split | RequestType::TrackExpense => false,
        }
    }

    /// Sending money has no collapsed section.
    pub fn shows_all_fields(&self) -> bool {
        match self {
            RequestType::Send => true,
            RequestType::Request | RequestType::Split | RequestType::TrackExpense => false,
        }
    }

    pub fn enforces_category(&self) -> bool {
        match self {
            RequestType::Send => false,
            RequestType::Request | RequestType::Split | RequestType::TrackExpense => true,
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_type: RequestType,
    pub is_distance_request: bool,
    pub is_scan_request: bool,
    pub show_smart_scan_fields: bool, // amount, date and merchant
    pub is_editing_split: bool,
    pub has_smart_scan_failed: bool,
    pub is_policy_expense_chat: bool,
    pub violations_enabled: bool, // acting user may enforce required fields
    pub is_read_only: bool,
    pub has_multiple_participants: bool,
    pub can_modify_participants: bool,
    pub current_account_id: Option<u64>,
    pub report_id: String,
    pub report_action_id: Option<String>,
}

impl RequestContext {
    pub fn new(request_type: RequestType) -> Self {
        Self {
            request_type,
            is_distance_request: false,
            is_scan_request: false,
            show_smart_scan_fields: true,
            is_editing_split: false,
            has_smart_scan_failed: false,
            is_policy_expense_chat: false,
            violations_enabled: false,
            is_read_only: false,
            has_multiple_participants: false,
            can_modify_participants: false,
            current_account_id: None,
            report_id: String::new(),
            report_action_id: None,
        }
    }
    pub fn set_distance_request(mut self, value: bool) -> Self {
        self.is_distance_request = value;
        self
    }
    pub fn set_scan_request(mut self, value: bool) -> Self {
        self.is_scan_request = value;
        self
    }
    pub fn set_show_smart_scan_fields(mut self, value: bool) -> Self {
        self.show_smart_scan_fields = value;
        self
    }
    pub fn set_editing_split(mut self, value: bool) -> Self {
        self.is_editing_split = value;
        self
    }
    pub fn set_smart_scan_failed(mut self, value: bool) -> Self {
        self.has_smart_scan_failed = value;
        self
    }
    pub fn set_policy_expense_chat(mut self, value: bool) -> Self {
        self.is_policy_expense_chat = value;
        self
    }
    pub fn set_violations_enabled(mut self, value: bool) -> Self {
        self.violations_enabled = value;
        self
    }
    pub fn set_read_only(mut self, value: bool) -> Self {
        self.is_read_only = value;
        self
    }
    pub fn set_multiple_participants(mut self, value: bool) -> Self {
        self.has_multiple_participants = value;
        self
    }
    pub fn set_can_modify_participants(mut self, value: bool) -> Self {
        self.can_modify_participants = value;
        self
    }
    pub fn set_current_account(mut self, account_id: u64) -> Self {
        self.current_account_id = Some(account_id);
        self
    }
    pub fn set_report(mut self, report_id: &str, report_action_id: Option<&str>) -> Self {
        self.report_id = report_id.to_string();
        self.report_action_id = report_action_id.map(str::to_string);
        self
    }

    /// Whether the collapsed section is skipped. `expanded` is the user's toggle.
    pub fn show_all_fields(&self, expanded: bool) -> bool {
        self.is_distance_request
            || expanded
            || !self.show_smart_scan_fields
            || self.request_type.shows_all_fields()
            || self.is_editing_split
    }

    pub fn show_date(&self) -> bool {
        (self.show_smart_scan_fields || self.is_distance_request)
            && !self.request_type.hides_date_and_merchant()
    }

    /// Distance requests show a distance row in place of the merchant.
    pub fn show_merchant(&self) -> bool {
        self.show_smart_scan_fields
            && !self.is_distance_request
            && !self.request_type.hides_date_and_merchant()
    }

    pub fn is_merchant_required(&self) -> bool {
        self.is_policy_expense_chat && !self.is_scan_request && self.show_merchant()
    }

    pub fn participants_editable(&self) -> bool {
        !self.is_read_only && self.can_modify_participants && self.has_multiple_participants
    }
}

/// Where a confirmation form is in its lifecycle. Replaces independent
/// confirmed / split-error / merchant-error flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmationState {
    #[default]
    Editing,
    /// Submitted; field edits are disabled.
    Confirmed,
    /// A split edit was confirmed with required fields empty.
    SplitErrorShown,
    /// Confirm was blocked on a missing merchant. `split_confirmed` keeps an
    /// earlier failed split confirm alive underneath the merchant error.
    MerchantErrorShown { split_confirmed: bool },
}

impl ConfirmationState {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, ConfirmationState::Confirmed)
    }

    pub fn is_merchant_error(&self) -> bool {
        matches!(self, ConfirmationState::MerchantErrorShown { .. })
    }

    /// A split confirm was attempted with required fields empty.
    pub fn split_confirmed(&self) -> bool {
        matches!(
            self,
            ConfirmationState::SplitErrorShown
                | ConfirmationState::MerchantErrorShown { split_confirmed: true }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Elsewhere,
    Wallet,
    BusinessBankAccount,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentMethod::Elsewhere => "Elsewhere",
            PaymentMethod::Wallet => "Wallet",
            PaymentMethod::BusinessBankAccount => "BusinessBankAccount",
        };
        f.write_str(name)
    }
}
