//! Draft money-request transaction
use super::mutation::{MutationRequest, MutationSink, PendingAction};
use super::receipt::Receipt;
use super::utils;
use chrono::{Datelike, NaiveDate, Utc};

/// Merchant written by a partially completed scan.
pub const PARTIAL_TRANSACTION_MERCHANT: &str = "(none)";

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct ExpenseDate(NaiveDate);

impl ExpenseDate {
    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }
    pub fn new_with(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(Self(NaiveDate::parse_from_str(text, "%Y-%m-%d")?))
    }
    pub fn to_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl std::fmt::Display for ExpenseDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for ExpenseDate {
    fn from(value: NaiveDate) -> Self {
        ExpenseDate(value)
    }
}

impl<C> minicbor::Encode<C> for ExpenseDate {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.i32(self.0.num_days_from_ce())?.ok()
    }
}

impl<'b, C> minicbor::Decode<'b, C> for ExpenseDate {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let days = d.i32()?;

        NaiveDate::from_num_days_from_ce_opt(days)
            .map(ExpenseDate)
            .ok_or(minicbor::decode::Error::message(
                "failed to convert day count to a date",
            ))
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct Route {
    #[n(0)]
    pub distance_meters: f64,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingFields {
    #[n(0)]
    pub waypoints: Option<PendingAction>,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct Transaction {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub amount: i64, // hundredths of `currency`
    #[n(2)]
    pub currency: String,
    #[n(3)]
    pub comment: String,
    #[n(4)]
    pub merchant: String,
    #[n(5)]
    pub created: Option<ExpenseDate>,
    #[n(6)]
    pub category: String,
    #[n(7)]
    pub tag: String, // one slot per policy tag list, see utils::split_tags
    #[n(8)]
    pub tax_rate: Option<String>,
    #[n(9)]
    pub tax_amount: Option<i64>,
    #[n(10)]
    pub billable: bool,
    #[n(11)]
    pub route: Option<Route>,
    #[n(12)]
    pub receipt: Option<Receipt>,
    #[n(13)]
    pub pending_fields: PendingFields,
}

impl Transaction {
    pub fn new(id: &str, currency: &str) -> Self {
        Self {
            id: id.to_string(),
            amount: 0,
            currency: currency.to_string(),
            comment: String::new(),
            merchant: String::new(),
            created: None,
            category: String::new(),
            tag: String::new(),
            tax_rate: None,
            tax_amount: None,
            billable: false,
            route: None,
            receipt: None,
            pending_fields: PendingFields::default(),
        }
    }
    /// New draft with a generated `txn_` id
    pub fn draft(currency: &str) -> anyhow::Result<Self> {
        let id = utils::new_uuid_to_bech32("txn_")?;
        Ok(Self::new(&id, currency))
    }
    pub fn set_amount(mut self, amount: i64) -> Self {
        self.amount = amount;
        self
    }
    pub fn set_comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }
    pub fn set_merchant(mut self, merchant: &str) -> Self {
        self.merchant = merchant.to_string();
        self
    }
    pub fn set_created(mut self, date: ExpenseDate) -> Self {
        self.created = Some(date);
        self
    }
    pub fn set_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }
    pub fn set_tag(mut self, tag: &str) -> Self {
        self.tag = tag.to_string();
        self
    }
    pub fn set_tax_rate(mut self, key: &str) -> Self {
        self.tax_rate = Some(key.to_string());
        self
    }
    pub fn set_tax_amount(mut self, amount: i64) -> Self {
        self.tax_amount = Some(amount);
        self
    }
    pub fn set_billable(mut self, billable: bool) -> Self {
        self.billable = billable;
        self
    }
    pub fn set_route(mut self, distance_meters: f64) -> Self {
        self.route = Some(Route { distance_meters });
        self
    }
    pub fn set_receipt(mut self, receipt: Receipt) -> Self {
        self.receipt = Some(receipt);
        self
    }

    pub fn has_route(&self) -> bool {
        self.route.is_some()
    }
    pub fn distance_meters(&self) -> f64 {
        self.route.as_ref().map(|r| r.distance_meters).unwrap_or(0.0)
    }
    pub fn tag_at(&self, index: usize) -> String {
        utils::tag_at(&self.tag, index)
    }

    pub fn is_merchant_missing(&self) -> bool {
        self.merchant.is_empty() || self.merchant == PARTIAL_TRANSACTION_MERCHANT
    }
    pub fn is_amount_missing(&self) -> bool {
        self.amount == 0
    }
    pub fn is_created_missing(&self) -> bool {
        self.created.is_none()
    }
    /// Amount and date always; merchant only on workspace expense reports.
    pub fn are_required_fields_empty(&self, is_policy_expense_chat: bool) -> bool {
        (is_policy_expense_chat && self.is_merchant_missing())
            || self.is_amount_missing()
            || self.is_created_missing()
    }
    pub fn is_receipt_being_scanned(&self) -> bool {
        self.receipt.as_ref().is_some_and(|r| r.state.is_scanning())
    }
    /// Required fields a finished scan failed to fill in.
    pub fn has_missing_smartscan_fields(&self, is_distance_request: bool, is_policy_expense_chat: bool) -> bool {
        !is_distance_request
            && self.receipt.is_some()
            && !self.is_receipt_being_scanned()
            && self.are_required_fields_empty(is_policy_expense_chat)
    }

    /// Apply a mutation request in place. Used by owners of the draft; the
    /// engine itself only emits requests.
    pub fn apply(&mut self, request: &MutationRequest) {
        match request {
            MutationRequest::SetAmount { amount, currency } => {
                self.amount = *amount;
                self.currency = currency.clone();
            }
            MutationRequest::SetMerchant { merchant } => self.merchant = merchant.clone(),
            MutationRequest::SetCategory { category } => self.category = category.clone(),
            MutationRequest::SetTag { index, tag } => {
                self.tag = utils::insert_tag(&self.tag, tag, *index);
            }
            MutationRequest::SetTaxAmount { amount } => self.tax_amount = Some(*amount),
            MutationRequest::SetPendingFields { waypoints } => {
                self.pending_fields.waypoints = *waypoints;
            }
        }
    }
}

impl MutationSink for Transaction {
    fn submit(&mut self, transaction_id: &str, request: MutationRequest) {
        if transaction_id != self.id {
            tracing::warn!(transaction_id, "mutation addressed to another transaction dropped");
            return;
        }
        self.apply(&request);
    }
}
