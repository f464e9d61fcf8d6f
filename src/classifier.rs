//! Primary / supplementary partitioning of the confirmation fields
use super::context::RequestContext;
use super::currency::convert_to_display_string;
use super::distance;
use super::localize::Translator;
use super::policy::Policy;
use super::resolver::FieldPlan;
use super::transaction::{ExpenseDate, Transaction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Amount,
    Description,
    Distance,
    Merchant,
    Date,
    Category,
    Tag { index: usize, name: String },
    TaxRate,
    TaxAmount,
    Billable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub field: Field,
    pub required: bool,
    /// Inline error key rendered under the row
    pub error: Option<&'static str>,
}

/// Form-owned flags the classifier needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormFlags {
    pub expanded: bool,
    pub merchant_error: bool,
    pub field_errors: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFields {
    pub primary: Vec<FieldRow>,
    pub supplementary: Vec<FieldRow>,
    pub show_all: bool,
}

impl ClassifiedFields {
    pub fn show_more_button(&self) -> bool {
        !self.show_all
    }

    /// Rows currently on screen, in display order.
    pub fn visible(&self) -> Vec<&FieldRow> {
        if self.show_all {
            self.primary.iter().chain(self.supplementary.iter()).collect()
        } else {
            self.primary.iter().collect()
        }
    }
}

struct Candidate {
    row: FieldRow,
    shown: bool,
    supplementary: bool,
}

pub fn classify(
    plan: &FieldPlan,
    context: &RequestContext,
    transaction: &Transaction,
    flags: FormFlags,
) -> ClassifiedFields {
    let show_all = context.show_all_fields(flags.expanded);
    let missing = |is_missing: bool, key: &'static str| (flags.field_errors && is_missing).then_some(key);

    let mut candidates = vec![
        Candidate {
            row: FieldRow {
                field: Field::Amount,
                required: false,
                error: missing(transaction.is_amount_missing(), "common.error.enterAmount"),
            },
            shown: plan.show_amount,
            supplementary: false,
        },
        Candidate {
            row: FieldRow {
                field: Field::Description,
                required: false,
                error: None,
            },
            shown: true,
            supplementary: false,
        },
        Candidate {
            row: FieldRow {
                field: Field::Distance,
                required: false,
                error: None,
            },
            shown: plan.show_distance,
            supplementary: true,
        },
        Candidate {
            row: FieldRow {
                field: Field::Merchant,
                required: plan.merchant_required,
                error: flags.merchant_error.then_some("common.error.fieldRequired"),
            },
            shown: plan.show_merchant,
            supplementary: !plan.merchant_required,
        },
        Candidate {
            row: FieldRow {
                field: Field::Date,
                required: false,
                error: missing(transaction.is_created_missing(), "common.error.enterDate"),
            },
            shown: plan.show_date,
            supplementary: true,
        },
        Candidate {
            row: FieldRow {
                field: Field::Category,
                required: plan.category_required,
                error: None,
            },
            shown: plan.show_categories,
            supplementary: !plan.category_required,
        },
    ];

    candidates.extend(plan.tag_lists.iter().map(|list| Candidate {
        row: FieldRow {
            field: Field::Tag {
                index: list.index,
                name: list.name.clone(),
            },
            required: list.required,
            error: None,
        },
        shown: plan.show_tags,
        supplementary: !list.required,
    }));

    for field in [Field::TaxRate, Field::TaxAmount] {
        candidates.push(Candidate {
            row: FieldRow {
                field,
                required: false,
                error: None,
            },
            shown: plan.show_tax,
            supplementary: true,
        });
    }
    candidates.push(Candidate {
        row: FieldRow {
            field: Field::Billable,
            required: false,
            error: None,
        },
        shown: plan.show_billable,
        supplementary: true,
    });

    let (supplementary, primary): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .filter(|c| c.shown)
        .partition(|c| c.supplementary && !show_all);

    ClassifiedFields {
        primary: primary.into_iter().map(|c| c.row).collect(),
        supplementary: supplementary.into_iter().map(|c| c.row).collect(),
        show_all,
    }
}

/// Amount shown on the form and the confirm button. Empty while a distance
/// route is pending.
pub fn formatted_amount(
    policy: &Policy,
    transaction: &Transaction,
    context: &RequestContext,
    plan: &FieldPlan,
) -> String {
    if plan.pending_route {
        return String::new();
    }
    if !context.is_distance_request {
        return convert_to_display_string(transaction.amount, &transaction.currency);
    }

    let rate = policy.mileage_rate.clone().unwrap_or_default();
    let amount = match transaction.amount {
        0 => distance::distance_request_amount(transaction.distance_meters(), &rate),
        amount => amount,
    };
    convert_to_display_string(amount, &rate.currency)
}

/// Title text of a row.
pub fn field_title(
    field: &Field,
    policy: &Policy,
    transaction: &Transaction,
    context: &RequestContext,
    plan: &FieldPlan,
    translator: &dyn Translator,
) -> String {
    match field {
        Field::Amount => formatted_amount(policy, transaction, context, plan),
        Field::Description => transaction.comment.clone(),
        Field::Distance | Field::Merchant if transaction.is_merchant_missing() => String::new(),
        Field::Distance | Field::Merchant => transaction.merchant.clone(),
        Field::Date => transaction
            .created
            .unwrap_or_else(ExpenseDate::today)
            .to_string(),
        Field::Category => transaction.category.clone(),
        Field::Tag { index, .. } => transaction.tag_at(*index),
        Field::TaxRate => policy
            .tax_rates
            .as_ref()
            .map(|rates| rates.title(transaction.tax_rate.as_deref(), translator))
            .unwrap_or_default(),
        Field::TaxAmount => {
            convert_to_display_string(transaction.tax_amount.unwrap_or(0), &transaction.currency)
        }
        Field::Billable => translator.translate("common.billable", &[]),
    }
}
