//! Policy field resolution and auto-fill
//!
//! [`resolve`] is a pure function of its inputs; callers re-run it whenever
//! the policy, draft or request context changes and compare the resulting
//! [`FieldPlan`] structurally (or by [`FieldPlan::fingerprint`]).
//!
//! Auto-fill is split out into [`auto_fill`] and [`distance_mutations`],
//! which return the writes the caller should apply. Both only emit a
//! request when the draft does not already hold the target value, so
//! re-running them against an updated draft yields nothing.
use super::context::RequestContext;
use super::distance::{self, MileageRate};
use super::localize::Translator;
use super::mutation::{MutationRequest, PendingAction};
use super::policy::{Policy, calculate_tax_amount, is_tax_tracking_enabled};
use super::transaction::Transaction;

#[derive(minicbor::Encode, Debug, Clone, PartialEq, Eq)]
pub struct TagListPlan {
    #[n(0)]
    pub index: usize,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub required: bool,
}

/// Which optional fields a form displays and which of them are mandatory.
#[derive(minicbor::Encode, Debug, Clone, PartialEq, Eq)]
pub struct FieldPlan {
    #[n(0)]
    pub show_amount: bool,
    #[n(1)]
    pub show_distance: bool,
    #[n(2)]
    pub show_merchant: bool,
    #[n(3)]
    pub merchant_required: bool,
    #[n(4)]
    pub show_date: bool,
    #[n(5)]
    pub show_categories: bool,
    #[n(6)]
    pub category_required: bool,
    #[n(7)]
    pub show_tags: bool,
    #[n(8)]
    pub tag_lists: Vec<TagListPlan>,
    #[n(9)]
    pub show_tax: bool,
    #[n(10)]
    pub show_billable: bool,
    #[n(11)]
    pub pending_route: bool,
}

impl FieldPlan {
    /// sha256 over the CBOR encoding, for cheap change detection.
    pub fn fingerprint(&self) -> anyhow::Result<String> {
        let cbor = minicbor::to_vec(self)?;
        Ok(sha256::digest(&cbor))
    }
}

pub fn resolve(policy: &Policy, transaction: &Transaction, context: &RequestContext) -> FieldPlan {
    let workspace = context.is_policy_expense_chat;

    let show_categories =
        workspace && (!transaction.category.is_empty() || policy.has_enabled_categories());
    let category_required = policy.requires_category
        && context.violations_enabled
        && context.request_type.enforces_category();

    let show_tags = workspace && (!transaction.tag.is_empty() || policy.has_enabled_tags());
    let tag_lists = policy
        .tag_lists
        .iter()
        .enumerate()
        .map(|(index, list)| TagListPlan {
            index,
            name: list.name.clone(),
            required: list.required && context.violations_enabled,
        })
        .collect();

    let pending_route = context.is_distance_request
        && (!transaction.has_route()
            || !policy.mileage_rate.as_ref().is_some_and(MileageRate::has_rate));

    FieldPlan {
        show_amount: context.show_smart_scan_fields,
        show_distance: context.is_distance_request,
        show_merchant: context.show_merchant(),
        merchant_required: context.is_merchant_required(),
        show_date: context.show_date(),
        show_categories,
        category_required,
        show_tags,
        tag_lists,
        show_tax: is_tax_tracking_enabled(workspace, policy),
        show_billable: !policy.is_billable_disabled(),
        pending_route,
    }
}

/// Writes the form would make on its own: single-option category and tag
/// selection, distance amount, pending waypoints and tax amount.
///
/// `previous_amount` is the draft amount seen on the last call; an existing
/// tax amount is kept while the amount is unchanged.
pub fn auto_fill(
    policy: &Policy,
    transaction: &Transaction,
    context: &RequestContext,
    plan: &FieldPlan,
    previous_amount: Option<i64>,
) -> Vec<MutationRequest> {
    let mut requests = vec![];

    let enabled_categories = policy.enabled_categories();
    if transaction.category.is_empty()
        && plan.show_categories
        && plan.category_required
        && enabled_categories.len() == 1
    {
        requests.push(MutationRequest::SetCategory {
            category: enabled_categories[0].name.clone(),
        });
    }

    for (index, list) in policy.tag_lists.iter().enumerate() {
        let required = plan.tag_lists.get(index).is_some_and(|t| t.required);
        let enabled = list.enabled_tags();
        if !required || enabled.len() != 1 || !transaction.tag_at(index).is_empty() {
            continue;
        }
        requests.push(MutationRequest::SetTag {
            index,
            tag: enabled[0].name.clone(),
        });
    }

    if context.is_distance_request {
        let rate = policy.mileage_rate.clone().unwrap_or_default();
        if transaction.amount == 0 {
            let amount = distance::distance_request_amount(transaction.distance_meters(), &rate);
            if amount != 0 {
                requests.push(MutationRequest::SetAmount {
                    amount,
                    currency: rate.currency.clone(),
                });
            }
        }

        let waypoints = plan.pending_route.then_some(PendingAction::Add);
        if transaction.pending_fields.waypoints != waypoints {
            requests.push(MutationRequest::SetPendingFields { waypoints });
        }
    }

    if let Some(rates) = policy.tax_rates.as_ref().filter(|_| plan.show_tax) {
        let amount_unchanged = previous_amount == Some(transaction.amount);
        let target = match transaction.tax_amount {
            Some(existing) if amount_unchanged => existing,
            _ => calculate_tax_amount(rates.percentage(transaction.tax_rate.as_deref()), transaction.amount),
        };
        if transaction.tax_amount != Some(target) {
            requests.push(MutationRequest::SetTaxAmount { amount: target });
        }
    }

    if !requests.is_empty() {
        tracing::debug!(
            transaction_id = %transaction.id,
            count = requests.len(),
            "auto-fill produced mutation requests"
        );
    }
    requests
}

/// Merchant text for distance requests, kept in sync with the route and rate.
pub fn distance_mutations(
    policy: &Policy,
    transaction: &Transaction,
    context: &RequestContext,
    translator: &dyn Translator,
) -> Vec<MutationRequest> {
    if !context.is_distance_request {
        return vec![];
    }
    let rate = policy.mileage_rate.clone().unwrap_or_default();
    let merchant = distance::distance_merchant(
        transaction.has_route(),
        transaction.distance_meters(),
        &rate,
        translator,
    );
    if merchant == transaction.merchant {
        return vec![];
    }
    vec![MutationRequest::SetMerchant { merchant }]
}
