//! Confirmation validation.
//!
//! Checks run in a fixed order and the first failing one decides the
//! outcome. Missing participants and a missing payment method are silent
//! skips rather than errors: the host is expected to have disabled the
//! control that triggers them.
use super::config::EngineConfig;
use super::context::{ConfirmationState, PaymentMethod, RequestContext, RequestType};
use super::currency::{currency_decimals, validate_amount};
use super::error::ConfirmationError;
use super::participants::Participant;
use super::resolver::FieldPlan;
use super::transaction::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoParticipants,
    NoPaymentMethod,
    AlreadyConfirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Hand the selected participants to the submission handler.
    Submit,
    SendMoney(PaymentMethod),
    Skipped(SkipReason),
}

pub type ValidationResult = Result<Verdict, ConfirmationError>;

/// Inputs of one confirmation attempt.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmRequest<'a> {
    pub transaction: &'a Transaction,
    pub context: &'a RequestContext,
    pub plan: &'a FieldPlan,
    pub participants: &'a [Participant],
    pub payment_method: Option<PaymentMethod>,
    pub config: &'a EngineConfig,
}

/// Split edits highlight missing amount/date/merchant once a scan failed
/// to fill them, or once the user tried to confirm without them.
pub fn should_display_field_error(
    transaction: &Transaction,
    context: &RequestContext,
    state: ConfirmationState,
) -> bool {
    if !context.is_editing_split {
        return false;
    }
    let expense_report = context.is_policy_expense_chat;

    (context.has_smart_scan_failed
        && transaction.has_missing_smartscan_fields(context.is_distance_request, expense_report))
        || (state.split_confirmed() && transaction.are_required_fields_empty(expense_report))
}

pub fn validate(request: &ConfirmRequest<'_>, state: ConfirmationState) -> ValidationResult {
    let ConfirmRequest {
        transaction,
        context,
        plan,
        participants,
        payment_method,
        config,
    } = *request;

    if !participants.iter().any(|p| p.selected) {
        return Ok(Verdict::Skipped(SkipReason::NoParticipants));
    }

    let field_errors = should_display_field_error(transaction, context, state);
    if (plan.merchant_required && transaction.is_merchant_missing())
        || (field_errors && transaction.is_merchant_missing())
    {
        return Err(ConfirmationError::InvalidMerchant);
    }

    if transaction.category.encode_utf16().count() > config.category_max_length {
        return Err(ConfirmationError::InvalidCategoryLength);
    }

    match context.request_type {
        RequestType::Send => {
            return Ok(match payment_method {
                Some(method) => Verdict::SendMoney(method),
                None => Verdict::Skipped(SkipReason::NoPaymentMethod),
            });
        }
        RequestType::Request | RequestType::Split | RequestType::TrackExpense => {}
    }

    let decimals = currency_decimals(&transaction.currency);
    if context.is_distance_request
        && !plan.pending_route
        && !validate_amount(&transaction.amount.to_string(), decimals, config.amount_max_length)
    {
        return Err(ConfirmationError::InvalidAmount);
    }

    if context.is_editing_split && transaction.are_required_fields_empty(context.is_policy_expense_chat) {
        return Err(ConfirmationError::SmartscanFailure);
    }

    Ok(Verdict::Submit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Policy, PolicyType};
    use crate::resolver::resolve;
    use crate::transaction::ExpenseDate;

    fn attempt(
        transaction: &Transaction,
        context: &RequestContext,
        participants: &[Participant],
        payment_method: Option<PaymentMethod>,
        state: ConfirmationState,
    ) -> ValidationResult {
        let plan = resolve(&Policy::new("pol", PolicyType::Team), transaction, context);
        let config = EngineConfig::default();
        validate(
            &ConfirmRequest {
                transaction,
                context,
                plan: &plan,
                participants,
                payment_method,
                config: &config,
            },
            state,
        )
    }

    fn someone() -> Vec<Participant> {
        vec![Participant::new(1, "a@example.com")]
    }

    #[test]
    fn nobody_selected_is_a_silent_skip() {
        let ctx = RequestContext::new(RequestType::Request).set_policy_expense_chat(true);
        let mut p = Participant::new(1, "a");
        p.selected = false;
        // merchant is missing too, but participants are checked first
        let result = attempt(&Transaction::new("t", "USD"), &ctx, &[p], None, ConfirmationState::Editing);
        assert_eq!(result, Ok(Verdict::Skipped(SkipReason::NoParticipants)));
    }

    #[test]
    fn merchant_precedes_category_length() {
        let ctx = RequestContext::new(RequestType::Request).set_policy_expense_chat(true);
        let txn = Transaction::new("t", "USD").set_category(&"x".repeat(300));
        let result = attempt(&txn, &ctx, &someone(), None, ConfirmationState::Editing);
        assert_eq!(result, Err(ConfirmationError::InvalidMerchant));

        let txn = txn.set_merchant("Cafe");
        let result = attempt(&txn, &ctx, &someone(), None, ConfirmationState::Editing);
        assert_eq!(result, Err(ConfirmationError::InvalidCategoryLength));
    }

    #[test]
    fn category_length_counts_utf16_units() {
        let ctx = RequestContext::new(RequestType::Request);
        let accented = Transaction::new("t", "USD").set_category(&"é".repeat(200));
        let result = attempt(&accented, &ctx, &someone(), None, ConfirmationState::Editing);
        assert_eq!(result, Ok(Verdict::Submit));

        // 200 emoji are 400 UTF-16 units
        let emoji = Transaction::new("t", "USD").set_category(&"😀".repeat(200));
        let result = attempt(&emoji, &ctx, &someone(), None, ConfirmationState::Editing);
        assert_eq!(result, Err(ConfirmationError::InvalidCategoryLength));
    }

    #[test]
    fn send_needs_payment_method() {
        let ctx = RequestContext::new(RequestType::Send);
        let txn = Transaction::new("t", "USD").set_amount(500);
        assert_eq!(
            attempt(&txn, &ctx, &someone(), None, ConfirmationState::Editing),
            Ok(Verdict::Skipped(SkipReason::NoPaymentMethod))
        );
        assert_eq!(
            attempt(&txn, &ctx, &someone(), Some(PaymentMethod::Wallet), ConfirmationState::Editing),
            Ok(Verdict::SendMoney(PaymentMethod::Wallet))
        );
    }

    #[test]
    fn distance_amount_checked_once_route_resolved() {
        let ctx = RequestContext::new(RequestType::Request).set_distance_request(true);
        let txn = Transaction::new("t", "USD").set_amount(-250).set_route(1000.0);
        let policy = Policy::new("pol", PolicyType::Team).set_mileage_rate(
            crate::distance::MileageRate::new(crate::distance::DistanceUnit::Miles, 67.0, "USD"),
        );
        let plan = resolve(&policy, &txn, &ctx);
        let config = EngineConfig::default();
        let participants = someone();
        let request = ConfirmRequest {
            transaction: &txn,
            context: &ctx,
            plan: &plan,
            participants: &participants,
            payment_method: None,
            config: &config,
        };
        assert_eq!(validate(&request, ConfirmationState::Editing), Err(ConfirmationError::InvalidAmount));

        // pending route skips the amount check
        let pending = resolve(&Policy::default(), &txn, &ctx);
        let request = ConfirmRequest {
            transaction: &txn,
            context: &ctx,
            plan: &pending,
            participants: &participants,
            payment_method: None,
            config: &config,
        };
        assert_eq!(validate(&request, ConfirmationState::Editing), Ok(Verdict::Submit));
    }

    #[test]
    fn split_edit_with_empty_fields_fails() {
        let ctx = RequestContext::new(RequestType::Split).set_editing_split(true);
        let txn = Transaction::new("t", "USD").set_merchant("Cafe");
        assert_eq!(
            attempt(&txn, &ctx, &someone(), None, ConfirmationState::Editing),
            Err(ConfirmationError::SmartscanFailure)
        );

        let txn = txn.set_amount(100).set_created(ExpenseDate::today());
        assert_eq!(
            attempt(&txn, &ctx, &someone(), None, ConfirmationState::SplitErrorShown),
            Ok(Verdict::Submit)
        );
    }

    #[test]
    fn highlighted_split_requires_merchant() {
        let ctx = RequestContext::new(RequestType::Split)
            .set_editing_split(true)
            .set_policy_expense_chat(true)
            .set_scan_request(true);
        let txn = Transaction::new("t", "USD").set_amount(100);
        assert!(should_display_field_error(&txn, &ctx, ConfirmationState::SplitErrorShown));
        assert_eq!(
            attempt(&txn, &ctx, &someone(), None, ConfirmationState::SplitErrorShown),
            Err(ConfirmationError::InvalidMerchant)
        );
    }
}
