//! Mount-scoped state of a confirmation form
use super::classifier::{self, ClassifiedFields, Field, FormFlags};
use super::context::{ConfirmationState, PaymentMethod, RequestContext, RequestType};
use super::error::ConfirmationError;
use super::localize::Translator;
use super::mutation::MutationRequest;
use super::navigation::{Destination, Navigator, Step};
use super::participants::{Participant, selected_participants};
use super::policy::Policy;
use super::resolver::{self, FieldPlan};
use super::transaction::Transaction;
use super::validator::{self, ConfirmRequest, SkipReason, ValidationResult, Verdict};

/// Receives successful confirmations.
pub trait SubmissionHandler {
    fn on_confirm(&mut self, participants: &[Participant]);
    fn on_send_money(&mut self, payment_method: PaymentMethod);
}

/// Transient UI state, discarded with the form.
#[derive(Debug, Default)]
pub struct ConfirmationForm {
    state: ConfirmationState,
    expanded: bool,
    form_error: Option<ConfirmationError>,
    attachment_invalid: bool,
    last_amount: Option<i64>,
}

impl ConfirmationForm {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn state(&self) -> ConfirmationState {
        self.state
    }
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
    /// Inline error under the form, at most one at a time.
    pub fn form_error(&self) -> Option<ConfirmationError> {
        self.form_error
    }
    /// Error that must be shown as a modal.
    pub fn blocking_error(&self) -> Option<ConfirmationError> {
        self.attachment_invalid
            .then_some(ConfirmationError::ReceiptUnsupportedFormat)
    }
    pub fn is_attachment_invalid(&self) -> bool {
        self.attachment_invalid
    }

    /// Reveal the supplementary fields.
    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn flags(&self, transaction: &Transaction, context: &RequestContext) -> FormFlags {
        FormFlags {
            expanded: self.expanded,
            merchant_error: self.state.is_merchant_error(),
            field_errors: validator::should_display_field_error(transaction, context, self.state),
        }
    }

    pub fn classify(
        &self,
        plan: &FieldPlan,
        context: &RequestContext,
        transaction: &Transaction,
    ) -> ClassifiedFields {
        classifier::classify(plan, context, transaction, self.flags(transaction, context))
    }

    /// Auto-fill requests for this render. Remembers the amount so an
    /// existing tax amount is only recomputed after the amount changes.
    pub fn auto_fill(
        &mut self,
        policy: &Policy,
        transaction: &Transaction,
        context: &RequestContext,
        plan: &FieldPlan,
    ) -> Vec<MutationRequest> {
        let requests = resolver::auto_fill(policy, transaction, context, plan, self.last_amount);
        self.last_amount = Some(transaction.amount);
        requests
    }

    pub fn confirm(
        &mut self,
        request: &ConfirmRequest<'_>,
        handler: &mut dyn SubmissionHandler,
    ) -> ValidationResult {
        if self.state.is_confirmed() && !request.context.is_editing_split {
            return Ok(Verdict::Skipped(SkipReason::AlreadyConfirmed));
        }

        let outcome = validator::validate(request, self.state);
        match outcome {
            Ok(Verdict::Submit) => {
                let selected = selected_participants(request.participants);
                self.state = ConfirmationState::Confirmed;
                self.form_error = None;
                tracing::info!(
                    transaction_id = %request.transaction.id,
                    request_type = %request.context.request_type,
                    participants = selected.len(),
                    "money request confirmed"
                );
                handler.on_confirm(&selected);
            }
            Ok(Verdict::SendMoney(method)) => {
                self.state = ConfirmationState::Confirmed;
                self.form_error = None;
                tracing::info!(transaction_id = %request.transaction.id, %method, "sending money");
                handler.on_send_money(method);
            }
            Ok(Verdict::Skipped(reason)) => {
                tracing::debug!(?reason, "confirmation skipped");
            }
            Err(err @ ConfirmationError::InvalidMerchant) => {
                self.state = ConfirmationState::MerchantErrorShown {
                    split_confirmed: self.state.split_confirmed(),
                };
                self.form_error = Some(err);
            }
            Err(err @ ConfirmationError::SmartscanFailure) => {
                self.state = ConfirmationState::SplitErrorShown;
                self.form_error = Some(err);
            }
            Err(err) => {
                self.form_error = Some(err);
            }
        }
        outcome
    }

    /// Recompute the displayed error after a focus change or a draft update.
    pub fn reconcile(&mut self, transaction: &Transaction, context: &RequestContext) {
        if self.state.is_merchant_error() && !transaction.is_merchant_missing() {
            self.state = if self.state.split_confirmed() {
                ConfirmationState::SplitErrorShown
            } else {
                ConfirmationState::Editing
            };
        }
        // a split edit stays editable after confirming so a failed save can be retried
        if context.is_editing_split && self.state.is_confirmed() {
            self.state = ConfirmationState::Editing;
        }

        let field_errors = validator::should_display_field_error(transaction, context, self.state);
        self.form_error = if field_errors && context.has_smart_scan_failed {
            Some(ConfirmationError::ReceiptScanningFailed)
        } else if field_errors && self.state.split_confirmed() {
            Some(ConfirmationError::SmartscanFailure)
        } else if self.state.is_merchant_error() {
            Some(ConfirmationError::InvalidMerchant)
        } else {
            None
        };
        tracing::debug!(state = ?self.state, error = ?self.form_error, "reconciled form error");
    }

    /// Where pressing `field` leads, or `None` when the row is inert.
    pub fn field_destination(
        &self,
        field: &Field,
        transaction: &Transaction,
        context: &RequestContext,
    ) -> Option<Destination> {
        if context.is_read_only || self.state.is_confirmed() {
            return None;
        }
        let step = match field {
            Field::Amount if context.is_distance_request => return None,
            Field::Amount if context.is_editing_split => {
                return Some(Destination::EditSplitBill {
                    report_id: context.report_id.clone(),
                    report_action_id: context.report_action_id.clone().unwrap_or_default(),
                    step: Step::Amount,
                });
            }
            Field::Amount => Step::Amount,
            Field::Description => Step::Description,
            Field::Distance => Step::Distance,
            Field::Merchant => Step::Merchant,
            Field::Date => Step::Date,
            Field::Category => Step::Category,
            Field::Tag { index, .. } => Step::Tag(*index),
            Field::TaxRate => Step::TaxRate,
            Field::TaxAmount => Step::TaxAmount,
            Field::Billable => return None,
        };
        Some(Destination::step(step, context, &transaction.id))
    }

    pub fn press_field(
        &self,
        field: &Field,
        transaction: &Transaction,
        context: &RequestContext,
        navigator: &mut dyn Navigator,
    ) -> bool {
        match self.field_destination(field, transaction, context) {
            Some(destination) => {
                navigator.navigate(destination);
                true
            }
            None => false,
        }
    }

    /// The receipt turned out to be a password protected PDF.
    pub fn reject_protected_receipt(&mut self) {
        tracing::warn!("password protected receipt cannot be previewed");
        self.attachment_invalid = true;
    }

    /// Close the unsupported-receipt modal and return to the scan step.
    pub fn dismiss_receipt_modal(
        &mut self,
        transaction: &Transaction,
        context: &RequestContext,
        navigator: &mut dyn Navigator,
    ) {
        self.attachment_invalid = false;
        navigator.go_back(Destination::step(Step::Scan, context, &transaction.id));
    }
}

/// Label of the confirm button, first letter capitalised.
pub fn confirm_button_label(
    transaction: &Transaction,
    context: &RequestContext,
    plan: &FieldPlan,
    formatted_amount: &str,
    translator: &dyn Translator,
) -> String {
    let amount_param = [("amount", formatted_amount.to_string())];
    let has_receipt = transaction.receipt.is_some();
    let zero = transaction.amount == 0;

    let text = match context.request_type {
        RequestType::TrackExpense => translator.translate("iou.trackExpense", &[]),
        RequestType::Split if zero => translator.translate("iou.split", &[]),
        RequestType::Request if has_receipt || plan.pending_route => {
            if zero {
                translator.translate("iou.request", &[])
            } else {
                translator.translate("iou.requestAmount", &amount_param)
            }
        }
        RequestType::Split | RequestType::Send if plan.pending_route => {
            if zero {
                translator.translate("iou.request", &[])
            } else {
                translator.translate("iou.requestAmount", &amount_param)
            }
        }
        RequestType::Split => translator.translate("iou.splitAmount", &amount_param),
        RequestType::Request | RequestType::Send => {
            translator.translate("iou.requestAmount", &amount_param)
        }
    };

    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::localize::KeyTranslator;
    use crate::resolver::resolve;
    use crate::transaction::ExpenseDate;

    struct Ignore;

    impl SubmissionHandler for Ignore {
        fn on_confirm(&mut self, _participants: &[Participant]) {}
        fn on_send_money(&mut self, _payment_method: PaymentMethod) {}
    }

    fn press_confirm(
        form: &mut ConfirmationForm,
        transaction: &Transaction,
        context: &RequestContext,
    ) -> ValidationResult {
        let plan = resolve(&Policy::default(), transaction, context);
        let config = EngineConfig::default();
        let participants = vec![Participant::new(1, "a@example.com")];
        let request = ConfirmRequest {
            transaction,
            context,
            plan: &plan,
            participants: &participants,
            payment_method: None,
            config: &config,
        };
        form.confirm(&request, &mut Ignore)
    }

    fn row_errors(
        form: &ConfirmationForm,
        transaction: &Transaction,
        context: &RequestContext,
    ) -> Vec<&'static str> {
        let plan = resolve(&Policy::default(), transaction, context);
        form.classify(&plan, context, transaction)
            .visible()
            .iter()
            .filter_map(|row| row.error)
            .collect()
    }

    #[test]
    fn merchant_error_keeps_split_highlighting() {
        let ctx = RequestContext::new(RequestType::Split)
            .set_editing_split(true)
            .set_report("r1", Some("a1"));
        let txn = Transaction::new("txn", "USD");
        let mut form = ConfirmationForm::new();

        assert_eq!(press_confirm(&mut form, &txn, &ctx), Err(ConfirmationError::SmartscanFailure));
        assert_eq!(form.state(), ConfirmationState::SplitErrorShown);
        assert_eq!(
            row_errors(&form, &txn, &ctx),
            vec!["common.error.enterAmount", "common.error.enterDate"]
        );

        // the highlighted split now also demands a merchant
        assert_eq!(press_confirm(&mut form, &txn, &ctx), Err(ConfirmationError::InvalidMerchant));
        assert_eq!(
            form.state(),
            ConfirmationState::MerchantErrorShown { split_confirmed: true }
        );
        assert_eq!(
            row_errors(&form, &txn, &ctx),
            vec![
                "common.error.enterAmount",
                "common.error.fieldRequired",
                "common.error.enterDate"
            ]
        );

        form.reconcile(&txn, &ctx);
        assert_eq!(form.form_error(), Some(ConfirmationError::SmartscanFailure));

        let txn = txn.set_merchant("Diner");
        form.reconcile(&txn, &ctx);
        assert_eq!(form.state(), ConfirmationState::SplitErrorShown);
        assert_eq!(form.form_error(), Some(ConfirmationError::SmartscanFailure));
        assert_eq!(
            row_errors(&form, &txn, &ctx),
            vec!["common.error.enterAmount", "common.error.enterDate"]
        );
    }

    #[test]
    fn merchant_error_clears_once_merchant_is_set() {
        let ctx = RequestContext::new(RequestType::Request).set_policy_expense_chat(true);
        let txn = Transaction::new("txn", "USD").set_amount(100);
        let mut form = ConfirmationForm::new();

        assert_eq!(press_confirm(&mut form, &txn, &ctx), Err(ConfirmationError::InvalidMerchant));
        assert_eq!(
            form.state(),
            ConfirmationState::MerchantErrorShown { split_confirmed: false }
        );
        form.reconcile(&txn, &ctx);
        assert_eq!(form.form_error(), Some(ConfirmationError::InvalidMerchant));

        let txn = txn.set_merchant("Cafe");
        form.reconcile(&txn, &ctx);
        assert_eq!(form.state(), ConfirmationState::Editing);
        assert_eq!(form.form_error(), None);
    }

    #[test]
    fn confirmed_split_edit_reopens() {
        let ctx = RequestContext::new(RequestType::Split).set_editing_split(true);
        let txn = Transaction::new("txn", "USD")
            .set_amount(100)
            .set_merchant("Diner")
            .set_created(ExpenseDate::today());
        let mut form = ConfirmationForm::new();

        assert_eq!(press_confirm(&mut form, &txn, &ctx), Ok(Verdict::Submit));
        assert!(form.state().is_confirmed());

        form.reconcile(&txn, &ctx);
        assert_eq!(form.state(), ConfirmationState::Editing);
        assert_eq!(form.form_error(), None);
        assert_eq!(press_confirm(&mut form, &txn, &ctx), Ok(Verdict::Submit));
    }

    #[test]
    fn plain_request_error_resets_on_reconcile() {
        let ctx = RequestContext::new(RequestType::Request);
        let txn = Transaction::new("txn", "USD").set_category(&"c".repeat(300));
        let mut form = ConfirmationForm::new();

        assert_eq!(
            press_confirm(&mut form, &txn, &ctx),
            Err(ConfirmationError::InvalidCategoryLength)
        );
        assert_eq!(form.form_error(), Some(ConfirmationError::InvalidCategoryLength));

        form.reconcile(&txn, &ctx);
        assert_eq!(form.state(), ConfirmationState::Editing);
        assert_eq!(form.form_error(), None);
    }

    #[test]
    fn expand_is_a_toggle() {
        let mut form = ConfirmationForm::new();
        assert!(!form.is_expanded());
        form.toggle_expanded();
        assert!(form.is_expanded());
        form.toggle_expanded();
        assert!(!form.is_expanded());
    }

    #[test]
    fn amount_row_routes_to_split_editor() {
        let form = ConfirmationForm::new();
        let txn = Transaction::new("txn", "USD");
        let ctx = RequestContext::new(RequestType::Split)
            .set_editing_split(true)
            .set_report("r1", Some("a1"));

        let mut navigator: Vec<Destination> = vec![];
        assert!(form.press_field(&Field::Amount, &txn, &ctx, &mut navigator));
        assert_eq!(
            navigator,
            vec![Destination::EditSplitBill {
                report_id: "r1".into(),
                report_action_id: "a1".into(),
                step: Step::Amount
            }]
        );
        assert!(!form.press_field(&Field::Billable, &txn, &ctx, &mut navigator));
    }

    #[test]
    fn read_only_rows_are_inert() {
        let form = ConfirmationForm::new();
        let txn = Transaction::new("txn", "USD");
        let ctx = RequestContext::new(RequestType::Request).set_read_only(true);
        assert_eq!(form.field_destination(&Field::Merchant, &txn, &ctx), None);
    }

    #[test]
    fn protected_receipt_modal_returns_to_scan() {
        let mut form = ConfirmationForm::new();
        let txn = Transaction::new("txn", "USD");
        let ctx = RequestContext::new(RequestType::Request);

        form.reject_protected_receipt();
        assert_eq!(form.blocking_error(), Some(ConfirmationError::ReceiptUnsupportedFormat));
        assert_eq!(form.form_error(), None);

        let mut navigator: Vec<Destination> = vec![];
        form.dismiss_receipt_modal(&txn, &ctx, &mut navigator);
        assert_eq!(form.blocking_error(), None);
        assert_eq!(navigator, vec![Destination::step(Step::Scan, &ctx, "txn")]);
    }

    #[test]
    fn button_labels() {
        let policy = Policy::default();
        let request = RequestContext::new(RequestType::Request);
        let txn = Transaction::new("txn", "USD").set_amount(1_250);
        let plan = resolve(&policy, &txn, &request);

        assert_eq!(
            confirm_button_label(&txn, &request, &plan, "$12.50", &KeyTranslator),
            "Iou.requestAmount(amount=$12.50)"
        );

        let split = RequestContext::new(RequestType::Split);
        let empty = Transaction::new("txn", "USD");
        assert_eq!(
            confirm_button_label(&empty, &split, &plan, "", &KeyTranslator),
            "Iou.split"
        );
        assert_eq!(
            confirm_button_label(&txn, &split, &plan, "$12.50", &KeyTranslator),
            "Iou.splitAmount(amount=$12.50)"
        );

        let track = RequestContext::new(RequestType::TrackExpense);
        assert_eq!(
            confirm_button_label(&txn, &track, &plan, "$12.50", &KeyTranslator),
            "Iou.trackExpense"
        );
    }
}
