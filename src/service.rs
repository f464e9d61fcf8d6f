//! Service layer API over stored policies and draft transactions
use super::config::EngineConfig;
use super::context::{PaymentMethod, RequestContext};
use super::error::StoreError;
use super::form::{ConfirmationForm, SubmissionHandler};
use super::localize::Translator;
use super::mutation::{MutationRequest, MutationSink};
use super::participants::Participant;
use super::policy::Policy;
use super::resolver::{self, FieldPlan};
use super::transaction::Transaction;
use super::validator::{ConfirmRequest, ValidationResult};
use anyhow::Context;
use sled::Batch;
use std::sync::Arc;

/// Read access to workspace policies.
pub trait PolicyStore {
    fn policy(&self, policy_id: &str) -> anyhow::Result<Policy>;
}

/// Draft and plan after auto-fill has settled.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub transaction: Transaction,
    pub plan: FieldPlan,
    pub fingerprint: String,
}

pub struct ConfirmationService {
    instance: Arc<sled::Db>,
    config: EngineConfig,
}

fn policy_key(policy_id: &str) -> String {
    format!("policy/{policy_id}")
}

fn transaction_key(transaction_id: &str) -> String {
    format!("transaction/{transaction_id}")
}

impl ConfirmationService {
    pub fn new(instance: Arc<sled::Db>, config: EngineConfig) -> Self {
        Self { instance, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn save_policy(&self, policy: &Policy) -> anyhow::Result<()> {
        self.instance
            .insert(policy_key(&policy.id).as_bytes(), minicbor::to_vec(policy)?)?;
        Ok(())
    }

    pub fn save_transaction(&self, transaction: &Transaction) -> anyhow::Result<()> {
        self.instance.insert(
            transaction_key(&transaction.id).as_bytes(),
            minicbor::to_vec(transaction)?,
        )?;
        Ok(())
    }

    /// Store a policy and a draft together.
    pub fn save_draft(&self, policy: &Policy, transaction: &Transaction) -> anyhow::Result<()> {
        let mut batch = Batch::default();
        batch.insert(policy_key(&policy.id).as_bytes(), minicbor::to_vec(policy)?);
        batch.insert(
            transaction_key(&transaction.id).as_bytes(),
            minicbor::to_vec(transaction)?,
        );
        self.instance.apply_batch(batch)?;
        Ok(())
    }

    pub fn load_transaction(&self, transaction_id: &str) -> anyhow::Result<Transaction> {
        let key = transaction_key(transaction_id);
        let bytes = self
            .instance
            .get(key.as_bytes())?
            .ok_or_else(|| StoreError::MissingTransaction(transaction_id.to_string()))?;
        let transaction = minicbor::decode(&bytes).map_err(|_| StoreError::Decode(key))?;
        Ok(transaction)
    }

    /// Apply requests to the stored draft and persist the result.
    pub fn apply_mutations(
        &self,
        transaction_id: &str,
        requests: &[MutationRequest],
    ) -> anyhow::Result<Transaction> {
        let mut transaction = self.load_transaction(transaction_id)?;
        if requests.is_empty() {
            return Ok(transaction);
        }
        for request in requests {
            transaction.apply(request);
        }
        self.save_transaction(&transaction)?;
        tracing::debug!(transaction_id, count = requests.len(), "applied mutation requests");
        Ok(transaction)
    }

    /// Resolve the field plan for a stored draft and persist every auto-fill
    /// write, so the returned plan reflects the settled draft.
    pub fn prepare(
        &self,
        transaction_id: &str,
        policy_id: &str,
        context: &RequestContext,
        form: &mut ConfirmationForm,
        translator: &dyn Translator,
    ) -> anyhow::Result<Prepared> {
        let policy = self.policy(policy_id)?;
        let transaction = self
            .load_transaction(transaction_id)
            .with_context(|| format!("preparing confirmation for {transaction_id}"))?;

        let plan = resolver::resolve(&policy, &transaction, context);
        let mut requests = form.auto_fill(&policy, &transaction, context, &plan);
        requests.extend(resolver::distance_mutations(&policy, &transaction, context, translator));

        let transaction = self.apply_mutations(transaction_id, &requests)?;
        let plan = resolver::resolve(&policy, &transaction, context);
        let fingerprint = plan.fingerprint()?;
        tracing::debug!(transaction_id, policy_id, %fingerprint, "field plan resolved");

        Ok(Prepared {
            transaction,
            plan,
            fingerprint,
        })
    }

    /// Validate a prepared draft and hand it to `handler` on success.
    pub fn confirm(
        &self,
        prepared: &Prepared,
        context: &RequestContext,
        participants: &[Participant],
        payment_method: Option<PaymentMethod>,
        form: &mut ConfirmationForm,
        handler: &mut dyn SubmissionHandler,
    ) -> ValidationResult {
        let request = ConfirmRequest {
            transaction: &prepared.transaction,
            context,
            plan: &prepared.plan,
            participants,
            payment_method,
            config: &self.config,
        };
        form.confirm(&request, handler)
    }
}

impl PolicyStore for ConfirmationService {
    /// Stored policy; a missing mileage rate falls back to the configured default.
    fn policy(&self, policy_id: &str) -> anyhow::Result<Policy> {
        let key = policy_key(policy_id);
        let bytes = self
            .instance
            .get(key.as_bytes())?
            .ok_or_else(|| StoreError::MissingPolicy(policy_id.to_string()))?;
        let mut policy: Policy = minicbor::decode(&bytes).map_err(|_| StoreError::Decode(key))?;
        if policy.mileage_rate.is_none() {
            policy.mileage_rate = Some(self.config.default_mileage.clone());
        }
        Ok(policy)
    }
}

impl MutationSink for ConfirmationService {
    fn submit(&mut self, transaction_id: &str, request: MutationRequest) {
        if let Err(err) = self.apply_mutations(transaction_id, std::slice::from_ref(&request)) {
            tracing::warn!(transaction_id, ?request, "dropping mutation request: {err:#}");
        }
    }
}
