//! Workspace policy configuration as consumed by the field resolver
use super::distance::MileageRate;
use super::localize::Translator;
use std::collections::BTreeMap;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyType {
    #[n(0)]
    #[default]
    Personal,
    #[n(1)]
    Team,
    #[n(2)]
    Corporate,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct PolicyCategory {
    #[n(0)]
    pub name: String,
    #[n(1)]
    pub enabled: bool,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct PolicyTag {
    #[n(0)]
    pub name: String,
    #[n(1)]
    pub enabled: bool,
}

/// One level of a (possibly multi-level) tag hierarchy.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct PolicyTagList {
    #[n(0)]
    pub name: String,
    #[n(1)]
    pub required: bool,
    #[n(2)]
    pub tags: BTreeMap<String, PolicyTag>,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct TaxRate {
    #[n(0)]
    pub name: String,
    #[n(1)]
    pub value: String, // percentage, e.g. "5%"
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq, Default)]
pub struct TaxRates {
    #[n(0)]
    pub name: String,
    #[n(1)]
    pub default_external_id: String,
    #[n(2)]
    pub default_value: String,
    #[n(3)]
    pub taxes: BTreeMap<String, TaxRate>,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisabledFields {
    #[n(0)]
    pub default_billable: Option<bool>,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Default)]
pub struct Policy {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub policy_type: PolicyType,
    #[n(2)]
    pub requires_category: bool,
    #[n(3)]
    pub tax_tracking_enabled: bool,
    #[n(4)]
    pub categories: BTreeMap<String, PolicyCategory>,
    #[n(5)]
    pub tag_lists: Vec<PolicyTagList>,
    #[n(6)]
    pub tax_rates: Option<TaxRates>,
    #[n(7)]
    pub disabled_fields: DisabledFields,
    #[n(8)]
    pub mileage_rate: Option<MileageRate>,
}

impl PolicyTagList {
    pub fn enabled_tags(&self) -> Vec<&PolicyTag> {
        self.tags.values().filter(|t| t.enabled).collect()
    }
}

impl TaxRates {
    fn describe(rate: &TaxRate) -> String {
        format!("{} ({})", rate.name, rate.value)
    }

    /// Title of the selected rate, falling back to the policy default.
    pub fn title(&self, selected: Option<&str>, translator: &dyn Translator) -> String {
        if let Some(rate) = selected.and_then(|key| self.taxes.get(key)) {
            return Self::describe(rate);
        }
        match self.taxes.get(&self.default_external_id) {
            Some(rate) => format!(
                "{} • {}",
                Self::describe(rate),
                translator.translate("common.default", &[])
            ),
            None => String::new(),
        }
    }

    /// Percentage string of the selected rate, or the default one.
    pub fn percentage(&self, selected: Option<&str>) -> &str {
        selected
            .and_then(|key| self.taxes.get(key))
            .map(|rate| rate.value.as_str())
            .unwrap_or(self.default_value.as_str())
    }
}

impl Policy {
    /// Construct a new policy, this becomes the basis for the other setters
    pub fn new(id: &str, policy_type: PolicyType) -> Self {
        Self {
            id: id.to_string(),
            policy_type,
            ..Self::default()
        }
    }
    pub fn set_requires_category(mut self, required: bool) -> Self {
        self.requires_category = required;
        self
    }
    pub fn set_tax_tracking(mut self, enabled: bool) -> Self {
        self.tax_tracking_enabled = enabled;
        self
    }
    pub fn add_category(mut self, name: &str, enabled: bool) -> Self {
        self.categories.insert(
            name.to_string(),
            PolicyCategory {
                name: name.to_string(),
                enabled,
            },
        );
        self
    }
    pub fn add_tag_list(mut self, name: &str, required: bool, tags: &[(&str, bool)]) -> Self {
        let tags = tags
            .iter()
            .map(|(tag, enabled)| {
                (
                    tag.to_string(),
                    PolicyTag {
                        name: tag.to_string(),
                        enabled: *enabled,
                    },
                )
            })
            .collect();
        self.tag_lists.push(PolicyTagList {
            name: name.to_string(),
            required,
            tags,
        });
        self
    }
    pub fn set_tax_rates(mut self, rates: TaxRates) -> Self {
        self.tax_rates = Some(rates);
        self
    }
    pub fn set_default_billable_disabled(mut self, disabled: Option<bool>) -> Self {
        self.disabled_fields.default_billable = disabled;
        self
    }
    pub fn set_mileage_rate(mut self, rate: MileageRate) -> Self {
        self.mileage_rate = Some(rate);
        self
    }

    pub fn enabled_categories(&self) -> Vec<&PolicyCategory> {
        self.categories.values().filter(|c| c.enabled).collect()
    }
    pub fn has_enabled_categories(&self) -> bool {
        self.categories.values().any(|c| c.enabled)
    }
    pub fn has_enabled_tags(&self) -> bool {
        self.tag_lists
            .iter()
            .any(|list| list.tags.values().any(|t| t.enabled))
    }
    pub fn is_paid_group_policy(&self) -> bool {
        matches!(self.policy_type, PolicyType::Team | PolicyType::Corporate)
    }
    pub fn is_billable_disabled(&self) -> bool {
        self.disabled_fields.default_billable == Some(true)
    }
}

/// Tax is tracked only on workspace chats whose policy enables it.
pub fn is_tax_tracking_enabled(is_policy_expense_chat: bool, policy: &Policy) -> bool {
    is_policy_expense_chat && policy.tax_tracking_enabled
}

/// Tax included in a tax-inclusive `amount`, both in hundredths.
pub fn calculate_tax_amount(percentage: &str, amount: i64) -> i64 {
    let pct = percentage
        .trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .unwrap_or(0.0);
    let divisor = pct / 100.0 + 1.0;
    let amount = amount as f64;
    (amount - amount / divisor).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localize::KeyTranslator;

    fn rates() -> TaxRates {
        let mut taxes = BTreeMap::new();
        taxes.insert(
            "id_VAT".to_string(),
            TaxRate {
                name: "VAT".into(),
                value: "20%".into(),
            },
        );
        taxes.insert(
            "id_LOW".to_string(),
            TaxRate {
                name: "Reduced".into(),
                value: "5%".into(),
            },
        );
        TaxRates {
            name: "Tax".into(),
            default_external_id: "id_VAT".into(),
            default_value: "20%".into(),
            taxes,
        }
    }

    #[test]
    fn tax_is_extracted_from_inclusive_amount() {
        assert_eq!(calculate_tax_amount("20%", 12_000), 2_000);
        assert_eq!(calculate_tax_amount("5%", 10_500), 500);
        assert_eq!(calculate_tax_amount("", 10_000), 0);
    }

    #[test]
    fn tax_title_prefers_selection() {
        let rates = rates();
        assert_eq!(rates.title(Some("id_LOW"), &KeyTranslator), "Reduced (5%)");
        assert_eq!(rates.title(None, &KeyTranslator), "VAT (20%) • common.default");
        assert_eq!(rates.percentage(Some("id_LOW")), "5%");
        assert_eq!(rates.percentage(Some("missing")), "20%");
    }

    #[test]
    fn enabled_lookups() {
        let policy = Policy::new("pol", PolicyType::Team)
            .add_category("Travel", true)
            .add_category("Meals", false)
            .add_tag_list("Department", true, &[("Sales", false)]);

        assert!(policy.has_enabled_categories());
        assert_eq!(policy.enabled_categories().len(), 1);
        assert!(!policy.has_enabled_tags());
        assert!(policy.is_paid_group_policy());
    }

    #[test]
    fn tax_tracking_needs_workspace_chat() {
        let policy = Policy::new("pol", PolicyType::Corporate).set_tax_tracking(true);
        assert!(is_tax_tracking_enabled(true, &policy));
        assert!(!is_tax_tracking_enabled(false, &policy));
    }
}
