//! Participants of a money request and their share of a split
use super::context::RequestContext;
use super::currency::convert_to_display_string;
use super::navigation::Destination;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Participant {
    pub account_id: Option<u64>,
    pub report_id: Option<String>,
    pub login: String,
    pub selected: bool,
    pub is_policy_expense_chat: bool,
    pub is_self_dm: bool,
    pub is_optimistic: bool, // created locally, not yet known to the server
}

impl Participant {
    pub fn new(account_id: u64, login: &str) -> Self {
        Self {
            account_id: Some(account_id),
            login: login.to_string(),
            selected: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRow {
    pub participant: Participant,
    pub share: String, // formatted, empty when nothing is owed
    pub is_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantSection {
    pub title_key: &'static str,
    pub rows: Vec<ParticipantRow>,
    pub is_disabled: bool,
}

pub fn selected_participants(participants: &[Participant]) -> Vec<Participant> {
    participants.iter().filter(|p| p.selected).cloned().collect()
}

/// Even share of `total` across `participant_count` others plus the payee.
/// The payee absorbs the rounding remainder so the shares sum to `total`.
pub fn split_share(participant_count: usize, total: i64, is_payee: bool) -> i64 {
    let people = participant_count as i64 + 1;
    let per_person = (total as f64 / people as f64).round() as i64;
    if !is_payee {
        return per_person;
    }
    per_person + (total - per_person * people)
}

pub fn participant_sections(
    participants: &[Participant],
    payee: &Participant,
    context: &RequestContext,
    amount: i64,
    currency: &str,
) -> Vec<ParticipantSection> {
    let selected = selected_participants(participants);
    let format_share = |share: i64| {
        if amount > 0 && share > 0 {
            convert_to_display_string(share, currency)
        } else {
            String::new()
        }
    };

    if !context.has_multiple_participants {
        let rows = selected
            .into_iter()
            .map(|p| ParticipantRow {
                is_disabled: !p.is_policy_expense_chat && !p.is_self_dm && p.is_optimistic,
                participant: p,
                share: String::new(),
            })
            .collect();
        return vec![ParticipantSection {
            title_key: "common.to",
            rows,
            is_disabled: false,
        }];
    }

    let editable = context.participants_editable();
    let share = format_share(split_share(selected.len(), amount, false));
    let payee_row = ParticipantRow {
        participant: payee.clone(),
        share: format_share(split_share(selected.len(), amount, true)),
        is_disabled: false,
    };

    let mut rows: Vec<ParticipantRow> = selected
        .into_iter()
        .map(|p| ParticipantRow {
            participant: p,
            share: share.clone(),
            is_disabled: false,
        })
        .collect();
    rows.extend(
        participants
            .iter()
            .filter(|p| !p.selected)
            .map(|p| ParticipantRow {
                participant: p.clone(),
                share: String::new(),
                is_disabled: false,
            }),
    );
    if !editable {
        for row in rows.iter_mut() {
            row.is_disabled = row.participant.is_optimistic;
        }
    }

    vec![
        ParticipantSection {
            title_key: "moneyRequestConfirmationList.paidBy",
            rows: vec![payee_row],
            is_disabled: editable,
        },
        ParticipantSection {
            title_key: "moneyRequestConfirmationList.splitWith",
            rows,
            is_disabled: false,
        },
    ]
}

/// Whether picking `option` should reach the host. The acting user cannot
/// select themselves.
pub fn accepts_selection(option: &Participant, context: &RequestContext) -> bool {
    option.account_id.is_none() || option.account_id != context.current_account_id
}

/// Profile or report details behind a participant row.
pub fn participant_destination(option: &Participant, context: &RequestContext) -> Option<Destination> {
    if option.is_self_dm {
        return context
            .current_account_id
            .map(|account_id| Destination::Profile { account_id });
    }
    if let Some(account_id) = option.account_id {
        return Some(Destination::Profile { account_id });
    }
    option
        .report_id
        .clone()
        .map(|report_id| Destination::ReportDetails { report_id })
}
