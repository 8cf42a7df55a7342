use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::analysis::analyze;
use super::state::{CandidateProfile, SessionState};
use crate::advisory::{apply_suggestion, AdviseParams, SuggestedField};
use crate::compensation::{set_bonus_amount, set_bonus_months, CompensationRecord, RecordField};
use crate::income::{FlowType, SocialSecurityProfile, TaxTable};
use crate::types::{Money, Months};
use crate::OfferAdvisorResult;

/// Whose record an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    Current,
    Offer,
    Competitor(u32),
}

/// One user edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "edit", rename_all = "snake_case")]
pub enum SessionEdit {
    SetField {
        party: Party,
        field: RecordField,
        #[serde(with = "crate::types::lenient")]
        value: Decimal,
    },
    SetBonusAmount {
        party: Party,
        #[serde(with = "crate::types::lenient")]
        amount: Money,
    },
    SetBonusMonths {
        party: Party,
        #[serde(with = "crate::types::lenient")]
        months: Months,
    },
    AddCompetitor {
        name: String,
        #[serde(default)]
        record: CompensationRecord,
    },
    RenameCompetitor {
        id: u32,
        name: String,
    },
    RemoveCompetitor {
        id: u32,
    },
    SetFlowAmount {
        index: usize,
        #[serde(with = "crate::types::lenient")]
        amount: Money,
    },
    SetFlowType {
        flow_type: FlowType,
    },
    SetSocialSecurity {
        profile: SocialSecurityProfile,
    },
    SetTaxTable {
        table: TaxTable,
    },
    SetParams {
        params: AdviseParams,
    },
    ApplySuggestion {
        field: SuggestedField,
    },
    SetCandidate {
        candidate: CandidateProfile,
    },
}

impl SessionEdit {
    fn kind(&self) -> &'static str {
        match self {
            SessionEdit::SetField { .. } => "set_field",
            SessionEdit::SetBonusAmount { .. } => "set_bonus_amount",
            SessionEdit::SetBonusMonths { .. } => "set_bonus_months",
            SessionEdit::AddCompetitor { .. } => "add_competitor",
            SessionEdit::RenameCompetitor { .. } => "rename_competitor",
            SessionEdit::RemoveCompetitor { .. } => "remove_competitor",
            SessionEdit::SetFlowAmount { .. } => "set_flow_amount",
            SessionEdit::SetFlowType { .. } => "set_flow_type",
            SessionEdit::SetSocialSecurity { .. } => "set_social_security",
            SessionEdit::SetTaxTable { .. } => "set_tax_table",
            SessionEdit::SetParams { .. } => "set_params",
            SessionEdit::ApplySuggestion { .. } => "apply_suggestion",
            SessionEdit::SetCandidate { .. } => "set_candidate",
        }
    }
}

fn update_party<F>(
    state: &SessionState,
    party: Party,
    update: F,
) -> OfferAdvisorResult<SessionState>
where
    F: FnOnce(&CompensationRecord) -> CompensationRecord,
{
    let mut next = state.clone();
    match party {
        Party::Current => next.current = update(&state.current),
        Party::Offer => next.offer = update(&state.offer),
        Party::Competitor(id) => next.competitors = state.competitors.with_record(id, update)?,
    }
    Ok(next)
}

/// Produce the state that follows `edit`. The input state is left untouched,
/// also when the edit is rejected.
///
/// Fails only for edits that reference a missing competitor, add a competitor
/// once the id space is used up, or name a flow month index outside the
/// year. Tax tables are validated when they are built.
pub fn apply(state: &SessionState, edit: SessionEdit) -> OfferAdvisorResult<SessionState> {
    debug!(edit = edit.kind(), "session edit");

    match edit {
        SessionEdit::SetField {
            party,
            field,
            value,
        } => update_party(state, party, |r| r.with_field(field, value)),
        SessionEdit::SetBonusAmount { party, amount } => {
            update_party(state, party, |r| set_bonus_amount(r, amount))
        }
        SessionEdit::SetBonusMonths { party, months } => {
            update_party(state, party, |r| set_bonus_months(r, months))
        }
        SessionEdit::AddCompetitor { name, record } => {
            let (competitors, id) = state.competitors.with_added(&name, record)?;
            debug!(id, "competitor added");
            Ok(SessionState {
                competitors,
                ..state.clone()
            })
        }
        SessionEdit::RenameCompetitor { id, name } => Ok(SessionState {
            competitors: state.competitors.with_renamed(id, &name)?,
            ..state.clone()
        }),
        SessionEdit::RemoveCompetitor { id } => Ok(SessionState {
            competitors: state.competitors.with_removed(id)?,
            ..state.clone()
        }),
        SessionEdit::SetFlowAmount { index, amount } => Ok(SessionState {
            bank_flows: state.bank_flows.with_amount(index, amount)?,
            ..state.clone()
        }),
        SessionEdit::SetFlowType { flow_type } => Ok(SessionState {
            bank_flows: state.bank_flows.with_flow_type(flow_type),
            ..state.clone()
        }),
        SessionEdit::SetSocialSecurity { profile } => Ok(SessionState {
            social_security: profile,
            ..state.clone()
        }),
        SessionEdit::SetTaxTable { table } => Ok(SessionState {
            tax_table: table,
            ..state.clone()
        }),
        SessionEdit::SetParams { params } => Ok(SessionState {
            params,
            ..state.clone()
        }),
        SessionEdit::ApplySuggestion { field } => {
            let suggestion = analyze(state).suggestion;
            Ok(SessionState {
                offer: apply_suggestion(&state.offer, &suggestion, field),
                ..state.clone()
            })
        }
        SessionEdit::SetCandidate { candidate } => Ok(SessionState {
            candidate,
            ..state.clone()
        }),
    }
}
