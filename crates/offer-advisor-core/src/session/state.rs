use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::advisory::AdviseParams;
use crate::compensation::{set_bonus_amount, CompensationRecord};
use crate::competitors::CompetitorSet;
use crate::income::{BankFlowSeries, SocialSecurityProfile, TaxTable};

/// Who the candidate is. Display only; nothing is computed from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProfile {
    pub name: String,
    pub age: String,
    pub education: String,
    pub school: String,
    pub work_years: String,
    pub position: String,
    pub level: String,
    /// Colleague at a comparable level, for calibration
    pub peer_reference: String,
}

/// Everything one advisory session holds. Values are never mutated in
/// place; each edit produces a new state through [`super::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub candidate: CandidateProfile,
    pub current: CompensationRecord,
    pub offer: CompensationRecord,
    pub competitors: CompetitorSet,
    pub social_security: SocialSecurityProfile,
    pub tax_table: TaxTable,
    pub bank_flows: BankFlowSeries,
    pub params: AdviseParams,
}

impl Default for SessionState {
    /// A fresh session: a 13-month current package, a 14-month draft offer,
    /// no competitors and empty bank flows.
    fn default() -> Self {
        let current = CompensationRecord {
            base_monthly: dec!(16672),
            months: dec!(13),
            ..Default::default()
        };
        let offer = CompensationRecord {
            base_monthly: dec!(20000),
            months: dec!(14),
            ..Default::default()
        };

        Self {
            candidate: CandidateProfile::default(),
            current: set_bonus_amount(&current, dec!(15360)),
            offer: set_bonus_amount(&offer, dec!(60000)),
            competitors: CompetitorSet::new(),
            social_security: SocialSecurityProfile::default(),
            tax_table: TaxTable::default(),
            bank_flows: BankFlowSeries::default(),
            params: AdviseParams::default(),
        }
    }
}
