//! Income-side tools: social-security deductions, the progressive monthly
//! tax table, the bisection gross-from-net solver, the flat-rate quick
//! estimator and bank-flow reconciliation.

pub mod bank_flow;
pub mod flat_estimate;
pub mod inverse_tax;
pub mod social_security;
pub mod tax_table;

pub use bank_flow::{
    reconcile_bank_flows, BankFlowEntry, BankFlowSeries, FlowReconciliation, FlowStats,
    FlowType, MonthlyGross, FLOW_MONTHS,
};
pub use flat_estimate::{estimate_pre_tax, flat_tax_rate};
pub use inverse_tax::{
    net_from_gross, solve_gross_from_net, solve_gross_from_net_traced, SolverTrace,
    MAX_BISECTION_ITERATIONS, NET_TOLERANCE,
};
pub use social_security::{deductions, DeductionBreakdown, SocialSecurityProfile};
pub use tax_table::{TaxBracket, TaxTable, MONTHLY_EXEMPTION};
