pub mod allocator;
pub mod engine;
pub mod input;
pub mod recorder;
pub mod validation;

pub use engine::{run_avalanche, run_avalanche_from, simulate, SimulationState};
pub use input::{
    CashFlowProfile, LoanAccount, LumpsumPayment, RawLoanAccount, RawLumpsumPayment,
    RawSimulationInput, SimulationInput, DEFAULT_MONTHS_LIMIT,
};
pub use recorder::{
    AppliedLumpsum, LoanLedgerEntry, LoanPayoff, ScheduleRecorder, ScheduleRow, SimulationOutput,
    Summary,
};
pub use validation::{validate, validate_raw};
