//! The five audit rules, in evaluation order

pub mod cross_record;
pub mod data_logic;
pub mod financial;
pub mod security;
pub mod structural;

pub use cross_record::DuplicateOrderRule;
pub use data_logic::DataLogicRule;
pub use financial::FinancialRule;
pub use security::SecurityRule;
pub use structural::StructuralRule;
