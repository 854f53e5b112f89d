pub mod models;

pub use models::{Contract, ContractStatus, Escrow, TradeRole};
