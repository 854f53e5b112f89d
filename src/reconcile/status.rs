use crate::contracts::{Contract, ContractStatus, Escrow, TradeRole};

pub const TEXT_WAITING_DEPOSIT: &str = "Waiting for seller to deposit bitcoins to escrow...";
pub const TEXT_IN_ESCROW_PAY: &str =
    "Bitcoins are in escrow! Please pay seller\nvia agreed payment method";
pub const TEXT_WAITING_RELEASE: &str = "Waiting for seller to release coins from escrow";
pub const TEXT_PAY_SELLER: &str = "Coins are in escrow, please pay seller";
pub const TEXT_ALL_DONE: &str = "All done!";

/// Escrow deposit is sufficient when it has both enough confirmations
/// and enough coins for the contract volume.
pub fn is_deposited_enough(escrow: &Escrow, required_confirmations: u32, contract: &Contract) -> bool {
    escrow.confirmations >= required_confirmations && escrow.amount_deposited >= contract.volume
}

/// Fixed-priority status text rules, evaluated top to bottom with
/// last-match-wins semantics. The ordering is load-bearing: `paid`
/// overrides the deposited-funds text, `in_progress`+buyer overrides
/// `paid`, and `completed` overrides everything.
const STATUS_RULES: &[(fn(&Contract, bool) -> bool, &str)] = &[
    (|_, _| true, TEXT_WAITING_DEPOSIT),
    (
        |c, deposited| deposited && c.status != ContractStatus::Paid,
        TEXT_IN_ESCROW_PAY,
    ),
    (|c, _| c.status == ContractStatus::Paid, TEXT_WAITING_RELEASE),
    (
        |c, _| c.status == ContractStatus::InProgress && c.your_role == TradeRole::Buyer,
        TEXT_PAY_SELLER,
    ),
    (|c, _| c.status == ContractStatus::Completed, TEXT_ALL_DONE),
];

/// Derive the human-readable status line for a contract whose escrow
/// address passed local verification.
pub fn derive_status_text(contract: &Contract, deposited_enough: bool) -> String {
    let mut text = TEXT_WAITING_DEPOSIT;
    for (predicate, rule_text) in STATUS_RULES {
        if predicate(contract, deposited_enough) {
            text = rule_text;
        }
    }
    text.to_string()
}
