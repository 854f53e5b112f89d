use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Remote contract lifecycle status. Authoritative value comes from the
/// exchange; anything we do not recognize maps to `Unknown` instead of
/// failing the whole payload.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    New,
    Depositing,
    InProgress,
    Paid,
    Completed,
    Canceled,
    #[serde(other)]
    Unknown,
}

/// Which side of the trade this wallet is on. Fixed per contract.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TradeRole {
    Buyer,
    Seller,
}

/// Escrow sub-record, present once the seller has funded escrow.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Escrow {
    pub address: Option<String>,
    #[serde(default)]
    pub confirmations: u32,
    #[serde(default, deserialize_with = "decimal_or_string")]
    pub amount_deposited: Decimal,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VolumeBreakdown {
    #[serde(deserialize_with = "decimal_or_string")]
    pub goes_to_buyer: Decimal,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentMethodInstruction {
    pub details: String,
}

/// One escrow trading contract as served by the remote exchange, plus
/// the locally derived display fields.
///
/// Derived fields are recomputed from `status`/`escrow` on every
/// reconciliation pass and are never part of the wire payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub status: ContractStatus,
    pub your_role: TradeRole,
    pub escrow: Option<Escrow>,
    #[serde(deserialize_with = "decimal_or_string")]
    pub volume: Decimal,
    /// Required confirmation threshold for the escrow deposit.
    #[serde(default)]
    pub confirmations: u32,
    pub asset_code: String,
    pub currency_code: String,
    pub price: String,
    pub volume_breakdown: VolumeBreakdown,
    pub payment_method_instruction: Option<PaymentMethodInstruction>,
    pub release_address: Option<String>,
    #[serde(default)]
    pub can_be_canceled: bool,

    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub is_deposited_enough: Option<bool>,
}

impl Contract {
    /// Funded escrow address, if the counterparty has set one up.
    pub fn escrow_address(&self) -> Option<&str> {
        self.escrow
            .as_ref()
            .and_then(|e| e.address.as_deref())
            .filter(|a| !a.is_empty())
    }

    /// Buyers may mark a contract paid only while it is in progress.
    /// The remote service is authoritative and re-validates anyway;
    /// this gates button visibility on the presentation side.
    pub fn can_be_marked_as_paid(&self) -> bool {
        self.status == ContractStatus::InProgress && self.your_role == TradeRole::Buyer
    }
}

/// The exchange serves monetary amounts sometimes as JSON numbers and
/// sometimes as numeric strings; accept both.
fn decimal_or_string<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Decimal::try_from(n).map_err(serde::de::Error::custom),
        NumberOrString::String(s) => Decimal::from_str(s.trim()).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_contract_payload_with_numeric_strings() {
        let payload = serde_json::json!({
            "id": "E4ZKmS",
            "status": "in_progress",
            "your_role": "buyer",
            "escrow": {
                "address": "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2",
                "confirmations": 3,
                "amount_deposited": "0.5"
            },
            "volume": "0.5",
            "confirmations": 2,
            "asset_code": "BTC",
            "currency_code": "USD",
            "price": "9150.00",
            "volume_breakdown": { "goes_to_buyer": "0.495" },
            "payment_method_instruction": { "details": "IBAN 123" },
            "release_address": "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq",
            "can_be_canceled": true
        });

        let contract: Contract = serde_json::from_value(payload).unwrap();
        assert_eq!(contract.status, ContractStatus::InProgress);
        assert_eq!(contract.your_role, TradeRole::Buyer);
        assert_eq!(contract.volume, dec!(0.5));
        assert_eq!(contract.escrow.as_ref().unwrap().amount_deposited, dec!(0.5));
        assert_eq!(contract.volume_breakdown.goes_to_buyer, dec!(0.495));
        assert!(contract.status_text.is_none());
        assert!(contract.is_deposited_enough.is_none());
    }

    #[test]
    fn test_contract_payload_with_plain_numbers() {
        let payload = serde_json::json!({
            "id": "77",
            "status": "new",
            "your_role": "seller",
            "escrow": null,
            "volume": 1.25,
            "asset_code": "BTC",
            "currency_code": "EUR",
            "price": "8000",
            "volume_breakdown": { "goes_to_buyer": 1.2 },
            "payment_method_instruction": null,
            "release_address": null
        });

        let contract: Contract = serde_json::from_value(payload).unwrap();
        assert_eq!(contract.volume, dec!(1.25));
        assert_eq!(contract.confirmations, 0);
        assert!(!contract.can_be_canceled);
        assert!(contract.escrow_address().is_none());
    }

    #[test]
    fn test_unknown_status_does_not_fail_payload() {
        let payload = serde_json::json!({
            "id": "x",
            "status": "dispute_opened",
            "your_role": "buyer",
            "volume": "1",
            "asset_code": "BTC",
            "currency_code": "USD",
            "price": "9000",
            "volume_breakdown": { "goes_to_buyer": "1" }
        });

        let contract: Contract = serde_json::from_value(payload).unwrap();
        assert_eq!(contract.status, ContractStatus::Unknown);
    }

    #[test]
    fn test_mark_as_paid_gate() {
        let mut contract: Contract = serde_json::from_value(serde_json::json!({
            "id": "x",
            "status": "in_progress",
            "your_role": "buyer",
            "volume": "1",
            "asset_code": "BTC",
            "currency_code": "USD",
            "price": "9000",
            "volume_breakdown": { "goes_to_buyer": "1" }
        }))
        .unwrap();

        assert!(contract.can_be_marked_as_paid());
        contract.your_role = TradeRole::Seller;
        assert!(!contract.can_be_marked_as_paid());
        contract.your_role = TradeRole::Buyer;
        contract.status = ContractStatus::Paid;
        assert!(!contract.can_be_marked_as_paid());
    }

    #[test]
    fn test_escrow_address_empty_string_is_none() {
        let escrow = Escrow {
            address: Some(String::new()),
            confirmations: 0,
            amount_deposited: Decimal::ZERO,
        };
        let contract = Contract {
            id: "c".to_string(),
            status: ContractStatus::New,
            your_role: TradeRole::Buyer,
            escrow: Some(escrow),
            volume: Decimal::ONE,
            confirmations: 1,
            asset_code: "BTC".to_string(),
            currency_code: "USD".to_string(),
            price: "9000".to_string(),
            volume_breakdown: VolumeBreakdown {
                goes_to_buyer: Decimal::ONE,
            },
            payment_method_instruction: None,
            release_address: None,
            can_be_canceled: false,
            status_text: None,
            is_deposited_enough: None,
        };
        assert!(contract.escrow_address().is_none());
    }
}
