use serde::Serialize;

use super::error::ProviderError;

/// SSL enabled merchant.
pub const DEFAULT_CRYPT_TYPE: u8 = 7;

const XML_HEADER: &str = r#"<?xml version="1.0"?>"#;

#[derive(Debug, Serialize)]
#[serde(rename = "request")]
pub struct MpgRequest {
    pub store_id: String,
    pub api_token: String,
    #[serde(rename = "$value")]
    pub transaction: Transaction,
}

impl MpgRequest {
    pub fn to_xml(&self) -> Result<String, ProviderError> {
        let body = quick_xml::se::to_string(self).map_err(|e| ProviderError::Encode {
            message: e.to_string(),
        })?;
        Ok(format!("{}{}", XML_HEADER, body))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transaction {
    Preauth(CardTransaction),
    Purchase(CardTransaction),
    ResPreauthCc(VaultTransaction),
    ResPurchaseCc(VaultTransaction),
    Completion(Completion),
    #[serde(rename = "purchasecorrection")]
    PurchaseCorrection(Correction),
    Refund(Refund),
    ResAddCc(AddCard),
    ResDelete(DeleteCard),
}

impl Transaction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Preauth(_) => "preauth",
            Self::Purchase(_) => "purchase",
            Self::ResPreauthCc(_) => "res_preauth_cc",
            Self::ResPurchaseCc(_) => "res_purchase_cc",
            Self::Completion(_) => "completion",
            Self::PurchaseCorrection(_) => "purchasecorrection",
            Self::Refund(_) => "refund",
            Self::ResAddCc(_) => "res_add_cc",
            Self::ResDelete(_) => "res_delete",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CardTransaction {
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cust_id: Option<String>,
    pub amount: String,
    pub pan: String,
    pub expdate: String,
    pub crypt_type: u8,
}

#[derive(Debug, Serialize)]
pub struct VaultTransaction {
    pub data_key: String,
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cust_id: Option<String>,
    pub amount: String,
    pub crypt_type: u8,
}

#[derive(Debug, Serialize)]
pub struct Completion {
    pub order_id: String,
    pub comp_amount: String,
    pub txn_number: String,
    pub crypt_type: u8,
}

#[derive(Debug, Serialize)]
pub struct Correction {
    pub order_id: String,
    pub txn_number: String,
    pub crypt_type: u8,
}

#[derive(Debug, Serialize)]
pub struct Refund {
    pub order_id: String,
    pub amount: String,
    pub txn_number: String,
    pub crypt_type: u8,
}

#[derive(Debug, Serialize)]
pub struct AddCard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cust_id: Option<String>,
    pub pan: String,
    pub expdate: String,
    pub crypt_type: u8,
}

#[derive(Debug, Serialize)]
pub struct DeleteCard {
    pub data_key: String,
}

/// Moneris expects major units with two decimals, amounts travel in cents.
pub fn format_amount(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// `YYMM`
pub fn format_expdate(year: i32, month: u32) -> String {
    format!("{:02}{:02}", year.rem_euclid(100), month)
}

/// Splits an authorization reference into `(txn_number, order_id)`.
pub fn split_authorization(authorization: &str) -> Result<(&str, &str), ProviderError> {
    match authorization.split_once(';') {
        Some((txn_number, order_id)) if !txn_number.is_empty() && !order_id.is_empty() => {
            Ok((txn_number, order_id))
        }
        _ => Err(ProviderError::InvalidAuthorization {
            authorization: authorization.to_string(),
        }),
    }
}
