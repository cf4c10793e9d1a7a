use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::ProviderError;

#[derive(Debug, Deserialize)]
#[serde(rename = "response")]
struct MpgResponse {
    receipt: Receipt,
}

/// Fields of a Moneris `<receipt>`. Unknown elements are ignored.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Receipt {
    #[serde(rename = "ReceiptId", default)]
    pub receipt_id: Option<String>,
    #[serde(rename = "ReferenceNum", default)]
    pub reference_num: Option<String>,
    #[serde(rename = "ResponseCode", default)]
    pub response_code: Option<String>,
    #[serde(rename = "ISO", default)]
    pub iso: Option<String>,
    #[serde(rename = "AuthCode", default)]
    pub auth_code: Option<String>,
    #[serde(rename = "TransTime", default)]
    pub trans_time: Option<String>,
    #[serde(rename = "TransDate", default)]
    pub trans_date: Option<String>,
    #[serde(rename = "TransType", default)]
    pub trans_type: Option<String>,
    #[serde(rename = "Complete", default)]
    pub complete: Option<String>,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
    #[serde(rename = "TransAmount", default)]
    pub trans_amount: Option<String>,
    #[serde(rename = "CardType", default)]
    pub card_type: Option<String>,
    #[serde(rename = "TransID", default)]
    pub trans_id: Option<String>,
    #[serde(rename = "TimedOut", default)]
    pub timed_out: Option<String>,
    #[serde(rename = "Ticket", default)]
    pub ticket: Option<String>,
    #[serde(rename = "DataKey", default)]
    pub data_key: Option<String>,
    #[serde(rename = "ResSuccess", default)]
    pub res_success: Option<String>,
    #[serde(rename = "PaymentType", default)]
    pub payment_type: Option<String>,
    #[serde(rename = "AvsResultCode", default)]
    pub avs_result_code: Option<String>,
    #[serde(rename = "CvdResultCode", default)]
    pub cvd_result_code: Option<String>,
}

impl Receipt {
    /// Moneris writes `null` for absent values.
    fn normalize(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty() && v != "null")
        }
        Receipt {
            receipt_id: clean(self.receipt_id),
            reference_num: clean(self.reference_num),
            response_code: clean(self.response_code),
            iso: clean(self.iso),
            auth_code: clean(self.auth_code),
            trans_time: clean(self.trans_time),
            trans_date: clean(self.trans_date),
            trans_type: clean(self.trans_type),
            complete: clean(self.complete),
            message: clean(self.message),
            trans_amount: clean(self.trans_amount),
            card_type: clean(self.card_type),
            trans_id: clean(self.trans_id),
            timed_out: clean(self.timed_out),
            ticket: clean(self.ticket),
            data_key: clean(self.data_key),
            res_success: clean(self.res_success),
            payment_type: clean(self.payment_type),
            avs_result_code: clean(self.avs_result_code),
            cvd_result_code: clean(self.cvd_result_code),
        }
    }

    fn successful(&self) -> bool {
        if let Some(res_success) = &self.res_success {
            return res_success == "true";
        }
        let approved = self
            .response_code
            .as_deref()
            .and_then(|code| code.parse::<u32>().ok())
            .is_some_and(|code| code <= 49);
        approved && self.complete.as_deref() == Some("true")
    }

    fn authorization(&self) -> Option<String> {
        match (&self.trans_id, &self.receipt_id) {
            (Some(trans_id), Some(receipt_id)) => Some(format!("{};{}", trans_id, receipt_id)),
            _ => None,
        }
    }

    fn params(&self) -> BTreeMap<String, String> {
        let fields = [
            ("receipt_id", &self.receipt_id),
            ("reference_num", &self.reference_num),
            ("response_code", &self.response_code),
            ("iso", &self.iso),
            ("auth_code", &self.auth_code),
            ("trans_time", &self.trans_time),
            ("trans_date", &self.trans_date),
            ("trans_type", &self.trans_type),
            ("complete", &self.complete),
            ("message", &self.message),
            ("trans_amount", &self.trans_amount),
            ("card_type", &self.card_type),
            ("trans_id", &self.trans_id),
            ("timed_out", &self.timed_out),
            ("ticket", &self.ticket),
            ("data_key", &self.data_key),
            ("res_success", &self.res_success),
            ("payment_type", &self.payment_type),
            ("avs_result_code", &self.avs_result_code),
            ("cvd_result_code", &self.cvd_result_code),
        ];
        fields
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone())))
            .collect()
    }
}

/// Outcome of a single provider call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    success: bool,
    message: String,
    authorization: Option<String>,
    params: BTreeMap<String, String>,
    test: bool,
}

impl Response {
    pub fn new(
        success: bool,
        message: impl Into<String>,
        params: BTreeMap<String, String>,
        authorization: Option<String>,
        test: bool,
    ) -> Self {
        Response {
            success,
            message: message.into(),
            authorization,
            params,
            test,
        }
    }

    pub fn parse(body: &str, test: bool) -> Result<Self, ProviderError> {
        let response: MpgResponse =
            quick_xml::de::from_str(body).map_err(|e| ProviderError::Decode {
                message: e.to_string(),
            })?;
        Ok(Self::from_receipt(response.receipt, test))
    }

    pub fn from_receipt(receipt: Receipt, test: bool) -> Self {
        let receipt = receipt.normalize();
        Response {
            success: receipt.successful(),
            message: receipt.message.clone().unwrap_or_default(),
            authorization: receipt.authorization(),
            params: receipt.params(),
            test,
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// `<trans_id>;<receipt_id>`, the reference later passed to capture, void and refund.
    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn test(&self) -> bool {
        self.test
    }
}
