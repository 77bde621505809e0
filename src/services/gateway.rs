//! Midtrans Snap integration via REST API (no SDK dependency).

use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest as _, Sha512};

use crate::error::ApiError;

const SANDBOX_BASE_URL: &str = "https://app.sandbox.midtrans.com";
const PRODUCTION_BASE_URL: &str = "https://app.midtrans.com";

pub struct MidtransClient {
    client: reqwest::Client,
    server_key: String,
    base_url: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct SnapTransaction {
    pub token: String,
    pub redirect_url: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct TransactionItem {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
}

impl MidtransClient {
    pub fn new(server_key: String, is_production: bool) -> Self {
        Self {
            client: reqwest::Client::new(),
            server_key,
            base_url: if is_production { PRODUCTION_BASE_URL } else { SANDBOX_BASE_URL },
        }
    }

    /// Creates a Snap transaction and returns the token plus the hosted
    /// payment page URL.
    pub async fn create_transaction(
        &self,
        order_id: &str,
        gross_amount: i64,
        customer_name: &str,
        customer_email: &str,
        items: &[TransactionItem],
    ) -> Result<SnapTransaction, ApiError> {
        let body = json!({
            "transaction_details": {
                "order_id": order_id,
                "gross_amount": gross_amount,
            },
            "customer_details": {
                "first_name": customer_name,
                "email": customer_email,
            },
            "item_details": items,
        });

        let response = self.client
            .post(format!("{}/snap/v1/transactions", self.base_url))
            .basic_auth(&self.server_key, None::<&str>)
            .json(&body)
            .send()
            .await?;

        let response: serde_json::Value = response.json().await?;

        match serde_json::from_value::<SnapTransaction>(response.clone()) {
            Ok(transaction) => Ok(transaction),
            Err(_) => Err(ApiError::bad_request(format!(
                "gagal membuat transaksi pembayaran: {response}"
            ))),
        }
    }

    /// Verifies a webhook notification. Midtrans signs with
    /// SHA-512(order_id + status_code + gross_amount + server_key).
    pub fn verify_signature(
        &self,
        order_id: &str,
        status_code: &str,
        gross_amount: &str,
        signature_key: &str,
    ) -> bool {
        let digest = Sha512::digest(format!("{order_id}{status_code}{gross_amount}{}", self.server_key));

        format!("{digest:x}") == signature_key
    }
}

/// Settlement, or a card capture that passed fraud review.
pub fn is_success(transaction_status: &str, fraud_status: Option<&str>) -> bool {
    match transaction_status {
        "settlement" => true,
        "capture" => fraud_status == Some("accept"),
        _ => false,
    }
}

pub fn is_pending(transaction_status: &str) -> bool {
    transaction_status == "pending"
}

pub fn is_failed(transaction_status: &str) -> bool {
    matches!(transaction_status, "deny" | "expire" | "cancel")
}
