use std::collections::HashMap;

use anyhow::Result;
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use sha2::Sha256;
use tracing::error;

type HmacSha256 = Hmac<Sha256>;

/// Minimal Stripe client built on reqwest. Credentials and redirect URLs
/// are injected at construction.
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    webhook_secret: String,
    success_url: String,
    cancel_url: String,
}

#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub type_: String,
    pub created: Option<i64>,
    pub livemode: Option<bool>,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

/// The slice of a payment_intent event object the webhook handler needs.
#[derive(Debug, Deserialize)]
pub struct StripePaymentIntent {
    pub id: String,
    pub amount_received: Option<i64>,
}

impl StripeEvent {
    pub fn extract_payment_intent(&self) -> Option<StripePaymentIntent> {
        serde_json::from_value(self.data.object.clone()).ok()
    }
}

/// Checkout session as returned by session creation. The payment intent id
/// is what later webhook events are correlated against.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSessionCreated {
    pub id: String,
    pub url: Option<String>,
    pub payment_intent: Option<String>,
}

impl CheckoutSessionCreated {
    /// Provider transaction id for the local payment row: the payment
    /// intent when the session already carries one, otherwise the session
    /// id itself.
    pub fn provider_txn_id(&self) -> String {
        self.payment_intent
            .clone()
            .unwrap_or_else(|| self.id.clone())
    }
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorDetails,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetails {
    #[serde(rename = "type")]
    type_: Option<String>,
    code: Option<String>,
    message: Option<String>,
    param: Option<String>,
}

impl StripeClient {
    pub fn new(
        secret_key: String,
        webhook_secret: String,
        success_url: String,
        cancel_url: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            webhook_secret,
            success_url,
            cancel_url,
        }
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let request_id = resp
            .headers()
            .get("request-id")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let (stripe_error_type, stripe_error_code, stripe_error_param, stripe_error_message) =
            match serde_json::from_str::<StripeErrorEnvelope>(&body) {
                Ok(envelope) => {
                    let details = envelope.error;
                    (details.type_, details.code, details.param, details.message)
                }
                Err(_) => (None, None, None, None),
            };

        error!(
            status = %status,
            stripe_request_id = ?request_id,
            stripe_error_type = ?stripe_error_type,
            stripe_error_code = ?stripe_error_code,
            stripe_error_param = ?stripe_error_param,
            stripe_error_message = ?stripe_error_message,
            response_body = %body,
            context = %context,
            "stripe api request failed"
        );

        anyhow::bail!(
            "Stripe API request failed: {} (status {}, request_id={:?})",
            context,
            status,
            request_id
        );
    }

    /// Creates a Stripe product for a one-off purchase (e.g. a paid post).
    /// https://stripe.com/docs/api/products/create
    pub async fn create_product(&self, name: &str, description: &str) -> Result<String> {
        let body = [
            ("name", name.to_string()),
            ("description", description.to_string()),
        ];

        let resp = self
            .http
            .post("https://api.stripe.com/v1/products")
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create product").await?;

        #[derive(Deserialize)]
        struct ProductResp {
            id: String,
        }

        let parsed: ProductResp = resp.json().await?;
        Ok(parsed.id)
    }

    /// Creates a USD price for an existing product, amount in minor units.
    /// https://stripe.com/docs/api/prices/create
    pub async fn create_price(&self, product_id: &str, amount_minor: i32) -> Result<String> {
        let body = [
            ("unit_amount", amount_minor.to_string()),
            ("currency", "usd".to_string()),
            ("product", product_id.to_string()),
        ];

        let resp = self
            .http
            .post("https://api.stripe.com/v1/prices")
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create price").await?;

        #[derive(Deserialize)]
        struct PriceResp {
            id: String,
        }

        let parsed: PriceResp = resp.json().await?;
        Ok(parsed.id)
    }

    /// Creates a Checkout Session in payment mode.
    /// https://stripe.com/docs/payments/checkout
    pub async fn create_checkout_session(
        &self,
        price_id: &str,
        metadata: HashMap<String, String>,
    ) -> Result<CheckoutSessionCreated> {
        let mut body: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("line_items[0][price]".to_string(), price_id.to_string()),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            ("success_url".to_string(), self.success_url.clone()),
            ("cancel_url".to_string(), self.cancel_url.clone()),
        ];

        for (key, value) in metadata {
            body.push((format!("metadata[{}]", key), value));
        }

        let resp = self
            .http
            .post("https://api.stripe.com/v1/checkout/sessions")
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create checkout session").await?;

        let parsed: CheckoutSessionCreated = resp.json().await?;
        Ok(parsed)
    }

    /// Verifies the webhook signature. https://stripe.com/docs/webhooks/signatures
    pub fn verify_webhook_signature(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<StripeEvent> {
        let mut timestamp: Option<String> = None;
        let mut signature: Option<String> = None;

        for part in signature_header.split(',') {
            if let Some(rest) = part.strip_prefix("t=") {
                timestamp = Some(rest.to_string());
            } else if let Some(rest) = part.strip_prefix("v1=") {
                signature = Some(rest.to_string());
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| anyhow::anyhow!("missing timestamp in stripe-signature"))?;
        let signature =
            signature.ok_or_else(|| anyhow::anyhow!("missing v1 in stripe-signature"))?;

        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes())?;
        mac.update(signed_payload.as_bytes());
        let provided = hex::decode(signature)?;

        // Constant-time comparison via the Mac trait.
        mac.verify_slice(&provided)
            .map_err(|_| anyhow::anyhow!("invalid webhook signature"))?;

        let event: StripeEvent = serde_json::from_slice(payload)?;
        Ok(event)
    }
}
