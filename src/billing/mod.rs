//! Product catalog and checkout
//!
//! Payment itself happens on the external processor's hosted page; this
//! client only creates the checkout session and later reads back its outcome.

mod types;

use log::info;
use url::Url;

use crate::error::{Error, Result};
use crate::fetch::ApiClient;
use crate::resource::RecordId;

pub use types::*;

const PLANS_PATH: &str = "/api/plans";
const CREATE_PATH: &str = "/api/purchases/create";
const VERIFY_PATH: &str = "/api/purchases/verify-payment";
const PURCHASES_PATH: &str = "/api/purchases";

/// Client for plans and purchases
#[derive(Debug, Clone)]
pub struct Billing {
    api: ApiClient,
}

impl Billing {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Read-only catalog for the public product listing
    pub async fn plans(&self) -> Result<Vec<Plan>> {
        self.api.get(PLANS_PATH).execute().await
    }

    /// Start checkout for a plan and return the URL to send the browser to
    pub async fn create_checkout(&self, plan_id: &RecordId) -> Result<Url> {
        let request = CheckoutRequest {
            plan_id: plan_id.clone(),
        };
        let response: CheckoutResponse = self
            .api
            .post(CREATE_PATH)
            .json(&request)?
            .execute()
            .await?;

        if !response.success {
            return Err(Error::Rejected(
                response
                    .error
                    .unwrap_or_else(|| "Could not start checkout".to_string()),
            ));
        }
        let checkout_url = response
            .checkout_url
            .ok_or_else(|| Error::Rejected("Checkout URL missing from response".to_string()))?;

        info!("checkout created for plan {}", plan_id);
        Ok(Url::parse(&checkout_url)?)
    }

    /// Outcome of a checkout, for the post-payment confirmation screen
    pub async fn verify_payment(&self, session_id: &str) -> Result<PaymentVerification> {
        self.api
            .get(VERIFY_PATH)
            .query("session_id", session_id)
            .execute()
            .await
    }

    /// Purchase history of the logged-in user
    pub async fn purchases(&self) -> Result<Vec<Purchase>> {
        self.api.get(PURCHASES_PATH).execute().await
    }
}
