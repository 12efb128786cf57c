//! Types for plans and purchases

use serde::{Deserialize, Serialize};

use crate::resource::{de, RecordId};

/// A product in the public catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "de::number")]
    pub price: f64,
    #[serde(default)]
    pub currency: Option<String>,
    /// Billing period in days; `None` for one-off products
    #[serde(default)]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Plan {
    pub fn is_subscription(&self) -> bool {
        self.duration_days.is_some()
    }
}

/// Body of `POST /api/purchases/create`
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub plan_id: RecordId,
}

/// Response of `POST /api/purchases/create`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub checkout_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A purchase as listed on the payments page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: RecordId,
    #[serde(default)]
    pub plan_id: Option<RecordId>,
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl Purchase {
    pub fn is_paid(&self) -> bool {
        is_paid_status(&self.status)
    }
}

/// Response of `GET /api/purchases/verify-payment`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentVerification {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub purchase: Option<Purchase>,
    #[serde(default)]
    pub message: Option<String>,
}

impl PaymentVerification {
    /// Whether the confirmation screen should show the payment as completed
    pub fn is_paid(&self) -> bool {
        if !self.success {
            return false;
        }
        match self.status.as_deref() {
            Some(status) => is_paid_status(status),
            None => self.purchase.as_ref().map_or(true, Purchase::is_paid),
        }
    }
}

fn is_paid_status(status: &str) -> bool {
    matches!(status, "paid" | "complete" | "completed" | "succeeded" | "active")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plan_decoding() {
        let plan: Plan = serde_json::from_value(json!({
            "id": 3,
            "name": "12-week program",
            "price": "149.00",
            "duration_days": 84,
            "features": ["Weekly check-ins", "Custom plan"]
        }))
        .unwrap();

        assert_eq!(plan.price, 149.0);
        assert!(plan.is_subscription());
        assert_eq!(plan.features.len(), 2);
    }

    #[test]
    fn test_verification_paid() {
        let paid: PaymentVerification =
            serde_json::from_value(json!({ "success": true, "status": "paid" })).unwrap();
        assert!(paid.is_paid());

        let pending: PaymentVerification =
            serde_json::from_value(json!({ "success": true, "status": "unpaid" })).unwrap();
        assert!(!pending.is_paid());

        let failed: PaymentVerification = serde_json::from_value(json!({
            "success": false,
            "message": "no such session"
        }))
        .unwrap();
        assert!(!failed.is_paid());
    }
}
