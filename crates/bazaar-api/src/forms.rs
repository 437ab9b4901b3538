// SPDX-License-Identifier: Apache-2.0

use bazaar_model::PaymentTypeId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The checkout submission: the bound subset of order fields. The owner and
/// completion time are never taken from the form; they are forced server
/// side. `created_at`/`completed_at`/`user_id` are accepted and ignored so
/// that a client may round-trip the edit-form payload unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckoutForm {
    pub id: i64,
    #[serde(default)]
    pub payment_type_id: Option<i64>,
    #[serde(default)]
    pub row_version: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub completed_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub parameter: &'static str,
    pub reason: &'static str,
}

/// Validated checkout fields, ready for the store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidCheckout {
    pub payment_type_id: PaymentTypeId,
    pub row_version: i64,
}

impl CheckoutForm {
    /// Validates the form. On failure, the caller redisplays the form with
    /// the field errors; nothing is persisted.
    pub fn validate(&self) -> Result<ValidCheckout, Vec<FieldError>> {
        let mut errors = Vec::new();

        let payment_type_id = match self.payment_type_id {
            None => {
                errors.push(FieldError {
                    parameter: "payment_type_id",
                    reason: "required",
                });
                None
            }
            Some(raw) => match PaymentTypeId::new(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.push(FieldError {
                        parameter: "payment_type_id",
                        reason: "invalid",
                    });
                    None
                }
            },
        };

        let row_version = match self.row_version {
            None => {
                errors.push(FieldError {
                    parameter: "row_version",
                    reason: "required",
                });
                None
            }
            Some(v) if v < 0 => {
                errors.push(FieldError {
                    parameter: "row_version",
                    reason: "invalid",
                });
                None
            }
            Some(v) => Some(v),
        };

        match (payment_type_id, row_version) {
            (Some(payment_type_id), Some(row_version)) if errors.is_empty() => Ok(ValidCheckout {
                payment_type_id,
                row_version,
            }),
            _ => Err(errors),
        }
    }
}

#[must_use]
pub fn field_errors_json(errors: &[FieldError]) -> Value {
    Value::Array(
        errors
            .iter()
            .map(|e| json!({"parameter": e.parameter, "reason": e.reason}))
            .collect(),
    )
}
