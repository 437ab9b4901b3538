// SPDX-License-Identifier: Apache-2.0

//! Wire types for the bazaar order service: the error envelope and the
//! checkout form with its validation rules.

mod errors;
mod forms;

pub use errors::{status_for, ApiError, ApiErrorCode};
pub use forms::{field_errors_json, CheckoutForm, FieldError, ValidCheckout};
