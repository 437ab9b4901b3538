// SPDX-License-Identifier: Apache-2.0

use crate::ids::{PaymentTypeId, ProductId, UserId};
use serde::{Deserialize, Serialize};

/// Catalog item. Referenced by cart line items, never mutated by the order
/// service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price_cents: i64,
}

impl Product {
    #[must_use]
    pub fn new(id: ProductId, name: String, price_cents: i64) -> Self {
        Self {
            id,
            name,
            price_cents,
        }
    }
}

/// A saved payment method owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentType {
    pub id: PaymentTypeId,
    pub user_id: UserId,
    pub method: String,
    pub account_suffix: String,
}

impl PaymentType {
    #[must_use]
    pub fn new(id: PaymentTypeId, user_id: UserId, method: String, account_suffix: String) -> Self {
        Self {
            id,
            user_id,
            method,
            account_suffix,
        }
    }
}

/// The authenticated principal. The `api_token` column never leaves the
/// store layer; this struct carries only what views render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
}

impl User {
    #[must_use]
    pub fn new(id: UserId, username: String, display_name: String) -> Self {
        Self {
            id,
            username,
            display_name,
        }
    }
}
