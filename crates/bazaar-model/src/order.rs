// SPDX-License-Identifier: Apache-2.0

use crate::ids::{LineItemId, OrderId, PaymentTypeId, ProductId, UserId};
use serde::{Deserialize, Serialize};

/// A customer order. While `payment_type_id` is unset the order is the
/// customer's open cart; attaching a payment type completes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub payment_type_id: Option<PaymentTypeId>,
    pub created_at: i64,
    pub completed_at: Option<i64>,
    pub row_version: i64,
}

impl Order {
    #[must_use]
    pub fn new(
        id: OrderId,
        user_id: UserId,
        payment_type_id: Option<PaymentTypeId>,
        created_at: i64,
        completed_at: Option<i64>,
        row_version: i64,
    ) -> Self {
        Self {
            id,
            user_id,
            payment_type_id,
            created_at,
            completed_at,
            row_version,
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.payment_type_id.is_none()
    }

    #[must_use]
    pub const fn state(&self) -> OrderState {
        if self.is_open() {
            OrderState::OpenCart
        } else {
            OrderState::Completed
        }
    }

    #[must_use]
    pub fn owned_by(&self, user: UserId) -> bool {
        self.user_id == user
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    OpenCart,
    Completed,
}

/// One cart line: a single unit of a product inside an order. Quantity is
/// modeled as one row per added unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineItem {
    pub id: LineItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
}

impl LineItem {
    #[must_use]
    pub fn new(id: LineItemId, order_id: OrderId, product_id: ProductId) -> Self {
        Self {
            id,
            order_id,
            product_id,
        }
    }
}
