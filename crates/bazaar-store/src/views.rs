// SPDX-License-Identifier: Apache-2.0

use bazaar_model::{LineItemId, Order, PaymentType, Product, User};
use serde::{Deserialize, Serialize};

/// One row of the completed-orders listing: the order with its payment
/// method and owner populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderSummary {
    pub order: Order,
    pub payment: PaymentType,
    pub owner: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineItemView {
    pub id: LineItemId,
    pub product: Product,
}

/// The caller's open cart: the open order plus every line item with its
/// product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CartView {
    pub order: Order,
    pub owner: User,
    pub items: Vec<LineItemView>,
}

/// A single order with everything the detail view renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderDetail {
    pub order: Order,
    pub owner: User,
    pub payment: Option<PaymentType>,
    pub items: Vec<LineItemView>,
}
