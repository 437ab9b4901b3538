// SPDX-License-Identifier: Apache-2.0

//! Domain model for the bazaar order service: identifier newtypes, the
//! persisted entities, and order lifecycle helpers.

mod catalog;
mod ids;
mod order;

pub use catalog::{PaymentType, Product, User};
pub use ids::{LineItemId, OrderId, ParseError, PaymentTypeId, ProductId, UserId};
pub use order::{LineItem, Order, OrderState};
