// SPDX-License-Identifier: Apache-2.0

//! Raw row decoding. Columns come back as plain integers/strings; the
//! conversion into model newtypes happens in a second step so that a corrupt
//! row surfaces as a [`StoreError`] rather than a panic.

use crate::StoreError;
use bazaar_model::{
    LineItemId, Order, OrderId, ParseError, PaymentType, PaymentTypeId, Product, ProductId, User,
    UserId,
};
use rusqlite::Row;

fn corrupt(e: ParseError) -> StoreError {
    StoreError(format!("corrupt row: {e}"))
}

pub(crate) struct RawOrder {
    pub id: i64,
    pub user_id: i64,
    pub payment_type_id: Option<i64>,
    pub created_at: i64,
    pub completed_at: Option<i64>,
    pub row_version: i64,
}

impl RawOrder {
    pub fn from_row(row: &Row<'_>, base: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(base)?,
            user_id: row.get(base + 1)?,
            payment_type_id: row.get(base + 2)?,
            created_at: row.get(base + 3)?,
            completed_at: row.get(base + 4)?,
            row_version: row.get(base + 5)?,
        })
    }

    pub const COLUMNS: usize = 6;

    pub fn into_order(self) -> Result<Order, StoreError> {
        let payment_type_id = match self.payment_type_id {
            Some(raw) => Some(PaymentTypeId::new(raw).map_err(corrupt)?),
            None => None,
        };
        Ok(Order::new(
            OrderId::new(self.id).map_err(corrupt)?,
            UserId::new(self.user_id).map_err(corrupt)?,
            payment_type_id,
            self.created_at,
            self.completed_at,
            self.row_version,
        ))
    }
}

pub(crate) struct RawPaymentType {
    pub id: i64,
    pub user_id: i64,
    pub method: String,
    pub account_suffix: String,
}

impl RawPaymentType {
    pub fn from_row(row: &Row<'_>, base: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(base)?,
            user_id: row.get(base + 1)?,
            method: row.get(base + 2)?,
            account_suffix: row.get(base + 3)?,
        })
    }

    pub const COLUMNS: usize = 4;

    pub fn into_payment_type(self) -> Result<PaymentType, StoreError> {
        Ok(PaymentType::new(
            PaymentTypeId::new(self.id).map_err(corrupt)?,
            UserId::new(self.user_id).map_err(corrupt)?,
            self.method,
            self.account_suffix,
        ))
    }
}

pub(crate) struct RawUser {
    pub id: i64,
    pub username: String,
    pub display_name: String,
}

impl RawUser {
    pub fn from_row(row: &Row<'_>, base: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(base)?,
            username: row.get(base + 1)?,
            display_name: row.get(base + 2)?,
        })
    }

    pub const COLUMNS: usize = 3;

    pub fn into_user(self) -> Result<User, StoreError> {
        Ok(User::new(
            UserId::new(self.id).map_err(corrupt)?,
            self.username,
            self.display_name,
        ))
    }
}

pub(crate) struct RawProduct {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
}

impl RawProduct {
    pub fn from_row(row: &Row<'_>, base: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(base)?,
            name: row.get(base + 1)?,
            price_cents: row.get(base + 2)?,
        })
    }

    pub fn into_product(self) -> Result<Product, StoreError> {
        Ok(Product::new(
            ProductId::new(self.id).map_err(corrupt)?,
            self.name,
            self.price_cents,
        ))
    }
}

pub(crate) fn line_item_id(raw: i64) -> Result<LineItemId, StoreError> {
    LineItemId::new(raw).map_err(corrupt)
}
