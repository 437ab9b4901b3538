// SPDX-License-Identifier: Apache-2.0

use crate::{Store, StoreError};
use bazaar_model::{LineItemId, OrderId, PaymentTypeId, ProductId, UserId};
use rusqlite::{params, OptionalExtension};

/// Result of an optimistic-concurrency update. A lost race reports
/// `Conflict`; a row that vanished underneath the update reports `NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated { new_version: i64 },
    NotFound,
    Conflict,
}

impl Store {
    pub async fn insert_user(
        &self,
        username: String,
        display_name: String,
        api_token: String,
    ) -> Result<UserId, StoreError> {
        self.write(move |conn| {
            conn.execute(
                "INSERT INTO users (username, display_name, api_token) VALUES (?1, ?2, ?3)",
                params![username, display_name, api_token],
            )?;
            UserId::new(conn.last_insert_rowid()).map_err(|e| StoreError(e.to_string()))
        })
        .await
    }

    pub async fn insert_product(
        &self,
        name: String,
        price_cents: i64,
    ) -> Result<ProductId, StoreError> {
        self.write(move |conn| {
            conn.execute(
                "INSERT INTO products (name, price_cents) VALUES (?1, ?2)",
                params![name, price_cents],
            )?;
            ProductId::new(conn.last_insert_rowid()).map_err(|e| StoreError(e.to_string()))
        })
        .await
    }

    pub async fn insert_payment_type(
        &self,
        user: UserId,
        method: String,
        account_suffix: String,
    ) -> Result<PaymentTypeId, StoreError> {
        self.write(move |conn| {
            conn.execute(
                "INSERT INTO payment_types (user_id, method, account_suffix) VALUES (?1, ?2, ?3)",
                params![user.as_i64(), method, account_suffix],
            )?;
            PaymentTypeId::new(conn.last_insert_rowid()).map_err(|e| StoreError(e.to_string()))
        })
        .await
    }

    /// Appends one line item for `product` to the caller's open order,
    /// creating the order first when none exists. One transaction.
    pub async fn add_to_cart(
        &self,
        user: UserId,
        product: ProductId,
        now_unix: i64,
    ) -> Result<OrderId, StoreError> {
        self.write(move |conn| {
            let tx = conn.transaction()?;
            let existing: Option<i64> = tx
                .query_row(
                    "SELECT id FROM orders \
                     WHERE user_id = ?1 AND payment_type_id IS NULL \
                     ORDER BY id LIMIT 1",
                    params![user.as_i64()],
                    |row| row.get(0),
                )
                .optional()?;
            let order_id = match existing {
                Some(id) => id,
                None => {
                    tx.execute(
                        "INSERT INTO orders (user_id, payment_type_id, created_at, completed_at, row_version) \
                         VALUES (?1, NULL, ?2, NULL, 0)",
                        params![user.as_i64(), now_unix],
                    )?;
                    tx.last_insert_rowid()
                }
            };
            tx.execute(
                "INSERT INTO order_items (order_id, product_id) VALUES (?1, ?2)",
                params![order_id, product.as_i64()],
            )?;
            tx.commit()?;
            OrderId::new(order_id).map_err(|e| StoreError(e.to_string()))
        })
        .await
    }

    /// Deletes one line item, but only when it belongs to an order owned by
    /// `owner`. Returns `false` when nothing matched.
    pub async fn remove_line_item(
        &self,
        item: LineItemId,
        owner: UserId,
    ) -> Result<bool, StoreError> {
        self.write(move |conn| {
            let changed = conn.execute(
                "DELETE FROM order_items \
                 WHERE id = ?1 \
                   AND order_id IN (SELECT id FROM orders WHERE user_id = ?2)",
                params![item.as_i64(), owner.as_i64()],
            )?;
            Ok(changed == 1)
        })
        .await
    }

    /// Checkout: attaches the payment method, forces the owner, and stamps
    /// the completion time, guarded by the order's `row_version`.
    pub async fn checkout_order(
        &self,
        order: OrderId,
        owner: UserId,
        payment: PaymentTypeId,
        expected_version: i64,
        completed_at_unix: i64,
    ) -> Result<UpdateOutcome, StoreError> {
        self.write(move |conn| {
            let tx = conn.transaction()?;
            let changed = tx.execute(
                "UPDATE orders \
                 SET user_id = ?1, payment_type_id = ?2, completed_at = ?3, \
                     row_version = row_version + 1 \
                 WHERE id = ?4 AND row_version = ?5",
                params![
                    owner.as_i64(),
                    payment.as_i64(),
                    completed_at_unix,
                    order.as_i64(),
                    expected_version
                ],
            )?;
            let outcome = if changed == 1 {
                UpdateOutcome::Updated {
                    new_version: expected_version + 1,
                }
            } else {
                let exists: Option<i64> = tx
                    .query_row(
                        "SELECT 1 FROM orders WHERE id = ?1",
                        params![order.as_i64()],
                        |row| row.get(0),
                    )
                    .optional()?;
                if exists.is_some() {
                    UpdateOutcome::Conflict
                } else {
                    UpdateOutcome::NotFound
                }
            };
            tx.commit()?;
            Ok(outcome)
        })
        .await
    }

    /// Deletes a draft order and all of its line items in one transaction.
    /// The order must be owned by `owner` and still open; returns `false`
    /// otherwise.
    pub async fn delete_order(&self, order: OrderId, owner: UserId) -> Result<bool, StoreError> {
        self.write(move |conn| {
            let tx = conn.transaction()?;
            let deletable: Option<i64> = tx
                .query_row(
                    "SELECT 1 FROM orders \
                     WHERE id = ?1 AND user_id = ?2 AND payment_type_id IS NULL",
                    params![order.as_i64(), owner.as_i64()],
                    |row| row.get(0),
                )
                .optional()?;
            if deletable.is_none() {
                return Ok(false);
            }
            tx.execute(
                "DELETE FROM order_items WHERE order_id = ?1",
                params![order.as_i64()],
            )?;
            tx.execute("DELETE FROM orders WHERE id = ?1", params![order.as_i64()])?;
            tx.commit()?;
            Ok(true)
        })
        .await
    }
}
