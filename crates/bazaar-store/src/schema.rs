// SPDX-License-Identifier: Apache-2.0

use crate::StoreError;
use rusqlite::Connection;

/// Applies the relational schema. Idempotent; runs at every `Store::open`.
pub(crate) fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
             id           INTEGER PRIMARY KEY,
             username     TEXT NOT NULL UNIQUE,
             display_name TEXT NOT NULL,
             api_token    TEXT NOT NULL UNIQUE
         );
         CREATE TABLE IF NOT EXISTS products (
             id          INTEGER PRIMARY KEY,
             name        TEXT NOT NULL,
             price_cents INTEGER NOT NULL
         );
         CREATE TABLE IF NOT EXISTS payment_types (
             id             INTEGER PRIMARY KEY,
             user_id        INTEGER NOT NULL REFERENCES users(id),
             method         TEXT NOT NULL,
             account_suffix TEXT NOT NULL
         );
         CREATE TABLE IF NOT EXISTS orders (
             id              INTEGER PRIMARY KEY,
             user_id         INTEGER NOT NULL REFERENCES users(id),
             payment_type_id INTEGER NULL REFERENCES payment_types(id),
             created_at      INTEGER NOT NULL,
             completed_at    INTEGER NULL,
             row_version     INTEGER NOT NULL DEFAULT 0
         );
         CREATE TABLE IF NOT EXISTS order_items (
             id         INTEGER PRIMARY KEY,
             order_id   INTEGER NOT NULL REFERENCES orders(id),
             product_id INTEGER NOT NULL REFERENCES products(id)
         );
         CREATE INDEX IF NOT EXISTS idx_orders_user_payment ON orders(user_id, payment_type_id);
         CREATE INDEX IF NOT EXISTS idx_order_items_order ON order_items(order_id);
         CREATE INDEX IF NOT EXISTS idx_payment_types_user ON payment_types(user_id);",
    )?;
    Ok(())
}
