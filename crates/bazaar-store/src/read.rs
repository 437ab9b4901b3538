// SPDX-License-Identifier: Apache-2.0

use crate::row::{line_item_id, RawOrder, RawPaymentType, RawProduct, RawUser};
use crate::views::{CartView, LineItemView, OrderDetail, OrderSummary};
use crate::{Store, StoreError};
use bazaar_model::{Order, OrderId, PaymentType, Product, ProductId, User, UserId};
use rusqlite::{params, Connection, OptionalExtension};

const ORDER_COLS: &str =
    "o.id, o.user_id, o.payment_type_id, o.created_at, o.completed_at, o.row_version";
const PAYMENT_COLS: &str = "p.id, p.user_id, p.method, p.account_suffix";
const USER_COLS: &str = "u.id, u.username, u.display_name";

impl Store {
    /// Resolves a bearer token to its user, if any.
    pub async fn user_by_token(&self, token: String) -> Result<Option<User>, StoreError> {
        self.read(move |conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT id, username, display_name FROM users WHERE api_token = ?1",
            )?;
            let raw = stmt
                .query_row(params![token], |row| RawUser::from_row(row, 0))
                .optional()?;
            raw.map(RawUser::into_user).transpose()
        })
        .await
    }

    pub async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.read(move |conn| {
            let mut stmt =
                conn.prepare_cached("SELECT id, name, price_cents FROM products WHERE id = ?1")?;
            let raw = stmt
                .query_row(params![id.as_i64()], |row| RawProduct::from_row(row, 0))
                .optional()?;
            raw.map(RawProduct::into_product).transpose()
        })
        .await
    }

    /// The caller's saved payment methods, the selectable options of the
    /// edit form.
    pub async fn payment_types_for(&self, user: UserId) -> Result<Vec<PaymentType>, StoreError> {
        self.read(move |conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT id, user_id, method, account_suffix FROM payment_types \
                 WHERE user_id = ?1 ORDER BY id",
            )?;
            let raws = stmt
                .query_map(params![user.as_i64()], |row| RawPaymentType::from_row(row, 0))?
                .collect::<Result<Vec<_>, _>>()?;
            raws.into_iter()
                .map(RawPaymentType::into_payment_type)
                .collect()
        })
        .await
    }

    /// Completed orders (payment reference set) owned by `user`, payment
    /// method and owner populated, newest first.
    pub async fn completed_orders(&self, user: UserId) -> Result<Vec<OrderSummary>, StoreError> {
        self.read(move |conn| {
            let sql = format!(
                "SELECT {ORDER_COLS}, {PAYMENT_COLS}, {USER_COLS} \
                 FROM orders o \
                 JOIN payment_types p ON p.id = o.payment_type_id \
                 JOIN users u ON u.id = o.user_id \
                 WHERE o.user_id = ?1 AND o.payment_type_id IS NOT NULL \
                 ORDER BY o.completed_at DESC, o.id DESC"
            );
            let mut stmt = conn.prepare_cached(&sql)?;
            let raws = stmt
                .query_map(params![user.as_i64()], |row| {
                    let order = RawOrder::from_row(row, 0)?;
                    let payment = RawPaymentType::from_row(row, RawOrder::COLUMNS)?;
                    let owner =
                        RawUser::from_row(row, RawOrder::COLUMNS + RawPaymentType::COLUMNS)?;
                    Ok((order, payment, owner))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            raws.into_iter()
                .map(|(order, payment, owner)| {
                    Ok(OrderSummary {
                        order: order.into_order()?,
                        payment: payment.into_payment_type()?,
                        owner: owner.into_user()?,
                    })
                })
                .collect()
        })
        .await
    }

    /// The caller's open cart (payment reference null) with line items and
    /// their products, or `None` when no cart exists.
    pub async fn open_cart(&self, user: UserId) -> Result<Option<CartView>, StoreError> {
        self.read(move |conn| {
            let sql = format!(
                "SELECT {ORDER_COLS}, {USER_COLS} \
                 FROM orders o \
                 JOIN users u ON u.id = o.user_id \
                 WHERE o.user_id = ?1 AND o.payment_type_id IS NULL \
                 ORDER BY o.id LIMIT 1"
            );
            let mut stmt = conn.prepare_cached(&sql)?;
            let head = stmt
                .query_row(params![user.as_i64()], |row| {
                    let order = RawOrder::from_row(row, 0)?;
                    let owner = RawUser::from_row(row, RawOrder::COLUMNS)?;
                    Ok((order, owner))
                })
                .optional()?;
            let Some((order, owner)) = head else {
                return Ok(None);
            };
            let order = order.into_order()?;
            let items = items_for_order(conn, order.id)?;
            Ok(Some(CartView {
                order,
                owner: owner.into_user()?,
                items,
            }))
        })
        .await
    }

    /// A single order with payment, owner, and line items populated.
    /// Ownership is checked by the caller against `OrderDetail::order`.
    pub async fn order_detail(&self, id: OrderId) -> Result<Option<OrderDetail>, StoreError> {
        self.read(move |conn| {
            let sql = format!(
                "SELECT {ORDER_COLS}, {USER_COLS}, \
                        p.id, p.user_id, p.method, p.account_suffix \
                 FROM orders o \
                 JOIN users u ON u.id = o.user_id \
                 LEFT JOIN payment_types p ON p.id = o.payment_type_id \
                 WHERE o.id = ?1"
            );
            let mut stmt = conn.prepare_cached(&sql)?;
            let head = stmt
                .query_row(params![id.as_i64()], |row| {
                    let order = RawOrder::from_row(row, 0)?;
                    let owner = RawUser::from_row(row, RawOrder::COLUMNS)?;
                    let payment_base = RawOrder::COLUMNS + RawUser::COLUMNS;
                    let payment_id: Option<i64> = row.get(payment_base)?;
                    let payment = match payment_id {
                        Some(_) => Some(RawPaymentType::from_row(row, payment_base)?),
                        None => None,
                    };
                    Ok((order, owner, payment))
                })
                .optional()?;
            let Some((order, owner, payment)) = head else {
                return Ok(None);
            };
            let order = order.into_order()?;
            let items = items_for_order(conn, order.id)?;
            Ok(Some(OrderDetail {
                order,
                owner: owner.into_user()?,
                payment: payment.map(RawPaymentType::into_payment_type).transpose()?,
                items,
            }))
        })
        .await
    }

    /// The bare order row, used for open/closed and ownership preconditions.
    pub async fn order_header(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        self.read(move |conn| {
            let sql = format!("SELECT {ORDER_COLS} FROM orders o WHERE o.id = ?1");
            let mut stmt = conn.prepare_cached(&sql)?;
            let raw = stmt
                .query_row(params![id.as_i64()], |row| RawOrder::from_row(row, 0))
                .optional()?;
            raw.map(RawOrder::into_order).transpose()
        })
        .await
    }
}

fn items_for_order(conn: &Connection, order: OrderId) -> Result<Vec<LineItemView>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT i.id, pr.id, pr.name, pr.price_cents \
         FROM order_items i \
         JOIN products pr ON pr.id = i.product_id \
         WHERE i.order_id = ?1 ORDER BY i.id",
    )?;
    let raws = stmt
        .query_map(params![order.as_i64()], |row| {
            let item_id: i64 = row.get(0)?;
            let product = RawProduct::from_row(row, 1)?;
            Ok((item_id, product))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    raws.into_iter()
        .map(|(item, product)| {
            Ok(LineItemView {
                id: line_item_id(item)?,
                product: product.into_product()?,
            })
        })
        .collect()
}
