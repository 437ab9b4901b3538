// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    Empty(&'static str),
    NotAnInteger(&'static str),
    NotPositive(&'static str),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(name) => write!(f, "{name} must not be empty"),
            Self::NotAnInteger(name) => write!(f, "{name} must be an integer"),
            Self::NotPositive(name) => write!(f, "{name} must be >= 1"),
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(raw: i64) -> Result<Self, ParseError> {
        if raw < 1 {
            return Err(ParseError::NotPositive("user_id"));
        }
        Ok(Self(raw))
    }

    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("user_id"));
        }
        let raw = input
            .parse::<i64>()
            .map_err(|_| ParseError::NotAnInteger("user_id"))?;
        Self::new(raw)
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    pub fn new(raw: i64) -> Result<Self, ParseError> {
        if raw < 1 {
            return Err(ParseError::NotPositive("product_id"));
        }
        Ok(Self(raw))
    }

    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("product_id"));
        }
        let raw = input
            .parse::<i64>()
            .map_err(|_| ParseError::NotAnInteger("product_id"))?;
        Self::new(raw)
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct OrderId(i64);

impl OrderId {
    pub fn new(raw: i64) -> Result<Self, ParseError> {
        if raw < 1 {
            return Err(ParseError::NotPositive("order_id"));
        }
        Ok(Self(raw))
    }

    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("order_id"));
        }
        let raw = input
            .parse::<i64>()
            .map_err(|_| ParseError::NotAnInteger("order_id"))?;
        Self::new(raw)
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct LineItemId(i64);

impl LineItemId {
    pub fn new(raw: i64) -> Result<Self, ParseError> {
        if raw < 1 {
            return Err(ParseError::NotPositive("line_item_id"));
        }
        Ok(Self(raw))
    }

    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("line_item_id"));
        }
        let raw = input
            .parse::<i64>()
            .map_err(|_| ParseError::NotAnInteger("line_item_id"))?;
        Self::new(raw)
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PaymentTypeId(i64);

impl PaymentTypeId {
    pub fn new(raw: i64) -> Result<Self, ParseError> {
        if raw < 1 {
            return Err(ParseError::NotPositive("payment_type_id"));
        }
        Ok(Self(raw))
    }

    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("payment_type_id"));
        }
        let raw = input
            .parse::<i64>()
            .map_err(|_| ParseError::NotAnInteger("payment_type_id"))?;
        Self::new(raw)
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}
