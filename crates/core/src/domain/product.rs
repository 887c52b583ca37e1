use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub model: String,
    #[serde(alias = "basePrice", with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    pub stock: u32,
    #[serde(default, alias = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, alias = "clientId", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn stock_status(&self, low_stock_threshold: u32) -> StockStatus {
        StockStatus::classify(self.stock, low_stock_threshold)
    }

    /// Price times stock on hand, or `None` when the product overflows a
    /// `Decimal`.
    pub fn stock_value(&self) -> Option<Decimal> {
        self.base_price.checked_mul(Decimal::from(self.stock))
    }

    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(brand) = patch.brand {
            self.brand = brand;
        }
        if let Some(model) = patch.model {
            self.model = model;
        }
        if let Some(base_price) = patch.base_price {
            self.base_price = base_price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = Some(image_url);
        }
        if let Some(client_id) = patch.client_id {
            self.client_id = Some(client_id);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    Low,
    InStock,
}

impl StockStatus {
    pub fn classify(stock: u32, low_stock_threshold: u32) -> Self {
        if stock == 0 {
            Self::OutOfStock
        } else if stock < low_stock_threshold {
            Self::Low
        } else {
            Self::InStock
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::OutOfStock => "Out of Stock",
            Self::Low => "Low Stock",
            Self::InStock => "In Stock",
        }
    }
}

/// Validated payload for creating a product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub brand: String,
    pub model: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub client_id: Option<UserId>,
}

impl ProductDraft {
    pub fn new(
        name: impl Into<String>,
        brand: impl Into<String>,
        model: impl Into<String>,
        base_price: Decimal,
        stock: u32,
    ) -> Result<Self, DomainError> {
        let draft = Self {
            name: required_text("name", &name.into())?,
            brand: required_text("brand", &brand.into())?,
            model: required_text("model", &model.into())?,
            base_price: non_negative_price(base_price)?,
            stock,
            image_url: None,
            client_id: None,
        };
        Ok(draft)
    }

    pub fn with_client(mut self, client_id: UserId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn into_product(self, id: ProductId, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            brand: self.brand,
            model: self.model,
            base_price: self.base_price,
            stock: self.stock,
            image_url: self.image_url,
            client_id: self.client_id,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<UserId>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in
            [("name", &self.name), ("brand", &self.brand), ("model", &self.model)]
        {
            if let Some(value) = value {
                required_text(field, value)?;
            }
        }
        if let Some(price) = self.base_price {
            non_negative_price(price)?;
        }
        Ok(())
    }
}

/// Raw text fields as typed into a product form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub brand: String,
    pub model: String,
    pub base_price: String,
    pub stock: String,
    pub image_url: String,
    pub client_id: String,
}

impl ProductForm {
    pub fn parse(&self) -> Result<ProductDraft, DomainError> {
        let mut draft = ProductDraft::new(
            self.name.as_str(),
            self.brand.as_str(),
            self.model.as_str(),
            parse_price(&self.base_price)?,
            parse_stock(&self.stock)?,
        )?;
        draft.image_url = optional_text(&self.image_url);
        draft.client_id = optional_text(&self.client_id).map(UserId);
        Ok(draft)
    }

    /// Builds a patch from the non-blank fields only.
    pub fn parse_patch(&self) -> Result<ProductPatch, DomainError> {
        let patch = ProductPatch {
            name: optional_text(&self.name),
            brand: optional_text(&self.brand),
            model: optional_text(&self.model),
            base_price: optional_text(&self.base_price).map(|raw| parse_price(&raw)).transpose()?,
            stock: optional_text(&self.stock).map(|raw| parse_stock(&raw)).transpose()?,
            image_url: optional_text(&self.image_url),
            client_id: optional_text(&self.client_id).map(UserId),
        };
        Ok(patch)
    }
}

pub fn parse_price(raw: &str) -> Result<Decimal, DomainError> {
    let trimmed = raw.trim().trim_start_matches('$');
    let price = Decimal::from_str(trimmed)
        .map_err(|_| DomainError::invalid("base_price", format!("`{raw}` is not a decimal number")))?;
    non_negative_price(price)
}

pub fn parse_stock(raw: &str) -> Result<u32, DomainError> {
    let trimmed = raw.trim();
    if trimmed.starts_with('-') {
        return Err(DomainError::invalid("stock", "must not be negative"));
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| DomainError::invalid("stock", format!("`{raw}` is not a whole number")))
}

fn non_negative_price(price: Decimal) -> Result<Decimal, DomainError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(DomainError::invalid("base_price", "must not be negative"));
    }
    Ok(price)
}

fn required_text(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid(field, "is required"));
    }
    Ok(trimmed.to_owned())
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
