//! Transaction model
//!
//! A transaction is an immutable record of money spent, captured by the
//! surrounding product (manual entry, voice, SMS parsing or receipt scan)
//! and handed to the engine as part of a snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, TransactionId};
use super::money::Money;

/// How a transaction was captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CaptureChannel {
    #[default]
    Manual,
    Voice,
    Sms,
    Receipt,
}

impl fmt::Display for CaptureChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Voice => write!(f, "voice"),
            Self::Sms => write!(f, "sms"),
            Self::Receipt => write!(f, "receipt"),
        }
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

/// A dated, categorized money movement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Amount spent in minor units (negative for refunds)
    pub amount: Money,

    /// ISO currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Raw category id, if the transaction was categorized
    #[serde(default)]
    pub category: Option<CategoryId>,

    /// Merchant/vendor name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,

    /// Free-form note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Capture channel
    #[serde(default)]
    pub source: CaptureChannel,

    /// When the transaction occurred
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new manual transaction
    pub fn new(amount: Money, category: Option<CategoryId>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: TransactionId::new(),
            amount,
            currency: default_currency(),
            category,
            merchant: None,
            note: None,
            source: CaptureChannel::Manual,
            created_at,
        }
    }

    /// Set the capture channel
    pub fn with_source(mut self, source: CaptureChannel) -> Self {
        self.source = source;
        self
    }

    /// Set the merchant name
    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    /// The raw category id, falling back to `other` for uncategorized records
    pub fn category_or_other(&self) -> CategoryId {
        self.category
            .clone()
            .unwrap_or_else(|| CategoryId::from(crate::analytics::taxonomy::OTHER))
    }

    /// Check if this record is a refund
    pub fn is_refund(&self) -> bool {
        self.amount.is_negative()
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        let currency = self.currency.trim();
        if currency.is_empty() || currency.len() > 10 {
            return Err(TransactionValidationError::InvalidCurrency(
                self.currency.clone(),
            ));
        }

        if let Some(merchant) = &self.merchant {
            if merchant.len() > 255 {
                return Err(TransactionValidationError::MerchantTooLong(merchant.len()));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.created_at.format("%Y-%m-%d"),
            self.amount,
            self.category_or_other()
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    InvalidCurrency(String),
    MerchantTooLong(usize),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCurrency(c) => write!(f, "Invalid currency code: '{}'", c),
            Self::MerchantTooLong(len) => {
                write!(f, "Merchant name too long ({} chars, max 255)", len)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}
