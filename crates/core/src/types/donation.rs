//! Tree-planting donation requests.
//!
//! Donations are simulated: a validated request only produces a thank-you
//! message. Validation mirrors the donation form's rules.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Serialize;

use super::email::{Email, EmailError};

/// Reasons a donation request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DonationError {
    /// The donor name is blank.
    #[error("donor name is required")]
    MissingName,
    /// The email address is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
    /// The tree count is below one or not representable.
    #[error("tree count must be at least 1 (got {0})")]
    InvalidCount(String),
}

/// A validated donation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Donation {
    pub name: String,
    pub email: Email,
    /// Number of trees, at least 1. Fractions are kept as entered.
    pub count: Decimal,
}

impl Donation {
    /// Validate raw form input.
    ///
    /// The name is trimmed and must not be empty. The count is read as a
    /// number in plain or exponent form (`2.5`, `1e3`). A blank, zero or
    /// non-numeric count means one tree; a count below one, or one too large
    /// to represent, is rejected.
    ///
    /// # Errors
    ///
    /// Returns the first [`DonationError`] encountered, checking name, email
    /// and count in that order.
    pub fn validate(name: &str, email: &str, count: &str) -> Result<Self, DonationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DonationError::MissingName);
        }
        let email = Email::parse(email)?;
        let count = parse_count(count)?;

        Ok(Self {
            name: name.to_owned(),
            email,
            count,
        })
    }

    /// Confirmation shown to the donor.
    #[must_use]
    pub fn confirmation_message(&self) -> String {
        format!(
            "Thank you {}! 🌿 We received your request to plant {} tree(s). We will email you at {} with details.",
            self.name, self.count, self.email
        )
    }
}

fn parse_count(raw: &str) -> Result<Decimal, DonationError> {
    let trimmed = raw.trim();
    let invalid = || DonationError::InvalidCount(trimmed.to_owned());

    let count = match Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
        Ok(count) => count,
        Err(_) => match trimmed.parse::<f64>() {
            Ok(f) if f.is_nan() => return Ok(Decimal::ONE),
            Ok(f) => Decimal::from_f64(f).ok_or_else(invalid)?,
            Err(_) => return Ok(Decimal::ONE),
        },
    };

    if count.is_zero() {
        Ok(Decimal::ONE)
    } else if count < Decimal::ONE {
        Err(invalid())
    } else {
        Ok(count.normalize())
    }
}
