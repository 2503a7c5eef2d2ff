use crate::domain::tlv::MAX_VALUE_LEN;
use crate::error::{PixError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Globally unique identifier of the Pix arrangement (tag `26`, sub-tag `00`).
pub const PIX_GUI: &str = "br.gov.bcb.pix";

/// Longest key that still fits the merchant account info group next to the GUI.
pub const KEY_MAX_LEN: usize = MAX_VALUE_LEN - (4 + PIX_GUI.len()) - 4;

/// Longest reference label accepted in the additional data group.
pub const TRANSACTION_ID_MAX_LEN: usize = 25;

/// Longest text tag `54` may carry, e.g. `9999999999.99`.
pub const AMOUNT_MAX_LEN: usize = 13;

/// Reference label used when the payer is not asked for one.
pub const DEFAULT_TRANSACTION_ID: &str = "***";

/// A transaction amount in BRL with exactly two fraction digits.
///
/// Zero is not an `Amount`: a zero value means "payer chooses" and is
/// represented by the absence of an amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO {
            return Err(PixError::MalformedAmount(format!(
                "{value} is not a positive amount"
            )));
        }
        if value.normalize().scale() > 2 {
            return Err(PixError::MalformedAmount(format!(
                "{value} has more than two decimal places"
            )));
        }
        let mut scaled = value;
        scaled.rescale(2);
        if scaled.scale() != 2 {
            return Err(PixError::MalformedAmount(format!(
                "{value} cannot be written with two decimal places"
            )));
        }
        if scaled.to_string().len() > AMOUNT_MAX_LEN {
            return Err(PixError::MalformedAmount(format!(
                "{value} is longer than {AMOUNT_MAX_LEN} characters"
            )));
        }
        Ok(Self(scaled))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PixError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Renders as `"10.00"`, the form carried by tag `54`.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference label carried in the additional data group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionId(String);

impl TransactionId {
    /// Blank input falls back to [`DEFAULT_TRANSACTION_ID`].
    pub fn new(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(Self::default());
        }
        if !value.is_ascii() {
            return Err(PixError::InvalidCharacters {
                field: "transaction id",
                value: value.to_string(),
            });
        }
        let len = value.len();
        if len > TRANSACTION_ID_MAX_LEN {
            return Err(PixError::InvalidFieldLength {
                field: "transaction id",
                len,
                max: TRANSACTION_ID_MAX_LEN,
            });
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self(DEFAULT_TRANSACTION_ID.to_string())
    }
}

/// Raw, unvalidated input for one payload, as read from CSV rows or the
/// site configuration.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PaymentRequest {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// The validated payee and payment details behind one BR Code.
///
/// Name and city are kept as entered; the encoder folds them into the
/// payload charset.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIdentity {
    key: String,
    name: String,
    city: String,
    amount: Option<Amount>,
    transaction_id: TransactionId,
}

impl PaymentIdentity {
    /// Creates an identity with no amount and the default transaction id.
    ///
    /// The key is passed through verbatim but must not be blank, must be
    /// ASCII and must fit in the merchant account info group.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        city: impl Into<String>,
    ) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(PixError::MissingRequiredField("key"));
        }
        if !key.is_ascii() {
            return Err(PixError::InvalidCharacters {
                field: "key",
                value: key,
            });
        }
        if key.len() > KEY_MAX_LEN {
            return Err(PixError::InvalidFieldLength {
                field: "key",
                len: key.len(),
                max: KEY_MAX_LEN,
            });
        }
        Ok(Self {
            key,
            name: name.into(),
            city: city.into(),
            amount: None,
            transaction_id: TransactionId::default(),
        })
    }

    /// Sets the amount. Zero clears it.
    pub fn with_amount(mut self, amount: Decimal) -> Result<Self> {
        self.amount = if amount.is_zero() {
            None
        } else {
            Some(Amount::new(amount)?)
        };
        Ok(self)
    }

    pub fn with_transaction_id(mut self, transaction_id: &str) -> Result<Self> {
        self.transaction_id = TransactionId::new(transaction_id)?;
        Ok(self)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn amount(&self) -> Option<Amount> {
        self.amount
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }
}

impl TryFrom<PaymentRequest> for PaymentIdentity {
    type Error = PixError;

    fn try_from(request: PaymentRequest) -> Result<Self> {
        let mut identity = Self::new(request.key, request.name, request.city)?;
        if let Some(amount) = request.amount {
            identity = identity.with_amount(amount)?;
        }
        if let Some(transaction_id) = request.transaction_id {
            identity = identity.with_transaction_id(&transaction_id)?;
        }
        Ok(identity)
    }
}
