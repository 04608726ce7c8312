//! Asset records as exchanged with the portfolio backend

use super::error::FolioError;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum AssetType {
    #[serde(rename = "Indian Stock")]
    IndianStock,
    #[serde(rename = "US Stock")]
    UsStock,
    #[serde(rename = "Crypto")]
    Crypto,
}

impl AssetType {
    pub const ALL: [AssetType; 3] = [AssetType::IndianStock, AssetType::UsStock, AssetType::Crypto];

    /// Name used on the wire and in the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::IndianStock => "Indian Stock",
            AssetType::UsStock => "US Stock",
            AssetType::Crypto => "Crypto",
        }
    }

    /// Plural label for grouped views.
    pub fn label(&self) -> &'static str {
        match self {
            AssetType::IndianStock => "Indian Stocks",
            AssetType::UsStock => "US Stocks",
            AssetType::Crypto => "Crypto",
        }
    }

    /// Path segment of the symbol catalogue endpoint.
    pub fn catalogue(&self) -> &'static str {
        match self {
            AssetType::IndianStock => "indian_stocks",
            AssetType::UsStock => "us_stocks",
            AssetType::Crypto => "crypto",
        }
    }

    /// Strict match against the wire name. Anything else is not an asset class.
    pub fn from_wire(value: &str) -> Option<Self> {
        AssetType::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "indian stock" | "indian stocks" | "indian" | "in" => Ok(AssetType::IndianStock),
            "us stock" | "us stocks" | "us" => Ok(AssetType::UsStock),
            "crypto" => Ok(AssetType::Crypto),
            _ => Err(FolioError::validation(format!(
                "Invalid asset type: {s}. Expected one of: Indian Stock, US Stock, Crypto"
            ))),
        }
    }
}

/// Opaque identifier assigned by the backend. Numeric ids are kept as their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(value: &str) -> Self {
        AssetId(value.to_string())
    }
}

impl From<String> for AssetId {
    fn from(value: String) -> Self {
        AssetId(value)
    }
}

impl From<u64> for AssetId {
    fn from(value: u64) -> Self {
        AssetId(value.to_string())
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => AssetId(n.to_string()),
            RawId::Text(s) => AssetId(s),
        })
    }
}

/// An asset as returned by the backend.
///
/// `asset_type` keeps the raw wire string so a record with an unexpected
/// type still loads; use [`Asset::asset_class`] to classify it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub symbol: String,
    pub asset_type: String,
    pub purchase_price: Decimal,
    pub quantity: Decimal,
    #[serde(deserialize_with = "deserialize_purchase_date")]
    pub purchase_date: NaiveDate,
}

impl Asset {
    pub fn asset_class(&self) -> Option<AssetType> {
        AssetType::from_wire(&self.asset_type)
    }

    /// Saturates instead of overflowing for records that bypassed validation.
    pub fn purchase_value(&self) -> Decimal {
        self.purchase_price.saturating_mul(self.quantity)
    }
}

// The backend emits either a bare date or an ISO datetime for the same field.
fn deserialize_purchase_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw)
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .ok_or_else(|| serde::de::Error::custom(format!("invalid purchase_date: {raw}")))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Body of `POST /assets`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAsset {
    pub symbol: String,
    pub asset_type: AssetType,
    pub purchase_price: Decimal,
    pub quantity: Decimal,
    pub purchase_date: NaiveDate,
}

/// Body of `PUT /assets/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    pub purchase_price: Decimal,
    pub quantity: Decimal,
    pub purchase_date: NaiveDate,
}

/// Unvalidated user input for a new asset.
#[derive(Debug, Clone, Default)]
pub struct AssetDraft {
    pub symbol: String,
    pub asset_type: Option<AssetType>,
    pub purchase_price: String,
    pub quantity: String,
    pub purchase_date: String,
}

impl AssetDraft {
    pub fn validate(&self) -> Result<NewAsset, FolioError> {
        let symbol = self.symbol.trim();
        let asset_type = match self.asset_type {
            Some(t) if !symbol.is_empty() => t,
            _ => return Err(FolioError::validation(REQUIRED_FIELDS)),
        };
        let (purchase_price, quantity, purchase_date) =
            validate_holding(&self.purchase_price, &self.quantity, &self.purchase_date)?;

        Ok(NewAsset {
            symbol: symbol.to_uppercase(),
            asset_type,
            purchase_price,
            quantity,
            purchase_date,
        })
    }
}

/// Unvalidated edits to an existing asset. Symbol and type are not editable.
#[derive(Debug, Clone, Default)]
pub struct AssetUpdateDraft {
    pub purchase_price: String,
    pub quantity: String,
    pub purchase_date: String,
}

impl AssetUpdateDraft {
    pub fn validate(&self) -> Result<AssetUpdate, FolioError> {
        let (purchase_price, quantity, purchase_date) =
            validate_holding(&self.purchase_price, &self.quantity, &self.purchase_date)?;

        Ok(AssetUpdate {
            symbol: None,
            asset_type: None,
            purchase_price,
            quantity,
            purchase_date,
        })
    }
}

const REQUIRED_FIELDS: &str = "All fields are required.";

fn validate_holding(
    purchase_price: &str,
    quantity: &str,
    purchase_date: &str,
) -> Result<(Decimal, Decimal, NaiveDate), FolioError> {
    if [purchase_price, quantity, purchase_date]
        .iter()
        .any(|field| field.trim().is_empty())
    {
        return Err(FolioError::validation(REQUIRED_FIELDS));
    }

    let purchase_price = parse_positive(purchase_price)
        .ok_or_else(|| FolioError::validation("Purchase price must be a positive number."))?;
    let quantity = parse_positive(quantity)
        .ok_or_else(|| FolioError::validation("Quantity must be a positive number."))?;
    let purchase_date = parse_date(purchase_date)
        .ok_or_else(|| FolioError::validation("Purchase date must be in YYYY-MM-DD format."))?;
    if purchase_price.checked_mul(quantity).is_none() {
        return Err(FolioError::validation("Purchase value is too large."));
    }

    Ok((purchase_price, quantity, purchase_date))
}

fn parse_positive(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
        .filter(|value| value.is_sign_positive() && !value.is_zero())
}
