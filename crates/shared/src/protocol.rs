use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{AddressId, CustomerId, SortField, SortOrder};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
}

impl From<&Customer> for CustomerDraft {
    fn from(customer: &Customer) -> Self {
        Self {
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            phone_number: customer.phone_number.clone(),
            email: customer.email.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDraft {
    pub address_details: String,
    pub city: String,
    pub state: String,
    pub pin_code: String,
    #[serde(default)]
    pub is_primary: bool,
}

impl From<&Address> for AddressDraft {
    fn from(address: &Address) -> Self {
        Self {
            address_details: address.address_details.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            pin_code: address.pin_code.clone(),
            is_primary: address.is_primary,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Number(i64),
    Text(String),
}

/// Record flags arrive as booleans, `0`/`1` or `null` depending on the
/// backing store. Anything unrecognised reads as `false`.
fn loose_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Option::<RawFlag>::deserialize(deserializer)? {
        None => false,
        Some(RawFlag::Bool(flag)) => flag,
        Some(RawFlag::Number(n)) => n != 0,
        Some(RawFlag::Text(text)) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "t" | "1" | "yes"
        ),
    })
}

const NAIVE_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// RFC 3339, or a zone-less `YYYY-MM-DD HH:MM:SS` taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// Timestamps are display-only; an unreadable one becomes `None` instead of
/// failing the whole record.
fn loose_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .as_deref()
        .and_then(parse_timestamp))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "loose_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub address_count: i64,
    #[serde(default, deserialize_with = "loose_flag")]
    pub has_only_one_address: bool,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub customer_id: CustomerId,
    pub address_details: String,
    pub city: String,
    pub state: String,
    pub pin_code: String,
    #[serde(default, deserialize_with = "loose_flag")]
    pub is_primary: bool,
    #[serde(
        default,
        deserialize_with = "loose_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// Address search row, annotated with the owning customer's contact fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressSearchHit {
    #[serde(flatten)]
    pub address: Address,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub total_pages: u32,
    pub current_page: u32,
}

impl<T> PageResult<T> {
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_items: u64,
}

/// `{ "data": ..., "pagination": ... }` envelope of the customer listing.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedEnvelope<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
}

impl<T> PaginatedEnvelope<T> {
    /// Keeps the server's totals; only the page number falls back to the
    /// requested one when the server omits it.
    pub fn into_page(self, requested_page: u32) -> PageResult<T> {
        PageResult {
            items: self.data,
            total_items: self.pagination.total_items,
            total_pages: self.pagination.total_pages,
            current_page: self.pagination.current_page.unwrap_or(requested_page),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// List bodies arrive either bare or wrapped in `data`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListBody<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListBody<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListBody::Bare(items) => items,
            ListBody::Wrapped { data } => data,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedCustomer {
    pub id: CustomerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerListParams {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    pub city: String,
    pub state: String,
    pub pin_code: String,
    #[serde(rename = "sortBy")]
    pub sort_by: SortField,
    #[serde(rename = "sortOrder")]
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressSearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_code: Option<String>,
}
