//! Field rules for customer and address drafts.
//!
//! Every rule is a pure function over one value. Draft-level checks run all
//! rules and collect every failure instead of stopping at the first one.

use std::{
    collections::BTreeMap,
    fmt,
    str::FromStr,
    sync::LazyLock,
};

use regex::Regex;
use shared::protocol::{AddressDraft, CustomerDraft};

pub type RuleResult = Result<(), String>;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("phone pattern compiles"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
static PIN_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{5}$").expect("pin code pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CustomerField {
    FirstName,
    LastName,
    PhoneNumber,
    Email,
}

impl CustomerField {
    pub const ALL: [CustomerField; 4] = [
        CustomerField::FirstName,
        CustomerField::LastName,
        CustomerField::PhoneNumber,
        CustomerField::Email,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CustomerField::FirstName => "first_name",
            CustomerField::LastName => "last_name",
            CustomerField::PhoneNumber => "phone_number",
            CustomerField::Email => "email",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CustomerField::FirstName => "First Name",
            CustomerField::LastName => "Last Name",
            CustomerField::PhoneNumber => "Phone Number",
            CustomerField::Email => "Email (Optional)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddressField {
    AddressDetails,
    City,
    State,
    PinCode,
    IsPrimary,
}

impl AddressField {
    pub const ALL: [AddressField; 5] = [
        AddressField::AddressDetails,
        AddressField::City,
        AddressField::State,
        AddressField::PinCode,
        AddressField::IsPrimary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AddressField::AddressDetails => "address_details",
            AddressField::City => "city",
            AddressField::State => "state",
            AddressField::PinCode => "pin_code",
            AddressField::IsPrimary => "is_primary",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AddressField::AddressDetails => "Address Details",
            AddressField::City => "City",
            AddressField::State => "State",
            AddressField::PinCode => "PIN Code",
            AddressField::IsPrimary => "Primary Address",
        }
    }
}

macro_rules! field_name_impls {
    ($field:ident, $kind:literal) => {
        impl fmt::Display for $field {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $field {
            type Err = UnknownField;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
                Self::ALL
                    .into_iter()
                    .find(|field| field.as_str() == wanted)
                    .ok_or_else(|| UnknownField {
                        kind: $kind,
                        name: s.to_string(),
                    })
            }
        }
    };
}

field_name_impls!(CustomerField, "customer");
field_name_impls!(AddressField, "address");

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} field '{name}'")]
pub struct UnknownField {
    pub kind: &'static str,
    pub name: String,
}

/// Field name to error message. Empty means the draft is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors<F: Ord> {
    entries: BTreeMap<F, String>,
}

impl<F: Ord> Default for ValidationErrors<F> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<F: Ord + Copy> ValidationErrors<F> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: F) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> + '_ {
        self.entries
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    pub(crate) fn record(&mut self, field: F, rule: RuleResult) {
        if let Err(message) = rule {
            self.entries.insert(field, message);
        }
    }

    pub(crate) fn clear(&mut self, field: F) -> bool {
        self.entries.remove(&field).is_some()
    }
}

impl<F: Ord + Copy + fmt::Display> fmt::Display for ValidationErrors<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.entries {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

fn required_with_min_len(value: &str, min_chars: usize, required: &str, too_short: &str) -> RuleResult {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(required.to_string())
    } else if trimmed.chars().count() < min_chars {
        Err(too_short.to_string())
    } else {
        Ok(())
    }
}

pub fn first_name(value: &str) -> RuleResult {
    required_with_min_len(
        value,
        2,
        "First name is required",
        "First name must be at least 2 characters",
    )
}

pub fn last_name(value: &str) -> RuleResult {
    required_with_min_len(
        value,
        2,
        "Last name is required",
        "Last name must be at least 2 characters",
    )
}

/// Whitespace anywhere in the number is ignored before matching.
pub fn phone_number(value: &str) -> RuleResult {
    if value.trim().is_empty() {
        return Err("Phone number is required".to_string());
    }
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if PHONE_RE.is_match(&compact) {
        Ok(())
    } else {
        Err("Invalid phone number format".to_string())
    }
}

/// Optional: blank passes, anything else must look like `local@domain.tld`.
pub fn email(value: &str) -> RuleResult {
    if value.trim().is_empty() || EMAIL_RE.is_match(value) {
        Ok(())
    } else {
        Err("Invalid email format".to_string())
    }
}

pub fn address_details(value: &str) -> RuleResult {
    required_with_min_len(
        value,
        5,
        "Address details are required",
        "Address details must be at least 5 characters",
    )
}

pub fn city(value: &str) -> RuleResult {
    required_with_min_len(value, 2, "City is required", "City must be at least 2 characters")
}

pub fn state(value: &str) -> RuleResult {
    required_with_min_len(value, 2, "State is required", "State must be at least 2 characters")
}

pub fn pin_code(value: &str) -> RuleResult {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err("PIN code is required".to_string())
    } else if PIN_CODE_RE.is_match(trimmed) {
        Ok(())
    } else {
        Err("PIN code must be 6 digits".to_string())
    }
}

pub fn validate_customer(draft: &CustomerDraft) -> ValidationErrors<CustomerField> {
    let mut errors = ValidationErrors::default();
    errors.record(CustomerField::FirstName, first_name(&draft.first_name));
    errors.record(CustomerField::LastName, last_name(&draft.last_name));
    errors.record(CustomerField::PhoneNumber, phone_number(&draft.phone_number));
    errors.record(CustomerField::Email, email(&draft.email));
    errors
}

pub fn validate_address(draft: &AddressDraft) -> ValidationErrors<AddressField> {
    let mut errors = ValidationErrors::default();
    errors.record(
        AddressField::AddressDetails,
        address_details(&draft.address_details),
    );
    errors.record(AddressField::City, city(&draft.city));
    errors.record(AddressField::State, state(&draft.state));
    errors.record(AddressField::PinCode, pin_code(&draft.pin_code));
    errors
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
