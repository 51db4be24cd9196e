//! Address fields shared by the employee forms.

use serde::Deserialize;
use serde::Serialize;

use crate::FormSnapshot;
use crate::validation::digits_only;

pub const ZIP_CODE: &str = "zip_code";
pub const STREET: &str = "street";
pub const NUMBER: &str = "number";
pub const NEIGHBORHOOD: &str = "neighborhood";
pub const CITY: &str = "city";
pub const COMPLEMENT: &str = "complement";

/// Address returned by a postal-code lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    /// Two-letter state code.
    pub state: String,
}

/// Address part of an employee payload. Blank fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

impl AddressPayload {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn non_blank(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Collects the address fields from `snapshot`.
///
/// Values are trimmed, the zip code is reduced to digits, and blank fields
/// are left out entirely.
pub fn collect_address(snapshot: &FormSnapshot) -> AddressPayload {
    AddressPayload {
        street: non_blank(snapshot.trimmed(STREET)),
        number: non_blank(snapshot.trimmed(NUMBER)),
        neighborhood: non_blank(snapshot.trimmed(NEIGHBORHOOD)),
        city: non_blank(snapshot.trimmed(CITY)),
        complement: non_blank(snapshot.trimmed(COMPLEMENT)),
        zip_code: non_blank(&digits_only(snapshot.trimmed(ZIP_CODE))),
    }
}

/// Fills the looked-up fields into `snapshot`.
pub fn apply_address(snapshot: &mut FormSnapshot, fields: &AddressFields) {
    snapshot.insert(STREET, fields.street.as_str());
    snapshot.insert(NEIGHBORHOOD, fields.neighborhood.as_str());
    snapshot.insert(CITY, fields.city.as_str());
}

/// Blanks the looked-up fields, e.g. after the zip code changes.
pub fn clear_address(snapshot: &mut FormSnapshot) {
    for field in [STREET, NEIGHBORHOOD, CITY] {
        snapshot.insert(field, "");
    }
}
