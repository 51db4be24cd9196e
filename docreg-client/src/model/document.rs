//! Documents and their validity status

use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

/// Days before expiration at which a document counts as expiring.
pub const DEFAULT_WARN_DAYS: i64 = 30;

/// Validity of a document, or of an employee's documents as a whole.
///
/// Variants are ordered from best to worst so the status of a set of
/// documents is simply the maximum.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Valid,
    Expiring,
    Expired,
    /// A status string this client does not know, or no status at all.
    #[default]
    #[serde(other)]
    Unknown,
}

impl DocumentStatus {
    /// Classifies one expiration date.
    ///
    /// A date before `today` is expired. A date within `warn_days` of
    /// `today` (inclusive) is expiring.
    pub fn from_expiration(expiration: NaiveDate, today: NaiveDate, warn_days: i64) -> Self {
        let remaining = (expiration - today).num_days();
        if remaining < 0 {
            Self::Expired
        } else if remaining <= warn_days {
            Self::Expiring
        } else {
            Self::Valid
        }
    }

    /// Worst status among `dates`; `Valid` when there are none.
    pub fn of_documents<I>(dates: I, today: NaiveDate, warn_days: i64) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        dates
            .into_iter()
            .map(|date| Self::from_expiration(date, today, warn_days))
            .filter(|status| *status != Self::Unknown)
            .max()
            .unwrap_or(Self::Valid)
    }

    /// Label shown in the listing table.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Valid => "Vigente",
            Self::Expiring => "Próximo a vencer",
            Self::Expired => "Vencido",
            Self::Unknown => "Desconhecido",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Expiring => "expiring",
            Self::Expired => "expired",
            Self::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "valid" => Ok(Self::Valid),
            "expiring" => Ok(Self::Expiring),
            "expired" => Ok(Self::Expired),
            other => Err(format!("unknown document status '{other}'")),
        }
    }
}

/// A stored document as returned by the employee detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(alias = "expirationDate")]
    pub expiration_date: NaiveDate,
}

impl DocumentRecord {
    pub fn status(&self, today: NaiveDate, warn_days: i64) -> DocumentStatus {
        DocumentStatus::from_expiration(self.expiration_date, today, warn_days)
    }
}
