//! Employee records and payloads

use docreg_forms::FormSnapshot;
use docreg_forms::address;
use docreg_forms::address::AddressPayload;
use docreg_forms::catalog::document_field;
use docreg_forms::validation::digits_only;
use docreg_forms::validation::format_cpf;
use docreg_forms::validation::mask_cep;
use docreg_forms::validation::parse_date;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use super::DocumentRecord;
use super::DocumentStatus;

/// One row of `GET /employee/list`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmployeeSummary {
    pub id: String,
    #[serde(alias = "employeeName")]
    pub employee_name: String,
    pub cpf: String,
    #[serde(alias = "companyName")]
    pub company_name: String,
    /// Rows without a status, or with `null`, read as `Unknown`.
    #[serde(default, deserialize_with = "status_or_unknown")]
    pub status: DocumentStatus,
}

fn status_or_unknown<'de, D>(deserializer: D) -> Result<DocumentStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<DocumentStatus>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response of `GET /employee/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmployeeDetail {
    pub id: String,
    #[serde(alias = "employeeName")]
    pub employee_name: String,
    #[serde(alias = "companyName")]
    pub company_name: String,
    pub cpf: String,
    #[serde(default)]
    pub status: Option<DocumentStatus>,
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
    #[serde(default, deserialize_with = "address_object_or_string")]
    pub address: Option<AddressPayload>,
}

impl EmployeeDetail {
    /// The backend's status, or the worst status among the documents when
    /// the backend sent none.
    pub fn overall_status(&self, today: NaiveDate, warn_days: i64) -> DocumentStatus {
        self.status.unwrap_or_else(|| {
            DocumentStatus::of_documents(
                self.documents.iter().map(|doc| doc.expiration_date),
                today,
                warn_days,
            )
        })
    }

    /// Form values for the detail page.
    ///
    /// The CPF is formatted and the CEP masked the same way the inputs
    /// display them while typing.
    pub fn to_snapshot(&self) -> FormSnapshot {
        let mut snapshot = FormSnapshot::new()
            .with("cpf", format_cpf(&self.cpf).unwrap_or_else(|| self.cpf.clone()))
            .with("employee_name", self.employee_name.as_str())
            .with("company_name", self.company_name.as_str());

        let addr = self.address.clone().unwrap_or_default();
        let fields = [
            (address::ZIP_CODE, addr.zip_code.as_deref().map(mask_cep)),
            (address::STREET, addr.street),
            (address::NUMBER, addr.number),
            (address::COMPLEMENT, addr.complement),
            (address::NEIGHBORHOOD, addr.neighborhood),
            (address::CITY, addr.city),
        ];
        for (id, value) in fields {
            snapshot.insert(id, value.unwrap_or_default());
        }

        for (index, doc) in self.documents.iter().enumerate() {
            if let Some(id) = &doc.id {
                snapshot.insert(document_field(index, "id"), id.as_str());
            }
            snapshot.insert(document_field(index, "name"), doc.name.as_str());
            snapshot.insert(
                document_field(index, "expiration_date"),
                doc.expiration_date.format("%Y-%m-%d").to_string(),
            );
        }
        snapshot
    }
}

/// The detail endpoint has returned the address both as an object and as a
/// JSON-encoded string. A string that does not parse reads as no address.
fn address_object_or_string<'de, D>(deserializer: D) -> Result<Option<AddressPayload>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Object(AddressPayload),
        Encoded(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Object(address)) => Some(address),
        Some(Raw::Encoded(text)) => serde_json::from_str(&text).ok(),
        None => None,
    })
}

/// Document row sent when creating or updating an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// `YYYY-MM-DD`.
    pub expiration_date: String,
}

/// Body of `POST /employee/register_employee` and `PUT /employee/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeePayload {
    /// Digits only.
    pub cpf: String,
    pub employee_name: String,
    pub company_name: String,
    pub documents: Vec<DocumentPayload>,
    /// Present only when at least one address field is filled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressPayload>,
}

impl EmployeePayload {
    /// Builds the payload from employee form values.
    ///
    /// Document rows are taken in index order and may have gaps left by
    /// removed rows. Dates typed as `DD/MM/YYYY` are sent as `YYYY-MM-DD`.
    pub fn from_snapshot(snapshot: &FormSnapshot) -> Self {
        let mut indices: Vec<usize> = snapshot
            .iter()
            .filter_map(|(id, _)| document_index(id))
            .collect();
        indices.sort_unstable();
        indices.dedup();

        let documents = indices
            .into_iter()
            .map(|index| {
                let id = snapshot.trimmed(&document_field(index, "id"));
                let date = snapshot.trimmed(&document_field(index, "expiration_date"));
                DocumentPayload {
                    id: (!id.is_empty()).then(|| id.to_string()),
                    name: snapshot.trimmed(&document_field(index, "name")).to_string(),
                    expiration_date: parse_date(date)
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| date.to_string()),
                }
            })
            .collect();

        let address = address::collect_address(snapshot);

        Self {
            cpf: digits_only(snapshot.trimmed("cpf")),
            employee_name: snapshot.trimmed("employee_name").to_string(),
            company_name: snapshot.trimmed("company_name").to_string(),
            documents,
            address: (!address.is_empty()).then_some(address),
        }
    }
}

/// Index of a `documents[N].name` field id.
fn document_index(field_id: &str) -> Option<usize> {
    field_id
        .strip_prefix("documents[")?
        .strip_suffix("].name")?
        .parse()
        .ok()
}
