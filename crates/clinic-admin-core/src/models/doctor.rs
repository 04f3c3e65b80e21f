//! Doctor models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{now_timestamp, UnknownVariant};

/// Accepted values for [`ServiceType`], in wire form.
pub const SERVICE_TYPES: &[&str] = &["Online", "Offline"];

/// Accepted values for [`Currency`], in wire form.
pub const CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "INR", "CAD", "AUD"];

/// How a doctor sees patients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ServiceType {
    /// Remote consultations
    Online,
    /// In-person consultations
    Offline,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Online => "Online",
            ServiceType::Offline => "Offline",
        }
    }
}

impl FromStr for ServiceType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Online" => Ok(ServiceType::Online),
            "Offline" => Ok(ServiceType::Offline),
            _ => Err(UnknownVariant::new("service type", s)),
        }
    }
}

/// Currency a consultation fee is charged in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Currency {
    USD,
    EUR,
    GBP,
    INR,
    CAD,
    AUD,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::INR => "INR",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
        }
    }
}

impl FromStr for Currency {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "INR" => Ok(Currency::INR),
            "CAD" => Ok(Currency::CAD),
            "AUD" => Ok(Currency::AUD),
            _ => Err(UnknownVariant::new("currency", s)),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A doctor listed by the clinic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    /// Store-generated UUID
    #[serde(rename = "_id")]
    pub id: String,
    /// Given name
    pub first_name: String,
    /// Middle name; left unset on create, normalized to "" on update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    /// Family name
    pub last_name: String,
    /// Medical specialty (e.g., "Cardiology")
    pub specialty: String,
    /// Consultation modes offered; never empty
    pub service_type: Vec<ServiceType>,
    /// Contact email, lowercased; unique among doctors
    pub email: String,
    /// Contact phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Consultation fee, non-negative
    pub fees_amount: f64,
    /// Currency of `fees_amount`
    pub currency: Currency,
    /// Creation timestamp
    pub created_at: String,
}

/// Validated doctor fields, as accepted by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorFields {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub specialty: String,
    pub service_type: Vec<ServiceType>,
    pub email: String,
    pub phone: Option<String>,
    pub fees_amount: f64,
    pub currency: Currency,
}

impl Doctor {
    /// Create a new doctor record with a fresh ID and creation time.
    pub fn new(fields: DoctorFields) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            first_name: fields.first_name,
            middle_name: fields.middle_name,
            last_name: fields.last_name,
            specialty: fields.specialty,
            service_type: fields.service_type,
            email: fields.email,
            phone: fields.phone,
            fees_amount: fields.fees_amount,
            currency: fields.currency,
            created_at: now_timestamp(),
        }
    }

    /// Overwrite every editable field. Missing optional fields become "".
    pub fn apply(&mut self, fields: DoctorFields) {
        self.first_name = fields.first_name;
        self.middle_name = Some(fields.middle_name.unwrap_or_default());
        self.last_name = fields.last_name;
        self.specialty = fields.specialty;
        self.service_type = fields.service_type;
        self.email = fields.email;
        self.phone = Some(fields.phone.unwrap_or_default());
        self.fees_amount = fields.fees_amount;
        self.currency = fields.currency;
    }

    /// Full display name, "First Middle Last" with empty parts skipped.
    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.middle_name.as_deref(),
            Some(self.last_name.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> DoctorFields {
        DoctorFields {
            first_name: "Jane".into(),
            middle_name: None,
            last_name: "Doe".into(),
            specialty: "Cardiology".into(),
            service_type: vec![ServiceType::Online],
            email: "jane@x.com".into(),
            phone: None,
            fees_amount: 50.0,
            currency: Currency::USD,
        }
    }

    #[test]
    fn test_new_doctor() {
        let doctor = Doctor::new(fields());
        assert_eq!(doctor.id.len(), 36); // UUID format
        assert_eq!(doctor.full_name(), "Jane Doe");
        assert!(doctor.middle_name.is_none());
        assert!(!doctor.created_at.is_empty());
    }

    #[test]
    fn test_apply_normalizes_optionals() {
        let mut doctor = Doctor::new(DoctorFields {
            middle_name: Some("Q".into()),
            phone: Some("555".into()),
            ..fields()
        });
        let created_at = doctor.created_at.clone();

        doctor.apply(fields());
        assert_eq!(doctor.middle_name.as_deref(), Some(""));
        assert_eq!(doctor.phone.as_deref(), Some(""));
        assert_eq!(doctor.created_at, created_at);
    }

    #[test]
    fn test_wire_format() {
        let doctor = Doctor::new(fields());
        let json = serde_json::to_value(&doctor).unwrap();
        assert_eq!(json["_id"], doctor.id.as_str());
        assert_eq!(json["firstName"], "Jane");
        assert_eq!(json["serviceType"], serde_json::json!(["Online"]));
        assert_eq!(json["currency"], "USD");
        assert!(json.get("middleName").is_none());
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("Offline".parse::<ServiceType>().unwrap(), ServiceType::Offline);
        assert_eq!("GBP".parse::<Currency>().unwrap(), Currency::GBP);
        assert!("online".parse::<ServiceType>().is_err());
        assert!("JPY".parse::<Currency>().is_err());
    }
}
