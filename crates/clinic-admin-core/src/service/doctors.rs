//! Doctor CRUD.

use serde_json::{Map, Value};
use tracing::{info, warn};

use super::{is_well_formed_id, ServiceError, ServiceResult};
use crate::db::Database;
use crate::models::{Currency, Doctor, DoctorFields, ServiceType, CURRENCIES, SERVICE_TYPES};
use crate::validation::{self, Rule, Validator};

const DUPLICATE_EMAIL: &str = "Doctor with this email already exists";

/// Field rules shared by create and update.
pub fn doctor_validator() -> Validator {
    Validator::new("Validation errors")
        .rule("firstName", Rule::Required, "First name is required")
        .rule("firstName", Rule::Text, "First name is required")
        .rule("middleName", Rule::Text, "Middle name must be text")
        .rule("lastName", Rule::Required, "Last name is required")
        .rule("lastName", Rule::Text, "Last name is required")
        .rule("specialty", Rule::Required, "Specialty is required")
        .rule("specialty", Rule::Text, "Specialty is required")
        .rule("serviceType", Rule::Required, "At least one service type is required")
        .rule("serviceType", Rule::MinItems(1), "At least one service type is required")
        .rule("serviceType", Rule::EachOneOf(SERVICE_TYPES), "Invalid service type")
        .rule("email", Rule::Required, "Invalid email")
        .rule("email", Rule::Email, "Invalid email")
        .rule("phone", Rule::Text, "Phone must be text")
        .rule("feesAmount", Rule::Required, "Fees amount must be a positive number")
        .rule("feesAmount", Rule::NumberAtLeast(0.0), "Fees amount must be a positive number")
        .rule("currency", Rule::Required, "Invalid currency")
        .rule("currency", Rule::OneOf(CURRENCIES), "Invalid currency")
}

impl DoctorFields {
    /// Validate a submitted document and read it into typed fields.
    pub fn from_fields(fields: &Map<String, Value>) -> ServiceResult<Self> {
        doctor_validator().validate(fields)?;

        let service_type = validation::string_list(fields, "serviceType")
            .iter()
            .map(|s| s.parse::<ServiceType>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        let currency: Currency = validation::text(fields, "currency")
            .parse()
            .map_err(|e: crate::models::UnknownVariant| ServiceError::Internal(e.to_string()))?;

        Ok(Self {
            first_name: validation::text(fields, "firstName"),
            middle_name: validation::optional_text(fields, "middleName"),
            last_name: validation::text(fields, "lastName"),
            specialty: validation::text(fields, "specialty"),
            service_type,
            email: validation::email(fields, "email"),
            phone: validation::optional_text(fields, "phone"),
            fees_amount: fields
                .get("feesAmount")
                .and_then(validation::number_value)
                .unwrap_or_default(),
            currency,
        })
    }
}

/// Doctor operations over one borrowed database.
pub struct DoctorService<'a> {
    db: &'a Database,
}

impl<'a> DoctorService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All doctors, most recently created first.
    pub fn list(&self) -> ServiceResult<Vec<Doctor>> {
        Ok(self.db.list_doctors()?)
    }

    /// A single doctor. Malformed and unknown IDs are both `NotFound`.
    pub fn get(&self, id: &str) -> ServiceResult<Doctor> {
        if !is_well_formed_id(id) {
            return Err(invalid_id());
        }
        self.db.get_doctor(id)?.ok_or_else(not_found)
    }

    /// Validate, reject a taken email, then insert.
    pub fn create(&self, fields: &Map<String, Value>) -> ServiceResult<Doctor> {
        let fields = DoctorFields::from_fields(fields)?;

        if self.db.find_doctor_by_email(&fields.email, None)?.is_some() {
            return Err(duplicate_email());
        }

        let doctor = Doctor::new(fields);
        if let Err(e) = self.db.insert_doctor(&doctor) {
            if e.is_constraint_violation() {
                warn!(email = %doctor.email, "doctor insert lost a uniqueness race");
            }
            return Err(e.into());
        }

        info!(doctor_id = %doctor.id, "doctor created");
        Ok(doctor)
    }

    /// Validate, reject an email held by another doctor, then overwrite.
    ///
    /// Existence is checked last, so an invalid body on an unknown ID reports
    /// the validation failure rather than `NotFound`.
    pub fn update(&self, id: &str, fields: &Map<String, Value>) -> ServiceResult<Doctor> {
        let fields = DoctorFields::from_fields(fields)?;

        if self
            .db
            .find_doctor_by_email(&fields.email, Some(id))?
            .is_some()
        {
            return Err(duplicate_email());
        }

        let mut doctor = self.get(id)?;
        doctor.apply(fields);
        if !self.db.update_doctor(&doctor)? {
            return Err(not_found());
        }

        info!(doctor_id = %doctor.id, "doctor updated");
        Ok(doctor)
    }

    /// Remove a doctor. Nothing else references doctors.
    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        if !is_well_formed_id(id) {
            return Err(invalid_id());
        }
        if !self.db.delete_doctor(id)? {
            return Err(not_found());
        }
        info!(doctor_id = %id, "doctor deleted");
        Ok(())
    }
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("Doctor not found".to_string())
}

fn invalid_id() -> ServiceError {
    ServiceError::NotFound("Invalid doctor ID".to_string())
}

fn duplicate_email() -> ServiceError {
    ServiceError::Conflict {
        field: "email".to_string(),
        message: DUPLICATE_EMAIL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn jane() -> Map<String, Value> {
        object(json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "specialty": "Cardiology",
            "serviceType": ["Online"],
            "email": "jane@x.com",
            "feesAmount": 50,
            "currency": "USD"
        }))
    }

    #[test]
    fn test_create_then_get() {
        let db = setup_db();
        let service = DoctorService::new(&db);

        let created = service.create(&jane()).unwrap();
        let fetched = service.get(&created.id).unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.first_name, "Jane");
        assert_eq!(fetched.service_type, vec![ServiceType::Online]);
        assert_eq!(fetched.fees_amount, 50.0);
        assert_eq!(fetched.currency, Currency::USD);
        assert!(fetched.middle_name.is_none());
    }

    #[test]
    fn test_create_trims_and_lowercases() {
        let db = setup_db();
        let service = DoctorService::new(&db);

        let mut fields = jane();
        fields.insert("firstName".into(), json!("  Jane "));
        fields.insert("email".into(), json!(" Jane@X.com "));
        fields.insert("feesAmount".into(), json!("75.5"));

        let doctor = service.create(&fields).unwrap();
        assert_eq!(doctor.first_name, "Jane");
        assert_eq!(doctor.email, "jane@x.com");
        assert_eq!(doctor.fees_amount, 75.5);
    }

    #[test]
    fn test_create_reports_all_violations() {
        let db = setup_db();
        let service = DoctorService::new(&db);

        let err = service
            .create(&object(json!({
                "firstName": "",
                "serviceType": ["Phone"],
                "email": "not-an-email",
                "feesAmount": -5,
                "currency": "JPY"
            })))
            .unwrap_err();

        let ServiceError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        for field in [
            "firstName",
            "lastName",
            "specialty",
            "serviceType",
            "email",
            "feesAmount",
            "currency",
        ] {
            assert!(errors.mentions(field), "missing {field}");
        }
        assert_eq!(db.count_doctors().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_email_conflicts() {
        let db = setup_db();
        let service = DoctorService::new(&db);
        service.create(&jane()).unwrap();

        let mut again = jane();
        again.insert("email".into(), json!("JANE@x.com"));
        let err = service.create(&again).unwrap_err();

        assert!(matches!(err, ServiceError::Conflict { ref field, .. } if field == "email"));
        assert_eq!(db.count_doctors().unwrap(), 1);
    }

    #[test]
    fn test_insert_race_surfaces_as_store_error() {
        let db = setup_db();
        // Another writer claims the email between the lookup and the insert
        db.conn()
            .execute_batch(
                r#"
                CREATE TEMP TRIGGER concurrent_writer BEFORE INSERT ON doctors
                WHEN NEW.id != 'concurrent'
                BEGIN
                    INSERT INTO doctors (
                        id, first_name, last_name, specialty, service_type,
                        email, fees_amount, currency, created_at
                    ) VALUES (
                        'concurrent', 'John', 'Roe', 'Surgery', '["Offline"]',
                        NEW.email, 10, 'USD', NEW.created_at
                    );
                END;
                "#,
            )
            .unwrap();
        let service = DoctorService::new(&db);

        let err = service.create(&jane()).unwrap_err();

        assert!(err.is_internal());
        let ServiceError::Store(store) = err else {
            panic!("expected store error, got {err:?}");
        };
        assert!(store.is_constraint_violation());
        assert_eq!(db.count_doctors().unwrap(), 0);
    }

    #[test]
    fn test_get_malformed_and_missing_are_not_found() {
        let db = setup_db();
        let service = DoctorService::new(&db);

        let err = service.get("123").unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Invalid doctor ID"));

        let err = service.get(&uuid::Uuid::new_v4().to_string()).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Doctor not found"));
    }

    #[test]
    fn test_update_with_own_email() {
        let db = setup_db();
        let service = DoctorService::new(&db);
        let created = service.create(&jane()).unwrap();

        let mut fields = jane();
        fields.insert("specialty".into(), json!("Neurology"));
        let updated = service.update(&created.id, &fields).unwrap();

        assert_eq!(updated.specialty, "Neurology");
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.middle_name.as_deref(), Some(""));
        assert_eq!(updated.phone.as_deref(), Some(""));
        assert_eq!(service.get(&created.id).unwrap(), updated);
    }

    #[test]
    fn test_update_to_taken_email_conflicts() {
        let db = setup_db();
        let service = DoctorService::new(&db);
        service.create(&jane()).unwrap();

        let mut john = jane();
        john.insert("email".into(), json!("john@x.com"));
        let john = service.create(&john).unwrap();

        let err = service.update(&john.id, &jane()).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict { .. }));
    }

    #[test]
    fn test_update_error_order() {
        let db = setup_db();
        let service = DoctorService::new(&db);
        service.create(&jane()).unwrap();
        let missing = uuid::Uuid::new_v4().to_string();

        // Validation is reported before existence
        let err = service.update(&missing, &object(json!({}))).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        // Conflict is reported before existence
        let err = service.update(&missing, &jane()).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict { .. }));

        let mut fresh = jane();
        fresh.insert("email".into(), json!("fresh@x.com"));
        let err = service.update(&missing, &fresh).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn test_delete_twice() {
        let db = setup_db();
        let service = DoctorService::new(&db);
        let created = service.create(&jane()).unwrap();

        assert!(service.delete(&created.id).is_ok());
        assert!(matches!(
            service.delete(&created.id),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.get(&created.id),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_newest_first() {
        let db = setup_db();
        let service = DoctorService::new(&db);

        let first = service.create(&jane()).unwrap();
        let mut fields = jane();
        fields.insert("email".into(), json!("second@x.com"));
        let second = service.create(&fields).unwrap();

        let ids: Vec<_> = service.list().unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
