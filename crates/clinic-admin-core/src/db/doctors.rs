//! Doctor database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Doctor, ServiceType};

const DOCTOR_COLUMNS: &str = "id, first_name, middle_name, last_name, specialty, service_type, \
                              email, phone, fees_amount, currency, created_at";

impl Database {
    /// Insert a new doctor.
    pub fn insert_doctor(&self, doctor: &Doctor) -> DbResult<()> {
        let service_type_json = serde_json::to_string(&doctor.service_type)?;

        self.conn.execute(
            r#"
            INSERT INTO doctors (
                id, first_name, middle_name, last_name, specialty, service_type,
                email, phone, fees_amount, currency, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                doctor.id,
                doctor.first_name,
                doctor.middle_name,
                doctor.last_name,
                doctor.specialty,
                service_type_json,
                doctor.email,
                doctor.phone,
                doctor.fees_amount,
                doctor.currency.as_str(),
                doctor.created_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing doctor. `created_at` is never rewritten.
    pub fn update_doctor(&self, doctor: &Doctor) -> DbResult<bool> {
        let service_type_json = serde_json::to_string(&doctor.service_type)?;

        let rows_affected = self.conn.execute(
            r#"
            UPDATE doctors SET
                first_name = ?2,
                middle_name = ?3,
                last_name = ?4,
                specialty = ?5,
                service_type = ?6,
                email = ?7,
                phone = ?8,
                fees_amount = ?9,
                currency = ?10
            WHERE id = ?1
            "#,
            params![
                doctor.id,
                doctor.first_name,
                doctor.middle_name,
                doctor.last_name,
                doctor.specialty,
                service_type_json,
                doctor.email,
                doctor.phone,
                doctor.fees_amount,
                doctor.currency.as_str(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a doctor by ID.
    pub fn get_doctor(&self, id: &str) -> DbResult<Option<Doctor>> {
        self.conn
            .query_row(
                &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE id = ?"),
                [id],
                DoctorRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Find a doctor by email (case-insensitive), optionally ignoring one ID.
    pub fn find_doctor_by_email(
        &self,
        email: &str,
        excluding_id: Option<&str>,
    ) -> DbResult<Option<Doctor>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {DOCTOR_COLUMNS} FROM doctors
                     WHERE email = ?1 COLLATE NOCASE AND (?2 IS NULL OR id != ?2)
                     LIMIT 1"
                ),
                params![email, excluding_id],
                DoctorRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all doctors, newest first.
    pub fn list_doctors(&self) -> DbResult<Vec<Doctor>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {DOCTOR_COLUMNS} FROM doctors ORDER BY created_at DESC, rowid DESC"
        ))?;

        let rows = stmt.query_map([], DoctorRow::from_row)?;

        let mut doctors = Vec::new();
        for row in rows {
            doctors.push(row?.try_into()?);
        }
        Ok(doctors)
    }

    /// Count stored doctors.
    pub fn count_doctors(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM doctors", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Delete a doctor.
    pub fn delete_doctor(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM doctors WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct DoctorRow {
    id: String,
    first_name: String,
    middle_name: Option<String>,
    last_name: String,
    specialty: String,
    service_type: String,
    email: String,
    phone: Option<String>,
    fees_amount: f64,
    currency: String,
    created_at: String,
}

impl DoctorRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            first_name: row.get(1)?,
            middle_name: row.get(2)?,
            last_name: row.get(3)?,
            specialty: row.get(4)?,
            service_type: row.get(5)?,
            email: row.get(6)?,
            phone: row.get(7)?,
            fees_amount: row.get(8)?,
            currency: row.get(9)?,
            created_at: row.get(10)?,
        })
    }
}

impl TryFrom<DoctorRow> for Doctor {
    type Error = DbError;

    fn try_from(row: DoctorRow) -> Result<Self, Self::Error> {
        let service_type: Vec<ServiceType> = serde_json::from_str(&row.service_type)?;

        Ok(Doctor {
            id: row.id,
            first_name: row.first_name,
            middle_name: row.middle_name,
            last_name: row.last_name,
            specialty: row.specialty,
            service_type,
            email: row.email,
            phone: row.phone,
            fees_amount: row.fees_amount,
            currency: row.currency.parse()?,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, DoctorFields};

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_doctor(email: &str) -> Doctor {
        Doctor::new(DoctorFields {
            first_name: "Jane".into(),
            middle_name: None,
            last_name: "Doe".into(),
            specialty: "Cardiology".into(),
            service_type: vec![ServiceType::Online, ServiceType::Offline],
            email: email.into(),
            phone: None,
            fees_amount: 50.0,
            currency: Currency::USD,
        })
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();
        let doctor = make_doctor("jane@x.com");
        db.insert_doctor(&doctor).unwrap();

        let retrieved = db.get_doctor(&doctor.id).unwrap().unwrap();
        assert_eq!(retrieved, doctor);
    }

    #[test]
    fn test_get_missing() {
        let db = setup_db();
        assert!(db.get_doctor("nope").unwrap().is_none());
    }

    #[test]
    fn test_update_doctor() {
        let db = setup_db();
        let mut doctor = make_doctor("jane@x.com");
        db.insert_doctor(&doctor).unwrap();

        doctor.specialty = "Neurology".into();
        doctor.currency = Currency::EUR;
        assert!(db.update_doctor(&doctor).unwrap());

        let retrieved = db.get_doctor(&doctor.id).unwrap().unwrap();
        assert_eq!(retrieved.specialty, "Neurology");
        assert_eq!(retrieved.currency, Currency::EUR);

        let ghost = make_doctor("ghost@x.com");
        assert!(!db.update_doctor(&ghost).unwrap());
    }

    #[test]
    fn test_find_by_email_excluding() {
        let db = setup_db();
        let doctor = make_doctor("jane@x.com");
        db.insert_doctor(&doctor).unwrap();

        assert!(db.find_doctor_by_email("JANE@x.com", None).unwrap().is_some());
        assert!(db
            .find_doctor_by_email("jane@x.com", Some(&doctor.id))
            .unwrap()
            .is_none());
        assert!(db
            .find_doctor_by_email("jane@x.com", Some("other-id"))
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_list_newest_first() {
        let db = setup_db();
        let first = make_doctor("a@x.com");
        let second = make_doctor("b@x.com");
        let third = make_doctor("c@x.com");
        db.insert_doctor(&first).unwrap();
        db.insert_doctor(&second).unwrap();
        db.insert_doctor(&third).unwrap();

        let ids: Vec<_> = db.list_doctors().unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
        assert_eq!(db.count_doctors().unwrap(), 3);
    }

    #[test]
    fn test_delete_doctor() {
        let db = setup_db();
        let doctor = make_doctor("jane@x.com");
        db.insert_doctor(&doctor).unwrap();

        assert!(db.delete_doctor(&doctor.id).unwrap());
        assert!(!db.delete_doctor(&doctor.id).unwrap());
        assert_eq!(db.count_doctors().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_email_rejected_by_index() {
        let db = setup_db();
        db.insert_doctor(&make_doctor("jane@x.com")).unwrap();

        let err = db.insert_doctor(&make_doctor("jane@x.com")).unwrap_err();
        assert!(err.is_constraint_violation());
    }
}
