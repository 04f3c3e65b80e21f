//! Patient database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::Patient;

impl Database {
    /// Insert a new patient.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                id, first_name, middle_name, last_name, gender, date_of_birth,
                telephone, additional_phone, email, comments, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                patient.id,
                patient.first_name,
                patient.middle_name,
                patient.last_name,
                patient.gender.as_str(),
                patient.date_of_birth,
                patient.telephone,
                patient.additional_phone,
                patient.email,
                patient.comments,
                patient.created_at,
                patient.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                r#"
                SELECT id, first_name, middle_name, last_name, gender, date_of_birth,
                       telephone, additional_phone, email, comments, created_at, updated_at
                FROM patients
                WHERE id = ?
                "#,
                [id],
                PatientRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all patients in storage order.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, first_name, middle_name, last_name, gender, date_of_birth,
                   telephone, additional_phone, email, comments, created_at, updated_at
            FROM patients
            "#,
        )?;

        let rows = stmt.query_map([], PatientRow::from_row)?;

        let mut patients = Vec::new();
        for row in rows {
            patients.push(row?.try_into()?);
        }
        Ok(patients)
    }
}

/// Intermediate row struct for database mapping.
struct PatientRow {
    id: String,
    first_name: String,
    middle_name: String,
    last_name: String,
    gender: String,
    date_of_birth: String,
    telephone: String,
    additional_phone: String,
    email: String,
    comments: String,
    created_at: String,
    updated_at: String,
}

impl PatientRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            first_name: row.get(1)?,
            middle_name: row.get(2)?,
            last_name: row.get(3)?,
            gender: row.get(4)?,
            date_of_birth: row.get(5)?,
            telephone: row.get(6)?,
            additional_phone: row.get(7)?,
            email: row.get(8)?,
            comments: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }
}

impl TryFrom<PatientRow> for Patient {
    type Error = DbError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        Ok(Patient {
            id: row.id,
            first_name: row.first_name,
            middle_name: row.middle_name,
            last_name: row.last_name,
            gender: row.gender.parse()?,
            date_of_birth: row.date_of_birth,
            telephone: row.telephone,
            additional_phone: row.additional_phone,
            email: row.email,
            comments: row.comments,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, PatientFields};

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_patient(first_name: &str, email: &str) -> Patient {
        Patient::new(PatientFields {
            first_name: first_name.into(),
            middle_name: String::new(),
            last_name: "Lee".into(),
            gender: Gender::Other,
            date_of_birth: "1990-04-12".into(),
            telephone: "555-0100".into(),
            additional_phone: String::new(),
            email: email.into(),
            comments: "Allergic to penicillin".into(),
        })
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();
        let patient = make_patient("Ann", "ann@example.com");
        db.insert_patient(&patient).unwrap();

        let retrieved = db.get_patient(&patient.id).unwrap().unwrap();
        assert_eq!(retrieved, patient);
    }

    #[test]
    fn test_list_patients() {
        let db = setup_db();
        db.insert_patient(&make_patient("Ann", "ann@example.com")).unwrap();
        db.insert_patient(&make_patient("Bob", "bob@example.com")).unwrap();

        let patients = db.list_patients().unwrap();
        assert_eq!(patients.len(), 2);
        assert!(patients.iter().any(|p| p.first_name == "Ann"));
        assert!(patients.iter().any(|p| p.first_name == "Bob"));
    }

    #[test]
    fn test_shared_email_allowed() {
        let db = setup_db();
        db.insert_patient(&make_patient("Ann", "family@example.com")).unwrap();
        db.insert_patient(&make_patient("Bob", "family@example.com")).unwrap();
        assert_eq!(db.list_patients().unwrap().len(), 2);
    }
}
