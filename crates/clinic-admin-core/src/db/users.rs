//! User account database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::User;

const USER_COLUMNS: &str = "id, email, password, role, surname, name, patronymic_name, gender, \
                            date_of_birth, age, residence, phone_number, additional_phone, \
                            profile_picture, profile_completed, created_at";

impl Database {
    /// Insert a new user.
    pub fn insert_user(&self, user: &User) -> DbResult<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO users ({USER_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"
            ),
            params![
                user.id,
                user.email,
                user.password_hash,
                user.role.as_str(),
                user.surname,
                user.name,
                user.patronymic_name,
                user.gender.map(|g| g.as_str()),
                user.date_of_birth,
                user.age,
                user.residence,
                user.phone_number,
                user.additional_phone,
                user.profile_picture,
                user.profile_completed,
                user.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a user by ID.
    pub fn get_user(&self, id: &str) -> DbResult<Option<User>> {
        self.conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"),
                [id],
                UserRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Find a user by email (case-insensitive).
    pub fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        self.conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ? COLLATE NOCASE"),
                [email],
                UserRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Write the profile fields of an existing user.
    ///
    /// Email, password, role and creation time are left untouched.
    pub fn update_user_profile(&self, user: &User) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE users SET
                surname = ?2,
                name = ?3,
                patronymic_name = ?4,
                gender = ?5,
                date_of_birth = ?6,
                age = ?7,
                residence = ?8,
                phone_number = ?9,
                additional_phone = ?10,
                profile_picture = ?11,
                profile_completed = ?12
            WHERE id = ?1
            "#,
            params![
                user.id,
                user.surname,
                user.name,
                user.patronymic_name,
                user.gender.map(|g| g.as_str()),
                user.date_of_birth,
                user.age,
                user.residence,
                user.phone_number,
                user.additional_phone,
                user.profile_picture,
                user.profile_completed,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Count stored users.
    pub fn count_users(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Intermediate row struct for database mapping.
struct UserRow {
    id: String,
    email: String,
    password: String,
    role: String,
    surname: Option<String>,
    name: Option<String>,
    patronymic_name: Option<String>,
    gender: Option<String>,
    date_of_birth: Option<String>,
    age: Option<i64>,
    residence: Option<String>,
    phone_number: Option<String>,
    additional_phone: Option<String>,
    profile_picture: Option<Vec<u8>>,
    profile_completed: bool,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            email: row.get(1)?,
            password: row.get(2)?,
            role: row.get(3)?,
            surname: row.get(4)?,
            name: row.get(5)?,
            patronymic_name: row.get(6)?,
            gender: row.get(7)?,
            date_of_birth: row.get(8)?,
            age: row.get(9)?,
            residence: row.get(10)?,
            phone_number: row.get(11)?,
            additional_phone: row.get(12)?,
            profile_picture: row.get(13)?,
            profile_completed: row.get(14)?,
            created_at: row.get(15)?,
        })
    }
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            email: row.email,
            password_hash: row.password,
            role: row.role.parse()?,
            surname: row.surname,
            name: row.name,
            patronymic_name: row.patronymic_name,
            gender: row.gender.map(|g| g.parse()).transpose()?,
            date_of_birth: row.date_of_birth,
            age: row.age,
            residence: row.residence,
            phone_number: row.phone_number,
            additional_phone: row.additional_phone,
            profile_picture: row.profile_picture,
            profile_completed: row.profile_completed,
            created_at: row.created_at,
        })
    }
}
