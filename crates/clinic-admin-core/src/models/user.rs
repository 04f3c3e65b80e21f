//! User account models.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{now_timestamp, Gender, UnknownVariant};

/// Account role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
            Role::Manager => "manager",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            _ => Err(UnknownVariant::new("role", s)),
        }
    }
}

/// A user account. The password digest is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-generated UUID
    #[serde(rename = "_id")]
    pub id: String,
    /// Login email, lowercased; unique among users
    pub email: String,
    /// Salted password digest
    #[serde(skip)]
    pub password_hash: String,
    /// Account role
    pub role: Role,
    /// Family name (managers)
    pub surname: Option<String>,
    /// Given name (managers)
    pub name: Option<String>,
    /// Patronymic
    pub patronymic_name: Option<String>,
    /// Gender (managers)
    pub gender: Option<Gender>,
    /// Date of birth as an RFC 3339 timestamp (managers)
    pub date_of_birth: Option<String>,
    /// Age in years as last submitted; not derived from `date_of_birth`
    pub age: Option<i64>,
    /// City of residence (managers)
    pub residence: Option<String>,
    /// Primary phone number
    pub phone_number: Option<String>,
    /// Secondary phone number
    pub additional_phone: Option<String>,
    /// Raw image bytes, base64 on the wire
    #[serde(default, with = "base64_bytes")]
    pub profile_picture: Option<Vec<u8>>,
    /// Set once the manager profile has been filled in
    pub profile_completed: bool,
    /// Creation timestamp
    pub created_at: String,
}

impl User {
    /// Create a bare account with the given role and password digest.
    pub fn new(email: String, password_hash: String, role: Role) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            password_hash,
            role,
            surname: None,
            name: None,
            patronymic_name: None,
            gender: None,
            date_of_birth: None,
            age: None,
            residence: None,
            phone_number: None,
            additional_phone: None,
            profile_picture: None,
            profile_completed: false,
            created_at: now_timestamp(),
        }
    }

    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }
}

/// Validated profile fields, as accepted by profile update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileFields {
    pub name: String,
    pub surname: String,
    pub patronymic_name: String,
    pub gender: Gender,
    /// RFC 3339 timestamp
    pub date_of_birth: String,
    pub age: i64,
    pub residence: String,
    pub phone_number: Option<String>,
    pub additional_phone: Option<String>,
    /// Replacement image; `None` keeps the stored one
    pub profile_picture: Option<Vec<u8>>,
}

impl User {
    /// Apply a profile update and mark the profile completed.
    pub fn apply_profile(&mut self, fields: ProfileFields) {
        self.name = Some(fields.name);
        self.surname = Some(fields.surname);
        self.patronymic_name = Some(fields.patronymic_name);
        self.gender = Some(fields.gender);
        self.date_of_birth = Some(fields.date_of_birth);
        self.age = Some(fields.age);
        self.residence = Some(fields.residence);
        if fields.phone_number.is_some() {
            self.phone_number = fields.phone_number;
        }
        if fields.additional_phone.is_some() {
            self.additional_phone = fields.additional_phone;
        }
        if fields.profile_picture.is_some() {
            self.profile_picture = fields.profile_picture;
        }
        self.profile_completed = true;
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => s.serialize_some(&STANDARD.encode(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|text| STANDARD.decode(text).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_never_serialized() {
        let user = User::new(
            "m@x.com".into(),
            "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$ZGlnZXN0".into(),
            Role::Manager,
        );
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "manager");
        assert_eq!(json["profileCompleted"], false);
    }

    #[test]
    fn test_profile_picture_round_trips_as_base64() {
        let mut user = User::new("m@x.com".into(), String::new(), Role::Manager);
        user.profile_picture = Some(vec![0xff, 0xd8, 0xff]);

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["profilePicture"], "/9j/");

        let back: User = serde_json::from_value(json).unwrap();
        assert_eq!(back.profile_picture, Some(vec![0xff, 0xd8, 0xff]));
    }

    #[test]
    fn test_apply_profile_keeps_existing_picture() {
        let mut user = User::new("m@x.com".into(), String::new(), Role::Manager);
        user.profile_picture = Some(vec![1, 2, 3]);
        user.phone_number = Some("555".into());

        user.apply_profile(ProfileFields {
            name: "John".into(),
            surname: "Doe".into(),
            patronymic_name: String::new(),
            gender: Gender::Male,
            date_of_birth: "1980-01-01T00:00:00.000000Z".into(),
            age: 30,
            residence: "Kyiv".into(),
            phone_number: None,
            additional_phone: None,
            profile_picture: None,
        });

        assert_eq!(user.profile_picture, Some(vec![1, 2, 3]));
        assert_eq!(user.phone_number.as_deref(), Some("555"));
        assert!(user.profile_completed);
    }
}
