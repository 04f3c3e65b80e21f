//! Clinic Admin Core Library
//!
//! Storage, validation and business rules behind the clinic administration
//! panel: doctor records, patient registration and the manager's own profile.
//!
//! # Architecture
//!
//! ```text
//! HTTP handler ──► ClinicCore ──► *Service ──► Validator
//!                      │              │
//!                      │              └──────► Database (SQLite)
//!                      │
//!                      └──► TokenSigner (HS256 session tokens)
//! ```
//!
//! Every service call takes the database lock for the duration of one
//! operation; nothing is cached between calls.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer
//! - [`models`]: Domain types (Doctor, Patient, User)
//! - [`validation`]: Declarative per-field rules
//! - [`service`]: Entity operations and their error outcomes
//! - [`auth`]: Password digests and signed tokens

pub mod auth;
pub mod db;
pub mod models;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use auth::{Identity, TokenSigner};
pub use db::Database;
pub use models::{Currency, Doctor, Gender, Patient, Role, ServiceType, User};
pub use service::{NewManager, ProvisionOutcome, ServiceError, ServiceResult, SignIn};
pub use validation::{FieldError, ValidationErrors};

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};

use service::{AccountService, DoctorService, PatientService, ProfileService};

/// Thread-safe handle over the store and token signer.
///
/// Cloning is cheap; clones share the same connection.
#[derive(Clone)]
pub struct ClinicCore {
    db: Arc<Mutex<Database>>,
    tokens: Arc<TokenSigner>,
}

impl ClinicCore {
    pub fn new(db: Database, tokens: TokenSigner) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            tokens: Arc::new(tokens),
        }
    }

    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P, tokens: TokenSigner) -> ServiceResult<Self> {
        Ok(Self::new(Database::open(path)?, tokens))
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory(tokens: TokenSigner) -> ServiceResult<Self> {
        Ok(Self::new(Database::open_in_memory()?, tokens))
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Resolve a session token to the caller's identity.
    pub fn authenticate(&self, token: &str) -> ServiceResult<Identity> {
        Ok(self.tokens.verify(token)?)
    }

    pub fn manager_sign_in(&self, email: &str, password: &str) -> ServiceResult<SignIn> {
        let db = self.db.lock()?;
        AccountService::new(&db).sign_in(&self.tokens, email, password)
    }

    pub fn provision_manager(&self, details: NewManager) -> ServiceResult<ProvisionOutcome> {
        let db = self.db.lock()?;
        AccountService::new(&db).provision_manager(details)
    }

    // =========================================================================
    // Doctor Operations
    // =========================================================================

    pub fn list_doctors(&self) -> ServiceResult<Vec<Doctor>> {
        let db = self.db.lock()?;
        DoctorService::new(&db).list()
    }

    pub fn get_doctor(&self, id: &str) -> ServiceResult<Doctor> {
        let db = self.db.lock()?;
        DoctorService::new(&db).get(id)
    }

    pub fn create_doctor(&self, fields: &Map<String, Value>) -> ServiceResult<Doctor> {
        let db = self.db.lock()?;
        DoctorService::new(&db).create(fields)
    }

    pub fn update_doctor(&self, id: &str, fields: &Map<String, Value>) -> ServiceResult<Doctor> {
        let db = self.db.lock()?;
        DoctorService::new(&db).update(id, fields)
    }

    pub fn delete_doctor(&self, id: &str) -> ServiceResult<()> {
        let db = self.db.lock()?;
        DoctorService::new(&db).delete(id)
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    pub fn list_patients(&self) -> ServiceResult<Vec<Patient>> {
        let db = self.db.lock()?;
        PatientService::new(&db).list()
    }

    pub fn get_patient(&self, id: &str) -> ServiceResult<Patient> {
        let db = self.db.lock()?;
        PatientService::new(&db).get(id)
    }

    pub fn create_patient(&self, fields: &Map<String, Value>) -> ServiceResult<Patient> {
        let db = self.db.lock()?;
        PatientService::new(&db).create(fields)
    }

    // =========================================================================
    // Profile Operations
    // =========================================================================

    pub fn get_profile(&self, identity: &Identity) -> ServiceResult<User> {
        let db = self.db.lock()?;
        ProfileService::new(&db).get(identity)
    }

    pub fn update_profile(
        &self,
        identity: &Identity,
        fields: &Map<String, Value>,
    ) -> ServiceResult<User> {
        let db = self.db.lock()?;
        ProfileService::new(&db).update(identity, fields)
    }
}
