//! SQLite schema definition.

/// Complete database schema for the clinic admin store.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Users (manager, doctor, patient and admin accounts)
-- ============================================================================

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL,
    password TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'patient'
        CHECK (role IN ('patient', 'doctor', 'admin', 'manager')),
    surname TEXT,
    name TEXT,
    patronymic_name TEXT,
    gender TEXT CHECK (gender IS NULL OR gender IN ('Male', 'Female', 'Other')),
    date_of_birth TEXT,
    age INTEGER,
    residence TEXT,
    phone_number TEXT,
    additional_phone TEXT,
    profile_picture BLOB,
    profile_completed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users(email COLLATE NOCASE);

-- ============================================================================
-- Doctors
-- ============================================================================

CREATE TABLE IF NOT EXISTS doctors (
    id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    middle_name TEXT,
    last_name TEXT NOT NULL,
    specialty TEXT NOT NULL,
    service_type TEXT NOT NULL DEFAULT '[]',     -- JSON array of "Online" / "Offline"
    email TEXT NOT NULL,
    phone TEXT,
    fees_amount REAL NOT NULL CHECK (fees_amount >= 0),
    currency TEXT NOT NULL
        CHECK (currency IN ('USD', 'EUR', 'GBP', 'INR', 'CAD', 'AUD')),
    created_at TEXT NOT NULL
);

-- Second line of defence behind the service-level email check
CREATE UNIQUE INDEX IF NOT EXISTS idx_doctors_email ON doctors(email COLLATE NOCASE);
CREATE INDEX IF NOT EXISTS idx_doctors_created_at ON doctors(created_at);

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    middle_name TEXT NOT NULL DEFAULT '',
    last_name TEXT NOT NULL,
    gender TEXT NOT NULL CHECK (gender IN ('Male', 'Female', 'Other')),
    date_of_birth TEXT NOT NULL,                 -- YYYY-MM-DD, not a timestamp
    telephone TEXT NOT NULL,
    additional_phone TEXT NOT NULL DEFAULT '',
    email TEXT NOT NULL,                         -- deliberately not unique
    comments TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(last_name, first_name);
"#;
