//! Constants used throughout the medication core crate.
//!
//! Path names, filenames and configuration defaults live here so the repositories, the
//! configuration loader and the binaries agree on them.

/// Directory name for medication records under the data directory.
pub const MEDICATIONS_DIR_NAME: &str = "medications";

/// Default data directory for the file backend when none is configured.
pub const DEFAULT_MEDICATION_DATA_DIR: &str = "medication_data";

/// Filename of a stored medication record.
pub const MEDICATION_JSON_FILENAME: &str = "medication.json";

/// Default REST bind address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Name of the header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";
