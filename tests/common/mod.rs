//! Shared test fixtures: an in-memory backend that records every call.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use roble_gateway::{AppMetrics, BackendError, Identity, Record, RobleBackend, ServiceConfig};
use serde_json::{Value, json};

pub const VALID_TOKEN: &str = "valid-token";
pub const USER_EMAIL: &str = "ana@uninorte.edu.co";

/// A backend call as seen by the fake
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Verify(String),
    Read {
        table: String,
        filters: Option<Record>,
    },
    Insert {
        table: String,
        records: Vec<Value>,
    },
    Update {
        table: String,
        id_column: String,
        id_value: Value,
        updates: Value,
    },
    Delete {
        table: String,
        id_column: String,
        id_value: Value,
    },
    Login(String),
    Refresh(String),
    Signup(String),
    Logout(String),
}

/// Fake backend. Only [`VALID_TOKEN`] verifies; table calls fail when `fail_tables` is set.
#[derive(Default)]
pub struct FakeBackend {
    pub rows: Vec<Value>,
    pub fail_tables: bool,
    pub identity: Option<Value>,
    calls: Mutex<Vec<Call>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Value>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Verification of [`VALID_TOKEN`] yields `identity` instead of the default user
    pub fn with_identity(identity: Value) -> Self {
        Self {
            identity: Some(identity),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_tables: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than token verification
    pub fn table_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::Verify(_)))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn table_result<T>(&self, value: T) -> Result<T, BackendError> {
        if self.fail_tables {
            Err(BackendError::Status(503))
        } else {
            Ok(value)
        }
    }
}

#[async_trait]
impl RobleBackend for FakeBackend {
    async fn verify_token(&self, token: &str) -> Result<Identity, BackendError> {
        self.record(Call::Verify(token.to_string()));
        if token != VALID_TOKEN {
            return Err(BackendError::Status(401));
        }
        let identity = self
            .identity
            .clone()
            .unwrap_or_else(|| json!({ "email": USER_EMAIL, "role": "student" }));
        serde_json::from_value(identity).map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn read_rows(
        &self,
        _token: &str,
        table: &str,
        filters: Option<&Record>,
    ) -> Result<Vec<Value>, BackendError> {
        self.record(Call::Read {
            table: table.to_string(),
            filters: filters.cloned(),
        });
        self.table_result(self.rows.clone())
    }

    async fn insert_rows(
        &self,
        _token: &str,
        table: &str,
        records: &[Value],
    ) -> Result<Value, BackendError> {
        self.record(Call::Insert {
            table: table.to_string(),
            records: records.to_vec(),
        });
        self.table_result(json!({ "inserted": records, "skipped": [] }))
    }

    async fn update_row(
        &self,
        _token: &str,
        table: &str,
        id_column: &str,
        id_value: &Value,
        updates: &Value,
    ) -> Result<Value, BackendError> {
        self.record(Call::Update {
            table: table.to_string(),
            id_column: id_column.to_string(),
            id_value: id_value.clone(),
            updates: updates.clone(),
        });
        self.table_result(json!({ "updated": 1 }))
    }

    async fn delete_row(
        &self,
        _token: &str,
        table: &str,
        id_column: &str,
        id_value: &Value,
    ) -> Result<Value, BackendError> {
        self.record(Call::Delete {
            table: table.to_string(),
            id_column: id_column.to_string(),
            id_value: id_value.clone(),
        });
        self.table_result(json!({ "deleted": 1 }))
    }

    async fn login(&self, email: &str, password: &str) -> Result<Value, BackendError> {
        self.record(Call::Login(email.to_string()));
        if password == "secret" {
            Ok(json!({ "accessToken": VALID_TOKEN, "refreshToken": "refresh-1" }))
        } else {
            Err(BackendError::Status(401))
        }
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<Value, BackendError> {
        self.record(Call::Refresh(refresh_token.to_string()));
        if refresh_token == "refresh-1" {
            Ok(json!({ "accessToken": "valid-token-2" }))
        } else {
            Err(BackendError::Status(401))
        }
    }

    /// [`USER_EMAIL`] is already registered
    async fn signup(&self, email: &str, _password: &str, _name: &str) -> Result<Value, BackendError> {
        self.record(Call::Signup(email.to_string()));
        if self.fail_tables {
            Err(BackendError::Status(503))
        } else if email == USER_EMAIL {
            Err(BackendError::Status(409))
        } else {
            Ok(Value::Null)
        }
    }

    async fn logout(&self, token: &str) -> Result<Value, BackendError> {
        self.record(Call::Logout(token.to_string()));
        self.table_result(Value::Null)
    }
}

pub fn test_config() -> ServiceConfig {
    ServiceConfig {
        roble_base_host: "http://roble.invalid".to_string(),
        roble_contract: "contract_test".to_string(),
        service_name: "test-service".to_string(),
        ..ServiceConfig::default()
    }
}

pub fn metrics() -> AppMetrics {
    AppMetrics::new().expect("Failed to create metrics")
}

/// Shared handle for assertions plus the trait object the app expects
pub fn backend(fake: FakeBackend) -> (Arc<FakeBackend>, Arc<dyn RobleBackend>) {
    let fake = Arc::new(fake);
    let dynamic: Arc<dyn RobleBackend> = fake.clone();
    (fake, dynamic)
}

pub fn bearer() -> (&'static str, String) {
    ("Authorization", format!("Bearer {VALID_TOKEN}"))
}
