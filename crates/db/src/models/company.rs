//! Company entity model and DTOs.

use careerkey_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `companies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: DbId,
    pub company_name: String,
    pub created_at: Timestamp,
}

/// DTO for creating a company.
#[derive(Debug)]
pub struct CreateCompany {
    pub company_name: String,
}
