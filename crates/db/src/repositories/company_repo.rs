//! Repository for the `companies` table.

use careerkey_core::types::DbId;
use sqlx::PgPool;

use crate::models::company::{Company, CreateCompany};

const COLUMNS: &str = "id, company_name, created_at";

/// Companies are reference data; the service only reads them.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a company. Used for seeding and tests.
    pub async fn create(pool: &PgPool, input: &CreateCompany) -> Result<Company, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies (company_name) VALUES ($1) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(&input.company_name)
            .fetch_one(pool)
            .await
    }

    /// List all companies ordered by name. Ties are broken by id so the order
    /// is stable across calls.
    pub async fn list(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies ORDER BY company_name, id");
        sqlx::query_as::<_, Company>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
