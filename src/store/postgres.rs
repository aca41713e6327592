use anyhow::{Context, Result};
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool, Postgres, QueryBuilder, Row};

use crate::model::{with_id, ArrayField, Document, Identifier, ID_FIELD};
use crate::store::traits::{DocumentFilter, DocumentStore, DocumentUpdate, FieldTypeMismatch};

/// Document store backed by a single PostgreSQL table of JSONB bodies,
/// keyed by `(collection, id)`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Create the documents table if it does not exist yet
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create documents table")?;

        Ok(())
    }

    async fn field_kind(
        &self,
        collection: &str,
        id: &Identifier,
        field: &ArrayField,
    ) -> Result<Option<String>> {
        let row = sqlx::query(
            "SELECT jsonb_typeof(body -> $3) AS kind FROM documents \
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id.to_hex())
        .bind(field.as_str())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to inspect array field")?;

        Ok(row.and_then(|row| row.get::<Option<String>, _>("kind")))
    }
}

/// `jsonb_array_elements` over the field, treating a missing or non-array value as empty
fn push_array_elements(qb: &mut QueryBuilder<'_, Postgres>, field: &ArrayField) {
    qb.push("jsonb_array_elements(CASE WHEN jsonb_typeof(body -> ");
    qb.push_bind(field.to_string());
    qb.push(") = 'array' THEN body -> ");
    qb.push_bind(field.to_string());
    qb.push(" ELSE '[]'::jsonb END) WITH ORDINALITY AS e(value, idx)");
}

fn push_assignment(
    qb: &mut QueryBuilder<'_, Postgres>,
    filter: &DocumentFilter,
    update: &DocumentUpdate,
) -> Result<()> {
    match update {
        DocumentUpdate::Set(patch) => {
            let mut patch = patch.clone();
            patch.remove(ID_FIELD);
            qb.push("body = body || ");
            qb.push_bind(Json(Value::Object(patch)));
        }
        DocumentUpdate::Push { field, element } => {
            qb.push("body = jsonb_set(body, ARRAY[");
            qb.push_bind(field.to_string());
            qb.push("], COALESCE(body -> ");
            qb.push_bind(field.to_string());
            qb.push(", '[]'::jsonb) || jsonb_build_array(");
            qb.push_bind(Json(element.clone()));
            qb.push("::jsonb))");
        }
        DocumentUpdate::SetMatchedElement { field, element } => {
            let Some(matched) = &filter.element else {
                anyhow::bail!("Positional element update requires an element match in the filter");
            };
            qb.push("body = jsonb_set(body, ARRAY[");
            qb.push_bind(field.to_string());
            qb.push(", (SELECT (e.idx - 1)::text FROM ");
            push_array_elements(qb, field);
            qb.push(" WHERE e.value ->> '_id' = ");
            qb.push_bind(matched.element_id.to_hex());
            qb.push(" ORDER BY e.idx LIMIT 1)], ");
            qb.push_bind(Json(element.clone()));
            qb.push("::jsonb)");
        }
        DocumentUpdate::Pull { field, element_id } => {
            qb.push("body = jsonb_set(body, ARRAY[");
            qb.push_bind(field.to_string());
            qb.push("], COALESCE((SELECT jsonb_agg(e.value ORDER BY e.idx) FROM ");
            push_array_elements(qb, field);
            qb.push(" WHERE e.value ->> '_id' IS DISTINCT FROM ");
            qb.push_bind(element_id.to_hex());
            qb.push("), '[]'::jsonb))");
        }
    }
    Ok(())
}

fn push_filter(
    qb: &mut QueryBuilder<'_, Postgres>,
    collection: &str,
    filter: &DocumentFilter,
    update: &DocumentUpdate,
) {
    qb.push(" WHERE collection = ");
    qb.push_bind(collection.to_string());
    qb.push(" AND id = ");
    qb.push_bind(filter.id.to_hex());

    if let Some(element) = &filter.element {
        qb.push(" AND EXISTS (SELECT 1 FROM ");
        push_array_elements(qb, &element.field);
        qb.push(" WHERE e.value ->> '_id' = ");
        qb.push_bind(element.element_id.to_hex());
        qb.push(")");
    }

    // Only push onto a missing field or an existing array
    if let DocumentUpdate::Push { field, .. } = update {
        qb.push(" AND (body -> ");
        qb.push_bind(field.to_string());
        qb.push(" IS NULL OR jsonb_typeof(body -> ");
        qb.push_bind(field.to_string());
        qb.push(") = 'array')");
    }
}

fn decode_body(row: &sqlx::postgres::PgRow) -> Result<Document> {
    let Json(body): Json<Document> = row
        .try_get("body")
        .context("Failed to decode document body")?;
    Ok(body)
}

#[async_trait::async_trait]
impl DocumentStore for PostgresStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Failed to reach PostgreSQL")?;
        Ok(())
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<Identifier> {
        let id = Identifier::generate();
        let document = with_id(document, &id);

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(id.to_hex())
            .bind(Json(&document))
            .execute(&self.pool)
            .await
            .context("Failed to insert document")?;

        Ok(id)
    }

    async fn find(&self, collection: &str) -> Result<Vec<Document>> {
        let rows = sqlx::query(
            "SELECT body FROM documents WHERE collection = $1 ORDER BY created_at, id",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list documents")?;

        rows.iter().map(decode_body).collect()
    }

    async fn find_one(&self, collection: &str, id: &Identifier) -> Result<Option<Document>> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.to_hex())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch document")?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(decode_body(&row)?))
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &DocumentFilter,
        update: &DocumentUpdate,
    ) -> Result<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE documents SET ");
        push_assignment(&mut qb, filter, update)?;
        push_filter(&mut qb, collection, filter, update);

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .context("Failed to update document")?;

        let matched = result.rows_affected();
        if matched == 0 {
            if let DocumentUpdate::Push { field, .. } = update {
                // Distinguish a missing parent from a push onto a non-array field
                if let Some(kind) = self.field_kind(collection, &filter.id, field).await? {
                    if kind != "array" {
                        return Err(FieldTypeMismatch {
                            field: field.to_string(),
                        }
                        .into());
                    }
                }
            }
        }

        Ok(matched)
    }

    async fn delete_one(&self, collection: &str, id: &Identifier) -> Result<u64> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.to_hex())
            .execute(&self.pool)
            .await
            .context("Failed to delete document")?;

        Ok(result.rows_affected())
    }
}
