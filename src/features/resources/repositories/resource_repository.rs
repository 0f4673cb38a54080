use crate::core::database::{Database, SqlValue};
use crate::core::error::{AppError, Result};
use crate::features::resources::models::resource::{format_timestamp, next_timestamp, now};
use crate::features::resources::models::{
    NewResource, Resource, ResourceChanges, ResourceFilters,
};

const SELECT_RESOURCE: &str =
    "SELECT id, name, description, category, status, createdAt, updatedAt FROM resources";

/// Maps validated inputs onto parameterized SQL against the `resources` table.
pub struct ResourceRepository {
    db: Database,
}

impl std::fmt::Debug for ResourceRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRepository")
            .field("db", &self.db)
            .finish()
    }
}

impl ResourceRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a resource and return the stored row
    pub async fn create(&self, input: NewResource) -> Result<Resource> {
        let created_at = format_timestamp(now());

        let result = self
            .db
            .run(
                r#"
                INSERT INTO resources (name, description, category, status, createdAt, updatedAt)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
                vec![
                    input.name.into(),
                    input.description.into(),
                    input.category.into(),
                    input.status.as_str().into(),
                    created_at.clone().into(),
                    created_at.into(),
                ],
            )
            .await?;

        let resource = self.find_by_id(result.last_insert_id).await?.ok_or_else(|| {
            AppError::Internal(format!(
                "Resource {} missing right after insert",
                result.last_insert_id
            ))
        })?;

        tracing::info!(
            "Resource created: id={}, category={}",
            resource.id,
            resource.category
        );

        Ok(resource)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Resource>> {
        let resource: Option<Resource> = self
            .db
            .get(&format!("{} WHERE id = ?", SELECT_RESOURCE), vec![id.into()])
            .await?;
        Ok(resource)
    }

    /// List resources matching `filters`, newest first
    pub async fn find_all(&self, filters: &ResourceFilters) -> Result<Vec<Resource>> {
        let (where_clause, mut params) = filter_clause(filters);
        let mut sql = format!(
            "{}{} ORDER BY createdAt DESC, id DESC",
            SELECT_RESOURCE, where_clause
        );

        if let Some(limit) = filters.limit {
            sql.push_str(" LIMIT ?");
            params.push(limit.into());

            if let Some(offset) = filters.offset.filter(|o| *o > 0) {
                sql.push_str(" OFFSET ?");
                params.push(offset.into());
            }
        }

        let resources: Vec<Resource> = self.db.all(&sql, params).await?;
        Ok(resources)
    }

    /// Apply the supplied fields and refresh `updatedAt`.
    ///
    /// Returns `None` when the id does not exist. With no fields supplied the
    /// current row comes back untouched.
    pub async fn update(&self, id: i64, changes: ResourceChanges) -> Result<Option<Resource>> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        if changes.is_empty() {
            return Ok(Some(existing));
        }

        let mut assignments: Vec<&str> = Vec::new();
        let mut params: Vec<SqlValue> = Vec::new();

        if let Some(name) = changes.name {
            assignments.push("name = ?");
            params.push(name.into());
        }
        if let Some(description) = changes.description {
            assignments.push("description = ?");
            params.push(description.into());
        }
        if let Some(category) = changes.category {
            assignments.push("category = ?");
            params.push(category.into());
        }
        if let Some(status) = changes.status {
            assignments.push("status = ?");
            params.push(status.as_str().into());
        }

        assignments.push("updatedAt = ?");
        params.push(format_timestamp(next_timestamp(existing.updated_at)).into());
        params.push(id.into());

        let sql = format!(
            "UPDATE resources SET {} WHERE id = ?",
            assignments.join(", ")
        );
        let result = self.db.run(&sql, params).await?;

        // Deleted between the read and the write
        if result.changes == 0 {
            return Ok(None);
        }

        tracing::info!("Resource updated: id={}", id);

        self.find_by_id(id).await
    }

    /// Returns whether a row was removed
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = self
            .db
            .run("DELETE FROM resources WHERE id = ?", vec![id.into()])
            .await?;

        let deleted = result.changes > 0;
        if deleted {
            tracing::info!("Resource deleted: id={}", id);
        }
        Ok(deleted)
    }

    /// Number of rows matching the predicates of `filters`; the window is ignored
    pub async fn count(&self, filters: &ResourceFilters) -> Result<i64> {
        let (where_clause, params) = filter_clause(filters);
        let sql = format!("SELECT COUNT(*) AS count FROM resources{}", where_clause);

        let row: Option<(i64,)> = self.db.get(&sql, params).await?;
        Ok(row.map(|r| r.0).unwrap_or(0))
    }
}

/// Conjunctive WHERE clause (with leading space) and its bound values.
fn filter_clause(filters: &ResourceFilters) -> (String, Vec<SqlValue>) {
    let mut conditions: Vec<&str> = Vec::new();
    let mut params: Vec<SqlValue> = Vec::new();

    if let Some(category) = &filters.category {
        conditions.push("category = ?");
        params.push(category.as_str().into());
    }

    if let Some(status) = filters.status {
        conditions.push("status = ?");
        params.push(status.as_str().into());
    }

    if let Some(search) = &filters.search {
        conditions.push(r"(name LIKE ? ESCAPE '\' OR description LIKE ? ESCAPE '\')");
        let pattern = like_pattern(search);
        params.push(pattern.clone().into());
        params.push(pattern.into());
    }

    if conditions.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), params)
    }
}

/// `%search%` with LIKE wildcards in `search` matched literally.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
