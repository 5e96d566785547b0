//! Generic paginated listing on top of `sqlx::QueryBuilder`.
//!
//! A [`ListSpec`] names the table expression, the projected columns,
//! the columns searched by the free-text term and the sortable columns.
//! Only strings from a `ListSpec` reach the SQL text; every user value is
//! bound as a parameter.

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use verrou_core::result::AppResult;
use verrou_core::types::filter::{Condition, FilterOp, FilterValue};
use verrou_core::types::pagination::DEFAULT_SORT_COLUMN;
use verrou_core::types::{Filter, Page, PageQuery};

use crate::error::db_err;

/// Static description of a paginated listing.
#[derive(Debug, Clone, Copy)]
pub struct ListSpec {
    /// Table expression, including joins (`assets a LEFT JOIN ...`).
    pub from: &'static str,
    /// Projection of the list query.
    pub select: &'static str,
    /// SQL expressions matched with `ILIKE '%term%'`, ORed together.
    pub search: &'static [&'static str],
    /// Accepted `sort_by` values and the SQL expression each sorts on.
    pub sortable: &'static [(&'static str, &'static str)],
}

impl ListSpec {
    /// Resolve a requested sort column against the whitelist.
    ///
    /// Unknown or missing names fall back to `created_at`, then to the
    /// first sortable entry.
    pub fn sort_expression(&self, requested: Option<&str>) -> &'static str {
        let lookup = |name: &str| {
            self.sortable
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, expr)| *expr)
        };
        requested
            .and_then(lookup)
            .or_else(|| lookup(DEFAULT_SORT_COLUMN))
            .or_else(|| self.sortable.first().map(|(_, expr)| *expr))
            .unwrap_or("1")
    }

    /// Build the `SELECT COUNT(*)` query.
    pub fn count_query(&self, filter: &Filter, query: &PageQuery) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM ");
        qb.push(self.from);
        self.push_where(&mut qb, filter, query);
        qb
    }

    /// Build the list query with ordering, `LIMIT` and `OFFSET`.
    pub fn list_query(&self, filter: &Filter, query: &PageQuery) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(self.select);
        qb.push(" FROM ");
        qb.push(self.from);
        self.push_where(&mut qb, filter, query);
        qb.push(" ORDER BY ");
        qb.push(self.sort_expression(query.sort_by.as_deref()));
        qb.push(" ");
        qb.push(query.sort_order.as_sql());
        qb.push(" LIMIT ");
        qb.push_bind(query.limit as i64);
        qb.push(" OFFSET ");
        qb.push_bind(query.offset() as i64);
        qb
    }

    fn push_where(&self, qb: &mut QueryBuilder<'static, Postgres>, filter: &Filter, query: &PageQuery) {
        qb.push(" WHERE TRUE");
        for condition in filter.conditions() {
            qb.push(" AND ");
            push_condition(qb, condition);
        }

        if let Some(term) = query.search_term() {
            if !self.search.is_empty() {
                let pattern = format!("%{term}%");
                qb.push(" AND (");
                for (i, column) in self.search.iter().enumerate() {
                    if i > 0 {
                        qb.push(" OR ");
                    }
                    qb.push(*column);
                    qb.push(" ILIKE ");
                    qb.push_bind(pattern.clone());
                }
                qb.push(")");
            }
        }
    }
}

fn push_condition(qb: &mut QueryBuilder<'static, Postgres>, condition: &Condition) {
    qb.push(condition.column);
    qb.push(condition.op.as_sql());
    match &condition.value {
        FilterValue::Uuid(v) => qb.push_bind(*v),
        FilterValue::String(v) => qb.push_bind(v.clone()),
        FilterValue::Boolean(v) => qb.push_bind(*v),
        FilterValue::Timestamp(v) => qb.push_bind(*v),
        FilterValue::StringList(v) => qb.push_bind(v.clone()),
    };
    if condition.op == FilterOp::In {
        qb.push(")");
    }
}

/// Run the count and list queries of `list` and wrap them in a [`Page`].
pub async fn paginate<T>(
    pool: &PgPool,
    list: &ListSpec,
    filter: &Filter,
    query: &PageQuery,
) -> AppResult<Page<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let query = query.clone().normalized();

    let total: i64 = list
        .count_query(filter, &query)
        .build_query_scalar()
        .fetch_one(pool)
        .await
        .map_err(db_err("Failed to count rows"))?;

    let items: Vec<T> = list
        .list_query(filter, &query)
        .build_query_as()
        .fetch_all(pool)
        .await
        .map_err(db_err("Failed to list rows"))?;

    Ok(Page::new(items, total.max(0) as u64, &query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use verrou_core::types::SortDirection;
    use uuid::Uuid;

    const SPEC: ListSpec = ListSpec {
        from: "posts p",
        select: "p.*",
        search: &["p.title", "p.content"],
        sortable: &[
            ("created_at", "p.created_at"),
            ("title", "p.title"),
            ("views", "p.views"),
        ],
    };

    #[test]
    fn unknown_sort_column_falls_back_to_created_at() {
        assert_eq!(SPEC.sort_expression(Some("title")), "p.title");
        assert_eq!(SPEC.sort_expression(Some("password_hash; DROP")), "p.created_at");
        assert_eq!(SPEC.sort_expression(None), "p.created_at");
    }

    #[test]
    fn list_query_without_search() {
        let qb = SPEC.list_query(&Filter::new(), &PageQuery::default());
        assert_eq!(
            qb.sql(),
            "SELECT p.* FROM posts p WHERE TRUE ORDER BY p.created_at DESC LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn search_is_ored_and_filters_are_anded() {
        let filter = Filter::new()
            .eq("p.category_id", FilterValue::Uuid(Uuid::nil()))
            .eq("p.published", FilterValue::Boolean(true));
        let mut query = PageQuery::default().with_search("rust");
        query.sort_by = Some("views".into());
        query.sort_order = SortDirection::Asc;

        let qb = SPEC.list_query(&filter, &query);
        assert_eq!(
            qb.sql(),
            "SELECT p.* FROM posts p WHERE TRUE AND p.category_id = $1 AND p.published = $2 \
             AND (p.title ILIKE $3 OR p.content ILIKE $4) ORDER BY p.views ASC LIMIT $5 OFFSET $6"
        );
    }

    #[test]
    fn count_query_shares_the_filter() {
        let filter = Filter::new().any_of("a.status::text", vec!["THEFT".into(), "LOST".into()]);
        let query = PageQuery::default().with_search("  ");
        let qb = SPEC.count_query(&filter, &query);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM posts p WHERE TRUE AND a.status::text = ANY($1)"
        );
    }
}
