use sqlx::postgres::PgArguments;
use sqlx::{Arguments, Error as SqlxError, Executor, FromRow, Postgres};

/// Schema of a table-backed object for PostgreSQL: identity, column layout,
/// and the SQL statements derived from them.
///
/// Implementors supply the table constants, `create_table_sql` (the one
/// statement that cannot be derived from the column list alone) and the
/// row conversion; every query string is assembled by the provided methods.
pub trait SqlxSchema: Send + Sync + Unpin + Clone + std::fmt::Debug {
    /// The type of the primary key for this database object.
    type Id: Send + Sync + Clone + for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres>;

    /// The intermediate type that implements FromRow, used when fetching.
    type Row: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin;

    const TABLE_NAME: &'static str;
    const ID_COLUMN_NAME: &'static str;
    const COLUMNS: &'static [&'static str];
    const INDEXES_SQL: &'static [&'static str] = &[];

    /// Retrieves the value of the primary key for an instance of the object.
    fn get_id_value(&self) -> Self::Id;

    /// Converts the intermediate Row type to the Self type.
    fn from_row(row: Self::Row) -> Self;

    /// Full CREATE TABLE statement, including constraints.
    fn create_table_sql() -> String;

    fn drop_table_sql() -> String {
        format!("DROP TABLE IF EXISTS \"{}\" CASCADE;", Self::TABLE_NAME)
    }

    /// Statements wiring the shared `set_updated_at_unix_timestamp()` trigger
    /// function to this table. Tables without an `updated_at` column override
    /// this with an empty string.
    fn trigger_sql() -> String {
        format!(
            "DROP TRIGGER IF EXISTS \"set_updated_at_on_{table}\" ON \"{table}\"; \
             CREATE TRIGGER \"set_updated_at_on_{table}\" BEFORE UPDATE ON \"{table}\" \
             FOR EACH ROW EXECUTE FUNCTION set_updated_at_unix_timestamp();",
            table = Self::TABLE_NAME
        )
    }

    /// All columns, quoted and comma-separated.
    fn column_list() -> String {
        Self::COLUMNS
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn select_all_sql() -> String {
        format!("SELECT {} FROM \"{}\"", Self::column_list(), Self::TABLE_NAME)
    }

    fn select_by_id_sql() -> String {
        format!("{} WHERE \"{}\" = $1", Self::select_all_sql(), Self::ID_COLUMN_NAME)
    }

    fn insert_sql() -> String {
        let placeholders = (1..=Self::COLUMNS.len())
            .map(|i| format!("${i}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO \"{}\" ({}) VALUES ({}) RETURNING {}",
            Self::TABLE_NAME,
            Self::column_list(),
            placeholders,
            Self::column_list(),
        )
    }

    fn update_by_id_sql() -> String {
        let assignments = Self::COLUMNS
            .iter()
            .filter(|c| **c != Self::ID_COLUMN_NAME)
            .enumerate()
            .map(|(i, c)| format!("\"{}\" = ${}", c, i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        // non-id columns take slots 1..len-1, the id goes last
        format!(
            "UPDATE \"{}\" SET {} WHERE \"{}\" = ${} RETURNING {}",
            Self::TABLE_NAME,
            assignments,
            Self::ID_COLUMN_NAME,
            Self::COLUMNS.len(),
            Self::column_list(),
        )
    }

    fn delete_by_id_sql() -> String {
        format!(
            "DELETE FROM \"{}\" WHERE \"{}\" = $1",
            Self::TABLE_NAME,
            Self::ID_COLUMN_NAME
        )
    }
}

/// CRUD operations for PostgreSQL-backed objects.
#[async_trait::async_trait]
pub trait SqlxCrud: SqlxSchema + Sized {
    /// Binds the struct fields to an insert query, in `COLUMNS` order.
    fn bind_insert<'q>(
        &self,
        query: sqlx::query::QueryAs<'q, Postgres, Self::Row, PgArguments>,
    ) -> sqlx::query::QueryAs<'q, Postgres, Self::Row, PgArguments>;

    /// Binds the struct fields to an update query: non-id columns in
    /// `COLUMNS` order, then the id for the WHERE clause.
    fn bind_update<'q>(
        &self,
        query: sqlx::query::QueryAs<'q, Postgres, Self::Row, PgArguments>,
    ) -> sqlx::query::QueryAs<'q, Postgres, Self::Row, PgArguments>;

    /// Creates a new record in the database.
    async fn create<'e, E>(self, executor: E) -> Result<Self, SqlxError>
    where
        E: Executor<'e, Database = Postgres> + Send,
    {
        let sql = Self::insert_sql();
        let query = self.bind_insert(sqlx::query_as(&sql));
        query.fetch_one(executor).await.map(Self::from_row)
    }

    /// Finds a record by its primary key.
    async fn find_by_id<'e, E>(id: Self::Id, executor: E) -> Result<Option<Self>, SqlxError>
    where
        E: Executor<'e, Database = Postgres> + Send,
    {
        let sql = Self::select_by_id_sql();
        sqlx::query_as::<_, Self::Row>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map(|opt_row| opt_row.map(Self::from_row))
    }

    /// Updates an existing record, identified by its primary key.
    async fn update<'e, E>(self, executor: E) -> Result<Self, SqlxError>
    where
        E: Executor<'e, Database = Postgres> + Send,
    {
        let sql = Self::update_by_id_sql();
        let query = self.bind_update(sqlx::query_as(&sql));
        query.fetch_one(executor).await.map(Self::from_row)
    }

    /// Deletes a record by its primary key; returns the affected row count.
    async fn delete<'e, E>(self, executor: E) -> Result<u64, SqlxError>
    where
        E: Executor<'e, Database = Postgres> + Send,
    {
        let sql = Self::delete_by_id_sql();
        sqlx::query(&sql)
            .bind(self.get_id_value())
            .execute(executor)
            .await
            .map(|result| result.rows_affected())
    }

    /// Retrieves all records from the table.
    async fn find_all<'e, E>(executor: E) -> Result<Vec<Self>, SqlxError>
    where
        E: Executor<'e, Database = Postgres> + Send,
    {
        let sql = Self::select_all_sql();
        let rows = sqlx::query_as::<_, Self::Row>(&sql)
            .fetch_all(executor)
            .await?;
        Ok(rows.into_iter().map(Self::from_row).collect())
    }
}

/// Specifies the direction for ordering query results.
#[derive(Debug, Clone, Copy)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// A trait to allow boxing of values that can be encoded as sqlx arguments,
/// so `QueryCriteria` can hold argument values of different types.
pub trait SqlxArg: Send + Sync {
    fn add_to_args(&self, args: &mut PgArguments) -> Result<(), SqlxError>;
}

impl<T> SqlxArg for T
where
    T: for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + Send + Sync + Clone + 'static,
{
    fn add_to_args(&self, args: &mut PgArguments) -> Result<(), SqlxError> {
        args.add(self.clone()).map_err(SqlxError::Encode)
    }
}

/// A single filter condition for a database query.
pub struct FilterCondition {
    pub column: &'static str,
    pub operator: &'static str,
    /// Holds the value for the condition's placeholder, if any.
    pub value: Option<Box<dyn SqlxArg>>,
}

/// The complete criteria for a filtered query: conditions, ordering and
/// pagination. `build_select`/`build_delete` render the final SQL and the
/// bound argument list together, keeping placeholder numbering consistent.
#[derive(Default)]
pub struct QueryCriteria {
    pub conditions: Vec<FilterCondition>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub order_by: Vec<(&'static str, OrderDirection)>,
}

impl QueryCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter condition that may or may not carry a value
    /// (e.g. `IS NOT NULL` carries none).
    pub fn add_filter<V>(
        mut self,
        column: &'static str,
        operator: &'static str,
        value: Option<V>,
    ) -> Self
    where
        V: for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + Send + Sync + Clone + 'static,
    {
        self.conditions.push(FilterCondition {
            column,
            operator,
            value: value.map(|v| Box::new(v) as Box<dyn SqlxArg>),
        });
        self
    }

    /// A convenience method for `add_filter` that requires a value.
    pub fn add_valued_filter<V>(
        self,
        column: &'static str,
        operator: &'static str,
        value: V,
    ) -> Self
    where
        V: for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + Send + Sync + Clone + 'static,
    {
        self.add_filter(column, operator, Some(value))
    }

    pub fn limit(mut self, limit_val: i64) -> Self {
        self.limit = Some(limit_val);
        self
    }

    pub fn offset(mut self, offset_val: i64) -> Self {
        self.offset = Some(offset_val);
        self
    }

    pub fn order_by(mut self, column: &'static str, direction: OrderDirection) -> Self {
        self.order_by.push((column, direction));
        self
    }

    fn render_where(&self, args: &mut PgArguments, slot: &mut usize) -> Result<String, SqlxError> {
        let mut clauses = Vec::new();
        for condition in &self.conditions {
            match &condition.value {
                Some(value) => {
                    value.add_to_args(args)?;
                    *slot += 1;
                    clauses.push(format!(
                        "\"{}\" {} ${}",
                        condition.column, condition.operator, slot
                    ));
                }
                None => clauses.push(format!("\"{}\" {}", condition.column, condition.operator)),
            }
        }
        if clauses.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!(" WHERE {}", clauses.join(" AND ")))
        }
    }

    pub fn build_select(
        &self,
        table: &str,
        columns: &str,
    ) -> Result<(String, PgArguments), SqlxError> {
        let mut args = PgArguments::default();
        let mut slot = 0usize;
        let mut sql = format!("SELECT {} FROM \"{}\"", columns, table);
        sql.push_str(&self.render_where(&mut args, &mut slot)?);
        if !self.order_by.is_empty() {
            let order = self
                .order_by
                .iter()
                .map(|(column, direction)| format!("\"{}\" {}", column, direction.as_sql()))
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(&format!(" ORDER BY {}", order));
        }
        if let Some(limit) = self.limit {
            args.add(limit).map_err(SqlxError::Encode)?;
            slot += 1;
            sql.push_str(&format!(" LIMIT ${}", slot));
        }
        if let Some(offset) = self.offset {
            args.add(offset).map_err(SqlxError::Encode)?;
            slot += 1;
            sql.push_str(&format!(" OFFSET ${}", slot));
        }
        Ok((sql, args))
    }

    pub fn build_delete(&self, table: &str) -> Result<(String, PgArguments), SqlxError> {
        let mut args = PgArguments::default();
        let mut slot = 0usize;
        let mut sql = format!("DELETE FROM \"{}\"", table);
        sql.push_str(&self.render_where(&mut args, &mut slot)?);
        Ok((sql, args))
    }
}

/// Trait for finding records based on dynamic filter criteria.
#[async_trait::async_trait]
pub trait SqlxFilterQuery: SqlxSchema + Sized {
    async fn find_by_criteria<'e, E>(
        criteria: QueryCriteria,
        executor: E,
    ) -> Result<Vec<Self>, SqlxError>
    where
        E: Executor<'e, Database = Postgres> + Send,
    {
        let (sql, args) = criteria.build_select(Self::TABLE_NAME, &Self::column_list())?;
        let rows = sqlx::query_as_with::<Postgres, Self::Row, PgArguments>(&sql, args)
            .fetch_all(executor)
            .await?;
        Ok(rows.into_iter().map(Self::from_row).collect())
    }

    /// Finds a single optional record based on the provided criteria.
    async fn find_one_by_criteria<'e, E>(
        mut criteria: QueryCriteria,
        executor: E,
    ) -> Result<Option<Self>, SqlxError>
    where
        E: Executor<'e, Database = Postgres> + Send,
    {
        if criteria.limit.is_none() {
            criteria = criteria.limit(1);
        }
        let mut results = Self::find_by_criteria(criteria, executor).await?;
        Ok(results.pop())
    }

    async fn delete_by_criteria<'e, E>(
        criteria: QueryCriteria,
        executor: E,
    ) -> Result<u64, SqlxError>
    where
        E: Executor<'e, Database = Postgres> + Send,
    {
        let (sql, args) = criteria.build_delete(Self::TABLE_NAME)?;
        let result = sqlx::query_with(&sql, args).execute(executor).await?;
        Ok(result.rows_affected())
    }
}
