/// Initializes the application's database connection pool.
///
/// Single point of entry for database setup: creates the shared pool and,
/// when asked, drops and recreates the tables, the `updated_at` trigger and
/// the indexes for the listed types.
///
/// # Arguments
/// - `tables: [$($table_type:ty),*]`: the `SqlxSchema` types owned by this
///   application, in creation order.
///
/// # Generated Function
/// - `async fn connect(drop_tables: bool, create_tables: bool) -> &'static PgPool`
///
/// # Example
/// ```rust,ignore
/// init_database!(tables: [UserXpState, AchievementRecord, UserNotification]);
///
/// #[tokio::main]
/// async fn main() {
///     let pool = connect(false, true).await;
///     // ... use pool
/// }
/// ```
#[macro_export]
macro_rules! init_database {
    (tables: [$($table_type:ty),* $(,)?]) => {
        static POOL: tokio::sync::OnceCell<sqlx::PgPool> = tokio::sync::OnceCell::const_new();

        async fn connect(drop_tables: bool, create_tables: bool) -> &'static sqlx::PgPool {
            POOL.get_or_init(|| async {
                let database_url = std::env::var("DATABASE_URL")
                    .expect("DATABASE_URL environment variable not set");

                let pool = sqlx::PgPool::connect(&database_url).await
                    .expect("Failed to connect to database");

                if drop_tables {
                    $(
                        let drop_table_sql_str = <$table_type as $crate::SqlxSchema>::drop_table_sql();
                        if !drop_table_sql_str.trim().is_empty() {
                            sqlx::query(&drop_table_sql_str).execute(&pool).await
                                .unwrap_or_else(|e| {
                                    eprintln!("Warning: Failed to drop table for '{}'. Error: {:?}", stringify!($table_type), e);
                                    sqlx::postgres::PgQueryResult::default()
                                });
                        }
                    )*
                }

                if create_tables {
                    let trigger_func_sql = r#"
                    CREATE OR REPLACE FUNCTION set_updated_at_unix_timestamp()
                    RETURNS TRIGGER AS $$
                    BEGIN NEW.updated_at = floor(extract(epoch from now())); RETURN NEW; END;
                    $$ language 'plpgsql';
                    "#;
                    sqlx::query(trigger_func_sql).execute(&pool).await
                        .expect("Failed to create timestamp helper function.");

                    $(
                        let create_table_sql_str = <$table_type as $crate::SqlxSchema>::create_table_sql();
                        if !create_table_sql_str.trim().is_empty() {
                            sqlx::query(&create_table_sql_str).execute(&pool).await
                                .unwrap_or_else(|e| panic!("Failed to create table for '{}'. Error: {:?}", stringify!($table_type), e));
                        }
                    )*

                    $(
                        let trigger_sql_str = <$table_type as $crate::SqlxSchema>::trigger_sql();
                        if !trigger_sql_str.trim().is_empty() {
                            for statement in trigger_sql_str.split(';').filter(|s| !s.trim().is_empty()) {
                                sqlx::query(statement).execute(&pool).await
                                    .unwrap_or_else(|e| panic!("Failed to execute trigger for '{}'. SQL: {}. Error: {:?}", stringify!($table_type), statement, e));
                            }
                        }
                    )*

                    $(
                        for index_sql in <$table_type as $crate::SqlxSchema>::INDEXES_SQL {
                            sqlx::query(*index_sql).execute(&pool).await
                                .unwrap_or_else(|e| panic!("Failed to create index for '{}'. SQL: {}. Error: {:?}", stringify!($table_type), index_sql, e));
                        }
                    )*
                }

                pool
            }).await
        }
    };
}
