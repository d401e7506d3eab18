mod env;
mod postgres_connect;
mod sqlx_postgres;
mod text_enum;

pub use env::PostgresEnv;
pub use sqlx_postgres::{
    FilterCondition, OrderDirection, QueryCriteria, SqlxArg, SqlxCrud, SqlxFilterQuery,
    SqlxSchema,
};
