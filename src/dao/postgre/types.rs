use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgQueryResult},
    PgConnection, PgPool, Postgres,
};

pub type PoolType = PgPool;
pub type PoolOption = PgPoolOptions;
pub type ConnectOptions = PgConnectOptions;
pub type DBConnection = PgConnection;
pub type QueryResult = PgQueryResult;
pub type DataBase = Postgres;
