mod postgre;

pub use postgre::{ConnectOptions, DBConnection, DataBase, PoolOption, PoolType, QueryResult};
