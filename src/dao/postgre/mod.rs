pub use self::types::{
    ConnectOptions, DBConnection, DataBase, PoolOption, PoolType, QueryResult,
};

mod rewards;
mod types;
