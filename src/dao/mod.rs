pub mod postgre;

pub use postgre::{
    get_path, read_migration, DataBase, PoolOption, PoolType, QueryResult,
};
