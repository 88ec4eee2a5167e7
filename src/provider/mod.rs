pub use self::{
    database::DatabasePool,
    http::HTTP,
    starknet::{selectors, Starknet},
};

mod database;
mod http;
mod starknet;
