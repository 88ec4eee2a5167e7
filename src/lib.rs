#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

pub mod configuration;
pub mod controller;
pub mod dao;
pub mod error;
pub mod handler;
pub mod helpers;
pub mod loan_entity;
pub mod model;
pub mod order_book;
pub mod provider;
pub mod server;
pub mod telegram;
pub mod types;
pub mod vesu;
