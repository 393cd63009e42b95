mod client;
mod types;

pub(crate) use client::ApiClient;
