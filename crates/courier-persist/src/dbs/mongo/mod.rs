mod client;

pub use client::MongoGateway;
