pub mod forecast;
pub mod ingest;
