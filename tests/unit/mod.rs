mod analytics_api;
mod common;
mod queries_api;
