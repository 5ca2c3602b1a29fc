pub mod cleanup;
pub mod mock_db;
pub mod postgres_setup_repository;
pub mod setup_repository;
