//! SQLite adapters: connection pooling, migrations, repositories.

pub mod connection;
pub mod migrations;
pub mod question_repository;
pub mod quiz_repository;
pub mod session_repository;

pub use connection::{create_pool, create_test_pool, verify_connection, ConnectionError, PoolConfig};
pub use migrations::{all_migrations, initial_schema_migration, Migration, MigrationError, Migrator};
pub use question_repository::SqliteGeneratedQuestionRepository;
pub use quiz_repository::SqliteQuizRepository;
pub use session_repository::SqliteSessionRepository;
