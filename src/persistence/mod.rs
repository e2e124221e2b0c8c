pub mod files;
pub mod migration;
pub mod parser;
pub mod serializer;
pub mod settings;
pub mod storage;

pub use files::{atomic_write, default_export_file, ensure_data_dir, init_local_data_dir, log_file};
pub use parser::parse_import;
pub use serializer::{build_export, serialize_export, ExportDocument};
pub use settings::Settings;
pub use storage::{JsonFileStorage, Storage};
