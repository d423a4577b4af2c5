pub mod create_dirs;
pub mod delete_paths;
pub mod find_paths;
pub mod list_dir;
pub mod modify_file;
pub mod read_file;
pub mod replace_file;
mod staged_mutation;
pub mod write_file;
