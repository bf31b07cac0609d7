mod dir_scanner;
mod file_remover;
mod path_validator;
mod prompt;

pub use dir_scanner::{list_files, list_files_matching};
pub use file_remover::{RemovalReport, remove_file};
pub use path_validator::{display_name, has_extension, validate_directory_exists};
pub use prompt::{
    AFFIRMATIVE_ANSWER, ConsolePrompt, InputMode, UserPrompt, input_mode, is_affirmative,
};
