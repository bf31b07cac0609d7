pub mod load;
pub mod types;

pub use types::{
    Config, ConverterSettings, DEFAULT_SOURCE_EXTENSION, DEFAULT_TARGET_EXTENSION, SETTINGS_FILE,
};
