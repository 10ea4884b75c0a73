//! Built-in media

mod dotenv;
mod json;
mod properties;
mod structured;
mod toml;
mod yaml;

pub use self::dotenv::DotenvMedia;
pub use self::json::JsonMedia;
pub use self::properties::PropertiesMedia;
pub use self::toml::TomlMedia;
pub use self::yaml::YamlMedia;

pub use self::properties::MEDIA_TYPE as PROPERTIES_MEDIA_TYPE;
