use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use tracing::warn;

use crate::{error::Error, helpers::split_currencies, provider::DatabasePool};

pub const COMMON_SECTION: &str = "Common";
pub const DEFAULT_SECTION: &str = "DEFAULT";

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub database: DatabasePool,
}

impl State {
    pub fn new(config: Config, database: DatabasePool) -> State {
        Self { config, database }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_host: String,
    pub db_port: u16,
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
    pub currencies: Vec<String>,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_map(
        params: &HashMap<String, String>,
        data_dir: PathBuf,
    ) -> Result<Config, Error> {
        let get = |key: &str| {
            params
                .get(key)
                .cloned()
                .ok_or_else(|| Error::FieldNotExist(key.to_owned()))
        };

        let db_port = match get("DB_PORT")?.parse::<u16>() {
            Ok(port) => port,
            Err(e) => {
                warn!("DB_PORT in config is not an integer value! ({})", e);
                0
            },
        };

        Ok(Config {
            db_host: get("DB_HOST")?,
            db_port,
            db_name: get("DB_NAME")?,
            db_user: get("DB_USER")?,
            db_password: get("DB_PWD")?,
            currencies: split_currencies(&get("CURRENCIES")?),
            data_dir,
        })
    }
}

pub fn get_configuration(path: &Path, data_dir: PathBuf) -> Result<Config, Error> {
    if !path.is_file() {
        return Err(Error::ConfigurationError(format!(
            "Could not find {}",
            path.display()
        )));
    }

    let config_string = fs::read_to_string(path)?;
    let params = parse_config_string(&config_string)?;

    Config::from_map(&params, data_dir)
}

/// Parses sectioned `key = value` text and returns the `Common` section,
/// with `DEFAULT` entries as fallbacks. Keys are upper-cased.
pub fn parse_config_string(
    config: &str,
) -> Result<HashMap<String, String>, Error> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for (index, line) in config.lines().enumerate() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            let name = name.trim().to_owned();
            if sections.contains_key(&name) {
                return Err(Error::DuplicateField(format!("section [{}]", name)));
            }
            sections.insert(name.to_owned(), HashMap::new());
            current = Some(name);
            continue;
        }

        let element = line.find(['=', ':']).ok_or_else(|| {
            Error::ConfigurationError(format!(
                "line {} is not a key/value pair",
                index + 1
            ))
        })?;
        let (key, value) = line.split_at(element);
        let key = key.trim().to_uppercase();
        let value = value[1..].trim().to_owned();

        let section = match &current {
            Some(name) => sections.entry(name.to_owned()).or_default(),
            None => {
                return Err(Error::ConfigurationError(format!(
                    "line {} is outside of a section",
                    index + 1
                )));
            },
        };

        if section.contains_key(&key) {
            return Err(Error::DuplicateField(key));
        }
        section.insert(key, value);
    }

    let mut common = sections.remove(COMMON_SECTION).ok_or_else(|| {
        Error::ConfigurationError(String::from(
            "Config file has wrong format! Please copy the default config and start over!",
        ))
    })?;

    if let Some(defaults) = sections.remove(DEFAULT_SECTION) {
        for (key, value) in defaults {
            common.entry(key).or_insert(value);
        }
    }

    Ok(common)
}
