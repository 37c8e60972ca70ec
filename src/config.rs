use std::{fs, process::exit};

use log::{error, info};
use serde_derive::Deserialize;

#[derive(Deserialize, Clone)]
#[serde(rename = "index")]
pub struct IndexConfig {
    pub min_query_len: usize,
}

#[derive(Deserialize)]
pub struct Config {
    pub index: IndexConfig,
}

/// Read the config file and return a Config struct.
pub fn get_config(filepath: &str) -> Config {
    // read config file contents to string
    let contents = match fs::read_to_string(filepath.to_string()) {
        Ok(c) => c,
        Err(_) => {
            error!("Could not read config file: {}", filepath);
            exit(1);
        }
    };

    let config: Config = match toml::from_str(&contents) {
        Ok(d) => d,
        Err(_) => {
            error!("Could not parse config file: {}", filepath);
            exit(1);
        }
    };

    // log config
    info!("Using the following values for the index:");
    info!("Minimum query length: {}", config.index.min_query_len);

    return config;
}
