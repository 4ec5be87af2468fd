use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageConfig {
    pub max_length: usize,
    pub truncate_suffix: String,
    pub month_flair_chance: f64,
    pub british_chance: f64,
    pub pride_chance: f64,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            max_length: 300,
            truncate_suffix: "...".to_string(),
            month_flair_chance: 0.5,
            british_chance: 0.5,
            pride_chance: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub backoff_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { backoff_secs: 300 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub message: MessageConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl BotConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                toml::from_str(&contents)
                    .map_err(|err| format!("failed to parse config: {}", err))?
            } else {
                BotConfig::default()
            }
        } else {
            BotConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(max_length) = env::var("MESSAGE_MAX_LENGTH") {
            if let Ok(value) = max_length.parse::<usize>() {
                self.message.max_length = value;
            }
        }
        if let Ok(suffix) = env::var("MESSAGE_TRUNCATE_SUFFIX") {
            if !suffix.is_empty() {
                self.message.truncate_suffix = suffix;
            }
        }
        if let Ok(chance) = env::var("MESSAGE_MONTH_FLAIR_CHANCE") {
            if let Ok(value) = chance.parse::<f64>() {
                self.message.month_flair_chance = value;
            }
        }
        if let Ok(chance) = env::var("MESSAGE_BRITISH_CHANCE") {
            if let Ok(value) = chance.parse::<f64>() {
                self.message.british_chance = value;
            }
        }
        if let Ok(chance) = env::var("MESSAGE_PRIDE_CHANCE") {
            if let Ok(value) = chance.parse::<f64>() {
                self.message.pride_chance = value;
            }
        }
        if let Ok(backoff) = env::var("SCHEDULER_BACKOFF_SECS") {
            if let Ok(value) = backoff.parse::<u64>() {
                self.scheduler.backoff_secs = value;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("MOONBOT_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/moonbot.toml")))
}
