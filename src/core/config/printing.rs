use crate::core::config::data::{Config, ConfigKey};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        for line in self.describe() {
            println!("  {line}");
        }
    }

    /// One `key: value` line per known setting, `(unset)` for missing ones.
    pub fn describe(&self) -> Vec<String> {
        ConfigKey::ALL
            .iter()
            .map(|key| match self.get(*key) {
                Some(value) => format!("{}: {value}", key.as_str()),
                None => format!("{}: (unset)", key.as_str()),
            })
            .collect()
    }
}
