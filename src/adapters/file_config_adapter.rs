//! INI file configuration adapter.
//!
//! Section and key lookups are case-insensitive. Values are trimmed before
//! typed parsing; a value that fails to parse falls back to the caller's
//! default just like a missing key.

use std::io;
use std::path::Path;
use std::str::FromStr;

use configparser::ini::Ini;

use crate::ports::config_port::ConfigPort;

#[derive(Debug)]
pub struct FileConfigAdapter {
    ini: Ini,
}

/// Boolean spelling accepted in config files.
struct Switch(bool);

impl FromStr for Switch {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Switch(true)),
            "false" | "no" | "off" | "0" => Ok(Switch(false)),
            _ => Err(()),
        }
    }
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_string(&content)
            .map_err(|reason| io::Error::new(io::ErrorKind::InvalidData, reason))
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut ini = Ini::new();
        ini.read(content.to_owned())?;
        Ok(Self { ini })
    }

    fn raw(&self, section: &str, key: &str) -> Option<String> {
        self.ini.get(section, key)
    }

    fn parsed<T: FromStr>(&self, section: &str, key: &str) -> Option<T> {
        self.raw(section, key)?.trim().parse().ok()
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.raw(section, key)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.parsed(section, key).unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.parsed::<Switch>(section, key).map_or(default, |Switch(on)| on)
    }
}
