use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const RC_FILE_NAME: &str = ".notasrc";

pub const MIN_FONT_SIZE: u16 = 8;
pub const MAX_FONT_SIZE: u16 = 72;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RcConfig {
    pub font_size: u16,
    pub autosave_delay_ms: u64,
    pub assistant_delay_ms: u64,
    pub status_timeout_ms: u64,
    pub show_line_numbers: bool,
    pub tab_stop: usize,
    pub assistant_panel: bool,
}

impl Default for RcConfig {
    fn default() -> Self {
        Self {
            font_size: 14,
            autosave_delay_ms: 5000,
            assistant_delay_ms: 1000,
            status_timeout_ms: 3000,
            show_line_numbers: false,
            tab_stop: 4,
            assistant_panel: false,
        }
    }
}

/// Delays the dispatcher runs its timers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub autosave_delay: Duration,
    pub assistant_delay: Duration,
    pub status_timeout: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        RcConfig::default().timings()
    }
}

impl RcConfig {
    pub fn timings(&self) -> Timings {
        Timings {
            autosave_delay: Duration::from_millis(self.autosave_delay_ms),
            assistant_delay: Duration::from_millis(self.assistant_delay_ms),
            status_timeout: Duration::from_millis(self.status_timeout_ms),
        }
    }
}

pub struct RcLoader;

impl RcLoader {
    /// Get the path to the RC file
    /// Looks for .notasrc in:
    /// 1. Current directory
    /// 2. Home directory (~/.notasrc)
    pub fn get_rc_path() -> Option<PathBuf> {
        let current_rc = Path::new(RC_FILE_NAME);
        if current_rc.exists() {
            return Some(current_rc.to_path_buf());
        }

        if let Ok(home) = env::var("HOME") {
            let home_rc = Path::new(&home).join(RC_FILE_NAME);
            if home_rc.exists() {
                return Some(home_rc);
            }
        }

        None
    }

    /// Load the RC file. An explicitly requested file must be readable; a
    /// discovered one that cannot be read is skipped.
    pub fn load_config(explicit: Option<&Path>) -> Result<RcConfig, ConfigError> {
        let mut config = RcConfig::default();

        if let Some(path) = explicit {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Self::parse_config_content(&content, &mut config);
            tracing::info!(file = %path.display(), "config loaded");
            return Ok(config);
        }

        if let Some(rc_path) = Self::get_rc_path() {
            match fs::read_to_string(&rc_path) {
                Ok(content) => {
                    Self::parse_config_content(&content, &mut config);
                    tracing::info!(file = %rc_path.display(), "config loaded");
                }
                Err(err) => {
                    tracing::warn!(file = %rc_path.display(), error = %err, "config skipped");
                }
            }
        }

        Ok(config)
    }

    /// Parse the content of an RC file
    pub fn parse_config_content(content: &str, config: &mut RcConfig) {
        for line in content.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') || line.starts_with('"') {
                continue;
            }

            Self::parse_config_line(line, config);
        }
    }

    fn parse_config_line(line: &str, config: &mut RcConfig) {
        // Remove inline comments
        let line = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        }
        .trim();

        // "set flag", "set noflag" and "set key=value" (vim-style)
        if let Some(stripped) = line.strip_prefix("set ") {
            let setting = stripped.trim();
            match setting.split_once('=') {
                Some((key, value)) => Self::apply_setting(key.trim(), value.trim(), config),
                None => Self::apply_flag(setting, config),
            }
        } else if let Some((key, value)) = line.split_once('=') {
            Self::apply_setting(key.trim(), value.trim(), config);
        }
    }

    fn apply_flag(flag: &str, config: &mut RcConfig) {
        match flag {
            "nu" | "number" => config.show_line_numbers = true,
            "nonu" | "nonumber" => config.show_line_numbers = false,
            "assistant" => config.assistant_panel = true,
            "noassistant" => config.assistant_panel = false,
            _ => {} // Unknown flag, ignore
        }
    }

    fn apply_setting(key: &str, value: &str, config: &mut RcConfig) {
        match key {
            "font_size" | "fontsize" => {
                if let Ok(size) = value.parse::<u16>() {
                    if (MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&size) {
                        config.font_size = size;
                    }
                }
            }
            "autosave_delay" => {
                if let Some(ms) = parse_delay(value) {
                    config.autosave_delay_ms = ms;
                }
            }
            "assistant_delay" => {
                if let Some(ms) = parse_delay(value) {
                    config.assistant_delay_ms = ms;
                }
            }
            "status_timeout" => {
                if let Some(ms) = parse_delay(value) {
                    config.status_timeout_ms = ms;
                }
            }
            "tabstop" | "tab_stop" | "ts" => {
                if let Ok(tab_stop) = value.parse::<usize>() {
                    if tab_stop > 0 && tab_stop <= 16 {
                        config.tab_stop = tab_stop;
                    }
                }
            }
            "linenumbers" | "line_numbers" | "number" => {
                config.show_line_numbers = parse_bool(value);
            }
            "assistant_panel" | "assistant" => {
                config.assistant_panel = parse_bool(value);
            }
            _ => {} // Unknown setting, ignore
        }
    }

    /// Generate a sample RC file content
    pub fn generate_sample_rc() -> String {
        r#"# notas-ia configuration file (.notasrc)
# Lines starting with # or " are comments

# Display settings
set nu                  # Show line numbers (or set nonu to disable)
set tabstop=4           # Tab width
font_size=14            # Shown in the status bar, 8..72

# Assistant panel
set noassistant         # Start with the panel hidden

# Timers, in milliseconds
autosave_delay=5000
assistant_delay=1000
status_timeout=3000
"#
        .to_string()
    }
}

fn parse_bool(value: &str) -> bool {
    value == "true" || value == "1" || value == "yes"
}

fn parse_delay(value: &str) -> Option<u64> {
    value.parse::<u64>().ok().filter(|ms| *ms > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_vim_style_config() {
        let mut config = RcConfig::default();
        let content = r#"
            set nu
            set tabstop=8
            set assistant
            set font_size=18
        "#;

        RcLoader::parse_config_content(content, &mut config);

        assert!(config.show_line_numbers);
        assert_eq!(config.tab_stop, 8);
        assert!(config.assistant_panel);
        assert_eq!(config.font_size, 18);
    }

    #[test]
    fn test_parse_key_value_config() {
        let mut config = RcConfig::default();
        let content = r#"
            autosave_delay=2500
            assistant_delay=200
            status_timeout=1500
            line_numbers=yes
            assistant_panel=false
        "#;

        RcLoader::parse_config_content(content, &mut config);

        assert_eq!(config.autosave_delay_ms, 2500);
        assert_eq!(config.assistant_delay_ms, 200);
        assert_eq!(config.status_timeout_ms, 1500);
        assert!(config.show_line_numbers);
        assert!(!config.assistant_panel);

        let timings = config.timings();
        assert_eq!(timings.autosave_delay, Duration::from_millis(2500));
    }

    #[test]
    fn test_parse_mixed_config_with_comments() {
        let mut config = RcConfig::default();
        let content = r#"
            # This is a comment
            set nu                 # Enable line numbers
            " This is also a comment

            font_size=20           # Bigger text
            # set assistant        # This is commented out
        "#;

        RcLoader::parse_config_content(content, &mut config);

        assert!(config.show_line_numbers);
        assert_eq!(config.font_size, 20);
        assert!(!config.assistant_panel);
    }

    #[test]
    fn test_invalid_values_ignored() {
        let mut config = RcConfig::default();
        let content = r#"
            set tabstop=0          # Invalid: too small
            tabstop=invalid        # Invalid: not a number
            font_size=4            # Invalid: below range
            font_size=200          # Invalid: above range
            autosave_delay=0       # Invalid: zero
            autosave_delay=-5      # Invalid: negative
            unknown_setting=value  # Unknown setting
        "#;

        RcLoader::parse_config_content(content, &mut config);

        assert_eq!(config, RcConfig::default());
    }

    #[test]
    fn test_sample_rc_parses() {
        let mut config = RcConfig::default();
        RcLoader::parse_config_content(&RcLoader::generate_sample_rc(), &mut config);
        assert!(config.show_line_numbers);
        assert_eq!(config.font_size, 14);
    }

    #[test]
    fn test_load_explicit_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "font_size=16").unwrap();

        let config = RcLoader::load_config(Some(file.path())).unwrap();
        assert_eq!(config.font_size, 16);
    }

    #[test]
    fn test_load_missing_explicit_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = RcLoader::load_config(Some(&dir.path().join("nope")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
