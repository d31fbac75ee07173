//! Settings command implementation

use crate::error::{Error, Result};
use crate::settings::{SettingsContext, DEFAULT_API_BASE_URL};
use crate::validate::validate_api_url;
use serde::Serialize;
use std::path::Path;

/// Current settings as shown to the user
#[derive(Debug, Clone, Serialize)]
pub struct SettingsInfo {
    pub api_base_url: String,
    pub default_api_base_url: String,
    pub settings_file: String,
}

pub fn cmd_show_settings(settings: &SettingsContext, settings_file: &Path) -> SettingsInfo {
    SettingsInfo {
        api_base_url: settings.api_base_url(),
        default_api_base_url: DEFAULT_API_BASE_URL.to_string(),
        settings_file: settings_file.display().to_string(),
    }
}

/// Validate `raw` and make it the API endpoint. Invalid input leaves the
/// current endpoint untouched.
pub fn cmd_set_api_url(settings: &SettingsContext, raw: &str) -> Result<String> {
    let validation = validate_api_url(raw);
    if !validation.valid {
        return Err(Error::Validation(
            validation
                .error
                .unwrap_or_else(|| "Invalid URL format".to_string()),
        ));
    }

    let url = raw.trim().to_string();
    settings.set_api_base_url(url.clone());
    Ok(url)
}

pub fn print_settings(info: &SettingsInfo) {
    println!("\n⚙ Settings\n");
    println!("API URL: {}", info.api_base_url);
    println!("Default: {}", info.default_api_base_url);
    println!("Stored in: {}", info.settings_file);
}
