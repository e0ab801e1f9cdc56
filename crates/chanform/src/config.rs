//! Settings-form configuration.

use chanform_core::Result;
use serde::{Deserialize, Serialize};

/// Placeholder substituted with the server id in `channel_list_route`.
pub const SERVER_ID_PLACEHOLDER: &str = "{serverId}";

/// Configuration for channel settings forms.
///
/// Labels are i18n keys; translating them is the UI layer's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsConfig {
    /// Prefix of the page header, followed by the committed channel name.
    pub title_prefix: String,
    /// Prefix of the delete dialog title, followed by the channel name.
    pub delete_title_prefix: String,
    /// Save button label key while idle.
    pub save_label: String,
    /// Save button label key while a save is in flight.
    pub saving_label: String,
    /// Where to go after a channel is deleted.
    pub channel_list_route: String,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            title_prefix: "Settings - ".to_string(),
            delete_title_prefix: "Delete ".to_string(),
            save_label: "servers.settings.channel.saveChangesButton".to_string(),
            saving_label: "servers.settings.channel.saving".to_string(),
            channel_list_route: "/app/servers/{serverId}/settings/channels".to_string(),
        }
    }
}

impl SettingsConfig {
    /// Load from JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The channel list route for `server_id`.
    pub fn channel_list_path(&self, server_id: &str) -> String {
        self.channel_list_route
            .replace(SERVER_ID_PLACEHOLDER, server_id)
    }
}
