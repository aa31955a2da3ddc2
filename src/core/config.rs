use std::env;

use chrono_tz::Tz;
use tracing::warn;

use crate::bot::commands::CommandTable;
use crate::errors::BridgeError;

pub const DEFAULT_OPENID_METADATA_URL: &str =
    "https://login.botframework.com/v1/.well-known/openidconfiguration";
pub const DEFAULT_TOKEN_ENDPOINT_BASE: &str = "https://login.microsoftonline.com";
pub const DEFAULT_CASE_TIMEZONE: Tz = chrono_tz::Europe::Stockholm;

/// How the bot's Azure identity is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppType {
    MultiTenant,
    SingleTenant,
    UserAssignedMsi,
}

impl AppType {
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("SingleTenant") => AppType::SingleTenant,
            Some(v) if v.eq_ignore_ascii_case("UserAssignedMSI") => AppType::UserAssignedMsi,
            _ => AppType::MultiTenant,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AppType::MultiTenant => "MultiTenant",
            AppType::SingleTenant => "SingleTenant",
            AppType::UserAssignedMsi => "UserAssignedMSI",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub app_id: String,
    pub app_password: String,
    pub app_type: AppType,
    pub tenant_id: Option<String>,
    pub openid_metadata_url: String,
    pub token_endpoint_base: String,
}

impl BotConfig {
    /// Tenant that issues the bot's outbound connector tokens.
    #[must_use]
    pub fn token_tenant(&self) -> &str {
        match (self.app_type, self.tenant_id.as_deref()) {
            (AppType::SingleTenant, Some(tenant)) => tenant,
            _ => "botframework.com",
        }
    }
}

/// Rule for deriving the Basic-auth password sent to the service desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordScheme {
    Plain,
    UsernameWithIdentifier,
    PasswordWithIdentifier,
}

impl PasswordScheme {
    fn parse(raw: Option<&str>, has_identifier: bool) -> Result<Self, String> {
        match raw.map(|s| s.trim().to_ascii_lowercase()) {
            None => Ok(if has_identifier {
                PasswordScheme::UsernameWithIdentifier
            } else {
                PasswordScheme::Plain
            }),
            Some(v) if v == "plain" => Ok(PasswordScheme::Plain),
            Some(v) if v == "username+identifier" => Ok(PasswordScheme::UsernameWithIdentifier),
            Some(v) if v == "password+identifier" => Ok(PasswordScheme::PasswordWithIdentifier),
            Some(other) => Err(format!("SERVICE_DESK_PASSWORD_SCHEME: unknown scheme '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceDeskConfig {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub identifier: Option<String>,
    pub password_scheme: PasswordScheme,
}

impl ServiceDeskConfig {
    /// Password actually presented in the Basic-auth header.
    #[must_use]
    pub fn auth_password(&self) -> String {
        let identifier = self.identifier.as_deref().unwrap_or("");
        match self.password_scheme {
            PasswordScheme::Plain => self.password.clone(),
            PasswordScheme::UsernameWithIdentifier => format!("{}{identifier}", self.username),
            PasswordScheme::PasswordWithIdentifier => format!("{}{identifier}", self.password),
        }
    }
}

/// Which bot settings were supplied, independent of whether they form a
/// usable [`BotConfig`]. Values other than the app type are never kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotSettingsPresence {
    pub app_id: bool,
    pub app_password: bool,
    /// Raw `MicrosoftAppType` as configured.
    pub app_type: Option<String>,
    pub tenant_id: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bot: Option<BotConfig>,
    pub bot_settings: BotSettingsPresence,
    pub service_desk: Result<ServiceDeskConfig, String>,
    pub case_timezone: Tz,
    pub commands: CommandTable,
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads configuration through `lookup`; blank values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bot_settings = BotSettingsPresence {
            app_id: get("MicrosoftAppId").is_some(),
            app_password: get("MicrosoftAppPassword").is_some(),
            app_type: get("MicrosoftAppType").map(|v| v.trim().to_string()),
            tenant_id: get("MicrosoftAppTenantId").is_some(),
        };

        let bot = match (get("MicrosoftAppId"), get("MicrosoftAppPassword")) {
            (Some(app_id), Some(app_password)) => Some(BotConfig {
                app_id,
                app_password,
                app_type: AppType::parse(get("MicrosoftAppType").as_deref()),
                tenant_id: get("MicrosoftAppTenantId"),
                openid_metadata_url: get("BOT_OPENID_METADATA_URL")
                    .unwrap_or_else(|| DEFAULT_OPENID_METADATA_URL.to_string()),
                token_endpoint_base: get("BOT_TOKEN_ENDPOINT_BASE")
                    .unwrap_or_else(|| DEFAULT_TOKEN_ENDPOINT_BASE.to_string()),
            }),
            _ => None,
        };

        let service_desk = Self::service_desk_from(&get);

        let case_timezone = match get("CASE_TIMEZONE") {
            Some(name) => name.parse::<Tz>().unwrap_or_else(|e| {
                warn!("CASE_TIMEZONE '{}' not recognised ({}), using default", name, e);
                DEFAULT_CASE_TIMEZONE
            }),
            None => DEFAULT_CASE_TIMEZONE,
        };

        let commands = match get("BOT_COMMANDS") {
            Some(raw) => CommandTable::from_json(&raw).unwrap_or_else(|e| {
                warn!("BOT_COMMANDS ignored: {}", e);
                CommandTable::default()
            }),
            None => CommandTable::default(),
        };

        Self {
            bot,
            bot_settings,
            service_desk,
            case_timezone,
            commands,
        }
    }

    fn service_desk_from<G>(get: &G) -> Result<ServiceDeskConfig, String>
    where
        G: Fn(&str) -> Option<String>,
    {
        let missing: Vec<&str> = [
            "SERVICE_DESK_ENDPOINT",
            "SERVICE_DESK_USERNAME",
            "SERVICE_DESK_PASSWORD",
        ]
        .into_iter()
        .filter(|key| get(*key).is_none())
        .collect();

        if !missing.is_empty() {
            return Err(format!("missing {}", missing.join(", ")));
        }

        let identifier = get("SERVICE_DESK_IDENTIFIER");
        let password_scheme = PasswordScheme::parse(
            get("SERVICE_DESK_PASSWORD_SCHEME").as_deref(),
            identifier.is_some(),
        )?;

        Ok(ServiceDeskConfig {
            endpoint: get("SERVICE_DESK_ENDPOINT").unwrap_or_default(),
            username: get("SERVICE_DESK_USERNAME").unwrap_or_default(),
            password: get("SERVICE_DESK_PASSWORD").unwrap_or_default(),
            identifier,
            password_scheme,
        })
    }

    /// The service-desk settings, or a configuration error naming what is missing.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Configuration`] when endpoint or credentials are absent.
    pub fn require_service_desk(&self) -> Result<&ServiceDeskConfig, BridgeError> {
        self.service_desk
            .as_ref()
            .map_err(|e| BridgeError::Configuration(format!("service desk API: {e}")))
    }
}
