use crate::{AppSettings, RawSettings};
use color_eyre::eyre::{Result, eyre};
use std::path::Path;

/// Loads `config/settings.yaml` with an `APP__`-prefixed environment overlay
/// (e.g. `APP__SECRETS__DATABASE_URL`). `.env` is read first so local runs can
/// keep secrets out of the yaml file.
pub fn load_app_settings() -> Result<AppSettings> {
    dotenv::from_path(".env").ok();
    let config_path = Path::new("config/settings.yaml").canonicalize()?;

    let builder = config::Config::builder()
        .add_source(config::File::from(config_path))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

    let raw_settings = builder.build()?.try_deserialize::<RawSettings>()?;
    let settings: AppSettings = raw_settings.into();
    validate_secrets(&settings)?;

    Ok(settings)
}

/// A missing credential must fail fast with a descriptive error, not surface
/// later as a silent no-op inside a handler.
fn validate_secrets(settings: &AppSettings) -> Result<()> {
    let required = [
        ("secrets.database_url", &settings.secrets.database_url),
        ("secrets.internal_secret", &settings.secrets.internal_secret),
        ("secrets.cron_secret", &settings.secrets.cron_secret),
        (
            "secrets.reasoning_api_key",
            &settings.secrets.reasoning_api_key,
        ),
        ("secrets.search_api_key", &settings.secrets.search_api_key),
        ("secrets.email_api_key", &settings.secrets.email_api_key),
    ];
    for (key, value) in required {
        if value.trim().is_empty() {
            return Err(eyre!(
                "missing required credential `{key}` (set it in config/settings.yaml or via APP__{})",
                key.to_uppercase().replace('.', "__")
            ));
        }
    }
    Ok(())
}
