use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};

pub mod models;
pub use models::*;

/// Marker value that is replaced by an environment variable at load time.
pub const SECRET_MARKER: &str = "secret_from_env";

/// Loads the layered configuration.
///
/// Sources, later ones winning:
/// 1. `{config_dir}/default`
/// 2. `{config_dir}/{RUN_ENV}` (RUN_ENV defaults to "debug")
/// 3. environment variables with prefix `MEETBOT` (or `PREFIX`) and separator `__`,
///    e.g. `MEETBOT__SCHEDULER__TIME_ZONE=Europe/Zurich`
///
/// `config_dir` is `CONFIG_DIR` if set, otherwise `config/` at the workspace root.
/// Values equal to [`SECRET_MARKER`] are then replaced from the environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "MEETBOT".to_string());
    let config_dir = config_dir();

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);
    debug!(
        "loading config from {} and {}",
        default_path.display(),
        env_path.display()
    );

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

fn config_dir() -> PathBuf {
    if let Ok(dir) = env::var("CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    // crates/meetbot_config -> workspace root
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .map(|root| root.join("config"))
        .unwrap_or_else(|| PathBuf::from("config"))
}

/// Recursively replaces all "secret_from_env" string values with environment variable values.
///
/// The variable name is the JSON path joined by `_`, e.g. `gcal.key_path` -> `GCAL_KEY_PATH`.
fn inject_env_secrets(value: &mut Value) {
    fn walk(path: Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let env_key = path.join("_").to_uppercase();
                if let Ok(env_val) = env::var(&env_key) {
                    *obj = Value::String(env_val);
                } else {
                    warn!("env var {} not found for {}", env_key, SECRET_MARKER);
                }
            }
            _ => {}
        }
    }

    walk(vec![], value);
}

/// Applies environment overrides based on "secret_from_env" markers in the config.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("failed to serialize config: {err}")))?;
    inject_env_secrets(&mut json);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("failed to rebuild config: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment once.
///
/// `DOTENV_OVERRIDE` selects the file; otherwise `.env` in the working directory.
/// A missing file is not an error. Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
