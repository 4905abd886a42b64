use std::env;
use std::fs;
use std::path::Path;

// Claves que la app lee con option_env!
const CONFIG_KEYS: &[&str] = &[
    "API_BASE_URL",
    "ENVIRONMENT",
    "ENABLE_LOGGING",
    "EVENT_POLL_INTERVAL_MS",
    "COGNITO_DOMAIN",
    "COGNITO_CLIENT_ID",
    "COGNITO_REDIRECT_URI",
    "COGNITO_SCOPE",
    "COGNITO_GRANT",
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.env");
    for key in CONFIG_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }

    let env_file = Path::new(".env");
    let Ok(contents) = fs::read_to_string(env_file) else {
        println!("cargo:warning=No .env file found, using defaults (local login only). Copy .env.example to .env to configure hosted login.");
        return;
    };

    for line in contents.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if !CONFIG_KEYS.contains(&key) {
            println!("cargo:warning=Ignoring unknown key in .env: {}", key);
            continue;
        }
        // El entorno real tiene prioridad sobre .env
        if env::var(key).is_err() {
            println!("cargo:rustc-env={}={}", key, value.trim());
        }
    }
}
