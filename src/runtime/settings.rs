use crate::config;

/// Load settings, falling back to defaults on any problem. Runs before the
/// terminal is taken over, so warnings go to stderr.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("segue: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            eprintln!("segue: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
