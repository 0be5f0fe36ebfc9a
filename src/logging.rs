use log::LevelFilter;

/// Environment variable holding an `env_logger` filter, e.g. `debug` or
/// `mat2json=debug`.
pub const LOG_ENV: &str = "MAT2JSON_LOG";

/// Install the process logger: `info` by default, overridable via [`LOG_ENV`].
pub fn init() {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Info)
        .format_timestamp(None)
        .parse_env(env_logger::Env::default().filter(LOG_ENV))
        .init();
}
