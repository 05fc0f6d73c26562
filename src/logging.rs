use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

pub trait SdpLogger: Send + Sync {
    fn log(&self, level: LogLevel, component: &str, msg: &str);
}

/// Forwards to the `log` facade, using the component as the target.
pub struct LogFacade;

impl LogFacade {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

impl SdpLogger for LogFacade {
    fn log(&self, level: LogLevel, component: &str, msg: &str) {
        log::log!(target: component, log::Level::from(level), "{}", msg);
    }
}

pub struct ConsoleLogger;

impl ConsoleLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

impl SdpLogger for ConsoleLogger {
    fn log(&self, level: LogLevel, component: &str, msg: &str) {
        let level_str = match level {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO ",
            LogLevel::Warn => "WARN ",
            LogLevel::Error => "ERROR",
        };
        println!("[{}] [{}] {}", level_str, component, msg);
    }
}

/// Install `env_logger` with an `info` default, overridable through `RUST_LOG`.
/// Later calls are no-ops.
pub fn init() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).try_init();
}
