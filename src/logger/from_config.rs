//! Logger construction from a loaded `Config`.

use super::{Logger, LoggerBuilder};
use crate::config::Config;
use crate::fmt::JsonFormatter;
use crate::internal;
use crate::output::RotatingFileWriter;

impl Logger {
    /// Builds a logger from the default config file (defaults if it is missing).
    ///
    /// # Errors
    /// See [`Logger::from_config_with`].
    pub fn from_config() -> Result<Self, crate::Error> {
        let config = Config::load()?;
        Self::from_config_with(&config)
    }

    /// Builds a logger from `config`, initializing the internal diagnostic logger on the way.
    ///
    /// # Errors
    /// Invalid level names, formatter keys, or sizes, and a file target that cannot be opened.
    pub fn from_config_with(config: &Config) -> Result<Self, crate::Error> {
        internal::init_with_config(config);
        internal::debug(
            "LOGGER",
            &format!("Building logger {:?}", config.general.name),
        );

        let level = config.level()?;
        let formatter = JsonFormatter::new(&config.json.keys, config.json.full)?;
        let mut builder = LoggerBuilder::new()
            .name(&config.general.name)
            .level(level)
            .formatter(formatter);

        if let Some(format) = &config.general.time_format {
            builder = builder.time_format(format);
        }

        if config.caller.enabled {
            let levels = config.caller_levels()?;
            builder = if levels.is_empty() {
                builder.caller(config.caller.skip)
            } else {
                builder.levels_caller(&levels, config.caller.skip)
            };
        }

        if config.file.enabled {
            let max_size = config.max_size_bytes()?;
            let writer = RotatingFileWriter::new(config.file_path(), max_size, config.file.backups)?
                .compress(config.file.compress);
            internal::debug(
                "LOGGER",
                &format!(
                    "File output: {} (rotate at {}, keep {})",
                    writer.path().display(),
                    crate::config::format_size(max_size),
                    config.file.backups
                ),
            );
            builder = builder.output(writer);
        }

        internal::debug("LOGGER", &format!("Logger ready at level {level}"));
        Ok(builder.build())
    }
}
