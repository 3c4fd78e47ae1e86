use wfst_encode_macros::config;

use crate::{logger::LogLevel, weight::NUM_RANDOM_WEIGHTS};

pub trait IntoOr<T> {
    fn into_or(self, or: T) -> T;
}

impl<T> IntoOr<Option<T>> for Option<T> {
    fn into_or(self, or: Option<T>) -> Option<T> {
        match self {
            Some(t) => Some(t),
            None => or,
        }
    }
}

impl<T> IntoOr<T> for Option<T> {
    fn into_or(self, or: T) -> T {
        self.unwrap_or(or)
    }
}

pub trait GeneralConfig {
    fn logger(&self) -> &LoggerConfig;
}

config! {
    pub struct LoggerConfig {
        enabled: bool = false,
        log_file: bool = false,
        log_level: LogLevel = LogLevel::Warn,
    }
}

config! {
    /// Textual layout of composite weights.
    ///
    /// Elements are joined by `separator`. When `parentheses` is set, every
    /// composite value is wrapped in `open_paren` and `close_paren`, which is
    /// required to read back composites nested inside other composites.
    pub struct WeightFormatConfig {
        separator: char = ',',
        parentheses: bool = false,
        open_paren: char = '(',
        close_paren: char = ')',
    }
}

impl WeightFormatConfig {
    /// The same format with parentheses switched on.
    pub fn parenthesized(&self) -> Self {
        self.clone().with_parentheses(true)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.separator.is_whitespace() {
            anyhow::bail!("Weight separator must not be whitespace");
        }
        if self.parentheses {
            if self.open_paren == self.close_paren {
                anyhow::bail!(
                    "Open and close parentheses must differ, both are '{}'",
                    self.open_paren
                );
            }
            if self.separator == self.open_paren || self.separator == self.close_paren {
                anyhow::bail!(
                    "Weight separator '{}' collides with a parenthesis",
                    self.separator
                );
            }
            if self.open_paren.is_whitespace() || self.close_paren.is_whitespace() {
                anyhow::bail!("Parentheses must not be whitespace");
            }
        }
        Ok(())
    }
}

config! {
    /// Settings for the random weight generators.
    pub struct RandomWeightConfig {
        seed: u64 = 1,
        /// Whether `zero()` may be produced.
        allow_zero: bool = true,
        /// Number of distinct non-zero weights to draw from.
        num_random_weights: usize = NUM_RANDOM_WEIGHTS,
    }
}

config! {
    pub struct RandomFstConfig {
        seed: u64 = 1,
        state_count: usize = 4,
        tr_count: usize = 8,
        /// Labels are drawn from `1..=label_count`, plus epsilon.
        label_count: u32 = 3,
    }
}

config! {
    pub struct FstEncodeConfig {
        weight_format: WeightFormatConfig (Option<PartialWeightFormatConfig> = WeightFormatConfig::default()),
        logger: LoggerConfig (Option<PartialLoggerConfig> = LoggerConfig::default()),
    }
}

impl GeneralConfig for FstEncodeConfig {
    fn logger(&self) -> &LoggerConfig {
        &self.logger
    }
}

#[test]
fn test_partial_config_from_toml() {
    let config = FstEncodeConfig::from_toml_str(
        r#"
        [weight_format]
        separator = ";"
        parentheses = true

        [logger]
        enabled = true
        "#,
    )
    .unwrap();

    assert_eq!(*config.get_weight_format().get_separator(), ';');
    assert!(*config.get_weight_format().get_parentheses());
    assert_eq!(*config.get_weight_format().get_close_paren(), ')');
    assert!(*config.get_logger().get_enabled());
    assert_eq!(*config.get_logger().get_log_level(), LogLevel::Warn);
}

#[test]
fn test_weight_format_validation() {
    assert!(WeightFormatConfig::default().validate().is_ok());
    assert!(
        WeightFormatConfig::default()
            .with_separator(' ')
            .validate()
            .is_err()
    );
    assert!(
        WeightFormatConfig::default()
            .parenthesized()
            .with_separator('(')
            .validate()
            .is_err()
    );
}
