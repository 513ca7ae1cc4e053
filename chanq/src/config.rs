use crate::config_option::ConfigOption;


pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Settings for a [`Forwarder`](crate::Forwarder).<br/>
/// [`Forwarder`](crate::Forwarder) の設定。
///
/// None of these limit the queue. `warn_threshold` only controls when a warning is logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  initial_capacity: usize,
  warn_threshold: Option<usize>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      initial_capacity: DEFAULT_INITIAL_CAPACITY,
      warn_threshold: None,
    }
  }
}

impl From<Vec<ConfigOption>> for Config {
  fn from(options: Vec<ConfigOption>) -> Self {
    let mut config = Config::default();
    for option in options {
      option.apply(&mut config);
    }
    config
  }
}

impl Config {
  pub fn initial_capacity(&self) -> usize {
    self.initial_capacity
  }

  pub fn set_initial_capacity(&mut self, initial_capacity: usize) {
    self.initial_capacity = initial_capacity;
  }

  pub fn warn_threshold(&self) -> Option<usize> {
    self.warn_threshold
  }

  /// Sets the buffer length at which a warning is logged. `0` disables the warning.<br/>
  /// 警告を出力するバッファ長を設定します。`0` で無効になります。
  pub fn set_warn_threshold(&mut self, warn_threshold: usize) {
    self.warn_threshold = if warn_threshold == 0 { None } else { Some(warn_threshold) };
  }
}
