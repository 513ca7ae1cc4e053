use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOption {
  SetInitialCapacity(usize),
  SetWarnThreshold(usize),
}

impl ConfigOption {
  pub fn apply(&self, config: &mut Config) {
    match self {
      ConfigOption::SetInitialCapacity(initial_capacity) => {
        config.set_initial_capacity(*initial_capacity);
      }
      ConfigOption::SetWarnThreshold(warn_threshold) => {
        config.set_warn_threshold(*warn_threshold);
      }
    }
  }

  pub fn with_initial_capacity(initial_capacity: usize) -> ConfigOption {
    ConfigOption::SetInitialCapacity(initial_capacity)
  }

  pub fn with_warn_threshold(warn_threshold: usize) -> ConfigOption {
    ConfigOption::SetWarnThreshold(warn_threshold)
  }
}
