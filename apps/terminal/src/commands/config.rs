//! # Config Commands

use tracing::debug;

use crate::state::ConfigState;

/// Store name, currency and daily target for the front-end.
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}
