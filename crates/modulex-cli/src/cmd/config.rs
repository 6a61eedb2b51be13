use crate::output::{print_fields, print_json};
use anyhow::Result;
use modulex_core::config::Config;

pub fn run(config: &Config, json: bool) -> Result<()> {
    if json {
        return print_json(config);
    }
    print_fields(&[
        ("signaling_url", config.signaling_url.clone()),
        ("storage_root", config.storage_root.display().to_string()),
    ]);
    Ok(())
}
