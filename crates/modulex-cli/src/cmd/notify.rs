use anyhow::{anyhow, bail, Result};
use modulex_core::config::Config;
use modulex_core::notifier::{Delivery, HttpNotifier, Notifier};

pub fn run(config: &Config, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        bail!("instruction text is empty");
    }
    let notifier = HttpNotifier::from_config(config)?;
    let rt = tokio::runtime::Runtime::new()?;

    match rt.block_on(notifier.instruct(text)) {
        Delivery::Sent { status } => {
            println!("sent to {} (HTTP {status})", notifier.base_url());
            Ok(())
        }
        Delivery::Failed { reason } => Err(anyhow!(
            "could not reach {}: {reason}",
            notifier.base_url()
        )),
    }
}
