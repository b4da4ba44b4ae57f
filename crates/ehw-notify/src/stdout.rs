use crate::{Notifier, NotifyError};

/// Prints each message to stdout. Used for dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutNotifier;

#[async_trait::async_trait]
impl Notifier for StdoutNotifier {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn deliver(&self, text: &str) -> Result<(), NotifyError> {
        println!("{text}");
        println!("---");
        Ok(())
    }
}
