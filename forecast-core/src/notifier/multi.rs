use async_trait::async_trait;
use tracing::warn;

use super::Notifier;

/// Fans a message out to several channels in order.
///
/// Succeeds if at least one channel delivered.
#[derive(Debug)]
pub struct MultiNotifier {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl MultiNotifier {
    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }
}

#[async_trait]
impl Notifier for MultiNotifier {
    async fn send(&self, message: &str, subject: Option<&str>) -> bool {
        let mut delivered = 0;

        for notifier in &self.notifiers {
            if notifier.send(message, subject).await {
                delivered += 1;
            } else {
                warn!(channel = ?notifier, "channel failed to deliver");
            }
        }

        delivered > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Debug)]
    struct Fixed {
        ok: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Notifier for Fixed {
        async fn send(&self, _message: &str, _subject: Option<&str>) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.ok
        }
    }

    fn channels(results: &[bool]) -> (MultiNotifier, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let notifiers = results
            .iter()
            .map(|&ok| {
                Box::new(Fixed {
                    ok,
                    calls: Arc::clone(&calls),
                }) as Box<dyn Notifier>
            })
            .collect();
        (MultiNotifier::new(notifiers), calls)
    }

    #[tokio::test]
    async fn succeeds_if_any_channel_succeeds() {
        let (multi, calls) = channels(&[false, true]);
        assert!(multi.send("hola", None).await);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn keeps_going_after_a_success() {
        let (multi, calls) = channels(&[true, false]);
        assert!(multi.send("hola", Some("asunto")).await);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fails_only_if_all_fail() {
        let (multi, _) = channels(&[false, false]);
        assert!(!multi.send("hola", None).await);
    }

    #[tokio::test]
    async fn empty_fan_out_delivers_nothing() {
        let (multi, _) = channels(&[]);
        assert!(!multi.send("hola", None).await);
    }
}
