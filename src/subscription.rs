// SPDX-License-Identifier: GPL-3.0-only

// tracks the match rule that routes a request's Response signal to us.

use zbus::zvariant::ObjectPath;

use crate::{Result, handle, transport::Transport};

/// Interest in the `Response` signal of one request handle.
///
/// At most one rule is installed at a time; subscribing again replaces it.
/// Removal cannot happen on drop because it needs the transport, so the owner
/// must call [`Subscription::unsubscribe`] on every exit path.
#[derive(Debug, Default)]
pub struct Subscription {
    rule: Option<String>,
}

impl Subscription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_subscribed(&self) -> bool {
        self.rule.is_some()
    }

    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }

    /// Installs a rule for `path`, removing the previous one first.
    ///
    /// On failure the subscription is left empty.
    pub async fn subscribe<T: Transport>(
        &mut self,
        transport: &mut T,
        path: &ObjectPath<'_>,
    ) -> Result<()> {
        self.unsubscribe(transport).await;
        let rule = handle::response_match_rule(path, transport.unique_name());
        transport.add_match(&rule).await?;
        log::debug!("subscribed to {rule}");
        self.rule = Some(rule);
        Ok(())
    }

    /// Removes the installed rule, if any. Errors are logged and ignored.
    pub async fn unsubscribe<T: Transport>(&mut self, transport: &mut T) {
        let Some(rule) = self.rule.take() else {
            return;
        };
        if let Err(err) = transport.remove_match(&rule).await {
            log::debug!("failed to remove match rule {rule}: {err}");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(rule) = &self.rule {
            log::warn!("subscription dropped without unsubscribing: {rule}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Subscription;
    use crate::transport::mock::{MockTransport, Reply};
    use zbus::zvariant::ObjectPath;

    fn path(s: &str) -> ObjectPath<'_> {
        ObjectPath::try_from(s).unwrap()
    }

    #[tokio::test]
    async fn resubscribe_replaces_previous_rule() {
        let mut transport = MockTransport::new(Reply::Guessed);
        let mut sub = Subscription::new();
        sub.subscribe(&mut transport, &path("/a")).await.unwrap();
        let first = sub.rule().unwrap().to_string();
        sub.subscribe(&mut transport, &path("/b")).await.unwrap();
        assert!(sub.rule().unwrap().contains("path='/b'"));
        assert_eq!(transport.added.len(), 2);
        assert_eq!(transport.removed, vec![first]);
        sub.unsubscribe(&mut transport).await;
    }

    #[tokio::test]
    async fn unsubscribe_is_idempotent() {
        let mut transport = MockTransport::new(Reply::Guessed);
        let mut sub = Subscription::new();
        sub.unsubscribe(&mut transport).await;
        sub.subscribe(&mut transport, &path("/a")).await.unwrap();
        sub.unsubscribe(&mut transport).await;
        sub.unsubscribe(&mut transport).await;
        assert!(!sub.is_subscribed());
        assert_eq!(transport.removed.len(), 1);
    }

    #[tokio::test]
    async fn failed_subscribe_leaves_nothing_installed() {
        let mut transport = MockTransport::new(Reply::Guessed);
        transport.fail_add_match = true;
        let mut sub = Subscription::new();
        assert!(sub.subscribe(&mut transport, &path("/a")).await.is_err());
        assert!(!sub.is_subscribed());
        sub.unsubscribe(&mut transport).await;
        assert!(transport.removed.is_empty());
    }

    #[tokio::test]
    async fn unsubscribe_errors_are_swallowed() {
        let mut transport = MockTransport::new(Reply::Guessed);
        transport.fail_remove_match = true;
        let mut sub = Subscription::new();
        sub.subscribe(&mut transport, &path("/a")).await.unwrap();
        sub.subscribe(&mut transport, &path("/b")).await.unwrap();
        sub.unsubscribe(&mut transport).await;
        assert!(!sub.is_subscribed());
        assert_eq!(transport.removed.len(), 2);
    }
}
