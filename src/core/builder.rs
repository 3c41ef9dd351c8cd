use std::sync::Arc;

use super::{config::Config, dispatcher::Dispatcher};
use crate::{error::RegisterError, notify::Notify, observers::Observer};

/// Builder for constructing a [`Dispatcher`] with its observers and notifier.
pub struct DispatcherBuilder {
    cfg: Config,
    observers: Vec<Arc<dyn Observer>>,
    notifier: Option<Arc<dyn Notify>>,
}

impl DispatcherBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            observers: Vec::new(),
            notifier: None,
        }
    }

    /// Appends one observer; dispatch order follows the order of these calls.
    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Appends several observers, keeping their order.
    pub fn with_observers(mut self, observers: impl IntoIterator<Item = Arc<dyn Observer>>) -> Self {
        self.observers.extend(observers);
        self
    }

    /// Sets the webhook notifier called on `on_run`.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notify>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Builds the dispatcher, registering observers in order.
    ///
    /// Fails on the first duplicate or reserved identity.
    pub fn build(self) -> Result<Dispatcher, RegisterError> {
        let mut dispatcher = Dispatcher::new(self.cfg);
        for observer in self.observers {
            dispatcher.register(observer)?;
        }
        if let Some(notifier) = self.notifier {
            dispatcher.set_notifier(notifier);
        }
        Ok(dispatcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DISPATCHER_NAME;

    struct Named(&'static str);
    impl Observer for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn builds_in_order() {
        let d = Dispatcher::builder(Config::default())
            .with_observer(Arc::new(Named("store")))
            .with_observers([
                Arc::new(Named("cloud")) as Arc<dyn Observer>,
                Arc::new(Named("console")),
            ])
            .build()
            .unwrap();
        assert_eq!(d.names(), ["store", "cloud", "console"]);
    }

    #[test]
    fn build_fails_on_reserved_name() {
        let res = Dispatcher::builder(Config::default())
            .with_observer(Arc::new(Named(DISPATCHER_NAME)))
            .build();
        assert!(matches!(res, Err(RegisterError::Reserved { .. })));
    }
}
