use crate::engine::RecordStore;
use crate::logging::{LogLevel, SdpLogger};
use crate::runtime::dispatcher::Dispatcher;
use crate::types::{SdpEvent, Status, UserToken};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutation {
    Create,
    Remove,
}

impl Mutation {
    fn event(self, status: Status, token: UserToken) -> SdpEvent {
        match self {
            Mutation::Create => SdpEvent::RecordCreated { status, token },
            Mutation::Remove => SdpEvent::RecordRemoved { status, token },
        }
    }

    fn name(self) -> &'static str {
        match self {
            Mutation::Create => "create",
            Mutation::Remove => "remove",
        }
    }
}

/// Forwards record create/remove requests to the store and relays their
/// outcome as events carrying the caller's token.
pub struct RecordRouter {
    store: Arc<dyn RecordStore>,
    dispatcher: Arc<Dispatcher>,
    logger: Arc<dyn SdpLogger>,
}

impl RecordRouter {
    pub fn new(store: Arc<dyn RecordStore>, dispatcher: Arc<Dispatcher>, logger: Arc<dyn SdpLogger>) -> Self {
        RecordRouter { store, dispatcher, logger }
    }

    pub fn create_record(&self, token: UserToken) -> Status {
        self.forward(Mutation::Create, token)
    }

    pub fn remove_record(&self, token: UserToken) -> Status {
        self.forward(Mutation::Remove, token)
    }

    fn forward(&self, mutation: Mutation, token: UserToken) -> Status {
        if !self.dispatcher.is_enabled() {
            self.logger.log(
                LogLevel::Warn,
                "Records",
                &format!("Record {} rejected: service not enabled", mutation.name()),
            );
            return Status::Failure;
        }

        let dispatcher = Arc::clone(&self.dispatcher);
        let logger = Arc::clone(&self.logger);
        let on_complete = Box::new(move |status: Status, token: UserToken| {
            let status = status.completion();
            let level = if status.is_success() { LogLevel::Debug } else { LogLevel::Warn };
            logger.log(
                level,
                "Records",
                &format!("Record {} for token {} finished: {}", mutation.name(), token.0, status),
            );
            dispatcher.deliver(&mutation.event(status, token));
        });

        match mutation {
            Mutation::Create => self.store.create(token, on_complete),
            Mutation::Remove => self.store.remove(token, on_complete),
        }
        Status::Success
    }
}
