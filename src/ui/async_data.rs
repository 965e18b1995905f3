use std::sync::mpsc::{Receiver, TryRecvError};

use crate::service::data_manager::DataRetrievalError;

pub enum DataState<T> {
    Loading,
    Loaded(T),
    Error(String),
}

/// View-side handle for a request running on a manager thread. Polled once
/// per frame; the receiver is dropped after the first result.
pub struct AsyncData<T> {
    state: DataState<T>,
    receiver: Option<Receiver<Result<T, DataRetrievalError>>>,
}

impl<T> AsyncData<T> {
    pub fn new(receiver: Receiver<Result<T, DataRetrievalError>>) -> Self {
        Self {
            state: DataState::Loading,
            receiver: Some(receiver),
        }
    }

    pub fn poll(&mut self) {
        let Some(rx) = &self.receiver else {
            return;
        };

        match rx.try_recv() {
            Ok(Ok(data)) => {
                self.state = DataState::Loaded(data);
                self.receiver = None;
            }
            Ok(Err(e)) => {
                self.state = DataState::Error(format!("{}", e));
                self.receiver = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.state = DataState::Error("Data fetch failed: worker hung up".to_string());
                self.receiver = None;
            }
        }
    }

    pub fn data(&self) -> Option<&T> {
        match &self.state {
            DataState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, DataState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            DataState::Error(e) => Some(e),
            _ => None,
        }
    }
}
