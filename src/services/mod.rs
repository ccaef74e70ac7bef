use iced::{Subscription, Task};
use std::fmt::Debug;

pub mod compositor;
pub mod names;
pub mod throttle;

pub trait ReadOnlyService: Sized {
    type UpdateEvent: Debug + Clone;
    type Error: Debug + Clone;

    fn update(&mut self, event: Self::UpdateEvent);

    fn subscribe() -> Subscription<ServiceEvent<Self>>;
}

pub trait Service: ReadOnlyService {
    type Command;

    fn command(&mut self, command: Self::Command) -> Task<ServiceEvent<Self>>;
}

#[derive(Debug, Clone)]
pub enum ServiceEvent<S: ReadOnlyService> {
    Init(S),
    Update(S::UpdateEvent),
    Error(S::Error),
}
