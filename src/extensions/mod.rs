mod listeners;

pub use listeners::{
    EmittedEvent, InteractionEvent, InteractionListener, ListenerContext, ListenerSet,
};
