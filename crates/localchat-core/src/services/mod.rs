//! Services orchestrating domain operations over the ports.

mod chat_service;

pub use chat_service::ChatService;
