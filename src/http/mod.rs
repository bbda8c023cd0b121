//! Streaming completion requests over HTTP.
mod payload;
mod session;
mod stream;

#[cfg(test)]
pub(crate) mod test_server;
#[cfg(test)]
mod tests;

pub use payload::{RequestSpec, SEED_SPACE, draw_seeds};
pub use session::{CompletionSession, HttpSession, HttpSessionFactory, SessionFactory};
