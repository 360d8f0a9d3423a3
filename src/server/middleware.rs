//! Built-in middleware.

use std::time::Instant;
use log::info;

use crate::server::context::Context;

/// Log every request with its status and the time the rest of the chain took.
///
/// Produces lines such as `[200] /hello?name=tutu in 48.2µs`.
pub fn logger() -> impl Fn(&mut Context) + Send + Sync + 'static {
    |c: &mut Context| {
        let start = Instant::now();
        c.next();
        info!(
            "[{}] {} in {:?}",
            c.status_code().as_u16(),
            c.request().uri(),
            start.elapsed()
        );
    }
}
