pub mod config;
pub mod routes;

use axum::Router;
use hexvm_control::Dispatcher;

pub use config::{Args, LoadModeArg};
pub use routes::{router, AppState};

/// Build the full application from parsed arguments: one dispatcher, one
/// machine, one router.
pub fn app(args: &Args) -> Router {
    let dispatcher = Dispatcher::new(args.load_mode.into(), args.dump_capacity);
    let state = AppState::new(dispatcher, args.index.as_str());
    router(state, &args.www, args.cors)
}
