pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod state;
mod view;

pub use api::{ApiError, Endpoint, TaskClient};
pub use app::{App, Msg};
pub use state::{Filter, TaskState, TaskStats};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    use sauron::prelude::*;

    console_error_panic_hook::set_once();
    logging::init(tracing::Level::INFO);

    let base_url = config::api_base_url();
    tracing::info!(%base_url, "starting task manager");
    Program::mount_to_body(App::new(TaskClient::new(base_url)));
}
