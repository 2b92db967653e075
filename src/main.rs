//! lxd_image_builder - builds a cloud-init enabled LXD image.
//!
//! Exits 0 once the image is available under the requested alias, and 1
//! after logging the first fatal error otherwise.

use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = lxd_image_builder::cli::run().await {
        log::error!("{}", e);
        process::exit(1);
    }
}
