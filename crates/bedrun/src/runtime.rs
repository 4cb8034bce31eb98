use once_cell::sync::Lazy;
use tokio::runtime::Runtime;

/// Shared runtime for the sync call sites (menu entries, CLI handlers).
pub static POOL: Lazy<Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_io()
        .enable_time()
        .build()
        .unwrap()
});
