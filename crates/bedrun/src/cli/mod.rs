pub use app::{App, Commands};

mod app;

use tracing::info;

use crate::config::LauncherConfig;
use crate::runtime::POOL;
use crate::{menu, ops};

pub fn dispatch(app: App) -> anyhow::Result<()> {
    let cfg = LauncherConfig::load(app.config.as_deref())?;

    match app.cmd.unwrap_or(Commands::Menu) {
        Commands::Run => POOL.block_on(ops::run::run(&cfg)),
        Commands::Menu => menu::run(&cfg),
        Commands::Install(arg) => {
            let outcome = POOL.block_on(ops::install::ensure_server(&cfg, arg.force))?;
            info!(?outcome, "install finished");
            Ok(())
        }
        Commands::Backup => ops::backup::backup_world(&cfg).map(|_| ()),
        Commands::Tunnel => POOL.block_on(ops::tunnel::prepare(&cfg)),
        Commands::Properties => ops::install::write_properties(&cfg),
    }
}
