//! Interactive menu, the default mode when no subcommand is given.

use std::io::Write;
use std::path::PathBuf;

use console::{Term, style};

use bedrun_platform::codespaces;

use crate::config::LauncherConfig;
use crate::ops;
use crate::runtime::POOL;

pub fn run(cfg: &LauncherConfig) -> anyhow::Result<()> {
    let term = Term::stdout();

    loop {
        render(&term, cfg)?;

        let choice = term.read_line()?;
        match choice.trim() {
            "1" => {
                if let Err(err) = POOL.block_on(ops::run::run(cfg)) {
                    println!("{} {err:#}", style("error:").red().bold());
                }
                pause(&term)?;
            }
            "2" => {
                list_archives(cfg);
                pause(&term)?;
            }
            "3" => {
                if let Err(err) = POOL.block_on(ops::tunnel::prepare(cfg)) {
                    println!("{} {err:#}", style("error:").red().bold());
                }
                pause(&term)?;
            }
            "4" => {
                edit_properties(cfg)?;
                pause(&term)?;
            }
            "5" => {
                match ops::backup::backup_world(cfg) {
                    Ok(Some(path)) => println!("backup written to {}", path.display()),
                    Ok(None) => println!("no worlds to back up yet"),
                    Err(err) => println!("{} {err:#}", style("error:").red().bold()),
                }
                pause(&term)?;
            }
            "6" => {
                match ops::install::reinstall_marker(cfg) {
                    Ok(true) => println!("the server will be reinstalled on the next start"),
                    Ok(false) => println!("no server installed"),
                    Err(err) => println!("{} {err:#}", style("error:").red().bold()),
                }
                pause(&term)?;
            }
            "7" | "q" => {
                println!("bye");
                return Ok(());
            }
            "" => {}
            other => {
                println!("{} '{other}'", style("invalid option").red());
                pause(&term)?;
            }
        }
    }
}

fn render(term: &Term, cfg: &LauncherConfig) -> anyhow::Result<()> {
    term.clear_screen()?;

    let env = if codespaces::detect() {
        "GitHub Codespaces"
    } else {
        "local / VPS"
    };

    println!(
        "{}  {}",
        style("bedrun").bold().cyan(),
        style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
    );
    println!("{}", style("Bedrock dedicated server launcher").dim());
    println!();
    println!("  server version: {}", cfg.version);
    println!("  environment:    {env}");
    println!("  data directory: {}", cfg.data_path().display());
    println!();
    println!("  1. Start server");
    println!("  2. List server archives");
    println!("  3. Configure tunnel");
    println!("  4. Edit server.properties");
    println!("  5. Back up world");
    println!("  6. Reinstall server");
    println!("  7. Quit");
    println!();
    print!("Select option: ");
    std::io::stdout().flush()?;
    Ok(())
}

fn pause(term: &Term) -> anyhow::Result<()> {
    println!();
    println!("{}", style("press enter to continue").dim());
    term.read_line()?;
    Ok(())
}

fn list_archives(cfg: &LauncherConfig) {
    let dirs = [PathBuf::from("."), cfg.data_path()];
    let archives = bedrun_archive::list_archives(&dirs);

    if archives.is_empty() {
        println!("no zip archives found");
        println!(
            "download the server from https://www.minecraft.net/download/server/bedrock and drop \
             the zip here or into {}",
            cfg.data_path().display()
        );
        return;
    }

    println!("zip archives found:");
    for (index, (path, bytes)) in archives.iter().enumerate() {
        let mb = *bytes as f64 / (1024.0 * 1024.0);
        println!("  {}. {} ({mb:.1} MiB)", index + 1, path.display());
    }
}

fn edit_properties(cfg: &LauncherConfig) -> anyhow::Result<()> {
    let path = cfg.data_path().join("server.properties");
    if !path.is_file() {
        println!("server.properties does not exist yet; start the server once to generate it");
        return Ok(());
    }

    let Some(editor) = find_editor() else {
        println!("no editor found; current contents:");
        println!("{}", std::fs::read_to_string(&path)?);
        return Ok(());
    };

    let status = std::process::Command::new(&editor).arg(&path).status()?;
    if status.success() {
        println!("configuration saved");
    } else {
        println!("editor exited with {status}");
    }
    Ok(())
}

fn find_editor() -> Option<PathBuf> {
    if let Ok(editor) = std::env::var("EDITOR")
        && !editor.is_empty()
    {
        return Some(PathBuf::from(editor));
    }
    which::which("nano").or_else(|_| which::which("vi")).ok()
}
