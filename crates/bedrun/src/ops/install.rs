use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, warn};

use bedrun_fetch::{Fetcher, fetch_first};

use crate::config::{LauncherConfig, SERVER_BINARY};
use crate::ui::DownloadTracker;

/// Where the server installation came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstallOutcome {
    AlreadyInstalled,
    FromLocalArchive(PathBuf),
    Downloaded,
}

/// Create the data directory and report free disk space.
pub fn prepare_environment(cfg: &LauncherConfig) -> anyhow::Result<PathBuf> {
    let data = cfg.data_path();
    bedrun_platform::dir::prepare(&data).context("preparing data directory")?;

    if let Some(free) = bedrun_platform::dir::free_space_gb(&data) {
        info!("free disk space: {free:.1} GiB");
        if free < 1.0 {
            warn!("low disk space; the server archive needs roughly 1 GiB");
        }
    }
    Ok(data)
}

/// Make sure the server binary exists in the data directory.
///
/// Resolution order: already installed, then a manually uploaded archive,
/// then the mirror download. Every archive is validated before extraction.
pub async fn ensure_server(cfg: &LauncherConfig, force: bool) -> anyhow::Result<InstallOutcome> {
    let data = prepare_environment(cfg)?;
    let binary = data.join(SERVER_BINARY);

    if binary.is_file() {
        if force {
            bedrun_archive::remove_installed(&binary)?;
            info!("removed installed server for reinstall");
        } else {
            info!("server already installed");
            return Ok(InstallOutcome::AlreadyInstalled);
        }
    }

    // A manually uploaded archive needs no network at all.
    let search = [PathBuf::from("."), data.clone()];
    if let Some(archive) = bedrun_archive::locate_archive(&search) {
        install_from_archive(cfg, &archive)?;
        return Ok(InstallOutcome::FromLocalArchive(archive));
    }

    let urls = cfg.mirror_urls();
    let dest = data.join(cfg.archive_file_name());
    let tracker = DownloadTracker::new(cfg.archive_file_name());
    let fetcher = Fetcher::new(cfg.client_setting().build()?);
    let options = cfg
        .archive_fetch_options()
        .on_progress(tracker.progress_fn());

    let downloaded = fetch_first(&fetcher, &urls, &dest, &options).await;
    match &downloaded {
        Ok(_) => tracker.finish("download complete"),
        Err(_) => tracker.abandon(),
    }
    downloaded.context("downloading the server archive from all mirrors")?;

    install_from_archive(cfg, &dest)?;
    // The archive is re-downloadable; keep the data dir tidy.
    std::fs::remove_file(&dest).context("removing the downloaded archive")?;
    Ok(InstallOutcome::Downloaded)
}

fn install_from_archive(cfg: &LauncherConfig, archive: &std::path::Path) -> anyhow::Result<()> {
    let report = bedrun_archive::inspect(archive)
        .with_context(|| format!("validating {}", archive.display()))?;
    report.require_file(SERVER_BINARY)?;
    info!(
        archive = %archive.display(),
        files = report.file_names.len(),
        bytes = report.total_bytes,
        "archive validated"
    );

    let data = cfg.data_path();
    bedrun_archive::extract(archive, &data)?;
    bedrun_archive::ensure_executable(&cfg.server_binary_path())?;
    info!("server installed");
    Ok(())
}

/// Render `server.properties`, preserving values the operator already set.
pub fn write_properties(cfg: &LauncherConfig) -> anyhow::Result<()> {
    let path = cfg.data_path().join("server.properties");
    let mut props = cfg.properties();

    if path.is_file() {
        let existing = std::fs::read_to_string(&path)?;
        props
            .merge_existing(&existing)
            .context("merging existing server.properties")?;
    }

    props.save(&path)?;
    info!(path = %path.display(), "server.properties written");
    Ok(())
}

/// Drop the installed binary so the next start reinstalls. The world and
/// configuration files are left alone.
pub fn reinstall_marker(cfg: &LauncherConfig) -> anyhow::Result<bool> {
    let removed = bedrun_archive::remove_installed(&cfg.server_binary_path())?;
    if removed {
        info!("server removed; it will be reinstalled on the next start");
    } else {
        info!("no server installed");
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::POOL;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn config_in(dir: &std::path::Path) -> LauncherConfig {
        let mut cfg = LauncherConfig::default();
        cfg.data_dir = dir.join("bedrock-data").to_string_lossy().into_owned();
        cfg
    }

    fn write_archive(path: &std::path::Path) {
        let file = std::fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let exec = SimpleFileOptions::default().unix_permissions(0o755);
        writer.start_file("bedrock_server", exec).unwrap();
        writer.write_all(b"#!/bin/sh\nexit 0\n").unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn local_archive_installs_without_network() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        prepare_environment(&cfg).unwrap();
        write_archive(&cfg.data_path().join("bedrock-server.zip"));

        let outcome = POOL.block_on(ensure_server(&cfg, false)).unwrap();
        assert!(matches!(outcome, InstallOutcome::FromLocalArchive(_)));
        assert!(cfg.server_binary_path().is_file());
    }

    #[test]
    fn second_install_is_a_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        prepare_environment(&cfg).unwrap();
        write_archive(&cfg.data_path().join("bedrock-server.zip"));

        POOL.block_on(ensure_server(&cfg, false)).unwrap();
        let outcome = POOL.block_on(ensure_server(&cfg, false)).unwrap();
        assert_eq!(outcome, InstallOutcome::AlreadyInstalled);
    }

    #[test]
    fn force_reinstalls_from_the_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        prepare_environment(&cfg).unwrap();
        write_archive(&cfg.data_path().join("bedrock-server.zip"));

        POOL.block_on(ensure_server(&cfg, false)).unwrap();
        let outcome = POOL.block_on(ensure_server(&cfg, true)).unwrap();
        assert!(matches!(outcome, InstallOutcome::FromLocalArchive(_)));
    }

    #[test]
    fn invalid_local_archive_fails_validation() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        prepare_environment(&cfg).unwrap();
        // Valid zip, but no server binary inside.
        let path = cfg.data_path().join("bedrock-server.zip");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file("readme.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"not a server").unwrap();
        writer.finish().unwrap();

        let err = POOL.block_on(ensure_server(&cfg, false)).unwrap_err();
        assert!(err.to_string().contains("bedrock_server"));
    }

    #[test]
    fn properties_written_and_operator_edits_kept() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        prepare_environment(&cfg).unwrap();

        write_properties(&cfg).unwrap();
        let path = cfg.data_path().join("server.properties");
        let first = std::fs::read_to_string(&path).unwrap();
        assert!(first.contains("server-port=19132"));

        // Operator flips the gamemode; a rewrite must keep it.
        std::fs::write(&path, first.replace("gamemode=survival", "gamemode=creative")).unwrap();
        write_properties(&cfg).unwrap();
        let second = std::fs::read_to_string(&path).unwrap();
        assert!(second.contains("gamemode=creative"));
    }

    #[test]
    fn reinstall_marker_reports_state() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());
        prepare_environment(&cfg).unwrap();

        assert!(!reinstall_marker(&cfg).unwrap());
        std::fs::write(cfg.server_binary_path(), b"x").unwrap();
        assert!(reinstall_marker(&cfg).unwrap());
    }
}
