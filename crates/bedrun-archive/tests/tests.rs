use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;

use bedrun_archive::{Error, ensure_executable, extract, inspect};

fn write_server_zip(dir: &Path) -> PathBuf {
    let path = dir.join("bedrock-server-1.21.44.01.zip");
    let file = File::create(&path).expect("create zip");
    let mut writer = zip::ZipWriter::new(file);

    let exec = SimpleFileOptions::default().unix_permissions(0o755);
    writer.start_file("bedrock_server", exec).unwrap();
    writer.write_all(b"\x7fELF not a real server").unwrap();

    let plain = SimpleFileOptions::default();
    writer.start_file("server.properties", plain).unwrap();
    writer.write_all(b"server-name=Dedicated Server\n").unwrap();

    writer.add_directory("behavior_packs", plain).unwrap();
    writer
        .start_file("behavior_packs/vanilla/manifest.json", plain)
        .unwrap();
    writer.write_all(b"{}").unwrap();

    writer.finish().unwrap();
    path
}

#[test]
fn extract_lays_out_the_server_tree() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = write_server_zip(tmp.path());
    let dest = tmp.path().join("bedrock-data");

    let written = extract(&archive, &dest).unwrap();
    assert_eq!(written, 3);
    assert!(dest.join("bedrock_server").is_file());
    assert!(dest.join("server.properties").is_file());
    assert!(dest.join("behavior_packs/vanilla/manifest.json").is_file());
}

#[cfg(unix)]
#[test]
fn extract_preserves_the_exec_bit() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::tempdir().unwrap();
    let archive = write_server_zip(tmp.path());
    let dest = tmp.path().join("bedrock-data");

    extract(&archive, &dest).unwrap();
    let mode = std::fs::metadata(dest.join("bedrock_server"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[cfg(unix)]
#[test]
fn ensure_executable_fixes_stripped_modes() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::tempdir().unwrap();
    let binary = tmp.path().join("bedrock_server");
    std::fs::write(&binary, b"x").unwrap();
    std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o644)).unwrap();

    ensure_executable(&binary).unwrap();
    let mode = std::fs::metadata(&binary).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[test]
fn malicious_entry_does_not_escape() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = tmp.path().join("evil.zip");
    {
        let file = File::create(&archive).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        writer.start_file("../outside.txt", options).unwrap();
        writer.write_all(b"escaped").unwrap();
        writer.finish().unwrap();
    }

    let dest = tmp.path().join("data");
    let result = extract(&archive, &dest);
    assert!(matches!(result, Err(Error::InvalidPath) | Err(Error::ZipSlip { .. })));
    assert!(!tmp.path().join("outside.txt").exists());
}

#[test]
fn inspect_then_extract_workflow() {
    let tmp = tempfile::tempdir().unwrap();
    let archive = write_server_zip(tmp.path());

    let report = inspect(&archive).unwrap();
    report.require_file("bedrock_server").unwrap();

    let dest = tmp.path().join("data");
    extract(&archive, &dest).unwrap();
    assert!(dest.join("bedrock_server").exists());
}
