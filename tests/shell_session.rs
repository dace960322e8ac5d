use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use vshell::audit::read_log;
use vshell::console::run_console;
use vshell::loader::load_archive;
use vshell::{AuditLog, EntryKind, LogEntry, Shell};

fn append_dir(builder: &mut tar::Builder<std::fs::File>, name: &str) {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Directory);
    header.set_size(0);
    header.set_mode(0o755);
    header.set_cksum();
    builder
        .append_data(&mut header, name, std::io::empty())
        .unwrap();
}

fn append_file(builder: &mut tar::Builder<std::fs::File>, name: &str, size: usize) {
    let data = vec![b'.'; size];
    let mut header = tar::Header::new_gnu();
    header.set_size(size as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, name, &data[..]).unwrap();
}

fn write_archive(dir: &Path) -> PathBuf {
    let path = dir.join("fs.tar");
    let file = std::fs::File::create(&path).unwrap();
    let mut builder = tar::Builder::new(file);
    append_dir(&mut builder, "home");
    append_file(&mut builder, "home/file.txt", 42);
    append_dir(&mut builder, "home2");
    append_file(&mut builder, "home2/x", 5);
    append_dir(&mut builder, "etc");
    append_file(&mut builder, "etc/hosts", 100);
    builder.finish().unwrap();
    path
}

#[test]
fn archive_loads_into_absolute_entries() {
    let dir = tempfile::tempdir().unwrap();
    let vfs = load_archive(&write_archive(dir.path())).unwrap();

    assert_eq!(vfs.len(), 6);
    assert_eq!(vfs.kind("/home"), Some(EntryKind::Directory));
    assert_eq!(vfs.kind("/etc/hosts"), Some(EntryKind::File));
    assert_eq!(vfs.total_size("/"), 147);
}

#[test]
fn console_session_writes_audit_log() {
    let dir = tempfile::tempdir().unwrap();
    let vfs = Arc::new(load_archive(&write_archive(dir.path())).unwrap());
    let log_path = dir.path().join("audit.jsonl");
    let audit = AuditLog::create(&log_path).unwrap();
    let mut shell = Shell::new(vfs, audit, "host");

    let input = Cursor::new(
        "ls /home\ndu /home\ncd /home\nls .\ncd /nope\nchmod 755 /home/file.txt\nfoo bar\nuname\nexit\n",
    );
    let mut output = Vec::new();
    run_console(&mut shell, input, &mut output).unwrap();

    let transcript = String::from_utf8(output).unwrap();
    // Prefix matching also lists the sibling /home2 entries.
    assert!(transcript.starts_with("host:/$ /home/file.txt\n/home2\n/home2/x\nhost:/$ 47\t/home\n"));
    assert!(transcript.contains("host:/home$ cd: /nope: No such file or directory\n"));
    assert!(transcript.contains("foo: command not found\n"));
    assert_eq!(shell.current_dir(), "/home");

    assert_eq!(
        read_log(&log_path).unwrap(),
        vec![
            LogEntry::new("ls", "/home"),
            LogEntry::new("du", "/home"),
            LogEntry::new("cd", "/home"),
            LogEntry::new("ls", "/home"),
            LogEntry::new("chmod", "755 /home/file.txt"),
            LogEntry::new("uname", ""),
            LogEntry::new("exit", ""),
        ]
    );
}

#[test]
fn missing_archive_aborts_before_the_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("audit.jsonl");
    let output = Command::new(env!("CARGO_BIN_EXE_vshell"))
        .env("HOME", dir.path())
        .args(["--hostname", "h", "--fs-path"])
        .arg(dir.path().join("missing.tar"))
        .arg("--log-path")
        .arg(&log_path)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.tar"), "stderr was {stderr}");
    assert!(!String::from_utf8_lossy(&output.stdout).contains("h:/$"));
    assert!(!log_path.exists());
}

#[test]
fn required_options_are_enforced() {
    let output = Command::new(env!("CARGO_BIN_EXE_vshell"))
        .args(["--hostname", "h"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn binary_runs_a_console_session() {
    use std::io::Write;
    use std::process::Stdio;

    let dir = tempfile::tempdir().unwrap();
    let archive = write_archive(dir.path());
    let log_path = dir.path().join("audit.jsonl");
    let mut child = Command::new(env!("CARGO_BIN_EXE_vshell"))
        .env("HOME", dir.path())
        .args(["--hostname", "box", "--fs_path"])
        .arg(&archive)
        .arg("--log_path")
        .arg(&log_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"cd etc\ndu\nexit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "box:/$ box:/etc$ 100\t/etc\nbox:/etc$ "
    );
    assert_eq!(read_log(&log_path).unwrap().len(), 3);
}
