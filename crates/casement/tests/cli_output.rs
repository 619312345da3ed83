//! Integration tests for CLI output behavior
//!
//! The default behavior is quiet (no logs). Use -v/--verbose to enable logs.
//! Every test points HOME, the working directory and `--runtime-dir` at a
//! temp dir so it never touches a real host.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    fn runtime_dir(&self) -> PathBuf {
        self.dir.path().join("run")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_casement"));
        cmd.env("HOME", self.dir.path())
            .env_remove("CASEMENT_ENV")
            .env_remove("RUST_LOG")
            .current_dir(self.dir.path())
            .arg("--runtime-dir")
            .arg(self.runtime_dir());
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command()
            .args(args)
            .output()
            .expect("Failed to execute casement")
    }

    fn spawn_host(&self) -> Child {
        let child = self
            .command()
            .arg("run")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn 'casement run'");
        wait_for(&self.runtime_dir().join("bridge.sock"));
        child
    }
}

fn wait_for(path: &Path) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !path.exists() {
        assert!(
            Instant::now() < deadline,
            "timed out waiting for {}",
            path.display()
        );
        thread::sleep(Duration::from_millis(50));
    }
}

fn wait_for_exit(mut child: Child) -> Output {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        if child.try_wait().expect("Failed to poll host").is_some() {
            return child.wait_with_output().expect("Failed to collect host output");
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            panic!("host did not exit after quit");
        }
        thread::sleep(Duration::from_millis(50));
    }
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

// =============================================================================
// No running host
// =============================================================================

#[test]
fn test_invoke_without_host_fails_cleanly() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["invoke", "app:getTitle"]);

    assert!(!output.status.success());

    let stdout = stdout_of(&output);
    let stderr = stderr_of(&output);
    assert!(
        stdout.is_empty(),
        "stdout should be empty on connection failure, got: {}",
        stdout
    );
    assert!(
        stderr.contains("not running"),
        "stderr should explain the host is not running, got: {}",
        stderr
    );
}

#[test]
fn test_default_mode_suppresses_info_logs() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["quit"]);

    let stderr = stderr_of(&output);
    assert!(
        !stderr.contains(r#""level":"INFO""#),
        "Default mode should suppress INFO logs, but stderr contains: {}",
        stderr
    );
    assert!(
        !stderr.contains(r#""level":"WARN""#),
        "Default mode should suppress WARN logs, but stderr contains: {}",
        stderr
    );
}

#[test]
fn test_verbose_flag_emits_info_logs() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["windows", "-v"]);

    let stderr = stderr_of(&output);
    assert!(
        stderr.contains(r#""level":"INFO""#),
        "Verbose mode should emit INFO logs, but stderr is: {}",
        stderr
    );
    assert!(
        stderr.contains("cli.windows_started"),
        "Verbose mode should log the command start, but stderr is: {}",
        stderr
    );
}

#[test]
fn test_completions_bash() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["completions", "bash"]);

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("casement"));
}

// =============================================================================
// Against a running host
// =============================================================================

#[test]
fn test_host_round_trip() {
    let sandbox = Sandbox::new();
    let host = sandbox.spawn_host();

    let title = sandbox.run(&["invoke", "app:getTitle"]);
    assert!(
        title.status.success(),
        "invoke failed: {}",
        stderr_of(&title)
    );
    let envelope: serde_json::Value =
        serde_json::from_str(&stdout_of(&title)).expect("stdout should be the envelope JSON");
    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["data"], "Casement Desktop App");

    let created = sandbox.run(&["invoke", "window:createChild", "settings"]);
    assert!(
        created.status.success(),
        "createChild failed: {}",
        stderr_of(&created)
    );

    let windows = sandbox.run(&["windows"]);
    assert!(windows.status.success());
    let listing = stdout_of(&windows);
    assert!(listing.contains("main"), "got: {}", listing);
    assert!(listing.contains("settings"), "got: {}", listing);

    let quit = sandbox.run(&["quit"]);
    assert!(quit.status.success(), "quit failed: {}", stderr_of(&quit));
    assert!(stdout_of(&quit).contains("Quit requested."));

    let host_output = wait_for_exit(host);
    assert!(
        host_output.status.success(),
        "host exited with {:?}: {}",
        host_output.status.code(),
        stderr_of(&host_output)
    );
    assert!(stdout_of(&host_output).contains("Host stopped."));
    assert!(!sandbox.runtime_dir().join("bridge.sock").exists());
}

#[test]
fn test_failed_command_prints_envelope_and_exits_nonzero() {
    let sandbox = Sandbox::new();
    let host = sandbox.spawn_host();

    let output = sandbox.run(&["invoke", "window:teleport"]);
    assert!(!output.status.success());

    let envelope: serde_json::Value =
        serde_json::from_str(&stdout_of(&output)).expect("stdout should be the envelope JSON");
    assert_eq!(envelope["success"], false);
    assert!(envelope.get("data").is_none());
    assert!(
        envelope["error"]
            .as_str()
            .unwrap_or_default()
            .contains("window:teleport")
    );

    sandbox.run(&["quit"]);
    wait_for_exit(host);
}

#[test]
fn test_second_run_defers_to_running_host() {
    let sandbox = Sandbox::new();
    let host = sandbox.spawn_host();

    let second = sandbox.run(&["run"]);
    assert!(
        second.status.success(),
        "second instance should exit cleanly: {}",
        stderr_of(&second)
    );
    assert!(stdout_of(&second).contains("Already running"));

    // The first host is still serving
    let windows = sandbox.run(&["windows", "--json"]);
    assert!(windows.status.success());
    let list: serde_json::Value = serde_json::from_str(&stdout_of(&windows)).unwrap();
    assert_eq!(list[0]["id"], "main");

    sandbox.run(&["quit"]);
    wait_for_exit(host);
}
