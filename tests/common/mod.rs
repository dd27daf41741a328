#![allow(dead_code)]

use std::path::{Path, PathBuf};

use wktriage::config::Config;

/// Sensible default `Config` for tests. Callers override fields via struct
/// update syntax or plain assignment.
pub fn default_test_config(results: &Path, generated: &Path, layout: &Path) -> Config {
    Config {
        results_dir: results.to_path_buf(),
        generated_dir: generated.to_path_buf(),
        layout_tests_dir: layout.to_path_buf(),
        workers: 4,
        history_command: "svn".to_string(),
        history_retries: 3,
        history_backoff_ms: 1,
        history_timeout: Some(10),
        capture_command: "adb".to_string(),
        symbolizer_command: "vendor/google/tools/stack".to_string(),
        android_root: None,
        changeset_url: "http://trac.webkit.org/changeset/".to_string(),
        skip_diagnostics: true,
    }
}

/// Write an executable shell script into `dir` and return its path.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    path
}

/// Stub history command: emits a fixed svn-log-shaped history keyed on the
/// base name of the file path it is invoked with.
pub fn write_history_stub(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "fake-svn",
        r#"for last; do :; done
case "$last" in
  *crash-foo.html)
    echo '------------------------------------------------------------------------'
    echo 'r10 | alice | 2014-02-01'
    echo 'r5 | bob | 2014-01-01'
    ;;
  *other.html)
    echo 'r7 | carol | 2014-01-15'
    ;;
  *)
    exit 1
    ;;
esac
"#,
    )
}

/// Lay out a result set, a generated source, and a content-test tree for one
/// failing test (`WebkitCrashFooTest` generated from `crash-foo.html`).
pub fn setup_single_failure(root: &Path) -> (PathBuf, PathBuf, PathBuf) {
    let results = root.join("results/2014.03.01_00.00.00");
    std::fs::create_dir_all(&results).unwrap();
    std::fs::write(
        results.join("testResult.xml"),
        r#"<TestResult>
  <TestPackage>
    <TestCase name="WebkitCrashFooTest">
      <Test name="testWebViewLoad" result="fail"/>
    </TestCase>
    <TestCase name="WebkitPassingTest">
      <Test name="testWebViewLoad" result="pass"/>
    </TestCase>
  </TestPackage>
</TestResult>
"#,
    )
    .unwrap();

    let generated = root.join("generated");
    std::fs::create_dir_all(&generated).unwrap();
    std::fs::write(
        generated.join("WebkitCrashFooTest.java"),
        "public class WebkitCrashFooTest {\n    private static final String TEST_PATH = \"fast/frames/crash-foo.html\";\n}\n",
    )
    .unwrap();

    let layout = root.join("LayoutTests");
    std::fs::create_dir_all(layout.join("fast/frames")).unwrap();
    std::fs::write(
        layout.join("fast/frames/crash-foo.html"),
        "<html><body>boom</body></html>",
    )
    .unwrap();

    (root.join("results"), generated, layout)
}
