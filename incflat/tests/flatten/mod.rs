//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

struct TestPlan {
    args: Vec<String>,
    expected_out: String,
    expected_err: String,
    expected_exit_code: i32,
}

fn run_test_base(args: &[String]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_incflat"))
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("failed to run incflat")
}

fn run_test(plan: TestPlan) {
    let output = run_test_base(&plan.args);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, plan.expected_out);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr, plan.expected_err);

    assert_eq!(output.status.code(), Some(plan.expected_exit_code));
}

fn run_test_with_checker<F: FnMut(&TestPlan, &Output)>(plan: TestPlan, mut checker: F) {
    let output = run_test_base(&plan.args);
    checker(&plan, &output);
}

/// Source files laid out in a scratch directory.
struct ShaderTree {
    dir: TempDir,
}

impl ShaderTree {
    fn new(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        Self { dir }
    }

    fn root(&self) -> PathBuf {
        fs::canonicalize(self.dir.path()).unwrap()
    }

    fn path(&self, name: &str) -> String {
        self.root().join(name).to_string_lossy().into_owned()
    }
}

fn flatten_test(args: &[&str], expected_output: &str) {
    run_test(TestPlan {
        args: args.iter().map(|s| String::from(*s)).collect(),
        expected_out: String::from(expected_output),
        expected_err: String::new(),
        expected_exit_code: 0,
    });
}

fn failing_test(args: &[&str], expected_output: &str, err_fragment: &str) {
    let plan = TestPlan {
        args: args.iter().map(|s| String::from(*s)).collect(),
        expected_out: String::from(expected_output),
        expected_err: String::from(err_fragment),
        expected_exit_code: 1,
    };
    run_test_with_checker(plan, |plan, output| {
        assert_eq!(String::from_utf8_lossy(&output.stdout), plan.expected_out);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(
            stderr.contains(&plan.expected_err),
            "stderr {stderr:?} lacks {:?}",
            plan.expected_err
        );
        assert_eq!(output.status.code(), Some(plan.expected_exit_code));
    });
}

#[test]
fn test_include_precedes_body() {
    let tree = ShaderTree::new(&[
        ("a.wgsl", "#include \"b.wgsl\"\nfn a() {}\n"),
        ("b.wgsl", "fn b() {}\n"),
    ]);
    flatten_test(&[&tree.path("a.wgsl")], "fn b() {}\nfn a() {}\n");
}

#[test]
fn test_cycle_emits_each_file_once() {
    let tree = ShaderTree::new(&[
        ("a.wgsl", "#include \"b.wgsl\"\nfn a() {}\n"),
        ("b.wgsl", "#include \"a.wgsl\"\nfn b() {}\n"),
    ]);
    flatten_test(&[&tree.path("a.wgsl")], "fn b() {}\nfn a() {}\n");
}

#[test]
fn test_shared_include_emitted_deepest() {
    let tree = ShaderTree::new(&[
        (
            "a.wgsl",
            "#include \"b.wgsl\"\n#include \"c.wgsl\"\nfn a() {}\n",
        ),
        ("b.wgsl", "fn b() {}\n"),
        ("c.wgsl", "#include \"b.wgsl\"\nfn c() {}\n"),
    ]);
    flatten_test(&[&tree.path("a.wgsl")], "fn b() {}\nfn c() {}\nfn a() {}\n");
}

#[test]
fn test_late_include_missed() {
    let tree = ShaderTree::new(&[
        ("a.wgsl", "l1\nl2\nl3\nl4\nl5\nl6\n#include \"b.wgsl\"\nl8\n"),
        ("b.wgsl", "fn b() {}\n"),
    ]);
    flatten_test(&[&tree.path("a.wgsl")], "l1\nl2\nl3\nl4\nl5\nl6\nl8\n");
}

#[test]
fn test_scan_limit_zero_finds_late_include() {
    let tree = ShaderTree::new(&[
        ("a.wgsl", "l1\nl2\nl3\nl4\nl5\nl6\n#include \"b.wgsl\"\nl8\n"),
        ("b.wgsl", "fn b() {}\n"),
    ]);
    flatten_test(
        &["--scan-limit", "0", &tree.path("a.wgsl")],
        "fn b() {}\nl1\nl2\nl3\nl4\nl5\nl6\nl8\n",
    );
}

#[test]
fn test_include_mentions_stripped() {
    let tree = ShaderTree::new(&[(
        "a.wgsl",
        "// uses #include for sharing\nlet x = 1;\n  #include \"not-a-directive.wgsl\"\n",
    )]);
    flatten_test(&[&tree.path("a.wgsl")], "let x = 1;\n");
}

#[test]
fn test_nested_directories() {
    let tree = ShaderTree::new(&[
        ("main.wgsl", "#include \"lib/light.wgsl\"\nfn main() {}\n"),
        ("lib/light.wgsl", "#include \"../common.wgsl\"\nfn light() {}\n"),
        ("common.wgsl", "const PI: f32 = 3.14159;\n"),
    ]);
    flatten_test(
        &[&tree.path("main.wgsl")],
        "const PI: f32 = 3.14159;\nfn light() {}\nfn main() {}\n",
    );
}

#[test]
fn test_malformed_directive_warns() {
    let tree = ShaderTree::new(&[
        ("a.wgsl", "#include \"b.wgsl\n#include \"c.wgsl\"\nfn a() {}\n"),
        ("c.wgsl", "fn c() {}\n"),
    ]);
    let a = tree.path("a.wgsl");
    run_test(TestPlan {
        args: vec![a.clone()],
        expected_out: String::from("fn c() {}\nfn a() {}\n"),
        expected_err: format!(
            "incflat: {}:1: malformed #include directive: #include \"b.wgsl\n",
            a
        ),
        expected_exit_code: 0,
    });
}

#[test]
fn test_output_file() {
    let tree = ShaderTree::new(&[
        ("a.wgsl", "#include \"b.wgsl\"\nfn a() {}\n"),
        ("b.wgsl", "fn b() {}\n"),
    ]);
    let out = tree.path("flat.wgsl");
    flatten_test(&[&tree.path("a.wgsl"), &out], "");
    assert_eq!(fs::read_to_string(out).unwrap(), "fn b() {}\nfn a() {}\n");
}

#[test]
fn test_output_file_truncated() {
    let tree = ShaderTree::new(&[
        ("a.wgsl", "fn a() {}\n"),
        ("flat.wgsl", "stale content that is longer than the output\n"),
    ]);
    let out = tree.path("flat.wgsl");
    flatten_test(&[&tree.path("a.wgsl"), &out], "");
    assert_eq!(fs::read_to_string(out).unwrap(), "fn a() {}\n");
}

#[test]
fn test_unwritable_output() {
    let tree = ShaderTree::new(&[("a.wgsl", "fn a() {}\n")]);
    failing_test(
        &[&tree.path("a.wgsl"), &tree.path("no/such/dir/flat.wgsl")],
        "",
        "cannot open output file",
    );
}

#[test]
fn test_no_arguments() {
    failing_test(&[], "", "Usage:");
}

#[test]
fn test_too_many_arguments() {
    let tree = ShaderTree::new(&[("a.wgsl", "fn a() {}\n")]);
    let out = tree.path("flat.wgsl");
    failing_test(
        &[&tree.path("a.wgsl"), &out, &tree.path("extra.wgsl")],
        "",
        "Usage:",
    );
    assert!(!PathBuf::from(out).exists());
}

#[test]
fn test_missing_input() {
    let tree = ShaderTree::new(&[]);
    let out = tree.path("flat.wgsl");
    failing_test(
        &[&tree.path("missing.wgsl"), &out],
        "",
        "cannot resolve input file",
    );
    assert!(!PathBuf::from(out).exists());
}

#[test]
fn test_missing_include_exits_nonzero() {
    let tree = ShaderTree::new(&[
        ("a.wgsl", "#include \"x.wgsl\"\n#include \"b.wgsl\"\nfn a() {}\n"),
        ("b.wgsl", "#include \"gone.wgsl\"\nfn b() {}\n"),
        ("x.wgsl", "fn x() {}\n"),
    ]);
    failing_test(&[&tree.path("a.wgsl")], "fn x() {}\n", "cannot open ");
}

#[test]
fn test_directory_option() {
    let tree = ShaderTree::new(&[
        ("shaders/a.wgsl", "#include \"b.wgsl\"\nfn a() {}\n"),
        ("shaders/b.wgsl", "fn b() {}\n"),
    ]);
    let root = tree.root().to_string_lossy().into_owned();
    flatten_test(
        &["-C", &root, "shaders/a.wgsl"],
        "fn b() {}\nfn a() {}\n",
    );
}

#[test]
fn test_list() {
    let tree = ShaderTree::new(&[
        ("a.wgsl", "#include \"b.wgsl\"\n#include \"c.wgsl\"\n"),
        ("b.wgsl", ""),
        ("c.wgsl", "#include \"b.wgsl\"\n"),
    ]);
    flatten_test(
        &["--list", &tree.path("a.wgsl")],
        &format!(
            "{}\n{}\n{}\n",
            tree.path("b.wgsl"),
            tree.path("c.wgsl"),
            tree.path("a.wgsl")
        ),
    );
}

#[test]
fn test_max_depth() {
    let tree = ShaderTree::new(&[
        ("a.wgsl", "#include \"b.wgsl\"\nfn a() {}\n"),
        ("b.wgsl", "#include \"c.wgsl\"\nfn b() {}\n"),
        ("c.wgsl", "fn c() {}\n"),
    ]);
    failing_test(
        &["--max-depth", "1", &tree.path("a.wgsl")],
        "",
        "include depth exceeds 1",
    );
}
