use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use tempfile::TempDir;

#[test]
fn command_graft_help() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("nwkgraft")?;
    cmd.arg("graft").arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Graft placed taxa"));
    Ok(())
}

#[test]
fn command_graft_basic() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("nwkgraft")?;
    let output = cmd
        .arg("graft")
        .arg("tests/newick/abc.nwk")
        .arg("tests/placement/basic.txt")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(output.status.success());
    assert_eq!(stdout, "(A,((B,C)L1,p1,p2)PL1,p3)R;\n");

    Ok(())
}

#[test]
fn command_graft_lengths_and_scores() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("nwkgraft")?;
    let output = cmd
        .arg("graft")
        .arg("tests/newick/backbone.nwk")
        .arg("tests/placement/scores.txt")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(
        stdout,
        "((C:0.3,((D:0.1,E:0.2)L2:0.4,q1,q3,q5)PL2)L1:0.1,((B:0.2,(A:0.1,q2)PA)100:0.05,q4)P100,q6)R;\n"
    );

    Ok(())
}

#[test]
fn command_graft_outfile() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let outfile = temp.path().join("grafted.nwk");

    let mut cmd = Command::cargo_bin("nwkgraft")?;
    cmd.arg("graft")
        .arg("tests/newick/abc.nwk")
        .arg("tests/placement/basic.txt")
        .arg(&outfile);
    cmd.assert().success().stdout(predicate::str::is_empty());

    let content = fs::read_to_string(&outfile)?;
    assert_eq!(content, "(A,((B,C)L1,p1,p2)PL1,p3)R;\n");

    Ok(())
}

#[test]
fn command_graft_malformed() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let outfile = temp.path().join("grafted.nwk");
    fs::write(&outfile, "previous\n")?;

    let mut cmd = Command::cargo_bin("nwkgraft")?;
    cmd.arg("graft")
        .arg("tests/newick/abc.nwk")
        .arg("tests/placement/malformed.txt")
        .arg(&outfile);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("line 2"))
        .stderr(predicate::str::contains("onlyonetoken"));

    // the earlier output survives
    assert_eq!(fs::read_to_string(&outfile)?, "previous\n");

    Ok(())
}

#[test]
fn command_graft_unmatched() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("nwkgraft")?;
    let output = cmd
        .arg("graft")
        .arg("tests/newick/abc.nwk")
        .arg("tests/placement/ghost.txt")
        .arg("-v")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;
    let stderr = String::from_utf8(output.stderr)?;

    assert!(output.status.success());
    assert_eq!(stdout, "(A,(B,C)L1)R;\n");
    assert!(stderr.contains("1 anchors not found: GHOST"));

    Ok(())
}

#[test]
fn command_graft_duplicate() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("nwkgraft")?;
    cmd.arg("graft")
        .arg("tests/newick/abc.nwk")
        .arg("tests/placement/dup.txt");
    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Taxon \"B\" already exists"));

    let mut cmd = Command::cargo_bin("nwkgraft")?;
    let output = cmd
        .arg("graft")
        .arg("tests/newick/abc.nwk")
        .arg("tests/placement/dup.txt")
        .arg("--on-duplicate")
        .arg("dedupe")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout, "(A,((B,C)L1,p1)PL1)R;\n");

    let mut cmd = Command::cargo_bin("nwkgraft")?;
    let output = cmd
        .arg("graft")
        .arg("tests/newick/abc.nwk")
        .arg("tests/placement/dup.txt")
        .arg("--on-duplicate")
        .arg("allow")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout, "(A,((B,C)L1,p1)PL1,B)R;\n");

    Ok(())
}

#[test]
fn command_graft_ambiguous() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("nwkgraft")?;
    cmd.arg("graft")
        .arg("tests/newick/support.nwk")
        .arg("stdin")
        .write_stdin("x 95\n");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("matches 2 nodes"));

    let mut cmd = Command::cargo_bin("nwkgraft")?;
    let output = cmd
        .arg("graft")
        .arg("tests/newick/support.nwk")
        .arg("stdin")
        .arg("--allow-ambiguous")
        .arg("--on-duplicate")
        .arg("allow")
        .write_stdin("x 95\n")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout, "(((A,B)95,x)P95,((C,D)95,x)P95)R;\n");

    Ok(())
}

#[test]
fn command_graft_stdin_prefix_indent() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("nwkgraft")?;
    let output = cmd
        .arg("graft")
        .arg("stdin")
        .arg("tests/placement/basic.txt")
        .arg("--prefix")
        .arg("G_")
        .arg("--indent")
        .arg("  ")
        .write_stdin("(A,(B,C)L1)R;")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    let expected = "(\n  A,\n  (\n    (\n      B,\n      C\n    )L1,\n    p1,\n    p2\n  )G_L1,\n  p3\n)R;\n";
    assert_eq!(stdout, expected);

    Ok(())
}

#[test]
fn command_graft_gz() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let placements = temp.path().join("placements.txt.gz");

    let file = fs::File::create(&placements)?;
    let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    encoder.write_all(b"p1 L1\np2 L1\np3 R\n")?;
    encoder.finish()?;

    let mut cmd = Command::cargo_bin("nwkgraft")?;
    let output = cmd
        .arg("graft")
        .arg("tests/newick/abc.nwk")
        .arg(&placements)
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout, "(A,((B,C)L1,p1,p2)PL1,p3)R;\n");

    Ok(())
}

#[test]
fn command_graft_missing_files() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("nwkgraft")?;
    cmd.arg("graft")
        .arg("tests/newick/no_such.nwk")
        .arg("tests/placement/basic.txt");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("could not open"));

    let mut cmd = Command::cargo_bin("nwkgraft")?;
    cmd.arg("graft")
        .arg("tests/newick/abc.nwk")
        .arg("tests/placement/no_such.txt");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("could not open"));

    Ok(())
}

#[test]
fn command_graft_bad_newick() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("nwkgraft")?;
    cmd.arg("graft")
        .arg("stdin")
        .arg("tests/placement/basic.txt")
        .write_stdin("(A,(B,C)L1");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("could not parse the tree in stdin"));

    Ok(())
}

#[test]
fn command_graft_rooting_comment() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("nwkgraft")?;
    let output = cmd
        .arg("graft")
        .arg("tests/newick/rooted.nwk")
        .arg("tests/placement/basic.txt")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(output.status.success());
    assert_eq!(stdout, "[&R] (A,((B,C)L1,p1,p2)PL1,p3)R;\n");

    Ok(())
}

#[test]
fn command_graft_deep_tree() -> anyhow::Result<()> {
    let depth = 20_000;
    let temp = TempDir::new()?;
    let backbone = temp.path().join("deep.nwk");
    fs::write(
        &backbone,
        format!("{}A{};\n", "(".repeat(depth), ")".repeat(depth)),
    )?;

    let mut cmd = Command::cargo_bin("nwkgraft")?;
    let output = cmd
        .arg("graft")
        .arg(&backbone)
        .arg("stdin")
        .write_stdin("p A\n")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(output.status.success());
    assert_eq!(
        stdout,
        format!("{}(A,p)PA{};\n", "(".repeat(depth), ")".repeat(depth))
    );

    Ok(())
}
