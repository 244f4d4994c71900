//! Host environment isolation.
//!
//! Kept in its own test binary: `set_var` races with any concurrent
//! process spawn, and this is the only test here.

#![cfg(unix)]

use snipbox_core::compile::Artifact;
use snipbox_core::execute::SandboxExecutor;
use snipbox_core::source::EntryPoint;

#[tokio::test]
async fn test_environment_is_cleared() {
    // SAFETY: this binary runs a single test on a current-thread runtime,
    // and nothing has spawned or read the environment yet.
    unsafe {
        std::env::set_var("SNIPBOX_HOST_SECRET", "hunter2");
    }

    let artifact = Artifact::new(
        b"#!/bin/sh\nprintf \"[$SNIPBOX_HOST_SECRET|$HOME]\"\n".to_vec(),
        Some(EntryPoint::Plain),
    );
    let outcome = SandboxExecutor::default().execute(&artifact).await.unwrap();

    let output = outcome.captured_output();
    assert!(output.starts_with("[|"), "host variable leaked: {output}");
    assert!(output.contains("snipbox-unit-"), "HOME is not the unit: {output}");
}
