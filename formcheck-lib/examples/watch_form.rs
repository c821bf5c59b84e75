//! Watches a small signup form and prints validation feedback.
//!
//! Run with: cargo run --example watch_form
//!
//! Reads the endpoint from FORMCHECK_URL, e.g.
//! `https://app.example.com/users/validate`.

use std::env;
use std::time::Duration;

use formcheck_lib::ValidationCoordinator;
use formcheck_lib::form::FormData;
use formcheck_lib::model::ValidationMethod;
use serde_json::json;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    TermLogger::init(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let url = env::var("FORMCHECK_URL").expect("FORMCHECK_URL not set");

    let form = FormData::from_value(json!({
        "name": "",
        "email": "",
        "password": "",
        "password_confirmation": "",
        "avatar": null,
    }))?;

    let coordinator = ValidationCoordinator::builder()
        .endpoint(url)
        .data(form.clone())
        .group(["password", "password_confirmation"])
        .immediate(["email"])
        .skip(["avatar"])
        .method(ValidationMethod::Post)
        .build()?;

    let _watch = coordinator.watch();
    let mut status = coordinator.subscribe();
    status.wait_for(|status| status.is_initiated()).await?;
    report(&coordinator);

    println!("\nTyping into the form...\n");
    form.set("name", "Ada");
    form.set("email", "ada@example.com");
    tokio::time::sleep(Duration::from_millis(100)).await;
    form.set("password", "hunter2");

    status
        .wait_for(|status| !status.is_dirty() && !status.is_validating())
        .await?;
    report(&coordinator);

    Ok(())
}

fn report(coordinator: &ValidationCoordinator) {
    for field in coordinator.tracked_fields() {
        let state = coordinator.field_state(&field);
        if state.has_errors() {
            println!("  {field}: {}", state.errors.join(" "));
        } else {
            println!("  {field}: ok");
        }
    }

    let passwords = coordinator.group_state(&["password", "password_confirmation"]);
    println!(
        "  passwords: dirty={} errored={} complete={}",
        passwords.dirty, passwords.errored, passwords.complete
    );
    println!("  form valid: {}", coordinator.is_valid());
}
