//! Interactive tour of the four prompt operations.
//!
//! Run with `RUST_LOG=trace` to watch raw-mode transitions.

use askline::prelude::*;

fn main() -> Result<(), PromptError> {
    env_logger::init();

    let name = TextPrompt::new()
        .with_label("Name: ")
        .with_fail_message("A name is required.")
        .require_non_empty()
        .read()?;
    println!("Hello, {}!", name);

    let secret = MaskedPrompt::new()
        .with_label("Password: ")
        .with_mask_char('*')
        .with_fail_message("At least 4 characters.")
        .with_validator(|s: &str| s.chars().count() >= 4)
        .read()?;
    println!("Got {} characters.", secret.chars().count());

    let hidden = MaskedPrompt::new()
        .with_label("Again (no echo this time): ")
        .read()?;
    println!(
        "Inputs {}.",
        if hidden == secret { "match" } else { "differ" }
    );

    let choice = SelectMenu::new(["red", "green", "blue"]).select_label()?;
    println!("You picked {}.", choice);

    wait_for_key("Press any key to exit...")?;
    println!();
    Ok(())
}
