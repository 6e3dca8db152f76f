//! End-to-end tests for the four prompt operations, driven through the
//! scripted console backend.

use askline::prelude::*;
use askline_io::{ConsoleOp, ScriptedConsole};

// --- validated line input ---

#[test]
fn text_prompt_returns_first_line_with_no_validators() {
    let console = ScriptedConsole::new();
    console.push_line("");

    let value = TextPrompt::new().read_from(&console).unwrap();
    assert_eq!(value, "");
}

#[test]
fn text_prompt_requires_every_validator_to_accept() {
    let console = ScriptedConsole::new();
    console.push_line("toolong");
    console.push_line("");
    console.push_line("ok");

    let value = TextPrompt::new()
        .with_fail_message("bad")
        .require_non_empty()
        .with_validator(|s: &str| s.len() <= 4)
        .read_from(&console)
        .unwrap();

    // "toolong" fails the length check, "" fails non-empty, "ok" passes both
    assert_eq!(value, "ok");
    assert_eq!(console.count_written("bad"), 2);
}

#[test]
fn text_prompt_retry_scenario_displays_label_twice_and_fail_once() {
    let console = ScriptedConsole::new();
    console.push_line("");
    console.push_line("Alice");

    let value = TextPrompt::new()
        .with_label("Name: ")
        .with_fail_message("Required.")
        .require_non_empty()
        .read_from(&console)
        .unwrap();

    assert_eq!(value, "Alice");
    assert_eq!(console.count_written("Name: "), 2);
    assert_eq!(console.count_written("Required."), 1);
}

#[test]
fn text_prompt_reports_eof_when_input_runs_out() {
    let console = ScriptedConsole::new();
    let result = TextPrompt::new().read_from(&console);
    assert!(matches!(result, Err(PromptError::Eof)));
}

#[test]
fn text_prompt_eof_after_rejected_lines() {
    let console = ScriptedConsole::new();
    console.push_line("");

    let result = TextPrompt::new().require_non_empty().read_from(&console);
    assert!(matches!(result, Err(PromptError::Eof)));
}

// --- masked input ---

#[test]
fn masked_prompt_echoes_one_glyph_per_character() {
    let console = ScriptedConsole::new();
    console.push_text("ab");
    console.push_key(Key::Enter);

    let value = MaskedPrompt::new()
        .with_mask_char('*')
        .read_from(&console)
        .unwrap();

    assert_eq!(value, "ab");
    assert_eq!(console.count_written("*"), 2);
    let visible = console.visible_output();
    assert!(!visible.contains('a'));
    assert!(!visible.contains('b'));
}

#[test]
fn masked_prompt_hidden_mode_produces_no_glyphs() {
    let console = ScriptedConsole::new();
    console.push_text("pw");
    console.push_key(Key::Enter);

    let value = MaskedPrompt::new().read_from(&console).unwrap();

    assert_eq!(value, "pw");
    // Nothing visible except the newline that ends the read
    assert_eq!(console.visible_output(), "\r\n");
}

#[test]
fn masked_prompt_ignores_control_characters() {
    let console = ScriptedConsole::new();
    console.push_event(KeyEvent::simple(Key::ControlA, vec![0x01]));
    console.push_event(KeyEvent::with_text(
        Key::NotDefined,
        vec![0xc2, 0x85],
        "\u{85}".to_string(), // C1 range, excluded even though it has text
    ));
    console.push_text("x");
    console.push_key(Key::Enter);

    let value = MaskedPrompt::new()
        .with_mask_char('*')
        .read_from(&console)
        .unwrap();

    assert_eq!(value, "x");
    assert_eq!(console.count_written("*"), 1);
}

#[test]
fn masked_prompt_enter_is_not_appended_and_breaks_line() {
    let console = ScriptedConsole::new();
    console.push_text("a");
    console.push_key(Key::Enter);

    let value = MaskedPrompt::new()
        .with_mask_char('*')
        .read_from(&console)
        .unwrap();

    assert_eq!(value, "a");
    assert!(console.visible_output().ends_with("\r\n"));
}

#[test]
fn masked_prompt_retries_until_validators_accept() {
    let console = ScriptedConsole::new();
    console.push_key(Key::Enter); // empty attempt
    console.push_text("pw");
    console.push_key(Key::Enter);

    let value = MaskedPrompt::new()
        .with_label("> ")
        .with_fail_message("need input")
        .require_non_empty()
        .read_from(&console)
        .unwrap();

    assert_eq!(value, "pw");
    assert_eq!(console.count_written("> "), 2);
    assert_eq!(console.count_written("need input"), 1);
}

#[test]
fn masked_prompt_accepts_non_ascii_characters() {
    let console = ScriptedConsole::new();
    console.push_text("héllo");
    console.push_key(Key::Enter);

    let value = MaskedPrompt::new()
        .with_mask_char('*')
        .read_from(&console)
        .unwrap();

    assert_eq!(value, "héllo");
    assert_eq!(console.count_written("*"), 5);
}

#[test]
fn masked_prompt_restores_raw_mode_on_success() {
    let console = ScriptedConsole::new();
    console.push_key(Key::Enter);

    MaskedPrompt::new().read_from(&console).unwrap();
    assert!(!console.raw_mode_active());
}

#[test]
fn masked_prompt_restores_raw_mode_on_interrupt() {
    let console = ScriptedConsole::new();
    console.push_text("a");
    console.push_key(Key::ControlC);

    let result = MaskedPrompt::new().read_from(&console);
    assert!(matches!(result, Err(PromptError::Interrupted)));
    assert!(!console.raw_mode_active());
}

#[test]
fn masked_prompt_reports_eof() {
    let console = ScriptedConsole::new();
    console.push_text("ab"); // never followed by Enter

    let result = MaskedPrompt::new().read_from(&console);
    assert!(matches!(result, Err(PromptError::Eof)));
    assert!(!console.raw_mode_active());
}

// --- menu selection ---

#[test]
fn menu_returns_zero_without_navigation() {
    let console = ScriptedConsole::new();
    console.push_key(Key::Enter);

    let menu = SelectMenu::new(["a", "b", "c"]);
    assert_eq!(menu.select_from(&console).unwrap(), 0);
}

#[test]
fn menu_moves_right_once_per_press() {
    for k in 0..3usize {
        let console = ScriptedConsole::new();
        for _ in 0..k {
            console.push_key(Key::Right);
        }
        console.push_key(Key::Enter);

        let menu = SelectMenu::new(["a", "b", "c"]);
        assert_eq!(menu.select_from(&console).unwrap(), k);
    }
}

#[test]
fn menu_clamps_at_both_ends() {
    let console = ScriptedConsole::new();
    for _ in 0..10 {
        console.push_key(Key::Right);
    }
    console.push_key(Key::Enter);
    let menu = SelectMenu::new(["a", "b", "c"]);
    assert_eq!(menu.select_from(&console).unwrap(), 2);

    let console = ScriptedConsole::new();
    console.push_key(Key::Right);
    for _ in 0..10 {
        console.push_key(Key::Left);
    }
    console.push_key(Key::Enter);
    assert_eq!(menu.select_from(&console).unwrap(), 0);
}

#[test]
fn menu_ignores_unrelated_keys() {
    let console = ScriptedConsole::new();
    console.push_key(Key::Up);
    console.push_key(Key::Tab);
    console.push_text("q");
    console.push_key(Key::Right);
    console.push_key(Key::Enter);

    let menu = SelectMenu::new(["a", "b"]);
    assert_eq!(menu.select_from(&console).unwrap(), 1);
}

#[test]
fn menu_label_selection_returns_member_of_options() {
    let console = ScriptedConsole::new();
    console.push_key(Key::Right);
    console.push_key(Key::Enter);

    let menu = SelectMenu::new(["first", "second"]);
    let label = menu.select_label_from(&console).unwrap();
    assert_eq!(label, "second");
    assert!(menu.options().contains(&label));
}

#[test]
fn menu_redraws_in_place_with_highlight() {
    let console = ScriptedConsole::new();
    console.push_key(Key::Right);
    console.push_key(Key::Enter);

    SelectMenu::new(["a", "b"]).select_from(&console).unwrap();

    let ops = console.ops();
    // First render highlights index 0, then the line is overwritten in
    // place and re-rendered with index 1 highlighted.
    let writes: Vec<&str> = ops
        .iter()
        .filter_map(|op| match op {
            ConsoleOp::Write(text) => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(writes, vec!["[a] b", "a [b]", "\r\n"]);
    assert!(ops.contains(&ConsoleOp::MoveToLineStart));
}

#[test]
fn menu_hides_cursor_for_the_duration_and_restores_it() {
    let console = ScriptedConsole::new();
    console.push_key(Key::Enter);

    SelectMenu::new(["a"]).select_from(&console).unwrap();

    let ops = console.ops();
    let hide = ops
        .iter()
        .position(|op| *op == ConsoleOp::SetCursorVisible(false))
        .unwrap();
    let show = ops
        .iter()
        .position(|op| *op == ConsoleOp::SetCursorVisible(true))
        .unwrap();
    assert!(hide < show);
    assert!(console.cursor_visible());
    assert!(!console.raw_mode_active());
}

#[test]
fn menu_restores_display_state_on_eof() {
    let console = ScriptedConsole::new(); // no keys scripted

    let result = SelectMenu::new(["a", "b"]).select_from(&console);
    assert!(matches!(result, Err(PromptError::Eof)));
    assert!(console.cursor_visible());
    assert!(!console.raw_mode_active());
}

#[test]
fn menu_interrupt_restores_display_state() {
    let console = ScriptedConsole::new();
    console.push_key(Key::ControlC);

    let result = SelectMenu::new(["a", "b"]).select_from(&console);
    assert!(matches!(result, Err(PromptError::Interrupted)));
    assert!(console.cursor_visible());
    assert!(!console.raw_mode_active());
}

#[test]
#[should_panic(expected = "non-empty")]
fn menu_panics_on_empty_options() {
    let console = ScriptedConsole::new();
    let menu = SelectMenu::new(Vec::<String>::new());
    let _ = menu.select_from(&console);
}

// --- keypress pause ---

#[test]
fn pause_consumes_exactly_one_key() {
    let console = ScriptedConsole::new();
    console.push_text("x");
    console.push_key(Key::Enter);

    wait_for_key_from(&console, "Press any key...").unwrap();

    assert_eq!(console.count_written("Press any key..."), 1);
    // The second scripted key is still queued
    let leftover = askline_io::KeyInput::read_key(&console).unwrap().unwrap();
    assert_eq!(leftover.key, Key::Enter);
}

#[test]
fn pause_accepts_any_key() {
    for key in [Key::Enter, Key::Escape, Key::F5, Key::ControlC] {
        let console = ScriptedConsole::new();
        console.push_key(key);
        wait_for_key_from(&console, "").unwrap();
        assert!(!console.raw_mode_active());
    }
}

#[test]
fn pause_reports_eof_without_input() {
    let console = ScriptedConsole::new();
    let result = wait_for_key_from(&console, "");
    assert!(matches!(result, Err(PromptError::Eof)));
}
