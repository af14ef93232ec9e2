//! Browser collaborator: DOM construction, input wiring, interval timer.
//!
//! Everything here is plumbing around [`GameSession`]: render the stack and
//! slots, translate clicks into session operations, drive the 1-second
//! countdown, and flash outcome banners. Interaction model: click a stack cup
//! to pick it up, click a slot to set it down, click a placed cup to send it
//! back, click two slots to swap.
//!
//! The session lives in a `thread_local` cell; the interval closure carries
//! the session's attempt token, so a tick scheduled for a finished attempt
//! lands as a stale no-op instead of draining the next level's clock.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, Window, console, window};

use crate::levels::LEVELS;
use crate::session::{CheckOutcome, GameSession, Phase, PlaceOutcome, TickOutcome};

/// Delay before an outcome banner resolves into the next/retried level.
const BANNER_MS: i32 = 2000;

struct App {
    session: GameSession,
    /// Cup picked up from the stack (or from a slot) awaiting a slot click.
    selected: Option<u32>,
    /// Interval handle plus its closure; the closure must outlive the
    /// interval, so it is replaced only from outside its own invocation.
    timer: Option<(i32, Closure<dyn FnMut()>)>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn with_app(f: impl FnOnce(&mut App)) {
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            f(app);
        }
    });
}

pub fn start() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win.document().ok_or_else(|| JsValue::from_str("no document"))?;

    build_ui(&doc)?;

    let session = GameSession::new(&LEVELS).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let mut app = App {
        session,
        selected: None,
        timer: None,
    };
    app.session.start();
    restart_timer(&win, &mut app)?;
    render(&doc, &app);
    APP.with(|cell| cell.replace(Some(app)));
    Ok(())
}

// --- UI construction ---------------------------------------------------------

fn build_ui(doc: &Document) -> Result<(), JsValue> {
    // Reuse an existing root so a hot reload does not stack duplicate boards.
    if doc.get_element_by_id("cs-root").is_some() {
        return Ok(());
    }
    let root = doc.create_element("div")?;
    root.set_id("cs-root");

    let header = doc.create_element("div")?;
    header.set_id("cs-header");
    for (id, text) in [("cs-level", "Level 1"), ("cs-time", ""), ("cs-banner", "")] {
        let el = doc.create_element("span")?;
        el.set_id(id);
        el.set_text_content(Some(text));
        header.append_child(&el)?;
    }
    root.append_child(&header)?;

    let controls = doc.create_element("div")?;
    controls.set_id("cs-controls");
    for (id, label) in [
        ("cs-start", "Start"),
        ("cs-check", "Check arrangement"),
        ("cs-pause", "Pause"),
        ("cs-end", "End game"),
    ] {
        let btn = doc.create_element("button")?;
        btn.set_id(id);
        btn.set_text_content(Some(label));
        controls.append_child(&btn)?;
    }
    root.append_child(&controls)?;

    let slots = doc.create_element("div")?;
    slots.set_id("cs-slots");
    root.append_child(&slots)?;

    let stack = doc.create_element("div")?;
    stack.set_id("cs-stack");
    root.append_child(&stack)?;

    doc.body()
        .ok_or_else(|| JsValue::from_str("no body"))?
        .append_child(&root)?;

    // One delegated listener covers every cup and slot; buttons get their own.
    listen(&root, "click", on_board_click)?;
    listen_by_id(doc, "cs-start", on_start)?;
    listen_by_id(doc, "cs-check", on_check)?;
    listen_by_id(doc, "cs-pause", on_pause)?;
    listen_by_id(doc, "cs-end", on_end)?;
    Ok(())
}

fn listen(el: &Element, event: &str, handler: fn(Event)) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // Listeners live for the page lifetime.
    closure.forget();
    Ok(())
}

fn listen_by_id(doc: &Document, id: &str, handler: fn(Event)) -> Result<(), JsValue> {
    let el = doc
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str("missing control"))?;
    listen(&el, "click", handler)
}

// --- Rendering ---------------------------------------------------------------

fn render(doc: &Document, app: &App) {
    let session = &app.session;
    set_text(
        doc,
        "cs-level",
        &format!("Level {} / {}", session.level_index() + 1, session.level_count()),
    );
    render_time(doc, session.remaining_seconds());

    if let Some(stack_el) = doc.get_element_by_id("cs-stack") {
        stack_el.set_inner_html("");
        for cup in session.stack() {
            if let Ok(el) = cup_element(doc, cup.id, cup.color, app.selected == Some(cup.id)) {
                let _ = stack_el.append_child(&el);
            }
        }
    }

    if let Some(slots_el) = doc.get_element_by_id("cs-slots") {
        slots_el.set_inner_html("");
        for (index, cup) in session.arrangement().iter() {
            let Ok(slot) = doc.create_element("div") else {
                continue;
            };
            slot.set_class_name("cup-slot");
            let _ = slot.set_attribute("data-index", &index.to_string());
            if let Some(cup) = cup {
                if let Ok(el) = cup_element(doc, cup.id, cup.color, app.selected == Some(cup.id)) {
                    let _ = slot.append_child(&el);
                }
            }
            let _ = slots_el.append_child(&slot);
        }
    }
}

fn cup_element(doc: &Document, id: u32, color: &str, selected: bool) -> Result<Element, JsValue> {
    let el = doc.create_element("div")?;
    el.set_class_name(if selected { "cup selected" } else { "cup" });
    el.set_attribute("data-cup-id", &id.to_string())?;
    el.set_attribute("style", &format!("background-color: {color};"))?;
    Ok(el)
}

fn render_time(doc: &Document, remaining: u32) {
    set_text(doc, "cs-time", &format!("{}:{:02}", remaining / 60, remaining % 60));
}

fn set_text(doc: &Document, id: &str, text: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

fn banner(doc: &Document, text: &str) {
    set_text(doc, "cs-banner", text);
}

// --- Countdown ---------------------------------------------------------------

fn restart_timer(win: &Window, app: &mut App) -> Result<(), JsValue> {
    if let Some((handle, _)) = app.timer.take() {
        win.clear_interval_with_handle(handle);
    }
    let token = app.session.attempt();
    let closure = Closure::wrap(Box::new(move || on_tick(token)) as Box<dyn FnMut()>);
    let handle = win
        .set_interval_with_callback_and_timeout_and_arguments_0(closure.as_ref().unchecked_ref(), 1000)?;
    app.timer = Some((handle, closure));
    Ok(())
}

fn stop_timer(app: &mut App) {
    // Only clears the interval; the closure object stays in `app.timer` so a
    // tick currently executing is never freed out from under itself.
    if let Some(win) = window() {
        if let Some((handle, _)) = &app.timer {
            win.clear_interval_with_handle(*handle);
        }
    }
}

fn on_tick(token: u64) {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    with_app(|app| match app.session.tick(token) {
        TickOutcome::Stale | TickOutcome::Suspended => {}
        TickOutcome::Running { remaining } => render_time(&doc, remaining),
        TickOutcome::Expired => {
            render_time(&doc, 0);
            stop_timer(app);
            console::log_1(&"time expired, level lost".into());
            banner(&doc, "Time is up!");
            schedule_acknowledge();
        }
    });
}

/// After the banner delay, resolve the finished level and either re-enter
/// play (next level or retry) or settle on the game-over screen.
fn schedule_acknowledge() {
    let Some(win) = window() else {
        return;
    };
    let cb = Closure::once_into_js(move || {
        let Some(win) = window() else {
            return;
        };
        let Some(doc) = win.document() else {
            return;
        };
        with_app(|app| {
            match app.session.acknowledge() {
                Phase::InLevel => {
                    app.selected = None;
                    banner(&doc, "");
                    let _ = restart_timer(&win, app);
                }
                Phase::GameOver { victory: true } => {
                    banner(&doc, "Congratulations! You completed all levels!");
                }
                _ => {}
            }
            render(&doc, app);
        });
    });
    let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), BANNER_MS);
}

// --- Input handlers ----------------------------------------------------------

fn on_board_click(event: Event) {
    let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return;
    };
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };

    // Cup clicks win over slot clicks (a placed cup sits inside its slot).
    if let Ok(Some(cup_el)) = target.closest(".cup") {
        let Some(cup_id) = cup_el
            .get_attribute("data-cup-id")
            .and_then(|v| v.parse::<u32>().ok())
        else {
            return;
        };
        let in_slot = matches!(cup_el.closest(".cup-slot"), Ok(Some(_)));
        with_app(|app| {
            if in_slot && app.selected.is_none() {
                app.session.return_cup(cup_id);
            } else if app.selected == Some(cup_id) {
                app.selected = None;
            } else if in_slot {
                // Selected cup dropped onto an occupied slot: move/swap.
                if let (Some(selected), Some(slot)) =
                    (app.selected, app.session.arrangement().position_of(cup_id))
                {
                    handle_place(&doc, app, selected, slot);
                }
            } else {
                app.selected = Some(cup_id);
            }
            render(&doc, app);
        });
        return;
    }

    if let Ok(Some(slot_el)) = target.closest(".cup-slot") {
        let Some(slot) = slot_el
            .get_attribute("data-index")
            .and_then(|v| v.parse::<usize>().ok())
        else {
            return;
        };
        with_app(|app| {
            if let Some(cup_id) = app.selected {
                handle_place(&doc, app, cup_id, slot);
                render(&doc, app);
            }
        });
    }
}

fn handle_place(doc: &Document, app: &mut App, cup_id: u32, slot: usize) {
    match app.session.place_cup(cup_id, slot) {
        Ok(PlaceOutcome::Placed | PlaceOutcome::Swapped) => {
            app.selected = None;
        }
        Ok(PlaceOutcome::KillerTriggered) => {
            app.selected = None;
            stop_timer(app);
            console::log_1(&"killer cup placed, level failed".into());
            banner(doc, "That was a killer cup!");
            schedule_acknowledge();
        }
        // Rejected moves keep the selection so the player can retarget.
        Err(_) => {}
    }
}

fn on_start(_event: Event) {
    let Some(win) = window() else {
        return;
    };
    let Some(doc) = win.document() else {
        return;
    };
    with_app(|app| {
        if app.session.start() {
            app.selected = None;
            banner(&doc, "");
            let _ = restart_timer(&win, app);
            render(&doc, app);
        }
    });
}

fn on_check(_event: Event) {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    with_app(|app| {
        match app.session.check_arrangement() {
            Some(CheckOutcome::Solved { last_level }) => {
                stop_timer(app);
                console::log_1(&"arrangement solved".into());
                banner(
                    &doc,
                    if last_level {
                        "Correct! That was the final level."
                    } else {
                        "Correct! Moving to the next level."
                    },
                );
                schedule_acknowledge();
            }
            Some(CheckOutcome::Incorrect { correct_count }) => {
                // Non-destructive miss: the board stays editable.
                banner(
                    &doc,
                    &format!(
                        "{} of {} cups in place. Keep going!",
                        correct_count,
                        app.session.arrangement().slot_count()
                    ),
                );
            }
            None => {}
        }
        render(&doc, app);
    });
}

fn on_pause(_event: Event) {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    with_app(|app| {
        let paused = app.session.toggle_pause();
        banner(&doc, if paused { "Paused" } else { "" });
    });
}

fn on_end(_event: Event) {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    with_app(|app| {
        stop_timer(app);
        app.session.end();
        app.selected = None;
        banner(&doc, "Game ended. Press Start to play again.");
        render(&doc, app);
    });
}
