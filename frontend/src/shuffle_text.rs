use std::cell::RefCell;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use reconciler::{AnimationRegistry, ShuffleFrames};
use shared::ShuffleConfig;
use zoon::*;

use crate::error_display::log_error_console_only;

thread_local! {
    static ANIMATIONS: RefCell<AnimationRegistry> = RefCell::new(AnimationRegistry::default());
}

/// Reveals the current text of `element_id` through scrambled frames, then
/// calls `on_complete`. A refused or missing element completes immediately.
///
/// Frames are written to the element found at start; if the table is
/// replaced mid-animation the remaining frames land on the detached node.
pub fn reveal_with_shuffle(
    element_id: &str,
    config: ShuffleConfig,
    on_complete: impl FnOnce() + 'static,
) {
    let Some(element) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(element_id))
    else {
        on_complete();
        return;
    };
    let ticket = match ANIMATIONS.with(|animations| animations.borrow_mut().try_begin(element_id)) {
        Ok(ticket) => ticket,
        Err(error) => {
            log_error_console_only(&error);
            on_complete();
            return;
        }
    };

    let text = element.text_content().unwrap_or_default();
    let rng = SmallRng::seed_from_u64((js_sys::Math::random() * u64::MAX as f64) as u64);
    let frame_delay = config.frame_delay_ms();

    Task::start(async move {
        for frame in ShuffleFrames::new(&text, config, rng) {
            element.set_text_content(Some(&frame));
            Timer::sleep(frame_delay).await;
        }
        ANIMATIONS.with(|animations| animations.borrow_mut().finish(&ticket));
        on_complete();
    });
}

/// The animated nodes were replaced; new nodes may animate right away.
pub fn supersede_running_shuffles() {
    ANIMATIONS.with(|animations| animations.borrow_mut().supersede_all());
}
