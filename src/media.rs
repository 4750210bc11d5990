//! Media pause sweep.
//!
//! Stops everything that can make noise before opening an overlay: hosted
//! player frames get their provider's pause message posted, native videos
//! are paused directly, and attached model viewers are paused when present.

use crate::page::Page;

/// Pause command for embedded YouTube frames.
const YOUTUBE_PAUSE: &str = r#"{"event":"command","func":"pauseVideo","args":""}"#;

/// Pause command for embedded Vimeo frames.
const VIMEO_PAUSE: &str = r#"{"method":"pause"}"#;

/// Pause every media element on the page.
pub fn pause_all_media(page: &mut Page) {
    let root = page.root();

    for id in page.query_class(root, "js-youtube") {
        page.get_mut(id).posted_messages.push(YOUTUBE_PAUSE.to_string());
    }

    for id in page.query_class(root, "js-vimeo") {
        page.get_mut(id).posted_messages.push(VIMEO_PAUSE.to_string());
    }

    for id in page.query_tag(root, "video") {
        page.get_mut(id).playing = false;
    }

    for id in page.query_tag(root, "product-model") {
        if let Some(viewer) = page.get_mut(id).model_viewer.as_mut() {
            viewer.playing = false;
        }
    }
}
