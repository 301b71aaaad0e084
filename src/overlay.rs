use crate::constants::*;
use web_sys as web;

#[inline]
pub fn show(notice: &web::HtmlElement, message: &str) {
    notice.set_text_content(Some(message));
    _ = notice.set_attribute("style", NOTICE_STYLE);
}

#[inline]
pub fn hide(notice: &web::HtmlElement) {
    notice.set_text_content(None);
    _ = notice.set_attribute("style", NOTICE_HIDDEN_STYLE);
}

#[inline]
pub fn is_hidden(notice: &web::HtmlElement) -> bool {
    notice
        .get_attribute("style")
        .map(|s| s.contains("display:none"))
        .unwrap_or(true)
}

/// Show `message` or hide the notice, touching the DOM only on change.
pub fn sync(notice: &web::HtmlElement, message: Option<&str>) {
    match message {
        Some(m) if is_hidden(notice) || notice.text_content().as_deref() != Some(m) => {
            show(notice, m)
        }
        None if !is_hidden(notice) => hide(notice),
        _ => {}
    }
}
