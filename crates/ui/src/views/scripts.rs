use serde::Deserialize;

/// Scroll position reported by the page.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(super) struct ScrollMetrics {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

/// Installs a single window scroll listener that streams `ScrollMetrics`
/// back over the eval channel, plus one report for the initial position.
pub(super) const READING_PROGRESS_SCRIPT: &str = r#"(function() {
    const doc = document.documentElement;
    const report = () => {
        dioxus.send({
            scrollTop: window.scrollY || doc.scrollTop || 0,
            viewportHeight: window.innerHeight || doc.clientHeight || 0,
            documentHeight: Math.max(document.body.scrollHeight, doc.scrollHeight),
        });
    };
    if (window.__courseReadingListener) {
        window.removeEventListener("scroll", window.__courseReadingListener);
    }
    let pending = false;
    window.__courseReadingListener = () => {
        if (pending) {
            return;
        }
        pending = true;
        requestAnimationFrame(() => {
            pending = false;
            report();
        });
    };
    window.addEventListener("scroll", window.__courseReadingListener, { passive: true });
    report();
})();"#;
