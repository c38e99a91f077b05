//! Page scripts evaluated at every page-load start and finish.
//!
//! Both scripts guard on a window flag, so evaluating them again on the
//! same document is a no-op.

use crate::ipc::IPC_INIT_SCRIPT;

/// Delay before a closed WebSocket stops counting as pending work,
/// covering the usual reconnect window.
pub const WEBSOCKET_RELEASE_DELAY_MS: u32 = 30_000;

/// Counts outstanding fetch / XHR / WebSocket / media activity and reports
/// the 0 -> 1 and 1 -> 0 transitions as `keep_alive` acquire / release.
pub const KEEP_ALIVE_SCRIPT: &str = r#"
(function() {
    if (window.__tabkeepKeepAlive) return;
    window.__tabkeepKeepAlive = true;

    var activeTasks = 0;
    var holding = false;

    function post(state) {
        if (window.tabkeep && window.tabkeep.ipc) {
            window.tabkeep.ipc.send('keep_alive', state);
        }
    }

    function update() {
        if (activeTasks > 0 && !holding) {
            holding = true;
            post('acquire');
        } else if (activeTasks === 0 && holding) {
            holding = false;
            post('release');
        }
    }

    function begin() { activeTasks++; update(); }
    function end() { activeTasks = Math.max(0, activeTasks - 1); update(); }

    var originalFetch = window.fetch;
    if (originalFetch) {
        window.fetch = function() {
            begin();
            return originalFetch.apply(this, arguments).finally(end);
        };
    }

    var originalOpen = XMLHttpRequest.prototype.open;
    var originalSend = XMLHttpRequest.prototype.send;
    XMLHttpRequest.prototype.open = function() {
        this.__tabkeepActive = false;
        return originalOpen.apply(this, arguments);
    };
    XMLHttpRequest.prototype.send = function() {
        var xhr = this;
        if (!xhr.__tabkeepActive) {
            xhr.__tabkeepActive = true;
            begin();
            xhr.addEventListener('loadend', function() {
                if (xhr.__tabkeepActive) {
                    xhr.__tabkeepActive = false;
                    end();
                }
            });
        }
        return originalSend.apply(this, arguments);
    };

    var OriginalWebSocket = window.WebSocket;
    if (OriginalWebSocket) {
        var Wrapped = function(url, protocols) {
            var ws = protocols === undefined
                ? new OriginalWebSocket(url)
                : new OriginalWebSocket(url, protocols);
            begin();
            ws.addEventListener('close', function() {
                setTimeout(end, __WS_RELEASE_DELAY_MS__);
            });
            return ws;
        };
        Wrapped.prototype = OriginalWebSocket.prototype;
        Wrapped.CONNECTING = OriginalWebSocket.CONNECTING;
        Wrapped.OPEN = OriginalWebSocket.OPEN;
        Wrapped.CLOSING = OriginalWebSocket.CLOSING;
        Wrapped.CLOSED = OriginalWebSocket.CLOSED;
        window.WebSocket = Wrapped;
    }

    // A finished element fires both pause and ended; count it once.
    function mediaStarted(event) {
        var media = event.target;
        if (!media.__tabkeepPlaying) {
            media.__tabkeepPlaying = true;
            begin();
        }
    }
    function mediaStopped(event) {
        var media = event.target;
        if (media.__tabkeepPlaying) {
            media.__tabkeepPlaying = false;
            end();
        }
    }
    document.addEventListener('play', mediaStarted, true);
    document.addEventListener('pause', mediaStopped, true);
    document.addEventListener('ended', mediaStopped, true);
})();
"#;

/// Scripts to evaluate, in order, on every page-load start and finish.
pub fn injection_scripts() -> [String; 2] {
    [
        IPC_INIT_SCRIPT.to_string(),
        KEEP_ALIVE_SCRIPT.replace(
            "__WS_RELEASE_DELAY_MS__",
            &WEBSOCKET_RELEASE_DELAY_MS.to_string(),
        ),
    ]
}
