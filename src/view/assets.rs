//! Stylesheet and client script compiled into the binary.
//!
//! The script holds no state. It forwards key presses, visibility and
//! connectivity changes to the server and reloads when the display changes.

pub const STYLES: &str = r#"
:root {
  --bg: #f5f7fa;
  --surface: #ffffff;
  --text: #1f2933;
  --muted: #6b7785;
  --border: #e1e6ec;
  --accent: #2563eb;
  --entry: #16a34a;
  --exit: #dc2626;
  --signal-2: #7c3aed;
  --error-bg: #fdecec;
}
[data-theme="dark"] {
  --bg: #0f172a;
  --surface: #1e293b;
  --text: #e2e8f0;
  --muted: #94a3b8;
  --border: #334155;
  --accent: #60a5fa;
  --entry: #4ade80;
  --exit: #f87171;
  --signal-2: #a78bfa;
  --error-bg: #3b1d1d;
}
* { box-sizing: border-box; }
body {
  margin: 0;
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
  background: var(--bg);
  color: var(--text);
}
.hidden { display: none !important; }
.no-scroll { overflow: hidden; }
header.app-header {
  display: flex;
  justify-content: space-between;
  align-items: center;
  padding: 16px 24px;
  background: var(--surface);
  border-bottom: 1px solid var(--border);
}
header.app-header h1 { margin: 0; font-size: 1.4rem; }
.header-actions { display: flex; gap: 8px; }
button {
  background: var(--surface);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: 6px;
  padding: 6px 12px;
  cursor: pointer;
}
button[disabled], button.loading { opacity: 0.6; cursor: progress; }
main { max-width: 1200px; margin: 0 auto; padding: 24px; }
.loading-panel, .error-panel, .empty-state {
  text-align: center;
  padding: 32px;
  border-radius: 8px;
  background: var(--surface);
  margin-bottom: 16px;
}
.error-panel { background: var(--error-bg); color: var(--exit); }
.stats-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
  gap: 12px;
  margin-bottom: 24px;
}
.stat-card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: 8px;
  padding: 16px;
}
.stat-label { color: var(--muted); font-size: 0.8rem; }
.stat-value { font-size: 1.6rem; font-weight: 600; }
.stocks-list {
  display: grid;
  grid-template-columns: repeat(auto-fill, minmax(300px, 1fr));
  gap: 16px;
}
.stock-card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: 8px;
  padding: 16px;
}
.stock-header { display: flex; justify-content: space-between; align-items: baseline; }
.stock-ticker { font-weight: 600; }
.ticker-code { color: var(--muted); margin-left: 4px; font-weight: 400; }
.market-badge {
  margin-left: 6px;
  font-size: 0.7rem;
  padding: 2px 6px;
  border-radius: 4px;
  background: var(--border);
}
.market-krx { background: #fde68a; color: #78350f; }
.market-us { background: #bfdbfe; color: #1e3a8a; }
.stock-price { font-size: 1.2rem; }
.stock-signal { margin: 8px 0; display: flex; gap: 6px; }
.signal-indicator { font-size: 0.75rem; padding: 2px 8px; border-radius: 999px; color: #fff; }
.signal-1 { background: var(--accent); }
.signal-2 { background: var(--signal-2); }
.signal-entry { background: var(--entry); }
.signal-exit { background: var(--exit); }
.detail-item { display: flex; justify-content: space-between; padding: 2px 0; }
.detail-label { color: var(--muted); }
.modal {
  position: fixed;
  inset: 0;
  background: rgba(0, 0, 0, 0.5);
  display: flex;
  align-items: center;
  justify-content: center;
}
.modal-content {
  background: var(--surface);
  padding: 24px;
  border-radius: 8px;
  max-width: 520px;
}
.fade-in { animation: fade-in 0.3s ease-out; }
.slide-up { animation: slide-up 0.4s ease-out both; }
@keyframes fade-in { from { opacity: 0; } to { opacity: 1; } }
@keyframes slide-up {
  from { opacity: 0; transform: translateY(12px); }
  to { opacity: 1; transform: none; }
}
"#;

pub const CLIENT_SCRIPT: &str = r#"
(function () {
  const root = document.documentElement;
  let version = Number(root.getAttribute('data-version'));
  let animating = root.getAttribute('data-animating') === 'true';

  async function post(path, body, method) {
    const r = await fetch(path, {
      method: method || 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: body ? JSON.stringify(body) : undefined,
      cache: 'no-store'
    });
    return r.ok ? r.json().catch(() => null) : null;
  }

  async function act(path, body, method) {
    await post(path, body, method);
    window.location.reload();
  }

  document.addEventListener('click', (e) => {
    const target = e.target.closest('[data-action]');
    if (!target) return;
    switch (target.getAttribute('data-action')) {
      case 'refresh': act('/api/refresh'); break;
      case 'theme': act('/api/theme/toggle'); break;
      case 'show-info': act('/api/info'); break;
      case 'hide-info': act('/api/info', null, 'DELETE'); break;
    }
  });

  document.addEventListener('keydown', async (e) => {
    const shortcut = (e.ctrlKey || e.metaKey) && (e.key === 'r' || e.key === 't');
    if (!shortcut && e.key !== 'Escape') return;
    if (shortcut) e.preventDefault();
    const result = await post('/api/keys', { key: e.key, ctrl: e.ctrlKey, meta: e.metaKey });
    if (result && result.action) window.location.reload();
  });

  // Survives reloads of this tab, so a reloaded page reports as the same view
  const view = (() => {
    const fresh = () => Math.random().toString(36).slice(2, 14);
    try {
      let id = sessionStorage.getItem('screener-view');
      if (!id) {
        id = fresh();
        sessionStorage.setItem('screener-view', id);
      }
      return id;
    } catch (_) {
      return fresh();
    }
  })();

  function lifecycle(event) {
    return post('/api/lifecycle', { event: event, view: view });
  }

  // An unloading page turns hidden too; that must not suspend polling
  let unloading = false;
  window.addEventListener('beforeunload', () => { unloading = true; });
  window.addEventListener('pagehide', () => { unloading = true; });
  window.addEventListener('pageshow', (e) => {
    if (!e.persisted) return;
    unloading = false;
    if (!document.hidden) lifecycle('visible');
  });

  document.addEventListener('visibilitychange', () => {
    if (!document.hidden) {
      lifecycle('visible');
    } else if (!unloading) {
      lifecycle('hidden');
    }
  });
  window.addEventListener('online', () => lifecycle('online'));
  window.addEventListener('offline', () => lifecycle('offline'));

  if (!document.hidden) lifecycle('visible');

  async function poll() {
    if (document.hidden) return;
    try {
      const r = await fetch('/api/state', { cache: 'no-store' });
      if (!r.ok) return;
      const state = await r.json();
      if (state.display.version !== version || animating) {
        window.location.reload();
      }
    } catch (_) {}
  }
  setInterval(poll, animating ? 250 : 5000);
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_ignores_hidden_while_unloading() {
        assert!(CLIENT_SCRIPT.contains("addEventListener('pagehide'"));
        assert!(CLIENT_SCRIPT.contains("} else if (!unloading) {"));
        assert!(CLIENT_SCRIPT.contains("view: view"));
    }

    #[test]
    fn test_script_reports_visible_on_load() {
        assert!(CLIENT_SCRIPT.contains("if (!document.hidden) lifecycle('visible');"));
    }
}
